// Keyboard teleop: W/S speed, A/D steering, Space stop, Q quit
//
// The heartbeat keeps its 10 Hz cadence while keys are handled; releasing
// the keyboard does NOT stop the robot, Space does.

use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use proteus_serial_runtime::config::{self, HEARTBEAT_PERIOD, MCU_SETTLE_DELAY};
use proteus_serial_runtime::heartbeat::Heartbeat;
use proteus_serial_runtime::motor::{MotorCommand, SerialLink};

const SPEED_STEP: i16 = 10; // cm/s per keypress
const MAX_SPEED: i16 = 300; // cm/s
const STEERING_STEP: u8 = 8;

/// Drive the Proteus base from the keyboard
#[derive(Parser)]
#[command(name = "teleop")]
struct Cli {
    /// Serial port connected to the MCU
    #[arg(long, default_value = config::DEFAULT_PORT)]
    port: String,

    /// Serial baud rate
    #[arg(long, default_value_t = config::BAUD_RATE)]
    baud: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let cli = Cli::parse();

    info!("Opening serial link on {}...", cli.port);
    let link = SerialLink::open(&cli.port, cli.baud)?;
    std::thread::sleep(MCU_SETTLE_DELAY);
    link.clear_input()?;

    let mut heartbeat = Heartbeat::new(link, MotorCommand::stop());

    info!("Controls: W/S=speed, A/D=steering, Space=stop, Q=quit");

    enable_raw_mode()?;
    let result = run_teleop(&mut heartbeat);
    disable_raw_mode()?;

    // Leave the motor stopped no matter how the loop ended
    heartbeat.set_command(MotorCommand::stop());
    let _ = heartbeat.beat();

    result
}

fn run_teleop(
    heartbeat: &mut Heartbeat<SerialLink>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_beat = Instant::now();

    loop {
        // Short poll so the heartbeat cadence never starves behind input
        if event::poll(HEARTBEAT_PERIOD / 5)? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;
                if !pressed {
                    continue;
                }

                let mut cmd = heartbeat.command();
                match code {
                    KeyCode::Char('w') => {
                        cmd.speed = (cmd.speed + SPEED_STEP).min(MAX_SPEED);
                    }
                    KeyCode::Char('s') => {
                        cmd.speed = (cmd.speed - SPEED_STEP).max(-MAX_SPEED);
                    }
                    KeyCode::Char('a') => {
                        cmd.steering = cmd.steering.saturating_sub(STEERING_STEP);
                    }
                    KeyCode::Char('d') => {
                        cmd.steering = cmd.steering.saturating_add(STEERING_STEP);
                    }
                    KeyCode::Char(' ') => {
                        cmd = MotorCommand::stop();
                    }
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    _ => {}
                }

                if cmd != heartbeat.command() {
                    info!("Command: speed={} cm/s, steering=0x{:02X}", cmd.speed, cmd.steering);
                    heartbeat.set_command(cmd);
                }
            }
        }

        if last_beat.elapsed() >= HEARTBEAT_PERIOD {
            heartbeat.beat()?;
            last_beat = Instant::now();
        }
    }

    Ok(())
}
