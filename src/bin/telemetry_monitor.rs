// Telemetry monitor: READ-ONLY dump of MCU telemetry frames
//
// Never writes to the port, so the MCU watchdog will keep the motor halted
// while this runs. Use it to verify the link before starting the runtime.
//
// Usage: cargo run --bin telemetry_monitor -- [--port PORT] [--json]

use std::thread::sleep;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use proteus_serial_runtime::config::{self, MCU_SETTLE_DELAY, TELEMETRY_POLL_PERIOD};
use proteus_serial_runtime::motor::SerialLink;
use proteus_serial_runtime::telemetry::TelemetryReceiver;

/// Read-only telemetry frame dump
#[derive(Parser)]
#[command(name = "telemetry_monitor")]
struct Cli {
    /// Serial port connected to the MCU
    #[arg(long, default_value = config::DEFAULT_PORT)]
    port: String,

    /// Serial baud rate
    #[arg(long, default_value_t = config::BAUD_RATE)]
    baud: u32,

    /// Emit one JSON object per frame instead of log lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // In JSON mode keep stdout clean; the receiver's own info lines are the
    // human-readable output otherwise.
    let default_level = if cli.json { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(default_level.parse().unwrap()),
        )
        .init();

    println!("Telemetry monitor (read-only) on {}", cli.port);

    let link = SerialLink::open(&cli.port, cli.baud)?;
    sleep(MCU_SETTLE_DELAY);
    link.clear_input()?;

    let mut receiver = TelemetryReceiver::new(link);
    loop {
        if let Some(frame) = receiver.poll()? {
            if cli.json {
                println!("{}", serde_json::to_string(&frame)?);
            }
        }
        sleep(TELEMETRY_POLL_PERIOD);
    }
}
