use clap::Parser;
use tracing_subscriber::EnvFilter;

use proteus_serial_runtime::config;
use proteus_serial_runtime::motor::MotorCommand;
use proteus_serial_runtime::runtime::{self, RunOptions, TelemetryMode};

/// 10 Hz heartbeat transmitter for the Proteus motor controller
#[derive(Parser)]
#[command(name = "proteus-serial-runtime")]
struct Cli {
    /// Serial port connected to the MCU
    #[arg(long, default_value = config::DEFAULT_PORT)]
    port: String,

    /// Serial baud rate
    #[arg(long, default_value_t = config::BAUD_RATE)]
    baud: u32,

    /// Wheel speed command in cm/s
    #[arg(long, default_value_t = config::DEFAULT_SPEED)]
    speed: i16,

    /// Steering servo position (0x40 = centered)
    #[arg(long, default_value_t = config::DEFAULT_STEERING)]
    steering: u8,

    /// Poll telemetry on the send loop instead of a background thread
    #[arg(long)]
    inline_telemetry: bool,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let cli = Cli::parse();
    let opts = RunOptions {
        port: cli.port,
        baud: cli.baud,
        command: MotorCommand::new(cli.speed, cli.steering),
        telemetry: if cli.inline_telemetry {
            TelemetryMode::Inline
        } else {
            TelemetryMode::Threaded
        },
    };

    if let Err(e) = runtime::run(opts).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
