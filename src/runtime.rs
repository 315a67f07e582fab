// 10 Hz heartbeat loop with telemetry polling
//
// The MCU runs a safety watchdog: if it stops hearing commands it halts the
// motor and straightens the wheels. The runtime's one job is to keep that
// watchdog fed while surfacing whatever telemetry comes back.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tokio::time::{interval, sleep};
use tracing::{info, warn};

use crate::config::{HEARTBEAT_HZ, HEARTBEAT_PERIOD, MCU_SETTLE_DELAY, TELEMETRY_POLL_PERIOD};
use crate::heartbeat::Heartbeat;
use crate::motor::{MotorCommand, SerialLink};
use crate::telemetry::TelemetryReceiver;

/// How the telemetry receiver is scheduled relative to the send loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryMode {
    /// Background thread with its own polling cadence
    Threaded,
    /// One availability check per transmit tick, on the send loop
    Inline,
}

pub struct RunOptions {
    pub port: String,
    pub baud: u32,
    pub command: MotorCommand,
    pub telemetry: TelemetryMode,
}

pub async fn run(opts: RunOptions) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening serial link on {} at {} baud...", opts.port, opts.baud);
    let link = SerialLink::open(&opts.port, opts.baud)?;

    info!(
        "Waiting {:?} for the MCU to finish booting...",
        MCU_SETTLE_DELAY
    );
    sleep(MCU_SETTLE_DELAY).await;
    link.clear_input()?;

    let stop = Arc::new(AtomicBool::new(false));
    let mut rx_thread = None;
    let mut inline_rx = None;

    match opts.telemetry {
        TelemetryMode::Threaded => {
            let receiver = TelemetryReceiver::new(link.try_clone()?);
            let stop = Arc::clone(&stop);
            rx_thread = Some(thread::spawn(move || {
                receiver.run(stop, TELEMETRY_POLL_PERIOD)
            }));
        }
        TelemetryMode::Inline => {
            inline_rx = Some(TelemetryReceiver::new(link.try_clone()?));
        }
    }

    let mut heartbeat = Heartbeat::new(link, opts.command);
    let mut tick = interval(HEARTBEAT_PERIOD);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!(
        "Runtime started: {}Hz heartbeat, speed={} cm/s, steering=0x{:02X}, telemetry={:?}",
        HEARTBEAT_HZ,
        opts.command.speed,
        opts.command.steering,
        opts.telemetry
    );

    loop {
        tokio::select! {
            _ = tick.tick() => {
                // Any write failure is fatal; the process exits and the MCU
                // watchdog stops the motor on its own.
                heartbeat.beat()?;

                if let Some(rx) = inline_rx.as_mut() {
                    rx.poll()?;
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupt received, shutting down");
                break;
            }
        }
    }

    // Raise the stop flag first so the receiver loop can observe it, then
    // wait out its final poll cycle.
    stop.store(true, Ordering::Relaxed);
    if let Some(handle) = rx_thread {
        if handle.join().is_err() {
            warn!("Telemetry receiver thread panicked");
        }
    }

    info!("Sent {} commands", heartbeat.sent());
    Ok(())
}
