// Periods, serial defaults, command defaults
use std::time::Duration;

// Heartbeat rate. The MCU's safety watchdog halts the motor if commands stop
// arriving at >= 10 Hz, so this period is a contract, not a tunable.
pub const HEARTBEAT_HZ: u64 = 10;
pub const HEARTBEAT_PERIOD: Duration = Duration::from_millis(1000 / HEARTBEAT_HZ);

// The MCU resets when the port is opened; give it time to finish booting
// before the first command.
pub const MCU_SETTLE_DELAY: Duration = Duration::from_secs(2);

// Cadence of the threaded telemetry receiver's availability checks.
pub const TELEMETRY_POLL_PERIOD: Duration = Duration::from_millis(20);

// Serial port for the Proteus motor controller
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub const BAUD_RATE: u32 = 115_200;
pub const READ_TIMEOUT_MS: u64 = 100;

// Default command values: 100 cm/s forward, steering servo centered.
pub const DEFAULT_SPEED: i16 = 100;
pub const DEFAULT_STEERING: u8 = 0x40;
