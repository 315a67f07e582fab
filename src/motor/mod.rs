// Motor link module for the Proteus base
//
// Provides:
// - Wire formats for the MCU command and telemetry frames
// - Serial link plumbing shared by the heartbeat and telemetry roles

pub mod protocol;
pub mod serial;

pub use protocol::{MotorCommand, ProteusError, TelemetryFrame, COMMAND_LEN, TELEMETRY_LEN};
pub use serial::{Link, SerialLink};
