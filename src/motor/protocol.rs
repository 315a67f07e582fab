// Proteus MCU serial protocol: wire formats
//
// Outbound command (6 bytes): [0x24, reserved i16 LE, speed i16 LE, steering]
// Inbound telemetry (10 bytes, LE): i16 target, i16 current, u16 motor_cmd,
// i16 prev_err, i16 total_err

use serde::{Deserialize, Serialize};

/// Every transmission starts with '$'
pub const FRAME_HEADER: u8 = 0x24;

/// Fixed size of an encoded motor command
pub const COMMAND_LEN: usize = 6;

/// Fixed size of a telemetry frame
pub const TELEMETRY_LEN: usize = 10;

/// Error types for Proteus communication
#[derive(Debug, thiserror::Error)]
pub enum ProteusError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Short telemetry frame: expected {expected} bytes, got {got}")]
    ShortFrame { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, ProteusError>;

/// Motor command sent to the MCU on every heartbeat tick
///
/// The wire layout carries a reserved int16 between the header and the speed;
/// the firmware ignores it and it is always zero, so it is emitted by
/// `encode` rather than stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorCommand {
    /// Wheel speed in cm/s (signed, negative = reverse)
    pub speed: i16,
    /// Steering servo position, 0x40 = centered
    pub steering: u8,
}

impl MotorCommand {
    pub const fn new(speed: i16, steering: u8) -> Self {
        Self { speed, steering }
    }

    /// Command that halts the motor and straightens the wheels
    pub const fn stop() -> Self {
        Self::new(0, crate::config::DEFAULT_STEERING)
    }

    /// Serialize to the fixed 6-byte wire layout
    pub fn encode(&self) -> [u8; COMMAND_LEN] {
        let mut frame = [0u8; COMMAND_LEN];
        frame[0] = FRAME_HEADER;
        frame[1..3].copy_from_slice(&0i16.to_le_bytes()); // reserved
        frame[3..5].copy_from_slice(&self.speed.to_le_bytes());
        frame[5] = self.steering;
        frame
    }
}

/// PID state report sent back by the MCU
///
/// Speeds are in cm/s; `motor_cmd` is the power value the controller is
/// currently driving the motor with; `prev_err` and `total_err` are the
/// controller's error terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub target_speed: i16,
    pub current_speed: i16,
    pub motor_cmd: u16,
    pub prev_err: i16,
    pub total_err: i16,
}

impl TelemetryFrame {
    /// Decode a full 10-byte frame. Anything other than exactly
    /// `TELEMETRY_LEN` bytes is rejected.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != TELEMETRY_LEN {
            return Err(ProteusError::ShortFrame {
                expected: TELEMETRY_LEN,
                got: buf.len(),
            });
        }

        Ok(Self {
            target_speed: i16::from_le_bytes([buf[0], buf[1]]),
            current_speed: i16::from_le_bytes([buf[2], buf[3]]),
            motor_cmd: u16::from_le_bytes([buf[4], buf[5]]),
            prev_err: i16::from_le_bytes([buf[6], buf[7]]),
            total_err: i16::from_le_bytes([buf[8], buf[9]]),
        })
    }
}
