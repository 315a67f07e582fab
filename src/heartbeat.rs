// Heartbeat transmitter: one motor command per tick
//
// The cadence lives in the caller (runtime loop or teleop); this type only
// knows how to emit exactly one command frame per beat, which keeps the send
// path drivable from tests with a bounded tick count.

use tracing::info;

use crate::motor::protocol::Result;
use crate::motor::{Link, MotorCommand};

pub struct Heartbeat<L: Link> {
    link: L,
    command: MotorCommand,
    sent: u64,
}

impl<L: Link> Heartbeat<L> {
    pub fn new(link: L, command: MotorCommand) -> Self {
        Self {
            link,
            command,
            sent: 0,
        }
    }

    /// Serialize and send the current command; returns bytes written.
    /// A write failure is fatal to the send loop and propagates.
    pub fn beat(&mut self) -> Result<usize> {
        let frame = self.command.encode();
        let written = self.link.send(&frame)?;
        self.sent += 1;

        info!(
            "Sent command: speed={} cm/s, steering=0x{:02X} ({} bytes)",
            self.command.speed, self.command.steering, written
        );
        Ok(written)
    }

    pub fn command(&self) -> MotorCommand {
        self.command
    }

    /// Replace the command sent on subsequent beats (teleop adjusts this
    /// between ticks).
    pub fn set_command(&mut self, command: MotorCommand) {
        self.command = command;
    }

    /// Number of commands sent so far
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::COMMAND_LEN;

    /// Records every frame handed to `send`
    struct RecordingLink {
        frames: Vec<Vec<u8>>,
    }

    impl RecordingLink {
        fn new() -> Self {
            Self { frames: Vec::new() }
        }
    }

    impl Link for RecordingLink {
        fn send(&mut self, frame: &[u8]) -> Result<usize> {
            self.frames.push(frame.to_vec());
            Ok(frame.len())
        }

        fn available(&mut self) -> Result<usize> {
            Ok(0)
        }

        fn read_exact(&mut self, _buf: &mut [u8]) -> Result<()> {
            unreachable!("heartbeat never reads")
        }
    }

    #[test]
    fn test_one_frame_per_beat() {
        let mut hb = Heartbeat::new(RecordingLink::new(), MotorCommand::new(100, 0x40));

        for tick in 1..=5u64 {
            let written = hb.beat().unwrap();
            assert_eq!(written, COMMAND_LEN);
            assert_eq!(hb.sent(), tick);
        }

        let frames = &hb.link.frames;
        assert_eq!(frames.len(), 5);
        for frame in frames {
            assert_eq!(frame.as_slice(), &[0x24, 0x00, 0x00, 0x64, 0x00, 0x40]);
        }
    }

    #[test]
    fn test_set_command_changes_next_beat() {
        let mut hb = Heartbeat::new(RecordingLink::new(), MotorCommand::new(100, 0x40));
        hb.beat().unwrap();

        hb.set_command(MotorCommand::stop());
        hb.beat().unwrap();

        assert_eq!(hb.link.frames[0][3..5], 100i16.to_le_bytes());
        assert_eq!(hb.link.frames[1][3..5], 0i16.to_le_bytes());
    }
}
