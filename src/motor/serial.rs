// Serial link to the Proteus MCU

use serialport::{self, ClearBuffer, SerialPort};
use std::io::{Read, Write};
use std::time::Duration;

use super::protocol::Result;
use crate::config::READ_TIMEOUT_MS;

/// Byte-level channel to the motor controller.
///
/// The heartbeat and telemetry loops are written against this trait so tests
/// can drive them with an in-memory channel instead of real hardware.
pub trait Link {
    /// Write a whole frame, returning the number of bytes written
    fn send(&mut self, frame: &[u8]) -> Result<usize>;

    /// Number of received bytes currently buffered
    fn available(&mut self) -> Result<usize>;

    /// Read exactly `buf.len()` bytes
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// Serial port connection to the MCU
pub struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Open the port. The MCU resets when this happens; callers are expected
    /// to wait out `config::MCU_SETTLE_DELAY` before the first command.
    pub fn open(port_name: &str, baudrate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baudrate)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()?;

        Ok(Self { port })
    }

    /// Second handle to the same port, for the telemetry role. The OS serial
    /// driver handles concurrent reads and writes on the two handles.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            port: self.port.try_clone()?,
        })
    }

    /// Discard any stale buffered input so polling starts at an empty,
    /// frame-aligned buffer.
    pub fn clear_input(&self) -> Result<()> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }
}

impl Link for SerialLink {
    fn send(&mut self, frame: &[u8]) -> Result<usize> {
        self.port.write_all(frame)?;
        self.port.flush()?;
        Ok(frame.len())
    }

    fn available(&mut self) -> Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.port.read_exact(buf)?;
        Ok(())
    }
}
