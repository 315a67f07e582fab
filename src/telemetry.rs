// Telemetry receiver: availability-gated fixed-width frame reads
//
// A frame is only consumed once all 10 bytes are buffered; a partial frame
// stays in the OS buffer until the rest arrives. Bytes beyond a multiple of
// the frame size are likewise left for the next poll.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{error, info};

use crate::motor::protocol::Result;
use crate::motor::{Link, TelemetryFrame, TELEMETRY_LEN};

pub struct TelemetryReceiver<L: Link> {
    link: L,
    decoded: u64,
}

impl<L: Link> TelemetryReceiver<L> {
    pub fn new(link: L) -> Self {
        Self { link, decoded: 0 }
    }

    /// Check for a complete buffered frame and decode it if present.
    /// Never blocks waiting for bytes: with fewer than `TELEMETRY_LEN`
    /// buffered this reads nothing and returns `None`.
    pub fn poll(&mut self) -> Result<Option<TelemetryFrame>> {
        if self.link.available()? < TELEMETRY_LEN {
            return Ok(None);
        }

        let mut buf = [0u8; TELEMETRY_LEN];
        self.link.read_exact(&mut buf)?;
        let frame = TelemetryFrame::decode(&buf)?;
        self.decoded += 1;

        info!(
            "Telemetry: target={} cm/s, current={} cm/s, motor_cmd={}, prev_err={}, total_err={}",
            frame.target_speed, frame.current_speed, frame.motor_cmd, frame.prev_err,
            frame.total_err
        );
        Ok(Some(frame))
    }

    /// Number of frames decoded so far
    pub fn decoded(&self) -> u64 {
        self.decoded
    }

    /// Polling loop for the threaded variant. Runs until `stop` is set,
    /// observing it once per cycle, so shutdown completes within one
    /// `poll_period` of the flag being raised.
    ///
    /// A poll failure ends this loop but not the process: the send loop must
    /// keep feeding the MCU watchdog even if telemetry dies.
    pub fn run(mut self, stop: Arc<AtomicBool>, poll_period: Duration) {
        // The flag transitions false -> true exactly once, written by the
        // main loop on shutdown.
        while !stop.load(Ordering::Relaxed) {
            if let Err(e) = self.poll() {
                error!("Telemetry receiver stopping: {}", e);
                return;
            }
            thread::sleep(poll_period);
        }
        info!("Telemetry receiver stopped ({} frames)", self.decoded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// In-memory channel with a preloaded receive buffer
    struct BufferedLink {
        rx: VecDeque<u8>,
        reads: usize,
    }

    impl BufferedLink {
        fn with_bytes(bytes: &[u8]) -> Self {
            Self {
                rx: bytes.iter().copied().collect(),
                reads: 0,
            }
        }
    }

    impl Link for BufferedLink {
        fn send(&mut self, _frame: &[u8]) -> Result<usize> {
            unreachable!("receiver never writes")
        }

        fn available(&mut self) -> Result<usize> {
            Ok(self.rx.len())
        }

        fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
            assert!(self.rx.len() >= buf.len(), "read past buffered bytes");
            for slot in buf.iter_mut() {
                *slot = self.rx.pop_front().unwrap();
            }
            self.reads += 1;
            Ok(())
        }
    }

    const FRAME: [u8; TELEMETRY_LEN] =
        [0xE8, 0x03, 0xE8, 0x03, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00];

    #[test]
    fn test_no_read_below_frame_size() {
        let mut rx = TelemetryReceiver::new(BufferedLink::with_bytes(&FRAME[..9]));

        assert!(rx.poll().unwrap().is_none());
        assert_eq!(rx.link.reads, 0);
        assert_eq!(rx.link.rx.len(), 9);
    }

    #[test]
    fn test_reads_exactly_one_frame() {
        let mut rx = TelemetryReceiver::new(BufferedLink::with_bytes(&FRAME));

        let frame = rx.poll().unwrap().expect("frame should decode");
        assert_eq!(frame.target_speed, 1000);
        assert_eq!(frame.current_speed, 1000);
        assert_eq!(frame.motor_cmd, 100);
        assert_eq!(rx.link.reads, 1);
        assert_eq!(rx.link.rx.len(), 0);
        assert_eq!(rx.decoded(), 1);
    }

    #[test]
    fn test_leftover_bytes_stay_buffered() {
        let mut bytes = FRAME.to_vec();
        bytes.extend_from_slice(&FRAME[..5]);
        let mut rx = TelemetryReceiver::new(BufferedLink::with_bytes(&bytes));

        assert!(rx.poll().unwrap().is_some());
        // Second poll sees only the 5-byte tail and leaves it alone
        assert!(rx.poll().unwrap().is_none());
        assert_eq!(rx.link.reads, 1);
        assert_eq!(rx.link.rx.len(), 5);
    }

    #[test]
    fn test_stop_flag_terminates_run() {
        let rx = TelemetryReceiver::new(BufferedLink::with_bytes(&[]));
        let stop = Arc::new(AtomicBool::new(false));

        let handle = {
            let stop = Arc::clone(&stop);
            thread::spawn(move || rx.run(stop, Duration::from_millis(1)))
        };

        stop.store(true, Ordering::Relaxed);
        // join() hanging here would mean the loop ignored the flag
        handle.join().unwrap();
    }
}
