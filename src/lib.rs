// Proteus serial heartbeat runtime
//
// Keeps a Proteus-style motor controller alive over a serial link: a fixed
// motor command goes out at 10 Hz (the MCU's safety watchdog requires it)
// and fixed-width telemetry frames are polled, decoded, and logged.

pub mod config;
pub mod heartbeat;
pub mod motor;
pub mod runtime;
pub mod telemetry;
