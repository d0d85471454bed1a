//! Pin-level hardware primitives used by the drive and steering controllers.
//!
//! The controllers address hardware by pin number, the way the board wiring
//! is described in [`CarConfig`](crate::utils::config::CarConfig). Two traits
//! cover everything the core writes:
//!
//! - [`Gpio`]: output configuration, digital levels and 8-bit PWM duty.
//! - [`ServoBus`]: servo attachment and angle commands.
//!
//! Several strategies and servos share one backend through a `&RefCell<_>`,
//! so neither trait method returns an error. Backends report faults through
//! `tracing` and carry on.
//!
//! - `adapters`: implementations over `embedded-hal` pins and PWM channels.

pub mod adapters;

pub use adapters::{HalError, HalGpio, HalServos};

/// Board pin identifier.
pub type PinId = u8;

/// Logic level of a digital output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Digital and PWM output primitive.
pub trait Gpio {
    /// Put `pin` into output mode.
    fn configure_output(
        &mut self,
        pin: PinId,
    );

    /// Drive `pin` to the given logic level.
    fn write_digital(
        &mut self,
        pin: PinId,
        level: Level,
    );

    /// Set the PWM duty of `pin`, 0 (off) to 255 (fully on).
    fn write_analog(
        &mut self,
        pin: PinId,
        duty: u8,
    );
}

/// Servo-pulse primitive.
pub trait ServoBus {
    /// Start generating servo pulses on `pin`.
    fn attach(
        &mut self,
        pin: PinId,
    );

    /// Command the servo on `pin` to `angle` degrees (0..=180).
    fn write(
        &mut self,
        pin: PinId,
        angle: u8,
    );
}
