//! H-bridge drive strategies and the per-motor controller.
//!
//! A [`MotorController`] owns one motor's [`MotorPins`] and forwards speed
//! commands to whichever [`DriveStrategy`] is currently selected. The
//! strategies are owned elsewhere (see [`CarHardware`](super::CarHardware))
//! and only borrowed here, so switching direction is a pointer swap.
//!
//! Pin patterns written by the strategies:
//!
//! | call             | EN      | A    | B    |
//! |------------------|---------|------|------|
//! | forward `drive`  | `speed` | HIGH | LOW  |
//! | reverse `drive`  | `speed` | LOW  | HIGH |
//! | `stop`           | kept    | LOW  | LOW  |
//!
//! `stop` lets the motor coast: the enable duty keeps its last value and only
//! the direction pins are released. A and B are never both HIGH.

use core::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::utils::{
    config::MotorPins,
    hal::{Gpio, Level},
};

/// Direction a strategy drives the motor in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Reverse,
}

/// Maps a speed command onto one motor's pins.
pub trait DriveStrategy {
    /// Direction this strategy drives in.
    fn direction(&self) -> Direction;

    /// Set the enable duty to `speed` (0..=255) and assert the direction pins.
    fn drive(
        &self,
        speed: u8,
    );

    /// Release both direction pins, leaving the enable duty untouched.
    fn stop(&self);
}

/// Pin writer shared by both strategy variants.
struct HBridge<'a, G> {
    pins: MotorPins,
    gpio: &'a RefCell<G>,
}

impl<G: Gpio> HBridge<'_, G> {
    fn drive(
        &self,
        speed: u8,
        a: Level,
        b: Level,
    ) {
        let mut gpio = self.gpio.borrow_mut();
        gpio.write_analog(self.pins.pin_en, speed);
        gpio.write_digital(self.pins.pin_a, a);
        gpio.write_digital(self.pins.pin_b, b);
    }

    fn release(&self) {
        let mut gpio = self.gpio.borrow_mut();
        gpio.write_digital(self.pins.pin_a, Level::Low);
        gpio.write_digital(self.pins.pin_b, Level::Low);
    }
}

/// Drives current A → B.
pub struct ForwardDrive<'a, G> {
    bridge: HBridge<'a, G>,
}

impl<'a, G: Gpio> ForwardDrive<'a, G> {
    pub fn new(
        pins: MotorPins,
        gpio: &'a RefCell<G>,
    ) -> Self {
        Self {
            bridge: HBridge { pins, gpio },
        }
    }

    pub fn pins(&self) -> MotorPins {
        self.bridge.pins
    }
}

impl<G: Gpio> DriveStrategy for ForwardDrive<'_, G> {
    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn drive(
        &self,
        speed: u8,
    ) {
        tracing::debug!(speed, pin_en = self.bridge.pins.pin_en, "driving forward");
        self.bridge.drive(speed, Level::High, Level::Low);
    }

    fn stop(&self) {
        tracing::debug!(pin_en = self.bridge.pins.pin_en, "stopping forward motion");
        self.bridge.release();
    }
}

/// Drives current B → A.
pub struct ReverseDrive<'a, G> {
    bridge: HBridge<'a, G>,
}

impl<'a, G: Gpio> ReverseDrive<'a, G> {
    pub fn new(
        pins: MotorPins,
        gpio: &'a RefCell<G>,
    ) -> Self {
        Self {
            bridge: HBridge { pins, gpio },
        }
    }

    pub fn pins(&self) -> MotorPins {
        self.bridge.pins
    }
}

impl<G: Gpio> DriveStrategy for ReverseDrive<'_, G> {
    fn direction(&self) -> Direction {
        Direction::Reverse
    }

    fn drive(
        &self,
        speed: u8,
    ) {
        tracing::debug!(speed, pin_en = self.bridge.pins.pin_en, "driving reverse");
        self.bridge.drive(speed, Level::Low, Level::High);
    }

    fn stop(&self) {
        tracing::debug!(pin_en = self.bridge.pins.pin_en, "stopping reverse motion");
        self.bridge.release();
    }
}

/// One motor with a swappable drive strategy.
///
/// Until [`set_strategy`](Self::set_strategy) is called the controller is
/// unarmed and [`execute`](Self::execute) / [`stop`](Self::stop) do nothing.
pub struct MotorController<'a> {
    pins: MotorPins,
    strategy: Option<&'a dyn DriveStrategy>,
}

impl<'a> MotorController<'a> {
    /// Configure the motor's three pins as outputs.
    pub fn new<G: Gpio>(
        pins: MotorPins,
        gpio: &RefCell<G>,
    ) -> Self {
        let mut gpio = gpio.borrow_mut();
        for pin in pins.all() {
            gpio.configure_output(pin);
        }
        Self {
            pins,
            strategy: None,
        }
    }

    pub fn pins(&self) -> MotorPins {
        self.pins
    }

    /// Replace the active strategy.
    ///
    /// The caller is expected to [`stop`](Self::stop) the motor around the
    /// switch; the strategy is not checked against this motor's pins.
    pub fn set_strategy(
        &mut self,
        strategy: &'a dyn DriveStrategy,
    ) {
        self.strategy = Some(strategy);
    }

    /// Direction of the active strategy, `None` while unarmed.
    pub fn direction(&self) -> Option<Direction> {
        self.strategy.map(|s| s.direction())
    }

    pub fn execute(
        &self,
        speed: u8,
    ) {
        match self.strategy {
            Some(strategy) => strategy.drive(speed),
            None => tracing::trace!(pin_en = self.pins.pin_en, "no strategy, drive ignored"),
        }
    }

    pub fn stop(&self) {
        match self.strategy {
            Some(strategy) => strategy.stop(),
            None => tracing::trace!(pin_en = self.pins.pin_en, "no strategy, stop ignored"),
        }
    }
}
