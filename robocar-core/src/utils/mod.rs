//! Utility re-exports for the RoboCar control core.
//!
//! This module re-exports the components an embedding control loop wires
//! together:
//!
//! - `config`: pin assignment and tuning parameters
//! - `hal`: pin-level GPIO/PWM and servo primitives plus `embedded-hal` adapters
//! - `controllers`: drive strategies, motors, steering and the car assembly
//! - `connection`: input devices, transport trait and the dispatcher
//! - `math`: gamepad-to-car command mapping

pub mod config;
pub mod connection;
pub mod controllers;
pub mod hal;
pub mod math;

pub use config::{CarConfig, MotorPins, Settings};
pub use connection::Dispatcher;
pub use controllers::{CarCommand, CarHardware, CommandQueue, RoboCar};
pub use math::Teleop;
