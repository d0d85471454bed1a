//! Module Exports
//!
//! This file exports the input side of the car: everything between the
//! wireless transport and the application handlers.
//!
//! # Modules
//! - `device`: device handles, typed readings and the transport trait.
//! - `dispatcher`: connection slots and per-class handler routing.
//! - `dump`: one-line diagnostic dumps of device readings.

pub mod device;
pub mod dispatcher;
pub mod dump;

pub use device::{
    BalanceBoardState, ConnectionEvent, DeviceClass, GamepadState, InputDevice, KeyboardState,
    MouseState, Transport,
};
pub use dispatcher::{Dispatcher, Handler};
