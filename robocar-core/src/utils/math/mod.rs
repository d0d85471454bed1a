//! Math utilities for the RoboCar.
//!
//! This module provides the mapping from gamepad readings to drive and
//! steering commands.

pub mod teleop;

pub use teleop::Teleop;
