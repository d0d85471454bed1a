//! Control core for a gamepad-driven RC car on no-std embedded platforms.
//!
//! For a runnable host simulation, see `robocar-app/mock-mcu`.
#![no_std]

pub mod utils;
