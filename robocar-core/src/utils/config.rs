//! Board wiring and tuning parameters.
//!
//! Everything here is plain data read once at startup. The defaults match the
//! reference ESP32 wiring; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::utils::hal::PinId;

/// Default capacity of the input device slot table.
pub const MAX_DEVICES: usize = 4;

/// Errors raised while loading [`Settings`].
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "invalid settings JSON: {}", e),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Direction and enable pins of one H-bridge channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorPins {
    pub pin_a: PinId,
    pub pin_b: PinId,
    pub pin_en: PinId,
}

impl MotorPins {
    pub const fn new(
        pin_a: PinId,
        pin_b: PinId,
        pin_en: PinId,
    ) -> Self {
        Self { pin_a, pin_b, pin_en }
    }

    /// All three pins, direction pins first.
    pub fn all(&self) -> [PinId; 3] {
        [self.pin_a, self.pin_b, self.pin_en]
    }
}

/// Pin assignment of the whole car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarConfig {
    pub front_motor: MotorPins,
    pub rear_motor: MotorPins,
    pub servo_front_pin: PinId,
    pub servo_rear_pin: PinId,
}

impl Default for CarConfig {
    fn default() -> Self {
        Self {
            front_motor: MotorPins::new(26, 27, 14),
            rear_motor: MotorPins::new(25, 33, 32),
            servo_front_pin: 13,
            servo_rear_pin: 12,
        }
    }
}

/// Gamepad-to-car mapping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleopConfig {
    /// Fraction of the stick range treated as centered (0.0..1.0).
    pub deadzone: f32,
    /// Servo angle for straight ahead (degrees).
    pub steering_center: u8,
    /// Servo travel either side of center at full stick (degrees).
    pub steering_range: u8,
    /// PWM duty at full throttle.
    pub max_speed: u8,
    /// Stick magnitude at full deflection.
    pub axis_full_scale: i32,
    /// Trigger value at full press.
    pub trigger_full_scale: i32,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.05,
            steering_center: 90,
            steering_range: 90,
            max_speed: 255,
            axis_full_scale: 512,
            trigger_full_scale: 1023,
        }
    }
}

/// Top-level settings document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub car: CarConfig,
    pub teleop: TeleopConfig,
    /// Delay inserted by the control loop between polls (ms).
    pub poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            car: CarConfig::default(),
            teleop: TeleopConfig::default(),
            poll_interval_ms: 150,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
