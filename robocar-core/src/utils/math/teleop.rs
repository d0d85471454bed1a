//! Gamepad-to-car mapping.
//!
//! Triggers set the signed drive speed (throttle forward, brake reverse) and
//! the left stick's X axis sets the steering angle around center.
//!
//! # Example
//! ```rust
//! use robocar_core::utils::{config::TeleopConfig, connection::GamepadState, math::Teleop};
//! let teleop = Teleop::new(TeleopConfig::default());
//! let pad = GamepadState { throttle: 1023, axis_x: 512, ..Default::default() };
//! assert_eq!(teleop.drive_speed(&pad), 255);
//! assert_eq!(teleop.steering_angle(&pad), 180);
//! ```

use crate::utils::{
    config::TeleopConfig,
    connection::GamepadState,
    controllers::{CarCommand, MAX_ANGLE},
};

/// Converts gamepad readings into [`CarCommand`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Teleop {
    config: TeleopConfig,
}

impl Teleop {
    pub fn new(config: TeleopConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TeleopConfig {
        &self.config
    }

    /// Throttle minus brake, scaled to `±max_speed`.
    pub fn drive_speed(
        &self,
        pad: &GamepadState,
    ) -> i16 {
        let full = self.config.trigger_full_scale.max(1);
        let throttle = pad.throttle.clamp(0, full);
        let brake = pad.brake.clamp(0, full);
        let net = (throttle - brake) as f32 / full as f32;
        libm::roundf(net * self.config.max_speed as f32) as i16
    }

    /// Left stick X mapped around `steering_center`, 0..=180.
    ///
    /// Deflections inside the deadzone return the center angle.
    pub fn steering_angle(
        &self,
        pad: &GamepadState,
    ) -> u8 {
        let center = self.config.steering_center.min(MAX_ANGLE);
        let full = self.config.axis_full_scale.max(1) as f32;
        let x = (pad.axis_x as f32 / full).clamp(-1.0, 1.0);
        if libm::fabsf(x) < self.config.deadzone {
            return center;
        }
        let angle = center as f32 + x * self.config.steering_range as f32;
        libm::roundf(angle).clamp(0.0, MAX_ANGLE as f32) as u8
    }

    /// Drive then steer commands for one gamepad reading.
    pub fn map_gamepad(
        &self,
        pad: &GamepadState,
    ) -> [CarCommand; 2] {
        [
            CarCommand::Drive {
                s: self.drive_speed(pad),
            },
            CarCommand::Steer {
                a: self.steering_angle(pad),
            },
        ]
    }
}
