//! `embedded-hal` backends for the [`Gpio`] and [`ServoBus`] primitives.
//!
//! Board support code registers each concrete pin or PWM channel under the
//! pin number used in the car configuration. Writes to a pin that was never
//! registered, and errors reported by the HAL, are logged and dropped.

use embedded_hal::{digital::OutputPin, pwm::SetDutyCycle};
use heapless::Vec;

use super::{Gpio, Level, PinId, ServoBus};

/// Maximum number of digital outputs a [`HalGpio`] can hold.
pub const MAX_OUTPUTS: usize = 8;
/// Maximum number of PWM channels a single adapter can hold.
pub const MAX_CHANNELS: usize = 4;

/// Servo refresh period at 50 Hz (µs).
pub const SERVO_PERIOD_US: u16 = 20_000;
/// Pulse width commanding 0° (µs).
pub const SERVO_MIN_PULSE_US: u16 = 544;
/// Pulse width commanding 180° (µs).
pub const SERVO_MAX_PULSE_US: u16 = 2_400;

/// Errors raised while forwarding a write to the underlying HAL.
#[derive(Debug)]
pub enum HalError<E: core::fmt::Debug> {
    /// The pin or channel returned an error.
    Pin(E),
    /// No pin or channel is registered under this number.
    UnknownPin(PinId),
    /// The servo on this pin was written before `attach`.
    Detached(PinId),
}

/// [`Gpio`] over `embedded-hal` output pins and PWM channels.
pub struct HalGpio<O, P> {
    outputs: Vec<(PinId, O), MAX_OUTPUTS>,
    channels: Vec<(PinId, P), MAX_CHANNELS>,
}

impl<O, P> Default for HalGpio<O, P> {
    fn default() -> Self {
        Self {
            outputs: Vec::new(),
            channels: Vec::new(),
        }
    }
}

impl<O, P> HalGpio<O, P>
where
    O: OutputPin,
    P: SetDutyCycle,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a digital output under `pin`.
    pub fn with_output(
        mut self,
        pin: PinId,
        output: O,
    ) -> Self {
        if self.outputs.push((pin, output)).is_err() {
            tracing::warn!(pin, "digital output table full, pin not registered");
        }
        self
    }

    /// Register a PWM channel under `pin`.
    pub fn with_pwm(
        mut self,
        pin: PinId,
        channel: P,
    ) -> Self {
        if self.channels.push((pin, channel)).is_err() {
            tracing::warn!(pin, "PWM channel table full, pin not registered");
        }
        self
    }

    /// Release the registered pins, e.g. to call `done()` on mocks.
    pub fn release(self) -> (Vec<(PinId, O), MAX_OUTPUTS>, Vec<(PinId, P), MAX_CHANNELS>) {
        (self.outputs, self.channels)
    }

    fn try_write_digital(
        &mut self,
        pin: PinId,
        level: Level,
    ) -> Result<(), HalError<O::Error>> {
        let (_, output) = self
            .outputs
            .iter_mut()
            .find(|(id, _)| *id == pin)
            .ok_or(HalError::UnknownPin(pin))?;
        let result = match level {
            Level::High => output.set_high(),
            Level::Low => output.set_low(),
        };
        result.map_err(HalError::Pin)
    }

    fn try_write_analog(
        &mut self,
        pin: PinId,
        duty: u8,
    ) -> Result<(), HalError<P::Error>> {
        let (_, channel) = self
            .channels
            .iter_mut()
            .find(|(id, _)| *id == pin)
            .ok_or(HalError::UnknownPin(pin))?;
        channel
            .set_duty_cycle_fraction(duty as u16, u8::MAX as u16)
            .map_err(HalError::Pin)
    }
}

impl<O, P> Gpio for HalGpio<O, P>
where
    O: OutputPin,
    P: SetDutyCycle,
{
    fn configure_output(
        &mut self,
        pin: PinId,
    ) {
        // embedded-hal outputs are configured by type; only check the wiring.
        let known = self.outputs.iter().any(|(id, _)| *id == pin)
            || self.channels.iter().any(|(id, _)| *id == pin);
        if !known {
            tracing::warn!(pin, "configured pin has no registered output");
        }
    }

    fn write_digital(
        &mut self,
        pin: PinId,
        level: Level,
    ) {
        if let Err(e) = self.try_write_digital(pin, level) {
            tracing::warn!(?e, pin, ?level, "digital write failed");
        }
    }

    fn write_analog(
        &mut self,
        pin: PinId,
        duty: u8,
    ) {
        if let Err(e) = self.try_write_analog(pin, duty) {
            tracing::warn!(?e, pin, duty, "PWM write failed");
        }
    }
}

/// [`ServoBus`] over `embedded-hal` PWM channels running at 50 Hz.
pub struct HalServos<P> {
    channels: Vec<(PinId, P, bool), MAX_CHANNELS>,
}

impl<P> Default for HalServos<P> {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
        }
    }
}

impl<P: SetDutyCycle> HalServos<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a 50 Hz PWM channel under `pin`.
    pub fn with_channel(
        mut self,
        pin: PinId,
        channel: P,
    ) -> Self {
        if self.channels.push((pin, channel, false)).is_err() {
            tracing::warn!(pin, "servo channel table full, pin not registered");
        }
        self
    }

    /// Release the registered channels.
    pub fn release(self) -> Vec<(PinId, P, bool), MAX_CHANNELS> {
        self.channels
    }

    /// Pulse width in µs for an angle in degrees, clamped to 0..=180.
    pub fn pulse_width_us(angle: u8) -> u16 {
        let angle = angle.min(180) as u32;
        let span = (SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US) as u32;
        SERVO_MIN_PULSE_US + (angle * span / 180) as u16
    }

    fn try_write(
        &mut self,
        pin: PinId,
        angle: u8,
    ) -> Result<(), HalError<P::Error>> {
        let (_, channel, attached) = self
            .channels
            .iter_mut()
            .find(|(id, _, _)| *id == pin)
            .ok_or(HalError::UnknownPin(pin))?;
        if !*attached {
            return Err(HalError::Detached(pin));
        }
        channel
            .set_duty_cycle_fraction(Self::pulse_width_us(angle), SERVO_PERIOD_US)
            .map_err(HalError::Pin)
    }
}

impl<P: SetDutyCycle> ServoBus for HalServos<P> {
    fn attach(
        &mut self,
        pin: PinId,
    ) {
        match self.channels.iter_mut().find(|(id, _, _)| *id == pin) {
            Some((_, _, attached)) => *attached = true,
            None => tracing::warn!(pin, "servo attach on unregistered pin"),
        }
    }

    fn write(
        &mut self,
        pin: PinId,
        angle: u8,
    ) {
        if let Err(e) = self.try_write(pin, angle) {
            tracing::warn!(?e, pin, angle, "servo write failed");
        }
    }
}
