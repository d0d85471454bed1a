//! Steering servos and the angle fan-out that keeps them in step.

extern crate alloc;

use alloc::vec::Vec;
use core::cell::RefCell;

use crate::utils::hal::{PinId, ServoBus};

/// Largest commandable steering angle (degrees).
pub const MAX_ANGLE: u8 = 180;

/// Receives every angle broadcast by a [`SteeringController`].
pub trait SteeringObserver {
    /// Apply the commanded `angle` (0..=180 degrees) to this actuator.
    fn update(
        &self,
        angle: u8,
    );
}

/// Servo mounted the same way round as the commanded angle.
pub struct FrontSteeringServo<'a, S> {
    pin: PinId,
    servos: &'a RefCell<S>,
}

impl<'a, S: ServoBus> FrontSteeringServo<'a, S> {
    /// Attach the servo on `pin`.
    pub fn new(
        pin: PinId,
        servos: &'a RefCell<S>,
    ) -> Self {
        servos.borrow_mut().attach(pin);
        Self { pin, servos }
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }
}

impl<S: ServoBus> SteeringObserver for FrontSteeringServo<'_, S> {
    fn update(
        &self,
        angle: u8,
    ) {
        self.servos.borrow_mut().write(self.pin, angle);
        tracing::debug!(pin = self.pin, angle, "front steering");
    }
}

/// Servo mounted mirrored; commands `180 - angle`.
pub struct RearSteeringServo<'a, S> {
    pin: PinId,
    servos: &'a RefCell<S>,
}

impl<'a, S: ServoBus> RearSteeringServo<'a, S> {
    /// Attach the servo on `pin`.
    pub fn new(
        pin: PinId,
        servos: &'a RefCell<S>,
    ) -> Self {
        servos.borrow_mut().attach(pin);
        Self { pin, servos }
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Mirror `angle` about the center of the servo range.
    ///
    /// Angles past 180 are clamped first.
    pub fn invert(angle: u8) -> u8 {
        MAX_ANGLE - angle.min(MAX_ANGLE)
    }
}

impl<S: ServoBus> SteeringObserver for RearSteeringServo<'_, S> {
    fn update(
        &self,
        angle: u8,
    ) {
        let inverted = Self::invert(angle);
        self.servos.borrow_mut().write(self.pin, inverted);
        tracing::debug!(pin = self.pin, angle = inverted, "rear steering");
    }
}

/// Ordered set of steering observers sharing one commanded angle.
///
/// Observers are notified in attachment order. Attaching the same observer
/// twice notifies it twice.
#[derive(Default)]
pub struct SteeringController<'a> {
    observers: Vec<&'a dyn SteeringObserver>,
}

impl<'a> SteeringController<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(
        &mut self,
        observer: &'a dyn SteeringObserver,
    ) {
        self.observers.push(observer);
    }

    /// Remove the first attachment of `observer`.
    ///
    /// Returns `false` if it was not attached.
    pub fn detach(
        &mut self,
        observer: &dyn SteeringObserver,
    ) -> bool {
        let position = self
            .observers
            .iter()
            .position(|o| core::ptr::addr_eq(*o, observer));
        match position {
            Some(i) => {
                self.observers.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Broadcast `angle` to every attached observer.
    pub fn notify(
        &self,
        angle: u8,
    ) {
        for observer in &self.observers {
            observer.update(angle);
        }
    }
}
