//! Module Exports
//!
//! This file exports the actuator side of the car and assembles it.
//!
//! - `motor`: H-bridge drive strategies and the per-motor controller.
//! - `steering`: steering servos and the angle fan-out.
//!
//! [`CarHardware`] owns every strategy and servo built from a
//! [`CarConfig`]; [`RoboCar`] borrows them and executes [`CarCommand`]s.

pub mod motor;
pub mod steering;

use core::cell::RefCell;

use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};
use serde::{Deserialize, Serialize};

pub use motor::{Direction, DriveStrategy, ForwardDrive, MotorController, ReverseDrive};
pub use steering::{
    FrontSteeringServo, RearSteeringServo, SteeringController, SteeringObserver, MAX_ANGLE,
};

use crate::utils::{
    config::{CarConfig, MotorPins},
    hal::{Gpio, ServoBus},
};

/// Default servo angle for straight ahead (degrees).
pub const STEERING_CENTER: u8 = 90;
/// Largest drive duty.
pub const MAX_SPEED: i16 = 255;
/// Depth of [`CommandQueue`].
pub const QUEUE_DEPTH: usize = 8;

/// Car-level command.
///
/// Serialized as JSON with tag `"cc"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "cc", rename_all = "snake_case")] // cc = car command
pub enum CarCommand {
    /// Drive both motors at signed speed `s`; negative reverses.
    Drive { s: i16 },
    /// Steer to angle `a` degrees.
    Steer { a: u8 },
    /// Steer straight ahead.
    Center,
    /// Release both motors.
    Stop,
}

/// Single-threaded queue between input handlers and the car.
pub type CommandQueue = Channel<NoopRawMutex, CarCommand, QUEUE_DEPTH>;

/// Queue `cmd`, dropping it with a warning if the queue is full.
pub fn enqueue(
    queue: &CommandQueue,
    cmd: CarCommand,
) -> bool {
    match queue.try_send(cmd) {
        Ok(()) => true,
        Err(_) => {
            tracing::warn!(?cmd, "command queue full, dropping command");
            false
        }
    }
}

/// Forward and reverse strategies for one motor.
pub struct MotorStrategies<'a, G> {
    pub forward: ForwardDrive<'a, G>,
    pub reverse: ReverseDrive<'a, G>,
}

impl<'a, G: Gpio> MotorStrategies<'a, G> {
    pub fn new(
        pins: MotorPins,
        gpio: &'a RefCell<G>,
    ) -> Self {
        Self {
            forward: ForwardDrive::new(pins, gpio),
            reverse: ReverseDrive::new(pins, gpio),
        }
    }

    pub fn get(
        &self,
        direction: Direction,
    ) -> &dyn DriveStrategy {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        }
    }
}

/// Owner of every strategy and servo the car uses.
///
/// Must outlive the [`RoboCar`] built from it.
pub struct CarHardware<'a, G, S> {
    config: CarConfig,
    gpio: &'a RefCell<G>,
    front: MotorStrategies<'a, G>,
    rear: MotorStrategies<'a, G>,
    front_servo: FrontSteeringServo<'a, S>,
    rear_servo: RearSteeringServo<'a, S>,
    steering_center: u8,
}

impl<'a, G, S> CarHardware<'a, G, S>
where
    G: Gpio,
    S: ServoBus,
{
    /// Build the strategies and attach both steering servos.
    pub fn new(
        config: CarConfig,
        gpio: &'a RefCell<G>,
        servos: &'a RefCell<S>,
    ) -> Self {
        tracing::info!(?config, "building car hardware");
        Self {
            config,
            gpio,
            front: MotorStrategies::new(config.front_motor, gpio),
            rear: MotorStrategies::new(config.rear_motor, gpio),
            front_servo: FrontSteeringServo::new(config.servo_front_pin, servos),
            rear_servo: RearSteeringServo::new(config.servo_rear_pin, servos),
            steering_center: STEERING_CENTER,
        }
    }

    /// Use `center` as the straight-ahead angle for [`CarCommand::Center`].
    ///
    /// Pass the same value as `TeleopConfig::steering_center` so a neutral
    /// stick and `Center` agree.
    pub fn with_steering_center(
        mut self,
        center: u8,
    ) -> Self {
        self.steering_center = center.min(MAX_ANGLE);
        self
    }

    pub fn config(&self) -> &CarConfig {
        &self.config
    }

    pub fn steering_center(&self) -> u8 {
        self.steering_center
    }
}

/// Front and rear motors plus steering, driven by [`CarCommand`]s.
pub struct RoboCar<'a> {
    front: MotorController<'a>,
    rear: MotorController<'a>,
    steering: SteeringController<'a>,
    front_strategies: [&'a dyn DriveStrategy; 2],
    rear_strategies: [&'a dyn DriveStrategy; 2],
    speed: i16,
    angle: Option<u8>,
    center: u8,
}

impl<'a> RoboCar<'a> {
    /// Configure both motors' pins and attach front then rear steering.
    ///
    /// The motors start unarmed; the first `Drive` command selects a strategy.
    pub fn new<G, S>(hw: &'a CarHardware<'a, G, S>) -> Self
    where
        G: Gpio,
        S: ServoBus,
    {
        let mut steering = SteeringController::new();
        steering.attach(&hw.front_servo);
        steering.attach(&hw.rear_servo);

        Self {
            front: MotorController::new(hw.config.front_motor, hw.gpio),
            rear: MotorController::new(hw.config.rear_motor, hw.gpio),
            steering,
            front_strategies: [
                hw.front.get(Direction::Forward),
                hw.front.get(Direction::Reverse),
            ],
            rear_strategies: [
                hw.rear.get(Direction::Forward),
                hw.rear.get(Direction::Reverse),
            ],
            speed: 0,
            angle: None,
            center: hw.steering_center,
        }
    }

    pub fn front(&self) -> &MotorController<'a> {
        &self.front
    }

    pub fn rear(&self) -> &MotorController<'a> {
        &self.rear
    }

    pub fn steering(&self) -> &SteeringController<'a> {
        &self.steering
    }

    pub fn steering_mut(&mut self) -> &mut SteeringController<'a> {
        &mut self.steering
    }

    /// Last commanded signed speed, 0 after a stop.
    pub fn speed(&self) -> i16 {
        self.speed
    }

    /// Last commanded steering angle.
    pub fn angle(&self) -> Option<u8> {
        self.angle
    }

    pub fn execute(
        &mut self,
        cmd: CarCommand,
    ) {
        match cmd {
            CarCommand::Drive { s } => self.drive(s),
            CarCommand::Steer { a } => self.steer(a),
            CarCommand::Center => self.steer(self.center),
            CarCommand::Stop => self.stop(),
        }
    }

    /// Apply every queued command; returns how many were applied.
    pub fn drain(
        &mut self,
        queue: &CommandQueue,
    ) -> usize {
        let mut applied = 0;
        while let Ok(cmd) = queue.try_receive() {
            self.execute(cmd);
            applied += 1;
        }
        applied
    }

    fn drive(
        &mut self,
        speed: i16,
    ) {
        let speed = speed.clamp(-MAX_SPEED, MAX_SPEED);
        if speed == 0 {
            self.stop();
            return;
        }
        let direction = if speed > 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        self.select(direction);

        let duty = speed.unsigned_abs() as u8;
        self.front.execute(duty);
        self.rear.execute(duty);
        self.speed = speed;
    }

    /// Switch both motors to `direction`, stopping them first if they were
    /// driving the other way.
    fn select(
        &mut self,
        direction: Direction,
    ) {
        if self.front.direction() == Some(direction) && self.rear.direction() == Some(direction) {
            return;
        }
        self.stop();

        let index = match direction {
            Direction::Forward => 0,
            Direction::Reverse => 1,
        };
        self.front.set_strategy(self.front_strategies[index]);
        self.rear.set_strategy(self.rear_strategies[index]);
        tracing::info!(?direction, "drive strategy selected");
    }

    fn steer(
        &mut self,
        angle: u8,
    ) {
        let angle = angle.min(MAX_ANGLE);
        self.steering.notify(angle);
        self.angle = Some(angle);
    }

    fn stop(&mut self) {
        self.front.stop();
        self.rear.stop();
        self.speed = 0;
    }
}
