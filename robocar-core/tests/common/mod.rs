#![allow(dead_code)]

use std::collections::VecDeque;

use robocar_core::utils::{
    connection::{
        BalanceBoardState, ConnectionEvent, DeviceClass, GamepadState, InputDevice, KeyboardState,
        MouseState, Transport,
    },
    hal::{Gpio, Level, PinId, ServoBus},
};

/// One pin-level call seen by a [`Recorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Configure(PinId),
    Digital(PinId, Level),
    Analog(PinId, u8),
    Attach(PinId),
    Servo(PinId, u8),
}

/// Pin backend that records every call in order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub ops: Vec<Op>,
}

impl Recorder {
    /// Take the recorded calls, leaving the log empty.
    pub fn take(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }

    /// Last digital level written to `pin`.
    pub fn level(
        &self,
        pin: PinId,
    ) -> Option<Level> {
        self.ops.iter().rev().find_map(|op| match *op {
            Op::Digital(p, level) if p == pin => Some(level),
            _ => None,
        })
    }

    /// Last PWM duty written to `pin`.
    pub fn duty(
        &self,
        pin: PinId,
    ) -> Option<u8> {
        self.ops.iter().rev().find_map(|op| match *op {
            Op::Analog(p, duty) if p == pin => Some(duty),
            _ => None,
        })
    }

    /// Every servo angle written, in order.
    pub fn servo_writes(&self) -> Vec<(PinId, u8)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                Op::Servo(pin, angle) => Some((pin, angle)),
                _ => None,
            })
            .collect()
    }
}

impl Gpio for Recorder {
    fn configure_output(
        &mut self,
        pin: PinId,
    ) {
        self.ops.push(Op::Configure(pin));
    }

    fn write_digital(
        &mut self,
        pin: PinId,
        level: Level,
    ) {
        self.ops.push(Op::Digital(pin, level));
    }

    fn write_analog(
        &mut self,
        pin: PinId,
        duty: u8,
    ) {
        self.ops.push(Op::Analog(pin, duty));
    }
}

impl ServoBus for Recorder {
    fn attach(
        &mut self,
        pin: PinId,
    ) {
        self.ops.push(Op::Attach(pin));
    }

    fn write(
        &mut self,
        pin: PinId,
        angle: u8,
    ) {
        self.ops.push(Op::Servo(pin, angle));
    }
}

/// Input device handle identified by `id`.
#[derive(Debug, Clone)]
pub struct FakeDevice {
    pub id: u32,
    pub class: Option<DeviceClass>,
    pub connected: bool,
    pub data: bool,
    pub pad: GamepadState,
    pub mouse: MouseState,
    pub keys: KeyboardState,
    pub board: BalanceBoardState,
}

impl FakeDevice {
    pub fn new(
        id: u32,
        class: Option<DeviceClass>,
    ) -> Self {
        Self {
            id,
            class,
            connected: true,
            data: true,
            pad: GamepadState::default(),
            mouse: MouseState::default(),
            keys: KeyboardState::default(),
            board: BalanceBoardState::default(),
        }
    }

    pub fn new_gamepad(id: u32) -> Self {
        Self::new(id, Some(DeviceClass::Gamepad))
    }
}

impl PartialEq for FakeDevice {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.id == other.id
    }
}

impl InputDevice for FakeDevice {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn has_data(&self) -> bool {
        self.data
    }

    fn is_gamepad(&self) -> bool {
        self.class == Some(DeviceClass::Gamepad)
    }

    fn is_mouse(&self) -> bool {
        self.class == Some(DeviceClass::Mouse)
    }

    fn is_keyboard(&self) -> bool {
        self.class == Some(DeviceClass::Keyboard)
    }

    fn is_balance_board(&self) -> bool {
        self.class == Some(DeviceClass::BalanceBoard)
    }

    fn gamepad(&self) -> Option<GamepadState> {
        self.is_gamepad().then_some(self.pad)
    }

    fn mouse(&self) -> Option<MouseState> {
        self.is_mouse().then_some(self.mouse)
    }

    fn keyboard(&self) -> Option<KeyboardState> {
        self.is_keyboard().then_some(self.keys)
    }

    fn balance_board(&self) -> Option<BalanceBoardState> {
        self.is_balance_board().then_some(self.board)
    }
}

/// Transport replaying queued connection events.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    pub events: VecDeque<ConnectionEvent<FakeDevice>>,
    pub data: bool,
    pub updates: usize,
}

impl Transport for ScriptedTransport {
    type Device = FakeDevice;

    fn update(&mut self) -> bool {
        self.updates += 1;
        self.data
    }

    fn next_event(&mut self) -> Option<ConnectionEvent<FakeDevice>> {
        self.events.pop_front()
    }

    fn firmware_version(&self) -> Option<&str> {
        Some("scripted 1.0")
    }
}
