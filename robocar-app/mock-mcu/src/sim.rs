//! Simulated transport and pin backends for running the car on a host.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use robocar_core::utils::{
    connection::{ConnectionEvent, DeviceClass, GamepadState, InputDevice, MouseState, Transport},
    hal::{Gpio, Level, PinId, ServoBus},
};
use tracing::info;

struct SimState {
    index: usize,
    class: DeviceClass,
    connected: bool,
    fresh: bool,
    pad: GamepadState,
    mouse: MouseState,
}

/// Shared handle to a simulated device; equal when it is the same device.
#[derive(Clone)]
pub struct SimDevice(Rc<RefCell<SimState>>);

impl SimDevice {
    fn new(
        index: usize,
        class: DeviceClass,
    ) -> Self {
        Self(Rc::new(RefCell::new(SimState {
            index,
            class,
            connected: true,
            fresh: false,
            pad: GamepadState::default(),
            mouse: MouseState::default(),
        })))
    }
}

impl PartialEq for SimDevice {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl InputDevice for SimDevice {
    fn index(&self) -> usize {
        self.0.borrow().index
    }

    fn is_connected(&self) -> bool {
        self.0.borrow().connected
    }

    fn has_data(&self) -> bool {
        self.0.borrow().fresh
    }

    fn is_gamepad(&self) -> bool {
        self.0.borrow().class == DeviceClass::Gamepad
    }

    fn is_mouse(&self) -> bool {
        self.0.borrow().class == DeviceClass::Mouse
    }

    fn is_keyboard(&self) -> bool {
        self.0.borrow().class == DeviceClass::Keyboard
    }

    fn is_balance_board(&self) -> bool {
        self.0.borrow().class == DeviceClass::BalanceBoard
    }

    fn gamepad(&self) -> Option<GamepadState> {
        let state = self.0.borrow();
        (state.class == DeviceClass::Gamepad).then_some(state.pad)
    }

    fn mouse(&self) -> Option<MouseState> {
        let state = self.0.borrow();
        (state.class == DeviceClass::Mouse).then_some(state.mouse)
    }
}

/// Scripted transport: a gamepad joins on the first cycle, a mouse on the
/// second, and the mouse leaves three cycles before the end (cycle 3 at the
/// earliest).
///
/// The gamepad's triggers ramp forward for 20 cycles, then brake for 20,
/// while the left stick sweeps across its range.
pub struct SimTransport {
    cycle: u32,
    cycles: u32,
    gamepad: SimDevice,
    mouse: SimDevice,
    events: VecDeque<ConnectionEvent<SimDevice>>,
}

impl SimTransport {
    pub fn new(cycles: u32) -> Self {
        Self {
            cycle: 0,
            cycles,
            gamepad: SimDevice::new(0, DeviceClass::Gamepad),
            mouse: SimDevice::new(1, DeviceClass::Mouse),
            events: VecDeque::new(),
        }
    }

    /// Three cycles before the end, but never before the mouse has joined.
    fn mouse_leaves_at(&self) -> u32 {
        self.cycles.saturating_sub(3).max(3)
    }

    fn script_gamepad(&self) {
        let mut state = self.gamepad.0.borrow_mut();
        let t = (self.cycle % 40) as i32;
        let (throttle, brake) = if t < 20 {
            (t * 1023 / 19, 0)
        } else {
            (0, (t - 20) * 1023 / 19)
        };
        state.pad.throttle = throttle;
        state.pad.brake = brake;
        state.pad.axis_x = (self.cycle.wrapping_mul(37) % 1024) as i32 - 511;
        state.fresh = true;
    }
}

impl Transport for SimTransport {
    type Device = SimDevice;

    fn update(&mut self) -> bool {
        self.cycle = self.cycle.wrapping_add(1);
        self.gamepad.0.borrow_mut().fresh = false;
        self.mouse.0.borrow_mut().fresh = false;

        match self.cycle {
            1 => self
                .events
                .push_back(ConnectionEvent::Connected(self.gamepad.clone())),
            2 => self
                .events
                .push_back(ConnectionEvent::Connected(self.mouse.clone())),
            _ => {}
        }
        if self.cycle == self.mouse_leaves_at() {
            self.mouse.0.borrow_mut().connected = false;
            self.events
                .push_back(ConnectionEvent::Disconnected(self.mouse.clone()));
        }

        self.script_gamepad();
        if self.cycle % 5 == 0 {
            let mut mouse = self.mouse.0.borrow_mut();
            let step = (self.cycle % 7) as i32;
            mouse.mouse.delta_x = step - 3;
            mouse.mouse.delta_y = 3 - step;
            mouse.fresh = mouse.connected;
        }
        true
    }

    fn next_event(&mut self) -> Option<ConnectionEvent<SimDevice>> {
        self.events.pop_front()
    }

    fn firmware_version(&self) -> Option<&str> {
        Some("mock-mcu sim")
    }

    fn local_address(&self) -> Option<[u8; 6]> {
        Some([0x02, 0x00, 0x00, 0xCA, 0xFE, 0x01])
    }
}

/// GPIO backend that logs every write.
#[derive(Default)]
pub struct LogGpio;

impl Gpio for LogGpio {
    fn configure_output(
        &mut self,
        pin: PinId,
    ) {
        info!("GPIO{} configured as output", pin);
    }

    fn write_digital(
        &mut self,
        pin: PinId,
        level: Level,
    ) {
        info!("GPIO{} <- {:?}", pin, level);
    }

    fn write_analog(
        &mut self,
        pin: PinId,
        duty: u8,
    ) {
        info!("GPIO{} <- duty {}", pin, duty);
    }
}

/// Servo backend that logs every command.
#[derive(Default)]
pub struct LogServos;

impl ServoBus for LogServos {
    fn attach(
        &mut self,
        pin: PinId,
    ) {
        info!("servo attached on GPIO{}", pin);
    }

    fn write(
        &mut self,
        pin: PinId,
        angle: u8,
    ) {
        info!("servo GPIO{} <- {} deg", pin, angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run `cycles` updates and record (cycle, connected, device index).
    fn script(cycles: u32) -> Vec<(u32, bool, usize)> {
        let mut transport = SimTransport::new(cycles);
        let mut seen = Vec::new();
        for cycle in 1..=cycles {
            transport.update();
            while let Some(event) = transport.next_event() {
                match event {
                    ConnectionEvent::Connected(dev) => seen.push((cycle, true, dev.index())),
                    ConnectionEvent::Disconnected(dev) => seen.push((cycle, false, dev.index())),
                }
            }
        }
        seen
    }

    #[test]
    fn mouse_leaves_three_cycles_before_the_end() {
        assert_eq!(
            script(40),
            vec![(1, true, 0), (2, true, 1), (37, false, 1)]
        );
    }

    #[test]
    fn short_runs_still_disconnect_the_mouse() {
        for cycles in 3..=6 {
            let events = script(cycles);
            assert_eq!(events.len(), 3, "cycles = {}", cycles);
            assert_eq!(events[2], (3, false, 1), "cycles = {}", cycles);
        }
    }

    #[test]
    fn stick_sweep_survives_long_runs() {
        let mut transport = SimTransport::new(u32::MAX);
        transport.cycle = u32::MAX - 1;
        transport.update();
        transport.update();
        let pad = transport.gamepad.gamepad().unwrap_or_default();
        assert!((-511..=512).contains(&pad.axis_x));
    }
}
