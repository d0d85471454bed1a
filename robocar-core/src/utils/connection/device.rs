//! Input devices as seen through the wireless transport.
//!
//! The transport owns the devices; the core only holds the handles it is
//! given and reads their state through [`InputDevice`].

use serde::{Deserialize, Serialize};

/// Functional category of an input device, in classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Gamepad,
    Mouse,
    Keyboard,
    BalanceBoard,
}

/// Number of [`DeviceClass`] variants.
pub const CLASS_COUNT: usize = 4;

impl DeviceClass {
    /// Every class, in the order capabilities are checked.
    pub const ALL: [DeviceClass; CLASS_COUNT] = [
        DeviceClass::Gamepad,
        DeviceClass::Mouse,
        DeviceClass::Keyboard,
        DeviceClass::BalanceBoard,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Snapshot of a gamepad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamepadState {
    pub dpad: u8,
    /// Bitmask of pressed face/shoulder buttons.
    pub buttons: u16,
    /// Left stick, -511..=512.
    pub axis_x: i32,
    pub axis_y: i32,
    /// Right stick, -511..=512.
    pub axis_rx: i32,
    pub axis_ry: i32,
    /// Analog triggers, 0..=1023.
    pub brake: i32,
    pub throttle: i32,
    /// Bitmask of system/select/start buttons.
    pub misc_buttons: u16,
    pub gyro: [i32; 3],
    pub accel: [i32; 3],
}

/// Snapshot of a mouse or touchpad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseState {
    pub buttons: u16,
    pub scroll_wheel: i32,
    pub delta_x: i32,
    pub delta_y: i32,
}

/// Set of pressed keys, indexed by HID usage id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardState {
    pressed: [u32; 8],
}

impl KeyboardState {
    pub fn press(
        &mut self,
        key: u8,
    ) {
        self.pressed[(key / 32) as usize] |= 1 << (key % 32);
    }

    pub fn release(
        &mut self,
        key: u8,
    ) {
        self.pressed[(key / 32) as usize] &= !(1 << (key % 32));
    }

    pub fn is_pressed(
        &self,
        key: u8,
    ) -> bool {
        self.pressed[(key / 32) as usize] & (1 << (key % 32)) != 0
    }
}

/// Snapshot of a balance board's load cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceBoardState {
    pub top_left: u16,
    pub top_right: u16,
    pub bottom_left: u16,
    pub bottom_right: u16,
    /// Used by the board to compensate the load-cell readings.
    pub temperature: i32,
}

/// Handle to a device tracked by the transport.
///
/// Handles are compared with `PartialEq` to find a device's slot, so equal
/// handles must refer to the same physical device.
pub trait InputDevice {
    /// Transport-side index of the device.
    fn index(&self) -> usize;
    fn is_connected(&self) -> bool;
    /// New data arrived since the last read.
    fn has_data(&self) -> bool;

    fn is_gamepad(&self) -> bool;
    fn is_mouse(&self) -> bool;
    fn is_keyboard(&self) -> bool;
    fn is_balance_board(&self) -> bool;

    fn gamepad(&self) -> Option<GamepadState> {
        None
    }

    fn mouse(&self) -> Option<MouseState> {
        None
    }

    fn keyboard(&self) -> Option<KeyboardState> {
        None
    }

    fn balance_board(&self) -> Option<BalanceBoardState> {
        None
    }

    /// First capability the device reports, checked in [`DeviceClass::ALL`]
    /// order.
    fn class(&self) -> Option<DeviceClass> {
        DeviceClass::ALL.into_iter().find(|class| match class {
            DeviceClass::Gamepad => self.is_gamepad(),
            DeviceClass::Mouse => self.is_mouse(),
            DeviceClass::Keyboard => self.is_keyboard(),
            DeviceClass::BalanceBoard => self.is_balance_board(),
        })
    }
}

/// Connection change reported by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent<D> {
    Connected(D),
    Disconnected(D),
}

/// Wireless input transport.
///
/// `update` is called once per control cycle; connection changes seen during
/// the update are then drained with `next_event`.
pub trait Transport {
    type Device: InputDevice + PartialEq;

    /// Fetch new data; `true` if any device produced some.
    fn update(&mut self) -> bool;

    fn next_event(&mut self) -> Option<ConnectionEvent<Self::Device>>;

    fn firmware_version(&self) -> Option<&str> {
        None
    }

    /// Local Bluetooth device address.
    fn local_address(&self) -> Option<[u8; 6]> {
        None
    }
}
