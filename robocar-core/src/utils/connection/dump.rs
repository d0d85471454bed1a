//! One-line diagnostic dumps of a device's current reading.
//!
//! Handlers call these while bringing up new hardware; output goes to
//! `tracing` at debug level.

use core::fmt::Write;

use heapless::String;

use super::device::{InputDevice, KeyboardState};

/// HID usage of the first named key (`A`).
pub const FIRST_KEY: u8 = 0x04;
/// HID usage of the last named key (`UpArrow`).
pub const LAST_KEY: u8 = 0x52;
/// HID usage of the first modifier (`Left Control`).
pub const FIRST_MODIFIER: u8 = 0xE0;
/// HID usage of the last modifier (`Right Meta`).
pub const LAST_MODIFIER: u8 = 0xE7;

#[rustfmt::skip]
const KEY_NAMES: [&str; (LAST_KEY - FIRST_KEY + 1) as usize] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0",
    "Enter", "Escape", "Backspace", "Tab", "Spacebar", "Underscore", "Equal", "OpenBracket",
    "CloseBracket", "Backslash", "Tilde", "SemiColon", "Quote", "GraveAccent", "Comma", "Dot",
    "Slash", "CapsLock",
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
    "PrintScreen", "ScrollLock", "Pause", "Insert", "Home", "PageUp", "Delete", "End", "PageDown",
    "RightArrow", "LeftArrow", "DownArrow", "UpArrow",
];

const MODIFIER_NAMES: [&str; (LAST_MODIFIER - FIRST_MODIFIER + 1) as usize] = [
    "Left Control",
    "Left Shift",
    "Left Alt",
    "Left Meta",
    "Right Control",
    "Right Shift",
    "Right Alt",
    "Right Meta",
];

/// Name of a HID key usage, for the keys the dump knows about.
pub fn key_name(key: u8) -> Option<&'static str> {
    match key {
        FIRST_KEY..=LAST_KEY => Some(KEY_NAMES[(key - FIRST_KEY) as usize]),
        FIRST_MODIFIER..=LAST_MODIFIER => Some(MODIFIER_NAMES[(key - FIRST_MODIFIER) as usize]),
        _ => None,
    }
}

/// Names of the pressed keys, regular keys first, then modifiers.
pub fn pressed_keys(state: &KeyboardState) -> impl Iterator<Item = &'static str> + '_ {
    (FIRST_KEY..=LAST_KEY)
        .chain(FIRST_MODIFIER..=LAST_MODIFIER)
        .filter(move |key| state.is_pressed(*key))
        .filter_map(key_name)
}

/// Comma-terminated list of pressed key names, truncated at capacity.
pub fn keyboard_line(state: &KeyboardState) -> String<256> {
    let mut line = String::new();
    for name in pressed_keys(state) {
        if write!(line, "{},", name).is_err() {
            break;
        }
    }
    line
}

pub fn dump_gamepad<D: InputDevice>(dev: &D) {
    let Some(pad) = dev.gamepad() else {
        tracing::warn!(idx = dev.index(), "device has no gamepad reading");
        return;
    };
    tracing::debug!(
        "idx={}, dpad: 0x{:02x}, buttons: 0x{:04x}, axis L: {:4}, {:4}, axis R: {:4}, {:4}, \
         brake: {:4}, throttle: {:4}, misc: 0x{:02x}, gyro x:{:6} y:{:6} z:{:6}, \
         accel x:{:6} y:{:6} z:{:6}",
        dev.index(),
        pad.dpad,
        pad.buttons,
        pad.axis_x,
        pad.axis_y,
        pad.axis_rx,
        pad.axis_ry,
        pad.brake,
        pad.throttle,
        pad.misc_buttons,
        pad.gyro[0],
        pad.gyro[1],
        pad.gyro[2],
        pad.accel[0],
        pad.accel[1],
        pad.accel[2],
    );
}

pub fn dump_mouse<D: InputDevice>(dev: &D) {
    let Some(mouse) = dev.mouse() else {
        tracing::warn!(idx = dev.index(), "device has no mouse reading");
        return;
    };
    tracing::debug!(
        "idx={}, buttons: 0x{:04x}, scrollWheel=0x{:04x}, delta X: {:4}, delta Y: {:4}",
        dev.index(),
        mouse.buttons,
        mouse.scroll_wheel,
        mouse.delta_x,
        mouse.delta_y,
    );
}

pub fn dump_keyboard<D: InputDevice>(dev: &D) {
    let Some(keyboard) = dev.keyboard() else {
        tracing::warn!(idx = dev.index(), "device has no keyboard reading");
        return;
    };
    let line = keyboard_line(&keyboard);
    tracing::debug!("idx={}, Pressed keys: {}", dev.index(), line.as_str());
}

pub fn dump_balance_board<D: InputDevice>(dev: &D) {
    let Some(board) = dev.balance_board() else {
        tracing::warn!(idx = dev.index(), "device has no balance board reading");
        return;
    };
    tracing::debug!(
        "idx={}, TL={}, TR={}, BL={}, BR={}, temperature={}",
        dev.index(),
        board.top_left,
        board.top_right,
        board.bottom_left,
        board.bottom_right,
        board.temperature,
    );
}
