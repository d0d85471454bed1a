//! Input dispatcher: connection slots and per-class handler routing.
//!
//! A [`Dispatcher`] is created once at startup and driven by the control
//! loop. Each cycle it updates the [`Transport`], moves connected and
//! disconnected devices in and out of a fixed slot table, and hands every
//! device with fresh data to the handler registered for its class.
//!
//! None of the anomalies here are errors. A full table, an unknown device or
//! an unsupported class is logged and skipped; a class without a handler is
//! skipped silently.

extern crate alloc;

use alloc::boxed::Box;

use super::device::{ConnectionEvent, DeviceClass, InputDevice, Transport, CLASS_COUNT};
use crate::utils::config::MAX_DEVICES;

/// Callback invoked with a device that has new data.
pub type Handler<'h, D> = Box<dyn FnMut(&D) + 'h>;

/// Connection slot table plus handler registry.
pub struct Dispatcher<'h, D, const N: usize = MAX_DEVICES> {
    slots: [Option<D>; N],
    handlers: [Option<Handler<'h, D>>; CLASS_COUNT],
}

impl<'h, D, const N: usize> Default for Dispatcher<'h, D, N> {
    fn default() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            handlers: core::array::from_fn(|_| None),
        }
    }
}

impl<'h, D, const N: usize> Dispatcher<'h, D, N>
where
    D: InputDevice + PartialEq,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the transport's firmware version and local address.
    pub fn setup<T: Transport<Device = D>>(
        &self,
        transport: &T,
    ) {
        if let Some(version) = transport.firmware_version() {
            tracing::info!("Firmware: {}", version);
        }
        if let Some(a) = transport.local_address() {
            tracing::info!(
                "BD Addr: {:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
                a[0],
                a[1],
                a[2],
                a[3],
                a[4],
                a[5]
            );
        }
        tracing::info!(slots = N, "input dispatcher ready");
    }

    /// Register `handler` for `class`, replacing any previous one.
    pub fn set_handler(
        &mut self,
        class: DeviceClass,
        handler: impl FnMut(&D) + 'h,
    ) {
        self.handlers[class.index()] = Some(Box::new(handler));
    }

    pub fn clear_handler(
        &mut self,
        class: DeviceClass,
    ) {
        self.handlers[class.index()] = None;
    }

    pub fn has_handler(
        &self,
        class: DeviceClass,
    ) -> bool {
        self.handlers[class.index()].is_some()
    }

    pub fn set_gamepad_handler(
        &mut self,
        handler: impl FnMut(&D) + 'h,
    ) {
        self.set_handler(DeviceClass::Gamepad, handler);
    }

    pub fn set_mouse_handler(
        &mut self,
        handler: impl FnMut(&D) + 'h,
    ) {
        self.set_handler(DeviceClass::Mouse, handler);
    }

    pub fn set_keyboard_handler(
        &mut self,
        handler: impl FnMut(&D) + 'h,
    ) {
        self.set_handler(DeviceClass::Keyboard, handler);
    }

    pub fn set_balance_board_handler(
        &mut self,
        handler: impl FnMut(&D) + 'h,
    ) {
        self.set_handler(DeviceClass::BalanceBoard, handler);
    }

    pub fn slots(&self) -> &[Option<D>; N] {
        &self.slots
    }

    pub fn slot(
        &self,
        index: usize,
    ) -> Option<&D> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Place `device` in the first empty slot.
    ///
    /// Returns the slot index, or `None` if the table was full and the device
    /// was dropped. A device that is already tracked keeps its slot.
    pub fn on_connected(
        &mut self,
        device: D,
    ) -> Option<usize> {
        if let Some(index) = self.position(&device) {
            tracing::warn!(index, "controller already connected");
            return Some(index);
        }
        match self.slots.iter().position(Option::is_none) {
            Some(index) => {
                tracing::info!(index, "controller connected");
                self.slots[index] = Some(device);
                Some(index)
            }
            None => {
                tracing::warn!("controller connected, but no empty slot was found");
                None
            }
        }
    }

    /// Clear the slot holding `device`.
    ///
    /// Returns the freed slot index, or `None` if the device was not tracked.
    pub fn on_disconnected(
        &mut self,
        device: &D,
    ) -> Option<usize> {
        match self.position(device) {
            Some(index) => {
                tracing::info!(index, "controller disconnected");
                self.slots[index] = None;
                Some(index)
            }
            None => {
                tracing::warn!("controller disconnected, but it was not tracked");
                None
            }
        }
    }

    /// Run one control cycle against `transport`.
    ///
    /// Returns `true` if the transport reported new data.
    pub fn update<T: Transport<Device = D>>(
        &mut self,
        transport: &mut T,
    ) -> bool {
        let updated = transport.update();
        while let Some(event) = transport.next_event() {
            match event {
                ConnectionEvent::Connected(device) => {
                    self.on_connected(device);
                }
                ConnectionEvent::Disconnected(device) => {
                    self.on_disconnected(&device);
                }
            }
        }
        if updated {
            self.process();
        }
        updated
    }

    /// Route every connected device with new data to its class handler.
    ///
    /// Returns the number of handler invocations.
    pub fn process(&mut self) -> usize {
        let Self { slots, handlers } = self;
        let mut routed = 0;
        for (index, device) in slots.iter().enumerate() {
            let Some(device) = device else {
                continue;
            };
            if !device.is_connected() || !device.has_data() {
                continue;
            }
            match device.class() {
                Some(class) => match handlers[class.index()].as_mut() {
                    Some(handler) => {
                        handler(device);
                        routed += 1;
                    }
                    None => tracing::trace!(index, ?class, "no handler registered"),
                },
                None => tracing::warn!(index, "unsupported controller"),
            }
        }
        routed
    }

    fn position(
        &self,
        device: &D,
    ) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(device))
    }
}
