use core::cell::RefCell;

use robocar_core::utils::connection::{ConnectionEvent, DeviceClass, Dispatcher};

mod common;
use common::{FakeDevice, ScriptedTransport};

type Journal = RefCell<Vec<(DeviceClass, u32)>>;

/// Register a journaling handler for every class.
fn record_all<'h>(
    dispatcher: &mut Dispatcher<'h, FakeDevice>,
    journal: &'h Journal,
) {
    for class in DeviceClass::ALL {
        dispatcher.set_handler(class, move |dev: &FakeDevice| {
            journal.borrow_mut().push((class, dev.id))
        });
    }
}

fn ids(dispatcher: &Dispatcher<'_, FakeDevice>) -> Vec<Option<u32>> {
    dispatcher
        .slots()
        .iter()
        .map(|slot| slot.as_ref().map(|d| d.id))
        .collect()
}

#[test]
fn connections_fill_slots_in_order_and_overflow_is_dropped() {
    let mut dispatcher: Dispatcher<FakeDevice> = Dispatcher::new();

    for id in 1..=4 {
        assert_eq!(
            dispatcher.on_connected(FakeDevice::new_gamepad(id)),
            Some(id as usize - 1)
        );
    }
    assert_eq!(ids(&dispatcher), vec![Some(1), Some(2), Some(3), Some(4)]);

    assert_eq!(dispatcher.on_connected(FakeDevice::new_gamepad(5)), None);
    assert_eq!(ids(&dispatcher), vec![Some(1), Some(2), Some(3), Some(4)]);

    assert_eq!(dispatcher.on_disconnected(&FakeDevice::new_gamepad(2)), Some(1));
    assert_eq!(ids(&dispatcher), vec![Some(1), None, Some(3), Some(4)]);
    assert_eq!(dispatcher.occupied(), 3);
}

#[test]
fn partial_fill_uses_leading_slots() {
    let mut dispatcher: Dispatcher<FakeDevice> = Dispatcher::new();
    dispatcher.on_connected(FakeDevice::new_gamepad(10));
    dispatcher.on_connected(FakeDevice::new_gamepad(11));

    assert_eq!(ids(&dispatcher), vec![Some(10), Some(11), None, None]);
}

#[test]
fn freed_slot_is_reused_first() {
    let mut dispatcher: Dispatcher<FakeDevice> = Dispatcher::new();
    for id in 1..=3 {
        dispatcher.on_connected(FakeDevice::new_gamepad(id));
    }
    dispatcher.on_disconnected(&FakeDevice::new_gamepad(1));

    assert_eq!(dispatcher.on_connected(FakeDevice::new_gamepad(9)), Some(0));
    assert_eq!(ids(&dispatcher), vec![Some(9), Some(2), Some(3), None]);
}

#[test]
fn disconnecting_untracked_device_changes_nothing() {
    let mut dispatcher: Dispatcher<FakeDevice> = Dispatcher::new();
    dispatcher.on_connected(FakeDevice::new_gamepad(1));

    assert_eq!(dispatcher.on_disconnected(&FakeDevice::new_gamepad(42)), None);
    assert_eq!(ids(&dispatcher), vec![Some(1), None, None, None]);
}

#[test]
fn reconnecting_tracked_device_keeps_its_slot() {
    let mut dispatcher: Dispatcher<FakeDevice> = Dispatcher::new();
    dispatcher.on_connected(FakeDevice::new_gamepad(1));
    dispatcher.on_connected(FakeDevice::new_gamepad(2));

    assert_eq!(dispatcher.on_connected(FakeDevice::new_gamepad(2)), Some(1));
    assert_eq!(dispatcher.occupied(), 2);
}

#[test]
fn custom_capacity_is_respected() {
    let mut dispatcher: Dispatcher<FakeDevice, 2> = Dispatcher::new();
    assert_eq!(dispatcher.on_connected(FakeDevice::new_gamepad(1)), Some(0));
    assert_eq!(dispatcher.on_connected(FakeDevice::new_gamepad(2)), Some(1));
    assert_eq!(dispatcher.on_connected(FakeDevice::new_gamepad(3)), None);
}

#[test]
fn devices_route_only_to_their_class_handler() {
    let journal = Journal::default();
    let mut dispatcher: Dispatcher<FakeDevice> = Dispatcher::new();
    record_all(&mut dispatcher, &journal);

    dispatcher.on_connected(FakeDevice::new_gamepad(1));
    dispatcher.on_connected(FakeDevice::new(2, Some(DeviceClass::Mouse)));
    dispatcher.on_connected(FakeDevice::new(3, Some(DeviceClass::Keyboard)));
    dispatcher.on_connected(FakeDevice::new(4, Some(DeviceClass::BalanceBoard)));

    assert_eq!(dispatcher.process(), 4);
    assert_eq!(
        *journal.borrow(),
        vec![
            (DeviceClass::Gamepad, 1),
            (DeviceClass::Mouse, 2),
            (DeviceClass::Keyboard, 3),
            (DeviceClass::BalanceBoard, 4),
        ]
    );
}

#[test]
fn missing_handler_and_unknown_class_are_skipped() {
    let journal = Journal::default();
    let mut dispatcher: Dispatcher<FakeDevice> = Dispatcher::new();
    record_all(&mut dispatcher, &journal);
    dispatcher.clear_handler(DeviceClass::Gamepad);

    dispatcher.on_connected(FakeDevice::new_gamepad(1));
    dispatcher.on_connected(FakeDevice::new(2, None));
    dispatcher.on_connected(FakeDevice::new(3, Some(DeviceClass::Mouse)));

    assert!(!dispatcher.has_handler(DeviceClass::Gamepad));
    assert_eq!(dispatcher.process(), 1);
    assert_eq!(*journal.borrow(), vec![(DeviceClass::Mouse, 3)]);
}

#[test]
fn idle_and_disconnected_devices_are_not_routed() {
    let journal = Journal::default();
    let mut dispatcher: Dispatcher<FakeDevice> = Dispatcher::new();
    record_all(&mut dispatcher, &journal);

    let mut idle = FakeDevice::new_gamepad(1);
    idle.data = false;
    let mut gone = FakeDevice::new_gamepad(2);
    gone.connected = false;
    dispatcher.on_connected(idle);
    dispatcher.on_connected(gone);
    dispatcher.on_connected(FakeDevice::new_gamepad(3));

    assert_eq!(dispatcher.process(), 1);
    assert_eq!(*journal.borrow(), vec![(DeviceClass::Gamepad, 3)]);
}

#[test]
fn handler_registration_overwrites() {
    let first = RefCell::new(0);
    let second = RefCell::new(0);
    let mut dispatcher: Dispatcher<FakeDevice> = Dispatcher::new();
    dispatcher.set_gamepad_handler(|_: &FakeDevice| *first.borrow_mut() += 1);
    dispatcher.set_gamepad_handler(|_: &FakeDevice| *second.borrow_mut() += 1);
    dispatcher.on_connected(FakeDevice::new_gamepad(1));

    dispatcher.process();
    dispatcher.process();

    assert_eq!((*first.borrow(), *second.borrow()), (0, 2));
}

#[test]
fn update_applies_events_then_routes_new_data() {
    let journal = Journal::default();
    let mut dispatcher: Dispatcher<FakeDevice> = Dispatcher::new();
    record_all(&mut dispatcher, &journal);

    let mut transport = ScriptedTransport::default();
    dispatcher.setup(&transport);
    transport
        .events
        .push_back(ConnectionEvent::Connected(FakeDevice::new_gamepad(1)));
    transport
        .events
        .push_back(ConnectionEvent::Connected(FakeDevice::new(2, Some(DeviceClass::Mouse))));

    // Connections are tracked even on a cycle without data.
    assert!(!dispatcher.update(&mut transport));
    assert_eq!(dispatcher.occupied(), 2);
    assert!(journal.borrow().is_empty());

    transport.data = true;
    transport
        .events
        .push_back(ConnectionEvent::Disconnected(FakeDevice::new_gamepad(1)));
    assert!(dispatcher.update(&mut transport));

    assert_eq!(transport.updates, 2);
    assert_eq!(dispatcher.slot(0), None);
    assert_eq!(*journal.borrow(), vec![(DeviceClass::Mouse, 2)]);
}

#[test]
fn update_without_data_does_not_route() {
    let calls = RefCell::new(0);
    let mut dispatcher: Dispatcher<FakeDevice> = Dispatcher::new();
    dispatcher.set_gamepad_handler(|_: &FakeDevice| *calls.borrow_mut() += 1);
    dispatcher.on_connected(FakeDevice::new_gamepad(1));

    let mut transport = ScriptedTransport::default();
    for _ in 0..3 {
        dispatcher.update(&mut transport);
    }
    assert_eq!(*calls.borrow(), 0);
}
