use clap::Parser;
use core::cell::RefCell;
use embassy_executor::{Executor, Spawner};
use embassy_time::Timer;
use robocar_core::utils::connection::dump::{dump_gamepad, dump_mouse};
use robocar_core::utils::connection::InputDevice;
use robocar_core::utils::controllers::enqueue;
use robocar_core::utils::{
    CarCommand, CarHardware, CommandQueue, Dispatcher, RoboCar, Settings, Teleop,
};
use static_cell::StaticCell;
use std::{error::Error, path::PathBuf};
use tracing::{info, warn};

mod sim;
use sim::{LogGpio, LogServos, SimDevice, SimTransport};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts
{
    /// JSON settings file; built-in defaults when omitted
    #[clap(long)]
    config: Option<PathBuf>,
    /// number of control loop iterations to simulate
    #[clap(long, default_value_t = 40)]
    cycles: u32,
    /// override the poll interval from the settings (ms)
    #[clap(long)]
    interval_ms: Option<u64>,
}

#[embassy_executor::task]
async fn control_task(
    settings: Settings,
    cycles: u32,
) {
    let gpio = RefCell::new(LogGpio);
    let servos = RefCell::new(LogServos);
    let hw = CarHardware::new(settings.car, &gpio, &servos)
        .with_steering_center(settings.teleop.steering_center);
    let mut car = RoboCar::new(&hw);

    let queue = CommandQueue::new();
    let teleop = Teleop::new(settings.teleop);
    let mut transport = SimTransport::new(cycles);

    let mut dispatcher: Dispatcher<SimDevice> = Dispatcher::new();
    dispatcher.setup(&transport);
    dispatcher.set_gamepad_handler(|dev: &SimDevice| {
        dump_gamepad(dev);
        if let Some(pad) = dev.gamepad() {
            for cmd in teleop.map_gamepad(&pad) {
                enqueue(&queue, cmd);
            }
        }
    });
    dispatcher.set_mouse_handler(|dev: &SimDevice| dump_mouse(dev));

    for cycle in 0..cycles {
        if dispatcher.update(&mut transport) {
            let applied = car.drain(&queue);
            info!(
                cycle,
                applied,
                speed = car.speed(),
                angle = ?car.angle(),
                "control cycle"
            );
        }
        Timer::after_millis(settings.poll_interval_ms).await;
    }

    if !enqueue(&queue, CarCommand::Stop) {
        warn!("stop could not be queued, stopping directly");
        car.execute(CarCommand::Stop);
    }
    car.drain(&queue);
    info!(cycles, "simulation finished, car stopped");
    std::process::exit(0);
}

#[embassy_executor::task]
async fn main_task(
    spawner: Spawner,
    settings: Settings,
    cycles: u32,
) {
    info!(?settings, "starting simulated car");
    spawner.spawn(control_task(settings, cycles)).unwrap();
}

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts: Opts = Opts::parse();
    let mut settings = match &opts.config {
        Some(path) => Settings::from_json(&std::fs::read(path)?)?,
        None => Settings::default(),
    };
    if let Some(interval) = opts.interval_ms {
        settings.poll_interval_ms = interval;
    }

    let executor = EXECUTOR.init(Executor::new());
    executor.run(move |spawner| {
        spawner.spawn(main_task(spawner, settings, opts.cycles)).unwrap();
    });
}
