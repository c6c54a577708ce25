#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

extern crate alloc;

use core::future::pending;
use embassy_executor::Spawner;
use embassy_time::Delay;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{AnyPin, Input, InputConfig, Level, Output, OutputConfig, Pin, Pull};
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{self, Uart};
use esp_hal::Blocking;
use log::info;
use quad_walker::robot::config::{RobotConfig, SERIAL_BAUDRATE, SERVO_COUNT};
use quad_walker::robot::ledc::{attach_servos, AnyServo};
use quad_walker::robot::sonar::HcSr04;
use quad_walker::tasks::control_task::ControlLoop;

esp_bootloader_esp_idf::esp_app_desc!();

//LEGS: [coxa, femur, tibia]
//FRONT_L: [32, 33, 25]
//BOTTOM_L: [26, 27, 14]
//FRONT_R: [12, 13, 19]
//BOTTOM_R: [18, 5, 4]
//SONAR: trig 21, echo 22
//SERIAL (UART2): rx 16, tx 17

type Sonar = HcSr04<Output<'static>, Input<'static>, esp_hal::delay::Delay>;
type Walker = ControlLoop<[AnyServo; SERVO_COUNT], Delay, Uart<'static, Blocking>, Sonar>;

#[embassy_executor::task]
async fn control_task(walker: Walker) {
    let mut walker = walker;
    walker.start().await;
    walker.run().await
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let p = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 32 * 1024);

    let timer0 = TimerGroup::new(p.TIMG1);
    esp_hal_embassy::init(timer0.timer0);
    info!("Embassy initialized");

    let servo_pins: [AnyPin<'static>; SERVO_COUNT] = [
        p.GPIO32.degrade(),
        p.GPIO33.degrade(),
        p.GPIO25.degrade(),
        p.GPIO26.degrade(),
        p.GPIO27.degrade(),
        p.GPIO14.degrade(),
        p.GPIO12.degrade(),
        p.GPIO13.degrade(),
        p.GPIO19.degrade(),
        p.GPIO18.degrade(),
        p.GPIO5.degrade(),
        p.GPIO4.degrade(),
    ];
    let servos = attach_servos(p.LEDC, servo_pins).await;

    let uart = Uart::new(
        p.UART2,
        uart::Config::default().with_baudrate(SERIAL_BAUDRATE),
    )
    .expect("Failed to initialize command UART")
    .with_rx(p.GPIO16)
    .with_tx(p.GPIO17);

    let trig = Output::new(p.GPIO21, Level::Low, OutputConfig::default());
    let echo = Input::new(p.GPIO22, InputConfig::default().with_pull(Pull::Down));
    let sonar = HcSr04::new(trig, echo, esp_hal::delay::Delay::new());

    let walker = ControlLoop::new(servos, Delay, uart, sonar, RobotConfig::default());

    info!("Starting quadruped walker...");
    spawner
        .spawn(control_task(walker))
        .expect("Fail spawning control task");

    loop {
        pending::<()>().await;
    }
}
