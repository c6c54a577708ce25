//! ESP32 LEDC bring-up for the twelve leg servos.
//!
//! The LEDC peripheral has 8 low speed and 8 high speed channels. The first
//! eight servos go on low speed channels, the last four on high speed ones.
extern crate alloc;

use super::config::{ATTACH_DELAY_MS, SERVO_COUNT, SERVO_FREQUENCY_HZ};
use super::servo::{clamp_angle, Actuator, Servo};
use alloc::boxed::Box;
use embassy_time::Timer;
use esp_hal::gpio::AnyPin;
use esp_hal::ledc::channel::{self, Channel, ChannelIFace, Number};
use esp_hal::ledc::timer::{self, LSClockSource, TimerIFace};
use esp_hal::ledc::{HighSpeed, LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::peripherals::LEDC;
use esp_hal::time::Rate;
use log::{error, info};

/// The AnyServo enum serves as a wrapper around servos that might hold different underlying
/// channels (LowSpeed and HighSpeed). This way we can treat the servos as the same objects
/// despite their differences (e.g. to store them in one array).
pub enum AnyServo {
    Low(Servo<Channel<'static, LowSpeed>>),
    High(Servo<Channel<'static, HighSpeed>>),
}

impl AnyServo {
    pub fn set_angle(&mut self, angle: u8) {
        match self {
            AnyServo::Low(servo) => servo.set_angle(angle),
            AnyServo::High(servo) => servo.set_angle(angle),
        }
    }
}

impl Actuator for [AnyServo; SERVO_COUNT] {
    fn write_angle(&mut self, channel: usize, angle: i16) {
        match self.get_mut(channel) {
            Some(servo) => servo.set_angle(clamp_angle(angle)),
            None => error!("no servo on channel {channel}"),
        }
    }
}

async fn create_configure_timers(
    ledc: &mut Ledc<'static>,
) -> (
    timer::Timer<'static, LowSpeed>,
    timer::Timer<'static, HighSpeed>,
) {
    let mut timer_low = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    let mut timer_high = ledc.timer::<HighSpeed>(timer::Number::Timer0);

    timer_low
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty12Bit,
            clock_source: LSClockSource::APBClk,
            frequency: Rate::from_hz(SERVO_FREQUENCY_HZ),
        })
        .expect("Fail creating ledc timer");

    timer_high
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty12Bit,
            clock_source: timer::HSClockSource::APBClk,
            frequency: Rate::from_hz(SERVO_FREQUENCY_HZ),
        })
        .expect("Fail creating high speed timer");

    (timer_low, timer_high)
}

/// Bind the servo pins (channel order) to LEDC channels, pausing between two
/// attachments so the supply is not hit by all servos at once.
pub async fn attach_servos(
    ledc: LEDC<'static>,
    servo_pins: [AnyPin<'static>; SERVO_COUNT],
) -> [AnyServo; SERVO_COUNT] {
    info!("Attaching servos");
    let mut ledc = Ledc::new(ledc);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    //Configure timers: Leak them to get static lifetime.
    let (timer_low, timer_high) = create_configure_timers(&mut ledc).await;
    let timer_low: &'static _ = Box::leak(Box::new(timer_low));
    let timer_high: &'static _ = Box::leak(Box::new(timer_high));
    let ledc: &'static Ledc<'static> = Box::leak(Box::new(ledc));

    let [p0, p1, p2, p3, p4, p5, p6, p7, p8, p9, p10, p11] = servo_pins;

    let low_speed_channels: [Channel<'static, LowSpeed>; 8] = [
        ledc.channel(Number::Channel0, p0),
        ledc.channel(Number::Channel1, p1),
        ledc.channel(Number::Channel2, p2),
        ledc.channel(Number::Channel3, p3),
        ledc.channel(Number::Channel4, p4),
        ledc.channel(Number::Channel5, p5),
        ledc.channel(Number::Channel6, p6),
        ledc.channel(Number::Channel7, p7),
    ];
    let high_speed_channels: [Channel<'static, HighSpeed>; 4] = [
        ledc.channel(Number::Channel0, p8),
        ledc.channel(Number::Channel1, p9),
        ledc.channel(Number::Channel2, p10),
        ledc.channel(Number::Channel3, p11),
    ];

    let mut low = low_speed_channels.into_iter();
    let mut high = high_speed_channels.into_iter();
    let mut servos: heapless::Vec<AnyServo, SERVO_COUNT> = heapless::Vec::new();

    for index in 0..SERVO_COUNT {
        let servo = if let Some(mut channel) = low.next() {
            channel
                .configure(channel::config::Config {
                    timer: timer_low,
                    duty_pct: 7,
                    pin_config: channel::config::PinConfig::PushPull,
                })
                .expect("Fail configurating low speed channels");
            AnyServo::Low(Servo::standard(channel, index))
        } else if let Some(mut channel) = high.next() {
            channel
                .configure(channel::config::Config {
                    timer: timer_high,
                    duty_pct: 7,
                    pin_config: channel::config::PinConfig::PushPull,
                })
                .expect("Fail configurating high speed channels");
            AnyServo::High(Servo::standard(channel, index))
        } else {
            unreachable!("8 low + 4 high speed channels cover every servo");
        };
        let _ = servos.push(servo);
        Timer::after_millis(ATTACH_DELAY_MS).await;
    }

    match servos.into_array() {
        Ok(servos) => servos,
        Err(_) => unreachable!("exactly {SERVO_COUNT} servos attached"),
    }
}
