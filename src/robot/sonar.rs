//! Ultrasonic range finder (HC-SR04 style trigger/echo module).
//!
//! A reading of `0` always means "no valid reading": the echo timed out or the
//! computed distance is beyond the sensor range.
use crate::robot::config::{ECHO_TIMEOUT_US, MAX_RANGE_CM};
use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

/// Source of obstacle distance samples, in centimetres.
pub trait RangeFinder {
    /// Take one sample. Returns 0 when no valid reading is available.
    fn sample_cm(&mut self) -> u16;
}

impl<R: RangeFinder + ?Sized> RangeFinder for &mut R {
    fn sample_cm(&mut self) -> u16 {
        (**self).sample_cm()
    }
}

/// Convert an echo pulse width into centimetres.
///
/// Sound travels 0.034 cm/µs and the pulse covers the distance twice.
/// Out-of-range results collapse to 0.
pub fn echo_to_cm(echo_us: u64) -> u16 {
    let cm = echo_us * 17 / 1000;
    if cm == 0 || cm > MAX_RANGE_CM as u64 {
        return 0;
    }
    cm as u16
}

pub struct HcSr04<TRIG, ECHO, D> {
    trig: TRIG,
    echo: ECHO,
    delay: D,
    timeout: Duration,
}

impl<TRIG, ECHO, D> HcSr04<TRIG, ECHO, D>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    D: DelayNs,
{
    pub fn new(trig: TRIG, echo: ECHO, delay: D) -> Self {
        Self {
            trig,
            echo,
            delay,
            timeout: Duration::from_micros(ECHO_TIMEOUT_US),
        }
    }

    fn trigger(&mut self) -> Result<(), ()> {
        self.trig.set_low().map_err(|_| ())?;
        self.delay.delay_us(2);
        self.trig.set_high().map_err(|_| ())?;
        self.delay.delay_us(10);
        self.trig.set_low().map_err(|_| ())
    }

    /// Busy-wait until the echo line reaches `high`, or the timeout expires.
    fn wait_level(&mut self, high: bool, since: Instant) -> Option<Instant> {
        loop {
            match self.echo.is_high() {
                Ok(level) if level == high => return Some(Instant::now()),
                Ok(_) => {}
                Err(_) => return None,
            }
            if since.elapsed() >= self.timeout {
                return None;
            }
        }
    }

    /// Width of the echo pulse in µs, `None` on timeout.
    ///
    /// The whole measurement shares one timeout window, counted from the end
    /// of the trigger pulse. A pulse already in progress is let through first.
    fn echo_width_us(&mut self) -> Option<u64> {
        let t0 = Instant::now();
        self.wait_level(false, t0)?;
        let start = self.wait_level(true, t0)?;
        let end = self.wait_level(false, t0)?;
        Some((end - start).as_micros())
    }
}

impl<TRIG, ECHO, D> RangeFinder for HcSr04<TRIG, ECHO, D>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    D: DelayNs,
{
    fn sample_cm(&mut self) -> u16 {
        if self.trigger().is_err() {
            warn!("sonar trigger pin failed");
            return 0;
        }
        self.echo_width_us().map(echo_to_cm).unwrap_or(0)
    }
}
