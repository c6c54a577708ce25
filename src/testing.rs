//! Recording doubles for the hardware seams, shared by the unit tests.
use core::convert::Infallible;
use core::future::Future;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::vec::Vec;

use embassy_time::{Duration, Instant, MockDriver};

use crate::robot::commands::{Command, CommandSource};
use crate::robot::servo::Actuator;
use crate::robot::sonar::RangeFinder;
use crate::robot::state::ControlState;

pub fn block_on<F: Future>(future: F) -> F::Output {
    embassy_futures::block_on(future)
}

/// Keeps every `(channel, angle)` write, duplicates included.
#[derive(Debug, Default)]
pub struct MockActuator {
    pub writes: Vec<(usize, i16)>,
}

impl Actuator for MockActuator {
    fn write_angle(&mut self, channel: usize, angle: i16) {
        self.writes.push((channel, angle));
    }
}

/// Returns immediately and remembers the requested delays in milliseconds.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub delays_ms: Vec<u32>,
}

impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.delays_ms.push(ns / 1_000_000);
    }

    async fn delay_us(&mut self, us: u32) {
        self.delays_ms.push(us / 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
    }
}

/// Each poll consumes one scripted entry; `Some` overwrites the command.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: VecDeque<Option<Command>>,
    pub polls: usize,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = Option<Command>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            polls: 0,
        }
    }
}

impl CommandSource for ScriptedInput {
    fn poll(&mut self, state: &mut ControlState) {
        self.polls += 1;
        if let Some(Some(command)) = self.script.pop_front() {
            state.set_command(command);
        }
    }
}

/// Hands out queued samples, then reports "no reading".
#[derive(Debug, Default)]
pub struct MockSonar {
    samples: VecDeque<u16>,
    pub taken: usize,
}

impl MockSonar {
    pub fn new(samples: impl IntoIterator<Item = u16>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            taken: 0,
        }
    }
}

impl RangeFinder for MockSonar {
    fn sample_cm(&mut self) -> u16 {
        self.taken += 1;
        self.samples.pop_front().unwrap_or(0)
    }
}

#[derive(Debug)]
pub struct MockPwm {
    max_duty: u16,
    pub writes: Vec<u16>,
}

impl MockPwm {
    pub fn new(max_duty: u16) -> Self {
        Self {
            max_duty,
            writes: Vec::new(),
        }
    }
}

impl embedded_hal::pwm::ErrorType for MockPwm {
    type Error = Infallible;
}

impl embedded_hal::pwm::SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.writes.push(duty);
        Ok(())
    }
}

/// In-memory UART: bytes pushed with [`MockSerial::feed`] are readable, writes
/// are collected in `tx`.
#[derive(Debug, Default)]
pub struct MockSerial {
    rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

impl MockSerial {
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn sent(&self) -> &str {
        core::str::from_utf8(&self.tx).unwrap()
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = Infallible;
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.rx.is_empty())
    }
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Serializes the tests that move the shared mock clock.
pub static CLOCK: Mutex<()> = Mutex::new(());

/// Records every level driven on the pin.
#[derive(Debug, Default)]
pub struct TriggerPin {
    pub levels: Vec<bool>,
}

impl embedded_hal::digital::ErrorType for TriggerPin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for TriggerPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}

/// Echo line playing back `(rise_us, fall_us)` pulses, relative to its
/// creation. Every read moves the mock clock forward by 100 µs.
#[derive(Debug)]
pub struct EchoPin {
    origin: Instant,
    pulses: &'static [(u64, u64)],
}

impl EchoPin {
    pub fn new(pulses: &'static [(u64, u64)]) -> Self {
        Self {
            origin: Instant::now(),
            pulses,
        }
    }

    fn level(&self) -> bool {
        let at = (Instant::now() - self.origin).as_micros();
        let high = self
            .pulses
            .iter()
            .any(|&(rise, fall)| (rise..fall).contains(&at));
        MockDriver::get().advance(Duration::from_micros(100));
        high
    }
}

impl embedded_hal::digital::ErrorType for EchoPin {
    type Error = Infallible;
}

impl embedded_hal::digital::InputPin for EchoPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

/// Blocking delay that does not let time pass.
#[derive(Debug, Default)]
pub struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
