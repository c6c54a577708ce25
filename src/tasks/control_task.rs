//! Top-level control loop.
//!
//! One pass: read pending serial lines, refresh the obstacle distance when
//! the telemetry interval has elapsed, then run exactly one gait cycle for the
//! current command, or stand when the command does not map to a gait.
use crate::kinematics::gait_engine::{Gait, GaitEngine, GaitOutcome};
use crate::robot::{
    config::RobotConfig, servo::Actuator, sonar::RangeFinder, state::ControlState,
};
use crate::tasks::serial_link::{SerialLink, Telemetry};
use embassy_time::{Duration, Instant};
use embedded_hal_async::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use log::{debug, info};

/// What a single pass ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassAction {
    Stood,
    Walked(Gait, GaitOutcome),
}

pub struct ControlLoop<A, D, U, R> {
    engine: GaitEngine<A, D>,
    link: SerialLink<U>,
    sonar: R,
    state: ControlState,
    sample_interval: Duration,
    last_sample: Option<Instant>,
}

impl<A, D, U, R> ControlLoop<A, D, U, R>
where
    A: Actuator,
    D: DelayNs,
    U: Read + ReadReady + Write,
    R: RangeFinder,
{
    pub fn new(actuator: A, delay: D, uart: U, sonar: R, config: RobotConfig) -> Self {
        let sample_interval = Duration::from_millis(config.telemetry_interval_ms);
        Self {
            engine: GaitEngine::new(actuator, delay, config),
            link: SerialLink::new(uart),
            sonar,
            state: ControlState::new(),
            sample_interval,
            last_sample: None,
        }
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn engine(&self) -> &GaitEngine<A, D> {
        &self.engine
    }

    pub fn link(&self) -> &SerialLink<U> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut SerialLink<U> {
        &mut self.link
    }

    pub fn sonar(&self) -> &R {
        &self.sonar
    }

    /// Put the robot on its feet and tell the peer we are listening.
    pub async fn start(&mut self) {
        self.engine.stand().await;
        self.link.emit(Telemetry::Ready);
        info!("Robot ready, {:?}", self.engine.config());
    }

    /// Sample the range finder if the interval has elapsed since the last
    /// sample. Every sample is reported, only valid ones are stored.
    pub fn refresh_distance(&mut self, now: Instant) {
        let due = self
            .last_sample
            .map_or(true, |last| now.saturating_duration_since(last) >= self.sample_interval);
        if !due {
            return;
        }
        let sample = self.sonar.sample_cm();
        self.link.emit(Telemetry::Distance(sample));
        if self.state.set_distance(sample) {
            debug!("obstacle distance {sample} cm");
        }
        self.last_sample = Some(now);
    }

    /// One iteration of the control loop.
    pub async fn pass(&mut self, now: Instant) -> PassAction {
        self.link.poll_lines(&mut self.state);
        self.refresh_distance(now);

        match Gait::for_command(self.state.command()) {
            Some(gait) => {
                let outcome = self
                    .engine
                    .run(gait, &mut self.state, &mut self.link)
                    .await;
                debug!("{gait}: {outcome:?}");
                PassAction::Walked(gait, outcome)
            }
            None => {
                self.engine.stand().await;
                PassAction::Stood
            }
        }
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.pass(Instant::now()).await;
        }
    }
}
