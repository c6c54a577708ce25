use crate::kinematics::conversion::Body;
use crate::robot::{
    commands::{Command, CommandSource},
    config::RobotConfig,
    leg::Leg,
    servo::Actuator,
    state::ControlState,
};
use core::fmt::Display;
use embedded_hal_async::delay::DelayNs;
use log::{debug, info, warn};

/// The four walking patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gait {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

impl Gait {
    /// Gait requested by a command, `None` means stand.
    pub fn for_command(command: Command) -> Option<Self> {
        match command {
            Command::Forward => Some(Gait::Forward),
            Command::Backward => Some(Gait::Backward),
            Command::Left => Some(Gait::TurnLeft),
            Command::Right => Some(Gait::TurnRight),
            Command::Stop => None,
        }
    }

    /// Command that keeps this gait going.
    pub fn command(self) -> Command {
        match self {
            Gait::Forward => Command::Forward,
            Gait::Backward => Command::Backward,
            Gait::TurnLeft => Command::Left,
            Gait::TurnRight => Command::Right,
        }
    }

    /// Legs in stepping order with their coxa offset. Walking moves diagonal
    /// pairs one after the other; turning goes around the body alternating the
    /// swing direction.
    pub fn sequence(self, swing: i16) -> [(Leg, i16); 4] {
        use Leg::*;
        match self {
            Gait::Forward => [
                (FrontLeft, swing),
                (FrontRight, swing),
                (BottomLeft, swing),
                (BottomRight, swing),
            ],
            Gait::Backward => [
                (FrontLeft, -swing),
                (FrontRight, -swing),
                (BottomLeft, -swing),
                (BottomRight, -swing),
            ],
            Gait::TurnLeft => [
                (FrontLeft, swing),
                (BottomLeft, -swing),
                (FrontRight, swing),
                (BottomRight, -swing),
            ],
            Gait::TurnRight => [
                (FrontLeft, -swing),
                (BottomLeft, swing),
                (FrontRight, -swing),
                (BottomRight, swing),
            ],
        }
    }
}

impl Display for Gait {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Gait::Forward => f.write_str("walk forward"),
            Gait::Backward => f.write_str("walk backward"),
            Gait::TurnLeft => f.write_str("turn left"),
            Gait::TurnRight => f.write_str("turn right"),
        }
    }
}

/// How a gait call ended. Informational only: nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaitOutcome {
    /// All four legs stepped.
    Completed,
    /// The command changed after `steps` legs had stepped.
    Cancelled { steps: usize },
    /// An obstacle was too close, the robot stopped and stood up.
    Blocked { distance_cm: u16 },
}

/// Drives the legs through single steps and whole gait cycles.
///
/// Open loop: every pose is held for a fixed settle delay and never verified.
/// A step always runs to completion; gaits can only be interrupted between
/// two legs.
pub struct GaitEngine<A, D> {
    body: Body<A>,
    delay: D,
    config: RobotConfig,
}

impl<A, D> GaitEngine<A, D>
where
    A: Actuator,
    D: DelayNs,
{
    pub fn new(actuator: A, delay: D, config: RobotConfig) -> Self {
        Self {
            body: Body::new(actuator, config.channels),
            delay,
            config,
        }
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn body(&self) -> &Body<A> {
        &self.body
    }

    pub fn into_parts(self) -> (A, D) {
        (self.body.into_inner(), self.delay)
    }

    /// Neutral pose: every channel at its home angle.
    pub async fn stand(&mut self) {
        self.body.home_all();
        self.delay.delay_ms(self.config.stand_settle_ms).await;
    }

    /// Raise the femur and fold the tibia so the foot clears the ground.
    /// The coxa goes back to home.
    pub fn lift_leg(&mut self, leg: Leg) {
        let [coxa, femur, tibia] = self.body.home(leg);
        let lift = self.config.lift_offset;
        self.body.set_leg(leg, coxa, femur - lift, tibia + lift);
    }

    /// Plant the foot: all three joints back to home.
    pub fn drop_leg(&mut self, leg: Leg) {
        let [coxa, femur, tibia] = self.body.home(leg);
        self.body.set_leg(leg, coxa, femur, tibia);
    }

    /// One full step of one leg: lift, swing the coxa by `offset`, drop.
    pub async fn step(&mut self, leg: Leg, offset: i16) {
        debug!("{leg} step {offset:+}");
        let settle = self.config.settle_delay_ms;
        let [coxa, femur, tibia] = self.body.home(leg);
        let lift = self.config.lift_offset;

        self.lift_leg(leg);
        self.delay.delay_ms(settle).await;

        self.body
            .set_leg(leg, coxa + offset, femur - lift, tibia + lift);
        self.delay.delay_ms(settle).await;

        self.drop_leg(leg);
        self.delay.delay_ms(settle).await;
    }

    /// Run one cycle of `gait`.
    ///
    /// After every leg but the last, `input` is polled and the cycle stops
    /// as soon as the command no longer asks for this gait. Walking forward
    /// first checks the obstacle distance and refuses to move when something
    /// is closer than the configured threshold.
    pub async fn run<I>(
        &mut self,
        gait: Gait,
        state: &mut ControlState,
        input: &mut I,
    ) -> GaitOutcome
    where
        I: CommandSource + ?Sized,
    {
        if gait == Gait::Forward {
            let distance_cm = state.distance_cm();
            if distance_cm > 0 && distance_cm < self.config.obstacle_threshold_cm {
                warn!("obstacle at {distance_cm} cm, stopping");
                self.stand().await;
                state.set_command(Command::Stop);
                return GaitOutcome::Blocked { distance_cm };
            }
        }

        let sequence = gait.sequence(self.config.step_swing);
        let last = sequence.len() - 1;
        for (i, (leg, offset)) in sequence.into_iter().enumerate() {
            self.step(leg, offset).await;
            if i == last {
                break;
            }
            input.poll(state);
            if state.command() != gait.command() {
                info!("{gait} interrupted by {} after {} legs", state.command(), i + 1);
                return GaitOutcome::Cancelled { steps: i + 1 };
            }
        }
        GaitOutcome::Completed
    }

    pub async fn walk_forward<I>(&mut self, state: &mut ControlState, input: &mut I) -> GaitOutcome
    where
        I: CommandSource + ?Sized,
    {
        self.run(Gait::Forward, state, input).await
    }

    pub async fn walk_backward<I>(&mut self, state: &mut ControlState, input: &mut I) -> GaitOutcome
    where
        I: CommandSource + ?Sized,
    {
        self.run(Gait::Backward, state, input).await
    }

    pub async fn turn_left<I>(&mut self, state: &mut ControlState, input: &mut I) -> GaitOutcome
    where
        I: CommandSource + ?Sized,
    {
        self.run(Gait::TurnLeft, state, input).await
    }

    pub async fn turn_right<I>(&mut self, state: &mut ControlState, input: &mut I) -> GaitOutcome
    where
        I: CommandSource + ?Sized,
    {
        self.run(Gait::TurnRight, state, input).await
    }
}
