//! Servo channel table and movement constants.
//!
//! Angles are in degrees, durations in milliseconds unless stated otherwise.
//! The delays and the obstacle threshold were tuned on the built robot and have
//! no derivation beyond that.

use super::joint::Joint;
use super::leg::Leg;

/// Number of servo channels (4 legs x 3 joints).
pub const SERVO_COUNT: usize = 12;

/// Pause after each phase of a leg step.
pub const SETTLE_DELAY_MS: u32 = 80;
/// Pause after broadcasting the stand pose.
pub const STAND_SETTLE_MS: u32 = 10;
/// Pause between servo attachments at boot.
pub const ATTACH_DELAY_MS: u64 = 10;

/// Femur raise / tibia compensation while a leg is lifted.
pub const LIFT_OFFSET: i16 = 25;
/// Coxa swing used by every gait.
pub const STEP_SWING: i16 = 30;

/// Forward walking stops when an obstacle is strictly closer than this.
pub const OBSTACLE_THRESHOLD_CM: u16 = 20;
/// Distance assumed before the first valid sample.
pub const INITIAL_DISTANCE_CM: u16 = 100;

/// Interval between two sensor refreshes (and `DIST:` telemetry lines).
pub const TELEMETRY_INTERVAL_MS: u64 = 150;

// SENSOR
pub const ECHO_TIMEOUT_US: u64 = 25_000;
pub const MAX_RANGE_CM: u16 = 400;

// SERVO PULSE
pub const SERVO_MIN_PULSE_US: u32 = 544;
pub const SERVO_MAX_PULSE_US: u32 = 2400;
pub const SERVO_FREQUENCY_HZ: u32 = 50;

pub const SERIAL_BAUDRATE: u32 = 9600;

/// Static description of one servo output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoChannel {
    /// Pin number on the reference wiring.
    pub pin: u8,
    /// Mounted mirrored: the physical angle is `180 - logical`.
    pub reversed: bool,
    /// Neutral standing angle.
    pub home: i16,
}

impl ServoChannel {
    pub const fn new(pin: u8, reversed: bool, home: i16) -> Self {
        Self {
            pin,
            reversed,
            home,
        }
    }
}

//[coxa, femur, tibia] per leg
pub const DEFAULT_CHANNELS: [ServoChannel; SERVO_COUNT] = [
    ServoChannel::new(2, true, 90),
    ServoChannel::new(3, false, 120),
    ServoChannel::new(4, true, 60),
    ServoChannel::new(5, false, 90),
    ServoChannel::new(6, true, 120),
    ServoChannel::new(7, false, 60),
    ServoChannel::new(8, false, 90),
    ServoChannel::new(9, false, 60),
    ServoChannel::new(10, false, 150),
    ServoChannel::new(11, false, 90),
    ServoChannel::new(12, false, 120),
    ServoChannel::new(13, false, 60),
];

/// Everything the gait engine and control loop need to know about the robot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotConfig {
    pub channels: [ServoChannel; SERVO_COUNT],
    pub settle_delay_ms: u32,
    pub stand_settle_ms: u32,
    pub lift_offset: i16,
    pub step_swing: i16,
    pub obstacle_threshold_cm: u16,
    pub telemetry_interval_ms: u64,
}

impl RobotConfig {
    pub const fn new() -> Self {
        Self {
            channels: DEFAULT_CHANNELS,
            settle_delay_ms: SETTLE_DELAY_MS,
            stand_settle_ms: STAND_SETTLE_MS,
            lift_offset: LIFT_OFFSET,
            step_swing: STEP_SWING,
            obstacle_threshold_cm: OBSTACLE_THRESHOLD_CM,
            telemetry_interval_ms: TELEMETRY_INTERVAL_MS,
        }
    }

    /// Channel description for one joint of one leg.
    pub fn channel(&self, leg: Leg, joint: Joint) -> &ServoChannel {
        &self.channels[leg.channel(joint)]
    }

    pub fn with_channels(mut self, channels: [ServoChannel; SERVO_COUNT]) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_settle_delay_ms(mut self, ms: u32) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    pub fn with_obstacle_threshold_cm(mut self, cm: u16) -> Self {
        self.obstacle_threshold_cm = cm;
        self
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self::new()
    }
}
