//! Logical joint angles to physical servo angles.
//!
//! A logical angle is the angle the joint would take if every servo were
//! mounted the same way. Mirrored servos get `180 - angle`. No range check is
//! done here; the actuator clamps.
use crate::robot::{
    config::{ServoChannel, SERVO_COUNT},
    joint::Joint,
    leg::Leg,
    servo::Actuator,
};
use log::trace;

/// Physical angle for a channel with the given mounting.
pub fn physical_angle(reversed: bool, logical: i16) -> i16 {
    if reversed {
        180 - logical
    } else {
        logical
    }
}

/// The twelve servos seen as four legs.
pub struct Body<A> {
    actuator: A,
    channels: [ServoChannel; SERVO_COUNT],
}

impl<A: Actuator> Body<A> {
    pub fn new(actuator: A, channels: [ServoChannel; SERVO_COUNT]) -> Self {
        Self { actuator, channels }
    }

    /// Write one logical angle to one channel.
    pub fn move_servo(&mut self, channel: usize, logical: i16) {
        let angle = physical_angle(self.channels[channel].reversed, logical);
        trace!("servo {channel}: {logical} -> {angle}");
        self.actuator.write_angle(channel, angle);
    }

    /// Pose one leg. The three writes go out in coxa, femur, tibia order.
    pub fn set_leg(&mut self, leg: Leg, coxa: i16, femur: i16, tibia: i16) {
        self.move_servo(leg.channel(Joint::Coxa), coxa);
        self.move_servo(leg.channel(Joint::Femur), femur);
        self.move_servo(leg.channel(Joint::Tibia), tibia);
    }

    /// Home angles of a leg as `[coxa, femur, tibia]`.
    pub fn home(&self, leg: Leg) -> [i16; 3] {
        Joint::ALL.map(|joint| self.channels[leg.channel(joint)].home)
    }

    /// Every channel to its home angle, in channel order.
    pub fn home_all(&mut self) {
        for channel in 0..SERVO_COUNT {
            self.move_servo(channel, self.channels[channel].home);
        }
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn into_inner(self) -> A {
        self.actuator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::config::DEFAULT_CHANNELS;
    use crate::testing::MockActuator;

    #[test]
    fn reversal_mirrors_every_angle() {
        for logical in 0..=180 {
            assert_eq!(physical_angle(true, logical), 180 - logical);
            assert_eq!(physical_angle(false, logical), logical);
        }
    }

    #[test]
    fn out_of_range_values_pass_through() {
        assert_eq!(physical_angle(false, 205), 205);
        assert_eq!(physical_angle(true, 205), -25);
    }

    #[test]
    fn set_leg_writes_coxa_femur_tibia() {
        let mut body = Body::new(MockActuator::default(), DEFAULT_CHANNELS);
        body.set_leg(Leg::FrontLeft, 100, 95, 85);
        body.set_leg(Leg::FrontRight, 120, 35, 175);
        // channels 0 and 2 are mirrored
        assert_eq!(
            body.actuator().writes,
            vec![(0, 80), (1, 95), (2, 95), (6, 120), (7, 35), (8, 175)]
        );
    }

    #[test]
    fn home_all_applies_reversal() {
        let mut body = Body::new(MockActuator::default(), DEFAULT_CHANNELS);
        body.home_all();
        let expected: Vec<(usize, i16)> = DEFAULT_CHANNELS
            .iter()
            .enumerate()
            .map(|(i, c)| (i, if c.reversed { 180 - c.home } else { c.home }))
            .collect();
        assert_eq!(body.actuator().writes, expected);
        assert_eq!(body.actuator().writes[4], (4, 60));
    }

    #[test]
    fn home_reads_leg_channels() {
        let body = Body::new(MockActuator::default(), DEFAULT_CHANNELS);
        assert_eq!(body.home(Leg::FrontRight), [90, 60, 150]);
        assert_eq!(body.home(Leg::BottomRight), [90, 120, 60]);
    }
}
