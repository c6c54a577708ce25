use crate::robot::config::{
    SERVO_COUNT, SERVO_FREQUENCY_HZ, SERVO_MAX_PULSE_US, SERVO_MIN_PULSE_US,
};
use crate::robot::{joint::Joint, leg::Leg};
use embedded_hal::pwm::SetDutyCycle;
use fugit::{Hertz, HertzU32};
use log::error;

/// Anything that can put a servo channel at an angle.
///
/// Writes are fire-and-forget: there is no feedback and failures are not
/// reported back to the caller.
pub trait Actuator {
    /// Command physical `angle` (degrees) on `channel`. Values outside 0..=180
    /// are clamped by the implementation.
    fn write_angle(&mut self, channel: usize, angle: i16);
}

impl<A: Actuator + ?Sized> Actuator for &mut A {
    fn write_angle(&mut self, channel: usize, angle: i16) {
        (**self).write_angle(channel, angle)
    }
}

/// Clamp a requested angle to what a hobby servo accepts.
pub fn clamp_angle(angle: i16) -> u8 {
    angle.clamp(0, 180) as u8
}

#[derive(Debug)]
pub struct Servo<PWM> {
    pwm: PWM,
    angle: Option<u8>,
    max_duty: u32,
    frequency: Hertz<u32>,
    leg_id: Leg,
    joint_id: Joint,
}

impl<PWM> Servo<PWM>
where
    PWM: SetDutyCycle,
{
    pub fn new(pwm: PWM, frequency: Hertz<u32>, leg_id: Leg, joint_id: Joint) -> Self {
        let max_duty = pwm.max_duty_cycle() as u32;
        Self {
            pwm,
            angle: None,
            max_duty,
            frequency,
            leg_id,
            joint_id,
        }
    }

    /// Servo running at the standard 50 Hz refresh rate.
    pub fn standard(pwm: PWM, channel: usize) -> Self {
        Self::new(
            pwm,
            HertzU32::from_raw(SERVO_FREQUENCY_HZ),
            Leg::from(channel / 3),
            Joint::from(channel % 3),
        )
    }

    /// Sets the servo angle in degrees.
    ///
    /// # Arguments
    /// * `angle` - A value between 0 and 180 degrees. Values outside this range are clamped.
    ///
    /// PWM driver failures are logged, not returned.
    pub fn set_angle(&mut self, angle: u8) {
        let angle = angle.min(180);

        //Avoid setting the same angle again
        if self.angle == Some(angle) {
            return;
        }
        self.angle = Some(angle);

        let duty = self.duty_for(angle);
        if let Err(e) = self.pwm.set_duty_cycle(duty) {
            error!(
                "{} {} Error writing angle {:?}",
                self.leg_id, self.joint_id, e
            );
        }
    }

    /// Duty register value producing the pulse for `angle`.
    pub fn duty_for(&self, angle: u8) -> u16 {
        // Linearly interpolate the pulse: 0° -> 544 µs, 180° -> 2400 µs
        let pulse = SERVO_MIN_PULSE_US
            + (angle as u32 * (SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US)) / 180;

        // THE WIDTH OF THE PULSE DRIVES THE ANGLE, NOT FREQ
        let period_us = 1_000_000 / self.frequency.raw();
        ((pulse * self.max_duty) / period_us).min(self.max_duty) as u16
    }

    pub fn angle(&self) -> Option<u8> {
        self.angle
    }

    pub fn into_inner(self) -> PWM {
        self.pwm
    }
}

impl<PWM: SetDutyCycle> Actuator for [Servo<PWM>; SERVO_COUNT] {
    fn write_angle(&mut self, channel: usize, angle: i16) {
        match self.get_mut(channel) {
            Some(servo) => servo.set_angle(clamp_angle(angle)),
            None => error!("no servo on channel {channel}"),
        }
    }
}
