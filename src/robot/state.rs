use super::commands::Command;
use super::config::{INITIAL_DISTANCE_CM, MAX_RANGE_CM};
use log::debug;

/// Last received command and last valid obstacle distance.
///
/// Owned by the control loop and lent by `&mut` to whoever reads or writes
/// it: the serial link sets the command, the range finder the distance, and
/// the gait engine reads both (and forces a stop on obstacles).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    command: Command,
    distance_cm: u16,
}

impl ControlState {
    pub const fn new() -> Self {
        Self {
            command: Command::Stop,
            distance_cm: INITIAL_DISTANCE_CM,
        }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn set_command(&mut self, command: Command) {
        self.command = command;
    }

    pub fn distance_cm(&self) -> u16 {
        self.distance_cm
    }

    /// Store a range sample. Zero (no echo) and samples beyond the sensor
    /// range keep the previous value. Returns whether the sample was taken.
    pub fn set_distance(&mut self, sample_cm: u16) -> bool {
        if sample_cm == 0 || sample_cm > MAX_RANGE_CM {
            debug!("discarding range sample {sample_cm}");
            return false;
        }
        self.distance_cm = sample_cm;
        true
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}
