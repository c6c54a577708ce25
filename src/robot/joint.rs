//! Joint enumeration and display helpers.
//!
//! Defines the [`Joint`] enum for identifying each joint (coxa, femur, tibia),
//! and provides display formatting for debugging and logging.
use core::fmt::Display;

/// Joints of one leg, proximal to distal. The discriminant is the channel
/// offset inside the leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    Coxa = 0,
    Femur = 1,
    Tibia = 2,
}

impl Joint {
    pub const ALL: [Joint; 3] = [Joint::Coxa, Joint::Femur, Joint::Tibia];
}

impl Display for Joint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Joint::Coxa => f.write_str("coxa"),
            Joint::Femur => f.write_str("femur"),
            Joint::Tibia => f.write_str("tibia"),
        }
    }
}

impl From<usize> for Joint {
    fn from(value: usize) -> Self {
        match value % 3 {
            0 => Joint::Coxa,
            1 => Joint::Femur,
            _ => Joint::Tibia,
        }
    }
}
