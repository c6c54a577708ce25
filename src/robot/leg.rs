use core::fmt::Display;

use super::joint::Joint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    FrontLeft = 0,
    BottomLeft = 1,
    FrontRight = 2,
    BottomRight = 3,
}

impl Leg {
    pub const ALL: [Leg; 4] = [
        Leg::FrontLeft,
        Leg::BottomLeft,
        Leg::FrontRight,
        Leg::BottomRight,
    ];

    /// Physical channel index driving `joint` of this leg.
    pub const fn channel(self, joint: Joint) -> usize {
        self as usize * 3 + joint as usize
    }
}

impl Display for Leg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Leg::FrontLeft => f.write_str("Front left"),
            Leg::FrontRight => f.write_str("Front right"),
            Leg::BottomLeft => f.write_str("Bottom left"),
            Leg::BottomRight => f.write_str("Bottom right"),
        }
    }
}

impl From<usize> for Leg {
    fn from(value: usize) -> Self {
        match value {
            0 => Leg::FrontLeft,
            1 => Leg::BottomLeft,
            2 => Leg::FrontRight,
            _ => Leg::BottomRight,
        }
    }
}
