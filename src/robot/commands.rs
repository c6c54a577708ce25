//! Locomotion commands received over the serial link.
//!
//! The peer sends one token per line. Only four tokens move the robot; every
//! other line, `stop` included, leaves it standing.
use core::fmt::Display;
use core::str::FromStr;

use super::state::ControlState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    Forward,
    Backward,
    Left,
    Right,
    #[default]
    Stop,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseCommandError;

impl Display for ParseCommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("unrecognised command token")
    }
}

/// Strict parser: only the exact tokens (after trimming) are accepted.
impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "forward" => Ok(Command::Forward),
            "back" => Ok(Command::Backward),
            "left" => Ok(Command::Left),
            "right" => Ok(Command::Right),
            "stop" => Ok(Command::Stop),
            _ => Err(ParseCommandError),
        }
    }
}

/// Lenient conversion used for incoming lines: unknown text means stop.
impl From<&str> for Command {
    fn from(value: &str) -> Self {
        value.parse().unwrap_or(Command::Stop)
    }
}

impl Command {
    /// Token the peer uses for this command.
    pub const fn token(self) -> &'static str {
        match self {
            Command::Forward => "forward",
            Command::Backward => "back",
            Command::Left => "left",
            Command::Right => "right",
            Command::Stop => "stop",
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.token())
    }
}

/// Something that may deliver a new command when asked.
///
/// Polled by the gait engine between two leg steps. Must not block.
pub trait CommandSource {
    fn poll(&mut self, state: &mut ControlState);
}

impl<S: CommandSource + ?Sized> CommandSource for &mut S {
    fn poll(&mut self, state: &mut ControlState) {
        (**self).poll(state)
    }
}
