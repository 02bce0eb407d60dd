//! Joystick command wire format
//!
//! ```text
//! <percent_x>,<percent_y>,<lift>|
//! ```
//!
//! Plain ASCII decimal integers, comma separated, terminated by `|`.
//! No length prefix, no escaping, no checksum.

use crate::domain::models::LiftState;
use crate::domain::normalizer::NormalizedPosition;
use std::fmt;

/// Terminator appended to every command
pub const COMMAND_TERMINATOR: char = '|';

/// Percentage sent when no finger is on the joystick
pub const NEUTRAL_PERCENT: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickCommand {
    pub percent_x: i32,
    pub percent_y: i32,
    pub lift: LiftState,
}

impl JoystickCommand {
    /// Centered stick with the given lift state
    pub fn neutral(lift: LiftState) -> Self {
        Self {
            percent_x: NEUTRAL_PERCENT,
            percent_y: NEUTRAL_PERCENT,
            lift,
        }
    }

    pub fn at(position: NormalizedPosition, lift: LiftState) -> Self {
        Self {
            percent_x: position.percent_x,
            percent_y: position.percent_y,
            lift,
        }
    }
}

impl fmt::Display for JoystickCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}{}",
            self.percent_x,
            self.percent_y,
            self.lift.value(),
            COMMAND_TERMINATOR
        )
    }
}
