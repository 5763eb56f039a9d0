// This file is part of x8h7rstd, an application to manage the reset and boot-mode lines of the Portenta X8 H7 coprocessor.
//
// Copyright 2025 Canonical Ltd.
//
// SPDX-License-Identifier: GPL-3.0-only
//
// x8h7rstd is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License version 3, as published by the Free Software Foundation.
//
// x8h7rstd is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranties of MERCHANTABILITY, SATISFACTORY QUALITY, or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with this program.  If not, see http://www.gnu.org/licenses/.

//! Logical state of the coprocessor and the commands that change it.
//!
//! | reset line | boot-select line | state |
//! |---|---|---|
//! | 0 | 1 | [`LogicalState::HeldInReset`] (`0`) |
//! | 1 | 0 | [`LogicalState::Running`] (`1`) |
//! | anything else | | [`LogicalState::Indeterminate`] (`2`) |

use crate::error::X8h7Error;
use crate::lines::Level;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LogicalState {
    HeldInReset = 0,
    Running = 1,
    Indeterminate = 2,
}

impl LogicalState {
    /// The number reported through the published attribute.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for LogicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalState::HeldInReset => "held-in-reset",
            LogicalState::Running => "running",
            LogicalState::Indeterminate => "indeterminate",
        };
        f.write_str(name)
    }
}

/// Map a pair of line levels to a logical state. Never repairs anything.
pub fn classify(reset: Level, boot_select: Level) -> LogicalState {
    match (reset, boot_select) {
        (Level::Low, Level::High) => LogicalState::HeldInReset,
        (Level::High, Level::Low) => LogicalState::Running,
        _ => LogicalState::Indeterminate,
    }
}

/// A request to move the coprocessor into one of the two canonical states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCommand {
    HoldInReset,
    Release,
}

impl ResetCommand {
    /// (reset line, boot-select line) levels for this command.
    pub fn levels(self) -> (Level, Level) {
        match self {
            ResetCommand::HoldInReset => (Level::Low, Level::High),
            ResetCommand::Release => (Level::High, Level::Low),
        }
    }

    pub fn target_state(self) -> LogicalState {
        match self {
            ResetCommand::HoldInReset => LogicalState::HeldInReset,
            ResetCommand::Release => LogicalState::Running,
        }
    }
}

/// Parse attribute input. Surrounding whitespace and a sign are accepted; only `0` and
/// `1` are valid values.
pub fn parse_command(input: &str) -> Result<ResetCommand, X8h7Error> {
    let value: i64 = input.trim().parse().map_err(|e| {
        X8h7Error::InvalidCommand(format!(
            "Cannot parse {input:?} as an integer: {e} (expected 0 or 1)"
        ))
    })?;
    match value {
        0 => Ok(ResetCommand::HoldInReset),
        1 => Ok(ResetCommand::Release),
        _ => Err(X8h7Error::InvalidCommand(format!(
            "Invalid value for reset state: {value} (expected 0 or 1)"
        ))),
    }
}
