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

use crate::error::X8h7Error;
use std::fmt;

/// Logical drive level of a control line, after polarity has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn as_u8(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Electrical polarity of a line. Fixed when the line is acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    #[default]
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    pub fn from_active_low(active_low: bool) -> Polarity {
        if active_low {
            Polarity::ActiveLow
        } else {
            Polarity::ActiveHigh
        }
    }

    pub fn is_active_low(self) -> bool {
        self == Polarity::ActiveLow
    }

    /// The level seen on the pin for a given logical level.
    pub fn to_physical(self, logical: Level) -> Level {
        match (self, logical) {
            (Polarity::ActiveHigh, level) => level,
            (Polarity::ActiveLow, Level::Low) => Level::High,
            (Polarity::ActiveLow, Level::High) => Level::Low,
        }
    }
}

/// Everything a provider needs to hand out one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRequest {
    /// Logical name, e.g. `reset-line`.
    pub name: String,
    /// Hardware line number. Providers that don't map to hardware ignore it.
    pub gpio: Option<u32>,
    pub polarity: Polarity,
    /// Level driven as a side effect of acquisition.
    pub initial: Level,
}

/// A digital output owned exclusively by whoever acquired it.
pub trait ControlLine: fmt::Debug + Send {
    fn name(&self) -> &str;

    fn polarity(&self) -> Polarity;

    fn get(&self) -> Result<Level, X8h7Error>;

    fn set(&mut self, level: Level) -> Result<(), X8h7Error>;

    /// Give the line back to its provider. The line can be acquired again afterwards.
    fn release(self: Box<Self>) -> Result<(), X8h7Error>;
}

/// Source of control lines.
///
/// `acquire` either returns a fully usable line or an [`X8h7Error::Acquisition`]; a failed
/// acquisition never leaves the requested line held.
pub trait LineProvider: Send + Sync {
    fn acquire(&self, request: &LineRequest) -> Result<Box<dyn ControlLine>, X8h7Error>;
}
