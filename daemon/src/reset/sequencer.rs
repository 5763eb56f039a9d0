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

//! Startup reset sequence.
//!
//! Run once per attach, before the control attribute is published:
//! 1. reset := 0, boot-select := 1 (held in reset, boot source latched)
//! 2. wait for the settle window
//! 3. reset := 1, boot-select := 0 (released, boots from its configured program)

use crate::error::X8h7Error;
use crate::lines::ControlLine;
use crate::reset::state::ResetCommand;
use log::{info, trace, warn};
use std::time::{Duration, Instant};

/// Bounds of the reset assertion time. The coprocessor needs at least `min` to reset
/// cleanly; waiting past `max` only delays attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleWindow {
    pub min: Duration,
    pub max: Duration,
}

impl SettleWindow {
    pub const fn new(min: Duration, max: Duration) -> Self {
        SettleWindow { min, max }
    }

    /// Block for at least `min`. Returns the time actually waited.
    pub fn wait(&self) -> Duration {
        let start = Instant::now();
        std::thread::sleep(self.min);
        let waited = start.elapsed();
        if waited > self.max {
            warn!(
                "Settle wait overran: {waited:?} (window {:?}..={:?})",
                self.min, self.max
            );
        }
        waited
    }
}

/// Drive both lines to the pair for `command`, reset line first.
pub fn drive_lines(
    reset_line: &mut dyn ControlLine,
    boot_select_line: &mut dyn ControlLine,
    command: ResetCommand,
) -> Result<(), X8h7Error> {
    let (reset, boot_select) = command.levels();
    trace!(
        "{} ({:?}) := {reset}, {} ({:?}) := {boot_select}",
        reset_line.name(),
        reset_line.polarity(),
        boot_select_line.name(),
        boot_select_line.polarity()
    );
    reset_line.set(reset)?;
    boot_select_line.set(boot_select)
}

pub fn run_startup_sequence(
    reset_line: &mut dyn ControlLine,
    boot_select_line: &mut dyn ControlLine,
    settle: &SettleWindow,
) -> Result<(), X8h7Error> {
    info!("Reset sequence started");
    info!(" (0) reset 0, boot-select 1");
    drive_lines(reset_line, boot_select_line, ResetCommand::HoldInReset)?;
    info!(" (1) wait ~{} ms", settle.min.as_millis());
    let waited = settle.wait();
    trace!("settled after {waited:?}");
    info!(" (2) reset 1, boot-select 0");
    drive_lines(reset_line, boot_select_line, ResetCommand::Release)?;
    info!("Reset sequence finished, device can now be used");
    Ok(())
}
