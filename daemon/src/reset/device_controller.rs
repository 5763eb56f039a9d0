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

//! Owner of the reset and boot-select lines for one coprocessor.
//!
//! The [`DeviceController`] is the only thing allowed to touch the lines after the
//! startup sequence. Reads and writes take the same lock, so a reader never sees the
//! in-between pairing that exists while a command drives its two lines one after the
//! other. After [`DeviceController::shutdown`] the controller holds no lines and every
//! access fails with [`X8h7Error::NotReady`].

use crate::error::X8h7Error;
use crate::lines::ControlLine;
use crate::reset::sequencer::drive_lines;
use crate::reset::state::{LogicalState, ResetCommand, classify, parse_command};
use log::{error, info};
use std::sync::{Mutex, MutexGuard};

/// The two lines of one coprocessor.
#[derive(Debug)]
pub struct LinePair {
    pub reset: Box<dyn ControlLine>,
    pub boot_select: Box<dyn ControlLine>,
}

impl LinePair {
    pub fn drive(&mut self, command: ResetCommand) -> Result<(), X8h7Error> {
        drive_lines(self.reset.as_mut(), self.boot_select.as_mut(), command)
    }

    pub fn classify(&self) -> Result<LogicalState, X8h7Error> {
        Ok(classify(self.reset.get()?, self.boot_select.get()?))
    }

    /// Release both lines. Both releases are attempted; the first failure is returned.
    pub fn release(self) -> Result<(), X8h7Error> {
        let reset = self.reset.release();
        let boot_select = self.boot_select.release();
        if let Err(e) = &boot_select {
            error!("Failed to release boot-select line: {e}");
        }
        reset.and(boot_select)
    }
}

#[derive(Debug)]
pub struct DeviceController {
    attribute: String,
    lines: Mutex<Option<LinePair>>,
}

impl DeviceController {
    pub fn new(attribute: &str, lines: LinePair) -> Self {
        DeviceController {
            attribute: attribute.to_owned(),
            lines: Mutex::new(Some(lines)),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<LinePair>>, X8h7Error> {
        self.lines.lock().map_err(|_| {
            X8h7Error::Internal(format!("{} line lock is poisoned", self.attribute))
        })
    }

    fn not_ready(&self) -> X8h7Error {
        X8h7Error::NotReady(format!(
            "{} has no lines: the device is not attached",
            self.attribute
        ))
    }

    pub fn read(&self) -> Result<LogicalState, X8h7Error> {
        let guard = self.lock()?;
        guard.as_ref().ok_or_else(|| self.not_ready())?.classify()
    }

    pub fn write(&self, command: ResetCommand) -> Result<(), X8h7Error> {
        let mut guard = self.lock()?;
        let lines = guard.as_mut().ok_or_else(|| self.not_ready())?;
        lines.drive(command)?;
        info!("{} set to {}", self.attribute, command.target_state());
        Ok(())
    }

    /// Attribute read: the state code followed by a newline.
    pub fn show(&self) -> Result<String, X8h7Error> {
        Ok(format!("{}\n", self.read()?.code()))
    }

    /// Attribute write. Returns the number of bytes consumed, which is all of them.
    /// Nothing is driven unless `input` is a valid command.
    pub fn store(&self, input: &str) -> Result<usize, X8h7Error> {
        // readiness is reported ahead of parse errors
        if self.lock()?.is_none() {
            return Err(self.not_ready());
        }
        let command = parse_command(input).inspect_err(|e| error!("{}: {e}", self.attribute))?;
        self.write(command)?;
        Ok(input.len())
    }

    /// Force the held-in-reset pairing and hand the lines back for release. Whatever was
    /// last commanded is overridden.
    pub fn shutdown(&self) -> Result<LinePair, X8h7Error> {
        let mut guard = self.lock()?;
        let mut lines = guard.take().ok_or_else(|| self.not_ready())?;
        if let Err(e) = lines.drive(ResetCommand::HoldInReset) {
            // lines are still handed back so the caller can release them
            error!("Failed to force {} into reset: {e}", self.attribute);
        }
        info!("{} is now under reset and cannot be used", self.attribute);
        Ok(lines)
    }
}
