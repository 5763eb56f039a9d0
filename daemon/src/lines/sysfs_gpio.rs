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

//! Linux sysfs GPIO line provider.
//!
//! # A sysfs map of an exported gpio.
//!
//! ```text
//! /sys/class/gpio
//! ├── export
//! ├── gpio160
//! │   ├── active_low
//! │   ├── direction
//! │   ├── edge
//! │   ├── value
//! │   └── ...
//! ├── gpiochip0
//! └── unexport
//! ```
//! Acquisition exports `gpio<N>` (unless it already exists), writes `active_low`, then
//! writes `high` or `low` to `direction` so the line becomes an output already driving
//! its initial level. `value` carries the logical level, `active_low` applied by the
//! kernel. Release writes `<N>` to `unexport`.

use crate::error::{EINVAL, EIO, X8h7Error};
use crate::lines::line::{ControlLine, Level, LineProvider, LineRequest, Polarity};
use crate::system_io::{fs_read, fs_write};
use log::{error, trace, warn};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SysfsLineProvider {
    gpio_dir: PathBuf,
}

impl SysfsLineProvider {
    /// `gpio_dir` is the sysfs gpio class directory, typically `/sys/class/gpio/`.
    pub fn new(gpio_dir: impl Into<PathBuf>) -> Self {
        SysfsLineProvider {
            gpio_dir: gpio_dir.into(),
        }
    }

    fn configure(&self, line_dir: &Path, request: &LineRequest) -> Result<(), X8h7Error> {
        let active_low = if request.polarity.is_active_low() {
            "1"
        } else {
            "0"
        };
        fs_write(&line_dir.join("active_low"), false, active_low)?;
        let direction = match request.polarity.to_physical(request.initial) {
            Level::High => "high",
            Level::Low => "low",
        };
        fs_write(&line_dir.join("direction"), false, direction)
    }
}

fn acquisition_error(line: &str, err: X8h7Error) -> X8h7Error {
    error!("Failed to acquire {line}: {err}");
    X8h7Error::Acquisition {
        line: line.to_owned(),
        code: err.os_code().unwrap_or(EIO),
    }
}

impl LineProvider for SysfsLineProvider {
    fn acquire(&self, request: &LineRequest) -> Result<Box<dyn ControlLine>, X8h7Error> {
        let Some(gpio) = request.gpio else {
            error!("No gpio number configured for {}", request.name);
            return Err(X8h7Error::Acquisition {
                line: request.name.clone(),
                code: EINVAL,
            });
        };
        let line_dir = self.gpio_dir.join(format!("gpio{gpio}"));
        let unexport = self.gpio_dir.join("unexport");

        let exported_here = !line_dir.exists();
        if exported_here {
            trace!("exporting gpio{gpio} for {}", request.name);
            fs_write(&self.gpio_dir.join("export"), false, gpio.to_string())
                .map_err(|e| acquisition_error(&request.name, e))?;
        } else {
            warn!("gpio{gpio} was already exported, taking it over for {}", request.name);
        }

        if let Err(e) = self.configure(&line_dir, request) {
            if exported_here && let Err(undo) = fs_write(&unexport, false, gpio.to_string()) {
                error!("Failed to unexport gpio{gpio} after a failed acquisition: {undo}");
            }
            return Err(acquisition_error(&request.name, e));
        }

        trace!(
            "acquired {} as gpio{gpio} ({:?}, initial {})",
            request.name, request.polarity, request.initial
        );
        Ok(Box::new(SysfsLine {
            name: request.name.clone(),
            gpio,
            polarity: request.polarity,
            value_path: line_dir.join("value"),
            unexport_path: unexport,
        }))
    }
}

#[derive(Debug)]
pub struct SysfsLine {
    name: String,
    gpio: u32,
    polarity: Polarity,
    value_path: PathBuf,
    unexport_path: PathBuf,
}

impl ControlLine for SysfsLine {
    fn name(&self) -> &str {
        &self.name
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn get(&self) -> Result<Level, X8h7Error> {
        let contents = fs_read(&self.value_path)?;
        match contents.trim() {
            "0" => Ok(Level::Low),
            "1" => Ok(Level::High),
            other => Err(X8h7Error::Internal(format!(
                "{:?} holds unexpected value {other:?}",
                self.value_path
            ))),
        }
    }

    fn set(&mut self, level: Level) -> Result<(), X8h7Error> {
        trace!("{} (gpio{}) := {level}", self.name, self.gpio);
        fs_write(&self.value_path, false, level.to_string())
    }

    fn release(self: Box<Self>) -> Result<(), X8h7Error> {
        trace!("unexporting gpio{} ({})", self.gpio, self.name);
        fs_write(&self.unexport_path, false, self.gpio.to_string())
    }
}
