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

//! In-process line provider.
//!
//! Lines live in a table shared between the provider and every line it hands out, so the
//! state can be inspected from outside while the daemon owns the lines. Selected with
//! `backend = "memory"` for dry runs without hardware, and used as the test double for
//! the provider contract.
//!
//! # Examples
//!
//! ```rust
//! # use x8h7rstd::lines::memory::MemoryLineProvider;
//! # use x8h7rstd::lines::{Level, LineProvider, LineRequest, Polarity};
//! # fn example() -> Result<(), x8h7rstd::error::X8h7Error> {
//! let provider = MemoryLineProvider::new();
//! let mut line = provider.acquire(&LineRequest {
//!     name: "reset-line".into(),
//!     gpio: None,
//!     polarity: Polarity::ActiveHigh,
//!     initial: Level::High,
//! })?;
//! line.set(Level::Low)?;
//! assert_eq!(provider.level("reset-line"), Some(Level::Low));
//! line.release()?;
//! assert!(!provider.is_held("reset-line"));
//! # Ok(())
//! # }
//! ```

use crate::error::{EBUSY, X8h7Error};
use crate::lines::line::{ControlLine, Level, LineProvider, LineRequest, Polarity};
use log::trace;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Snapshot of one memory line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLineState {
    pub level: Level,
    pub polarity: Polarity,
    pub held: bool,
}

impl MemoryLineState {
    pub fn physical_level(&self) -> Level {
        self.polarity.to_physical(self.level)
    }
}

/// One `set` call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEvent {
    pub line: String,
    pub level: Level,
    pub at: Instant,
}

#[derive(Debug, Default)]
struct MemoryLines {
    lines: HashMap<String, MemoryLineState>,
    journal: Vec<LineEvent>,
    failures: HashMap<String, i32>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryLineProvider {
    shared: Arc<Mutex<MemoryLines>>,
}

fn lock_lines(shared: &Mutex<MemoryLines>) -> Result<MutexGuard<'_, MemoryLines>, X8h7Error> {
    shared
        .lock()
        .map_err(|_| X8h7Error::Internal("memory line table is poisoned".into()))
}

impl MemoryLineProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following acquisition of `name` fail with `code`.
    pub fn fail_acquire(&self, name: &str, code: i32) {
        if let Ok(mut lines) = lock_lines(&self.shared) {
            lines.failures.insert(name.to_owned(), code);
        }
    }

    pub fn clear_failure(&self, name: &str) {
        if let Ok(mut lines) = lock_lines(&self.shared) {
            lines.failures.remove(name);
        }
    }

    pub fn line_state(&self, name: &str) -> Option<MemoryLineState> {
        lock_lines(&self.shared)
            .ok()
            .and_then(|lines| lines.lines.get(name).copied())
    }

    pub fn level(&self, name: &str) -> Option<Level> {
        self.line_state(name).map(|state| state.level)
    }

    pub fn is_held(&self, name: &str) -> bool {
        self.line_state(name).is_some_and(|state| state.held)
    }

    /// Change a level behind the owner's back, as external hardware would.
    pub fn force_level(&self, name: &str, level: Level) {
        if let Ok(mut lines) = lock_lines(&self.shared)
            && let Some(state) = lines.lines.get_mut(name)
        {
            state.level = level;
        }
    }

    /// Every `set` made through lines of this provider.
    pub fn journal(&self) -> Vec<LineEvent> {
        lock_lines(&self.shared)
            .map(|lines| lines.journal.clone())
            .unwrap_or_default()
    }
}

impl LineProvider for MemoryLineProvider {
    fn acquire(&self, request: &LineRequest) -> Result<Box<dyn ControlLine>, X8h7Error> {
        let mut lines = lock_lines(&self.shared)?;
        if let Some(code) = lines.failures.get(&request.name) {
            return Err(X8h7Error::Acquisition {
                line: request.name.clone(),
                code: *code,
            });
        }
        if lines
            .lines
            .get(&request.name)
            .is_some_and(|state| state.held)
        {
            return Err(X8h7Error::Acquisition {
                line: request.name.clone(),
                code: EBUSY,
            });
        }
        lines.lines.insert(
            request.name.clone(),
            MemoryLineState {
                level: request.initial,
                polarity: request.polarity,
                held: true,
            },
        );
        trace!("acquired memory line {} at {}", request.name, request.initial);
        Ok(Box::new(MemoryLine {
            name: request.name.clone(),
            polarity: request.polarity,
            shared: Arc::clone(&self.shared),
        }))
    }
}

#[derive(Debug)]
struct MemoryLine {
    name: String,
    polarity: Polarity,
    shared: Arc<Mutex<MemoryLines>>,
}

impl MemoryLine {
    fn not_held(&self) -> X8h7Error {
        X8h7Error::Internal(format!("memory line {} is not held", self.name))
    }
}

impl ControlLine for MemoryLine {
    fn name(&self) -> &str {
        &self.name
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn get(&self) -> Result<Level, X8h7Error> {
        let lines = lock_lines(&self.shared)?;
        lines
            .lines
            .get(&self.name)
            .map(|state| state.level)
            .ok_or_else(|| self.not_held())
    }

    fn set(&mut self, level: Level) -> Result<(), X8h7Error> {
        let mut lines = lock_lines(&self.shared)?;
        let state = lines
            .lines
            .get_mut(&self.name)
            .ok_or_else(|| self.not_held())?;
        state.level = level;
        trace!(
            "memory line {} := {level} (physical {})",
            self.name,
            state.physical_level()
        );
        lines.journal.push(LineEvent {
            line: self.name.clone(),
            level,
            at: Instant::now(),
        });
        Ok(())
    }

    fn release(self: Box<Self>) -> Result<(), X8h7Error> {
        let mut lines = lock_lines(&self.shared)?;
        match lines.lines.get_mut(&self.name) {
            Some(state) if state.held => {
                state.held = false;
                trace!("released memory line {}", self.name);
                Ok(())
            }
            _ => Err(self.not_held()),
        }
    }
}
