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

//! Reset target registry.
//!
//! A [`ResetTarget`] describes one kind of coprocessor wiring: the names of its two lines,
//! the name of the attribute it is published under and the settle window its reset
//! controller needs. Targets register themselves under a device-tree style compatible
//! string with the `#[controller]` macro, and the daemon picks one from the `compatible`
//! value of its configuration.
//!
//! Compatible strings are comma-separated components. A requested string matches a
//! registered one when every requested component is present in it, so
//! `"portenta,x8h7rst"`, `"x8h7rst"` and `"portenta"` all select the Portenta X8 target.
//!
//! # Examples
//!
//! in [main.rs]:
//! ```rust,no_run
//! # use x8h7rstd::targets::portenta_x8h7::PortentaX8h7;
//! # use x8h7rstd::targets::target::target_for_compatible;
//! # fn example() -> Result<(), x8h7rstd::error::X8h7Error> {
//! PortentaX8h7::register_controller();
//! let target = target_for_compatible("portenta,x8h7rst")?;
//! assert_eq!(target.attribute_name(), "x8h7_reset");
//! # Ok(())
//! # }
//! ```

use crate::error::X8h7Error;
use crate::reset::sequencer::SettleWindow;
use log::trace;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

type TargetConstructor = fn() -> Box<dyn ResetTarget>;

pub static TARGET_REGISTRY: OnceLock<Mutex<HashMap<&'static str, TargetConstructor>>> =
    OnceLock::new();

pub trait ResetTarget: Any + Send + Sync {
    /// Name of the published read/write attribute.
    fn attribute_name(&self) -> &str;

    fn reset_line_name(&self) -> &str;

    fn boot_select_line_name(&self) -> &str;

    fn settle_window(&self) -> SettleWindow;
}

fn registry() -> MutexGuard<'static, HashMap<&'static str, TargetConstructor>> {
    TARGET_REGISTRY
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn match_compatible_string(compatible: &str) -> Result<Box<dyn ResetTarget>, X8h7Error> {
    let registry = registry();
    for (registered, constructor) in registry.iter() {
        let compat_set: HashSet<&str> = registered.split(',').collect();
        if compatible.split(',').all(|x| compat_set.contains(x)) {
            trace!("'{compatible}' matched '{registered}'");
            return Ok(constructor());
        }
    }

    Err(X8h7Error::Argument(format!(
        "x8h7rstd could not match '{compatible}' to a known reset target."
    )))
}

pub fn target_for_compatible(compatible: &str) -> Result<Box<dyn ResetTarget>, X8h7Error> {
    match_compatible_string(compatible)
}

pub fn register_controller(compatible: &'static str, constructor: TargetConstructor) {
    trace!("registering reset target '{compatible}'");
    registry().insert(compatible, constructor);
}

pub fn registered_compatibles() -> Vec<&'static str> {
    let mut compatibles: Vec<&'static str> = registry().keys().copied().collect();
    compatibles.sort_unstable();
    compatibles
}
