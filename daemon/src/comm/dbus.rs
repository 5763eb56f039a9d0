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

//! D-Bus surface of the daemon.
//!
//! Each published attribute is an object under [`DBUS_OBJECT_ROOT`] named after the
//! attribute, implementing `org.arduino.x8h7rstd.reset`.

pub mod publisher;
pub mod reset_interface;

use crate::config::DBUS_OBJECT_ROOT;
use crate::error::X8h7Error;

/// Object path an attribute is served at.
pub fn attribute_object_path(attribute: &str) -> Result<String, X8h7Error> {
    if attribute.is_empty()
        || !attribute
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(X8h7Error::Argument(format!(
            "{attribute:?} is not a valid attribute name: only ASCII letters, digits and '_' are allowed"
        )));
    }
    Ok(format!("{DBUS_OBJECT_ROOT}/{attribute}"))
}
