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

//! DBus proxy for the x8h7rstd daemon.
//!
//! # DBus Service Information
//!
//! - **Service Name**: `org.arduino.x8h7rstd`
//! - **Reset Interface**: `org.arduino.x8h7rstd.reset` at `/org/arduino/x8h7rstd/<attribute>`
//!
//! The daemon publishes one object per attached device. The Portenta X8 H7 is published
//! as `x8h7_reset`.

pub mod reset_proxy;

use reset_proxy::ResetProxy;
use zbus::Connection;

pub static OBJECT_ROOT: &str = "/org/arduino/x8h7rstd";

/// Connect to the system bus and build a proxy for `attribute`.
pub async fn reset_proxy_for(attribute: &str) -> Result<ResetProxy<'static>, zbus::Error> {
    let connection = Connection::system().await?;
    ResetProxy::builder(&connection)
        .path(format!("{OBJECT_ROOT}/{attribute}"))?
        .build()
        .await
}
