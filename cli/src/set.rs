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

//! Write commands: `reset`, `release`, `write` and `cycle`.
//!
//! Every command writes through the daemon and reports the state read back afterwards.
//! Invalid values are rejected by the daemon, not here, so the daemon's message is shown.

use crate::proxies::reset_proxy::ResetProxy;
use crate::proxies::reset_proxy_for;
use crate::status::format_status;
use log::debug;
use std::time::Duration;

pub static HOLD_IN_RESET: &str = "0";
pub static RELEASE: &str = "1";

async fn write_and_report(
    proxy: &ResetProxy<'_>,
    attribute: &str,
    value: &str,
) -> Result<String, zbus::Error> {
    let consumed = proxy.write(value).await?;
    debug!("{attribute} consumed {consumed} bytes of {value:?}");
    let raw = proxy.read().await?;
    Ok(format_status(attribute, &raw))
}

pub async fn write_handler(attribute: &str, value: &str) -> Result<String, zbus::Error> {
    let proxy = reset_proxy_for(attribute).await?;
    write_and_report(&proxy, attribute, value).await
}

/// Hold the device in reset for `hold`, then let it run.
pub async fn cycle_handler(attribute: &str, hold: Duration) -> Result<String, zbus::Error> {
    let proxy = reset_proxy_for(attribute).await?;
    proxy.write(HOLD_IN_RESET).await?;
    tokio::time::sleep(hold).await;
    write_and_report(&proxy, attribute, RELEASE).await
}
