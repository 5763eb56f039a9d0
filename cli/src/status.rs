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

//! Status command implementation.
//!
//! Reads the attribute and decodes the state code the daemon returns.

use crate::proxies::reset_proxy_for;

/// Human readable name of a state code as returned by `Read`.
pub fn describe_state(raw: &str) -> &'static str {
    match raw.trim() {
        "0" => "held-in-reset",
        "1" => "running",
        "2" => "indeterminate",
        _ => "unknown",
    }
}

pub fn format_status(attribute: &str, raw: &str) -> String {
    format!(
        "---- DEVICE ----\n\
        | attribute | state |\n\
        | {attribute} | {} ({}) |",
        raw.trim(),
        describe_state(raw)
    )
}

pub async fn status_handler(attribute: &str) -> Result<String, zbus::Error> {
    let proxy = reset_proxy_for(attribute).await?;
    let raw = proxy.read().await?;
    Ok(format_status(attribute, &raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;
    use rstest::*;

    #[gtest]
    #[rstest]
    #[case::held("0\n", "held-in-reset")]
    #[case::running("1\n", "running")]
    #[case::indeterminate("2\n", "indeterminate")]
    #[case::garbage("7\n", "unknown")]
    #[case::empty("", "unknown")]
    fn decodes_state(#[case] raw: &str, #[case] expected: &str) {
        expect_that!(describe_state(raw), eq(expected));
    }

    #[gtest]
    fn status_line_shows_code_and_name() {
        expect_that!(
            format_status("x8h7_reset", "1\n"),
            ends_with("| x8h7_reset | 1 (running) |")
        );
    }
}
