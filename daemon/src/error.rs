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

use log::error;
use std::path::PathBuf;
use zbus::fdo;

/// errno used when a line could not be obtained and the OS gave no code.
pub const EIO: i32 = 5;
/// errno used when a line is already owned by someone else.
pub const EBUSY: i32 = 16;
/// errno used when a line request is incomplete.
pub const EINVAL: i32 = 22;

#[derive(Debug, thiserror::Error)]
pub enum X8h7Error {
    #[error("X8h7Error::Acquisition: Failed to acquire {line}: error code {code}")]
    Acquisition { line: String, code: i32 },
    #[error("X8h7Error::InvalidCommand: {0}")]
    InvalidCommand(String),
    #[error("X8h7Error::NotReady: {0}")]
    NotReady(String),
    #[error("X8h7Error::Argument: {0}")]
    Argument(String),
    #[error("X8h7Error::Lifecycle: {0}")]
    Lifecycle(String),
    #[error("X8h7Error::IORead: An IO error occurred when reading from {file:?}: {e}")]
    IORead { file: PathBuf, e: std::io::Error },
    #[error("X8h7Error::IOWrite: An IO error occurred when writing {data:?} to {file:?}: {e}")]
    IOWrite {
        data: String,
        file: PathBuf,
        e: std::io::Error,
    },
    #[error("X8h7Error::TomlDe: Failed to parse {toml_string:?}: {e}")]
    TomlDe {
        toml_string: String,
        e: toml::de::Error,
    },
    #[error("X8h7Error::DBus: {0}")]
    DBus(#[from] zbus::Error),
    #[error("X8h7Error::Internal: An Internal error occurred: {0}")]
    Internal(String),
}

impl X8h7Error {
    /// The OS error code carried by an IO variant, if there is one.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            X8h7Error::IORead { e, .. } | X8h7Error::IOWrite { e, .. } => e.raw_os_error(),
            X8h7Error::Acquisition { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<X8h7Error> for fdo::Error {
    fn from(err: X8h7Error) -> Self {
        error!("{err}");
        match err {
            X8h7Error::InvalidCommand(..) => fdo::Error::InvalidArgs(err.to_string()),
            X8h7Error::Argument(..) => fdo::Error::InvalidArgs(err.to_string()),
            X8h7Error::IORead { .. } => fdo::Error::IOError(err.to_string()),
            X8h7Error::IOWrite { .. } => fdo::Error::IOError(err.to_string()),
            _ => fdo::Error::Failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;
    use rstest::*;

    #[gtest]
    #[rstest]
    #[case::invalid_command(X8h7Error::InvalidCommand("5".into()), "InvalidArgs")]
    #[case::argument(X8h7Error::Argument("bad".into()), "InvalidArgs")]
    #[case::not_ready(X8h7Error::NotReady("detached".into()), "Failed")]
    #[case::acquisition(X8h7Error::Acquisition { line: "reset-line".into(), code: EBUSY }, "Failed")]
    #[case::io_read(
        X8h7Error::IORead {
            file: "/sys/class/gpio/gpio1/value".into(),
            e: std::io::Error::from_raw_os_error(2),
        },
        "IOError"
    )]
    fn maps_to_dbus_error(#[case] err: X8h7Error, #[case] expected_variant: &str) {
        let message = err.to_string();
        let dbus_err = fdo::Error::from(err);
        expect_that!(format!("{dbus_err:?}"), starts_with(expected_variant));
        expect_that!(dbus_err.to_string(), contains_substring(message));
    }

    #[gtest]
    fn acquisition_error_surfaces_code() {
        let err = X8h7Error::Acquisition {
            line: "boot-select-line".into(),
            code: EBUSY,
        };
        expect_that!(err.os_code(), some(eq(EBUSY)));
        expect_that!(
            err.to_string(),
            eq("X8h7Error::Acquisition: Failed to acquire boot-select-line: error code 16")
        );
    }
}
