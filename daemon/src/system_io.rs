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

//! File access for sysfs attributes and configuration files.
//!
//! Failures carry the path (and for writes the data) so that an acquisition error can be
//! traced back to the exact gpio attribute that refused it. The OS error code is kept in
//! the wrapped `io::Error`, see [`X8h7Error::os_code`].
//!
//! ```rust,no_run
//! # use x8h7rstd::system_io::{fs_read, fs_write};
//! # use std::path::Path;
//! # fn example() -> Result<(), x8h7rstd::error::X8h7Error> {
//! let level = fs_read(Path::new("/sys/class/gpio/gpio160/value"))?;
//! fs_write(Path::new("/sys/class/gpio/gpio160/value"), false, "0")?;
//! # Ok(())
//! # }
//! ```

use crate::error::X8h7Error;
use log::trace;
use std::fs::{OpenOptions, read_to_string};
use std::io::Write;
use std::path::Path;

pub fn fs_read(file_path: &Path) -> Result<String, X8h7Error> {
    trace!("reading {file_path:?}");
    read_to_string(file_path).map_err(|e| X8h7Error::IORead {
        file: file_path.into(),
        e,
    })
}

/// Replace the contents of `file_path` with `value`. Unless `create` is set the file must
/// already exist, as sysfs attributes do.
pub fn fs_write(file_path: &Path, create: bool, value: impl AsRef<str>) -> Result<(), X8h7Error> {
    let value = value.as_ref();
    trace!("writing {value:?} to {file_path:?}");
    OpenOptions::new()
        .create(create)
        .write(true)
        .truncate(true)
        .open(file_path)
        .and_then(|mut f| f.write_all(value.as_bytes()))
        .map_err(|e| X8h7Error::IOWrite {
            data: value.to_owned(),
            file: file_path.into(),
            e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    fn write_then_read_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("direction");
        fs_write(&path, true, "high").unwrap();
        fs_write(&path, false, "low").unwrap();
        assert_that!(fs_read(&path), ok(eq("low")));
    }

    #[gtest]
    fn write_without_create_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = fs_write(&dir.path().join("export"), false, "160");
        assert_that!(
            result,
            err(displays_as(contains_substring("X8h7Error::IOWrite")))
        );
    }

    #[gtest]
    fn missing_attribute_keeps_the_os_code() {
        let dir = tempfile::tempdir().unwrap();
        let err = fs_read(&dir.path().join("gpio160/value")).unwrap_err();
        expect_that!(err.os_code(), some(eq(2)));
        expect_that!(err.to_string(), contains_substring("gpio160/value"));
    }
}
