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

//! Line Provider abstraction.
//!
//! The daemon never touches a GPIO directly. It asks a [`LineProvider`] for a
//! [`ControlLine`] by logical name and from then on only uses `get`, `set` and
//! `release` on it. Two providers exist:
//! - [`sysfs_gpio::SysfsLineProvider`] - Linux sysfs GPIO (`/sys/class/gpio`)
//! - [`memory::MemoryLineProvider`] - in-process lines, used for tests and dry runs

pub mod line;
pub mod memory;
pub mod sysfs_gpio;

pub use line::{ControlLine, Level, LineProvider, LineRequest, Polarity};
