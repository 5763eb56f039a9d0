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

//! Reset and boot-mode control for the STM32H7 coprocessor of the Portenta X8.
//!
//! The coprocessor is driven through two output lines, a reset line and a boot-select
//! line. Their combined levels are exposed as one logical state:
//!
//! | reset | boot-select | state               |
//! |-------|-------------|---------------------|
//! | 0     | 1           | `0` held in reset   |
//! | 1     | 0           | `1` running         |
//! | other | other       | `2` indeterminate   |
//!
//! See [`lifecycle`] for attach and detach, [`reset`] for the controller itself and
//! [`lines`] for the line backends.

pub mod comm;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod lines;
pub mod reset;
pub mod system_io;
pub mod targets;
