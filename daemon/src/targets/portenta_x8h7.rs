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

//! The STM32H7 coprocessor of the Portenta X8.
//!
//! Two lines are wired from the i.MX8 to the H7:
//! - `reset-line` - NRST of the H7, low holds it in reset
//! - `boot-select-line` - BOOT0 of the H7, sampled when NRST is released
//!
//! The attribute is published as `x8h7_reset`.

use crate::reset::sequencer::SettleWindow;
use crate::targets::target::ResetTarget;
use log::trace;
use std::time::Duration;
use x8h7rst_macros::controller;

pub const ATTRIBUTE_NAME: &str = "x8h7_reset";
pub const RESET_LINE_NAME: &str = "reset-line";
pub const BOOT_SELECT_LINE_NAME: &str = "boot-select-line";
pub const SETTLE_WINDOW: SettleWindow =
    SettleWindow::new(Duration::from_millis(50), Duration::from_millis(51));

#[controller(compatible = "portenta,x8h7rst")]
#[derive(Debug, Default)]
pub struct PortentaX8h7 {}

impl PortentaX8h7 {
    pub fn new() -> Self {
        trace!("creating new portenta_x8h7 target");
        PortentaX8h7 {}
    }
}

impl ResetTarget for PortentaX8h7 {
    fn attribute_name(&self) -> &str {
        ATTRIBUTE_NAME
    }

    fn reset_line_name(&self) -> &str {
        RESET_LINE_NAME
    }

    fn boot_select_line_name(&self) -> &str {
        BOOT_SELECT_LINE_NAME
    }

    fn settle_window(&self) -> SettleWindow {
        SETTLE_WINDOW
    }
}
