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

use crate::reset::device_controller::DeviceController;
use log::info;
use std::sync::Arc;
use zbus::{fdo, interface};

/// Read/write attribute of one attached coprocessor.
///
/// `Read` returns the state code followed by a newline: `0` held in reset, `1` running,
/// `2` indeterminate. `Write` takes `"0"` or `"1"` (surrounding whitespace allowed) and
/// returns the number of bytes consumed.
pub struct ResetInterface {
    controller: Arc<DeviceController>,
}

impl ResetInterface {
    pub fn new(controller: Arc<DeviceController>) -> Self {
        ResetInterface { controller }
    }
}

#[interface(name = "org.arduino.x8h7rstd.reset")]
impl ResetInterface {
    async fn read(&self) -> Result<String, fdo::Error> {
        info!("read called on {}", self.controller.attribute());
        Ok(self.controller.show()?)
    }

    async fn write(&self, data: &str) -> Result<u64, fdo::Error> {
        info!(
            "write called on {} with data: {data:?}",
            self.controller.attribute()
        );
        let consumed = self.controller.store(data)?;
        Ok(consumed as u64)
    }
}
