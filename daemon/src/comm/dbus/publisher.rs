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

use crate::comm::dbus::attribute_object_path;
use crate::comm::dbus::reset_interface::ResetInterface;
use crate::error::X8h7Error;
use crate::lifecycle::AttributePublisher;
use crate::reset::device_controller::DeviceController;
use log::info;
use std::sync::Arc;
use zbus::Connection;

/// Serves attributes on the object server of a bus connection.
pub struct DbusPublisher {
    connection: Connection,
}

impl DbusPublisher {
    pub fn new(connection: Connection) -> Self {
        DbusPublisher { connection }
    }
}

impl AttributePublisher for DbusPublisher {
    async fn publish(
        &self,
        attribute: &str,
        controller: Arc<DeviceController>,
    ) -> Result<(), X8h7Error> {
        let path = attribute_object_path(attribute)?;
        let added = self
            .connection
            .object_server()
            .at(path.as_str(), ResetInterface::new(controller))
            .await?;
        if !added {
            return Err(X8h7Error::Internal(format!(
                "{attribute} is already published at {path}"
            )));
        }
        info!("{attribute} published at {path}");
        Ok(())
    }

    async fn unpublish(&self, attribute: &str) -> Result<(), X8h7Error> {
        let path = attribute_object_path(attribute)?;
        let removed = self
            .connection
            .object_server()
            .remove::<ResetInterface, _>(path.as_str())
            .await?;
        if !removed {
            return Err(X8h7Error::Internal(format!(
                "{attribute} was not published at {path}"
            )));
        }
        info!("{attribute} removed from {path}");
        Ok(())
    }
}
