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

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use x8h7rstd::config::LineSettings;
use x8h7rstd::error::X8h7Error;
use x8h7rstd::lifecycle::{AttributePublisher, Lifecycle};
use x8h7rstd::lines::Level;
use x8h7rstd::lines::memory::MemoryLineProvider;
use x8h7rstd::reset::device_controller::DeviceController;
use x8h7rstd::targets::portenta_x8h7::{BOOT_SELECT_LINE_NAME, PortentaX8h7, RESET_LINE_NAME};

pub static ATTRIBUTE: &str = "x8h7_reset";

/// Publisher standing in for the bus: keeps published controllers in a table that the
/// tests use as an external caller would.
#[derive(Clone, Default)]
pub struct TablePublisher {
    published: Arc<Mutex<HashMap<String, Arc<DeviceController>>>>,
    fail_publish: Arc<AtomicBool>,
    fail_unpublish: Arc<AtomicBool>,
}

impl TablePublisher {
    pub fn fail_publish(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::SeqCst);
    }

    pub fn fail_unpublish(&self, fail: bool) {
        self.fail_unpublish.store(fail, Ordering::SeqCst);
    }

    pub fn is_published(&self, attribute: &str) -> bool {
        self.published.lock().unwrap().contains_key(attribute)
    }

    fn lookup(&self, attribute: &str) -> Result<Arc<DeviceController>, X8h7Error> {
        self.published
            .lock()
            .unwrap()
            .get(attribute)
            .cloned()
            .ok_or_else(|| X8h7Error::Argument(format!("no such attribute {attribute}")))
    }

    /// Attribute read, as seen by a caller.
    pub fn read(&self, attribute: &str) -> Result<String, X8h7Error> {
        self.lookup(attribute)?.show()
    }

    /// Attribute write, as seen by a caller.
    pub fn write(&self, attribute: &str, data: &str) -> Result<usize, X8h7Error> {
        self.lookup(attribute)?.store(data)
    }
}

impl AttributePublisher for TablePublisher {
    async fn publish(
        &self,
        attribute: &str,
        controller: Arc<DeviceController>,
    ) -> Result<(), X8h7Error> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(X8h7Error::Internal(format!("cannot publish {attribute}")));
        }
        self.published
            .lock()
            .unwrap()
            .insert(attribute.to_owned(), controller);
        Ok(())
    }

    async fn unpublish(&self, attribute: &str) -> Result<(), X8h7Error> {
        self.published.lock().unwrap().remove(attribute);
        if self.fail_unpublish.load(Ordering::SeqCst) {
            return Err(X8h7Error::Internal(format!("cannot unpublish {attribute}")));
        }
        Ok(())
    }
}

pub struct Fixture {
    pub provider: MemoryLineProvider,
    pub publisher: TablePublisher,
    pub lifecycle: Lifecycle<MemoryLineProvider, TablePublisher>,
}

pub fn fixture() -> Fixture {
    let provider = MemoryLineProvider::new();
    let publisher = TablePublisher::default();
    let lifecycle = Lifecycle::new(
        Box::new(PortentaX8h7::new()),
        provider.clone(),
        publisher.clone(),
        LineSettings::default(),
        LineSettings::default(),
    );
    Fixture {
        provider,
        publisher,
        lifecycle,
    }
}

/// Last driven (reset, boot-select) levels, as numbers.
pub fn levels(provider: &MemoryLineProvider) -> (u8, u8) {
    let level = |name| provider.level(name).map(Level::as_u8).unwrap_or(u8::MAX);
    (level(RESET_LINE_NAME), level(BOOT_SELECT_LINE_NAME))
}

pub fn nothing_held(provider: &MemoryLineProvider) -> bool {
    !provider.is_held(RESET_LINE_NAME) && !provider.is_held(BOOT_SELECT_LINE_NAME)
}
