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

//! Attach and detach of one coprocessor.
//!
//! ```text
//! Unattached -> Attaching -> Attached -> Detaching -> Unattached
//! ```
//!
//! Attach acquires both lines, runs the startup sequence and only then publishes the
//! control attribute, so no caller can reach the device while it settles. Detach
//! unpublishes first, forces the held-in-reset pairing, then releases the lines. A
//! failed attach leaves nothing acquired and nothing published.

use crate::config::LineSettings;
use crate::error::X8h7Error;
use crate::lines::{ControlLine, Level, LineProvider, LineRequest};
use crate::reset::device_controller::{DeviceController, LinePair};
use crate::reset::sequencer::run_startup_sequence;
use crate::targets::target::ResetTarget;
use log::{error, info, trace};
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unattached,
    Attaching,
    Attached,
    Detaching,
}

/// Makes the control attribute of an attached device reachable by callers.
pub trait AttributePublisher: Send + Sync {
    fn publish(
        &self,
        attribute: &str,
        controller: Arc<DeviceController>,
    ) -> impl Future<Output = Result<(), X8h7Error>> + Send;

    fn unpublish(&self, attribute: &str) -> impl Future<Output = Result<(), X8h7Error>> + Send;
}

pub struct Lifecycle<P: LineProvider, A: AttributePublisher> {
    target: Box<dyn ResetTarget>,
    provider: P,
    publisher: A,
    reset_settings: LineSettings,
    boot_select_settings: LineSettings,
    state: LifecycleState,
    controller: Option<Arc<DeviceController>>,
}

impl<P: LineProvider, A: AttributePublisher> Lifecycle<P, A> {
    pub fn new(
        target: Box<dyn ResetTarget>,
        provider: P,
        publisher: A,
        reset_settings: LineSettings,
        boot_select_settings: LineSettings,
    ) -> Self {
        Lifecycle {
            target,
            provider,
            publisher,
            reset_settings,
            boot_select_settings,
            state: LifecycleState::Unattached,
            controller: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The controller of the attached device, if any.
    pub fn controller(&self) -> Option<Arc<DeviceController>> {
        self.controller.clone()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn publisher(&self) -> &A {
        &self.publisher
    }

    fn acquire(
        &self,
        name: &str,
        settings: LineSettings,
    ) -> Result<Box<dyn ControlLine>, X8h7Error> {
        // both lines start out driving logical 1
        self.provider.acquire(&LineRequest {
            name: name.to_owned(),
            gpio: settings.gpio,
            polarity: settings.polarity,
            initial: Level::High,
        })
    }

    fn acquire_lines(&self) -> Result<LinePair, X8h7Error> {
        let reset = self.acquire(self.target.reset_line_name(), self.reset_settings)?;
        let boot_select =
            match self.acquire(self.target.boot_select_line_name(), self.boot_select_settings) {
                Ok(line) => line,
                Err(e) => {
                    if let Err(release_err) = reset.release() {
                        error!("Failed to release reset line after failed attach: {release_err}");
                    }
                    return Err(e);
                }
            };
        Ok(LinePair { reset, boot_select })
    }

    /// Acquire, sequence and publish. On any failure the lifecycle is back to
    /// `Unattached` and the error is returned unchanged.
    pub async fn attach(&mut self) -> Result<Arc<DeviceController>, X8h7Error> {
        if self.state != LifecycleState::Unattached {
            return Err(X8h7Error::Lifecycle(format!(
                "Cannot attach {} while {:?}",
                self.target.attribute_name(),
                self.state
            )));
        }
        info!("{} attach started", self.target.attribute_name());
        self.state = LifecycleState::Attaching;
        match self.try_attach().await {
            Ok(controller) => {
                self.controller = Some(Arc::clone(&controller));
                self.state = LifecycleState::Attached;
                info!("{} attached and published", self.target.attribute_name());
                Ok(controller)
            }
            Err(e) => {
                error!("{} attach failed: {e}", self.target.attribute_name());
                self.state = LifecycleState::Unattached;
                Err(e)
            }
        }
    }

    async fn try_attach(&self) -> Result<Arc<DeviceController>, X8h7Error> {
        let attribute = self.target.attribute_name();
        let lines = self.acquire_lines()?;

        // the settle wait blocks, so the sequence runs on the blocking pool
        let settle = self.target.settle_window();
        let (lines, sequenced) = tokio::task::spawn_blocking(move || {
            let mut lines = lines;
            let sequenced = run_startup_sequence(
                lines.reset.as_mut(),
                lines.boot_select.as_mut(),
                &settle,
            );
            (lines, sequenced)
        })
        .await
        .map_err(|e| X8h7Error::Internal(format!("Reset sequence of {attribute} died: {e}")))?;

        if let Err(e) = sequenced {
            if let Err(release_err) = lines.release() {
                error!("Failed to release lines after failed sequence: {release_err}");
            }
            return Err(e);
        }

        let controller = Arc::new(DeviceController::new(attribute, lines));
        if let Err(e) = self
            .publisher
            .publish(attribute, Arc::clone(&controller))
            .await
        {
            trace!("publish failed, tearing down {attribute}");
            match controller.shutdown().and_then(LinePair::release) {
                Ok(()) => {}
                Err(teardown_err) => error!("Teardown after failed publish failed: {teardown_err}"),
            }
            return Err(e);
        }
        Ok(controller)
    }

    /// Unpublish, force reset and release. The lines are released even when
    /// unpublishing fails; that error is returned afterwards.
    pub async fn detach(&mut self) -> Result<(), X8h7Error> {
        if self.state != LifecycleState::Attached {
            return Err(X8h7Error::Lifecycle(format!(
                "Cannot detach {} while {:?}",
                self.target.attribute_name(),
                self.state
            )));
        }
        let attribute = self.target.attribute_name();
        info!("{attribute} detach started");
        self.state = LifecycleState::Detaching;

        let unpublished = self.publisher.unpublish(attribute).await;
        if let Err(e) = &unpublished {
            error!("Failed to unpublish {attribute}: {e}");
        }

        let released = match self.controller.take() {
            Some(controller) => controller.shutdown().and_then(LinePair::release),
            None => Err(X8h7Error::Internal(format!(
                "{attribute} was attached without a controller"
            ))),
        };
        self.state = LifecycleState::Unattached;
        info!("{attribute} detached");
        released.and(unpublished)
    }
}
