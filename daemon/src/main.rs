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

//! x8h7rstd - System service owning the reset and boot-select lines of the Portenta X8 H7.
//!
//! At startup the daemon:
//! 1. Registers all known reset targets
//! 2. Loads the vendor and user configuration
//! 3. Connects to the system DBus and claims `org.arduino.x8h7rstd`
//! 4. Attaches the device: acquires both lines, runs the reset sequence, publishes the
//!    `x8h7_reset` attribute at `/org/arduino/x8h7rstd/x8h7_reset`
//! 5. Waits for SIGINT or SIGTERM, then detaches: the attribute is removed, the H7 is
//!    held in reset and the lines are released
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (`trace`, `debug`, `info`, `warn`, `error`
//!   or `off`). Defaults to `info`
//!
//! # Examples
//!
//! ```bash
//! # Run with the installed configuration
//! x8h7rstd
//!
//! # Run against another user configuration with debug logging
//! RUST_LOG=debug x8h7rstd --config ./config.toml
//! ```

use clap::Parser;
use log::{debug, error, info};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::signal::unix::{SignalKind, signal};
use x8h7rstd::comm::dbus::publisher::DbusPublisher;
use x8h7rstd::config::{
    Backend, DBUS_SERVICE_NAME, DaemonConfig, USER_CONFIG_PATH, VENDOR_CONFIG_PATH, load_config,
};
use x8h7rstd::error::X8h7Error;
use x8h7rstd::lifecycle::Lifecycle;
use x8h7rstd::lines::LineProvider;
use x8h7rstd::lines::memory::MemoryLineProvider;
use x8h7rstd::lines::sysfs_gpio::SysfsLineProvider;
use x8h7rstd::targets::portenta_x8h7::PortentaX8h7;
use x8h7rstd::targets::target::{ResetTarget, registered_compatibles, target_for_compatible};
use zbus::connection;

#[derive(Parser, Debug)]
#[command(name = "x8h7rstd", version, about)]
struct Cli {
    /// User configuration file, merged over the vendor configuration
    #[arg(long, default_value = USER_CONFIG_PATH)]
    config: PathBuf,
}

/// Register all reset target implementations.
fn register_controllers() {
    PortentaX8h7::register_controller();
}

async fn wait_for_shutdown() -> Result<(), X8h7Error> {
    let mut terminate = signal(SignalKind::terminate())
        .map_err(|e| X8h7Error::Internal(format!("Failed to install SIGTERM handler: {e}")))?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res.map_err(|e| X8h7Error::Internal(format!("Failed to wait for SIGINT: {e}")))?;
            info!("SIGINT received");
        }
        _ = terminate.recv() => info!("SIGTERM received"),
    }
    Ok(())
}

/// Attach, serve until asked to stop, detach.
async fn run<P: LineProvider>(
    mut lifecycle: Lifecycle<P, DbusPublisher>,
) -> Result<(), X8h7Error> {
    lifecycle.attach().await?;
    info!("Started {DBUS_SERVICE_NAME} dbus service");
    let waited = wait_for_shutdown().await;
    if let Err(e) = &waited {
        error!("{e}");
    }
    lifecycle.detach().await?;
    waited
}

fn lifecycle_for<P: LineProvider>(
    target: Box<dyn ResetTarget>,
    provider: P,
    publisher: DbusPublisher,
    config: &DaemonConfig,
) -> Lifecycle<P, DbusPublisher> {
    Lifecycle::new(
        target,
        provider,
        publisher,
        config.reset_line,
        config.boot_select_line,
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    register_controllers();
    debug!("Known reset targets: {:?}", registered_compatibles());

    let config = load_config(Path::new(VENDOR_CONFIG_PATH), &cli.config);
    let target = target_for_compatible(&config.compatible)?;

    let conn = connection::Builder::system()?
        .name(DBUS_SERVICE_NAME)?
        .build()
        .await?;
    let publisher = DbusPublisher::new(conn);

    match config.backend {
        Backend::Sysfs => {
            let provider = SysfsLineProvider::new(config.gpio_sysfs_dir.clone());
            run(lifecycle_for(target, provider, publisher, &config)).await?
        }
        Backend::Memory => {
            info!("Using in-memory lines: no hardware will be driven");
            run(lifecycle_for(target, MemoryLineProvider::new(), publisher, &config)).await?
        }
    }
    Ok(())
}
