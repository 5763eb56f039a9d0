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

//! Daemon configuration.
//!
//! User config overrides vendor config and vendor config overrides hardcoded defaults,
//! field by field. Both files are optional.
//!
//! ```toml
//! [device]
//! compatible = "portenta,x8h7rst"
//! backend = "sysfs"            # or "memory"
//!
//! [system_paths]
//! gpio_sysfs_dir = "/sys/class/gpio/"
//!
//! [lines.reset]
//! gpio = 160
//! active_low = false
//!
//! [lines.boot_select]
//! gpio = 161
//! ```

use crate::error::X8h7Error;
use crate::lines::Polarity;
use crate::system_io::fs_read;
use log::{trace, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Vendor configuration, shipped with the package.
pub static VENDOR_CONFIG_PATH: &str = "/usr/lib/x8h7rstd/config.toml";

/// User configuration, overrides the vendor file.
pub static USER_CONFIG_PATH: &str = "/etc/x8h7rstd/config.toml";

/// The driver-decided location of the sysfs gpio class. Typically `/sys/class/gpio/`.
pub static GPIO_SYSFS_DIR: &str = "/sys/class/gpio/";

/// Device identity used when no configuration names one.
pub static DEFAULT_COMPATIBLE: &str = "portenta,x8h7rst";

pub static DBUS_SERVICE_NAME: &str = "org.arduino.x8h7rstd";

/// Attributes are served at `<root>/<attribute name>`.
pub static DBUS_OBJECT_ROOT: &str = "/org/arduino/x8h7rstd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sysfs,
    Memory,
}

#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    device: Option<DeviceSection>,
    system_paths: Option<SystemPaths>,
    lines: Option<LinesSection>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub(crate) struct DeviceSection {
    compatible: Option<String>,
    backend: Option<Backend>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub(crate) struct SystemPaths {
    gpio_sysfs_dir: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub(crate) struct LinesSection {
    reset: Option<LineSection>,
    boot_select: Option<LineSection>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
pub(crate) struct LineSection {
    gpio: Option<u32>,
    active_low: Option<bool>,
}

impl DeviceSection {
    fn merge(self, fallback: DeviceSection) -> DeviceSection {
        DeviceSection {
            compatible: self.compatible.or(fallback.compatible),
            backend: self.backend.or(fallback.backend),
        }
    }
}

impl SystemPaths {
    fn merge(self, fallback: SystemPaths) -> SystemPaths {
        SystemPaths {
            gpio_sysfs_dir: self.gpio_sysfs_dir.or(fallback.gpio_sysfs_dir),
        }
    }
}

impl LineSection {
    fn merge(self, fallback: LineSection) -> LineSection {
        LineSection {
            gpio: self.gpio.or(fallback.gpio),
            active_low: self.active_low.or(fallback.active_low),
        }
    }
}

impl LinesSection {
    fn merge(self, fallback: LinesSection) -> LinesSection {
        LinesSection {
            reset: merge_option(self.reset, fallback.reset, LineSection::merge),
            boot_select: merge_option(self.boot_select, fallback.boot_select, LineSection::merge),
        }
    }
}

fn merge_option<T>(primary: Option<T>, fallback: Option<T>, merge: fn(T, T) -> T) -> Option<T> {
    match (primary, fallback) {
        (Some(p), Some(f)) => Some(merge(p, f)),
        (p, f) => p.or(f),
    }
}

impl TomlConfig {
    fn merge(self, fallback: TomlConfig) -> TomlConfig {
        TomlConfig {
            device: merge_option(self.device, fallback.device, DeviceSection::merge),
            system_paths: merge_option(
                self.system_paths,
                fallback.system_paths,
                SystemPaths::merge,
            ),
            lines: merge_option(self.lines, fallback.lines, LinesSection::merge),
        }
    }
}

/// Where one line lives and how it is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineSettings {
    pub gpio: Option<u32>,
    pub polarity: Polarity,
}

impl From<LineSection> for LineSettings {
    fn from(value: LineSection) -> Self {
        LineSettings {
            gpio: value.gpio,
            polarity: Polarity::from_active_low(value.active_low.unwrap_or(false)),
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DaemonConfig {
    pub compatible: String,
    pub backend: Backend,
    pub gpio_sysfs_dir: PathBuf,
    pub reset_line: LineSettings,
    pub boot_select_line: LineSettings,
}

impl From<TomlConfig> for DaemonConfig {
    fn from(value: TomlConfig) -> Self {
        trace!("Creating DaemonConfig from {value:?}");
        let device = value.device.unwrap_or_default();
        let paths = value.system_paths.unwrap_or_default();
        let lines = value.lines.unwrap_or_default();
        DaemonConfig {
            compatible: device.compatible.unwrap_or_else(|| {
                trace!("No compatible provided. Using hardcoded value.");
                DEFAULT_COMPATIBLE.to_string()
            }),
            backend: device.backend.unwrap_or_default(),
            gpio_sysfs_dir: PathBuf::from(paths.gpio_sysfs_dir.unwrap_or_else(|| {
                trace!("No gpio_sysfs_dir provided. Using hardcoded value.");
                GPIO_SYSFS_DIR.to_string()
            })),
            reset_line: lines.reset.unwrap_or_default().into(),
            boot_select_line: lines.boot_select.unwrap_or_default().into(),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

fn toml_str_to_config(toml_string: &str) -> Result<TomlConfig, X8h7Error> {
    toml::from_str(toml_string).map_err(|e| X8h7Error::TomlDe {
        toml_string: toml_string.into(),
        e,
    })
}

fn toml_config_from_file(file_path: &Path) -> Result<TomlConfig, X8h7Error> {
    if !file_path.is_file() {
        return Err(X8h7Error::Argument(format!(
            "Config file not found in {file_path:?}"
        )));
    }
    toml_str_to_config(&fs_read(file_path)?)
}

/// Parse a single configuration document, without any merging.
#[cfg(test)]
fn config_from_str(toml_string: &str) -> Result<DaemonConfig, X8h7Error> {
    Ok(toml_str_to_config(toml_string)?.into())
}

/// Load the vendor file and `user_path`, merge them and fill in defaults. A file that is
/// missing or fails to parse is skipped with a warning.
pub fn load_config(vendor_path: &Path, user_path: &Path) -> DaemonConfig {
    let vendor_config = toml_config_from_file(vendor_path).unwrap_or_else(|e| {
        warn!("Using hardcoded values for vendor config because loading config failed: {e}");
        TomlConfig::default()
    });
    let user_config = toml_config_from_file(user_path).unwrap_or_else(|e| {
        warn!("Using hardcoded values for user config because loading config failed: {e}");
        TomlConfig::default()
    });
    trace!("Merging user_config: {user_config:?} with vendor_config {vendor_config:?}");
    let merged: DaemonConfig = user_config.merge(vendor_config).into();
    trace!("Resulting config: {merged:?}");
    merged
}
