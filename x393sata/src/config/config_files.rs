// This file is part of x393sata, an application to bring the x393 SATA FPGA board up together with its clock, reset and signal routing.
//
// Copyright 2025 Elphel, Inc.
//
// SPDX-License-Identifier: GPL-3.0-only
//
// x393sata is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License version 3, as published by the Free Software Foundation.
//
// x393sata is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranties of MERCHANTABILITY, SATISFACTORY QUALITY, or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with this program.  If not, see http://www.gnu.org/licenses/.

use crate::config::system_config::{self, SystemConfig};
use crate::error::X393Error;
use crate::system_io::fs_read;
use log::trace;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub(crate) struct TomlConfig {
    system_paths: Option<SystemPaths>,
}

/// The `[system_paths]` section. Every key is optional so that files can be layered.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct SystemPaths {
    pub config_device: Option<String>,
    pub dev_mem: Option<String>,
    pub si5338_dir: Option<String>,
    pub gpio_dir: Option<String>,
    pub crosspoint_dir: Option<String>,
    pub default_bitfile: Option<String>,
}

impl SystemPaths {
    /// Keep every value set in `self`, taking the rest from `fallback`.
    pub fn merge(self, fallback: SystemPaths) -> SystemPaths {
        SystemPaths {
            config_device: self.config_device.or(fallback.config_device),
            dev_mem: self.dev_mem.or(fallback.dev_mem),
            si5338_dir: self.si5338_dir.or(fallback.si5338_dir),
            gpio_dir: self.gpio_dir.or(fallback.gpio_dir),
            crosspoint_dir: self.crosspoint_dir.or(fallback.crosspoint_dir),
            default_bitfile: self.default_bitfile.or(fallback.default_bitfile),
        }
    }
}

fn path_or(value: Option<String>, name: &str, default: &str) -> PathBuf {
    PathBuf::from(value.unwrap_or_else(|| {
        trace!("No {name} provided. Using hardcoded value.");
        default.to_string()
    }))
}

impl From<SystemPaths> for SystemConfig {
    fn from(value: SystemPaths) -> Self {
        trace!("Creating SystemConfig from {value:?}");
        SystemConfig {
            config_device: path_or(
                value.config_device,
                "config_device",
                system_config::CONFIG_DEVICE,
            ),
            dev_mem: path_or(value.dev_mem, "dev_mem", system_config::DEV_MEM),
            si5338_dir: path_or(value.si5338_dir, "si5338_dir", system_config::SI5338_DIR),
            gpio_dir: path_or(value.gpio_dir, "gpio_dir", system_config::GPIO_DIR),
            crosspoint_dir: path_or(
                value.crosspoint_dir,
                "crosspoint_dir",
                system_config::CROSSPOINT_DIR,
            ),
            default_bitfile: path_or(
                value.default_bitfile,
                "default_bitfile",
                system_config::DEFAULT_BITFILE,
            ),
        }
    }
}

pub(crate) fn toml_str_to_config(toml_string: &str, file: &Path) -> Result<TomlConfig, X393Error> {
    toml::from_str(toml_string).map_err(|e| X393Error::TomlDe {
        file: file.into(),
        e,
    })
}

/// Read the `[system_paths]` section of one configuration file.
///
/// # Returns: `Result<SystemPaths, X393Error>`
/// * `Ok(SystemPaths)` - The section, with unset keys left as `None`
/// * `Err(X393Error::Internal)` - The file does not exist or has no `[system_paths]` section
/// * `Err(X393Error::IORead)` - The file could not be read
/// * `Err(X393Error::TomlDe)` - The file is not valid TOML for this format
pub fn system_paths_config_from_file(file_path: &Path) -> Result<SystemPaths, X393Error> {
    if !file_path.is_file() {
        return Err(X393Error::Internal(format!(
            "Config file not found in {file_path:?}"
        )));
    }
    let config = toml_str_to_config(&fs_read(file_path)?, file_path)?;

    match config.system_paths {
        Some(system_paths) => Ok(system_paths),
        None => Err(X393Error::Internal(format!(
            "{file_path:?} did not contain a `[system_paths]` section."
        ))),
    }
}
