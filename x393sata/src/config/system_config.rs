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

use crate::config::config_files::{SystemPaths, system_paths_config_from_file};
use crate::config::{USER_CONFIG_PATH, VENDOR_CONFIG_PATH};
use log::{trace, warn};
use std::path::{Path, PathBuf};

/// Configuration device file the kernel accepts bitstreams on.
pub static CONFIG_DEVICE: &str = "/dev/xdevcfg";

/// Physical memory device used for register access.
pub static DEV_MEM: &str = "/dev/mem";

/// sysfs node of the SI5338 clock generator.
pub static SI5338_DIR: &str = "/sys/devices/amba.0/e0004000.ps7-i2c/i2c-0/0-0070";

/// Root of the GPIO sysfs class.
pub static GPIO_DIR: &str = "/sys/class/gpio";

/// sysfs node of the VSC3304 crosspoint switch.
pub static CROSSPOINT_DIR: &str = "/sys/devices/amba.0/e0004000.ps7-i2c/i2c-0/0-0001";

/// Bitstream loaded when the caller does not name one.
pub static DEFAULT_BITFILE: &str = "/usr/local/verilog/x393_sata.bit";

/// Resolved board paths. Built once at startup and handed to every component that needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub config_device: PathBuf,
    pub dev_mem: PathBuf,
    pub si5338_dir: PathBuf,
    pub gpio_dir: PathBuf,
    pub crosspoint_dir: PathBuf,
    pub default_bitfile: PathBuf,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemPaths::default().into()
    }
}

impl SystemConfig {
    /// Load the vendor and user configuration files, user values winning.
    pub fn load() -> SystemConfig {
        Self::from_files(&[Path::new(USER_CONFIG_PATH), Path::new(VENDOR_CONFIG_PATH)])
    }

    /// Layer the given files, earlier files taking precedence over later ones.
    ///
    /// A file that is missing or fails to parse is logged and skipped; it never prevents
    /// the board from being brought up with the remaining values.
    pub fn from_files(files: &[&Path]) -> SystemConfig {
        let merged = files
            .iter()
            .map(|file| {
                system_paths_config_from_file(file).unwrap_or_else(|e| {
                    warn!("Using hardcoded paths in place of {file:?}: {e}");
                    SystemPaths::default()
                })
            })
            .fold(SystemPaths::default(), SystemPaths::merge);
        trace!("Merged system paths: {merged:?}");
        merged.into()
    }

    /// Path of the spread spectrum control for clock output 3.
    pub fn spread_spectrum_path(&self) -> PathBuf {
        self.si5338_dir.join("spread_spectrum").join("ss3_values")
    }
}
