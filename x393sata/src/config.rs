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

//! Runtime configuration.
//!
//! Board-specific paths are read from TOML files so that a board with a different sysfs
//! layout can be brought up without rebuilding. Two files are consulted, the vendor file
//! [`VENDOR_CONFIG_PATH`] and the user file [`USER_CONFIG_PATH`], with user values taking
//! precedence. Any path missing from both falls back to a hardcoded default.
//!
//! ```toml
//! [system_paths]
//! config_device = "/dev/xdevcfg"
//! gpio_dir = "/sys/class/gpio"
//! default_bitfile = "/usr/local/verilog/x393_sata.bit"
//! ```
//!
//! Register addresses, the transfer chunk size and the completion poll parameters are
//! fixed properties of the board and are not part of the file format.

pub mod config_files;
pub mod system_config;

pub use system_config::SystemConfig;

/// Vendor-supplied configuration, lowest precedence.
pub static VENDOR_CONFIG_PATH: &str = "/usr/lib/x393sata/config.toml";

/// Administrator configuration, overrides the vendor file.
pub static USER_CONFIG_PATH: &str = "/etc/x393sata/config.toml";
