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

//! SATA signal routing through the VSC3304 crosspoint switch.
//!
//! The switch connects the SSD to exactly one of the Zynq SATA host, the external eSATA
//! connector, or the debug port. Selecting a path implicitly drops the previous one; that
//! exclusivity is enforced by the switch driver and not tracked here.

use crate::error::X393Error;
use crate::mode::Mode;
use crate::system_io::{fs_read, fs_write};
use log::{info, trace};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalPath {
    ZynqSsd,
    EsataSsd,
    Debug,
}

impl SignalPath {
    /// Token understood by the crosspoint driver's `connection` attribute.
    pub const fn token(self) -> &'static str {
        match self {
            SignalPath::ZynqSsd => "zynq_ssd",
            SignalPath::EsataSsd => "esata_ssd",
            SignalPath::Debug => "debug",
        }
    }
}

impl fmt::Display for SignalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for SignalPath {
    type Err = X393Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "zynq" | "zynq_ssd" => Ok(SignalPath::ZynqSsd),
            "esata" | "esata_ssd" => Ok(SignalPath::EsataSsd),
            "debug" => Ok(SignalPath::Debug),
            other => Err(X393Error::Argument(format!(
                "{other:?} is not a signal path, expected zynq, esata or debug"
            ))),
        }
    }
}

/// Anything that can route the SSD signals.
pub trait PathSelector {
    /// Route the SSD to `path`.
    ///
    /// # Returns: `Result<(), X393Error>`
    /// * `Ok(())` - The switch accepted the new route (or, in dry-run mode, would have)
    /// * `Err(X393Error::IOWrite)` - The driver rejected the request
    fn connect(&self, path: SignalPath) -> Result<(), X393Error>;

    /// Human readable description of the current routing.
    ///
    /// # Returns: `Result<String, X393Error>`
    /// * `Ok(String)` - Status as reported by the driver
    /// * `Err(X393Error::IORead)` - The driver status could not be read
    fn status(&self) -> Result<String, X393Error>;
}

impl<T: PathSelector + ?Sized> PathSelector for &T {
    fn connect(&self, path: SignalPath) -> Result<(), X393Error> {
        (**self).connect(path)
    }

    fn status(&self) -> Result<String, X393Error> {
        (**self).status()
    }
}

/// The VSC3304 as exposed by its sysfs driver node.
#[derive(Debug, Clone)]
pub struct Vsc3304 {
    mode: Mode,
    sysfs_dir: PathBuf,
}

impl Vsc3304 {
    pub fn new(mode: Mode, sysfs_dir: &Path) -> Vsc3304 {
        Vsc3304 {
            mode,
            sysfs_dir: sysfs_dir.into(),
        }
    }

    fn connection_path(&self) -> PathBuf {
        self.sysfs_dir.join("connection")
    }
}

impl PathSelector for Vsc3304 {
    fn connect(&self, path: SignalPath) -> Result<(), X393Error> {
        let attribute = self.connection_path();
        match self.mode {
            Mode::DryRun => {
                info!("would write {:?} to {attribute:?}", path.token());
                Ok(())
            }
            Mode::Live => {
                trace!("connecting {path}");
                fs_write(&attribute, false, format!("{}\n", path.token()))
            }
        }
    }

    fn status(&self) -> Result<String, X393Error> {
        match self.mode {
            Mode::DryRun => Ok(String::from(
                "crosspoint status is not available in dry-run mode",
            )),
            Mode::Live => fs_read(&self.connection_path()).map(|s| s.trim_end().to_string()),
        }
    }
}
