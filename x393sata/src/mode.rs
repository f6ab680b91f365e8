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

//! Live versus dry-run execution.
//!
//! The mode is negotiated once, when the board is opened, and then passed by value to
//! every component that can touch hardware. In [`Mode::DryRun`] no register, device file
//! or sysfs attribute is ever written; each such step is replaced by a log record that
//! carries the same payload the live write would have used.

use log::{info, warn};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    DryRun,
}

impl Mode {
    /// Settle the mode for this process.
    ///
    /// A request for [`Mode::Live`] is downgraded to [`Mode::DryRun`] when
    /// `config_device` does not exist, i.e. the program is not running on the board.
    /// A request for [`Mode::DryRun`] is honoured without probing.
    ///
    /// # Arguments
    ///
    /// * `requested` - The mode the caller asked for
    /// * `config_device` - The configuration device file, typically `/dev/xdevcfg`
    ///
    /// # Returns: `Mode`
    /// * The mode every later operation must follow
    pub fn negotiate(requested: Mode, config_device: &Path) -> Mode {
        match requested {
            Mode::Live if !config_device.exists() => {
                warn!(
                    "Forced to run in dry-run mode as {config_device:?} does not exist (not a camera)"
                );
                Mode::DryRun
            }
            Mode::Live => {
                info!("{config_device:?} found, running live");
                Mode::Live
            }
            Mode::DryRun => Mode::DryRun,
        }
    }

    pub fn is_live(self) -> bool {
        self == Mode::Live
    }

    pub fn is_dry_run(self) -> bool {
        self == Mode::DryRun
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Live => write!(f, "live"),
            Mode::DryRun => write!(f, "dry-run"),
        }
    }
}
