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

//! `reset`, `reset-once` and `reset-get` subcommands.

use x393sata::crosspoint::PathSelector;
use x393sata::error::X393Error;
use x393sata::registers::RegisterIo;
use x393sata::sequencer::ConfigSequencer;
use x393sata::sequencer::reset::ResetCommand;

/// Write `values` to `FPGA_RST_CTRL` in order.
///
/// # Returns: `Result<String, X393Error>`
/// * `Ok(String)` - Empty, progress is logged by the sequencer
/// * `Err(X393Error)` - A register write failed
pub fn reset_handler<R: RegisterIo, P: PathSelector>(
    sata: &ConfigSequencer<R, P>,
    values: Vec<u32>,
) -> Result<String, X393Error> {
    sata.reset(&ResetCommand::from(values))?;
    Ok(String::new())
}

pub fn reset_once_handler<R: RegisterIo, P: PathSelector>(
    sata: &ConfigSequencer<R, P>,
) -> Result<String, X393Error> {
    sata.reset_once()?;
    Ok(String::new())
}

/// Read `FPGA_RST_CTRL`. In dry-run mode this is a simulated value.
pub fn reset_get_handler<R: RegisterIo, P: PathSelector>(
    sata: &ConfigSequencer<R, P>,
) -> Result<String, X393Error> {
    Ok(format!("0x{:X}", sata.reset_get()?))
}
