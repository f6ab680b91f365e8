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

//! `select` subcommand: route the SSD through the crosspoint switch.

use x393sata::crosspoint::{PathSelector, SignalPath};
use x393sata::error::X393Error;
use x393sata::registers::RegisterIo;
use x393sata::sequencer::ConfigSequencer;

/// Main handler for the select command.
///
/// # Returns: `Result<String, X393Error>`
/// * `Ok(String)` - Crosspoint status after the switch
/// * `Err(X393Error)` - The crosspoint driver rejected the path or could not be read
pub fn select_handler<R: RegisterIo, P: PathSelector>(
    sata: &ConfigSequencer<R, P>,
    path: SignalPath,
) -> Result<String, X393Error> {
    match path {
        SignalPath::ZynqSsd => sata.select_zynq(),
        SignalPath::EsataSsd => sata.select_esata(),
        SignalPath::Debug => sata.select_debug(),
    }
}
