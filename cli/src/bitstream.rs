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

//! `bitstream` subcommand: run the full bring-up sequence.

use log::info;
use std::error::Error;
use std::path::Path;
use x393sata::crosspoint::PathSelector;
use x393sata::registers::RegisterIo;
use x393sata::sequencer::{ConfigSequencer, LoadReport};

/// Render what a load did as a single line for the terminal.
fn summarize(report: &LoadReport) -> String {
    let loaded = match (report.transfer, report.planned) {
        (Some(summary), _) => format!(
            "loaded {} bytes in {} chunks from {:?}",
            summary.bytes, summary.chunks, report.bitfile
        ),
        (None, Some(plan)) => format!(
            "{} mode, would load {} bytes in {} chunks from {:?}",
            report.mode, plan.bytes, plan.chunks, report.bitfile
        ),
        (None, None) => format!("{} mode, nothing loaded from {:?}", report.mode, report.bitfile),
    };
    match &report.connection_status {
        Some(status) => format!("{loaded}; ssd: {status}"),
        None => loaded,
    }
}

/// Main handler for the bitstream command.
///
/// # Arguments
///
/// * `sata` - Sequencer for the board
/// * `file` - Bitstream to load, `None` for the configured default
/// * `quiet` - Quiet level passed to the sequencer
///
/// # Returns: `Result<String, Box<dyn Error>>`
/// * `Ok(String)` - Summary of the load
/// * `Err(Box<dyn Error>)` - The load failed or the done bit never appeared
pub fn bitstream_handler<R: RegisterIo, P: PathSelector>(
    sata: &ConfigSequencer<R, P>,
    file: Option<&Path>,
    quiet: u8,
) -> Result<String, Box<dyn Error>> {
    let report = sata.bitstream(file, quiet)?;
    info!("{}", summarize(&report));
    if let Some(status) = report.timed_out() {
        return Err(format!(
            "PL configuration from {:?} did not complete, INT_STS=0x{status:X}",
            report.bitfile
        )
        .into());
    }
    Ok(summarize(&report))
}
