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

//! `gpio export` and `gpio read` subcommands.

use log::warn;
use std::error::Error;
use x393sata::crosspoint::PathSelector;
use x393sata::gpio::{GpioDirection, PL_GPIO_FIRST, PL_GPIO_LAST, format_gpio_readout};
use x393sata::registers::RegisterIo;
use x393sata::sequencer::ConfigSequencer;

/// Turn `--low`/`--high` into an inclusive range, rejecting reversed bounds.
fn pin_range(low: u32, high: Option<u32>) -> Result<std::ops::RangeInclusive<u32>, String> {
    let high = high.unwrap_or(low);
    if high < low {
        return Err(format!("--high {high} is below --low {low}"));
    }
    if low < PL_GPIO_FIRST || high > PL_GPIO_LAST {
        warn!("pins {low}..={high} reach outside the PL GPIO block {PL_GPIO_FIRST}..={PL_GPIO_LAST}");
    }
    Ok(low..=high)
}

/// Main handler for the gpio command.
///
/// With a `direction` the pins are exported, otherwise they are read.
///
/// # Returns: `Result<String, Box<dyn Error>>`
/// * `Ok(String)` - Readout, or the number of pins exported
/// * `Err(Box<dyn Error>)` - Bad range, or at least one pin failed to export
pub fn gpio_handler<R: RegisterIo, P: PathSelector>(
    sata: &ConfigSequencer<R, P>,
    direction: Option<GpioDirection>,
    low: u32,
    high: Option<u32>,
) -> Result<String, Box<dyn Error>> {
    let pins = pin_range(low, high)?;
    match direction {
        None => Ok(format_gpio_readout(&sata.read_gpio(pins))),
        Some(direction) => {
            let report = sata.export_gpio(direction, pins);
            let failed: Vec<String> = report.failed().map(|p| p.pin.to_string()).collect();
            if failed.is_empty() {
                Ok(format!(
                    "exported {} pins as \"{}\"",
                    report.processed(),
                    direction.as_str()
                ))
            } else {
                Err(format!(
                    "{} of {} pins failed to export: {}",
                    failed.len(),
                    report.processed(),
                    failed.join(" ")
                )
                .into())
            }
        }
    }
}
