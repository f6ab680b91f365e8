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

//! PS GPIO pins wired to the PL, driven through the GPIO sysfs class.
//!
//! Both helpers are best-effort across a pin range: a pin that cannot be exported or read
//! is recorded and logged, and the remaining pins are still processed.

use crate::error::X393Error;
use crate::mode::Mode;
use crate::system_io::{fs_read, fs_write};
use log::{info, warn};
use std::fmt::Write;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;

/// Lowest EMIO GPIO connected to the PL.
pub const PL_GPIO_FIRST: u32 = 54;

/// Highest EMIO GPIO connected to the PL.
pub const PL_GPIO_LAST: u32 = 117;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpioDirection {
    #[default]
    In,
    Out,
}

impl GpioDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            GpioDirection::In => "in",
            GpioDirection::Out => "out",
        }
    }
}

impl FromStr for GpioDirection {
    type Err = X393Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(GpioDirection::In),
            "out" => Ok(GpioDirection::Out),
            other => Err(X393Error::Argument(format!(
                "{other:?} is not a GPIO direction, expected \"in\" or \"out\""
            ))),
        }
    }
}

/// What happened to one pin during [`export_gpio`]. An empty `errors` means success.
#[derive(Debug)]
pub struct PinOutcome {
    pub pin: u32,
    pub errors: Vec<X393Error>,
}

impl PinOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct GpioReport {
    pub pins: Vec<PinOutcome>,
}

impl GpioReport {
    pub fn processed(&self) -> usize {
        self.pins.len()
    }

    pub fn all_ok(&self) -> bool {
        self.pins.iter().all(PinOutcome::is_ok)
    }

    pub fn failed(&self) -> impl Iterator<Item = &PinOutcome> {
        self.pins.iter().filter(|outcome| !outcome.is_ok())
    }
}

/// One pin level from [`read_gpio`]; `None` when the pin could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinValue {
    pub pin: u32,
    pub value: Option<u8>,
}

/// Export every pin in `pins` and set its direction.
///
/// Each pin gets two writes, its number to `<gpio_dir>/export` and `direction` to
/// `<gpio_dir>/gpio<N>/direction`. The direction is written even when the export fails,
/// since the kernel refuses to export a pin that is already exported.
///
/// # Arguments
///
/// * `mode` - In [`Mode::DryRun`] the writes are only logged
/// * `gpio_dir` - Root of the GPIO sysfs class, typically `/sys/class/gpio`
/// * `direction` - Direction to configure
/// * `pins` - Inclusive pin range
///
/// # Returns: `GpioReport`
/// * One [`PinOutcome`] per pin in the range, in ascending order
pub fn export_gpio(
    mode: Mode,
    gpio_dir: &Path,
    direction: GpioDirection,
    pins: RangeInclusive<u32>,
) -> GpioReport {
    let listing = pins.clone().fold(String::new(), |mut s, pin| {
        let _ = write!(s, " {pin}");
        s
    });
    info!("Exporting as \"{}\":{listing}", direction.as_str());

    let export_path = gpio_dir.join("export");
    let mut report = GpioReport::default();
    for pin in pins {
        let direction_path = gpio_dir.join(format!("gpio{pin}")).join("direction");
        let mut errors = Vec::new();
        if mode.is_dry_run() {
            info!("would write \"{pin}\" to {export_path:?}");
            info!(
                "would write {:?} to {direction_path:?}",
                direction.as_str()
            );
        } else {
            if let Err(e) = fs_write(&export_path, false, format!("{pin}\n")) {
                warn!("failed \"echo {pin} > {export_path:?}\": {e}");
                errors.push(e);
            }
            if let Err(e) = fs_write(&direction_path, false, format!("{}\n", direction.as_str()))
            {
                warn!(
                    "failed \"echo {} > {direction_path:?}\": {e}",
                    direction.as_str()
                );
                errors.push(e);
            }
        }
        report.pins.push(PinOutcome { pin, errors });
    }
    report
}

/// Read the level of every pin in `pins`, highest pin first.
///
/// # Arguments
///
/// * `mode` - In [`Mode::DryRun`] nothing is read and every value is unknown
/// * `gpio_dir` - Root of the GPIO sysfs class, typically `/sys/class/gpio`
/// * `pins` - Inclusive pin range
///
/// # Returns: `Vec<PinValue>`
/// * One entry per pin, `value` is `None` for pins that could not be read
pub fn read_gpio(mode: Mode, gpio_dir: &Path, pins: RangeInclusive<u32>) -> Vec<PinValue> {
    let readout: Vec<PinValue> = pins
        .rev()
        .map(|pin| {
            let value_path = gpio_dir.join(format!("gpio{pin}")).join("value");
            let value = match mode {
                Mode::DryRun => None,
                Mode::Live => match fs_read(&value_path).map(|s| parse_level(&s)) {
                    Ok(Some(level)) => Some(level),
                    Ok(None) => {
                        warn!("{value_path:?} does not hold a pin level");
                        None
                    }
                    Err(e) => {
                        warn!("failed to read gpio{pin}: {e}");
                        None
                    }
                },
            };
            PinValue { pin, value }
        })
        .collect();
    info!("{}", format_gpio_readout(&readout));
    readout
}

fn parse_level(contents: &str) -> Option<u8> {
    match contents.chars().next() {
        Some('0') => Some(0),
        Some('1') => Some(1),
        _ => None,
    }
}

/// Render a readout as `gpio <high>.<low>: <bits>`, highest pin first, with a `.` every
/// four pins counted from the low end and `X` for unknown pins.
pub fn format_gpio_readout(readout: &[PinValue]) -> String {
    let (Some(high), Some(low)) = (readout.first(), readout.last()) else {
        return String::from("gpio: no pins");
    };
    let mut out = format!("gpio {}.{}: ", high.pin, low.pin);
    for reading in readout {
        if reading.pin != high.pin && (reading.pin.saturating_sub(low.pin) + 1) % 4 == 0 {
            out.push('.');
        }
        match reading.value {
            Some(level) => {
                let _ = write!(out, "{level}");
            }
            None => out.push('X'),
        }
    }
    out
}
