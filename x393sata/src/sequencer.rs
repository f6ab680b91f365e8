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

//! Bring-up sequencer for the x393 SATA FPGA.
//!
//! [`ConfigSequencer::bitstream`] walks the PL from an unknown state to a configured,
//! running design with the SSD routed to a safe default:
//!
//! 1. spread spectrum off on SI5338 output 3 (best-effort)
//! 2. FPGA clock 0 stopped
//! 3. PL reset asserted
//! 4. bitstream streamed into the configuration device
//! 5. bounded wait for `PCFG_DONE`
//! 6. FPGA clock 0 running
//! 7. PL reset released
//! 8. SSD routed to the debug path
//!
//! If step 5 times out the sequence stops there, leaving the clock stopped and the reset
//! asserted so that a partially loaded design never runs.
//!
//! Every write goes through the sequencer's [`Mode`]. In dry-run mode registers, the
//! configuration device and sysfs are left untouched and each write is logged with the
//! value and target it would have used.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use x393sata::config::SystemConfig;
//! # use x393sata::mode::Mode;
//! # use x393sata::sequencer::BoardSequencer;
//! # fn example() -> Result<(), x393sata::error::X393Error> {
//! let sata = BoardSequencer::open(Mode::Live, SystemConfig::load())?;
//! let report = sata.bitstream(None, 1)?;
//! if let Some(status) = report.timed_out() {
//!     eprintln!("PL did not configure, INT_STS = 0x{status:X}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod completion;
pub mod reset;

use crate::bitstream::{BitstreamTransfer, TransferSummary, chatty};
use crate::config::SystemConfig;
use crate::crosspoint::{PathSelector, SignalPath, Vsc3304};
use crate::error::X393Error;
use crate::gpio::{self, GpioDirection, GpioReport, PinValue};
use crate::mode::Mode;
use crate::registers::dev_mem::DevMem;
use crate::registers::simulated::SimulatedMem;
use crate::registers::{Register, RegisterIo};
use crate::system_io::fs_write;
use completion::{Completion, CompletionPoll};
use log::{debug, error, info, warn};
use reset::{RESET_OFF, RESET_ON, ResetCommand};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// `FPGA0_THR_CTRL` value stopping FPGA clock 0.
pub const CLOCK_STOP: u32 = 1;

/// `FPGA0_THR_CTRL` value letting FPGA clock 0 run.
pub const CLOCK_RUN: u32 = 0;

/// What one [`ConfigSequencer::bitstream`] call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub mode: Mode,
    pub bitfile: PathBuf,
    /// `None` in dry-run mode.
    pub transfer: Option<TransferSummary>,
    /// Dry-run mode only: what the transfer would have been, `None` if the bitfile size
    /// could not be read.
    pub planned: Option<TransferSummary>,
    /// `None` in dry-run mode, where the done bit is not polled.
    pub completion: Option<Completion>,
    /// Crosspoint status after the default path was selected. `None` when the sequence
    /// stopped before path selection.
    pub connection_status: Option<String>,
}

impl LoadReport {
    /// The last `INT_STS` value when the done bit never appeared.
    pub fn timed_out(&self) -> Option<u32> {
        match self.completion {
            Some(Completion::TimedOut { last_status }) => Some(last_status),
            _ => None,
        }
    }

    /// Whether every step ran, up to and including path selection.
    pub fn finished(&self) -> bool {
        self.connection_status.is_some()
    }
}

pub struct ConfigSequencer<R, P> {
    mode: Mode,
    mem: R,
    crosspoint: P,
    config: SystemConfig,
    poll: CompletionPoll,
}

/// The sequencer as used on the board, with its register backend chosen by mode.
pub type BoardSequencer = ConfigSequencer<Box<dyn RegisterIo>, Vsc3304>;

impl BoardSequencer {
    /// Negotiate the mode and build the matching collaborators.
    ///
    /// In live mode registers are accessed through `config.dev_mem`; in dry-run mode a
    /// [`SimulatedMem`] is used and nothing is opened.
    ///
    /// # Returns: `Result<BoardSequencer, X393Error>`
    /// * `Ok(BoardSequencer)` - Ready to use
    /// * `Err(X393Error::IORead)` - Live mode, but the memory device could not be opened
    pub fn open(requested: Mode, config: SystemConfig) -> Result<BoardSequencer, X393Error> {
        let mode = Mode::negotiate(requested, &config.config_device);
        let mem: Box<dyn RegisterIo> = match mode {
            Mode::Live => Box::new(DevMem::open(&config.dev_mem)?),
            Mode::DryRun => Box::new(SimulatedMem::default()),
        };
        let crosspoint = Vsc3304::new(mode, &config.crosspoint_dir);
        Ok(ConfigSequencer::new(mode, mem, crosspoint, config))
    }
}

impl<R: RegisterIo, P: PathSelector> ConfigSequencer<R, P> {
    pub fn new(mode: Mode, mem: R, crosspoint: P, config: SystemConfig) -> Self {
        debug!("creating sequencer in {mode} mode");
        ConfigSequencer {
            mode,
            mem,
            crosspoint,
            config,
            poll: CompletionPoll::default(),
        }
    }

    pub fn with_completion_poll(mut self, poll: CompletionPoll) -> Self {
        self.poll = poll;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn register_io(&self) -> &R {
        &self.mem
    }

    pub fn path_selector(&self) -> &P {
        &self.crosspoint
    }

    fn write_register(&self, register: Register, value: u32) -> Result<(), X393Error> {
        match self.mode {
            Mode::DryRun => {
                info!("would write 0x{value:X} to {register}");
                Ok(())
            }
            Mode::Live => {
                debug!("writing 0x{value:X} to {register}");
                self.mem.write(register.addr(), value)
            }
        }
    }

    /// Current contents of `FPGA_RST_CTRL`.
    pub fn reset_get(&self) -> Result<u32, X393Error> {
        self.mem.read(Register::ResetControl.addr())
    }

    /// Write each value of `command` to `FPGA_RST_CTRL`, in order.
    ///
    /// [`RESET_ON`] (`0`) holds the PL in reset, [`RESET_OFF`] (`0xA`) releases it.
    pub fn reset(&self, command: &ResetCommand) -> Result<(), X393Error> {
        for &value in command.values() {
            self.write_register(Register::ResetControl, value)?;
        }
        Ok(())
    }

    /// Pulse the PL reset: on, then off.
    pub fn reset_once(&self) -> Result<(), X393Error> {
        self.reset(&ResetCommand::pulse())
    }

    /// Turn spread spectrum off on SI5338 output 3.
    pub fn disable_spread_spectrum(&self) -> Result<(), X393Error> {
        let control = self.config.spread_spectrum_path();
        info!("Spread Spectrum off on channel 3");
        match self.mode {
            Mode::DryRun => {
                info!("would write \"0\" to {control:?}");
                Ok(())
            }
            Mode::Live => fs_write(&control, false, "0\n"),
        }
    }

    /// Configure the PL with `bitfile` (or the configured default) and route the SSD to
    /// the debug path.
    ///
    /// # Arguments
    ///
    /// * `bitfile` - Bitstream to load, `None` for `default_bitfile`
    /// * `quiet` - Progress messages are logged at `info` below 4 and at `debug` otherwise
    ///
    /// # Returns: `Result<LoadReport, X393Error>`
    /// * `Ok(LoadReport)` - The sequence ran to the end, or stopped on a done-bit timeout.
    ///   Check [`LoadReport::timed_out`] before assuming the PL is configured.
    /// * `Err(X393Error::IORead)` / `Err(X393Error::IOWrite)` - The bitstream transfer failed
    /// * `Err(X393Error)` - A register access or the crosspoint driver failed
    pub fn bitstream(&self, bitfile: Option<&Path>, quiet: u8) -> Result<LoadReport, X393Error> {
        let bitfile = bitfile
            .unwrap_or(self.config.default_bitfile.as_path())
            .to_path_buf();
        let mut report = LoadReport {
            mode: self.mode,
            bitfile: bitfile.clone(),
            transfer: None,
            planned: None,
            completion: None,
            connection_status: None,
        };

        if let Err(e) = self.disable_spread_spectrum() {
            warn!("Could not disable spread spectrum, continuing: {e}");
        }

        info!("FPGA clock OFF");
        self.write_register(Register::ClockThresholdControl, CLOCK_STOP)?;
        info!("Reset ON");
        self.reset(&ResetCommand::Single(RESET_ON))?;

        info!("cat {bitfile:?} > {:?}", self.config.config_device);
        let mut transfer = BitstreamTransfer::new(&bitfile, &self.config.config_device, quiet);
        match self.mode {
            Mode::Live => report.transfer = Some(transfer.run()?),
            Mode::DryRun => report.planned = transfer.log_dry_run(),
        }

        progress(quiet, "Wait for DONE");
        match self.mode {
            Mode::Live => {
                let completion = self.poll.wait(&self.mem)?;
                report.completion = Some(completion);
                if let Completion::TimedOut { last_status } = completion {
                    error!(
                        "Timeout waiting for DONE, {}=0x{last_status:X}",
                        Register::InterruptStatus
                    );
                    return Ok(report);
                }
            }
            Mode::DryRun => info!(
                "would poll {} up to {} times, {:?} apart",
                Register::InterruptStatus,
                self.poll.attempts,
                self.poll.interval
            ),
        }

        progress(quiet, "FPGA clock ON");
        self.write_register(Register::ClockThresholdControl, CLOCK_RUN)?;
        progress(quiet, "Reset OFF");
        self.reset(&ResetCommand::Single(RESET_OFF))?;

        report.connection_status = Some(self.select_debug()?);
        info!("Use 'select zynq', 'select esata' or 'select debug' to switch SSD connection");
        Ok(report)
    }

    /// Route the SSD to `path` and return the resulting crosspoint status.
    pub fn select(&self, path: SignalPath) -> Result<String, X393Error> {
        self.crosspoint.connect(path)?;
        let status = self.crosspoint.status()?;
        info!("{path}: {status}");
        Ok(status)
    }

    pub fn select_zynq(&self) -> Result<String, X393Error> {
        self.select(SignalPath::ZynqSsd)
    }

    pub fn select_esata(&self) -> Result<String, X393Error> {
        self.select(SignalPath::EsataSsd)
    }

    pub fn select_debug(&self) -> Result<String, X393Error> {
        self.select(SignalPath::Debug)
    }

    /// See [`gpio::export_gpio`].
    pub fn export_gpio(&self, direction: GpioDirection, pins: RangeInclusive<u32>) -> GpioReport {
        gpio::export_gpio(self.mode, &self.config.gpio_dir, direction, pins)
    }

    /// See [`gpio::read_gpio`].
    pub fn read_gpio(&self, pins: RangeInclusive<u32>) -> Vec<PinValue> {
        gpio::read_gpio(self.mode, &self.config.gpio_dir, pins)
    }
}

fn progress(quiet: u8, message: &str) {
    if chatty(quiet) {
        info!("{message}");
    } else {
        debug!("{message}");
    }
}
