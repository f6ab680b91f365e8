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

//! Zynq PS registers touched while configuring the PL, and the access primitive for them.
//!
//! The sequencer never dereferences addresses itself; every access goes through a
//! [`RegisterIo`] so that the same code runs against `/dev/mem` on the board, against the
//! [`SimulatedMem`](simulated::SimulatedMem) stand-in in dry-run mode, and against
//! recording mocks in tests.

pub mod dev_mem;
pub mod simulated;

use crate::error::X393Error;
use std::fmt;

/// PL reset control (`SLCR.FPGA_RST_CTRL`).
pub const FPGA_RST_CTRL: u32 = 0xF800_0240;

/// PL clock 0 throttle control (`SLCR.FPGA0_THR_CTRL`).
pub const FPGA0_THR_CTRL: u32 = 0xF800_0178;

/// Device configuration interrupt status (`DEVCFG.INT_STS`).
pub const INT_STS: u32 = 0xF800_700C;

/// `PCFG_DONE` bit of [`INT_STS`], set once the PL is configured.
pub const INT_STS_PCFG_DONE: u32 = 1 << 2;

/// The fixed set of registers the sequencer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    ResetControl,
    ClockThresholdControl,
    InterruptStatus,
}

impl Register {
    pub const fn addr(self) -> u32 {
        match self {
            Register::ResetControl => FPGA_RST_CTRL,
            Register::ClockThresholdControl => FPGA0_THR_CTRL,
            Register::InterruptStatus => INT_STS,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Register::ResetControl => "FPGA_RST_CTRL",
            Register::ClockThresholdControl => "FPGA0_THR_CTRL",
            Register::InterruptStatus => "INT_STS",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [0x{:08X}]", self.name(), self.addr())
    }
}

/// 32-bit register access.
pub trait RegisterIo {
    /// Read the 32-bit register at `addr`.
    ///
    /// # Returns: `Result<u32, X393Error>`
    /// * `Ok(u32)` - Register contents
    /// * `Err(X393Error::RegisterMap)` - The register could not be mapped
    /// * `Err(X393Error::Argument)` - `addr` is not 4-byte aligned
    fn read(&self, addr: u32) -> Result<u32, X393Error>;

    /// Write `value` to the 32-bit register at `addr`.
    ///
    /// # Returns: `Result<(), X393Error>`
    /// * `Ok(())` - Write issued
    /// * `Err(X393Error::RegisterMap)` - The register could not be mapped
    /// * `Err(X393Error::Argument)` - `addr` is not 4-byte aligned
    fn write(&self, addr: u32, value: u32) -> Result<(), X393Error>;
}

impl<T: RegisterIo + ?Sized> RegisterIo for &T {
    fn read(&self, addr: u32) -> Result<u32, X393Error> {
        (**self).read(addr)
    }

    fn write(&self, addr: u32, value: u32) -> Result<(), X393Error> {
        (**self).write(addr, value)
    }
}

impl<T: RegisterIo + ?Sized> RegisterIo for Box<T> {
    fn read(&self, addr: u32) -> Result<u32, X393Error> {
        (**self).read(addr)
    }

    fn write(&self, addr: u32, value: u32) -> Result<(), X393Error> {
        (**self).write(addr, value)
    }
}
