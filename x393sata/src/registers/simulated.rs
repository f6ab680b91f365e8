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

use crate::error::X393Error;
use crate::registers::RegisterIo;
use log::debug;

/// Register space that performs no I/O. Reads return a fixed value, writes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedMem {
    read_value: u32,
}

impl SimulatedMem {
    pub fn new(read_value: u32) -> SimulatedMem {
        SimulatedMem { read_value }
    }
}

impl RegisterIo for SimulatedMem {
    fn read(&self, addr: u32) -> Result<u32, X393Error> {
        debug!(
            "simulated read of 0x{addr:08X} returns 0x{:X}",
            self.read_value
        );
        Ok(self.read_value)
    }

    fn write(&self, addr: u32, value: u32) -> Result<(), X393Error> {
        debug!("simulated write of 0x{value:X} to 0x{addr:08X} dropped");
        Ok(())
    }
}
