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

/// `FPGA_RST_CTRL` value holding the PL in reset.
pub const RESET_ON: u32 = 0x0;

/// `FPGA_RST_CTRL` value releasing the PL from reset.
pub const RESET_OFF: u32 = 0xA;

/// Values to write to the reset control register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetCommand {
    Single(u32),
    /// Written in order, back to back.
    Sequence(Vec<u32>),
}

impl ResetCommand {
    /// Assert then release reset.
    pub fn pulse() -> ResetCommand {
        ResetCommand::Sequence(vec![RESET_ON, RESET_OFF])
    }

    pub fn values(&self) -> &[u32] {
        match self {
            ResetCommand::Single(value) => std::slice::from_ref(value),
            ResetCommand::Sequence(values) => values,
        }
    }
}

impl From<u32> for ResetCommand {
    fn from(value: u32) -> Self {
        ResetCommand::Single(value)
    }
}

impl From<Vec<u32>> for ResetCommand {
    fn from(values: Vec<u32>) -> Self {
        match values.as_slice() {
            [value] => ResetCommand::Single(*value),
            _ => ResetCommand::Sequence(values),
        }
    }
}
