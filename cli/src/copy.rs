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

//! `copy` subcommand.

use std::path::Path;
use x393sata::error::X393Error;
use x393sata::system_io::fs_copy;

pub fn copy_handler(src: &Path, dst: &Path) -> Result<String, X393Error> {
    let target = fs_copy(src, dst)?;
    Ok(format!("copied {src:?} to {target:?}"))
}
