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

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum X393Error {
    #[error("X393Error::Argument: {0}")]
    Argument(String),
    #[error("X393Error::IORead: An IO error occurred when reading from {file:?}: {e}")]
    IORead { file: PathBuf, e: std::io::Error },
    #[error("X393Error::IOWrite: An IO error occurred when writing {data} to {file:?}: {e}")]
    IOWrite {
        data: String,
        file: PathBuf,
        e: std::io::Error,
    },
    #[error("X393Error::IOCopy: An IO error occurred when copying {src:?} to {dst:?}: {e}")]
    IOCopy {
        src: PathBuf,
        dst: PathBuf,
        e: std::io::Error,
    },
    #[error(
        "X393Error::RegisterMap: Failed to map register 0x{addr:08X} through {device:?}: {e}"
    )]
    RegisterMap {
        addr: u32,
        device: PathBuf,
        e: std::io::Error,
    },
    #[error("X393Error::TomlDe: Failed to parse {file:?}: {e}")]
    TomlDe { file: PathBuf, e: toml::de::Error },
    #[error("X393Error::Internal: An Internal error occurred: {0}")]
    Internal(String),
}
