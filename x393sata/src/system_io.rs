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

//! Error Wrapping File System I/O Helpers
//!
//! This module provides convenient wrappers around standard Rust file system operations,
//! with automatic conversion to `X393Error` types. All functions include trace logging
//! for debugging and provide detailed error context including file paths.
//!
//! These helpers perform the real side effect unconditionally. Callers that touch sysfs
//! or device files are responsible for checking the [`Mode`](crate::mode::Mode) first.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use x393sata::system_io::{fs_read, fs_write};
//! # use std::path::Path;
//!
//! # fn example() -> Result<(), x393sata::error::X393Error> {
//! // Read a pin value
//! let value = fs_read(Path::new("/sys/class/gpio/gpio54/value"))?;
//!
//! // Export a pin
//! fs_write(Path::new("/sys/class/gpio/export"), false, "54\n")?;
//! # Ok(())
//! # }
//! ```

use crate::error::X393Error;
use filetime::FileTime;
use log::trace;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

/// Read the contents of a file to a String.
///
/// This is a convenient wrapper around `std::fs::File::read_to_string` that provides
/// trace logging and automatic error conversion to `X393Error::IORead`.
///
/// # Arguments
///
/// * `file_path` - Path to the file to read
///
/// # Returns: `Result<String, X393Error>`
/// * `Ok(String)` - The complete contents of the file
/// * `Err(X393Error::IORead)` - If the file cannot be read (doesn't exist, permissions, etc.)
pub fn fs_read(file_path: &Path) -> Result<String, X393Error> {
    trace!("Attempting to read from {file_path:?}");
    let mut buf: String = String::new();
    let result = OpenOptions::new()
        .read(true)
        .open(file_path)
        .and_then(|mut f| f.read_to_string(&mut buf));

    match result {
        Ok(_) => {
            trace!("Reading done");
            Ok(buf)
        }
        Err(e) => Err(X393Error::IORead {
            file: file_path.into(),
            e,
        }),
    }
}

/// Write a string value to a file.
///
/// The whole value is written with a single `write!`, which is what sysfs attributes
/// expect. Errors are converted to `X393Error::IOWrite`.
///
/// # Arguments
///
/// * `file_path` - Path to the file to write
/// * `create` - If `true`, create the file if it doesn't exist; if `false`, file must already exist
/// * `value` - The string value to write (implements `AsRef<str>`)
///
/// # Returns: `Result<(), X393Error>`
/// * `Ok(())` - Write succeeded
/// * `Err(X393Error::IOWrite)` - If the write fails (permissions, file doesn't exist when create=false, etc.)
pub fn fs_write(file_path: &Path, create: bool, value: impl AsRef<str>) -> Result<(), X393Error> {
    trace!(
        "Attempting to write {:?} to {:?}",
        value.as_ref(),
        file_path
    );
    let result = OpenOptions::new()
        .create(create)
        .read(false)
        .write(true)
        .open(file_path)
        .and_then(|mut f| write!(f, "{}", value.as_ref()));
    match result {
        Ok(_) => {
            trace!("Write done.");
            Ok(())
        }
        Err(e) => Err(X393Error::IOWrite {
            data: format!("{:?}", value.as_ref()),
            file: file_path.into(),
            e,
        }),
    }
}

/// Copy a regular file, preserving its access and modification times.
///
/// If `dst` is an existing directory the file is copied into it under its own name.
///
/// # Arguments
///
/// * `src` - The file to copy
/// * `dst` - Destination file or directory
///
/// # Returns: `Result<PathBuf, X393Error>`
/// * `Ok(PathBuf)` - The path that was written
/// * `Err(X393Error::Argument)` - `dst` is a directory and `src` has no file name, or the
///   target is `src` itself
/// * `Err(X393Error::IOCopy)` - Copying or restoring the timestamps failed
pub fn fs_copy(src: &Path, dst: &Path) -> Result<PathBuf, X393Error> {
    let target = if dst.is_dir() {
        let name = src.file_name().ok_or_else(|| {
            X393Error::Argument(format!("{src:?} has no file name to copy into {dst:?}"))
        })?;
        dst.join(name)
    } else {
        dst.to_path_buf()
    };
    trace!("Attempting to copy {src:?} to {target:?}");

    if let (Ok(from), Ok(to)) = (std::fs::metadata(src), std::fs::metadata(&target)) {
        if (from.dev(), from.ino()) == (to.dev(), to.ino()) {
            return Err(X393Error::Argument(format!(
                "{src:?} and {target:?} are the same file"
            )));
        }
    }

    let copy_err = |e| X393Error::IOCopy {
        src: src.into(),
        dst: target.clone(),
        e,
    };
    let bytes = std::fs::copy(src, &target).map_err(copy_err)?;
    let metadata = std::fs::metadata(src).map_err(copy_err)?;
    filetime::set_file_times(
        &target,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .map_err(copy_err)?;
    trace!("Copied {bytes} bytes.");
    Ok(target)
}
