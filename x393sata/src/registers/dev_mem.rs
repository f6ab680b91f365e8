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

//! Register access through `/dev/mem`.
//!
//! Each access maps the single page containing the register, performs one volatile
//! 32-bit load or store, and unmaps it again. Nothing stays mapped between calls, so a
//! [`DevMem`] can be kept for the life of the process without pinning any mapping.

use crate::error::X393Error;
use crate::registers::RegisterIo;
use log::trace;
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::ptr;

const FALLBACK_PAGE_SIZE: usize = 4096;

#[derive(Debug)]
pub struct DevMem {
    file: File,
    device: PathBuf,
    page_size: usize,
}

impl DevMem {
    /// Open the physical memory device read/write with `O_SYNC`.
    ///
    /// # Arguments
    ///
    /// * `device` - Usually `/dev/mem`
    ///
    /// # Returns: `Result<DevMem, X393Error>`
    /// * `Ok(DevMem)` - Ready for register access
    /// * `Err(X393Error::IORead)` - The device could not be opened (missing, not root, etc.)
    pub fn open(device: &Path) -> Result<DevMem, X393Error> {
        trace!("Opening {device:?} for register access");
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(device)
            .map_err(|e| X393Error::IORead {
                file: device.into(),
                e,
            })?;
        let page_size = match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
            size if size > 0 => size as usize,
            _ => FALLBACK_PAGE_SIZE,
        };
        Ok(DevMem {
            file,
            device: device.into(),
            page_size,
        })
    }

    fn with_register<T>(&self, addr: u32, access: impl FnOnce(*mut u32) -> T) -> Result<T, X393Error> {
        if addr % 4 != 0 {
            return Err(X393Error::Argument(format!(
                "Register address 0x{addr:08X} is not 4-byte aligned"
            )));
        }
        let page_base = addr as usize & !(self.page_size - 1);
        let offset = addr as usize - page_base;

        let map = unsafe {
            libc::mmap64(
                ptr::null_mut(),
                self.page_size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                self.file.as_raw_fd(),
                page_base as libc::off64_t,
            )
        };
        if map == libc::MAP_FAILED {
            return Err(X393Error::RegisterMap {
                addr,
                device: self.device.clone(),
                e: std::io::Error::last_os_error(),
            });
        }

        let register = unsafe { map.cast::<u8>().add(offset).cast::<u32>() };
        let result = access(register);
        unsafe {
            libc::munmap(map, self.page_size);
        }
        Ok(result)
    }
}

impl RegisterIo for DevMem {
    fn read(&self, addr: u32) -> Result<u32, X393Error> {
        let value = self.with_register(addr, |register| unsafe { ptr::read_volatile(register) })?;
        trace!("read 0x{value:08X} from 0x{addr:08X}");
        Ok(value)
    }

    fn write(&self, addr: u32, value: u32) -> Result<(), X393Error> {
        trace!("writing 0x{value:08X} to 0x{addr:08X}");
        self.with_register(addr, |register| unsafe { ptr::write_volatile(register, value) })
    }
}
