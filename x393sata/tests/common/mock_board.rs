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

//! Recording stand-ins for the register space and the crosspoint switch.

use rstest::fixture;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use x393sata::config::SystemConfig;
use x393sata::crosspoint::{PathSelector, SignalPath};
use x393sata::error::X393Error;
use x393sata::registers::{INT_STS, RegisterIo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(u32),
    Write(u32, u32),
}

/// Register space that remembers every access. `INT_STS` reads are scripted.
#[derive(Debug, Default)]
pub struct MockMem {
    accesses: RefCell<Vec<Access>>,
    values: RefCell<HashMap<u32, u32>>,
    int_sts: RefCell<VecDeque<u32>>,
    int_sts_idle: u32,
}

impl MockMem {
    pub fn new() -> MockMem {
        MockMem::default()
    }

    /// `INT_STS` shows the done bit on read number `reads`.
    pub fn done_after(reads: usize) -> MockMem {
        let mem = MockMem::new();
        {
            let mut script = mem.int_sts.borrow_mut();
            script.extend(std::iter::repeat_n(0x0, reads.saturating_sub(1)));
            script.push_back(0x4);
        }
        mem
    }

    /// `INT_STS` never shows the done bit and always reads `status`.
    pub fn never_done(status: u32) -> MockMem {
        MockMem {
            int_sts_idle: status,
            ..MockMem::default()
        }
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.accesses.borrow().clone()
    }

    pub fn writes(&self) -> Vec<(u32, u32)> {
        self.accesses
            .borrow()
            .iter()
            .filter_map(|access| match access {
                Access::Write(addr, value) => Some((*addr, *value)),
                Access::Read(_) => None,
            })
            .collect()
    }

    pub fn reads_of(&self, addr: u32) -> usize {
        self.accesses
            .borrow()
            .iter()
            .filter(|access| **access == Access::Read(addr))
            .count()
    }
}

impl RegisterIo for MockMem {
    fn read(&self, addr: u32) -> Result<u32, X393Error> {
        self.accesses.borrow_mut().push(Access::Read(addr));
        if addr == INT_STS {
            return Ok(self
                .int_sts
                .borrow_mut()
                .pop_front()
                .unwrap_or(self.int_sts_idle));
        }
        Ok(self.values.borrow().get(&addr).copied().unwrap_or(0))
    }

    fn write(&self, addr: u32, value: u32) -> Result<(), X393Error> {
        self.accesses.borrow_mut().push(Access::Write(addr, value));
        self.values.borrow_mut().insert(addr, value);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockCrosspoint {
    pub connected: RefCell<Vec<SignalPath>>,
    pub status_queries: RefCell<usize>,
}

impl PathSelector for MockCrosspoint {
    fn connect(&self, path: SignalPath) -> Result<(), X393Error> {
        self.connected.borrow_mut().push(path);
        Ok(())
    }

    fn status(&self) -> Result<String, X393Error> {
        *self.status_queries.borrow_mut() += 1;
        let last = self.connected.borrow().last().copied();
        Ok(match last {
            Some(path) => format!("ssd <-> {path}"),
            None => String::from("ssd disconnected"),
        })
    }
}

/// A scratch board: a temporary directory laid out like the sysfs and device nodes the
/// sequencer expects.
pub struct ScratchBoard {
    pub dir: TempDir,
    pub config: SystemConfig,
}

impl ScratchBoard {
    pub fn write_bitfile(&self, size: usize) -> Vec<u8> {
        let contents: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        fs::write(&self.config.default_bitfile, &contents).expect("failed to write bitfile");
        contents
    }

    pub fn add_gpio(&self, pin: u32, value: &str) {
        let pin_dir = self.config.gpio_dir.join(format!("gpio{pin}"));
        fs::create_dir_all(&pin_dir).expect("failed to create gpio dir");
        fs::write(pin_dir.join("direction"), "").expect("failed to create direction");
        fs::write(pin_dir.join("value"), value).expect("failed to create value");
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }
}

/// Everything present: configuration device, spread spectrum control, GPIO class and
/// crosspoint node. No bitfile yet.
#[fixture]
pub fn board() -> ScratchBoard {
    let dir = tempfile::tempdir().expect("failed to create scratch dir");
    let root = dir.path();
    let config = SystemConfig {
        config_device: root.join("xdevcfg"),
        dev_mem: root.join("mem"),
        si5338_dir: root.join("0-0070"),
        gpio_dir: root.join("gpio"),
        crosspoint_dir: root.join("0-0001"),
        default_bitfile: root.join("x393_sata.bit"),
    };
    fs::write(&config.config_device, "").expect("failed to create config device");
    fs::create_dir_all(config.si5338_dir.join("spread_spectrum"))
        .expect("failed to create si5338 dir");
    fs::write(config.spread_spectrum_path(), "").expect("failed to create ss3_values");
    fs::create_dir_all(&config.gpio_dir).expect("failed to create gpio dir");
    fs::write(config.gpio_dir.join("export"), "").expect("failed to create export");
    fs::create_dir_all(&config.crosspoint_dir).expect("failed to create crosspoint dir");
    fs::write(config.crosspoint_dir.join("connection"), "").expect("failed to create connection");
    ScratchBoard { dir, config }
}
