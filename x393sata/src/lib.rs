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

//! x393sata - bring-up of the Elphel x393 SATA FPGA board.
//!
//! Takes the board from power-up to a configured PL with the SSD routed through the
//! VSC3304 crosspoint: clock gating, PL reset, bitstream load through `/dev/xdevcfg`,
//! a bounded wait for configuration done, then clock and reset release.
//!
//! # Modes
//!
//! The same code drives real hardware or only logs what it would do. The mode is settled
//! once by [`Mode::negotiate`](mode::Mode::negotiate): asking for live mode on a host
//! without the configuration device yields dry-run mode.
//!
//! # Layout
//!
//! - [`sequencer`] - the ordered bring-up sequence and the reset primitives
//! - [`registers`] - register addresses and the [`RegisterIo`](registers::RegisterIo) access trait
//! - [`bitstream`] - chunked streaming into the configuration device
//! - [`crosspoint`] - SSD signal path selection
//! - [`gpio`] - best-effort export and readout of PL-connected GPIOs
//! - [`config`] - TOML-configurable board paths
//! - [`system_io`] - file helpers with error context
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level when driven from the `x393sata` binary
//!   (`trace`, `debug`, `info`, `warn`, `error` or `off`). Defaults to `info`

pub mod bitstream;
pub mod config;
pub mod crosspoint;
pub mod error;
pub mod gpio;
pub mod mode;
pub mod registers;
pub mod sequencer;
pub mod system_io;
