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
use crate::registers::{INT_STS, INT_STS_PCFG_DONE, RegisterIo};
use log::trace;
use std::thread;
use std::time::Duration;

/// Reads of `INT_STS` before giving up on `PCFG_DONE`.
pub const DONE_POLL_ATTEMPTS: u32 = 100;

/// Pause between two reads of `INT_STS`.
pub const DONE_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The done bit was seen on read number `attempts`.
    Completed { attempts: u32 },
    /// Every attempt was used; `last_status` is the final value read.
    TimedOut { last_status: u32 },
}

/// Bounded wait for the PL configuration done bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionPoll {
    pub attempts: u32,
    pub interval: Duration,
    pub done_mask: u32,
}

impl Default for CompletionPoll {
    fn default() -> Self {
        CompletionPoll {
            attempts: DONE_POLL_ATTEMPTS,
            interval: DONE_POLL_INTERVAL,
            done_mask: INT_STS_PCFG_DONE,
        }
    }
}

impl CompletionPoll {
    /// Poll `INT_STS` until the done bit is set or the attempts run out.
    ///
    /// Blocks the calling thread for up to `(attempts - 1) * interval`. Polling stops on
    /// the first read that shows the done bit.
    ///
    /// # Returns: `Result<Completion, X393Error>`
    /// * `Ok(Completion::Completed)` - Done bit observed
    /// * `Ok(Completion::TimedOut)` - Done bit never observed
    /// * `Err(X393Error)` - A register read failed
    pub fn wait<R: RegisterIo + ?Sized>(&self, mem: &R) -> Result<Completion, X393Error> {
        let mut last_status = 0;
        for attempt in 1..=self.attempts {
            last_status = mem.read(INT_STS)?;
            trace!("INT_STS = 0x{last_status:08X} on attempt {attempt}");
            if last_status & self.done_mask != 0 {
                return Ok(Completion::Completed { attempts: attempt });
            }
            if attempt < self.attempts {
                thread::sleep(self.interval);
            }
        }
        Ok(Completion::TimedOut { last_status })
    }
}
