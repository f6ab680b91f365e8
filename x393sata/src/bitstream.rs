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

//! Streaming a bitstream file into the configuration device.
//!
//! The device expects one contiguous, sequential write stream. The source is copied in
//! fixed [`CHUNK_SIZE`] chunks; every chunk except the last is full. A failed read or
//! write ends the transfer immediately, there is no retry of a partial chunk.

use crate::error::X393Error;
use log::{debug, info, trace, warn};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Size of one write to the configuration device.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Progress messages are promoted to `info` while the quiet level is below this.
pub const QUIET_PROGRESS_LIMIT: u8 = 4;

/// Whether intermediate progress should be reported at `quiet`.
pub fn chatty(quiet: u8) -> bool {
    quiet < QUIET_PROGRESS_LIMIT
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    pub bytes: u64,
    pub chunks: u64,
}

impl TransferSummary {
    /// What a transfer of `bytes` would look like with `chunk_size` chunks.
    pub fn planned(bytes: u64, chunk_size: usize) -> TransferSummary {
        TransferSummary {
            bytes,
            chunks: bytes.div_ceil(chunk_size as u64),
        }
    }
}

/// One bitstream load. Lives for the duration of a single transfer.
#[derive(Debug)]
pub struct BitstreamTransfer {
    source: PathBuf,
    destination: PathBuf,
    chunk_size: usize,
    sent: u64,
    quiet: u8,
}

impl BitstreamTransfer {
    pub fn new(source: &Path, destination: &Path, quiet: u8) -> BitstreamTransfer {
        BitstreamTransfer {
            source: source.into(),
            destination: destination.into(),
            chunk_size: CHUNK_SIZE,
            sent: 0,
            quiet,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> BitstreamTransfer {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn bytes_sent(&self) -> u64 {
        self.sent
    }

    /// Open both files and copy the source into the destination.
    ///
    /// # Returns: `Result<TransferSummary, X393Error>`
    /// * `Ok(TransferSummary)` - Total bytes and number of chunk writes
    /// * `Err(X393Error::IORead)` - The source could not be opened or read
    /// * `Err(X393Error::IOWrite)` - The destination could not be opened or written
    pub fn run(&mut self) -> Result<TransferSummary, X393Error> {
        trace!("Opening {:?} and {:?}", self.source, self.destination);
        let src = File::open(&self.source).map_err(|e| X393Error::IORead {
            file: self.source.clone(),
            e,
        })?;
        let dst = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.destination)
            .map_err(|e| X393Error::IOWrite {
                data: format!("bitstream {:?}", self.source),
                file: self.destination.clone(),
                e,
            })?;
        self.stream(src, dst)
    }

    /// Copy `src` into `dst` chunk by chunk, counting bytes as they are written.
    pub fn stream<R: Read, W: Write>(
        &mut self,
        mut src: R,
        mut dst: W,
    ) -> Result<TransferSummary, X393Error> {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut chunks = 0u64;
        loop {
            let filled = fill_chunk(&mut src, &mut buffer).map_err(|e| X393Error::IORead {
                file: self.source.clone(),
                e,
            })?;
            if filled == 0 {
                break;
            }
            dst.write_all(&buffer[..filled])
                .map_err(|e| X393Error::IOWrite {
                    data: format!("chunk {} ({filled} bytes)", chunks + 1),
                    file: self.destination.clone(),
                    e,
                })?;
            chunks += 1;
            self.sent += filled as u64;
            if chatty(self.quiet) {
                info!("sent {} bytes to FPGA", self.sent);
            } else {
                debug!("sent {} bytes to FPGA", self.sent);
            }
        }
        dst.flush().map_err(|e| X393Error::IOWrite {
            data: String::from("final flush"),
            file: self.destination.clone(),
            e,
        })?;
        info!("Loaded {} bytes to FPGA", self.sent);
        Ok(TransferSummary {
            bytes: self.sent,
            chunks,
        })
    }

    /// Log what [`run`](Self::run) would send, without opening the destination.
    pub fn log_dry_run(&self) -> Option<TransferSummary> {
        match std::fs::metadata(&self.source) {
            Ok(metadata) => {
                let plan = TransferSummary::planned(metadata.len(), self.chunk_size);
                info!(
                    "would send {} bytes in {} chunks from {:?} to {:?}",
                    plan.bytes, plan.chunks, self.source, self.destination
                );
                Some(plan)
            }
            Err(e) => {
                warn!(
                    "would send {:?} to {:?}, but its size is unknown: {e}",
                    self.source, self.destination
                );
                None
            }
        }
    }
}

/// Read until `buffer` is full or the source is exhausted.
fn fill_chunk<R: Read>(src: &mut R, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match src.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
