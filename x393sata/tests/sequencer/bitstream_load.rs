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

use crate::common::mock_board::{MockCrosspoint, MockMem, ScratchBoard, board};
use crate::sequencer::fast_poll;
use googletest::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use x393sata::bitstream::{BitstreamTransfer, CHUNK_SIZE, TransferSummary};
use x393sata::crosspoint::SignalPath;
use x393sata::error::X393Error;
use x393sata::mode::Mode;
use x393sata::registers::{FPGA_RST_CTRL, FPGA0_THR_CTRL, INT_STS};
use x393sata::sequencer::completion::{Completion, CompletionPoll};
use x393sata::sequencer::{ConfigSequencer, LoadReport};

/// Records the size of every write it receives.
#[derive(Default)]
struct ChunkRecorder {
    writes: Vec<usize>,
}

impl Write for ChunkRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes.push(buf.len());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Accepts `good_writes` writes, then fails.
struct FailingDevice {
    good_writes: usize,
}

impl Write for FailingDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.good_writes == 0 {
            return Err(io::Error::other("device rejected chunk"));
        }
        self.good_writes -= 1;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn load(board: &ScratchBoard, mem: &MockMem, switch: &MockCrosspoint) -> Result<LoadReport, X393Error> {
    ConfigSequencer::new(Mode::Live, mem, switch, board.config.clone())
        .with_completion_poll(fast_poll())
        .bitstream(None, 4)
}

#[rstest]
fn scenario_two_and_a_half_megabytes(board: ScratchBoard) {
    let contents = board.write_bitfile(2_500_000);
    let mem = MockMem::done_after(3);
    let switch = MockCrosspoint::default();

    let report = load(&board, &mem, &switch).expect("load failed");

    assert_eq!(
        report.transfer,
        Some(TransferSummary {
            bytes: 2_500_000,
            chunks: 3
        })
    );
    assert_eq!(report.completion, Some(Completion::Completed { attempts: 3 }));
    assert_eq!(report.connection_status.as_deref(), Some("ssd <-> debug"));
    assert!(report.finished());
    assert_eq!(fs::read(&board.config.config_device).unwrap(), contents);
    assert_eq!(board.read(&board.config.spread_spectrum_path()), "0\n");
}

#[test]
fn chunk_writes_for_two_and_a_half_megabytes() {
    let mut device = ChunkRecorder::default();
    let mut transfer = BitstreamTransfer::new(Path::new("x393_sata.bit"), Path::new("xdevcfg"), 1);

    let summary = transfer
        .stream(Cursor::new(vec![0u8; 2_500_000]), &mut device)
        .expect("stream failed");

    assert_eq!(device.writes, vec![1_048_576, 1_048_576, 402_848]);
    assert_eq!(summary.bytes, 2_500_000);
    assert_eq!(transfer.bytes_sent(), 2_500_000);
}

#[rstest]
#[case::empty(0)]
#[case::one_byte(1)]
#[case::exactly_one_chunk(CHUNK_SIZE)]
#[case::one_past_a_chunk(CHUNK_SIZE + 1)]
#[case::several_chunks(3 * CHUNK_SIZE + 17)]
fn chunk_count_is_size_over_chunk_rounded_up(#[case] size: usize) {
    let mut device = ChunkRecorder::default();
    let mut transfer = BitstreamTransfer::new(Path::new("x393_sata.bit"), Path::new("xdevcfg"), 4);

    let summary = transfer
        .stream(Cursor::new(vec![0xA5u8; size]), &mut device)
        .expect("stream failed");

    assert_eq!(summary.bytes, size as u64);
    assert_eq!(device.writes.len(), size.div_ceil(CHUNK_SIZE));
    assert_eq!(summary.chunks as usize, device.writes.len());
    assert_eq!(device.writes.iter().sum::<usize>(), size);
}

#[rstest]
fn sequence_order_on_success(board: ScratchBoard) {
    board.write_bitfile(10);
    let mem = MockMem::done_after(1);
    let switch = MockCrosspoint::default();

    load(&board, &mem, &switch).expect("load failed");

    assert_eq!(
        mem.writes(),
        vec![
            (FPGA0_THR_CTRL, 1),
            (FPGA_RST_CTRL, 0x0),
            (FPGA0_THR_CTRL, 0),
            (FPGA_RST_CTRL, 0xA),
        ]
    );
    assert_eq!(mem.reads_of(INT_STS), 1);
    assert_eq!(*switch.connected.borrow(), vec![SignalPath::Debug]);
    assert_eq!(*switch.status_queries.borrow(), 1);
}

#[rstest]
fn timeout_leaves_clock_stopped_and_reset_asserted(board: ScratchBoard) {
    board.write_bitfile(1000);
    let mem = MockMem::never_done(0x1);
    let switch = MockCrosspoint::default();
    let poll = CompletionPoll {
        interval: Duration::from_millis(2),
        ..CompletionPoll::default()
    };

    let started = Instant::now();
    let report = ConfigSequencer::new(Mode::Live, &mem, &switch, board.config.clone())
        .with_completion_poll(poll)
        .bitstream(None, 1)
        .expect("a timeout is not an error");

    assert!(started.elapsed() >= Duration::from_millis(2 * 99));
    assert_eq!(report.timed_out(), Some(0x1));
    assert!(!report.finished());
    assert_eq!(mem.reads_of(INT_STS), 100);
    assert_eq!(mem.writes(), vec![(FPGA0_THR_CTRL, 1), (FPGA_RST_CTRL, 0x0)]);
    assert!(switch.connected.borrow().is_empty());
}

#[rstest]
fn polling_stops_on_first_done(board: ScratchBoard) {
    board.write_bitfile(1000);
    let mem = MockMem::done_after(7);
    let switch = MockCrosspoint::default();

    let report = load(&board, &mem, &switch).expect("load failed");

    assert_eq!(report.completion, Some(Completion::Completed { attempts: 7 }));
    assert_eq!(mem.reads_of(INT_STS), 7);
}

#[gtest]
#[rstest]
fn missing_bitfile_aborts_before_polling(board: ScratchBoard) {
    let mem = MockMem::done_after(1);
    let switch = MockCrosspoint::default();

    let result = load(&board, &mem, &switch);

    expect_that!(
        result,
        err(displays_as(contains_substring("X393Error::IORead")))
    );
    assert_eq!(mem.reads_of(INT_STS), 0);
    assert_eq!(mem.writes(), vec![(FPGA0_THR_CTRL, 1), (FPGA_RST_CTRL, 0x0)]);
    assert!(switch.connected.borrow().is_empty());
}

#[gtest]
fn chunk_write_failure_is_fatal() {
    let mut transfer =
        BitstreamTransfer::new(Path::new("x393_sata.bit"), Path::new("/dev/xdevcfg"), 4);

    let result = transfer.stream(
        Cursor::new(vec![0u8; 2 * CHUNK_SIZE + 5]),
        FailingDevice { good_writes: 1 },
    );

    expect_that!(
        result,
        err(displays_as(contains_substring("chunk 2 (1048576 bytes)")))
    );
    assert_eq!(transfer.bytes_sent(), CHUNK_SIZE as u64);
}

#[rstest]
fn explicit_bitfile_overrides_default(board: ScratchBoard) {
    let other = board.dir.path().join("other.bit");
    fs::write(&other, b"other design").unwrap();
    let mem = MockMem::done_after(1);
    let switch = MockCrosspoint::default();

    let report = ConfigSequencer::new(Mode::Live, &mem, &switch, board.config.clone())
        .with_completion_poll(fast_poll())
        .bitstream(Some(other.as_path()), 0)
        .expect("load failed");

    assert_eq!(report.bitfile, other);
    assert_eq!(fs::read(&board.config.config_device).unwrap(), b"other design");
}

#[rstest]
fn spread_spectrum_failure_is_not_fatal(board: ScratchBoard) {
    board.write_bitfile(10);
    fs::remove_dir_all(&board.config.si5338_dir).unwrap();
    let mem = MockMem::done_after(1);
    let switch = MockCrosspoint::default();

    let report = load(&board, &mem, &switch).expect("load failed");

    assert!(report.finished());
    assert_eq!(mem.writes().len(), 4);
}
