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

use crate::common::log_capture;
use crate::common::mock_board::{MockMem, ScratchBoard, board};
use crate::sequencer::fast_poll;
use rstest::rstest;
use std::fs;
use x393sata::bitstream::TransferSummary;
use x393sata::crosspoint::{PathSelector, Vsc3304};
use x393sata::gpio::GpioDirection;
use x393sata::mode::Mode;
use x393sata::registers::{INT_STS, RegisterIo};
use x393sata::sequencer::reset::ResetCommand;
use x393sata::sequencer::{BoardSequencer, ConfigSequencer};

#[rstest]
fn missing_device_downgrades_and_reset_only_logs(board: ScratchBoard) {
    log_capture::init();
    fs::remove_file(&board.config.config_device).unwrap();
    let mode = Mode::negotiate(Mode::Live, &board.config.config_device);
    let mem = MockMem::new();
    let switch = Vsc3304::new(mode, &board.config.crosspoint_dir);
    let sata = ConfigSequencer::new(mode, &mem, switch, board.config.clone());

    sata.reset(&ResetCommand::Single(0)).expect("reset failed");

    assert_eq!(sata.mode(), Mode::DryRun);
    assert!(mem.writes().is_empty());
    assert_eq!(
        log_capture::matching("would write 0x0 to FPGA_RST_CTRL [0xF8000240]").len(),
        1
    );
}

#[rstest]
fn dry_run_bitstream_touches_nothing(board: ScratchBoard) {
    log_capture::init();
    board.write_bitfile(2_500_000);
    let mem = MockMem::done_after(1);
    let switch = Vsc3304::new(Mode::DryRun, &board.config.crosspoint_dir);
    let sata = ConfigSequencer::new(Mode::DryRun, &mem, switch, board.config.clone())
        .with_completion_poll(fast_poll());

    let report = sata.bitstream(None, 1).expect("dry run failed");

    assert!(report.finished());
    assert_eq!(report.transfer, None);
    assert_eq!(
        report.planned,
        Some(TransferSummary {
            bytes: 2_500_000,
            chunks: 3
        })
    );
    assert_eq!(report.completion, None);
    assert!(mem.writes().is_empty());
    assert_eq!(mem.reads_of(INT_STS), 0);
    assert_eq!(board.read(&board.config.config_device), "");
    assert_eq!(board.read(&board.config.spread_spectrum_path()), "");
    assert_eq!(board.read(&board.config.crosspoint_dir.join("connection")), "");

    for expected in [
        "would write 0x1 to FPGA0_THR_CTRL [0xF8000178]",
        "would write 0x0 to FPGA_RST_CTRL [0xF8000240]",
        "would send 2500000 bytes in 3 chunks",
        "would poll INT_STS [0xF800700C] up to 100 times",
        "would write 0x0 to FPGA0_THR_CTRL [0xF8000178]",
        "would write 0xA to FPGA_RST_CTRL [0xF8000240]",
        "would write \"0\" to",
        "would write \"debug\" to",
    ] {
        assert_eq!(
            log_capture::matching(expected).len(),
            1,
            "expected exactly one log record containing {expected:?}"
        );
    }
}

#[rstest]
fn dry_run_gpio_writes_nothing(board: ScratchBoard) {
    log_capture::init();
    board.add_gpio(54, "1\n");
    let mem = MockMem::new();
    let switch = Vsc3304::new(Mode::DryRun, &board.config.crosspoint_dir);
    let sata = ConfigSequencer::new(Mode::DryRun, &mem, switch, board.config.clone());

    let report = sata.export_gpio(GpioDirection::Out, 54..=54);
    let readout = sata.read_gpio(54..=54);

    assert!(report.all_ok());
    assert_eq!(board.read(&board.config.gpio_dir.join("export")), "");
    assert_eq!(board.read(&board.config.gpio_dir.join("gpio54/direction")), "");
    assert_eq!(readout[0].value, None);
    assert_eq!(log_capture::matching("would write \"54\" to").len(), 1);
    assert_eq!(log_capture::matching("would write \"out\" to").len(), 1);
}

#[rstest]
fn open_board_without_device_runs_dry(board: ScratchBoard) {
    fs::remove_file(&board.config.config_device).unwrap();
    board.write_bitfile(100);

    let sata = BoardSequencer::open(Mode::Live, board.config.clone()).expect("open failed");
    let report = sata.bitstream(None, 4).expect("dry run failed");

    assert_eq!(sata.mode(), Mode::DryRun);
    assert!(!sata.mode().is_live());
    assert_eq!(sata.config(), &board.config);
    assert_eq!(sata.reset_get().unwrap(), 0);
    assert_eq!(sata.register_io().read(INT_STS).unwrap(), 0);
    assert_eq!(
        report.connection_status.as_deref(),
        Some(sata.path_selector().status().unwrap().as_str())
    );
    assert!(report.finished());
    assert!(!board.config.config_device.exists());
}
