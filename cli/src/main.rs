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

//! Command-line front end for the x393 SATA bring-up sequencer.
//!
//! Every subcommand builds a [`BoardSequencer`] for the requested [`Mode`] and runs one
//! operation on it. When `--dry-run` is given, or the FPGA configuration device does not
//! exist, nothing is written to hardware and every would-be write is logged instead.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (`trace`, `debug`, `info`, `warn`, `error`
//!   or `off`). Defaults to `info`
//!
//! # Exit Status
//!
//! Non-zero when the operation fails, including a `bitstream` load whose done bit never
//! appeared.

mod bitstream;
mod copy;
mod gpio;
mod reset;
mod select;

use crate::bitstream::bitstream_handler;
use crate::copy::copy_handler;
use crate::gpio::gpio_handler;
use crate::reset::{reset_get_handler, reset_handler, reset_once_handler};
use crate::select::select_handler;
use clap::{Parser, Subcommand, arg, command};
use log::debug;
use std::error::Error;
use std::path::PathBuf;
use x393sata::config::SystemConfig;
use x393sata::crosspoint::SignalPath;
use x393sata::gpio::GpioDirection;
use x393sata::mode::Mode;
use x393sata::sequencer::BoardSequencer;

#[derive(Parser, Debug)]
#[command(name = "x393sata")]
#[command(bin_name = "x393sata")]
struct Cli {
    #[arg(
        long = "dry-run",
        help = r#"log every register, device and sysfs write instead of performing it.
Dry-run mode is also selected automatically when the FPGA configuration
device (/dev/xdevcfg by default) does not exist.
        "#
    )]
    dry_run: bool,
    #[arg(
        long = "config",
        help = r#"read system paths from this TOML file instead of
/etc/x393sata/config.toml and /usr/lib/x393sata/config.toml.
        "#
    )]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a bitstream into the PL and route the SSD to the debug path
    Bitstream {
        /// Bitstream file, defaults to the configured `default_bitfile`
        #[arg(long)]
        file: Option<PathBuf>,
        /// Progress messages are shown at `info` level while this is below 4
        #[arg(long, default_value_t = 1)]
        quiet: u8,
    },
    /// Write each value, in order, to FPGA_RST_CTRL (0 = reset on, 0xA = reset off)
    Reset {
        #[arg(required = true, value_parser = parse_register_value)]
        values: Vec<u32>,
    },
    /// Pulse the PL reset: on, then off
    ResetOnce,
    /// Print the current FPGA_RST_CTRL value
    ResetGet,
    /// Route the SSD through the crosspoint switch
    Select {
        /// One of `zynq`, `esata` or `debug`
        path: SignalPath,
    },
    /// Export or read a range of PL GPIO pins
    Gpio {
        #[command(subcommand)]
        command: GpioSubcommand,
    },
    /// Copy a file, keeping its access and modification times
    Copy { src: PathBuf, dst: PathBuf },
}

#[derive(Subcommand, Debug)]
enum GpioSubcommand {
    /// Export pins `low..=high` and set their direction
    Export {
        #[arg(long, default_value = "in")]
        direction: GpioDirection,
        #[arg(long)]
        low: u32,
        /// Defaults to `low`
        #[arg(long)]
        high: Option<u32>,
    },
    /// Read pins `low..=high`, highest first
    Read {
        #[arg(long)]
        low: u32,
        /// Defaults to `low`
        #[arg(long)]
        high: Option<u32>,
    },
}

/// Parse a register value written either in decimal or as `0x`-prefixed hexadecimal.
fn parse_register_value(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("{s:?} is not a register value: {e}"))
}

fn load_config(path: Option<&PathBuf>) -> SystemConfig {
    match path {
        Some(path) => SystemConfig::from_files(&[path.as_path()]),
        None => SystemConfig::load(),
    }
}

fn run(cli: Cli) -> Result<String, Box<dyn Error>> {
    if let Commands::Copy { src, dst } = &cli.command {
        return Ok(copy_handler(src, dst)?);
    }

    let config = load_config(cli.config.as_ref());
    let requested = if cli.dry_run { Mode::DryRun } else { Mode::Live };
    let sata = BoardSequencer::open(requested, config)?;
    match cli.command {
        Commands::Bitstream { file, quiet } => bitstream_handler(&sata, file.as_deref(), quiet),
        Commands::Reset { values } => Ok(reset_handler(&sata, values)?),
        Commands::ResetOnce => Ok(reset_once_handler(&sata)?),
        Commands::ResetGet => Ok(reset_get_handler(&sata)?),
        Commands::Select { path } => Ok(select_handler(&sata, path)?),
        Commands::Gpio { command } => match command {
            GpioSubcommand::Export {
                direction,
                low,
                high,
            } => gpio_handler(&sata, Some(direction), low, high),
            GpioSubcommand::Read { low, high } => gpio_handler(&sata, None, low, high),
        },
        Commands::Copy { .. } => Err("copy is handled before the board is opened".into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    debug!("parsed cli command with {cli:?}");
    let message = run(cli)?;
    if !message.is_empty() {
        println!("{message}");
    }
    Ok(())
}
