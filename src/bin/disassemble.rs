// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Little program to disassemble the given MC6809 binary file.
//!
//! Usage: `disassemble <file> [--start-address <addr>] [--no-header]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mc6809::disassembler::{disassemble, format_lines};

/// Disassemble a MC6809 machine code file.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Input file to disassemble.
    file: PathBuf,

    /// Address the first byte of the file is loaded at.
    #[arg(long, default_value = "0", value_parser = parse_address)]
    start_address: u16,

    /// Leave out the disassembly header with the label table.
    #[arg(long)]
    no_header: bool,
}

/// Accepts plain decimal or 0x/$-prefixed hexadecimal addresses.
fn parse_address(text: &str) -> Result<u16, String> {
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix('$')) {
        u16::from_str_radix(hex, 16)
    } else {
        text.parse()
    };
    parsed.map_err(|e| format!("invalid address {text:?}: {e}"))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let code = match std::fs::read(&args.file) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", args.file.display());
            return ExitCode::FAILURE;
        }
    };

    println!("Disassembling file: {}", args.file.display());

    match disassemble(&code, args.start_address) {
        Ok(listing) => {
            for line in format_lines(&listing, !args.no_header) {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
