// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static disassembler built on the shared ISA table.
//!
//! The disassembler walks a byte sequence from a start address, merging the
//! 0x10/0x11 page prefixes into 16-bit opcode keys and consuming the operand
//! bytes the descriptor declares. A first pass collects the EXTENDED
//! operands of the branch and call mnemonics and assigns them `LABEL000`..
//! style names in ascending address order; the listing then prefixes the
//! labelled lines and substitutes the label for the raw target address.
//!
//! ```
//! use mc6809::disassembler::{disassemble, format_lines};
//!
//! let code = [0x8E, 0x00, 0x01, 0xBD, 0x40, 0x06, 0x39];
//! let listing = disassemble(&code, 0x1000).unwrap();
//! let lines = format_lines(&listing, true);
//! assert!(lines.contains(&"; LABEL000 = $4006".to_owned()));
//! assert!(lines.contains(&"1003| BD 40 06    JSR LABEL000".to_owned()));
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use thiserror::Error;

use crate::isa::{self, AddrMode, OpcodeDesc};

/// Fatal decode errors. The disassembler never skips bytes: the first
/// unknown or cut-off instruction aborts the run.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DisassemblyError {
    #[error("${address:04x} *** UNKNOWN OP ${opcode:02x}")]
    UnknownOpcode { address: u16, opcode: u16 },

    #[error("${address:04x} truncated instruction: ${opcode:02x} needs {needed} bytes, {remaining} left")]
    Truncated { address: u16, opcode: u16, needed: u8, remaining: usize },
}

/// One decoded instruction.
#[derive(Clone, Debug)]
pub struct Line {
    /// Address of the opcode (start address plus offset).
    pub address: u16,
    /// Full opcode key, including the page prefix byte when present.
    pub opcode: u16,
    pub desc: &'static OpcodeDesc,
    /// The operand bytes following the opcode.
    pub operand_bytes: Vec<u8>,
}

impl Line {
    /// The raw instruction bytes: the opcode hex digits joined, then the
    /// operand bytes, space-separated (`"108C 12 34"`, `"BD 40 06"`).
    pub fn hex_bytes(&self) -> String {
        let mut text = if self.opcode > 0xFF {
            format!("{:04X}", self.opcode)
        } else {
            format!("{:02X}", self.opcode)
        };
        for byte in &self.operand_bytes {
            let _ = write!(text, " {byte:02X}");
        }
        text
    }

    /// The operand bytes read as one big-endian number.
    pub fn operand_value(&self) -> Option<u16> {
        match self.operand_bytes.len() {
            1 => Some(self.operand_bytes[0] as u16),
            2 => Some((self.operand_bytes[0] as u16) << 8 | self.operand_bytes[1] as u16),
            _ => None,
        }
    }

    /// The branch/call target this line names via extended addressing.
    fn extended_target(&self) -> Option<u16> {
        if !self.desc.isa.is_branch_or_call() {
            return None;
        }
        match self.desc.addr_mode {
            AddrMode::Extended | AddrMode::ExtendedWord => self.operand_value(),
            _ => None,
        }
    }
}

/// A decoded byte sequence plus the label table of its branch targets.
#[derive(Clone, Debug)]
pub struct Disassembly {
    pub start_address: u16,
    pub lines: Vec<Line>,
    /// Branch/call targets, in ascending address order, named LABEL000..
    pub labels: BTreeMap<u16, String>,
}

/// Disassembles `code`, laid out in memory starting at `start_address`.
pub fn disassemble(code: &[u8], start_address: u16) -> Result<Disassembly, DisassemblyError> {
    let mut lines = Vec::new();
    let mut pos = 0usize;

    while pos < code.len() {
        let address = start_address.wrapping_add(pos as u16);
        let mut opcode = code[pos] as u16;
        let mut opcode_len = 1;

        if opcode == 0x10 || opcode == 0x11 {
            if pos + 1 >= code.len() {
                return Err(DisassemblyError::Truncated {
                    address,
                    opcode,
                    needed: 2,
                    remaining: code.len() - pos,
                });
            }
            opcode = opcode << 8 | code[pos + 1] as u16;
            opcode_len = 2;
        }

        let desc = isa::lookup(opcode).ok_or(DisassemblyError::UnknownOpcode { address, opcode })?;

        let total = desc.bytes as usize;
        if pos + total > code.len() {
            return Err(DisassemblyError::Truncated {
                address,
                opcode,
                needed: desc.bytes,
                remaining: code.len() - pos,
            });
        }

        lines.push(Line {
            address,
            opcode,
            desc,
            operand_bytes: code[pos + opcode_len..pos + total].to_vec(),
        });
        pos += total;
    }

    let mut targets: Vec<u16> = lines.iter().filter_map(Line::extended_target).collect();
    targets.sort_unstable();
    targets.dedup();
    let labels = targets
        .into_iter()
        .enumerate()
        .map(|(index, address)| (address, format!("LABEL{index:03}")))
        .collect();

    Ok(Disassembly { start_address, lines, labels })
}

/// Renders the listing, one string per output line.
///
/// With the header enabled, the listing starts with comment lines holding
/// the start address and the label-to-address mapping.
pub fn format_lines(disassembly: &Disassembly, with_header: bool) -> Vec<String> {
    let mut out = Vec::new();

    if with_header {
        out.push("; Disassembly".to_owned());
        out.push(format!("; start address: ${:04X}", disassembly.start_address));
        for (address, name) in &disassembly.labels {
            out.push(format!("; {name} = ${address:04X}"));
        }
        out.push(";".to_owned());
    }

    for line in &disassembly.lines {
        if let Some(name) = disassembly.labels.get(&line.address) {
            out.push(format!("{name}:"));
        }

        let operand_text = match line.extended_target().and_then(|t| disassembly.labels.get(&t)) {
            Some(label) => Some(label.clone()),
            None => line.operand_value().map(|value| {
                if line.operand_bytes.len() == 1 {
                    format!("${value:02X}")
                } else {
                    format!("${value:04X}")
                }
            }),
        };

        let mut text = format!("{:04X}| {:<10}  {}", line.address, line.hex_bytes(), line.desc.mnemonic);
        if let Some(operand) = operand_text {
            let _ = write!(text, " {operand}");
        }
        out.push(text);
    }

    out
}
