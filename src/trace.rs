// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-instruction trace lines.
//!
//! One line per executed instruction, written to stdout when the
//! configuration enables tracing:
//!
//! ```text
//! 1000| 8e 00 01    LDX     X=0001 m:1          cc=00 a=00 b=00 dp=00 x=0001 y=0000 u=0000 s=0000 | ........ | >>mem info not active<<
//! ```
//!
//! Register values are the post-instruction state; the raw opcode bytes are
//! re-read from memory at the opcode address.

use std::fmt::Write as _;

use crate::interpreter::Operand;
use crate::isa::{OpcodeDesc, RegisterId};
use crate::memory_access::MemoryAccess;
use crate::Mc6809;

fn register_info(cpu: &Mc6809, register: RegisterId) -> String {
    match register {
        RegisterId::A => format!("A={:02x}", cpu.regs.a),
        RegisterId::B => format!("B={:02x}", cpu.regs.b),
        RegisterId::Cc => format!("CC={:02x}", u8::from(cpu.regs.cc)),
        RegisterId::Dp => format!("DP={:02x}", cpu.regs.dp),
        RegisterId::D => format!("D={:04x}", cpu.regs.d()),
        RegisterId::Pc => format!("PC={:04x}", cpu.regs.pc),
        RegisterId::S => format!("S={:04x}", cpu.regs.s),
        RegisterId::U => format!("U={:04x}", cpu.regs.u),
        RegisterId::X => format!("X={:04x}", cpu.regs.x),
        RegisterId::Y => format!("Y={:04x}", cpu.regs.y),
    }
}

/// Prints the trace line for the instruction that just executed.
pub(crate) fn emit<M: MemoryAccess>(
    cpu: &Mc6809,
    memory: &mut M,
    desc: &OpcodeDesc,
    op_address: u16,
    operand: &Operand,
) {
    let mut op_bytes = String::new();
    for i in 0..desc.bytes {
        if i > 0 {
            op_bytes.push(' ');
        }
        let byte = memory.read_byte(op_address.wrapping_add(i as u16));
        let _ = write!(op_bytes, "{byte:02x}");
    }

    let mut args = Vec::new();
    if let Some(register) = desc.register {
        args.push(register_info(cpu, register));
    }
    if let Some(ea) = operand.ea {
        args.push(format!("ea:{ea:04x}"));
    }
    if let Some(m) = operand.m {
        args.push(format!("m:{m:x}"));
    }

    println!(
        "{op_address:04x}| {op_bytes:<11} {mnemonic:<7} {args:<19} {cpu_info} | {cc_info} | {mem_info}",
        mnemonic = desc.mnemonic,
        args = args.join(" "),
        cpu_info = cpu.cpu_info(),
        cc_info = cpu.regs.cc.flag_text(),
        mem_info = cpu.cfg.mem_info_for(op_address),
    );
}
