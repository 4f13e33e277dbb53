// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reset vectoring, interrupt delivery and the fatal error kinds.

use log::{error, info};
use thiserror::Error;

use crate::config::Machine;
use crate::memory_access::{MemoryAccess, StackPointer};
use crate::Mc6809;

pub const SWI3_VECTOR: u16 = 0xFFF2;
pub const SWI2_VECTOR: u16 = 0xFFF4;
pub const FIRQ_VECTOR: u16 = 0xFFF6;
pub const IRQ_VECTOR: u16 = 0xFFF8;
pub const SWI_VECTOR: u16 = 0xFFFA;
pub const NMI_VECTOR: u16 = 0xFFFC;
pub const RESET_VECTOR: u16 = 0xFFFE;

/// Fatal conditions that stop the dispatch loop.
///
/// There are no recoverable errors in the dispatcher: every variant aborts
/// the current run and carries enough context (address, opcode bytes) to
/// locate the fault.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CpuError {
    #[error("${address:04x} *** UNKNOWN OP ${opcode:02x}")]
    UnknownOpcode { address: u16, opcode: u16 },

    #[error("${address:04x} illegal indexed addressing mode in postbyte ${postbyte:02x}")]
    IllegalPostbyte { address: u16, postbyte: u8 },

    /// Raised when NEG direct keeps executing on zeroed memory: a runaway
    /// PC has landed in cleared RAM and is interpreting it as code.
    #[error("wrong PC? NEG $00 executed {count} times in a row at ${address:04x}")]
    RunawayProgramCounter { address: u16, count: u8 },

    #[error("${address:04x} {mnemonic} is not implemented")]
    NotImplemented { address: u16, mnemonic: &'static str },

    /// The bounded test runner hit its instruction budget.
    #[error("max ops {max_ops} arrived without reaching ${end:04x}")]
    MaxOpsReached { max_ops: usize, end: u16 },
}

impl Mc6809 {
    /// Resets the CPU: fetches PC from the reset vector and primes CC.
    ///
    /// Must be called once after construction, before executing instructions.
    /// A reset vector of 0x0000 is reported but not fatal; the host may have
    /// deliberately left ROM blank.
    pub fn reset<M: MemoryAccess>(&mut self, memory: &mut M) {
        info!("{:04x}| CPU reset:", self.regs.pc);

        self.last_op_address = 0;

        if self.cfg.machine == Machine::Sbc09 {
            // The sbc09 ROM entry is `orcc #$FF` and expects cleared flags.
            info!("\tset CC register to 0x00");
            self.regs.cc = crate::ConditionCodes::from(0x00u8);
        } else {
            info!("\tset E - 0x80 - bit 7 - Entire register state stacked");
            self.regs.cc.e = true;
        }

        info!("\tread reset vector from ${RESET_VECTOR:04x}");
        let ea = memory.read_word(RESET_VECTOR);
        info!("\tset PC to ${ea:04x}");
        if ea == 0x0000 {
            error!("Reset vector is ${ea:04x} ??? ROM loading in the right place?!?");
        }
        self.regs.pc = ea;
    }

    /// Delivers a maskable interrupt request.
    ///
    /// Ignored unless [Mc6809::irq_enabled] is set and CC.I is clear. Call
    /// this between instructions only; the dispatcher never checks for
    /// interrupts mid-instruction.
    pub fn irq<M: MemoryAccess>(&mut self, memory: &mut M) {
        if !self.irq_enabled || self.regs.cc.i {
            return;
        }

        if self.regs.cc.e {
            self.push_irq_registers(memory);
        } else {
            self.push_firq_registers(memory);
        }

        let ea = memory.read_word(IRQ_VECTOR);
        self.regs.pc = ea;
    }

    /// Stacks the entire machine state: PC, U, Y, X, DP, B, A, CC.
    fn push_irq_registers<M: MemoryAccess>(&mut self, memory: &mut M) {
        self.cycles += 1;
        self.push_word(memory, StackPointer::System, self.regs.pc);
        self.push_word(memory, StackPointer::System, self.regs.u);
        self.push_word(memory, StackPointer::System, self.regs.y);
        self.push_word(memory, StackPointer::System, self.regs.x);
        self.push_byte(memory, StackPointer::System, self.regs.dp);
        self.push_byte(memory, StackPointer::System, self.regs.b);
        self.push_byte(memory, StackPointer::System, self.regs.a);
        self.push_byte(memory, StackPointer::System, self.regs.cc.into());
    }

    /// Stacks the fast-interrupt subset: PC and CC only.
    fn push_firq_registers<M: MemoryAccess>(&mut self, memory: &mut M) {
        self.cycles += 1;
        self.push_word(memory, StackPointer::System, self.regs.pc);
        self.push_byte(memory, StackPointer::System, self.regs.cc.into());
    }

    /// RTI: recovers the machine state saved on interrupt entry.
    ///
    /// CC is pulled first; the restored E bit decides whether the full frame
    /// (A, B, DP, X, Y, U) follows. PC is always pulled last.
    pub(crate) fn instruction_rti<M: MemoryAccess>(&mut self, memory: &mut M) {
        let cc = self.pull_byte(memory, StackPointer::System);
        self.regs.cc = cc.into();
        if self.regs.cc.e {
            self.regs.a = self.pull_byte(memory, StackPointer::System);
            self.regs.b = self.pull_byte(memory, StackPointer::System);
            self.regs.dp = self.pull_byte(memory, StackPointer::System);
            self.regs.x = self.pull_word(memory, StackPointer::System);
            self.regs.y = self.pull_word(memory, StackPointer::System);
            self.regs.u = self.pull_word(memory, StackPointer::System);
        }
        self.regs.pc = self.pull_word(memory, StackPointer::System);
    }
}
