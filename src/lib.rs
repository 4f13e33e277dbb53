// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Motorola MC6809 interpreter and disassembler.
//!
//! This library emulates the documented instruction set of the MC6809
//! 8/16-bit microprocessor: opcode decode (including the 0x10/0x11
//! page-prefixed opcodes), every addressing mode, the condition code update
//! rules, the two hardware stacks, reset and maskable interrupt delivery, and
//! a running cycle count that matches the per-opcode timings of the data
//! sheet tables. A table-driven disassembler shares the same ISA description.
//!
//! The library has been designed to be embedded in a whole-machine emulator
//! (a Dragon 32 or a TRS-80 Color Computer are the usual hosts): the memory
//! map is application-dependent, so the user implements the [MemoryAccess]
//! trait on their memory structure and passes it to the core on each call.
//! A standalone host can instead use the provided [memory_access::Ram] and
//! drive the core through [Mc6809::step] directly, or through the burst
//! scheduler ([Mc6809::run]) when pacing against a target clock rate.
//!
//! # Basic usage
//!
//! ```
//! use mc6809::{Config, Mc6809};
//! use mc6809::memory_access::{MemoryAccess, Ram};
//!
//! let mut memory = Ram::new();
//! memory.load(0x1000, &[0x86, 0x22]);             // LDA #$22
//! memory.write_word(mc6809::exception::RESET_VECTOR, 0x1000);
//!
//! let mut cpu = Mc6809::new(Config::default());
//! cpu.reset(&mut memory);
//! cpu.step(&mut memory).unwrap();
//! assert_eq!(cpu.regs.a, 0x22);
//! ```
//!
//! # What is not emulated
//!
//! Pin-level bus timing and undocumented opcodes are out of scope. SWI,
//! SWI2, SWI3, SYNC, CWAI and the undocumented RESET opcode decode but stop
//! the core with [exception::CpuError::NotImplemented].

pub mod addressing_modes;
pub mod condition_codes;
pub mod config;
pub mod disassembler;
pub mod exception;
mod interpreter;
pub mod isa;
pub mod memory_access;
pub mod scheduler;
mod trace;
pub mod utils;

pub use condition_codes::ConditionCodes;
pub use config::{Config, Machine};
pub use exception::CpuError;
pub use memory_access::MemoryAccess;

use scheduler::SyncCallback;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// How many instructions the first outer burst executes, before the
/// run-time adaptation kicks in.
const STARTUP_BURST_COUNT: usize = 100;

/// MC6809 registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    /// A - 8-bit accumulator.
    pub a: u8,
    /// B - 8-bit accumulator.
    pub b: u8,
    /// DP - 8-bit direct page register.
    pub dp: u8,
    /// X - 16-bit index register.
    pub x: u16,
    /// Y - 16-bit index register.
    pub y: u16,
    /// U - 16-bit user stack pointer.
    pub u: u16,
    /// S - 16-bit system stack pointer.
    pub s: u16,
    /// PC - 16-bit program counter.
    pub pc: u16,
    /// CC - condition code register.
    pub cc: ConditionCodes,
}

impl Registers {
    /// D, the 16-bit concatenation of A (high byte) and B (low byte).
    pub const fn d(&self) -> u16 {
        (self.a as u16) << 8 | self.b as u16
    }

    /// Writes D, splitting the value into A and B.
    pub fn set_d(&mut self, value: u16) {
        self.a = (value >> 8) as u8;
        self.b = value as u8;
    }
}

/// Machine state captured between instructions.
///
/// The state is sufficient to resume execution deterministically; see
/// [Mc6809::state] and [Mc6809::set_state].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuState {
    pub x: u16,
    pub y: u16,
    pub u: u16,
    pub s: u16,
    pub pc: u16,
    pub a: u8,
    pub b: u8,
    pub dp: u8,
    /// The packed condition code byte.
    pub cc: u8,
    pub cycles: u64,
    /// Copy of the 64 KiB address space.
    pub ram: Vec<u8>,
}

/// An MC6809 core.
///
/// The core is bound to a [Config] at construction and borrows the memory
/// system on each call. [Mc6809::reset] must be called once to populate PC
/// from the reset vector before executing instructions.
pub struct Mc6809 {
    /// The registers of the CPU.
    pub regs: Registers,
    /// Cumulative executed cycle count.
    pub cycles: u64,
    /// Whether [Mc6809::irq] delivers interrupts or ignores them.
    pub irq_enabled: bool,
    /// The configuration of the host machine.
    pub cfg: Config,

    /// Address of the opcode currently executing, for traces and errors.
    pub(crate) last_op_address: u16,
    /// Consecutive "NEG direct $00 on cleared memory" count; see the
    /// runaway-PC guard in the interpreter.
    pub(crate) wrong_neg_count: u8,
    pub(crate) undefined_reg_warned: bool,

    pub(crate) outer_burst_op_count: usize,
    pub(crate) inner_burst_op_count: usize,
    pub(crate) sync_callbacks: Vec<SyncCallback>,
    /// Sleep applied by the last throttled burst, in seconds.
    pub(crate) delay: f64,

    pub(crate) running: Arc<AtomicBool>,
    pub(crate) shared_cycles: Arc<AtomicU64>,
}

impl Mc6809 {
    /// Creates a new MC6809 core bound to the given configuration.
    ///
    /// All registers start at zero. Call [Mc6809::reset] to fetch the reset
    /// vector before running.
    pub fn new(cfg: Config) -> Self {
        Self {
            regs: Registers::default(),
            cycles: 0,
            irq_enabled: false,
            cfg,

            last_op_address: 0,
            wrong_neg_count: 0,
            undefined_reg_warned: false,

            outer_burst_op_count: STARTUP_BURST_COUNT,
            inner_burst_op_count: 100,
            sync_callbacks: Vec::new(),
            delay: 0.0,

            running: Arc::new(AtomicBool::new(true)),
            shared_cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    /// True until [Mc6809::stop] is called (or a status reporter fails).
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Requests the scheduler to return at the next outer-burst boundary.
    ///
    /// The instruction currently executing always completes; there is no
    /// preemptive cancellation.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// The adaptive outer burst size the next [Mc6809::burst_run] will use.
    pub fn outer_burst_count(&self) -> usize {
        self.outer_burst_op_count
    }

    /// Overrides the burst geometry. The outer count is readapted by
    /// [Mc6809::run]; the inner count stays until set again.
    pub fn set_burst_counts(&mut self, outer: usize, inner: usize) {
        self.outer_burst_op_count = outer;
        self.inner_burst_op_count = inner;
    }

    /// Captures the machine state, including a copy of the address space.
    pub fn state<M: MemoryAccess>(&self, memory: &mut M) -> CpuState {
        let mut ram = Vec::with_capacity(0x10000);
        for addr in 0..=0xFFFFu16 {
            ram.push(memory.read_byte(addr));
        }
        CpuState {
            x: self.regs.x,
            y: self.regs.y,
            u: self.regs.u,
            s: self.regs.s,
            pc: self.regs.pc,
            a: self.regs.a,
            b: self.regs.b,
            dp: self.regs.dp,
            cc: self.regs.cc.into(),
            cycles: self.cycles,
            ram,
        }
    }

    /// Restores a machine state captured by [Mc6809::state].
    pub fn set_state<M: MemoryAccess>(&mut self, memory: &mut M, state: &CpuState) {
        self.regs.x = state.x;
        self.regs.y = state.y;
        self.regs.u = state.u;
        self.regs.s = state.s;
        self.regs.pc = state.pc;
        self.regs.a = state.a;
        self.regs.b = state.b;
        self.regs.dp = state.dp;
        self.regs.cc = state.cc.into();
        self.cycles = state.cycles;
        memory.load(0x0000, &state.ram);
    }

    /// Formats the register file the way the trace output expects it.
    pub fn cpu_info(&self) -> String {
        format!(
            "cc={:02x} a={:02x} b={:02x} dp={:02x} x={:04x} y={:04x} u={:04x} s={:04x}",
            u8::from(self.regs.cc),
            self.regs.a,
            self.regs.b,
            self.regs.dp,
            self.regs.x,
            self.regs.y,
            self.regs.u,
            self.regs.s,
        )
    }
}
