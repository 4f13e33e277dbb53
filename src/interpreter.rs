// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Instruction dispatch and the semantic operations.
//!
//! [Mc6809::step] reads the opcode at PC (merging the 0x10/0x11 page
//! prefixes into 16-bit keys), resolves the descriptor in the ISA table,
//! fetches the operand and/or effective address the descriptor asks for,
//! runs the semantic routine, performs the memory write-back when the
//! descriptor declares one, and finally charges the base cycle count.
//!
//! The 8-bit arithmetic routines all follow the same pattern: compute in
//! 16-bit arithmetic, store the result masked to 8 bits, derive the flags
//! from the wide `(a, m, r)` triple. The 16-bit routines widen to 32 bits
//! the same way.

use log::warn;

use crate::exception::CpuError;
use crate::isa::{self, AddrMode, Isa, OpcodeDesc, RegisterId, Width};
use crate::memory_access::{MemoryAccess, StackPointer};
use crate::trace;
use crate::Mc6809;

/// Operand material prepared by the addressing-mode resolver for one
/// instruction: the effective address and/or the fetched memory value.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Operand {
    pub ea: Option<u16>,
    pub m: Option<u16>,
}

impl Operand {
    fn ea(&self) -> u16 {
        self.ea.expect("descriptor provides an effective address")
    }

    fn m(&self) -> u16 {
        self.m.expect("descriptor provides a memory operand")
    }
}

/// Register pair encoding of the TFR/EXG postbyte nibbles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InterRegister {
    D,
    X,
    Y,
    U,
    S,
    Pc,
    A,
    B,
    Cc,
    Dp,
    /// Nibbles 0x6, 0x7 and 0xC..=0xF. Reads yield 0xFFFF, writes are
    /// dropped.
    Undefined,
}

impl InterRegister {
    fn from_nibble(nibble: u8) -> Self {
        match nibble {
            0x0 => Self::D,
            0x1 => Self::X,
            0x2 => Self::Y,
            0x3 => Self::U,
            0x4 => Self::S,
            0x5 => Self::Pc,
            0x8 => Self::A,
            0x9 => Self::B,
            0xA => Self::Cc,
            0xB => Self::Dp,
            _ => Self::Undefined,
        }
    }

    const fn is_wide(self) -> bool {
        matches!(
            self,
            Self::D | Self::X | Self::Y | Self::U | Self::S | Self::Pc | Self::Undefined
        )
    }
}

impl Mc6809 {
    /// Executes one instruction.
    ///
    /// On a fatal decode error the CPU state is left as it was after the
    /// opcode fetch; nothing is written back.
    pub fn step<M: MemoryAccess>(&mut self, memory: &mut M) -> Result<(), CpuError> {
        let op_address = self.regs.pc;
        self.last_op_address = op_address;

        let mut opcode = self.read_pc_byte(memory) as u16;
        if opcode == 0x10 || opcode == 0x11 {
            let second = self.read_pc_byte(memory);
            opcode = opcode << 8 | second as u16;
            // The page prefix costs one fetch cycle on top of the paged
            // opcode's own count.
            self.cycles += 1;
        }

        let desc = isa::lookup(opcode).ok_or(CpuError::UnknownOpcode {
            address: op_address,
            opcode,
        })?;

        let operand = self.prepare_operand(memory, desc)?;
        self.execute(memory, desc, opcode, operand)?;
        self.cycles += desc.cycles as u64;

        if self.cfg.trace {
            trace::emit(self, memory, desc, op_address, &operand);
        }

        Ok(())
    }

    /// Runs from `start` until PC reaches `end`, or fails after `max_ops`
    /// instructions.
    pub fn run_until<M: MemoryAccess>(
        &mut self,
        memory: &mut M,
        start: u16,
        end: u16,
        max_ops: usize,
    ) -> Result<(), CpuError> {
        self.regs.pc = start;
        for _ in 0..max_ops {
            if self.regs.pc == end {
                return Ok(());
            }
            self.step(memory)?;
        }
        Err(CpuError::MaxOpsReached { max_ops, end })
    }

    /// Runs exactly `count` instructions starting at `start`.
    pub fn run_steps<M: MemoryAccess>(
        &mut self,
        memory: &mut M,
        start: u16,
        count: usize,
    ) -> Result<(), CpuError> {
        self.regs.pc = start;
        for _ in 0..count {
            self.step(memory)?;
        }
        Ok(())
    }

    fn prepare_operand<M: MemoryAccess>(
        &mut self,
        memory: &mut M,
        desc: &OpcodeDesc,
    ) -> Result<Operand, CpuError> {
        let ea = match desc.addr_mode {
            AddrMode::Inherent | AddrMode::Immediate | AddrMode::ImmediateWord => None,
            AddrMode::Direct | AddrMode::DirectWord => Some(self.ea_direct(memory)),
            AddrMode::Extended | AddrMode::ExtendedWord => Some(self.ea_extended(memory)),
            AddrMode::Indexed | AddrMode::IndexedWord => Some(self.ea_indexed(memory)?),
            AddrMode::Relative => Some(self.ea_relative(memory)),
            AddrMode::RelativeWord => Some(self.ea_relative_word(memory)),
        };

        let m = match (desc.addr_mode, desc.read) {
            (_, Width::None) => None,
            (AddrMode::Immediate, _) => Some(self.read_pc_byte(memory) as u16),
            (AddrMode::ImmediateWord, _) => Some(self.read_pc_word(memory)),
            (_, Width::Byte) => Some(memory.read_byte(ea.expect("memory read needs an EA")) as u16),
            (_, Width::Word) => Some(memory.read_word(ea.expect("memory read needs an EA"))),
        };

        Ok(Operand { ea, m })
    }

    fn execute<M: MemoryAccess>(
        &mut self,
        memory: &mut M,
        desc: &OpcodeDesc,
        opcode: u16,
        operand: Operand,
    ) -> Result<(), CpuError> {
        // Memory value written back through `desc.write` at the end.
        let mut writeback: Option<u16> = None;

        match desc.isa {
            Isa::Abx => self.regs.x = self.regs.x.wrapping_add(self.regs.b as u16),
            Isa::Adc => {
                let a = self.reg8(desc);
                let r = self.add8(a, operand.m() as u8, self.regs.cc.c);
                self.set_reg8(desc, r);
            }
            Isa::Add8 => {
                let a = self.reg8(desc);
                let r = self.add8(a, operand.m() as u8, false);
                self.set_reg8(desc, r);
            }
            Isa::Add16 => {
                let old = self.regs.d() as u32;
                let m = operand.m() as u32;
                let r = old + m;
                self.regs.set_d(r as u16);
                self.regs.cc.clear_nzvc();
                self.regs.cc.update_nzvc_16(old, m, r);
            }
            Isa::And => {
                let a = self.reg8(desc);
                let r = a & operand.m() as u8;
                self.set_reg8(desc, r);
                self.regs.cc.clear_nzv();
                self.regs.cc.update_nz_8(r as u16);
            }
            Isa::AndCC => {
                let old: u8 = self.regs.cc.into();
                self.regs.cc = (old & operand.m() as u8).into();
            }
            Isa::Asr => {
                if desc.needs_ea {
                    writeback = Some(self.asr8(operand.m() as u8) as u16);
                } else {
                    let a = self.reg8(desc);
                    let r = self.asr8(a);
                    self.set_reg8(desc, r);
                }
            }
            Isa::Bra
            | Isa::Brn
            | Isa::Beq
            | Isa::Bne
            | Isa::Bmi
            | Isa::Bpl
            | Isa::Bvs
            | Isa::Bvc
            | Isa::Bcs
            | Isa::Bcc
            | Isa::Bge
            | Isa::Blt
            | Isa::Bgt
            | Isa::Ble
            | Isa::Bhi
            | Isa::Bls => {
                let ea = operand.ea();
                if self.branch_taken(desc.isa) {
                    self.regs.pc = ea;
                }
            }
            Isa::Bit => {
                let r = self.reg8(desc) & operand.m() as u8;
                self.regs.cc.clear_nzv();
                self.regs.cc.update_nz_8(r as u16);
            }
            Isa::Clr => {
                if desc.needs_ea {
                    writeback = Some(0x00);
                } else {
                    self.set_reg8(desc, 0x00);
                }
                self.regs.cc.update_0100();
            }
            Isa::Cmp8 => {
                let a = self.reg8(desc);
                self.sub8(a, operand.m() as u8, false);
            }
            Isa::Cmp16 => {
                let a = self.reg16(desc);
                self.sub16(a, operand.m());
            }
            Isa::Com => {
                if desc.needs_ea {
                    writeback = Some(self.com8(operand.m() as u8) as u16);
                } else {
                    let a = self.reg8(desc);
                    let r = self.com8(a);
                    self.set_reg8(desc, r);
                }
            }
            Isa::Cwai | Isa::Reset | Isa::Swi | Isa::Swi2 | Isa::Swi3 | Isa::Sync => {
                return Err(CpuError::NotImplemented {
                    address: self.last_op_address,
                    mnemonic: desc.mnemonic,
                });
            }
            Isa::Daa => self.instruction_daa(),
            Isa::Dec => {
                if desc.needs_ea {
                    writeback = Some(self.dec8(operand.m() as u8) as u16);
                } else {
                    let a = self.reg8(desc);
                    let r = self.dec8(a);
                    self.set_reg8(desc, r);
                }
            }
            Isa::Eor => {
                let a = self.reg8(desc);
                let r = a ^ operand.m() as u8;
                self.set_reg8(desc, r);
                self.regs.cc.clear_nzv();
                self.regs.cc.update_nz_8(r as u16);
            }
            Isa::Exg => self.instruction_exg(operand.m() as u8),
            Isa::Inc => {
                if desc.needs_ea {
                    writeback = Some(self.inc8(operand.m() as u8) as u16);
                } else {
                    let a = self.reg8(desc);
                    let r = self.inc8(a);
                    self.set_reg8(desc, r);
                }
            }
            Isa::Jmp => self.regs.pc = operand.ea(),
            Isa::Jsr => {
                self.push_word(memory, StackPointer::System, self.regs.pc);
                self.regs.pc = operand.ea();
            }
            Isa::Ld8 => {
                let m = operand.m();
                self.set_reg8(desc, m as u8);
                self.regs.cc.clear_nzv();
                self.regs.cc.update_nz_8(m);
            }
            Isa::Ld16 => {
                let m = operand.m();
                self.set_reg16(desc, m);
                self.regs.cc.clear_nzv();
                self.regs.cc.update_nz_16(m as u32);
            }
            Isa::Lea => {
                let ea = operand.ea();
                self.set_reg16(desc, ea);
                // LEAX/LEAY track Z for counter use; LEAS/LEAU leave the
                // flags alone so stack cleanup cannot clobber a return flag.
                if matches!(desc.register, Some(RegisterId::X) | Some(RegisterId::Y)) {
                    self.regs.cc.z = false;
                    self.regs.cc.set_z16(ea as u32);
                }
            }
            Isa::Lsl => {
                if desc.needs_ea {
                    writeback = Some(self.lsl8(operand.m() as u8) as u16);
                } else {
                    let a = self.reg8(desc);
                    let r = self.lsl8(a);
                    self.set_reg8(desc, r);
                }
            }
            Isa::Lsr => {
                if desc.needs_ea {
                    writeback = Some(self.lsr8(operand.m() as u8) as u16);
                } else {
                    let a = self.reg8(desc);
                    let r = self.lsr8(a);
                    self.set_reg8(desc, r);
                }
            }
            Isa::Mul => {
                let r = self.regs.a as u16 * self.regs.b as u16;
                self.regs.set_d(r);
                self.regs.cc.z = r == 0;
                // C mirrors bit 7 of the product for the MUL; ADCA #0
                // rounding idiom.
                self.regs.cc.c = r & 0x80 != 0;
            }
            Isa::Neg => {
                if desc.needs_ea {
                    let (ea, m) = (operand.ea(), operand.m() as u8);
                    self.check_wrong_neg(opcode, ea, m)?;
                    writeback = Some(self.neg8(m) as u16);
                } else {
                    let a = self.reg8(desc);
                    let r = self.neg8(a);
                    self.set_reg8(desc, r);
                }
            }
            Isa::Nop => {}
            Isa::Or => {
                let a = self.reg8(desc);
                let r = a | operand.m() as u8;
                self.set_reg8(desc, r);
                self.regs.cc.clear_nzv();
                self.regs.cc.update_nz_8(r as u16);
            }
            Isa::OrCC => {
                let old: u8 = self.regs.cc.into();
                self.regs.cc = (old | operand.m() as u8).into();
            }
            Isa::Psh => self.instruction_psh(memory, desc, operand.m() as u8),
            Isa::Pul => self.instruction_pul(memory, desc, operand.m() as u8),
            Isa::Rol => {
                if desc.needs_ea {
                    writeback = Some(self.rol8(operand.m() as u8) as u16);
                } else {
                    let a = self.reg8(desc);
                    let r = self.rol8(a);
                    self.set_reg8(desc, r);
                }
            }
            Isa::Ror => {
                if desc.needs_ea {
                    writeback = Some(self.ror8(operand.m() as u8) as u16);
                } else {
                    let a = self.reg8(desc);
                    let r = self.ror8(a);
                    self.set_reg8(desc, r);
                }
            }
            Isa::Rti => self.instruction_rti(memory),
            Isa::Rts => self.regs.pc = self.pull_word(memory, StackPointer::System),
            Isa::Sbc => {
                let a = self.reg8(desc);
                let r = self.sub8(a, operand.m() as u8, self.regs.cc.c);
                self.set_reg8(desc, r);
            }
            Isa::Sex => {
                // Only a positive B clears A; a negative B leaves whatever
                // the caller had in A.
                if self.regs.b & 0x80 == 0 {
                    self.regs.a = 0x00;
                }
                let d = self.regs.d();
                self.regs.cc.clear_nz();
                self.regs.cc.update_nz_16(d as u32);
            }
            Isa::St8 => {
                let value = self.reg8(desc);
                self.regs.cc.clear_nzv();
                self.regs.cc.update_nz_8(value as u16);
                writeback = Some(value as u16);
            }
            Isa::St16 => {
                let value = self.reg16(desc);
                self.regs.cc.clear_nzv();
                self.regs.cc.update_nz_16(value as u32);
                writeback = Some(value);
            }
            Isa::Sub8 => {
                let a = self.reg8(desc);
                let r = self.sub8(a, operand.m() as u8, false);
                self.set_reg8(desc, r);
            }
            Isa::Sub16 => {
                let a = self.reg16(desc);
                let r = self.sub16(a, operand.m());
                self.set_reg16(desc, r);
            }
            Isa::Tfr => self.instruction_tfr(operand.m() as u8),
            Isa::Tst => {
                let value = if desc.register.is_some() {
                    self.reg8(desc) as u16
                } else {
                    operand.m()
                };
                self.regs.cc.clear_nzv();
                self.regs.cc.update_nz_8(value);
            }
        }

        match desc.write {
            Width::None => {}
            Width::Byte => {
                let value = writeback.expect("byte write-back value");
                memory.write_byte(operand.ea(), value as u8);
            }
            Width::Word => {
                let value = writeback.expect("word write-back value");
                memory.write_word(operand.ea(), value);
            }
        }

        Ok(())
    }

    // ---- operand register access, driven by the descriptor ----

    fn reg8(&self, desc: &OpcodeDesc) -> u8 {
        match desc.register {
            Some(RegisterId::A) => self.regs.a,
            Some(RegisterId::B) => self.regs.b,
            Some(RegisterId::Dp) => self.regs.dp,
            Some(RegisterId::Cc) => self.regs.cc.into(),
            _ => unreachable!("{} has no 8-bit register operand", desc.mnemonic),
        }
    }

    fn set_reg8(&mut self, desc: &OpcodeDesc, value: u8) {
        match desc.register {
            Some(RegisterId::A) => self.regs.a = value,
            Some(RegisterId::B) => self.regs.b = value,
            Some(RegisterId::Dp) => self.regs.dp = value,
            Some(RegisterId::Cc) => self.regs.cc = value.into(),
            _ => unreachable!("{} has no 8-bit register operand", desc.mnemonic),
        }
    }

    fn reg16(&self, desc: &OpcodeDesc) -> u16 {
        match desc.register {
            Some(RegisterId::D) => self.regs.d(),
            Some(RegisterId::X) => self.regs.x,
            Some(RegisterId::Y) => self.regs.y,
            Some(RegisterId::U) => self.regs.u,
            Some(RegisterId::S) => self.regs.s,
            Some(RegisterId::Pc) => self.regs.pc,
            _ => unreachable!("{} has no 16-bit register operand", desc.mnemonic),
        }
    }

    fn set_reg16(&mut self, desc: &OpcodeDesc, value: u16) {
        match desc.register {
            Some(RegisterId::D) => self.regs.set_d(value),
            Some(RegisterId::X) => self.regs.x = value,
            Some(RegisterId::Y) => self.regs.y = value,
            Some(RegisterId::U) => self.regs.u = value,
            Some(RegisterId::S) => self.regs.s = value,
            Some(RegisterId::Pc) => self.regs.pc = value,
            _ => unreachable!("{} has no 16-bit register operand", desc.mnemonic),
        }
    }

    // ---- arithmetic and logic kernels ----

    fn add8(&mut self, a: u8, m: u8, carry: bool) -> u8 {
        let (a, m) = (a as u16, m as u16);
        let r = a + m + carry as u16;
        self.regs.cc.clear_hnzvc();
        self.regs.cc.update_hnzvc_8(a, m, r);
        r as u8
    }

    /// SUB/SBC/CMP kernel. C is the inverse of the resulting binary carry,
    /// i.e. set on borrow.
    fn sub8(&mut self, a: u8, m: u8, borrow: bool) -> u8 {
        let (a, m) = (a as u16, m as u16);
        let r = a.wrapping_sub(m).wrapping_sub(borrow as u16);
        self.regs.cc.clear_nzvc();
        self.regs.cc.update_nzvc_8(a, m, r);
        r as u8
    }

    fn sub16(&mut self, a: u16, m: u16) -> u16 {
        let (a, m) = (a as u32, m as u32);
        let r = a.wrapping_sub(m);
        self.regs.cc.clear_nzvc();
        self.regs.cc.update_nzvc_16(a, m, r);
        r as u16
    }

    fn com8(&mut self, value: u8) -> u8 {
        let r = !(value as u16);
        self.regs.cc.clear_nz();
        self.regs.cc.update_nz01_8(r);
        r as u8
    }

    /// V is set only when the decrement runs 0x80 into 0x7F; C is untouched
    /// so DEC works as a loop counter in multiple-precision code.
    fn dec8(&mut self, a: u8) -> u8 {
        let r = (a as u16).wrapping_sub(1);
        self.regs.cc.clear_nzv();
        self.regs.cc.update_nz_8(r);
        if r == 0x7F {
            self.regs.cc.v = true;
        }
        r as u8
    }

    fn inc8(&mut self, a: u8) -> u8 {
        let r = a as u16 + 1;
        self.regs.cc.clear_nzv();
        self.regs.cc.update_nz_8(r);
        if r == 0x80 {
            self.regs.cc.v = true;
        }
        r as u8
    }

    /// NEG computes its flags as a subtraction from zero, so 0x00 leaves C
    /// clear and 0x80 is the only value that sets V.
    fn neg8(&mut self, value: u8) -> u8 {
        let r = 0u16.wrapping_sub(value as u16);
        self.regs.cc.clear_nzvc();
        self.regs.cc.update_nzvc_8(0, value as u16, r);
        r as u8
    }

    fn lsl8(&mut self, a: u8) -> u8 {
        let r = (a as u16) << 1;
        self.regs.cc.clear_nzvc();
        // V reflects bit-7-vs-bit-6 disagreement of the shifted value.
        self.regs.cc.update_nzvc_8(a as u16, a as u16, r);
        r as u8
    }

    fn lsr8(&mut self, a: u8) -> u8 {
        let r = (a as u16) >> 1;
        self.regs.cc.clear_nzc();
        self.regs.cc.c = a & 0x01 != 0;
        self.regs.cc.set_z8(r);
        r as u8
    }

    fn asr8(&mut self, a: u8) -> u8 {
        let r = (a as u16 >> 1) | (a as u16 & 0x80);
        self.regs.cc.clear_nzc();
        self.regs.cc.c = a & 0x01 != 0;
        self.regs.cc.update_nz_8(r);
        r as u8
    }

    /// 9-bit rotate left through C.
    fn rol8(&mut self, a: u8) -> u8 {
        let r = (a as u16) << 1 | self.regs.cc.c as u16;
        self.regs.cc.clear_nzvc();
        self.regs.cc.update_nzvc_8(a as u16, a as u16, r);
        r as u8
    }

    /// 9-bit rotate right through C.
    fn ror8(&mut self, a: u8) -> u8 {
        let r = (a as u16 >> 1) | (self.regs.cc.c as u16) << 7;
        self.regs.cc.clear_nz();
        self.regs.cc.update_nz_8(r);
        self.regs.cc.c = a & 0x01 != 0;
        r as u8
    }

    fn instruction_daa(&mut self) {
        let a = self.regs.a as u16;
        let a_hi = a & 0xF0;
        let a_lo = a & 0x0F;

        let mut correction_factor = 0u16;
        if a_lo > 0x09 || self.regs.cc.h {
            correction_factor |= 0x06;
        }
        if a_hi > 0x80 && a_lo > 0x09 {
            correction_factor |= 0x60;
        }
        if a_hi > 0x90 || self.regs.cc.c {
            correction_factor |= 0x60;
        }

        let new_value = correction_factor + a;
        self.regs.a = new_value as u8;

        // V is undefined; C is retained through the set-only helper.
        self.regs.cc.clear_nz();
        self.regs.cc.update_nzc_8(new_value);
    }

    /// The NEG direct encoding is all zero bytes, so a PC that escapes into
    /// cleared RAM executes it forever. Treat a streak of them as fatal.
    fn check_wrong_neg(&mut self, opcode: u16, ea: u16, m: u8) -> Result<(), CpuError> {
        if opcode == 0x00 && ea == 0x00 && m == 0x00 {
            self.wrong_neg_count += 1;
            if self.wrong_neg_count > 10 {
                return Err(CpuError::RunawayProgramCounter {
                    address: self.last_op_address,
                    count: self.wrong_neg_count,
                });
            }
        } else {
            self.wrong_neg_count = 0;
        }
        Ok(())
    }

    // ---- register transfers ----

    fn read_inter_register(&mut self, reg: InterRegister) -> u16 {
        match reg {
            InterRegister::D => self.regs.d(),
            InterRegister::X => self.regs.x,
            InterRegister::Y => self.regs.y,
            InterRegister::U => self.regs.u,
            InterRegister::S => self.regs.s,
            InterRegister::Pc => self.regs.pc,
            InterRegister::A => self.regs.a as u16,
            InterRegister::B => self.regs.b as u16,
            InterRegister::Cc => u8::from(self.regs.cc) as u16,
            InterRegister::Dp => self.regs.dp as u16,
            InterRegister::Undefined => 0xFFFF,
        }
    }

    fn write_inter_register(&mut self, reg: InterRegister, value: u16) {
        match reg {
            InterRegister::D => self.regs.set_d(value),
            InterRegister::X => self.regs.x = value,
            InterRegister::Y => self.regs.y = value,
            InterRegister::U => self.regs.u = value,
            InterRegister::S => self.regs.s = value,
            InterRegister::Pc => self.regs.pc = value,
            InterRegister::A => self.regs.a = value as u8,
            InterRegister::B => self.regs.b = value as u8,
            InterRegister::Cc => self.regs.cc = (value as u8).into(),
            InterRegister::Dp => self.regs.dp = value as u8,
            InterRegister::Undefined => {
                if !self.undefined_reg_warned {
                    warn!("Set value to 'undefined' register!");
                    self.undefined_reg_warned = true;
                }
            }
        }
    }

    /// An 8-bit source transfers into a 16-bit destination as 0xFF00 | v;
    /// a 16-bit source into an 8-bit destination keeps the low byte.
    fn convert_different_width(&mut self, src: InterRegister, dst: InterRegister) -> u16 {
        let value = self.read_inter_register(src);
        if !src.is_wide() && dst.is_wide() {
            0xFF00 | value
        } else if src.is_wide() && !dst.is_wide() {
            value & 0x00FF
        } else {
            value
        }
    }

    fn instruction_tfr(&mut self, postbyte: u8) {
        let src = InterRegister::from_nibble(postbyte >> 4);
        let dst = InterRegister::from_nibble(postbyte & 0x0F);
        let value = self.convert_different_width(src, dst);
        self.write_inter_register(dst, value);
    }

    fn instruction_exg(&mut self, postbyte: u8) {
        let reg1 = InterRegister::from_nibble(postbyte >> 4);
        let reg2 = InterRegister::from_nibble(postbyte & 0x0F);

        let new_reg1_value = self.convert_different_width(reg2, reg1);
        let new_reg2_value = self.convert_different_width(reg1, reg2);

        self.write_inter_register(reg1, new_reg1_value);
        self.write_inter_register(reg2, new_reg2_value);
    }

    // ---- multi-register push/pull ----

    fn stack_and_other(&self, desc: &OpcodeDesc) -> (StackPointer, u16) {
        // The postbyte's bit 6 names the stack pointer the instruction is
        // not using.
        match desc.register {
            Some(RegisterId::U) => (StackPointer::User, self.regs.s),
            _ => (StackPointer::System, self.regs.u),
        }
    }

    /// Push order, bit 7 down to bit 0: PC, U/S, Y, X, DP, B, A, CC.
    fn instruction_psh<M: MemoryAccess>(&mut self, memory: &mut M, desc: &OpcodeDesc, postbyte: u8) {
        let (sp, other) = self.stack_and_other(desc);

        if postbyte & 0x80 != 0 {
            self.push_word(memory, sp, self.regs.pc);
        }
        if postbyte & 0x40 != 0 {
            self.push_word(memory, sp, other);
        }
        if postbyte & 0x20 != 0 {
            self.push_word(memory, sp, self.regs.y);
        }
        if postbyte & 0x10 != 0 {
            self.push_word(memory, sp, self.regs.x);
        }
        if postbyte & 0x08 != 0 {
            self.push_byte(memory, sp, self.regs.dp);
        }
        if postbyte & 0x04 != 0 {
            self.push_byte(memory, sp, self.regs.b);
        }
        if postbyte & 0x02 != 0 {
            self.push_byte(memory, sp, self.regs.a);
        }
        if postbyte & 0x01 != 0 {
            self.push_byte(memory, sp, self.regs.cc.into());
        }
    }

    /// Pull order is the exact reverse of the push order.
    fn instruction_pul<M: MemoryAccess>(&mut self, memory: &mut M, desc: &OpcodeDesc, postbyte: u8) {
        let (sp, _) = self.stack_and_other(desc);

        if postbyte & 0x01 != 0 {
            let cc = self.pull_byte(memory, sp);
            self.regs.cc = cc.into();
        }
        if postbyte & 0x02 != 0 {
            self.regs.a = self.pull_byte(memory, sp);
        }
        if postbyte & 0x04 != 0 {
            self.regs.b = self.pull_byte(memory, sp);
        }
        if postbyte & 0x08 != 0 {
            self.regs.dp = self.pull_byte(memory, sp);
        }
        if postbyte & 0x10 != 0 {
            self.regs.x = self.pull_word(memory, sp);
        }
        if postbyte & 0x20 != 0 {
            self.regs.y = self.pull_word(memory, sp);
        }
        if postbyte & 0x40 != 0 {
            let other = self.pull_word(memory, sp);
            match sp {
                StackPointer::System => self.regs.u = other,
                StackPointer::User => self.regs.s = other,
            }
        }
        if postbyte & 0x80 != 0 {
            self.regs.pc = self.pull_word(memory, sp);
        }
    }

    // ---- branch predicates ----

    fn branch_taken(&self, isa: Isa) -> bool {
        let cc = &self.regs.cc;
        match isa {
            Isa::Bra => true,
            Isa::Brn => false,
            Isa::Beq => cc.z,
            Isa::Bne => !cc.z,
            Isa::Bmi => cc.n,
            Isa::Bpl => !cc.n,
            Isa::Bvs => cc.v,
            Isa::Bvc => !cc.v,
            Isa::Bcs => cc.c,
            Isa::Bcc => !cc.c,
            Isa::Bge => cc.n == cc.v,
            Isa::Blt => cc.n != cc.v,
            Isa::Bgt => !cc.z && cc.n == cc.v,
            Isa::Ble => cc.z || cc.n != cc.v,
            Isa::Bhi => !cc.c && !cc.z,
            Isa::Bls => cc.c || cc.z,
            _ => unreachable!("{isa:?} is not a conditional branch"),
        }
    }
}
