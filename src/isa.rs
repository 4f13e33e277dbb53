// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ISA definition: the static description of every MC6809 opcode.
//!
//! The table merges the instruction data of the MC6809 programming manual
//! (section 4.4 and appendix A) with the per-opcode byte and cycle counts.
//! It drives both the interpreter dispatch and the disassembler; the table
//! is closed, so an opcode that does not resolve to a descriptor is a fatal
//! decode error.
//!
//! `read_from_memory` semantics: the addressing-mode routines are excluded.
//! If an addressing mode fetches memory only to compute the effective
//! address, but the instruction itself does not consume the memory content,
//! the read width is `Width::None` (the store and jump groups, for example).

/// Opcode families of the MC6809.
///
/// Each variant covers one semantic routine; the operand register and widths
/// of a concrete opcode come from its [OpcodeDesc] entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Isa {
    Abx,
    Adc,
    Add8,
    Add16,
    And,
    AndCC,
    Asr,
    Bcc,
    Bcs,
    Beq,
    Bge,
    Bgt,
    Bhi,
    Bit,
    Ble,
    Bls,
    Blt,
    Bmi,
    Bne,
    Bpl,
    Bra,
    Brn,
    Bvc,
    Bvs,
    Clr,
    Cmp8,
    Cmp16,
    Com,
    Cwai,
    Daa,
    Dec,
    Eor,
    Exg,
    Inc,
    Jmp,
    /// JSR, and the BSR/LBSR relative forms: push the return address, jump.
    Jsr,
    Ld8,
    Ld16,
    Lea,
    Lsl,
    Lsr,
    Mul,
    Neg,
    Nop,
    Or,
    OrCC,
    Psh,
    Pul,
    Reset,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sex,
    St8,
    St16,
    Sub8,
    Sub16,
    Swi,
    Swi2,
    Swi3,
    Sync,
    Tfr,
    Tst,
}

impl Isa {
    /// True for the program-flow mnemonics whose EXTENDED operands the
    /// disassembler turns into labels (all branches, BSR/LBSR, JMP, JSR).
    pub const fn is_branch_or_call(self) -> bool {
        matches!(
            self,
            Isa::Bcc
                | Isa::Bcs
                | Isa::Beq
                | Isa::Bge
                | Isa::Bgt
                | Isa::Bhi
                | Isa::Ble
                | Isa::Bls
                | Isa::Blt
                | Isa::Bmi
                | Isa::Bne
                | Isa::Bpl
                | Isa::Bra
                | Isa::Brn
                | Isa::Bvc
                | Isa::Bvs
                | Isa::Jmp
                | Isa::Jsr
        )
    }
}

/// Register operand of an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterId {
    A,
    B,
    Cc,
    D,
    Dp,
    Pc,
    S,
    U,
    X,
    Y,
}

/// Memory transfer width of an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    None,
    Byte,
    Word,
}

/// MC6809 addressing modes as the opcode table names them.
///
/// The `*Word` variants read a 16-bit operand where their base form reads
/// 8 bits; the effective address computation is identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddrMode {
    Direct,
    DirectWord,
    Extended,
    ExtendedWord,
    Immediate,
    ImmediateWord,
    Indexed,
    IndexedWord,
    Inherent,
    Relative,
    RelativeWord,
}

/// Static description of one opcode.
#[derive(Clone, Copy, Debug)]
pub struct OpcodeDesc {
    pub isa: Isa,
    pub mnemonic: &'static str,
    /// The raw opcode; page-1 and page-2 opcodes carry their 0x10/0x11
    /// prefix in the high byte.
    pub opcode: u16,
    /// Total instruction length including the opcode (and prefix) bytes.
    pub bytes: u8,
    /// Base cycle count. Additional cycles are charged by the indexed
    /// addressing sub-modes and by the page prefix fetch.
    pub cycles: u8,
    pub addr_mode: AddrMode,
    pub register: Option<RegisterId>,
    pub read: Width,
    pub write: Width,
    /// Whether the semantic routine receives the effective address.
    pub needs_ea: bool,
}

const BYTE: Width = Width::Byte;
const WORD: Width = Width::Word;
const NO: Width = Width::None;

const DIRECT: AddrMode = AddrMode::Direct;
const DIRECT_WORD: AddrMode = AddrMode::DirectWord;
const EXTENDED: AddrMode = AddrMode::Extended;
const EXTENDED_WORD: AddrMode = AddrMode::ExtendedWord;
const IMMEDIATE: AddrMode = AddrMode::Immediate;
const IMMEDIATE_WORD: AddrMode = AddrMode::ImmediateWord;
const INDEXED: AddrMode = AddrMode::Indexed;
const INDEXED_WORD: AddrMode = AddrMode::IndexedWord;
const INHERENT: AddrMode = AddrMode::Inherent;
const RELATIVE: AddrMode = AddrMode::Relative;
const RELATIVE_WORD: AddrMode = AddrMode::RelativeWord;

const REG_A: Option<RegisterId> = Some(RegisterId::A);
const REG_B: Option<RegisterId> = Some(RegisterId::B);
const REG_CC: Option<RegisterId> = Some(RegisterId::Cc);
const REG_D: Option<RegisterId> = Some(RegisterId::D);
const REG_S: Option<RegisterId> = Some(RegisterId::S);
const REG_U: Option<RegisterId> = Some(RegisterId::U);
const REG_X: Option<RegisterId> = Some(RegisterId::X);
const REG_Y: Option<RegisterId> = Some(RegisterId::Y);
const NO_REG: Option<RegisterId> = None;

#[allow(clippy::too_many_arguments)]
const fn op(
    isa: Isa,
    mnemonic: &'static str,
    opcode: u16,
    bytes: u8,
    cycles: u8,
    addr_mode: AddrMode,
    register: Option<RegisterId>,
    read: Width,
    write: Width,
    needs_ea: bool,
) -> OpcodeDesc {
    OpcodeDesc { isa, mnemonic, opcode, bytes, cycles, addr_mode, register, read, write, needs_ea }
}

/// Every documented MC6809 opcode. The 0x10/0x11 page prefixes themselves
/// are not listed; the dispatcher and disassembler merge them into the
/// 16-bit keys of the page-1/page-2 entries below.
pub const OPCODES: &[OpcodeDesc] = &[
    op(Isa::Abx, "ABX", 0x3A, 1, 3, INHERENT, NO_REG, NO, NO, false),
    op(Isa::Adc, "ADCA", 0x89, 2, 2, IMMEDIATE, REG_A, BYTE, NO, false),
    op(Isa::Adc, "ADCA", 0x99, 2, 4, DIRECT, REG_A, BYTE, NO, false),
    op(Isa::Adc, "ADCA", 0xA9, 2, 4, INDEXED, REG_A, BYTE, NO, false),
    op(Isa::Adc, "ADCA", 0xB9, 3, 5, EXTENDED, REG_A, BYTE, NO, false),
    op(Isa::Adc, "ADCB", 0xC9, 2, 2, IMMEDIATE, REG_B, BYTE, NO, false),
    op(Isa::Adc, "ADCB", 0xD9, 2, 4, DIRECT, REG_B, BYTE, NO, false),
    op(Isa::Adc, "ADCB", 0xE9, 2, 4, INDEXED, REG_B, BYTE, NO, false),
    op(Isa::Adc, "ADCB", 0xF9, 3, 5, EXTENDED, REG_B, BYTE, NO, false),
    op(Isa::Add8, "ADDA", 0x8B, 2, 2, IMMEDIATE, REG_A, BYTE, NO, false),
    op(Isa::Add8, "ADDA", 0x9B, 2, 4, DIRECT, REG_A, BYTE, NO, false),
    op(Isa::Add8, "ADDA", 0xAB, 2, 4, INDEXED, REG_A, BYTE, NO, false),
    op(Isa::Add8, "ADDA", 0xBB, 3, 5, EXTENDED, REG_A, BYTE, NO, false),
    op(Isa::Add8, "ADDB", 0xCB, 2, 2, IMMEDIATE, REG_B, BYTE, NO, false),
    op(Isa::Add8, "ADDB", 0xDB, 2, 4, DIRECT, REG_B, BYTE, NO, false),
    op(Isa::Add8, "ADDB", 0xEB, 2, 4, INDEXED, REG_B, BYTE, NO, false),
    op(Isa::Add8, "ADDB", 0xFB, 3, 5, EXTENDED, REG_B, BYTE, NO, false),
    op(Isa::Add16, "ADDD", 0xC3, 3, 4, IMMEDIATE_WORD, REG_D, WORD, NO, false),
    op(Isa::Add16, "ADDD", 0xD3, 2, 6, DIRECT_WORD, REG_D, WORD, NO, false),
    op(Isa::Add16, "ADDD", 0xE3, 2, 6, INDEXED_WORD, REG_D, WORD, NO, false),
    op(Isa::Add16, "ADDD", 0xF3, 3, 7, EXTENDED_WORD, REG_D, WORD, NO, false),
    op(Isa::And, "ANDA", 0x84, 2, 2, IMMEDIATE, REG_A, BYTE, NO, false),
    op(Isa::And, "ANDA", 0x94, 2, 4, DIRECT, REG_A, BYTE, NO, false),
    op(Isa::And, "ANDA", 0xA4, 2, 4, INDEXED, REG_A, BYTE, NO, false),
    op(Isa::And, "ANDA", 0xB4, 3, 5, EXTENDED, REG_A, BYTE, NO, false),
    op(Isa::And, "ANDB", 0xC4, 2, 2, IMMEDIATE, REG_B, BYTE, NO, false),
    op(Isa::And, "ANDB", 0xD4, 2, 4, DIRECT, REG_B, BYTE, NO, false),
    op(Isa::And, "ANDB", 0xE4, 2, 4, INDEXED, REG_B, BYTE, NO, false),
    op(Isa::And, "ANDB", 0xF4, 3, 5, EXTENDED, REG_B, BYTE, NO, false),
    op(Isa::AndCC, "ANDCC", 0x1C, 2, 3, IMMEDIATE, REG_CC, BYTE, NO, false),
    op(Isa::Asr, "ASR", 0x07, 2, 6, DIRECT, NO_REG, BYTE, BYTE, true),
    op(Isa::Asr, "ASR", 0x67, 2, 6, INDEXED, NO_REG, BYTE, BYTE, true),
    op(Isa::Asr, "ASR", 0x77, 3, 7, EXTENDED, NO_REG, BYTE, BYTE, true),
    op(Isa::Asr, "ASRA", 0x47, 1, 2, INHERENT, REG_A, NO, NO, false),
    op(Isa::Asr, "ASRB", 0x57, 1, 2, INHERENT, REG_B, NO, NO, false),
    op(Isa::Beq, "BEQ", 0x27, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Beq, "LBEQ", 0x1027, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bge, "BGE", 0x2C, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bge, "LBGE", 0x102C, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bgt, "BGT", 0x2E, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bgt, "LBGT", 0x102E, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bhi, "BHI", 0x22, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bhi, "LBHI", 0x1022, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bcc, "BCC", 0x24, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bcc, "LBCC", 0x1024, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bit, "BITA", 0x85, 2, 2, IMMEDIATE, REG_A, BYTE, NO, false),
    op(Isa::Bit, "BITA", 0x95, 2, 4, DIRECT, REG_A, BYTE, NO, false),
    op(Isa::Bit, "BITA", 0xA5, 2, 4, INDEXED, REG_A, BYTE, NO, false),
    op(Isa::Bit, "BITA", 0xB5, 3, 5, EXTENDED, REG_A, BYTE, NO, false),
    op(Isa::Bit, "BITB", 0xC5, 2, 2, IMMEDIATE, REG_B, BYTE, NO, false),
    op(Isa::Bit, "BITB", 0xD5, 2, 4, DIRECT, REG_B, BYTE, NO, false),
    op(Isa::Bit, "BITB", 0xE5, 2, 4, INDEXED, REG_B, BYTE, NO, false),
    op(Isa::Bit, "BITB", 0xF5, 3, 5, EXTENDED, REG_B, BYTE, NO, false),
    op(Isa::Ble, "BLE", 0x2F, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Ble, "LBLE", 0x102F, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bcs, "BLO", 0x25, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bcs, "LBCS", 0x1025, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bls, "BLS", 0x23, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bls, "LBLS", 0x1023, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Blt, "BLT", 0x2D, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Blt, "LBLT", 0x102D, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bmi, "BMI", 0x2B, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bmi, "LBMI", 0x102B, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bne, "BNE", 0x26, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bne, "LBNE", 0x1026, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bpl, "BPL", 0x2A, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bpl, "LBPL", 0x102A, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bra, "BRA", 0x20, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bra, "LBRA", 0x16, 3, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Brn, "BRN", 0x21, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Brn, "LBRN", 0x1021, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Jsr, "BSR", 0x8D, 2, 7, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Jsr, "LBSR", 0x17, 3, 9, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bvc, "BVC", 0x28, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bvc, "LBVC", 0x1028, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Bvs, "BVS", 0x29, 2, 3, RELATIVE, NO_REG, NO, NO, true),
    op(Isa::Bvs, "LBVS", 0x1029, 4, 5, RELATIVE_WORD, NO_REG, NO, NO, true),
    op(Isa::Clr, "CLR", 0x0F, 2, 6, DIRECT, NO_REG, NO, BYTE, true),
    op(Isa::Clr, "CLR", 0x6F, 2, 6, INDEXED, NO_REG, NO, BYTE, true),
    op(Isa::Clr, "CLR", 0x7F, 3, 7, EXTENDED, NO_REG, NO, BYTE, true),
    op(Isa::Clr, "CLRA", 0x4F, 1, 2, INHERENT, REG_A, NO, NO, false),
    op(Isa::Clr, "CLRB", 0x5F, 1, 2, INHERENT, REG_B, NO, NO, false),
    op(Isa::Cmp8, "CMPA", 0x81, 2, 2, IMMEDIATE, REG_A, BYTE, NO, false),
    op(Isa::Cmp8, "CMPA", 0x91, 2, 4, DIRECT, REG_A, BYTE, NO, false),
    op(Isa::Cmp8, "CMPA", 0xA1, 2, 4, INDEXED, REG_A, BYTE, NO, false),
    op(Isa::Cmp8, "CMPA", 0xB1, 3, 5, EXTENDED, REG_A, BYTE, NO, false),
    op(Isa::Cmp8, "CMPB", 0xC1, 2, 2, IMMEDIATE, REG_B, BYTE, NO, false),
    op(Isa::Cmp8, "CMPB", 0xD1, 2, 4, DIRECT, REG_B, BYTE, NO, false),
    op(Isa::Cmp8, "CMPB", 0xE1, 2, 4, INDEXED, REG_B, BYTE, NO, false),
    op(Isa::Cmp8, "CMPB", 0xF1, 3, 5, EXTENDED, REG_B, BYTE, NO, false),
    op(Isa::Cmp16, "CMPD", 0x1083, 4, 5, IMMEDIATE_WORD, REG_D, WORD, NO, false),
    op(Isa::Cmp16, "CMPD", 0x1093, 3, 7, DIRECT_WORD, REG_D, WORD, NO, false),
    op(Isa::Cmp16, "CMPD", 0x10A3, 3, 7, INDEXED_WORD, REG_D, WORD, NO, false),
    op(Isa::Cmp16, "CMPD", 0x10B3, 4, 8, EXTENDED_WORD, REG_D, WORD, NO, false),
    op(Isa::Cmp16, "CMPS", 0x118C, 4, 5, IMMEDIATE_WORD, REG_S, WORD, NO, false),
    op(Isa::Cmp16, "CMPS", 0x119C, 3, 7, DIRECT_WORD, REG_S, WORD, NO, false),
    op(Isa::Cmp16, "CMPS", 0x11AC, 3, 7, INDEXED_WORD, REG_S, WORD, NO, false),
    op(Isa::Cmp16, "CMPS", 0x11BC, 4, 8, EXTENDED_WORD, REG_S, WORD, NO, false),
    op(Isa::Cmp16, "CMPU", 0x1183, 4, 5, IMMEDIATE_WORD, REG_U, WORD, NO, false),
    op(Isa::Cmp16, "CMPU", 0x1193, 3, 7, DIRECT_WORD, REG_U, WORD, NO, false),
    op(Isa::Cmp16, "CMPU", 0x11A3, 3, 7, INDEXED_WORD, REG_U, WORD, NO, false),
    op(Isa::Cmp16, "CMPU", 0x11B3, 4, 8, EXTENDED_WORD, REG_U, WORD, NO, false),
    op(Isa::Cmp16, "CMPX", 0x8C, 3, 4, IMMEDIATE_WORD, REG_X, WORD, NO, false),
    op(Isa::Cmp16, "CMPX", 0x9C, 2, 6, DIRECT_WORD, REG_X, WORD, NO, false),
    op(Isa::Cmp16, "CMPX", 0xAC, 2, 6, INDEXED_WORD, REG_X, WORD, NO, false),
    op(Isa::Cmp16, "CMPX", 0xBC, 3, 7, EXTENDED_WORD, REG_X, WORD, NO, false),
    op(Isa::Cmp16, "CMPY", 0x108C, 4, 5, IMMEDIATE_WORD, REG_Y, WORD, NO, false),
    op(Isa::Cmp16, "CMPY", 0x109C, 3, 7, DIRECT_WORD, REG_Y, WORD, NO, false),
    op(Isa::Cmp16, "CMPY", 0x10AC, 3, 7, INDEXED_WORD, REG_Y, WORD, NO, false),
    op(Isa::Cmp16, "CMPY", 0x10BC, 4, 8, EXTENDED_WORD, REG_Y, WORD, NO, false),
    op(Isa::Com, "COM", 0x03, 2, 6, DIRECT, NO_REG, BYTE, BYTE, true),
    op(Isa::Com, "COM", 0x63, 2, 6, INDEXED, NO_REG, BYTE, BYTE, true),
    op(Isa::Com, "COM", 0x73, 3, 7, EXTENDED, NO_REG, BYTE, BYTE, true),
    op(Isa::Com, "COMA", 0x43, 1, 2, INHERENT, REG_A, NO, NO, false),
    op(Isa::Com, "COMB", 0x53, 1, 2, INHERENT, REG_B, NO, NO, false),
    op(Isa::Cwai, "CWAI", 0x3C, 2, 21, IMMEDIATE, NO_REG, BYTE, NO, false),
    op(Isa::Daa, "DAA", 0x19, 1, 2, INHERENT, NO_REG, NO, NO, false),
    op(Isa::Dec, "DEC", 0x0A, 2, 6, DIRECT, NO_REG, BYTE, BYTE, true),
    op(Isa::Dec, "DEC", 0x6A, 2, 6, INDEXED, NO_REG, BYTE, BYTE, true),
    op(Isa::Dec, "DEC", 0x7A, 3, 7, EXTENDED, NO_REG, BYTE, BYTE, true),
    op(Isa::Dec, "DECA", 0x4A, 1, 2, INHERENT, REG_A, NO, NO, false),
    op(Isa::Dec, "DECB", 0x5A, 1, 2, INHERENT, REG_B, NO, NO, false),
    op(Isa::Eor, "EORA", 0x88, 2, 2, IMMEDIATE, REG_A, BYTE, NO, false),
    op(Isa::Eor, "EORA", 0x98, 2, 4, DIRECT, REG_A, BYTE, NO, false),
    op(Isa::Eor, "EORA", 0xA8, 2, 4, INDEXED, REG_A, BYTE, NO, false),
    op(Isa::Eor, "EORA", 0xB8, 3, 5, EXTENDED, REG_A, BYTE, NO, false),
    op(Isa::Eor, "EORB", 0xC8, 2, 2, IMMEDIATE, REG_B, BYTE, NO, false),
    op(Isa::Eor, "EORB", 0xD8, 2, 4, DIRECT, REG_B, BYTE, NO, false),
    op(Isa::Eor, "EORB", 0xE8, 2, 4, INDEXED, REG_B, BYTE, NO, false),
    op(Isa::Eor, "EORB", 0xF8, 3, 5, EXTENDED, REG_B, BYTE, NO, false),
    op(Isa::Exg, "EXG", 0x1E, 2, 8, IMMEDIATE, NO_REG, BYTE, NO, false),
    op(Isa::Inc, "INC", 0x0C, 2, 6, DIRECT, NO_REG, BYTE, BYTE, true),
    op(Isa::Inc, "INC", 0x6C, 2, 6, INDEXED, NO_REG, BYTE, BYTE, true),
    op(Isa::Inc, "INC", 0x7C, 3, 7, EXTENDED, NO_REG, BYTE, BYTE, true),
    op(Isa::Inc, "INCA", 0x4C, 1, 2, INHERENT, REG_A, NO, NO, false),
    op(Isa::Inc, "INCB", 0x5C, 1, 2, INHERENT, REG_B, NO, NO, false),
    op(Isa::Jmp, "JMP", 0x0E, 2, 3, DIRECT, NO_REG, NO, NO, true),
    op(Isa::Jmp, "JMP", 0x6E, 2, 3, INDEXED, NO_REG, NO, NO, true),
    op(Isa::Jmp, "JMP", 0x7E, 3, 3, EXTENDED, NO_REG, NO, NO, true),
    op(Isa::Jsr, "JSR", 0x9D, 2, 7, DIRECT, NO_REG, NO, NO, true),
    op(Isa::Jsr, "JSR", 0xAD, 2, 7, INDEXED, NO_REG, NO, NO, true),
    op(Isa::Jsr, "JSR", 0xBD, 3, 8, EXTENDED, NO_REG, NO, NO, true),
    op(Isa::Ld8, "LDA", 0x86, 2, 2, IMMEDIATE, REG_A, BYTE, NO, false),
    op(Isa::Ld8, "LDA", 0x96, 2, 4, DIRECT, REG_A, BYTE, NO, false),
    op(Isa::Ld8, "LDA", 0xA6, 2, 4, INDEXED, REG_A, BYTE, NO, false),
    op(Isa::Ld8, "LDA", 0xB6, 3, 5, EXTENDED, REG_A, BYTE, NO, false),
    op(Isa::Ld8, "LDB", 0xC6, 2, 2, IMMEDIATE, REG_B, BYTE, NO, false),
    op(Isa::Ld8, "LDB", 0xD6, 2, 4, DIRECT, REG_B, BYTE, NO, false),
    op(Isa::Ld8, "LDB", 0xE6, 2, 4, INDEXED, REG_B, BYTE, NO, false),
    op(Isa::Ld8, "LDB", 0xF6, 3, 5, EXTENDED, REG_B, BYTE, NO, false),
    op(Isa::Ld16, "LDD", 0xCC, 3, 3, IMMEDIATE_WORD, REG_D, WORD, NO, false),
    op(Isa::Ld16, "LDD", 0xDC, 2, 5, DIRECT_WORD, REG_D, WORD, NO, false),
    op(Isa::Ld16, "LDD", 0xEC, 2, 5, INDEXED_WORD, REG_D, WORD, NO, false),
    op(Isa::Ld16, "LDD", 0xFC, 3, 6, EXTENDED_WORD, REG_D, WORD, NO, false),
    op(Isa::Ld16, "LDS", 0x10CE, 4, 4, IMMEDIATE_WORD, REG_S, WORD, NO, false),
    op(Isa::Ld16, "LDS", 0x10DE, 3, 6, DIRECT_WORD, REG_S, WORD, NO, false),
    op(Isa::Ld16, "LDS", 0x10EE, 3, 6, INDEXED_WORD, REG_S, WORD, NO, false),
    op(Isa::Ld16, "LDS", 0x10FE, 4, 7, EXTENDED_WORD, REG_S, WORD, NO, false),
    op(Isa::Ld16, "LDU", 0xCE, 3, 3, IMMEDIATE_WORD, REG_U, WORD, NO, false),
    op(Isa::Ld16, "LDU", 0xDE, 2, 5, DIRECT_WORD, REG_U, WORD, NO, false),
    op(Isa::Ld16, "LDU", 0xEE, 2, 5, INDEXED_WORD, REG_U, WORD, NO, false),
    op(Isa::Ld16, "LDU", 0xFE, 3, 6, EXTENDED_WORD, REG_U, WORD, NO, false),
    op(Isa::Ld16, "LDX", 0x8E, 3, 3, IMMEDIATE_WORD, REG_X, WORD, NO, false),
    op(Isa::Ld16, "LDX", 0x9E, 2, 5, DIRECT_WORD, REG_X, WORD, NO, false),
    op(Isa::Ld16, "LDX", 0xAE, 2, 5, INDEXED_WORD, REG_X, WORD, NO, false),
    op(Isa::Ld16, "LDX", 0xBE, 3, 6, EXTENDED_WORD, REG_X, WORD, NO, false),
    op(Isa::Ld16, "LDY", 0x108E, 4, 4, IMMEDIATE_WORD, REG_Y, WORD, NO, false),
    op(Isa::Ld16, "LDY", 0x109E, 3, 6, DIRECT_WORD, REG_Y, WORD, NO, false),
    op(Isa::Ld16, "LDY", 0x10AE, 3, 6, INDEXED_WORD, REG_Y, WORD, NO, false),
    op(Isa::Ld16, "LDY", 0x10BE, 4, 7, EXTENDED_WORD, REG_Y, WORD, NO, false),
    op(Isa::Lea, "LEAS", 0x32, 2, 4, INDEXED, REG_S, NO, NO, true),
    op(Isa::Lea, "LEAU", 0x33, 2, 4, INDEXED, REG_U, NO, NO, true),
    op(Isa::Lea, "LEAX", 0x30, 2, 4, INDEXED, REG_X, NO, NO, true),
    op(Isa::Lea, "LEAY", 0x31, 2, 4, INDEXED, REG_Y, NO, NO, true),
    op(Isa::Lsl, "LSL", 0x08, 2, 6, DIRECT, NO_REG, BYTE, BYTE, true),
    op(Isa::Lsl, "LSL", 0x68, 2, 6, INDEXED, NO_REG, BYTE, BYTE, true),
    op(Isa::Lsl, "LSL", 0x78, 3, 7, EXTENDED, NO_REG, BYTE, BYTE, true),
    op(Isa::Lsl, "LSLA", 0x48, 1, 2, INHERENT, REG_A, NO, NO, false),
    op(Isa::Lsl, "LSLB", 0x58, 1, 2, INHERENT, REG_B, NO, NO, false),
    op(Isa::Lsr, "LSR", 0x04, 2, 6, DIRECT, NO_REG, BYTE, BYTE, true),
    op(Isa::Lsr, "LSR", 0x64, 2, 6, INDEXED, NO_REG, BYTE, BYTE, true),
    op(Isa::Lsr, "LSR", 0x74, 3, 7, EXTENDED, NO_REG, BYTE, BYTE, true),
    op(Isa::Lsr, "LSRA", 0x44, 1, 2, INHERENT, REG_A, NO, NO, false),
    op(Isa::Lsr, "LSRB", 0x54, 1, 2, INHERENT, REG_B, NO, NO, false),
    op(Isa::Mul, "MUL", 0x3D, 1, 11, INHERENT, NO_REG, NO, NO, false),
    op(Isa::Neg, "NEG", 0x00, 2, 6, DIRECT, NO_REG, BYTE, BYTE, true),
    op(Isa::Neg, "NEG", 0x60, 2, 6, INDEXED, NO_REG, BYTE, BYTE, true),
    op(Isa::Neg, "NEG", 0x70, 3, 7, EXTENDED, NO_REG, BYTE, BYTE, true),
    op(Isa::Neg, "NEGA", 0x40, 1, 2, INHERENT, REG_A, NO, NO, false),
    op(Isa::Neg, "NEGB", 0x50, 1, 2, INHERENT, REG_B, NO, NO, false),
    op(Isa::Nop, "NOP", 0x12, 1, 2, INHERENT, NO_REG, NO, NO, false),
    op(Isa::Or, "ORA", 0x8A, 2, 2, IMMEDIATE, REG_A, BYTE, NO, false),
    op(Isa::Or, "ORA", 0x9A, 2, 4, DIRECT, REG_A, BYTE, NO, false),
    op(Isa::Or, "ORA", 0xAA, 2, 4, INDEXED, REG_A, BYTE, NO, false),
    op(Isa::Or, "ORA", 0xBA, 3, 5, EXTENDED, REG_A, BYTE, NO, false),
    op(Isa::Or, "ORB", 0xCA, 2, 2, IMMEDIATE, REG_B, BYTE, NO, false),
    op(Isa::Or, "ORB", 0xDA, 2, 4, DIRECT, REG_B, BYTE, NO, false),
    op(Isa::Or, "ORB", 0xEA, 2, 4, INDEXED, REG_B, BYTE, NO, false),
    op(Isa::Or, "ORB", 0xFA, 3, 5, EXTENDED, REG_B, BYTE, NO, false),
    op(Isa::OrCC, "ORCC", 0x1A, 2, 3, IMMEDIATE, REG_CC, BYTE, NO, false),
    op(Isa::Psh, "PSHS", 0x34, 2, 5, IMMEDIATE, REG_S, BYTE, NO, false),
    op(Isa::Psh, "PSHU", 0x36, 2, 5, IMMEDIATE, REG_U, BYTE, NO, false),
    op(Isa::Pul, "PULS", 0x35, 2, 5, IMMEDIATE, REG_S, BYTE, NO, false),
    op(Isa::Pul, "PULU", 0x37, 2, 5, IMMEDIATE, REG_U, BYTE, NO, false),
    op(Isa::Reset, "RESET", 0x3E, 1, 0, INHERENT, NO_REG, NO, NO, false),
    op(Isa::Rol, "ROL", 0x09, 2, 6, DIRECT, NO_REG, BYTE, BYTE, true),
    op(Isa::Rol, "ROL", 0x69, 2, 6, INDEXED, NO_REG, BYTE, BYTE, true),
    op(Isa::Rol, "ROL", 0x79, 3, 7, EXTENDED, NO_REG, BYTE, BYTE, true),
    op(Isa::Rol, "ROLA", 0x49, 1, 2, INHERENT, REG_A, NO, NO, false),
    op(Isa::Rol, "ROLB", 0x59, 1, 2, INHERENT, REG_B, NO, NO, false),
    op(Isa::Ror, "ROR", 0x06, 2, 6, DIRECT, NO_REG, BYTE, BYTE, true),
    op(Isa::Ror, "ROR", 0x66, 2, 6, INDEXED, NO_REG, BYTE, BYTE, true),
    op(Isa::Ror, "ROR", 0x76, 3, 7, EXTENDED, NO_REG, BYTE, BYTE, true),
    op(Isa::Ror, "RORA", 0x46, 1, 2, INHERENT, REG_A, NO, NO, false),
    op(Isa::Ror, "RORB", 0x56, 1, 2, INHERENT, REG_B, NO, NO, false),
    op(Isa::Rti, "RTI", 0x3B, 1, 6, INHERENT, NO_REG, NO, NO, false),
    op(Isa::Rts, "RTS", 0x39, 1, 5, INHERENT, NO_REG, NO, NO, false),
    op(Isa::Sbc, "SBCA", 0x82, 2, 2, IMMEDIATE, REG_A, BYTE, NO, false),
    op(Isa::Sbc, "SBCA", 0x92, 2, 4, DIRECT, REG_A, BYTE, NO, false),
    op(Isa::Sbc, "SBCA", 0xA2, 2, 4, INDEXED, REG_A, BYTE, NO, false),
    op(Isa::Sbc, "SBCA", 0xB2, 3, 5, EXTENDED, REG_A, BYTE, NO, false),
    op(Isa::Sbc, "SBCB", 0xC2, 2, 2, IMMEDIATE, REG_B, BYTE, NO, false),
    op(Isa::Sbc, "SBCB", 0xD2, 2, 4, DIRECT, REG_B, BYTE, NO, false),
    op(Isa::Sbc, "SBCB", 0xE2, 2, 4, INDEXED, REG_B, BYTE, NO, false),
    op(Isa::Sbc, "SBCB", 0xF2, 3, 5, EXTENDED, REG_B, BYTE, NO, false),
    op(Isa::Sex, "SEX", 0x1D, 1, 2, INHERENT, NO_REG, NO, NO, false),
    op(Isa::St8, "STA", 0x97, 2, 4, DIRECT, REG_A, NO, BYTE, true),
    op(Isa::St8, "STA", 0xA7, 2, 4, INDEXED, REG_A, NO, BYTE, true),
    op(Isa::St8, "STA", 0xB7, 3, 5, EXTENDED, REG_A, NO, BYTE, true),
    op(Isa::St8, "STB", 0xD7, 2, 4, DIRECT, REG_B, NO, BYTE, true),
    op(Isa::St8, "STB", 0xE7, 2, 4, INDEXED, REG_B, NO, BYTE, true),
    op(Isa::St8, "STB", 0xF7, 3, 5, EXTENDED, REG_B, NO, BYTE, true),
    op(Isa::St16, "STD", 0xDD, 2, 5, DIRECT, REG_D, NO, WORD, true),
    op(Isa::St16, "STD", 0xED, 2, 5, INDEXED, REG_D, NO, WORD, true),
    op(Isa::St16, "STD", 0xFD, 3, 6, EXTENDED, REG_D, NO, WORD, true),
    op(Isa::St16, "STS", 0x10DF, 3, 6, DIRECT, REG_S, NO, WORD, true),
    op(Isa::St16, "STS", 0x10EF, 3, 6, INDEXED, REG_S, NO, WORD, true),
    op(Isa::St16, "STS", 0x10FF, 4, 7, EXTENDED, REG_S, NO, WORD, true),
    op(Isa::St16, "STU", 0xDF, 2, 5, DIRECT, REG_U, NO, WORD, true),
    op(Isa::St16, "STU", 0xEF, 2, 5, INDEXED, REG_U, NO, WORD, true),
    op(Isa::St16, "STU", 0xFF, 3, 6, EXTENDED, REG_U, NO, WORD, true),
    op(Isa::St16, "STX", 0x9F, 2, 5, DIRECT, REG_X, NO, WORD, true),
    op(Isa::St16, "STX", 0xAF, 2, 5, INDEXED, REG_X, NO, WORD, true),
    op(Isa::St16, "STX", 0xBF, 3, 6, EXTENDED, REG_X, NO, WORD, true),
    op(Isa::St16, "STY", 0x109F, 3, 6, DIRECT, REG_Y, NO, WORD, true),
    op(Isa::St16, "STY", 0x10AF, 3, 6, INDEXED, REG_Y, NO, WORD, true),
    op(Isa::St16, "STY", 0x10BF, 4, 7, EXTENDED, REG_Y, NO, WORD, true),
    op(Isa::Sub8, "SUBA", 0x80, 2, 2, IMMEDIATE, REG_A, BYTE, NO, false),
    op(Isa::Sub8, "SUBA", 0x90, 2, 4, DIRECT, REG_A, BYTE, NO, false),
    op(Isa::Sub8, "SUBA", 0xA0, 2, 4, INDEXED, REG_A, BYTE, NO, false),
    op(Isa::Sub8, "SUBA", 0xB0, 3, 5, EXTENDED, REG_A, BYTE, NO, false),
    op(Isa::Sub8, "SUBB", 0xC0, 2, 2, IMMEDIATE, REG_B, BYTE, NO, false),
    op(Isa::Sub8, "SUBB", 0xD0, 2, 4, DIRECT, REG_B, BYTE, NO, false),
    op(Isa::Sub8, "SUBB", 0xE0, 2, 4, INDEXED, REG_B, BYTE, NO, false),
    op(Isa::Sub8, "SUBB", 0xF0, 3, 5, EXTENDED, REG_B, BYTE, NO, false),
    op(Isa::Sub16, "SUBD", 0x83, 3, 4, IMMEDIATE_WORD, REG_D, WORD, NO, false),
    op(Isa::Sub16, "SUBD", 0x93, 2, 6, DIRECT_WORD, REG_D, WORD, NO, false),
    op(Isa::Sub16, "SUBD", 0xA3, 2, 6, INDEXED_WORD, REG_D, WORD, NO, false),
    op(Isa::Sub16, "SUBD", 0xB3, 3, 7, EXTENDED_WORD, REG_D, WORD, NO, false),
    op(Isa::Swi, "SWI", 0x3F, 1, 19, INHERENT, NO_REG, NO, NO, false),
    op(Isa::Swi2, "SWI2", 0x103F, 2, 20, INHERENT, NO_REG, NO, NO, false),
    op(Isa::Swi3, "SWI3", 0x113F, 2, 20, INHERENT, NO_REG, NO, NO, false),
    op(Isa::Sync, "SYNC", 0x13, 1, 2, INHERENT, NO_REG, NO, NO, false),
    op(Isa::Tfr, "TFR", 0x1F, 2, 7, IMMEDIATE, NO_REG, BYTE, NO, false),
    op(Isa::Tst, "TST", 0x0D, 2, 6, DIRECT, NO_REG, BYTE, NO, false),
    op(Isa::Tst, "TST", 0x6D, 2, 6, INDEXED, NO_REG, BYTE, NO, false),
    op(Isa::Tst, "TST", 0x7D, 3, 7, EXTENDED, NO_REG, BYTE, NO, false),
    op(Isa::Tst, "TSTA", 0x4D, 1, 2, INHERENT, REG_A, NO, NO, false),
    op(Isa::Tst, "TSTB", 0x5D, 1, 2, INHERENT, REG_B, NO, NO, false),
];

const fn build_page(page: u16) -> [Option<&'static OpcodeDesc>; 256] {
    let mut table: [Option<&'static OpcodeDesc>; 256] = [None; 256];
    let mut i = 0;
    while i < OPCODES.len() {
        let desc = &OPCODES[i];
        if desc.opcode >> 8 == page {
            table[(desc.opcode & 0xFF) as usize] = Some(desc);
        }
        i += 1;
    }
    table
}

static PAGE_0: [Option<&OpcodeDesc>; 256] = build_page(0x00);
static PAGE_1: [Option<&OpcodeDesc>; 256] = build_page(0x10);
static PAGE_2: [Option<&OpcodeDesc>; 256] = build_page(0x11);

/// Resolves an opcode to its descriptor.
///
/// Page-1 and page-2 opcodes are looked up by their full 16-bit key
/// (`0x10xx` / `0x11xx`). Returns `None` for every opcode outside the table.
pub fn lookup(opcode: u16) -> Option<&'static OpcodeDesc> {
    match opcode >> 8 {
        0x00 => PAGE_0[(opcode & 0xFF) as usize],
        0x10 => PAGE_1[(opcode & 0xFF) as usize],
        0x11 => PAGE_2[(opcode & 0xFF) as usize],
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_known_opcodes() {
        let lsra = lookup(0x44).unwrap();
        assert_eq!(lsra.mnemonic, "LSRA");
        assert_eq!(lsra.bytes, 1);
        assert_eq!(lsra.addr_mode, AddrMode::Inherent);
        assert_eq!(lsra.register, Some(RegisterId::A));

        let puls = lookup(0x35).unwrap();
        assert_eq!(puls.mnemonic, "PULS");
        assert_eq!(puls.bytes, 2);
        assert_eq!(puls.read, Width::Byte);
        assert_eq!(puls.register, Some(RegisterId::S));

        let rol = lookup(0x79).unwrap();
        assert_eq!(rol.mnemonic, "ROL");
        assert_eq!(rol.bytes, 3);
        assert_eq!(rol.addr_mode, AddrMode::Extended);
        assert!(rol.needs_ea);
        assert_eq!(rol.read, Width::Byte);
        assert_eq!(rol.write, Width::Byte);
    }

    #[test]
    fn lookup_resolves_paged_opcodes() {
        let cmpy = lookup(0x108C).unwrap();
        assert_eq!(cmpy.mnemonic, "CMPY");
        assert_eq!(cmpy.bytes, 4);
        let cmps = lookup(0x118C).unwrap();
        assert_eq!(cmps.mnemonic, "CMPS");
    }

    #[test]
    fn lookup_rejects_holes() {
        // 0x01 and 0x87 are undocumented encodings.
        assert!(lookup(0x01).is_none());
        assert!(lookup(0x87).is_none());
        assert!(lookup(0x1000).is_none());
        assert!(lookup(0x2000).is_none());
    }

    #[test]
    fn table_is_consistent() {
        for desc in OPCODES {
            let page = desc.opcode >> 8;
            assert!(
                page == 0x00 || page == 0x10 || page == 0x11,
                "{} has an impossible opcode {:#06x}",
                desc.mnemonic,
                desc.opcode
            );
            // Paged opcodes carry the prefix in their byte count.
            if page != 0 {
                assert!(desc.bytes >= 2, "{} too short", desc.mnemonic);
            }
            if desc.write != Width::None {
                assert!(desc.needs_ea, "{} writes without an EA", desc.mnemonic);
            }
        }
    }
}
