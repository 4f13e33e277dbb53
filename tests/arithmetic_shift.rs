// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arithmetic, shift and rotate instruction tests, executed through the
//! dispatcher against a plain RAM.

use mc6809::memory_access::{MemoryAccess, Ram};
use mc6809::{Config, ConditionCodes, Mc6809};

fn test_cpu() -> (Mc6809, Ram) {
    (Mc6809::new(Config::default()), Ram::new())
}

/// Loads `mem` at `start` and executes until PC has run past it.
fn cpu_test_run(cpu: &mut Mc6809, memory: &mut Ram, start: u16, mem: &[u8]) {
    memory.load(start, mem);
    let end = start.wrapping_add(mem.len() as u16);
    cpu.run_until(memory, start, end, 1_000_000).unwrap();
}

#[test]
fn adca_immediate_exhaustive() {
    let (mut cpu, mut memory) = test_cpu();
    memory.write_byte(0x1000, 0x89); // ADCA immediate

    for a in 0..=255u16 {
        for m in 0..=255u16 {
            for carry in [false, true] {
                memory.write_byte(0x1001, m as u8);
                cpu.regs.a = a as u8;
                cpu.regs.cc = ConditionCodes::from(carry as u8);
                cpu.regs.pc = 0x1000;
                cpu.step(&mut memory).unwrap();

                let r = a + m + carry as u16;
                assert_eq!(cpu.regs.a, r as u8, "A for {a:#x} + {m:#x} + {carry}");
                assert_eq!(cpu.regs.cc.c, r > 0xFF, "C");
                assert_eq!(cpu.regs.cc.z, r & 0xFF == 0, "Z");
                assert_eq!(cpu.regs.cc.n, r & 0x80 != 0, "N");
                assert_eq!(cpu.regs.cc.h, (a ^ m ^ r) & 0x10 != 0, "H");
                assert_eq!(cpu.regs.cc.v, (a ^ m ^ r ^ (r >> 1)) & 0x80 != 0, "V");
            }
        }
    }
}

#[test]
fn suba_immediate_borrow() {
    let (mut cpu, mut memory) = test_cpu();
    memory.write_byte(0x1000, 0x80); // SUBA immediate

    for a in 0..=255u16 {
        for m in 0..=255u16 {
            memory.write_byte(0x1001, m as u8);
            cpu.regs.a = a as u8;
            cpu.regs.cc = ConditionCodes::from(0x00);
            cpu.regs.pc = 0x1000;
            cpu.step(&mut memory).unwrap();

            let r = a.wrapping_sub(m);
            assert_eq!(cpu.regs.a, r as u8, "A for {a:#x} - {m:#x}");
            // C is the borrow flag.
            assert_eq!(cpu.regs.cc.c, a < m, "C for {a:#x} - {m:#x}");
            assert_eq!(cpu.regs.cc.z, r & 0xFF == 0, "Z");
            assert_eq!(cpu.regs.cc.n, r & 0x80 != 0, "N");
        }
    }
}

#[test]
fn cmpa_discards_the_result() {
    let (mut cpu, mut memory) = test_cpu();
    cpu.regs.a = 0x05;
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x81, 0x0A]); // CMPA #$0A
    assert_eq!(cpu.regs.a, 0x05);
    assert!(cpu.regs.cc.c);
    assert!(cpu.regs.cc.n);
    assert!(!cpu.regs.cc.z);
}

#[test]
fn lsra_inherent() {
    let (mut cpu, mut memory) = test_cpu();
    for i in 0..=255u8 {
        cpu.regs.a = i;
        cpu.regs.cc = ConditionCodes::from(0x00);
        cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x44]); // LSRA

        let r = cpu.regs.a;
        assert_eq!(r, i >> 1);
        // A logical right shift can never produce a negative result.
        assert!(!cpu.regs.cc.n);
        assert_eq!(cpu.regs.cc.z, r == 0);
        assert!(!cpu.regs.cc.v);
        assert_eq!(cpu.regs.cc.c, i & 0x01 != 0);
    }
}

#[test]
fn lsla_inherent() {
    let (mut cpu, mut memory) = test_cpu();
    for i in 0..=255u16 {
        cpu.regs.a = i as u8;
        cpu.regs.cc = ConditionCodes::from(0x00);
        cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x48]); // LSLA

        let r = cpu.regs.a;
        assert_eq!(r, (i << 1) as u8);
        assert_eq!(cpu.regs.cc.n, r & 0x80 != 0);
        assert_eq!(cpu.regs.cc.z, r == 0);
        // V is set when bit 7 and bit 6 of the source disagree.
        assert_eq!(cpu.regs.cc.v, (64..=191).contains(&i));
        assert_eq!(cpu.regs.cc.c, i & 0x80 != 0);
    }
}

#[test]
fn asrb_holds_the_sign_bit() {
    let (mut cpu, mut memory) = test_cpu();
    for src in 0..=255u8 {
        cpu.regs.b = src;
        cpu.regs.cc = ConditionCodes::from(0x00);
        cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x57]); // ASRB

        let dst = cpu.regs.b;
        assert_eq!(dst, (src >> 1) | (src & 0x80));
        assert_eq!(cpu.regs.cc.n, dst & 0x80 != 0);
        assert_eq!(cpu.regs.cc.z, dst == 0);
        assert!(!cpu.regs.cc.v);
        assert_eq!(cpu.regs.cc.c, src & 0x01 != 0);
    }
}

fn assert_rol(cpu: &Mc6809, src: u8, dst: u8, source_carry: bool) {
    assert_eq!(dst, src << 1 | source_carry as u8, "ROL of {src:#04x}");
    assert_eq!(cpu.regs.cc.n, dst & 0x80 != 0);
    assert_eq!(cpu.regs.cc.z, dst == 0);
    // V = bit 6 XOR bit 7 of the source.
    assert_eq!(cpu.regs.cc.v, (src & 0x40 != 0) != (src & 0x80 != 0));
    assert_eq!(cpu.regs.cc.c, src & 0x80 != 0);
}

#[test]
fn rola_with_clear_carry() {
    let (mut cpu, mut memory) = test_cpu();
    for a in 0..=255u8 {
        cpu.regs.cc = ConditionCodes::from(0x00);
        cpu.regs.a = a;
        cpu_test_run(&mut cpu, &mut memory, 0x0000, &[0x49]); // ROLA
        assert_rol(&cpu, a, cpu.regs.a, false);
        assert!(!cpu.regs.cc.h, "half carry is unaffected");
    }
}

#[test]
fn rola_with_set_carry() {
    let (mut cpu, mut memory) = test_cpu();
    for a in 0..=255u8 {
        cpu.regs.cc = ConditionCodes::from(0xFF);
        cpu.regs.a = a;
        cpu_test_run(&mut cpu, &mut memory, 0x0000, &[0x49]); // ROLA
        assert_rol(&cpu, a, cpu.regs.a, true);
        assert!(cpu.regs.cc.h, "half carry is unaffected");
    }
}

#[test]
fn rol_memory_direct() {
    let (mut cpu, mut memory) = test_cpu();
    for a in 0..=255u8 {
        cpu.regs.cc = ConditionCodes::from(0x00);
        memory.write_byte(0x0050, a);
        cpu_test_run(&mut cpu, &mut memory, 0x0000, &[0x09, 0x50]); // ROL $50
        let r = memory.read_byte(0x0050);
        assert_rol(&cpu, a, r, false);
    }
}

fn assert_ror(cpu: &Mc6809, src: u8, dst: u8, source_carry: bool) {
    assert_eq!(dst, src >> 1 | (source_carry as u8) << 7, "ROR of {src:#04x}");
    assert_eq!(cpu.regs.cc.n, dst & 0x80 != 0);
    assert_eq!(cpu.regs.cc.z, dst == 0);
    assert_eq!(cpu.regs.cc.c, src & 0x01 != 0);
}

#[test]
fn rora_with_clear_carry() {
    let (mut cpu, mut memory) = test_cpu();
    for a in 0..=255u8 {
        cpu.regs.cc = ConditionCodes::from(0x00);
        cpu.regs.a = a;
        cpu_test_run(&mut cpu, &mut memory, 0x0000, &[0x46]); // RORA
        assert_ror(&cpu, a, cpu.regs.a, false);
        assert!(!cpu.regs.cc.h);
        assert!(!cpu.regs.cc.v, "overflow is unaffected");
    }
}

#[test]
fn rora_with_set_carry() {
    let (mut cpu, mut memory) = test_cpu();
    for a in 0..=255u8 {
        cpu.regs.cc = ConditionCodes::from(0xFF);
        cpu.regs.a = a;
        cpu_test_run(&mut cpu, &mut memory, 0x0000, &[0x46]); // RORA
        assert_ror(&cpu, a, cpu.regs.a, true);
        assert!(cpu.regs.cc.h);
        assert!(cpu.regs.cc.v, "overflow is unaffected");
    }
}

#[test]
fn nega_of_0x80_overflows() {
    let (mut cpu, mut memory) = test_cpu();
    cpu.regs.a = 0x80;
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x40]); // NEGA
    assert_eq!(cpu.regs.a, 0x80);
    assert!(cpu.regs.cc.v);
    assert!(cpu.regs.cc.c);
    assert!(cpu.regs.cc.n);
    assert!(!cpu.regs.cc.z);
}

#[test]
fn nega_of_zero_clears_carry() {
    let (mut cpu, mut memory) = test_cpu();
    cpu.regs.a = 0x00;
    cpu.regs.cc = ConditionCodes::from(0x01);
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x40]); // NEGA
    assert_eq!(cpu.regs.a, 0x00);
    assert!(!cpu.regs.cc.c);
    assert!(cpu.regs.cc.z);
    assert!(!cpu.regs.cc.v);
}

#[test]
fn com_sets_carry() {
    let (mut cpu, mut memory) = test_cpu();
    cpu.regs.b = 0x55;
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x53]); // COMB
    assert_eq!(cpu.regs.b, 0xAA);
    assert!(cpu.regs.cc.n);
    assert!(!cpu.regs.cc.z);
    assert!(!cpu.regs.cc.v);
    assert!(cpu.regs.cc.c);
}

#[test]
fn inc_dec_overflow_edges() {
    let (mut cpu, mut memory) = test_cpu();

    cpu.regs.a = 0x7F;
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x4C]); // INCA
    assert_eq!(cpu.regs.a, 0x80);
    assert!(cpu.regs.cc.v);
    assert!(cpu.regs.cc.n);

    cpu.regs.a = 0xFF;
    cpu.regs.cc = ConditionCodes::from(0x01);
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x4C]); // INCA
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.cc.z);
    assert!(!cpu.regs.cc.v);
    assert!(cpu.regs.cc.c, "INC leaves carry alone");

    cpu.regs.a = 0x80;
    cpu.regs.cc = ConditionCodes::from(0x01);
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x4A]); // DECA
    assert_eq!(cpu.regs.a, 0x7F);
    assert!(cpu.regs.cc.v);
    assert!(cpu.regs.cc.c, "DEC leaves carry alone");

    cpu.regs.a = 0x00;
    cpu.regs.cc = ConditionCodes::from(0x00);
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x4A]); // DECA
    assert_eq!(cpu.regs.a, 0xFF);
    assert!(cpu.regs.cc.n);
    assert!(!cpu.regs.cc.v);
}

#[test]
fn mul_flags() {
    let (mut cpu, mut memory) = test_cpu();
    cpu.regs.a = 0x0C;
    cpu.regs.b = 0x64;
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x3D]); // MUL
    assert_eq!(cpu.regs.d(), 0x04B0);
    assert!(!cpu.regs.cc.z);
    // C is bit 7 of the product: 0x04B0 has it set.
    assert!(cpu.regs.cc.c);

    cpu.regs.a = 0x00;
    cpu.regs.b = 0x64;
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x3D]); // MUL
    assert_eq!(cpu.regs.d(), 0x0000);
    assert!(cpu.regs.cc.z);
    assert!(!cpu.regs.cc.c);
}

#[test]
fn daa_adjusts_bcd_addition() {
    let (mut cpu, mut memory) = test_cpu();

    // 0x29 with half-carry pending: the low nibble gets +6.
    cpu.regs.a = 0x29;
    cpu.regs.cc = ConditionCodes::from(0x20); // H set
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x19]); // DAA
    assert_eq!(cpu.regs.a, 0x2F);
    assert!(!cpu.regs.cc.n);
    assert!(!cpu.regs.cc.z);

    // 0x39 + 0x47 = 0x80: both nibbles need correction.
    cpu.regs.a = 0x39;
    cpu.regs.cc = ConditionCodes::from(0x00);
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x8B, 0x47, 0x19]); // ADDA #$47; DAA
    assert_eq!(cpu.regs.a, 0x86);

    // A carry generated by the adjust itself sets C.
    cpu.regs.a = 0x99;
    cpu.regs.cc = ConditionCodes::from(0x00);
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x8B, 0x01, 0x19]); // ADDA #$01; DAA
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.cc.c);
    assert!(cpu.regs.cc.z);
}

#[test]
fn sex_extends_only_negative_b() {
    let (mut cpu, mut memory) = test_cpu();

    cpu.regs.a = 0x12;
    cpu.regs.b = 0x80;
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x1D]); // SEX
    // A negative B leaves A untouched; the caller sees the prior A.
    assert_eq!(cpu.regs.a, 0x12);
    assert!(!cpu.regs.cc.z);

    cpu.regs.a = 0xFF;
    cpu.regs.b = 0x7F;
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x1D]); // SEX
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.d(), 0x007F);
    assert!(!cpu.regs.cc.n);

    cpu.regs.a = 0x00;
    cpu.regs.b = 0x00;
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x1D]); // SEX
    assert!(cpu.regs.cc.z);
}

#[test]
fn addd_is_16_bit() {
    let (mut cpu, mut memory) = test_cpu();
    cpu.regs.set_d(0x80FF);
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0xC3, 0x00, 0x01]); // ADDD #$0001
    assert_eq!(cpu.regs.d(), 0x8100);
    assert!(cpu.regs.cc.n);
    assert!(!cpu.regs.cc.z);
    assert!(!cpu.regs.cc.v);
    assert!(!cpu.regs.cc.c);

    cpu.regs.set_d(0xFFFF);
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0xC3, 0x00, 0x01]); // ADDD #$0001
    assert_eq!(cpu.regs.d(), 0x0000);
    assert!(cpu.regs.cc.z);
    assert!(cpu.regs.cc.c);
}

#[test]
fn abx_is_unsigned_and_flagless() {
    let (mut cpu, mut memory) = test_cpu();
    cpu.regs.x = 0xFF80;
    cpu.regs.b = 0xFF;
    cpu.regs.cc = ConditionCodes::from(0x00);
    cpu_test_run(&mut cpu, &mut memory, 0x1000, &[0x3A]); // ABX
    // B is added unsigned, wrapping through the top of the address space.
    assert_eq!(cpu.regs.x, 0x007F);
    assert_eq!(u8::from(cpu.regs.cc), 0x00);
}
