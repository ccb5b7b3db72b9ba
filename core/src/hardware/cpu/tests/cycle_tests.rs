//! M-cycle counts for representative opcodes, including both arms of
//! every conditional form.

use pretty_assertions::assert_eq;

use crate::hardware::cpu::tests::board_with_program;

fn cycles_of(program: &[u8], prepare: impl FnOnce(&mut crate::hardware::cpu::Cpu)) -> usize {
    let mut board = board_with_program(program);
    prepare(&mut board.cpu);
    board.run_instruction()
}

#[test]
fn unconditional_cycle_counts() {
    assert_eq!(cycles_of(&[0x00], |_| {}), 1); // NOP
    assert_eq!(cycles_of(&[0x01, 0x00, 0x00], |_| {}), 3); // LD BC, u16
    assert_eq!(cycles_of(&[0x02], |_| {}), 2); // LD (BC), A
    assert_eq!(cycles_of(&[0x03], |_| {}), 2); // INC BC
    assert_eq!(cycles_of(&[0x04], |_| {}), 1); // INC B
    assert_eq!(cycles_of(&[0x08, 0x00, 0xC3], |_| {}), 5); // LD (u16), SP
    assert_eq!(cycles_of(&[0x09], |_| {}), 2); // ADD HL, BC
    assert_eq!(cycles_of(&[0x18, 0x00], |_| {}), 3); // JR
    assert_eq!(cycles_of(&[0x34], |cpu| cpu.registers.hl = 0xC500), 3); // INC (HL)
    assert_eq!(cycles_of(&[0x36, 0x11], |cpu| cpu.registers.hl = 0xC500), 3); // LD (HL), u8
    assert_eq!(cycles_of(&[0x41], |_| {}), 1); // LD B, C
    assert_eq!(cycles_of(&[0x46], |cpu| cpu.registers.hl = 0xC500), 2); // LD B, (HL)
    assert_eq!(cycles_of(&[0x80], |_| {}), 1); // ADD A, B
    assert_eq!(cycles_of(&[0x86], |cpu| cpu.registers.hl = 0xC500), 2); // ADD A, (HL)
    assert_eq!(cycles_of(&[0xC1], |cpu| cpu.registers.sp = 0xDFF0), 3); // POP BC
    assert_eq!(cycles_of(&[0xC3, 0x00, 0xC1], |_| {}), 4); // JP
    assert_eq!(cycles_of(&[0xC5], |cpu| cpu.registers.sp = 0xDFF0), 4); // PUSH BC
    assert_eq!(cycles_of(&[0xC6, 0x01], |_| {}), 2); // ADD A, u8
    assert_eq!(cycles_of(&[0xC9], |cpu| cpu.registers.sp = 0xDFF0), 4); // RET
    assert_eq!(cycles_of(&[0xCD, 0x00, 0xC1], |cpu| cpu.registers.sp = 0xDFF0), 6); // CALL
    assert_eq!(cycles_of(&[0xD9], |cpu| cpu.registers.sp = 0xDFF0), 4); // RETI
    assert_eq!(cycles_of(&[0xE0, 0x80], |_| {}), 3); // LDH (u8), A
    assert_eq!(cycles_of(&[0xE2], |_| {}), 2); // LDH (C), A
    assert_eq!(cycles_of(&[0xE8, 0x01], |_| {}), 4); // ADD SP, s8
    assert_eq!(cycles_of(&[0xE9], |cpu| cpu.registers.hl = 0xC500), 1); // JP HL
    assert_eq!(cycles_of(&[0xEA, 0x00, 0xC5], |_| {}), 4); // LD (u16), A
    assert_eq!(cycles_of(&[0xF0, 0x80], |_| {}), 3); // LDH A, (u8)
    assert_eq!(cycles_of(&[0xF8, 0x01], |_| {}), 3); // LD HL, SP+s8
    assert_eq!(cycles_of(&[0xF9], |_| {}), 2); // LD SP, HL
    assert_eq!(cycles_of(&[0xFA, 0x00, 0xC5], |_| {}), 4); // LD A, (u16)
    assert_eq!(cycles_of(&[0xC7], |cpu| cpu.registers.sp = 0xDFF0), 4); // RST 00
}

#[test]
fn cb_cycle_counts() {
    assert_eq!(cycles_of(&[0xCB, 0x00], |_| {}), 2); // RLC B
    assert_eq!(cycles_of(&[0xCB, 0x06], |cpu| cpu.registers.hl = 0xC500), 4); // RLC (HL)
    assert_eq!(cycles_of(&[0xCB, 0x46], |cpu| cpu.registers.hl = 0xC500), 3); // BIT 0, (HL)
    assert_eq!(cycles_of(&[0xCB, 0x86], |cpu| cpu.registers.hl = 0xC500), 4); // RES 0, (HL)
    assert_eq!(cycles_of(&[0xCB, 0xC6], |cpu| cpu.registers.hl = 0xC500), 4); // SET 0, (HL)
}

#[test]
fn conditional_cycle_counts() {
    // JR NZ taken / not taken
    assert_eq!(cycles_of(&[0x20, 0x00], |cpu| cpu.registers.set_zf(false)), 3);
    assert_eq!(cycles_of(&[0x20, 0x00], |cpu| cpu.registers.set_zf(true)), 2);

    // JP Z
    assert_eq!(cycles_of(&[0xCA, 0x00, 0xC1], |cpu| cpu.registers.set_zf(true)), 4);
    assert_eq!(cycles_of(&[0xCA, 0x00, 0xC1], |cpu| cpu.registers.set_zf(false)), 3);

    // CALL NC
    assert_eq!(
        cycles_of(&[0xD4, 0x00, 0xC1], |cpu| {
            cpu.registers.sp = 0xDFF0;
            cpu.registers.set_cf(false);
        }),
        6
    );
    assert_eq!(
        cycles_of(&[0xD4, 0x00, 0xC1], |cpu| {
            cpu.registers.sp = 0xDFF0;
            cpu.registers.set_cf(true);
        }),
        3
    );

    // RET C
    assert_eq!(
        cycles_of(&[0xD8], |cpu| {
            cpu.registers.sp = 0xDFF0;
            cpu.registers.set_cf(true);
        }),
        5
    );
    assert_eq!(
        cycles_of(&[0xD8], |cpu| {
            cpu.registers.sp = 0xDFF0;
            cpu.registers.set_cf(false);
        }),
        2
    );
}
