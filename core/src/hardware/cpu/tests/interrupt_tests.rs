use pretty_assertions::assert_eq;

use crate::hardware::cpu::tests::{board_with_program, enable_interrupts, PROGRAM_START};
use crate::hardware::cpu::{Ime, InterruptState};
use crate::io::interrupts::InterruptFlags;

#[test]
fn vblank_dispatch_jumps_to_its_vector() {
    let mut board = board_with_program(&[0x00, 0x00, 0x00, 0x00]);
    enable_interrupts(&mut board);
    board.cpu.registers.sp = 0xDFF0;
    board.mmu.interrupts.write_enable(0x01);
    board.mmu.interrupts.request(InterruptFlags::VBLANK);

    // Acceptance plus the five ISR M-cycles.
    board.m_cycles(5);

    assert_eq!(board.cpu.registers.pc, 0x0041); // fetch at the vector done
    // Servicing cleared exactly the VBlank bit.
    assert!(!board
        .mmu
        .interrupts
        .interrupt_flag
        .contains(InterruptFlags::VBLANK));
    assert_eq!(board.cpu.ime, Ime::Disabled);
    // The not-yet-executed instruction's address went onto the stack.
    assert_eq!(board.read_short(0xDFEE), PROGRAM_START);
}

#[test]
fn dispatch_takes_five_m_cycles() {
    let mut board = board_with_program(&[0x00, 0x00, 0x00]);
    enable_interrupts(&mut board);
    board.cpu.registers.sp = 0xDFF0;
    board.mmu.interrupts.write_enable(0x01);
    board.mmu.interrupts.request(InterruptFlags::VBLANK);

    // Run until the ISR sequence begins.
    let mut guard = 0;
    while board.cpu.interrupt.state != InterruptState::Serving {
        board.m_cycle();
        guard += 1;
        assert!(guard < 8, "interrupt was never accepted");
    }
    // From acceptance, five M-cycles land the fetch at the vector.
    board.m_cycles(5);
    assert_eq!(board.cpu.registers.pc, 0x0041);
}

#[test]
fn lowest_set_bit_wins() {
    let mut board = board_with_program(&[0x00, 0x00, 0x00]);
    enable_interrupts(&mut board);
    board.cpu.registers.sp = 0xDFF0;
    board.mmu.interrupts.write_enable(0x1F);
    board.mmu.interrupts.request(InterruptFlags::TIMER);
    board.mmu.interrupts.request(InterruptFlags::STAT);

    board.m_cycles(6);

    // STAT (bit 1) outranks Timer (bit 2).
    assert_eq!(board.cpu.registers.pc, 0x0049);
    assert!(!board.mmu.interrupts.interrupt_flag.contains(InterruptFlags::STAT));
    assert!(board.mmu.interrupts.interrupt_flag.contains(InterruptFlags::TIMER));
}

#[test]
fn ei_is_delayed_by_one_instruction() {
    // EI ; INC B ; INC B ...
    let mut board = board_with_program(&[0xFB, 0x04, 0x04, 0x04]);
    board.cpu.registers.sp = 0xDFF0;
    board.mmu.interrupts.write_enable(0x01);
    board.mmu.interrupts.request(InterruptFlags::VBLANK);

    // EI itself must not allow the dispatch.
    board.m_cycle();
    assert_eq!(board.cpu.ime, Ime::Requested);

    // One INC, then the five ISR M-cycles.
    board.m_cycles(6);
    assert_eq!(board.cpu.registers.bc >> 8, 1);
    assert_eq!(board.cpu.registers.pc, 0x0041);
}

#[test]
fn di_cancels_a_requested_enable() {
    // EI ; DI ; then nothing may ever dispatch.
    let mut board = board_with_program(&[0xFB, 0xF3, 0x00, 0x00, 0x00, 0x00]);
    board.cpu.registers.sp = 0xDFF0;
    board.mmu.interrupts.write_enable(0x01);
    board.mmu.interrupts.request(InterruptFlags::VBLANK);

    board.m_cycles(12);

    assert_eq!(board.cpu.ime, Ime::Disabled);
    assert!(board.mmu.interrupts.interrupt_flag.contains(InterruptFlags::VBLANK));
    assert!(board.cpu.registers.pc < 0x0040 || board.cpu.registers.pc >= PROGRAM_START);
}

#[test]
fn halt_wakes_without_service_when_ime_is_off() {
    // HALT ; INC B
    let mut board = board_with_program(&[0x76, 0x04, 0x00]);
    board.mmu.interrupts.write_enable(0x01);

    board.m_cycles(4);
    assert!(board.cpu.halted);

    board.mmu.interrupts.request(InterruptFlags::VBLANK);
    board.m_cycles(6);

    assert!(!board.cpu.halted);
    // IF was left alone: nothing was serviced.
    assert!(board.mmu.interrupts.interrupt_flag.contains(InterruptFlags::VBLANK));
    // Execution continued past the HALT.
    assert_eq!(board.cpu.registers.bc >> 8, 1);
}

#[test]
fn halt_bug_runs_the_next_opcode_twice() {
    // HALT with IME off and a pending interrupt, then INC B.
    let mut board = board_with_program(&[0x76, 0x04, 0x00, 0x00]);
    board.mmu.interrupts.write_enable(0x01);
    board.mmu.interrupts.request(InterruptFlags::VBLANK);

    board.m_cycles(6);

    assert!(!board.cpu.halted);
    assert_eq!(board.cpu.registers.bc >> 8, 2);
}

#[test]
fn ie_overwrite_during_push_cancels_to_address_zero() {
    // SP at 0x0000: the high push lands on IE (0xFFFF) and wipes it.
    let mut board = board_with_program(&[0x00, 0x00, 0x00]);
    enable_interrupts(&mut board);
    board.cpu.registers.sp = 0x0000;
    board.mmu.interrupts.write_enable(0x01);
    board.mmu.interrupts.request(InterruptFlags::VBLANK);

    board.m_cycles(5);

    // PC.hi is 0xC0 here, which cleared IE.0; with nothing pending
    // left the dispatch falls through to 0x0000.
    assert_eq!(board.cpu.registers.pc, 0x0001);
    // The request itself is still latched in IF.
    assert!(board.mmu.interrupts.interrupt_flag.contains(InterruptFlags::VBLANK));
}
