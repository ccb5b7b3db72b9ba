//! End-to-end save-state checks driven through the public API only.

use dotboy_core::{GameBoy, GameBoyOptions, StateError};

/// A minimal but well-formed 32 KiB ROM: valid logo, valid header
/// checksum, and a tiny program that paints by poking the palette.
fn build_test_rom() -> Vec<u8> {
    const LOGO: [u8; 48] = [
        0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00,
        0x0D, 0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD,
        0xD9, 0x99, 0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB,
        0xB9, 0x33, 0x3E,
    ];

    let mut rom = vec![0u8; 0x8000];
    rom[0x104..0x134].copy_from_slice(&LOGO);
    for (offset, byte) in b"STATETEST".iter().enumerate() {
        rom[0x134 + offset] = *byte;
    }

    // Entry point: cycle BGP forever so frames have changing content.
    //   LD A, 0xE4 ; LDH (0x47), A ; INC A ; JR -5
    let code = [0x3E, 0xE4, 0xE0, 0x47, 0x3C, 0x18, 0xFB];
    rom[0x100..0x100 + code.len()].copy_from_slice(&code);

    // Header checksum over 0x134-0x14C.
    let checksum = rom[0x134..=0x14C]
        .iter()
        .fold(0u8, |x, byte| x.wrapping_sub(*byte).wrapping_sub(1));
    rom[0x14D] = checksum;
    rom
}

fn fresh_gameboy() -> GameBoy {
    let mut gb = GameBoy::new(GameBoyOptions::default());
    gb.load_rom(&build_test_rom()).expect("test ROM must load");
    gb
}

#[test]
fn loads_a_valid_rom() {
    fresh_gameboy();
}

#[test]
fn rejects_a_truncated_rom() {
    let mut gb = GameBoy::new(GameBoyOptions::default());
    assert!(gb.load_rom(&[0u8; 0x80]).is_err());
}

#[test]
fn save_then_load_is_identity_on_the_byte_stream() {
    let mut gb = fresh_gameboy();
    for _ in 0..3 {
        gb.frame();
    }

    let mut saved = Vec::new();
    gb.save_state(&mut saved);
    gb.load_state(&saved).unwrap();

    let mut resaved = Vec::new();
    gb.save_state(&mut resaved);
    assert_eq!(saved, resaved);
}

#[test]
fn restored_machine_renders_the_same_frames() {
    let mut original = fresh_gameboy();
    original.frame();
    original.frame();

    let mut snapshot = Vec::new();
    original.save_state(&mut snapshot);

    let mut restored = fresh_gameboy();
    restored.load_state(&snapshot).unwrap();

    for _ in 0..4 {
        original.frame();
        restored.frame();
        assert!(
            original.framebuffer()[..] == restored.framebuffer()[..],
            "restored machine diverged"
        );
    }
}

#[test]
fn boot_is_deterministic() {
    let mut first = fresh_gameboy();
    let mut second = fresh_gameboy();
    for _ in 0..5 {
        first.frame();
        second.frame();
    }
    assert!(first.framebuffer()[..] == second.framebuffer()[..]);
}

#[test]
fn state_from_another_rom_is_refused_cleanly() {
    let mut gb = fresh_gameboy();
    match gb.load_state(b"DBST\xFF\xFFgarbage") {
        Err(StateError::UnsupportedVersion(_)) => {}
        other => panic!("expected a version error, got {:?}", other),
    }
}

#[test]
fn run_for_cycles_reports_the_frame_edge() {
    let mut gb = fresh_gameboy();
    // A frame is 70224 T-cycles; two half-frames straddle the edge.
    assert!(!gb.run_for_cycles(35000));
    assert!(gb.run_for_cycles(36000));
}
