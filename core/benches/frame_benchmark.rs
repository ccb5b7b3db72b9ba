use criterion::{criterion_group, criterion_main, Criterion};

use dotboy_core::{GameBoy, GameBoyOptions};

/// Scroll the background forever; enough bus traffic to keep the
/// whole pipeline honest.
fn build_bench_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    //   LDH A, (0x42) ; INC A ; LDH (0x42), A ; JR -7
    let code = [0xF0, 0x42, 0x3C, 0xE0, 0x42, 0x18, 0xF9];
    rom[0x100..0x100 + code.len()].copy_from_slice(&code);
    rom
}

fn frame_benchmark(c: &mut Criterion) {
    let mut gb = GameBoy::new(GameBoyOptions::default());
    gb.load_rom(&build_bench_rom()).unwrap();

    c.bench_function("frame", |b| {
        b.iter(|| {
            gb.frame();
        })
    });
}

criterion_group!(benches, frame_benchmark);
criterion_main!(benches);
