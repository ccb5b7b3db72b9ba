//! The machine: clock distribution across the four T-cycle phases,
//! ROM/boot-ROM loading, and the public stepping and save-state
//! surface the host drives.
//!
//! One call to [`GameBoy::tick`] is one T-cycle. Within it, the CPU
//! runs the phase the hardware would be in (execute on T0, write
//! flush on T1, read latch on T3) and every other component advances
//! in lockstep, so observable side effects land on the same phase the
//! real machine produces them on.

use log::*;

use crate::hardware::cartridge::{Cartridge, RomError};
use crate::hardware::cpu::Cpu;
use crate::hardware::mmu::Memory;
use crate::hardware::ppu::palette::Rgb565;
use crate::hardware::ppu::FRAMEBUFFER_SIZE;
use crate::io::bootrom::BootRom;
use crate::io::joypad::{InputKey, KeyState};
use crate::io::serial::SerialEndpoint;
use crate::parcel::{Parcel, ParcelReader, StateError, STATE_MAGIC, STATE_VERSION};
use crate::GameBoyOptions;

pub use crate::hardware::apu::AudioSink;

/// Master clock rate, T-cycles per second.
pub const CLOCK_SPEED: u64 = 4_194_304;
/// T-cycles per frame at single speed.
pub const CYCLES_PER_FRAME: u64 = 70224;

/// Which hardware revision the machine behaves as.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EmulatorMode {
    DMG,
    CGB,
}

impl EmulatorMode {
    pub fn is_cgb(self) -> bool {
        self == EmulatorMode::CGB
    }

    pub fn is_dmg(self) -> bool {
        self == EmulatorMode::DMG
    }
}

pub struct GameBoy {
    cpu: Cpu,
    mmu: Memory,
    mode: EmulatorMode,
    /// Phase within the current M-cycle, 0-3.
    t_phase: u8,
    /// Divides the CPU clock down to the video clock in double speed.
    video_phase: bool,
    /// Kept so `load_rom` can rebuild the machine with the same boot
    /// ROM installed.
    boot_rom_bytes: Option<Vec<u8>>,
    requested_mode: EmulatorMode,
}

impl GameBoy {
    pub fn new(options: GameBoyOptions) -> Self {
        let mode = options.mode;
        let mut result = GameBoy {
            cpu: Cpu::new(options.boot_rom.is_none(), mode.is_cgb()),
            mmu: Memory::new(
                mode.is_cgb(),
                BootRom::new(options.boot_rom.clone()),
                Cartridge::empty(),
            ),
            mode,
            t_phase: 0,
            video_phase: false,
            boot_rom_bytes: options.boot_rom,
            requested_mode: mode,
        };
        if let Some(saved_ram) = options.saved_ram {
            result.mmu.cartridge.load_ram(&saved_ram);
        }
        result.apply_post_boot_defaults();
        result
    }

    /// Install (or replace) the boot ROM; resets the machine around
    /// whatever cartridge is currently inserted.
    pub fn load_boot_rom(&mut self, bytes: &[u8]) {
        self.boot_rom_bytes = Some(bytes.to_vec());
        let cartridge = std::mem::replace(&mut self.mmu.cartridge, Cartridge::empty());
        self.reset(cartridge);
    }

    /// Load a ROM image, replacing any current cartridge, and reset
    /// the machine. The hardware revision follows the cartridge: a
    /// DMG-only ROM downgrades a CGB-configured machine.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), RomError> {
        let cartridge = Cartridge::new(bytes.to_vec(), None)?;
        info!("Loaded {:?}", cartridge);
        self.mode = if self.requested_mode.is_cgb() && cartridge.header().supports_cgb() {
            EmulatorMode::CGB
        } else {
            EmulatorMode::DMG
        };
        self.reset(cartridge);
        Ok(())
    }

    /// Full machine reset around the given cartridge.
    fn reset(&mut self, cartridge: Cartridge) {
        let sink = self.mmu.apu.take_sink();
        let endpoint = self.mmu.serial.take_endpoint();
        self.cpu = Cpu::new(self.boot_rom_bytes.is_none(), self.mode.is_cgb());
        self.mmu = Memory::new(
            self.mode.is_cgb(),
            BootRom::new(self.boot_rom_bytes.clone()),
            cartridge,
        );
        self.mmu.apu.set_sink(sink);
        if let Some(endpoint) = endpoint {
            self.mmu.serial.attach(endpoint);
        }
        self.t_phase = 0;
        self.video_phase = false;
        self.apply_post_boot_defaults();
    }

    /// Hardware state the boot ROM would have left behind, applied
    /// when none is installed.
    fn apply_post_boot_defaults(&mut self) {
        if self.boot_rom_bytes.is_none() {
            self.mmu.timers.div_ticks = 0xAB00;
        }
    }

    /// Restore a battery save (external RAM, plus RTC on timer carts).
    pub fn load_ram(&mut self, bytes: &[u8]) {
        self.mmu.cartridge.load_ram(bytes);
    }

    /// Snapshot the battery-backed RAM for the host to persist.
    pub fn save_ram(&mut self) -> Vec<u8> {
        self.mmu.cartridge.save_ram()
    }

    pub fn mode(&self) -> EmulatorMode {
        self.mode
    }

    /// Advance the machine by one T-cycle.
    pub fn tick(&mut self) {
        // Stop mode: the clocks are off until a selected key is held.
        // The video side keeps pacing so `frame` stays productive.
        if self.cpu.stopped {
            if self.mmu.joypad.any_selected_pressed() {
                self.cpu.stopped = false;
            } else {
                let Memory {
                    ppu, interrupts, ..
                } = &mut self.mmu;
                ppu.tick(interrupts);
                return;
            }
        }

        let video_tick = !self.mmu.speed.double_speed || self.video_phase;

        if self.mmu.stall_m_cycles == 0 {
            match self.t_phase {
                0 => self.cpu.tick_t0(&mut self.mmu),
                1 => self.cpu.tick_t1(&mut self.mmu),
                2 => self.cpu.tick_t2(&mut self.mmu),
                _ => self.cpu.tick_t3(&mut self.mmu),
            }
        }

        self.mmu.tick_components(self.t_phase, video_tick);

        if self.t_phase == 3 && self.mmu.stall_m_cycles > 0 {
            self.mmu.stall_m_cycles -= 1;
        }
        self.t_phase = (self.t_phase + 1) & 0x3;
        self.video_phase = !self.video_phase;
    }

    /// Advance `cycles` T-cycles; reports whether a frame boundary was
    /// crossed along the way.
    pub fn run_for_cycles(&mut self, cycles: u64) -> bool {
        let mut frame_boundary_hit = false;
        for _ in 0..cycles {
            self.tick();
            frame_boundary_hit |= self.mmu.ppu.take_frame_ready();
        }
        frame_boundary_hit
    }

    /// Run until the next frame edge.
    pub fn frame(&mut self) {
        loop {
            self.tick();
            if self.mmu.ppu.take_frame_ready() {
                return;
            }
        }
    }

    pub fn set_key(&mut self, key: InputKey, state: KeyState) {
        let Memory {
            joypad, interrupts, ..
        } = &mut self.mmu;
        joypad.set_key(key, state, interrupts);
    }

    /// The current LCD contents, 160x144 RGB565 pixels. Consistent
    /// only while no tick is in progress.
    pub fn framebuffer(&self) -> &[Rgb565; FRAMEBUFFER_SIZE] {
        self.mmu.ppu.framebuffer()
    }

    pub fn attach_serial(&mut self, endpoint: Box<dyn SerialEndpoint>) {
        self.mmu.serial.attach(endpoint);
    }

    pub fn detach_serial(&mut self) {
        self.mmu.serial.detach();
    }

    /// Register a callback that consumes generated stereo `i16`
    /// samples; `None` discards them.
    pub fn set_audio_sink(&mut self, sink: Option<AudioSink>) {
        self.mmu.apu.set_sink(sink);
    }

    /// Serialize the complete machine state into `out`.
    pub fn save_state(&self, out: &mut Vec<u8>) {
        let mut parcel = Parcel::new();
        parcel.write_u8(self.mode.is_cgb() as u8);
        parcel.write_u8(self.t_phase);
        parcel.write_bool(self.video_phase);
        self.cpu.save_state(&mut parcel);
        self.mmu.save_state(&mut parcel);

        out.extend_from_slice(&STATE_MAGIC);
        out.extend_from_slice(&STATE_VERSION.to_le_bytes());
        out.extend_from_slice(&parcel.into_bytes());
    }

    /// Restore a state produced by [`GameBoy::save_state`] on a
    /// machine with the same ROM loaded. Execution resumes
    /// bit-identically from the saved tick.
    pub fn load_state(&mut self, bytes: &[u8]) -> Result<(), StateError> {
        if bytes.len() < 6 {
            return Err(StateError::UnexpectedEnd);
        }
        if bytes[0..4] != STATE_MAGIC {
            return Err(StateError::BadMagic);
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != STATE_VERSION {
            return Err(StateError::UnsupportedVersion(version));
        }

        let mut reader = ParcelReader::new(&bytes[6..]);
        if (reader.read_u8()? != 0) != self.mode.is_cgb() {
            return Err(StateError::Content("state was taken on a different hardware revision"));
        }
        let t_phase = reader.read_u8()?;
        if t_phase > 3 {
            return Err(StateError::Content("T-phase out of range"));
        }
        let video_phase = reader.read_bool()?;
        self.cpu.load_state(&mut reader)?;
        self.mmu.load_state(&mut reader)?;
        self.t_phase = t_phase;
        self.video_phase = video_phase;
        Ok(())
    }
}

impl std::fmt::Debug for GameBoy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GameBoy {{ mode: {:?}, phase: {}, cpu: {:?} }}",
            self.mode, self.t_phase, self.cpu
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::GameBoyOptionsBuilder;

    fn rom_with_code(code: &[u8], cgb: bool) -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000];
        if cgb {
            rom[0x143] = 0x80;
        }
        rom[0x100..0x100 + code.len()].copy_from_slice(code);
        rom
    }

    fn gameboy_with_code(code: &[u8]) -> GameBoy {
        let mut gb = GameBoy::new(Default::default());
        gb.load_rom(&rom_with_code(code, false)).unwrap();
        gb
    }

    fn cgb_with_code(code: &[u8]) -> GameBoy {
        let mut gb = GameBoy::new(
            GameBoyOptionsBuilder::new()
                .with_mode(EmulatorMode::CGB)
                .build(),
        );
        gb.load_rom(&rom_with_code(code, true)).unwrap();
        gb
    }

    #[test]
    fn dmg_reset_registers() {
        let gb = gameboy_with_code(&[]);
        assert_eq!(gb.cpu.registers.af, 0x01B0);
        assert_eq!(gb.cpu.registers.bc, 0x0013);
        assert_eq!(gb.cpu.registers.de, 0x00D8);
        assert_eq!(gb.cpu.registers.hl, 0x014D);
        assert_eq!(gb.cpu.registers.pc, 0x0100);
        assert_eq!(gb.cpu.registers.sp, 0xFFFE);
    }

    #[test]
    fn cgb_reset_registers() {
        let gb = cgb_with_code(&[]);
        assert_eq!(gb.cpu.registers.af, 0x1180);
        assert_eq!(gb.cpu.registers.de, 0xFF56);
        assert_eq!(gb.cpu.registers.hl, 0x000D);
        assert_eq!(gb.cpu.registers.pc, 0x0100);
    }

    #[test]
    fn dmg_only_rom_downgrades_a_cgb_machine() {
        let mut gb = GameBoy::new(
            GameBoyOptionsBuilder::new()
                .with_mode(EmulatorMode::CGB)
                .build(),
        );
        gb.load_rom(&rom_with_code(&[], false)).unwrap();
        assert_eq!(gb.mode(), EmulatorMode::DMG);
    }

    #[test]
    fn oam_dma_copies_a_page_and_conflicts_the_bus() {
        // The canonical pattern: the start-and-wait stub runs from
        // HRAM, the only memory the CPU can use during the transfer.
        //   LD A, 0xC0 ; LDH (0x46), A ; JR -2
        let mut gb = gameboy_with_code(&[0xC3, 0x80, 0xFF]); // JP 0xFF80
        for (i, byte) in [0x3E, 0xC0, 0xE0, 0x46, 0x18, 0xFE].iter().enumerate() {
            gb.mmu.write_byte(0xFF80 + i as u16, *byte);
        }
        for i in 0..160u16 {
            gb.mmu.write_byte(0xC000 + i, i as u8);
        }

        // Through the two instructions plus the setup cycle.
        while !gb.mmu.dma.active() {
            gb.tick();
        }
        // Mid-transfer: a CPU read of VRAM yields the in-flight byte.
        for _ in 0..40 {
            gb.tick();
        }
        assert_eq!(gb.mmu.read_byte_cpu(0x8000), gb.mmu.dma.conflict_byte());
        // The conflict byte is one of the page's pattern values, never
        // the open-bus 0xFF VRAM would have yielded here.
        assert!(gb.mmu.read_byte_cpu(0x8000) < 160);

        // 160 M-cycles after the start the OAM holds the page.
        for _ in 0..160 * 4 {
            gb.tick();
        }
        assert!(!gb.mmu.dma.active());
        assert_eq!(gb.mmu.ppu.oam_byte(0), 0);
        assert_eq!(gb.mmu.ppu.oam_byte(159), 159);
    }

    #[test]
    fn timer_reload_sequence() {
        // Matches the documented TAC=0x05 sequence: 0xFE, 0xFF, 0x00
        // during the overflow window, then TMA with one interrupt.
        let mut gb = gameboy_with_code(&[0x18, 0xFE]); // JR -2
        gb.mmu.write_byte(0xFF06, 0x03);
        gb.mmu.write_byte(0xFF05, 0xFE);
        gb.mmu.write_byte(0xFF07, 0x05);

        let mut seen = Vec::new();
        let mut interrupts_raised = 0;
        let mut last_if = false;
        for _ in 0..200 {
            gb.tick();
            let tima = gb.mmu.timers.timer_counter();
            if seen.last() != Some(&tima) {
                seen.push(tima);
            }
            let now = gb
                .mmu
                .interrupts
                .interrupt_flag
                .contains(crate::io::interrupts::InterruptFlags::TIMER);
            if now && !last_if {
                interrupts_raised += 1;
            }
            last_if = now;
        }

        assert_eq!(seen, vec![0xFE, 0xFF, 0x00, 0x03]);
        assert_eq!(interrupts_raised, 1);
    }

    #[test]
    fn hdma_moves_one_chunk_per_hblank() {
        let mut gb = cgb_with_code(&[0x18, 0xFE]);
        for i in 0..128u16 {
            gb.mmu.write_byte(0xC000 + i, (i as u8) ^ 0x5A);
        }
        // Source 0xC000, destination 0x8000, 8 chunks, HBlank paced.
        gb.mmu.write_byte(0xFF51, 0xC0);
        gb.mmu.write_byte(0xFF52, 0x00);
        gb.mmu.write_byte(0xFF53, 0x00);
        gb.mmu.write_byte(0xFF54, 0x00);
        gb.mmu.write_byte(0xFF55, 0x87);
        assert!(gb.mmu.hdma.active());

        // Run to the first HBlank and one M-cycle further.
        while gb.mmu.ppu.mode() != crate::hardware::ppu::Mode::HBlank {
            gb.tick();
        }
        for _ in 0..8 {
            gb.tick();
        }
        assert_eq!(gb.mmu.hdma.remaining_chunks(), 7);
        assert_eq!(gb.mmu.read_byte(0xFF55) & 0x7F, 6);

        // A whole frame has more than enough HBlanks to finish.
        gb.frame();
        assert!(!gb.mmu.hdma.active());
        assert_eq!(gb.mmu.read_byte(0xFF55), 0xFF);
        assert_eq!(gb.mmu.ppu.vram_byte(0, 0x0000), 0x5A);
        assert_eq!(gb.mmu.ppu.vram_byte(0, 0x007F), 0x7F ^ 0x5A);
    }

    #[test]
    fn hdma_abort_preserves_remaining_length() {
        let mut gb = cgb_with_code(&[0x18, 0xFE]);
        gb.mmu.write_byte(0xFF51, 0xC0);
        gb.mmu.write_byte(0xFF52, 0x00);
        gb.mmu.write_byte(0xFF53, 0x00);
        gb.mmu.write_byte(0xFF54, 0x00);
        gb.mmu.write_byte(0xFF55, 0x87);

        while gb.mmu.ppu.mode() != crate::hardware::ppu::Mode::HBlank {
            gb.tick();
        }
        for _ in 0..8 {
            gb.tick();
        }
        let before_abort = gb.mmu.read_byte(0xFF55) & 0x7F;
        gb.mmu.write_byte(0xFF55, 0x00);
        assert_eq!(gb.mmu.read_byte(0xFF55) & 0x7F, before_abort);
        assert_ne!(gb.mmu.read_byte(0xFF55) & 0x80, 0);
    }

    #[test]
    fn gdma_copies_immediately_and_stalls() {
        let mut gb = cgb_with_code(&[0x18, 0xFE]);
        for i in 0..32u16 {
            gb.mmu.write_byte(0xC000 + i, i as u8 + 1);
        }
        gb.mmu.write_byte(0xFF51, 0xC0);
        gb.mmu.write_byte(0xFF52, 0x00);
        gb.mmu.write_byte(0xFF53, 0x00);
        gb.mmu.write_byte(0xFF54, 0x00);
        gb.mmu.write_byte(0xFF55, 0x01); // 2 chunks, general purpose

        // The copy completes on the next M-cycle boundary.
        for _ in 0..4 {
            gb.tick();
        }
        assert_eq!(gb.mmu.ppu.vram_byte(0, 0x0000), 1);
        assert_eq!(gb.mmu.ppu.vram_byte(0, 0x001F), 32);
        assert!(gb.mmu.stall_m_cycles > 0);
        assert_eq!(gb.mmu.read_byte(0xFF55), 0xFF);
    }

    #[test]
    fn save_state_roundtrips_bytewise() {
        let mut gb = gameboy_with_code(&[0x04, 0x18, 0xFD]); // INC B loop
        gb.run_for_cycles(12345);

        let mut first = Vec::new();
        gb.save_state(&mut first);
        gb.load_state(&first).unwrap();
        let mut second = Vec::new();
        gb.save_state(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn load_state_rejects_garbage() {
        let mut gb = gameboy_with_code(&[]);
        assert_eq!(gb.load_state(b"nope"), Err(StateError::UnexpectedEnd));
        assert_eq!(
            gb.load_state(b"XXXX\x01\x00rest"),
            Err(StateError::BadMagic)
        );

        let mut state = Vec::new();
        gb.save_state(&mut state);
        state[4] = 0xEE;
        assert_eq!(gb.load_state(&state), Err(StateError::UnsupportedVersion(0xEE)));

        let mut state = Vec::new();
        gb.save_state(&mut state);
        state.truncate(state.len() / 2);
        assert!(gb.load_state(&state).is_err());
    }

    #[test]
    fn execution_resumes_bit_identically_from_a_state() {
        let code = [0x04, 0x0C, 0x18, 0xFC]; // INC B ; INC C ; loop
        let mut original = gameboy_with_code(&code);
        original.run_for_cycles(5000);

        let mut snapshot = Vec::new();
        original.save_state(&mut snapshot);

        let mut restored = gameboy_with_code(&code);
        restored.load_state(&snapshot).unwrap();

        original.run_for_cycles(70224);
        restored.run_for_cycles(70224);

        let mut state_a = Vec::new();
        let mut state_b = Vec::new();
        original.save_state(&mut state_a);
        restored.save_state(&mut state_b);
        assert_eq!(state_a, state_b);
    }

    #[test]
    fn frames_are_deterministic() {
        let code = [0x3E, 0x42, 0x18, 0xFC];
        let mut first = gameboy_with_code(&code);
        let mut second = gameboy_with_code(&code);
        first.frame();
        first.frame();
        second.frame();
        second.frame();
        assert!(first.framebuffer()[..] == second.framebuffer()[..]);
    }

    #[test]
    fn stop_freezes_until_a_selected_key() {
        // Select the button row, then STOP.
        let mut gb = gameboy_with_code(&[0x3E, 0x10, 0xE0, 0x00, 0x10, 0x00, 0x04, 0x18, 0xFE]);
        gb.run_for_cycles(64);
        assert!(gb.cpu.stopped);
        let pc = gb.cpu.registers.pc;

        gb.run_for_cycles(64);
        assert_eq!(gb.cpu.registers.pc, pc);

        gb.set_key(InputKey::A, KeyState::Pressed);
        gb.run_for_cycles(64);
        assert!(!gb.cpu.stopped);
        assert_ne!(gb.cpu.registers.pc, pc);
    }
}
