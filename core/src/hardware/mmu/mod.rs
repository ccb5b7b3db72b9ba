//! The memory bus: address decoding for every agent that can drive the
//! 16-bit bus (CPU, OAM DMA, the CGB copy engines), the IO register
//! dispatch, and the lockstep ticking of all non-CPU components.

use log::*;

use crate::hardware::apu::{Apu, APU_MEM_END, APU_MEM_START, WAVE_SAMPLE_END, WAVE_SAMPLE_START};
use crate::hardware::cartridge::Cartridge;
use crate::hardware::mmu::dma::{OamDma, DMA_TRANSFER};
use crate::hardware::mmu::hdma::{
    Hdma, CGB_HDMA_1, CGB_HDMA_2, CGB_HDMA_3, CGB_HDMA_4, CGB_HDMA_5, CHUNK_SIZE,
};
use crate::hardware::mmu::hram::{Hram, HRAM_END, HRAM_START};
use crate::hardware::mmu::wram::{
    Wram, CGB_WRAM_BANK, ECHO_RAM_END, ECHO_RAM_START, WRAM_BANK_00_END, WRAM_BANK_00_START,
    WRAM_BANK_NN_END, WRAM_BANK_NN_START,
};
use crate::hardware::ppu::{
    Ppu, CGB_BCPD, CGB_BCPS, CGB_OBJECT_PRIORITY, CGB_OCPD, CGB_OCPS, CGB_VRAM_BANK,
    BG_PALETTE, LCD_CONTROL_REGISTER, LCD_STATUS_REGISTER, LYC_REGISTER, LY_REGISTER, OAM_END,
    OAM_START, OB_PALETTE_0, OB_PALETTE_1, SCX_REGISTER, SCY_REGISTER, VRAM_END, VRAM_START,
    WX_REGISTER, WY_REGISTER,
};
use crate::io::bootrom::{BootRom, BOOT_REGISTER};
use crate::io::interrupts::{Interrupts, INTERRUPTS_ENABLE, INTERRUPTS_FLAG};
use crate::io::joypad::{Joypad, JOYPAD_REGISTER};
use crate::io::serial::{Serial, SERIAL_CLOCK_BIT, SIO_CONTROL, SIO_DATA};
use crate::io::timer::{
    Timers, DIVIDER_REGISTER, TIMER_CONTROL, TIMER_COUNTER, TIMER_MODULO,
};
use crate::parcel::{Parcel, ParcelReader, StateError};

pub mod dma;
pub mod hdma;
pub mod hram;
pub mod wram;

/// 16 KB ROM bank 00, from the cartridge (or boot ROM shim).
pub const ROM_BANK_00_START: u16 = 0x0000;
pub const ROM_BANK_00_END: u16 = 0x3FFF;
/// 16 KB switchable ROM bank.
pub const ROM_BANK_NN_START: u16 = 0x4000;
pub const ROM_BANK_NN_END: u16 = 0x7FFF;
/// 8 KB cartridge RAM, banked by the MBC.
pub const EXTERNAL_RAM_START: u16 = 0xA000;
pub const EXTERNAL_RAM_END: u16 = 0xBFFF;
pub const NOT_USABLE_START: u16 = 0xFEA0;
pub const NOT_USABLE_END: u16 = 0xFEFF;
pub const IO_START: u16 = 0xFF00;
pub const IO_END: u16 = 0xFF7F;
/// CGB speed switch (KEY1).
pub const CGB_PREPARE_SWITCH: u16 = 0xFF4D;
/// The value floating on an open bus.
pub const INVALID_READ: u8 = 0xFF;

/// CPU cycles eaten per 16-byte HBlank chunk, single speed.
const HDMA_CHUNK_STALL_M_CYCLES: u32 = 8;

/// KEY1 double-speed latch.
#[derive(Debug, Default)]
pub struct SpeedSwitch {
    pub double_speed: bool,
    pub armed: bool,
}

impl SpeedSwitch {
    pub fn read(&self) -> u8 {
        ((self.double_speed as u8) << 7) | 0x7E | self.armed as u8
    }

    pub fn write(&mut self, value: u8) {
        self.armed = value & 0x1 != 0;
    }

    /// STOP services an armed switch.
    pub fn perform_switch(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.armed = false;
        self.double_speed = !self.double_speed;
        true
    }
}

pub struct Memory {
    pub boot_rom: BootRom,
    pub cartridge: Cartridge,
    pub cgb_mode: bool,

    pub ppu: Ppu,
    pub apu: Apu,
    pub wram: Wram,
    pub hram: Hram,

    pub joypad: Joypad,
    pub timers: Timers,
    pub serial: Serial,
    pub interrupts: Interrupts,
    pub dma: OamDma,
    pub hdma: Hdma,
    pub speed: SpeedSwitch,

    /// M-cycles the CPU still has to sit out for a GDMA/HDMA copy.
    pub stall_m_cycles: u32,
}

impl Memory {
    pub fn new(cgb_mode: bool, boot_rom: BootRom, cartridge: Cartridge) -> Self {
        Memory {
            boot_rom,
            cartridge,
            cgb_mode,
            ppu: Ppu::new(cgb_mode, Default::default()),
            apu: Apu::new(),
            wram: Wram::new(cgb_mode),
            hram: Hram::new(),
            joypad: Joypad::new(),
            timers: Timers::new(),
            serial: Serial::new(),
            interrupts: Interrupts::new(),
            dma: OamDma::new(),
            hdma: Hdma::new(),
            speed: SpeedSwitch::default(),
            stall_m_cycles: 0,
        }
    }

    /// Plain bus read, as seen by any bus master that is not the CPU.
    pub fn read_byte(&self, address: u16) -> u8 {
        match address {
            ROM_BANK_00_START..=ROM_BANK_00_END if self.boot_rom.maps(address) => {
                self.boot_rom.read_byte(address)
            }
            ROM_BANK_00_START..=ROM_BANK_00_END => self.cartridge.read_0000_3fff(address),
            ROM_BANK_NN_START..=ROM_BANK_NN_END => self.cartridge.read_4000_7fff(address),
            VRAM_START..=VRAM_END => self.ppu.read_vram(address),
            EXTERNAL_RAM_START..=EXTERNAL_RAM_END => self.cartridge.read_external_ram(address),
            WRAM_BANK_00_START..=WRAM_BANK_00_END => self.wram.read_bank_0(address),
            WRAM_BANK_NN_START..=WRAM_BANK_NN_END => self.wram.read_bank_n(address),
            ECHO_RAM_START..=ECHO_RAM_END => self.wram.read_echo(address),
            OAM_START..=OAM_END => self.ppu.read_oam(address),
            NOT_USABLE_START..=NOT_USABLE_END => INVALID_READ,
            IO_START..=IO_END => self.read_io(address),
            HRAM_START..=HRAM_END => self.hram.read_byte(address),
            INTERRUPTS_ENABLE => self.interrupts.read_enable(),
        }
    }

    pub fn write_byte(&mut self, address: u16, value: u8) {
        match address {
            ROM_BANK_00_START..=ROM_BANK_NN_END => self.cartridge.write_byte(address, value),
            VRAM_START..=VRAM_END => self.ppu.write_vram(address, value),
            EXTERNAL_RAM_START..=EXTERNAL_RAM_END => self.cartridge.write_byte(address, value),
            WRAM_BANK_00_START..=WRAM_BANK_00_END => self.wram.write_bank_0(address, value),
            WRAM_BANK_NN_START..=WRAM_BANK_NN_END => self.wram.write_bank_n(address, value),
            ECHO_RAM_START..=ECHO_RAM_END => self.wram.write_echo(address, value),
            OAM_START..=OAM_END => self.ppu.write_oam(address, value),
            NOT_USABLE_START..=NOT_USABLE_END => {
                trace!("Write to unusable region: {:#06X}", address)
            }
            IO_START..=IO_END => self.write_io(address, value),
            HRAM_START..=HRAM_END => self.hram.write_byte(address, value),
            INTERRUPTS_ENABLE => self.interrupts.write_enable(value),
        }
    }

    /// CPU-view read: while OAM DMA holds the bus, everything below the
    /// OAM region answers with the byte the DMA is moving, and OAM
    /// itself reads back open.
    pub fn read_byte_cpu(&self, address: u16) -> u8 {
        if self.dma.active() {
            match address {
                0x0000..=0xFDFF => return self.dma.conflict_byte(),
                OAM_START..=OAM_END => return INVALID_READ,
                _ => {}
            }
        }
        self.read_byte(address)
    }

    pub fn write_byte_cpu(&mut self, address: u16, value: u8) {
        if self.dma.active() {
            match address {
                0x0000..=0xFDFF => {
                    trace!("CPU write lost to the DMA bus conflict: {:#06X}", address);
                    return;
                }
                OAM_START..=OAM_END => return,
                _ => {}
            }
        }
        self.write_byte(address, value);
    }

    fn read_io(&self, address: u16) -> u8 {
        match address {
            JOYPAD_REGISTER => self.joypad.read_register(),
            SIO_DATA => self.serial.read_data(),
            SIO_CONTROL => self.serial.read_control(),
            DIVIDER_REGISTER => self.timers.divider_register(),
            TIMER_COUNTER => self.timers.timer_counter(),
            TIMER_MODULO => self.timers.timer_modulo(),
            TIMER_CONTROL => self.timers.timer_control(),
            INTERRUPTS_FLAG => self.interrupts.read_flag(),
            APU_MEM_START..=APU_MEM_END => self.apu.read_register(address),
            WAVE_SAMPLE_START..=WAVE_SAMPLE_END => self.apu.read_wave_sample(address),
            LCD_CONTROL_REGISTER => self.ppu.get_lcd_control(),
            LCD_STATUS_REGISTER => self.ppu.get_lcd_status(),
            SCY_REGISTER => self.ppu.get_scy(),
            SCX_REGISTER => self.ppu.get_scx(),
            LY_REGISTER => self.ppu.get_ly(),
            LYC_REGISTER => self.ppu.get_lyc(),
            DMA_TRANSFER => self.dma.read_register(),
            BG_PALETTE => self.ppu.get_bg_palette(),
            OB_PALETTE_0 => self.ppu.get_obj_palette_0(),
            OB_PALETTE_1 => self.ppu.get_obj_palette_1(),
            WY_REGISTER => self.ppu.get_window_y(),
            WX_REGISTER => self.ppu.get_window_x(),
            CGB_PREPARE_SWITCH if self.cgb_mode => self.speed.read(),
            CGB_VRAM_BANK => self.ppu.get_vram_bank(),
            BOOT_REGISTER => self.boot_rom.read_register(),
            CGB_HDMA_1..=CGB_HDMA_4 => INVALID_READ,
            CGB_HDMA_5 if self.cgb_mode => self.hdma.read_control(),
            CGB_BCPS if self.cgb_mode => self.ppu.bg_palette_ram.read_index(),
            CGB_BCPD if self.cgb_mode => self.ppu.bg_palette_ram.read_data(),
            CGB_OCPS if self.cgb_mode => self.ppu.obj_palette_ram.read_index(),
            CGB_OCPD if self.cgb_mode => self.ppu.obj_palette_ram.read_data(),
            CGB_OBJECT_PRIORITY => self.ppu.get_object_priority(),
            CGB_WRAM_BANK => self.wram.read_bank_select(),
            _ => INVALID_READ,
        }
    }

    fn write_io(&mut self, address: u16, value: u8) {
        match address {
            JOYPAD_REGISTER => self.joypad.write_register(value),
            SIO_DATA => self.serial.write_data(value),
            SIO_CONTROL => self.serial.write_control(value),
            DIVIDER_REGISTER => self.timers.set_divider(),
            TIMER_COUNTER => self.timers.set_timer_counter(value),
            TIMER_MODULO => self.timers.set_tma(value),
            TIMER_CONTROL => self.timers.set_timer_control(value),
            INTERRUPTS_FLAG => self.interrupts.write_flag(value),
            APU_MEM_START..=APU_MEM_END => self.apu.write_register(address, value),
            WAVE_SAMPLE_START..=WAVE_SAMPLE_END => self.apu.write_wave_sample(address, value),
            LCD_CONTROL_REGISTER => {
                let interrupts = &mut self.interrupts;
                self.ppu.set_lcd_control(value, interrupts);
            }
            LCD_STATUS_REGISTER => self.ppu.set_lcd_status(value, &mut self.interrupts),
            SCY_REGISTER => self.ppu.set_scy(value),
            SCX_REGISTER => self.ppu.set_scx(value),
            LY_REGISTER => trace!("Ignored write to LY"),
            LYC_REGISTER => self.ppu.set_lyc(value, &mut self.interrupts),
            DMA_TRANSFER => self.dma.write_register(value),
            BG_PALETTE => self.ppu.set_bg_palette(value),
            OB_PALETTE_0 => self.ppu.set_obj_palette_0(value),
            OB_PALETTE_1 => self.ppu.set_obj_palette_1(value),
            WY_REGISTER => self.ppu.set_window_y(value),
            WX_REGISTER => self.ppu.set_window_x(value),
            CGB_PREPARE_SWITCH if self.cgb_mode => self.speed.write(value),
            CGB_VRAM_BANK => self.ppu.set_vram_bank(value),
            BOOT_REGISTER => self.boot_rom.write_register(value),
            CGB_HDMA_1 if self.cgb_mode => self.hdma.write_source_high(value),
            CGB_HDMA_2 if self.cgb_mode => self.hdma.write_source_low(value),
            CGB_HDMA_3 if self.cgb_mode => self.hdma.write_destination_high(value),
            CGB_HDMA_4 if self.cgb_mode => self.hdma.write_destination_low(value),
            CGB_HDMA_5 if self.cgb_mode => self.hdma.write_control(value),
            CGB_BCPS if self.cgb_mode => self.ppu.bg_palette_ram.write_index(value),
            CGB_BCPD if self.cgb_mode => self.ppu.bg_palette_ram.write_data(value),
            CGB_OCPS if self.cgb_mode => self.ppu.obj_palette_ram.write_index(value),
            CGB_OCPD if self.cgb_mode => self.ppu.obj_palette_ram.write_data(value),
            CGB_OBJECT_PRIORITY => self.ppu.set_object_priority(value),
            CGB_WRAM_BANK => self.wram.write_bank_select(value),
            _ => trace!("Ignored IO write: {:#06X} = {:#04X}", address, value),
        }
    }

    /// Advance timers, serial, PPU and APU by one T-cycle, and on the
    /// M-cycle boundary run the DMA engines. `lockstep_video` is false
    /// on the odd T-cycles of double-speed mode, where the video side
    /// runs at half the CPU rate.
    pub fn tick_components(&mut self, t_phase: u8, lockstep_video: bool) {
        let before = self.timers.div_ticks;
        self.timers.tick(&mut self.interrupts);
        if before & SERIAL_CLOCK_BIT != 0 && self.timers.div_ticks & SERIAL_CLOCK_BIT == 0 {
            self.serial.on_clock_edge(&mut self.interrupts);
        }

        if lockstep_video {
            self.ppu.tick(&mut self.interrupts);
            self.apu.tick();
        }

        if t_phase == 3 {
            self.tick_dma();
            self.tick_hdma();
        }
    }

    /// One M-cycle of the OAM DMA engine.
    fn tick_dma(&mut self) {
        if let Some((index, source)) = self.dma.advance() {
            // Sources past the external RAM echo fold into WRAM.
            let source = if source >= 0xE000 { source - 0x2000 } else { source };
            let byte = self.read_byte(source);
            self.dma.record_transfer(byte);
            self.ppu.write_oam_dma(index, byte);
        }
    }

    fn tick_hdma(&mut self) {
        if !self.cgb_mode {
            return;
        }
        if self.hdma.take_gdma_request() {
            // GDMA: the whole programmed length goes through at once,
            // two bytes per stalled CPU M-cycle.
            let chunks = self.hdma.remaining_chunks() as u32;
            while self.hdma.active() {
                self.copy_hdma_chunk();
            }
            self.stall_m_cycles += chunks * (CHUNK_SIZE as u32 / 2);
        } else if self.ppu.take_hblank_edge() && self.hdma.hblank_chunk_pending() {
            self.copy_hdma_chunk();
            self.stall_m_cycles += HDMA_CHUNK_STALL_M_CYCLES;
        }
    }

    fn copy_hdma_chunk(&mut self) {
        for i in 0..CHUNK_SIZE {
            let byte = self.read_byte(self.hdma.source.wrapping_add(i));
            self.ppu
                .write_vram_dma(self.hdma.destination.wrapping_add(i).min(0x9FFF), byte);
        }
        self.hdma.chunk_copied();
    }

    /// The IDU puts every incremented or decremented address on the
    /// bus for a moment; addresses in the OAM window can corrupt OAM.
    pub fn idu_bus_noise(&mut self, address: u16) {
        if (OAM_START..=NOT_USABLE_END).contains(&address) {
            self.ppu.oam_bus_glitch();
        }
    }

    pub fn save_state(&self, parcel: &mut Parcel) {
        self.boot_rom.save_state(parcel);
        self.cartridge.save_state(parcel);
        self.wram.save_state(parcel);
        self.hram.save_state(parcel);
        self.joypad.save_state(parcel);
        self.timers.save_state(parcel);
        self.serial.save_state(parcel);
        self.interrupts.save_state(parcel);
        self.dma.save_state(parcel);
        self.hdma.save_state(parcel);
        self.ppu.save_state(parcel);
        self.apu.save_state(parcel);
        parcel.write_bool(self.speed.double_speed);
        parcel.write_bool(self.speed.armed);
        parcel.write_u32(self.stall_m_cycles);
    }

    pub fn load_state(&mut self, reader: &mut ParcelReader<'_>) -> Result<(), StateError> {
        self.boot_rom.load_state(reader)?;
        self.cartridge.load_state(reader)?;
        self.wram.load_state(reader)?;
        self.hram.load_state(reader)?;
        self.joypad.load_state(reader)?;
        self.timers.load_state(reader)?;
        self.serial.load_state(reader)?;
        self.interrupts.load_state(reader)?;
        self.dma.load_state(reader)?;
        self.hdma.load_state(reader)?;
        self.ppu.load_state(reader)?;
        self.apu.load_state(reader)?;
        self.speed.double_speed = reader.read_bool()?;
        self.speed.armed = reader.read_bool()?;
        self.stall_m_cycles = reader.read_u32()?;
        Ok(())
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Memory {{ cgb: {}, cartridge: {:?} }}", self.cgb_mode, self.cartridge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> Memory {
        let mut rom = vec![0u8; 0x8000];
        rom[0x1234] = 0x42;
        let cartridge = Cartridge::new(rom, None).unwrap();
        Memory::new(false, BootRom::new(None), cartridge)
    }

    #[test]
    fn rom_and_wram_decode() {
        let mut memory = memory();
        assert_eq!(memory.read_byte(0x1234), 0x42);

        memory.write_byte(0xC100, 0x99);
        assert_eq!(memory.read_byte(0xC100), 0x99);
        assert_eq!(memory.read_byte(0xE100), 0x99);
    }

    #[test]
    fn unusable_region_reads_open_bus() {
        let memory = memory();
        assert_eq!(memory.read_byte(0xFEA0), 0xFF);
        assert_eq!(memory.read_byte(0xFEFF), 0xFF);
    }

    #[test]
    fn boot_rom_shims_the_low_region() {
        let mut rom = vec![0u8; 0x8000];
        rom[0x0000] = 0x42;
        let cartridge = Cartridge::new(rom, None).unwrap();
        let mut boot = vec![0u8; 0x100];
        boot[0] = 0x31;
        let mut memory = Memory::new(false, BootRom::new(Some(boot)), cartridge);

        assert_eq!(memory.read_byte(0x0000), 0x31);
        memory.write_byte(0xFF50, 0x01);
        assert_eq!(memory.read_byte(0x0000), 0x42);
    }

    #[test]
    fn dma_conflict_masks_cpu_reads() {
        let mut memory = memory();
        memory.write_byte(0xC000, 0x77);
        memory.write_byte(0xFF46, 0xC0);

        // Setup M-cycle, then the first copied byte.
        memory.tick_components(3, true);
        memory.tick_components(3, true);
        assert!(memory.dma.active());
        assert_eq!(memory.read_byte_cpu(0x8000), 0x77);
        // HRAM and IO stay reachable.
        memory.write_byte_cpu(0xFF80, 0x12);
        assert_eq!(memory.read_byte_cpu(0xFF80), 0x12);
    }

    #[test]
    fn dma_copies_into_oam() {
        let mut memory = memory();
        for i in 0..160u16 {
            memory.write_byte(0xC000 + i, i as u8);
        }
        memory.write_byte(0xFF46, 0xC0);
        for _ in 0..161 {
            memory.tick_components(3, true);
        }
        assert!(!memory.dma.active());
        assert_eq!(memory.ppu.oam_byte(0), 0);
        assert_eq!(memory.ppu.oam_byte(159), 159);
    }

    #[test]
    fn cgb_registers_absent_on_dmg() {
        let mut memory = memory();
        assert_eq!(memory.read_byte(0xFF4D), 0xFF);
        assert_eq!(memory.read_byte(0xFF55), 0xFF);
        memory.write_byte(0xFF70, 0x03);
        assert_eq!(memory.read_byte(0xFF70), 0xFF);
    }

    #[test]
    fn interrupt_registers() {
        let mut memory = memory();
        memory.write_byte(0xFFFF, 0x15);
        assert_eq!(memory.read_byte(0xFFFF), 0x15);
        memory.write_byte(0xFF0F, 0x01);
        assert_eq!(memory.read_byte(0xFF0F), 0xE1);
    }
}
