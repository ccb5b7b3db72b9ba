use std::fmt;

use crate::hardware::cartridge::header::{CartridgeHeader, MINIMAL_ROM_SIZE};
use crate::hardware::cartridge::mbc::{Mbc, MBC2_RAM_SIZE};
use crate::hardware::cartridge::mbc3::Mbc3;
use crate::parcel::{Parcel, ParcelReader, StateError};

pub mod header;
pub mod mbc;
pub mod mbc3;

pub const EXTERNAL_RAM_START: u16 = 0xA000;

/// Failures surfaced by `load_rom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RomError {
    /// The ROM does not even contain a full header.
    TooSmall(usize),
    /// The header names a controller this core does not implement.
    UnsupportedMbc(u8),
}

impl fmt::Display for RomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RomError::TooSmall(size) => write!(f, "ROM of {} bytes is too small to hold a header", size),
            RomError::UnsupportedMbc(kind) => write!(f, "unsupported cartridge type: {:#04X}", kind),
        }
    }
}

impl std::error::Error for RomError {}

pub struct Cartridge {
    header: CartridgeHeader,
    mbc: Mbc,
    rom: Vec<u8>,
    ram: Vec<u8>,
    has_battery: bool,
}

impl Cartridge {
    pub fn new(rom: Vec<u8>, saved_ram: Option<&[u8]>) -> Result<Self, RomError> {
        if rom.len() < MINIMAL_ROM_SIZE {
            return Err(RomError::TooSmall(rom.len()));
        }
        let header = CartridgeHeader::new(&rom);

        let (mbc, has_battery) = match header.cartridge_type {
            0x00 | 0x08 => (Mbc::None, false),
            0x09 => (Mbc::None, true),
            0x01 | 0x02 => (
                Mbc::Mbc1 {
                    ram_enabled: false,
                    rom_bank: 1,
                    upper_bank: 0,
                    banking_mode: false,
                },
                false,
            ),
            0x03 => (
                Mbc::Mbc1 {
                    ram_enabled: false,
                    rom_bank: 1,
                    upper_bank: 0,
                    banking_mode: false,
                },
                true,
            ),
            0x05 => (
                Mbc::Mbc2 {
                    ram_enabled: false,
                    rom_bank: 1,
                },
                false,
            ),
            0x06 => (
                Mbc::Mbc2 {
                    ram_enabled: false,
                    rom_bank: 1,
                },
                true,
            ),
            0x0F | 0x10 => (Mbc::Mbc3(Mbc3::new(true)), true),
            0x11 | 0x12 => (Mbc::Mbc3(Mbc3::new(false)), false),
            0x13 => (Mbc::Mbc3(Mbc3::new(false)), true),
            0x19 | 0x1A | 0x1C | 0x1D => (
                Mbc::Mbc5 {
                    ram_enabled: false,
                    rom_bank: 1,
                    ram_bank: 0,
                },
                false,
            ),
            0x1B | 0x1E => (
                Mbc::Mbc5 {
                    ram_enabled: false,
                    rom_bank: 1,
                    ram_bank: 0,
                },
                true,
            ),
            kind => return Err(RomError::UnsupportedMbc(kind)),
        };

        let ram_size = match mbc {
            Mbc::Mbc2 { .. } => MBC2_RAM_SIZE,
            _ => header.ram_size_bytes(),
        };

        let mut cartridge = Cartridge {
            header,
            mbc,
            rom,
            ram: vec![0xFF; ram_size],
            has_battery,
        };
        if let Some(saved) = saved_ram {
            cartridge.load_ram(saved);
        }
        Ok(cartridge)
    }

    /// A cartridge slot with nothing inserted: every read floats high.
    pub fn empty() -> Self {
        Cartridge {
            header: CartridgeHeader::default(),
            mbc: Mbc::None,
            rom: vec![0xFF; 0x8000],
            ram: Vec::new(),
            has_battery: false,
        }
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn has_battery(&self) -> bool {
        self.has_battery
    }

    fn rom_banks(&self) -> usize {
        // Derive from the actual data so a short ROM can never index
        // out of bounds, whatever its header claims.
        (self.rom.len() / 0x4000).max(1)
    }

    /// Read in 0x0000-0x3FFF.
    pub fn read_0000_3fff(&self, address: u16) -> u8 {
        let offset = self.mbc.rom_low_offset(self.rom_banks());
        self.rom[(offset + address as usize) % self.rom.len()]
    }

    /// Read in 0x4000-0x7FFF.
    pub fn read_4000_7fff(&self, address: u16) -> u8 {
        let offset = self.mbc.rom_high_offset(self.rom_banks());
        self.rom[(offset + (address as usize - 0x4000)) % self.rom.len()]
    }

    /// Read in 0xA000-0xBFFF.
    pub fn read_external_ram(&self, address: u16) -> u8 {
        if !self.mbc.ram_enabled() {
            return 0xFF;
        }
        match &self.mbc {
            Mbc::Mbc2 { .. } => {
                // 512 half-bytes, mirrored across the whole region.
                let index = (address as usize - EXTERNAL_RAM_START as usize) % MBC2_RAM_SIZE;
                0xF0 | self.ram[index]
            }
            Mbc::Mbc3(mbc3) if mbc3.rtc_selected() => mbc3.read_rtc(),
            mbc => match ram_index(self.ram.len(), mbc, address) {
                Some(index) => self.ram[index],
                None => 0xFF,
            },
        }
    }

    /// Register write (0x0000-0x7FFF) or external RAM write.
    pub fn write_byte(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x7FFF => self.mbc.write_register(address, value),
            0xA000..=0xBFFF => {
                if !self.mbc.ram_enabled() {
                    return;
                }
                match &mut self.mbc {
                    Mbc::Mbc2 { .. } => {
                        let index = (address as usize - EXTERNAL_RAM_START as usize) % MBC2_RAM_SIZE;
                        self.ram[index] = value & 0x0F;
                    }
                    Mbc::Mbc3(mbc3) if mbc3.rtc_selected() => mbc3.write_rtc(value),
                    mbc => {
                        if let Some(index) = ram_index(self.ram.len(), mbc, address) {
                            self.ram[index] = value;
                        }
                    }
                }
            }
            _ => log::trace!("Cartridge write outside its regions: {:#06X}", address),
        }
    }

    /// Snapshot for battery saves: the external RAM, plus the 48-byte
    /// clock block on timer carts.
    pub fn save_ram(&mut self) -> Vec<u8> {
        let mut out = self.ram.clone();
        if let Mbc::Mbc3(mbc3) = &mut self.mbc {
            if mbc3.has_timer() {
                out.extend_from_slice(&mbc3.battery_bytes());
            }
        }
        out
    }

    /// Restore a battery save produced by [`Cartridge::save_ram`].
    pub fn load_ram(&mut self, bytes: &[u8]) {
        let ram_len = self.ram.len().min(bytes.len());
        self.ram[..ram_len].copy_from_slice(&bytes[..ram_len]);

        if let Mbc::Mbc3(mbc3) = &mut self.mbc {
            if bytes.len() >= self.ram.len() + 48 {
                let mut block = [0u8; 48];
                block.copy_from_slice(&bytes[self.ram.len()..self.ram.len() + 48]);
                mbc3.load_battery_bytes(&block);
            }
        }
    }

    pub fn save_state(&self, parcel: &mut Parcel) {
        parcel.write_u8(self.header.cartridge_type);
        match &self.mbc {
            Mbc::None => {}
            Mbc::Mbc1 {
                ram_enabled,
                rom_bank,
                upper_bank,
                banking_mode,
            } => {
                parcel.write_bool(*ram_enabled);
                parcel.write_u8(*rom_bank);
                parcel.write_u8(*upper_bank);
                parcel.write_bool(*banking_mode);
            }
            Mbc::Mbc2 {
                ram_enabled,
                rom_bank,
            } => {
                parcel.write_bool(*ram_enabled);
                parcel.write_u8(*rom_bank);
            }
            Mbc::Mbc3(mbc3) => mbc3.save_state(parcel),
            Mbc::Mbc5 {
                ram_enabled,
                rom_bank,
                ram_bank,
            } => {
                parcel.write_bool(*ram_enabled);
                parcel.write_u16(*rom_bank);
                parcel.write_u8(*ram_bank);
            }
        }
        parcel.write_bytes(&self.ram);
    }

    pub fn load_state(&mut self, reader: &mut ParcelReader<'_>) -> Result<(), StateError> {
        if reader.read_u8()? != self.header.cartridge_type {
            return Err(StateError::Content("state was taken with a different cartridge"));
        }
        match &mut self.mbc {
            Mbc::None => {}
            Mbc::Mbc1 {
                ram_enabled,
                rom_bank,
                upper_bank,
                banking_mode,
            } => {
                *ram_enabled = reader.read_bool()?;
                *rom_bank = reader.read_u8()? & 0x1F;
                if *rom_bank == 0 {
                    *rom_bank = 1;
                }
                *upper_bank = reader.read_u8()? & 0x03;
                *banking_mode = reader.read_bool()?;
            }
            Mbc::Mbc2 {
                ram_enabled,
                rom_bank,
            } => {
                *ram_enabled = reader.read_bool()?;
                *rom_bank = reader.read_u8()? & 0x0F;
                if *rom_bank == 0 {
                    *rom_bank = 1;
                }
            }
            Mbc::Mbc3(mbc3) => mbc3.load_state(reader)?,
            Mbc::Mbc5 {
                ram_enabled,
                rom_bank,
                ram_bank,
            } => {
                *ram_enabled = reader.read_bool()?;
                *rom_bank = reader.read_u16()? & 0x1FF;
                *ram_bank = reader.read_u8()? & 0x0F;
            }
        }
        reader.read_bytes_into(&mut self.ram)
    }
}

/// Offset into the external RAM for an 0xA000-0xBFFF access, honoring
/// the MBC's bank selection and mirroring small RAMs.
fn ram_index(ram_len: usize, mbc: &Mbc, address: u16) -> Option<usize> {
    if ram_len == 0 {
        return None;
    }
    let banks = (ram_len / 0x2000).max(1);
    let offset = (mbc.ram_bank() % banks) * 0x2000;
    Some(offset + (address as usize - EXTERNAL_RAM_START as usize) % ram_len.min(0x2000))
}

impl fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cartridge {{ title: {:?}, type: {:#04X}, rom: {} KiB, ram: {} KiB, battery: {} }}",
            self.header.title,
            self.header.cartridge_type,
            self.rom.len() / 1024,
            self.ram.len() / 1024,
            self.has_battery
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn test_rom(cartridge_type: u8, rom_size_code: u8, ram_size_code: u8) -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000 << rom_size_code];
        rom[0x147] = cartridge_type;
        rom[0x148] = rom_size_code;
        rom[0x149] = ram_size_code;
        // Tag each bank with its own number for addressing tests.
        for bank in 0..(rom.len() / 0x4000) {
            rom[bank * 0x4000] = bank as u8;
        }
        rom
    }

    #[test]
    fn too_small_rom_is_rejected() {
        assert_eq!(
            Cartridge::new(vec![0; 0x100], None).err(),
            Some(RomError::TooSmall(0x100))
        );
    }

    #[test]
    fn unknown_mbc_is_rejected() {
        let rom = test_rom(0xFC, 0, 0);
        assert_eq!(Cartridge::new(rom, None).err(), Some(RomError::UnsupportedMbc(0xFC)));
    }

    #[test]
    fn mbc1_banking_reads() {
        let rom = test_rom(0x01, 0x02, 0x00); // 128 KiB, 8 banks
        let mut cartridge = Cartridge::new(rom, None).unwrap();
        assert_eq!(cartridge.read_4000_7fff(0x4000), 1);

        cartridge.write_byte(0x2000, 0x05);
        assert_eq!(cartridge.read_4000_7fff(0x4000), 5);
    }

    #[test]
    fn external_ram_needs_enable() {
        let rom = test_rom(0x03, 0x00, 0x02); // MBC1+RAM+BATTERY, 8 KiB RAM
        let mut cartridge = Cartridge::new(rom, None).unwrap();

        cartridge.write_byte(0xA000, 0x42);
        assert_eq!(cartridge.read_external_ram(0xA000), 0xFF);

        cartridge.write_byte(0x0000, 0x0A);
        cartridge.write_byte(0xA000, 0x42);
        assert_eq!(cartridge.read_external_ram(0xA000), 0x42);
    }

    #[test]
    fn mbc2_ram_is_four_bits_and_mirrored() {
        let rom = test_rom(0x06, 0x00, 0x00);
        let mut cartridge = Cartridge::new(rom, None).unwrap();
        cartridge.write_byte(0x0000, 0x0A);

        cartridge.write_byte(0xA005, 0x3C);
        assert_eq!(cartridge.read_external_ram(0xA005), 0xFC);
        // Mirror at +0x200.
        assert_eq!(cartridge.read_external_ram(0xA205), 0xFC);
    }

    #[test]
    fn battery_save_roundtrip() {
        let rom = test_rom(0x03, 0x00, 0x02);
        let mut cartridge = Cartridge::new(rom.clone(), None).unwrap();
        cartridge.write_byte(0x0000, 0x0A);
        cartridge.write_byte(0xA010, 0x77);
        let saved = cartridge.save_ram();

        let mut restored = Cartridge::new(rom, Some(&saved)).unwrap();
        restored.write_byte(0x0000, 0x0A);
        assert_eq!(restored.read_external_ram(0xA010), 0x77);
    }
}
