use crate::parcel::{Parcel, ParcelReader, StateError};

/// High RAM, 0xFF80-0xFFFE. The only memory the CPU can reach while an
/// OAM DMA transfer holds the external bus.
pub const HRAM_START: u16 = 0xFF80;
pub const HRAM_END: u16 = 0xFFFE;

const HRAM_SIZE: usize = 0x7F;

#[derive(Debug)]
pub struct Hram {
    data: [u8; HRAM_SIZE],
}

impl Hram {
    pub fn new() -> Self {
        Hram { data: [0; HRAM_SIZE] }
    }

    pub fn read_byte(&self, address: u16) -> u8 {
        self.data[(address - HRAM_START) as usize]
    }

    pub fn write_byte(&mut self, address: u16, value: u8) {
        self.data[(address - HRAM_START) as usize] = value;
    }

    pub fn save_state(&self, parcel: &mut Parcel) {
        parcel.write_bytes(&self.data);
    }

    pub fn load_state(&mut self, reader: &mut ParcelReader<'_>) -> Result<(), StateError> {
        reader.read_bytes_into(&mut self.data)
    }
}
