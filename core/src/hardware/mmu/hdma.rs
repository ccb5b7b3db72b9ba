//! CGB VRAM copy engines. GDMA moves the whole programmed length at
//! once with the CPU stalled; HDMA moves one 16-byte chunk at the
//! start of each HBlank until the length runs out or software aborts.

use crate::parcel::{Parcel, ParcelReader, StateError};

/// High byte of the source address. Write-only.
pub const CGB_HDMA_1: u16 = 0xFF51;
/// Low byte of the source; the low 4 bits are ignored so transfers are
/// 16-byte aligned. Write-only.
pub const CGB_HDMA_2: u16 = 0xFF52;
/// High byte of the destination; forced into VRAM. Write-only.
pub const CGB_HDMA_3: u16 = 0xFF53;
/// Low byte of the destination, 16-byte aligned. Write-only.
pub const CGB_HDMA_4: u16 = 0xFF54;
/// Length/mode. Writing starts a transfer: bit 7 = 1 selects
/// HBlank-paced mode, bits 0-6 the length in chunks minus one.
pub const CGB_HDMA_5: u16 = 0xFF55;

pub const CHUNK_SIZE: u16 = 16;

#[derive(Debug)]
pub struct Hdma {
    pub source: u16,
    pub destination: u16,
    /// Chunks still to copy.
    remaining: u8,
    hblank_mode: bool,
    active: bool,
    /// Set by an HDMA5 write with mode 0; the bus executes the whole
    /// copy immediately and stalls the CPU.
    gdma_requested: bool,
}

impl Hdma {
    pub fn new() -> Self {
        Hdma {
            source: 0,
            destination: 0x8000,
            remaining: 0,
            hblank_mode: false,
            active: false,
            gdma_requested: false,
        }
    }

    pub fn write_source_high(&mut self, value: u8) {
        self.source = (self.source & 0x00F0) | ((value as u16) << 8);
    }

    pub fn write_source_low(&mut self, value: u8) {
        self.source = (self.source & 0xFF00) | (value & 0xF0) as u16;
    }

    pub fn write_destination_high(&mut self, value: u8) {
        self.destination = 0x8000 | ((value as u16 & 0x1F) << 8) | (self.destination & 0x00F0);
    }

    pub fn write_destination_low(&mut self, value: u8) {
        self.destination = (self.destination & 0xFF00) | (value & 0xF0) as u16;
    }

    /// HDMA5 read: bit 7 set when no transfer is pending, bits 0-6 the
    /// remaining length minus one. 0xFF once a transfer ran to
    /// completion.
    pub fn read_control(&self) -> u8 {
        let remaining = self.remaining.wrapping_sub(1) & 0x7F;
        ((!self.active as u8) << 7) | remaining
    }

    pub fn write_control(&mut self, value: u8) {
        if self.active && self.hblank_mode && value & 0x80 == 0 {
            // Abort: the remaining-length bits stay put so software
            // can resume with a fresh write.
            self.active = false;
            return;
        }

        self.remaining = (value & 0x7F) + 1;
        self.hblank_mode = value & 0x80 != 0;
        self.active = true;
        if !self.hblank_mode {
            self.gdma_requested = true;
        }
        log::trace!(
            "{} transfer armed: {:#06X} -> {:#06X}, {} chunks",
            if self.hblank_mode { "HDMA" } else { "GDMA" },
            self.source,
            self.destination,
            self.remaining
        );
    }

    pub fn take_gdma_request(&mut self) -> bool {
        std::mem::replace(&mut self.gdma_requested, false)
    }

    /// Whether a chunk should move at this HBlank.
    pub fn hblank_chunk_pending(&self) -> bool {
        self.active && self.hblank_mode
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn remaining_chunks(&self) -> u8 {
        self.remaining
    }

    /// Account one copied chunk and advance the address registers.
    pub fn chunk_copied(&mut self) {
        self.source = self.source.wrapping_add(CHUNK_SIZE);
        self.destination = self.destination.wrapping_add(CHUNK_SIZE);
        if self.destination >= 0xA000 {
            // Destination wraps inside VRAM.
            self.destination = 0x8000 | (self.destination & 0x1FFF);
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.active = false;
        }
    }

    pub fn save_state(&self, parcel: &mut Parcel) {
        parcel.write_u16(self.source);
        parcel.write_u16(self.destination);
        parcel.write_u8(self.remaining);
        parcel.write_bool(self.hblank_mode);
        parcel.write_bool(self.active);
        parcel.write_bool(self.gdma_requested);
    }

    pub fn load_state(&mut self, reader: &mut ParcelReader<'_>) -> Result<(), StateError> {
        self.source = reader.read_u16()?;
        self.destination = reader.read_u16()?;
        self.remaining = reader.read_u8()?;
        if self.remaining > 0x80 {
            return Err(StateError::Content("HDMA length out of range"));
        }
        self.hblank_mode = reader.read_bool()?;
        self.active = reader.read_bool()?;
        self.gdma_requested = reader.read_bool()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_is_forced_into_vram() {
        let mut hdma = Hdma::new();
        hdma.write_destination_high(0xFF);
        hdma.write_destination_low(0xFF);
        assert_eq!(hdma.destination & 0xE000, 0x8000);
        assert_eq!(hdma.destination & 0x000F, 0);
    }

    #[test]
    fn abort_preserves_remaining_length() {
        let mut hdma = Hdma::new();
        hdma.write_control(0x87); // HBlank mode, 8 chunks
        hdma.chunk_copied();
        hdma.chunk_copied();
        assert_eq!(hdma.remaining_chunks(), 6);

        hdma.write_control(0x00);
        assert!(!hdma.active());
        assert_eq!(hdma.read_control() & 0x7F, 5);
    }

    #[test]
    fn completed_transfer_reads_ff() {
        let mut hdma = Hdma::new();
        hdma.write_control(0x80); // 1 chunk, HBlank mode
        hdma.chunk_copied();
        assert_eq!(hdma.read_control(), 0xFF);
    }

    #[test]
    fn gdma_request_is_taken_once() {
        let mut hdma = Hdma::new();
        hdma.write_control(0x07);
        assert!(hdma.take_gdma_request());
        assert!(!hdma.take_gdma_request());
    }
}
