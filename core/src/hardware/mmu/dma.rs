//! OAM DMA: a write to 0xFF46 copies 160 bytes from `value << 8` into
//! OAM, one byte per M-cycle. While the engine runs it owns the
//! external bus, so CPU reads outside HRAM observe the byte currently
//! on the wire instead of what they asked for.

use crate::parcel::{Parcel, ParcelReader, StateError};

/// DMA Transfer and Start Address (R/W). The written value is the
/// source page; the destination is always OAM.
pub const DMA_TRANSFER: u16 = 0xFF46;

pub const DMA_LENGTH: u8 = 160;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DmaState {
    Inactive,
    /// Written this M-cycle; the first copy happens on the next one.
    Requested,
    Copying(u8),
}

#[derive(Debug)]
pub struct OamDma {
    register: u8,
    state: DmaState,
    /// The byte most recently moved over the bus, which is what a
    /// conflicting CPU read sees.
    last_byte: u8,
}

impl OamDma {
    pub fn new() -> Self {
        OamDma {
            register: 0xFF,
            state: DmaState::Inactive,
            last_byte: 0xFF,
        }
    }

    pub fn read_register(&self) -> u8 {
        self.register
    }

    /// Any write (re)starts the transfer.
    pub fn write_register(&mut self, value: u8) {
        self.register = value;
        self.state = DmaState::Requested;
        log::trace!("OAM DMA requested from {:#04X}00", value);
    }

    pub fn active(&self) -> bool {
        matches!(self.state, DmaState::Copying(_))
    }

    pub fn conflict_byte(&self) -> u8 {
        self.last_byte
    }

    /// One M-cycle. Returns `(oam_index, source_address)` when a byte
    /// should move this cycle.
    pub fn advance(&mut self) -> Option<(u8, u16)> {
        match self.state {
            DmaState::Inactive => None,
            DmaState::Requested => {
                self.state = DmaState::Copying(0);
                None
            }
            DmaState::Copying(index) => {
                let source = ((self.register as u16) << 8) + index as u16;
                self.state = if index + 1 == DMA_LENGTH {
                    DmaState::Inactive
                } else {
                    DmaState::Copying(index + 1)
                };
                Some((index, source))
            }
        }
    }

    pub fn record_transfer(&mut self, byte: u8) {
        self.last_byte = byte;
    }

    pub fn save_state(&self, parcel: &mut Parcel) {
        parcel.write_u8(self.register);
        let (state, index) = match self.state {
            DmaState::Inactive => (0, 0),
            DmaState::Requested => (1, 0),
            DmaState::Copying(index) => (2, index),
        };
        parcel.write_u8(state);
        parcel.write_u8(index);
        parcel.write_u8(self.last_byte);
    }

    pub fn load_state(&mut self, reader: &mut ParcelReader<'_>) -> Result<(), StateError> {
        self.register = reader.read_u8()?;
        let state = reader.read_u8()?;
        let index = reader.read_u8()?;
        self.state = match state {
            0 => DmaState::Inactive,
            1 => DmaState::Requested,
            2 if index < DMA_LENGTH => DmaState::Copying(index),
            _ => return Err(StateError::Content("OAM DMA state out of range")),
        };
        self.last_byte = reader.read_u8()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_covers_160_bytes_after_one_cycle_delay() {
        let mut dma = OamDma::new();
        dma.write_register(0xC0);
        assert!(!dma.active());

        // Setup cycle.
        assert_eq!(dma.advance(), None);
        assert!(dma.active());

        for i in 0..DMA_LENGTH {
            assert_eq!(dma.advance(), Some((i, 0xC000 + i as u16)));
        }
        assert!(!dma.active());
        assert_eq!(dma.advance(), None);
    }

    #[test]
    fn rewrite_restarts() {
        let mut dma = OamDma::new();
        dma.write_register(0xC0);
        dma.advance();
        for _ in 0..10 {
            dma.advance();
        }
        dma.write_register(0xD0);
        dma.advance();
        assert_eq!(dma.advance(), Some((0, 0xD000)));
    }
}
