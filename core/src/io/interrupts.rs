use crate::parcel::{Parcel, ParcelReader, StateError};
use bitflags::*;

/// The flag used to signal that an interrupt is pending (IF).
pub const INTERRUPTS_FLAG: u16 = 0xFF0F;
/// Interrupts Enable Register (IE).
pub const INTERRUPTS_ENABLE: u16 = 0xFFFF;

bitflags! {
    #[derive(Default)]
    pub struct InterruptFlags: u8 {
        /// V-Blank
        const VBLANK = 0b0000_0001;
        /// LCD Stat
        const STAT   = 0b0000_0010;
        /// Timer
        const TIMER  = 0b0000_0100;
        /// Serial
        const SERIAL = 0b0000_1000;
        /// Joypad
        const JOYPAD = 0b0001_0000;
    }
}

impl InterruptFlags {
    /// The ISR vector this interrupt jumps to. Only meaningful for
    /// single-bit values.
    pub fn vector(self) -> u16 {
        0x0040 + 8 * (self.bits().trailing_zeros() as u16)
    }

    /// The highest-priority (lowest set bit) interrupt of this set.
    pub fn highest_priority(self) -> InterruptFlags {
        InterruptFlags::from_bits_truncate(self.bits() & self.bits().wrapping_neg())
    }
}

/// IE/IF pair shared by the CPU and every interrupt source.
#[derive(Default, Debug, Clone)]
pub struct Interrupts {
    pub interrupt_enable: InterruptFlags,
    pub interrupt_flag: InterruptFlags,
    /// IE keeps its upper three bits as written, even though they gate
    /// nothing.
    ie_unused_bits: u8,
}

impl Interrupts {
    pub fn new() -> Self {
        Default::default()
    }

    /// Raise an interrupt request in IF.
    #[inline]
    pub fn request(&mut self, interrupt: InterruptFlags) {
        self.interrupt_flag.insert(interrupt);
    }

    /// `IE & IF & 0x1F`, the set the CPU looks at on fetch boundaries.
    #[inline]
    pub fn pending(&self) -> InterruptFlags {
        self.interrupt_enable & self.interrupt_flag
    }

    /// IF reads back with the unused upper bits hardwired to 1.
    pub fn read_flag(&self) -> u8 {
        self.interrupt_flag.bits() | 0xE0
    }

    pub fn write_flag(&mut self, value: u8) {
        self.interrupt_flag = InterruptFlags::from_bits_truncate(value);
    }

    pub fn read_enable(&self) -> u8 {
        self.interrupt_enable.bits() | self.ie_unused_bits
    }

    pub fn write_enable(&mut self, value: u8) {
        self.interrupt_enable = InterruptFlags::from_bits_truncate(value);
        self.ie_unused_bits = value & 0xE0;
    }

    pub fn save_state(&self, parcel: &mut Parcel) {
        parcel.write_u8(self.interrupt_enable.bits() | self.ie_unused_bits);
        parcel.write_u8(self.interrupt_flag.bits());
    }

    pub fn load_state(&mut self, reader: &mut ParcelReader<'_>) -> Result<(), StateError> {
        self.write_enable(reader.read_u8()?);
        self.write_flag(reader.read_u8()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_is_lowest_set_bit() {
        let set = InterruptFlags::TIMER | InterruptFlags::JOYPAD | InterruptFlags::STAT;
        assert_eq!(set.highest_priority(), InterruptFlags::STAT);
        assert_eq!(set.highest_priority().vector(), 0x0048);
    }

    #[test]
    fn vectors() {
        assert_eq!(InterruptFlags::VBLANK.vector(), 0x0040);
        assert_eq!(InterruptFlags::STAT.vector(), 0x0048);
        assert_eq!(InterruptFlags::TIMER.vector(), 0x0050);
        assert_eq!(InterruptFlags::SERIAL.vector(), 0x0058);
        assert_eq!(InterruptFlags::JOYPAD.vector(), 0x0060);
    }

    #[test]
    fn flag_reads_back_with_upper_bits_set() {
        let mut interrupts = Interrupts::new();
        interrupts.write_flag(0x01);
        assert_eq!(interrupts.read_flag(), 0xE1);
    }

    #[test]
    fn pending_masks_disabled_sources() {
        let mut interrupts = Interrupts::new();
        interrupts.write_enable(0x04);
        interrupts.request(InterruptFlags::VBLANK);
        interrupts.request(InterruptFlags::TIMER);
        assert_eq!(interrupts.pending(), InterruptFlags::TIMER);
    }
}
