//! Serial port (SB/SC) with an optional external link endpoint.
//!
//! With the internal clock selected, one bit is shifted on every
//! falling edge of divider bit 8 (8192 Hz), so a full byte takes eight
//! of those edges. Without an endpoint attached the input line idles
//! high and SB fills with 0xFF.

use crate::io::interrupts::{InterruptFlags, Interrupts};
use crate::parcel::{Parcel, ParcelReader, StateError};

/// Serial transfer data (SB).
pub const SIO_DATA: u16 = 0xFF01;
/// Serial transfer control (SC). Bit 7 starts a transfer, bit 0 picks
/// the clock source (1 = internal).
pub const SIO_CONTROL: u16 = 0xFF02;

/// Divider bit whose falling edge drives the internal serial clock.
pub const SERIAL_CLOCK_BIT: u16 = 1 << 8;

/// One end of a link cable. Each shifted bit is exchanged with the
/// partner: ours goes out, theirs comes in.
pub trait SerialEndpoint {
    fn exchange_bit(&mut self, bit: bool) -> bool;
}

pub struct Serial {
    sb: u8,
    sc: u8,
    bits_remaining: u8,
    endpoint: Option<Box<dyn SerialEndpoint>>,
}

impl std::fmt::Debug for Serial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Serial")
            .field("sb", &self.sb)
            .field("sc", &self.sc)
            .field("bits_remaining", &self.bits_remaining)
            .field("endpoint", &self.endpoint.is_some())
            .finish()
    }
}

impl Serial {
    pub fn new() -> Self {
        Serial {
            sb: 0,
            sc: 0,
            bits_remaining: 0,
            endpoint: None,
        }
    }

    pub fn read_data(&self) -> u8 {
        self.sb
    }

    pub fn write_data(&mut self, value: u8) {
        self.sb = value;
    }

    pub fn read_control(&self) -> u8 {
        self.sc | 0x7E
    }

    pub fn write_control(&mut self, value: u8) {
        self.sc = value & 0x81;
        if self.transfer_in_progress() {
            self.bits_remaining = 8;
        }
    }

    fn transfer_in_progress(&self) -> bool {
        // Only the internal clock can drive the shifts here; an
        // externally clocked transfer waits on the link partner.
        self.sc & 0x81 == 0x81
    }

    pub fn attach(&mut self, endpoint: Box<dyn SerialEndpoint>) {
        self.endpoint = Some(endpoint);
    }

    pub fn detach(&mut self) {
        self.endpoint = None;
    }

    pub fn take_endpoint(&mut self) -> Option<Box<dyn SerialEndpoint>> {
        self.endpoint.take()
    }

    /// Called on every falling edge of the divider's serial-clock bit.
    pub fn on_clock_edge(&mut self, interrupts: &mut Interrupts) {
        if !self.transfer_in_progress() || self.bits_remaining == 0 {
            return;
        }

        let out_bit = self.sb & 0x80 != 0;
        let in_bit = match &mut self.endpoint {
            Some(endpoint) => endpoint.exchange_bit(out_bit),
            None => true,
        };
        self.sb = (self.sb << 1) | in_bit as u8;

        self.bits_remaining -= 1;
        if self.bits_remaining == 0 {
            self.sc &= !0x80;
            interrupts.request(InterruptFlags::SERIAL);
            log::trace!("Serial transfer complete, SB: {:#04X}", self.sb);
        }
    }

    pub fn save_state(&self, parcel: &mut Parcel) {
        parcel.write_u8(self.sb);
        parcel.write_u8(self.sc);
        parcel.write_u8(self.bits_remaining);
    }

    pub fn load_state(&mut self, reader: &mut ParcelReader<'_>) -> Result<(), StateError> {
        self.sb = reader.read_u8()?;
        self.sc = reader.read_u8()? & 0x81;
        self.bits_remaining = reader.read_u8()?;
        if self.bits_remaining > 8 {
            return Err(StateError::Content("serial shift count out of range"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Loopback;

    impl SerialEndpoint for Loopback {
        fn exchange_bit(&mut self, bit: bool) -> bool {
            bit
        }
    }

    #[test]
    fn disconnected_transfer_yields_ff() {
        let mut serial = Serial::new();
        let mut interrupts = Interrupts::new();
        serial.write_data(0x5A);
        serial.write_control(0x81);

        for _ in 0..8 {
            serial.on_clock_edge(&mut interrupts);
        }

        assert_eq!(serial.read_data(), 0xFF);
        assert_eq!(serial.read_control() & 0x80, 0);
        assert!(interrupts.interrupt_flag.contains(InterruptFlags::SERIAL));
    }

    #[test]
    fn loopback_returns_own_byte() {
        let mut serial = Serial::new();
        let mut interrupts = Interrupts::new();
        serial.attach(Box::new(Loopback));
        serial.write_data(0xA5);
        serial.write_control(0x81);

        for _ in 0..8 {
            serial.on_clock_edge(&mut interrupts);
        }

        assert_eq!(serial.read_data(), 0xA5);
    }

    #[test]
    fn no_shift_without_start_bit() {
        let mut serial = Serial::new();
        let mut interrupts = Interrupts::new();
        serial.write_data(0x12);
        serial.write_control(0x01);
        serial.on_clock_edge(&mut interrupts);
        assert_eq!(serial.read_data(), 0x12);
    }
}
