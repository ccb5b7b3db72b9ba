//! Joypad matrix: two rows of four keys each, selected through bits
//! 4/5 of P1. The register exposes the selected rows inverted, and a
//! high-to-low transition of any exposed key bit raises the joypad
//! interrupt.

use crate::io::interrupts::{InterruptFlags, Interrupts};
use crate::parcel::{Parcel, ParcelReader, StateError};
use bitflags::*;

pub const JOYPAD_REGISTER: u16 = 0xFF00;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputKey {
    A,
    B,
    Start,
    Select,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

bitflags! {
    #[derive(Default)]
    struct KeyLines: u8 {
        /// Right or A
        const RIGHT_A    = 0b0000_0001;
        /// Left or B
        const LEFT_B     = 0b0000_0010;
        /// Up or Select
        const UP_SELECT  = 0b0000_0100;
        /// Down or Start
        const DOWN_START = 0b0000_1000;
    }
}

#[derive(Debug, Default)]
pub struct Joypad {
    pressed_buttons: KeyLines,
    pressed_directions: KeyLines,
    /// Bits 4/5 of P1 as last written (0 = row selected).
    select_bits: u8,
}

impl Joypad {
    pub fn new() -> Self {
        Joypad {
            pressed_buttons: KeyLines::empty(),
            pressed_directions: KeyLines::empty(),
            select_bits: 0x30,
        }
    }

    /// Compute the current P1 value: selected rows pull their pressed
    /// key bits low, everything unused reads 1.
    pub fn read_register(&self) -> u8 {
        0xC0 | self.select_bits | !self.selected_keys().bits() & 0x0F
    }

    /// Only bits 4/5 are writable; key bits are driven by the matrix.
    pub fn write_register(&mut self, value: u8) {
        self.select_bits = value & 0x30;
    }

    /// Update the matrix from the host. A key that lands on a selected
    /// row pulls its line low, which raises the joypad interrupt.
    pub fn set_key(&mut self, key: InputKey, state: KeyState, interrupts: &mut Interrupts) {
        let exposed_before = self.selected_keys();

        let line = key.line();
        let row = match key {
            InputKey::A | InputKey::B | InputKey::Start | InputKey::Select => &mut self.pressed_buttons,
            _ => &mut self.pressed_directions,
        };
        match state {
            KeyState::Pressed => row.insert(line),
            KeyState::Released => row.remove(line),
        }

        let exposed_after = self.selected_keys();
        if !(exposed_after - exposed_before).is_empty() {
            interrupts.request(InterruptFlags::JOYPAD);
        }
    }

    /// Keys visible through the currently selected row(s).
    fn selected_keys(&self) -> KeyLines {
        let mut keys = KeyLines::empty();
        if self.select_bits & 0x20 == 0 {
            keys.insert(self.pressed_buttons);
        }
        if self.select_bits & 0x10 == 0 {
            keys.insert(self.pressed_directions);
        }
        keys
    }

    /// Whether any selected key line is held low. STOP consults this.
    pub fn any_selected_pressed(&self) -> bool {
        !self.selected_keys().is_empty()
    }

    pub fn save_state(&self, parcel: &mut Parcel) {
        parcel.write_u8(self.pressed_buttons.bits());
        parcel.write_u8(self.pressed_directions.bits());
        parcel.write_u8(self.select_bits);
    }

    pub fn load_state(&mut self, reader: &mut ParcelReader<'_>) -> Result<(), StateError> {
        self.pressed_buttons = KeyLines::from_bits_truncate(reader.read_u8()?);
        self.pressed_directions = KeyLines::from_bits_truncate(reader.read_u8()?);
        self.select_bits = reader.read_u8()? & 0x30;
        Ok(())
    }
}

impl InputKey {
    fn line(self) -> KeyLines {
        match self {
            InputKey::A | InputKey::Right => KeyLines::RIGHT_A,
            InputKey::B | InputKey::Left => KeyLines::LEFT_B,
            InputKey::Select | InputKey::Up => KeyLines::UP_SELECT,
            InputKey::Start | InputKey::Down => KeyLines::DOWN_START,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unselected_rows_read_high() {
        let mut joypad = Joypad::new();
        let mut interrupts = Interrupts::new();
        joypad.set_key(InputKey::A, KeyState::Pressed, &mut interrupts);
        assert_eq!(joypad.read_register() & 0x0F, 0x0F);
    }

    #[test]
    fn selected_pressed_key_reads_low() {
        let mut joypad = Joypad::new();
        let mut interrupts = Interrupts::new();
        joypad.write_register(0x10); // select buttons (bit 5 low)
        joypad.set_key(InputKey::A, KeyState::Pressed, &mut interrupts);
        assert_eq!(joypad.read_register() & 0x0F, 0x0E);

        joypad.set_key(InputKey::A, KeyState::Released, &mut interrupts);
        assert_eq!(joypad.read_register() & 0x0F, 0x0F);
    }

    #[test]
    fn press_on_selected_row_fires_interrupt() {
        let mut joypad = Joypad::new();
        let mut interrupts = Interrupts::new();
        joypad.write_register(0x20); // select directions
        joypad.set_key(InputKey::Down, KeyState::Pressed, &mut interrupts);
        assert!(interrupts.interrupt_flag.contains(InterruptFlags::JOYPAD));
    }

    #[test]
    fn press_on_unselected_row_is_silent() {
        let mut joypad = Joypad::new();
        let mut interrupts = Interrupts::new();
        joypad.write_register(0x30); // nothing selected
        joypad.set_key(InputKey::Start, KeyState::Pressed, &mut interrupts);
        assert!(!interrupts.interrupt_flag.contains(InterruptFlags::JOYPAD));
    }
}
