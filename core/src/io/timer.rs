use crate::io::interrupts::{InterruptFlags, Interrupts};
use crate::parcel::{Parcel, ParcelReader, StateError};

/// DIV: the high byte of the internal 16-bit counter, so it counts up
/// at 16384 Hz (double that in CGB double speed, where the whole
/// counter runs at the CPU rate). Any write clears the full counter,
/// not just the visible byte.
pub const DIVIDER_REGISTER: u16 = 0xFF04;
/// TIMA: counts at whichever rate the TAC mux selects. Wrapping past
/// 0xFF reloads it from TMA one M-cycle later and raises the timer
/// interrupt.
pub const TIMER_COUNTER: u16 = 0xFF05;
/// TMA: the value TIMA restarts from after an overflow.
pub const TIMER_MODULO: u16 = 0xFF06;
/// TAC: bit 2 enables TIMA, bits 0-1 pick its rate.
pub const TIMER_CONTROL: u16 = 0xFF07;

/// TIMA increments on the falling edge of one bit of the internal
/// divider, selected by the TAC frequency mux.
const MUX_BITS: [u16; 4] = [
    1 << 9, // 4096 Hz
    1 << 3, // 262144 Hz
    1 << 5, // 65536 Hz
    1 << 7, // 16384 Hz
];

/// The overflow window and the reload cycle each last one M-cycle.
const RELOAD_TICKS: u8 = 4;

/// Where TIMA is inside its overflow/reload pipeline.
///
/// `Overflowed` is the M-cycle right after the increment that wrapped:
/// TIMA reads 0, a TIMA write aborts the reload. `Reloading` is the
/// M-cycle in which TMA has just been copied in: TIMA writes are
/// ignored and a TMA write shows up in TIMA immediately.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ReloadState {
    Inactive,
    Overflowed(u8),
    Reloading(u8),
}

#[derive(Debug)]
pub struct Timers {
    /// 16-bit counter incremented every T-cycle. DIV is its high byte.
    pub div_ticks: u16,
    tima: u8,
    tma: u8,
    tac: u8,
    reload: ReloadState,
}

impl Default for Timers {
    fn default() -> Self {
        Timers {
            div_ticks: 0,
            tima: 0,
            tma: 0,
            tac: 0,
            reload: ReloadState::Inactive,
        }
    }
}

impl Timers {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn divider_register(&self) -> u8 {
        (self.div_ticks >> 8) as u8
    }

    pub fn timer_counter(&self) -> u8 {
        self.tima
    }

    pub fn timer_modulo(&self) -> u8 {
        self.tma
    }

    pub fn timer_control(&self) -> u8 {
        self.tac | 0xF8
    }

    /// Advance the divider by one T-cycle, driving TIMA through its
    /// falling-edge detector and the overflow pipeline.
    pub fn tick(&mut self, interrupts: &mut Interrupts) {
        match self.reload {
            ReloadState::Overflowed(ticks) => {
                if ticks == 1 {
                    self.tima = self.tma;
                    interrupts.request(InterruptFlags::TIMER);
                    self.reload = ReloadState::Reloading(RELOAD_TICKS);
                } else {
                    self.reload = ReloadState::Overflowed(ticks - 1);
                }
            }
            ReloadState::Reloading(ticks) => {
                self.reload = if ticks == 1 {
                    ReloadState::Inactive
                } else {
                    ReloadState::Reloading(ticks - 1)
                };
            }
            ReloadState::Inactive => {}
        }

        let old_ticks = self.div_ticks;
        self.div_ticks = self.div_ticks.wrapping_add(1);

        if self.fell(old_ticks, self.div_ticks) {
            self.increment_tima();
        }
    }

    /// Whether the TAC-selected divider bit went from 1 to 0, gated by
    /// the TAC enable bit.
    fn fell(&self, old_ticks: u16, new_ticks: u16) -> bool {
        if self.tac & 0x4 == 0 {
            return false;
        }
        let bit = MUX_BITS[(self.tac & 0x3) as usize];
        (old_ticks & bit) != 0 && (new_ticks & bit) == 0
    }

    fn increment_tima(&mut self) {
        let (new_value, overflowed) = self.tima.overflowing_add(1);
        self.tima = new_value;
        if overflowed {
            // TIMA reads 0 for one M-cycle before TMA is loaded.
            self.reload = ReloadState::Overflowed(RELOAD_TICKS);
        }
    }

    /// Any write to DIV resets the whole internal counter, which can
    /// spuriously increment TIMA if the selected bit was high.
    pub fn set_divider(&mut self) {
        let old_ticks = self.div_ticks;
        self.div_ticks = 0;
        if self.fell(old_ticks, 0) {
            self.increment_tima();
        }
    }

    /// Write to TIMA. Inside the overflow window this aborts the
    /// reload; during the reload cycle itself the write is lost.
    pub fn set_timer_counter(&mut self, value: u8) {
        match self.reload {
            ReloadState::Overflowed(_) => {
                self.reload = ReloadState::Inactive;
                self.tima = value;
            }
            ReloadState::Reloading(_) => {}
            ReloadState::Inactive => self.tima = value,
        }
    }

    /// Write to TMA. During the reload cycle the new value is what ends
    /// up in TIMA.
    pub fn set_tma(&mut self, value: u8) {
        self.tma = value;
        if let ReloadState::Reloading(_) = self.reload {
            self.tima = value;
        }
    }

    /// Write to TAC. Disabling the timer, or moving the mux from a high
    /// bit to a low one, trips the falling-edge detector.
    pub fn set_timer_control(&mut self, value: u8) {
        let old_enabled = self.tac & 0x4 != 0;
        let old_bit = MUX_BITS[(self.tac & 0x3) as usize];
        let new_enabled = value & 0x4 != 0;
        let new_bit = MUX_BITS[(value & 0x3) as usize];
        self.tac = value & 0x7;

        let old_high = old_enabled && (self.div_ticks & old_bit) != 0;
        let new_high = new_enabled && (self.div_ticks & new_bit) != 0;
        if old_high && !new_high {
            self.increment_tima();
        }
    }

    pub fn save_state(&self, parcel: &mut Parcel) {
        parcel.write_u16(self.div_ticks);
        parcel.write_u8(self.tima);
        parcel.write_u8(self.tma);
        parcel.write_u8(self.tac);
        let (state, ticks) = match self.reload {
            ReloadState::Inactive => (0, 0),
            ReloadState::Overflowed(t) => (1, t),
            ReloadState::Reloading(t) => (2, t),
        };
        parcel.write_u8(state);
        parcel.write_u8(ticks);
    }

    pub fn load_state(&mut self, reader: &mut ParcelReader<'_>) -> Result<(), StateError> {
        self.div_ticks = reader.read_u16()?;
        self.tima = reader.read_u8()?;
        self.tma = reader.read_u8()?;
        self.tac = reader.read_u8()? & 0x7;
        let state = reader.read_u8()?;
        let ticks = reader.read_u8()?;
        if ticks > RELOAD_TICKS {
            return Err(StateError::Content("timer reload countdown out of range"));
        }
        self.reload = match state {
            0 => ReloadState::Inactive,
            1 => ReloadState::Overflowed(ticks),
            2 => ReloadState::Reloading(ticks),
            _ => return Err(StateError::Content("unknown timer reload state")),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tick_m_cycle(timers: &mut Timers, interrupts: &mut Interrupts) {
        for _ in 0..4 {
            timers.tick(interrupts);
        }
    }

    #[test]
    fn div_is_high_byte_of_counter() {
        let mut timers = Timers::new();
        let mut interrupts = Interrupts::new();
        for _ in 0..0x200 {
            timers.tick(&mut interrupts);
        }
        assert_eq!(timers.divider_register(), 0x02);
    }

    #[test]
    fn tima_increments_at_selected_rate() {
        let mut timers = Timers::new();
        let mut interrupts = Interrupts::new();
        // Enable at 262144 Hz: one increment every 16 T-cycles.
        timers.set_timer_control(0x05);
        for _ in 0..64 {
            timers.tick(&mut interrupts);
        }
        assert_eq!(timers.timer_counter(), 4);
    }

    #[test]
    fn overflow_reads_zero_then_reloads_tma() {
        let mut timers = Timers::new();
        let mut interrupts = Interrupts::new();
        timers.set_timer_control(0x05);
        timers.set_tma(0x03);
        timers.set_timer_counter(0xFF);

        // Run up to the overflowing edge.
        while timers.timer_counter() != 0 {
            timers.tick(&mut interrupts);
        }
        // Overflow window: TIMA reads 0, the interrupt has not fired yet.
        assert_eq!(timers.timer_counter(), 0);
        assert!(!interrupts.interrupt_flag.contains(InterruptFlags::TIMER));

        tick_m_cycle(&mut timers, &mut interrupts);
        assert_eq!(timers.timer_counter(), 0x03);
        assert!(interrupts.interrupt_flag.contains(InterruptFlags::TIMER));
    }

    #[test]
    fn tima_write_in_overflow_window_cancels_reload() {
        let mut timers = Timers::new();
        let mut interrupts = Interrupts::new();
        timers.set_timer_control(0x05);
        timers.set_tma(0x03);
        timers.set_timer_counter(0xFF);
        while timers.timer_counter() != 0 {
            timers.tick(&mut interrupts);
        }

        timers.set_timer_counter(0x42);
        tick_m_cycle(&mut timers, &mut interrupts);
        assert_eq!(timers.timer_counter(), 0x42);
        assert!(!interrupts.interrupt_flag.contains(InterruptFlags::TIMER));
    }

    #[test]
    fn div_write_can_tick_tima() {
        let mut timers = Timers::new();
        let mut interrupts = Interrupts::new();
        timers.set_timer_control(0x05);
        // Put the selected bit (bit 3) high, then reset the divider.
        for _ in 0..8 {
            timers.tick(&mut interrupts);
        }
        let before = timers.timer_counter();
        timers.set_divider();
        assert_eq!(timers.timer_counter(), before + 1);
    }
}
