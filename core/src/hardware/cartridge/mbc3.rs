//! MBC3: 7-bit ROM banking, four RAM banks and the battery-backed
//! real-time clock. The RTC registers are only observable through a
//! latch: writing 0 then 1 to 0x6000-0x7FFF snapshots the live clock
//! into the latched copies that 0xA000-0xBFFF exposes.

use crate::parcel::{Parcel, ParcelReader, StateError};
use std::time::{SystemTime, UNIX_EPOCH};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_DAY: u64 = 86400;

/// The five clock registers, in the order they are selected by
/// 0x08-0x0C.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RtcRegisters {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    /// Low eight bits of the day counter.
    pub day_low: u8,
    /// Bit 0: day bit 8, bit 6: halt, bit 7: day-counter carry.
    pub day_high: u8,
}

impl RtcRegisters {
    fn day(&self) -> u16 {
        ((self.day_high as u16 & 0x1) << 8) | self.day_low as u16
    }

    fn halted(&self) -> bool {
        self.day_high & 0x40 != 0
    }

    /// Fold `elapsed` wall-clock seconds into the registers, setting
    /// the carry bit when the 9-bit day counter wraps.
    fn advance(&mut self, elapsed: u64) {
        if elapsed == 0 {
            return;
        }
        let mut total = self.seconds as u64
            + self.minutes as u64 * SECONDS_PER_MINUTE
            + self.hours as u64 * SECONDS_PER_HOUR
            + self.day() as u64 * SECONDS_PER_DAY
            + elapsed;

        let days = total / SECONDS_PER_DAY;
        if days > 0x1FF {
            self.day_high |= 0x80;
        }
        total %= SECONDS_PER_DAY;

        self.seconds = (total % SECONDS_PER_MINUTE) as u8;
        self.minutes = ((total / SECONDS_PER_MINUTE) % 60) as u8;
        self.hours = (total / SECONDS_PER_HOUR) as u8;
        self.day_low = days as u8;
        self.day_high = (self.day_high & 0xC0) | ((days >> 8) as u8 & 0x1);
    }
}

#[derive(Debug)]
pub struct Mbc3 {
    pub ram_and_timer_enabled: bool,
    pub rom_bank: u8,
    /// 0x00-0x03 selects a RAM bank, 0x08-0x0C an RTC register.
    ram_bank_or_rtc: u8,
    latch_state: u8,
    has_timer: bool,

    clock: RtcRegisters,
    latched: RtcRegisters,
    /// Unix seconds at which `clock` was last brought up to date.
    last_timestamp: u64,
}

impl Mbc3 {
    pub fn new(has_timer: bool) -> Self {
        Mbc3 {
            ram_and_timer_enabled: false,
            rom_bank: 1,
            ram_bank_or_rtc: 0,
            latch_state: 0xFF,
            has_timer,
            clock: RtcRegisters::default(),
            latched: RtcRegisters::default(),
            last_timestamp: unix_now(),
        }
    }

    pub fn ram_bank(&self) -> usize {
        (self.ram_bank_or_rtc & 0x03) as usize
    }

    pub fn has_timer(&self) -> bool {
        self.has_timer
    }

    /// Whether 0xA000-0xBFFF currently resolves to an RTC register
    /// rather than external RAM.
    pub fn rtc_selected(&self) -> bool {
        self.has_timer && (0x08..=0x0C).contains(&self.ram_bank_or_rtc)
    }

    pub fn write_register(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x1FFF => self.ram_and_timer_enabled = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                self.rom_bank = value & 0x7F;
                if self.rom_bank == 0 {
                    self.rom_bank = 1;
                }
            }
            0x4000..=0x5FFF => self.ram_bank_or_rtc = value & 0x0F,
            0x6000..=0x7FFF => {
                if self.latch_state == 0x00 && value == 0x01 {
                    self.catch_up();
                    self.latched = self.clock;
                }
                self.latch_state = value;
            }
            _ => {}
        }
    }

    pub fn read_rtc(&self) -> u8 {
        match self.ram_bank_or_rtc {
            0x08 => self.latched.seconds,
            0x09 => self.latched.minutes,
            0x0A => self.latched.hours,
            0x0B => self.latched.day_low,
            0x0C => self.latched.day_high,
            _ => 0xFF,
        }
    }

    /// Writes go to the live clock, not the latched copies.
    pub fn write_rtc(&mut self, value: u8) {
        self.catch_up();
        match self.ram_bank_or_rtc {
            0x08 => self.clock.seconds = value & 0x3F,
            0x09 => self.clock.minutes = value & 0x3F,
            0x0A => self.clock.hours = value & 0x1F,
            0x0B => self.clock.day_low = value,
            0x0C => self.clock.day_high = value & 0xC1,
            _ => {}
        }
    }

    /// Advance the live clock to the present wall-clock time.
    fn catch_up(&mut self) {
        let now = unix_now();
        let elapsed = now.saturating_sub(self.last_timestamp);
        self.last_timestamp = now;
        if !self.clock.halted() {
            self.clock.advance(elapsed);
        }
    }

    /// The trailing 48 bytes of a battery save: the five live
    /// registers, the five latched copies (each as a little-endian
    /// `u32`) and the 64-bit timestamp.
    pub fn battery_bytes(&mut self) -> [u8; 48] {
        self.catch_up();
        let mut out = [0u8; 48];
        let fields = [
            self.clock.seconds,
            self.clock.minutes,
            self.clock.hours,
            self.clock.day_low,
            self.clock.day_high,
            self.latched.seconds,
            self.latched.minutes,
            self.latched.hours,
            self.latched.day_low,
            self.latched.day_high,
        ];
        for (i, field) in fields.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&(*field as u32).to_le_bytes());
        }
        out[40..48].copy_from_slice(&self.last_timestamp.to_le_bytes());
        out
    }

    /// Restore from a battery save and replay the wall-clock time that
    /// passed while the emulator was down.
    pub fn load_battery_bytes(&mut self, bytes: &[u8; 48]) {
        let field = |i: usize| u32::from_le_bytes([bytes[i * 4], bytes[i * 4 + 1], bytes[i * 4 + 2], bytes[i * 4 + 3]]) as u8;
        self.clock = RtcRegisters {
            seconds: field(0),
            minutes: field(1),
            hours: field(2),
            day_low: field(3),
            day_high: field(4),
        };
        self.latched = RtcRegisters {
            seconds: field(5),
            minutes: field(6),
            hours: field(7),
            day_low: field(8),
            day_high: field(9),
        };
        self.last_timestamp = u64::from_le_bytes([
            bytes[40], bytes[41], bytes[42], bytes[43], bytes[44], bytes[45], bytes[46], bytes[47],
        ]);
        self.catch_up();
    }

    /// Save-states freeze the RTC exactly as-is; resuming must be
    /// bit-identical, so no wall-clock catch-up happens on load.
    pub fn save_state(&self, parcel: &mut Parcel) {
        parcel.write_bool(self.ram_and_timer_enabled);
        parcel.write_u8(self.rom_bank);
        parcel.write_u8(self.ram_bank_or_rtc);
        parcel.write_u8(self.latch_state);
        for regs in [&self.clock, &self.latched].iter() {
            parcel.write_u8(regs.seconds);
            parcel.write_u8(regs.minutes);
            parcel.write_u8(regs.hours);
            parcel.write_u8(regs.day_low);
            parcel.write_u8(regs.day_high);
        }
        parcel.write_u64(self.last_timestamp);
    }

    pub fn load_state(&mut self, reader: &mut ParcelReader<'_>) -> Result<(), StateError> {
        self.ram_and_timer_enabled = reader.read_bool()?;
        self.rom_bank = reader.read_u8()? & 0x7F;
        if self.rom_bank == 0 {
            self.rom_bank = 1;
        }
        self.ram_bank_or_rtc = reader.read_u8()? & 0x0F;
        self.latch_state = reader.read_u8()?;
        let mut read_regs = |reader: &mut ParcelReader<'_>| -> Result<RtcRegisters, StateError> {
            Ok(RtcRegisters {
                seconds: reader.read_u8()?,
                minutes: reader.read_u8()?,
                hours: reader.read_u8()?,
                day_low: reader.read_u8()?,
                day_high: reader.read_u8()?,
            })
        };
        self.clock = read_regs(reader)?;
        self.latched = read_regs(reader)?;
        self.last_timestamp = reader.read_u64()?;
        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_zero_rounds_up() {
        let mut mbc = Mbc3::new(false);
        mbc.write_register(0x2000, 0x00);
        assert_eq!(mbc.rom_bank, 1);
        mbc.write_register(0x2000, 0x45);
        assert_eq!(mbc.rom_bank, 0x45);
    }

    #[test]
    fn rtc_selection() {
        let mut mbc = Mbc3::new(true);
        mbc.write_register(0x4000, 0x02);
        assert!(!mbc.rtc_selected());
        assert_eq!(mbc.ram_bank(), 2);

        mbc.write_register(0x4000, 0x09);
        assert!(mbc.rtc_selected());
    }

    #[test]
    fn latch_copies_the_clock() {
        let mut mbc = Mbc3::new(true);
        mbc.write_register(0x4000, 0x08);
        mbc.write_rtc(33);

        // Latch sequence: 0 then 1.
        mbc.write_register(0x6000, 0x00);
        mbc.write_register(0x6000, 0x01);
        assert_eq!(mbc.read_rtc(), 33);

        // A later clock write leaves the latched copy alone.
        mbc.write_rtc(10);
        assert_eq!(mbc.read_rtc(), 33);
    }

    #[test]
    fn advance_rolls_over_fields() {
        let mut regs = RtcRegisters::default();
        regs.advance(SECONDS_PER_DAY + SECONDS_PER_HOUR * 2 + 61);
        assert_eq!(regs.day_low, 1);
        assert_eq!(regs.hours, 2);
        assert_eq!(regs.minutes, 1);
        assert_eq!(regs.seconds, 1);
    }

    #[test]
    fn day_counter_carry() {
        let mut regs = RtcRegisters::default();
        regs.advance(SECONDS_PER_DAY * 0x200 + 5);
        assert!(regs.day_high & 0x80 != 0);
    }

    #[test]
    fn battery_block_roundtrip() {
        let mut mbc = Mbc3::new(true);
        mbc.write_register(0x4000, 0x0A);
        mbc.write_rtc(17);
        let bytes = mbc.battery_bytes();

        let mut restored = Mbc3::new(true);
        restored.load_battery_bytes(&bytes);
        restored.write_register(0x4000, 0x0A);
        restored.write_register(0x6000, 0x00);
        restored.write_register(0x6000, 0x01);
        assert_eq!(restored.read_rtc(), 17);
    }
}
