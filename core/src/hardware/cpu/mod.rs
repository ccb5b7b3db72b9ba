//! The CPU core. Instructions are not executed in one gulp: every
//! opcode is a short table of micro-ops, one per M-cycle, and `tick`
//! runs exactly one of them on the T0 phase of each M-cycle. Memory
//! traffic is split across the phases the hardware uses: a posted
//! write leaves the CPU on T1, a posted read latches on T3, and the
//! byte a micro-op asked for is only usable by the next micro-op.
//!
//! The tail micro-op of every instruction issues the next opcode
//! fetch, so the final execute cycle of one instruction overlaps the
//! fetch of the next, exactly like the pipelined hardware.

use log::*;

use crate::hardware::cpu::opcodes::{lookup, OpTable, INSTRUCTIONS, INSTRUCTIONS_CB, ISR, INSTR_LEN};
use crate::hardware::cpu::registers::Registers;
use crate::hardware::mmu::Memory;
use crate::parcel::{Parcel, ParcelReader, StateError};

pub mod microops;
pub mod opcodes;
pub mod registers;

#[cfg(test)]
mod tests;

pub type MicroOp = fn(&mut Cpu, &mut Memory);

/// Master interrupt enable. EI requests the transition; it only lands
/// after the instruction following EI has finished.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ime {
    Disabled,
    Requested,
    Enabled,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InterruptState {
    None,
    Pending,
    Serving,
}

/// The pending-interrupt latch: once a wanted interrupt shows up the
/// countdown starts, and the ISR dispatch happens when it hits zero on
/// a fetch boundary.
#[derive(Debug)]
pub struct InterruptSlot {
    pub state: InterruptState,
    pub remaining_ticks: u8,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IoState {
    Idle,
    Read,
    Write,
}

/// The CPU side of the bus handshake: a request posted by a micro-op,
/// flushed by the tick phases.
#[derive(Debug)]
pub struct IoPort {
    pub state: IoState,
    pub data: u8,
    pub addr: u16,
}

/// Cursor into the micro-op tables.
#[derive(Debug)]
pub struct MicroCursor {
    pub table: OpTable,
    /// Flat slot index: `opcode * INSTR_LEN + step`.
    pub index: u16,
    /// M-cycle within the current instruction; 0 means the next tick
    /// sits on a fetch boundary.
    pub counter: u8,
}

pub struct Cpu {
    pub registers: Registers,
    pub ime: Ime,
    /// Suppresses the Requested->Enabled advance at the end of the EI
    /// instruction itself.
    ime_just_requested: bool,
    pub interrupt: InterruptSlot,
    pub halted: bool,
    pub stopped: bool,
    pub(crate) fetching: bool,
    pub(crate) fetching_cb: bool,
    pub(crate) micro: MicroCursor,
    pub(crate) io: IoPort,

    // Scratch registers shared between the micro-ops of one
    // instruction.
    pub(crate) b: bool,
    pub(crate) u: u8,
    pub(crate) u2: u8,
    pub(crate) lsb: u8,
    pub(crate) msb: u8,
    pub(crate) uu: u16,
    pub(crate) addr: u16,
}

/// How many T-cycles pass between an interrupt becoming pending and
/// the ISR dispatch, by pending set, halt state and the phase the
/// request was noticed on. Measured behavior; rows 16+ (joypad
/// present) are uniform.
const INTERRUPT_TIMINGS: [[[u8; 4]; 2]; 32] = {
    const STAT_LIKE: [[u8; 4]; 2] = [[1, 1, 1, 2], [1, 2, 2, 2]];
    const TIMER_LIKE: [[u8; 4]; 2] = [[1, 1, 1, 2], [1, 1, 1, 3]];
    const UNIFORM: [[u8; 4]; 2] = [[1, 1, 1, 1], [1, 1, 1, 1]];
    [
        /*  0: none             */ UNIFORM,
        /*  1: vblank           */ UNIFORM,
        /*  2: stat             */ STAT_LIKE,
        /*  3: stat+vbl         */ STAT_LIKE,
        /*  4: timer            */ TIMER_LIKE,
        /*  5: timer+vbl        */ TIMER_LIKE,
        /*  6: timer+stat       */ STAT_LIKE,
        /*  7: timer+stat+vbl   */ STAT_LIKE,
        /*  8: serial           */ TIMER_LIKE,
        /*  9: serial+vbl       */ TIMER_LIKE,
        /* 10: serial+stat      */ STAT_LIKE,
        /* 11: serial+stat+vbl  */ STAT_LIKE,
        /* 12: serial+timer     */ TIMER_LIKE,
        /* 13: serial+timer+vbl */ TIMER_LIKE,
        /* 14: serial+timer+stat */ STAT_LIKE,
        /* 15: all but joypad   */ STAT_LIKE,
        UNIFORM, UNIFORM, UNIFORM, UNIFORM, UNIFORM, UNIFORM, UNIFORM, UNIFORM,
        UNIFORM, UNIFORM, UNIFORM, UNIFORM, UNIFORM, UNIFORM, UNIFORM, UNIFORM,
    ]
};

impl Cpu {
    /// Register values after the boot ROM has run, applied when no
    /// boot ROM is installed.
    pub fn new(boot_rom_finished: bool, cgb_mode: bool) -> Self {
        let mut registers = Registers::new();
        if boot_rom_finished {
            if cgb_mode {
                registers.set_af(0x1180);
                registers.bc = 0x0000;
                registers.de = 0xFF56;
                registers.hl = 0x000D;
            } else {
                registers.set_af(0x01B0);
                registers.bc = 0x0013;
                registers.de = 0x00D8;
                registers.hl = 0x014D;
            }
            registers.pc = 0x0100;
            registers.sp = 0xFFFE;
        }

        Cpu {
            registers,
            ime: Ime::Disabled,
            ime_just_requested: false,
            interrupt: InterruptSlot {
                state: InterruptState::None,
                remaining_ticks: 0,
            },
            halted: false,
            stopped: false,
            fetching: false,
            fetching_cb: false,
            // Parked on the NOP row: the first tick behaves like the
            // tail of a NOP and issues the first real fetch.
            micro: MicroCursor {
                table: OpTable::Main,
                index: 0,
                counter: 0,
            },
            io: IoPort {
                state: IoState::Idle,
                data: 0,
                addr: 0,
            },
            b: false,
            u: 0,
            u2: 0,
            lsb: 0,
            msb: 0,
            uu: 0,
            addr: 0,
        }
    }

    // ---- The four T-cycle phases ----

    pub fn tick_t0(&mut self, mmu: &mut Memory) {
        self.check_interrupt(mmu, 3);
        self.tick(mmu);
    }

    pub fn tick_t1(&mut self, mmu: &mut Memory) {
        self.check_interrupt(mmu, 0);
        self.flush_write(mmu);
    }

    pub fn tick_t2(&mut self, mmu: &mut Memory) {
        self.check_interrupt(mmu, 1);
    }

    pub fn tick_t3(&mut self, mmu: &mut Memory) {
        self.check_interrupt(mmu, 2);
        self.flush_read(mmu);
    }

    /// Execute the micro-op scheduled for this M-cycle.
    fn tick(&mut self, mmu: &mut Memory) {
        // Resolve a pending interrupt, but only on a fetch boundary.
        if self.interrupt.state == InterruptState::Pending {
            if self.interrupt.remaining_ticks > 0 {
                self.interrupt.remaining_ticks -= 1;
            }
            if self.interrupt.remaining_ticks == 0 && self.micro.counter == 0 {
                self.halted = false;
                if self.ime == Ime::Enabled {
                    self.interrupt.state = InterruptState::Serving;
                    self.serve_interrupt();
                } else {
                    self.interrupt.state = InterruptState::None;
                }
            }
        }

        if self.halted || self.stopped {
            return;
        }

        // A completed fetch selects the next instruction's row.
        if self.fetching {
            self.fetching = false;
            self.micro.table = OpTable::Main;
            self.micro.index = self.io.data as u16 * INSTR_LEN as u16;
        } else if self.fetching_cb {
            self.fetching_cb = false;
            self.micro.table = OpTable::Cb;
            self.micro.index = self.io.data as u16 * INSTR_LEN as u16;
        }

        let microop = lookup(self.micro.table, self.micro.index);
        self.micro.counter = self.micro.counter.wrapping_add(1);
        self.micro.index += 1;

        microop(self, mmu);

        // EI lands one full instruction late.
        if self.micro.counter == 0 && self.ime == Ime::Requested {
            if self.ime_just_requested {
                self.ime_just_requested = false;
            } else {
                self.ime = Ime::Enabled;
            }
        }
    }

    /// Latch a pending interrupt and start its dispatch countdown.
    /// `t` is the column of the timing table for this phase.
    fn check_interrupt(&mut self, mmu: &Memory, t: usize) {
        if self.interrupt.state != InterruptState::None {
            return;
        }
        if !self.halted && self.ime != Ime::Enabled {
            return;
        }
        let pending = mmu.interrupts.pending().bits();
        if pending != 0 {
            self.interrupt.state = InterruptState::Pending;
            self.interrupt.remaining_ticks =
                INTERRUPT_TIMINGS[pending as usize][self.halted as usize][t];
        }
    }

    fn serve_interrupt(&mut self) {
        debug_assert!(self.fetching);
        // The fetched opcode is discarded; the ISR sequence replaces it.
        self.fetching = false;
        self.micro.table = OpTable::Isr;
        self.micro.index = 0;
        self.micro.counter = 0;
        trace!("Serving interrupt, PC: {:#06X}", self.registers.pc);
    }

    // ---- Bus handshake ----

    pub(crate) fn read(&mut self, address: u16) {
        self.io.state = IoState::Read;
        self.io.addr = address;
    }

    pub(crate) fn write(&mut self, address: u16, value: u8) {
        self.io.state = IoState::Write;
        self.io.addr = address;
        self.io.data = value;
    }

    fn flush_read(&mut self, mmu: &mut Memory) {
        if self.io.state == IoState::Read {
            self.io.data = mmu.read_byte_cpu(self.io.addr);
            self.io.state = IoState::Idle;
        }
    }

    fn flush_write(&mut self, mmu: &mut Memory) {
        if self.io.state == IoState::Write {
            mmu.write_byte_cpu(self.io.addr, self.io.data);
            self.io.state = IoState::Idle;
        }
    }

    /// Increment/decrement unit. The value passes over the address bus
    /// for one phase, which is what makes the OAM corruption possible.
    pub(crate) fn idu(&mut self, mmu: &mut Memory, value: u16, delta: i16) -> u16 {
        mmu.idu_bus_noise(value);
        value.wrapping_add(delta as u16)
    }

    /// Schedule the next opcode fetch; the tail micro-op of every
    /// instruction funnels through here.
    pub(crate) fn fetch(&mut self, mmu: &mut Memory) {
        self.micro.counter = 0;
        self.fetching = true;
        let pc = self.registers.pc;
        self.read(pc);
        self.registers.pc = self.idu(mmu, pc, 1);
    }

    /// The HALT-bug fetch: the opcode is read but PC stays put, so the
    /// byte at PC runs twice.
    pub(crate) fn fetch_without_increment(&mut self) {
        self.micro.counter = 0;
        self.fetching = true;
        let pc = self.registers.pc;
        self.read(pc);
    }

    pub(crate) fn fetch_cb(&mut self, mmu: &mut Memory) {
        self.fetching_cb = true;
        let pc = self.registers.pc;
        self.read(pc);
        self.registers.pc = self.idu(mmu, pc, 1);
    }

    /// Request enabling interrupts after the next instruction.
    pub(crate) fn request_ime(&mut self) {
        if self.ime == Ime::Disabled {
            self.ime = Ime::Requested;
            self.ime_just_requested = true;
        }
    }

    // ---- State I/O ----

    pub fn save_state(&self, parcel: &mut Parcel) {
        parcel.write_bool(self.fetching);
        parcel.write_bool(self.fetching_cb);
        parcel.write_bool(self.halted);
        parcel.write_bool(self.stopped);

        parcel.write_u16(self.registers.af);
        parcel.write_u16(self.registers.bc);
        parcel.write_u16(self.registers.de);
        parcel.write_u16(self.registers.hl);
        parcel.write_u16(self.registers.pc);
        parcel.write_u16(self.registers.sp);

        parcel.write_u8(self.ime as u8);
        parcel.write_bool(self.ime_just_requested);
        parcel.write_u8(self.interrupt.state as u8);
        parcel.write_u8(self.interrupt.remaining_ticks);

        parcel.write_u8(self.micro.table as u8);
        parcel.write_u16(self.micro.index);
        parcel.write_u8(self.micro.counter);

        parcel.write_u8(self.io.state as u8);
        parcel.write_u8(self.io.data);
        parcel.write_u16(self.io.addr);

        parcel.write_bool(self.b);
        parcel.write_u8(self.u);
        parcel.write_u8(self.u2);
        parcel.write_u8(self.lsb);
        parcel.write_u8(self.msb);
        parcel.write_u16(self.uu);
        parcel.write_u16(self.addr);
    }

    pub fn load_state(&mut self, reader: &mut ParcelReader<'_>) -> Result<(), StateError> {
        self.fetching = reader.read_bool()?;
        self.fetching_cb = reader.read_bool()?;
        self.halted = reader.read_bool()?;
        self.stopped = reader.read_bool()?;

        self.registers.af = reader.read_u16()? & 0xFFF0;
        self.registers.bc = reader.read_u16()?;
        self.registers.de = reader.read_u16()?;
        self.registers.hl = reader.read_u16()?;
        self.registers.pc = reader.read_u16()?;
        self.registers.sp = reader.read_u16()?;

        self.ime = match reader.read_u8()? {
            0 => Ime::Disabled,
            1 => Ime::Requested,
            2 => Ime::Enabled,
            _ => return Err(StateError::Content("unknown IME state")),
        };
        self.ime_just_requested = reader.read_bool()?;
        self.interrupt.state = match reader.read_u8()? {
            0 => InterruptState::None,
            1 => InterruptState::Pending,
            2 => InterruptState::Serving,
            _ => return Err(StateError::Content("unknown interrupt state")),
        };
        self.interrupt.remaining_ticks = reader.read_u8()?;

        let table = match reader.read_u8()? {
            0 => OpTable::Main,
            1 => OpTable::Cb,
            2 => OpTable::Isr,
            _ => return Err(StateError::Content("unknown micro-op table")),
        };
        let index = reader.read_u16()?;
        // One past the end is legitimate: the cursor advances before
        // its micro-op runs, and a tail fetch leaves it there.
        let in_range = match table {
            OpTable::Main => (index as usize) <= INSTRUCTIONS.len() * INSTR_LEN,
            OpTable::Cb => (index as usize) <= INSTRUCTIONS_CB.len() * INSTR_LEN,
            OpTable::Isr => (index as usize) <= ISR.len(),
        };
        if !in_range {
            return Err(StateError::Content("micro-op cursor outside its table"));
        }
        self.micro.table = table;
        self.micro.index = index;
        self.micro.counter = reader.read_u8()?;

        self.io.state = match reader.read_u8()? {
            0 => IoState::Idle,
            1 => IoState::Read,
            2 => IoState::Write,
            _ => return Err(StateError::Content("unknown IO state")),
        };
        self.io.data = reader.read_u8()?;
        self.io.addr = reader.read_u16()?;

        self.b = reader.read_bool()?;
        self.u = reader.read_u8()?;
        self.u2 = reader.read_u8()?;
        self.lsb = reader.read_u8()?;
        self.msb = reader.read_u8()?;
        self.uu = reader.read_u16()?;
        self.addr = reader.read_u16()?;
        Ok(())
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cpu {{ {}, ime: {:?}, halted: {}, micro: {:?} }}",
            self.registers, self.ime, self.halted, self.micro
        )
    }
}
