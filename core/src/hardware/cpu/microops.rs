//! Micro-op bodies. Each function is one M-cycle of one instruction
//! and runs on the T0 phase; a posted read is only visible to the
//! *next* micro-op (it latches on T3), and a posted write leaves on
//! the following T1. The tail micro-op of every instruction calls
//! `fetch`, overlapping the last execute cycle with the next fetch.
//!
//! Register operands are const-generic indices so each table entry is
//! a distinct monomorphized `fn` item; the tables in `opcodes` wire
//! them up per opcode.

use crate::hardware::cpu::{Cpu, Ime, InterruptState};
use crate::hardware::mmu::Memory;

/// 8-bit register ids, matching the hardware operand encoding.
pub mod reg {
    pub const B: u8 = 0;
    pub const C: u8 = 1;
    pub const D: u8 = 2;
    pub const E: u8 = 3;
    pub const H: u8 = 4;
    pub const L: u8 = 5;
    pub const A: u8 = 7;
}

/// 16-bit register-pair ids.
pub mod reg16 {
    pub const BC: u8 = 0;
    pub const DE: u8 = 1;
    pub const HL: u8 = 2;
    pub const SP: u8 = 3;
    pub const AF: u8 = 4;
}

/// Flags a conditional instruction can test; the condition is the
/// flag plus the polarity it must have (`Z` + `false` = NZ).
pub mod flag {
    pub const Z: u8 = 0;
    pub const C: u8 = 1;
}

impl Cpu {
    #[inline]
    fn read_r8<const R: u8>(&self) -> u8 {
        match R {
            reg::B => (self.registers.bc >> 8) as u8,
            reg::C => self.registers.bc as u8,
            reg::D => (self.registers.de >> 8) as u8,
            reg::E => self.registers.de as u8,
            reg::H => (self.registers.hl >> 8) as u8,
            reg::L => self.registers.hl as u8,
            reg::A => self.registers.a(),
            _ => unreachable!(),
        }
    }

    #[inline]
    fn write_r8<const R: u8>(&mut self, value: u8) {
        match R {
            reg::B => self.registers.bc = (self.registers.bc & 0x00FF) | ((value as u16) << 8),
            reg::C => self.registers.bc = (self.registers.bc & 0xFF00) | value as u16,
            reg::D => self.registers.de = (self.registers.de & 0x00FF) | ((value as u16) << 8),
            reg::E => self.registers.de = (self.registers.de & 0xFF00) | value as u16,
            reg::H => self.registers.hl = (self.registers.hl & 0x00FF) | ((value as u16) << 8),
            reg::L => self.registers.hl = (self.registers.hl & 0xFF00) | value as u16,
            reg::A => self.registers.set_a(value),
            _ => unreachable!(),
        }
    }

    #[inline]
    fn read_rr<const RR: u8>(&self) -> u16 {
        match RR {
            reg16::BC => self.registers.bc,
            reg16::DE => self.registers.de,
            reg16::HL => self.registers.hl,
            reg16::SP => self.registers.sp,
            reg16::AF => self.registers.af,
            _ => unreachable!(),
        }
    }

    #[inline]
    fn write_rr<const RR: u8>(&mut self, value: u16) {
        match RR {
            reg16::BC => self.registers.bc = value,
            reg16::DE => self.registers.de = value,
            reg16::HL => self.registers.hl = value,
            reg16::SP => self.registers.sp = value,
            reg16::AF => self.registers.set_af(value),
            _ => unreachable!(),
        }
    }

    #[inline]
    fn test_flag<const F: u8>(&self) -> bool {
        match F {
            flag::Z => self.registers.zf(),
            flag::C => self.registers.cf(),
            _ => unreachable!(),
        }
    }

    /// Fetch one operand byte: read at PC and step PC through the IDU.
    #[inline]
    fn read_pc(&mut self, mmu: &mut Memory) {
        let pc = self.registers.pc;
        self.read(pc);
        self.registers.pc = self.idu(mmu, pc, 1);
    }

    #[inline]
    fn uu_from_parts(&self) -> u16 {
        ((self.msb as u16) << 8) | self.lsb as u16
    }

    // ---- shared ALU ----

    fn alu_add(&mut self, value: u8, carry_in: bool) {
        let a = self.registers.a();
        let c = carry_in as u8;
        let result = a.wrapping_add(value).wrapping_add(c);
        self.registers.set_flags(
            result == 0,
            false,
            (a & 0xF) + (value & 0xF) + c > 0xF,
            a as u16 + value as u16 + c as u16 > 0xFF,
        );
        self.registers.set_a(result);
    }

    fn alu_sub(&mut self, value: u8, carry_in: bool, keep_result: bool) {
        let a = self.registers.a();
        let c = carry_in as u8;
        let result = a.wrapping_sub(value).wrapping_sub(c);
        self.registers.set_flags(
            result == 0,
            true,
            (a & 0xF) < (value & 0xF) + c,
            (a as u16) < value as u16 + c as u16,
        );
        if keep_result {
            self.registers.set_a(result);
        }
    }

    fn alu_and(&mut self, value: u8) {
        let result = self.registers.a() & value;
        self.registers.set_flags(result == 0, false, true, false);
        self.registers.set_a(result);
    }

    fn alu_xor(&mut self, value: u8) {
        let result = self.registers.a() ^ value;
        self.registers.set_flags(result == 0, false, false, false);
        self.registers.set_a(result);
    }

    fn alu_or(&mut self, value: u8) {
        let result = self.registers.a() | value;
        self.registers.set_flags(result == 0, false, false, false);
        self.registers.set_a(result);
    }

    fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.registers.set_zf(result == 0);
        self.registers.set_n(false);
        self.registers.set_h(value & 0xF == 0xF);
        result
    }

    fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.registers.set_zf(result == 0);
        self.registers.set_n(true);
        self.registers.set_h(value & 0xF == 0);
        result
    }

    /// C <- [7 <- 0] <- [7]
    fn alu_rlc(&mut self, value: u8) -> u8 {
        let result = value.rotate_left(1);
        self.registers.set_flags(result == 0, false, false, value & 0x80 != 0);
        result
    }

    /// [0] -> [7 -> 0] -> C
    fn alu_rrc(&mut self, value: u8) -> u8 {
        let result = value.rotate_right(1);
        self.registers.set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    /// C <- [7 <- 0] <- C
    fn alu_rl(&mut self, value: u8) -> u8 {
        let result = (value << 1) | self.registers.cf() as u8;
        self.registers.set_flags(result == 0, false, false, value & 0x80 != 0);
        result
    }

    /// C -> [7 -> 0] -> C
    fn alu_rr(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | ((self.registers.cf() as u8) << 7);
        self.registers.set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    /// C <- [7 <- 0] <- 0
    fn alu_sla(&mut self, value: u8) -> u8 {
        let result = value << 1;
        self.registers.set_flags(result == 0, false, false, value & 0x80 != 0);
        result
    }

    /// [7] -> [7 -> 0] -> C
    fn alu_sra(&mut self, value: u8) -> u8 {
        let result = (value & 0x80) | (value >> 1);
        self.registers.set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    /// 0 -> [7 -> 0] -> C
    fn alu_srl(&mut self, value: u8) -> u8 {
        let result = value >> 1;
        self.registers.set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    fn alu_swap(&mut self, value: u8) -> u8 {
        let result = value.rotate_left(4);
        self.registers.set_flags(result == 0, false, false, false);
        result
    }

    /// `SP + s8` with the flags both ADD SP and LD HL,SP+s8 want.
    fn sp_plus_signed(&mut self, offset: u8) -> u16 {
        let sp = self.registers.sp;
        let value = offset as i8 as u16;
        self.registers.set_flags(
            false,
            false,
            (sp & 0xF) + (value & 0xF) > 0xF,
            (sp & 0xFF) + (value & 0xFF) > 0xFF,
        );
        sp.wrapping_add(value)
    }
}

// ---- 0x00: NOP ----

pub fn nop_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- LD rr, u16 ----

pub fn ld_rr_uu_m0<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn ld_rr_uu_m1<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.lsb = cpu.io.data;
    cpu.read_pc(mmu);
}

pub fn ld_rr_uu_m2<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = ((cpu.io.data as u16) << 8) | cpu.lsb as u16;
    cpu.write_rr::<RR>(value);
    cpu.fetch(mmu);
}

// ---- LD (rr), r / LD r, (rr) ----

pub fn ld_arr_r_m0<const RR: u8, const R: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.write(cpu.read_rr::<RR>(), cpu.read_r8::<R>());
}

pub fn ld_arr_r_m1<const RR: u8, const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn ld_r_arr_m0<const R: u8, const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.read(cpu.read_rr::<RR>());
}

pub fn ld_r_arr_m1<const R: u8, const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.io.data;
    cpu.write_r8::<R>(value);
    cpu.fetch(mmu);
}

// ---- LD (HL±), A / LD A, (HL±) ----

pub fn ld_arri_r_m0<const STEP: i16>(cpu: &mut Cpu, mmu: &mut Memory) {
    let hl = cpu.registers.hl;
    cpu.write(hl, cpu.registers.a());
    cpu.registers.hl = cpu.idu(mmu, hl, STEP);
}

pub fn ld_arri_r_m1<const STEP: i16>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn ld_r_arri_m0<const STEP: i16>(cpu: &mut Cpu, mmu: &mut Memory) {
    let hl = cpu.registers.hl;
    cpu.read(hl);
    cpu.registers.hl = cpu.idu(mmu, hl, STEP);
}

pub fn ld_r_arri_m1<const STEP: i16>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.io.data;
    cpu.registers.set_a(value);
    cpu.fetch(mmu);
}

// ---- INC/DEC rr ----

pub fn inc_rr_m0<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_rr::<RR>();
    let value = cpu.idu(mmu, value, 1);
    cpu.write_rr::<RR>(value);
}

pub fn inc_rr_m1<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn dec_rr_m0<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_rr::<RR>();
    let value = cpu.idu(mmu, value, -1);
    cpu.write_rr::<RR>(value);
}

pub fn dec_rr_m1<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- INC/DEC r ----

pub fn inc_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    let result = cpu.alu_inc8(value);
    cpu.write_r8::<R>(result);
    cpu.fetch(mmu);
}

pub fn dec_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    let result = cpu.alu_dec8(value);
    cpu.write_r8::<R>(result);
    cpu.fetch(mmu);
}

// ---- INC/DEC (HL) ----

pub fn inc_arr_m0<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.read(cpu.read_rr::<RR>());
}

pub fn inc_arr_m1<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    let value = cpu.io.data;
    let result = cpu.alu_inc8(value);
    cpu.write(cpu.read_rr::<RR>(), result);
}

pub fn inc_arr_m2<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn dec_arr_m0<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.read(cpu.read_rr::<RR>());
}

pub fn dec_arr_m1<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    let value = cpu.io.data;
    let result = cpu.alu_dec8(value);
    cpu.write(cpu.read_rr::<RR>(), result);
}

pub fn dec_arr_m2<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- LD r, u8 / LD (HL), u8 ----

pub fn ld_r_u_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn ld_r_u_m1<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.io.data;
    cpu.write_r8::<R>(value);
    cpu.fetch(mmu);
}

pub fn ld_arr_u_m0<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn ld_arr_u_m1<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    let value = cpu.io.data;
    cpu.write(cpu.read_rr::<RR>(), value);
}

pub fn ld_arr_u_m2<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- LD (u16), SP ----

pub fn ld_ann_rr_m0<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn ld_ann_rr_m1<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.lsb = cpu.io.data;
    cpu.read_pc(mmu);
}

pub fn ld_ann_rr_m2<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.msb = cpu.io.data;
    cpu.addr = cpu.uu_from_parts();
    cpu.write(cpu.addr, cpu.read_rr::<RR>() as u8);
}

pub fn ld_ann_rr_m3<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.write(cpu.addr.wrapping_add(1), (cpu.read_rr::<RR>() >> 8) as u8);
}

pub fn ld_ann_rr_m4<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- ADD HL, rr ----

pub fn add_rr_rr_m0<const DST: u8, const SRC: u8>(_cpu: &mut Cpu, _mmu: &mut Memory) {
    // Internal cycle; the sum lands on the next one.
}

pub fn add_rr_rr_m1<const DST: u8, const SRC: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let dst = cpu.read_rr::<DST>();
    let src = cpu.read_rr::<SRC>();
    let (result, carry) = dst.overflowing_add(src);
    cpu.registers.set_n(false);
    cpu.registers.set_h((dst & 0x0FFF) + (src & 0x0FFF) > 0x0FFF);
    cpu.registers.set_cf(carry);
    cpu.write_rr::<DST>(result);
    cpu.fetch(mmu);
}

// ---- rotate-A shorthands ----

pub fn rlca_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    let a = cpu.registers.a();
    let result = cpu.alu_rlc(a);
    cpu.registers.set_zf(false);
    cpu.registers.set_a(result);
    cpu.fetch(mmu);
}

pub fn rrca_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    let a = cpu.registers.a();
    let result = cpu.alu_rrc(a);
    cpu.registers.set_zf(false);
    cpu.registers.set_a(result);
    cpu.fetch(mmu);
}

pub fn rla_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    let a = cpu.registers.a();
    let result = cpu.alu_rl(a);
    cpu.registers.set_zf(false);
    cpu.registers.set_a(result);
    cpu.fetch(mmu);
}

pub fn rra_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    let a = cpu.registers.a();
    let result = cpu.alu_rr(a);
    cpu.registers.set_zf(false);
    cpu.registers.set_a(result);
    cpu.fetch(mmu);
}

// ---- JR ----

pub fn jr_s_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn jr_s_m1(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.registers.pc = cpu.registers.pc.wrapping_add(cpu.io.data as i8 as u16);
}

pub fn jr_s_m2(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn jr_c_s_m0<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn jr_c_s_m1<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    if cpu.test_flag::<F>() == Y {
        cpu.registers.pc = cpu.registers.pc.wrapping_add(cpu.io.data as i8 as u16);
    } else {
        cpu.fetch(mmu);
    }
}

pub fn jr_c_s_m2<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- DAA and friends ----

pub fn daa_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    let mut a = cpu.registers.a();
    let mut carry = cpu.registers.cf();

    if !cpu.registers.n() {
        if carry || a > 0x99 {
            a = a.wrapping_add(0x60);
            carry = true;
        }
        if cpu.registers.hf() || a & 0x0F > 0x09 {
            a = a.wrapping_add(0x06);
        }
    } else {
        if carry {
            a = a.wrapping_sub(0x60);
        }
        if cpu.registers.hf() {
            a = a.wrapping_sub(0x06);
        }
    }

    cpu.registers.set_a(a);
    cpu.registers.set_zf(a == 0);
    cpu.registers.set_h(false);
    cpu.registers.set_cf(carry);
    cpu.fetch(mmu);
}

pub fn cpl_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    let a = !cpu.registers.a();
    cpu.registers.set_a(a);
    cpu.registers.set_n(true);
    cpu.registers.set_h(true);
    cpu.fetch(mmu);
}

pub fn scf_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.registers.set_n(false);
    cpu.registers.set_h(false);
    cpu.registers.set_cf(true);
    cpu.fetch(mmu);
}

pub fn ccf_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    let carry = cpu.registers.cf();
    cpu.registers.set_n(false);
    cpu.registers.set_h(false);
    cpu.registers.set_cf(!carry);
    cpu.fetch(mmu);
}

// ---- HALT / STOP ----

pub fn halt_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    if cpu.ime != Ime::Enabled && !mmu.interrupts.pending().is_empty() {
        // HALT bug: no halt, and the next fetch skips the PC
        // increment, so the following opcode executes twice.
        cpu.fetch_without_increment();
    } else {
        cpu.halted = true;
        cpu.fetch(mmu);
    }
}

pub fn stop_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    let button_held = mmu.joypad.any_selected_pressed();
    let pending = !mmu.interrupts.pending().is_empty();

    if button_held {
        // One-byte form; with nothing pending the CPU drops into halt.
        if !pending {
            cpu.halted = true;
        }
        cpu.fetch(mmu);
        return;
    }

    if mmu.speed.perform_switch() {
        mmu.timers.set_divider();
        if pending {
            cpu.fetch(mmu);
        } else {
            // Two-byte form: swallow the byte after STOP.
            cpu.read_pc(mmu);
        }
        return;
    }

    // Stop mode proper: clocks off, DIV reset, two-byte instruction.
    mmu.timers.set_divider();
    cpu.stopped = true;
    cpu.read_pc(mmu);
}

pub fn stop_m1(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- LD r, r ----

pub fn ld_r_r_m0<const DST: u8, const SRC: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<SRC>();
    cpu.write_r8::<DST>(value);
    cpu.fetch(mmu);
}

// ---- 8-bit ALU over registers ----

pub fn add_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    cpu.alu_add(value, false);
    cpu.fetch(mmu);
}

pub fn adc_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    let carry = cpu.registers.cf();
    cpu.alu_add(value, carry);
    cpu.fetch(mmu);
}

pub fn sub_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    cpu.alu_sub(value, false, true);
    cpu.fetch(mmu);
}

pub fn sbc_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    let carry = cpu.registers.cf();
    cpu.alu_sub(value, carry, true);
    cpu.fetch(mmu);
}

pub fn and_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    cpu.alu_and(value);
    cpu.fetch(mmu);
}

pub fn xor_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    cpu.alu_xor(value);
    cpu.fetch(mmu);
}

pub fn or_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    cpu.alu_or(value);
    cpu.fetch(mmu);
}

pub fn cp_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    cpu.alu_sub(value, false, false);
    cpu.fetch(mmu);
}

// ---- 8-bit ALU over (HL) ----

macro_rules! alu_arr {
    ($m0:ident, $m1:ident, $apply:expr) => {
        pub fn $m0<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
            cpu.read(cpu.read_rr::<RR>());
        }

        pub fn $m1<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
            let value = cpu.io.data;
            let apply: fn(&mut Cpu, u8) = $apply;
            apply(cpu, value);
            cpu.fetch(mmu);
        }
    };
}

alu_arr!(add_arr_m0, add_arr_m1, |cpu, v| cpu.alu_add(v, false));
alu_arr!(adc_arr_m0, adc_arr_m1, |cpu, v| {
    let carry = cpu.registers.cf();
    cpu.alu_add(v, carry)
});
alu_arr!(sub_arr_m0, sub_arr_m1, |cpu, v| cpu.alu_sub(v, false, true));
alu_arr!(sbc_arr_m0, sbc_arr_m1, |cpu, v| {
    let carry = cpu.registers.cf();
    cpu.alu_sub(v, carry, true)
});
alu_arr!(and_arr_m0, and_arr_m1, |cpu, v| cpu.alu_and(v));
alu_arr!(xor_arr_m0, xor_arr_m1, |cpu, v| cpu.alu_xor(v));
alu_arr!(or_arr_m0, or_arr_m1, |cpu, v| cpu.alu_or(v));
alu_arr!(cp_arr_m0, cp_arr_m1, |cpu, v| cpu.alu_sub(v, false, false));

// ---- 8-bit ALU over an immediate ----

macro_rules! alu_u {
    ($m0:ident, $m1:ident, $apply:expr) => {
        pub fn $m0(cpu: &mut Cpu, mmu: &mut Memory) {
            cpu.read_pc(mmu);
        }

        pub fn $m1(cpu: &mut Cpu, mmu: &mut Memory) {
            let value = cpu.io.data;
            let apply: fn(&mut Cpu, u8) = $apply;
            apply(cpu, value);
            cpu.fetch(mmu);
        }
    };
}

alu_u!(add_u_m0, add_u_m1, |cpu, v| cpu.alu_add(v, false));
alu_u!(adc_u_m0, adc_u_m1, |cpu, v| {
    let carry = cpu.registers.cf();
    cpu.alu_add(v, carry)
});
alu_u!(sub_u_m0, sub_u_m1, |cpu, v| cpu.alu_sub(v, false, true));
alu_u!(sbc_u_m0, sbc_u_m1, |cpu, v| {
    let carry = cpu.registers.cf();
    cpu.alu_sub(v, carry, true)
});
alu_u!(and_u_m0, and_u_m1, |cpu, v| cpu.alu_and(v));
alu_u!(xor_u_m0, xor_u_m1, |cpu, v| cpu.alu_xor(v));
alu_u!(or_u_m0, or_u_m1, |cpu, v| cpu.alu_or(v));
alu_u!(cp_u_m0, cp_u_m1, |cpu, v| cpu.alu_sub(v, false, false));

// ---- RET / RETI ----

pub fn ret_uu_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    let sp = cpu.registers.sp;
    cpu.read(sp);
    cpu.registers.sp = cpu.idu(mmu, sp, 1);
}

pub fn ret_uu_m1(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.lsb = cpu.io.data;
    let sp = cpu.registers.sp;
    cpu.read(sp);
    cpu.registers.sp = cpu.idu(mmu, sp, 1);
}

pub fn ret_uu_m2(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.msb = cpu.io.data;
    cpu.registers.pc = cpu.uu_from_parts();
}

pub fn ret_uu_m3(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn reti_uu_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    ret_uu_m0(cpu, mmu);
}

pub fn reti_uu_m1(cpu: &mut Cpu, mmu: &mut Memory) {
    ret_uu_m1(cpu, mmu);
}

pub fn reti_uu_m2(cpu: &mut Cpu, mmu: &mut Memory) {
    ret_uu_m2(cpu, mmu);
    // Unlike EI there is no one-instruction delay here.
    cpu.ime = Ime::Enabled;
}

pub fn reti_uu_m3(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn ret_c_uu_m0<const F: u8, const Y: bool>(cpu: &mut Cpu, _mmu: &mut Memory) {
    // Internal cycle: the condition is sampled here.
    cpu.b = cpu.test_flag::<F>() == Y;
}

pub fn ret_c_uu_m1<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    if cpu.b {
        let sp = cpu.registers.sp;
        cpu.read(sp);
        cpu.registers.sp = cpu.idu(mmu, sp, 1);
    } else {
        cpu.fetch(mmu);
    }
}

pub fn ret_c_uu_m2<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.lsb = cpu.io.data;
    let sp = cpu.registers.sp;
    cpu.read(sp);
    cpu.registers.sp = cpu.idu(mmu, sp, 1);
}

pub fn ret_c_uu_m3<const F: u8, const Y: bool>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.msb = cpu.io.data;
    cpu.registers.pc = cpu.uu_from_parts();
}

pub fn ret_c_uu_m4<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- POP / PUSH ----

pub fn pop_rr_m0<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let sp = cpu.registers.sp;
    cpu.read(sp);
    cpu.registers.sp = cpu.idu(mmu, sp, 1);
}

pub fn pop_rr_m1<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.lsb = cpu.io.data;
    let sp = cpu.registers.sp;
    cpu.read(sp);
    cpu.registers.sp = cpu.idu(mmu, sp, 1);
}

pub fn pop_rr_m2<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.msb = cpu.io.data;
    let value = cpu.uu_from_parts();
    cpu.write_rr::<RR>(value);
    cpu.fetch(mmu);
}

pub fn push_rr_m0<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let sp = cpu.registers.sp;
    cpu.registers.sp = cpu.idu(mmu, sp, -1);
}

pub fn push_rr_m1<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let sp = cpu.registers.sp;
    cpu.write(sp, (cpu.read_rr::<RR>() >> 8) as u8);
    cpu.registers.sp = cpu.idu(mmu, sp, -1);
}

pub fn push_rr_m2<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.write(cpu.registers.sp, cpu.read_rr::<RR>() as u8);
}

pub fn push_rr_m3<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- JP ----

pub fn jp_uu_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn jp_uu_m1(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.lsb = cpu.io.data;
    cpu.read_pc(mmu);
}

pub fn jp_uu_m2(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.msb = cpu.io.data;
    cpu.registers.pc = cpu.uu_from_parts();
}

pub fn jp_uu_m3(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn jp_c_uu_m0<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn jp_c_uu_m1<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.lsb = cpu.io.data;
    cpu.read_pc(mmu);
}

pub fn jp_c_uu_m2<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.msb = cpu.io.data;
    if cpu.test_flag::<F>() == Y {
        cpu.registers.pc = cpu.uu_from_parts();
    } else {
        cpu.fetch(mmu);
    }
}

pub fn jp_c_uu_m3<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn jp_rr_m0<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.registers.pc = cpu.read_rr::<RR>();
    cpu.fetch(mmu);
}

// ---- CALL ----

pub fn call_uu_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn call_uu_m1(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.lsb = cpu.io.data;
    cpu.read_pc(mmu);
}

pub fn call_uu_m2(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.msb = cpu.io.data;
    let sp = cpu.registers.sp;
    cpu.registers.sp = cpu.idu(mmu, sp, -1);
}

pub fn call_uu_m3(cpu: &mut Cpu, mmu: &mut Memory) {
    let sp = cpu.registers.sp;
    cpu.write(sp, (cpu.registers.pc >> 8) as u8);
    cpu.registers.sp = cpu.idu(mmu, sp, -1);
}

pub fn call_uu_m4(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.write(cpu.registers.sp, cpu.registers.pc as u8);
    cpu.registers.pc = cpu.uu_from_parts();
}

pub fn call_uu_m5(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn call_c_uu_m0<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn call_c_uu_m1<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.lsb = cpu.io.data;
    cpu.read_pc(mmu);
}

pub fn call_c_uu_m2<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.msb = cpu.io.data;
    if cpu.test_flag::<F>() == Y {
        let sp = cpu.registers.sp;
        cpu.registers.sp = cpu.idu(mmu, sp, -1);
    } else {
        cpu.fetch(mmu);
    }
}

pub fn call_c_uu_m3<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    call_uu_m3(cpu, mmu);
}

pub fn call_c_uu_m4<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    call_uu_m4(cpu, mmu);
}

pub fn call_c_uu_m5<const F: u8, const Y: bool>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- RST ----

pub fn rst_m0<const VEC: u16>(cpu: &mut Cpu, mmu: &mut Memory) {
    let sp = cpu.registers.sp;
    cpu.registers.sp = cpu.idu(mmu, sp, -1);
}

pub fn rst_m1<const VEC: u16>(cpu: &mut Cpu, mmu: &mut Memory) {
    let sp = cpu.registers.sp;
    cpu.write(sp, (cpu.registers.pc >> 8) as u8);
    cpu.registers.sp = cpu.idu(mmu, sp, -1);
}

pub fn rst_m2<const VEC: u16>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.write(cpu.registers.sp, cpu.registers.pc as u8);
    cpu.registers.pc = VEC;
}

pub fn rst_m3<const VEC: u16>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- CB prefix ----

pub fn cb_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch_cb(mmu);
}

// ---- LDH ----

pub fn ldh_an_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn ldh_an_r_m1<const R: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    let address = 0xFF00 | cpu.io.data as u16;
    cpu.write(address, cpu.read_r8::<R>());
}

pub fn ldh_an_r_m2<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn ldh_r_an_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn ldh_r_an_m1<const R: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.read(0xFF00 | cpu.io.data as u16);
}

pub fn ldh_r_an_m2<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.io.data;
    cpu.write_r8::<R>(value);
    cpu.fetch(mmu);
}

pub fn ldh_ar_r_m0<const RA: u8, const R: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    let address = 0xFF00 | cpu.read_r8::<RA>() as u16;
    cpu.write(address, cpu.read_r8::<R>());
}

pub fn ldh_ar_r_m1<const RA: u8, const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn ldh_r_ar_m0<const R: u8, const RA: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.read(0xFF00 | cpu.read_r8::<RA>() as u16);
}

pub fn ldh_r_ar_m1<const R: u8, const RA: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.io.data;
    cpu.write_r8::<R>(value);
    cpu.fetch(mmu);
}

// ---- LD (u16), A / LD A, (u16) ----

pub fn ld_ann_r_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn ld_ann_r_m1<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.lsb = cpu.io.data;
    cpu.read_pc(mmu);
}

pub fn ld_ann_r_m2<const R: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.msb = cpu.io.data;
    cpu.write(cpu.uu_from_parts(), cpu.read_r8::<R>());
}

pub fn ld_ann_r_m3<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn ld_r_ann_m0<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn ld_r_ann_m1<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.lsb = cpu.io.data;
    cpu.read_pc(mmu);
}

pub fn ld_r_ann_m2<const R: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.msb = cpu.io.data;
    cpu.read(cpu.uu_from_parts());
}

pub fn ld_r_ann_m3<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.io.data;
    cpu.write_r8::<R>(value);
    cpu.fetch(mmu);
}

// ---- SP arithmetic ----

pub fn add_rr_s_m0<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn add_rr_s_m1<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.u = cpu.io.data;
}

pub fn add_rr_s_m2<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    let offset = cpu.u;
    let result = cpu.sp_plus_signed(offset);
    cpu.write_rr::<RR>(result);
}

pub fn add_rr_s_m3<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn ld_rr_rrs_m0<const DST: u8, const SRC: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.read_pc(mmu);
}

pub fn ld_rr_rrs_m1<const DST: u8, const SRC: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    let offset = cpu.io.data;
    let result = cpu.sp_plus_signed(offset);
    cpu.write_rr::<DST>(result);
}

pub fn ld_rr_rrs_m2<const DST: u8, const SRC: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn ld_rr_rr_m0<const DST: u8, const SRC: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    let value = cpu.read_rr::<SRC>();
    cpu.write_rr::<DST>(value);
}

pub fn ld_rr_rr_m1<const DST: u8, const SRC: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- IME control ----

pub fn di_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.ime = Ime::Disabled;
    cpu.fetch(mmu);
}

pub fn ei_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.request_ime();
    cpu.fetch(mmu);
}

// ---- Illegal opcodes ----

/// Undefined opcodes jam the CPU: the slot re-selects itself every
/// M-cycle and, since the counter never returns to a fetch boundary,
/// no interrupt can ever be dispatched again.
pub fn invalid_m0(cpu: &mut Cpu, _mmu: &mut Memory) {
    log::trace!("CPU locked by an undefined opcode at {:#06X}", cpu.registers.pc);
    cpu.micro.index -= 1;
    cpu.micro.counter = 1;
}

/// Filler for unused table slots. Such a slot is unreachable when the
/// tables are consistent; release builds recover by fetching.
pub fn unused_slot(cpu: &mut Cpu, mmu: &mut Memory) {
    debug_assert!(false, "executed a micro-op slot past the end of an instruction");
    cpu.fetch(mmu);
}

// ---- CB-prefixed ----

macro_rules! cb_unary_r {
    ($name:ident, $alu:ident) => {
        pub fn $name<const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
            let value = cpu.read_r8::<R>();
            let result = cpu.$alu(value);
            cpu.write_r8::<R>(result);
            cpu.fetch(mmu);
        }
    };
}

cb_unary_r!(rlc_r_m0, alu_rlc);
cb_unary_r!(rrc_r_m0, alu_rrc);
cb_unary_r!(rl_r_m0, alu_rl);
cb_unary_r!(rr_r_m0, alu_rr);
cb_unary_r!(sla_r_m0, alu_sla);
cb_unary_r!(sra_r_m0, alu_sra);
cb_unary_r!(swap_r_m0, alu_swap);
cb_unary_r!(srl_r_m0, alu_srl);

macro_rules! cb_unary_arr {
    ($m0:ident, $m1:ident, $m2:ident, $alu:ident) => {
        pub fn $m0<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
            cpu.read(cpu.read_rr::<RR>());
        }

        pub fn $m1<const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
            let value = cpu.io.data;
            let result = cpu.$alu(value);
            cpu.write(cpu.read_rr::<RR>(), result);
        }

        pub fn $m2<const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
            cpu.fetch(mmu);
        }
    };
}

cb_unary_arr!(rlc_arr_m0, rlc_arr_m1, rlc_arr_m2, alu_rlc);
cb_unary_arr!(rrc_arr_m0, rrc_arr_m1, rrc_arr_m2, alu_rrc);
cb_unary_arr!(rl_arr_m0, rl_arr_m1, rl_arr_m2, alu_rl);
cb_unary_arr!(rr_arr_m0, rr_arr_m1, rr_arr_m2, alu_rr);
cb_unary_arr!(sla_arr_m0, sla_arr_m1, sla_arr_m2, alu_sla);
cb_unary_arr!(sra_arr_m0, sra_arr_m1, sra_arr_m2, alu_sra);
cb_unary_arr!(swap_arr_m0, swap_arr_m1, swap_arr_m2, alu_swap);
cb_unary_arr!(srl_arr_m0, srl_arr_m1, srl_arr_m2, alu_srl);

pub fn bit_r_m0<const N: u8, const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    cpu.registers.set_zf(value & (1 << N) == 0);
    cpu.registers.set_n(false);
    cpu.registers.set_h(true);
    cpu.fetch(mmu);
}

pub fn bit_arr_m0<const N: u8, const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.read(cpu.read_rr::<RR>());
}

pub fn bit_arr_m1<const N: u8, const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.io.data;
    cpu.registers.set_zf(value & (1 << N) == 0);
    cpu.registers.set_n(false);
    cpu.registers.set_h(true);
    cpu.fetch(mmu);
}

pub fn res_r_m0<const N: u8, const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    cpu.write_r8::<R>(value & !(1 << N));
    cpu.fetch(mmu);
}

pub fn res_arr_m0<const N: u8, const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.read(cpu.read_rr::<RR>());
}

pub fn res_arr_m1<const N: u8, const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    let value = cpu.io.data;
    cpu.write(cpu.read_rr::<RR>(), value & !(1 << N));
}

pub fn res_arr_m2<const N: u8, const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

pub fn set_r_m0<const N: u8, const R: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    let value = cpu.read_r8::<R>();
    cpu.write_r8::<R>(value | (1 << N));
    cpu.fetch(mmu);
}

pub fn set_arr_m0<const N: u8, const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    cpu.read(cpu.read_rr::<RR>());
}

pub fn set_arr_m1<const N: u8, const RR: u8>(cpu: &mut Cpu, _mmu: &mut Memory) {
    let value = cpu.io.data;
    cpu.write(cpu.read_rr::<RR>(), value | (1 << N));
}

pub fn set_arr_m2<const N: u8, const RR: u8>(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.fetch(mmu);
}

// ---- ISR sequence ----

pub fn isr_m0(cpu: &mut Cpu, mmu: &mut Memory) {
    // Undo the PC increment of the fetch this dispatch replaced.
    let pc = cpu.registers.pc;
    cpu.registers.pc = cpu.idu(mmu, pc, -1);
}

pub fn isr_m1(cpu: &mut Cpu, mmu: &mut Memory) {
    let sp = cpu.registers.sp;
    cpu.registers.sp = cpu.idu(mmu, sp, -1);
}

pub fn isr_m2(cpu: &mut Cpu, mmu: &mut Memory) {
    let sp = cpu.registers.sp;
    cpu.write(sp, (cpu.registers.pc >> 8) as u8);
    cpu.registers.sp = cpu.idu(mmu, sp, -1);
}

pub fn isr_m3(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.write(cpu.registers.sp, cpu.registers.pc as u8);

    // The vector is decided this late: if IE/IF changed since the
    // trigger (the high push can overwrite IE), the dispatch can be
    // redirected or cancelled to 0x0000 outright.
    let pending = mmu.interrupts.pending();
    if pending.is_empty() {
        cpu.uu = 0x0000;
    } else {
        let chosen = pending.highest_priority();
        mmu.interrupts.interrupt_flag.remove(chosen);
        cpu.uu = chosen.vector();
    }
}

pub fn isr_m4(cpu: &mut Cpu, mmu: &mut Memory) {
    cpu.ime = Ime::Disabled;
    cpu.interrupt.state = InterruptState::None;
    cpu.registers.pc = cpu.uu;
    cpu.fetch(mmu);
}
