//! The three micro-op tables: 256 base opcodes, 256 CB-prefixed
//! opcodes and the five-cycle interrupt dispatch sequence. Every row
//! is padded to [`INSTR_LEN`] slots; the tail micro-op of each real
//! sequence performs the next fetch, so the padding is unreachable.

use crate::hardware::cpu::microops::{self as m, flag, reg, reg16};
use crate::hardware::cpu::MicroOp;

/// Upper bound on micro-ops per instruction.
pub const INSTR_LEN: usize = 6;

/// Which table the micro-op cursor walks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OpTable {
    Main = 0,
    Cb = 1,
    Isr = 2,
}

/// Resolve a cursor position to the micro-op it selects. An index
/// outside the table (possible only through a corrupted state file in
/// release builds) degrades to the fetch-recovering filler.
pub fn lookup(table: OpTable, index: u16) -> MicroOp {
    let index = index as usize;
    let slot = match table {
        OpTable::Main => INSTRUCTIONS
            .get(index / INSTR_LEN)
            .map(|row| row[index % INSTR_LEN]),
        OpTable::Cb => INSTRUCTIONS_CB
            .get(index / INSTR_LEN)
            .map(|row| row[index % INSTR_LEN]),
        OpTable::Isr => ISR.get(index).copied(),
    };
    slot.unwrap_or(m::unused_slot as MicroOp)
}

macro_rules! row {
    ($a:expr) => {
        [$a, m::unused_slot, m::unused_slot, m::unused_slot, m::unused_slot, m::unused_slot]
    };
    ($a:expr, $b:expr) => {
        [$a, $b, m::unused_slot, m::unused_slot, m::unused_slot, m::unused_slot]
    };
    ($a:expr, $b:expr, $c:expr) => {
        [$a, $b, $c, m::unused_slot, m::unused_slot, m::unused_slot]
    };
    ($a:expr, $b:expr, $c:expr, $d:expr) => {
        [$a, $b, $c, $d, m::unused_slot, m::unused_slot]
    };
    ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr) => {
        [$a, $b, $c, $d, $e, m::unused_slot]
    };
    ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr, $f:expr) => {
        [$a, $b, $c, $d, $e, $f]
    };
}

#[rustfmt::skip]
pub static INSTRUCTIONS: [[MicroOp; INSTR_LEN]; 256] = [
    /* 00 */ row![m::nop_m0],
    /* 01 */ row![m::ld_rr_uu_m0::<{ reg16::BC }>, m::ld_rr_uu_m1::<{ reg16::BC }>, m::ld_rr_uu_m2::<{ reg16::BC }>],
    /* 02 */ row![m::ld_arr_r_m0::<{ reg16::BC }, { reg::A }>, m::ld_arr_r_m1::<{ reg16::BC }, { reg::A }>],
    /* 03 */ row![m::inc_rr_m0::<{ reg16::BC }>, m::inc_rr_m1::<{ reg16::BC }>],
    /* 04 */ row![m::inc_r_m0::<{ reg::B }>],
    /* 05 */ row![m::dec_r_m0::<{ reg::B }>],
    /* 06 */ row![m::ld_r_u_m0::<{ reg::B }>, m::ld_r_u_m1::<{ reg::B }>],
    /* 07 */ row![m::rlca_m0],
    /* 08 */ row![m::ld_ann_rr_m0::<{ reg16::SP }>, m::ld_ann_rr_m1::<{ reg16::SP }>, m::ld_ann_rr_m2::<{ reg16::SP }>, m::ld_ann_rr_m3::<{ reg16::SP }>, m::ld_ann_rr_m4::<{ reg16::SP }>],
    /* 09 */ row![m::add_rr_rr_m0::<{ reg16::HL }, { reg16::BC }>, m::add_rr_rr_m1::<{ reg16::HL }, { reg16::BC }>],
    /* 0A */ row![m::ld_r_arr_m0::<{ reg::A }, { reg16::BC }>, m::ld_r_arr_m1::<{ reg::A }, { reg16::BC }>],
    /* 0B */ row![m::dec_rr_m0::<{ reg16::BC }>, m::dec_rr_m1::<{ reg16::BC }>],
    /* 0C */ row![m::inc_r_m0::<{ reg::C }>],
    /* 0D */ row![m::dec_r_m0::<{ reg::C }>],
    /* 0E */ row![m::ld_r_u_m0::<{ reg::C }>, m::ld_r_u_m1::<{ reg::C }>],
    /* 0F */ row![m::rrca_m0],
    /* 10 */ row![m::stop_m0, m::stop_m1],
    /* 11 */ row![m::ld_rr_uu_m0::<{ reg16::DE }>, m::ld_rr_uu_m1::<{ reg16::DE }>, m::ld_rr_uu_m2::<{ reg16::DE }>],
    /* 12 */ row![m::ld_arr_r_m0::<{ reg16::DE }, { reg::A }>, m::ld_arr_r_m1::<{ reg16::DE }, { reg::A }>],
    /* 13 */ row![m::inc_rr_m0::<{ reg16::DE }>, m::inc_rr_m1::<{ reg16::DE }>],
    /* 14 */ row![m::inc_r_m0::<{ reg::D }>],
    /* 15 */ row![m::dec_r_m0::<{ reg::D }>],
    /* 16 */ row![m::ld_r_u_m0::<{ reg::D }>, m::ld_r_u_m1::<{ reg::D }>],
    /* 17 */ row![m::rla_m0],
    /* 18 */ row![m::jr_s_m0, m::jr_s_m1, m::jr_s_m2],
    /* 19 */ row![m::add_rr_rr_m0::<{ reg16::HL }, { reg16::DE }>, m::add_rr_rr_m1::<{ reg16::HL }, { reg16::DE }>],
    /* 1A */ row![m::ld_r_arr_m0::<{ reg::A }, { reg16::DE }>, m::ld_r_arr_m1::<{ reg::A }, { reg16::DE }>],
    /* 1B */ row![m::dec_rr_m0::<{ reg16::DE }>, m::dec_rr_m1::<{ reg16::DE }>],
    /* 1C */ row![m::inc_r_m0::<{ reg::E }>],
    /* 1D */ row![m::dec_r_m0::<{ reg::E }>],
    /* 1E */ row![m::ld_r_u_m0::<{ reg::E }>, m::ld_r_u_m1::<{ reg::E }>],
    /* 1F */ row![m::rra_m0],
    /* 20 */ row![m::jr_c_s_m0::<{ flag::Z }, false>, m::jr_c_s_m1::<{ flag::Z }, false>, m::jr_c_s_m2::<{ flag::Z }, false>],
    /* 21 */ row![m::ld_rr_uu_m0::<{ reg16::HL }>, m::ld_rr_uu_m1::<{ reg16::HL }>, m::ld_rr_uu_m2::<{ reg16::HL }>],
    /* 22 */ row![m::ld_arri_r_m0::<1>, m::ld_arri_r_m1::<1>],
    /* 23 */ row![m::inc_rr_m0::<{ reg16::HL }>, m::inc_rr_m1::<{ reg16::HL }>],
    /* 24 */ row![m::inc_r_m0::<{ reg::H }>],
    /* 25 */ row![m::dec_r_m0::<{ reg::H }>],
    /* 26 */ row![m::ld_r_u_m0::<{ reg::H }>, m::ld_r_u_m1::<{ reg::H }>],
    /* 27 */ row![m::daa_m0],
    /* 28 */ row![m::jr_c_s_m0::<{ flag::Z }, true>, m::jr_c_s_m1::<{ flag::Z }, true>, m::jr_c_s_m2::<{ flag::Z }, true>],
    /* 29 */ row![m::add_rr_rr_m0::<{ reg16::HL }, { reg16::HL }>, m::add_rr_rr_m1::<{ reg16::HL }, { reg16::HL }>],
    /* 2A */ row![m::ld_r_arri_m0::<1>, m::ld_r_arri_m1::<1>],
    /* 2B */ row![m::dec_rr_m0::<{ reg16::HL }>, m::dec_rr_m1::<{ reg16::HL }>],
    /* 2C */ row![m::inc_r_m0::<{ reg::L }>],
    /* 2D */ row![m::dec_r_m0::<{ reg::L }>],
    /* 2E */ row![m::ld_r_u_m0::<{ reg::L }>, m::ld_r_u_m1::<{ reg::L }>],
    /* 2F */ row![m::cpl_m0],
    /* 30 */ row![m::jr_c_s_m0::<{ flag::C }, false>, m::jr_c_s_m1::<{ flag::C }, false>, m::jr_c_s_m2::<{ flag::C }, false>],
    /* 31 */ row![m::ld_rr_uu_m0::<{ reg16::SP }>, m::ld_rr_uu_m1::<{ reg16::SP }>, m::ld_rr_uu_m2::<{ reg16::SP }>],
    /* 32 */ row![m::ld_arri_r_m0::<{ -1 }>, m::ld_arri_r_m1::<{ -1 }>],
    /* 33 */ row![m::inc_rr_m0::<{ reg16::SP }>, m::inc_rr_m1::<{ reg16::SP }>],
    /* 34 */ row![m::inc_arr_m0::<{ reg16::HL }>, m::inc_arr_m1::<{ reg16::HL }>, m::inc_arr_m2::<{ reg16::HL }>],
    /* 35 */ row![m::dec_arr_m0::<{ reg16::HL }>, m::dec_arr_m1::<{ reg16::HL }>, m::dec_arr_m2::<{ reg16::HL }>],
    /* 36 */ row![m::ld_arr_u_m0::<{ reg16::HL }>, m::ld_arr_u_m1::<{ reg16::HL }>, m::ld_arr_u_m2::<{ reg16::HL }>],
    /* 37 */ row![m::scf_m0],
    /* 38 */ row![m::jr_c_s_m0::<{ flag::C }, true>, m::jr_c_s_m1::<{ flag::C }, true>, m::jr_c_s_m2::<{ flag::C }, true>],
    /* 39 */ row![m::add_rr_rr_m0::<{ reg16::HL }, { reg16::SP }>, m::add_rr_rr_m1::<{ reg16::HL }, { reg16::SP }>],
    /* 3A */ row![m::ld_r_arri_m0::<{ -1 }>, m::ld_r_arri_m1::<{ -1 }>],
    /* 3B */ row![m::dec_rr_m0::<{ reg16::SP }>, m::dec_rr_m1::<{ reg16::SP }>],
    /* 3C */ row![m::inc_r_m0::<{ reg::A }>],
    /* 3D */ row![m::dec_r_m0::<{ reg::A }>],
    /* 3E */ row![m::ld_r_u_m0::<{ reg::A }>, m::ld_r_u_m1::<{ reg::A }>],
    /* 3F */ row![m::ccf_m0],
    /* 40 */ row![m::ld_r_r_m0::<{ reg::B }, { reg::B }>],
    /* 41 */ row![m::ld_r_r_m0::<{ reg::B }, { reg::C }>],
    /* 42 */ row![m::ld_r_r_m0::<{ reg::B }, { reg::D }>],
    /* 43 */ row![m::ld_r_r_m0::<{ reg::B }, { reg::E }>],
    /* 44 */ row![m::ld_r_r_m0::<{ reg::B }, { reg::H }>],
    /* 45 */ row![m::ld_r_r_m0::<{ reg::B }, { reg::L }>],
    /* 46 */ row![m::ld_r_arr_m0::<{ reg::B }, { reg16::HL }>, m::ld_r_arr_m1::<{ reg::B }, { reg16::HL }>],
    /* 47 */ row![m::ld_r_r_m0::<{ reg::B }, { reg::A }>],
    /* 48 */ row![m::ld_r_r_m0::<{ reg::C }, { reg::B }>],
    /* 49 */ row![m::ld_r_r_m0::<{ reg::C }, { reg::C }>],
    /* 4A */ row![m::ld_r_r_m0::<{ reg::C }, { reg::D }>],
    /* 4B */ row![m::ld_r_r_m0::<{ reg::C }, { reg::E }>],
    /* 4C */ row![m::ld_r_r_m0::<{ reg::C }, { reg::H }>],
    /* 4D */ row![m::ld_r_r_m0::<{ reg::C }, { reg::L }>],
    /* 4E */ row![m::ld_r_arr_m0::<{ reg::C }, { reg16::HL }>, m::ld_r_arr_m1::<{ reg::C }, { reg16::HL }>],
    /* 4F */ row![m::ld_r_r_m0::<{ reg::C }, { reg::A }>],
    /* 50 */ row![m::ld_r_r_m0::<{ reg::D }, { reg::B }>],
    /* 51 */ row![m::ld_r_r_m0::<{ reg::D }, { reg::C }>],
    /* 52 */ row![m::ld_r_r_m0::<{ reg::D }, { reg::D }>],
    /* 53 */ row![m::ld_r_r_m0::<{ reg::D }, { reg::E }>],
    /* 54 */ row![m::ld_r_r_m0::<{ reg::D }, { reg::H }>],
    /* 55 */ row![m::ld_r_r_m0::<{ reg::D }, { reg::L }>],
    /* 56 */ row![m::ld_r_arr_m0::<{ reg::D }, { reg16::HL }>, m::ld_r_arr_m1::<{ reg::D }, { reg16::HL }>],
    /* 57 */ row![m::ld_r_r_m0::<{ reg::D }, { reg::A }>],
    /* 58 */ row![m::ld_r_r_m0::<{ reg::E }, { reg::B }>],
    /* 59 */ row![m::ld_r_r_m0::<{ reg::E }, { reg::C }>],
    /* 5A */ row![m::ld_r_r_m0::<{ reg::E }, { reg::D }>],
    /* 5B */ row![m::ld_r_r_m0::<{ reg::E }, { reg::E }>],
    /* 5C */ row![m::ld_r_r_m0::<{ reg::E }, { reg::H }>],
    /* 5D */ row![m::ld_r_r_m0::<{ reg::E }, { reg::L }>],
    /* 5E */ row![m::ld_r_arr_m0::<{ reg::E }, { reg16::HL }>, m::ld_r_arr_m1::<{ reg::E }, { reg16::HL }>],
    /* 5F */ row![m::ld_r_r_m0::<{ reg::E }, { reg::A }>],
    /* 60 */ row![m::ld_r_r_m0::<{ reg::H }, { reg::B }>],
    /* 61 */ row![m::ld_r_r_m0::<{ reg::H }, { reg::C }>],
    /* 62 */ row![m::ld_r_r_m0::<{ reg::H }, { reg::D }>],
    /* 63 */ row![m::ld_r_r_m0::<{ reg::H }, { reg::E }>],
    /* 64 */ row![m::ld_r_r_m0::<{ reg::H }, { reg::H }>],
    /* 65 */ row![m::ld_r_r_m0::<{ reg::H }, { reg::L }>],
    /* 66 */ row![m::ld_r_arr_m0::<{ reg::H }, { reg16::HL }>, m::ld_r_arr_m1::<{ reg::H }, { reg16::HL }>],
    /* 67 */ row![m::ld_r_r_m0::<{ reg::H }, { reg::A }>],
    /* 68 */ row![m::ld_r_r_m0::<{ reg::L }, { reg::B }>],
    /* 69 */ row![m::ld_r_r_m0::<{ reg::L }, { reg::C }>],
    /* 6A */ row![m::ld_r_r_m0::<{ reg::L }, { reg::D }>],
    /* 6B */ row![m::ld_r_r_m0::<{ reg::L }, { reg::E }>],
    /* 6C */ row![m::ld_r_r_m0::<{ reg::L }, { reg::H }>],
    /* 6D */ row![m::ld_r_r_m0::<{ reg::L }, { reg::L }>],
    /* 6E */ row![m::ld_r_arr_m0::<{ reg::L }, { reg16::HL }>, m::ld_r_arr_m1::<{ reg::L }, { reg16::HL }>],
    /* 6F */ row![m::ld_r_r_m0::<{ reg::L }, { reg::A }>],
    /* 70 */ row![m::ld_arr_r_m0::<{ reg16::HL }, { reg::B }>, m::ld_arr_r_m1::<{ reg16::HL }, { reg::B }>],
    /* 71 */ row![m::ld_arr_r_m0::<{ reg16::HL }, { reg::C }>, m::ld_arr_r_m1::<{ reg16::HL }, { reg::C }>],
    /* 72 */ row![m::ld_arr_r_m0::<{ reg16::HL }, { reg::D }>, m::ld_arr_r_m1::<{ reg16::HL }, { reg::D }>],
    /* 73 */ row![m::ld_arr_r_m0::<{ reg16::HL }, { reg::E }>, m::ld_arr_r_m1::<{ reg16::HL }, { reg::E }>],
    /* 74 */ row![m::ld_arr_r_m0::<{ reg16::HL }, { reg::H }>, m::ld_arr_r_m1::<{ reg16::HL }, { reg::H }>],
    /* 75 */ row![m::ld_arr_r_m0::<{ reg16::HL }, { reg::L }>, m::ld_arr_r_m1::<{ reg16::HL }, { reg::L }>],
    /* 76 */ row![m::halt_m0],
    /* 77 */ row![m::ld_arr_r_m0::<{ reg16::HL }, { reg::A }>, m::ld_arr_r_m1::<{ reg16::HL }, { reg::A }>],
    /* 78 */ row![m::ld_r_r_m0::<{ reg::A }, { reg::B }>],
    /* 79 */ row![m::ld_r_r_m0::<{ reg::A }, { reg::C }>],
    /* 7A */ row![m::ld_r_r_m0::<{ reg::A }, { reg::D }>],
    /* 7B */ row![m::ld_r_r_m0::<{ reg::A }, { reg::E }>],
    /* 7C */ row![m::ld_r_r_m0::<{ reg::A }, { reg::H }>],
    /* 7D */ row![m::ld_r_r_m0::<{ reg::A }, { reg::L }>],
    /* 7E */ row![m::ld_r_arr_m0::<{ reg::A }, { reg16::HL }>, m::ld_r_arr_m1::<{ reg::A }, { reg16::HL }>],
    /* 7F */ row![m::ld_r_r_m0::<{ reg::A }, { reg::A }>],
    /* 80 */ row![m::add_r_m0::<{ reg::B }>],
    /* 81 */ row![m::add_r_m0::<{ reg::C }>],
    /* 82 */ row![m::add_r_m0::<{ reg::D }>],
    /* 83 */ row![m::add_r_m0::<{ reg::E }>],
    /* 84 */ row![m::add_r_m0::<{ reg::H }>],
    /* 85 */ row![m::add_r_m0::<{ reg::L }>],
    /* 86 */ row![m::add_arr_m0::<{ reg16::HL }>, m::add_arr_m1::<{ reg16::HL }>],
    /* 87 */ row![m::add_r_m0::<{ reg::A }>],
    /* 88 */ row![m::adc_r_m0::<{ reg::B }>],
    /* 89 */ row![m::adc_r_m0::<{ reg::C }>],
    /* 8A */ row![m::adc_r_m0::<{ reg::D }>],
    /* 8B */ row![m::adc_r_m0::<{ reg::E }>],
    /* 8C */ row![m::adc_r_m0::<{ reg::H }>],
    /* 8D */ row![m::adc_r_m0::<{ reg::L }>],
    /* 8E */ row![m::adc_arr_m0::<{ reg16::HL }>, m::adc_arr_m1::<{ reg16::HL }>],
    /* 8F */ row![m::adc_r_m0::<{ reg::A }>],
    /* 90 */ row![m::sub_r_m0::<{ reg::B }>],
    /* 91 */ row![m::sub_r_m0::<{ reg::C }>],
    /* 92 */ row![m::sub_r_m0::<{ reg::D }>],
    /* 93 */ row![m::sub_r_m0::<{ reg::E }>],
    /* 94 */ row![m::sub_r_m0::<{ reg::H }>],
    /* 95 */ row![m::sub_r_m0::<{ reg::L }>],
    /* 96 */ row![m::sub_arr_m0::<{ reg16::HL }>, m::sub_arr_m1::<{ reg16::HL }>],
    /* 97 */ row![m::sub_r_m0::<{ reg::A }>],
    /* 98 */ row![m::sbc_r_m0::<{ reg::B }>],
    /* 99 */ row![m::sbc_r_m0::<{ reg::C }>],
    /* 9A */ row![m::sbc_r_m0::<{ reg::D }>],
    /* 9B */ row![m::sbc_r_m0::<{ reg::E }>],
    /* 9C */ row![m::sbc_r_m0::<{ reg::H }>],
    /* 9D */ row![m::sbc_r_m0::<{ reg::L }>],
    /* 9E */ row![m::sbc_arr_m0::<{ reg16::HL }>, m::sbc_arr_m1::<{ reg16::HL }>],
    /* 9F */ row![m::sbc_r_m0::<{ reg::A }>],
    /* A0 */ row![m::and_r_m0::<{ reg::B }>],
    /* A1 */ row![m::and_r_m0::<{ reg::C }>],
    /* A2 */ row![m::and_r_m0::<{ reg::D }>],
    /* A3 */ row![m::and_r_m0::<{ reg::E }>],
    /* A4 */ row![m::and_r_m0::<{ reg::H }>],
    /* A5 */ row![m::and_r_m0::<{ reg::L }>],
    /* A6 */ row![m::and_arr_m0::<{ reg16::HL }>, m::and_arr_m1::<{ reg16::HL }>],
    /* A7 */ row![m::and_r_m0::<{ reg::A }>],
    /* A8 */ row![m::xor_r_m0::<{ reg::B }>],
    /* A9 */ row![m::xor_r_m0::<{ reg::C }>],
    /* AA */ row![m::xor_r_m0::<{ reg::D }>],
    /* AB */ row![m::xor_r_m0::<{ reg::E }>],
    /* AC */ row![m::xor_r_m0::<{ reg::H }>],
    /* AD */ row![m::xor_r_m0::<{ reg::L }>],
    /* AE */ row![m::xor_arr_m0::<{ reg16::HL }>, m::xor_arr_m1::<{ reg16::HL }>],
    /* AF */ row![m::xor_r_m0::<{ reg::A }>],
    /* B0 */ row![m::or_r_m0::<{ reg::B }>],
    /* B1 */ row![m::or_r_m0::<{ reg::C }>],
    /* B2 */ row![m::or_r_m0::<{ reg::D }>],
    /* B3 */ row![m::or_r_m0::<{ reg::E }>],
    /* B4 */ row![m::or_r_m0::<{ reg::H }>],
    /* B5 */ row![m::or_r_m0::<{ reg::L }>],
    /* B6 */ row![m::or_arr_m0::<{ reg16::HL }>, m::or_arr_m1::<{ reg16::HL }>],
    /* B7 */ row![m::or_r_m0::<{ reg::A }>],
    /* B8 */ row![m::cp_r_m0::<{ reg::B }>],
    /* B9 */ row![m::cp_r_m0::<{ reg::C }>],
    /* BA */ row![m::cp_r_m0::<{ reg::D }>],
    /* BB */ row![m::cp_r_m0::<{ reg::E }>],
    /* BC */ row![m::cp_r_m0::<{ reg::H }>],
    /* BD */ row![m::cp_r_m0::<{ reg::L }>],
    /* BE */ row![m::cp_arr_m0::<{ reg16::HL }>, m::cp_arr_m1::<{ reg16::HL }>],
    /* BF */ row![m::cp_r_m0::<{ reg::A }>],
    /* C0 */ row![m::ret_c_uu_m0::<{ flag::Z }, false>, m::ret_c_uu_m1::<{ flag::Z }, false>, m::ret_c_uu_m2::<{ flag::Z }, false>, m::ret_c_uu_m3::<{ flag::Z }, false>, m::ret_c_uu_m4::<{ flag::Z }, false>],
    /* C1 */ row![m::pop_rr_m0::<{ reg16::BC }>, m::pop_rr_m1::<{ reg16::BC }>, m::pop_rr_m2::<{ reg16::BC }>],
    /* C2 */ row![m::jp_c_uu_m0::<{ flag::Z }, false>, m::jp_c_uu_m1::<{ flag::Z }, false>, m::jp_c_uu_m2::<{ flag::Z }, false>, m::jp_c_uu_m3::<{ flag::Z }, false>],
    /* C3 */ row![m::jp_uu_m0, m::jp_uu_m1, m::jp_uu_m2, m::jp_uu_m3],
    /* C4 */ row![m::call_c_uu_m0::<{ flag::Z }, false>, m::call_c_uu_m1::<{ flag::Z }, false>, m::call_c_uu_m2::<{ flag::Z }, false>, m::call_c_uu_m3::<{ flag::Z }, false>, m::call_c_uu_m4::<{ flag::Z }, false>, m::call_c_uu_m5::<{ flag::Z }, false>],
    /* C5 */ row![m::push_rr_m0::<{ reg16::BC }>, m::push_rr_m1::<{ reg16::BC }>, m::push_rr_m2::<{ reg16::BC }>, m::push_rr_m3::<{ reg16::BC }>],
    /* C6 */ row![m::add_u_m0, m::add_u_m1],
    /* C7 */ row![m::rst_m0::<0x00>, m::rst_m1::<0x00>, m::rst_m2::<0x00>, m::rst_m3::<0x00>],
    /* C8 */ row![m::ret_c_uu_m0::<{ flag::Z }, true>, m::ret_c_uu_m1::<{ flag::Z }, true>, m::ret_c_uu_m2::<{ flag::Z }, true>, m::ret_c_uu_m3::<{ flag::Z }, true>, m::ret_c_uu_m4::<{ flag::Z }, true>],
    /* C9 */ row![m::ret_uu_m0, m::ret_uu_m1, m::ret_uu_m2, m::ret_uu_m3],
    /* CA */ row![m::jp_c_uu_m0::<{ flag::Z }, true>, m::jp_c_uu_m1::<{ flag::Z }, true>, m::jp_c_uu_m2::<{ flag::Z }, true>, m::jp_c_uu_m3::<{ flag::Z }, true>],
    /* CB */ row![m::cb_m0],
    /* CC */ row![m::call_c_uu_m0::<{ flag::Z }, true>, m::call_c_uu_m1::<{ flag::Z }, true>, m::call_c_uu_m2::<{ flag::Z }, true>, m::call_c_uu_m3::<{ flag::Z }, true>, m::call_c_uu_m4::<{ flag::Z }, true>, m::call_c_uu_m5::<{ flag::Z }, true>],
    /* CD */ row![m::call_uu_m0, m::call_uu_m1, m::call_uu_m2, m::call_uu_m3, m::call_uu_m4, m::call_uu_m5],
    /* CE */ row![m::adc_u_m0, m::adc_u_m1],
    /* CF */ row![m::rst_m0::<0x08>, m::rst_m1::<0x08>, m::rst_m2::<0x08>, m::rst_m3::<0x08>],
    /* D0 */ row![m::ret_c_uu_m0::<{ flag::C }, false>, m::ret_c_uu_m1::<{ flag::C }, false>, m::ret_c_uu_m2::<{ flag::C }, false>, m::ret_c_uu_m3::<{ flag::C }, false>, m::ret_c_uu_m4::<{ flag::C }, false>],
    /* D1 */ row![m::pop_rr_m0::<{ reg16::DE }>, m::pop_rr_m1::<{ reg16::DE }>, m::pop_rr_m2::<{ reg16::DE }>],
    /* D2 */ row![m::jp_c_uu_m0::<{ flag::C }, false>, m::jp_c_uu_m1::<{ flag::C }, false>, m::jp_c_uu_m2::<{ flag::C }, false>, m::jp_c_uu_m3::<{ flag::C }, false>],
    /* D3 */ row![m::invalid_m0],
    /* D4 */ row![m::call_c_uu_m0::<{ flag::C }, false>, m::call_c_uu_m1::<{ flag::C }, false>, m::call_c_uu_m2::<{ flag::C }, false>, m::call_c_uu_m3::<{ flag::C }, false>, m::call_c_uu_m4::<{ flag::C }, false>, m::call_c_uu_m5::<{ flag::C }, false>],
    /* D5 */ row![m::push_rr_m0::<{ reg16::DE }>, m::push_rr_m1::<{ reg16::DE }>, m::push_rr_m2::<{ reg16::DE }>, m::push_rr_m3::<{ reg16::DE }>],
    /* D6 */ row![m::sub_u_m0, m::sub_u_m1],
    /* D7 */ row![m::rst_m0::<0x10>, m::rst_m1::<0x10>, m::rst_m2::<0x10>, m::rst_m3::<0x10>],
    /* D8 */ row![m::ret_c_uu_m0::<{ flag::C }, true>, m::ret_c_uu_m1::<{ flag::C }, true>, m::ret_c_uu_m2::<{ flag::C }, true>, m::ret_c_uu_m3::<{ flag::C }, true>, m::ret_c_uu_m4::<{ flag::C }, true>],
    /* D9 */ row![m::reti_uu_m0, m::reti_uu_m1, m::reti_uu_m2, m::reti_uu_m3],
    /* DA */ row![m::jp_c_uu_m0::<{ flag::C }, true>, m::jp_c_uu_m1::<{ flag::C }, true>, m::jp_c_uu_m2::<{ flag::C }, true>, m::jp_c_uu_m3::<{ flag::C }, true>],
    /* DB */ row![m::invalid_m0],
    /* DC */ row![m::call_c_uu_m0::<{ flag::C }, true>, m::call_c_uu_m1::<{ flag::C }, true>, m::call_c_uu_m2::<{ flag::C }, true>, m::call_c_uu_m3::<{ flag::C }, true>, m::call_c_uu_m4::<{ flag::C }, true>, m::call_c_uu_m5::<{ flag::C }, true>],
    /* DD */ row![m::invalid_m0],
    /* DE */ row![m::sbc_u_m0, m::sbc_u_m1],
    /* DF */ row![m::rst_m0::<0x18>, m::rst_m1::<0x18>, m::rst_m2::<0x18>, m::rst_m3::<0x18>],
    /* E0 */ row![m::ldh_an_r_m0::<{ reg::A }>, m::ldh_an_r_m1::<{ reg::A }>, m::ldh_an_r_m2::<{ reg::A }>],
    /* E1 */ row![m::pop_rr_m0::<{ reg16::HL }>, m::pop_rr_m1::<{ reg16::HL }>, m::pop_rr_m2::<{ reg16::HL }>],
    /* E2 */ row![m::ldh_ar_r_m0::<{ reg::C }, { reg::A }>, m::ldh_ar_r_m1::<{ reg::C }, { reg::A }>],
    /* E3 */ row![m::invalid_m0],
    /* E4 */ row![m::invalid_m0],
    /* E5 */ row![m::push_rr_m0::<{ reg16::HL }>, m::push_rr_m1::<{ reg16::HL }>, m::push_rr_m2::<{ reg16::HL }>, m::push_rr_m3::<{ reg16::HL }>],
    /* E6 */ row![m::and_u_m0, m::and_u_m1],
    /* E7 */ row![m::rst_m0::<0x20>, m::rst_m1::<0x20>, m::rst_m2::<0x20>, m::rst_m3::<0x20>],
    /* E8 */ row![m::add_rr_s_m0::<{ reg16::SP }>, m::add_rr_s_m1::<{ reg16::SP }>, m::add_rr_s_m2::<{ reg16::SP }>, m::add_rr_s_m3::<{ reg16::SP }>],
    /* E9 */ row![m::jp_rr_m0::<{ reg16::HL }>],
    /* EA */ row![m::ld_ann_r_m0::<{ reg::A }>, m::ld_ann_r_m1::<{ reg::A }>, m::ld_ann_r_m2::<{ reg::A }>, m::ld_ann_r_m3::<{ reg::A }>],
    /* EB */ row![m::invalid_m0],
    /* EC */ row![m::invalid_m0],
    /* ED */ row![m::invalid_m0],
    /* EE */ row![m::xor_u_m0, m::xor_u_m1],
    /* EF */ row![m::rst_m0::<0x28>, m::rst_m1::<0x28>, m::rst_m2::<0x28>, m::rst_m3::<0x28>],
    /* F0 */ row![m::ldh_r_an_m0::<{ reg::A }>, m::ldh_r_an_m1::<{ reg::A }>, m::ldh_r_an_m2::<{ reg::A }>],
    /* F1 */ row![m::pop_rr_m0::<{ reg16::AF }>, m::pop_rr_m1::<{ reg16::AF }>, m::pop_rr_m2::<{ reg16::AF }>],
    /* F2 */ row![m::ldh_r_ar_m0::<{ reg::A }, { reg::C }>, m::ldh_r_ar_m1::<{ reg::A }, { reg::C }>],
    /* F3 */ row![m::di_m0],
    /* F4 */ row![m::invalid_m0],
    /* F5 */ row![m::push_rr_m0::<{ reg16::AF }>, m::push_rr_m1::<{ reg16::AF }>, m::push_rr_m2::<{ reg16::AF }>, m::push_rr_m3::<{ reg16::AF }>],
    /* F6 */ row![m::or_u_m0, m::or_u_m1],
    /* F7 */ row![m::rst_m0::<0x30>, m::rst_m1::<0x30>, m::rst_m2::<0x30>, m::rst_m3::<0x30>],
    /* F8 */ row![m::ld_rr_rrs_m0::<{ reg16::HL }, { reg16::SP }>, m::ld_rr_rrs_m1::<{ reg16::HL }, { reg16::SP }>, m::ld_rr_rrs_m2::<{ reg16::HL }, { reg16::SP }>],
    /* F9 */ row![m::ld_rr_rr_m0::<{ reg16::SP }, { reg16::HL }>, m::ld_rr_rr_m1::<{ reg16::SP }, { reg16::HL }>],
    /* FA */ row![m::ld_r_ann_m0::<{ reg::A }>, m::ld_r_ann_m1::<{ reg::A }>, m::ld_r_ann_m2::<{ reg::A }>, m::ld_r_ann_m3::<{ reg::A }>],
    /* FB */ row![m::ei_m0],
    /* FC */ row![m::invalid_m0],
    /* FD */ row![m::invalid_m0],
    /* FE */ row![m::cp_u_m0, m::cp_u_m1],
    /* FF */ row![m::rst_m0::<0x38>, m::rst_m1::<0x38>, m::rst_m2::<0x38>, m::rst_m3::<0x38>],
];

#[rustfmt::skip]
pub static INSTRUCTIONS_CB: [[MicroOp; INSTR_LEN]; 256] = [
    /* 00 */ row![m::rlc_r_m0::<{ reg::B }>],
    /* 01 */ row![m::rlc_r_m0::<{ reg::C }>],
    /* 02 */ row![m::rlc_r_m0::<{ reg::D }>],
    /* 03 */ row![m::rlc_r_m0::<{ reg::E }>],
    /* 04 */ row![m::rlc_r_m0::<{ reg::H }>],
    /* 05 */ row![m::rlc_r_m0::<{ reg::L }>],
    /* 06 */ row![m::rlc_arr_m0::<{ reg16::HL }>, m::rlc_arr_m1::<{ reg16::HL }>, m::rlc_arr_m2::<{ reg16::HL }>],
    /* 07 */ row![m::rlc_r_m0::<{ reg::A }>],
    /* 08 */ row![m::rrc_r_m0::<{ reg::B }>],
    /* 09 */ row![m::rrc_r_m0::<{ reg::C }>],
    /* 0A */ row![m::rrc_r_m0::<{ reg::D }>],
    /* 0B */ row![m::rrc_r_m0::<{ reg::E }>],
    /* 0C */ row![m::rrc_r_m0::<{ reg::H }>],
    /* 0D */ row![m::rrc_r_m0::<{ reg::L }>],
    /* 0E */ row![m::rrc_arr_m0::<{ reg16::HL }>, m::rrc_arr_m1::<{ reg16::HL }>, m::rrc_arr_m2::<{ reg16::HL }>],
    /* 0F */ row![m::rrc_r_m0::<{ reg::A }>],
    /* 10 */ row![m::rl_r_m0::<{ reg::B }>],
    /* 11 */ row![m::rl_r_m0::<{ reg::C }>],
    /* 12 */ row![m::rl_r_m0::<{ reg::D }>],
    /* 13 */ row![m::rl_r_m0::<{ reg::E }>],
    /* 14 */ row![m::rl_r_m0::<{ reg::H }>],
    /* 15 */ row![m::rl_r_m0::<{ reg::L }>],
    /* 16 */ row![m::rl_arr_m0::<{ reg16::HL }>, m::rl_arr_m1::<{ reg16::HL }>, m::rl_arr_m2::<{ reg16::HL }>],
    /* 17 */ row![m::rl_r_m0::<{ reg::A }>],
    /* 18 */ row![m::rr_r_m0::<{ reg::B }>],
    /* 19 */ row![m::rr_r_m0::<{ reg::C }>],
    /* 1A */ row![m::rr_r_m0::<{ reg::D }>],
    /* 1B */ row![m::rr_r_m0::<{ reg::E }>],
    /* 1C */ row![m::rr_r_m0::<{ reg::H }>],
    /* 1D */ row![m::rr_r_m0::<{ reg::L }>],
    /* 1E */ row![m::rr_arr_m0::<{ reg16::HL }>, m::rr_arr_m1::<{ reg16::HL }>, m::rr_arr_m2::<{ reg16::HL }>],
    /* 1F */ row![m::rr_r_m0::<{ reg::A }>],
    /* 20 */ row![m::sla_r_m0::<{ reg::B }>],
    /* 21 */ row![m::sla_r_m0::<{ reg::C }>],
    /* 22 */ row![m::sla_r_m0::<{ reg::D }>],
    /* 23 */ row![m::sla_r_m0::<{ reg::E }>],
    /* 24 */ row![m::sla_r_m0::<{ reg::H }>],
    /* 25 */ row![m::sla_r_m0::<{ reg::L }>],
    /* 26 */ row![m::sla_arr_m0::<{ reg16::HL }>, m::sla_arr_m1::<{ reg16::HL }>, m::sla_arr_m2::<{ reg16::HL }>],
    /* 27 */ row![m::sla_r_m0::<{ reg::A }>],
    /* 28 */ row![m::sra_r_m0::<{ reg::B }>],
    /* 29 */ row![m::sra_r_m0::<{ reg::C }>],
    /* 2A */ row![m::sra_r_m0::<{ reg::D }>],
    /* 2B */ row![m::sra_r_m0::<{ reg::E }>],
    /* 2C */ row![m::sra_r_m0::<{ reg::H }>],
    /* 2D */ row![m::sra_r_m0::<{ reg::L }>],
    /* 2E */ row![m::sra_arr_m0::<{ reg16::HL }>, m::sra_arr_m1::<{ reg16::HL }>, m::sra_arr_m2::<{ reg16::HL }>],
    /* 2F */ row![m::sra_r_m0::<{ reg::A }>],
    /* 30 */ row![m::swap_r_m0::<{ reg::B }>],
    /* 31 */ row![m::swap_r_m0::<{ reg::C }>],
    /* 32 */ row![m::swap_r_m0::<{ reg::D }>],
    /* 33 */ row![m::swap_r_m0::<{ reg::E }>],
    /* 34 */ row![m::swap_r_m0::<{ reg::H }>],
    /* 35 */ row![m::swap_r_m0::<{ reg::L }>],
    /* 36 */ row![m::swap_arr_m0::<{ reg16::HL }>, m::swap_arr_m1::<{ reg16::HL }>, m::swap_arr_m2::<{ reg16::HL }>],
    /* 37 */ row![m::swap_r_m0::<{ reg::A }>],
    /* 38 */ row![m::srl_r_m0::<{ reg::B }>],
    /* 39 */ row![m::srl_r_m0::<{ reg::C }>],
    /* 3A */ row![m::srl_r_m0::<{ reg::D }>],
    /* 3B */ row![m::srl_r_m0::<{ reg::E }>],
    /* 3C */ row![m::srl_r_m0::<{ reg::H }>],
    /* 3D */ row![m::srl_r_m0::<{ reg::L }>],
    /* 3E */ row![m::srl_arr_m0::<{ reg16::HL }>, m::srl_arr_m1::<{ reg16::HL }>, m::srl_arr_m2::<{ reg16::HL }>],
    /* 3F */ row![m::srl_r_m0::<{ reg::A }>],
    /* 40 */ row![m::bit_r_m0::<0, { reg::B }>],
    /* 41 */ row![m::bit_r_m0::<0, { reg::C }>],
    /* 42 */ row![m::bit_r_m0::<0, { reg::D }>],
    /* 43 */ row![m::bit_r_m0::<0, { reg::E }>],
    /* 44 */ row![m::bit_r_m0::<0, { reg::H }>],
    /* 45 */ row![m::bit_r_m0::<0, { reg::L }>],
    /* 46 */ row![m::bit_arr_m0::<0, { reg16::HL }>, m::bit_arr_m1::<0, { reg16::HL }>],
    /* 47 */ row![m::bit_r_m0::<0, { reg::A }>],
    /* 48 */ row![m::bit_r_m0::<1, { reg::B }>],
    /* 49 */ row![m::bit_r_m0::<1, { reg::C }>],
    /* 4A */ row![m::bit_r_m0::<1, { reg::D }>],
    /* 4B */ row![m::bit_r_m0::<1, { reg::E }>],
    /* 4C */ row![m::bit_r_m0::<1, { reg::H }>],
    /* 4D */ row![m::bit_r_m0::<1, { reg::L }>],
    /* 4E */ row![m::bit_arr_m0::<1, { reg16::HL }>, m::bit_arr_m1::<1, { reg16::HL }>],
    /* 4F */ row![m::bit_r_m0::<1, { reg::A }>],
    /* 50 */ row![m::bit_r_m0::<2, { reg::B }>],
    /* 51 */ row![m::bit_r_m0::<2, { reg::C }>],
    /* 52 */ row![m::bit_r_m0::<2, { reg::D }>],
    /* 53 */ row![m::bit_r_m0::<2, { reg::E }>],
    /* 54 */ row![m::bit_r_m0::<2, { reg::H }>],
    /* 55 */ row![m::bit_r_m0::<2, { reg::L }>],
    /* 56 */ row![m::bit_arr_m0::<2, { reg16::HL }>, m::bit_arr_m1::<2, { reg16::HL }>],
    /* 57 */ row![m::bit_r_m0::<2, { reg::A }>],
    /* 58 */ row![m::bit_r_m0::<3, { reg::B }>],
    /* 59 */ row![m::bit_r_m0::<3, { reg::C }>],
    /* 5A */ row![m::bit_r_m0::<3, { reg::D }>],
    /* 5B */ row![m::bit_r_m0::<3, { reg::E }>],
    /* 5C */ row![m::bit_r_m0::<3, { reg::H }>],
    /* 5D */ row![m::bit_r_m0::<3, { reg::L }>],
    /* 5E */ row![m::bit_arr_m0::<3, { reg16::HL }>, m::bit_arr_m1::<3, { reg16::HL }>],
    /* 5F */ row![m::bit_r_m0::<3, { reg::A }>],
    /* 60 */ row![m::bit_r_m0::<4, { reg::B }>],
    /* 61 */ row![m::bit_r_m0::<4, { reg::C }>],
    /* 62 */ row![m::bit_r_m0::<4, { reg::D }>],
    /* 63 */ row![m::bit_r_m0::<4, { reg::E }>],
    /* 64 */ row![m::bit_r_m0::<4, { reg::H }>],
    /* 65 */ row![m::bit_r_m0::<4, { reg::L }>],
    /* 66 */ row![m::bit_arr_m0::<4, { reg16::HL }>, m::bit_arr_m1::<4, { reg16::HL }>],
    /* 67 */ row![m::bit_r_m0::<4, { reg::A }>],
    /* 68 */ row![m::bit_r_m0::<5, { reg::B }>],
    /* 69 */ row![m::bit_r_m0::<5, { reg::C }>],
    /* 6A */ row![m::bit_r_m0::<5, { reg::D }>],
    /* 6B */ row![m::bit_r_m0::<5, { reg::E }>],
    /* 6C */ row![m::bit_r_m0::<5, { reg::H }>],
    /* 6D */ row![m::bit_r_m0::<5, { reg::L }>],
    /* 6E */ row![m::bit_arr_m0::<5, { reg16::HL }>, m::bit_arr_m1::<5, { reg16::HL }>],
    /* 6F */ row![m::bit_r_m0::<5, { reg::A }>],
    /* 70 */ row![m::bit_r_m0::<6, { reg::B }>],
    /* 71 */ row![m::bit_r_m0::<6, { reg::C }>],
    /* 72 */ row![m::bit_r_m0::<6, { reg::D }>],
    /* 73 */ row![m::bit_r_m0::<6, { reg::E }>],
    /* 74 */ row![m::bit_r_m0::<6, { reg::H }>],
    /* 75 */ row![m::bit_r_m0::<6, { reg::L }>],
    /* 76 */ row![m::bit_arr_m0::<6, { reg16::HL }>, m::bit_arr_m1::<6, { reg16::HL }>],
    /* 77 */ row![m::bit_r_m0::<6, { reg::A }>],
    /* 78 */ row![m::bit_r_m0::<7, { reg::B }>],
    /* 79 */ row![m::bit_r_m0::<7, { reg::C }>],
    /* 7A */ row![m::bit_r_m0::<7, { reg::D }>],
    /* 7B */ row![m::bit_r_m0::<7, { reg::E }>],
    /* 7C */ row![m::bit_r_m0::<7, { reg::H }>],
    /* 7D */ row![m::bit_r_m0::<7, { reg::L }>],
    /* 7E */ row![m::bit_arr_m0::<7, { reg16::HL }>, m::bit_arr_m1::<7, { reg16::HL }>],
    /* 7F */ row![m::bit_r_m0::<7, { reg::A }>],
    /* 80 */ row![m::res_r_m0::<0, { reg::B }>],
    /* 81 */ row![m::res_r_m0::<0, { reg::C }>],
    /* 82 */ row![m::res_r_m0::<0, { reg::D }>],
    /* 83 */ row![m::res_r_m0::<0, { reg::E }>],
    /* 84 */ row![m::res_r_m0::<0, { reg::H }>],
    /* 85 */ row![m::res_r_m0::<0, { reg::L }>],
    /* 86 */ row![m::res_arr_m0::<0, { reg16::HL }>, m::res_arr_m1::<0, { reg16::HL }>, m::res_arr_m2::<0, { reg16::HL }>],
    /* 87 */ row![m::res_r_m0::<0, { reg::A }>],
    /* 88 */ row![m::res_r_m0::<1, { reg::B }>],
    /* 89 */ row![m::res_r_m0::<1, { reg::C }>],
    /* 8A */ row![m::res_r_m0::<1, { reg::D }>],
    /* 8B */ row![m::res_r_m0::<1, { reg::E }>],
    /* 8C */ row![m::res_r_m0::<1, { reg::H }>],
    /* 8D */ row![m::res_r_m0::<1, { reg::L }>],
    /* 8E */ row![m::res_arr_m0::<1, { reg16::HL }>, m::res_arr_m1::<1, { reg16::HL }>, m::res_arr_m2::<1, { reg16::HL }>],
    /* 8F */ row![m::res_r_m0::<1, { reg::A }>],
    /* 90 */ row![m::res_r_m0::<2, { reg::B }>],
    /* 91 */ row![m::res_r_m0::<2, { reg::C }>],
    /* 92 */ row![m::res_r_m0::<2, { reg::D }>],
    /* 93 */ row![m::res_r_m0::<2, { reg::E }>],
    /* 94 */ row![m::res_r_m0::<2, { reg::H }>],
    /* 95 */ row![m::res_r_m0::<2, { reg::L }>],
    /* 96 */ row![m::res_arr_m0::<2, { reg16::HL }>, m::res_arr_m1::<2, { reg16::HL }>, m::res_arr_m2::<2, { reg16::HL }>],
    /* 97 */ row![m::res_r_m0::<2, { reg::A }>],
    /* 98 */ row![m::res_r_m0::<3, { reg::B }>],
    /* 99 */ row![m::res_r_m0::<3, { reg::C }>],
    /* 9A */ row![m::res_r_m0::<3, { reg::D }>],
    /* 9B */ row![m::res_r_m0::<3, { reg::E }>],
    /* 9C */ row![m::res_r_m0::<3, { reg::H }>],
    /* 9D */ row![m::res_r_m0::<3, { reg::L }>],
    /* 9E */ row![m::res_arr_m0::<3, { reg16::HL }>, m::res_arr_m1::<3, { reg16::HL }>, m::res_arr_m2::<3, { reg16::HL }>],
    /* 9F */ row![m::res_r_m0::<3, { reg::A }>],
    /* A0 */ row![m::res_r_m0::<4, { reg::B }>],
    /* A1 */ row![m::res_r_m0::<4, { reg::C }>],
    /* A2 */ row![m::res_r_m0::<4, { reg::D }>],
    /* A3 */ row![m::res_r_m0::<4, { reg::E }>],
    /* A4 */ row![m::res_r_m0::<4, { reg::H }>],
    /* A5 */ row![m::res_r_m0::<4, { reg::L }>],
    /* A6 */ row![m::res_arr_m0::<4, { reg16::HL }>, m::res_arr_m1::<4, { reg16::HL }>, m::res_arr_m2::<4, { reg16::HL }>],
    /* A7 */ row![m::res_r_m0::<4, { reg::A }>],
    /* A8 */ row![m::res_r_m0::<5, { reg::B }>],
    /* A9 */ row![m::res_r_m0::<5, { reg::C }>],
    /* AA */ row![m::res_r_m0::<5, { reg::D }>],
    /* AB */ row![m::res_r_m0::<5, { reg::E }>],
    /* AC */ row![m::res_r_m0::<5, { reg::H }>],
    /* AD */ row![m::res_r_m0::<5, { reg::L }>],
    /* AE */ row![m::res_arr_m0::<5, { reg16::HL }>, m::res_arr_m1::<5, { reg16::HL }>, m::res_arr_m2::<5, { reg16::HL }>],
    /* AF */ row![m::res_r_m0::<5, { reg::A }>],
    /* B0 */ row![m::res_r_m0::<6, { reg::B }>],
    /* B1 */ row![m::res_r_m0::<6, { reg::C }>],
    /* B2 */ row![m::res_r_m0::<6, { reg::D }>],
    /* B3 */ row![m::res_r_m0::<6, { reg::E }>],
    /* B4 */ row![m::res_r_m0::<6, { reg::H }>],
    /* B5 */ row![m::res_r_m0::<6, { reg::L }>],
    /* B6 */ row![m::res_arr_m0::<6, { reg16::HL }>, m::res_arr_m1::<6, { reg16::HL }>, m::res_arr_m2::<6, { reg16::HL }>],
    /* B7 */ row![m::res_r_m0::<6, { reg::A }>],
    /* B8 */ row![m::res_r_m0::<7, { reg::B }>],
    /* B9 */ row![m::res_r_m0::<7, { reg::C }>],
    /* BA */ row![m::res_r_m0::<7, { reg::D }>],
    /* BB */ row![m::res_r_m0::<7, { reg::E }>],
    /* BC */ row![m::res_r_m0::<7, { reg::H }>],
    /* BD */ row![m::res_r_m0::<7, { reg::L }>],
    /* BE */ row![m::res_arr_m0::<7, { reg16::HL }>, m::res_arr_m1::<7, { reg16::HL }>, m::res_arr_m2::<7, { reg16::HL }>],
    /* BF */ row![m::res_r_m0::<7, { reg::A }>],
    /* C0 */ row![m::set_r_m0::<0, { reg::B }>],
    /* C1 */ row![m::set_r_m0::<0, { reg::C }>],
    /* C2 */ row![m::set_r_m0::<0, { reg::D }>],
    /* C3 */ row![m::set_r_m0::<0, { reg::E }>],
    /* C4 */ row![m::set_r_m0::<0, { reg::H }>],
    /* C5 */ row![m::set_r_m0::<0, { reg::L }>],
    /* C6 */ row![m::set_arr_m0::<0, { reg16::HL }>, m::set_arr_m1::<0, { reg16::HL }>, m::set_arr_m2::<0, { reg16::HL }>],
    /* C7 */ row![m::set_r_m0::<0, { reg::A }>],
    /* C8 */ row![m::set_r_m0::<1, { reg::B }>],
    /* C9 */ row![m::set_r_m0::<1, { reg::C }>],
    /* CA */ row![m::set_r_m0::<1, { reg::D }>],
    /* CB */ row![m::set_r_m0::<1, { reg::E }>],
    /* CC */ row![m::set_r_m0::<1, { reg::H }>],
    /* CD */ row![m::set_r_m0::<1, { reg::L }>],
    /* CE */ row![m::set_arr_m0::<1, { reg16::HL }>, m::set_arr_m1::<1, { reg16::HL }>, m::set_arr_m2::<1, { reg16::HL }>],
    /* CF */ row![m::set_r_m0::<1, { reg::A }>],
    /* D0 */ row![m::set_r_m0::<2, { reg::B }>],
    /* D1 */ row![m::set_r_m0::<2, { reg::C }>],
    /* D2 */ row![m::set_r_m0::<2, { reg::D }>],
    /* D3 */ row![m::set_r_m0::<2, { reg::E }>],
    /* D4 */ row![m::set_r_m0::<2, { reg::H }>],
    /* D5 */ row![m::set_r_m0::<2, { reg::L }>],
    /* D6 */ row![m::set_arr_m0::<2, { reg16::HL }>, m::set_arr_m1::<2, { reg16::HL }>, m::set_arr_m2::<2, { reg16::HL }>],
    /* D7 */ row![m::set_r_m0::<2, { reg::A }>],
    /* D8 */ row![m::set_r_m0::<3, { reg::B }>],
    /* D9 */ row![m::set_r_m0::<3, { reg::C }>],
    /* DA */ row![m::set_r_m0::<3, { reg::D }>],
    /* DB */ row![m::set_r_m0::<3, { reg::E }>],
    /* DC */ row![m::set_r_m0::<3, { reg::H }>],
    /* DD */ row![m::set_r_m0::<3, { reg::L }>],
    /* DE */ row![m::set_arr_m0::<3, { reg16::HL }>, m::set_arr_m1::<3, { reg16::HL }>, m::set_arr_m2::<3, { reg16::HL }>],
    /* DF */ row![m::set_r_m0::<3, { reg::A }>],
    /* E0 */ row![m::set_r_m0::<4, { reg::B }>],
    /* E1 */ row![m::set_r_m0::<4, { reg::C }>],
    /* E2 */ row![m::set_r_m0::<4, { reg::D }>],
    /* E3 */ row![m::set_r_m0::<4, { reg::E }>],
    /* E4 */ row![m::set_r_m0::<4, { reg::H }>],
    /* E5 */ row![m::set_r_m0::<4, { reg::L }>],
    /* E6 */ row![m::set_arr_m0::<4, { reg16::HL }>, m::set_arr_m1::<4, { reg16::HL }>, m::set_arr_m2::<4, { reg16::HL }>],
    /* E7 */ row![m::set_r_m0::<4, { reg::A }>],
    /* E8 */ row![m::set_r_m0::<5, { reg::B }>],
    /* E9 */ row![m::set_r_m0::<5, { reg::C }>],
    /* EA */ row![m::set_r_m0::<5, { reg::D }>],
    /* EB */ row![m::set_r_m0::<5, { reg::E }>],
    /* EC */ row![m::set_r_m0::<5, { reg::H }>],
    /* ED */ row![m::set_r_m0::<5, { reg::L }>],
    /* EE */ row![m::set_arr_m0::<5, { reg16::HL }>, m::set_arr_m1::<5, { reg16::HL }>, m::set_arr_m2::<5, { reg16::HL }>],
    /* EF */ row![m::set_r_m0::<5, { reg::A }>],
    /* F0 */ row![m::set_r_m0::<6, { reg::B }>],
    /* F1 */ row![m::set_r_m0::<6, { reg::C }>],
    /* F2 */ row![m::set_r_m0::<6, { reg::D }>],
    /* F3 */ row![m::set_r_m0::<6, { reg::E }>],
    /* F4 */ row![m::set_r_m0::<6, { reg::H }>],
    /* F5 */ row![m::set_r_m0::<6, { reg::L }>],
    /* F6 */ row![m::set_arr_m0::<6, { reg16::HL }>, m::set_arr_m1::<6, { reg16::HL }>, m::set_arr_m2::<6, { reg16::HL }>],
    /* F7 */ row![m::set_r_m0::<6, { reg::A }>],
    /* F8 */ row![m::set_r_m0::<7, { reg::B }>],
    /* F9 */ row![m::set_r_m0::<7, { reg::C }>],
    /* FA */ row![m::set_r_m0::<7, { reg::D }>],
    /* FB */ row![m::set_r_m0::<7, { reg::E }>],
    /* FC */ row![m::set_r_m0::<7, { reg::H }>],
    /* FD */ row![m::set_r_m0::<7, { reg::L }>],
    /* FE */ row![m::set_arr_m0::<7, { reg16::HL }>, m::set_arr_m1::<7, { reg16::HL }>, m::set_arr_m2::<7, { reg16::HL }>],
    /* FF */ row![m::set_r_m0::<7, { reg::A }>],
];

/// The interrupt service routine micro-sequence: five M-cycles from
/// dispatch to the first fetch at the chosen vector.
pub static ISR: [MicroOp; 5] = [m::isr_m0, m::isr_m1, m::isr_m2, m::isr_m3, m::isr_m4];
