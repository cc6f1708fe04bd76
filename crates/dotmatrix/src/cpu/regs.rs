use bitflags::bitflags;

use crate::bits;
use crate::error::Result;

/// Registers for the Game Boy CPU (LR35902).
///
/// The 8-bit registers pair up as AF, BC, DE and HL (high byte first).
/// F only ever holds the four condition flags in its upper nibble, so it
/// is private and every write path masks the low nibble away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

bitflags! {
    /// Condition flags held in the upper nibble of F.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Flags: u8 {
        const Z = 0b1000_0000;
        const N = 0b0100_0000;
        const H = 0b0010_0000;
        const C = 0b0001_0000;
    }
}

/// Register names addressable by micro-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

impl Reg {
    #[inline]
    pub fn is_wide(self) -> bool {
        matches!(
            self,
            Reg::AF | Reg::BC | Reg::DE | Reg::HL | Reg::SP | Reg::PC
        )
    }

    /// Register operand encoded in bits 0-2 / 3-5 of an opcode.
    ///
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 7=A. Index 6 is the (HL) memory
    /// operand and has no register; callers handle it separately.
    pub fn from_r8_index(index: u8) -> Option<Reg> {
        match index & 0x07 {
            0 => Some(Reg::B),
            1 => Some(Reg::C),
            2 => Some(Reg::D),
            3 => Some(Reg::E),
            4 => Some(Reg::H),
            5 => Some(Reg::L),
            7 => Some(Reg::A),
            _ => None,
        }
    }

    /// 16-bit operand encoded in bits 4-5 (BC, DE, HL, SP).
    pub fn from_rr_index(index: u8) -> Reg {
        match index & 0x03 {
            0 => Reg::BC,
            1 => Reg::DE,
            2 => Reg::HL,
            _ => Reg::SP,
        }
    }

    /// PUSH/POP flavour of `from_rr_index`, where 3 selects AF.
    pub fn from_stack_index(index: u8) -> Reg {
        match index & 0x03 {
            3 => Reg::AF,
            other => Reg::from_rr_index(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Reg::A => "A",
            Reg::F => "F",
            Reg::B => "B",
            Reg::C => "C",
            Reg::D => "D",
            Reg::E => "E",
            Reg::H => "H",
            Reg::L => "L",
            Reg::AF => "AF",
            Reg::BC => "BC",
            Reg::DE => "DE",
            Reg::HL => "HL",
            Reg::SP => "SP",
            Reg::PC => "PC",
        }
    }
}

impl Registers {
    /// Register state the DMG boot ROM leaves behind when it jumps to the
    /// cartridge entry point at 0x0100.
    pub fn post_boot() -> Self {
        Self {
            a: 0x01,
            f: 0xB0,
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            sp: 0xFFFE,
            pc: 0x0100,
        }
    }

    #[inline]
    pub fn f(&self) -> u8 {
        self.f
    }

    #[inline]
    pub fn set_f(&mut self, value: u8) {
        // Lower 4 bits of F are always zero.
        self.f = value & 0xF0;
    }

    #[inline]
    pub fn af(&self) -> u16 {
        bits::word(self.a, self.f)
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        self.set_f(f);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        bits::word(self.b, self.c)
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        bits::word(self.d, self.e)
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        bits::word(self.h, self.l)
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }

    /// Read any register, widened to 16 bits.
    pub fn get(&self, reg: Reg) -> u16 {
        match reg {
            Reg::A => self.a as u16,
            Reg::F => self.f as u16,
            Reg::B => self.b as u16,
            Reg::C => self.c as u16,
            Reg::D => self.d as u16,
            Reg::E => self.e as u16,
            Reg::H => self.h as u16,
            Reg::L => self.l as u16,
            Reg::AF => self.af(),
            Reg::BC => self.bc(),
            Reg::DE => self.de(),
            Reg::HL => self.hl(),
            Reg::SP => self.sp,
            Reg::PC => self.pc,
        }
    }

    /// Write any register from an unchecked integer.
    ///
    /// 8-bit registers reject values outside `0..=0xFF`, 16-bit ones
    /// outside `0..=0xFFFF`. Writes to F and AF keep the low nibble clear.
    pub fn set(&mut self, reg: Reg, value: i32) -> Result<()> {
        if reg.is_wide() {
            let value = bits::check_u16(value)?;
            match reg {
                Reg::AF => self.set_af(value),
                Reg::BC => self.set_bc(value),
                Reg::DE => self.set_de(value),
                Reg::HL => self.set_hl(value),
                Reg::SP => self.sp = value,
                Reg::PC => self.pc = value,
                _ => unreachable!("narrow register in wide branch"),
            }
        } else {
            let value = bits::check_u8(value)?;
            match reg {
                Reg::A => self.a = value,
                Reg::F => self.set_f(value),
                Reg::B => self.b = value,
                Reg::C => self.c = value,
                Reg::D => self.d = value,
                Reg::E => self.e = value,
                Reg::H => self.h = value,
                Reg::L => self.l = value,
                _ => unreachable!("wide register in narrow branch"),
            }
        }
        Ok(())
    }

    /// Return the current PC and advance it by one.
    #[inline]
    pub fn inc_pc(&mut self) -> u16 {
        let pc = self.pc;
        self.pc = pc.wrapping_add(1);
        pc
    }

    /// Return the current SP and advance it by one (stack pop).
    #[inline]
    pub fn inc_sp(&mut self) -> u16 {
        let sp = self.sp;
        self.sp = sp.wrapping_add(1);
        sp
    }

    /// Move SP down by one and return the new value (stack push).
    #[inline]
    pub fn dec_sp(&mut self) -> u16 {
        self.sp = self.sp.wrapping_sub(1);
        self.sp
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        Flags::from_bits_truncate(self.f)
    }

    #[inline]
    pub fn set_flags(&mut self, flags: Flags) {
        self.f = flags.bits();
    }

    #[inline]
    pub fn flag(&self, flag: Flags) -> bool {
        self.flags().contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        let mut flags = self.flags();
        flags.set(flag, value);
        self.set_flags(flags);
    }

    #[inline]
    pub fn set_zero(&mut self, value: bool) {
        self.set_flag(Flags::Z, value);
    }

    #[inline]
    pub fn set_subtract(&mut self, value: bool) {
        self.set_flag(Flags::N, value);
    }

    #[inline]
    pub fn set_half_carry(&mut self, value: bool) {
        self.set_flag(Flags::H, value);
    }

    #[inline]
    pub fn set_carry(&mut self, value: bool) {
        self.set_flag(Flags::C, value);
    }
}
