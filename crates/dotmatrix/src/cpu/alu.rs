use super::{Flags, Registers};

/// Two-operand 8-bit operations on A (opcodes 0x80-0xBF and their
/// immediate forms), in opcode encoding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub fn from_index(index: u8) -> AluOp {
        match index & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        }
    }
}

/// Rotate/shift family of the prefixed page (row y of CB 0x00-0x3F).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub fn from_index(index: u8) -> ShiftOp {
        match index & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            ShiftOp::Rlc => "RLC",
            ShiftOp::Rrc => "RRC",
            ShiftOp::Rl => "RL",
            ShiftOp::Rr => "RR",
            ShiftOp::Sla => "SLA",
            ShiftOp::Sra => "SRA",
            ShiftOp::Swap => "SWAP",
            ShiftOp::Srl => "SRL",
        }
    }
}

/// Core 8-bit ALU step: `a <op> value`, updating all four flags.
///
/// Returns the masked 8-bit result. For `Cp` the result is what SUB would
/// have produced; callers simply do not store it.
pub fn arith8(regs: &mut Registers, op: AluOp, a: u8, value: u8) -> u8 {
    let carry_in = regs.flag(Flags::C) as i32;
    let (a, b) = (a as i32, value as i32);
    match op {
        AluOp::Add | AluOp::Adc => {
            let carry = if op == AluOp::Adc { carry_in } else { 0 };
            let full = a + b + carry;
            let result = (full & 0xFF) as u8;
            regs.set_flags(Flags::empty());
            regs.set_zero(result == 0);
            regs.set_half_carry((a & 0x0F) + (b & 0x0F) + carry > 0x0F);
            regs.set_carry(full > 0xFF);
            result
        }
        AluOp::Sub | AluOp::Sbc | AluOp::Cp => {
            let carry = if op == AluOp::Sbc { carry_in } else { 0 };
            let full = a - b - carry;
            let result = (full & 0xFF) as u8;
            regs.set_flags(Flags::N);
            regs.set_zero(result == 0);
            // Borrow out of bit 3 shows up as a flipped bit 4.
            regs.set_half_carry((a ^ b ^ full) & 0x10 != 0);
            regs.set_carry(full < 0);
            result
        }
        AluOp::And => {
            let result = (a & b) as u8;
            regs.set_flags(Flags::H);
            regs.set_zero(result == 0);
            result
        }
        AluOp::Xor => {
            let result = (a ^ b) as u8;
            regs.set_flags(Flags::empty());
            regs.set_zero(result == 0);
            result
        }
        AluOp::Or => {
            let result = (a | b) as u8;
            regs.set_flags(Flags::empty());
            regs.set_zero(result == 0);
            result
        }
    }
}

/// 8-bit increment used by INC r and INC (HL). C is left unchanged.
#[inline]
pub fn inc8(regs: &mut Registers, value: u8) -> u8 {
    let result = value.wrapping_add(1);
    regs.set_zero(result == 0);
    regs.set_subtract(false);
    regs.set_half_carry((value & 0x0F) + 1 > 0x0F);
    result
}

/// 8-bit decrement used by DEC r and DEC (HL). C is left unchanged.
#[inline]
pub fn dec8(regs: &mut Registers, value: u8) -> u8 {
    let result = value.wrapping_sub(1);
    regs.set_zero(result == 0);
    regs.set_subtract(true);
    regs.set_half_carry((value & 0x0F) == 0);
    result
}

/// Rotates, shifts and SWAP. Z reflects the result, N and H are cleared,
/// C receives the bit shifted out (always clear for SWAP).
pub fn shift(regs: &mut Registers, op: ShiftOp, value: u8) -> u8 {
    let carry_in = regs.flag(Flags::C);
    let (result, carry_out) = match op {
        ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
        ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
        ShiftOp::Rl => ((value << 1) | carry_in as u8, value & 0x80 != 0),
        ShiftOp::Rr => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
        ShiftOp::Sla => (value << 1, value & 0x80 != 0),
        ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        ShiftOp::Swap => (value.rotate_left(4), false),
        ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
    };
    regs.set_flags(Flags::empty());
    regs.set_zero(result == 0);
    regs.set_carry(carry_out);
    result
}

/// BIT n: Z is the inverse of the tested bit, N=0, H=1, C unchanged.
#[inline]
pub fn bit_test(regs: &mut Registers, index: u8, value: u8) {
    regs.set_zero(value & (1 << index) == 0);
    regs.set_subtract(false);
    regs.set_half_carry(true);
}

/// 16-bit add for `ADD HL,rr`. Z is unaffected; H and C come from bits
/// 11 and 15.
#[inline]
pub fn add16_hl(regs: &mut Registers, hl: u16, value: u16) -> u16 {
    regs.set_subtract(false);
    regs.set_half_carry((hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
    regs.set_carry((hl as u32) + (value as u32) > 0xFFFF);
    hl.wrapping_add(value)
}

/// SP plus a signed 8-bit offset (ADD SP,e and LD HL,SP+e).
///
/// Z and N are cleared. H and C are the carries out of bit 3 and bit 7 of
/// the low-byte addition, with the offset taken as its raw byte.
#[inline]
pub fn add_sp_signed(regs: &mut Registers, sp: u16, offset: i32) -> u16 {
    let raw = (offset & 0xFF) as u16;
    regs.set_flags(Flags::empty());
    regs.set_half_carry((sp & 0x000F) + (raw & 0x000F) > 0x000F);
    regs.set_carry((sp & 0x00FF) + raw > 0x00FF);
    sp.wrapping_add(offset as i16 as u16)
}

/// Decimal adjust accumulator after BCD addition/subtraction.
///
/// Updates A, Z, H, C; leaves N unchanged.
pub fn daa(regs: &mut Registers) {
    let mut a = regs.a;
    let mut adjust: u8 = if regs.flag(Flags::C) { 0x60 } else { 0x00 };
    if regs.flag(Flags::H) {
        adjust |= 0x06;
    }

    if !regs.flag(Flags::N) {
        if (a & 0x0F) > 0x09 {
            adjust |= 0x06;
        }
        if a > 0x99 {
            adjust |= 0x60;
        }
        a = a.wrapping_add(adjust);
    } else {
        a = a.wrapping_sub(adjust);
    }

    regs.set_carry(adjust >= 0x60);
    regs.set_half_carry(false);
    regs.set_zero(a == 0);
    regs.a = a;
}

#[inline]
pub fn cpl(regs: &mut Registers) {
    regs.a = !regs.a;
    regs.set_subtract(true);
    regs.set_half_carry(true);
}

#[inline]
pub fn scf(regs: &mut Registers) {
    regs.set_subtract(false);
    regs.set_half_carry(false);
    regs.set_carry(true);
}

#[inline]
pub fn ccf(regs: &mut Registers) {
    let carry = regs.flag(Flags::C);
    regs.set_subtract(false);
    regs.set_half_carry(false);
    regs.set_carry(!carry);
}
