use crate::bits;
use crate::error::Result;

use super::alu::{self, AluOp, ShiftOp};
use super::{AddressSpace, Condition, Context, ImeChange, Reg, Registers};

/// One step of an instruction.
///
/// Every instruction is a fixed sequence of these, folded left to right
/// over an integer accumulator that starts at 0. Each step sees the
/// registers, the address space, the accumulator and the `Context`, and
/// returns the next accumulator value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MicroOp {
    /// acc = n
    Immediate(i32),
    /// acc = byte at PC, PC += 1
    Fetch8,
    /// acc = little-endian word at PC, PC += 2
    Fetch16,
    /// acc = R
    Load(Reg),
    /// R = acc
    Store(Reg),
    /// acc = mem[acc]
    LoadIndirect,
    /// mem[acc] = R; 16-bit registers are written low byte first.
    StoreIndirect(Reg),
    /// mem[R] = acc
    StoreAccumulator(Reg),
    /// context.snapshot = acc
    ContextWrite,
    /// mem[context.snapshot] = acc
    StoreAtSnapshot,
    /// R += 1 without touching flags or the accumulator.
    Increment(Reg),
    /// R -= 1 without touching flags or the accumulator.
    Decrement(Reg),
    /// acc = 0xFF00 + low byte of acc (LDH addressing).
    HighPage,
    /// acc = low byte of acc as a signed value.
    SignExtend,
    /// acc = A <op> acc
    Alu(AluOp),
    Inc8,
    Dec8,
    Shift(ShiftOp),
    /// RLCA/RLA/RRCA/RRA: like `Shift` but Z is always cleared.
    RotateA(ShiftOp),
    BitTest(u8),
    BitSet(u8, bool),
    /// acc = HL + acc with ADD HL,rr flags.
    AddHl,
    /// acc = SP + signed acc with ADD SP,e flags.
    AddSp,
    Daa,
    Cpl,
    Scf,
    Ccf,
    /// Push acc as a word.
    Push,
    /// acc = popped word.
    Pop,
    /// PC = acc if the condition holds.
    Jump(Option<Condition>),
    /// PC += acc if the condition holds.
    JumpRelative(Option<Condition>),
    /// Push PC, then PC = acc, if the condition holds.
    Call(Option<Condition>),
    /// PC = popped word if the condition holds.
    Return(Option<Condition>),
    Interrupts(ImeChange),
    Halt,
    Stop,
}

impl MicroOp {
    pub fn apply<M: AddressSpace + ?Sized>(
        self,
        regs: &mut Registers,
        mem: &mut M,
        acc: i32,
        ctx: &mut Context,
    ) -> Result<i32> {
        let next = match self {
            MicroOp::Immediate(n) => n,
            MicroOp::Fetch8 => mem.get(regs.inc_pc())? as i32,
            MicroOp::Fetch16 => {
                let lo = mem.get(regs.inc_pc())?;
                let hi = mem.get(regs.inc_pc())?;
                bits::word(hi, lo) as i32
            }
            MicroOp::Load(reg) => regs.get(reg) as i32,
            MicroOp::Store(reg) => {
                regs.set(reg, acc)?;
                acc
            }
            MicroOp::LoadIndirect => mem.get(bits::check_address(acc)?)? as i32,
            MicroOp::StoreIndirect(reg) => {
                let address = bits::check_address(acc)?;
                let value = regs.get(reg);
                if reg.is_wide() {
                    mem.set16(address, value)?;
                } else {
                    mem.set(address, value as u8)?;
                }
                acc
            }
            MicroOp::StoreAccumulator(reg) => {
                mem.set(regs.get(reg), bits::check_u8(acc)?)?;
                acc
            }
            MicroOp::ContextWrite => {
                ctx.snapshot = acc;
                acc
            }
            MicroOp::StoreAtSnapshot => {
                let address = bits::check_address(ctx.snapshot)?;
                mem.set(address, bits::check_u8(acc)?)?;
                acc
            }
            MicroOp::Increment(reg) => {
                step_register(regs, reg, 1)?;
                acc
            }
            MicroOp::Decrement(reg) => {
                step_register(regs, reg, -1)?;
                acc
            }
            MicroOp::HighPage => 0xFF00 | (acc & 0xFF),
            MicroOp::SignExtend => bits::sign_extend(acc),
            MicroOp::Alu(op) => {
                let value = bits::check_u8(acc)?;
                let a = regs.a;
                alu::arith8(regs, op, a, value) as i32
            }
            MicroOp::Inc8 => alu::inc8(regs, bits::check_u8(acc)?) as i32,
            MicroOp::Dec8 => alu::dec8(regs, bits::check_u8(acc)?) as i32,
            MicroOp::Shift(op) => alu::shift(regs, op, bits::check_u8(acc)?) as i32,
            MicroOp::RotateA(op) => {
                let result = alu::shift(regs, op, bits::check_u8(acc)?);
                regs.set_zero(false);
                result as i32
            }
            MicroOp::BitTest(index) => {
                alu::bit_test(regs, index, bits::check_u8(acc)?);
                acc
            }
            MicroOp::BitSet(index, set) => bits::with_bit(bits::check_u8(acc)?, index, set) as i32,
            MicroOp::AddHl => {
                let hl = regs.hl();
                alu::add16_hl(regs, hl, bits::check_u16(acc)?) as i32
            }
            MicroOp::AddSp => {
                let sp = regs.sp;
                alu::add_sp_signed(regs, sp, acc) as i32
            }
            MicroOp::Daa => {
                alu::daa(regs);
                acc
            }
            MicroOp::Cpl => {
                alu::cpl(regs);
                acc
            }
            MicroOp::Scf => {
                alu::scf(regs);
                acc
            }
            MicroOp::Ccf => {
                alu::ccf(regs);
                acc
            }
            MicroOp::Push => {
                push(regs, mem, bits::check_u16(acc)?)?;
                acc
            }
            MicroOp::Pop => pop(regs, mem)? as i32,
            MicroOp::Jump(cond) => {
                if branch(regs, cond, ctx) {
                    regs.pc = bits::check_address(acc)?;
                }
                acc
            }
            MicroOp::JumpRelative(cond) => {
                if branch(regs, cond, ctx) {
                    regs.pc = regs.pc.wrapping_add(acc as i16 as u16);
                }
                acc
            }
            MicroOp::Call(cond) => {
                if branch(regs, cond, ctx) {
                    let target = bits::check_address(acc)?;
                    let ret = regs.pc;
                    push(regs, mem, ret)?;
                    regs.pc = target;
                }
                acc
            }
            MicroOp::Return(cond) => {
                if branch(regs, cond, ctx) {
                    regs.pc = pop(regs, mem)?;
                }
                acc
            }
            MicroOp::Interrupts(change) => {
                ctx.ime = Some(change);
                acc
            }
            MicroOp::Halt => {
                ctx.halt = true;
                acc
            }
            MicroOp::Stop => {
                ctx.stop = true;
                acc
            }
        };
        Ok(next)
    }
}

/// Evaluate an optional condition and record the outcome.
#[inline]
fn branch(regs: &Registers, cond: Option<Condition>, ctx: &mut Context) -> bool {
    let taken = cond.map_or(true, |c| c.holds(regs));
    ctx.branch_taken = taken;
    taken
}

fn step_register(regs: &mut Registers, reg: Reg, delta: i32) -> Result<()> {
    let mask = if reg.is_wide() { 0xFFFF } else { 0xFF };
    let value = (regs.get(reg) as i32 + delta) & mask;
    regs.set(reg, value)
}

/// Push a word: SP is decremented before each byte, high byte first, so
/// the low byte ends up at the new SP.
pub(crate) fn push<M: AddressSpace + ?Sized>(
    regs: &mut Registers,
    mem: &mut M,
    value: u16,
) -> Result<()> {
    let sp = regs.dec_sp();
    mem.set(sp, bits::high_byte(value))?;
    let sp = regs.dec_sp();
    mem.set(sp, bits::low_byte(value))
}

/// Pop a word: low byte at SP, high byte at SP+1.
pub(crate) fn pop<M: AddressSpace + ?Sized>(regs: &mut Registers, mem: &mut M) -> Result<u16> {
    let lo = mem.get(regs.inc_sp())?;
    let hi = mem.get(regs.inc_sp())?;
    Ok(bits::word(hi, lo))
}
