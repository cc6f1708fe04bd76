use super::{Flags, Registers};

/// Branch condition tested by JP/JR/CALL/RET cc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    NZ,
    Z,
    NC,
    C,
}

impl Condition {
    /// Condition encoded in bits 3-4 of the opcode.
    pub fn from_index(index: u8) -> Condition {
        match index & 0x03 {
            0 => Condition::NZ,
            1 => Condition::Z,
            2 => Condition::NC,
            _ => Condition::C,
        }
    }

    #[inline]
    pub fn holds(self, regs: &Registers) -> bool {
        match self {
            Condition::NZ => !regs.flag(Flags::Z),
            Condition::Z => regs.flag(Flags::Z),
            Condition::NC => !regs.flag(Flags::C),
            Condition::C => regs.flag(Flags::C),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Condition::NZ => "NZ",
            Condition::Z => "Z",
            Condition::NC => "NC",
            Condition::C => "C",
        }
    }
}

/// IME change requested by an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImeChange {
    /// EI: becomes active once the following instruction has completed.
    Enable,
    /// RETI: active as soon as the instruction completes.
    EnableNow,
    /// DI: immediate, and cancels a pending EI.
    Disable,
}

/// Per-execution scratch record shared by the micro-ops of one
/// instruction. Created fresh for every instruction and inspected by the
/// cycle-cost function and the driving loop afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Context {
    /// Outcome of the last branch condition evaluated.
    pub branch_taken: bool,
    /// Accumulator value captured by `MicroOp::ContextWrite`.
    pub snapshot: i32,
    pub ime: Option<ImeChange>,
    pub halt: bool,
    pub stop: bool,
}
