use crate::error::Result;

use super::{AddressSpace, Context, MicroOp, Registers};

/// Cycle cost of an instruction, in machine cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cycles {
    Fixed(u32),
    /// Conditional control flow: cost depends on `Context::branch_taken`.
    Branch { taken: u32, not_taken: u32 },
}

impl Cycles {
    #[inline]
    pub fn cost(self, ctx: &Context) -> u32 {
        match self {
            Cycles::Fixed(n) => n,
            Cycles::Branch { taken, not_taken } => {
                if ctx.branch_taken {
                    taken
                } else {
                    not_taken
                }
            }
        }
    }
}

/// A decoded instruction: a label for diagnostics, its micro-op sequence
/// and its cycle cost. Immutable once placed in an `OpcodeTable`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    label: String,
    ops: Vec<MicroOp>,
    cycles: Cycles,
}

impl Instruction {
    pub fn new(label: impl Into<String>, ops: Vec<MicroOp>, cycles: Cycles) -> Self {
        Self {
            label: label.into(),
            ops,
            cycles,
        }
    }

    pub fn fixed(label: impl Into<String>, ops: Vec<MicroOp>, cycles: u32) -> Self {
        Self::new(label, ops, Cycles::Fixed(cycles))
    }

    pub fn branch(
        label: impl Into<String>,
        ops: Vec<MicroOp>,
        taken: u32,
        not_taken: u32,
    ) -> Self {
        Self::new(label, ops, Cycles::Branch { taken, not_taken })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fold the micro-ops over a zero accumulator and return the cycles
    /// consumed. The context is left for the caller to inspect.
    pub fn execute<M: AddressSpace + ?Sized>(
        &self,
        regs: &mut Registers,
        mem: &mut M,
        ctx: &mut Context,
    ) -> Result<u32> {
        self.ops
            .iter()
            .try_fold(0i32, |acc, op| op.apply(regs, mem, acc, ctx))?;
        Ok(self.cycles.cost(ctx))
    }
}
