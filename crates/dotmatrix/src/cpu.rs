//! LR35902 instruction engine.
//!
//! Instructions are data: each opcode maps to a list of `MicroOp`s that is
//! folded over an integer accumulator. `Cpu::step` fetches and decodes one
//! opcode (following the 0xCB escape into the prefixed page) and runs it
//! against any `AddressSpace`.

pub mod alu;
mod bus;
mod context;
mod instruction;
pub mod interrupts;
mod micro;
mod regs;
mod table;

pub use bus::AddressSpace;
pub use context::{Condition, Context, ImeChange};
pub use instruction::{Cycles, Instruction};
pub use interrupts::{InterruptController, InterruptFlags};
pub use micro::MicroOp;
pub use regs::{Flags, Reg, Registers};
pub use table::{OpcodeTable, PREFIX};

use crate::error::{CoreError, Result};

/// Outcome of one executed instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Executed {
    /// Machine cycles the instruction consumed.
    pub cycles: u32,
    /// Context left behind by the micro-ops (IME change, HALT, STOP).
    pub context: Context,
}

pub struct Cpu {
    pub regs: Registers,
    table: OpcodeTable,
}

impl Cpu {
    /// CPU with zeroed registers driving the given table.
    pub fn new(table: OpcodeTable) -> Self {
        Self {
            regs: Registers::default(),
            table,
        }
    }

    /// Fetch, decode and execute one instruction at PC.
    ///
    /// An opcode with no table entry is reported as
    /// `CoreError::UndefinedOpcode`; PC is left past the offending byte(s).
    pub fn step<M: AddressSpace + ?Sized>(&mut self, mem: &mut M) -> Result<Executed> {
        let pc = self.regs.pc;
        let mut opcode = mem.get(self.regs.inc_pc())?;
        let prefixed = opcode == PREFIX;
        if prefixed {
            opcode = mem.get(self.regs.inc_pc())?;
        }

        let entry = if prefixed {
            self.table.get_prefixed(opcode)
        } else {
            self.table.get(opcode)
        };
        let Some(instruction) = entry else {
            log::error!(
                "undefined opcode {}0x{:02X} at 0x{:04X}; {}",
                if prefixed { "0xCB " } else { "" },
                opcode,
                pc,
                dump(&self.regs)
            );
            return Err(CoreError::UndefinedOpcode {
                opcode,
                prefixed,
                pc,
            });
        };

        log::trace!(
            "0x{:04X}: {}{:02X} {:<12} {}",
            pc,
            if prefixed { "CB " } else { "" },
            opcode,
            instruction.label(),
            dump(&self.regs)
        );

        let mut context = Context::default();
        let cycles = instruction.execute(&mut self.regs, mem, &mut context)?;
        Ok(Executed { cycles, context })
    }
}

/// One-line register dump used by trace and error logs.
pub fn dump(regs: &Registers) -> String {
    format!(
        "AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X}",
        regs.af(),
        regs.bc(),
        regs.de(),
        regs.hl(),
        regs.sp,
        regs.pc
    )
}
