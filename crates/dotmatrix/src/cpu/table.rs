//! Opcode tables.
//!
//! Two 256-entry pages map an opcode to its `Instruction`: the primary
//! page and the page reached through the 0xCB prefix. Both are built once
//! by `OpcodeTable::build` and never change afterwards; registering an
//! opcode twice is a construction error.

mod prefixed;
mod primary;

use crate::error::{CoreError, Result};

use super::{Instruction, MicroOp, Reg};

/// Escape byte selecting the prefixed page.
pub const PREFIX: u8 = 0xCB;

#[derive(Clone, Debug)]
pub struct OpcodeTable {
    primary: Box<[Option<Instruction>]>,
    prefixed: Box<[Option<Instruction>]>,
}

impl OpcodeTable {
    pub fn build() -> Result<Self> {
        let mut primary = PageBuilder::new(false);
        primary::register(&mut primary)?;

        let mut prefixed = PageBuilder::new(true);
        prefixed::register(&mut prefixed)?;

        let table = Self {
            primary: primary.finish(),
            prefixed: prefixed.finish(),
        };
        log::debug!(
            "opcode table built: {} primary, {} prefixed instructions",
            table.primary_len(),
            table.prefixed_len()
        );
        Ok(table)
    }

    /// Instruction for a primary opcode, `None` for the hardware holes and
    /// for the 0xCB escape.
    #[inline]
    pub fn get(&self, opcode: u8) -> Option<&Instruction> {
        self.primary[opcode as usize].as_ref()
    }

    /// Instruction for the byte following a 0xCB prefix.
    #[inline]
    pub fn get_prefixed(&self, opcode: u8) -> Option<&Instruction> {
        self.prefixed[opcode as usize].as_ref()
    }

    pub fn primary_len(&self) -> usize {
        self.primary.iter().flatten().count()
    }

    pub fn prefixed_len(&self) -> usize {
        self.prefixed.iter().flatten().count()
    }
}

/// Accumulates one page, refusing duplicate registrations.
pub(crate) struct PageBuilder {
    prefixed: bool,
    slots: Vec<Option<Instruction>>,
}

impl PageBuilder {
    pub(crate) fn new(prefixed: bool) -> Self {
        Self {
            prefixed,
            slots: vec![None; 256],
        }
    }

    pub(crate) fn register(&mut self, opcode: u8, instruction: Instruction) -> Result<()> {
        let slot = &mut self.slots[opcode as usize];
        if slot.is_some() {
            return Err(CoreError::DuplicateOpcode {
                opcode,
                prefixed: self.prefixed,
            });
        }
        *slot = Some(instruction);
        Ok(())
    }

    fn finish(self) -> Box<[Option<Instruction>]> {
        self.slots.into_boxed_slice()
    }
}

/// Name of the 8-bit operand in bits 0-2 / 3-5 of an opcode.
pub(crate) fn r8_name(index: u8) -> &'static str {
    Reg::from_r8_index(index).map_or("(HL)", Reg::name)
}

/// Micro-ops leaving the 8-bit operand `index` in the accumulator.
pub(crate) fn read_r8(index: u8) -> Vec<MicroOp> {
    match Reg::from_r8_index(index) {
        Some(reg) => vec![MicroOp::Load(reg)],
        None => vec![MicroOp::Load(Reg::HL), MicroOp::LoadIndirect],
    }
}

/// Micro-ops storing the accumulator into the 8-bit operand `index`.
pub(crate) fn write_r8(index: u8) -> Vec<MicroOp> {
    match Reg::from_r8_index(index) {
        Some(reg) => vec![MicroOp::Store(reg)],
        None => vec![MicroOp::StoreAccumulator(Reg::HL)],
    }
}

/// Read-modify-write of operand `index` through `op`.
///
/// The (HL) form records the address in the context first so the write
/// goes back to the same byte after the accumulator has been replaced.
pub(crate) fn modify_r8(index: u8, op: MicroOp) -> Vec<MicroOp> {
    match Reg::from_r8_index(index) {
        Some(reg) => vec![MicroOp::Load(reg), op, MicroOp::Store(reg)],
        None => vec![
            MicroOp::Load(Reg::HL),
            MicroOp::ContextWrite,
            MicroOp::LoadIndirect,
            op,
            MicroOp::StoreAtSnapshot,
        ],
    }
}

#[inline]
pub(crate) fn is_hl_operand(index: u8) -> bool {
    index & 0x07 == 6
}
