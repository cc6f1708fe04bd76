use crate::cpu::alu::ShiftOp;
use crate::cpu::{Instruction, MicroOp};
use crate::error::Result;

use super::{is_hl_operand, modify_r8, r8_name, read_r8, PageBuilder};

/// Register the whole 0xCB page.
///
/// Opcodes decode as `xx yyy zzz`: x selects the group (shift, BIT, RES,
/// SET), y the shift kind or bit index, z the operand.
pub(super) fn register(page: &mut PageBuilder) -> Result<()> {
    for opcode in 0..=0xFFu8 {
        let x = opcode >> 6;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;
        let operand = r8_name(z);
        let hl = is_hl_operand(z);

        let instruction = match x {
            0 => {
                let op = ShiftOp::from_index(y);
                Instruction::fixed(
                    format!("{} {operand}", op.mnemonic()),
                    modify_r8(z, MicroOp::Shift(op)),
                    if hl { 4 } else { 2 },
                )
            }
            1 => {
                let mut ops = read_r8(z);
                ops.push(MicroOp::BitTest(y));
                Instruction::fixed(format!("BIT {y},{operand}"), ops, if hl { 3 } else { 2 })
            }
            _ => {
                let set = x == 3;
                let name = if set { "SET" } else { "RES" };
                Instruction::fixed(
                    format!("{name} {y},{operand}"),
                    modify_r8(z, MicroOp::BitSet(y, set)),
                    if hl { 4 } else { 2 },
                )
            }
        };
        page.register(opcode, instruction)?;
    }
    Ok(())
}
