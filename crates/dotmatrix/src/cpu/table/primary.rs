use crate::cpu::alu::{AluOp, ShiftOp};
use crate::cpu::{Condition, ImeChange, Instruction, MicroOp, Reg};
use crate::error::Result;

use super::{is_hl_operand, modify_r8, r8_name, read_r8, write_r8, PageBuilder};

use MicroOp::*;

pub(super) fn register(page: &mut PageBuilder) -> Result<()> {
    register_misc(page)?;
    register_loads16(page)?;
    register_indirect_a(page)?;
    register_incdec(page)?;
    register_loads8(page)?;
    register_alu(page)?;
    register_control(page)?;
    register_stack(page)?;
    register_high_page(page)?;
    Ok(())
}

fn register_misc(page: &mut PageBuilder) -> Result<()> {
    page.register(0x00, Instruction::fixed("NOP", vec![], 1))?;
    // STOP is encoded as 10 00; the padding byte is consumed.
    page.register(0x10, Instruction::fixed("STOP", vec![Fetch8, Stop], 1))?;
    page.register(0x76, Instruction::fixed("HALT", vec![Halt], 1))?;
    page.register(0xF3, Instruction::fixed("DI", vec![Interrupts(ImeChange::Disable)], 1))?;
    page.register(0xFB, Instruction::fixed("EI", vec![Interrupts(ImeChange::Enable)], 1))?;

    page.register(0x27, Instruction::fixed("DAA", vec![Daa], 1))?;
    page.register(0x2F, Instruction::fixed("CPL", vec![Cpl], 1))?;
    page.register(0x37, Instruction::fixed("SCF", vec![Scf], 1))?;
    page.register(0x3F, Instruction::fixed("CCF", vec![Ccf], 1))?;

    // Accumulator rotates: same as the prefixed forms but Z is always 0.
    for (opcode, op, label) in [
        (0x07, ShiftOp::Rlc, "RLCA"),
        (0x0F, ShiftOp::Rrc, "RRCA"),
        (0x17, ShiftOp::Rl, "RLA"),
        (0x1F, ShiftOp::Rr, "RRA"),
    ] {
        page.register(
            opcode,
            Instruction::fixed(label, vec![Load(Reg::A), RotateA(op), Store(Reg::A)], 1),
        )?;
    }
    Ok(())
}

fn register_loads16(page: &mut PageBuilder) -> Result<()> {
    for i in 0..4u8 {
        let rr = Reg::from_rr_index(i);
        page.register(
            0x01 | (i << 4),
            Instruction::fixed(format!("LD {},nn", rr.name()), vec![Fetch16, Store(rr)], 3),
        )?;
        page.register(
            0x09 | (i << 4),
            Instruction::fixed(
                format!("ADD HL,{}", rr.name()),
                vec![Load(rr), AddHl, Store(Reg::HL)],
                2,
            ),
        )?;
    }

    page.register(
        0x08,
        Instruction::fixed("LD (nn),SP", vec![Fetch16, StoreIndirect(Reg::SP)], 5),
    )?;
    page.register(
        0xF9,
        Instruction::fixed("LD SP,HL", vec![Load(Reg::HL), Store(Reg::SP)], 2),
    )?;
    page.register(
        0xE8,
        Instruction::fixed(
            "ADD SP,e",
            vec![Fetch8, SignExtend, AddSp, Store(Reg::SP)],
            4,
        ),
    )?;
    page.register(
        0xF8,
        Instruction::fixed(
            "LD HL,SP+e",
            vec![Fetch8, SignExtend, AddSp, Store(Reg::HL)],
            3,
        ),
    )?;
    Ok(())
}

/// LD (BC/DE/HL+/HL-),A and LD A,(BC/DE/HL+/HL-).
fn register_indirect_a(page: &mut PageBuilder) -> Result<()> {
    let forms: [(Reg, Option<MicroOp>, &str); 4] = [
        (Reg::BC, None, "(BC)"),
        (Reg::DE, None, "(DE)"),
        (Reg::HL, Some(Increment(Reg::HL)), "(HL+)"),
        (Reg::HL, Some(Decrement(Reg::HL)), "(HL-)"),
    ];

    for (i, (pointer, post, name)) in forms.into_iter().enumerate() {
        let row = (i as u8) << 4;

        let mut store = vec![Load(pointer), StoreIndirect(Reg::A)];
        store.extend(post);
        page.register(0x02 | row, Instruction::fixed(format!("LD {name},A"), store, 2))?;

        let mut load = vec![Load(pointer), LoadIndirect, Store(Reg::A)];
        load.extend(post);
        page.register(0x0A | row, Instruction::fixed(format!("LD A,{name}"), load, 2))?;
    }

    page.register(
        0xEA,
        Instruction::fixed("LD (nn),A", vec![Fetch16, StoreIndirect(Reg::A)], 4),
    )?;
    page.register(
        0xFA,
        Instruction::fixed("LD A,(nn)", vec![Fetch16, LoadIndirect, Store(Reg::A)], 4),
    )?;
    Ok(())
}

fn register_incdec(page: &mut PageBuilder) -> Result<()> {
    for i in 0..4u8 {
        let rr = Reg::from_rr_index(i);
        page.register(
            0x03 | (i << 4),
            Instruction::fixed(format!("INC {}", rr.name()), vec![Increment(rr)], 2),
        )?;
        page.register(
            0x0B | (i << 4),
            Instruction::fixed(format!("DEC {}", rr.name()), vec![Decrement(rr)], 2),
        )?;
    }

    for y in 0..8u8 {
        let cycles = if is_hl_operand(y) { 3 } else { 1 };
        page.register(
            0x04 | (y << 3),
            Instruction::fixed(format!("INC {}", r8_name(y)), modify_r8(y, Inc8), cycles),
        )?;
        page.register(
            0x05 | (y << 3),
            Instruction::fixed(format!("DEC {}", r8_name(y)), modify_r8(y, Dec8), cycles),
        )?;
    }
    Ok(())
}

/// LD r,n and the LD r,r' block 0x40-0x7F (0x76 is HALT).
fn register_loads8(page: &mut PageBuilder) -> Result<()> {
    for y in 0..8u8 {
        let mut ops = vec![Fetch8];
        ops.extend(write_r8(y));
        let cycles = if is_hl_operand(y) { 3 } else { 2 };
        page.register(
            0x06 | (y << 3),
            Instruction::fixed(format!("LD {},n", r8_name(y)), ops, cycles),
        )?;
    }

    for dst in 0..8u8 {
        for src in 0..8u8 {
            if is_hl_operand(dst) && is_hl_operand(src) {
                continue;
            }
            let mut ops = read_r8(src);
            ops.extend(write_r8(dst));
            let cycles = if is_hl_operand(dst) || is_hl_operand(src) { 2 } else { 1 };
            page.register(
                0x40 | (dst << 3) | src,
                Instruction::fixed(format!("LD {},{}", r8_name(dst), r8_name(src)), ops, cycles),
            )?;
        }
    }
    Ok(())
}

/// ALU r (0x80-0xBF) and ALU n (0xC6 + 8*op).
fn register_alu(page: &mut PageBuilder) -> Result<()> {
    for y in 0..8u8 {
        let op = AluOp::from_index(y);
        // CP only sets flags.
        let store = (op != AluOp::Cp).then_some(Store(Reg::A));

        for z in 0..8u8 {
            let mut ops = read_r8(z);
            ops.push(Alu(op));
            ops.extend(store);
            let cycles = if is_hl_operand(z) { 2 } else { 1 };
            page.register(
                0x80 | (y << 3) | z,
                Instruction::fixed(format!("{}{}", op.mnemonic(), r8_name(z)), ops, cycles),
            )?;
        }

        let mut ops = vec![Fetch8, Alu(op)];
        ops.extend(store);
        page.register(
            0xC6 | (y << 3),
            Instruction::fixed(format!("{}n", op.mnemonic()), ops, 2),
        )?;
    }
    Ok(())
}

fn register_control(page: &mut PageBuilder) -> Result<()> {
    page.register(
        0x18,
        Instruction::fixed("JR e", vec![Fetch8, SignExtend, JumpRelative(None)], 3),
    )?;
    page.register(0xC3, Instruction::fixed("JP nn", vec![Fetch16, Jump(None)], 4))?;
    page.register(
        0xE9,
        Instruction::fixed("JP (HL)", vec![Load(Reg::HL), Jump(None)], 1),
    )?;
    page.register(0xCD, Instruction::fixed("CALL nn", vec![Fetch16, Call(None)], 6))?;
    page.register(0xC9, Instruction::fixed("RET", vec![Return(None)], 4))?;
    page.register(
        0xD9,
        Instruction::fixed(
            "RETI",
            vec![Return(None), Interrupts(ImeChange::EnableNow)],
            4,
        ),
    )?;

    for i in 0..4u8 {
        let cc = Condition::from_index(i);
        let row = i << 3;
        page.register(
            0x20 | row,
            Instruction::branch(
                format!("JR {},e", cc.name()),
                vec![Fetch8, SignExtend, JumpRelative(Some(cc))],
                3,
                2,
            ),
        )?;
        page.register(
            0xC0 | row,
            Instruction::branch(format!("RET {}", cc.name()), vec![Return(Some(cc))], 5, 2),
        )?;
        page.register(
            0xC2 | row,
            Instruction::branch(
                format!("JP {},nn", cc.name()),
                vec![Fetch16, Jump(Some(cc))],
                4,
                3,
            ),
        )?;
        page.register(
            0xC4 | row,
            Instruction::branch(
                format!("CALL {},nn", cc.name()),
                vec![Fetch16, Call(Some(cc))],
                6,
                3,
            ),
        )?;
    }

    for y in 0..8u8 {
        let vector = (y as i32) * 8;
        page.register(
            0xC7 | (y << 3),
            Instruction::fixed(
                format!("RST {vector:02X}h"),
                vec![Immediate(vector), Call(None)],
                4,
            ),
        )?;
    }
    Ok(())
}

fn register_stack(page: &mut PageBuilder) -> Result<()> {
    for i in 0..4u8 {
        let rr = Reg::from_stack_index(i);
        page.register(
            0xC1 | (i << 4),
            Instruction::fixed(format!("POP {}", rr.name()), vec![Pop, Store(rr)], 3),
        )?;
        page.register(
            0xC5 | (i << 4),
            Instruction::fixed(format!("PUSH {}", rr.name()), vec![Load(rr), Push], 4),
        )?;
    }
    Ok(())
}

/// LDH forms addressing 0xFF00 + n and 0xFF00 + C.
fn register_high_page(page: &mut PageBuilder) -> Result<()> {
    page.register(
        0xE0,
        Instruction::fixed("LDH (n),A", vec![Fetch8, HighPage, StoreIndirect(Reg::A)], 3),
    )?;
    page.register(
        0xF0,
        Instruction::fixed(
            "LDH A,(n)",
            vec![Fetch8, HighPage, LoadIndirect, Store(Reg::A)],
            3,
        ),
    )?;
    page.register(
        0xE2,
        Instruction::fixed(
            "LD (C),A",
            vec![Load(Reg::C), HighPage, StoreIndirect(Reg::A)],
            2,
        ),
    )?;
    page.register(
        0xF2,
        Instruction::fixed(
            "LD A,(C)",
            vec![Load(Reg::C), HighPage, LoadIndirect, Store(Reg::A)],
            2,
        ),
    )?;
    Ok(())
}
