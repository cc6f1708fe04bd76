//! Divider and programmable timer.
//!
//! Time arrives in machine cycles. A sub-counter fires every 4 cycles;
//! each firing advances the DIV prescaler (DIV ticks every 16 firings) and
//! the TIMA counter, which increments TIMA once it reaches the threshold
//! selected by TAC bits 0-1. The TIMA counter only runs while TAC bit 2
//! is set and restarts from 0 whenever the timer is disabled. The registers
//! themselves live in the I/O block of the memory map.

use crate::cpu::interrupts::{self, InterruptFlags};
use crate::error::Result;

use super::bus::{MemoryMap, DIV, TAC, TIMA, TMA};

/// Cycles per sub-counter firing.
const SUB_TICK: u32 = 4;
/// Firings per DIV increment.
const DIV_PERIOD: u32 = 16;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    /// Every cycle the timer has been stepped by.
    total_cycles: u64,
    sub_counter: u32,
    div_counter: u32,
    main_counter: u32,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Firings TIMA waits for, by TAC bits 0-1.
    #[inline]
    pub fn threshold(tac: u8) -> u32 {
        match tac & 0x03 {
            0 => 64,
            1 => 1,
            2 => 4,
            _ => 16,
        }
    }

    pub fn step(&mut self, cycles: u32, mem: &mut MemoryMap) -> Result<()> {
        self.total_cycles += cycles as u64;
        self.sub_counter += cycles;
        while self.sub_counter >= SUB_TICK {
            self.sub_counter -= SUB_TICK;
            self.fire(mem)?;
        }
        Ok(())
    }

    fn fire(&mut self, mem: &mut MemoryMap) -> Result<()> {
        self.div_counter += 1;
        if self.div_counter >= DIV_PERIOD {
            self.div_counter = 0;
            let div = mem.io(DIV).wrapping_add(1);
            mem.set_io(DIV, div);
        }

        let tac = mem.io(TAC);
        if tac & 0x04 == 0 {
            self.main_counter = 0;
            return Ok(());
        }
        self.main_counter += 1;
        if self.main_counter < Self::threshold(tac) {
            return Ok(());
        }
        self.main_counter = 0;

        match mem.io(TIMA).checked_add(1) {
            Some(tima) => mem.set_io(TIMA, tima),
            None => {
                let tma = mem.io(TMA);
                mem.set_io(TIMA, tma);
                log::trace!("TIMA overflow, reloaded 0x{tma:02X}");
                interrupts::request(mem, InterruptFlags::TIMER)?;
            }
        }
        Ok(())
    }
}
