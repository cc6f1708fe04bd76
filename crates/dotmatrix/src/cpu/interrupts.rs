use bitflags::bitflags;

use crate::error::Result;

use super::micro;
use super::{AddressSpace, Context, ImeChange, Registers};

/// Interrupt Flag register (requested sources).
pub const IF_ADDRESS: u16 = 0xFF0F;
/// Interrupt Enable register.
pub const IE_ADDRESS: u16 = 0xFFFF;
/// Machine cycles charged for dispatching to a vector.
pub const DISPATCH_CYCLES: u32 = 12;

bitflags! {
    /// The five interrupt sources as laid out in IE and IF. Lower bits
    /// have higher priority.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 0b0000_0001;
        const STAT = 0b0000_0010;
        const TIMER = 0b0000_0100;
        const SERIAL = 0b0000_1000;
        const JOYPAD = 0b0001_0000;
    }
}

impl InterruptFlags {
    /// Highest-priority source in the set, with its vector.
    pub fn highest(self) -> Option<(InterruptFlags, u16)> {
        if self.is_empty() {
            return None;
        }
        let index = self.bits().trailing_zeros() as u16;
        let source = InterruptFlags::from_bits_truncate(1 << index);
        Some((source, 0x0040 + 8 * index))
    }
}

/// Request an interrupt by setting its bit in IF.
pub fn request<M: AddressSpace + ?Sized>(mem: &mut M, source: InterruptFlags) -> Result<()> {
    let flags = mem.get(IF_ADDRESS)?;
    mem.set(IF_ADDRESS, flags | source.bits())
}

/// IME, HALT and STOP state plus the EI delay.
///
/// EI is modelled as a countdown of instruction boundaries: it is armed
/// when EI completes and fires when the following instruction completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterruptController {
    ime: bool,
    halted: bool,
    stopped: bool,
    enable_countdown: u8,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn ime(&self) -> bool {
        self.ime
    }

    pub fn set_ime(&mut self, enabled: bool) {
        self.ime = enabled;
        self.enable_countdown = 0;
    }

    #[inline]
    pub fn halted(&self) -> bool {
        self.halted
    }

    #[inline]
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// True while an EI is waiting for its following instruction.
    #[inline]
    pub fn enable_pending(&self) -> bool {
        self.enable_countdown > 0
    }

    /// Instruction boundary: advance the EI delay, then apply whatever the
    /// instruction just executed asked for.
    pub fn end_instruction(&mut self, ctx: &Context) {
        if self.enable_countdown > 0 {
            self.enable_countdown -= 1;
            if self.enable_countdown == 0 {
                self.ime = true;
                log::trace!("IME enabled (delayed EI)");
            }
        }

        match ctx.ime {
            Some(ImeChange::Enable) => self.enable_countdown = 1,
            Some(ImeChange::EnableNow) => self.set_ime(true),
            Some(ImeChange::Disable) => self.set_ime(false),
            None => {}
        }

        if ctx.halt {
            self.halted = true;
        }
        if ctx.stop {
            self.stopped = true;
        }
    }

    /// Poll IE/IF between instructions.
    ///
    /// Any pending source wakes a halted CPU; a pending joypad source also
    /// ends STOP. With IME set and the CPU not stopped, the highest-priority
    /// source is serviced: its IF bit is cleared, IME is dropped, PC is
    /// pushed and replaced by the vector. Returns the dispatch cost when
    /// that happens.
    pub fn poll<M: AddressSpace + ?Sized>(
        &mut self,
        regs: &mut Registers,
        mem: &mut M,
    ) -> Result<Option<u32>> {
        let enabled = mem.get(IE_ADDRESS)?;
        let requested = mem.get(IF_ADDRESS)?;
        let pending = InterruptFlags::from_bits_truncate(enabled & requested);
        let Some((source, vector)) = pending.highest() else {
            return Ok(None);
        };

        if self.halted {
            log::trace!("leaving HALT, pending {:?}", pending);
            self.halted = false;
        }
        if self.stopped && pending.contains(InterruptFlags::JOYPAD) {
            log::trace!("leaving STOP on joypad");
            self.stopped = false;
        }
        // STOP only ends on joypad; nothing is serviced until then.
        if !self.ime || self.stopped {
            return Ok(None);
        }

        mem.set(IF_ADDRESS, requested & !source.bits())?;
        self.ime = false;
        self.enable_countdown = 0;
        let pc = regs.pc;
        micro::push(regs, mem, pc)?;
        regs.pc = vector;

        log::debug!(
            "interrupt {:?} -> 0x{:04X} (PC=0x{:04X} SP=0x{:04X} IE=0x{:02X} IF=0x{:02X})",
            source,
            vector,
            pc,
            regs.sp,
            enabled,
            requested
        );
        Ok(Some(DISPATCH_CYCLES))
    }
}
