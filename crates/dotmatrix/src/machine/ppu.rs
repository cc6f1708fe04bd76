use dotmatrix_common::{Display, ScanlineRenderer};

use crate::cpu::interrupts::{self, InterruptFlags};
use crate::error::Result;

use super::bus::{MemoryMap, LYC, STAT};

/// Last visible line.
const LAST_VISIBLE_LINE: u8 = 143;
/// Last line of vertical blank; the next line wraps to 0.
const LAST_LINE: u8 = 153;

/// LCD controller phase, with its STAT mode number as discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    HBlank = 0,
    VBlank = 1,
    OamRead = 2,
    VramRead = 3,
}

impl Phase {
    /// Length of the phase in machine cycles (per line for VBlank).
    pub fn budget(self) -> u32 {
        match self {
            Phase::OamRead => 20,
            Phase::VramRead => 43,
            Phase::HBlank => 51,
            Phase::VBlank => 114,
        }
    }

    #[inline]
    pub fn mode(self) -> u8 {
        self as u8
    }
}

/// Scanline/phase state machine driving LY, STAT and the frame signal.
///
/// Elapsed cycles are carried across phase boundaries so long runs do not
/// drift. Entering HBlank renders the current line; entering line 144
/// ends the frame.
pub struct PixelTiming {
    phase: Phase,
    elapsed: u32,
    line: u8,
    frames: u64,
    renderer: Box<dyn ScanlineRenderer>,
    display: Box<dyn Display>,
}

impl PixelTiming {
    pub fn new(renderer: Box<dyn ScanlineRenderer>, display: Box<dyn Display>) -> Self {
        Self {
            phase: Phase::OamRead,
            elapsed: 0,
            line: 0,
            frames: 0,
            renderer,
            display,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn line(&self) -> u8 {
        self.line
    }

    /// Cycles spent in the current phase so far.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Frames completed (VBlank entries) since power-on.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance by `cycles`. Returns true if a frame was completed.
    pub fn step(&mut self, cycles: u32, mem: &mut MemoryMap) -> Result<bool> {
        let start_line = self.line;
        let mut frame_done = false;

        self.elapsed += cycles;
        while self.elapsed >= self.phase.budget() {
            self.elapsed -= self.phase.budget();
            frame_done |= self.advance(mem)?;
        }

        mem.set_ly(self.line);
        self.update_stat(mem, self.line != start_line)?;
        Ok(frame_done)
    }

    fn advance(&mut self, mem: &mut MemoryMap) -> Result<bool> {
        let next = match self.phase {
            Phase::OamRead => Phase::VramRead,
            Phase::VramRead => {
                let registers = mem.lcd_registers();
                self.renderer
                    .render_scanline(self.line, &registers, self.display.as_mut());
                Phase::HBlank
            }
            Phase::HBlank if self.line == LAST_VISIBLE_LINE => {
                self.line += 1;
                self.enter_vblank(mem)?;
                log::trace!("LCD: {:?} -> VBlank, LY={}", self.phase, self.line);
                self.phase = Phase::VBlank;
                return Ok(true);
            }
            Phase::HBlank => {
                self.line += 1;
                Phase::OamRead
            }
            Phase::VBlank if self.line == LAST_LINE => {
                self.line = 0;
                Phase::OamRead
            }
            Phase::VBlank => {
                self.line += 1;
                Phase::VBlank
            }
        };
        if next != self.phase {
            log::trace!("LCD: {:?} -> {:?}, LY={}", self.phase, next, self.line);
        }
        self.phase = next;
        Ok(false)
    }

    fn enter_vblank(&mut self, mem: &mut MemoryMap) -> Result<()> {
        self.frames += 1;
        self.display.request_refresh();
        interrupts::request(mem, InterruptFlags::VBLANK)?;
        log::debug!("LCD: VBlank, frame {}", self.frames);
        Ok(())
    }

    /// Mirror the phase and LY==LYC into STAT, raising the STAT interrupt
    /// on a fresh coincidence when STAT bit 6 enables it.
    fn update_stat(&mut self, mem: &mut MemoryMap, line_changed: bool) -> Result<()> {
        let coincidence = self.line == mem.io(LYC);
        let mut stat = (mem.io(STAT) & !0x07) | self.phase.mode();
        if coincidence {
            stat |= 0x04;
        }
        mem.set_io(STAT, stat);

        if line_changed && coincidence && stat & 0x40 != 0 {
            interrupts::request(mem, InterruptFlags::STAT)?;
        }
        Ok(())
    }
}
