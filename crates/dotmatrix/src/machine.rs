mod bus;
mod cartridge;
mod gameboy;
mod ppu;
mod timer;

pub use bus::{MemoryMap, RegionId, LAYOUT};
pub use cartridge::{Cartridge, MapperKind, RAM_BANK_SIZE, ROM_BANK_SIZE};
pub use gameboy::GameBoy;
pub use ppu::{Phase, PixelTiming};
pub use timer::Timer;

/// Named I/O register addresses.
pub mod io {
    pub use super::bus::{BGP, DIV, DMA, LCDC, LY, LYC, P1, STAT, TAC, TIMA, TMA, WX};
    pub use crate::cpu::interrupts::{IE_ADDRESS as IE, IF_ADDRESS as IF};
}

#[cfg(test)]
mod tests;
