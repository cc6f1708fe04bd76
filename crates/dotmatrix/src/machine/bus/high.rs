use crate::cpu::AddressSpace;
use crate::error::Result;

use super::MemoryMap;

pub const P1: u16 = 0xFF00;
pub const DIV: u16 = 0xFF04;
pub const TIMA: u16 = 0xFF05;
pub const TMA: u16 = 0xFF06;
pub const TAC: u16 = 0xFF07;
pub const LCDC: u16 = 0xFF40;
pub const STAT: u16 = 0xFF41;
pub const LY: u16 = 0xFF44;
pub const LYC: u16 = 0xFF45;
pub const DMA: u16 = 0xFF46;
pub const BGP: u16 = 0xFF47;
pub const WX: u16 = 0xFF4B;

const OAM_START: u16 = 0xFE00;
const OAM_LEN: u16 = 0xA0;

impl MemoryMap {
    pub(super) fn read_high(&mut self, address: u16) -> u8 {
        let stored = self.io(address);
        match address {
            // Bits 7-6 read as 1, 5-4 are the select lines, 3-0 come from
            // the input device.
            P1 => 0xC0 | (stored & 0x30) | (self.input.get_keys() & 0x0F),
            STAT => stored | 0x80,
            _ => stored,
        }
    }

    pub(super) fn write_high(&mut self, address: u16, value: u8) -> Result<()> {
        match address {
            P1 => {
                self.input.set_input_column((value >> 4) & 0x0F);
                self.set_io(P1, value & 0x30);
            }
            // Any write resets the divider.
            DIV => self.set_io(DIV, 0),
            // LY is driven by the LCD timing unit; CPU writes reset it.
            LY => self.set_io(LY, 0),
            DMA => {
                self.set_io(DMA, value);
                self.oam_dma(value)?;
            }
            _ => self.set_io(address, value),
        }
        Ok(())
    }

    /// Copy 0xXX00..=0xXX9F into OAM through the normal write path, so the
    /// sprite decoder sees every byte. Unmapped source bytes read as 0xFF.
    fn oam_dma(&mut self, page: u8) -> Result<()> {
        let source = (page as u16) << 8;
        log::trace!("OAM DMA from 0x{source:04X}");
        let mut unmapped = 0;
        for offset in 0..OAM_LEN {
            let address = source.wrapping_add(offset);
            let byte = if self.region_at(address).is_some() {
                self.get(address)?
            } else {
                unmapped += 1;
                0xFF
            };
            self.set(OAM_START + offset, byte)?;
        }
        if unmapped > 0 {
            log::warn!("OAM DMA from 0x{source:04X}: {unmapped} unmapped source bytes read as 0xFF");
        }
        Ok(())
    }

    /// I/O block as the DMG boot ROM leaves it at 0x0100.
    pub fn apply_post_boot_io(&mut self) {
        const POST_BOOT: [(u16, u8); 31] = [
            (P1, 0x30),
            (DIV, 0xAB),
            (TIMA, 0x00),
            (TMA, 0x00),
            (TAC, 0xF8),
            (0xFF0F, 0x01),
            (0xFF10, 0x80),
            (0xFF11, 0xBF),
            (0xFF12, 0xF3),
            (0xFF14, 0xBF),
            (0xFF16, 0x3F),
            (0xFF17, 0x00),
            (0xFF19, 0xBF),
            (0xFF1A, 0x7F),
            (0xFF1B, 0xFF),
            (0xFF1C, 0x9F),
            (0xFF1E, 0xBF),
            (0xFF20, 0xFF),
            (0xFF21, 0x00),
            (0xFF22, 0x00),
            (0xFF23, 0xBF),
            (0xFF24, 0x77),
            (0xFF25, 0xF3),
            (0xFF26, 0xF1),
            (LCDC, 0x91),
            (STAT, 0x85),
            (LY, 0x00),
            (LYC, 0x00),
            (DMA, 0xFF),
            (BGP, 0xFC),
            (0xFFFF, 0x00),
        ];
        for (address, value) in POST_BOOT {
            self.set_io(address, value);
        }
    }
}
