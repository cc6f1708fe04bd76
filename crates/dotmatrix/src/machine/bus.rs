//! Region-dispatched memory map.
//!
//! Every address resolves through a flat lookup table built once from
//! `LAYOUT`. Regions own their bytes; side effects (decoder
//! notifications, ROM write protection, the I/O block) live here and in
//! `high`.

mod high;
mod regions;

use dotmatrix_common::{InputDevice, SpriteDecoder, TileDecoder};

use crate::cpu::AddressSpace;
use crate::error::{CoreError, Result};

use super::cartridge::{Cartridge, RAM_BANK_SIZE};

pub use high::{BGP, DIV, DMA, LCDC, LY, LYC, P1, STAT, TAC, TIMA, TMA, WX};
pub use regions::{RegionId, LAYOUT};
use regions::{build_dispatch, Region};

const HIGH_BASE: u16 = 0xFF00;

pub struct MemoryMap {
    dispatch: Box<[Option<RegionId>]>,
    fixed_rom: Region,
    switchable_rom: Region,
    video_ram: Region,
    external_ram: Region,
    work_ram: Region,
    oam: Region,
    high: Region,
    /// Once set, writes below 0x8000 are dropped.
    rom_initialized: bool,
    input: Box<dyn InputDevice>,
    tile_decoder: Box<dyn TileDecoder>,
    sprite_decoder: Box<dyn SpriteDecoder>,
}

impl MemoryMap {
    pub fn new(
        input: Box<dyn InputDevice>,
        tile_decoder: Box<dyn TileDecoder>,
        sprite_decoder: Box<dyn SpriteDecoder>,
    ) -> Result<Self> {
        let dispatch = build_dispatch(&LAYOUT)?;
        let [fixed_rom, switchable_rom, video_ram, external_ram, work_ram, oam, high] =
            LAYOUT.map(|(_, range)| Region::new(&range));
        Ok(Self {
            dispatch,
            fixed_rom,
            switchable_rom,
            video_ram,
            external_ram,
            work_ram,
            oam,
            high,
            rom_initialized: false,
            input,
            tile_decoder,
            sprite_decoder,
        })
    }

    /// Copy bank 0 and bank 1 of the cartridge into the ROM windows.
    pub fn load_cartridge(&mut self, cartridge: &Cartridge) {
        self.fixed_rom.load(&cartridge.bank(0));
        self.switchable_rom.load(&cartridge.bank(1));
        if cartridge.ram_banks() > 0 {
            log::debug!(
                "external RAM window backed by bank 0 of {} ({} bytes each)",
                cartridge.ram_banks(),
                RAM_BANK_SIZE
            );
        }
    }

    /// Write-protect the ROM windows.
    pub fn mark_rom_initialized(&mut self) {
        self.rom_initialized = true;
    }

    pub fn rom_initialized(&self) -> bool {
        self.rom_initialized
    }

    #[inline]
    pub fn region_at(&self, address: u16) -> Option<RegionId> {
        self.dispatch[address as usize]
    }

    fn region(&self, id: RegionId) -> &Region {
        match id {
            RegionId::FixedRom => &self.fixed_rom,
            RegionId::SwitchableRom => &self.switchable_rom,
            RegionId::VideoRam => &self.video_ram,
            RegionId::ExternalRam => &self.external_ram,
            RegionId::WorkRam => &self.work_ram,
            RegionId::Oam => &self.oam,
            RegionId::HighMemory => &self.high,
        }
    }

    fn region_mut(&mut self, id: RegionId) -> &mut Region {
        match id {
            RegionId::FixedRom => &mut self.fixed_rom,
            RegionId::SwitchableRom => &mut self.switchable_rom,
            RegionId::VideoRam => &mut self.video_ram,
            RegionId::ExternalRam => &mut self.external_ram,
            RegionId::WorkRam => &mut self.work_ram,
            RegionId::Oam => &mut self.oam,
            RegionId::HighMemory => &mut self.high,
        }
    }

    /// Raw I/O register read with no side effects.
    #[inline]
    pub fn io(&self, address: u16) -> u8 {
        debug_assert!(address >= HIGH_BASE);
        self.high.get(address)
    }

    /// Raw I/O register write with no side effects. Used by the timer and
    /// LCD timing units, which own the registers they drive.
    #[inline]
    pub fn set_io(&mut self, address: u16, value: u8) {
        debug_assert!(address >= HIGH_BASE);
        self.high.set(address, value);
    }

    /// LY as written by the LCD timing unit.
    #[inline]
    pub fn set_ly(&mut self, line: u8) {
        self.set_io(LY, line);
    }

    /// LCDC through WX, as handed to the scanline renderer.
    pub fn lcd_registers(&self) -> [u8; 12] {
        let mut registers = [0; 12];
        for (slot, address) in registers.iter_mut().zip(LCDC..=WX) {
            *slot = self.io(address);
        }
        registers
    }
}

impl AddressSpace for MemoryMap {
    fn get(&mut self, address: u16) -> Result<u8> {
        match self.region_at(address) {
            None => Err(CoreError::UnmappedAddress(address)),
            Some(RegionId::HighMemory) => Ok(self.read_high(address)),
            Some(id) => Ok(self.region(id).get(address)),
        }
    }

    fn set(&mut self, address: u16, value: u8) -> Result<()> {
        match self.region_at(address) {
            None => {
                log::warn!("write of 0x{value:02X} to unmapped 0x{address:04X} ignored");
                Ok(())
            }
            Some(RegionId::FixedRom | RegionId::SwitchableRom) if self.rom_initialized => {
                log::warn!("write of 0x{value:02X} to ROM at 0x{address:04X} ignored");
                Ok(())
            }
            Some(RegionId::HighMemory) => self.write_high(address, value),
            Some(id) => {
                self.region_mut(id).set(address, value);
                match id {
                    RegionId::VideoRam => self.tile_decoder.update_tile(address),
                    RegionId::Oam => self.sprite_decoder.update_sprite(address, value),
                    _ => {}
                }
                Ok(())
            }
        }
    }
}
