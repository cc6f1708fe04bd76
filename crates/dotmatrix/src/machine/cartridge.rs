use crate::error::{CoreError, Result};

pub const ROM_BANK_SIZE: usize = 0x4000;
pub const RAM_BANK_SIZE: usize = 0x2000;

const TYPE_OFFSET: usize = 0x0147;
const RAM_SIZE_OFFSET: usize = 0x0149;

/// Mapper declared by header byte 0x0147.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapperKind {
    None,
    Mbc1,
    Mbc1Ram,
}

impl MapperKind {
    pub fn from_header(code: u8) -> Result<Self> {
        match code {
            0x00 => Ok(MapperKind::None),
            0x01 => Ok(MapperKind::Mbc1),
            0x02 | 0x03 => Ok(MapperKind::Mbc1Ram),
            other => Err(CoreError::UnsupportedCartridge(other)),
        }
    }

    pub fn max_rom_banks(self) -> usize {
        match self {
            MapperKind::None => 2,
            MapperKind::Mbc1 | MapperKind::Mbc1Ram => 128,
        }
    }

    pub fn max_ram_banks(self) -> usize {
        match self {
            MapperKind::None | MapperKind::Mbc1 => 0,
            MapperKind::Mbc1Ram => 4,
        }
    }
}

/// A ROM image with its parsed header.
///
/// Only sizing is modelled: bank 0 backs the fixed window and bank 1 the
/// switchable one. Mapper register writes are not interpreted.
#[derive(Clone, Debug)]
pub struct Cartridge {
    kind: MapperKind,
    rom: Vec<u8>,
    rom_banks: usize,
    ram_banks: usize,
}

impl Cartridge {
    /// Parse the header of `rom`. An image too short to have a header is
    /// treated as a plain 32 KiB cartridge.
    pub fn parse(rom: Vec<u8>) -> Result<Self> {
        let kind = MapperKind::from_header(rom.get(TYPE_OFFSET).copied().unwrap_or(0))?;

        let rom_banks = rom.len().div_ceil(ROM_BANK_SIZE);
        if rom_banks > kind.max_rom_banks() {
            return Err(CoreError::RomTooLarge {
                banks: rom_banks,
                max_banks: kind.max_rom_banks(),
            });
        }

        // 2 KiB is rounded up to a full bank.
        let declared_ram = match rom.get(RAM_SIZE_OFFSET).copied().unwrap_or(0) {
            0x01 | 0x02 => 1,
            0x03 => 4,
            0x04 => 16,
            0x05 => 8,
            _ => 0,
        };
        let ram_banks = declared_ram.min(kind.max_ram_banks());
        if ram_banks < declared_ram {
            log::warn!(
                "cartridge declares {declared_ram} RAM banks, {kind:?} maps {ram_banks}"
            );
        }

        log::debug!(
            "cartridge: {:?}, {} ROM banks, {} RAM banks",
            kind,
            rom_banks,
            ram_banks
        );
        Ok(Self {
            kind,
            rom,
            rom_banks,
            ram_banks,
        })
    }

    /// No cartridge inserted.
    pub fn empty() -> Self {
        Self {
            kind: MapperKind::None,
            rom: Vec::new(),
            rom_banks: 0,
            ram_banks: 0,
        }
    }

    pub fn kind(&self) -> MapperKind {
        self.kind
    }

    pub fn rom_banks(&self) -> usize {
        self.rom_banks
    }

    pub fn ram_banks(&self) -> usize {
        self.ram_banks
    }

    /// Contents of ROM bank `bank`, zero-padded to a full bank.
    pub fn bank(&self, bank: usize) -> Vec<u8> {
        let mut data = vec![0; ROM_BANK_SIZE];
        let start = bank * ROM_BANK_SIZE;
        if start < self.rom.len() {
            let end = (start + ROM_BANK_SIZE).min(self.rom.len());
            data[..end - start].copy_from_slice(&self.rom[start..end]);
        }
        data
    }
}
