use std::ops::RangeInclusive;

use crate::error::{CoreError, Result};

/// The seven backing regions of the DMG address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionId {
    FixedRom,
    SwitchableRom,
    VideoRam,
    ExternalRam,
    WorkRam,
    Oam,
    HighMemory,
}

/// Fixed layout of the memory map. 0xE000-0xFDFF (echo RAM) and
/// 0xFEA0-0xFEFF have no backing region.
pub const LAYOUT: [(RegionId, RangeInclusive<u16>); 7] = [
    (RegionId::FixedRom, 0x0000..=0x3FFF),
    (RegionId::SwitchableRom, 0x4000..=0x7FFF),
    (RegionId::VideoRam, 0x8000..=0x9FFF),
    (RegionId::ExternalRam, 0xA000..=0xBFFF),
    (RegionId::WorkRam, 0xC000..=0xDFFF),
    (RegionId::Oam, 0xFE00..=0xFE9F),
    (RegionId::HighMemory, 0xFF00..=0xFFFF),
];

/// Flat address -> region lookup, one slot per address.
///
/// Fails with `OverlappingRegion` at the first address claimed twice.
pub(crate) fn build_dispatch(
    layout: &[(RegionId, RangeInclusive<u16>)],
) -> Result<Box<[Option<RegionId>]>> {
    let mut table = vec![None; 0x1_0000];
    for (id, range) in layout {
        for address in range.clone() {
            let slot = &mut table[address as usize];
            if slot.is_some() {
                return Err(CoreError::OverlappingRegion(address));
            }
            *slot = Some(*id);
        }
    }
    Ok(table.into_boxed_slice())
}

/// Contiguous block of bytes starting at `base`.
#[derive(Clone, Debug)]
pub(crate) struct Region {
    base: u16,
    data: Vec<u8>,
}

impl Region {
    pub(crate) fn new(range: &RangeInclusive<u16>) -> Self {
        let len = (*range.end() - *range.start()) as usize + 1;
        Self {
            base: *range.start(),
            data: vec![0; len],
        }
    }

    #[inline]
    pub(crate) fn get(&self, address: u16) -> u8 {
        self.data[(address - self.base) as usize]
    }

    #[inline]
    pub(crate) fn set(&mut self, address: u16, value: u8) {
        self.data[(address - self.base) as usize] = value;
    }

    /// Overwrite from the start of the region; extra bytes are dropped.
    pub(crate) fn load(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(self.data.len());
        self.data[..len].copy_from_slice(&bytes[..len]);
    }
}
