use crate::error::Result;

/// Byte-addressable view of the 64 KiB Game Boy address space.
///
/// The CPU only ever talks to memory through this trait. `MemoryMap` is
/// the real implementation; tests plug in a flat RAM.
pub trait AddressSpace {
    fn get(&mut self, address: u16) -> Result<u8>;
    fn set(&mut self, address: u16, value: u8) -> Result<()>;

    /// Little-endian 16-bit read: low byte at `address`, high at `address+1`.
    fn get16(&mut self, address: u16) -> Result<u16> {
        let lo = self.get(address)?;
        let hi = self.get(address.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Little-endian 16-bit write, low byte first.
    fn set16(&mut self, address: u16, value: u16) -> Result<()> {
        let [lo, hi] = value.to_le_bytes();
        self.set(address, lo)?;
        self.set(address.wrapping_add(1), hi)
    }
}
