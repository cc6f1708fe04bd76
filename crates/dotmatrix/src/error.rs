use std::fmt;

/// Errors surfaced by the emulation core.
///
/// `Range` and the construction-time variants signal bugs in the core or
/// its configuration; `UnmappedAddress` and `UndefinedOpcode` can be
/// reached by emulated software and are left to the host to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A value does not fit the bit width of its destination.
    Range { value: i64, bits: u8 },
    /// Read from an address no region backs.
    UnmappedAddress(u16),
    /// Opcode with no registered instruction.
    UndefinedOpcode { opcode: u8, prefixed: bool, pc: u16 },
    /// The same opcode was registered twice while building a table.
    DuplicateOpcode { opcode: u8, prefixed: bool },
    /// Two memory regions claim the same address.
    OverlappingRegion(u16),
    /// Cartridge header declares a mapper the core does not handle.
    UnsupportedCartridge(u8),
    /// ROM image has more banks than its mapper can address.
    RomTooLarge { banks: usize, max_banks: usize },
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Range { value, bits } => {
                write!(f, "value {value} is out of range for {bits} bits")
            }
            CoreError::UnmappedAddress(addr) => write!(f, "unmapped address 0x{addr:04X}"),
            CoreError::UndefinedOpcode {
                opcode,
                prefixed: true,
                pc,
            } => write!(f, "undefined opcode 0xCB 0x{opcode:02X} at 0x{pc:04X}"),
            CoreError::UndefinedOpcode { opcode, pc, .. } => {
                write!(f, "undefined opcode 0x{opcode:02X} at 0x{pc:04X}")
            }
            CoreError::DuplicateOpcode { opcode, prefixed } => {
                let page = if *prefixed { "prefixed" } else { "primary" };
                write!(f, "opcode 0x{opcode:02X} registered twice in the {page} table")
            }
            CoreError::OverlappingRegion(addr) => {
                write!(f, "memory regions overlap at 0x{addr:04X}")
            }
            CoreError::UnsupportedCartridge(kind) => {
                write!(f, "unsupported cartridge type 0x{kind:02X}")
            }
            CoreError::RomTooLarge { banks, max_banks } => {
                write!(f, "ROM has {banks} banks but the mapper addresses at most {max_banks}")
            }
        }
    }
}

impl std::error::Error for CoreError {}
