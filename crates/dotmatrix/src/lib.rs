//! Game Boy (DMG) emulation core.
//!
//! The CPU is a table of micro-op sequences driven over an
//! [`AddressSpace`](cpu::AddressSpace); the [`machine`] module wires it
//! to the memory map, interrupt controller, timer and LCD timing.
//! Drawing, input and ROM files stay with the host, which plugs in
//! through the traits in `dotmatrix_common`.

pub mod bits;
pub mod config;
pub mod cpu;
pub mod error;
pub mod machine;

pub use config::MachineConfig;
pub use error::{CoreError, Result};
pub use machine::GameBoy;

pub use dotmatrix_common::{SCREEN_HEIGHT, SCREEN_WIDTH};
