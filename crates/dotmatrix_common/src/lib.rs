//! Host-facing vocabulary shared between the `dotmatrix` core and whatever
//! drives it (a window, a test harness, a headless runner).
//!
//! The core never draws or polls hardware itself. It talks to the outside
//! world exclusively through the collaborator traits re-exported here.

pub mod decode;
pub mod display;
pub mod input;

pub use decode::{NullRenderer, NullSpriteDecoder, NullTileDecoder, ScanlineRenderer};
pub use decode::{SpriteDecoder, TileDecoder};
pub use display::{Display, FrameBuffer, NullDisplay};
pub use input::{Button, InputDevice, Joypad, NullInput};

/// Logical LCD width in pixels.
pub const SCREEN_WIDTH: usize = 160;
/// Logical LCD height in pixels.
pub const SCREEN_HEIGHT: usize = 144;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    /// Pack into the `RGBA` little-endian word handed to `Display::set_pixel`.
    pub const fn to_u32(&self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    pub const fn from_u32(packed: u32) -> Color {
        let [r, g, b, a] = packed.to_le_bytes();
        Color { r, g, b, a }
    }
}

/// One of the four grey levels a DMG palette entry can select.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Shade {
    #[default]
    White,
    LightGray,
    DarkGray,
    Black,
}

impl Shade {
    /// Decode a 2-bit palette value. Only the low two bits are used.
    pub const fn from_bits(bits: u8) -> Shade {
        match bits & 0x03 {
            0 => Shade::White,
            1 => Shade::LightGray,
            2 => Shade::DarkGray,
            _ => Shade::Black,
        }
    }

    /// The classic green-tinted rendition of the shade.
    pub const fn color(self) -> Color {
        match self {
            Shade::White => Color::new_rgb(0xE0, 0xF8, 0xD0),
            Shade::LightGray => Color::new_rgb(0x88, 0xC0, 0x70),
            Shade::DarkGray => Color::new_rgb(0x34, 0x68, 0x56),
            Shade::Black => Color::new_rgb(0x08, 0x18, 0x20),
        }
    }

    #[inline]
    pub const fn packed(self) -> u32 {
        self.color().to_u32()
    }
}
