use crate::Display;

/// Notified on every VRAM write so a derived tile cache can be refreshed.
pub trait TileDecoder {
    fn update_tile(&mut self, address: u16);
}

/// Notified on every OAM write so a derived sprite table can be refreshed.
pub trait SpriteDecoder {
    fn update_sprite(&mut self, address: u16, value: u8);
}

/// Draws one scanline into a `Display`.
///
/// Called by the LCD timing unit each time a line enters horizontal blank.
/// `registers` holds the LCD I/O block 0xFF40..=0xFF4B at call time
/// (LCDC, STAT, SCY, SCX, LY, LYC, DMA, BGP, OBP0, OBP1, WY, WX).
pub trait ScanlineRenderer {
    fn render_scanline(&mut self, line: u8, registers: &[u8; 12], display: &mut dyn Display);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullTileDecoder;

impl TileDecoder for NullTileDecoder {
    fn update_tile(&mut self, _address: u16) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpriteDecoder;

impl SpriteDecoder for NullSpriteDecoder {
    fn update_sprite(&mut self, _address: u16, _value: u8) {}
}

/// Renderer that leaves the display untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl ScanlineRenderer for NullRenderer {
    fn render_scanline(&mut self, _line: u8, _registers: &[u8; 12], _display: &mut dyn Display) {}
}
