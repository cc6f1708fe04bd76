use dotmatrix_common::{
    Display, InputDevice, NullDisplay, NullInput, NullRenderer, NullSpriteDecoder,
    NullTileDecoder, ScanlineRenderer, SpriteDecoder, TileDecoder,
};
use typed_builder::TypedBuilder;

/// Everything a `GameBoy` is built from.
///
/// ```
/// use dotmatrix::{GameBoy, MachineConfig};
///
/// let config = MachineConfig::builder().rom(vec![0; 0x8000]).build();
/// let gb = GameBoy::with_config(config).unwrap();
/// assert_eq!(gb.registers().pc, 0x0100);
/// ```
#[derive(TypedBuilder)]
pub struct MachineConfig {
    /// Cartridge image. Empty means no cartridge: ROM stays writable.
    #[builder(default)]
    pub rom: Vec<u8>,
    /// Start from the state the boot ROM leaves behind (PC=0x0100).
    #[builder(default = true)]
    pub skip_boot: bool,
    #[builder(default = Box::new(NullDisplay) as Box<dyn Display>)]
    pub display: Box<dyn Display>,
    #[builder(default = Box::new(NullInput) as Box<dyn InputDevice>)]
    pub input: Box<dyn InputDevice>,
    #[builder(default = Box::new(NullTileDecoder) as Box<dyn TileDecoder>)]
    pub tile_decoder: Box<dyn TileDecoder>,
    #[builder(default = Box::new(NullSpriteDecoder) as Box<dyn SpriteDecoder>)]
    pub sprite_decoder: Box<dyn SpriteDecoder>,
    #[builder(default = Box::new(NullRenderer) as Box<dyn ScanlineRenderer>)]
    pub renderer: Box<dyn ScanlineRenderer>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
