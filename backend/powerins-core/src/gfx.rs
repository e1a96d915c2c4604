use tilemap_core::{GfxError, GfxLayout, GfxRegion};

pub const PALETTE_LEN: usize = 0x800;

/// Decoded graphics ROMs, one region per palette bank.
#[derive(Debug, Clone)]
pub struct PowerInsGfx {
    pub layer0_tiles: GfxRegion,
    pub layer1_chars: GfxRegion,
    pub sprites: GfxRegion,
}

impl PowerInsGfx {
    pub const LAYER0_LAYOUT: GfxLayout =
        GfxLayout { tile_width: 16, tile_height: 16, color_base: 0x000, color_codes: 32 };
    pub const LAYER1_LAYOUT: GfxLayout =
        GfxLayout { tile_width: 8, tile_height: 8, color_base: 0x200, color_codes: 16 };
    pub const SPRITE_LAYOUT: GfxLayout =
        GfxLayout { tile_width: 16, tile_height: 16, color_base: 0x400, color_codes: 64 };

    /// Build all three regions from decoded pixels (one pen per byte, tile after tile).
    ///
    /// # Errors
    ///
    /// Returns an error if any region's pixel data is malformed.
    pub fn new(
        layer0_tiles: Vec<u8>,
        layer1_chars: Vec<u8>,
        sprites: Vec<u8>,
    ) -> Result<Self, GfxError> {
        Ok(Self {
            layer0_tiles: GfxRegion::new(Self::LAYER0_LAYOUT, layer0_tiles)?,
            layer1_chars: GfxRegion::new(Self::LAYER1_LAYOUT, layer1_chars)?,
            sprites: GfxRegion::new(Self::SPRITE_LAYOUT, sprites)?,
        })
    }
}
