use tilemap_core::{GfxError, GfxLayout, GfxRegion};

pub const PALETTE_LEN: usize = 0x400;

/// Decoded graphics ROMs, one region per palette bank.
#[derive(Debug, Clone)]
pub struct MadMotorGfx {
    pub chars: GfxRegion,
    pub pf2_tiles: GfxRegion,
    pub pf3_tiles: GfxRegion,
    pub sprites: GfxRegion,
}

impl MadMotorGfx {
    pub const CHAR_LAYOUT: GfxLayout =
        GfxLayout { tile_width: 8, tile_height: 8, color_base: 0x000, color_codes: 16 };
    pub const PF2_LAYOUT: GfxLayout =
        GfxLayout { tile_width: 16, tile_height: 16, color_base: 0x100, color_codes: 16 };
    pub const PF3_LAYOUT: GfxLayout =
        GfxLayout { tile_width: 16, tile_height: 16, color_base: 0x200, color_codes: 16 };
    pub const SPRITE_LAYOUT: GfxLayout =
        GfxLayout { tile_width: 16, tile_height: 16, color_base: 0x300, color_codes: 16 };

    /// Build all four regions from decoded pixels (one pen per byte, tile after tile).
    ///
    /// # Errors
    ///
    /// Returns an error if any region's pixel data is malformed.
    pub fn new(
        chars: Vec<u8>,
        pf2_tiles: Vec<u8>,
        pf3_tiles: Vec<u8>,
        sprites: Vec<u8>,
    ) -> Result<Self, GfxError> {
        Ok(Self {
            chars: GfxRegion::new(Self::CHAR_LAYOUT, chars)?,
            pf2_tiles: GfxRegion::new(Self::PF2_LAYOUT, pf2_tiles)?,
            pf3_tiles: GfxRegion::new(Self::PF3_LAYOUT, pf3_tiles)?,
            sprites: GfxRegion::new(Self::SPRITE_LAYOUT, sprites)?,
        })
    }
}
