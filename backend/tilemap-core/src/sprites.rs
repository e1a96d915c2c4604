//! Sprite list decoding.
//!
//! Each game supplies a [`SpriteFormat`] that turns one sprite RAM entry into a normalized
//! [`SpriteDescriptor`]. The same descriptors drive both palette marking and drawing, so the two
//! always agree on which sprites are visible and where their tiles land.

use crate::bitmap::{IndexedBitmap, Rect, ScreenGeometry, TileDraw};
use crate::gfx::{GfxRegion, Transparency};
use crate::palette::PaletteUsage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteDescriptor {
    /// Entry number in sprite RAM
    pub index: usize,
    /// Screen position of tile (0, 0)
    pub x: i32,
    pub y: i32,
    /// Size in tiles; always at least 1
    pub width: u32,
    pub height: u32,
    /// Screen offset between adjacent columns / rows
    pub step_x: i32,
    pub step_y: i32,
    /// Tile code of tile (0, 0)
    pub code: u32,
    /// Tile code offset between adjacent columns / rows
    pub code_step_col: i32,
    pub code_step_row: i32,
    pub color: u32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub priority: u8,
    pub tile_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteTile {
    pub code: u32,
    pub x: i32,
    pub y: i32,
}

impl SpriteDescriptor {
    #[inline]
    #[must_use]
    pub fn tile(&self, col: u32, row: u32) -> SpriteTile {
        let code = (self.code as i32)
            .wrapping_add(col as i32 * self.code_step_col)
            .wrapping_add(row as i32 * self.code_step_row);

        SpriteTile {
            code: code as u32,
            x: self.x + col as i32 * self.step_x,
            y: self.y + row as i32 * self.step_y,
        }
    }

    /// All tiles of the sprite, column by column.
    pub fn tiles(&self) -> impl Iterator<Item = SpriteTile> + '_ {
        (0..self.width).flat_map(move |col| (0..self.height).map(move |row| self.tile(col, row)))
    }

    /// Inclusive screen-space bounding box of every tile.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let last_x = self.x + (self.width as i32 - 1) * self.step_x;
        let last_y = self.y + (self.height as i32 - 1) * self.step_y;
        let size = self.tile_size as i32;

        Rect::new(
            self.x.min(last_x),
            self.x.max(last_x) + size - 1,
            self.y.min(last_y),
            self.y.max(last_y) + size - 1,
        )
    }

    #[must_use]
    pub fn tile_draw(&self, tile: SpriteTile, transparency: Transparency) -> TileDraw {
        TileDraw {
            code: tile.code,
            color: self.color,
            flip_x: self.flip_x,
            flip_y: self.flip_y,
            sx: tile.x,
            sy: tile.y,
            transparency,
        }
    }
}

/// Frame state that affects sprite decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteContext {
    pub flip_screen: bool,
    pub frame_number: u64,
    pub screen: ScreenGeometry,
    /// If false, sprites marked as flashing are treated as always visible
    pub flash_enabled: bool,
}

impl SpriteContext {
    #[inline]
    #[must_use]
    pub fn flash_visible(&self) -> bool {
        !self.flash_enabled || self.frame_number % 2 == 0
    }
}

pub trait SpriteFormat {
    /// Entry size in 16-bit words
    const ENTRY_WORDS: usize;

    /// Decode one entry. Returns `None` if the sprite is not displayed this frame.
    fn decode(&self, index: usize, entry: &[u16], ctx: &SpriteContext) -> Option<SpriteDescriptor>;
}

/// Lazy pass over sprite RAM in RAM order, skipping hidden and fully off-screen sprites.
///
/// A scanner is cheap to create; build a new one for every pass.
#[derive(Debug, Clone)]
pub struct SpriteScanner<'a, F> {
    format: &'a F,
    ram: &'a [u16],
    ctx: SpriteContext,
    next: usize,
}

impl<'a, F: SpriteFormat> SpriteScanner<'a, F> {
    #[must_use]
    pub fn new(format: &'a F, ram: &'a [u16], ctx: SpriteContext) -> Self {
        Self { format, ram, ctx, next: 0 }
    }
}

impl<F: SpriteFormat> Iterator for SpriteScanner<'_, F> {
    type Item = SpriteDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.next * F::ENTRY_WORDS;
            let entry = self.ram.get(start..start + F::ENTRY_WORDS)?;
            let index = self.next;
            self.next += 1;

            let Some(sprite) = self.format.decode(index, entry, &self.ctx) else { continue };
            if !sprite.bounds().intersects(&self.ctx.screen.visible) {
                continue;
            }

            return Some(sprite);
        }
    }
}

/// Returns the number of pixels written.
pub fn draw_sprite(
    bitmap: &mut IndexedBitmap,
    sprite: &SpriteDescriptor,
    gfx: &GfxRegion,
    transparency: Transparency,
    clip: Rect,
) -> u32 {
    sprite.tiles().map(|tile| bitmap.draw_tile(gfx, sprite.tile_draw(tile, transparency), clip)).sum()
}

pub fn mark_sprite_colors(
    usage: &mut PaletteUsage,
    sprite: &SpriteDescriptor,
    gfx: &GfxRegion,
    transparency: Transparency,
) {
    let color_base = gfx.color_base(sprite.color);
    for tile in sprite.tiles() {
        usage.mark_pens(color_base, gfx.pen_usage(tile.code), transparency);
    }
}
