use crate::gfx::{GfxRegion, Transparency};
use bincode::{Decode, Encode};

/// Rectangle with inclusive bounds on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct Rect {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self { min_x, max_x, min_y, max_y }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        (self.max_x - self.min_x + 1) as u32
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        (self.max_y - self.min_y + 1) as u32
    }

    #[inline]
    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// Full bitmap dimensions plus the area the display actually shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
    pub visible: Rect,
}

impl ScreenGeometry {
    /// Mirror a screen coordinate on both axes, as done by a global screen flip.
    #[inline]
    #[must_use]
    pub const fn mirror(&self, x: i32, y: i32) -> (i32, i32) {
        (self.width as i32 - 1 - x, self.height as i32 - 1 - y)
    }
}

/// Destination bitmap of palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u16>,
}

impl IndexedBitmap {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; (width * height) as usize] }
    }

    #[must_use]
    pub fn for_screen(screen: &ScreenGeometry) -> Self {
        Self::new(screen.width, screen.height)
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u16 {
        self.pixels[(y * self.width + x) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u16) {
        self.pixels[(y * self.width + x) as usize] = value;
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.pixels
    }

    /// Clamp a rectangle to the bitmap bounds. Returns `None` if nothing is left.
    #[must_use]
    pub fn clamp(&self, rect: Rect) -> Option<Rect> {
        let clamped = Rect {
            min_x: rect.min_x.max(0),
            max_x: rect.max_x.min(self.width as i32 - 1),
            min_y: rect.min_y.max(0),
            max_y: rect.max_y.min(self.height as i32 - 1),
        };

        (clamped.min_x <= clamped.max_x && clamped.min_y <= clamped.max_y).then_some(clamped)
    }

    pub fn fill_rect(&mut self, rect: Rect, value: u16) {
        let Some(rect) = self.clamp(rect) else { return };

        for y in rect.min_y..=rect.max_y {
            let start = (y as u32 * self.width) as usize;
            self.pixels[start + rect.min_x as usize..=start + rect.max_x as usize].fill(value);
        }
    }

    /// Draw one tile with its top-left corner at (`sx`, `sy`), restricted to `clip`.
    ///
    /// Returns the number of pixels written.
    pub fn draw_tile(&mut self, gfx: &GfxRegion, tile: TileDraw, clip: Rect) -> u32 {
        let Some(clip) = self.clamp(clip) else { return 0 };

        let tile_width = gfx.tile_width() as i32;
        let tile_height = gfx.tile_height() as i32;
        let bounds = Rect::new(tile.sx, tile.sx + tile_width - 1, tile.sy, tile.sy + tile_height - 1);
        if !bounds.intersects(&clip) {
            return 0;
        }

        let color_base = gfx.color_base(tile.color);

        let mut written = 0;
        for y in bounds.min_y.max(clip.min_y)..=bounds.max_y.min(clip.max_y) {
            let mut tile_y = (y - tile.sy) as u32;
            if tile.flip_y {
                tile_y = tile_height as u32 - 1 - tile_y;
            }

            for x in bounds.min_x.max(clip.min_x)..=bounds.max_x.min(clip.max_x) {
                let mut tile_x = (x - tile.sx) as u32;
                if tile.flip_x {
                    tile_x = tile_width as u32 - 1 - tile_x;
                }

                let pen = gfx.pixel(tile.code, tile_x, tile_y);
                if tile.transparency.is_transparent(pen) {
                    continue;
                }

                self.set(x as u32, y as u32, color_base + u16::from(pen));
                written += 1;
            }
        }

        written
    }
}

/// Arguments for drawing a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDraw {
    pub code: u32,
    pub color: u32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub sx: i32,
    pub sy: i32,
    pub transparency: Transparency,
}
