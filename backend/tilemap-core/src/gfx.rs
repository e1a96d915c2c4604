//! Decoded tile graphics and per-tile pen usage.

use bincode::{Decode, Encode};
use thiserror::Error;

pub const PENS_PER_COLOR: u16 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GfxLayout {
    pub tile_width: u32,
    pub tile_height: u32,
    /// First palette index used by this region
    pub color_base: u16,
    /// Number of 16-pen color codes available to this region
    pub color_codes: u16,
}

impl GfxLayout {
    #[inline]
    #[must_use]
    pub const fn tile_area(&self) -> usize {
        (self.tile_width * self.tile_height) as usize
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GfxError {
    #[error("Graphics region contains no tiles")]
    Empty,
    #[error("Graphics data length {len} is not a multiple of the tile area {tile_area}")]
    PixelCountMismatch { len: usize, tile_area: usize },
    #[error("Tile {element} contains pen {pen}; pens must be less than 16")]
    PenOutOfRange { pen: u8, element: u32 },
    #[error("Graphics region layout has no color codes")]
    NoColorCodes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub enum Transparency {
    #[default]
    Opaque,
    Pen(u8),
}

impl Transparency {
    #[inline]
    #[must_use]
    pub const fn is_transparent(self, pen: u8) -> bool {
        match self {
            Self::Opaque => false,
            Self::Pen(transparent) => pen == transparent,
        }
    }

    /// Remove the transparent pen (if any) from a pen usage mask.
    #[inline]
    #[must_use]
    pub const fn visible_pens(self, pen_mask: u32) -> u32 {
        match self {
            Self::Opaque => pen_mask,
            Self::Pen(transparent) => pen_mask & !(1 << transparent),
        }
    }
}

/// One graphics region: a set of equally-sized tiles with one pen byte per pixel.
#[derive(Debug, Clone)]
pub struct GfxRegion {
    layout: GfxLayout,
    elements: u32,
    pixels: Box<[u8]>,
    pen_usage: Box<[u32]>,
}

impl GfxRegion {
    /// Build a region from decoded pixels, tile after tile, rows top to bottom.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout has no color codes, or if the pixel data is empty, is not a
    /// whole number of tiles, or contains a pen that does not fit in a 16-pen color code.
    pub fn new(layout: GfxLayout, pixels: Vec<u8>) -> Result<Self, GfxError> {
        if layout.color_codes == 0 {
            return Err(GfxError::NoColorCodes);
        }

        let tile_area = layout.tile_area();
        if pixels.is_empty() || tile_area == 0 {
            return Err(GfxError::Empty);
        }

        if pixels.len() % tile_area != 0 {
            return Err(GfxError::PixelCountMismatch { len: pixels.len(), tile_area });
        }

        let pen_usage = pixels
            .chunks_exact(tile_area)
            .enumerate()
            .map(|(element, tile)| {
                tile.iter().try_fold(0_u32, |mask, &pen| {
                    if u16::from(pen) >= PENS_PER_COLOR {
                        return Err(GfxError::PenOutOfRange { pen, element: element as u32 });
                    }
                    Ok(mask | (1 << pen))
                })
            })
            .collect::<Result<Box<[u32]>, _>>()?;

        let elements = pen_usage.len() as u32;

        log::debug!(
            "Loaded {elements} {}x{} tiles with palette base {:03X}",
            layout.tile_width,
            layout.tile_height,
            layout.color_base
        );

        Ok(Self { layout, elements, pixels: pixels.into_boxed_slice(), pen_usage })
    }

    /// Build a region by evaluating `pen_fn(element, x, y)` for every pixel.
    ///
    /// # Errors
    ///
    /// Same conditions as [`GfxRegion::new`].
    pub fn from_fn(
        layout: GfxLayout,
        elements: u32,
        pen_fn: impl Fn(u32, u32, u32) -> u8,
    ) -> Result<Self, GfxError> {
        let mut pixels = Vec::with_capacity(elements as usize * layout.tile_area());
        for element in 0..elements {
            for y in 0..layout.tile_height {
                for x in 0..layout.tile_width {
                    pixels.push(pen_fn(element, x, y));
                }
            }
        }

        Self::new(layout, pixels)
    }

    #[inline]
    #[must_use]
    pub fn layout(&self) -> &GfxLayout {
        &self.layout
    }

    #[inline]
    #[must_use]
    pub fn element_count(&self) -> u32 {
        self.elements
    }

    #[inline]
    #[must_use]
    pub fn tile_width(&self) -> u32 {
        self.layout.tile_width
    }

    #[inline]
    #[must_use]
    pub fn tile_height(&self) -> u32 {
        self.layout.tile_height
    }

    /// Codes past the end of the region wrap around.
    #[inline]
    #[must_use]
    pub fn normalize_code(&self, code: u32) -> u32 {
        code % self.elements
    }

    #[inline]
    #[must_use]
    pub fn pixel(&self, code: u32, x: u32, y: u32) -> u8 {
        let base = self.normalize_code(code) as usize * self.layout.tile_area();
        self.pixels[base + (y * self.layout.tile_width + x) as usize]
    }

    /// Bit N is set if pen N appears anywhere in the tile.
    #[inline]
    #[must_use]
    pub fn pen_usage(&self, code: u32) -> u32 {
        self.pen_usage[self.normalize_code(code) as usize]
    }

    #[inline]
    #[must_use]
    pub fn color_base(&self, color: u32) -> u16 {
        let color = (color % u32::from(self.layout.color_codes)) as u16;
        self.layout.color_base + color * PENS_PER_COLOR
    }

    #[inline]
    #[must_use]
    pub fn palette_index(&self, color: u32, pen: u8) -> u16 {
        self.color_base(color) + u16::from(pen)
    }
}
