//! Tilemap store: tile RAM, dirty tracking, resolved tile cache and scrolling.
//!
//! The store is indexed by memory offset rather than by (col, row), so several logical views
//! with different dimensions can share one backing buffer and one set of dirty bits.

use crate::bitmap::{IndexedBitmap, ScreenGeometry};
use crate::gfx::{GfxRegion, Transparency};
use crate::palette::PaletteUsage;
use bincode::{Decode, Encode};
use tilecade_common::WordRam;

/// Mapping from logical tile coordinates to tile RAM offsets.
///
/// Each variant reproduces the address wiring of one kind of hardware playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum ScanOrder {
    /// 64x64 grid stored as four 32x32 pages
    MadMotorText,
    /// 32x32 grid stored as four 16x16 pages
    MadMotorTiles,
    /// 32x64 grid stored as eight 16x16 pages
    MadMotorTall,
    /// 128x16 grid stored as eight 16x16 pages
    MadMotorWide,
    /// 256x32 grid; columns of 16 tiles, with the lower 16 rows in a second 0x1000-word bank
    PowerInsPaged,
    RowMajor,
    ColumnMajor,
}

impl ScanOrder {
    #[inline]
    #[must_use]
    pub const fn offset(self, col: u32, row: u32, num_cols: u32, num_rows: u32) -> usize {
        let offset = match self {
            Self::MadMotorText => {
                (col & 0x1F) | ((row & 0x1F) << 5) | ((row & 0x20) << 5) | ((col & 0x20) << 6)
            }
            Self::MadMotorTiles => {
                (col & 0x0F) | ((row & 0x0F) << 4) | ((row & 0x10) << 4) | ((col & 0x10) << 5)
            }
            Self::MadMotorTall => {
                (col & 0x0F) | ((row & 0x0F) << 4) | ((row & 0x30) << 4) | ((col & 0x10) << 6)
            }
            Self::MadMotorWide => (col & 0x0F) | ((row & 0x0F) << 4) | ((col & 0x70) << 4),
            Self::PowerInsPaged => col * 16 + row % 16 + (row / 16) * 0x1000,
            Self::RowMajor => row * num_cols + col,
            Self::ColumnMajor => col * num_rows + row,
        };
        offset as usize
    }
}

/// One logical view over a tilemap store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilemapLayout {
    pub cols: u32,
    pub rows: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub scan: ScanOrder,
}

impl TilemapLayout {
    #[inline]
    #[must_use]
    pub const fn tile_count(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    #[inline]
    #[must_use]
    pub const fn pixel_width(&self) -> u32 {
        self.cols * self.tile_width
    }

    #[inline]
    #[must_use]
    pub const fn pixel_height(&self) -> u32 {
        self.rows * self.tile_height
    }

    #[inline]
    #[must_use]
    pub const fn offset(&self, col: u32, row: u32) -> usize {
        self.scan.offset(col, row, self.cols, self.rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct TileInfo {
    pub code: u32,
    pub color: u32,
}

/// Decodes a raw tile RAM word.
pub trait TileResolver {
    fn resolve(&self, word: u16) -> TileInfo;
}

/// 12-bit tile code with a 4-bit color in the top nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlainTiles;

impl TileResolver for PlainTiles {
    #[inline]
    fn resolve(&self, word: u16) -> TileInfo {
        TileInfo { code: u32::from(word & 0x0FFF), color: u32::from(word >> 12) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct DirtyBits {
    words: Vec<u64>,
    len: usize,
}

impl DirtyBits {
    #[must_use]
    pub fn new_all_set(len: usize) -> Self {
        let mut bits = Self { words: vec![0; len.div_ceil(64)], len };
        bits.set_all();
        bits
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        self.words[index / 64] |= 1 << (index % 64);
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        self.words[index / 64] & (1 << (index % 64)) != 0
    }

    pub fn set_all(&mut self) {
        self.words.fill(!0);

        let tail = self.len % 64;
        if tail != 0 {
            let last = self.words.len() - 1;
            self.words[last] = (1 << tail) - 1;
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Clear every set bit, invoking `f` with each index that was set.
    pub fn drain(&mut self, mut f: impl FnMut(usize)) {
        for (word_idx, word) in self.words.iter_mut().enumerate() {
            let mut bits = std::mem::take(word);
            while bits != 0 {
                f(word_idx * 64 + bits.trailing_zeros() as usize);
                bits &= bits - 1;
            }
        }
    }
}

/// Drawing parameters for one tilemap view.
#[derive(Debug, Clone, Copy)]
pub struct LayerDraw<'gfx> {
    pub layout: TilemapLayout,
    pub gfx: &'gfx GfxRegion,
    pub transparency: Transparency,
    pub flip: bool,
    pub screen: ScreenGeometry,
}

#[derive(Debug, Clone, Encode, Decode)]
pub struct Tilemap<const LEN: usize> {
    ram: WordRam<LEN>,
    dirty: DirtyBits,
    cache: Vec<TileInfo>,
    scroll_x: i32,
    row_scroll: Vec<i32>,
    scroll_y: i32,
}

impl<const LEN: usize> Tilemap<LEN> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: WordRam::new(),
            dirty: DirtyBits::new_all_set(LEN),
            cache: vec![TileInfo::default(); LEN],
            scroll_x: 0,
            row_scroll: Vec::new(),
            scroll_y: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn read(&self, byte_offset: u32) -> u16 {
        self.ram.read(byte_offset)
    }

    /// Combine-write into tile RAM and mark the written tile dirty, whether or not the value
    /// changed. Returns the tile index that was written.
    pub fn write(&mut self, byte_offset: u32, data: u16, mask: u16) -> usize {
        let index = self.ram.write(byte_offset, data, mask);
        self.mark_dirty(index);
        index
    }

    #[inline]
    pub fn mark_dirty(&mut self, index: usize) {
        self.dirty.set(index % LEN);
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.set_all();
    }

    #[inline]
    #[must_use]
    pub fn is_dirty(&self, index: usize) -> bool {
        self.dirty.get(index % LEN)
    }

    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty.count()
    }

    /// Decode the tile at `index` directly from RAM.
    #[inline]
    #[must_use]
    pub fn resolve(&self, index: usize, resolver: &impl TileResolver) -> TileInfo {
        resolver.resolve(self.ram[index % LEN])
    }

    /// Re-resolve every dirty tile into the cache and clear the dirty bits.
    ///
    /// Returns the number of tiles resolved.
    pub fn update(&mut self, resolver: &impl TileResolver) -> usize {
        let mut resolved = 0;
        self.dirty.drain(|index| {
            self.cache[index] = resolver.resolve(self.ram[index]);
            resolved += 1;
        });
        resolved
    }

    /// Most recently resolved info for the tile at `index`.
    #[inline]
    #[must_use]
    pub fn tile_info(&self, index: usize) -> TileInfo {
        self.cache[index % LEN]
    }

    pub fn set_scroll_x(&mut self, scroll_x: i32) {
        self.scroll_x = scroll_x;
    }

    /// Per-row X deltas, indexed by tilemap pixel row. An empty slice disables row scroll.
    pub fn set_row_scroll(&mut self, deltas: impl IntoIterator<Item = i32>) {
        self.row_scroll.clear();
        self.row_scroll.extend(deltas);
    }

    pub fn set_scroll_y(&mut self, scroll_y: i32) {
        self.scroll_y = scroll_y;
    }

    #[inline]
    #[must_use]
    pub fn scroll_x(&self, row: u32) -> i32 {
        if self.row_scroll.is_empty() {
            return self.scroll_x;
        }

        self.scroll_x + self.row_scroll[row as usize % self.row_scroll.len()]
    }

    #[inline]
    #[must_use]
    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    // Tilemap-space pixel shown at screen position (x, y)
    fn source_pixel(&self, args: &LayerDraw<'_>, x: i32, y: i32) -> (u32, u32) {
        let layout = &args.layout;
        let (x, y) = if args.flip { args.screen.mirror(x, y) } else { (x, y) };

        let ty = (y + self.scroll_y).rem_euclid(layout.pixel_height() as i32) as u32;
        let tx = (x + self.scroll_x(ty)).rem_euclid(layout.pixel_width() as i32) as u32;
        (tx, ty)
    }

    /// Draw the visible area of the screen from the resolved tile cache.
    pub fn draw(&self, bitmap: &mut IndexedBitmap, args: &LayerDraw<'_>) {
        let Some(clip) = bitmap.clamp(args.screen.visible) else { return };
        let layout = args.layout;

        for y in clip.min_y..=clip.max_y {
            for x in clip.min_x..=clip.max_x {
                let (tx, ty) = self.source_pixel(args, x, y);
                let index = layout.offset(tx / layout.tile_width, ty / layout.tile_height);
                let TileInfo { code, color } = self.cache[index % LEN];

                let pen = args.gfx.pixel(code, tx % layout.tile_width, ty % layout.tile_height);
                if args.transparency.is_transparent(pen) {
                    continue;
                }

                bitmap.set(x as u32, y as u32, args.gfx.palette_index(color, pen));
            }
        }
    }

    /// Mark the colors of every tile that touches the visible area.
    ///
    /// Tiles are resolved straight from RAM since this runs before dirty tiles are re-resolved.
    pub fn mark_visible_colors(
        &self,
        usage: &mut PaletteUsage,
        args: &LayerDraw<'_>,
        resolver: &impl TileResolver,
    ) {
        let layout = args.layout;
        let visible = args.screen.visible;

        let mut seen = vec![false; layout.tile_count()];
        for y in visible.min_y..=visible.max_y {
            for x in visible.min_x..=visible.max_x {
                let (tx, ty) = self.source_pixel(args, x, y);
                let index = layout.offset(tx / layout.tile_width, ty / layout.tile_height);
                let slot = index % seen.len();
                if seen[slot] {
                    continue;
                }
                seen[slot] = true;

                let TileInfo { code, color } = self.resolve(index, resolver);
                usage.mark_pens(
                    args.gfx.color_base(color),
                    args.gfx.pen_usage(code),
                    args.transparency,
                );
            }
        }
    }
}

impl<const LEN: usize> Default for Tilemap<LEN> {
    fn default() -> Self {
        Self::new()
    }
}
