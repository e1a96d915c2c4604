//! Per-frame tracking of which palette entries are visible on screen.

use crate::gfx::Transparency;
use bincode::{Decode, Encode};

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct PaletteUsage {
    used: Vec<u64>,
    previous: Vec<u64>,
    len: usize,
}

impl PaletteUsage {
    #[must_use]
    pub fn new(len: usize) -> Self {
        let words = len.div_ceil(64);
        Self { used: vec![0; words], previous: vec![0; words], len }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Clear the used set. The previous frame's set is kept for [`PaletteUsage::changed`].
    pub fn begin_frame(&mut self) {
        std::mem::swap(&mut self.used, &mut self.previous);
        self.used.fill(0);
    }

    #[inline]
    pub fn mark(&mut self, index: usize) {
        if index < self.len {
            self.used[index / 64] |= 1 << (index % 64);
        }
    }

    /// Mark `base + N` for every pen N set in `pen_mask`, skipping the transparent pen.
    pub fn mark_pens(&mut self, base: u16, pen_mask: u32, transparency: Transparency) {
        let mut pens = transparency.visible_pens(pen_mask);
        while pens != 0 {
            let pen = pens.trailing_zeros();
            self.mark(usize::from(base) + pen as usize);
            pens &= pens - 1;
        }
    }

    #[inline]
    #[must_use]
    pub fn is_used(&self, index: usize) -> bool {
        index < self.len && self.used[index / 64] & (1 << (index % 64)) != 0
    }

    #[must_use]
    pub fn used_count(&self) -> usize {
        self.used.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn used_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&index| self.is_used(index))
    }

    /// Whether the used set differs from the one built during the previous frame.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.used != self.previous
    }
}

/// Color generation hardware that consumes the used set, e.g. to recompute only visible colors.
pub trait PaletteDevice {
    /// Returns `true` if colors were remapped, which invalidates every resolved tile.
    fn recalculate(&mut self, usage: &PaletteUsage) -> bool;
}

/// Palette device that never remaps colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPalette;

impl PaletteDevice for FixedPalette {
    fn recalculate(&mut self, usage: &PaletteUsage) -> bool {
        log::trace!("{} palette entries in use", usage.used_count());
        false
    }
}
