//! Per-frame rendering pipeline.
//!
//! Every frame runs the same sequence of stages from scratch:
//!
//! `Idle -> ScrollApply -> PaletteScan -> [PaletteRecalc] -> TilemapUpdate -> Draw -> Idle`
//!
//! `PaletteRecalc` only runs when the set of visible colors differs from the previous frame.

use crate::bitmap::{IndexedBitmap, ScreenGeometry};
use crate::palette::{PaletteDevice, PaletteUsage};
use bincode::{Decode, Encode};
use tilecade_proc_macros::EnumDisplay;

/// Palette index written to the visible area before any layer is drawn.
pub const BACKDROP_PEN: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode, EnumDisplay)]
pub enum FrameStage {
    #[default]
    Idle,
    ScrollApply,
    PaletteScan,
    PaletteRecalc,
    TilemapUpdate,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    pub frame_number: u64,
    pub flip_screen: bool,
    pub screen: ScreenGeometry,
}

/// Game-specific video hardware driven by [`FrameCompositor`].
pub trait VideoHardware {
    fn screen(&self) -> ScreenGeometry;

    /// Number of palette entries
    fn palette_len(&self) -> usize;

    fn flip_screen(&self) -> bool;

    /// Push the current scroll registers into the tilemaps.
    fn apply_scroll(&mut self);

    /// Mark every color that the draw stage will write this frame.
    fn mark_palette_usage(&self, usage: &mut PaletteUsage, ctx: &FrameContext);

    fn mark_all_tiles_dirty(&mut self);

    /// Re-resolve dirty tiles in every tilemap. Returns the number of tiles resolved.
    fn update_tilemaps(&mut self) -> usize;

    /// Draw all layers and sprites in hardware order. Returns the number of sprites drawn.
    fn draw(&self, bitmap: &mut IndexedBitmap, ctx: &FrameContext) -> usize;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub frame_number: u64,
    /// Every non-idle stage entered this frame, in order
    pub stages: Vec<FrameStage>,
    pub palette_colors_used: usize,
    pub palette_recalculated: bool,
    pub tiles_resolved: usize,
    pub sprites_drawn: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct FrameCompositor {
    frame_number: u64,
    last_flip: Option<bool>,
    stage: FrameStage,
    usage: PaletteUsage,
}

impl FrameCompositor {
    #[must_use]
    pub fn new(palette_len: usize) -> Self {
        Self {
            frame_number: 0,
            last_flip: None,
            stage: FrameStage::Idle,
            usage: PaletteUsage::new(palette_len),
        }
    }

    #[inline]
    #[must_use]
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    #[inline]
    #[must_use]
    pub fn stage(&self) -> FrameStage {
        self.stage
    }

    #[inline]
    #[must_use]
    pub fn palette_usage(&self) -> &PaletteUsage {
        &self.usage
    }

    /// Render one frame into `bitmap`.
    pub fn run_frame<H, P>(
        &mut self,
        hardware: &mut H,
        palette: &mut P,
        bitmap: &mut IndexedBitmap,
    ) -> FrameStats
    where
        H: VideoHardware + ?Sized,
        P: PaletteDevice + ?Sized,
    {
        if self.usage.len() != hardware.palette_len() {
            self.usage = PaletteUsage::new(hardware.palette_len());
        }

        let ctx = FrameContext {
            frame_number: self.frame_number,
            flip_screen: hardware.flip_screen(),
            screen: hardware.screen(),
        };
        let mut stats = FrameStats { frame_number: self.frame_number, ..FrameStats::default() };

        self.stage = FrameStage::ScrollApply;
        while self.stage != FrameStage::Idle {
            log::trace!("Frame {}: entering stage {}", ctx.frame_number, self.stage);
            stats.stages.push(self.stage);

            self.stage = match self.stage {
                FrameStage::ScrollApply => {
                    hardware.apply_scroll();
                    FrameStage::PaletteScan
                }
                FrameStage::PaletteScan => {
                    self.usage.begin_frame();
                    hardware.mark_palette_usage(&mut self.usage, &ctx);
                    stats.palette_colors_used = self.usage.used_count();

                    if self.usage.changed() {
                        FrameStage::PaletteRecalc
                    } else {
                        FrameStage::TilemapUpdate
                    }
                }
                FrameStage::PaletteRecalc => {
                    stats.palette_recalculated = palette.recalculate(&self.usage);
                    if stats.palette_recalculated {
                        log::debug!("Palette remapped; invalidating all tiles");
                        hardware.mark_all_tiles_dirty();
                    }
                    FrameStage::TilemapUpdate
                }
                FrameStage::TilemapUpdate => {
                    if self.last_flip.is_some_and(|last_flip| last_flip != ctx.flip_screen) {
                        log::debug!("Screen flip changed to {}; invalidating all tiles", ctx.flip_screen);
                        hardware.mark_all_tiles_dirty();
                    }
                    self.last_flip = Some(ctx.flip_screen);

                    stats.tiles_resolved = hardware.update_tilemaps();
                    FrameStage::Draw
                }
                FrameStage::Draw => {
                    bitmap.fill_rect(ctx.screen.visible, BACKDROP_PEN);
                    stats.sprites_drawn = hardware.draw(bitmap, &ctx);
                    FrameStage::Idle
                }
                FrameStage::Idle => FrameStage::Idle,
            };
        }

        self.frame_number += 1;

        stats
    }
}
