mod registers;
mod sprites;

use crate::gfx::{MadMotorGfx, PALETTE_LEN};
use bincode::{Decode, Encode};
use tilecade_common::WordRam;
use tilecade_config::VideoConfig;
use tilemap_core::compositor::{FrameContext, VideoHardware};
use tilemap_core::sprites::{SpriteContext, SpriteScanner, draw_sprite, mark_sprite_colors};
use tilemap_core::tilemap::{LayerDraw, PlainTiles, ScanOrder, Tilemap, TilemapLayout};
use tilemap_core::{GfxRegion, IndexedBitmap, PaletteUsage, Rect, ScreenGeometry, Transparency};

use registers::PlayfieldControl;
pub use registers::Pf3View;
use sprites::{MadMotorSprites, SPRITE_RAM_WORDS};

pub const SCREEN: ScreenGeometry =
    ScreenGeometry { width: 256, height: 256, visible: Rect::new(0, 255, 8, 247) };

pub const PF1_LAYOUT: TilemapLayout = TilemapLayout {
    cols: 64,
    rows: 64,
    tile_width: 8,
    tile_height: 8,
    scan: ScanOrder::MadMotorText,
};

pub const PF2_LAYOUT: TilemapLayout = TilemapLayout {
    cols: 32,
    rows: 32,
    tile_width: 16,
    tile_height: 16,
    scan: ScanOrder::MadMotorTiles,
};

const PF1_TRANSPARENCY: Transparency = Transparency::Pen(0);
const PF2_TRANSPARENCY: Transparency = Transparency::Pen(0);
const PF3_TRANSPARENCY: Transparency = Transparency::Opaque;
const SPRITE_TRANSPARENCY: Transparency = Transparency::Pen(0);

const ROWSCROLL_WORDS: usize = 0x400;
// Only the second half of row scroll RAM is used; one entry per playfield 1 pixel row
const ROWSCROLL_TABLE_START: usize = 0x200;
const ROWSCROLL_TABLE_LEN: usize = 0x200;

/// Identifies a memory region on the video bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Pf1Control,
    RowScroll,
    Pf1Data,
    Unused,
    Pf2Control,
    Pf2Data,
    Pf3Control,
    Pf3Data,
    SpriteRam,
}

impl Region {
    /// Map a CPU byte address to a region and the byte offset within it.
    #[must_use]
    pub fn decode(address: u32) -> Option<(Self, u32)> {
        let (region, base) = match address {
            0x180000..=0x18001F => (Self::Pf1Control, 0x180000),
            0x184000..=0x1847FF => (Self::RowScroll, 0x184000),
            0x188000..=0x189FFF => (Self::Pf1Data, 0x188000),
            0x18C000..=0x18C001 => (Self::Unused, 0x18C000),
            0x190000..=0x19001F => (Self::Pf2Control, 0x190000),
            0x198000..=0x1987FF => (Self::Pf2Data, 0x198000),
            0x1A0000..=0x1A001F => (Self::Pf3Control, 0x1A0000),
            0x1A4000..=0x1A4FFF => (Self::Pf3Data, 0x1A4000),
            0x3E8000..=0x3E87FF => (Self::SpriteRam, 0x3E8000),
            _ => return None,
        };

        Some((region, address - base))
    }
}

#[derive(Debug, Clone, Encode, Decode)]
pub struct MadMotorState {
    pf1_control: PlayfieldControl,
    pf2_control: PlayfieldControl,
    pf3_control: PlayfieldControl,
    rowscroll: WordRam<ROWSCROLL_WORDS>,
    pub(crate) pf1: Tilemap<0x1000>,
    pub(crate) pf2: Tilemap<0x400>,
    pub(crate) pf3: Tilemap<0x800>,
    sprite_ram: WordRam<SPRITE_RAM_WORDS>,
}

impl MadMotorState {
    fn new() -> Self {
        Self {
            pf1_control: PlayfieldControl::default(),
            pf2_control: PlayfieldControl::default(),
            pf3_control: PlayfieldControl::default(),
            rowscroll: WordRam::new(),
            pf1: Tilemap::new(),
            pf2: Tilemap::new(),
            pf3: Tilemap::new(),
            sprite_ram: WordRam::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MadMotorHardware {
    pub(crate) state: MadMotorState,
    gfx: MadMotorGfx,
    pub(crate) config: VideoConfig,
}

impl MadMotorHardware {
    pub fn new(gfx: MadMotorGfx, config: VideoConfig) -> Self {
        Self { state: MadMotorState::new(), gfx, config }
    }

    pub fn pf3_view(&self) -> Pf3View {
        self.state.pf3_control.pf3_view()
    }

    pub fn read(&self, region: Region, offset: u32) -> u16 {
        let state = &self.state;
        match region {
            Region::Pf1Control => state.pf1_control.read(offset),
            Region::RowScroll => state.rowscroll.read(offset),
            Region::Pf1Data => state.pf1.read(offset),
            Region::Unused => 0,
            Region::Pf2Control => state.pf2_control.read(offset),
            Region::Pf2Data => state.pf2.read(offset),
            Region::Pf3Control => state.pf3_control.read(offset),
            Region::Pf3Data => state.pf3.read(offset),
            Region::SpriteRam => state.sprite_ram.read(offset),
        }
    }

    pub fn write(&mut self, region: Region, offset: u32, data: u16, mask: u16) {
        let state = &mut self.state;
        match region {
            Region::Pf1Control => {
                let prev_flip = state.pf1_control.flip_screen();
                state.pf1_control.write(offset, data, mask);

                let flip = state.pf1_control.flip_screen();
                if flip != prev_flip {
                    log::debug!("Screen flip set to {flip}");
                }
            }
            Region::RowScroll => {
                state.rowscroll.write(offset, data, mask);
            }
            Region::Pf1Data => {
                state.pf1.write(offset, data, mask);
            }
            Region::Unused => {}
            Region::Pf2Control => state.pf2_control.write(offset, data, mask),
            Region::Pf2Data => {
                state.pf2.write(offset, data, mask);
            }
            Region::Pf3Control => {
                let prev_view = state.pf3_control.pf3_view();
                state.pf3_control.write(offset, data, mask);

                let view = state.pf3_control.pf3_view();
                if view != prev_view {
                    log::debug!("Playfield 3 shape changed to {view}");
                }
            }
            Region::Pf3Data => {
                state.pf3.write(offset, data, mask);
            }
            Region::SpriteRam => {
                state.sprite_ram.write(offset, data, mask);
            }
        }
    }

    fn sprite_ctx(&self, ctx: &FrameContext) -> SpriteContext {
        SpriteContext {
            flip_screen: ctx.flip_screen,
            frame_number: ctx.frame_number,
            screen: ctx.screen,
            flash_enabled: self.config.sprite_flash_enabled,
        }
    }

    fn sprites(&self, ctx: &FrameContext) -> SpriteScanner<'_, MadMotorSprites> {
        SpriteScanner::new(&MadMotorSprites, &self.state.sprite_ram, self.sprite_ctx(ctx))
    }
}

fn layer_args<'gfx>(
    layout: TilemapLayout,
    gfx: &'gfx GfxRegion,
    transparency: Transparency,
    ctx: &FrameContext,
) -> LayerDraw<'gfx> {
    LayerDraw { layout, gfx, transparency, flip: ctx.flip_screen, screen: ctx.screen }
}

impl VideoHardware for MadMotorHardware {
    fn screen(&self) -> ScreenGeometry {
        SCREEN
    }

    fn palette_len(&self) -> usize {
        PALETTE_LEN
    }

    fn flip_screen(&self) -> bool {
        self.state.pf1_control.flip_screen()
    }

    fn apply_scroll(&mut self) {
        let state = &mut self.state;

        state.pf1.set_scroll_x(state.pf1_control.scroll_x());
        state.pf1.set_scroll_y(state.pf1_control.scroll_y());
        state.pf1.set_row_scroll(
            state.rowscroll[ROWSCROLL_TABLE_START..ROWSCROLL_TABLE_START + ROWSCROLL_TABLE_LEN]
                .iter()
                .map(|&delta| i32::from(delta)),
        );

        state.pf2.set_scroll_x(state.pf2_control.scroll_x());
        state.pf2.set_scroll_y(state.pf2_control.scroll_y());

        state.pf3.set_scroll_x(state.pf3_control.scroll_x());
        state.pf3.set_scroll_y(state.pf3_control.scroll_y());
    }

    fn mark_palette_usage(&self, usage: &mut PaletteUsage, ctx: &FrameContext) {
        let state = &self.state;
        let gfx = &self.gfx;

        if self.config.background_enabled {
            let args = layer_args(self.pf3_view().layout(), &gfx.pf3_tiles, PF3_TRANSPARENCY, ctx);
            state.pf3.mark_visible_colors(usage, &args, &PlainTiles);
        }

        if self.config.midground_enabled {
            let args = layer_args(PF2_LAYOUT, &gfx.pf2_tiles, PF2_TRANSPARENCY, ctx);
            state.pf2.mark_visible_colors(usage, &args, &PlainTiles);
        }

        if self.config.sprites_enabled {
            for sprite in self.sprites(ctx) {
                mark_sprite_colors(usage, &sprite, &gfx.sprites, SPRITE_TRANSPARENCY);
            }
        }

        if self.config.foreground_enabled {
            let args = layer_args(PF1_LAYOUT, &gfx.chars, PF1_TRANSPARENCY, ctx);
            state.pf1.mark_visible_colors(usage, &args, &PlainTiles);
        }
    }

    fn mark_all_tiles_dirty(&mut self) {
        self.state.pf1.mark_all_dirty();
        self.state.pf2.mark_all_dirty();
        self.state.pf3.mark_all_dirty();
    }

    fn update_tilemaps(&mut self) -> usize {
        self.state.pf1.update(&PlainTiles)
            + self.state.pf2.update(&PlainTiles)
            + self.state.pf3.update(&PlainTiles)
    }

    fn draw(&self, bitmap: &mut IndexedBitmap, ctx: &FrameContext) -> usize {
        let state = &self.state;
        let gfx = &self.gfx;

        // Playfield 3 is drawn in exactly one of its two shapes
        if self.config.background_enabled {
            let args = layer_args(self.pf3_view().layout(), &gfx.pf3_tiles, PF3_TRANSPARENCY, ctx);
            state.pf3.draw(bitmap, &args);
        }

        if self.config.midground_enabled {
            let args = layer_args(PF2_LAYOUT, &gfx.pf2_tiles, PF2_TRANSPARENCY, ctx);
            state.pf2.draw(bitmap, &args);
        }

        let mut sprites_drawn = 0;
        if self.config.sprites_enabled {
            for sprite in self.sprites(ctx) {
                draw_sprite(bitmap, &sprite, &gfx.sprites, SPRITE_TRANSPARENCY, ctx.screen.visible);
                sprites_drawn += 1;
            }
        }

        if self.config.foreground_enabled {
            let args = layer_args(PF1_LAYOUT, &gfx.chars, PF1_TRANSPARENCY, ctx);
            state.pf1.draw(bitmap, &args);
        }

        sprites_drawn
    }
}
