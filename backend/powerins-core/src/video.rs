mod registers;
mod sprites;

use crate::gfx::{PALETTE_LEN, PowerInsGfx};
use bincode::{Decode, Encode};
use tilecade_common::WordRam;
use tilecade_config::VideoConfig;
use tilemap_core::compositor::{FrameContext, VideoHardware};
use tilemap_core::sprites::{SpriteContext, SpriteScanner, draw_sprite, mark_sprite_colors};
use tilemap_core::tilemap::{LayerDraw, PlainTiles, ScanOrder, Tilemap, TilemapLayout};
use tilemap_core::{GfxRegion, IndexedBitmap, PaletteUsage, Rect, ScreenGeometry, Transparency};

pub use registers::BankedTiles;
use registers::{ScrollControl, SystemControl};
use sprites::{PowerInsSprites, SPRITE_RAM_WORDS};

pub const SCREEN: ScreenGeometry =
    ScreenGeometry { width: 320, height: 256, visible: Rect::new(0, 319, 16, 239) };

pub const LAYER0_LAYOUT: TilemapLayout = TilemapLayout {
    cols: 256,
    rows: 32,
    tile_width: 16,
    tile_height: 16,
    scan: ScanOrder::PowerInsPaged,
};

pub const LAYER1_LAYOUT: TilemapLayout = TilemapLayout {
    cols: 64,
    rows: 32,
    tile_width: 8,
    tile_height: 8,
    scan: ScanOrder::ColumnMajor,
};

// The text layer never scrolls, but it shares the background's 32-pixel X origin
const LAYER1_SCROLL_X: i32 = -0x20;

const LAYER0_TRANSPARENCY: Transparency = Transparency::Opaque;
const LAYER1_TRANSPARENCY: Transparency = Transparency::Pen(15);
const SPRITE_TRANSPARENCY: Transparency = Transparency::Pen(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    System,
    Scroll,
    Layer0Data,
    Layer1Data,
    SpriteRam,
}

impl Region {
    /// Map a CPU byte address to a region and the byte offset within it.
    #[must_use]
    pub fn decode(address: u32) -> Option<(Self, u32)> {
        let (region, base) = match address {
            0x100014..=0x10001B => (Self::System, 0x100014),
            0x130000..=0x130007 => (Self::Scroll, 0x130000),
            0x140000..=0x143FFF => (Self::Layer0Data, 0x140000),
            // 0x171000-0x171FFF mirrors the first half
            0x170000..=0x171FFF => (Self::Layer1Data, 0x170000),
            0x188000..=0x188FFF => (Self::SpriteRam, 0x188000),
            _ => return None,
        };

        Some((region, address - base))
    }
}

#[derive(Debug, Clone, Encode, Decode)]
pub struct PowerInsState {
    system: SystemControl,
    scroll: ScrollControl,
    pub(crate) layer0: Tilemap<0x2000>,
    pub(crate) layer1: Tilemap<0x800>,
    sprite_ram: WordRam<SPRITE_RAM_WORDS>,
}

impl PowerInsState {
    fn new() -> Self {
        Self {
            system: SystemControl::default(),
            scroll: ScrollControl::default(),
            layer0: Tilemap::new(),
            layer1: Tilemap::new(),
            sprite_ram: WordRam::new(),
        }
    }

    pub(crate) fn layer0_tiles(&self) -> BankedTiles {
        BankedTiles { bank: self.system.tile_bank() }
    }
}

#[derive(Debug, Clone)]
pub struct PowerInsHardware {
    pub(crate) state: PowerInsState,
    gfx: PowerInsGfx,
    pub(crate) config: VideoConfig,
}

impl PowerInsHardware {
    pub fn new(gfx: PowerInsGfx, config: VideoConfig) -> Self {
        Self { state: PowerInsState::new(), gfx, config }
    }

    pub fn tile_bank(&self) -> u8 {
        self.state.system.tile_bank()
    }

    pub fn read(&self, region: Region, offset: u32) -> u16 {
        let state = &self.state;
        match region {
            Region::System => state.system.read(offset),
            Region::Scroll => state.scroll.read(offset),
            Region::Layer0Data => state.layer0.read(offset),
            Region::Layer1Data => state.layer1.read(offset),
            Region::SpriteRam => state.sprite_ram.read(offset),
        }
    }

    pub fn write(&mut self, region: Region, offset: u32, data: u16, mask: u16) {
        let state = &mut self.state;
        match region {
            Region::System => {
                let prev_flip = state.system.flip_screen();
                if state.system.write(offset, data, mask) {
                    // Every background tile decodes differently in the new bank
                    log::debug!("Background tile bank set to {}", state.system.tile_bank());
                    state.layer0.mark_all_dirty();
                }

                let flip = state.system.flip_screen();
                if flip != prev_flip {
                    log::debug!("Screen flip set to {flip}");
                }
            }
            Region::Scroll => state.scroll.write(offset, data, mask),
            Region::Layer0Data => {
                state.layer0.write(offset, data, mask);
            }
            Region::Layer1Data => {
                state.layer1.write(offset, data, mask);
            }
            Region::SpriteRam => {
                state.sprite_ram.write(offset, data, mask);
            }
        }
    }

    fn sprites(&self, ctx: &FrameContext) -> SpriteScanner<'_, PowerInsSprites> {
        let sprite_ctx = SpriteContext {
            flip_screen: ctx.flip_screen,
            frame_number: ctx.frame_number,
            screen: ctx.screen,
            flash_enabled: self.config.sprite_flash_enabled,
        };
        SpriteScanner::new(&PowerInsSprites, &self.state.sprite_ram, sprite_ctx)
    }

    fn layer0_args<'gfx>(gfx: &'gfx GfxRegion, ctx: &FrameContext) -> LayerDraw<'gfx> {
        LayerDraw {
            layout: LAYER0_LAYOUT,
            gfx,
            transparency: LAYER0_TRANSPARENCY,
            flip: ctx.flip_screen,
            screen: ctx.screen,
        }
    }

    fn layer1_args<'gfx>(gfx: &'gfx GfxRegion, ctx: &FrameContext) -> LayerDraw<'gfx> {
        LayerDraw {
            layout: LAYER1_LAYOUT,
            gfx,
            transparency: LAYER1_TRANSPARENCY,
            flip: ctx.flip_screen,
            screen: ctx.screen,
        }
    }
}

impl VideoHardware for PowerInsHardware {
    fn screen(&self) -> ScreenGeometry {
        SCREEN
    }

    fn palette_len(&self) -> usize {
        PALETTE_LEN
    }

    fn flip_screen(&self) -> bool {
        self.state.system.flip_screen()
    }

    fn apply_scroll(&mut self) {
        let state = &mut self.state;

        state.layer0.set_scroll_x(state.scroll.scroll_x());
        state.layer0.set_scroll_y(state.scroll.scroll_y());

        state.layer1.set_scroll_x(LAYER1_SCROLL_X);
        state.layer1.set_scroll_y(0);
    }

    fn mark_palette_usage(&self, usage: &mut PaletteUsage, ctx: &FrameContext) {
        let state = &self.state;
        let gfx = &self.gfx;

        if self.config.background_enabled {
            let args = Self::layer0_args(&gfx.layer0_tiles, ctx);
            state.layer0.mark_visible_colors(usage, &args, &state.layer0_tiles());
        }

        if self.config.sprites_enabled {
            for sprite in self.sprites(ctx) {
                mark_sprite_colors(usage, &sprite, &gfx.sprites, SPRITE_TRANSPARENCY);
            }
        }

        if self.config.foreground_enabled {
            let args = Self::layer1_args(&gfx.layer1_chars, ctx);
            state.layer1.mark_visible_colors(usage, &args, &PlainTiles);
        }
    }

    fn mark_all_tiles_dirty(&mut self) {
        self.state.layer0.mark_all_dirty();
        self.state.layer1.mark_all_dirty();
    }

    fn update_tilemaps(&mut self) -> usize {
        let layer0_tiles = self.state.layer0_tiles();
        self.state.layer0.update(&layer0_tiles) + self.state.layer1.update(&PlainTiles)
    }

    fn draw(&self, bitmap: &mut IndexedBitmap, ctx: &FrameContext) -> usize {
        let state = &self.state;
        let gfx = &self.gfx;

        // With the background disabled, the backdrop fill shows through
        if self.config.background_enabled {
            state.layer0.draw(bitmap, &Self::layer0_args(&gfx.layer0_tiles, ctx));
        }

        let mut sprites_drawn = 0;
        if self.config.sprites_enabled {
            for sprite in self.sprites(ctx) {
                draw_sprite(bitmap, &sprite, &gfx.sprites, SPRITE_TRANSPARENCY, ctx.screen.visible);
                sprites_drawn += 1;
            }
        }

        if self.config.foreground_enabled {
            state.layer1.draw(bitmap, &Self::layer1_args(&gfx.layer1_chars, ctx));
        }

        sprites_drawn
    }
}
