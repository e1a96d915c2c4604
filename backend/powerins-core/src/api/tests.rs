use super::*;
use crate::video::{LAYER0_LAYOUT, LAYER1_LAYOUT};
use test_log::test;
use tilemap_core::tilemap::TileInfo;
use tilemap_core::{FixedPalette, GfxRegion};

const SYSTEM_BASE: u32 = 0x100014;
const SCROLL_BASE: u32 = 0x130000;
const LAYER0_BASE: u32 = 0x140000;
const LAYER1_BASE: u32 = 0x170000;
const SPRITE_BASE: u32 = 0x188000;

const ALL_TILES: usize = 0x2000 + 0x800;

fn test_gfx() -> PowerInsGfx {
    // Background tiles 0-0x7FF are pen N % 8; every tile in the second bank is pen 9
    let layer0_tiles =
        GfxRegion::from_fn(PowerInsGfx::LAYER0_LAYOUT, 0x1000, |element, _, _| {
            if element >= 0x800 { 9 } else { (element % 8) as u8 }
        })
        .unwrap();

    // Character 0 is blank so an empty text layer lets everything below show through
    let layer1_chars = GfxRegion::from_fn(PowerInsGfx::LAYER1_LAYOUT, 16, |element, _, _| {
        if element == 0 { 15 } else { element as u8 }
    })
    .unwrap();

    let sprites =
        GfxRegion::from_fn(PowerInsGfx::SPRITE_LAYOUT, 16, |element, _, _| element as u8).unwrap();

    PowerInsGfx { layer0_tiles, layer1_chars, sprites }
}

fn new_video(config: VideoConfig) -> (PowerInsVideo, IndexedBitmap) {
    let video = PowerInsVideo::new(test_gfx(), config);
    let bitmap = IndexedBitmap::for_screen(&video.screen());
    (video, bitmap)
}

fn write_layer0(video: &mut PowerInsVideo, col: u32, row: u32, word: u16) {
    let offset = LAYER0_LAYOUT.offset(col, row) as u32;
    assert!(video.write_word(LAYER0_BASE + 2 * offset, word, 0xFFFF));
}

fn write_layer1(video: &mut PowerInsVideo, col: u32, row: u32, word: u16) {
    let offset = LAYER1_LAYOUT.offset(col, row) as u32;
    assert!(video.write_word(LAYER1_BASE + 2 * offset, word, 0xFFFF));
}

fn write_sprite(video: &mut PowerInsVideo, index: u32, words: [u16; 8]) {
    for (i, word) in words.into_iter().enumerate() {
        video.write_word(SPRITE_BASE + index * 16 + 2 * i as u32, word, 0xFFFF);
    }
}

#[test]
fn banked_background_tile() {
    let (mut video, mut bitmap) = new_video(VideoConfig::default());

    assert_eq!(LAYER0_LAYOUT.offset(2, 17), 0x1021);
    write_layer0(&mut video, 2, 17, 0x8803);
    // Scroll Y to tilemap row 16
    video.write_word(SCROLL_BASE + 4, 0x0001, 0xFFFF);

    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.tiles_resolved, ALL_TILES);
    assert_eq!(
        video.hardware.state.layer0.tile_info(0x1021),
        TileInfo { code: 0x003, color: 0x18 }
    );
    // Column 2 is 32 pixels right of the X origin
    assert_eq!(bitmap.get(64, 16), 0x183);
    assert_eq!(bitmap.get(79, 31), 0x183);

    video.write_word(SYSTEM_BASE + 4, 0x0001, 0x00FF);
    assert_eq!(video.tile_bank(), 1);
    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.tiles_resolved, 0x2000);
    assert_eq!(
        video.hardware.state.layer0.tile_info(0x1021),
        TileInfo { code: 0x803, color: 0x18 }
    );
    assert_eq!(bitmap.get(64, 16), 0x189);

    // High byte writes do not reach the bank latch
    video.write_word(SYSTEM_BASE + 4, 0x0200, 0xFF00);
    assert_eq!(video.tile_bank(), 1);
    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.tiles_resolved, 0);
}

#[test]
fn text_layer_is_column_major_and_mirrored() {
    let (mut video, mut bitmap) = new_video(VideoConfig::default());

    let offset = LAYER1_LAYOUT.offset(6, 3) as u32;
    assert_eq!(offset, 6 * 32 + 3);

    // Written through the mirror
    assert!(video.write_word(LAYER1_BASE + 0x1000 + 2 * offset, 0x2005, 0xFFFF));
    assert_eq!(video.read_word(LAYER1_BASE + 2 * offset), Some(0x2005));

    video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(bitmap.get(80, 24), 0x225);
    assert_eq!(bitmap.get(87, 31), 0x225);
    // Background tile 0 underneath
    assert_eq!(bitmap.get(88, 24), 0x000);
}

#[test]
fn fixed_draw_order() {
    let (mut video, mut bitmap) = new_video(VideoConfig::default());

    // Everything overlaps at (100, 100)
    write_layer0(&mut video, 4, 6, 0x0002);
    write_sprite(&mut video, 0, [0x0001, 0x0000, 0, 0x0001, 64, 0, 96, 3]);
    write_layer1(&mut video, 8, 12, 0x1004);

    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.sprites_drawn, 1);
    assert_eq!(bitmap.get(100, 100), 0x214);
    // Past the 8x8 text tile but inside the 16x16 sprite
    assert_eq!(bitmap.get(105, 105), 0x431);

    let mut config = VideoConfig { midground_enabled: false, ..VideoConfig::default() };
    video.reload_config(config);
    video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(bitmap.get(100, 100), 0x214);

    config.foreground_enabled = false;
    video.reload_config(config);
    video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(bitmap.get(100, 100), 0x431);

    config.sprites_enabled = false;
    video.reload_config(config);
    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.sprites_drawn, 0);
    assert_eq!(bitmap.get(100, 100), 0x002);

    config.background_enabled = false;
    video.reload_config(config);
    video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(bitmap.get(100, 100), 0x000);
}

#[test]
fn multi_tile_sprite_in_code_bank() {
    let config = VideoConfig { foreground_enabled: false, ..VideoConfig::default() };
    let (mut video, mut bitmap) = new_video(config);

    // 4x1 tiles from code 0x8050, which wraps to sprite tile 0
    write_sprite(&mut video, 5, [0x0001, 0x0103, 0, 0x0050, 0x0040, 0, 0x0080, 7]);

    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.sprites_drawn, 1);
    assert_eq!(bitmap.get(96, 128), 0x470);
    assert_eq!(bitmap.get(112, 128), 0x471);
    assert_eq!(bitmap.get(128, 143), 0x472);
    assert_eq!(bitmap.get(159, 143), 0x473);
    assert_eq!(bitmap.get(160, 128), 0x000);
}

#[test]
fn flip_change_invalidates_every_tile() {
    let (mut video, mut bitmap) = new_video(VideoConfig::default());

    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.tiles_resolved, ALL_TILES);

    write_layer1(&mut video, 6, 3, 0x2005);
    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.tiles_resolved, 1);

    video.write_word(SYSTEM_BASE, 0x0001, 0x00FF);
    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.tiles_resolved, ALL_TILES);

    // The text tile at (80, 24) mirrors across the whole 320x256 screen
    assert_eq!(bitmap.get(232, 224), 0x225);
    assert_eq!(bitmap.get(239, 231), 0x225);

    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.tiles_resolved, 0);
}

#[test]
fn palette_usage_only_counts_visible_sprites() {
    let config = VideoConfig {
        background_enabled: false,
        foreground_enabled: false,
        ..VideoConfig::default()
    };
    let (mut video, mut bitmap) = new_video(config);

    // Tile 15 is entirely the transparent pen
    write_sprite(&mut video, 0, [0x0001, 0, 0, 0x000F, 0x0040, 0, 0x0040, 1]);
    // Off the right edge
    write_sprite(&mut video, 1, [0x0001, 0, 0, 0x0002, 0x01FF, 0, 0x0040, 1]);
    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.sprites_drawn, 1);
    assert_eq!(stats.palette_colors_used, 0);

    write_sprite(&mut video, 2, [0x0001, 0, 0, 0x0002, 0x0040, 0, 0x0040, 1]);
    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    assert_eq!(stats.sprites_drawn, 2);
    assert_eq!(video.compositor().palette_usage().used_indices().collect::<Vec<_>>(), vec![0x412]);
}

#[test]
fn system_registers_and_unmapped_addresses() {
    let (mut video, _) = new_video(VideoConfig::default());

    assert!(video.write_word(SYSTEM_BASE + 2, 0xABCD, 0xFFFF));
    assert_eq!(video.read_word(SYSTEM_BASE + 2), Some(0xABCD));
    assert!(video.write_word(SYSTEM_BASE + 6, 0x0042, 0x00FF));
    assert_eq!(video.read_word(SYSTEM_BASE + 6), Some(0x0042));
    assert_eq!(video.tile_bank(), 0);

    assert!(!video.write_word(0x100012, 0xFFFF, 0xFFFF));
    assert_eq!(video.read_word(0x100012), None);
    assert_eq!(video.read_word(0x10001C), None);
    assert_eq!(video.read_word(0x130008), None);
    assert_eq!(video.read_word(0x172000), None);
    assert_eq!(video.read_word(0x189000), None);
}

#[test]
fn save_state_round_trip() {
    let (mut video, mut bitmap) = new_video(VideoConfig::default());

    write_layer0(&mut video, 3, 2, 0x1801);
    write_layer1(&mut video, 10, 10, 0x3003);
    write_sprite(&mut video, 7, [0x0001, 0x0011, 0, 0x0004, 0x0080, 0, 0x0090, 2]);
    video.write_word(SYSTEM_BASE + 4, 0x0001, 0x00FF);
    video.write_word(SCROLL_BASE + 2, 0x0010, 0xFFFF);
    video.render_frame(&mut FixedPalette, &mut bitmap);

    let mut bytes = Vec::new();
    video.save_state(&mut bytes).unwrap();

    let (mut loaded, mut loaded_bitmap) = new_video(VideoConfig::default());
    loaded.load_state(bytes.as_slice()).unwrap();

    assert_eq!(loaded.tile_bank(), 1);
    assert_eq!(loaded.read_word(SCROLL_BASE + 2), Some(0x0010));
    assert_eq!(loaded.compositor().frame_number(), 1);

    let stats = video.render_frame(&mut FixedPalette, &mut bitmap);
    let loaded_stats = loaded.render_frame(&mut FixedPalette, &mut loaded_bitmap);
    assert_eq!(stats, loaded_stats);
    assert_eq!(bitmap, loaded_bitmap);
}

#[test]
fn rejects_other_game_state() {
    let mut bytes = Vec::new();
    savestate::save_state(ArcadeGame::MadMotor, &0_u32, &mut bytes).unwrap();

    let (mut video, _) = new_video(VideoConfig::default());
    let result = video.load_state(bytes.as_slice());
    assert!(matches!(result, Err(SaveStateError::WrongGame { .. })));
}
