use tilecade_common::num::{GetBit, SignExtend};
use tilemap_core::sprites::{SpriteContext, SpriteDescriptor, SpriteFormat};

pub const SPRITE_RAM_WORDS: usize = 0x800;

const TILE_SIZE: i32 = 16;
const COLOR_CODES: u16 = 64;

// Sprite X positions are relative to the same origin as the background scroll
const X_ORIGIN: i32 = 0x20;

/// Sprite RAM holds 256 entries of 8 words:
///
/// ```text
/// word 0: .... .... .... ...V visible
/// word 1: ...F .... .... .... flip X
///         .... ...B .... .... code bank (adds 0x8000)
///         .... .... HHHH .... height - 1, in tiles
///         .... .... .... WWWW width - 1, in tiles
/// word 3: .CCC CCCC CCCC CCCC tile code
/// word 4: .... ..XX XXXX XXXX X position
/// word 6: .... ..YY YYYY YYYY Y position
/// word 7: .... .... CCCC CCCC color
/// ```
///
/// Tiles are numbered down each column, then across.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerInsSprites;

impl SpriteFormat for PowerInsSprites {
    const ENTRY_WORDS: usize = 8;

    fn decode(&self, index: usize, entry: &[u16], ctx: &SpriteContext) -> Option<SpriteDescriptor> {
        if !entry[0].bit(0) {
            return None;
        }

        let size = entry[1];
        let width = u32::from(size.bits(0..=3)) + 1;
        let height = u32::from(size.bits(4..=7)) + 1;
        let mut flip_x = size.bit(12);
        let mut flip_y = false;

        let mut code = u32::from(entry[3] & 0x7FFF) + (u32::from(size & 0x0100) << 7);
        let color = u32::from((entry[7] & 0xFF) % COLOR_CODES);

        let mut x = (entry[4] & 0x3FF).sign_extend(10) + X_ORIGIN;
        let mut y = (entry[6] & 0x3FF).sign_extend(10);

        // Under screen flip the whole tile grid is walked backwards
        let code_step = if ctx.flip_screen {
            x = ctx.screen.width as i32 - x - width as i32 * TILE_SIZE;
            y = ctx.screen.height as i32 - y - height as i32 * TILE_SIZE;
            flip_x = !flip_x;
            flip_y = !flip_y;
            code += width * height - 1;
            -1
        } else {
            1
        };

        Some(SpriteDescriptor {
            index,
            x,
            y,
            width,
            height,
            step_x: TILE_SIZE,
            step_y: TILE_SIZE,
            code,
            code_step_col: code_step * height as i32,
            code_step_row: code_step,
            color,
            flip_x,
            flip_y,
            priority: 0,
            tile_size: TILE_SIZE as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;
    use tilemap_core::sprites::SpriteTile;
    use tilemap_core::{Rect, ScreenGeometry};

    const SCREEN: ScreenGeometry =
        ScreenGeometry { width: 320, height: 256, visible: Rect::new(0, 319, 16, 239) };

    fn ctx(flip_screen: bool) -> SpriteContext {
        SpriteContext { flip_screen, frame_number: 0, screen: SCREEN, flash_enabled: true }
    }

    fn entry(size: u16, code: u16, x: u16, y: u16, color: u16) -> [u16; 8] {
        [0x0001, size, 0, code, x, 0, y, color]
    }

    fn decode(words: [u16; 8], flip_screen: bool) -> SpriteDescriptor {
        PowerInsSprites.decode(0, &words, &ctx(flip_screen)).unwrap()
    }

    #[test]
    fn hidden_without_visible_bit() {
        let mut words = entry(0, 0x10, 0x40, 0x40, 0);
        words[0] = 0xFFFE;
        assert_eq!(PowerInsSprites.decode(0, &words, &ctx(false)), None);
    }

    #[test]
    fn wide_sprite_in_code_bank() {
        let sprite = decode(entry(0x0103, 0x0050, 0x0040, 0x0080, 0x0007), false);

        assert_eq!((sprite.width, sprite.height), (4, 1));
        assert_eq!(sprite.code, 0x8050);
        assert_eq!((sprite.x, sprite.y), (0x60, 0x80));
        assert_eq!(sprite.color, 7);

        let tiles: Vec<_> = sprite.tiles().collect();
        assert_eq!(
            tiles,
            vec![
                SpriteTile { code: 0x8050, x: 0x60, y: 0x80 },
                SpriteTile { code: 0x8051, x: 0x70, y: 0x80 },
                SpriteTile { code: 0x8052, x: 0x80, y: 0x80 },
                SpriteTile { code: 0x8053, x: 0x90, y: 0x80 },
            ]
        );
    }

    #[test]
    fn wide_sprite_without_bank() {
        let sprite = decode(entry(0x0003, 0x0050, 0, 0, 0), false);
        assert_eq!(sprite.code, 0x0050);
    }

    #[test]
    fn codes_run_down_columns() {
        // 2 wide, 3 tall
        let sprite = decode(entry(0x0021, 0x0100, 0, 0, 0), false);

        let codes: Vec<_> = sprite.tiles().map(|tile| (tile.code, tile.x, tile.y)).collect();
        assert_eq!(
            codes,
            vec![
                (0x100, 32, 0),
                (0x101, 32, 16),
                (0x102, 32, 32),
                (0x103, 48, 0),
                (0x104, 48, 16),
                (0x105, 48, 32),
            ]
        );
    }

    #[test]
    fn ten_bit_signed_positions() {
        let sprite = decode(entry(0, 0, 0xFFFF, 0x03F0, 0), false);
        assert_eq!((sprite.x, sprite.y), (31, -16));
    }

    #[test]
    fn color_wraps() {
        let sprite = decode(entry(0, 0, 0, 0, 0xFF45), false);
        assert_eq!(sprite.color, 5);
    }

    #[test]
    fn flip_x_bit() {
        let sprite = decode(entry(0x1000, 0, 0, 0, 0), false);
        assert!(sprite.flip_x);
        assert!(!sprite.flip_y);
    }

    #[test]
    fn screen_flip_reverses_codes() {
        // 2x1 at (0x40 + 0x20, 0x10)
        let sprite = decode(entry(0x0001, 0x0200, 0x0040, 0x0010, 0), true);

        assert_eq!((sprite.x, sprite.y), (320 - 0x60 - 32, 256 - 0x10 - 16));
        assert!(sprite.flip_x);
        assert!(sprite.flip_y);

        let codes: Vec<_> = sprite.tiles().map(|tile| (tile.code, tile.x)).collect();
        assert_eq!(codes, vec![(0x201, 192), (0x200, 208)]);
    }
}
