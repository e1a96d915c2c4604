use tilecade_common::num::{GetBit, SignExtend};
use tilemap_core::sprites::{SpriteContext, SpriteDescriptor, SpriteFormat};

pub const SPRITE_RAM_WORDS: usize = 0x400;

const TILE_SIZE: i32 = 16;

// Sprites are positioned from the bottom-right corner of a 256x256 screen
const POSITION_ORIGIN: i32 = 240;

/// Sprite RAM entries are 4 words:
///
/// ```text
/// word 0: V... .... .... .... visible
///         .F.. .... .... .... flip Y
///         ..F. .... .... .... flip X
///         ...H H... .... .... height, log2 tiles
///         .... .WW. .... .... width, log2 tiles
///         .... ...Y YYYY YYYY Y position
/// word 1: ...C CCCC CCCC CCCC tile code
/// word 2: CCCC .... .... .... color
///         .... F... .... .... flash (hidden on odd frames)
///         .... ...X XXXX XXXX X position
/// word 3: unused
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MadMotorSprites;

impl SpriteFormat for MadMotorSprites {
    const ENTRY_WORDS: usize = 4;

    fn decode(&self, index: usize, entry: &[u16], ctx: &SpriteContext) -> Option<SpriteDescriptor> {
        let attributes = entry[0];
        let x_word = entry[2];

        if !attributes.bit(15) {
            return None;
        }

        if x_word.bit(11) && !ctx.flash_visible() {
            return None;
        }

        let color = u32::from(x_word >> 12);
        let mut flip_x = attributes.bit(13);
        let mut flip_y = attributes.bit(14);
        let height = 1_u32 << attributes.bits(11..=12);
        let width = 1_u32 << attributes.bits(9..=10);

        let mut x = POSITION_ORIGIN - (x_word & 0x1FF).sign_extend(9);
        let mut y = POSITION_ORIGIN - (attributes & 0x1FF).sign_extend(9);

        // Tall sprites always start from an aligned code. Rows are stored bottom to top unless
        // the sprite is Y-flipped.
        let mut code = u32::from(entry[1] & 0x1FFF) & !(height - 1);
        let code_step_row = if flip_y {
            1
        } else {
            code += height - 1;
            -1
        };

        let step = if ctx.flip_screen {
            x = POSITION_ORIGIN - x;
            y = POSITION_ORIGIN - y;
            flip_x = !flip_x;
            flip_y = !flip_y;
            TILE_SIZE
        } else {
            -TILE_SIZE
        };

        Some(SpriteDescriptor {
            index,
            x,
            y,
            width,
            height,
            step_x: step,
            step_y: step,
            code,
            code_step_col: height as i32,
            code_step_row,
            color,
            flip_x,
            flip_y,
            priority: (color >> 3) as u8,
            tile_size: TILE_SIZE as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemap_core::sprites::SpriteTile;
    use tilemap_core::{Rect, ScreenGeometry};
    use test_log::test;

    const SCREEN: ScreenGeometry =
        ScreenGeometry { width: 256, height: 256, visible: Rect::new(0, 255, 8, 247) };

    fn ctx(flip_screen: bool, frame_number: u64) -> SpriteContext {
        SpriteContext { flip_screen, frame_number, screen: SCREEN, flash_enabled: true }
    }

    #[test]
    fn hidden_without_visible_bit() {
        assert_eq!(MadMotorSprites.decode(0, &[0x0010, 0x0001, 0x0010, 0], &ctx(false, 0)), None);
    }

    #[test]
    fn single_tile() {
        let sprite =
            MadMotorSprites.decode(3, &[0x8010, 0x1234, 0x5020, 0], &ctx(false, 0)).unwrap();

        assert_eq!(sprite.index, 3);
        assert_eq!((sprite.x, sprite.y), (240 - 0x20, 240 - 0x10));
        assert_eq!((sprite.width, sprite.height), (1, 1));
        assert_eq!(sprite.code, 0x1234);
        assert_eq!(sprite.color, 5);
        assert!(!sprite.flip_x && !sprite.flip_y);
    }

    #[test]
    fn negative_positions() {
        // 0x1F0 is -16 as a 9-bit value
        let sprite = MadMotorSprites.decode(0, &[0x81F0, 0, 0x01F0, 0], &ctx(false, 0)).unwrap();
        assert_eq!((sprite.x, sprite.y), (256, 256));
    }

    #[test]
    fn tall_sprite_rows_descend_in_code() {
        // Height 4 (log2 = 2), code 0x0105 aligns down to 0x0104
        let sprite = MadMotorSprites.decode(0, &[0x9080, 0x0105, 0x0080, 0], &ctx(false, 0)).unwrap();

        assert_eq!(sprite.height, 4);
        let tiles: Vec<_> = sprite.tiles().collect();
        assert_eq!(
            tiles,
            vec![
                SpriteTile { code: 0x107, x: 112, y: 112 },
                SpriteTile { code: 0x106, x: 112, y: 96 },
                SpriteTile { code: 0x105, x: 112, y: 80 },
                SpriteTile { code: 0x104, x: 112, y: 64 },
            ]
        );
    }

    #[test]
    fn y_flipped_tall_sprite_rows_ascend_in_code() {
        let sprite = MadMotorSprites.decode(0, &[0xD080, 0x0105, 0x0080, 0], &ctx(false, 0)).unwrap();

        assert!(sprite.flip_y);
        let codes: Vec<_> = sprite.tiles().map(|tile| tile.code).collect();
        assert_eq!(codes, vec![0x104, 0x105, 0x106, 0x107]);
    }

    #[test]
    fn wide_sprite_columns() {
        // Width 2 (log2 = 1), height 2 (log2 = 1)
        let sprite = MadMotorSprites.decode(0, &[0x8A80, 0x0010, 0x0080, 0], &ctx(false, 0)).unwrap();

        assert_eq!((sprite.width, sprite.height), (2, 2));
        let tiles: Vec<_> = sprite.tiles().collect();
        assert_eq!(tiles[0], SpriteTile { code: 0x11, x: 112, y: 112 });
        assert_eq!(tiles[1], SpriteTile { code: 0x10, x: 112, y: 96 });
        assert_eq!(tiles[2], SpriteTile { code: 0x13, x: 96, y: 112 });
        assert_eq!(tiles[3], SpriteTile { code: 0x12, x: 96, y: 96 });
    }

    #[test]
    fn screen_flip_mirrors_position_and_flags() {
        let sprite = MadMotorSprites.decode(0, &[0xA010, 0x0001, 0x0020, 0], &ctx(true, 0)).unwrap();

        assert_eq!((sprite.x, sprite.y), (0x20, 0x10));
        assert_eq!(sprite.step_x, 16);
        assert!(!sprite.flip_x);
        assert!(sprite.flip_y);
    }

    #[test]
    fn flashing_sprites_hidden_on_odd_frames() {
        let entry = [0x8010, 0x0001, 0x0820, 0];
        assert!(MadMotorSprites.decode(0, &entry, &ctx(false, 0)).is_some());
        assert_eq!(MadMotorSprites.decode(0, &entry, &ctx(false, 1)), None);
        assert!(MadMotorSprites.decode(0, &entry, &ctx(false, 2)).is_some());

        let no_flash = SpriteContext { flash_enabled: false, ..ctx(false, 1) };
        assert!(MadMotorSprites.decode(0, &entry, &no_flash).is_some());
    }
}
