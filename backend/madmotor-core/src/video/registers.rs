use bincode::{Decode, Encode};
use tilecade_common::num::GetBit;
use tilecade_proc_macros::EnumDisplay;
use tilemap_core::registers::ControlRegisters;
use tilemap_core::tilemap::{ScanOrder, TilemapLayout};

const SCROLL_X_WORD: usize = 0x10 / 2;
const SCROLL_Y_WORD: usize = 0x12 / 2;
const PF3_MODE_WORD: usize = 3;

/// 32-byte control register bank attached to each playfield.
#[derive(Debug, Clone, Default, Encode, Decode)]
pub struct PlayfieldControl {
    registers: ControlRegisters<32>,
}

impl PlayfieldControl {
    pub fn write(&mut self, offset: u32, data: u16, mask: u16) {
        self.registers.write(offset, data, mask);
    }

    pub fn read(&self, offset: u32) -> u16 {
        self.registers.read(offset)
    }

    pub fn scroll_x(&self) -> i32 {
        self.registers.word(SCROLL_X_WORD).into()
    }

    pub fn scroll_y(&self) -> i32 {
        self.registers.word(SCROLL_Y_WORD).into()
    }

    /// Only meaningful on playfield 1's bank
    pub fn flip_screen(&self) -> bool {
        self.registers.word(0).bit(7)
    }

    /// Only meaningful on playfield 3's bank
    pub fn pf3_view(&self) -> Pf3View {
        if self.registers.word(PF3_MODE_WORD) == 2 { Pf3View::Tall } else { Pf3View::Wide }
    }
}

/// Shape of playfield 3. Both shapes read the same tile RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode, EnumDisplay)]
pub enum Pf3View {
    /// 128x16 tiles
    #[default]
    Wide,
    /// 32x64 tiles
    Tall,
}

impl Pf3View {
    pub const WIDE_LAYOUT: TilemapLayout = TilemapLayout {
        cols: 128,
        rows: 16,
        tile_width: 16,
        tile_height: 16,
        scan: ScanOrder::MadMotorWide,
    };

    pub const TALL_LAYOUT: TilemapLayout = TilemapLayout {
        cols: 32,
        rows: 64,
        tile_width: 16,
        tile_height: 16,
        scan: ScanOrder::MadMotorTall,
    };

    #[must_use]
    pub const fn layout(self) -> TilemapLayout {
        match self {
            Self::Wide => Self::WIDE_LAYOUT,
            Self::Tall => Self::TALL_LAYOUT,
        }
    }
}
