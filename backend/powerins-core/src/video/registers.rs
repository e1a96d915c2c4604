use bincode::{Decode, Encode};
use tilecade_common::num::{GetBit, U16Ext};
use tilemap_core::registers::ControlRegisters;
use tilemap_core::tilemap::{TileInfo, TileResolver};

const FLIP_OFFSET: u32 = 0x00;
const TILE_BANK_OFFSET: u32 = 0x04;

// The board's scroll origin is 32 pixels left of the visible screen
const SCROLL_X_ORIGIN: i32 = 0x20;

/// Flip and tile bank latches.
///
/// Only the low byte of each register is wired up. The raw words are kept so reads return what
/// was last written.
#[derive(Debug, Clone, Default, Encode, Decode)]
pub struct SystemControl {
    registers: ControlRegisters<8>,
    flip_screen: bool,
    tile_bank: u8,
}

impl SystemControl {
    /// Returns true if the write changed the background tile bank.
    pub fn write(&mut self, offset: u32, data: u16, mask: u16) -> bool {
        self.registers.write(offset, data, mask);

        if mask.lsb() == 0 {
            return false;
        }

        match offset & !1 {
            FLIP_OFFSET => {
                self.flip_screen = data.bit(0);
                false
            }
            TILE_BANK_OFFSET => {
                let prev_bank = self.tile_bank;
                self.tile_bank = data.lsb();
                self.tile_bank != prev_bank
            }
            _ => false,
        }
    }

    pub fn read(&self, offset: u32) -> u16 {
        self.registers.read(offset)
    }

    pub fn flip_screen(&self) -> bool {
        self.flip_screen
    }

    pub fn tile_bank(&self) -> u8 {
        self.tile_bank
    }
}

/// Background scroll registers. Each word contributes only its low byte.
///
/// ```text
/// word 0: scroll X, high byte
/// word 1: scroll X, low byte
/// word 2: scroll Y, high byte
/// word 3: scroll Y, low byte
/// ```
#[derive(Debug, Clone, Default, Encode, Decode)]
pub struct ScrollControl {
    registers: ControlRegisters<8>,
}

impl ScrollControl {
    pub fn write(&mut self, offset: u32, data: u16, mask: u16) {
        self.registers.write(offset, data, mask);
    }

    pub fn read(&self, offset: u32) -> u16 {
        self.registers.read(offset)
    }

    fn byte_pair(&self, word: usize) -> i32 {
        let high = i32::from(self.registers.word(word).lsb());
        let low = i32::from(self.registers.word(word + 1).lsb());
        (high << 8) | low
    }

    pub fn scroll_x(&self) -> i32 {
        self.byte_pair(0) - SCROLL_X_ORIGIN
    }

    pub fn scroll_y(&self) -> i32 {
        self.byte_pair(2)
    }
}

/// Background tile words select one of 0x800 codes within the current bank:
///
/// ```text
/// CCCC .... .... .... color, low 4 bits
/// .... H... .... .... color, bit 4
/// .... .TTT TTTT TTTT tile code
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankedTiles {
    pub bank: u8,
}

impl TileResolver for BankedTiles {
    #[inline]
    fn resolve(&self, word: u16) -> TileInfo {
        let code = u32::from(word & 0x07FF) + u32::from(self.bank) * 0x800;
        let color = u32::from(word >> 12) | u32::from((word & 0x0800) >> 7);
        TileInfo { code, color }
    }
}
