use bincode::{Decode, Encode};
use tilecade_common::num::{U16Ext, combine_word};

/// Bank of byte-wide control registers on a 16-bit bus. Even offsets hold the high byte of
/// each word.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ControlRegisters<const LEN: usize> {
    bytes: [u8; LEN],
}

impl<const LEN: usize> ControlRegisters<LEN> {
    #[must_use]
    pub fn new() -> Self {
        Self { bytes: [0; LEN] }
    }

    #[inline]
    fn word_offset(offset: u32) -> usize {
        (offset as usize & !1) % LEN
    }

    /// Combine-write a word; only bits set in `mask` change.
    ///
    /// Returns the stored word after the write.
    pub fn write(&mut self, offset: u32, data: u16, mask: u16) -> u16 {
        let offset = Self::word_offset(offset);
        let word = combine_word(self.word_at(offset), data, mask);

        self.bytes[offset] = word.msb();
        self.bytes[offset + 1] = word.lsb();

        log::trace!("Wrote control register {offset:02X} with value {data:04X} (mask {mask:04X})");

        word
    }

    /// Raw stored word, including bits with no known function.
    #[inline]
    #[must_use]
    pub fn read(&self, offset: u32) -> u16 {
        self.word_at(Self::word_offset(offset))
    }

    /// Word number `index`, i.e. the word at byte offset `2 * index`.
    #[inline]
    #[must_use]
    pub fn word(&self, index: usize) -> u16 {
        self.word_at((index * 2) % LEN)
    }

    #[inline]
    fn word_at(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.bytes[offset], self.bytes[offset + 1]])
    }
}

impl<const LEN: usize> Default for ControlRegisters<LEN> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn combine_write_preserves_untouched_byte() {
        let mut registers: ControlRegisters<32> = ControlRegisters::new();
        registers.write(0x10, 0x1234, 0xFFFF);

        registers.write(0x10, 0x00FF, 0xFF00);
        assert_eq!(registers.read(0x10), 0x0034);

        registers.write(0x11, 0xAACD, 0x00FF);
        assert_eq!(registers.read(0x10), 0x00CD);
        assert_eq!(registers.word(8), 0x00CD);
    }

    #[test]
    fn big_endian_byte_layout() {
        let mut registers: ControlRegisters<8> = ControlRegisters::new();
        registers.write(0x02, 0xBEEF, 0xFFFF);

        assert_eq!(registers.word(1), 0xBEEF);
        assert_eq!(registers.read(0x03), 0xBEEF);
        assert_eq!(registers.read(0x00), 0x0000);
    }

    #[test]
    fn offsets_wrap() {
        let mut registers: ControlRegisters<8> = ControlRegisters::new();
        registers.write(0x0A, 0x5555, 0xFFFF);
        assert_eq!(registers.word(1), 0x5555);
    }
}
