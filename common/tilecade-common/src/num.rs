use std::ops::RangeInclusive;

pub trait GetBit {
    #[must_use]
    fn bit(self, i: u8) -> bool;

    #[must_use]
    fn bits(self, range: RangeInclusive<u8>) -> Self;
}

macro_rules! impl_get_bit {
    ($t:ty) => {
        impl GetBit for $t {
            #[inline]
            fn bit(self, i: u8) -> bool {
                debug_assert!(i < (<$t>::BITS as u8));
                self & (1 << i) != 0
            }

            #[inline]
            fn bits(self, range: RangeInclusive<u8>) -> Self {
                let start = *range.start();
                let end = *range.end();
                debug_assert!(end < (<$t>::BITS as u8));

                (self >> start) & ((1 << (end - start + 1)) - 1)
            }
        }
    };
}

impl_get_bit!(u8);
impl_get_bit!(u16);
impl_get_bit!(u32);

pub trait U16Ext {
    fn lsb(self) -> u8;

    fn msb(self) -> u8;
}

impl U16Ext for u16 {
    #[inline(always)]
    fn lsb(self) -> u8 {
        self as u8
    }

    #[inline(always)]
    fn msb(self) -> u8 {
        (self >> 8) as u8
    }
}

pub trait SignExtend {
    /// Interpret the lowest `bits` bits as a two's complement value. Higher bits are ignored.
    #[must_use]
    fn sign_extend(self, bits: u8) -> i32;
}

impl SignExtend for u16 {
    #[inline]
    fn sign_extend(self, bits: u8) -> i32 {
        debug_assert!(bits > 0 && bits <= 16);

        let shift = 32 - u32::from(bits);
        (i32::from(self) << shift) >> shift
    }
}

/// Apply a 16-bit bus write: bits set in `mask` take their value from `data`, all other bits
/// keep their value from `old`.
///
/// A byte write to the high half of a word uses mask `0xFF00`; to the low half, `0x00FF`.
#[inline]
#[must_use]
pub const fn combine_word(old: u16, data: u16, mask: u16) -> u16 {
    (old & !mask) | (data & mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn bits_extracts_inclusive_range() {
        assert_eq!(0x1800_u16.bits(11..=12), 3);
        assert_eq!(0x0600_u16.bits(9..=10), 3);
        assert!(0x8000_u16.bit(15));
        assert!(!0x7FFF_u16.bit(15));
    }

    #[test]
    fn sign_extend_ten_bits() {
        assert_eq!(0x200_u16.sign_extend(10), -512);
        assert_eq!(0x1FF_u16.sign_extend(10), 511);
        assert_eq!(0x3FF_u16.sign_extend(10), -1);
        assert_eq!(0x000_u16.sign_extend(10), 0);

        // Bits above the field must not leak into the result
        assert_eq!(0xFE00_u16.sign_extend(10), -512);
    }

    #[test]
    fn sign_extend_is_idempotent_after_masking() {
        for raw in [0x000_u16, 0x001, 0x1FF, 0x200, 0x2A5, 0x3FF] {
            let once = raw.sign_extend(10);
            let twice = ((once as u16) & 0x3FF).sign_extend(10);
            assert_eq!(once, twice, "raw={raw:03X}");
        }
    }

    #[test]
    fn sign_extend_nine_bits() {
        assert_eq!(0x0FF_u16.sign_extend(9), 255);
        assert_eq!(0x100_u16.sign_extend(9), -256);
        assert_eq!(0x1FF_u16.sign_extend(9), -1);
    }

    #[test]
    fn combine_word_preserves_unmasked_bits() {
        assert_eq!(combine_word(0x1234, 0x00FF, 0xFF00), 0x0034);
        assert_eq!(combine_word(0x1234, 0xAB00, 0xFF00), 0xAB34);
        assert_eq!(combine_word(0x1234, 0x00CD, 0x00FF), 0x12CD);
        assert_eq!(combine_word(0x1234, 0xBEEF, 0xFFFF), 0xBEEF);
        assert_eq!(combine_word(0x1234, 0xBEEF, 0x0000), 0x1234);
    }

    #[test]
    fn u16_ext_bytes() {
        let word = 0x1234_u16;
        assert_eq!(word.msb(), 0x12);
        assert_eq!(word.lsb(), 0x34);
    }
}
