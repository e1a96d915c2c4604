//! Fixed-size 16-bit RAM as seen from a 68000 data bus.
//!
//! The backing store lives on the heap and has a custom `bincode::Decode` implementation that
//! deserializes directly into heap memory rather than building a large array on the stack first.

use crate::num::combine_word;
use bincode::de::{BorrowDecoder, Decoder};
use bincode::enc::Encoder;
use bincode::error::{DecodeError, EncodeError};
use bincode::{BorrowDecode, Decode, Encode};
use std::ops::Deref;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRam<const LEN: usize>(Box<[u16]>);

impl<const LEN: usize> WordRam<LEN> {
    #[must_use]
    pub fn new() -> Self {
        Self(vec![0; LEN].into_boxed_slice())
    }

    /// Convert a bus byte offset into a word index. The low address bit is ignored and offsets
    /// past the end wrap.
    #[inline]
    #[must_use]
    pub const fn word_index(byte_offset: u32) -> usize {
        ((byte_offset >> 1) as usize) % LEN
    }

    #[inline]
    #[must_use]
    pub fn read(&self, byte_offset: u32) -> u16 {
        self.0[Self::word_index(byte_offset)]
    }

    /// Combine-write `data` into the word at `byte_offset`, updating only the bits set in `mask`.
    ///
    /// Returns the index of the word that was written.
    #[inline]
    pub fn write(&mut self, byte_offset: u32, data: u16, mask: u16) -> usize {
        let index = Self::word_index(byte_offset);
        self.0[index] = combine_word(self.0[index], data, mask);
        index
    }
}

impl<const LEN: usize> Default for WordRam<LEN> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const LEN: usize> Deref for WordRam<LEN> {
    type Target = [u16];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const LEN: usize> Encode for WordRam<LEN> {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        for value in &self.0 {
            value.encode(encoder)?;
        }

        Ok(())
    }
}

impl<const LEN: usize, Context> Decode<Context> for WordRam<LEN> {
    fn decode<D: Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, DecodeError> {
        let mut words = vec![0; LEN].into_boxed_slice();

        for value in &mut words {
            *value = u16::decode(decoder)?;
        }

        Ok(Self(words))
    }
}

impl<'de, const LEN: usize, Context> BorrowDecode<'de, Context> for WordRam<LEN> {
    fn borrow_decode<D: BorrowDecoder<'de, Context = Context>>(
        decoder: &mut D,
    ) -> Result<Self, DecodeError> {
        let mut words = vec![0; LEN].into_boxed_slice();

        for value in &mut words {
            *value = u16::decode(decoder)?;
        }

        Ok(Self(words))
    }
}
