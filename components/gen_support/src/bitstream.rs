//! MSB-first bit streams
//!
//! The init data decoders in the runtime read fields most significant bit
//! first, packed without alignment. The final partial byte is padded with
//! zero bits.

use thiserror::Error;

/// Errors raised while writing or reading a bit stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitstreamError {
    /// Field width outside 1..=32
    #[error("invalid field width {0} (must be 1..=32)")]
    InvalidWidth(u32),

    /// Value does not fit into the requested width
    #[error("value {value} does not fit in {width} bits")]
    ValueTooWide {
        /// Value that was written
        value: u32,
        /// Field width in bits
        width: u32,
    },

    /// Reader ran past the end of the data
    #[error("unexpected end of bit stream at bit offset {0}")]
    UnexpectedEnd(usize),
}

/// Append-only bit writer
#[derive(Debug, Clone, Default)]
pub struct BitEncoder {
    bytes: Vec<u8>,
    current: u8,
    filled: u8,
}

impl BitEncoder {
    /// Create an empty encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `width` bits of `value`, most significant bit first
    pub fn bits(&mut self, value: u32, width: u32) -> Result<(), BitstreamError> {
        if width == 0 || width > 32 {
            return Err(BitstreamError::InvalidWidth(width));
        }
        if width < 32 && (value >> width) != 0 {
            return Err(BitstreamError::ValueTooWide { value, width });
        }
        for shift in (0..width).rev() {
            self.push_bit((value >> shift) & 1 == 1);
        }
        Ok(())
    }

    /// Append a single flag bit
    pub fn flag(&mut self, set: bool) {
        self.push_bit(set);
    }

    /// Append raw bytes, 8 bits each
    pub fn bytes(&mut self, data: &[u8]) {
        for byte in data {
            for shift in (0..8).rev() {
                self.push_bit((byte >> shift) & 1 == 1);
            }
        }
    }

    /// Number of bits written so far
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.filled as usize
    }

    /// Finish the stream, zero padding the last byte
    pub fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            let pad = 8 - self.filled;
            self.bytes.push(self.current << pad);
        }
        self.bytes
    }

    fn push_bit(&mut self, bit: bool) {
        self.current = (self.current << 1) | u8::from(bit);
        self.filled += 1;
        if self.filled == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.filled = 0;
        }
    }
}

/// Bit reader matching [`BitEncoder`]
#[derive(Debug, Clone)]
pub struct BitDecoder<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> BitDecoder<'a> {
    /// Start reading at the first bit of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Read a `width` bit unsigned field
    pub fn bits(&mut self, width: u32) -> Result<u32, BitstreamError> {
        if width == 0 || width > 32 {
            return Err(BitstreamError::InvalidWidth(width));
        }
        let mut value: u32 = 0;
        for _ in 0..width {
            let byte = self
                .data
                .get(self.offset / 8)
                .ok_or(BitstreamError::UnexpectedEnd(self.offset))?;
            let bit = (byte >> (7 - (self.offset % 8))) & 1;
            value = (value << 1) | u32::from(bit);
            self.offset += 1;
        }
        Ok(value)
    }

    /// Read a single flag bit
    pub fn flag(&mut self) -> Result<bool, BitstreamError> {
        Ok(self.bits(1)? == 1)
    }

    /// Read `count` whole bytes (not necessarily byte aligned)
    pub fn bytes(&mut self, count: usize) -> Result<Vec<u8>, BitstreamError> {
        (0..count).map(|_| self.bits(8).map(|b| b as u8)).collect()
    }

    /// Bits consumed so far
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bits left, including final padding
    pub fn remaining(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.offset)
    }
}
