//! A single demodulated bit row

use std::fmt;
use std::str::FromStr;

use super::BitBufferError;

/// MSB-first packed bits with an explicit length
///
/// Bits past `len()` in the last byte are padding and never read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitRow {
    bytes: Vec<u8>,
    bits: usize,
}

/// Read bit `idx` (MSB first) from a packed byte slice
#[inline(always)]
fn packed_bit(bytes: &[u8], idx: usize) -> bool {
    (bytes[idx / 8] >> (7 - (idx % 8))) & 1 == 1
}

impl BitRow {
    /// Create a row from packed bytes; `bits` is clamped to what the bytes hold
    pub fn new(bytes: Vec<u8>, bits: usize) -> Self {
        let bits = bits.min(bytes.len() * 8);
        Self { bytes, bits }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec(), bytes.len() * 8)
    }

    /// Append a single bit
    pub fn push_bit(&mut self, bit: bool) {
        let byte_idx = self.bits / 8;
        if byte_idx >= self.bytes.len() {
            self.bytes.push(0);
        }

        let mask = 1u8 << (7 - (self.bits % 8));
        if bit {
            self.bytes[byte_idx] |= mask;
        } else {
            self.bytes[byte_idx] &= !mask;
        }
        self.bits += 1;
    }

    /// Append the first `nbits` bits of `bytes`
    pub fn push_bits(&mut self, bytes: &[u8], nbits: usize) {
        for i in 0..nbits.min(bytes.len() * 8) {
            self.push_bit(packed_bit(bytes, i));
        }
    }

    /// Length in bits
    pub fn len(&self) -> usize {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..(self.bits + 7) / 8]
    }

    /// Find the first offset at or after `start` where the first
    /// `pattern_bits` bits of `pattern` match exactly.
    ///
    /// Returns `None` when no complete match fits in the row.
    pub fn search(&self, start: usize, pattern: &[u8], pattern_bits: usize) -> Option<usize> {
        if pattern_bits == 0 || pattern_bits > pattern.len() * 8 {
            return None;
        }
        let last = self.bits.checked_sub(pattern_bits)?;

        (start..=last).find(|&pos| {
            (0..pattern_bits).all(|i| packed_bit(&self.bytes, pos + i) == packed_bit(pattern, i))
        })
    }

    /// Copy `bits` bits starting at `bitpos` into `ceil(bits / 8)` bytes
    ///
    /// With `invert` set each bit is flipped as it is read. Padding bits in
    /// the last output byte are always zero.
    pub fn extract_bytes(
        &self,
        bitpos: usize,
        bits: usize,
        invert: bool,
    ) -> Result<Vec<u8>, BitBufferError> {
        let out_of_range = BitBufferError::OutOfRange {
            bitpos,
            bits,
            available: self.bits,
        };
        match bitpos.checked_add(bits) {
            Some(end) if end <= self.bits => {}
            _ => return Err(out_of_range),
        }

        let mut out = vec![0u8; (bits + 7) / 8];
        for bit_idx in 0..bits {
            if packed_bit(&self.bytes, bitpos + bit_idx) ^ invert {
                out[bit_idx / 8] |= 1 << (7 - (bit_idx % 8));
            }
        }

        Ok(out)
    }
}

/// `{N}hex` or bare `hex` (4 bits per digit)
impl FromStr for BitRow {
    type Err = BitBufferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (declared, digits) = match s.strip_prefix('{') {
            Some(rest) => {
                let end = rest
                    .find('}')
                    .ok_or_else(|| BitBufferError::BadLength(rest.to_string()))?;
                let len_str = &rest[..end];
                let bits = len_str
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| BitBufferError::BadLength(len_str.to_string()))?;
                (Some(bits), rest[end + 1..].trim())
            }
            None => (None, s),
        };

        let bytes = if digits.len() % 2 == 1 {
            hex::decode(format!("{}0", digits))?
        } else {
            hex::decode(digits)?
        };

        let available = digits.len() * 4;
        let bits = match declared {
            Some(declared) if declared > available => {
                return Err(BitBufferError::LengthMismatch {
                    declared,
                    available,
                });
            }
            Some(declared) => declared,
            None => available,
        };

        Ok(Self::new(bytes, bits))
    }
}

impl fmt::Display for BitRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.bits, hex::encode(self.as_bytes()))
    }
}
