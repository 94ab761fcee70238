//! Demodulated bit rows and the search/extract primitives used by decoders
//!
//! A capture is what the pulse demodulator hands over for one reception:
//! an ordered list of rows, each row an MSB-first packed bit sequence with
//! its own bit length. Rows are read-only here; inversion happens while
//! reading, never in place.

mod row;

pub use row::BitRow;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Separator between rows in the text form of a capture
const ROW_SEPARATOR: char = '/';

/// Bit buffer errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BitBufferError {
    #[error("bit window {bitpos}+{bits} exceeds row length {available}")]
    OutOfRange {
        bitpos: usize,
        bits: usize,
        available: usize,
    },

    #[error("malformed row length prefix: {0:?}")]
    BadLength(String),

    #[error("invalid hex in row: {0}")]
    BadHex(#[from] hex::FromHexError),

    #[error("row declares {declared} bits but carries only {available}")]
    LengthMismatch { declared: usize, available: usize },
}

/// One reception: the demodulated rows, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capture {
    rows: Vec<BitRow>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<BitRow>) -> Self {
        Self { rows }
    }

    pub fn push_row(&mut self, row: BitRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[BitRow] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parses the rtl_433 codes notation: `{65}55aade.../{65}55aade...`
impl FromStr for Capture {
    type Err = BitBufferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .trim()
            .split(ROW_SEPARATOR)
            .map(|part| part.trim().parse::<BitRow>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rows })
    }
}

impl fmt::Display for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", ROW_SEPARATOR)?;
            }
            write!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multi_row_capture() {
        let capture: Capture = "{65}55aade3cd2eb9b8f00/{12}fff/".parse().unwrap();
        assert_eq!(capture.num_rows(), 3);
        assert_eq!(capture.rows()[0].len(), 65);
        assert_eq!(capture.rows()[1].len(), 12);
        assert!(capture.rows()[2].is_empty());
    }

    #[test]
    fn test_push_row_builds_capture() {
        let mut capture = Capture::new();
        assert!(capture.is_empty());

        capture.push_row(BitRow::from_bytes(&[0x55, 0xaa, 0xde]));
        capture.push_row(BitRow::new(vec![0xf0], 4));
        assert_eq!(capture.num_rows(), 2);
        assert_eq!(capture, "{24}55aade/{4}f".parse::<Capture>().unwrap());
    }

    #[test]
    fn test_capture_display_matches_codes_notation() {
        let capture: Capture = "{24}55aade/{4}f".parse().unwrap();
        assert_eq!(capture.to_string(), "{24}55aade/{4}f0");
    }

    #[test]
    fn test_parse_rejects_bad_row() {
        let err = "{24}55aade/{zz}00".parse::<Capture>().unwrap_err();
        assert_eq!(err, BitBufferError::BadLength("zz".to_string()));
    }
}
