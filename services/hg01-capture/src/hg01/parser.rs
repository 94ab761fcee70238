//! HG01 message parser
//!
//! Message layout after inversion (byte indices into the 65-bit window):
//!
//! | byte | content                                   |
//! |------|-------------------------------------------|
//! | 0-2  | header, not interpreted                   |
//! | 3    | id                                        |
//! | 4    | soil moisture                             |
//! | 5    | temperature, sign-magnitude               |
//! | 6    | battery (high nibble), light (low nibble) |
//! | 7    | light (high nibble)                       |
//!
//! The transmitter sends every bit inverted relative to the demodulator, so
//! the window is read through an XOR instead of flipping the row. There is
//! no checksum in the message; any 65 bits after a preamble decode.

use thiserror::Error;

use super::types::{Reading, MESSAGE_BITLEN, MESSAGE_BYTELEN, MODEL};
use crate::bitbuffer::{BitBufferError, BitRow};

/// Decode error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("message extraction failed: {0}")]
    Extract(#[from] BitBufferError),
}

/// Decode the message starting at `bitpos` in `row`
pub fn decode_message(row: &BitRow, bitpos: usize) -> Result<Reading, DecodeError> {
    let bytes = row.extract_bytes(bitpos, MESSAGE_BITLEN, true)?;

    let mut b = [0u8; MESSAGE_BYTELEN];
    b.copy_from_slice(&bytes);

    Ok(decode_bytes(&b))
}

/// Map an extracted, already inverted message onto reading fields
pub fn decode_bytes(b: &[u8; MESSAGE_BYTELEN]) -> Reading {
    Reading {
        model: MODEL,
        id: format!("{:02x}", b[3]),
        temperature_c: decode_sign_magnitude(b[5]),
        soil_moisture: b[4],
        light: (b[6] << 4) | (b[7] >> 4),
        battery: b[6] >> 4,
    }
}

/// Bit 7 is the sign, bits 0-6 the magnitude
fn decode_sign_magnitude(raw: u8) -> i8 {
    let magnitude = (raw & 0x7f) as i8;
    if raw & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hg01::types::{PREAMBLE, PREAMBLE_BITLEN};

    fn message_bytes(payload: &str) -> [u8; MESSAGE_BYTELEN] {
        let mut b = [0u8; MESSAGE_BYTELEN];
        b.copy_from_slice(&hex::decode(payload).unwrap());
        b
    }

    /// Raw row holding a preamble and the inverted form of `payload`
    /// (bytes 3..=7 plus the trailing bit of byte 8)
    fn raw_row(payload: &[u8; 6]) -> BitRow {
        let inverted: Vec<u8> = payload.iter().map(|b| !b).collect();
        let mut row = BitRow::default();
        row.push_bits(&PREAMBLE, PREAMBLE_BITLEN);
        row.push_bits(&inverted, MESSAGE_BITLEN - PREAMBLE_BITLEN);
        row
    }

    #[test]
    fn test_sign_magnitude() {
        assert_eq!(decode_sign_magnitude(0x00), 0);
        assert_eq!(decode_sign_magnitude(0x1e), 30);
        assert_eq!(decode_sign_magnitude(0x9e), -30);
        assert_eq!(decode_sign_magnitude(0x7f), 127);
        assert_eq!(decode_sign_magnitude(0xff), -127);
        assert_eq!(decode_sign_magnitude(0x80), 0);
    }

    #[test]
    fn test_light_assembly() {
        let reading = decode_bytes(&message_bytes("aa55210000003a5f00"));
        assert_eq!(reading.light, 0xa5);
        assert_eq!(reading.light, 165);
        assert_eq!(reading.battery, 3);
    }

    #[test]
    fn test_decode_bytes_fields() {
        let reading = decode_bytes(&message_bytes("aa55213c2d14647000"));
        assert_eq!(
            reading,
            Reading {
                model: "Vingnut HG01",
                id: "3c".to_string(),
                temperature_c: 20,
                soil_moisture: 45,
                light: 0x47,
                battery: 6,
            }
        );
    }

    #[test]
    fn test_decode_bytes_is_repeatable() {
        let b = message_bytes("aa5521ff9e9e3a5f80");
        assert_eq!(decode_bytes(&b), decode_bytes(&b));
        assert_eq!(decode_bytes(&b).id, "ff");
        assert_eq!(decode_bytes(&b).soil_moisture, 0x9e);
        assert_eq!(decode_bytes(&b).temperature_c, -30);
    }

    #[test]
    fn test_decode_message_inverts_window() {
        let row = raw_row(&[0x3c, 0x2d, 0x14, 0x64, 0x70, 0x00]);
        let reading = decode_message(&row, 0).unwrap();

        assert_eq!(reading.id, "3c");
        assert_eq!(reading.soil_moisture, 45);
        assert_eq!(reading.temperature_c, 20);
        assert_eq!(reading.battery, 6);
        assert_eq!(reading.light, 71);
    }

    #[test]
    fn test_decode_message_truncated_window() {
        let row = raw_row(&[0x3c, 0x2d, 0x14, 0x64, 0x70, 0x00]);
        let err = decode_message(&row, 1).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Extract(BitBufferError::OutOfRange {
                bitpos: 1,
                bits: MESSAGE_BITLEN,
                available: MESSAGE_BITLEN,
            })
        );
    }
}
