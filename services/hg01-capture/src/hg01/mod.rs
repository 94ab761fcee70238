//! Vingnut HG01 soil moisture meter decoding

pub mod parser;
mod scanner;
mod types;

pub use parser::{decode_bytes, decode_message, DecodeError};
pub use scanner::{DecoderStats, Hg01Decoder};
pub use types::{Reading, MESSAGE_BITLEN, MESSAGE_BYTELEN, MODEL, PREAMBLE, PREAMBLE_BITLEN};
