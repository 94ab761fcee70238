//! Row scanner - finds HG01 preambles in a capture and decodes each match
//!
//! Each row long enough to hold a message is searched for the preamble.
//! After every match the cursor jumps a full message length ahead, so a
//! repeat transmission is never decoded from bits already consumed by the
//! previous window.

use tracing::{debug, trace};

use super::parser::{decode_message, DecodeError};
use super::types::{MESSAGE_BITLEN, PREAMBLE, PREAMBLE_BITLEN};
use crate::bitbuffer::Capture;
use crate::device::{DeviceSpec, VINGNUT_HG01};
use crate::output::ReadingSink;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecoderStats {
    pub captures_scanned: u64,
    pub rows_scanned: u64,
    pub short_rows: u64,
    pub preambles_found: u64,
    pub messages_decoded: u64,
}

/// HG01 decoder - scans captures and emits readings
#[derive(Debug, Default)]
pub struct Hg01Decoder {
    pub stats: DecoderStats,
}

impl Hg01Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registration metadata for the host dispatcher
    pub fn spec(&self) -> &'static DeviceSpec {
        &VINGNUT_HG01
    }

    /// Scan every row of `capture`, emitting one reading per decoded message.
    ///
    /// Returns the number of readings emitted. When nothing was emitted the
    /// last decoder result is returned instead: `Ok(0)` means no message was
    /// present, `Err` means a match was found but could not be decoded.
    pub fn scan<S>(&mut self, capture: &Capture, sink: &mut S) -> Result<usize, DecodeError>
    where
        S: ReadingSink + ?Sized,
    {
        trace!("Scanning capture {}", capture);
        self.stats.captures_scanned += 1;

        let mut events = 0usize;
        let mut last: Result<usize, DecodeError> = Ok(0);

        for (row_idx, row) in capture.rows().iter().enumerate() {
            self.stats.rows_scanned += 1;

            if row.len() < MESSAGE_BITLEN {
                self.stats.short_rows += 1;
                debug!(
                    "Bad message need {} bits got {}, row {} bit {}: {}",
                    MESSAGE_BITLEN,
                    row.len(),
                    row_idx,
                    0,
                    row
                );
                continue;
            }

            let mut bitpos = 0;
            while let Some(pos) = row.search(bitpos, &PREAMBLE, PREAMBLE_BITLEN) {
                if pos + MESSAGE_BITLEN > row.len() {
                    break;
                }
                self.stats.preambles_found += 1;

                last = decode_message(row, pos).map(|reading| {
                    trace!("Decoded message at row {} bit {}: {:?}", row_idx, pos, reading);
                    sink.emit(reading);
                    1
                });
                if let Ok(n) = last {
                    events += n;
                    self.stats.messages_decoded += n as u64;
                }

                bitpos = pos + MESSAGE_BITLEN;
            }
        }

        if events > 0 {
            Ok(events)
        } else {
            last
        }
    }

    pub fn get_stats(&self) -> &DecoderStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = DecoderStats::default();
    }
}
