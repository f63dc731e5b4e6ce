use crate::decoder::bitstream::BitReader;
use crate::decoder::modes::{
    alphanumeric::AlphanumericDecoder, byte::ByteDecoder, numeric::NumericDecoder,
};
use crate::error::{Result, ScanError};
use crate::models::Version;

/// Segment mode indicators
pub(crate) mod mode {
    pub const TERMINATOR: u32 = 0b0000;
    pub const NUMERIC: u32 = 0b0001;
    pub const ALPHANUMERIC: u32 = 0b0010;
    pub const STRUCTURED_APPEND: u32 = 0b0011;
    pub const BYTE: u32 = 0b0100;
    pub const FNC1_FIRST: u32 = 0b0101;
    pub const ECI: u32 = 0b0111;
    pub const KANJI: u32 = 0b1000;
    pub const FNC1_SECOND: u32 = 0b1001;
}

/// Width of the character-count field for a mode and version
pub(crate) fn char_count_bits(mode: u32, version: Version) -> usize {
    let tier = match version.number() {
        1..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    match mode {
        mode::NUMERIC => [10, 12, 14][tier],
        mode::ALPHANUMERIC => [9, 11, 13][tier],
        mode::BYTE => [8, 16, 16][tier],
        mode::KANJI => [8, 10, 12][tier],
        _ => 0,
    }
}

/// Decode the segment sequence held in corrected data codewords
pub(super) fn decode_segments(data: &[u8], version: Version) -> Result<String> {
    let mut reader = BitReader::new(data);
    let mut text = String::new();
    let truncated = || ScanError::structure("segment runs past the data codewords");

    while reader.available() >= 4 {
        let mode = reader.read_bits(4).ok_or_else(truncated)?;
        match mode {
            mode::TERMINATOR => break,
            mode::NUMERIC | mode::ALPHANUMERIC | mode::BYTE => {
                let count = reader
                    .read_bits(char_count_bits(mode, version))
                    .ok_or_else(truncated)? as usize;
                let segment = match mode {
                    mode::NUMERIC => NumericDecoder::decode(&mut reader, count),
                    mode::ALPHANUMERIC => AlphanumericDecoder::decode(&mut reader, count),
                    _ => ByteDecoder::decode(&mut reader, count),
                };
                text.push_str(&segment.ok_or_else(|| {
                    ScanError::structure(format!("malformed segment in mode {mode:04b}"))
                })?);
            }
            mode::ECI => {
                // Designator is 1, 2 or 3 bytes; the payload is interpreted as UTF-8 regardless
                let first = reader.read_bits(8).ok_or_else(truncated)?;
                let extra = match first {
                    f if f & 0x80 == 0 => 0,
                    f if f & 0xC0 == 0x80 => 8,
                    f if f & 0xE0 == 0xC0 => 16,
                    _ => return Err(ScanError::structure("invalid ECI designator")),
                };
                reader.read_bits(extra).ok_or_else(truncated)?;
            }
            mode::STRUCTURED_APPEND => {
                // Sequence indicator and parity
                reader.read_bits(16).ok_or_else(truncated)?;
            }
            mode::FNC1_FIRST => {}
            mode::FNC1_SECOND => {
                reader.read_bits(8).ok_or_else(truncated)?;
            }
            mode::KANJI => return Err(ScanError::structure("kanji segments are not supported")),
            other => {
                return Err(ScanError::structure(format!("unknown mode {other:04b}")));
            }
        }
    }

    if text.is_empty() {
        return Err(ScanError::structure("empty payload"));
    }
    Ok(text)
}
