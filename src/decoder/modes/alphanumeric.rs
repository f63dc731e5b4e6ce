/// Alphanumeric mode decoder (Mode 0010)
/// Character set: 0-9, A-Z, space, $%*+-./:
use crate::decoder::bitstream::BitReader;

pub(crate) const ALPHANUMERIC_TABLE: [char; 45] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', '$',
    '%', '*', '+', '-', '.', '/', ':',
];

/// Index of a character in the alphanumeric set
pub(crate) fn char_value(c: char) -> Option<u32> {
    ALPHANUMERIC_TABLE
        .iter()
        .position(|&t| t == c)
        .map(|i| i as u32)
}

/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Option<String> {
        let mut result = String::with_capacity(character_count);
        let mut chars_remaining = character_count;

        while chars_remaining >= 2 {
            let value = reader.read_bits(11)? as usize;
            let (first, second) = (value / 45, value % 45);
            if first >= 45 {
                return None;
            }
            result.push(ALPHANUMERIC_TABLE[first]);
            result.push(ALPHANUMERIC_TABLE[second]);
            chars_remaining -= 2;
        }

        if chars_remaining == 1 {
            let value = reader.read_bits(6)? as usize;
            result.push(*ALPHANUMERIC_TABLE.get(value)?);
        }

        Some(result)
    }
}
