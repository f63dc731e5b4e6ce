/// Numeric mode decoder (Mode 0001)
/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
use crate::decoder::bitstream::BitReader;

pub struct NumericDecoder;

impl NumericDecoder {
    /// Decode `character_count` digits; `None` on a short stream or an out-of-range group
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Option<String> {
        let mut result = String::with_capacity(character_count);
        let mut chars_remaining = character_count;

        while chars_remaining > 0 {
            let group_size = chars_remaining.min(3);
            let (bits_needed, limit) = match group_size {
                3 => (10, 1000),
                2 => (7, 100),
                _ => (4, 10),
            };

            let value = reader.read_bits(bits_needed)?;
            if value >= limit {
                return None;
            }

            match group_size {
                3 => result.push_str(&format!("{value:03}")),
                2 => result.push_str(&format!("{value:02}")),
                _ => result.push_str(&format!("{value}")),
            }
            chars_remaining -= group_size;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_decode() {
        // 012 -> 0000001100, 34 -> 0100010, 5 -> 0101
        let bytes = [0b0000_0011, 0b0001_0001, 0b0010_1000];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(NumericDecoder::decode(&mut reader, 6).as_deref(), Some("012345"));
    }

    #[test]
    fn test_rejects_group_over_999() {
        // 1111111111 = 1023
        let bytes = [0xFF, 0xC0];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(NumericDecoder::decode(&mut reader, 3), None);
    }
}
