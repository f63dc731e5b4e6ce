use crate::decoder::matrix_decoder::{char_count_bits, mode};
use crate::decoder::modes::alphanumeric::char_value;
use crate::models::Version;

/// Growable MSB-first bit buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `count` bits of `value`, most significant first
    pub fn push(&mut self, value: u32, count: usize) {
        for i in (0..count).rev() {
            self.bits.push((value >> i) & 1 == 1);
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn extend(&mut self, other: &BitBuffer) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Pack into bytes, zero-filling the last partial byte
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &b)| acc | ((b as u8) << (7 - i)))
            })
            .collect()
    }
}

/// One encoded segment: mode, character count and data bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub mode: u32,
    pub char_count: usize,
    pub data: BitBuffer,
}

impl Segment {
    /// Most compact single segment for `text`
    pub fn for_text(text: &str) -> Self {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            Self::numeric(text)
        } else if text.chars().all(|c| char_value(c).is_some()) {
            Self::alphanumeric(text)
        } else {
            Self::bytes(text.as_bytes())
        }
    }

    fn numeric(digits: &str) -> Self {
        let mut data = BitBuffer::new();
        for group in digits.as_bytes().chunks(3) {
            let value = group.iter().fold(0u32, |acc, &d| acc * 10 + (d - b'0') as u32);
            data.push(value, group.len() * 3 + 1);
        }
        Self {
            mode: mode::NUMERIC,
            char_count: digits.len(),
            data,
        }
    }

    fn alphanumeric(text: &str) -> Self {
        let values: Vec<u32> = text.chars().filter_map(char_value).collect();
        let mut data = BitBuffer::new();
        for pair in values.chunks(2) {
            match pair {
                [a, b] => data.push(a * 45 + b, 11),
                [a] => data.push(*a, 6),
                _ => {}
            }
        }
        Self {
            mode: mode::ALPHANUMERIC,
            char_count: values.len(),
            data,
        }
    }

    fn bytes(bytes: &[u8]) -> Self {
        let mut data = BitBuffer::new();
        for &b in bytes {
            data.push(b as u32, 8);
        }
        Self {
            mode: mode::BYTE,
            char_count: bytes.len(),
            data,
        }
    }

    /// Bits needed at `version`, `None` when the count does not fit its field
    pub fn encoded_len(&self, version: Version) -> Option<usize> {
        let cc_bits = char_count_bits(self.mode, version);
        (self.char_count < (1 << cc_bits)).then_some(4 + cc_bits + self.data.len())
    }

    /// Header and data appended to `out`
    pub fn write(&self, version: Version, out: &mut BitBuffer) {
        out.push(self.mode, 4);
        out.push(self.char_count as u32, char_count_bits(self.mode, version));
        out.extend(&self.data);
    }
}
