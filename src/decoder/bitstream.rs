//! Codeword extraction from a module grid and MSB-first bit reading

use crate::decoder::function_mask::FunctionMask;
use crate::models::BitMatrix;

/// Pack data modules into codewords following the zigzag placement order.
///
/// Trailing remainder bits that do not fill a whole codeword are dropped.
pub fn extract_codewords(matrix: &BitMatrix, func: &FunctionMask) -> Vec<u8> {
    let order = func.placement_order();
    order
        .chunks_exact(8)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u8, |acc, &(x, y)| (acc << 1) | matrix.get(x, y) as u8)
        })
        .collect()
}

/// Sequential MSB-first reader over a byte slice
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Bits left to read
    pub fn available(&self) -> usize {
        self.bytes.len() * 8 - self.position
    }

    /// Read `count` (<= 32) bits, `None` when the stream is too short
    pub fn read_bits(&mut self, count: usize) -> Option<u32> {
        if count > 32 || count > self.available() {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.bytes[self.position / 8];
            let bit = (byte >> (7 - self.position % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.position += 1;
        }
        Some(value)
    }
}
