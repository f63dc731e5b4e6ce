/// Format information: EC level and mask, protected by BCH(15,5)
use crate::models::{BitMatrix, ECLevel, MaskPattern};

const GENERATOR: u32 = 0x537;
const XOR_MASK: u32 = 0x5412;
/// BCH(15,5) corrects up to three bit errors
const MAX_DISTANCE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub ec_level: ECLevel,
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    pub fn new(ec_level: ECLevel, mask_pattern: MaskPattern) -> Self {
        Self {
            ec_level,
            mask_pattern,
        }
    }

    /// Masked 15-bit word as stored in the symbol
    pub fn encode(&self) -> u16 {
        let data = ((self.ec_level.format_bits() as u32) << 3) | self.mask_pattern.bits() as u32;
        let mut rem = data;
        for _ in 0..10 {
            rem = (rem << 1) ^ ((rem >> 9) * GENERATOR);
        }
        (((data << 10) | rem) ^ XOR_MASK) as u16
    }

    /// Nearest valid word within Hamming distance 3, with its distance
    pub fn decode(word: u16) -> Option<(Self, u32)> {
        let mut best: Option<(Self, u32)> = None;
        for data in 0..32u8 {
            let ec_level = ECLevel::from_format_bits(data >> 3);
            let info = Self::new(ec_level, MaskPattern::from_bits(data));
            let distance = (info.encode() ^ word).count_ones();
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((info, distance));
            }
        }
        best.filter(|&(_, d)| d <= MAX_DISTANCE)
    }

    /// Read both copies and keep the closer one
    pub fn extract(matrix: &BitMatrix) -> Option<Self> {
        let size = matrix.width();
        if size < 21 {
            return None;
        }
        let [first, second] = format_positions(size);
        let read = |positions: &[(usize, usize); 15]| {
            positions
                .iter()
                .enumerate()
                .fold(0u16, |acc, (i, &(x, y))| acc | ((matrix.get(x, y) as u16) << i))
        };

        [Self::decode(read(&first)), Self::decode(read(&second))]
            .into_iter()
            .flatten()
            .min_by_key(|&(_, d)| d)
            .map(|(info, _)| info)
    }
}

/// Module coordinates `(x, y)` of format bits 0..15 for both copies
pub fn format_positions(size: usize) -> [[(usize, usize); 15]; 2] {
    let mut first = [(0, 0); 15];
    let mut second = [(0, 0); 15];
    for i in 0..15 {
        first[i] = match i {
            0..=5 => (8, i),
            6 => (8, 7),
            7 => (8, 8),
            8 => (7, 8),
            _ => (14 - i, 8),
        };
        second[i] = if i < 8 {
            (size - 1 - i, 8)
        } else {
            (8, size - 15 + i)
        };
    }
    [first, second]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_words() {
        assert_eq!(FormatInfo::new(ECLevel::M, MaskPattern::from_bits(0)).encode(), 0x5412);
        assert_eq!(FormatInfo::new(ECLevel::M, MaskPattern::from_bits(5)).encode(), 0x40CE);
        assert_eq!(FormatInfo::new(ECLevel::L, MaskPattern::from_bits(0)).encode(), 0x77C4);
        assert_eq!(FormatInfo::new(ECLevel::L, MaskPattern::from_bits(4)).encode(), 0x662F);
    }

    #[test]
    fn test_decode_with_bit_errors() {
        let info = FormatInfo::new(ECLevel::Q, MaskPattern::from_bits(3));
        let word = info.encode();
        assert_eq!(FormatInfo::decode(word), Some((info, 0)));
        assert_eq!(FormatInfo::decode(word ^ 0b100_0000_0010_0001), Some((info, 3)));
    }

    #[test]
    fn test_extract_survives_one_damaged_copy() {
        let info = FormatInfo::new(ECLevel::H, MaskPattern::from_bits(6));
        let word = info.encode();
        let mut matrix = BitMatrix::new(21, 21);
        let [first, second] = format_positions(21);
        for i in 0..15 {
            let bit = (word >> i) & 1 == 1;
            matrix.set(first[i].0, first[i].1, !bit);
            matrix.set(second[i].0, second[i].1, bit);
        }
        assert_eq!(FormatInfo::extract(&matrix), Some(info));
    }
}
