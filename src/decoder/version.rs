/// Version information for versions 7+ (BCH(18,6)) and alignment pattern layout
use crate::models::{BitMatrix, Version};

const GENERATOR: u32 = 0x1F25;
const MAX_DISTANCE: u32 = 3;

pub struct VersionInfo;

impl VersionInfo {
    /// 18-bit word for a version (only meaningful for 7+)
    pub fn encode(version: Version) -> u32 {
        let v = version.number() as u32;
        let mut rem = v;
        for _ in 0..12 {
            rem = (rem << 1) ^ ((rem >> 11) * GENERATOR);
        }
        (v << 12) | rem
    }

    /// Nearest version 7..=40 within Hamming distance 3
    pub fn decode(word: u32) -> Option<(Version, u32)> {
        (7..=40u8)
            .filter_map(Version::new)
            .map(|v| (v, (Self::encode(v) ^ word).count_ones()))
            .min_by_key(|&(_, d)| d)
            .filter(|&(_, d)| d <= MAX_DISTANCE)
    }

    /// Read both copies; `None` for symbols below 45 modules or unreadable blocks
    pub fn extract(matrix: &BitMatrix) -> Option<Version> {
        let size = matrix.width();
        if size < 45 {
            return None;
        }
        let mut top_right = 0u32;
        let mut bottom_left = 0u32;
        for (i, (a, b)) in version_positions(size).enumerate() {
            top_right |= (matrix.get(a, b) as u32) << i;
            bottom_left |= (matrix.get(b, a) as u32) << i;
        }

        [Self::decode(top_right), Self::decode(bottom_left)]
            .into_iter()
            .flatten()
            .min_by_key(|&(_, d)| d)
            .map(|(v, _)| v)
    }
}

/// `(a, b)` for version bits 0..18: the top-right copy sits at `(x=a, y=b)`,
/// the bottom-left copy at `(x=b, y=a)`
pub fn version_positions(size: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..18).map(move |i| (size - 11 + i % 3, i / 3))
}

/// Alignment pattern centers along one axis
pub fn alignment_pattern_positions(version: Version) -> Vec<usize> {
    let v = version.number() as usize;
    if v == 1 {
        return Vec::new();
    }
    let num_align = v / 7 + 2;
    let step = if v == 32 {
        26
    } else {
        (v * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };

    let mut positions = vec![6usize; num_align];
    let mut pos = version.size() - 7;
    for i in (1..num_align).rev() {
        positions[i] = pos;
        pos -= step;
    }
    positions
}
