use crate::decoder::format::{FormatInfo, format_positions};
use crate::decoder::function_mask::{FunctionMask, alignment_centers};
use crate::decoder::matrix_decoder::BlockLayout;
use crate::decoder::reed_solomon::ReedSolomonEncoder;
use crate::decoder::tables::num_data_codewords;
use crate::decoder::unmask::unmask;
use crate::decoder::version::{VersionInfo, version_positions};
use crate::encoder::segment::{BitBuffer, Segment};
use crate::error::{Result, ScanError};
use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};

/// A fully drawn matrix symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMatrix {
    /// Module grid, `true` = dark, without quiet zone
    pub grid: BitMatrix,
    pub version: Version,
    pub ec_level: ECLevel,
    pub mask_pattern: MaskPattern,
}

/// Text to matrix-code encoder
#[derive(Debug, Clone)]
pub struct MatrixEncoder {
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
    min_version: Version,
}

impl Default for MatrixEncoder {
    fn default() -> Self {
        Self {
            ec_level: ECLevel::M,
            mask: None,
            min_version: Version::MIN,
        }
    }
}

impl MatrixEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ec_level(mut self, ec_level: ECLevel) -> Self {
        self.ec_level = ec_level;
        self
    }

    /// Force a mask instead of choosing by penalty score
    pub fn mask(mut self, mask: MaskPattern) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Never use a version below this one
    pub fn min_version(mut self, version: Version) -> Self {
        self.min_version = version;
        self
    }

    pub fn encode(&self, text: &str) -> Result<EncodedMatrix> {
        if text.is_empty() {
            return Err(ScanError::Encoding("empty text".into()));
        }
        let segment = Segment::for_text(text);
        let version = (self.min_version.number()..=Version::MAX.number())
            .filter_map(Version::new)
            .find(|&v| {
                segment
                    .encoded_len(v)
                    .is_some_and(|len| len <= num_data_codewords(v, self.ec_level) * 8)
            })
            .ok_or_else(|| {
                ScanError::Encoding(format!(
                    "{} characters do not fit any version at level {:?}",
                    text.chars().count(),
                    self.ec_level
                ))
            })?;

        let data = self.data_codewords(&segment, version);
        let codewords = self.add_ecc_and_interleave(&data, version);

        let func = FunctionMask::new(version);
        let mut base = draw_function_patterns(version);
        for (bit_index, &(x, y)) in func.placement_order().iter().enumerate() {
            let dark = codewords
                .get(bit_index / 8)
                .is_some_and(|&c| (c >> (7 - bit_index % 8)) & 1 == 1);
            base.set(x, y, dark);
        }

        let candidates: Vec<MaskPattern> = match self.mask {
            Some(mask) => vec![mask],
            None => MaskPattern::all().collect(),
        };
        let mut best: Option<(u32, EncodedMatrix)> = None;
        for mask in candidates {
            let mut grid = base.clone();
            unmask(&mut grid, mask, &func);
            draw_format(&mut grid, FormatInfo::new(self.ec_level, mask));
            let score = penalty_score(&grid);
            if best.as_ref().is_none_or(|(s, _)| score < *s) {
                best = Some((
                    score,
                    EncodedMatrix {
                        grid,
                        version,
                        ec_level: self.ec_level,
                        mask_pattern: mask,
                    },
                ));
            }
        }
        best.map(|(_, symbol)| symbol)
            .ok_or_else(|| ScanError::Encoding("no mask candidate".into()))
    }

    /// Segment, terminator and padding as data codewords
    fn data_codewords(&self, segment: &Segment, version: Version) -> Vec<u8> {
        let capacity_bits = num_data_codewords(version, self.ec_level) * 8;
        let mut bits = BitBuffer::new();
        segment.write(version, &mut bits);
        let terminator = (capacity_bits - bits.len()).min(4);
        bits.push(0, terminator);
        let mut bytes = bits.to_bytes();
        for pad in [0xEC, 0x11].into_iter().cycle() {
            if bytes.len() >= capacity_bits / 8 {
                break;
            }
            bytes.push(pad);
        }
        bytes
    }

    fn add_ecc_and_interleave(&self, data: &[u8], version: Version) -> Vec<u8> {
        let layout = BlockLayout::new(version, self.ec_level);
        let rs = ReedSolomonEncoder::new(layout.ecc_per_block);
        let mut offset = 0;
        let blocks: Vec<Vec<u8>> = (0..layout.num_blocks)
            .map(|b| {
                let len = layout.data_len(b);
                let mut block = data[offset..offset + len].to_vec();
                offset += len;
                block.extend(rs.encode(&block));
                block
            })
            .collect();
        layout.interleave(&blocks)
    }
}

/// Finders, separators, timing, alignment, version info and the dark module
fn draw_function_patterns(version: Version) -> BitMatrix {
    let size = version.size();
    let mut grid = BitMatrix::new(size, size);

    for i in 0..size {
        grid.set(6, i, i % 2 == 0);
        grid.set(i, 6, i % 2 == 0);
    }

    for (cx, cy) in [(3, 3), (size - 4, 3), (3, size - 4)] {
        for dy in -4isize..=4 {
            for dx in -4isize..=4 {
                let (x, y) = (cx as isize + dx, cy as isize + dy);
                if x < 0 || y < 0 {
                    continue;
                }
                let ring = dx.abs().max(dy.abs());
                grid.set(x as usize, y as usize, ring != 2 && ring != 4);
            }
        }
    }

    for (cx, cy) in alignment_centers(version) {
        for dy in -2isize..=2 {
            for dx in -2isize..=2 {
                let ring = dx.abs().max(dy.abs());
                grid.set((cx as isize + dx) as usize, (cy as isize + dy) as usize, ring != 1);
            }
        }
    }

    if version.number() >= 7 {
        let word = VersionInfo::encode(version);
        for (i, (a, b)) in version_positions(size).enumerate() {
            let bit = (word >> i) & 1 == 1;
            grid.set(a, b, bit);
            grid.set(b, a, bit);
        }
    }

    grid.set(8, size - 8, true);
    grid
}

fn draw_format(grid: &mut BitMatrix, format: FormatInfo) {
    let word = format.encode();
    for positions in format_positions(grid.width()) {
        for (i, &(x, y)) in positions.iter().enumerate() {
            grid.set(x, y, (word >> i) & 1 == 1);
        }
    }
}

/// ISO 18004 mask penalty: runs, 2x2 blocks, finder look-alikes and dark balance
fn penalty_score(grid: &BitMatrix) -> u32 {
    let size = grid.width();
    let mut score = 0u32;

    for transpose in [false, true] {
        let at = |i: usize, j: usize| if transpose { grid.get(j, i) } else { grid.get(i, j) };
        for j in 0..size {
            let line: Vec<bool> = (0..size).map(|i| at(i, j)).collect();

            let mut run = 1;
            for i in 1..=size {
                if i < size && line[i] == line[i - 1] {
                    run += 1;
                } else {
                    if run >= 5 {
                        score += 3 + (run - 5) as u32;
                    }
                    run = 1;
                }
            }

            for window in line.windows(11) {
                let core = [true, false, true, true, true, false, true];
                let light = |s: &[bool]| s.iter().all(|&b| !b);
                if (window[4..] == core && light(&window[..4]))
                    || (window[..7] == core && light(&window[7..]))
                {
                    score += 40;
                }
            }
        }
    }

    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let c = grid.get(x, y);
            if c == grid.get(x + 1, y) && c == grid.get(x, y + 1) && c == grid.get(x + 1, y + 1) {
                score += 3;
            }
        }
    }

    let total = size * size;
    let dark = grid.count_ones();
    let deviation = (dark * 20).abs_diff(total * 10);
    score += (deviation / total) as u32 * 10;

    score
}
