use crate::decoder::reed_solomon::ReedSolomonDecoder;
use crate::decoder::tables::{ec_block_info, num_total_codewords};
use crate::error::{Result, ScanError};
use crate::models::{ECLevel, Version};

/// Split of the codeword stream into Reed-Solomon blocks.
///
/// Short blocks come first; long blocks carry one extra data codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub num_blocks: usize,
    pub num_short_blocks: usize,
    pub short_data_len: usize,
    pub ecc_per_block: usize,
}

impl BlockLayout {
    pub fn new(version: Version, ec_level: ECLevel) -> Self {
        let info = ec_block_info(version, ec_level);
        let total = num_total_codewords(version);
        let num_short_blocks = info.num_blocks - total % info.num_blocks;
        let short_block_len = total / info.num_blocks;
        Self {
            num_blocks: info.num_blocks,
            num_short_blocks,
            short_data_len: short_block_len - info.ecc_per_block,
            ecc_per_block: info.ecc_per_block,
        }
    }

    /// Data codewords in block `b`
    pub fn data_len(&self, b: usize) -> usize {
        self.short_data_len + (b >= self.num_short_blocks) as usize
    }

    pub fn total_data(&self) -> usize {
        (0..self.num_blocks).map(|b| self.data_len(b)).sum()
    }

    /// Interleave per-block data and ECC into transmission order
    pub fn interleave(&self, blocks: &[Vec<u8>]) -> Vec<u8> {
        let long_len = self.short_data_len + 1;
        let mut out = Vec::with_capacity(self.total_data() + self.num_blocks * self.ecc_per_block);
        for i in 0..long_len + self.ecc_per_block {
            for (b, block) in blocks.iter().enumerate() {
                // The short blocks' missing data slot is skipped
                if i == self.short_data_len && b < self.num_short_blocks {
                    continue;
                }
                let idx = if i > self.short_data_len && b < self.num_short_blocks {
                    i - 1
                } else {
                    i
                };
                if let Some(&c) = block.get(idx) {
                    out.push(c);
                }
            }
        }
        out
    }

    /// Regroup transmission-order codewords into blocks of data followed by ECC
    pub fn deinterleave(&self, codewords: &[u8]) -> Result<Vec<Vec<u8>>> {
        let needed = self.total_data() + self.num_blocks * self.ecc_per_block;
        if codewords.len() < needed {
            return Err(ScanError::structure(format!(
                "{} codewords, layout needs {needed}",
                codewords.len()
            )));
        }

        let mut blocks: Vec<Vec<u8>> = (0..self.num_blocks)
            .map(|b| Vec::with_capacity(self.data_len(b) + self.ecc_per_block))
            .collect();
        let mut stream = codewords.iter().copied();
        for i in 0..=self.short_data_len {
            for (b, block) in blocks.iter_mut().enumerate() {
                if i < self.data_len(b) {
                    block.extend(stream.next());
                }
            }
        }
        for _ in 0..self.ecc_per_block {
            for block in blocks.iter_mut() {
                block.extend(stream.next());
            }
        }
        Ok(blocks)
    }

    /// Correct every block; returns the concatenated data and the repaired count
    pub fn correct(&self, codewords: &[u8]) -> Result<(Vec<u8>, usize)> {
        let rs = ReedSolomonDecoder::new(self.ecc_per_block);
        let mut data = Vec::with_capacity(self.total_data());
        let mut corrected = 0;
        for (b, mut block) in self.deinterleave(codewords)?.into_iter().enumerate() {
            match rs.decode(&mut block) {
                Ok(n) => corrected += n,
                Err(reason) => {
                    log::trace!("block {b} rejected: {reason}");
                    return Err(ScanError::ErrorCorrectionExceeded {
                        block: b,
                        capacity: rs.capacity(),
                    });
                }
            }
            data.extend_from_slice(&block[..self.data_len(b)]);
        }
        Ok((data, corrected))
    }
}
