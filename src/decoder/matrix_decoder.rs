//! Matrix-code decoding from a rectified module grid.
//!
//! Stages: dimension to version, finder/timing sanity check, format and version
//! information, unmasking, codeword extraction, Reed-Solomon correction per
//! block, then segment parsing. A grid that fails after the structural check is
//! retried once transposed, which is how a mirrored symbol samples.

mod blocks;
mod payload;
mod structure;

#[cfg(test)]
mod tests;

pub use blocks::BlockLayout;
pub(crate) use payload::{char_count_bits, mode};

use crate::decoder::bitstream::extract_codewords;
use crate::decoder::format::FormatInfo;
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::unmask::unmask;
use crate::decoder::version::VersionInfo;
use crate::error::{Result, ScanError};
use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};

/// A decoded matrix symbol with its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixPayload {
    pub text: String,
    pub version: Version,
    pub ec_level: ECLevel,
    pub mask_pattern: MaskPattern,
    pub errors_corrected: usize,
    pub mirrored: bool,
}

pub struct MatrixDecoder;

impl MatrixDecoder {
    /// Decode a square module grid (`true` = dark)
    pub fn decode(grid: &BitMatrix) -> Result<MatrixPayload> {
        if grid.width() != grid.height() {
            return Err(ScanError::geometry(format!(
                "grid is {}x{}, not square",
                grid.width(),
                grid.height()
            )));
        }
        let version = Version::from_dimension(grid.width()).ok_or_else(|| {
            ScanError::geometry(format!("dimension {} is not 17 + 4v", grid.width()))
        })?;
        structure::check_structure(grid)?;

        match Self::decode_oriented(grid, version) {
            Ok(payload) => Ok(payload),
            Err(err) => {
                log::trace!("direct read failed ({err}), trying mirrored grid");
                Self::decode_oriented(&grid.transposed(), version)
                    .map(|payload| MatrixPayload {
                        mirrored: true,
                        ..payload
                    })
                    .map_err(|_| err)
            }
        }
    }

    fn decode_oriented(grid: &BitMatrix, version: Version) -> Result<MatrixPayload> {
        let format = FormatInfo::extract(grid)
            .ok_or_else(|| ScanError::structure("format information unreadable"))?;

        if version.number() >= 7 {
            if let Some(read) = VersionInfo::extract(grid) {
                if read != version {
                    return Err(ScanError::structure(format!(
                        "version information says {} but the grid has {} modules",
                        read.number(),
                        grid.width()
                    )));
                }
            }
        }

        let func = FunctionMask::new(version);
        let mut unmasked = grid.clone();
        unmask(&mut unmasked, format.mask_pattern, &func);
        let codewords = extract_codewords(&unmasked, &func);

        let layout = BlockLayout::new(version, format.ec_level);
        let (data, errors_corrected) = layout.correct(&codewords)?;
        let text = payload::decode_segments(&data, version)?;

        Ok(MatrixPayload {
            text,
            version,
            ec_level: format.ec_level,
            mask_pattern: format.mask_pattern,
            errors_corrected,
            mirrored: false,
        })
    }
}
