//! Symbol decoding from sampled module grids
//!
//! This module contains everything that happens after sampling:
//! - Structural checks (finder and timing patterns, guard widths)
//! - Format and version information (BCH)
//! - Reed-Solomon correction and EAN-13 check digits
//! - Segment decoding (numeric, alphanumeric, byte, ECI)

/// Codeword extraction and bit reading
pub mod bitstream;
/// EAN-13 width decoding
pub mod ean13;
/// Format information (EC level and mask)
pub mod format;
/// Function module mask and data placement order
pub mod function_mask;
/// Matrix-code decoding pipeline
pub mod matrix_decoder;
/// Segment mode decoders (numeric, alphanumeric, byte)
pub mod modes;
/// Reed-Solomon over GF(256)
pub mod reed_solomon;
/// Block and capacity tables
pub mod tables;
/// Data mask removal
pub mod unmask;
/// Version information (versions 7-40)
pub mod version;

use crate::models::{DecodeResult, Decoded, ModuleGrid, Symbology};
use matrix_decoder::MatrixDecoder;

/// Turns a sampled grid into text, absorbing every recoverable failure.
pub struct SymbolDecoder;

impl SymbolDecoder {
    /// Decode a grid. Never fails; anything unreadable is `NotFound`.
    pub fn decode(grid: &ModuleGrid) -> DecodeResult {
        let decoded = match grid {
            ModuleGrid::Matrix(matrix) => MatrixDecoder::decode(matrix).map(|payload| {
                log::trace!(
                    "matrix v{} {:?} mask {} corrected {}{}",
                    payload.version.number(),
                    payload.ec_level,
                    payload.mask_pattern.bits(),
                    payload.errors_corrected,
                    if payload.mirrored { " (mirrored)" } else { "" }
                );
                Decoded {
                    text: payload.text,
                    symbology: Symbology::MatrixCode,
                    errors_corrected: payload.errors_corrected,
                }
            }),
            ModuleGrid::Linear(widths) => ean13::decode_widths(widths).map(|text| Decoded {
                text,
                symbology: Symbology::LinearCode,
                errors_corrected: 0,
            }),
        };

        match decoded {
            Ok(decoded) => DecodeResult::Decoded(decoded),
            Err(err) => {
                log::trace!("decode rejected: {err}");
                DecodeResult::NotFound
            }
        }
    }
}
