//! Unified error type for the scanning core.
//!
//! Only construction-time failures (`Configuration`, `InvalidFrame`) and file
//! helpers (`Image`) ever reach a caller. The per-candidate variants are raised
//! inside the sampler and decoder and absorbed by the pipeline, which reports a
//! plain `NotFound` instead.

use thiserror::Error;

/// Errors produced while building or running the scanning pipeline.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A candidate region cannot be rectified (degenerate corners, invalid dimension).
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Finder, timing or guard structure does not match the assumed symbology.
    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),

    /// A Reed-Solomon block or check digit could not be repaired.
    #[error("error correction capacity exceeded in block {block} (capacity {capacity} codewords)")]
    ErrorCorrectionExceeded {
        /// Index of the failing block
        block: usize,
        /// Number of codeword errors the block could have corrected
        capacity: usize,
    },

    /// Invalid construction parameters.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Input the symbol encoders cannot represent.
    #[error("cannot encode: {0}")]
    Encoding(String),

    /// A frame buffer that does not describe a valid luminance grid.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Failure loading or saving an image file.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl ScanError {
    pub(crate) fn geometry(msg: impl Into<String>) -> Self {
        ScanError::Geometry(msg.into())
    }

    pub(crate) fn structure(msg: impl Into<String>) -> Self {
        ScanError::StructuralMismatch(msg.into())
    }

    /// True for the per-candidate failures the pipeline recovers from locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScanError::Geometry(_)
                | ScanError::StructuralMismatch(_)
                | ScanError::ErrorCorrectionExceeded { .. }
        )
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScanError>;
