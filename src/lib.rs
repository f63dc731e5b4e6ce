//! framescan - locate and decode optical codes in raw grayscale frames
//!
//! A pure Rust pipeline that takes one luminance frame at a time, finds matrix
//! (QR Model 2) and linear (EAN-13 / UPC-A) symbols in it and reports decoded
//! text once a read is stable across frames.
//!
//! Stages, each usable on its own:
//! - [`Binarizer`]: local adaptive threshold over an integral image
//! - [`FinderLocator`]: finder-pattern and guard-pattern search
//! - [`PerspectiveSampler`]: rectification into a [`ModuleGrid`]
//! - [`SymbolDecoder`]: error correction, check digits and segment decoding
//! - [`DecodePipeline`]: per-frame orchestration with a stability window
//!
//! ```
//! use framescan::{DecodePipeline, ScanConfig};
//! use framescan::encoder::{Canvas, MatrixEncoder};
//!
//! let symbol = MatrixEncoder::new().encode("HELLO").unwrap();
//! let mut canvas = Canvas::new(240, 240);
//! canvas.draw_matrix(&symbol.grid, 60, 60, 4);
//! let frame = canvas.into_frame().unwrap();
//!
//! let mut pipeline = DecodePipeline::new(ScanConfig::default()).unwrap();
//! assert_eq!(pipeline.process_frame(&frame).text(), Some("HELLO"));
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Pipeline configuration
pub mod config;
/// Symbol decoding (error correction, format extraction, data modes)
#[allow(missing_docs)]
pub mod decoder;
/// Candidate region location (finder patterns, alignment, guards)
#[allow(missing_docs)]
pub mod detector;
/// Symbol encoders and frame synthesis
#[allow(missing_docs)]
pub mod encoder;
/// Crate error type
pub mod error;
/// Core data structures (FrameBuffer, BitMatrix, regions, results)
#[allow(missing_docs)]
pub mod models;
/// Frame loop and stability policy
#[allow(missing_docs)]
pub mod pipeline;
/// Region rectification
#[allow(missing_docs)]
pub mod sampler;
/// Utility functions (grayscale, binarization, geometry)
#[allow(missing_docs)]
pub mod utils;

pub use config::ScanConfig;
pub use decoder::SymbolDecoder;
pub use detector::{Candidates, FinderLocator};
pub use error::{Result, ScanError};
pub use models::{
    BitMatrix, BoundingBox, CandidateRegion, DecodeResult, Decoded, ECLevel, FrameBuffer,
    LinearRegion, MaskPattern, MatrixRegion, ModuleGrid, Point, RegionShape, Symbology,
    SymbologySet, Version,
};
pub use pipeline::{DecodeCallback, DecodePipeline, PipelineState, StabilityState, StopHandle};
pub use sampler::PerspectiveSampler;
pub use utils::binarization::Binarizer;
