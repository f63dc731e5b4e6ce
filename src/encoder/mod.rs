//! Symbol encoders and a luminance canvas for synthesizing frames.
//!
//! Used by the round-trip tests, the benchmarks and the `generate` command.

/// EAN-13 digits to bar modules
pub mod ean13;
/// Text to matrix-code module grid
pub mod matrix;
/// Drawing symbols into frames
pub mod render;
/// Segment bit-stream building
pub mod segment;

pub use ean13::encode_ean13;
pub use matrix::{EncodedMatrix, MatrixEncoder};
pub use render::Canvas;
