//! Image-processing helpers shared by the locator and sampler
//!
//! - Grayscale conversion (RGB/RGBA/BGRA to luminance)
//! - Adaptive binarization over an integral image
//! - Geometry (perspective and affine transforms)

pub mod binarization;
pub mod geometry;
pub mod grayscale;
