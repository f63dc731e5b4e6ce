use std::borrow::Cow;

use crate::error::{Result, ScanError};
use crate::utils::grayscale;

/// Immutable 8-bit luminance grid for one camera frame.
///
/// The buffer is either borrowed from the acquisition layer for the duration of one
/// `process_frame` call or owned after a colour conversion.
#[derive(Debug, Clone)]
pub struct FrameBuffer<'a> {
    width: usize,
    height: usize,
    stride: usize,
    data: Cow<'a, [u8]>,
}

impl<'a> FrameBuffer<'a> {
    /// Borrow a luminance buffer with `stride` bytes per row
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> Result<Self> {
        Self::validate(data.len(), width, height, stride)?;
        Ok(Self {
            width,
            height,
            stride,
            data: Cow::Borrowed(data),
        })
    }

    /// Borrow a tightly packed luminance buffer
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        Self::new(data, width, height, width)
    }

    /// Take ownership of a tightly packed luminance buffer
    pub fn from_vec(data: Vec<u8>, width: usize, height: usize) -> Result<FrameBuffer<'static>> {
        Self::validate(data.len(), width, height, width)?;
        Ok(FrameBuffer {
            width,
            height,
            stride: width,
            data: Cow::Owned(data),
        })
    }

    /// Borrow the pixels of an `image::GrayImage`
    pub fn from_luma_image(image: &'a image::GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::from_slice(image.as_raw(), width as usize, height as usize)
    }

    /// Convert packed RGB bytes into an owned luminance frame
    pub fn from_rgb(rgb: &[u8], width: usize, height: usize) -> Result<FrameBuffer<'static>> {
        Self::check_packed(rgb.len(), width, height, 3)?;
        FrameBuffer::from_vec(grayscale::rgb_to_luma(rgb, width, height), width, height)
    }

    /// Convert packed RGBA bytes into an owned luminance frame
    pub fn from_rgba(rgba: &[u8], width: usize, height: usize) -> Result<FrameBuffer<'static>> {
        Self::check_packed(rgba.len(), width, height, 4)?;
        FrameBuffer::from_vec(grayscale::rgba_to_luma(rgba, width, height), width, height)
    }

    /// Convert packed BGRA bytes (the usual mobile camera layout) into an owned frame
    pub fn from_bgra(bgra: &[u8], width: usize, height: usize) -> Result<FrameBuffer<'static>> {
        Self::check_packed(bgra.len(), width, height, 4)?;
        FrameBuffer::from_vec(grayscale::bgra_to_luma(bgra, width, height), width, height)
    }

    fn validate(len: usize, width: usize, height: usize, stride: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(ScanError::InvalidFrame(format!(
                "empty frame {width}x{height}"
            )));
        }
        if stride < width {
            return Err(ScanError::InvalidFrame(format!(
                "stride {stride} shorter than width {width}"
            )));
        }
        let needed = stride * (height - 1) + width;
        if len < needed {
            return Err(ScanError::InvalidFrame(format!(
                "buffer holds {len} bytes, {width}x{height} with stride {stride} needs {needed}"
            )));
        }
        Ok(())
    }

    fn check_packed(len: usize, width: usize, height: usize, channels: usize) -> Result<()> {
        if width == 0 || height == 0 || len < width * height * channels {
            return Err(ScanError::InvalidFrame(format!(
                "{channels}-channel buffer of {len} bytes does not cover {width}x{height}"
            )));
        }
        Ok(())
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Luminance at (x, y)
    #[inline]
    pub fn luma(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// One row of luminance values, without stride padding
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    /// Detach from any borrowed storage
    pub fn into_owned(self) -> FrameBuffer<'static> {
        FrameBuffer {
            width: self.width,
            height: self.height,
            stride: self.stride,
            data: Cow::Owned(self.data.into_owned()),
        }
    }
}
