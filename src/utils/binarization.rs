//! Local adaptive thresholding over an integral image.
//!
//! A pixel is foreground when its luminance is below the mean of the square
//! window around it minus a fixed bias. The window side is the frame width divided
//! by `window_divisor`; window sums come from a summed-area table so the whole pass
//! is linear in the pixel count.

use crate::models::{BitMatrix, FrameBuffer};

/// Default bias subtracted from the local mean
pub const DEFAULT_BIAS: i32 = 10;
/// Default ratio between frame width and window side
pub const DEFAULT_WINDOW_DIVISOR: usize = 8;

/// Adaptive binarizer that keeps its summed-area table between frames
#[derive(Debug, Clone)]
pub struct Binarizer {
    bias: i32,
    window_divisor: usize,
    integral: Vec<u64>,
}

impl Binarizer {
    /// Create a binarizer with the given bias and window divisor
    pub fn new(bias: i32, window_divisor: usize) -> Self {
        Self {
            bias,
            window_divisor: window_divisor.max(1),
            integral: Vec::new(),
        }
    }

    /// Half-width of the averaging window for a frame of this width
    pub fn window_radius(&self, width: usize) -> usize {
        (width / self.window_divisor / 2).max(1)
    }

    /// Binarize a frame; output dimensions always equal the frame's
    pub fn binarize(&mut self, frame: &FrameBuffer) -> BitMatrix {
        let width = frame.width();
        let height = frame.height();
        self.fill_integral(frame);

        let radius = self.window_radius(width);
        let stride = width + 1;
        let mut mask = BitMatrix::new(width, height);

        for y in 0..height {
            let y0 = y.saturating_sub(radius);
            let y1 = (y + radius + 1).min(height);
            let row = frame.row(y);
            for (x, &value) in row.iter().enumerate() {
                let x0 = x.saturating_sub(radius);
                let x1 = (x + radius + 1).min(width);
                let sum = self.integral[y1 * stride + x1] + self.integral[y0 * stride + x0]
                    - self.integral[y0 * stride + x1]
                    - self.integral[y1 * stride + x0];
                let count = ((x1 - x0) * (y1 - y0)) as u64;
                let mean = (sum / count) as i32;
                if (value as i32) < mean - self.bias {
                    mask.set(x, y, true);
                }
            }
        }

        mask
    }

    /// Summed-area table with a zero first row and column
    fn fill_integral(&mut self, frame: &FrameBuffer) {
        let width = frame.width();
        let height = frame.height();
        let stride = width + 1;
        self.integral.clear();
        self.integral.resize(stride * (height + 1), 0);

        for y in 0..height {
            let mut row_sum = 0u64;
            let row = frame.row(y);
            for x in 0..width {
                row_sum += row[x] as u64;
                let above = self.integral[y * stride + x + 1];
                self.integral[(y + 1) * stride + x + 1] = above + row_sum;
            }
        }
    }
}

impl Default for Binarizer {
    fn default() -> Self {
        Self::new(DEFAULT_BIAS, DEFAULT_WINDOW_DIVISOR)
    }
}

/// One-shot adaptive binarization with default parameters
pub fn adaptive_binarize(frame: &FrameBuffer) -> BitMatrix {
    Binarizer::default().binarize(frame)
}
