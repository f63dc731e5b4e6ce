use crate::error::{Result, ScanError};
use crate::models::{BitMatrix, FrameBuffer};

/// Modules of light margin around a rendered matrix symbol
pub const MATRIX_QUIET_ZONE: usize = 4;
/// Modules of light margin left and right of a rendered linear symbol
pub const LINEAR_QUIET_ZONE: usize = 11;

const LIGHT: u8 = 255;
const DARK: u8 = 0;

/// White luminance canvas that symbols are drawn onto
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![LIGHT; width * height],
        }
    }

    /// Canvas exactly holding a matrix symbol and its quiet zone
    pub fn for_matrix(grid: &BitMatrix, scale: usize) -> Self {
        let side = (grid.width() + 2 * MATRIX_QUIET_ZONE) * scale;
        let mut canvas = Self::new(side, side);
        canvas.draw_matrix(grid, MATRIX_QUIET_ZONE * scale, MATRIX_QUIET_ZONE * scale, scale);
        canvas
    }

    /// Canvas exactly holding a linear symbol, bars `height` pixels tall
    pub fn for_linear(modules: &[bool], scale: usize, height: usize) -> Self {
        let margin = LINEAR_QUIET_ZONE * scale;
        let mut canvas = Self::new(modules.len() * scale + 2 * margin, height + 2 * margin);
        canvas.draw_linear(modules, margin, margin, scale, height);
        canvas
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fill a rectangle, clipped to the canvas
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, luma: u8) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y.min(y_end)..y_end {
            let start = row * self.width;
            self.pixels[start + x.min(x_end)..start + x_end].fill(luma);
        }
    }

    /// Draw dark modules of `grid` with its top-left module at `(left, top)`
    pub fn draw_matrix(&mut self, grid: &BitMatrix, left: usize, top: usize, scale: usize) {
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if grid.get(x, y) {
                    self.fill_rect(left + x * scale, top + y * scale, scale, scale, DARK);
                }
            }
        }
    }

    /// Draw a row of bar modules as vertical bars
    pub fn draw_linear(
        &mut self,
        modules: &[bool],
        left: usize,
        top: usize,
        scale: usize,
        height: usize,
    ) {
        for (i, &bar) in modules.iter().enumerate() {
            if bar {
                self.fill_rect(left + i * scale, top, scale, height, DARK);
            }
        }
    }

    /// Set every pixel to one luminance
    pub fn clear(&mut self, luma: u8) {
        self.pixels.fill(luma);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_frame(self) -> Result<FrameBuffer<'static>> {
        FrameBuffer::from_vec(self.pixels, self.width, self.height)
    }

    pub fn into_image(self) -> Result<image::GrayImage> {
        image::GrayImage::from_raw(self.width as u32, self.height as u32, self.pixels)
            .ok_or_else(|| ScanError::InvalidFrame("canvas does not fit an image buffer".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_canvas_layout() {
        let mut grid = BitMatrix::new(21, 21);
        grid.set(0, 0, true);
        grid.set(20, 20, true);
        let canvas = Canvas::for_matrix(&grid, 3);
        assert_eq!(canvas.width(), 29 * 3);

        let frame = canvas.into_frame().unwrap();
        assert_eq!(frame.luma(12, 12), 0);
        assert_eq!(frame.luma(14, 14), 0);
        assert_eq!(frame.luma(15, 15), 255);
        assert_eq!(frame.luma(11, 11), 255);
        assert_eq!(frame.luma(24 * 3 + 1, 24 * 3 + 1), 0);
    }

    #[test]
    fn test_linear_canvas_layout() {
        let canvas = Canvas::for_linear(&[true, false, true], 2, 10);
        assert_eq!(canvas.width(), 6 + 44);
        assert_eq!(canvas.height(), 10 + 44);
        let bytes = canvas.as_bytes();
        let row = 22 * canvas.width();
        assert_eq!(bytes[row + 22], 0);
        assert_eq!(bytes[row + 24], 255);
        assert_eq!(bytes[row + 26], 0);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(2, 2, 10, 10, 7);
        assert_eq!(canvas.as_bytes().iter().filter(|&&p| p == 7).count(), 4);
    }
}
