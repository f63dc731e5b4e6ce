/// Packed one-bit-per-cell matrix.
///
/// Used both as the binarized frame mask (one cell per pixel, `true` = foreground)
/// and as a sampled module grid (one cell per module, `true` = dark).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create a new all-background matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height).div_ceil(8)],
        }
    }

    /// Create a square matrix from a row-major predicate
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut matrix = Self::new(size, size);
        for y in 0..size {
            for x in 0..size {
                if f(x, y) {
                    matrix.set(x, y, true);
                }
            }
        }
        matrix
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y); out-of-range reads are background
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Signed-coordinate read used by the cross-check scanners
    #[inline]
    pub fn get_signed(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && self.get(x as usize, y as usize)
    }

    /// Set bit at (x, y); out-of-range writes are ignored
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        if value {
            self.data[index / 8] |= 1 << (index % 8);
        } else {
            self.data[index / 8] &= !(1 << (index % 8));
        }
    }

    /// Toggle bit at (x, y)
    #[inline]
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        self.data[index / 8] ^= 1 << (index % 8);
    }

    /// Clear all bits to 0
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Swap rows and columns
    pub fn transposed(&self) -> BitMatrix {
        let mut out = BitMatrix::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    out.set(y, x, true);
                }
            }
        }
        out
    }

    /// Rotate a square matrix 90 degrees clockwise
    pub fn rotated90(&self) -> BitMatrix {
        let n = self.width;
        let mut out = BitMatrix::new(self.height, n);
        for y in 0..self.height {
            for x in 0..n {
                if self.get(x, y) {
                    out.set(self.height - 1 - y, x, true);
                }
            }
        }
        out
    }

    /// Get raw data as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_matrix() {
        let mut matrix = BitMatrix::new(8, 8);
        assert_eq!(matrix.width(), 8);
        assert_eq!(matrix.height(), 8);

        matrix.set(3, 4, true);
        assert!(matrix.get(3, 4));
        assert!(!matrix.get(3, 3));
        assert_eq!(matrix.count_ones(), 1);

        matrix.toggle(3, 4);
        assert!(!matrix.get(3, 4));

        matrix.set(1, 1, true);
        matrix.clear();
        assert_eq!(matrix.count_ones(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut matrix = BitMatrix::new(8, 8);
        matrix.set(10, 10, true);
        assert!(!matrix.get(10, 10));
        assert!(!matrix.get_signed(-1, 2));
    }

    #[test]
    fn test_transpose_and_rotate() {
        let mut matrix = BitMatrix::new(3, 2);
        matrix.set(2, 0, true);
        let t = matrix.transposed();
        assert_eq!((t.width(), t.height()), (2, 3));
        assert!(t.get(0, 2));

        let square = BitMatrix::from_fn(3, |x, y| x == 0 && y == 0);
        let r = square.rotated90();
        assert!(r.get(2, 0));
        assert_eq!(r.count_ones(), 1);
    }
}
