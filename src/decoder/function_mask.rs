use crate::decoder::version::alignment_pattern_positions;
use crate::models::{BitMatrix, Version};

/// Function module mask for a specific version.
/// true = function module (not data), false = data module.
pub struct FunctionMask {
    mask: BitMatrix,
    version: Version,
}

impl FunctionMask {
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut mask = BitMatrix::new(size, size);

        // Finder patterns + separators (8x8 areas)
        Self::mark_area(&mut mask, 0, 0, 8, 8);
        Self::mark_area(&mut mask, size - 8, 0, 8, 8);
        Self::mark_area(&mut mask, 0, size - 8, 8, 8);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        for (cx, cy) in alignment_centers(version) {
            Self::mark_area(&mut mask, cx - 2, cy - 2, 5, 5);
        }

        // Format info areas
        for i in 0..9 {
            mask.set(8, i, true);
            mask.set(i, 8, true);
        }
        for i in 0..8 {
            mask.set(size - 1 - i, 8, true);
            mask.set(8, size - 1 - i, true);
        }

        // Version info (v7+): 3x6 above bottom-left finder, 6x3 left of top-right
        if version.number() >= 7 {
            Self::mark_area(&mut mask, size - 11, 0, 3, 6);
            Self::mark_area(&mut mask, 0, size - 11, 6, 3);
        }

        Self { mask, version }
    }

    pub fn size(&self) -> usize {
        self.mask.width()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    #[inline]
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    pub fn data_modules_count(&self) -> usize {
        self.size() * self.size() - self.mask.count_ones()
    }

    /// Data module coordinates in codeword bit order: two-column zigzag from the
    /// bottom-right corner, skipping the vertical timing column
    pub fn placement_order(&self) -> Vec<(usize, usize)> {
        let size = self.size();
        let mut order = Vec::with_capacity(self.data_modules_count());
        let mut right = size as isize - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward = ((right + 1) & 2) == 0;
            for vert in 0..size {
                let y = if upward { size - 1 - vert } else { vert };
                for j in 0..2 {
                    let x = (right - j) as usize;
                    if !self.is_function(x, y) {
                        order.push((x, y));
                    }
                }
            }
            right -= 2;
        }
        order
    }

    fn mark_area(mask: &mut BitMatrix, x: usize, y: usize, w: usize, h: usize) {
        for yy in y..y + h {
            for xx in x..x + w {
                mask.set(xx, yy, true);
            }
        }
    }
}

/// Alignment pattern centers `(x, y)`, skipping those that collide with finders
pub fn alignment_centers(version: Version) -> Vec<(usize, usize)> {
    let positions = alignment_pattern_positions(version);
    let n = positions.len();
    let mut centers = Vec::new();
    for (i, &cx) in positions.iter().enumerate() {
        for (j, &cy) in positions.iter().enumerate() {
            let corner = (i == 0 && j == 0) || (i == 0 && j == n - 1) || (i == n - 1 && j == 0);
            if !corner {
                centers.push((cx, cy));
            }
        }
    }
    centers
}
