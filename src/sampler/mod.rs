//! Rectification of located regions into module grids.
//!
//! Matrix regions go through a projective transform from the unit square to
//! their four corners; each module is read as a 3x3 majority vote around its
//! centre. Linear regions are read as one pixel row along the baseline and
//! turned into bar/space widths.

use crate::error::{Result, ScanError};
use crate::models::{
    BitMatrix, CandidateRegion, LinearRegion, MatrixRegion, ModuleGrid, Point, RegionShape, Version,
};
use crate::utils::geometry::{PerspectiveTransform, quad_area};

/// Smallest accepted symbol area, in square pixels
const MIN_AREA: f32 = 4.0;

pub struct PerspectiveSampler;

impl PerspectiveSampler {
    pub fn sample(mask: &BitMatrix, region: &CandidateRegion) -> Result<ModuleGrid> {
        match &region.shape {
            RegionShape::Matrix(matrix) => {
                Self::sample_matrix(mask, matrix).map(ModuleGrid::Matrix)
            }
            RegionShape::Linear(linear) => {
                Self::sample_linear(mask, linear).map(ModuleGrid::Linear)
            }
        }
    }

    fn sample_matrix(mask: &BitMatrix, region: &MatrixRegion) -> Result<BitMatrix> {
        let dimension = region.dimension;
        if Version::from_dimension(dimension).is_none() {
            return Err(ScanError::geometry(format!(
                "dimension {dimension} is outside versions 1-40"
            )));
        }
        if region.corners.iter().any(|c| !c.is_finite()) {
            return Err(ScanError::geometry("non-finite corner"));
        }
        if quad_area(&region.corners) < MIN_AREA {
            return Err(ScanError::geometry("corners are degenerate"));
        }
        let transform = PerspectiveTransform::from_unit_square(&region.corners)
            .ok_or_else(|| ScanError::geometry("corners admit no perspective transform"))?;

        let offset = (region.module_size / 4.0).round().max(0.0) as isize;
        let size = dimension as f32;
        let mut grid = BitMatrix::new(dimension, dimension);

        for y in 0..dimension {
            for x in 0..dimension {
                let unit = Point::new((x as f32 + 0.5) / size, (y as f32 + 0.5) / size);
                let p = transform
                    .transform(&unit)
                    .ok_or_else(|| ScanError::geometry("module centre maps to infinity"))?;
                let (px, py) = (p.x.floor() as isize, p.y.floor() as isize);

                let mut dark = 0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if mask.get_signed(px + dx * offset, py + dy * offset) {
                            dark += 1;
                        }
                    }
                }
                grid.set(x, y, dark >= 5);
            }
        }

        Ok(grid)
    }

    fn sample_linear(mask: &BitMatrix, region: &LinearRegion) -> Result<Vec<u32>> {
        if region.baseline_y >= mask.height() {
            return Err(ScanError::geometry("baseline outside the mask"));
        }
        let end_x = region.end_x.min(mask.width());
        if region.start_x >= end_x {
            return Err(ScanError::geometry("empty baseline segment"));
        }

        let mut widths: Vec<u32> = Vec::new();
        let mut current: Option<bool> = None;
        for x in region.start_x..end_x {
            let dark = mask.get(x, region.baseline_y);
            if current == Some(dark) {
                if let Some(last) = widths.last_mut() {
                    *last += 1;
                }
            } else if current.is_some() || dark {
                // Leading light pixels are skipped
                widths.push(1);
                current = Some(dark);
            }
        }

        if current == Some(false) {
            widths.pop();
        }
        if widths.is_empty() {
            return Err(ScanError::geometry("baseline holds no bars"));
        }
        Ok(widths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_region(corners: [Point; 4], dimension: usize, module_size: f32) -> CandidateRegion {
        CandidateRegion {
            shape: RegionShape::Matrix(MatrixRegion {
                corners,
                dimension,
                module_size,
            }),
            confidence: 1.0,
        }
    }

    #[test]
    fn test_axis_aligned_matrix() {
        // 21 modules at 3 px with a 6 px margin
        let source = BitMatrix::from_fn(21, |x, y| (x * 7 + y * 3) % 5 < 2);
        let mut mask = BitMatrix::new(75, 75);
        for y in 0..63 {
            for x in 0..63 {
                if source.get(x / 3, y / 3) {
                    mask.set(x + 6, y + 6, true);
                }
            }
        }
        let corners = [
            Point::new(6.0, 6.0),
            Point::new(69.0, 6.0),
            Point::new(69.0, 69.0),
            Point::new(6.0, 69.0),
        ];
        let grid = PerspectiveSampler::sample(&mask, &matrix_region(corners, 21, 3.0)).unwrap();
        assert_eq!(grid, ModuleGrid::Matrix(source));
    }

    #[test]
    fn test_degenerate_corners() {
        let mask = BitMatrix::new(50, 50);
        let collinear = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(30.0, 30.0),
        ];
        let err =
            PerspectiveSampler::sample(&mask, &matrix_region(collinear, 21, 1.0)).unwrap_err();
        assert!(matches!(err, ScanError::Geometry(_)));
    }

    #[test]
    fn test_invalid_dimension() {
        let mask = BitMatrix::new(50, 50);
        let square = [
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(40.0, 40.0),
            Point::new(0.0, 40.0),
        ];
        for dimension in [20, 22, 181] {
            let region = matrix_region(square, dimension, 1.0);
            let err = PerspectiveSampler::sample(&mask, &region).unwrap_err();
            assert!(matches!(err, ScanError::Geometry(_)));
        }
    }

    #[test]
    fn test_linear_strip() {
        let mut mask = BitMatrix::new(40, 5);
        for x in [10, 11, 14, 20, 21, 22] {
            mask.set(x, 2, true);
        }
        let region = CandidateRegion {
            shape: RegionShape::Linear(LinearRegion {
                start_x: 8,
                end_x: 30,
                baseline_y: 2,
                top_y: 1,
                height: 3,
                module_width: 1.0,
            }),
            confidence: 0.5,
        };
        let grid = PerspectiveSampler::sample(&mask, &region).unwrap();
        assert_eq!(grid, ModuleGrid::Linear(vec![2, 2, 1, 5, 3]));
    }

    #[test]
    fn test_linear_outside_mask() {
        let mask = BitMatrix::new(40, 5);
        let region = CandidateRegion {
            shape: RegionShape::Linear(LinearRegion {
                start_x: 0,
                end_x: 30,
                baseline_y: 9,
                top_y: 9,
                height: 1,
                module_width: 1.0,
            }),
            confidence: 0.5,
        };
        assert!(PerspectiveSampler::sample(&mask, &region).is_err());
    }
}
