use super::Point;
use super::result::Symbology;

/// Axis-aligned bounding box in pixel coordinates (max exclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left edge
    pub min_x: f32,
    /// Top edge
    pub min_y: f32,
    /// Right edge
    pub max_x: f32,
    /// Bottom edge
    pub max_y: f32,
}

impl BoundingBox {
    /// Smallest box containing every point
    pub fn enclosing(points: &[Point]) -> Self {
        let mut bbox = BoundingBox {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        };
        for p in points {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        bbox
    }

    /// Box area, zero when empty
    pub fn area(&self) -> f32 {
        (self.max_x - self.min_x).max(0.0) * (self.max_y - self.min_y).max(0.0)
    }

    /// Intersection area divided by the smaller of the two areas
    pub fn overlap_fraction(&self, other: &BoundingBox) -> f32 {
        let w = (self.max_x.min(other.max_x) - self.min_x.max(other.min_x)).max(0.0);
        let h = (self.max_y.min(other.max_y) - self.min_y.max(other.min_y)).max(0.0);
        let smaller = self.area().min(other.area());
        if smaller <= 0.0 {
            return 0.0;
        }
        (w * h / smaller).min(1.0)
    }
}

/// Located 2D symbol: four image corners of the module grid plus its dimension
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRegion {
    /// Symbol corners in order top-left, top-right, bottom-right, bottom-left
    pub corners: [Point; 4],
    /// Estimated modules per side
    pub dimension: usize,
    /// Estimated module pitch in pixels
    pub module_size: f32,
}

/// Located 1D symbol: a horizontal baseline segment with the height of agreeing rows
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegion {
    /// First pixel of the start guard
    pub start_x: usize,
    /// One past the last pixel of the end guard
    pub end_x: usize,
    /// Scanline used for sampling
    pub baseline_y: usize,
    /// Topmost agreeing row
    pub top_y: usize,
    /// Number of agreeing rows
    pub height: usize,
    /// Estimated module width in pixels
    pub module_width: f32,
}

/// Geometry of a candidate region
#[derive(Debug, Clone, PartialEq)]
pub enum RegionShape {
    /// Quadrilateral for the matrix family
    Matrix(MatrixRegion),
    /// Baseline segment for the linear family
    Linear(LinearRegion),
}

/// A candidate code location produced by the locator
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRegion {
    /// Region geometry
    pub shape: RegionShape,
    /// Locator confidence in [0, 1]
    pub confidence: f32,
}

impl CandidateRegion {
    /// Symbology this region was located for
    pub fn symbology(&self) -> Symbology {
        match self.shape {
            RegionShape::Matrix(_) => Symbology::MatrixCode,
            RegionShape::Linear(_) => Symbology::LinearCode,
        }
    }

    /// Bounding box used for overlap suppression
    pub fn bounding_box(&self) -> BoundingBox {
        match &self.shape {
            RegionShape::Matrix(m) => BoundingBox::enclosing(&m.corners),
            RegionShape::Linear(l) => BoundingBox {
                min_x: l.start_x as f32,
                min_y: l.top_y as f32,
                max_x: l.end_x as f32,
                max_y: (l.top_y + l.height.max(1)) as f32,
            },
        }
    }
}
