/// Planar transforms used to rectify candidate regions
use crate::models::Point;

/// Projective transform (3x3 homography with `a33 = 1`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveTransform {
    a11: f64,
    a12: f64,
    a13: f64,
    a21: f64,
    a22: f64,
    a23: f64,
    a31: f64,
    a32: f64,
}

impl PerspectiveTransform {
    /// Create transform from 4 source points to 4 destination points
    pub fn from_points(src: &[Point; 4], dst: &[Point; 4]) -> Option<Self> {
        // Direct linear transform: two equations per correspondence
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (sx, sy) = (src[i].x as f64, src[i].y as f64);
            let (dx, dy) = (dst[i].x as f64, dst[i].y as f64);

            let row = i * 2;
            a[row] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
            b[row] = dx;
            a[row + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
            b[row + 1] = dy;
        }

        let s = solve_linear_system(&a, &b)?;
        let transform = Self {
            a11: s[0],
            a12: s[1],
            a13: s[2],
            a21: s[3],
            a22: s[4],
            a23: s[5],
            a31: s[6],
            a32: s[7],
        };
        s.iter().all(|v| v.is_finite()).then_some(transform)
    }

    /// Map the unit square (0,0),(1,0),(1,1),(0,1) onto a quadrilateral
    pub fn from_unit_square(corners: &[Point; 4]) -> Option<Self> {
        let unit = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        Self::from_points(&unit, corners)
    }

    /// Transform a point; `None` when it lands on the line at infinity
    pub fn transform(&self, p: &Point) -> Option<Point> {
        self.transform_f64(p.x as f64, p.y as f64)
            .map(|(x, y)| Point::new(x as f32, y as f32))
    }

    /// Full-precision variant of [`transform`](Self::transform)
    pub fn transform_f64(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let denominator = self.a31 * x + self.a32 * y + 1.0;
        if denominator.abs() < 1e-12 {
            return None;
        }
        let x_new = (self.a11 * x + self.a12 * y + self.a13) / denominator;
        let y_new = (self.a21 * x + self.a22 * y + self.a23) / denominator;
        Some((x_new, y_new))
    }
}

/// Affine frame spanned by an origin and two basis vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineFrame {
    /// Image position of the frame origin
    pub origin: Point,
    /// Image displacement of one unit along the first axis
    pub u: Point,
    /// Image displacement of one unit along the second axis
    pub v: Point,
}

impl AffineFrame {
    /// Map frame coordinates to image coordinates
    pub fn map(&self, a: f32, b: f32) -> Point {
        Point::new(
            self.origin.x + a * self.u.x + b * self.v.x,
            self.origin.y + a * self.u.y + b * self.v.y,
        )
    }
}

/// Solve 8x8 linear system using Gaussian elimination with partial pivoting
#[allow(clippy::needless_range_loop)]
fn solve_linear_system(a: &[[f64; 8]; 8], b: &[f64; 8]) -> Option<[f64; 8]> {
    let mut a = *a;
    let mut b = *b;
    let n = 8;

    for i in 0..n {
        let mut max_val = a[i][i].abs();
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > max_val {
                max_val = a[k][i].abs();
                max_row = k;
            }
        }

        if max_val < 1e-12 {
            return None;
        }

        if max_row != i {
            a.swap(i, max_row);
            b.swap(i, max_row);
        }

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Some(x)
}

/// Area of a quadrilateral given in order (shoelace formula)
pub fn quad_area(corners: &[Point; 4]) -> f32 {
    let mut twice = 0.0f32;
    for i in 0..4 {
        let p = corners[i];
        let q = corners[(i + 1) % 4];
        twice += p.x * q.y - q.x * p.y;
    }
    twice.abs() / 2.0
}
