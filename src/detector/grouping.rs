//! Grouping finder patterns into matrix-code candidates.
//!
//! Three finders form a symbol when their module sizes agree, they meet at a
//! near-right angle and the finder spacing resolves to a valid dimension. The
//! module-to-image mapping is affine from the three centres and becomes
//! projective once the bottom-right alignment pattern is found.

use super::alignment::find_alignment;
use super::finder::FinderPattern;
use crate::models::{BitMatrix, CandidateRegion, MatrixRegion, Point, RegionShape, Version};
use crate::utils::geometry::{AffineFrame, PerspectiveTransform};

/// Finders considered for grouping, most-confirmed first
pub const MAX_FINDERS: usize = 16;
const MAX_SIZE_RATIO: f32 = 1.5;
/// Largest |cos| of the corner angle still treated as square
const MAX_CORNER_COS: f32 = 0.4;
const MODULE_RATIO_RANGE: std::ops::RangeInclusive<f32> = 0.7..=1.3;

/// Three finders ordered as top-left, top-right, bottom-left
#[derive(Debug, Clone, Copy)]
struct OrderedFinders {
    tl: FinderPattern,
    tr: FinderPattern,
    bl: FinderPattern,
    corner_cos: f32,
}

/// Pick the right-angle corner as top-left and orient the other two by the
/// sign of the cross product (image y grows downwards).
fn order_finder_patterns(
    a: &FinderPattern,
    b: &FinderPattern,
    c: &FinderPattern,
) -> Option<OrderedFinders> {
    let patterns = [a, b, c];

    let mut best: Option<(usize, f32)> = None;
    for i in 0..3 {
        let p = patterns[i].center;
        let p1 = patterns[(i + 1) % 3].center;
        let p2 = patterns[(i + 2) % 3].center;
        let (v1x, v1y) = (p1.x - p.x, p1.y - p.y);
        let (v2x, v2y) = (p2.x - p.x, p2.y - p.y);
        let denom = (v1x * v1x + v1y * v1y).sqrt() * (v2x * v2x + v2y * v2y).sqrt();
        if denom == 0.0 {
            continue;
        }
        let cos = ((v1x * v2x + v1y * v2y) / denom).abs();
        if best.is_none_or(|(_, c)| cos < c) {
            best = Some((i, cos));
        }
    }
    let (idx, corner_cos) = best?;
    if corner_cos >= MAX_CORNER_COS {
        return None;
    }

    let tl = *patterns[idx];
    let p1 = *patterns[(idx + 1) % 3];
    let p2 = *patterns[(idx + 2) % 3];
    let cross = tl.center.cross(&p1.center, &p2.center);
    let (tr, bl) = if cross > 0.0 { (p1, p2) } else { (p2, p1) };
    Some(OrderedFinders { tl, tr, bl, corner_cos })
}

/// Dimension `17 + 4v` closest to a finder-centre spacing
fn estimate_dimension(distance: f32, module_size: f32) -> Option<usize> {
    if module_size <= 0.0 {
        return None;
    }
    let raw = distance / module_size + 7.0;
    let version = ((raw - 17.0) / 4.0).round();
    if !(1.0..=40.0).contains(&version) {
        return None;
    }
    Some(17 + 4 * version as usize)
}

/// Try to turn three finders into a matrix candidate
pub fn build_candidate(mask: &BitMatrix, finders: [&FinderPattern; 3]) -> Option<CandidateRegion> {
    let sizes = finders.map(|f| f.module_size);
    let min_size = sizes.iter().fold(f32::INFINITY, |a, &b| a.min(b));
    let max_size = sizes.iter().fold(0.0f32, |a, &b| a.max(b));
    if min_size <= 0.0 || max_size / min_size > MAX_SIZE_RATIO {
        return None;
    }

    let ordered = order_finder_patterns(finders[0], finders[1], finders[2])?;
    let OrderedFinders { tl, tr, bl, .. } = ordered;
    let avg_module = (tl.module_size + tr.module_size + bl.module_size) / 3.0;
    let d_tr = tl.center.distance(&tr.center);
    let d_bl = tl.center.distance(&bl.center);

    let dim_tr = estimate_dimension(d_tr, avg_module)?;
    let dim_bl = estimate_dimension(d_bl, avg_module)?;
    let dimension = if dim_tr == dim_bl {
        dim_tr
    } else if dim_tr.abs_diff(dim_bl) <= 4 {
        estimate_dimension((d_tr + d_bl) / 2.0, avg_module)?
    } else {
        return None;
    };

    let module_size = (d_tr + d_bl) / 2.0 / (dimension as f32 - 7.0);
    if !MODULE_RATIO_RANGE.contains(&(module_size / avg_module)) {
        return None;
    }

    let span = dimension as f32 - 7.0;
    let u = Point::new((tr.center.x - tl.center.x) / span, (tr.center.y - tl.center.y) / span);
    let v = Point::new((bl.center.x - tl.center.x) / span, (bl.center.y - tl.center.y) / span);
    let frame = AffineFrame {
        origin: Point::new(
            tl.center.x - 3.5 * (u.x + v.x),
            tl.center.y - 3.5 * (u.y + v.y),
        ),
        u,
        v,
    };
    let d = dimension as f32;
    let affine_corners = [
        frame.map(0.0, 0.0),
        frame.map(d, 0.0),
        frame.map(d, d),
        frame.map(0.0, d),
    ];

    let version = Version::from_dimension(dimension)?;
    let corners = if version.number() >= 2 {
        find_alignment(mask, &frame, d - 6.5)
            .and_then(|alignment| projective_corners(&ordered, alignment, d))
            .unwrap_or(affine_corners)
    } else {
        affine_corners
    };
    if corners.iter().any(|c| !c.is_finite()) {
        return None;
    }

    let size_agreement = min_size / max_size;
    let quality = (1.0 - ordered.corner_cos) * size_agreement;
    let min_hits = tl.hits.min(tr.hits).min(bl.hits);
    let confidence = quality * (1.0 - 1.0 / (1.0 + min_hits as f32));

    log::trace!(
        "matrix candidate dim {dimension} module {module_size:.2} confidence {confidence:.3}"
    );
    Some(CandidateRegion {
        shape: RegionShape::Matrix(MatrixRegion {
            corners,
            dimension,
            module_size,
        }),
        confidence,
    })
}

/// Symbol corners through the four-point mapping of finder and alignment centres
fn projective_corners(finders: &OrderedFinders, alignment: Point, d: f32) -> Option<[Point; 4]> {
    let modules = [
        Point::new(3.5, 3.5),
        Point::new(d - 3.5, 3.5),
        Point::new(d - 6.5, d - 6.5),
        Point::new(3.5, d - 3.5),
    ];
    let image = [finders.tl.center, finders.tr.center, alignment, finders.bl.center];
    let transform = PerspectiveTransform::from_points(&modules, &image)?;
    Some([
        transform.transform(&Point::new(0.0, 0.0))?,
        transform.transform(&Point::new(d, 0.0))?,
        transform.transform(&Point::new(d, d))?,
        transform.transform(&Point::new(0.0, d))?,
    ])
}

/// Every valid triple among the strongest finders
pub fn group_finders(mask: &BitMatrix, finders: &[FinderPattern]) -> Vec<CandidateRegion> {
    let finders = &finders[..finders.len().min(MAX_FINDERS)];
    let mut candidates = Vec::new();
    for i in 0..finders.len() {
        for j in i + 1..finders.len() {
            for k in j + 1..finders.len() {
                let triple = [&finders[i], &finders[j], &finders[k]];
                if let Some(candidate) = build_candidate(mask, triple) {
                    candidates.push(candidate);
                }
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finder(x: f32, y: f32, module: f32, hits: usize) -> FinderPattern {
        FinderPattern {
            center: Point::new(x, y),
            module_size: module,
            hits,
        }
    }

    #[test]
    fn test_order_any_permutation() {
        let tl = finder(10.0, 10.0, 2.0, 5);
        let tr = finder(38.0, 10.0, 2.0, 5);
        let bl = finder(10.0, 38.0, 2.0, 5);
        for [a, b, c] in [[tl, tr, bl], [bl, tl, tr], [tr, bl, tl], [bl, tr, tl]] {
            let ordered = order_finder_patterns(&a, &b, &c).unwrap();
            assert_eq!(ordered.tl.center, tl.center);
            assert_eq!(ordered.tr.center, tr.center);
            assert_eq!(ordered.bl.center, bl.center);
        }
    }

    #[test]
    fn test_rejects_non_square_corner() {
        let a = finder(0.0, 0.0, 2.0, 5);
        let b = finder(40.0, 0.0, 2.0, 5);
        let c = finder(80.0, 5.0, 2.0, 5);
        assert!(order_finder_patterns(&a, &b, &c).is_none());
    }

    #[test]
    fn test_estimate_dimension() {
        // Version 1: centres 14 modules apart
        assert_eq!(estimate_dimension(28.0, 2.0), Some(21));
        assert_eq!(estimate_dimension(29.0, 2.0), Some(21));
        assert_eq!(estimate_dimension(18.0 * 3.0, 3.0), Some(25));
        assert_eq!(estimate_dimension(4.0, 2.0), None);
    }

    #[test]
    fn test_version1_candidate_corners() {
        let mask = BitMatrix::new(100, 100);
        // Module 2, symbol origin at (20, 20)
        let tl = finder(27.0, 27.0, 2.0, 6);
        let tr = finder(55.0, 27.0, 2.0, 6);
        let bl = finder(27.0, 55.0, 2.0, 6);
        let candidate = build_candidate(&mask, [&tr, &bl, &tl]).unwrap();
        let RegionShape::Matrix(region) = candidate.shape else {
            panic!("expected a matrix region");
        };
        assert_eq!(region.dimension, 21);
        assert!((region.module_size - 2.0).abs() < 1e-4);
        let expected = [(20.0, 20.0), (62.0, 20.0), (62.0, 62.0), (20.0, 62.0)];
        for (corner, (x, y)) in region.corners.iter().zip(expected) {
            assert!((corner.x - x).abs() < 1e-3 && (corner.y - y).abs() < 1e-3);
        }
        assert!(candidate.confidence > 0.8);
    }

    #[test]
    fn test_mismatched_sizes_rejected() {
        let mask = BitMatrix::new(100, 100);
        let tl = finder(27.0, 27.0, 2.0, 6);
        let tr = finder(55.0, 27.0, 3.5, 6);
        let bl = finder(27.0, 55.0, 2.0, 6);
        assert!(build_candidate(&mask, [&tl, &tr, &bl]).is_none());
    }
}
