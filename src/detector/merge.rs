use crate::models::CandidateRegion;

/// Sort by descending confidence and drop every region whose bounding box
/// overlaps an already kept one by more than `threshold`.
pub fn suppress_overlaps(
    mut regions: Vec<CandidateRegion>,
    threshold: f32,
) -> Vec<CandidateRegion> {
    regions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut kept: Vec<CandidateRegion> = Vec::with_capacity(regions.len());
    for region in regions {
        let bbox = region.bounding_box();
        if kept
            .iter()
            .all(|k| k.bounding_box().overlap_fraction(&bbox) <= threshold)
        {
            kept.push(region);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatrixRegion, Point, RegionShape};

    fn square(x: f32, y: f32, side: f32, confidence: f32) -> CandidateRegion {
        CandidateRegion {
            shape: RegionShape::Matrix(MatrixRegion {
                corners: [
                    Point::new(x, y),
                    Point::new(x + side, y),
                    Point::new(x + side, y + side),
                    Point::new(x, y + side),
                ],
                dimension: 21,
                module_size: side / 21.0,
            }),
            confidence,
        }
    }

    #[test]
    fn test_keeps_higher_confidence() {
        let regions = vec![
            square(0.0, 0.0, 100.0, 0.5),
            square(10.0, 10.0, 100.0, 0.9),
            square(300.0, 300.0, 50.0, 0.7),
        ];
        let kept = suppress_overlaps(regions, 0.5);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].confidence, 0.9);
        assert_eq!(kept[1].confidence, 0.7);
    }

    #[test]
    fn test_threshold_bounds() {
        // 50% overlap of the smaller box
        let regions = vec![square(0.0, 0.0, 100.0, 0.9), square(50.0, 0.0, 100.0, 0.8)];
        assert_eq!(suppress_overlaps(regions.clone(), 0.5).len(), 2);
        assert_eq!(suppress_overlaps(regions.clone(), 0.4).len(), 1);
        assert_eq!(suppress_overlaps(regions, 1.0).len(), 2);
    }
}
