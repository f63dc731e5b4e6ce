//! Candidate region location on binary masks
//!
//! This module contains all the logic for finding symbols in a mask:
//! - Finder pattern detection (the three square markers)
//! - Grouping finders into oriented matrix regions
//! - Alignment pattern refinement (versions 2+)
//! - Guard-pattern scanning for linear symbols
//! - Overlap suppression between candidates

/// Alignment pattern search for versions 2+
pub mod alignment;
/// Finder pattern detection using 1:1:3:1:1 ratio scanning
pub mod finder;
/// Finder triples to matrix regions
pub mod grouping;
/// EAN guard scanning
pub mod linear;
/// Overlap suppression
pub mod merge;

use crate::config::ScanConfig;
use crate::models::{BitMatrix, CandidateRegion, Symbology, SymbologySet};
use finder::FinderScanner;

/// Locates candidate regions for the enabled symbologies.
#[derive(Debug, Clone)]
pub struct FinderLocator {
    symbologies: SymbologySet,
    overlap_threshold: f32,
    guard_tolerance: f32,
}

impl FinderLocator {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            symbologies: config.symbologies,
            overlap_threshold: config.region_overlap_merge_threshold,
            guard_tolerance: config.linear_guard_tolerance,
        }
    }

    /// One pass over `mask`, yielding candidates by descending confidence.
    ///
    /// Both searches run before the first candidate is yielded: the ordering
    /// and overlap suppression span every region of both families. The
    /// returned iterator is single-pass and knows its remaining length.
    pub fn locate(&self, mask: &BitMatrix) -> Candidates {
        let mut regions = Vec::new();

        if self.symbologies.contains(Symbology::MatrixCode) {
            let finders = FinderScanner::scan(mask);
            let matrix = grouping::group_finders(mask, &finders);
            log::debug!("{} finder patterns, {} matrix candidates", finders.len(), matrix.len());
            regions.extend(matrix);
        }
        if self.symbologies.contains(Symbology::LinearCode) {
            let linear = linear::locate_linear(mask, self.guard_tolerance);
            log::debug!("{} linear candidates", linear.len());
            regions.extend(linear);
        }

        let regions = merge::suppress_overlaps(regions, self.overlap_threshold);
        Candidates {
            inner: regions.into_iter(),
        }
    }
}

/// Candidate regions of one `locate` call, strongest first.
///
/// Not `Clone`; call `locate` again for a second pass.
#[derive(Debug)]
pub struct Candidates {
    inner: std::vec::IntoIter<CandidateRegion>,
}

impl Iterator for Candidates {
    type Item = CandidateRegion;

    fn next(&mut self) -> Option<CandidateRegion> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Candidates {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{Canvas, MatrixEncoder, encode_ean13};
    use crate::models::RegionShape;
    use crate::utils::binarization::adaptive_binarize;

    #[test]
    fn test_blank_mask() {
        let locator = FinderLocator::new(&ScanConfig::default());
        assert_eq!(locator.locate(&BitMatrix::new(64, 64)).len(), 0);
    }

    #[test]
    fn test_rendered_matrix_symbol() {
        let symbol = MatrixEncoder::new().encode("LOCATE ME").unwrap();
        let frame = Canvas::for_matrix(&symbol.grid, 4).into_frame().unwrap();
        let mask = adaptive_binarize(&frame);

        let locator = FinderLocator::new(&ScanConfig::default());
        let candidates: Vec<_> = locator.locate(&mask).collect();
        assert_eq!(candidates.len(), 1);
        let RegionShape::Matrix(region) = &candidates[0].shape else {
            panic!("expected a matrix region");
        };
        assert_eq!(region.dimension, symbol.grid.width());
        assert!((region.module_size - 4.0).abs() < 0.1);
        // Symbol starts after a 4-module quiet zone
        assert!((region.corners[0].x - 16.0).abs() < 1.0);
        assert!((region.corners[0].y - 16.0).abs() < 1.0);
    }

    #[test]
    fn test_mixed_families_single_pass() {
        let symbol = MatrixEncoder::new().encode("BOTH").unwrap();
        let modules = encode_ean13("590123412345").unwrap();
        let mut canvas = Canvas::new(480, 240);
        canvas.draw_matrix(&symbol.grid, 30, 60, 4);
        canvas.draw_linear(&modules, 160, 80, 2, 60);
        let mask = adaptive_binarize(&canvas.into_frame().unwrap());

        let mut candidates = FinderLocator::new(&ScanConfig::default()).locate(&mask);
        let total = candidates.len();
        assert!(total >= 2);
        let mut seen = Vec::new();
        while let Some(region) = candidates.next() {
            seen.push(region);
            assert_eq!(candidates.len(), total - seen.len());
        }
        assert!(seen.iter().any(|r| r.symbology() == Symbology::MatrixCode));
        assert!(seen.iter().any(|r| r.symbology() == Symbology::LinearCode));
        assert!(seen.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert!(candidates.next().is_none());
    }

    #[test]
    fn test_symbology_filter() {
        let symbol = MatrixEncoder::new().encode("LOCATE ME").unwrap();
        let frame = Canvas::for_matrix(&symbol.grid, 4).into_frame().unwrap();
        let mask = adaptive_binarize(&frame);

        let config = ScanConfig {
            symbologies: SymbologySet::only(Symbology::LinearCode),
            ..ScanConfig::default()
        };
        assert_eq!(FinderLocator::new(&config).locate(&mask).len(), 0);
    }
}
