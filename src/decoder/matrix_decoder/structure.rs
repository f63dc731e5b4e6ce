use crate::error::{Result, ScanError};
use crate::models::BitMatrix;

/// Fraction of finder modules allowed to disagree with the ideal pattern
const MAX_FINDER_MISMATCH: f32 = 0.2;
/// Fraction of timing modules allowed to disagree
const MAX_TIMING_MISMATCH: f32 = 0.25;

/// Expected value of a finder module at offset (dx, dy) inside its 7x7 square
fn finder_module(dx: usize, dy: usize) -> bool {
    let ring = dx.min(dy).min(6 - dx).min(6 - dy);
    ring != 1
}

/// Count finder mismatches over the three corner squares
pub(super) fn finder_mismatches(grid: &BitMatrix) -> usize {
    let size = grid.width();
    let origins = [(0, 0), (size - 7, 0), (0, size - 7)];
    origins
        .iter()
        .map(|&(ox, oy)| {
            (0..7)
                .flat_map(|dy| (0..7).map(move |dx| (dx, dy)))
                .filter(|&(dx, dy)| grid.get(ox + dx, oy + dy) != finder_module(dx, dy))
                .count()
        })
        .sum()
}

/// Count timing mismatches along row 6 and column 6 between the finders
pub(super) fn timing_mismatches(grid: &BitMatrix) -> (usize, usize) {
    let size = grid.width();
    let span = 8..size - 8;
    let len = span.len() * 2;
    let wrong = span
        .map(|i| {
            let expected = i % 2 == 0;
            (grid.get(i, 6) != expected) as usize + (grid.get(6, i) != expected) as usize
        })
        .sum();
    (wrong, len)
}

/// Reject grids whose finder and timing patterns do not look like a matrix code
pub(super) fn check_structure(grid: &BitMatrix) -> Result<()> {
    let finder_wrong = finder_mismatches(grid);
    if finder_wrong as f32 > 147.0 * MAX_FINDER_MISMATCH {
        return Err(ScanError::structure(format!(
            "{finder_wrong} of 147 finder modules disagree"
        )));
    }
    let (timing_wrong, timing_len) = timing_mismatches(grid);
    if timing_wrong as f32 > timing_len as f32 * MAX_TIMING_MISMATCH {
        return Err(ScanError::structure(format!(
            "{timing_wrong} of {timing_len} timing modules disagree"
        )));
    }
    Ok(())
}
