/// Alignment pattern search near the bottom-right corner for versions 2+
use crate::models::{BitMatrix, Point};
use crate::utils::geometry::AffineFrame;

/// Search radius around the estimate, in modules
const SEARCH_RADIUS: f32 = 4.0;
const SEARCH_STEP: f32 = 0.5;
/// Template cells that must agree out of 25
const MIN_SCORE: usize = 23;

/// Cell of the 5x5 alignment template at offset (dx, dy) from the centre module
fn template(dx: isize, dy: isize) -> bool {
    dx.abs().max(dy.abs()) != 1
}

/// Template agreement when the alignment centre module sits at frame coords (a, b)
fn score_at(mask: &BitMatrix, frame: &AffineFrame, a: f32, b: f32) -> usize {
    let mut score = 0;
    for dy in -2isize..=2 {
        for dx in -2isize..=2 {
            let p = frame.map(a + dx as f32, b + dy as f32);
            let dark = mask.get_signed(p.x.floor() as isize, p.y.floor() as isize);
            if dark == template(dx, dy) {
                score += 1;
            }
        }
    }
    score
}

/// Find the alignment pattern whose centre is expected at frame coords
/// `(expected, expected)`; returns the image point of its centre.
///
/// Every offset reaching the best score is averaged, so a pattern matched over
/// a window of positions resolves to the window's middle.
pub fn find_alignment(mask: &BitMatrix, frame: &AffineFrame, expected: f32) -> Option<Point> {
    let steps = (SEARCH_RADIUS / SEARCH_STEP) as isize;
    let mut best_score = MIN_SCORE;
    let mut matches: Vec<(f32, f32)> = Vec::new();

    for oy in -steps..=steps {
        for ox in -steps..=steps {
            let (da, db) = (ox as f32 * SEARCH_STEP, oy as f32 * SEARCH_STEP);
            let score = score_at(mask, frame, expected + da, expected + db);
            if score > best_score {
                best_score = score;
                matches.clear();
            }
            if score == best_score {
                matches.push((da, db));
            }
        }
    }

    if matches.is_empty() {
        return None;
    }
    let n = matches.len() as f32;
    // Floor sampling shifts the matching window down by half a step
    let da = matches.iter().map(|m| m.0).sum::<f32>() / n + SEARCH_STEP / 2.0;
    let db = matches.iter().map(|m| m.1).sum::<f32>() / n + SEARCH_STEP / 2.0;
    log::trace!("alignment pattern at offset ({da}, {db}) score {best_score}");
    Some(frame.map(expected + da, expected + db))
}
