/// Finder pattern detection using 1:1:3:1:1 run ratios along rows,
/// confirmed vertically and diagonally
use crate::models::{BitMatrix, Point};

/// Smallest pattern width in pixels (one pixel per module)
const MIN_PATTERN_WIDTH: usize = 7;
/// Allowed deviation per run, in modules, for row and column checks
const RUN_TOLERANCE: f32 = 0.5;
/// Diagonal runs are measured over pixel corners, so they get more slack
const DIAGONAL_TOLERANCE: f32 = 0.75;

/// A confirmed finder pattern centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPattern {
    pub center: Point,
    pub module_size: f32,
    /// Number of scan rows that confirmed this pattern
    pub hits: usize,
}

impl FinderPattern {
    pub fn new(x: f32, y: f32, module_size: f32) -> Self {
        Self {
            center: Point::new(x, y),
            module_size,
            hits: 1,
        }
    }

    fn about_equals(&self, other: &FinderPattern) -> bool {
        let tolerance = self.module_size.max(other.module_size);
        (self.center.x - other.center.x).abs() <= tolerance
            && (self.center.y - other.center.y).abs() <= tolerance
            && (self.module_size - other.module_size).abs() <= 0.5 * tolerance
    }

    fn absorb(&mut self, other: &FinderPattern) {
        let total = (self.hits + other.hits) as f32;
        let (a, b) = (self.hits as f32 / total, other.hits as f32 / total);
        self.center = Point::new(
            self.center.x * a + other.center.x * b,
            self.center.y * a + other.center.y * b,
        );
        self.module_size = self.module_size * a + other.module_size * b;
        self.hits += other.hits;
    }
}

pub struct FinderScanner;

impl FinderScanner {
    /// Every distinct finder pattern in the mask, most-confirmed first
    pub fn scan(mask: &BitMatrix) -> Vec<FinderPattern> {
        let mut candidates = Vec::new();
        for y in 0..mask.height() {
            Self::scan_row(mask, y, &mut candidates);
        }
        let mut merged = Self::merge_candidates(candidates);
        merged.sort_by(|a, b| b.hits.cmp(&a.hits));
        merged
    }

    fn scan_row(mask: &BitMatrix, y: usize, out: &mut Vec<FinderPattern>) {
        let width = mask.width();
        if width == 0 {
            return;
        }
        let mut run_lengths: Vec<usize> = Vec::new();
        let mut run_colors: Vec<bool> = Vec::new();
        let mut run_start = 0usize;
        let mut current_color = mask.get(0, y);

        for x in 1..=width {
            let color = x < width && mask.get(x, y);
            if x < width && color == current_color {
                continue;
            }
            run_lengths.push(x - run_start);
            run_colors.push(current_color);
            run_start = x;
            current_color = color;

            let n = run_colors.len();
            if n < 5 {
                continue;
            }
            let colors = &run_colors[n - 5..];
            if !(colors[0] && !colors[1] && colors[2] && !colors[3] && colors[4]) {
                continue;
            }
            let counts = [
                run_lengths[n - 5],
                run_lengths[n - 4],
                run_lengths[n - 3],
                run_lengths[n - 2],
                run_lengths[n - 1],
            ];
            if !ratio_matches(&counts, RUN_TOLERANCE) {
                continue;
            }
            let center_x = x as f32 - counts[4] as f32 - counts[3] as f32 - counts[2] as f32 / 2.0;
            if let Some(pattern) = Self::confirm(mask, center_x, y, counts.iter().sum()) {
                out.push(pattern);
            }
        }
    }

    /// Vertical check, horizontal re-check at the refined row, then a diagonal check
    fn confirm(
        mask: &BitMatrix,
        center_x: f32,
        y: usize,
        row_total: usize,
    ) -> Option<FinderPattern> {
        let cx = center_x.floor() as usize;
        let max_count = row_total;

        let (center_y, v_total) = cross_check(mask, cx, y, (0, 1), max_count, RUN_TOLERANCE)?;
        if 5 * v_total.abs_diff(row_total) >= 2 * row_total {
            return None;
        }
        let cy = center_y.floor() as usize;

        let (center_x, h_total) = cross_check(mask, cx, cy, (1, 0), max_count, RUN_TOLERANCE)?;
        if 5 * h_total.abs_diff(row_total) >= 2 * row_total {
            return None;
        }
        let cx = center_x.floor() as usize;

        let (_, d_total) =
            cross_check(mask, cx, cy, (1, 1), max_count * 2, DIAGONAL_TOLERANCE)?;

        // Each walk crosses the pattern at least 7 modules wide; the shortest
        // crossing is the one closest to a symbol axis. Diagonal steps are sqrt(2) long.
        let diagonal = d_total as f32 * std::f32::consts::SQRT_2;
        let module_size = (h_total as f32).min(v_total as f32).min(diagonal) / 7.0;
        Some(FinderPattern::new(center_x, center_y, module_size))
    }

    fn merge_candidates(candidates: Vec<FinderPattern>) -> Vec<FinderPattern> {
        let mut merged: Vec<FinderPattern> = Vec::new();
        for candidate in candidates {
            match merged.iter_mut().find(|existing| existing.about_equals(&candidate)) {
                Some(existing) => existing.absorb(&candidate),
                None => merged.push(candidate),
            }
        }
        merged
    }
}

/// Run widths compatible with 1:1:3:1:1 within `tolerance` modules
pub(crate) fn ratio_matches(counts: &[usize; 5], tolerance: f32) -> bool {
    let total: usize = counts.iter().sum();
    if total < MIN_PATTERN_WIDTH || counts.contains(&0) {
        return false;
    }
    let module = total as f32 / 7.0;
    let variance = module * tolerance;
    (counts[0] as f32 - module).abs() < variance
        && (counts[1] as f32 - module).abs() < variance
        && (counts[2] as f32 - 3.0 * module).abs() < 3.0 * variance
        && (counts[3] as f32 - module).abs() < variance
        && (counts[4] as f32 - module).abs() < variance
}

/// Walk both ways from `(x, y)` along `step`, collecting the five runs of a
/// pattern whose centre run contains the start pixel.
///
/// Returns the centre coordinate along the walked axis (continuous pixel
/// coordinates, x for horizontal and diagonal walks) and the total run length.
fn cross_check(
    mask: &BitMatrix,
    x: usize,
    y: usize,
    step: (isize, isize),
    max_count: usize,
    tolerance: f32,
) -> Option<(f32, usize)> {
    if !mask.get(x, y) {
        return None;
    }
    let (x, y) = (x as isize, y as isize);
    let at = |t: isize| mask.get_signed(x + step.0 * t, y + step.1 * t);
    let inside = |t: isize| {
        let (px, py) = (x + step.0 * t, y + step.1 * t);
        px >= 0 && py >= 0 && (px as usize) < mask.width() && (py as usize) < mask.height()
    };
    let limit = max_count as isize;

    // counts[2] includes the start pixel
    let mut counts = [0usize; 5];
    let mut t = 0isize;
    while inside(t) && at(t) {
        counts[2] += 1;
        t -= 1;
    }
    for (state, dark) in [(1usize, false), (0, true)] {
        while inside(t) && at(t) == dark && (counts[state] as isize) < limit {
            counts[state] += 1;
            t -= 1;
        }
        if counts[state] == 0 || counts[state] as isize >= limit {
            return None;
        }
    }

    let mut t = 1isize;
    while inside(t) && at(t) {
        counts[2] += 1;
        t += 1;
    }
    let center_end = t;
    for (state, dark) in [(3usize, false), (4, true)] {
        while inside(t) && at(t) == dark && (counts[state] as isize) < limit {
            counts[state] += 1;
            t += 1;
        }
        if counts[state] == 0 || counts[state] as isize >= limit {
            return None;
        }
    }

    if !ratio_matches(&counts, tolerance) {
        return None;
    }

    // Centre run covers [start + center_end - counts[2], start + center_end)
    let origin = if step.0 != 0 { x } else { y } as f32;
    let axis_step = if step.0 != 0 { step.0 } else { step.1 } as f32;
    let center = origin + axis_step * (center_end as f32 - counts[2] as f32 / 2.0);
    Some((center, counts.iter().sum()))
}
