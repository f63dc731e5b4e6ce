//! Linear-code search: rows whose run lengths open and close with EAN guards.
//!
//! A row matches when a bar-space-bar start guard of equal widths follows a
//! quiet zone, the end guard sits 56 runs later, the span between them is close
//! to 95 modules and another quiet zone follows. Matching rows stacked on top of
//! each other become one region.

use crate::decoder::ean13::{MODULE_COUNT, RUN_COUNT};
use crate::models::{BitMatrix, CandidateRegion, LinearRegion, RegionShape};

/// Quiet zone required on both sides, in modules
const MIN_QUIET_ZONE: f32 = 5.0;

/// One run of equal pixels along a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    dark: bool,
    start: usize,
    len: usize,
}

/// Guard-bounded span found on one row
#[derive(Debug, Clone, Copy, PartialEq)]
struct RowHit {
    y: usize,
    start_x: usize,
    end_x: usize,
    module: f32,
}

fn row_runs(mask: &BitMatrix, y: usize) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for x in 0..mask.width() {
        let dark = mask.get(x, y);
        match runs.last_mut() {
            Some(run) if run.dark == dark => run.len += 1,
            _ => runs.push(Run { dark, start: x, len: 1 }),
        }
    }
    runs
}

/// Widths agree up to the relative tolerance plus half a pixel of quantisation
fn within(width: f32, module: f32, tolerance: f32) -> bool {
    (width - module).abs() <= tolerance * module + 0.5
}

fn guard_module(runs: &[Run], tolerance: f32) -> Option<f32> {
    let module = runs.iter().map(|r| r.len).sum::<usize>() as f32 / runs.len() as f32;
    runs.iter().all(|r| within(r.len as f32, module, tolerance)).then_some(module)
}

fn scan_row(mask: &BitMatrix, y: usize, tolerance: f32) -> Vec<RowHit> {
    let runs = row_runs(mask, y);
    let mut hits = Vec::new();
    let mut i = 1;
    while i + RUN_COUNT < runs.len() {
        let quiet = runs[i - 1];
        if !runs[i].dark {
            i += 1;
            continue;
        }
        let Some(module) = guard_module(&runs[i..i + 3], tolerance) else {
            i += 1;
            continue;
        };
        if (quiet.len as f32) < MIN_QUIET_ZONE * module {
            i += 2;
            continue;
        }

        let last = i + RUN_COUNT - 1;
        let start_x = runs[i].start;
        let end_x = runs[last].start + runs[last].len;
        let span_module = (end_x - start_x) as f32 / MODULE_COUNT as f32;
        let trailing = runs[last + 1];
        let matches = guard_module(&runs[last - 2..=last], tolerance)
            .is_some_and(|end_module| within(end_module, span_module, tolerance))
            && within(module, span_module, tolerance)
            && trailing.len as f32 >= MIN_QUIET_ZONE * span_module;

        if matches {
            hits.push(RowHit {
                y,
                start_x,
                end_x,
                module: span_module,
            });
            i = last + 1;
        } else {
            i += 2;
        }
    }
    hits
}

fn same_symbol(a: &RowHit, b: &RowHit) -> bool {
    let slack = 2.0 * a.module.max(b.module);
    b.y == a.y + 1
        && (a.start_x as f32 - b.start_x as f32).abs() <= slack
        && (a.end_x as f32 - b.end_x as f32).abs() <= slack
}

fn region_from_rows(rows: &[RowHit]) -> CandidateRegion {
    let middle = rows[rows.len() / 2];
    let top_y = rows[0].y;
    let height = rows.len();
    CandidateRegion {
        shape: RegionShape::Linear(LinearRegion {
            start_x: middle.start_x,
            end_x: middle.end_x,
            baseline_y: middle.y,
            top_y,
            height,
            module_width: middle.module,
        }),
        confidence: 1.0 - 1.0 / (1.0 + height as f32),
    }
}

/// Linear candidates with one region per stack of agreeing rows
pub fn locate_linear(mask: &BitMatrix, tolerance: f32) -> Vec<CandidateRegion> {
    // Open stacks: rows still growing downward
    let mut open: Vec<Vec<RowHit>> = Vec::new();
    let mut closed: Vec<Vec<RowHit>> = Vec::new();

    for y in 0..mask.height() {
        let hits = scan_row(mask, y, tolerance);
        let mut next_open = Vec::new();
        for stack in open.drain(..) {
            let Some(tail) = stack.last() else { continue };
            if hits.iter().any(|h| same_symbol(tail, h)) {
                next_open.push(stack);
            } else {
                closed.push(stack);
            }
        }
        for hit in hits {
            match next_open
                .iter_mut()
                .find(|stack| stack.last().is_some_and(|tail| same_symbol(tail, &hit)))
            {
                Some(stack) => stack.push(hit),
                None => next_open.push(vec![hit]),
            }
        }
        open = next_open;
    }
    closed.extend(open);

    log::trace!("linear search: {} row stacks", closed.len());
    closed.iter().map(|rows| region_from_rows(rows)).collect()
}
