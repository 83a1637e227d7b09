//! Interchangeable step engines.
//!
//! Every output cell depends only on the rule and its 3×3 neighbourhood in
//! the previous generation, so the per-cell work can be split across threads
//! freely. All engines must produce bit-identical buffers for the same grid
//! and rule; `tests/engine_conformance.rs` checks every engine returned by
//! [`all_engines`] against [`SequentialEngine`].

use crate::grid::Grid;
use c4life_data::{FullRule, Pattern};
use serde::{Deserialize, Serialize};

/// Computes the next generation of a grid into `next`.
pub trait StepEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// `next` has exactly `grid.len()` cells; every one must be written.
    fn compute(&self, grid: &Grid, rule: &FullRule, next: &mut [bool]);
}

/// Which engine the factory should hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Decide from the grid size and the available worker threads.
    #[default]
    Auto,
    Sequential,
    Parallel,
}

/// Writes one output row.
#[inline]
fn compute_row(grid: &Grid, rule: &FullRule, y: usize, row: &mut [bool]) {
    let (w, h) = (grid.width(), grid.height());
    let cells = grid.cells();
    let above = &cells[((y + h - 1) % h) * w..][..w];
    let middle = &cells[y * w..][..w];
    let below = &cells[((y + 1) % h) * w..][..w];

    for (x, out) in row.iter_mut().enumerate() {
        let xl = (x + w - 1) % w;
        let xr = (x + 1) % w;
        let pattern = (above[xl] as Pattern)
            | (above[x] as Pattern) << 1
            | (above[xr] as Pattern) << 2
            | (middle[xl] as Pattern) << 3
            | (middle[x] as Pattern) << 4
            | (middle[xr] as Pattern) << 5
            | (below[xl] as Pattern) << 6
            | (below[x] as Pattern) << 7
            | (below[xr] as Pattern) << 8;
        *out = rule.apply(pattern);
    }
}

/// Single-threaded reference engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialEngine;

impl StepEngine for SequentialEngine {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn compute(&self, grid: &Grid, rule: &FullRule, next: &mut [bool]) {
        if grid.is_empty() {
            return;
        }
        for (y, row) in next.chunks_mut(grid.width()).enumerate() {
            compute_row(grid, rule, y, row);
        }
    }
}

/// Row-parallel engine backed by the rayon thread pool.
#[cfg(feature = "parallel")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelEngine;

#[cfg(feature = "parallel")]
impl StepEngine for ParallelEngine {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn compute(&self, grid: &Grid, rule: &FullRule, next: &mut [bool]) {
        use rayon::prelude::*;

        if grid.is_empty() {
            return;
        }
        next.par_chunks_mut(grid.width())
            .enumerate()
            .for_each(|(y, row)| compute_row(grid, rule, y, row));
    }
}

#[cfg(feature = "parallel")]
fn worker_threads() -> usize {
    rayon::current_num_threads()
}

#[cfg(not(feature = "parallel"))]
fn worker_threads() -> usize {
    1
}

#[cfg(feature = "parallel")]
fn parallel_engine() -> Option<Box<dyn StepEngine>> {
    Some(Box::new(ParallelEngine))
}

#[cfg(not(feature = "parallel"))]
fn parallel_engine() -> Option<Box<dyn StepEngine>> {
    None
}

/// Picks an engine for a grid of `cells` cells.
///
/// `Auto` chooses the parallel engine only when the grid reaches
/// `parallel_threshold` cells and more than one worker thread exists.
pub fn select_engine(
    kind: EngineKind,
    cells: usize,
    parallel_threshold: usize,
) -> Box<dyn StepEngine> {
    let parallel = match kind {
        EngineKind::Sequential => false,
        EngineKind::Parallel => true,
        EngineKind::Auto => cells >= parallel_threshold && worker_threads() > 1,
    };

    if parallel {
        if let Some(engine) = parallel_engine() {
            tracing::info!(engine = engine.name(), cells, "Selected step engine");
            return engine;
        }
        tracing::warn!(cells, "Parallel engine unavailable, falling back");
    }

    tracing::info!(engine = "sequential", cells, "Selected step engine");
    Box::new(SequentialEngine)
}

/// Every engine compiled into this build.
pub fn all_engines() -> Vec<Box<dyn StepEngine>> {
    let mut engines: Vec<Box<dyn StepEngine>> = vec![Box::new(SequentialEngine)];
    engines.extend(parallel_engine());
    engines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_from(f: impl Fn(Pattern) -> bool) -> FullRule {
        let mut table = [false; 512];
        for (p, out) in table.iter_mut().enumerate() {
            *out = f(p as Pattern);
        }
        FullRule::from_table(table)
    }

    #[test]
    fn test_row_matches_pattern_at() {
        let grid = Grid::parse(&["#..#.", ".##..", "....#", "#...."]).unwrap();
        // Output the pattern's parity so every bit position matters.
        let rule = rule_from(|p| p.count_ones() % 2 == 1 && p & 0b100_000_001 != 0);
        let mut next = vec![false; grid.len()];
        SequentialEngine.compute(&grid, &rule, &mut next);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                assert_eq!(
                    next[grid.index(x, y)],
                    rule.apply(grid.pattern_at(x, y)),
                    "cell ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_select_engine_respects_explicit_kind() {
        assert_eq!(
            select_engine(EngineKind::Sequential, 1 << 30, 1).name(),
            "sequential"
        );
        assert_eq!(select_engine(EngineKind::Auto, 16, 1 << 20).name(), "sequential");
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_select_engine_parallel() {
        assert_eq!(select_engine(EngineKind::Parallel, 4, 1 << 20).name(), "parallel");
    }

    #[test]
    fn test_empty_grid_is_a_no_op() {
        let grid = Grid::new(0, 0);
        for engine in all_engines() {
            let mut next = Vec::new();
            engine.compute(&grid, &rule_from(|_| true), &mut next);
            assert!(next.is_empty());
        }
    }
}
