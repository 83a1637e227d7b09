//! Per-step statistics and the interest heuristic.

use crate::config::StatsConfig;
use crate::error::{CoreError, Result};
use crate::grid::Grid;
use c4life_data::{GridStatistics, TrackerStats};
use std::collections::HashMap;

/// Block sizes sampled for multi-scale entropy.
pub const ENTROPY_SCALES: [usize; 3] = [2, 4, 8];

const ENTROPY_WEIGHTS: [f64; 3] = [0.25, 0.5, 0.25];
const DIVERSITY_CAP: usize = 5;
const DIE_OUT_FLOOR: f64 = 0.01;
const DIE_OUT_FULL: f64 = 0.05;
const EXPANSION_START: f64 = 0.8;
const EXPANSION_CEILING: f64 = 0.95;
const GOLDILOCKS: (f64, f64) = (0.1, 0.7);

fn window_count(extent: usize, block: usize) -> usize {
    if extent < block {
        0
    } else {
        (extent - block) / (block / 2).max(1) + 1
    }
}

/// Number of `block`×`block` samples taken from a grid.
pub fn block_samples(width: usize, height: usize, block: usize) -> usize {
    window_count(width, block) * window_count(height, block)
}

/// Shannon entropy, in bits, of the `block`×`block` patterns seen through a
/// window sliding with stride `block / 2`. Zero when no window fits.
pub fn block_entropy(grid: &Grid, block: usize) -> f64 {
    let (w, h) = (grid.width(), grid.height());
    if block == 0 || block > 8 || w < block || h < block {
        return 0.0;
    }
    let stride = (block / 2).max(1);

    let mut counts: HashMap<u64, usize> = HashMap::new();
    let mut total = 0usize;
    for y0 in (0..=h - block).step_by(stride) {
        for x0 in (0..=w - block).step_by(stride) {
            let mut symbol = 0u64;
            for dy in 0..block {
                for dx in 0..block {
                    symbol = (symbol << 1) | grid.get(x0 + dx, y0 + dy) as u64;
                }
            }
            *counts.entry(symbol).or_insert(0) += 1;
            total += 1;
        }
    }

    let total = total as f64;
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Largest entropy a grid of this size can reach at one scale: bounded both
/// by the block's bit count and by the number of samples.
pub fn max_block_entropy(width: usize, height: usize, block: usize) -> f64 {
    let samples = block_samples(width, height, block);
    if samples == 0 {
        return 0.0;
    }
    ((block * block) as f64).min((samples as f64).log2())
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Multiplier that ramps 0 → 1 as the population leaves extinction.
pub fn die_out_penalty(population_ratio: f64) -> f64 {
    if population_ratio < DIE_OUT_FLOOR {
        0.0
    } else {
        (population_ratio / DIE_OUT_FULL).min(1.0)
    }
}

/// Multiplier that ramps 1 → 0 as the population approaches saturation.
pub fn expansion_penalty(population_ratio: f64) -> f64 {
    if population_ratio > EXPANSION_CEILING {
        0.0
    } else if population_ratio <= EXPANSION_START {
        1.0
    } else {
        (EXPANSION_CEILING - population_ratio) / (EXPANSION_CEILING - EXPANSION_START)
    }
}

/// Owns the statistics history of one simulation.
#[derive(Debug, Clone)]
pub struct StatisticsAggregator {
    width: usize,
    height: usize,
    config: StatsConfig,
    previous: Option<Vec<bool>>,
    history: Vec<GridStatistics>,
    max_entropy: [f64; 3],
}

impl StatisticsAggregator {
    pub fn new(width: usize, height: usize, config: StatsConfig) -> Self {
        let max_entropy = ENTROPY_SCALES.map(|b| max_block_entropy(width, height, b));
        Self {
            width,
            height,
            config,
            previous: None,
            history: Vec::new(),
            max_entropy,
        }
    }

    /// Appends the record for the current grid.
    ///
    /// The first record is the baseline: it has no predecessor, so its
    /// activity and deltas are 0, and it never enters the interest score.
    pub fn record(
        &mut self,
        grid: &Grid,
        entity_count: usize,
        tracker: TrackerStats,
    ) -> Result<GridStatistics> {
        if (grid.width(), grid.height()) != (self.width, self.height) {
            return Err(CoreError::dimension_mismatch(
                (self.width, self.height),
                (grid.width(), grid.height()),
            ));
        }

        let population = grid.population();
        let activity = self.previous.as_ref().map_or(0, |prev| {
            prev.iter()
                .zip(grid.cells())
                .filter(|(a, b)| a != b)
                .count()
        });
        let last = self.history.last();
        let population_change = last.map_or(0, |l| population as i64 - l.population as i64);
        let entity_change = last.map_or(0, |l| entity_count as i64 - l.entity_count as i64);

        let stats = GridStatistics {
            step: self.history.len() as u64,
            population,
            activity,
            population_change,
            entropy2x2: block_entropy(grid, 2),
            entropy4x4: block_entropy(grid, 4),
            entropy8x8: block_entropy(grid, 8),
            entity_count,
            entity_change,
            total_entities_ever_seen: tracker.total_entities,
            unique_patterns: tracker.unique_patterns,
            entities_alive: tracker.entities_alive,
            entities_died: tracker.entities_died,
        };

        match &mut self.previous {
            Some(prev) => prev.copy_from_slice(grid.cells()),
            None => self.previous = Some(grid.cells().to_vec()),
        }
        self.history.push(stats);
        Ok(stats)
    }

    pub fn history(&self) -> &[GridStatistics] {
        &self.history
    }

    pub fn latest(&self) -> Option<&GridStatistics> {
        self.history.last()
    }

    /// Records after the baseline, one per simulated step.
    fn scored(&self) -> &[GridStatistics] {
        self.history.get(1..).unwrap_or(&[])
    }

    fn cell_count(&self) -> f64 {
        (self.width * self.height).max(1) as f64
    }

    /// Heuristic in [0, 1] rewarding runs that neither die out, saturate,
    /// nor freeze. Zero until `min_steps` steps follow the baseline.
    pub fn interest_score(&self) -> f64 {
        let scored = self.scored();
        if scored.is_empty() || scored.len() < self.config.min_steps {
            return 0.0;
        }
        let start = scored
            .len()
            .saturating_sub(self.config.interest_window.max(1));
        let window = &scored[start..];
        let cells = self.cell_count();
        let weights = &self.config.weights;

        let entropy = mean(window.iter().map(|s| {
            let values = [s.entropy2x2, s.entropy4x4, s.entropy8x8];
            values
                .iter()
                .zip(self.max_entropy.iter())
                .zip(ENTROPY_WEIGHTS.iter())
                .map(|((&e, &max), &w)| if max > 0.0 { w * e / max } else { 0.0 })
                .sum::<f64>()
        }));

        let activity_ratio = mean(window.iter().map(|s| s.activity as f64 / cells));
        let activity =
            (activity_ratio / self.config.activity_saturation.max(f64::EPSILON)).clamp(0.0, 1.0);

        let entity = self.entity_score(window);

        let population_ratio = mean(window.iter().map(|s| s.population as f64 / cells));
        let goldilocks = if population_ratio > GOLDILOCKS.0 && population_ratio < GOLDILOCKS.1 {
            1.0
        } else {
            0.0
        };

        let raw = weights.entropy * entropy
            + weights.activity * activity
            + weights.entity * entity
            + weights.goldilocks * goldilocks;
        let score =
            raw * die_out_penalty(population_ratio) * expansion_penalty(population_ratio);
        score.clamp(0.0, 1.0)
    }

    fn entity_score(&self, window: &[GridStatistics]) -> f64 {
        let Some(latest) = window.last() else {
            return 0.0;
        };
        let counts: Vec<f64> = window.iter().map(|s| s.entity_count as f64).collect();
        let mean_count = mean(counts.iter().copied());

        let stability = if mean_count > 0.0 {
            let variance = mean(counts.iter().map(|c| (c - mean_count).powi(2)));
            1.0 - (variance.sqrt() / mean_count).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let volatility = (mean(window.iter().map(|s| s.entity_change.unsigned_abs() as f64))
            / mean_count.max(1.0))
        .clamp(0.0, 1.0);
        let persistence = if latest.total_entities_ever_seen > 0 {
            1.0 - latest.entities_died as f64 / latest.total_entities_ever_seen as f64
        } else {
            0.0
        };
        let diversity = latest.unique_patterns.min(DIVERSITY_CAP) as f64 / DIVERSITY_CAP as f64;

        let w = &self.config.entity_weights;
        (w.stability * stability
            + w.volatility * volatility
            + w.persistence * persistence.clamp(0.0, 1.0)
            + w.diversity * diversity)
            .clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.previous = None;
        self.history.clear();
    }
}
