//! End-to-end step pipeline.
//!
//! One [`Simulation`] owns every piece of mutable state for a run. Each call
//! to [`Simulation::step`] advances the grid, detects and canonicalizes the
//! isolated shapes, resolves their identities and appends a statistics
//! record, in that order, before returning.

use crate::canonical::normalize;
use crate::config::AppConfig;
use crate::detect::{Entity, EntityDetector};
use crate::engine::{select_engine, StepEngine};
use crate::error::{CoreError, Result};
use crate::grid::{Grid, Seed};
use crate::metrics::RunMetrics;
use crate::orbit::OrbitIndex;
use crate::rule::RuleLogic;
use crate::stats::StatisticsAggregator;
use crate::tracker::{EntityTracker, Observation};
use c4life_data::{CanonicalSignature, EntityId, FullRule, GridStatistics, OrbitRule};
use rand::Rng;
use std::time::Instant;

pub struct Simulation {
    grid: Grid,
    rule: OrbitRule,
    full_rule: FullRule,
    engine: Box<dyn StepEngine>,
    detector: EntityDetector,
    tracker: EntityTracker,
    stats: StatisticsAggregator,
    metrics: RunMetrics,
    entities: Vec<Entity>,
    last_observation: Observation,
}

impl Simulation {
    /// Builds a simulation around `grid` and records it as step 0.
    pub fn new(config: &AppConfig, rule: OrbitRule, index: &OrbitIndex, grid: Grid) -> Result<Self> {
        let (width, height) = (grid.width(), grid.height());
        let engine = select_engine(config.engine.kind, grid.len(), config.engine.parallel_threshold);
        let mut sim = Self {
            full_rule: rule.expand(index),
            rule,
            engine,
            detector: EntityDetector::new(width, height),
            tracker: EntityTracker::new(),
            stats: StatisticsAggregator::new(width, height, config.stats.clone()),
            metrics: RunMetrics::new(config.stats.log_interval),
            entities: Vec::new(),
            last_observation: Observation::default(),
            grid,
        };
        sim.observe()?;
        Ok(sim)
    }

    /// Seeds a grid and picks a rule as the configuration describes.
    ///
    /// The grid consumes `seed`; a random rule, when no hex is configured,
    /// consumes the seed that follows. Returns the next unused seed.
    pub fn from_config(config: &AppConfig, index: &OrbitIndex, seed: Seed) -> Result<(Self, Seed)> {
        let world = &config.world;
        let (grid, seed) =
            world
                .seeding
                .seed(world.width, world.height, world.density, world.patch_size, seed);

        let (rule, seed) = match &config.rule.hex {
            Some(hex) => (OrbitRule::parse(hex)?, seed),
            None => {
                let mut rng = seed.rng();
                let rule = OrbitRule::random_by_density(
                    config.rule.density,
                    config.rule.force_zero_off,
                    index,
                    &mut rng,
                );
                (rule, Seed(rng.gen()))
            }
        };

        tracing::info!(
            width = world.width,
            height = world.height,
            rule = %rule,
            "Simulation created"
        );
        Ok((Self::new(config, rule, index, grid)?, seed))
    }

    fn observe(&mut self) -> Result<GridStatistics> {
        self.entities = self.detector.detect(&self.grid)?;
        let signatures: Vec<CanonicalSignature> =
            self.entities.iter().map(|e| normalize(&e.cells)).collect();
        self.last_observation = self.tracker.observe(&signatures);
        self.stats
            .record(&self.grid, self.entities.len(), self.tracker.stats())
    }

    /// Advances one generation and returns its statistics record.
    pub fn step(&mut self) -> Result<GridStatistics> {
        let start = Instant::now();
        self.grid.step_with(self.engine.as_ref(), &self.full_rule);
        let stats = self.observe()?;
        self.metrics.record_step(start.elapsed(), &stats);
        Ok(stats)
    }

    pub fn run(&mut self, steps: usize) -> Result<()> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    pub fn interest_score(&self) -> f64 {
        self.stats.interest_score()
    }

    /// Links two shapes as phases of one creature.
    pub fn associate_patterns(&mut self, a: &CanonicalSignature, b: &CanonicalSignature) -> EntityId {
        self.tracker.associate_patterns(a, b)
    }

    /// Restarts from `grid` with the same rule, forgetting every identity.
    pub fn reset_with(&mut self, grid: Grid) -> Result<()> {
        let expected = self.detector.dimensions();
        if (grid.width(), grid.height()) != expected {
            return Err(CoreError::dimension_mismatch(
                expected,
                (grid.width(), grid.height()),
            ));
        }
        self.grid = grid;
        self.tracker.reset();
        self.stats.reset();
        self.metrics.reset();
        self.observe()?;
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rule(&self) -> &OrbitRule {
        &self.rule
    }

    pub fn full_rule(&self) -> &FullRule {
        &self.full_rule
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Entities found in the current generation.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Births, deaths and assignments of the current generation.
    pub fn last_observation(&self) -> &Observation {
        &self.last_observation
    }

    pub fn tracker(&self) -> &EntityTracker {
        &self.tracker
    }

    pub fn history(&self) -> &[GridStatistics] {
        self.stats.history()
    }

    pub fn latest(&self) -> Option<&GridStatistics> {
        self.stats.latest()
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }
}
