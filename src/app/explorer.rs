//! Random search over rule space.
//!
//! A batch of random rules is scored in parallel by the interest heuristic,
//! then the best one is refined by hill climbing: each round mutates the
//! current best and keeps the mutant only if it scores strictly higher on
//! the same starting grid.

use anyhow::{Context, Result};
use c4life_core::config::AppConfig;
use c4life_core::engine::EngineKind;
use c4life_core::grid::Seed;
use c4life_core::{OrbitIndex, RuleLogic, Simulation};
use c4life_data::OrbitRule;
use c4life_io::{ArchivedRule, RuleArchive};
use chrono::Utc;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// A rule with the score it reached from `seed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub rule: OrbitRule,
    pub seed: Seed,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Initial random candidates, best first.
    pub candidates: Vec<Candidate>,
    /// Best rule after refinement.
    pub best: Candidate,
    /// Refinement rounds that improved the best score.
    pub improvements: usize,
}

pub struct RuleExplorer<'a> {
    config: AppConfig,
    index: &'a OrbitIndex,
}

impl<'a> RuleExplorer<'a> {
    pub fn new(config: &AppConfig, index: &'a OrbitIndex) -> Self {
        let mut config = config.clone();
        // Candidates already run in parallel.
        config.engine.kind = EngineKind::Sequential;
        Self { config, index }
    }

    /// Interest score of `rule` after a fixed-length run from `seed`.
    pub fn evaluate(&self, rule: OrbitRule, seed: Seed) -> Result<f64> {
        let world = &self.config.world;
        let (grid, _) = world
            .seeding
            .seed(world.width, world.height, world.density, world.patch_size, seed);
        let mut sim = Simulation::new(&self.config, rule, self.index, grid)?;
        sim.run(self.config.search.steps_per_candidate)?;
        Ok(sim.interest_score())
    }

    fn random_candidates(&self, rng: &mut ChaCha8Rng) -> Vec<(OrbitRule, Seed)> {
        (0..self.config.search.candidates)
            .map(|_| {
                let rule = OrbitRule::random_by_density(
                    self.config.rule.density,
                    self.config.rule.force_zero_off,
                    self.index,
                    rng,
                );
                (rule, Seed(rng.gen()))
            })
            .collect()
    }

    /// Runs the full search. The same `seed` always yields the same outcome.
    pub fn search(&self, seed: Seed) -> Result<SearchOutcome> {
        let mut rng = seed.rng();
        let draws = self.random_candidates(&mut rng);

        let mut candidates = draws
            .into_par_iter()
            .map(|(rule, seed)| {
                let score = self
                    .evaluate(rule, seed)
                    .with_context(|| format!("scoring rule {}", rule))?;
                Ok(Candidate { rule, seed, score })
            })
            .collect::<Result<Vec<_>>>()?;
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        let Some(mut best) = candidates.first().copied() else {
            anyhow::bail!("search needs at least one candidate");
        };
        tracing::info!(
            candidates = candidates.len(),
            best = best.score,
            rule = %best.rule,
            "Random phase finished"
        );

        let mut improvements = 0;
        for round in 0..self.config.search.refinements {
            let mutant = best.rule.mutate(
                self.config.rule.mutation_magnitude,
                self.config.rule.force_zero_off,
                self.index,
                &mut rng,
            );
            let score = self.evaluate(mutant, best.seed)?;
            if score > best.score {
                tracing::info!(round, score, previous = best.score, "Refinement improved");
                best = Candidate {
                    rule: mutant,
                    seed: best.seed,
                    score,
                };
                improvements += 1;
            }
        }

        Ok(SearchOutcome {
            candidates,
            best,
            improvements,
        })
    }

    /// Stores the best rule and every initial candidate in `archive`.
    ///
    /// Returns how many entries the archive kept.
    pub fn archive(&self, outcome: &SearchOutcome, archive: &mut RuleArchive) -> usize {
        let fingerprint = self.config.fingerprint();
        let now = Utc::now();
        let mut kept = 0;
        for c in std::iter::once(&outcome.best).chain(outcome.candidates.iter()) {
            let entry = ArchivedRule {
                rule: c.rule,
                score: c.score,
                lambda: c.rule.lambda(self.index),
                steps: self.config.search.steps_per_candidate,
                width: self.config.world.width,
                height: self.config.world.height,
                seed: c.seed.0,
                config: fingerprint.clone(),
                discovered_at: now,
            };
            if archive.add(entry) {
                kept += 1;
            }
        }
        kept
    }
}
