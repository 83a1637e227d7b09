//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every section has defaults, so a file only needs
//! the keys it overrides.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//! 3. Command-line flags (override individual keys)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 96
//! height = 96
//! seed = 42
//! seeding = "patch"
//!
//! [rule]
//! density = 0.3
//! force_zero_off = true
//!
//! [engine]
//! kind = "auto"
//! ```

use crate::engine::EngineKind;
use crate::grid::SeedingStrategy;
use c4life_data::RULE_HEX_LEN;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grid dimensions and initial population.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    pub seed: Option<u64>,
    pub seeding: SeedingStrategy,
    /// Fill probability for uniform and patch seeding.
    pub density: f64,
    pub patch_size: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            seed: None,
            seeding: SeedingStrategy::Uniform,
            density: 0.3,
            patch_size: 16,
        }
    }
}

/// Rule selection and random generation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RuleConfig {
    /// Fixed rule; a random one is drawn when absent.
    pub hex: Option<String>,
    pub density: f64,
    /// Keep the all-dead neighbourhood dead to avoid whole-grid flicker.
    pub force_zero_off: bool,
    pub mutation_magnitude: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            hex: None,
            density: 0.35,
            force_zero_off: true,
            mutation_magnitude: 0.05,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub kind: EngineKind,
    /// Minimum cell count before `auto` goes parallel.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::Auto,
            parallel_threshold: 16_384,
        }
    }
}

/// Top-level blend of the interest score.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InterestWeights {
    pub entropy: f64,
    pub activity: f64,
    pub entity: f64,
    pub goldilocks: f64,
}

impl Default for InterestWeights {
    fn default() -> Self {
        Self {
            entropy: 0.35,
            activity: 0.2,
            entity: 0.3,
            goldilocks: 0.15,
        }
    }
}

/// Blend of the entity component of the interest score.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EntityWeights {
    pub stability: f64,
    pub volatility: f64,
    pub persistence: f64,
    pub diversity: f64,
}

impl Default for EntityWeights {
    fn default() -> Self {
        Self {
            stability: 0.35,
            volatility: 0.15,
            persistence: 0.3,
            diversity: 0.2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    /// Records averaged by the interest score.
    pub interest_window: usize,
    /// Records required before the interest score is non-zero.
    pub min_steps: usize,
    /// Steps between progress log lines; 0 disables them.
    pub log_interval: u64,
    /// Fraction of changing cells treated as full activity.
    pub activity_saturation: f64,
    pub weights: InterestWeights,
    pub entity_weights: EntityWeights,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            interest_window: 20,
            min_steps: 10,
            log_interval: 100,
            activity_saturation: 0.2,
            weights: InterestWeights::default(),
            entity_weights: EntityWeights::default(),
        }
    }
}

/// Random rule search parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub candidates: usize,
    pub steps_per_candidate: usize,
    /// Mutation rounds applied to the best candidate.
    pub refinements: usize,
    pub archive_path: String,
    /// Entries kept in the archive.
    pub archive_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            candidates: 32,
            steps_per_candidate: 200,
            refinements: 16,
            archive_path: "rules.json.gz".to_string(),
            archive_capacity: 100,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub rule: RuleConfig,
    pub engine: EngineConfig,
    pub stats: StatsConfig,
    pub search: SearchConfig,
}

fn unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

impl AppConfig {
    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        anyhow::ensure!(self.world.width > 0, "World width must be positive");
        anyhow::ensure!(self.world.height > 0, "World height must be positive");
        anyhow::ensure!(
            self.world.width <= 4096 && self.world.height <= 4096,
            "World dimensions too large (max 4096)"
        );
        anyhow::ensure!(
            unit_interval(self.world.density),
            "Seeding density must be in [0.0, 1.0]"
        );
        anyhow::ensure!(self.world.patch_size > 0, "Patch size must be positive");

        // Rule validation
        anyhow::ensure!(
            unit_interval(self.rule.density),
            "Rule density must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            unit_interval(self.rule.mutation_magnitude),
            "Mutation magnitude must be in [0.0, 1.0]"
        );
        if let Some(hex) = &self.rule.hex {
            anyhow::ensure!(
                hex.trim().len() == RULE_HEX_LEN,
                "Rule hex must be {} characters",
                RULE_HEX_LEN
            );
        }

        // Statistics validation
        anyhow::ensure!(self.stats.min_steps > 0, "Minimum steps must be positive");
        anyhow::ensure!(
            self.stats.interest_window >= self.stats.min_steps,
            "Interest window must cover at least min_steps records"
        );
        anyhow::ensure!(
            self.stats.activity_saturation > 0.0 && self.stats.activity_saturation <= 1.0,
            "Activity saturation must be in (0.0, 1.0]"
        );
        let w = &self.stats.weights;
        anyhow::ensure!(
            [w.entropy, w.activity, w.entity, w.goldilocks]
                .iter()
                .all(|&v| v >= 0.0),
            "Interest weights must be non-negative"
        );
        let e = &self.stats.entity_weights;
        anyhow::ensure!(
            [e.stability, e.volatility, e.persistence, e.diversity]
                .iter()
                .all(|&v| v >= 0.0),
            "Entity weights must be non-negative"
        );

        // Search validation
        anyhow::ensure!(self.search.candidates > 0, "Search needs at least one candidate");
        anyhow::ensure!(
            self.search.steps_per_candidate >= self.stats.min_steps,
            "Each candidate must run at least min_steps steps"
        );
        anyhow::ensure!(
            self.search.archive_capacity > 0,
            "Archive capacity must be positive"
        );

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Hash of every setting that influences simulation results.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.rule).as_bytes());
        hasher.update(format!("{:?}", self.stats).as_bytes());
        hex::encode(hasher.finalize())
    }
}
