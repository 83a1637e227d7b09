//! Run metrics collection for the simulation.
//!
//! Provides structured logging and counters for monitoring how a run
//! evolves and how fast the step pipeline is.

use c4life_data::GridStatistics;
use std::time::{Duration, Instant};

/// Counters for one simulation run.
#[derive(Debug, Clone)]
pub struct RunMetrics {
    steps: u64,
    step_time: Duration,
    peak_population: usize,
    peak_entities: usize,
    log_interval: u64,
    start_time: Instant,
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RunMetrics {
    /// Creates a collector that logs every `log_interval` steps (0 = never).
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            steps: 0,
            step_time: Duration::ZERO,
            peak_population: 0,
            peak_entities: 0,
            log_interval,
            start_time: Instant::now(),
        }
    }

    /// Records a completed step with its duration and statistics.
    pub fn record_step(&mut self, duration: Duration, stats: &GridStatistics) {
        self.steps += 1;
        self.step_time += duration;
        self.peak_population = self.peak_population.max(stats.population);
        self.peak_entities = self.peak_entities.max(stats.entity_count);

        if self.log_interval > 0 && self.steps % self.log_interval == 0 {
            tracing::info!(
                step = stats.step,
                population = stats.population,
                activity = stats.activity,
                entities = stats.entity_count,
                identities = stats.total_entities_ever_seen,
                duration_us = duration.as_micros() as u64,
                "Simulation step"
            );
        }
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn peak_population(&self) -> usize {
        self.peak_population
    }

    #[must_use]
    pub fn peak_entities(&self) -> usize {
        self.peak_entities
    }

    /// Mean wall time spent inside `step`.
    #[must_use]
    pub fn mean_step_time(&self) -> Duration {
        if self.steps == 0 {
            Duration::ZERO
        } else {
            self.step_time / self.steps as u32
        }
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.log_interval);
    }
}

/// Initialize tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this more than
/// once is harmless.
pub fn init_logging(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}
