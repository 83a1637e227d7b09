use anyhow::{Context, Result};
use c4life_core::config::AppConfig;
use c4life_core::grid::Seed;
use c4life_core::{OrbitIndex, RuleLogic, Simulation};
use c4life_data::{GridStatistics, TrackerStats};
use serde::Serialize;

/// Summary of one finished run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub rule: String,
    pub lambda: f64,
    pub engine: String,
    pub seed: u64,
    pub steps: usize,
    pub interest_score: f64,
    pub final_stats: Option<GridStatistics>,
    pub tracker: TrackerStats,
    pub peak_population: usize,
    pub peak_entities: usize,
    pub mean_step_micros: u64,
}

/// Runs the configured world for `steps` generations.
///
/// `on_step` sees the simulation after every generation.
pub fn run_simulation<F>(
    config: &AppConfig,
    index: &OrbitIndex,
    steps: usize,
    seed: Seed,
    mut on_step: F,
) -> Result<RunReport>
where
    F: FnMut(&Simulation),
{
    let (mut sim, _) =
        Simulation::from_config(config, index, seed).context("building simulation")?;

    for _ in 0..steps {
        sim.step().context("advancing simulation")?;
        on_step(&sim);
    }

    let metrics = sim.metrics();
    Ok(RunReport {
        rule: sim.rule().to_hex(),
        lambda: sim.rule().lambda(index),
        engine: sim.engine_name().to_string(),
        seed: seed.0,
        steps,
        interest_score: sim.interest_score(),
        final_stats: sim.latest().copied(),
        tracker: sim.tracker().stats(),
        peak_population: metrics.peak_population(),
        peak_entities: metrics.peak_entities(),
        mean_step_micros: metrics.mean_step_time().as_micros() as u64,
    })
}
