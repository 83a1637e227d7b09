use serde::{Deserialize, Serialize};

/// Per-step measurements of a running simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStatistics {
    pub step: u64,
    pub population: usize,
    /// Cells whose state differs from the previous step.
    pub activity: usize,
    pub population_change: i64,
    pub entropy2x2: f64,
    pub entropy4x4: f64,
    pub entropy8x8: f64,
    pub entity_count: usize,
    pub entity_change: i64,
    pub total_entities_ever_seen: usize,
    pub unique_patterns: usize,
    pub entities_alive: usize,
    pub entities_died: usize,
}
