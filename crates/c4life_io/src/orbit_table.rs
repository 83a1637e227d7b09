//! The precomputed orbit-table file.
//!
//! ```json
//! {
//!   "summary": { "totalOrbits": 140, "totalPatterns": 512 },
//!   "orbits": [
//!     { "id": 0, "representative": 0, "size": 1, "stabilizer": "C4", "patterns": [0] },
//!     ...
//!   ]
//! }
//! ```
//!
//! Consumers usually load this file once at start-up instead of rebuilding
//! the table. Loading re-validates the partition before handing out an
//! [`OrbitIndex`].

use crate::error::{IoError, Result};
use crate::serialization::{read_json_file, write_json_file};
use c4life_core::OrbitIndex;
use c4life_data::{Orbit, ORBIT_COUNT, PATTERN_COUNT};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitTableSummary {
    pub total_orbits: usize,
    pub total_patterns: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitTableFile {
    pub summary: OrbitTableSummary,
    pub orbits: Vec<Orbit>,
}

impl OrbitTableFile {
    pub fn from_index(index: &OrbitIndex) -> Self {
        Self {
            summary: OrbitTableSummary {
                total_orbits: index.orbits().len(),
                total_patterns: index.total_patterns(),
            },
            orbits: index.orbits().to_vec(),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json_file(self, path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "Orbit table written");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_json_file(path.as_ref())
            .map_err(|e| e.with_context(format!("loading orbit table {:?}", path.as_ref())))
    }

    /// Checks the summary and rebuilds the pattern lookup.
    pub fn into_index(self) -> Result<OrbitIndex> {
        let expected = OrbitTableSummary {
            total_orbits: ORBIT_COUNT,
            total_patterns: PATTERN_COUNT,
        };
        if self.summary != expected {
            return Err(IoError::validation(format!(
                "summary declares {} orbits / {} patterns, expected {} / {}",
                self.summary.total_orbits,
                self.summary.total_patterns,
                ORBIT_COUNT,
                PATTERN_COUNT
            )));
        }
        Ok(OrbitIndex::from_orbits(self.orbits)?)
    }
}
