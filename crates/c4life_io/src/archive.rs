//! Gzip-compressed archive of the best rules found by search.
//!
//! The archive keeps at most `capacity` entries ordered by interest score,
//! best first, and is stored as gzip-compressed JSON. Plain JSON files are
//! accepted on load.

use crate::error::{IoError, Result};
use c4life_data::OrbitRule;
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// One scored rule together with the run that scored it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedRule {
    pub rule: OrbitRule,
    pub score: f64,
    /// Fraction of expanded neighbourhoods that produce a live cell.
    pub lambda: f64,
    pub steps: usize,
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    /// Fingerprint of the configuration used for scoring.
    pub config: String,
    pub discovered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleArchive {
    capacity: usize,
    entries: Vec<ArchivedRule>,
}

impl Default for RuleArchive {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RuleArchive {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    /// Inserts an entry, replacing a weaker score for the same rule and
    /// evicting the lowest score once capacity is exceeded.
    ///
    /// Returns whether the entry is still held afterwards.
    pub fn add(&mut self, entry: ArchivedRule) -> bool {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.rule == entry.rule) {
            if entry.score <= existing.score {
                return false;
            }
            *existing = entry.clone();
        } else {
            self.entries.push(entry.clone());
        }
        self.entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        self.entries.truncate(self.capacity);
        self.entries.iter().any(|e| e.rule == entry.rule)
    }

    pub fn best(&self) -> Option<&ArchivedRule> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[ArchivedRule] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            serde_json::to_writer(&mut encoder, self)?;
            encoder
                .finish()
                .and_then(|mut w| w.flush())
                .map_err(|e| IoError::gzip(e.to_string()))?;
        }
        std::fs::rename(&tmp_path, path)?;
        tracing::info!(path = %path.display(), entries = self.len(), "Rule archive saved");
        Ok(())
    }

    /// Loads an archive, or an empty one with `capacity` when the file is
    /// missing. A loaded archive is trimmed to `capacity`.
    pub fn load<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new(capacity));
        }

        let bytes = std::fs::read(path)?;
        let mut decoded = Vec::new();
        let mut archive: Self = if GzDecoder::new(bytes.as_slice())
            .read_to_end(&mut decoded)
            .is_ok()
        {
            serde_json::from_slice(&decoded)?
        } else {
            tracing::warn!(path = %path.display(), "Archive is not gzip, reading as plain JSON");
            serde_json::from_slice(&bytes)?
        };

        archive.capacity = capacity.max(1);
        archive.entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        archive.entries.truncate(archive.capacity);
        Ok(archive)
    }
}
