//! Serialization utilities with robust error handling.
//!
//! Every persisted c4life artifact is JSON; these helpers wrap `serde_json`
//! so callers get an [`IoError`] with the failing path attached.

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializes data to compact JSON.
pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Serializes data to pretty-printed JSON.
pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Deserializes data from a JSON string, rejecting blank input.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }

    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {}", e)))
}

/// Writes pretty JSON to a temporary sibling, then renames it over `path`.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let json = to_json_pretty(data)?;
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, json)
        .and_then(|()| std::fs::rename(&tmp_path, path))
        .map_err(|e| IoError::FileSystem(e).with_context(format!("writing JSON to {:?}", path)))
}

/// Reads and deserializes a JSON file.
pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::missing_file(path));
    }
    let json = std::fs::read_to_string(path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path))
    })?;
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use c4life_data::{OrbitRule, TrackerStats};

    #[test]
    fn test_rule_serializes_as_hex_string() {
        let mut rule = OrbitRule::zeros();
        rule.set(3, true);
        let json = to_json(&rule).unwrap();
        assert_eq!(json, format!("\"{}\"", rule.to_hex()));
        let restored: OrbitRule = from_json(&json).unwrap();
        assert_eq!(restored, rule);
    }

    #[test]
    fn test_tracker_stats_are_camel_case() {
        let json = to_json(&TrackerStats {
            total_entities: 3,
            unique_patterns: 2,
            entities_alive: 2,
            entities_died: 1,
        })
        .unwrap();
        assert!(json.contains("\"totalEntities\":3"));
        assert!(json.contains("\"entitiesDied\":1"));
    }

    #[test]
    fn test_empty_json_fails() {
        let result: Result<TrackerStats> = from_json("  ");
        assert!(matches!(result, Err(IoError::Validation(_))));
    }

    #[test]
    fn test_invalid_rule_hex_fails() {
        let result: Result<OrbitRule> = from_json("\"abc\"");
        assert!(matches!(result, Err(IoError::Serialization(_))));
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("c4life_json_{}.json", std::process::id()));
        let stats = TrackerStats {
            total_entities: 5,
            ..Default::default()
        };
        write_json_file(&stats, &path).unwrap();
        let restored: TrackerStats = read_json_file(&path).unwrap();
        assert_eq!(restored, stats);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result: Result<TrackerStats> = read_json_file("/nonexistent/c4life/stats.json");
        assert!(matches!(result, Err(IoError::MissingFile(_))));
    }
}
