//! Failures raised while reading or writing orbit tables and rule archives.

use c4life_core::CoreError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    /// A value could not be turned into JSON, or JSON into a value.
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The gzip stream of a rule archive could not be finished.
    #[error("Archive gzip error: {0}")]
    Gzip(String),

    /// Well-formed JSON whose content contradicts itself, such as an orbit
    /// table summary that disagrees with its orbit list.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No file at {}", .0.display())]
    MissingFile(PathBuf),

    /// A loaded orbit table that the engine refuses to index.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    #[must_use]
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    #[must_use]
    pub fn missing_file(path: &Path) -> Self {
        Self::MissingFile(path.to_path_buf())
    }

    #[must_use]
    pub fn gzip<S: Into<String>>(msg: S) -> Self {
        Self::Gzip(msg.into())
    }

    /// Prefixes the message with what was being attempted, e.g.
    /// `"loading orbit table"`.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_mismatch_message() {
        let err = IoError::validation("summary lists 139 orbits, table has 140");
        assert_eq!(
            err.to_string(),
            "Validation error: summary lists 139 orbits, table has 140"
        );
    }

    #[test]
    fn test_missing_table_carries_path_and_context() {
        let err =
            IoError::missing_file(Path::new("tables/orbits.json")).with_context("loading orbit table");
        let msg = err.to_string();
        assert!(msg.starts_with("loading orbit table: "));
        assert!(msg.contains("tables/orbits.json"));
    }

    #[test]
    fn test_rejected_orbit_table_passes_through_core_error() {
        let err: IoError = CoreError::InvalidOrbitSize(3).into();
        assert_eq!(err.to_string(), CoreError::InvalidOrbitSize(3).to_string());
        assert!(matches!(err, IoError::Core(CoreError::InvalidOrbitSize(3))));
    }

    #[test]
    fn test_gzip_error_names_the_archive() {
        assert!(IoError::gzip("unexpected end of stream")
            .to_string()
            .starts_with("Archive gzip error"));
    }
}
