//! # c4life IO
//!
//! Persistence layer for c4life.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - Validated JSON helpers
//! - The orbit-table file shared with external collaborators
//! - A compressed archive of the best rules found by search

/// Gzip-compressed archive of scored rules
pub mod archive;
/// Error types and result aliases for I/O operations
pub mod error;
/// Orbit-table JSON file
pub mod orbit_table;
/// Validated serialization helpers for JSON
pub mod serialization;

pub use archive::{ArchivedRule, RuleArchive};
pub use error::{IoError, Result};
pub use orbit_table::{OrbitTableFile, OrbitTableSummary};
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
