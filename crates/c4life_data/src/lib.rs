//! Plain data types shared by every c4life crate.
//!
//! Behaviour lives in `c4life_core`; this crate only defines the values that
//! flow between the engine, the persistence layer and the application.

pub mod data;

pub use data::entity::{CanonicalSignature, Coordinate, EntityId, TrackedIdentity, TrackerStats};
pub use data::orbit::{Orbit, Stabilizer};
pub use data::pattern::{
    Pattern, CENTER_BIT, NEIGHBORHOOD_BITS, ORBIT_COUNT, PATTERN_COUNT, RULE_HEX_LEN,
};
pub use data::rule::{FullRule, OrbitRule, RuleFormatError};
pub use data::stats::GridStatistics;
