//! Core data structures for the c4life engine.

pub mod entity;
pub mod orbit;
pub mod pattern;
pub mod rule;
pub mod stats;
