//! # c4life
//!
//! Command-line explorer for rotation-symmetric binary cellular automata.
//!
//! - [`model`] re-exports the engine and persistence crates under one roof.
//! - [`app`] holds the run and rule-search workflows driven by the binary.

pub mod app;
pub mod model;
