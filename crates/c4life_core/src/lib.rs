//! # c4life Core
//!
//! The deterministic engine behind c4life: rotation-symmetric binary
//! cellular automata and the creatures that emerge from them.
//!
//! This crate contains:
//! - The C4 orbit table that folds 512 neighbourhoods into 140 orbits
//! - Rule compression, expansion, random generation and mutation
//! - The toroidal grid, its seeding strategies and interchangeable step engines
//! - Isolated component detection and dihedral shape canonicalization
//! - Identity tracking across steps and per-step statistics
//!
//! ## Example
//!
//! ```
//! use c4life_core::grid::Grid;
//! use c4life_core::orbit::OrbitIndex;
//! use c4life_core::rule::RuleLogic;
//! use c4life_data::OrbitRule;
//!
//! let index = OrbitIndex::build();
//! let conway = OrbitRule::life_like(&[3], &[2, 3], &index);
//! let full = conway.expand(&index);
//!
//! let mut grid = Grid::parse(&[".....", "..#..", "..#..", "..#..", "....."]).unwrap();
//! grid.step(&full);
//! assert!(grid.get(1, 2) && grid.get(2, 2) && grid.get(3, 2));
//! ```

/// Orbit-invariant shape signatures under the dihedral group of order 8
pub mod canonical;
/// Configuration management for simulation parameters
pub mod config;
/// Isolated connected-component detection
pub mod detect;
/// Sequential and parallel step engines
pub mod engine;
/// Error types for the engine
pub mod error;
/// Toroidal grid buffer and seeding strategies
pub mod grid;
/// Run metrics and structured logging
pub mod metrics;
/// Rotation orbits of 3×3 neighbourhoods
pub mod orbit;
/// Rule compression, expansion and mutation
pub mod rule;
/// End-to-end step pipeline
pub mod simulation;
/// Population, entropy and interest statistics
pub mod stats;
/// Persistent identity tracking across steps
pub mod tracker;

pub use error::{CoreError, Result};
pub use metrics::{init_logging, RunMetrics};
pub use orbit::OrbitIndex;
pub use rule::RuleLogic;
pub use simulation::Simulation;
