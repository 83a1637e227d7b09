pub mod explorer;
pub mod runner;

pub use explorer::{Candidate, RuleExplorer, SearchOutcome};
pub use runner::{run_simulation, RunReport};
