pub use c4life_core::{CoreError, OrbitIndex, RuleLogic, Simulation};
pub mod canonical {
    pub use c4life_core::canonical::*;
}
pub mod config {
    pub use c4life_core::config::*;
}
pub mod detect {
    pub use c4life_core::detect::*;
}
pub mod engine {
    pub use c4life_core::engine::*;
}
pub mod grid {
    pub use c4life_core::grid::*;
}
pub mod metrics {
    pub use c4life_core::metrics::*;
}
pub mod orbit {
    pub use c4life_core::orbit::*;
}
pub mod rule {
    pub use c4life_core::rule::*;
}
pub mod stats {
    pub use c4life_core::stats::*;
}
pub mod tracker {
    pub use c4life_core::tracker::*;
}
pub mod persistence {
    pub use c4life_io::archive::*;
    pub use c4life_io::orbit_table::*;
}
