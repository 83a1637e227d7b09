use super::pattern::Pattern;
use serde::{Deserialize, Serialize};

/// Subgroup of C4 that leaves every member of an orbit unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stabilizer {
    /// Fixed by every rotation; orbit of size 1.
    C4,
    /// Fixed by the half turn only; orbit of size 2.
    C2,
    /// Trivial stabilizer; orbit of size 4.
    I,
}

impl Stabilizer {
    /// Number of patterns in an orbit with this stabilizer.
    pub fn orbit_size(self) -> usize {
        match self {
            Stabilizer::C4 => 1,
            Stabilizer::C2 => 2,
            Stabilizer::I => 4,
        }
    }

    /// Maps an orbit size back to its stabilizer, `None` for sizes C4 cannot produce.
    pub fn for_orbit_size(size: usize) -> Option<Self> {
        match size {
            1 => Some(Stabilizer::C4),
            2 => Some(Stabilizer::C2),
            4 => Some(Stabilizer::I),
            _ => None,
        }
    }
}

/// One equivalence class of neighbourhoods under 90° rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orbit {
    pub id: usize,
    /// Smallest pattern among the members.
    pub representative: Pattern,
    pub size: usize,
    pub stabilizer: Stabilizer,
    #[serde(rename = "patterns")]
    pub members: Vec<Pattern>,
}
