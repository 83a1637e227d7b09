//! Rotation orbits of 3×3 binary neighbourhoods.
//!
//! The cyclic group C4 acts on the nine cells of a 3×3 window by quarter
//! turns: the centre is fixed and the remaining eight cells form two 4-cycles
//! (corners and edges). Grouping the 512 patterns by the smallest of their
//! four rotations yields 140 orbits: 8 fixed by every rotation, 12 fixed only
//! by the half turn and 120 free orbits.

use crate::error::{CoreError, Result};
use c4life_data::{Orbit, Pattern, Stabilizer, NEIGHBORHOOD_BITS, ORBIT_COUNT, PATTERN_COUNT};
use std::collections::BTreeMap;

/// `ROT90_SOURCE[i]` is the cell whose bit lands on cell `i` after a
/// clockwise quarter turn.
pub const ROT90_SOURCE: [usize; NEIGHBORHOOD_BITS] = [6, 3, 0, 7, 4, 1, 8, 5, 2];

/// Rotates a pattern 90° clockwise.
#[inline]
pub fn rot90(pattern: Pattern) -> Pattern {
    ROT90_SOURCE
        .iter()
        .enumerate()
        .fold(0, |acc, (dst, &src)| acc | (((pattern >> src) & 1) << dst))
}

/// The pattern and its three quarter-turn images, in rotation order.
pub fn rotations(pattern: Pattern) -> [Pattern; 4] {
    let r1 = rot90(pattern);
    let r2 = rot90(r1);
    let r3 = rot90(r2);
    [pattern, r1, r2, r3]
}

/// Smallest pattern in the rotation orbit of `pattern`.
pub fn canonical(pattern: Pattern) -> Pattern {
    rotations(pattern).into_iter().min().unwrap_or(pattern)
}

/// Pattern-to-orbit lookup plus per-orbit metadata.
///
/// Built once at start-up and passed by reference to everything that needs to
/// translate between orbit-indexed and pattern-indexed rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbitIndex {
    pattern_to_orbit: [u8; PATTERN_COUNT],
    orbits: Vec<Orbit>,
}

impl OrbitIndex {
    /// Enumerates all orbits from scratch.
    ///
    /// Orbit ids follow ascending order of their representative, so the
    /// all-dead pattern always belongs to orbit 0.
    pub fn build() -> Self {
        let mut groups: BTreeMap<Pattern, Vec<Pattern>> = BTreeMap::new();
        for pattern in 0..PATTERN_COUNT as Pattern {
            groups.entry(canonical(pattern)).or_default().push(pattern);
        }

        let mut pattern_to_orbit = [0u8; PATTERN_COUNT];
        let mut orbits = Vec::with_capacity(ORBIT_COUNT);
        for (id, (representative, members)) in groups.into_iter().enumerate() {
            let size = members.len();
            let Some(stabilizer) = Stabilizer::for_orbit_size(size) else {
                unreachable!("C4 produced an orbit of size {size}");
            };
            for &member in &members {
                pattern_to_orbit[member as usize] = id as u8;
            }
            orbits.push(Orbit {
                id,
                representative,
                size,
                stabilizer,
                members,
            });
        }
        debug_assert_eq!(orbits.len(), ORBIT_COUNT);

        Self {
            pattern_to_orbit,
            orbits,
        }
    }

    /// Rebuilds the lookup from a precomputed orbit list, verifying that it
    /// is exactly the C4 partition of the 512 patterns.
    pub fn from_orbits(orbits: Vec<Orbit>) -> Result<Self> {
        if orbits.len() != ORBIT_COUNT {
            return Err(CoreError::invalid_orbit_table(format!(
                "expected {} orbits, found {}",
                ORBIT_COUNT,
                orbits.len()
            )));
        }

        let mut seen = [false; PATTERN_COUNT];
        let mut pattern_to_orbit = [0u8; PATTERN_COUNT];
        for (position, orbit) in orbits.iter().enumerate() {
            if orbit.id != position {
                return Err(CoreError::invalid_orbit_table(format!(
                    "orbit at position {} has id {}",
                    position, orbit.id
                )));
            }
            let stabilizer = Stabilizer::for_orbit_size(orbit.size)
                .ok_or(CoreError::InvalidOrbitSize(orbit.size))?;
            if stabilizer != orbit.stabilizer || orbit.members.len() != orbit.size {
                return Err(CoreError::invalid_orbit_table(format!(
                    "orbit {} declares size {} / {:?} but lists {} members",
                    orbit.id,
                    orbit.size,
                    orbit.stabilizer,
                    orbit.members.len()
                )));
            }
            if orbit.members.iter().min() != Some(&orbit.representative) {
                return Err(CoreError::invalid_orbit_table(format!(
                    "orbit {} representative {} is not its smallest member",
                    orbit.id, orbit.representative
                )));
            }
            for &member in &orbit.members {
                let slot = member as usize;
                if slot >= PATTERN_COUNT || seen[slot] {
                    return Err(CoreError::invalid_orbit_table(format!(
                        "pattern {} is out of range or listed twice",
                        member
                    )));
                }
                if canonical(member) != orbit.representative {
                    return Err(CoreError::invalid_orbit_table(format!(
                        "pattern {} is not a rotation of {}",
                        member, orbit.representative
                    )));
                }
                seen[slot] = true;
                pattern_to_orbit[slot] = orbit.id as u8;
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(CoreError::invalid_orbit_table(format!(
                "pattern {} belongs to no orbit",
                missing
            )));
        }

        Ok(Self {
            pattern_to_orbit,
            orbits,
        })
    }

    /// Orbit id of a pattern.
    #[inline]
    pub fn orbit_of(&self, pattern: Pattern) -> usize {
        self.pattern_to_orbit[pattern as usize & (PATTERN_COUNT - 1)] as usize
    }

    /// Flat pattern → orbit lookup table.
    pub fn lookup(&self) -> &[u8; PATTERN_COUNT] {
        &self.pattern_to_orbit
    }

    pub fn orbits(&self) -> &[Orbit] {
        &self.orbits
    }

    pub fn orbit(&self, id: usize) -> Option<&Orbit> {
        self.orbits.get(id)
    }

    /// Orbit holding the all-dead neighbourhood.
    pub fn zero_orbit(&self) -> usize {
        self.orbit_of(0)
    }

    pub fn total_patterns(&self) -> usize {
        self.orbits.iter().map(|o| o.size).sum()
    }
}

impl Default for OrbitIndex {
    fn default() -> Self {
        Self::build()
    }
}
