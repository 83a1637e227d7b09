//! Rule compression, expansion and random generation.
//!
//! A rotation-symmetric rule only needs one output bit per orbit, so the
//! 512-entry neighbourhood table compresses to 140 bits. `OrbitRule` carries
//! those bits and the canonical 35-character hex form; this module adds the
//! operations that need the orbit table or a random source.

use crate::error::{CoreError, Result};
use crate::orbit::OrbitIndex;
use c4life_data::{FullRule, OrbitRule, Pattern, CENTER_BIT, ORBIT_COUNT, PATTERN_COUNT};
use rand::Rng;

pub trait RuleLogic: Sized {
    /// Folds a neighbourhood function into orbit bits.
    ///
    /// Every pattern is visited in ascending order and the last member of
    /// each orbit wins, so a function that is not rotation-invariant is
    /// accepted silently. Use [`RuleLogic::compress_checked`] to reject it.
    fn compress<F: Fn(Pattern) -> bool>(f: F, index: &OrbitIndex) -> Self;

    /// Like [`RuleLogic::compress`] but fails on the first orbit whose
    /// members disagree.
    fn compress_checked<F: Fn(Pattern) -> bool>(f: F, index: &OrbitIndex) -> Result<Self>;

    /// Expands orbit bits to a 512-entry table.
    fn expand(&self, index: &OrbitIndex) -> FullRule;

    /// Sets every orbit bit independently with probability `density`.
    fn random_by_density<R: Rng + ?Sized>(
        density: f64,
        force_zero_off: bool,
        index: &OrbitIndex,
        rng: &mut R,
    ) -> Self;

    /// Copy with exactly `floor(magnitude * 140)` distinct bits flipped.
    fn mutate<R: Rng + ?Sized>(
        &self,
        magnitude: f64,
        force_zero_off: bool,
        index: &OrbitIndex,
        rng: &mut R,
    ) -> Self;

    /// Outer-totalistic rule from birth and survival neighbour counts.
    fn life_like(birth: &[u8], survive: &[u8], index: &OrbitIndex) -> Self;

    /// Fraction of the 512 expanded entries that produce a live cell.
    fn lambda(&self, index: &OrbitIndex) -> f64;

    fn parse(hex_str: &str) -> Result<Self>;
}

/// Live cells in the eight-cell ring around the centre.
#[inline]
pub fn neighbor_count(pattern: Pattern) -> u8 {
    (pattern & !(1 << CENTER_BIT)).count_ones() as u8
}

#[inline]
pub fn center_alive(pattern: Pattern) -> bool {
    (pattern >> CENTER_BIT) & 1 == 1
}

/// Number of bits a mutation of `magnitude` flips.
pub fn mutation_flips(magnitude: f64) -> usize {
    let flips = (magnitude * ORBIT_COUNT as f64).floor();
    if flips.is_nan() || flips <= 0.0 {
        0
    } else {
        (flips as usize).min(ORBIT_COUNT)
    }
}

impl RuleLogic for OrbitRule {
    fn compress<F: Fn(Pattern) -> bool>(f: F, index: &OrbitIndex) -> Self {
        let mut rule = OrbitRule::zeros();
        for pattern in 0..PATTERN_COUNT as Pattern {
            rule.set(index.orbit_of(pattern), f(pattern));
        }
        rule
    }

    fn compress_checked<F: Fn(Pattern) -> bool>(f: F, index: &OrbitIndex) -> Result<Self> {
        let mut rule = OrbitRule::zeros();
        for orbit in index.orbits() {
            let mut outputs = orbit.members.iter().map(|&p| f(p));
            let first = outputs.next().unwrap_or(false);
            if outputs.any(|bit| bit != first) {
                return Err(CoreError::NotRotationInvariant { orbit: orbit.id });
            }
            rule.set(orbit.id, first);
        }
        Ok(rule)
    }

    fn expand(&self, index: &OrbitIndex) -> FullRule {
        let mut table = [false; PATTERN_COUNT];
        for (pattern, &orbit) in index.lookup().iter().enumerate() {
            table[pattern] = self.get(orbit as usize);
        }
        FullRule::from_table(table)
    }

    fn random_by_density<R: Rng + ?Sized>(
        density: f64,
        force_zero_off: bool,
        index: &OrbitIndex,
        rng: &mut R,
    ) -> Self {
        let mut rule = OrbitRule::zeros();
        for orbit in 0..ORBIT_COUNT {
            // Out-of-range densities saturate instead of panicking.
            rule.set(orbit, rng.gen::<f64>() < density);
        }
        if force_zero_off {
            rule.set(index.zero_orbit(), false);
        }
        rule
    }

    fn mutate<R: Rng + ?Sized>(
        &self,
        magnitude: f64,
        force_zero_off: bool,
        index: &OrbitIndex,
        rng: &mut R,
    ) -> Self {
        let mut rule = *self;
        for orbit in rand::seq::index::sample(rng, ORBIT_COUNT, mutation_flips(magnitude)) {
            rule.flip(orbit);
        }
        if force_zero_off {
            rule.set(index.zero_orbit(), false);
        }
        rule
    }

    fn life_like(birth: &[u8], survive: &[u8], index: &OrbitIndex) -> Self {
        Self::compress(
            |pattern| {
                let n = neighbor_count(pattern);
                if center_alive(pattern) {
                    survive.contains(&n)
                } else {
                    birth.contains(&n)
                }
            },
            index,
        )
    }

    fn lambda(&self, index: &OrbitIndex) -> f64 {
        let live: usize = index
            .orbits()
            .iter()
            .filter(|o| self.get(o.id))
            .map(|o| o.size)
            .sum();
        live as f64 / PATTERN_COUNT as f64
    }

    fn parse(hex_str: &str) -> Result<Self> {
        Ok(OrbitRule::from_hex(hex_str.trim())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::rot90;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn conway(index: &OrbitIndex) -> FullRule {
        OrbitRule::life_like(&[3], &[2, 3], index).expand(index)
    }

    #[test]
    fn test_conway_literal_patterns() {
        let index = OrbitIndex::build();
        let full = conway(&index);
        assert!(full.apply(0b000_000_111), "birth on three neighbours");
        assert!(full.apply(0b000_010_011), "survival on two neighbours");
        assert!(!full.apply(0b000_011_111), "death on four neighbours");
        assert!(!full.apply(0));
    }

    #[test]
    fn test_expand_compress_agrees_with_invariant_function() {
        let index = OrbitIndex::build();
        let f = |p: Pattern| neighbor_count(p) % 3 == 1 || p == 0b101_010_101;
        let full = OrbitRule::compress(f, &index).expand(&index);
        for p in 0..PATTERN_COUNT as Pattern {
            assert_eq!(full.apply(p), f(p), "pattern {p:#011b}");
        }
    }

    #[test]
    fn test_compress_checked_rejects_asymmetric_function() {
        let index = OrbitIndex::build();
        // Top-left cell only: rotations of 0b1 disagree.
        let result = OrbitRule::compress_checked(|p| p & 1 == 1, &index);
        assert!(matches!(
            result,
            Err(CoreError::NotRotationInvariant { .. })
        ));
    }

    #[test]
    fn test_compress_checked_accepts_symmetric_function() {
        let index = OrbitIndex::build();
        let f = |p: Pattern| center_alive(p) && neighbor_count(p) < 4;
        let checked = OrbitRule::compress_checked(f, &index).unwrap();
        assert_eq!(checked, OrbitRule::compress(f, &index));
    }

    #[test]
    fn test_expanded_rule_is_rotation_invariant() {
        let index = OrbitIndex::build();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let full = OrbitRule::random_by_density(0.5, false, &index, &mut rng).expand(&index);
        for p in 0..PATTERN_COUNT as Pattern {
            assert_eq!(full.apply(p), full.apply(rot90(p)));
        }
    }

    #[test]
    fn test_random_density_extremes() {
        let index = OrbitIndex::build();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let all = OrbitRule::random_by_density(1.0, false, &index, &mut rng);
        assert_eq!(all.count_ones(), ORBIT_COUNT as u32);
        let none = OrbitRule::random_by_density(0.0, false, &index, &mut rng);
        assert_eq!(none.count_ones(), 0);
        let over = OrbitRule::random_by_density(3.5, true, &index, &mut rng);
        assert_eq!(over.count_ones(), ORBIT_COUNT as u32 - 1);
        assert!(!over.get(index.zero_orbit()));
    }

    #[test]
    fn test_mutate_flips_exact_count() {
        let index = OrbitIndex::build();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let base = OrbitRule::random_by_density(0.4, false, &index, &mut rng);
        let before = base;
        let mutated = base.mutate(0.1, false, &index, &mut rng);
        assert_eq!(base, before, "input must not change");
        let flipped = (0..ORBIT_COUNT)
            .filter(|&i| base.get(i) != mutated.get(i))
            .count();
        assert_eq!(flipped, 14);
    }

    #[test]
    fn test_mutate_degenerate_magnitudes() {
        let index = OrbitIndex::build();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let base = OrbitRule::zeros();
        assert_eq!(base.mutate(-1.0, false, &index, &mut rng), base);
        assert_eq!(base.mutate(f64::NAN, false, &index, &mut rng), base);
        let inverted = base.mutate(5.0, false, &index, &mut rng);
        assert_eq!(inverted.count_ones(), ORBIT_COUNT as u32);
        let guarded = base.mutate(1.0, true, &index, &mut rng);
        assert!(!guarded.get(index.zero_orbit()));
    }

    #[test]
    fn test_lambda_matches_expanded_table() {
        let index = OrbitIndex::build();
        let rule = OrbitRule::life_like(&[3], &[2, 3], &index);
        assert!((rule.lambda(&index) - rule.expand(&index).lambda()).abs() < 1e-12);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let hex = format!("  {}\n", "0".repeat(35));
        assert_eq!(OrbitRule::parse(&hex).unwrap(), OrbitRule::zeros());
        assert!(matches!(
            OrbitRule::parse("12"),
            Err(CoreError::RuleFormat(_))
        ));
    }
}
