use c4life_data::{OrbitRule, Pattern, ORBIT_COUNT, PATTERN_COUNT};
use c4life_lib::model::orbit::canonical;
use c4life_lib::model::rule::mutation_flips;
use c4life_lib::model::{OrbitIndex, RuleLogic};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

prop_compose! {
    fn arb_rule()(bits in prop::collection::vec(any::<bool>(), ORBIT_COUNT)) -> OrbitRule {
        let mut rule = OrbitRule::zeros();
        for (orbit, bit) in bits.into_iter().enumerate() {
            rule.set(orbit, bit);
        }
        rule
    }
}

proptest! {
    #[test]
    fn test_hex_roundtrip(rule in arb_rule()) {
        let hex = rule.to_hex();
        prop_assert_eq!(hex.len(), 35);
        prop_assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        prop_assert_eq!(OrbitRule::from_hex(&hex).unwrap(), rule);
    }

    #[test]
    fn test_wrong_length_is_rejected(len in 0usize..70) {
        prop_assume!(len != 35);
        let hex = "0".repeat(len);
        prop_assert!(OrbitRule::from_hex(&hex).is_err());
    }

    #[test]
    fn test_expand_compress_roundtrip(rule in arb_rule()) {
        let index = OrbitIndex::build();
        let full = rule.expand(&index);
        let again = OrbitRule::compress(|p| full.apply(p), &index);
        prop_assert_eq!(again, rule);
        let checked = OrbitRule::compress_checked(|p| full.apply(p), &index).unwrap();
        prop_assert_eq!(checked, rule);
    }

    #[test]
    fn test_expanded_rule_is_rotation_invariant(rule in arb_rule()) {
        let index = OrbitIndex::build();
        let full = rule.expand(&index);
        for p in 0..PATTERN_COUNT as Pattern {
            prop_assert_eq!(full.apply(p), full.apply(canonical(p)));
        }
    }

    #[test]
    fn test_mutation_flips_exact_count(
        rule in arb_rule(),
        magnitude in 0.0f64..1.0,
        seed in any::<u64>()
    ) {
        let index = OrbitIndex::build();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let original = rule;
        let mutant = rule.mutate(magnitude, false, &index, &mut rng);
        prop_assert_eq!(rule, original);
        let differing = (0..ORBIT_COUNT).filter(|&o| mutant.get(o) != rule.get(o)).count();
        prop_assert_eq!(differing, mutation_flips(magnitude));
        prop_assert_eq!(differing, (magnitude * 140.0).floor() as usize);
    }

    #[test]
    fn test_force_zero_off(density in 0.0f64..1.0, seed in any::<u64>()) {
        let index = OrbitIndex::build();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rule = OrbitRule::random_by_density(density, true, &index, &mut rng);
        prop_assert!(!rule.get(index.zero_orbit()));
        let mutant = rule.mutate(1.0, true, &index, &mut rng);
        prop_assert!(!mutant.get(index.zero_orbit()));
    }
}

#[test]
fn test_zero_rule_hex() {
    assert_eq!(OrbitRule::zeros().to_hex(), "0".repeat(35));
}

#[test]
fn test_degenerate_densities_do_not_panic() {
    let index = OrbitIndex::build();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        OrbitRule::random_by_density(-0.5, false, &index, &mut rng).count_ones(),
        0
    );
    assert_eq!(
        OrbitRule::random_by_density(2.0, false, &index, &mut rng).count_ones(),
        140
    );
    let rule = OrbitRule::zeros();
    assert_eq!(rule.mutate(-1.0, false, &index, &mut rng), rule);
    assert_eq!(rule.mutate(5.0, false, &index, &mut rng).count_ones(), 140);
}
