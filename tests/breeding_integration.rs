//! Breeding and generation integration tests

use creature_arena::catalog::{Catalog, Grade};
use creature_arena::genetics::inheritance::{appearance_candidates, inherit_appearance_item};
use creature_arena::genetics::*;
use creature_arena::instance::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn parent(name: &str, stats: Stats, abilities: Abilities) -> Instance {
    create_base(stats, Appearance::baseline(), abilities, name, "test")
}

/// Default tuning: bonus 0, chain of 3
fn default_ctx() -> BreedingContext {
    BreedingContext::new(BreedingSettings::default(), 1, "test")
}

#[test]
fn test_hp_inheritance_is_fifty_fifty() {
    let catalog = Catalog::builtin();
    let a = parent("A", Stats::new(10, 1, 1), Abilities::default());
    let b = parent("B", Stats::new(20, 1, 1), Abilities::default());
    let ctx = default_ctx();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let mut tens = 0u32;
    let mut twenties = 0u32;
    for _ in 0..20_000 {
        let child = breed(&a, &b, &ctx, &catalog, &mut rng);
        if child.mutation().fields.contains(&MutationField::Hp) {
            continue;
        }
        match child.stats().hp {
            10 => tens += 1,
            20 => twenties += 1,
            other => panic!("unexpected hp {}", other),
        }
    }

    let ratio = tens as f64 / (tens + twenties) as f64;
    assert!((ratio - 0.5).abs() < 0.02, "hp=10 ratio {}", ratio);
}

#[test]
fn test_shared_appearance_converges() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for grade in Grade::ALL {
        let item = GradedId::new(grade, "shared_id");
        let candidates = appearance_candidates(&item, &item);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].weight, 2 * grade.weight());
        assert_eq!(inherit_appearance_item(&item, &item, &mut rng).id, "shared_id");
    }
}

#[test]
fn test_mutation_rate_matches_first_round() {
    let catalog = Catalog::builtin();
    let (a, b) = starter_pair();
    let ctx = default_ctx();
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let trials = 10_000;
    let mutated = (0..trials)
        .filter(|_| breed(&a, &b, &ctx, &catalog, &mut rng).mutation().count > 0)
        .count();
    let ratio = mutated as f64 / trials as f64;
    assert!((ratio - 0.5).abs() < 0.02, "mutation ratio {}", ratio);
}

#[test]
fn test_stat_mutation_beats_better_parent() {
    let catalog = Catalog::builtin();
    let a = parent("A", Stats::new(10, 5, 1), Abilities::default());
    let b = parent("B", Stats::new(50, 1, 9), Abilities::default());
    let ctx = BreedingContext::new(
        BreedingSettings {
            mutation_bonus: 0.5,
            max_chain_mutations: 5,
        },
        1,
        "test",
    );
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    for _ in 0..2000 {
        let child = breed(&a, &b, &ctx, &catalog, &mut rng);
        let stats = child.stats();
        for field in &child.mutation().fields {
            match field {
                MutationField::Hp => assert!(stats.hp > 50),
                MutationField::Atk => assert!(stats.atk > 5),
                MutationField::Ms => assert!(stats.ms > 9),
                _ => {}
            }
        }
    }
}

#[test]
fn test_ability_slots_stay_empty_when_parents_lack_them() {
    let catalog = Catalog::builtin();
    let a = parent(
        "A",
        Stats::new(10, 1, 1),
        Abilities::new(Some(GradedId::new(Grade::Rare, "s1_rare01")), None, None),
    );
    let b = parent("B", Stats::new(10, 1, 1), Abilities::default());
    let ctx = default_ctx();
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    for _ in 0..1000 {
        let child = breed(&a, &b, &ctx, &catalog, &mut rng);
        let fields = &child.mutation().fields;
        if !fields.contains(&MutationField::Ability1) {
            assert!(child.abilities().ability_1.is_some());
        }
        if !fields.contains(&MutationField::Ability2) {
            assert!(child.abilities().ability_2.is_none());
        }
        if !fields.contains(&MutationField::Ability3) {
            assert!(child.abilities().ability_3.is_none());
        }
    }
}

#[test]
fn test_offspring_round_trips_through_json() {
    let catalog = Catalog::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let a = open_box(BoxTier::Mythic, "shop", &catalog, &mut rng);
    let b = open_box(BoxTier::Premium, "shop", &catalog, &mut rng);
    let ctx = BreedingContext::new(
        BreedingSettings {
            mutation_bonus: 0.5,
            max_chain_mutations: 5,
        },
        12,
        "player-1",
    );
    for _ in 0..50 {
        let child = breed(&a, &b, &ctx, &catalog, &mut rng);
        let json = serde_json::to_string(&child).unwrap();
        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, child);
        assert!(back.validate(&catalog).is_ok());
        assert_eq!(back.name, "Offspring #12");
    }
}

proptest! {
    #[test]
    fn prop_mutation_provenance_is_consistent(
        seed in any::<u64>(),
        bonus in 0.0f64..=0.5,
        max_chain in 3u8..=5,
    ) {
        let catalog = Catalog::builtin();
        let (a, b) = starter_pair();
        let ctx = BreedingContext::new(
            BreedingSettings { mutation_bonus: bonus, max_chain_mutations: max_chain },
            1,
            "prop",
        );
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let child = breed(&a, &b, &ctx, &catalog, &mut rng);
        let mutation = child.mutation();

        prop_assert_eq!(mutation.fields.len(), mutation.count as usize);
        prop_assert!(mutation.count <= max_chain as u32);
        let mut names: Vec<&str> = mutation.fields.iter().map(|f| f.name()).collect();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), mutation.fields.len());
    }

    #[test]
    fn prop_power_score_matches_stats(
        seed in any::<u64>(),
        hp in 1u32..5000,
        atk in 1u32..500,
        ms in 1u32..500,
    ) {
        let catalog = Catalog::builtin();
        let a = create_base(Stats::new(hp, atk, ms), Appearance::baseline(), Abilities::default(), "A", "prop");
        let (b, _) = starter_pair();
        let ctx = BreedingContext::new(
            BreedingSettings { mutation_bonus: 0.5, max_chain_mutations: 5 },
            1,
            "prop",
        );
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for inst in [a.clone(), breed(&a, &b, &ctx, &catalog, &mut rng), open_box(BoxTier::Basic, "prop", &catalog, &mut rng)] {
            let s = inst.stats();
            prop_assert_eq!(inst.power_score(), s.hp + s.atk * 10 + s.ms * 5);
        }
    }

    #[test]
    fn prop_stats_from_power_is_exact_for_normal_budgets(target in 100u32..100_000) {
        let stats = stats_from_power(target, &StatApportionment::default());
        prop_assert!(stats.hp >= 1 && stats.atk >= 1 && stats.ms >= 1);
        prop_assert_eq!(stats.power_score(), target);
    }
}
