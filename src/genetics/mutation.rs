//! Cascading mutation
//!
//! A chain of up to five rounds, each gated by its own Bernoulli trial.
//! The first failed trial ends the chain. A successful round mutates one
//! field that has not mutated yet.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::catalog::{Catalog, Grade, ABILITY_SLOTS, BASELINE_ID};
use crate::genetics::Genome;
use crate::instance::{AppearanceSlot, GradedId, MutationField, StatKind, Stats};

/// Base success probability of each chain round
pub const CHAIN_PROBABILITIES: [f64; 5] = [0.5, 0.4, 0.2, 0.1, 0.05];

const HP_DELTAS: [(u32, f64); 3] = [(10, 0.80), (20, 0.15), (30, 0.05)];
const ATK_DELTAS: [(u32, f64); 5] = [(1, 0.57), (2, 0.30), (3, 0.08), (4, 0.04), (5, 0.01)];
const MS_DELTAS: [(u32, f64); 3] = [(1, 0.80), (2, 0.15), (3, 0.05)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationCategory {
    Stat,
    Appearance,
    Ability,
}

impl MutationCategory {
    /// Draw a category: stat 80%, appearance 15%, ability 5%
    pub fn roll(rng: &mut impl Rng) -> Self {
        let roll: f64 = rng.gen();
        if roll < 0.80 {
            MutationCategory::Stat
        } else if roll < 0.95 {
            MutationCategory::Appearance
        } else {
            MutationCategory::Ability
        }
    }

    /// Category tried when this one has nothing left to mutate
    pub fn next(self) -> Self {
        match self {
            MutationCategory::Stat => MutationCategory::Appearance,
            MutationCategory::Appearance => MutationCategory::Ability,
            MutationCategory::Ability => MutationCategory::Stat,
        }
    }

    pub fn fields(self) -> Vec<MutationField> {
        match self {
            MutationCategory::Stat => {
                StatKind::ALL.iter().map(|s| MutationField::stat(*s)).collect()
            }
            MutationCategory::Appearance => AppearanceSlot::ALL
                .iter()
                .map(|s| MutationField::appearance(*s))
                .collect(),
            MutationCategory::Ability => (1..=ABILITY_SLOTS)
                .filter_map(MutationField::ability)
                .collect(),
        }
    }
}

/// Success probability of round `round` (0-based), scaled by the bonus
pub fn chain_probability(round: usize, mutation_bonus: f64) -> f64 {
    CHAIN_PROBABILITIES
        .get(round)
        .map(|p| (p * (1.0 + mutation_bonus)).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

fn roll_delta(table: &[(u32, f64)], rng: &mut impl Rng) -> u32 {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (delta, probability) in table {
        cumulative += probability;
        if roll < cumulative {
            return *delta;
        }
    }
    table.last().map(|(delta, _)| *delta).unwrap_or(0)
}

/// Stat delta drawn from the per-stat table
pub fn roll_stat_delta(stat: StatKind, rng: &mut impl Rng) -> u32 {
    match stat {
        StatKind::Hp => roll_delta(&HP_DELTAS, rng),
        StatKind::Atk => roll_delta(&ATK_DELTAS, rng),
        StatKind::Ms => roll_delta(&MS_DELTAS, rng),
    }
}

/// Pick a not-yet-mutated field, starting from `category` and falling through
fn pick_field(
    category: MutationCategory,
    mutated: &[MutationField],
    rng: &mut impl Rng,
) -> Option<MutationField> {
    let mut current = category;
    for _ in 0..3 {
        let eligible: Vec<MutationField> = current
            .fields()
            .into_iter()
            .filter(|f| !mutated.contains(f))
            .collect();
        if let Some(field) = eligible.choose(rng) {
            return Some(*field);
        }
        current = current.next();
    }
    None
}

/// Choose an id from `ids`, preferring one neither parent holds
fn pick_novel<'a>(
    ids: &'a [String],
    parent_ids: [&str; 2],
    rng: &mut impl Rng,
) -> Option<&'a String> {
    let novel: Vec<&String> = ids
        .iter()
        .filter(|id| !parent_ids.contains(&id.as_str()))
        .collect();
    match novel.choose(rng) {
        Some(id) => Some(*id),
        None => ids.choose(rng),
    }
}

pub fn mutate_stat(stat: StatKind, parent_a: &Stats, parent_b: &Stats, rng: &mut impl Rng) -> u32 {
    let base = parent_a.get(stat).max(parent_b.get(stat));
    base + roll_stat_delta(stat, rng)
}

pub fn mutate_appearance(
    slot: AppearanceSlot,
    parent_a: &Genome,
    parent_b: &Genome,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> GradedId {
    let grade = Grade::roll_mutation(rng);
    let ids = catalog.list_ids(slot.catalog_kind(), grade);
    let parents = [
        parent_a.appearance.get(slot).id.as_str(),
        parent_b.appearance.get(slot).id.as_str(),
    ];
    match pick_novel(ids, parents, rng) {
        Some(id) => GradedId::new(grade, id.clone()),
        None => GradedId::new(Grade::Normal, BASELINE_ID),
    }
}

/// `None` when the rolled grade has no abilities for the slot
pub fn mutate_ability(
    slot: u8,
    parent_a: &Genome,
    parent_b: &Genome,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> Option<GradedId> {
    let grade = Grade::roll_mutation(rng);
    let ids = catalog.list_ability_ids(grade, slot);
    let parents = [
        parent_a.abilities.get(slot).map(|a| a.id.as_str()).unwrap_or(""),
        parent_b.abilities.get(slot).map(|a| a.id.as_str()).unwrap_or(""),
    ];
    pick_novel(ids, parents, rng).map(|id| GradedId::new(grade, id.clone()))
}

fn apply(
    field: MutationField,
    offspring: &mut Genome,
    parent_a: &Genome,
    parent_b: &Genome,
    catalog: &Catalog,
    rng: &mut impl Rng,
) {
    match field {
        MutationField::Hp | MutationField::Atk | MutationField::Ms => {
            let stat = match field {
                MutationField::Hp => StatKind::Hp,
                MutationField::Atk => StatKind::Atk,
                _ => StatKind::Ms,
            };
            let value = mutate_stat(stat, &parent_a.stats, &parent_b.stats, rng);
            offspring.stats.set(stat, value);
        }
        MutationField::MainColor
        | MutationField::SubColor
        | MutationField::PatternColor
        | MutationField::Pattern => {
            let slot = match field {
                MutationField::MainColor => AppearanceSlot::MainColor,
                MutationField::SubColor => AppearanceSlot::SubColor,
                MutationField::PatternColor => AppearanceSlot::PatternColor,
                _ => AppearanceSlot::Pattern,
            };
            let item = mutate_appearance(slot, parent_a, parent_b, catalog, rng);
            offspring.appearance.set(slot, item);
        }
        MutationField::Ability1 | MutationField::Ability2 | MutationField::Ability3 => {
            let slot = match field {
                MutationField::Ability1 => 1,
                MutationField::Ability2 => 2,
                _ => 3,
            };
            let ability = mutate_ability(slot, parent_a, parent_b, catalog, rng);
            offspring.abilities.set(slot, ability);
        }
    }
}

/// Run the mutation chain over an inherited genome
///
/// Returns the mutated fields in order; the list never repeats a field and
/// never exceeds `max_chain` entries.
pub fn run_chain(
    offspring: &mut Genome,
    parent_a: &Genome,
    parent_b: &Genome,
    mutation_bonus: f64,
    max_chain: u8,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> Vec<MutationField> {
    let rounds = (max_chain as usize).min(CHAIN_PROBABILITIES.len());
    let mut mutated = Vec::with_capacity(rounds);

    for round in 0..rounds {
        let probability = chain_probability(round, mutation_bonus);
        if !rng.gen_bool(probability) {
            trace!("Mutation chain stopped at round {}", round + 1);
            break;
        }

        let category = MutationCategory::roll(rng);
        let Some(field) = pick_field(category, &mutated, rng) else {
            break;
        };
        apply(field, offspring, parent_a, parent_b, catalog, rng);
        trace!("Mutation round {}: {:?} -> {}", round + 1, category, field.name());
        mutated.push(field);
    }

    mutated
}
