//! Weighted inheritance of traits from two parents
//!
//! Every appearance item and ability slot is inherited by a draw
//! proportional to grade weight. When both parents carry the same id the
//! weights merge into one candidate, so shared traits converge.

use rand::Rng;
use tracing::warn;

use crate::catalog::{Catalog, Grade};
use crate::instance::GradedId;

/// A weighted option for a single inheritance draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<T> {
    pub value: T,
    pub weight: u32,
}

impl<T> Candidate<T> {
    pub fn new(value: T, weight: u32) -> Self {
        Self { value, weight }
    }
}

/// Pick one candidate with probability proportional to its weight
///
/// Returns `None` only when the list is empty or carries no weight.
pub fn weighted_pick<'a, T>(candidates: &'a [Candidate<T>], rng: &mut impl Rng) -> Option<&'a T> {
    let total: u32 = candidates.iter().map(|c| c.weight).sum();
    if total == 0 {
        return None;
    }

    let roll = rng.gen_range(0..total);
    let mut cumulative = 0;
    for candidate in candidates {
        cumulative += candidate.weight;
        if roll < cumulative {
            return Some(&candidate.value);
        }
    }
    candidates.last().map(|c| &c.value)
}

/// Uniform 50/50 choice between the two parents' values
pub fn inherit_stat(a: u32, b: u32, rng: &mut impl Rng) -> u32 {
    if rng.gen_bool(0.5) {
        a
    } else {
        b
    }
}

/// Candidate set for one appearance slot
pub fn appearance_candidates(a: &GradedId, b: &GradedId) -> Vec<Candidate<GradedId>> {
    if a.id == b.id {
        vec![Candidate::new(a.clone(), a.grade.weight() + b.grade.weight())]
    } else {
        vec![
            Candidate::new(a.clone(), a.grade.weight()),
            Candidate::new(b.clone(), b.grade.weight()),
        ]
    }
}

pub fn inherit_appearance_item(a: &GradedId, b: &GradedId, rng: &mut impl Rng) -> GradedId {
    let candidates = appearance_candidates(a, b);
    weighted_pick(&candidates, rng).cloned().unwrap_or_else(|| a.clone())
}

/// Outcome of an ability-slot draw before the placeholder is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbilityChoice {
    Held(GradedId),
    /// A parent with an empty slot competes as a Normal-grade entry
    Placeholder,
}

/// Candidate set for one ability slot
pub fn ability_candidates(
    a: Option<&GradedId>,
    b: Option<&GradedId>,
) -> Vec<Candidate<AbilityChoice>> {
    let entry = |parent: Option<&GradedId>| match parent {
        Some(held) => (AbilityChoice::Held(held.clone()), held.grade.weight()),
        None => (AbilityChoice::Placeholder, Grade::Normal.weight()),
    };

    let (choice_a, weight_a) = entry(a);
    let (choice_b, weight_b) = entry(b);
    if choice_a == choice_b {
        vec![Candidate::new(choice_a, weight_a + weight_b)]
    } else {
        vec![
            Candidate::new(choice_a, weight_a),
            Candidate::new(choice_b, weight_b),
        ]
    }
}

/// Inherit one ability slot
///
/// The slot ends up empty only when both parents lack it. If one parent
/// had an ability and the placeholder still wins, the offspring gets the
/// slot's Normal baseline ability.
pub fn inherit_ability(
    a: Option<&GradedId>,
    b: Option<&GradedId>,
    slot: u8,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> Option<GradedId> {
    if a.is_none() && b.is_none() {
        return None;
    }

    let candidates = ability_candidates(a, b);
    match weighted_pick(&candidates, rng)? {
        AbilityChoice::Held(held) => Some(held.clone()),
        AbilityChoice::Placeholder => match catalog.baseline_ability(slot) {
            Some(baseline) => Some(GradedId::new(Grade::Normal, baseline.id.clone())),
            None => {
                warn!("No Normal baseline ability for slot {}, leaving it empty", slot);
                None
            }
        },
    }
}
