//! Battle AI - picks at most one skill per activation

pub mod scoring;

pub use scoring::{situational_score, skill_priority};

use rand::Rng;

use crate::battle::combatant::BattleCombatant;

/// Index into `actor.skills` of the skill to use, if any is ready
///
/// Each ready skill gets its priority plus uniform jitter in
/// `[-jitter, jitter]`. The highest score wins; ties keep slot order.
pub fn select_skill(
    actor: &BattleCombatant,
    opponent: &BattleCombatant,
    jitter: f64,
    rng: &mut impl Rng,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (idx, skill) in actor.skills.iter().enumerate() {
        if !actor.is_skill_ready(skill) {
            continue;
        }
        let mut score = skill_priority(skill, actor, opponent);
        if jitter > 0.0 {
            score += rng.gen_range(-jitter..=jitter);
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((idx, score)),
        }
    }

    best.map(|(idx, _)| idx)
}
