//! Skill priority scoring
//!
//! Each slot reads a different part of the situation: slot 1 (recovery)
//! the actor's missing HP, slot 2 (offense) how far the opponent's HP is
//! from half, slot 3 (utility) the actor's speed disadvantage.

use crate::battle::combatant::{BattleCombatant, UsableSkill};
use crate::battle::constants::{
    OFFENSE_PRIORITY_BASE, OFFENSE_PRIORITY_SCALE, RECOVERY_PRIORITY_SCALE, UTILITY_PRIORITY_BASE,
    UTILITY_PRIORITY_SCALE,
};

/// Situation part of the score, before grade bonus and jitter
pub fn situational_score(slot: u8, actor: &BattleCombatant, opponent: &BattleCombatant) -> f64 {
    match slot {
        1 => (1.0 - actor.hp_ratio()) * RECOVERY_PRIORITY_SCALE,
        2 => OFFENSE_PRIORITY_BASE + (opponent.hp_ratio() - 0.5).abs() * OFFENSE_PRIORITY_SCALE,
        _ => {
            let own = actor.current_ms();
            let theirs = opponent.current_ms();
            let disadvantage = if theirs > 0.0 {
                ((theirs - own) / theirs).max(0.0)
            } else {
                0.0
            };
            UTILITY_PRIORITY_BASE + disadvantage * UTILITY_PRIORITY_SCALE
        }
    }
}

/// Deterministic priority of a skill (no jitter)
pub fn skill_priority(skill: &UsableSkill, actor: &BattleCombatant, opponent: &BattleCombatant) -> f64 {
    situational_score(skill.slot, actor, opponent) + skill.grade.priority_bonus()
}
