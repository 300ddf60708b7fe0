//! Dodge checks and hit resolution
//!
//! Order for a hit that was not dodged:
//! invincible -> shield -> HP loss -> immortal floor -> revive ->
//! attacker lifesteal -> defender counter.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::buff::BuffKind;
use crate::battle::combatant::BattleCombatant;
use crate::battle::effect::HitKind;

/// Roll the defender's dodge for one incoming hit
///
/// A primed evade decides alone and is spent either way. Otherwise a
/// dodge charge is spent for a guaranteed dodge, then the best dodge
/// chance is rolled. With no dodge source no random draw is made.
pub fn check_dodge(defender: &mut BattleCombatant, rng: &mut impl Rng) -> bool {
    if let Some(chance) = defender.evade_next.take() {
        return rng.gen_bool(chance.clamp(0.0, 1.0));
    }

    let charge = defender
        .buffs
        .iter()
        .position(|b| b.kind == BuffKind::DodgeCharge && !b.is_expired());
    if let Some(idx) = charge {
        defender.buffs[idx].consume();
        defender.buffs.retain(|b| !b.is_expired());
        return true;
    }

    let chance = defender.buff_max(BuffKind::Dodge).clamp(0.0, 1.0);
    chance > 0.0 && rng.gen_bool(chance)
}

/// What happened to one hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitReport {
    /// Damage before shield
    pub raw: i64,
    /// Stopped by invincibility
    pub blocked: bool,
    pub absorbed: i64,
    /// HP actually removed from the defender
    pub hp_loss: i64,
    pub immortal_saved: bool,
    pub revived: bool,
    pub lifesteal: i64,
    pub counter: i64,
}

impl HitReport {
    /// Damage that got past the shield
    pub fn landed(&self) -> i64 {
        self.hp_loss
    }
}

/// Take `amount` HP, honoring the immortal floor and an armed revive
///
/// Returns `(hp_loss, immortal_saved, revived)`.
fn take_hp(target: &mut BattleCombatant, amount: i64) -> (i64, bool, bool) {
    let before = target.hp;
    target.hp -= amount;

    let mut immortal_saved = false;
    if target.hp < 1 && target.has_buff(BuffKind::Immortal) {
        target.hp = 1;
        immortal_saved = true;
    }

    let hp_loss = (before - target.hp).max(0);

    let mut revived = false;
    if target.hp <= 0 {
        if let Some(percent) = target.revive.take() {
            target.hp = ((target.max_hp as f64 * percent).round() as i64).clamp(1, target.max_hp);
            revived = true;
        }
    }

    (hp_loss, immortal_saved, revived)
}

/// Apply one hit of `raw` damage that has already passed its dodge check
pub fn resolve_hit(
    attacker: &mut BattleCombatant,
    defender: &mut BattleCombatant,
    raw: i64,
    kind: HitKind,
) -> HitReport {
    let raw = raw.max(0);
    let mut report = HitReport {
        raw,
        ..HitReport::default()
    };

    if defender.has_buff(BuffKind::Invincible) {
        report.blocked = true;
        return report;
    }

    if kind != HitKind::Piercing {
        report.absorbed = raw.min(defender.shield);
        defender.shield -= report.absorbed;
    }

    let (hp_loss, immortal_saved, revived) = take_hp(defender, raw - report.absorbed);
    report.hp_loss = hp_loss;
    report.immortal_saved = immortal_saved;
    report.revived = revived;
    attacker.damage_dealt += hp_loss;

    let steal_ratio = attacker.buff_total(BuffKind::Lifesteal);
    if steal_ratio > 0.0 && hp_loss > 0 {
        let (healed, _) = attacker.heal((hp_loss as f64 * steal_ratio).round() as i64);
        report.lifesteal = healed;
    }

    // Counters come from a defender still standing and use pre-shield damage
    let counter_ratio = defender.buff_max(BuffKind::Counter);
    let can_counter = !defender.is_defeated() && !attacker.has_buff(BuffKind::Invincible);
    if counter_ratio > 0.0 && raw > 0 && can_counter {
        let amount = ((raw as f64 * counter_ratio).round() as i64).max(1);
        let (loss, _, _) = take_hp(attacker, amount);
        defender.damage_dealt += loss;
        report.counter = loss;
    }

    report
}
