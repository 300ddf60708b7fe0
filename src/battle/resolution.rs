//! Effect resolution - one activation's skill and basic attack
//!
//! Every `Effect` variant is handled in a single exhaustive match, so a new
//! effect does not compile until it has a rule here.

use rand::Rng;
use tracing::trace;

use crate::battle::buff::{Buff, BuffKind};
use crate::battle::combatant::BattleCombatant;
use crate::battle::damage::{check_dodge, resolve_hit, HitReport};
use crate::battle::effect::{BattleStat, Effect, GrowthStat, HitKind, HpBasis};
use crate::battle::execution::{BattleEventLog, BattleEventType};
use crate::core::config::BattleConfig;
use crate::core::types::Turn;

fn scaled(base: f64, multiplier: f64) -> i64 {
    (base * multiplier).round() as i64
}

/// Everything one activation can touch
pub struct ActionContext<'a, R: Rng> {
    pub actor: &'a mut BattleCombatant,
    pub target: &'a mut BattleCombatant,
    pub config: &'a BattleConfig,
    pub rng: &'a mut R,
    pub log: &'a mut BattleEventLog,
    pub turn: Turn,
}

impl<'a, R: Rng> ActionContext<'a, R> {
    fn log(&mut self, event_type: BattleEventType, description: String) {
        trace!("[T{}] {}", self.turn, description);
        self.log
            .push(self.turn, Some(self.actor.side), event_type, description);
    }

    /// Attack-scaled damage, at least 1
    fn atk_damage(&self, multiplier: f64) -> i64 {
        scaled(self.actor.current_atk(), multiplier).max(1)
    }

    /// One hit against the target; `None` when it was dodged
    fn hit(&mut self, raw: i64, kind: HitKind, roll_dodge: bool) -> Option<HitReport> {
        if kind == HitKind::Direct && roll_dodge && check_dodge(self.target, self.rng) {
            let description = format!("{} dodged the attack", self.target.name);
            self.log(BattleEventType::Dodged, description);
            return None;
        }

        let report = resolve_hit(self.actor, self.target, raw, kind);
        self.log_hit(&report);
        Some(report)
    }

    fn log_hit(&mut self, report: &HitReport) {
        let target = self.target.name.clone();
        let actor = self.actor.name.clone();

        if report.blocked {
            self.log(BattleEventType::Blocked, format!("{} is invincible, no damage", target));
            return;
        }

        let mut description = format!("{} took {} damage", target, report.hp_loss);
        if report.absorbed > 0 {
            description.push_str(&format!(" ({} absorbed by shield)", report.absorbed));
        }
        self.log(
            BattleEventType::Hit {
                damage: report.hp_loss,
                absorbed: report.absorbed,
            },
            description,
        );

        if report.immortal_saved {
            self.log(
                BattleEventType::ImmortalSaved,
                format!("{} refuses to fall (1 HP)", target),
            );
        }
        if report.revived {
            let hp = self.target.hp;
            self.log(BattleEventType::Revived { hp }, format!("{} revived with {} HP", target, hp));
        }
        if report.lifesteal > 0 {
            self.log(
                BattleEventType::Lifesteal {
                    amount: report.lifesteal,
                },
                format!("{} stole {} HP", actor, report.lifesteal),
            );
        }
        if report.counter > 0 {
            self.log(
                BattleEventType::Counter {
                    amount: report.counter,
                },
                format!("{} countered for {} damage", target, report.counter),
            );
        }
    }

    fn heal(&mut self, amount: i64, overheal_shield: bool) {
        let (healed, overflow) = self.actor.heal(amount);
        let name = self.actor.name.clone();
        self.log(
            BattleEventType::Healed { amount: healed },
            format!("{} recovered {} HP", name, healed),
        );
        if overheal_shield && overflow > 0 {
            self.gain_shield(scaled(overflow as f64, self.config.overheal_shield_rate));
        }
    }

    fn gain_shield(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        self.actor.shield += amount;
        let name = self.actor.name.clone();
        self.log(
            BattleEventType::ShieldGained { amount },
            format!("{} gained a {} point shield", name, amount),
        );
    }

    fn buff_self(&mut self, buff: Buff) {
        let kind = buff.kind;
        let description = format!("{} gained {}", self.actor.name, kind.name());
        self.actor.add_buff(buff);
        self.log(BattleEventType::BuffApplied { kind }, description);
    }

    fn debuff_target(&mut self, buff: Buff) {
        let kind = buff.kind;
        let description = format!("{} suffers {}", self.target.name, kind.name());
        self.target.add_buff(buff);
        self.log(BattleEventType::BuffApplied { kind }, description);
    }

    fn target_down(&self) -> bool {
        self.target.is_defeated()
    }

    /// A counter can drop the actor partway through its own skill
    fn actor_down(&self) -> bool {
        self.actor.is_defeated()
    }

    /// Always one plain hit of current attack
    pub fn basic_attack(&mut self) {
        let description = format!("{} attacks", self.actor.name);
        self.log(BattleEventType::BasicAttack, description);
        let raw = self.atk_damage(1.0);
        self.hit(raw, HitKind::Direct, true);
    }

    /// Resolve one skill effect
    pub fn apply_effect(&mut self, source: &str, effect: &Effect) {
        let kind = effect.hit_kind().unwrap_or(HitKind::Direct);

        match *effect {
            // === RECOVERY ===
            Effect::Heal {
                percent,
                overheal_shield,
            } => {
                let amount = scaled(self.actor.max_hp as f64, percent);
                self.heal(amount, overheal_shield);
            }
            Effect::HealFromAtk {
                multiplier,
                overheal_shield,
            } => {
                let amount = scaled(self.actor.current_atk(), multiplier);
                self.heal(amount, overheal_shield);
            }
            Effect::HealFlat {
                amount,
                overheal_shield,
            } => {
                self.heal(amount as i64, overheal_shield);
            }
            Effect::Regen { percent, turns } => {
                self.buff_self(Buff::for_turns(BuffKind::Regen, percent, turns, source));
            }
            Effect::Shield { percent } => {
                let amount = scaled(self.actor.max_hp as f64, percent);
                self.gain_shield(amount);
            }
            Effect::FullHeal { atk_penalty, turns } => {
                let missing = self.actor.max_hp - self.actor.hp;
                self.heal(missing, false);
                self.buff_self(Buff::for_turns(BuffKind::AtkDown, atk_penalty, turns, source));
            }
            Effect::Revive { hp_percent } => {
                self.actor.revive = Some(hp_percent);
                let name = self.actor.name.clone();
                self.log(
                    BattleEventType::ReviveArmed,
                    format!("{} will revive at {:.0}% HP", name, hp_percent * 100.0),
                );
            }

            // === OFFENSE ===
            Effect::Strike { multiplier } => {
                let raw = self.atk_damage(multiplier);
                self.hit(raw, kind, true);
            }
            Effect::MultiHit { hits, multiplier } => {
                for _ in 0..hits {
                    if self.target_down() || self.actor_down() {
                        break;
                    }
                    let raw = self.atk_damage(multiplier);
                    self.hit(raw, kind, true);
                }
            }
            Effect::CritStrike {
                multiplier,
                crit_chance,
                crit_multiplier,
            } => {
                let mut raw = self.atk_damage(multiplier);
                if self.rng.gen_bool(crit_chance.clamp(0.0, 1.0)) {
                    raw = scaled(raw as f64, crit_multiplier).max(1);
                    let name = self.actor.name.clone();
                    self.log(BattleEventType::Critical, format!("{} lands a critical hit", name));
                }
                self.hit(raw, kind, true);
            }
            Effect::LifeDrain { multiplier, drain } => {
                let raw = self.atk_damage(multiplier);
                if let Some(report) = self.hit(raw, kind, true) {
                    let amount = scaled(report.landed() as f64, drain);
                    if amount > 0 {
                        self.heal(amount, false);
                    }
                }
            }
            Effect::PercentDamage { percent, basis } => {
                let pool = match basis {
                    HpBasis::Max => self.target.max_hp,
                    HpBasis::Current => self.target.hp.max(0),
                };
                let raw = scaled(pool as f64, percent).max(1);
                self.hit(raw, kind, false);
            }
            Effect::TrueDamage { multiplier, .. } => {
                let raw = self.atk_damage(multiplier);
                self.hit(raw, kind, false);
            }
            Effect::Stun {
                multiplier,
                chance,
                turns,
            } => {
                if check_dodge(self.target, self.rng) {
                    let description = format!("{} dodged the stun", self.target.name);
                    self.log(BattleEventType::Dodged, description);
                    return;
                }
                if effect.deals_damage() {
                    let raw = self.atk_damage(multiplier);
                    self.hit(raw, kind, false);
                }
                let standing = !self.target_down() && !self.actor_down();
                if standing && self.rng.gen_bool(chance.clamp(0.0, 1.0)) {
                    self.target.stun_turns = self.target.stun_turns.max(turns);
                    let description =
                        format!("{} is stunned for {} turn(s)", self.target.name, turns);
                    self.log(BattleEventType::StunApplied { turns }, description);
                }
            }
            Effect::Grow {
                multiplier,
                stat,
                ratio,
            } => {
                let raw = self.atk_damage(multiplier);
                if let Some(report) = self.hit(raw, kind, true) {
                    let gain = report.landed() as f64 * ratio;
                    if gain > 0.0 && !self.actor_down() {
                        match stat {
                            GrowthStat::Atk => self.actor.base_atk += gain,
                            GrowthStat::Ms => self.actor.base_ms += gain,
                            GrowthStat::MaxHp => {
                                let gain = gain.round() as i64;
                                self.actor.max_hp += gain;
                                self.actor.hp += gain;
                            }
                        }
                        let name = self.actor.name.clone();
                        self.log(
                            BattleEventType::Grew { stat, amount: gain },
                            format!("{} grew {:?} by {:.1}", name, stat, gain),
                        );
                    }
                }
            }

            // === STATUS ===
            Effect::StatBuff {
                stat,
                percent,
                turns,
            } => {
                self.buff_self(Buff::for_turns(BuffKind::stat_up(stat), percent, turns, source));
            }
            Effect::StatDebuff {
                stat,
                percent,
                turns,
            } => {
                let debuff = Buff::for_turns(BuffKind::stat_down(stat), percent, turns, source);
                self.debuff_target(debuff);
            }
            Effect::Dodge { chance, turns } => {
                self.buff_self(Buff::for_turns(BuffKind::Dodge, chance, turns, source));
            }
            Effect::DodgeCharges { charges } => {
                self.buff_self(Buff::for_uses(BuffKind::DodgeCharge, 1.0, charges, source));
            }
            Effect::EvadeNext { chance } => {
                self.actor.evade_next = Some(chance);
                let name = self.actor.name.clone();
                self.log(
                    BattleEventType::EvadePrimed,
                    format!("{} readies an evasion ({:.0}%)", name, chance * 100.0),
                );
            }
            Effect::Counter { ratio, turns } => {
                self.buff_self(Buff::for_turns(BuffKind::Counter, ratio, turns, source));
            }
            Effect::Lifesteal { ratio, turns } => {
                self.buff_self(Buff::for_turns(BuffKind::Lifesteal, ratio, turns, source));
            }
            Effect::Invincible { turns } => {
                self.buff_self(Buff::for_turns(BuffKind::Invincible, 1.0, turns, source));
            }
            Effect::Immortal { turns } => {
                self.buff_self(Buff::for_turns(BuffKind::Immortal, 1.0, turns, source));
            }

            // === MANIPULATION ===
            Effect::SwapStat { stat } => {
                match stat {
                    BattleStat::Atk => {
                        std::mem::swap(&mut self.actor.base_atk, &mut self.target.base_atk)
                    }
                    BattleStat::Ms => {
                        std::mem::swap(&mut self.actor.base_ms, &mut self.target.base_ms)
                    }
                }
                let description =
                    format!("{} swapped {:?} with {}", self.actor.name, stat, self.target.name);
                self.log(BattleEventType::Swapped, description);
            }
            Effect::SwapHp => {
                let actor_ratio = self.actor.hp_ratio();
                let target_ratio = self.target.hp_ratio();
                self.actor.hp = scaled(self.actor.max_hp as f64, target_ratio).max(1);
                self.target.hp = scaled(self.target.max_hp as f64, actor_ratio).max(1);
                let description =
                    format!("{} swapped HP ratios with {}", self.actor.name, self.target.name);
                self.log(BattleEventType::Swapped, description);
            }
            Effect::FirstStrike => {
                self.actor.first_strike = true;
                let name = self.actor.name.clone();
                self.log(
                    BattleEventType::FirstStrikeArmed,
                    format!("{} prepares to strike first", name),
                );
            }
        }
    }
}
