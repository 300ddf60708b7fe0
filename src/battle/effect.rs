//! Ability effects
//!
//! Every ability resolves through exactly one `Effect` variant. Variants are
//! grouped into families (recovery, offense, status, manipulation); the
//! numeric parameters carried by each variant are its whole contract.
//!
//! Dodge grouping: direct-damage effects (`Strike`, `MultiHit`, `CritStrike`,
//! `LifeDrain`, `Stun`, `Grow`) roll the defender's dodge once per hit.
//! `PercentDamage` and `TrueDamage` never do.

use serde::{Deserialize, Serialize};

/// Stats that buffs, debuffs and swaps can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStat {
    Atk,
    Ms,
}

/// Stats a grow effect can raise permanently (for the rest of the battle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStat {
    Atk,
    MaxHp,
    Ms,
}

/// Which HP pool a percentage effect is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HpBasis {
    Max,
    Current,
}

/// How an incoming hit interacts with dodge and shield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Rolls dodge, then shield absorbs
    Direct,
    /// Ignores dodge, shield still absorbs
    Unavoidable,
    /// Ignores dodge and shield
    Piercing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    // === RECOVERY ===
    /// Heal `percent` of max HP; excess becomes shield when `overheal_shield`
    Heal {
        percent: f64,
        #[serde(default)]
        overheal_shield: bool,
    },
    /// Heal `multiplier` x current attack
    HealFromAtk {
        multiplier: f64,
        #[serde(default)]
        overheal_shield: bool,
    },
    /// Heal a fixed number of HP
    HealFlat {
        amount: u32,
        #[serde(default)]
        overheal_shield: bool,
    },
    /// Heal `percent` of max HP at the start of each own activation
    Regen { percent: f64, turns: u32 },
    /// Gain a shield worth `percent` of max HP
    Shield { percent: f64 },
    /// Restore to full HP, then suffer an attack penalty
    FullHeal { atk_penalty: f64, turns: u32 },
    /// Arm a one-shot revive at `hp_percent` of max HP
    Revive { hp_percent: f64 },

    // === OFFENSE ===
    /// Single hit of `multiplier` x attack
    Strike { multiplier: f64 },
    /// `hits` separate hits, each rolling dodge
    MultiHit { hits: u32, multiplier: f64 },
    /// Single hit that crits with `crit_chance`
    CritStrike {
        multiplier: f64,
        crit_chance: f64,
        crit_multiplier: f64,
    },
    /// Single hit; heal `drain` x the damage that landed
    LifeDrain { multiplier: f64, drain: f64 },
    /// Fixed share of the target's HP, never dodged
    PercentDamage { percent: f64, basis: HpBasis },
    /// Attack-scaled damage that is never dodged
    TrueDamage {
        multiplier: f64,
        #[serde(default)]
        pierce_shield: bool,
    },
    /// Optional hit, then a stun chance when it lands
    Stun {
        multiplier: f64,
        chance: f64,
        turns: u32,
    },
    /// Hit that permanently raises a stat by `ratio` x damage landed
    Grow {
        multiplier: f64,
        stat: GrowthStat,
        ratio: f64,
    },

    // === STATUS ===
    StatBuff {
        stat: BattleStat,
        percent: f64,
        turns: u32,
    },
    /// Applied to the opponent
    StatDebuff {
        stat: BattleStat,
        percent: f64,
        turns: u32,
    },
    /// Probability dodge for a number of turns
    Dodge { chance: f64, turns: u32 },
    /// Banked guaranteed dodges, spent one per dodged hit
    DodgeCharges { charges: u32 },
    /// Prime the next incoming hit to be dodged with `chance`
    EvadeNext { chance: f64 },
    /// Reflect `ratio` of incoming damage back at the attacker
    Counter { ratio: f64, turns: u32 },
    Lifesteal { ratio: f64, turns: u32 },
    Invincible { turns: u32 },
    /// HP cannot drop below 1 while active
    Immortal { turns: u32 },

    // === MANIPULATION ===
    /// Exchange a base stat with the opponent
    SwapStat { stat: BattleStat },
    /// Exchange HP ratios with the opponent
    SwapHp,
    /// Act before the opponent at the next scheduling
    FirstStrike,
}

impl Effect {
    /// How hits from this effect interact with dodge and shield, if it hits at all
    pub fn hit_kind(&self) -> Option<HitKind> {
        match self {
            Effect::Strike { .. }
            | Effect::MultiHit { .. }
            | Effect::CritStrike { .. }
            | Effect::LifeDrain { .. }
            | Effect::Stun { .. }
            | Effect::Grow { .. } => Some(HitKind::Direct),
            Effect::PercentDamage { .. } => Some(HitKind::Unavoidable),
            Effect::TrueDamage { pierce_shield, .. } => Some(if *pierce_shield {
                HitKind::Piercing
            } else {
                HitKind::Unavoidable
            }),
            Effect::Heal { .. }
            | Effect::HealFromAtk { .. }
            | Effect::HealFlat { .. }
            | Effect::Regen { .. }
            | Effect::Shield { .. }
            | Effect::FullHeal { .. }
            | Effect::Revive { .. }
            | Effect::StatBuff { .. }
            | Effect::StatDebuff { .. }
            | Effect::Dodge { .. }
            | Effect::DodgeCharges { .. }
            | Effect::EvadeNext { .. }
            | Effect::Counter { .. }
            | Effect::Lifesteal { .. }
            | Effect::Invincible { .. }
            | Effect::Immortal { .. }
            | Effect::SwapStat { .. }
            | Effect::SwapHp
            | Effect::FirstStrike => None,
        }
    }

    /// True when the defender gets a dodge roll against this effect
    pub fn checks_dodge(&self) -> bool {
        self.hit_kind() == Some(HitKind::Direct)
    }

    pub fn deals_damage(&self) -> bool {
        match self {
            // A zero-multiplier stun is a pure control effect that still rolls dodge
            Effect::Stun { multiplier, .. } => *multiplier > 0.0,
            other => other.hit_kind().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_damage_checks_dodge() {
        let direct = [
            Effect::Strike { multiplier: 1.0 },
            Effect::MultiHit { hits: 2, multiplier: 0.5 },
            Effect::CritStrike {
                multiplier: 1.0,
                crit_chance: 0.5,
                crit_multiplier: 2.0,
            },
            Effect::LifeDrain { multiplier: 1.0, drain: 0.5 },
            Effect::Stun {
                multiplier: 1.0,
                chance: 0.5,
                turns: 1,
            },
            Effect::Grow {
                multiplier: 1.0,
                stat: GrowthStat::Atk,
                ratio: 0.1,
            },
        ];
        for effect in direct {
            assert!(effect.checks_dodge(), "{:?} should check dodge", effect);
        }
    }

    #[test]
    fn test_true_and_percent_damage_bypass_dodge() {
        let percent = Effect::PercentDamage {
            percent: 0.1,
            basis: HpBasis::Max,
        };
        let true_dmg = Effect::TrueDamage {
            multiplier: 1.0,
            pierce_shield: false,
        };
        let pierce = Effect::TrueDamage {
            multiplier: 1.0,
            pierce_shield: true,
        };
        assert!(!percent.checks_dodge());
        assert!(!true_dmg.checks_dodge());
        assert!(!pierce.checks_dodge());
        assert_eq!(percent.hit_kind(), Some(HitKind::Unavoidable));
        assert_eq!(pierce.hit_kind(), Some(HitKind::Piercing));
    }

    #[test]
    fn test_support_effects_deal_no_damage() {
        assert!(!Effect::Heal {
            percent: 0.1,
            overheal_shield: true
        }
        .deals_damage());
        assert!(!Effect::HealFlat {
            amount: 25,
            overheal_shield: false
        }
        .deals_damage());
        assert!(!Effect::SwapHp.deals_damage());
        assert!(!Effect::Stun {
            multiplier: 0.0,
            chance: 1.0,
            turns: 2
        }
        .deals_damage());
    }

    #[test]
    fn test_effect_json_tagging() {
        let effect = Effect::StatDebuff {
            stat: BattleStat::Ms,
            percent: 0.25,
            turns: 3,
        };
        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains("\"kind\":\"stat_debuff\""));
        assert!(json.contains("\"stat\":\"ms\""));

        let unit: Effect = serde_json::from_str(r#"{"kind":"first_strike"}"#).unwrap();
        assert_eq!(unit, Effect::FirstStrike);
    }
}
