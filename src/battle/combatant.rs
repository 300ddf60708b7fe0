//! Battle-scoped state wrapped around an instance
//!
//! Created at battle start and dropped with the battle. Nothing here is
//! written back to the instance.

use serde::{Deserialize, Serialize};

use crate::battle::buff::{Buff, BuffKind};
use crate::battle::constants::{MIN_EFFECTIVE_STAT, SKILL_SLOTS};
use crate::battle::effect::Effect;
use crate::catalog::{Catalog, CatalogKind, Grade};
use crate::core::error::{ArenaError, Result};
use crate::core::types::Side;
use crate::instance::Instance;

/// An equipped ability resolved against the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsableSkill {
    pub slot: u8,
    pub id: String,
    pub name: String,
    pub grade: Grade,
    pub cooldown: u32,
    pub effect: Effect,
}

impl UsableSkill {
    fn index(&self) -> usize {
        (self.slot as usize).saturating_sub(1).min(SKILL_SLOTS - 1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleCombatant {
    pub side: Side,
    pub name: String,

    // Vitals
    pub hp: i64,
    pub max_hp: i64,
    pub shield: i64,

    // Base stats; grow and swap effects change these for the rest of the battle
    pub base_atk: f64,
    pub base_ms: f64,

    pub buffs: Vec<Buff>,
    pub skills: Vec<UsableSkill>,
    /// Activations left before each slot is ready again
    pub cooldowns: [u32; SKILL_SLOTS],
    pub mystic_used: [bool; SKILL_SLOTS],

    // Scheduling and one-shot flags
    pub gauge: f64,
    pub stun_turns: u32,
    pub first_strike: bool,
    pub evade_next: Option<f64>,
    /// Armed revive, as a fraction of max HP
    pub revive: Option<f64>,

    // Summary counters
    pub damage_dealt: i64,
    pub skills_used: u32,
}

impl BattleCombatant {
    /// Wrap an instance, resolving its abilities against the catalog
    pub fn from_instance(instance: &Instance, side: Side, catalog: &Catalog) -> Result<Self> {
        let mut skills = Vec::new();
        for (slot, graded) in instance.abilities().iter() {
            let def = catalog.ability(&graded.id).ok_or_else(|| ArenaError::CatalogMiss {
                kind: CatalogKind::Ability,
                id: graded.id.clone(),
            })?;
            skills.push(UsableSkill {
                slot,
                id: def.id.clone(),
                name: def.name.clone(),
                grade: def.grade,
                cooldown: def.cooldown,
                effect: def.effect,
            });
        }

        let stats = instance.stats();
        Ok(Self::new(
            side,
            instance.name.clone(),
            stats.hp as i64,
            stats.atk as f64,
            stats.ms as f64,
            skills,
        ))
    }

    pub fn new(
        side: Side,
        name: impl Into<String>,
        hp: i64,
        atk: f64,
        ms: f64,
        skills: Vec<UsableSkill>,
    ) -> Self {
        Self {
            side,
            name: name.into(),
            hp,
            max_hp: hp,
            shield: 0,
            base_atk: atk,
            base_ms: ms,
            buffs: Vec::new(),
            skills,
            cooldowns: [0; SKILL_SLOTS],
            mystic_used: [false; SKILL_SLOTS],
            gauge: 0.0,
            stun_turns: 0,
            first_strike: false,
            evade_next: None,
            revive: None,
            damage_dealt: 0,
            skills_used: 0,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp.max(0) as f64 / self.max_hp as f64).clamp(0.0, 1.0)
    }

    /// Sum of magnitudes of every active buff of a kind
    pub fn buff_total(&self, kind: BuffKind) -> f64 {
        self.buffs
            .iter()
            .filter(|b| b.kind == kind && !b.is_expired())
            .map(|b| b.magnitude)
            .sum()
    }

    /// Largest magnitude among active buffs of a kind
    pub fn buff_max(&self, kind: BuffKind) -> f64 {
        self.buffs
            .iter()
            .filter(|b| b.kind == kind && !b.is_expired())
            .map(|b| b.magnitude)
            .fold(0.0, f64::max)
    }

    pub fn has_buff(&self, kind: BuffKind) -> bool {
        self.buffs.iter().any(|b| b.kind == kind && !b.is_expired())
    }

    pub fn add_buff(&mut self, buff: Buff) {
        self.buffs.push(buff);
    }

    pub fn current_atk(&self) -> f64 {
        let modifier = 1.0 + self.buff_total(BuffKind::AtkUp) - self.buff_total(BuffKind::AtkDown);
        (self.base_atk * modifier).max(MIN_EFFECTIVE_STAT)
    }

    pub fn current_ms(&self) -> f64 {
        let modifier = 1.0 + self.buff_total(BuffKind::MsUp) - self.buff_total(BuffKind::MsDown);
        (self.base_ms * modifier).max(MIN_EFFECTIVE_STAT)
    }

    /// Count down timed buffs and drop the ones that ran out
    pub fn tick_buffs(&mut self) {
        for buff in &mut self.buffs {
            buff.tick();
        }
        self.buffs.retain(|b| !b.is_expired());
    }

    pub fn tick_cooldowns(&mut self) {
        for cooldown in &mut self.cooldowns {
            *cooldown = cooldown.saturating_sub(1);
        }
    }

    /// Restore HP up to max; returns `(healed, overflow)`
    pub fn heal(&mut self, amount: i64) -> (i64, i64) {
        if amount <= 0 || self.is_defeated() {
            return (0, 0);
        }
        let missing = self.max_hp - self.hp;
        let healed = amount.min(missing).max(0);
        self.hp += healed;
        (healed, amount - healed)
    }

    /// Off cooldown and, for Mystic skills, not used yet this battle
    pub fn is_skill_ready(&self, skill: &UsableSkill) -> bool {
        let idx = skill.index();
        self.cooldowns[idx] == 0 && !(skill.grade == Grade::Mystic && self.mystic_used[idx])
    }

    /// Put a skill on cooldown after use
    pub fn mark_used(&mut self, skill_idx: usize) {
        let Some(skill) = self.skills.get(skill_idx) else {
            return;
        };
        let idx = skill.index();
        self.cooldowns[idx] = skill.cooldown;
        if skill.grade == Grade::Mystic {
            self.mystic_used[idx] = true;
        }
        self.skills_used += 1;
    }
}
