//! Parameterized generation - boxes, rewards and starters
//!
//! Builds instances from explicit constraints instead of parents. Grades
//! are drawn with the inheritance weight table, limited to the allowed
//! set. There is no mutation step.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{Catalog, CatalogKind, Grade, ABILITY_SLOTS, BASELINE_ID};
use crate::core::error::{ArenaError, Result};
use crate::genetics::inheritance::{weighted_pick, Candidate};
use crate::instance::{create_base, Abilities, Appearance, AppearanceSlot, GradedId, Instance, Stats};

/// Share of a power budget spent on each stat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatApportionment {
    pub hp: f64,
    pub atk: f64,
    pub ms: f64,
}

impl Default for StatApportionment {
    fn default() -> Self {
        Self {
            hp: 0.5,
            atk: 0.3,
            ms: 0.2,
        }
    }
}

impl StatApportionment {
    pub fn validate(&self) -> Result<()> {
        if self.hp <= 0.0 || self.atk <= 0.0 || self.ms <= 0.0 {
            return Err(ArenaError::InvalidConfig(
                "stat apportionment shares must be positive".into(),
            ));
        }
        let total = self.hp + self.atk + self.ms;
        if (total - 1.0).abs() > 1e-6 {
            return Err(ArenaError::InvalidConfig(format!(
                "stat apportionment must sum to 1 (got {})",
                total
            )));
        }
        Ok(())
    }
}

/// Reverse-engineer stats whose power score lands on `target`
///
/// atk and ms take their share first (rounded, at least 1); hp absorbs the
/// remainder so the score is exact whenever the budget allows it.
pub fn stats_from_power(target: u32, apportionment: &StatApportionment) -> Stats {
    let target_f = target as f64;
    let atk = ((target_f * apportionment.atk / 10.0).round() as u32).max(1);
    let ms = ((target_f * apportionment.ms / 5.0).round() as u32).max(1);
    let hp = (target as i64 - (atk as i64) * 10 - (ms as i64) * 5).max(1) as u32;
    Stats::new(hp, atk, ms)
}

/// Inclusive stat range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: u32,
    pub max: u32,
}

impl StatRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn roll(&self, rng: &mut impl Rng) -> u32 {
        let lo = self.min.max(1);
        let hi = self.max.max(lo);
        rng.gen_range(lo..=hi)
    }
}

/// How stats are produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatSpec {
    Ranges {
        hp: StatRange,
        atk: StatRange,
        ms: StatRange,
    },
    PowerBudget {
        target: u32,
        apportionment: StatApportionment,
    },
}

impl StatSpec {
    pub fn resolve(&self, rng: &mut impl Rng) -> Stats {
        match self {
            StatSpec::Ranges { hp, atk, ms } => Stats::new(hp.roll(rng), atk.roll(rng), ms.roll(rng)),
            StatSpec::PowerBudget {
                target,
                apportionment,
            } => stats_from_power(*target, apportionment),
        }
    }
}

/// Inputs to `generate_parameterized`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConstraints {
    pub stats: StatSpec,
    /// Grades allowed for the three color slots
    pub color_grades: Vec<Grade>,
    pub pattern_grades: Vec<Grade>,
    /// Allowed grades per ability slot; an empty list leaves the slot empty
    pub ability_grades: [Vec<Grade>; 3],
    pub name: String,
    pub created_by: String,
}

/// Grade-weighted draw over every id whose grade is allowed
fn pick_graded(
    ids_for: impl Fn(Grade) -> Vec<String>,
    allowed: &[Grade],
    rng: &mut impl Rng,
) -> Option<GradedId> {
    let candidates: Vec<Candidate<Grade>> = allowed
        .iter()
        .copied()
        .filter(|grade| !ids_for(*grade).is_empty())
        .map(|grade| Candidate::new(grade, grade.weight()))
        .collect();
    let grade = *weighted_pick(&candidates, rng)?;
    let ids = ids_for(grade);
    ids.choose(rng).map(|id| GradedId::new(grade, id.clone()))
}

fn pick_appearance_item(
    slot: AppearanceSlot,
    allowed: &[Grade],
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> GradedId {
    let kind = slot.catalog_kind();
    pick_graded(|g| catalog.list_ids(kind, g).to_vec(), allowed, rng).unwrap_or_else(|| {
        warn!(
            "No {} entries for grades {:?}, using baseline",
            kind, allowed
        );
        GradedId::new(Grade::Normal, BASELINE_ID)
    })
}

/// Build an instance from explicit constraints
pub fn generate_parameterized(
    constraints: &GenerationConstraints,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> Instance {
    let stats = constraints.stats.resolve(rng);

    let mut appearance = Appearance::baseline();
    for slot in AppearanceSlot::ALL {
        let allowed = match slot.catalog_kind() {
            CatalogKind::Pattern => &constraints.pattern_grades,
            _ => &constraints.color_grades,
        };
        appearance.set(slot, pick_appearance_item(slot, allowed, catalog, rng));
    }

    let mut abilities = Abilities::default();
    for slot in 1..=ABILITY_SLOTS {
        let allowed = &constraints.ability_grades[(slot - 1) as usize];
        if allowed.is_empty() {
            continue;
        }
        let ability = pick_graded(|g| catalog.list_ability_ids(g, slot).to_vec(), allowed, rng);
        abilities.set(slot, ability);
    }

    create_base(
        stats,
        appearance,
        abilities,
        constraints.name.clone(),
        constraints.created_by.clone(),
    )
}

/// The two weakest possible instances, handed to new accounts
pub fn starter_pair() -> (Instance, Instance) {
    let make = |name: &str| {
        create_base(
            Stats::new(10, 1, 1),
            Appearance::baseline(),
            Abilities::default(),
            name,
            "system",
        )
    };
    (make("Starter A"), make("Starter B"))
}

/// Box presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxTier {
    Basic,
    Premium,
    Mythic,
}

impl BoxTier {
    pub fn name(&self) -> &'static str {
        match self {
            BoxTier::Basic => "Basic Box",
            BoxTier::Premium => "Premium Box",
            BoxTier::Mythic => "Mythic Box",
        }
    }

    pub fn constraints(&self, created_by: &str) -> GenerationConstraints {
        use Grade::*;
        let (stats, colors, patterns, abilities) = match self {
            BoxTier::Basic => (
                StatSpec::Ranges {
                    hp: StatRange::new(40, 80),
                    atk: StatRange::new(3, 8),
                    ms: StatRange::new(3, 8),
                },
                vec![Normal, Rare],
                vec![Normal],
                [vec![Normal, Rare], vec![Normal], vec![]],
            ),
            BoxTier::Premium => (
                StatSpec::Ranges {
                    hp: StatRange::new(80, 160),
                    atk: StatRange::new(8, 16),
                    ms: StatRange::new(6, 14),
                },
                vec![Rare, Epic, Unique],
                vec![Normal, Rare, Epic],
                [vec![Rare, Epic], vec![Rare, Epic, Unique], vec![Normal, Rare]],
            ),
            BoxTier::Mythic => (
                StatSpec::Ranges {
                    hp: StatRange::new(160, 260),
                    atk: StatRange::new(16, 26),
                    ms: StatRange::new(12, 22),
                },
                vec![Unique, Legendary, Mystic],
                vec![Epic, Unique, Legendary, Mystic],
                [
                    vec![Unique, Legendary, Mystic],
                    vec![Unique, Legendary, Mystic],
                    vec![Epic, Unique, Legendary, Mystic],
                ],
            ),
        };
        GenerationConstraints {
            stats,
            color_grades: colors,
            pattern_grades: patterns,
            ability_grades: abilities,
            name: self.name().to_string(),
            created_by: created_by.to_string(),
        }
    }
}

pub fn open_box(tier: BoxTier, created_by: &str, catalog: &Catalog, rng: &mut impl Rng) -> Instance {
    generate_parameterized(&tier.constraints(created_by), catalog, rng)
}
