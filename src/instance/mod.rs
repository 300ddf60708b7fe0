//! Instance model - one generated creature
//!
//! An instance is created once (by the generation engine or direct
//! construction) and never mutated afterwards except for its name and
//! flags. Stats, appearance, abilities and mutation provenance are private
//! so `power_score` can never drift from `stats`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogKind, Grade, ABILITY_SLOTS};
use crate::core::error::{ArenaError, Result};
use crate::core::types::InstanceId;

/// Combat stats, all strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub atk: u32,
    pub ms: u32,
}

impl Stats {
    pub fn new(hp: u32, atk: u32, ms: u32) -> Self {
        Self { hp, atk, ms }
    }

    /// Linear combat-strength summary: `hp + atk*10 + ms*5`
    pub fn power_score(&self) -> u32 {
        self.hp + self.atk * 10 + self.ms * 5
    }

    pub fn get(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::Hp => self.hp,
            StatKind::Atk => self.atk,
            StatKind::Ms => self.ms,
        }
    }

    pub fn set(&mut self, stat: StatKind, value: u32) {
        match stat {
            StatKind::Hp => self.hp = value,
            StatKind::Atk => self.atk = value,
            StatKind::Ms => self.ms = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Hp,
    Atk,
    Ms,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [StatKind::Hp, StatKind::Atk, StatKind::Ms];
}

/// A catalog reference together with its grade
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GradedId {
    pub grade: Grade,
    pub id: String,
}

impl GradedId {
    pub fn new(grade: Grade, id: impl Into<String>) -> Self {
        Self {
            grade,
            id: id.into(),
        }
    }
}

/// Appearance slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppearanceSlot {
    MainColor,
    SubColor,
    PatternColor,
    Pattern,
}

impl AppearanceSlot {
    pub const ALL: [AppearanceSlot; 4] = [
        AppearanceSlot::MainColor,
        AppearanceSlot::SubColor,
        AppearanceSlot::PatternColor,
        AppearanceSlot::Pattern,
    ];

    /// Which catalog this slot draws from
    pub fn catalog_kind(&self) -> CatalogKind {
        match self {
            AppearanceSlot::Pattern => CatalogKind::Pattern,
            _ => CatalogKind::Color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub main_color: GradedId,
    pub sub_color: GradedId,
    pub pattern_color: GradedId,
    pub pattern: GradedId,
}

impl Appearance {
    /// Every slot set to the Normal baseline
    pub fn baseline() -> Self {
        let base = GradedId::new(Grade::Normal, crate::catalog::BASELINE_ID);
        Self {
            main_color: base.clone(),
            sub_color: base.clone(),
            pattern_color: base.clone(),
            pattern: base,
        }
    }

    pub fn get(&self, slot: AppearanceSlot) -> &GradedId {
        match slot {
            AppearanceSlot::MainColor => &self.main_color,
            AppearanceSlot::SubColor => &self.sub_color,
            AppearanceSlot::PatternColor => &self.pattern_color,
            AppearanceSlot::Pattern => &self.pattern,
        }
    }

    pub fn set(&mut self, slot: AppearanceSlot, value: GradedId) {
        match slot {
            AppearanceSlot::MainColor => self.main_color = value,
            AppearanceSlot::SubColor => self.sub_color = value,
            AppearanceSlot::PatternColor => self.pattern_color = value,
            AppearanceSlot::Pattern => self.pattern = value,
        }
    }
}

/// Up to three equipped abilities; an empty slot is `None`, never a placeholder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    pub ability_1: Option<GradedId>,
    pub ability_2: Option<GradedId>,
    pub ability_3: Option<GradedId>,
}

impl Abilities {
    pub fn new(
        ability_1: Option<GradedId>,
        ability_2: Option<GradedId>,
        ability_3: Option<GradedId>,
    ) -> Self {
        Self {
            ability_1,
            ability_2,
            ability_3,
        }
    }

    /// Ability in slot 1..=3 (out-of-range slots are empty)
    pub fn get(&self, slot: u8) -> Option<&GradedId> {
        match slot {
            1 => self.ability_1.as_ref(),
            2 => self.ability_2.as_ref(),
            3 => self.ability_3.as_ref(),
            _ => None,
        }
    }

    pub fn set(&mut self, slot: u8, value: Option<GradedId>) {
        match slot {
            1 => self.ability_1 = value,
            2 => self.ability_2 = value,
            3 => self.ability_3 = value,
            _ => {}
        }
    }

    /// Occupied slots in slot order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &GradedId)> {
        (1..=ABILITY_SLOTS).filter_map(move |slot| self.get(slot).map(|a| (slot, a)))
    }
}

/// Fields a mutation round can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationField {
    Hp,
    Atk,
    Ms,
    MainColor,
    SubColor,
    PatternColor,
    Pattern,
    #[serde(rename = "ability_1")]
    Ability1,
    #[serde(rename = "ability_2")]
    Ability2,
    #[serde(rename = "ability_3")]
    Ability3,
}

impl MutationField {
    pub fn stat(stat: StatKind) -> Self {
        match stat {
            StatKind::Hp => MutationField::Hp,
            StatKind::Atk => MutationField::Atk,
            StatKind::Ms => MutationField::Ms,
        }
    }

    pub fn appearance(slot: AppearanceSlot) -> Self {
        match slot {
            AppearanceSlot::MainColor => MutationField::MainColor,
            AppearanceSlot::SubColor => MutationField::SubColor,
            AppearanceSlot::PatternColor => MutationField::PatternColor,
            AppearanceSlot::Pattern => MutationField::Pattern,
        }
    }

    /// `None` for slots outside 1..=3
    pub fn ability(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(MutationField::Ability1),
            2 => Some(MutationField::Ability2),
            3 => Some(MutationField::Ability3),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MutationField::Hp => "hp",
            MutationField::Atk => "atk",
            MutationField::Ms => "ms",
            MutationField::MainColor => "main_color",
            MutationField::SubColor => "sub_color",
            MutationField::PatternColor => "pattern_color",
            MutationField::Pattern => "pattern",
            MutationField::Ability1 => "ability_1",
            MutationField::Ability2 => "ability_2",
            MutationField::Ability3 => "ability_3",
        }
    }
}

/// Which fields mutated during breeding, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub count: u32,
    pub fields: Vec<MutationField>,
}

impl MutationRecord {
    pub fn from_fields(fields: Vec<MutationField>) -> Self {
        Self {
            count: fields.len() as u32,
            fields,
        }
    }
}

/// A generated creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "InstanceRecord")]
pub struct Instance {
    id: InstanceId,
    pub name: String,
    stats: Stats,
    power_score: u32,
    appearance: Appearance,
    abilities: Abilities,
    mutation: MutationRecord,
    pub is_locked: bool,
    pub is_favorite: bool,
    created_by: String,
    birth_time: DateTime<Utc>,
}

/// Build a fresh instance with no mutation history
pub fn create_base(
    stats: Stats,
    appearance: Appearance,
    abilities: Abilities,
    name: impl Into<String>,
    created_by: impl Into<String>,
) -> Instance {
    Instance {
        id: InstanceId::new(),
        name: name.into(),
        stats,
        power_score: stats.power_score(),
        appearance,
        abilities,
        mutation: MutationRecord::default(),
        is_locked: false,
        is_favorite: false,
        created_by: created_by.into(),
        birth_time: Utc::now(),
    }
}

impl Instance {
    /// Attach breeding provenance to a freshly built instance
    pub(crate) fn with_mutation(mut self, mutation: MutationRecord) -> Self {
        self.mutation = mutation;
        self
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn power_score(&self) -> u32 {
        self.power_score
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn abilities(&self) -> &Abilities {
        &self.abilities
    }

    pub fn mutation(&self) -> &MutationRecord {
        &self.mutation
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn birth_time(&self) -> DateTime<Utc> {
        self.birth_time
    }

    /// Check every reference and invariant against a catalog
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        let s = self.stats;
        if s.hp == 0 || s.atk == 0 || s.ms == 0 {
            return Err(ArenaError::InvalidInstance(format!(
                "{}: stats must be positive (hp {}, atk {}, ms {})",
                self.name, s.hp, s.atk, s.ms
            )));
        }
        if self.power_score != s.power_score() {
            return Err(ArenaError::InvalidInstance(format!(
                "{}: power_score {} does not match stats ({})",
                self.name,
                self.power_score,
                s.power_score()
            )));
        }
        if self.mutation.count as usize != self.mutation.fields.len() {
            return Err(ArenaError::InvalidInstance(format!(
                "{}: mutation count {} but {} fields recorded",
                self.name,
                self.mutation.count,
                self.mutation.fields.len()
            )));
        }

        for slot in AppearanceSlot::ALL {
            let item = self.appearance.get(slot);
            catalog.get_by_id(slot.catalog_kind(), &item.id)?;
        }

        for (slot, graded) in self.abilities.iter() {
            let ability = catalog.ability(&graded.id).ok_or_else(|| ArenaError::CatalogMiss {
                kind: CatalogKind::Ability,
                id: graded.id.clone(),
            })?;
            if ability.slot != slot {
                return Err(ArenaError::InvalidInstance(format!(
                    "{}: ability '{}' belongs in slot {}, found in slot {}",
                    self.name, ability.id, ability.slot, slot
                )));
            }
        }

        Ok(())
    }
}

fn default_birth_time() -> DateTime<Utc> {
    Utc::now()
}

/// Stored shape of an instance
///
/// Older records may lack flags, mutation provenance or a birth time;
/// those load with defaults. The stored `power_score` is ignored and
/// recomputed from stats.
#[derive(Debug, Deserialize)]
struct InstanceRecord {
    id: InstanceId,
    name: String,
    stats: Stats,
    appearance: Appearance,
    #[serde(default)]
    abilities: Abilities,
    #[serde(default)]
    mutation: MutationRecord,
    #[serde(default)]
    is_locked: bool,
    #[serde(default)]
    is_favorite: bool,
    #[serde(default)]
    created_by: String,
    #[serde(default = "default_birth_time")]
    birth_time: DateTime<Utc>,
}

impl From<InstanceRecord> for Instance {
    fn from(record: InstanceRecord) -> Self {
        Instance {
            id: record.id,
            name: record.name,
            power_score: record.stats.power_score(),
            stats: record.stats,
            appearance: record.appearance,
            abilities: record.abilities,
            mutation: record.mutation,
            is_locked: record.is_locked,
            is_favorite: record.is_favorite,
            created_by: record.created_by,
            birth_time: record.birth_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Instance {
        create_base(
            Stats::new(120, 12, 15),
            Appearance::baseline(),
            Abilities::new(
                Some(GradedId::new(Grade::Normal, "s1_normal01")),
                None,
                Some(GradedId::new(Grade::Rare, "s3_rare02")),
            ),
            "Sample",
            "tester",
        )
    }

    #[test]
    fn test_power_score_formula() {
        let inst = sample();
        assert_eq!(inst.power_score(), 120 + 12 * 10 + 15 * 5);
        assert_eq!(inst.power_score(), inst.stats().power_score());
    }

    #[test]
    fn test_create_base_has_no_mutation() {
        let inst = sample();
        assert_eq!(inst.mutation().count, 0);
        assert!(inst.mutation().fields.is_empty());
        assert!(!inst.is_locked);
        assert!(!inst.is_favorite);
        assert_eq!(inst.created_by(), "tester");
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let inst = sample().with_mutation(MutationRecord::from_fields(vec![
            MutationField::Ms,
            MutationField::Ability3,
            MutationField::Hp,
        ]));
        let json = serde_json::to_string(&inst).unwrap();
        assert!(json.contains("\"ability_2\":null"));
        assert!(json.contains("\"fields\":[\"ms\",\"ability_3\",\"hp\"]"));

        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inst);
    }

    #[test]
    fn test_legacy_record_loads_with_defaults() {
        let json = format!(
            r#"{{
                "id": "{}",
                "name": "Old",
                "stats": {{"hp": 10, "atk": 1, "ms": 1}},
                "power_score": 10,
                "appearance": {{
                    "main_color": {{"grade": "Normal", "id": "normal01"}},
                    "sub_color": {{"grade": "Normal", "id": "normal01"}},
                    "pattern_color": {{"grade": "Normal", "id": "normal01"}},
                    "pattern": {{"grade": "Normal", "id": "normal01"}}
                }}
            }}"#,
            InstanceId::new()
        );
        let inst: Instance = serde_json::from_str(&json).unwrap();
        assert!(!inst.is_locked);
        assert!(!inst.is_favorite);
        assert_eq!(inst.mutation(), &MutationRecord::default());
        assert_eq!(inst.abilities(), &Abilities::default());
        // stale stored score is replaced
        assert_eq!(inst.power_score(), 25);
    }

    #[test]
    fn test_validate_against_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert!(sample().validate(&catalog).is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_ability() {
        let catalog = Catalog::builtin();
        let inst = create_base(
            Stats::new(10, 1, 1),
            Appearance::baseline(),
            Abilities::new(None, Some(GradedId::new(Grade::Epic, "s2_missing")), None),
            "Broken",
            "tester",
        );
        assert!(matches!(
            inst.validate(&catalog),
            Err(ArenaError::CatalogMiss { kind: CatalogKind::Ability, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_wrong_slot() {
        let catalog = Catalog::builtin();
        let inst = create_base(
            Stats::new(10, 1, 1),
            Appearance::baseline(),
            Abilities::new(Some(GradedId::new(Grade::Normal, "s2_normal01")), None, None),
            "Misplaced",
            "tester",
        );
        assert!(matches!(inst.validate(&catalog), Err(ArenaError::InvalidInstance(_))));
    }

    #[test]
    fn test_ability_field_only_for_real_slots() {
        assert_eq!(MutationField::ability(1), Some(MutationField::Ability1));
        assert_eq!(MutationField::ability(3), Some(MutationField::Ability3));
        assert_eq!(MutationField::ability(0), None);
        assert_eq!(MutationField::ability(4), None);
    }

    #[test]
    fn test_abilities_iter_skips_empty_slots() {
        let inst = sample();
        let slots: Vec<u8> = inst.abilities().iter().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![1, 3]);
    }
}
