//! Catalog registry for color, pattern and ability definitions.
//!
//! The catalog is read-only once built. Generation only ever needs
//! lookup-by-id and filter-by-grade (plus slot for abilities), so the
//! registry keeps per-grade id lists in registration order. That order is
//! what makes seeded generation reproducible.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::grade::Grade;
use crate::battle::effect::Effect;
use crate::core::error::{ArenaError, Result};

/// Id of the canonical Normal baseline color and pattern
pub const BASELINE_ID: &str = "normal01";

/// Number of ability slots on an instance
pub const ABILITY_SLOTS: u8 = 3;

/// Kinds of catalog definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Color,
    Pattern,
    Ability,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogKind::Color => f.write_str("color"),
            CatalogKind::Pattern => f.write_str("pattern"),
            CatalogKind::Ability => f.write_str("ability"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorDef {
    pub id: String,
    pub grade: Grade,
    pub name: String,
    pub hex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDef {
    pub id: String,
    pub grade: Grade,
    pub layout: String,
}

/// A learnable ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: String,
    pub name: String,
    pub grade: Grade,
    /// Slot 1..=3 this ability can occupy
    pub slot: u8,
    /// Owner activations before the ability is ready again
    #[serde(default)]
    pub cooldown: u32,
    pub effect: Effect,
}

/// Borrowed view of any catalog definition
#[derive(Debug, Clone, Copy)]
pub enum CatalogEntry<'a> {
    Color(&'a ColorDef),
    Pattern(&'a PatternDef),
    Ability(&'a AbilityDef),
}

impl CatalogEntry<'_> {
    pub fn grade(&self) -> Grade {
        match self {
            CatalogEntry::Color(c) => c.grade,
            CatalogEntry::Pattern(p) => p.grade,
            CatalogEntry::Ability(a) => a.grade,
        }
    }
}

/// On-disk layout of a catalog file
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    colors: Vec<ColorDef>,
    #[serde(default)]
    patterns: Vec<PatternDef>,
    #[serde(default)]
    abilities: Vec<AbilityDef>,
}

/// Registry of every definition an instance may reference
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    colors: AHashMap<String, ColorDef>,
    patterns: AHashMap<String, PatternDef>,
    abilities: AHashMap<String, AbilityDef>,
    /// Ids per kind and grade, in registration order
    by_grade: AHashMap<(CatalogKind, Grade), Vec<String>>,
    /// Ability ids per grade and slot, in registration order
    by_slot: AHashMap<(Grade, u8), Vec<String>>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&mut self, kind: CatalogKind, grade: Grade, id: &str) {
        let ids = self.by_grade.entry((kind, grade)).or_default();
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }

    fn unindex(&mut self, kind: CatalogKind, grade: Grade, id: &str) {
        if let Some(ids) = self.by_grade.get_mut(&(kind, grade)) {
            ids.retain(|existing| existing != id);
        }
    }

    pub fn register_color(&mut self, color: ColorDef) {
        if let Some(old) = self.colors.get(&color.id) {
            let (grade, id) = (old.grade, old.id.clone());
            self.unindex(CatalogKind::Color, grade, &id);
        }
        self.index(CatalogKind::Color, color.grade, &color.id);
        self.colors.insert(color.id.clone(), color);
    }

    pub fn register_pattern(&mut self, pattern: PatternDef) {
        if let Some(old) = self.patterns.get(&pattern.id) {
            let (grade, id) = (old.grade, old.id.clone());
            self.unindex(CatalogKind::Pattern, grade, &id);
        }
        self.index(CatalogKind::Pattern, pattern.grade, &pattern.id);
        self.patterns.insert(pattern.id.clone(), pattern);
    }

    /// Register an ability; slots outside 1..=3 are rejected
    pub fn register_ability(&mut self, ability: AbilityDef) -> Result<()> {
        if ability.slot == 0 || ability.slot > ABILITY_SLOTS {
            return Err(ArenaError::InvalidConfig(format!(
                "ability '{}' declares slot {} (expected 1..={})",
                ability.id, ability.slot, ABILITY_SLOTS
            )));
        }

        if let Some(old) = self.abilities.get(&ability.id) {
            let (grade, slot, id) = (old.grade, old.slot, old.id.clone());
            self.unindex(CatalogKind::Ability, grade, &id);
            if let Some(ids) = self.by_slot.get_mut(&(grade, slot)) {
                ids.retain(|existing| existing != &id);
            }
        }

        self.index(CatalogKind::Ability, ability.grade, &ability.id);
        self.by_slot
            .entry((ability.grade, ability.slot))
            .or_default()
            .push(ability.id.clone());
        self.abilities.insert(ability.id.clone(), ability);
        Ok(())
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        let mut catalog = Self::new();
        for color in file.colors {
            catalog.register_color(color);
        }
        for pattern in file.patterns {
            catalog.register_pattern(pattern);
        }
        for ability in file.abilities {
            catalog.register_ability(ability)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a TOML file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::debug!(
            "Loaded catalog from {}: {} colors, {} patterns, {} abilities",
            path.display(),
            catalog.colors.len(),
            catalog.patterns.len(),
            catalog.abilities.len()
        );
        Ok(catalog)
    }

    pub fn color(&self, id: &str) -> Option<&ColorDef> {
        self.colors.get(id)
    }

    pub fn pattern(&self, id: &str) -> Option<&PatternDef> {
        self.patterns.get(id)
    }

    pub fn ability(&self, id: &str) -> Option<&AbilityDef> {
        self.abilities.get(id)
    }

    /// Look up any definition, failing with a catalog miss
    pub fn get_by_id(&self, kind: CatalogKind, id: &str) -> Result<CatalogEntry<'_>> {
        let entry = match kind {
            CatalogKind::Color => self.colors.get(id).map(CatalogEntry::Color),
            CatalogKind::Pattern => self.patterns.get(id).map(CatalogEntry::Pattern),
            CatalogKind::Ability => self.abilities.get(id).map(CatalogEntry::Ability),
        };
        entry.ok_or_else(|| ArenaError::CatalogMiss {
            kind,
            id: id.to_string(),
        })
    }

    pub fn contains(&self, kind: CatalogKind, id: &str) -> bool {
        match kind {
            CatalogKind::Color => self.colors.contains_key(id),
            CatalogKind::Pattern => self.patterns.contains_key(id),
            CatalogKind::Ability => self.abilities.contains_key(id),
        }
    }

    /// All ids of a kind with the given grade
    pub fn list_ids(&self, kind: CatalogKind, grade: Grade) -> &[String] {
        self.by_grade
            .get(&(kind, grade))
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Ability ids with the given grade that fit the given slot
    pub fn list_ability_ids(&self, grade: Grade, slot: u8) -> &[String] {
        self.by_slot
            .get(&(grade, slot))
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// First Normal ability registered for a slot
    pub fn baseline_ability(&self, slot: u8) -> Option<&AbilityDef> {
        self.list_ability_ids(Grade::Normal, slot)
            .first()
            .and_then(|id| self.abilities.get(id))
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn ability_count(&self) -> usize {
        self.abilities.len()
    }

    /// Iterate over every ability definition (unordered)
    pub fn abilities(&self) -> impl Iterator<Item = &AbilityDef> {
        self.abilities.values()
    }
}
