//! Built-in catalog
//!
//! The standard set of colors, patterns and abilities. Every grade has at
//! least one color and pattern, every grade/slot pair has at least one
//! ability, and every effect family is represented.

use super::grade::Grade;
use super::registry::{AbilityDef, Catalog, ColorDef, PatternDef};
use crate::battle::effect::{BattleStat, Effect, GrowthStat, HpBasis};

const COLORS: &[(&str, Grade, &str, &str)] = &[
    ("normal01", Grade::Normal, "Cream", "#F5F0E1"),
    ("normal02", Grade::Normal, "Ash", "#B2B2B2"),
    ("normal03", Grade::Normal, "Clay", "#B5651D"),
    ("normal04", Grade::Normal, "Moss", "#8A9A5B"),
    ("normal05", Grade::Normal, "Slate", "#708090"),
    ("normal06", Grade::Normal, "Sand", "#C2B280"),
    ("rare01", Grade::Rare, "Teal", "#2A9D8F"),
    ("rare02", Grade::Rare, "Coral", "#FF7F50"),
    ("rare03", Grade::Rare, "Lilac", "#C8A2C8"),
    ("rare04", Grade::Rare, "Amber", "#FFBF00"),
    ("epic01", Grade::Epic, "Crimson", "#DC143C"),
    ("epic02", Grade::Epic, "Cobalt", "#0047AB"),
    ("epic03", Grade::Epic, "Jade", "#00A86B"),
    ("unique01", Grade::Unique, "Obsidian", "#1B1B1B"),
    ("unique02", Grade::Unique, "Rose Gold", "#B76E79"),
    ("unique03", Grade::Unique, "Aurora", "#7FFFD4"),
    ("legend01", Grade::Legendary, "Solar Gold", "#FFD700"),
    ("legend02", Grade::Legendary, "Abyss", "#000080"),
    ("mystic01", Grade::Mystic, "Prism", "#E0B0FF"),
];

const PATTERNS: &[(&str, Grade, &str)] = &[
    ("normal01", Grade::Normal, "solid"),
    ("normal02", Grade::Normal, "spots"),
    ("normal03", Grade::Normal, "stripes"),
    ("normal04", Grade::Normal, "patch"),
    ("rare01", Grade::Rare, "checker"),
    ("rare02", Grade::Rare, "ring"),
    ("rare03", Grade::Rare, "zigzag"),
    ("epic01", Grade::Epic, "scales"),
    ("epic02", Grade::Epic, "flame"),
    ("unique01", Grade::Unique, "lightning"),
    ("unique02", Grade::Unique, "galaxy"),
    ("legend01", Grade::Legendary, "runes"),
    ("mystic01", Grade::Mystic, "void"),
];

fn abilities() -> Vec<AbilityDef> {
    use Effect::*;
    use Grade::*;

    let def = |id: &str, name: &str, grade: Grade, slot: u8, cooldown: u32, effect: Effect| {
        AbilityDef {
            id: id.to_string(),
            name: name.to_string(),
            grade,
            slot,
            cooldown,
            effect,
        }
    };

    vec![
        // Slot 1: recovery
        def("s1_normal01", "First Aid", Normal, 1, 3, Heal { percent: 0.10, overheal_shield: false }),
        def("s1_normal02", "Bandage", Normal, 1, 3, HealFromAtk { multiplier: 1.5, overheal_shield: false }),
        def("s1_normal03", "Rest", Normal, 1, 4, Regen { percent: 0.04, turns: 3 }),
        def("s1_normal04", "Hard Shell", Normal, 1, 4, Shield { percent: 0.08 }),
        def("s1_normal05", "Second Wind", Normal, 1, 3, Heal { percent: 0.08, overheal_shield: true }),
        def("s1_normal06", "Herbal Salve", Normal, 1, 3, HealFlat { amount: 25, overheal_shield: false }),
        def("s1_rare01", "Mending", Rare, 1, 3, Heal { percent: 0.15, overheal_shield: true }),
        def("s1_rare02", "Spring Water", Rare, 1, 4, Regen { percent: 0.06, turns: 3 }),
        def("s1_rare03", "Barrier", Rare, 1, 4, Shield { percent: 0.15 }),
        def("s1_rare04", "Leech Bite", Rare, 1, 3, LifeDrain { multiplier: 1.0, drain: 0.5 }),
        def("s1_rare05", "Steel Nerves", Rare, 1, 6, Immortal { turns: 1 }),
        def("s1_epic01", "Greater Heal", Epic, 1, 3, Heal { percent: 0.20, overheal_shield: true }),
        def("s1_epic02", "Vampiric Fang", Epic, 1, 4, LifeDrain { multiplier: 1.3, drain: 0.6 }),
        def("s1_epic03", "Lifeblood", Epic, 1, 5, Lifesteal { ratio: 0.3, turns: 3 }),
        def("s1_epic04", "Bulwark", Epic, 1, 5, Shield { percent: 0.25 }),
        def("s1_epic05", "Renewal", Epic, 1, 5, Regen { percent: 0.08, turns: 4 }),
        def("s1_unique01", "Rejuvenate", Unique, 1, 7, FullHeal { atk_penalty: 0.3, turns: 2 }),
        def("s1_unique02", "Last Stand", Unique, 1, 6, Immortal { turns: 2 }),
        def("s1_unique03", "Blood Pact", Unique, 1, 6, Lifesteal { ratio: 0.5, turns: 3 }),
        def("s1_unique04", "Overflow", Unique, 1, 4, HealFromAtk { multiplier: 3.0, overheal_shield: true }),
        def("s1_legend01", "Phoenix Feather", Legendary, 1, 10, Revive { hp_percent: 0.5 }),
        def("s1_legend02", "Sanctuary", Legendary, 1, 6, Invincible { turns: 1 }),
        def("s1_legend03", "Soul Exchange", Legendary, 1, 8, SwapHp),
        def("s1_mystic01", "Rebirth", Mystic, 1, 0, Revive { hp_percent: 1.0 }),
        def("s1_mystic02", "Eternal Spring", Mystic, 1, 0, Heal { percent: 0.5, overheal_shield: true }),
        // Slot 2: offense
        def("s2_normal01", "Tackle", Normal, 2, 2, Strike { multiplier: 1.3 }),
        def("s2_normal02", "Double Slap", Normal, 2, 3, MultiHit { hits: 2, multiplier: 0.7 }),
        def("s2_normal03", "Lucky Claw", Normal, 2, 2, CritStrike { multiplier: 1.0, crit_chance: 0.3, crit_multiplier: 2.0 }),
        def("s2_normal04", "Jab", Normal, 2, 3, TrueDamage { multiplier: 0.8, pierce_shield: false }),
        def("s2_normal05", "Headbutt", Normal, 2, 4, Stun { multiplier: 0.8, chance: 0.3, turns: 1 }),
        def("s2_rare01", "Power Strike", Rare, 2, 2, Strike { multiplier: 1.7 }),
        def("s2_rare02", "Triple Peck", Rare, 2, 3, MultiHit { hits: 3, multiplier: 0.6 }),
        def("s2_rare03", "Keen Edge", Rare, 2, 3, CritStrike { multiplier: 1.2, crit_chance: 0.4, crit_multiplier: 2.0 }),
        def("s2_rare04", "Gnaw", Rare, 2, 3, PercentDamage { percent: 0.08, basis: HpBasis::Current }),
        def("s2_rare05", "Drain Touch", Rare, 2, 3, LifeDrain { multiplier: 1.2, drain: 0.4 }),
        def("s2_rare06", "Weaken", Rare, 2, 4, StatDebuff { stat: BattleStat::Atk, percent: 0.2, turns: 3 }),
        def("s2_epic01", "Crushing Blow", Epic, 2, 3, Strike { multiplier: 2.2 }),
        def("s2_epic02", "Flurry", Epic, 2, 3, MultiHit { hits: 4, multiplier: 0.55 }),
        def("s2_epic03", "Piercing Fang", Epic, 2, 4, TrueDamage { multiplier: 1.3, pierce_shield: true }),
        def("s2_epic04", "Rend", Epic, 2, 4, PercentDamage { percent: 0.10, basis: HpBasis::Max }),
        def("s2_epic05", "Stunning Slam", Epic, 2, 4, Stun { multiplier: 1.2, chance: 0.6, turns: 1 }),
        def("s2_epic06", "Devour", Epic, 2, 4, Grow { multiplier: 1.2, stat: GrowthStat::Atk, ratio: 0.1 }),
        def("s2_unique01", "Assassinate", Unique, 2, 4, CritStrike { multiplier: 1.5, crit_chance: 0.5, crit_multiplier: 2.5 }),
        def("s2_unique02", "Void Lance", Unique, 2, 5, TrueDamage { multiplier: 1.8, pierce_shield: true }),
        def("s2_unique03", "Gorge", Unique, 2, 5, Grow { multiplier: 1.5, stat: GrowthStat::MaxHp, ratio: 0.5 }),
        def("s2_unique04", "Thunderclap", Unique, 2, 6, Stun { multiplier: 1.5, chance: 0.8, turns: 2 }),
        def("s2_legend01", "Meteor", Legendary, 2, 5, Strike { multiplier: 3.5 }),
        def("s2_legend02", "Hundred Fists", Legendary, 2, 5, MultiHit { hits: 6, multiplier: 0.5 }),
        def("s2_legend03", "Soul Siphon", Legendary, 2, 5, LifeDrain { multiplier: 2.0, drain: 1.0 }),
        def("s2_legend04", "Ascend", Legendary, 2, 5, Grow { multiplier: 2.0, stat: GrowthStat::Atk, ratio: 0.2 }),
        def("s2_mystic01", "Judgment", Mystic, 2, 0, PercentDamage { percent: 0.35, basis: HpBasis::Current }),
        def("s2_mystic02", "Oblivion", Mystic, 2, 0, TrueDamage { multiplier: 4.0, pierce_shield: true }),
        // Slot 3: utility and speed
        def("s3_normal01", "Quick Step", Normal, 3, 3, StatBuff { stat: BattleStat::Ms, percent: 0.2, turns: 3 }),
        def("s3_normal02", "Sidestep", Normal, 3, 3, EvadeNext { chance: 0.5 }),
        def("s3_normal03", "Growl", Normal, 3, 3, StatDebuff { stat: BattleStat::Atk, percent: 0.1, turns: 2 }),
        def("s3_normal04", "Focus", Normal, 3, 3, StatBuff { stat: BattleStat::Atk, percent: 0.15, turns: 3 }),
        def("s3_normal05", "Pounce", Normal, 3, 4, FirstStrike),
        def("s3_rare01", "Blur", Rare, 3, 4, Dodge { chance: 0.25, turns: 2 }),
        def("s3_rare02", "Thorns", Rare, 3, 4, Counter { ratio: 0.3, turns: 3 }),
        def("s3_rare03", "Slow", Rare, 3, 4, StatDebuff { stat: BattleStat::Ms, percent: 0.25, turns: 3 }),
        def("s3_rare04", "War Cry", Rare, 3, 4, StatBuff { stat: BattleStat::Atk, percent: 0.25, turns: 3 }),
        def("s3_rare05", "Afterimage", Rare, 3, 4, DodgeCharges { charges: 1 }),
        def("s3_epic01", "Haste", Epic, 3, 4, StatBuff { stat: BattleStat::Ms, percent: 0.4, turns: 3 }),
        def("s3_epic02", "Mirror Skin", Epic, 3, 5, Counter { ratio: 0.5, turns: 2 }),
        def("s3_epic03", "Phantom", Epic, 3, 5, DodgeCharges { charges: 2 }),
        def("s3_epic04", "Perfect Dodge", Epic, 3, 4, EvadeNext { chance: 1.0 }),
        def("s3_epic05", "Ambush", Epic, 3, 3, FirstStrike),
        def("s3_epic06", "Outrun", Epic, 3, 4, Grow { multiplier: 0.8, stat: GrowthStat::Ms, ratio: 0.05 }),
        def("s3_unique01", "Mist", Unique, 3, 5, Dodge { chance: 0.4, turns: 3 }),
        def("s3_unique02", "Time Warp", Unique, 3, 8, SwapStat { stat: BattleStat::Ms }),
        def("s3_unique03", "Intimidate", Unique, 3, 5, StatDebuff { stat: BattleStat::Atk, percent: 0.35, turns: 3 }),
        def("s3_unique04", "Reflect", Unique, 3, 6, Counter { ratio: 0.8, turns: 2 }),
        def("s3_legend01", "Divine Shield", Legendary, 3, 7, Invincible { turns: 2 }),
        def("s3_legend02", "Power Swap", Legendary, 3, 8, SwapStat { stat: BattleStat::Atk }),
        def("s3_legend03", "Shadow Dance", Legendary, 3, 6, DodgeCharges { charges: 3 }),
        def("s3_mystic01", "Time Stop", Mystic, 3, 0, Stun { multiplier: 0.0, chance: 1.0, turns: 2 }),
        def("s3_mystic02", "Transcend", Mystic, 3, 0, StatBuff { stat: BattleStat::Atk, percent: 1.0, turns: 3 }),
    ]
}

impl Catalog {
    /// The standard catalog shipped with the engine
    pub fn builtin() -> Self {
        let mut catalog = Catalog::new();

        for &(id, grade, name, hex) in COLORS {
            catalog.register_color(ColorDef {
                id: id.to_string(),
                grade,
                name: name.to_string(),
                hex: hex.to_string(),
            });
        }

        for &(id, grade, layout) in PATTERNS {
            catalog.register_pattern(PatternDef {
                id: id.to_string(),
                grade,
                layout: layout.to_string(),
            });
        }

        for ability in abilities() {
            if let Err(e) = catalog.register_ability(ability) {
                tracing::warn!("Skipping built-in ability: {}", e);
            }
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::registry::{CatalogKind, BASELINE_ID};

    #[test]
    fn test_every_grade_has_appearance_entries() {
        let catalog = Catalog::builtin();
        for grade in Grade::ALL {
            assert!(
                !catalog.list_ids(CatalogKind::Color, grade).is_empty(),
                "no {} colors",
                grade
            );
            assert!(
                !catalog.list_ids(CatalogKind::Pattern, grade).is_empty(),
                "no {} patterns",
                grade
            );
        }
    }

    #[test]
    fn test_every_grade_and_slot_has_abilities() {
        let catalog = Catalog::builtin();
        for grade in Grade::ALL {
            for slot in 1..=3 {
                assert!(
                    !catalog.list_ability_ids(grade, slot).is_empty(),
                    "no {} abilities for slot {}",
                    grade,
                    slot
                );
            }
        }
    }

    #[test]
    fn test_ability_ids_unique() {
        let defs = abilities();
        let mut ids: Vec<&str> = defs.iter().map(|a| a.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), defs.len());
        assert_eq!(Catalog::builtin().ability_count(), defs.len());
    }

    #[test]
    fn test_ability_ids_match_slot_prefix() {
        for ability in abilities() {
            assert!(
                ability.id.starts_with(&format!("s{}_", ability.slot)),
                "{} is registered for slot {}",
                ability.id,
                ability.slot
            );
        }
    }

    #[test]
    fn test_baselines_present() {
        let catalog = Catalog::builtin();
        assert!(catalog.color(BASELINE_ID).is_some());
        assert!(catalog.pattern(BASELINE_ID).is_some());
        assert_eq!(catalog.baseline_ability(1).unwrap().id, "s1_normal01");
        assert_eq!(catalog.baseline_ability(2).unwrap().id, "s2_normal01");
        assert_eq!(catalog.baseline_ability(3).unwrap().id, "s3_normal01");
    }
}
