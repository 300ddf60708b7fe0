//! Stage encounters and rewards
//!
//! Thin consumers of the generator. Enemy power follows a geometric curve
//! over stages with a multiplier on boss stages; a boss reward targets the
//! boss power times the reward multiplier.

use rand::Rng;
use tracing::debug;

use crate::catalog::{Catalog, Grade};
use crate::core::config::RewardConfig;
use crate::genetics::generator::{generate_parameterized, GenerationConstraints, StatSpec};
use crate::instance::Instance;

/// Stage from which each ability slot is filled on regular enemies
const SLOT_UNLOCK_STAGES: [u32; 3] = [1, 5, 10];

pub fn is_boss_stage(stage: u32, config: &RewardConfig) -> bool {
    stage > 0 && stage.checked_rem(config.boss_interval) == Some(0)
}

/// Target power of the enemy on a stage (stages count from 1)
pub fn stage_enemy_power(stage: u32, config: &RewardConfig) -> u32 {
    let stage = stage.max(1);
    let mut power = config.stage_base_power as f64 * config.stage_growth.powi(stage as i32 - 1);
    if is_boss_stage(stage, config) {
        power *= config.boss_multiplier;
    }
    power.round() as u32
}

/// Grades allowed for items on an instance of this power
pub fn grades_for_power(power: u32) -> Vec<Grade> {
    use Grade::*;
    match power {
        0..=299 => vec![Normal],
        300..=599 => vec![Normal, Rare],
        600..=999 => vec![Rare, Epic],
        1000..=1999 => vec![Epic, Unique],
        2000..=3999 => vec![Unique, Legendary],
        _ => vec![Legendary, Mystic],
    }
}

fn constraints_for(
    target: u32,
    ability_slots: [bool; 3],
    config: &RewardConfig,
    name: String,
    created_by: &str,
) -> GenerationConstraints {
    let grades = grades_for_power(target);
    let slot_grades = |open: bool| if open { grades.clone() } else { Vec::new() };
    GenerationConstraints {
        stats: StatSpec::PowerBudget {
            target,
            apportionment: config.apportionment,
        },
        color_grades: grades.clone(),
        pattern_grades: grades.clone(),
        ability_grades: [
            slot_grades(ability_slots[0]),
            slot_grades(ability_slots[1]),
            slot_grades(ability_slots[2]),
        ],
        name,
        created_by: created_by.to_string(),
    }
}

/// The opponent for a stage
pub fn stage_enemy(stage: u32, config: &RewardConfig, catalog: &Catalog, rng: &mut impl Rng) -> Instance {
    let stage = stage.max(1);
    let target = stage_enemy_power(stage, config);
    let boss = is_boss_stage(stage, config);
    let slots = if boss {
        [true; 3]
    } else {
        SLOT_UNLOCK_STAGES.map(|unlock| stage >= unlock)
    };
    let name = if boss {
        format!("Stage {} Boss", stage)
    } else {
        format!("Stage {} Enemy", stage)
    };

    let enemy = generate_parameterized(&constraints_for(target, slots, config, name, "stage"), catalog, rng);
    debug!(
        "Stage {} enemy: target power {}, actual {}",
        stage,
        target,
        enemy.power_score()
    );
    enemy
}

/// Reward crafted for defeating a boss of `boss_power`
pub fn stage_reward(boss_power: u32, config: &RewardConfig, catalog: &Catalog, rng: &mut impl Rng) -> Instance {
    let target = (boss_power as f64 * config.reward_multiplier).round() as u32;
    let constraints = constraints_for(target, [true; 3], config, "Boss Reward".to_string(), "reward");
    let reward = generate_parameterized(&constraints, catalog, rng);
    debug!(
        "Reward for boss power {}: target {}, actual {}",
        boss_power,
        target,
        reward.power_score()
    );
    reward
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_boss_every_tenth_stage() {
        let config = RewardConfig::default();
        assert!(!is_boss_stage(0, &config));
        assert!(!is_boss_stage(9, &config));
        assert!(is_boss_stage(10, &config));
        assert!(is_boss_stage(20, &config));
    }

    #[test]
    fn test_zero_boss_interval_means_no_bosses() {
        let config = RewardConfig {
            boss_interval: 0,
            ..RewardConfig::default()
        };
        assert!(!is_boss_stage(10, &config));
        assert_eq!(stage_enemy_power(1, &config), 150);
    }

    #[test]
    fn test_power_curve_grows() {
        let config = RewardConfig::default();
        assert_eq!(stage_enemy_power(1, &config), 150);
        assert_eq!(stage_enemy_power(0, &config), 150);
        let mut last = 0;
        for stage in 1..=9 {
            let power = stage_enemy_power(stage, &config);
            assert!(power > last);
            last = power;
        }
        // boss spike on stage 10
        let regular = (150.0 * 1.12f64.powi(9)).round() as u32;
        let boss = stage_enemy_power(10, &config);
        assert_eq!(boss, (150.0 * 1.12f64.powi(9) * 1.5).round() as u32);
        assert!(boss > regular);
    }

    #[test]
    fn test_reward_targets_boss_power_times_multiplier() {
        let config = RewardConfig::default();
        let catalog = Catalog::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let reward = stage_reward(1000, &config, &catalog, &mut rng);
        assert_eq!(reward.power_score(), 1100);
        assert!(reward.abilities().ability_1.is_some());
        assert!(reward.validate(&catalog).is_ok());
    }

    #[test]
    fn test_early_enemy_has_only_first_slot() {
        let config = RewardConfig::default();
        let catalog = Catalog::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let enemy = stage_enemy(2, &config, &catalog, &mut rng);
        assert!(enemy.abilities().ability_1.is_some());
        assert!(enemy.abilities().ability_2.is_none());
        assert!(enemy.abilities().ability_3.is_none());
        assert_eq!(enemy.name, "Stage 2 Enemy");
    }

    #[test]
    fn test_grades_scale_with_power() {
        assert_eq!(grades_for_power(100), vec![Grade::Normal]);
        assert!(grades_for_power(5000).contains(&Grade::Mystic));
    }
}
