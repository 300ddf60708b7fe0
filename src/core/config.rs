//! Engine configuration with documented constants
//!
//! All tunable numbers for breeding, battle and reward generation are
//! collected here. Every section has a `Default` carrying the standard
//! balance values, so a TOML file only needs to list what it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{ArenaError, Result};
use crate::genetics::breeding::BreedingSettings;
use crate::genetics::generator::StatApportionment;

/// Battle tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Activation count after which the enemy side wins by timeout
    pub max_turns: u32,

    /// Lowest gauge a pending first strike can force
    ///
    /// The gauge is raised above the opponent's, and never below this.
    pub first_strike_min_gauge: f64,

    /// Half-width of the uniform jitter added to skill priority scores
    pub ai_jitter: f64,

    /// Fraction of overheal converted into shield
    pub overheal_shield_rate: f64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_turns: 50,
            first_strike_min_gauge: 100.0,
            ai_jitter: 10.0,
            overheal_shield_rate: 0.5,
        }
    }
}

/// Stage curve and reward crafting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Enemy power at stage 1
    pub stage_base_power: u32,

    /// Geometric growth of enemy power per stage
    ///
    /// At 1.12 the curve roughly triples every ten stages.
    pub stage_growth: f64,

    /// Every N-th stage is a boss stage
    pub boss_interval: u32,

    /// Power multiplier applied on boss stages
    pub boss_multiplier: f64,

    /// Reward instances target `boss_power * reward_multiplier`
    pub reward_multiplier: f64,

    /// How a power budget is split between hp, atk and ms
    pub apportionment: StatApportionment,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            stage_base_power: 150,
            stage_growth: 1.12,
            boss_interval: 10,
            boss_multiplier: 1.5,
            reward_multiplier: 1.1,
            apportionment: StatApportionment::default(),
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub breeding: BreedingSettings,
    pub battle: BattleConfig,
    pub rewards: RewardConfig,
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let b = &self.breeding;
        if !(0.0..=0.5).contains(&b.mutation_bonus) {
            return Err(ArenaError::InvalidConfig(format!(
                "mutation_bonus ({}) must be within [0, 0.5]",
                b.mutation_bonus
            )));
        }
        if !(3..=5).contains(&b.max_chain_mutations) {
            return Err(ArenaError::InvalidConfig(format!(
                "max_chain_mutations ({}) must be 3, 4 or 5",
                b.max_chain_mutations
            )));
        }

        let battle = &self.battle;
        if battle.max_turns == 0 {
            return Err(ArenaError::InvalidConfig("max_turns must be positive".into()));
        }
        if !(0.0..=1.0).contains(&battle.overheal_shield_rate) {
            return Err(ArenaError::InvalidConfig(format!(
                "overheal_shield_rate ({}) must be within [0, 1]",
                battle.overheal_shield_rate
            )));
        }
        if battle.ai_jitter < 0.0 || battle.first_strike_min_gauge < 0.0 {
            return Err(ArenaError::InvalidConfig(
                "ai_jitter and first_strike_min_gauge must not be negative".into(),
            ));
        }

        let r = &self.rewards;
        if r.stage_base_power == 0 || r.boss_interval == 0 {
            return Err(ArenaError::InvalidConfig(
                "stage_base_power and boss_interval must be positive".into(),
            ));
        }
        if r.stage_growth < 1.0 || r.boss_multiplier < 1.0 || r.reward_multiplier <= 0.0 {
            return Err(ArenaError::InvalidConfig(format!(
                "stage_growth ({}) and boss_multiplier ({}) must be >= 1, reward_multiplier ({}) > 0",
                r.stage_growth, r.boss_multiplier, r.reward_multiplier
            )));
        }
        r.apportionment.validate()?;

        Ok(())
    }
}

/// Load and validate an engine config from a TOML file
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = EngineConfig::from_toml_str(&content)?;
    tracing::debug!("Loaded engine config from {}", path.display());
    Ok(config)
}
