//! Battle system - one-on-one automated combat
//!
//! An action-threshold scheduler decides who acts; each activation uses at
//! most one skill picked by the AI, then one basic attack.
//!
//! Key properties:
//! - Deterministic for a given seed (all randomness goes through one `Rng`)
//! - Ends within `max_turns` activations
//! - `BattleState::tick` exposes single scheduler steps for live display

pub mod ai;
pub mod buff;
pub mod combatant;
pub mod constants;
pub mod damage;
pub mod effect;
pub mod execution;
pub mod resolution;
pub mod scheduler;

// Re-exports for convenient access
pub use ai::{select_skill, skill_priority};
pub use buff::{Buff, BuffKind, Expiry};
pub use combatant::{BattleCombatant, UsableSkill};
pub use constants::*;
pub use damage::{check_dodge, resolve_hit, HitReport};
pub use effect::{BattleStat, Effect, GrowthStat, HitKind, HpBasis};
pub use execution::{
    run_battle, BattleEvent, BattleEventLog, BattleEventType, BattlePhase, BattleResult,
    BattleState, SideSummary, Winner,
};
pub use resolution::ActionContext;
pub use scheduler::{apply_first_strike, ActionScheduler, TickOutcome};
