//! Battle execution loop
//!
//! Each tick: pending first strikes -> scheduler -> (activation -> victory check)
//!
//! Activation: count down own buffs and cooldowns -> regen -> stunned? skip :
//! (skill chosen by AI -> basic attack)

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::ai::select_skill;
use crate::battle::buff::BuffKind;
use crate::battle::combatant::BattleCombatant;
use crate::battle::effect::GrowthStat;
use crate::battle::resolution::ActionContext;
use crate::battle::scheduler::{apply_first_strike, ActionScheduler, TickOutcome};
use crate::catalog::Catalog;
use crate::core::config::BattleConfig;
use crate::core::error::Result;
use crate::core::types::{Side, Turn};
use crate::instance::Instance;

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Ready, // Built, no tick yet
    Active,   // Scheduler running
    Finished, // Winner decided
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Player,
    Enemy,
    Draw,
}

impl Winner {
    pub fn name(&self) -> &'static str {
        match self {
            Winner::Player => "player",
            Winner::Enemy => "enemy",
            Winner::Draw => "draw",
        }
    }
}

/// Log entry for battle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    pub turn: Turn,
    /// Side whose activation produced the event
    pub actor: Option<Side>,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEventType {
    BattleStarted,
    FirstStrike,
    Stunned,
    Regen { amount: i64 },
    SkillUsed { slot: u8, skill_id: String },
    BasicAttack,
    Hit { damage: i64, absorbed: i64 },
    Dodged,
    Blocked,
    Critical,
    Healed { amount: i64 },
    ShieldGained { amount: i64 },
    BuffApplied { kind: BuffKind },
    StunApplied { turns: u32 },
    Lifesteal { amount: i64 },
    Counter { amount: i64 },
    ImmortalSaved,
    ReviveArmed,
    Revived { hp: i64 },
    EvadePrimed,
    FirstStrikeArmed,
    Grew { stat: GrowthStat, amount: f64 },
    Swapped,
    TurnLimitReached,
    BattleEnded { winner: Winner },
}

/// Ordered battle log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        turn: Turn,
        actor: Option<Side>,
        event_type: BattleEventType,
        description: String,
    ) {
        self.events.push(BattleEvent {
            turn,
            actor,
            event_type,
            description,
        });
    }

    /// Human-readable lines in order
    pub fn lines(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|e| format!("[T{}] {}", e.turn, e.description))
            .collect()
    }
}

/// End-of-battle figures for one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideSummary {
    pub name: String,
    pub final_hp: i64,
    pub max_hp: i64,
    pub damage_dealt: i64,
    pub skills_used: u32,
}

impl SideSummary {
    fn of(combatant: &BattleCombatant) -> Self {
        Self {
            name: combatant.name.clone(),
            final_hp: combatant.hp,
            max_hp: combatant.max_hp,
            damage_dealt: combatant.damage_dealt,
            skills_used: combatant.skills_used,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleResult {
    pub winner: Winner,
    pub turns: Turn,
    pub player: SideSummary,
    pub enemy: SideSummary,
    pub log: Vec<BattleEvent>,
}

impl BattleResult {
    pub fn log_lines(&self) -> Vec<String> {
        self.log
            .iter()
            .map(|e| format!("[T{}] {}", e.turn, e.description))
            .collect()
    }
}

/// Complete battle state
#[derive(Debug, Clone)]
pub struct BattleState {
    pub player: BattleCombatant,
    pub enemy: BattleCombatant,
    pub scheduler: ActionScheduler,
    pub config: BattleConfig,

    /// Activations so far
    pub turn: Turn,
    pub phase: BattlePhase,
    pub winner: Option<Winner>,
    pub log: BattleEventLog,
}

impl BattleState {
    pub fn new(player: BattleCombatant, enemy: BattleCombatant, config: BattleConfig) -> Self {
        let scheduler = ActionScheduler::new(&player, &enemy);
        let mut log = BattleEventLog::new();
        log.push(
            0,
            None,
            BattleEventType::BattleStarted,
            format!("{} vs {}", player.name, enemy.name),
        );
        Self {
            player,
            enemy,
            scheduler,
            config,
            turn: 0,
            phase: BattlePhase::Ready,
            winner: None,
            log,
        }
    }

    /// Build combatants from two instances
    pub fn from_instances(
        player: &Instance,
        enemy: &Instance,
        catalog: &Catalog,
        config: BattleConfig,
    ) -> Result<Self> {
        let player = BattleCombatant::from_instance(player, Side::Player, catalog)?;
        let enemy = BattleCombatant::from_instance(enemy, Side::Enemy, catalog)?;
        Ok(Self::new(player, enemy, config))
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BattlePhase::Finished
    }

    pub fn combatant(&self, side: Side) -> &BattleCombatant {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// One scheduler tick; returns the side that acted, if any
    pub fn tick(&mut self, rng: &mut impl Rng) -> Option<Side> {
        if self.is_finished() {
            return None;
        }
        self.phase = BattlePhase::Active;

        self.resolve_first_strikes();

        match self.scheduler.tick(&mut self.player, &mut self.enemy, rng) {
            TickOutcome::Advanced => None,
            TickOutcome::Act(side) => {
                self.activate(side, rng);
                if let Some(winner) = self.check_victory() {
                    self.finish(winner);
                }
                Some(side)
            }
        }
    }

    /// Tick until someone acts or the battle is over
    pub fn step(&mut self, rng: &mut impl Rng) -> Option<Side> {
        while !self.is_finished() {
            if let Some(side) = self.tick(rng) {
                return Some(side);
            }
        }
        None
    }

    /// Run to completion
    pub fn run(mut self, rng: &mut impl Rng) -> BattleResult {
        while !self.is_finished() {
            self.step(rng);
        }
        self.into_result()
    }

    fn resolve_first_strikes(&mut self) {
        let min_gauge = self.config.first_strike_min_gauge;
        for side in [Side::Player, Side::Enemy] {
            let (actor, opponent) = self.sides_mut(side);
            if apply_first_strike(actor, opponent, min_gauge) {
                let description = format!("{} strikes first", actor.name);
                self.log
                    .push(self.turn, Some(side), BattleEventType::FirstStrike, description);
            }
        }
    }

    fn sides_mut(&mut self, side: Side) -> (&mut BattleCombatant, &mut BattleCombatant) {
        match side {
            Side::Player => (&mut self.player, &mut self.enemy),
            Side::Enemy => (&mut self.enemy, &mut self.player),
        }
    }

    /// One activation of `side`
    fn activate(&mut self, side: Side, rng: &mut impl Rng) {
        self.turn += 1;
        let turn = self.turn;
        let BattleState {
            player,
            enemy,
            config,
            log,
            ..
        } = self;
        let (actor, target) = match side {
            Side::Player => (player, enemy),
            Side::Enemy => (enemy, player),
        };

        actor.tick_buffs();
        actor.tick_cooldowns();

        let regen = actor.buff_total(BuffKind::Regen);
        if regen > 0.0 {
            let (healed, _) = actor.heal((actor.max_hp as f64 * regen).round() as i64);
            if healed > 0 {
                let description = format!("{} regenerated {} HP", actor.name, healed);
                log.push(turn, Some(side), BattleEventType::Regen { amount: healed }, description);
            }
        }

        if actor.stun_turns > 0 {
            actor.stun_turns -= 1;
            let description = format!("{} is stunned and cannot act", actor.name);
            log.push(turn, Some(side), BattleEventType::Stunned, description);
            return;
        }

        let choice = select_skill(actor, target, config.ai_jitter, rng);
        let mut ctx = ActionContext {
            actor,
            target,
            config,
            rng,
            log,
            turn,
        };

        if let Some(idx) = choice {
            let skill = ctx.actor.skills[idx].clone();
            ctx.actor.mark_used(idx);
            let description = format!("{} uses {} ({})", ctx.actor.name, skill.name, skill.grade);
            ctx.log.push(
                turn,
                Some(side),
                BattleEventType::SkillUsed {
                    slot: skill.slot,
                    skill_id: skill.id.clone(),
                },
                description,
            );
            ctx.apply_effect(&skill.id, &skill.effect);
        }

        if !ctx.actor.is_defeated() && !ctx.target.is_defeated() {
            ctx.basic_attack();
        }
    }

    /// Victory rules, checked after every activation
    pub fn check_victory(&self) -> Option<Winner> {
        match (self.player.is_defeated(), self.enemy.is_defeated()) {
            (true, true) => Some(Winner::Draw),
            (true, false) => Some(Winner::Enemy),
            (false, true) => Some(Winner::Player),
            (false, false) if self.turn >= self.config.max_turns => Some(Winner::Enemy),
            (false, false) => None,
        }
    }

    fn finish(&mut self, winner: Winner) {
        if !self.player.is_defeated() && !self.enemy.is_defeated() {
            self.log.push(
                self.turn,
                None,
                BattleEventType::TurnLimitReached,
                format!("Turn limit {} reached", self.config.max_turns),
            );
        }
        self.winner = Some(winner);
        self.phase = BattlePhase::Finished;
        self.log.push(
            self.turn,
            None,
            BattleEventType::BattleEnded { winner },
            format!("Battle over: {}", winner.name()),
        );
        debug!(
            "Battle finished after {} turns: {} ({} HP {}, {} HP {})",
            self.turn,
            winner.name(),
            self.player.name,
            self.player.hp,
            self.enemy.name,
            self.enemy.hp
        );
    }

    /// Summarize the battle; an unfinished battle counts as an enemy win
    pub fn into_result(self) -> BattleResult {
        BattleResult {
            winner: self.winner.unwrap_or(Winner::Enemy),
            turns: self.turn,
            player: SideSummary::of(&self.player),
            enemy: SideSummary::of(&self.enemy),
            log: self.log.events,
        }
    }
}

/// Run a whole battle between two instances
pub fn run_battle(
    player: &Instance,
    enemy: &Instance,
    catalog: &Catalog,
    config: &BattleConfig,
    rng: &mut impl Rng,
) -> Result<BattleResult> {
    let state = BattleState::from_instances(player, enemy, catalog, config.clone())?;
    Ok(state.run(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::buff::Buff;
    use crate::battle::combatant::UsableSkill;
    use crate::battle::effect::Effect;
    use crate::catalog::Grade;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fighter(side: Side, hp: i64, atk: f64, ms: f64) -> BattleCombatant {
        BattleCombatant::new(side, format!("{:?}", side), hp, atk, ms, Vec::new())
    }

    #[test]
    fn test_battle_terminates_with_winner() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let state = BattleState::new(
            fighter(Side::Player, 100, 15.0, 10.0),
            fighter(Side::Enemy, 100, 10.0, 10.0),
            BattleConfig::default(),
        );
        let result = state.run(&mut rng);
        assert!(result.turns <= 50);
        assert!(matches!(
            result.log.last().map(|e| &e.event_type),
            Some(BattleEventType::BattleEnded { .. })
        ));
    }

    #[test]
    fn test_turn_limit_gives_enemy_the_win() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let state = BattleState::new(
            fighter(Side::Player, 100_000, 1.0, 10.0),
            fighter(Side::Enemy, 100_000, 1.0, 10.0),
            BattleConfig::default(),
        );
        let result = state.run(&mut rng);
        assert_eq!(result.winner, Winner::Enemy);
        assert_eq!(result.turns, 50);
        assert!(result
            .log
            .iter()
            .any(|e| e.event_type == BattleEventType::TurnLimitReached));
    }

    #[test]
    fn test_tick_exposes_single_steps() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = BattleState::new(
            fighter(Side::Player, 100, 10.0, 10.0),
            fighter(Side::Enemy, 100, 10.0, 10.0),
            BattleConfig::default(),
        );
        for _ in 0..20 {
            assert_eq!(state.tick(&mut rng), None);
        }
        assert!(state.tick(&mut rng).is_some());
        assert_eq!(state.turn, 1);
        assert_eq!(state.phase, BattlePhase::Active);
    }

    #[test]
    fn test_stunned_actor_skips_turn() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = BattleState::new(
            fighter(Side::Player, 100, 10.0, 10.0),
            fighter(Side::Enemy, 100, 10.0, 1.0),
            BattleConfig::default(),
        );
        state.player.stun_turns = 1;
        assert_eq!(state.step(&mut rng), Some(Side::Player));
        assert_eq!(state.enemy.hp, 100);
        assert_eq!(state.player.stun_turns, 0);
        assert_eq!(state.step(&mut rng), Some(Side::Player));
        assert_eq!(state.enemy.hp, 90);
    }

    #[test]
    fn test_double_knockout_is_draw() {
        let mut state = BattleState::new(
            fighter(Side::Player, 10, 10.0, 10.0),
            fighter(Side::Enemy, 10, 10.0, 10.0),
            BattleConfig::default(),
        );
        state.player.hp = 0;
        state.enemy.hp = -5;
        assert_eq!(state.check_victory(), Some(Winner::Draw));
    }

    #[test]
    fn test_first_strike_skill_jumps_queue() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let skill = UsableSkill {
            slot: 3,
            id: "s3_first".into(),
            name: "Quickstep".into(),
            grade: Grade::Rare,
            cooldown: 10,
            effect: Effect::FirstStrike,
        };
        let mut player = fighter(Side::Player, 1000, 1.0, 5.0);
        player.skills.push(skill);
        let enemy = fighter(Side::Enemy, 1000, 1.0, 10.0);
        let mut config = BattleConfig::default();
        config.ai_jitter = 0.0;
        let mut state = BattleState::new(player, enemy, config);

        // enemy is faster and acts first; the player's first activation arms first strike
        let mut order = Vec::new();
        while order.len() < 4 {
            if let Some(side) = state.step(&mut rng) {
                order.push(side);
            }
        }
        let first_player = order.iter().position(|s| *s == Side::Player).unwrap();
        assert_eq!(order[first_player + 1], Side::Player);
    }

    #[test]
    fn test_regen_heals_at_activation_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = BattleState::new(
            fighter(Side::Player, 100, 1.0, 10.0),
            fighter(Side::Enemy, 100, 1.0, 1.0),
            BattleConfig::default(),
        );
        state.player.hp = 50;
        state.player.add_buff(Buff::for_turns(BuffKind::Regen, 0.1, 3, "x"));
        state.step(&mut rng);
        assert_eq!(state.player.hp, 60);
    }
}
