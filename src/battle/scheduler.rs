//! Action-threshold scheduler
//!
//! Both gauges fill at `current_ms / 10` per tick. Once either gauge holds
//! at least the threshold (sum of both base ms values, fixed at start) the
//! higher one acts and pays the threshold. Nobody advances on a tick where
//! someone acts.

use rand::Rng;
use tracing::trace;

use crate::battle::combatant::BattleCombatant;
use crate::battle::constants::GAUGE_DIVISOR;
use crate::core::types::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Gauges advanced, nobody acted
    Advanced,
    Act(Side),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionScheduler {
    threshold: f64,
}

impl ActionScheduler {
    pub fn new(player: &BattleCombatant, enemy: &BattleCombatant) -> Self {
        Self {
            threshold: player.base_ms + enemy.base_ms,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Run one scheduler tick
    pub fn tick(
        &self,
        player: &mut BattleCombatant,
        enemy: &mut BattleCombatant,
        rng: &mut impl Rng,
    ) -> TickOutcome {
        let player_ready = player.gauge >= self.threshold;
        let enemy_ready = enemy.gauge >= self.threshold;

        if !player_ready && !enemy_ready {
            player.gauge += player.current_ms() / GAUGE_DIVISOR;
            enemy.gauge += enemy.current_ms() / GAUGE_DIVISOR;
            return TickOutcome::Advanced;
        }

        let side = if player.gauge > enemy.gauge {
            Side::Player
        } else if enemy.gauge > player.gauge {
            Side::Enemy
        } else if rng.gen_bool(0.5) {
            Side::Player
        } else {
            Side::Enemy
        };

        let actor = match side {
            Side::Player => player,
            Side::Enemy => enemy,
        };
        actor.gauge -= self.threshold;
        trace!("{} acts (gauge left {:.1})", actor.name, actor.gauge);
        TickOutcome::Act(side)
    }
}

/// Resolve a pending first strike: lift the gauge above the opponent's
pub fn apply_first_strike(actor: &mut BattleCombatant, opponent: &BattleCombatant, min_gauge: f64) -> bool {
    if !actor.first_strike {
        return false;
    }
    actor.first_strike = false;
    actor.gauge = (opponent.gauge + 1.0).max(min_gauge);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pair(player_ms: f64, enemy_ms: f64) -> (BattleCombatant, BattleCombatant) {
        (
            BattleCombatant::new(Side::Player, "P", 100, 10.0, player_ms, Vec::new()),
            BattleCombatant::new(Side::Enemy, "E", 100, 10.0, enemy_ms, Vec::new()),
        )
    }

    #[test]
    fn test_equal_speed_acts_after_twenty_ticks() {
        let (mut p, mut e) = pair(10.0, 10.0);
        let scheduler = ActionScheduler::new(&p, &e);
        assert_eq!(scheduler.threshold(), 20.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for _ in 0..20 {
            assert_eq!(scheduler.tick(&mut p, &mut e, &mut rng), TickOutcome::Advanced);
        }
        assert!(matches!(scheduler.tick(&mut p, &mut e, &mut rng), TickOutcome::Act(_)));
    }

    #[test]
    fn test_tie_break_is_roughly_even() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut player_first = 0;
        for _ in 0..2000 {
            let (mut p, mut e) = pair(10.0, 10.0);
            p.gauge = 20.0;
            e.gauge = 20.0;
            let scheduler = ActionScheduler::new(&p, &e);
            if scheduler.tick(&mut p, &mut e, &mut rng) == TickOutcome::Act(Side::Player) {
                player_first += 1;
            }
        }
        assert!((850..1150).contains(&player_first), "player first {}", player_first);
    }

    #[test]
    fn test_faster_side_acts_more() {
        let (mut p, mut e) = pair(20.0, 10.0);
        let scheduler = ActionScheduler::new(&p, &e);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut counts = [0u32; 2];
        let mut activations = 0;
        while activations < 30 {
            if let TickOutcome::Act(side) = scheduler.tick(&mut p, &mut e, &mut rng) {
                counts[side as usize] += 1;
                activations += 1;
            }
        }
        assert!(counts[0] >= 19 && counts[0] <= 21, "counts {:?}", counts);
    }

    #[test]
    fn test_first_strike_overtakes_opponent() {
        let (mut p, mut e) = pair(10.0, 10.0);
        e.gauge = 150.0;
        p.first_strike = true;
        assert!(apply_first_strike(&mut p, &e, 100.0));
        assert_eq!(p.gauge, 151.0);
        assert!(!p.first_strike);
        assert!(!apply_first_strike(&mut p, &e, 100.0));

        let (mut p, e) = pair(10.0, 10.0);
        p.first_strike = true;
        apply_first_strike(&mut p, &e, 100.0);
        assert_eq!(p.gauge, 100.0);
    }
}
