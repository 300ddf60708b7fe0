//! Battle constants - fixed values of the combat model
//!
//! Tunable balance numbers (turn limit, jitter, overheal rate) live in
//! `core::config::BattleConfig` instead.

// Scheduling
/// Gauge gained per advancing tick is `current_ms / GAUGE_DIVISOR`
pub const GAUGE_DIVISOR: f64 = 10.0;
/// Effective atk and ms never drop below this, so gauges always advance
pub const MIN_EFFECTIVE_STAT: f64 = 1.0;

// Skills
pub const SKILL_SLOTS: usize = 3;

// AI priority scoring
pub const RECOVERY_PRIORITY_SCALE: f64 = 100.0;
pub const OFFENSE_PRIORITY_BASE: f64 = 50.0;
pub const OFFENSE_PRIORITY_SCALE: f64 = 100.0;
pub const UTILITY_PRIORITY_BASE: f64 = 40.0;
pub const UTILITY_PRIORITY_SCALE: f64 = 100.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_divisor_positive() {
        assert!(GAUGE_DIVISOR > 0.0);
        assert!(MIN_EFFECTIVE_STAT > 0.0);
    }

    #[test]
    fn test_offense_outranks_utility_at_rest() {
        assert!(OFFENSE_PRIORITY_BASE > UTILITY_PRIORITY_BASE);
    }
}
