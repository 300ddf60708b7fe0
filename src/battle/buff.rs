//! Timed and counted status effects on a combatant

use serde::{Deserialize, Serialize};

use crate::battle::effect::BattleStat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    AtkUp,
    AtkDown,
    MsUp,
    MsDown,
    /// Heal `magnitude` x max HP at the start of each own activation
    Regen,
    /// Probability dodge
    Dodge,
    /// Guaranteed dodge, one use per dodged hit
    DodgeCharge,
    Counter,
    Lifesteal,
    Invincible,
    Immortal,
}

impl BuffKind {
    pub fn stat_up(stat: BattleStat) -> Self {
        match stat {
            BattleStat::Atk => BuffKind::AtkUp,
            BattleStat::Ms => BuffKind::MsUp,
        }
    }

    pub fn stat_down(stat: BattleStat) -> Self {
        match stat {
            BattleStat::Atk => BuffKind::AtkDown,
            BattleStat::Ms => BuffKind::MsDown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuffKind::AtkUp => "ATK up",
            BuffKind::AtkDown => "ATK down",
            BuffKind::MsUp => "MS up",
            BuffKind::MsDown => "MS down",
            BuffKind::Regen => "regen",
            BuffKind::Dodge => "dodge",
            BuffKind::DodgeCharge => "dodge charge",
            BuffKind::Counter => "counter",
            BuffKind::Lifesteal => "lifesteal",
            BuffKind::Invincible => "invincible",
            BuffKind::Immortal => "immortal",
        }
    }
}

/// When a buff runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "remaining", rename_all = "snake_case")]
pub enum Expiry {
    /// Owner activations left
    Turns(u32),
    /// Triggers left
    Uses(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub kind: BuffKind,
    pub magnitude: f64,
    pub expiry: Expiry,
    /// Ability id that applied it
    pub source: String,
}

impl Buff {
    pub fn for_turns(kind: BuffKind, magnitude: f64, turns: u32, source: impl Into<String>) -> Self {
        Self {
            kind,
            magnitude,
            expiry: Expiry::Turns(turns),
            source: source.into(),
        }
    }

    pub fn for_uses(kind: BuffKind, magnitude: f64, uses: u32, source: impl Into<String>) -> Self {
        Self {
            kind,
            magnitude,
            expiry: Expiry::Uses(uses),
            source: source.into(),
        }
    }

    /// Count down one owner activation (counted buffs are unaffected)
    pub fn tick(&mut self) {
        if let Expiry::Turns(ref mut remaining) = self.expiry {
            *remaining = remaining.saturating_sub(1);
        }
    }

    /// Spend one use (timed buffs are unaffected)
    pub fn consume(&mut self) {
        if let Expiry::Uses(ref mut remaining) = self.expiry {
            *remaining = remaining.saturating_sub(1);
        }
    }

    pub fn is_expired(&self) -> bool {
        match self.expiry {
            Expiry::Turns(remaining) | Expiry::Uses(remaining) => remaining == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_buff_expires() {
        let mut buff = Buff::for_turns(BuffKind::AtkUp, 0.2, 2, "s3_normal01");
        buff.consume();
        assert!(!buff.is_expired());
        buff.tick();
        assert!(!buff.is_expired());
        buff.tick();
        assert!(buff.is_expired());
        buff.tick();
        assert_eq!(buff.expiry, Expiry::Turns(0));
    }

    #[test]
    fn test_counted_buff_ignores_ticks() {
        let mut buff = Buff::for_uses(BuffKind::DodgeCharge, 1.0, 1, "s3_rare01");
        buff.tick();
        buff.tick();
        assert!(!buff.is_expired());
        buff.consume();
        assert!(buff.is_expired());
    }

    #[test]
    fn test_stat_kinds() {
        assert_eq!(BuffKind::stat_up(BattleStat::Ms), BuffKind::MsUp);
        assert_eq!(BuffKind::stat_down(BattleStat::Atk), BuffKind::AtkDown);
    }
}
