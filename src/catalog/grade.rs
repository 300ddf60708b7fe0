//! Rarity grades
//!
//! Grades drive every weighted draw in the generation engine. The
//! inheritance weight favours common grades so that rare traits only
//! spread when both parents carry them.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    Normal = 0,
    Rare = 1,
    Epic = 2,
    Unique = 3,
    Legendary = 4,
    Mystic = 5,
}

/// Probability of each grade when a mutation redraws an appearance or ability
const MUTATION_GRADE_TABLE: [(Grade, f64); 6] = [
    (Grade::Normal, 0.70),
    (Grade::Rare, 0.20),
    (Grade::Epic, 0.07),
    (Grade::Unique, 0.02),
    (Grade::Legendary, 0.008),
    (Grade::Mystic, 0.002),
];

impl Grade {
    pub const ALL: [Grade; 6] = [
        Grade::Normal,
        Grade::Rare,
        Grade::Epic,
        Grade::Unique,
        Grade::Legendary,
        Grade::Mystic,
    ];

    /// Returns the display name for this grade.
    pub fn name(&self) -> &'static str {
        match self {
            Grade::Normal => "Normal",
            Grade::Rare => "Rare",
            Grade::Epic => "Epic",
            Grade::Unique => "Unique",
            Grade::Legendary => "Legendary",
            Grade::Mystic => "Mystic",
        }
    }

    /// Inheritance weight used by grade-proportional selection
    pub fn weight(&self) -> u32 {
        match self {
            Grade::Normal => 100,
            Grade::Rare => 80,
            Grade::Epic => 55,
            Grade::Unique => 35,
            Grade::Legendary => 20,
            Grade::Mystic => 10,
        }
    }

    /// Probability of drawing this grade during a mutation
    pub fn mutation_probability(&self) -> f64 {
        MUTATION_GRADE_TABLE[*self as usize].1
    }

    /// Flat bonus added to a skill's priority score in battle
    pub fn priority_bonus(&self) -> f64 {
        match self {
            Grade::Normal => 0.0,
            Grade::Rare => 5.0,
            Grade::Epic => 10.0,
            Grade::Unique => 15.0,
            Grade::Legendary => 20.0,
            Grade::Mystic => 30.0,
        }
    }

    /// Draw a grade from the mutation table (skewed toward common grades)
    pub fn roll_mutation(rng: &mut impl Rng) -> Grade {
        let roll: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (grade, probability) in MUTATION_GRADE_TABLE {
            cumulative += probability;
            if roll < cumulative {
                return grade;
            }
        }
        Grade::Mystic
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_grade_ordering() {
        assert!(Grade::Mystic > Grade::Legendary);
        assert!(Grade::Legendary > Grade::Unique);
        assert!(Grade::Unique > Grade::Epic);
        assert!(Grade::Epic > Grade::Rare);
        assert!(Grade::Rare > Grade::Normal);
    }

    #[test]
    fn test_weights_decrease_with_rarity() {
        let weights: Vec<u32> = Grade::ALL.iter().map(|g| g.weight()).collect();
        assert_eq!(weights, vec![100, 80, 55, 35, 20, 10]);
    }

    #[test]
    fn test_mutation_table_sums_to_one() {
        let total: f64 = Grade::ALL.iter().map(|g| g.mutation_probability()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_roll_mutation_mostly_normal() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let trials = 20_000;
        let normals = (0..trials)
            .filter(|_| Grade::roll_mutation(&mut rng) == Grade::Normal)
            .count();
        let ratio = normals as f64 / trials as f64;
        assert!((ratio - 0.70).abs() < 0.02, "normal ratio {}", ratio);
    }

    #[test]
    fn test_grade_serializes_by_name() {
        assert_eq!(serde_json::to_string(&Grade::Legendary).unwrap(), "\"Legendary\"");
        let grade: Grade = serde_json::from_str("\"Mystic\"").unwrap();
        assert_eq!(grade, Grade::Mystic);
    }
}
