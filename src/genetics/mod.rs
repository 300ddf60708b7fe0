//! Genetics - inheritance, mutation and parameterized generation

pub mod breeding;
pub mod generator;
pub mod inheritance;
pub mod mutation;

pub use breeding::{breed, BreedingContext, BreedingSettings};
pub use generator::{
    generate_parameterized, open_box, starter_pair, stats_from_power, BoxTier,
    GenerationConstraints, StatApportionment, StatRange, StatSpec,
};

use crate::instance::{Abilities, Appearance, Instance, Stats};

/// The heritable part of an instance
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    pub stats: Stats,
    pub appearance: Appearance,
    pub abilities: Abilities,
}

impl Genome {
    pub fn of(instance: &Instance) -> Self {
        Self {
            stats: instance.stats(),
            appearance: instance.appearance().clone(),
            abilities: instance.abilities().clone(),
        }
    }
}
