//! Creature Arena - creature breeding and automated battle engine

pub mod battle;
pub mod catalog;
pub mod core;
pub mod genetics;
pub mod instance;
pub mod rewards;

pub use crate::battle::{run_battle, BattleResult, BattleState, Winner};
pub use crate::catalog::{Catalog, Grade};
pub use crate::core::{ArenaError, EngineConfig, Result};
pub use crate::genetics::{breed, generate_parameterized, BreedingContext, BreedingSettings};
pub use crate::instance::{create_base, Instance};
