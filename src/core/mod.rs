pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, BattleConfig, EngineConfig, RewardConfig};
pub use error::{ArenaError, Result};
pub use types::{InstanceId, Side, Turn};
