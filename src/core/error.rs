use thiserror::Error;

use crate::catalog::CatalogKind;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Catalog miss: no {kind} with id '{id}'")]
    CatalogMiss { kind: CatalogKind, id: String },

    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
