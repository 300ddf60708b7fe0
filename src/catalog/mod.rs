//! Catalog - read-only definitions of colors, patterns and abilities
//!
//! Instances reference catalog entries by id. The engines only need
//! lookup-by-id and filter-by-grade (and slot, for abilities).

pub mod builtin;
pub mod grade;
pub mod registry;

pub use grade::Grade;
pub use registry::{
    AbilityDef, Catalog, CatalogEntry, CatalogKind, ColorDef, PatternDef, ABILITY_SLOTS,
    BASELINE_ID,
};
