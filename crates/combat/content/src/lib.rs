//! Data-driven combat content and loaders.
//!
//! This crate reads combat rules from RON/TOML data files:
//! - Stat declarations and derived-stat formulas (RON)
//! - Effect templates (RON)
//! - Attack and spell definitions (RON)
//! - Combo patterns (RON)
//! - Combat tuning constants (TOML)
//! - Sample actor rosters (RON)
//!
//! All loaders use combat-core types directly with serde for RON/TOML
//! deserialization, and every catalog is validated before it is returned.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActionLoader, ActorLoader, ActorSpec, ComboLoader, ConfigLoader, ContentFactory, EffectLoader,
    LoadResult, StatLoader, embedded,
};
