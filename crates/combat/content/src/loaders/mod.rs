//! Content loaders for reading combat data from files.
//!
//! Each loader reads one RON or TOML file into a validated `combat-core`
//! catalog. [`ContentFactory`] combines them from a data directory and runs
//! the cross-catalog checks of [`combat_core::Ruleset::new`].

pub mod actions;
pub mod actors;
pub mod combos;
pub mod config;
pub mod effects;
pub mod factory;
pub mod stats;

pub use actions::ActionLoader;
pub use actors::{ActorLoader, ActorSpec};
pub use combos::ComboLoader;
pub use config::ConfigLoader;
pub use effects::EffectLoader;
pub use factory::{ContentFactory, embedded};
pub use stats::StatLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parse a RON document, naming `what` in the error.
pub(crate) fn parse_ron<T>(content: &str, what: &str) -> LoadResult<T>
where
    T: serde::de::DeserializeOwned,
{
    ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))
}
