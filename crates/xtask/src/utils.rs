//! Utility functions for xtask commands

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};

use combat_content::{ContentFactory, embedded};
use combat_core::{Actor, Ruleset};

/// Environment variable naming a default content directory.
pub const DATA_DIR_ENV: &str = "COMBAT_DATA_DIR";

/// Resolve the content directory: explicit flag, then `COMBAT_DATA_DIR`.
///
/// `None` means the embedded sample content.
pub fn content_dir(dir: Option<PathBuf>) -> Option<PathBuf> {
    dir.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
}

/// Load the ruleset from `dir`, or the embedded sample when `None`.
pub fn load_ruleset(dir: Option<&Path>) -> Result<Ruleset> {
    match dir {
        Some(dir) => ContentFactory::new(dir).load_ruleset(),
        None => embedded::ruleset(),
    }
}

/// Load the actor roster matching [`load_ruleset`].
pub fn load_actors(dir: Option<&Path>, ruleset: &Ruleset) -> Result<Vec<(String, Actor)>> {
    match dir {
        Some(dir) => ContentFactory::new(dir).load_actors(ruleset),
        None => embedded::actors(ruleset),
    }
}

/// Human-readable label for where content came from.
pub fn source_label(dir: Option<&Path>) -> String {
    match dir {
        Some(dir) => dir.display().to_string(),
        None => "embedded sample".to_owned(),
    }
}

/// Parse a `name=value` pair.
pub fn parse_assignment(input: &str) -> Result<(String, f64)> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected name=value, got '{}'", input))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Missing name in '{}'", input));
    }
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid number in '{}'", input))?;

    Ok((name.to_owned(), value))
}
