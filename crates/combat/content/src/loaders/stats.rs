//! Stat declaration loader.

use std::path::Path;

use combat_core::{StatCatalog, StatDef};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Stat file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatFile {
    pub stats: Vec<StatDef>,
}

/// Loader for stat declarations from RON files.
pub struct StatLoader;

impl StatLoader {
    /// Load and validate stat declarations from a RON file.
    pub fn load(path: &Path) -> LoadResult<StatCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate stat declarations from RON text.
    ///
    /// Duplicate ids, undeclared formula inputs and formula cycles are
    /// rejected here.
    pub fn parse(content: &str) -> LoadResult<StatCatalog> {
        let file: StatFile = parse_ron(content, "stat")?;
        StatCatalog::new(file.stats).map_err(|e| anyhow::anyhow!("Invalid stat catalog: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base_and_derived_stats() {
        let catalog = StatLoader::parse(
            r#"(
                stats: [
                    (id: "strength", kind: Base(default: 10.0)),
                    (id: "dodge", kind: Base(default: 0.1), bounds: (min: 0.0, max: 1.0)),
                    (id: "attack", kind: Derived((constant: 1.0, terms: [(input: "strength", coefficient: 2.0)]))),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 3);
        assert!(catalog.get("attack").unwrap().is_derived());
        assert_eq!(catalog.get("dodge").unwrap().bounds.max, 1.0);
    }

    #[test]
    fn cycle_is_reported_with_path() {
        let err = StatLoader::parse(
            r#"(
                stats: [
                    (id: "a", kind: Derived((terms: [(input: "b", coefficient: 1.0)]))),
                    (id: "b", kind: Derived((terms: [(input: "a", coefficient: 1.0)]))),
                ],
            )"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("a -> b -> a"), "{err}");
    }
}
