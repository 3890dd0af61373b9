//! Combo pattern loader.

use std::path::Path;

use combat_core::{ComboCatalog, ComboPattern};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Combo file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboFile {
    pub combos: Vec<ComboPattern>,
}

/// Loader for combo patterns from RON files.
pub struct ComboLoader;

impl ComboLoader {
    pub fn load(path: &Path) -> LoadResult<ComboCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ComboCatalog> {
        let file: ComboFile = parse_ron(content, "combo")?;
        ComboCatalog::new(file.combos).map_err(|e| anyhow::anyhow!("Invalid combo catalog: {}", e))
    }
}
