//! Action definition loader.

use std::path::Path;

use combat_core::{ActionCatalog, ActionDef};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Action file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionFile {
    pub actions: Vec<ActionDef>,
}

/// Loader for action definitions from RON files.
pub struct ActionLoader;

impl ActionLoader {
    pub fn load(path: &Path) -> LoadResult<ActionCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ActionCatalog> {
        let file: ActionFile = parse_ron(content, "action")?;
        ActionCatalog::new(file.actions)
            .map_err(|e| anyhow::anyhow!("Invalid action catalog: {}", e))
    }
}
