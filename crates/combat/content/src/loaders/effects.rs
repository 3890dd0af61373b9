//! Effect template loader.
//!
//! Templates deserialize through [`combat_core::effects::EffectTemplateSpec`],
//! so malformed templates fail while parsing, with the builder's message.

use std::path::Path;

use combat_core::{EffectCatalog, EffectTemplate};
use serde::Deserialize;

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Effect file structure for RON files.
#[derive(Debug, Clone, Deserialize)]
pub struct EffectFile {
    pub effects: Vec<EffectTemplate>,
}

/// Loader for effect templates from RON files.
pub struct EffectLoader;

impl EffectLoader {
    pub fn load(path: &Path) -> LoadResult<EffectCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EffectCatalog> {
        let file: EffectFile = parse_ron(content, "effect template")?;
        EffectCatalog::new(file.effects)
            .map_err(|e| anyhow::anyhow!("Invalid effect catalog: {}", e))
    }
}
