//! Actor roster loader.
//!
//! Loads sample combatants from RON files and checks them against a ruleset.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use combat_core::{Actor, ActorId, EquippedItem, ResourceMeters, Ruleset, StatId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Serialized form of an actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSpec {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub base_stats: BTreeMap<StatId, f64>,
    pub resources: ResourceMeters,
    #[serde(default)]
    pub equipment: Vec<EquippedItem>,
}

impl ActorSpec {
    /// Build a fresh actor with no active effects.
    pub fn into_actor(self) -> Actor {
        let mut actor = Actor::new(ActorId(self.id)).with_resources(self.resources);
        for (stat, value) in self.base_stats {
            actor.set_base_stat(stat, value);
        }
        for item in self.equipment {
            actor.equip(item);
        }
        actor
    }
}

/// Actor file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorFile {
    pub actors: Vec<ActorSpec>,
}

/// Loader for actor rosters from RON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load actors from a RON file.
    ///
    /// # Returns
    ///
    /// Returns a Vec of (name, Actor) in file order.
    pub fn load(path: &Path, ruleset: &Ruleset) -> LoadResult<Vec<(String, Actor)>> {
        let content = read_file(path)?;
        Self::parse(&content, ruleset)
    }

    /// Parse actors from RON text.
    ///
    /// Every base stat and equipment bonus must name a stat declared in
    /// `ruleset`, and actor ids must be unique.
    pub fn parse(content: &str, ruleset: &Ruleset) -> LoadResult<Vec<(String, Actor)>> {
        let file: ActorFile = parse_ron(content, "actor roster")?;

        let mut seen = BTreeSet::new();
        let mut actors = Vec::with_capacity(file.actors.len());
        for spec in file.actors {
            if !seen.insert(spec.id) {
                anyhow::bail!("Actor id {} declared more than once", spec.id);
            }
            let undeclared = spec
                .base_stats
                .keys()
                .find(|stat| !ruleset.stats().contains(stat.as_str()));
            if let Some(stat) = undeclared {
                anyhow::bail!("Actor '{}' sets undeclared stat '{}'", spec.name, stat);
            }
            for item in &spec.equipment {
                ruleset
                    .validate_item(item)
                    .map_err(|e| anyhow::anyhow!("Actor '{}': {}", spec.name, e))?;
            }

            let name = spec.name.clone();
            actors.push((name, spec.into_actor()));
        }

        Ok(actors)
    }
}
