//! Content factory for building a ruleset from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use combat_core::{
    ActionCatalog, Actor, CombatConfig, ComboCatalog, EffectCatalog, Ruleset, StatCatalog,
};
use tracing::{debug, info};

use crate::loaders::{
    ActionLoader, ActorLoader, ComboLoader, ConfigLoader, EffectLoader, LoadResult, StatLoader,
};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── stats.ron
/// ├── effects.ron
/// ├── actions.ron
/// ├── combos.ron
/// └── actors.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "combat.toml";
    pub const STATS_FILE: &'static str = "stats.ron";
    pub const EFFECTS_FILE: &'static str = "effects.ron";
    pub const ACTIONS_FILE: &'static str = "actions.ron";
    pub const COMBOS_FILE: &'static str = "combos.ron";
    pub const ACTORS_FILE: &'static str = "actors.ron";

    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `combat.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        self.load_file(Self::CONFIG_FILE, ConfigLoader::load)
    }

    /// Load stat declarations from `stats.ron`.
    pub fn load_stats(&self) -> LoadResult<StatCatalog> {
        self.load_file(Self::STATS_FILE, StatLoader::load)
    }

    /// Load effect templates from `effects.ron`.
    pub fn load_effects(&self) -> LoadResult<EffectCatalog> {
        self.load_file(Self::EFFECTS_FILE, EffectLoader::load)
    }

    /// Load action definitions from `actions.ron`.
    pub fn load_actions(&self) -> LoadResult<ActionCatalog> {
        self.load_file(Self::ACTIONS_FILE, ActionLoader::load)
    }

    /// Load combo patterns from `combos.ron`.
    pub fn load_combos(&self) -> LoadResult<ComboCatalog> {
        self.load_file(Self::COMBOS_FILE, ComboLoader::load)
    }

    /// Load every catalog and cross-check them into a [`Ruleset`].
    pub fn load_ruleset(&self) -> LoadResult<Ruleset> {
        let ruleset = Ruleset::new(
            self.load_stats()?,
            self.load_effects()?,
            self.load_actions()?,
            self.load_combos()?,
            self.load_config()?,
        )
        .with_context(|| format!("Invalid ruleset in {}", self.data_dir.display()))?;

        log_ruleset(&ruleset, &self.data_dir.display().to_string());
        Ok(ruleset)
    }

    /// Load the actor roster from `actors.ron`, checked against `ruleset`.
    pub fn load_actors(&self, ruleset: &Ruleset) -> LoadResult<Vec<(String, Actor)>> {
        self.load_file(Self::ACTORS_FILE, |path| ActorLoader::load(path, ruleset))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn load_file<T>(&self, name: &str, load: impl FnOnce(&Path) -> LoadResult<T>) -> LoadResult<T> {
        let path = self.data_dir.join(name);
        debug!(path = %path.display(), "loading content file");
        load(&path).with_context(|| format!("Failed to load {}", path.display()))
    }
}

/// Sample content compiled into the crate.
///
/// These are the same files as `data/` in the crate root.
pub mod embedded {
    use super::*;

    pub const CONFIG: &str = include_str!("../../data/combat.toml");
    pub const STATS: &str = include_str!("../../data/stats.ron");
    pub const EFFECTS: &str = include_str!("../../data/effects.ron");
    pub const ACTIONS: &str = include_str!("../../data/actions.ron");
    pub const COMBOS: &str = include_str!("../../data/combos.ron");
    pub const ACTORS: &str = include_str!("../../data/actors.ron");

    /// Every embedded file with its on-disk name.
    pub const FILES: [(&str, &str); 6] = [
        (ContentFactory::CONFIG_FILE, CONFIG),
        (ContentFactory::STATS_FILE, STATS),
        (ContentFactory::EFFECTS_FILE, EFFECTS),
        (ContentFactory::ACTIONS_FILE, ACTIONS),
        (ContentFactory::COMBOS_FILE, COMBOS),
        (ContentFactory::ACTORS_FILE, ACTORS),
    ];

    /// Build the sample ruleset.
    pub fn ruleset() -> LoadResult<Ruleset> {
        let ruleset = Ruleset::new(
            StatLoader::parse(STATS).context("embedded stats")?,
            EffectLoader::parse(EFFECTS).context("embedded effects")?,
            ActionLoader::parse(ACTIONS).context("embedded actions")?,
            ComboLoader::parse(COMBOS).context("embedded combos")?,
            ConfigLoader::parse(CONFIG).context("embedded config")?,
        )
        .context("Invalid embedded ruleset")?;

        log_ruleset(&ruleset, "embedded");
        Ok(ruleset)
    }

    /// Build the sample actors against `ruleset`.
    pub fn actors(ruleset: &Ruleset) -> LoadResult<Vec<(String, Actor)>> {
        ActorLoader::parse(ACTORS, ruleset).context("embedded actors")
    }
}

fn log_ruleset(ruleset: &Ruleset, source: &str) {
    info!(
        source,
        stats = ruleset.stats().len(),
        effects = ruleset.effects().len(),
        actions = ruleset.actions().len(),
        combos = ruleset.combos().len(),
        "ruleset loaded"
    );
}
