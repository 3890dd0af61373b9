//! The validated rule bundle shared by every resolver.
//!
//! A [`Ruleset`] is built once at startup and handed out as `Arc<Ruleset>`.
//! Construction cross-checks every reference between catalogs, so resolution
//! never meets a dangling stat, template or action id.

use crate::actor::EquippedItem;
use crate::combat::{ActionCatalog, Avoidance, stat_names};
use crate::combo::ComboCatalog;
use crate::config::CombatConfig;
use crate::effects::EffectCatalog;
use crate::error::ConfigError;
use crate::stats::{Modifier, StatCatalog, StatId};

/// Stats, effect templates, actions, combos and balance parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Ruleset {
    stats: StatCatalog,
    effects: EffectCatalog,
    actions: ActionCatalog,
    combos: ComboCatalog,
    config: CombatConfig,
}

impl Ruleset {
    pub fn new(
        stats: StatCatalog,
        effects: EffectCatalog,
        actions: ActionCatalog,
        combos: ComboCatalog,
        config: CombatConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let ruleset = Self {
            stats,
            effects,
            actions,
            combos,
            config,
        };
        ruleset.check_required_stats()?;
        ruleset.check_templates()?;
        ruleset.check_actions()?;
        ruleset.check_combos()?;
        Ok(ruleset)
    }

    pub fn stats(&self) -> &StatCatalog {
        &self.stats
    }

    pub fn effects(&self) -> &EffectCatalog {
        &self.effects
    }

    pub fn actions(&self) -> &ActionCatalog {
        &self.actions
    }

    pub fn combos(&self) -> &ComboCatalog {
        &self.combos
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Check that an item only grants bonuses to declared stats.
    pub fn validate_item(&self, item: &EquippedItem) -> Result<(), ConfigError> {
        self.check_modifiers(|| format!("item '{}'", item.id), &item.bonuses)
    }

    fn check_required_stats(&self) -> Result<(), ConfigError> {
        for stat in stat_names::REQUIRED {
            self.require_stat(stat, || "combat resolution".to_owned())?;
        }
        Ok(())
    }

    fn check_templates(&self) -> Result<(), ConfigError> {
        for template in self.effects.iter() {
            self.check_modifiers(
                || format!("effect template '{}'", template.id()),
                template.modifiers(),
            )?;
        }
        Ok(())
    }

    fn check_actions(&self) -> Result<(), ConfigError> {
        for action in self.actions.iter() {
            let owner = || format!("action '{}'", action.id);

            self.require_stat(action.attack_stat.as_str(), owner)?;
            if action.avoidance.contains(Avoidance::BLOCK) {
                self.require_stat(stat_names::BLOCK_CHANCE, owner)?;
            }
            if action.avoidance.contains(Avoidance::PARRY) {
                self.require_stat(stat_names::PARRY_CHANCE, owner)?;
            }
            if let Some(secondary) = &action.secondary {
                if !self.effects.contains(secondary.template.as_str()) {
                    return Err(ConfigError::UnknownTemplate {
                        owner: owner(),
                        template: secondary.template.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_combos(&self) -> Result<(), ConfigError> {
        for combo in self.combos.iter() {
            if !self.effects.contains(combo.effect.as_str()) {
                return Err(ConfigError::UnknownTemplate {
                    owner: format!("combo '{}'", combo.id),
                    template: combo.effect.to_string(),
                });
            }
            if let Some(unknown) = combo
                .sequence
                .iter()
                .find(|action| !self.actions.contains(action.as_str()))
            {
                return Err(ConfigError::InvalidCombo {
                    combo: combo.id.to_string(),
                    reason: format!("unknown action '{unknown}'"),
                });
            }
        }
        Ok(())
    }

    fn check_modifiers(
        &self,
        owner: impl Fn() -> String,
        modifiers: &[Modifier],
    ) -> Result<(), ConfigError> {
        match modifiers
            .iter()
            .find(|m| !self.stats.contains(m.stat.as_str()))
        {
            Some(modifier) => Err(ConfigError::UnknownModifierTarget {
                owner: owner(),
                stat: modifier.stat.clone(),
            }),
            None => Ok(()),
        }
    }

    fn require_stat(
        &self,
        stat: &str,
        required_by: impl Fn() -> String,
    ) -> Result<(), ConfigError> {
        if self.stats.contains(stat) {
            Ok(())
        } else {
            Err(ConfigError::MissingStat {
                required_by: required_by(),
                stat: StatId::from(stat),
            })
        }
    }
}
