//! Effective stat resolution.
//!
//! [`StatResolver`] is the only code path that reads an actor's equipment
//! bonuses and active effects for stat purposes. Each source is walked once
//! per resolution and only modifiers naming the requested stat are kept.

use super::catalog::{StatCatalog, StatDef, StatKind};
use super::id::StatId;
use super::modifier::ModifierStack;
use crate::actor::Actor;
use crate::error::{CombatFault, ConfigError, ErrorSeverity};

/// Errors raised while resolving a stat.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StatError {
    #[error("unknown stat '{0}'")]
    UnknownStat(StatId),

    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl CombatFault for StatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownStat(_) => ErrorSeverity::Validation,
            Self::Configuration(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStat(_) => "STAT_UNKNOWN",
            Self::Configuration(inner) => inner.error_code(),
        }
    }
}

/// Per-stage values of a single resolution, for tooling and debugging.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResolvedStat {
    pub stat: StatId,
    /// Actor entry, or the declared default for base stats.
    pub base: f64,
    /// Formula result for derived stats.
    pub derived: Option<f64>,
    pub flat: f64,
    pub percent: f64,
    pub override_value: Option<f64>,
    /// Number of modifiers that targeted this stat.
    pub modifier_count: usize,
    /// Final clamped value.
    pub value: f64,
}

/// Computes effective stat values from base stats, equipment and effects.
///
/// Resolution order:
///
/// ```text
/// base → + formula(inputs) → + Σflat → × (1 + Σpercent) → override → clamp
/// ```
///
/// The resolver holds no state between calls, so resolving the same stat twice
/// without mutating the actor always yields the same value.
#[derive(Clone, Copy, Debug)]
pub struct StatResolver<'a> {
    catalog: &'a StatCatalog,
}

impl<'a> StatResolver<'a> {
    pub fn new(catalog: &'a StatCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a StatCatalog {
        self.catalog
    }

    /// Effective value of `stat` for `actor`.
    pub fn resolve(&self, actor: &Actor, stat: &str) -> Result<f64, StatError> {
        let mut visiting = Vec::new();
        self.resolve_inner(actor, stat, &mut visiting)
            .map(|resolved| resolved.value)
    }

    /// Effective value with every intermediate stage.
    pub fn breakdown(&self, actor: &Actor, stat: &str) -> Result<ResolvedStat, StatError> {
        let mut visiting = Vec::new();
        self.resolve_inner(actor, stat, &mut visiting)
    }

    fn resolve_inner(
        &self,
        actor: &Actor,
        stat: &str,
        visiting: &mut Vec<StatId>,
    ) -> Result<ResolvedStat, StatError> {
        let def = self
            .catalog
            .get(stat)
            .ok_or_else(|| StatError::UnknownStat(StatId::from(stat)))?;

        if visiting.iter().any(|s| s == stat) {
            let mut path = visiting.clone();
            path.push(def.id.clone());
            return Err(ConfigError::FormulaCycle { path }.into());
        }

        // 1. Base value
        let base = match def.kind {
            StatKind::Base { default } => actor.base_stat(stat).unwrap_or(default),
            StatKind::Derived(_) => actor.base_stat(stat).unwrap_or(0.0),
        };

        // 2. Derived formula over resolved inputs
        let derived = self.evaluate_formula(actor, def, visiting)?;

        // 3. Modifiers from equipment, then active effects
        let mut stack = ModifierStack::new();
        for item in actor.equipment() {
            stack.extend(item.bonuses_for(stat).map(|m| &m.kind));
        }
        for effect in actor.effects().active_effects() {
            stack.extend(effect.modifiers_for(stat).map(|m| &m.kind));
        }

        // 4 + 5. Flat → Percent → Override → Clamp
        let value = stack.apply(base + derived.unwrap_or(0.0), def.bounds);

        Ok(ResolvedStat {
            stat: def.id.clone(),
            base,
            derived,
            flat: stack.flat_sum(),
            percent: stack.percent_sum(),
            override_value: stack.override_value(),
            modifier_count: stack.len(),
            value,
        })
    }

    fn evaluate_formula(
        &self,
        actor: &Actor,
        def: &StatDef,
        visiting: &mut Vec<StatId>,
    ) -> Result<Option<f64>, StatError> {
        let Some(formula) = def.formula() else {
            return Ok(None);
        };

        visiting.push(def.id.clone());
        let value = formula.evaluate(|input| {
            self.resolve_inner(actor, input.as_str(), visiting)
                .map(|resolved| resolved.value)
        });
        visiting.pop();

        value.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorId, EquippedItem};
    use crate::effects::{EffectTemplate, StackingPolicy};
    use crate::stats::{Formula, Modifier, StatBounds};

    fn catalog() -> StatCatalog {
        StatCatalog::new([
            StatDef::base("strength", 0.0),
            StatDef::base("intelligence", 0.0),
            StatDef::base("level", 1.0),
            StatDef::derived("attack", Formula::new().term("strength", 1.0)),
            StatDef::base("dodge", 0.1).bounded(StatBounds::CHANCE),
        ])
        .unwrap()
    }

    #[test]
    fn base_default_applies_without_actor_entry() {
        let catalog = catalog();
        let resolver = StatResolver::new(&catalog);
        let actor = Actor::new(ActorId(1));

        assert_eq!(resolver.resolve(&actor, "level").unwrap(), 1.0);
        assert_eq!(resolver.resolve(&actor, "strength").unwrap(), 0.0);
    }

    #[test]
    fn unknown_stat_is_an_error() {
        let catalog = catalog();
        let resolver = StatResolver::new(&catalog);
        let actor = Actor::new(ActorId(1));

        assert_eq!(
            resolver.resolve(&actor, "charisma"),
            Err(StatError::UnknownStat("charisma".into()))
        );
    }

    #[test]
    fn derived_stat_reads_modified_inputs() {
        let catalog = catalog();
        let resolver = StatResolver::new(&catalog);
        let mut actor = Actor::new(ActorId(1)).with_base_stat("strength", 10.0);
        actor.equip(EquippedItem::new(
            "gauntlets",
            vec![Modifier::flat("strength", 4.0)],
        ));

        assert_eq!(resolver.resolve(&actor, "attack").unwrap(), 14.0);
    }

    #[test]
    fn breakdown_reports_each_stage() {
        let catalog = catalog();
        let resolver = StatResolver::new(&catalog);
        let mut actor = Actor::new(ActorId(1)).with_base_stat("strength", 10.0);
        actor.equip(EquippedItem::new(
            "sword",
            vec![Modifier::flat("attack", 2.0), Modifier::percent("attack", 0.5)],
        ));

        let resolved = resolver.breakdown(&actor, "attack").unwrap();
        assert_eq!(resolved.base, 0.0);
        assert_eq!(resolved.derived, Some(10.0));
        assert_eq!(resolved.flat, 2.0);
        assert_eq!(resolved.percent, 0.5);
        assert_eq!(resolved.modifier_count, 2);
        assert_eq!(resolved.value, 18.0);
    }

    #[test]
    fn override_caps_after_percent_and_clamp_applies_last() {
        let catalog = catalog();
        let resolver = StatResolver::new(&catalog);
        let mut actor = Actor::new(ActorId(1)).with_base_stat("dodge", 0.6);
        actor.equip(EquippedItem::new(
            "cloak",
            vec![Modifier::percent("dodge", 1.0)],
        ));
        assert_eq!(resolver.resolve(&actor, "dodge").unwrap(), 1.0);

        let cap = EffectTemplate::builder("dodge_cap")
            .modifier(Modifier::override_with("dodge", 0.95, 10))
            .stacking(StackingPolicy::Unique)
            .build()
            .unwrap();
        actor.effects_mut().apply(&cap);
        assert_eq!(resolver.resolve(&actor, "dodge").unwrap(), 0.95);
    }

    #[test]
    fn resolution_is_idempotent() {
        let catalog = catalog();
        let resolver = StatResolver::new(&catalog);
        let mut actor = Actor::new(ActorId(1)).with_base_stat("strength", 7.0);
        let buff = EffectTemplate::builder("might")
            .modifier(Modifier::flat("strength", 3.0))
            .duration(5.0)
            .build()
            .unwrap();
        actor.effects_mut().apply(&buff);

        let first = resolver.resolve(&actor, "attack").unwrap();
        let second = resolver.resolve(&actor, "attack").unwrap();
        assert_eq!(first, 10.0);
        assert_eq!(first, second);
    }
}
