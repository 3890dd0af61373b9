//! Effect templates: the validated schema every temporary effect is built from.
//!
//! Templates are content. They are checked once, when built, and the registry
//! instantiates [`super::ActiveEffect`]s from them without further validation.

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::id::string_id;
use crate::stats::{Modifier, ResourceKind};

string_id! {
    /// Identifier of an effect template, e.g. `"poison"`.
    TemplateId
}

/// Whether an effect helps or hinders its bearer. Used by bulk dispels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    Buff,
    Debuff,
    #[default]
    Neutral,
}

/// Rule for re-applying a template that is already active on the same actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackingPolicy {
    /// At most one instance; re-application is ignored.
    #[default]
    Unique,

    /// Independent instances up to `max`; further applications are ignored.
    Stack { max: u32 },

    /// At most one instance; re-application resets its duration.
    RefreshOnReapply,
}

/// Resource change fired every `interval` time units while the effect lasts.
///
/// Negative amounts are damage over time, positive amounts heal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodicAction {
    pub resource: ResourceKind,
    pub amount: f64,
    pub interval: f64,
}

impl PeriodicAction {
    /// Damage over time: `damage` health lost every `interval`.
    pub fn damage(damage: f64, interval: f64) -> Self {
        Self {
            resource: ResourceKind::Health,
            amount: -damage,
            interval,
        }
    }

    /// Healing over time: `healing` health restored every `interval`.
    pub fn heal(healing: f64, interval: f64) -> Self {
        Self {
            resource: ResourceKind::Health,
            amount: healing,
            interval,
        }
    }
}

/// A validated effect template.
///
/// Build one with [`EffectTemplate::builder`]; deserialized templates go
/// through the same builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "EffectTemplateSpec"))]
pub struct EffectTemplate {
    id: TemplateId,
    name: String,
    polarity: Polarity,
    modifiers: Vec<Modifier>,
    duration: Option<f64>,
    stacking: StackingPolicy,
    periodic: Option<PeriodicAction>,
}

impl EffectTemplate {
    pub fn builder(id: impl Into<TemplateId>) -> EffectTemplateBuilder {
        EffectTemplateBuilder::new(id)
    }

    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// `None` = permanent.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn stacking(&self) -> StackingPolicy {
        self.stacking
    }

    pub fn periodic(&self) -> Option<PeriodicAction> {
        self.periodic
    }
}

/// Builder for [`EffectTemplate`].
///
/// # Example
/// ```
/// # use combat_core::effects::{EffectTemplate, PeriodicAction, Polarity, StackingPolicy};
/// # use combat_core::stats::Modifier;
/// let poison = EffectTemplate::builder("poison")
///     .polarity(Polarity::Debuff)
///     .modifier(Modifier::flat("evasion", -0.05))
///     .duration(3.0)
///     .periodic(PeriodicAction::damage(5.0, 1.0))
///     .stacking(StackingPolicy::Stack { max: 3 })
///     .build()
///     .unwrap();
///
/// assert_eq!(poison.modifiers().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct EffectTemplateBuilder {
    template: EffectTemplate,
}

impl EffectTemplateBuilder {
    pub fn new(id: impl Into<TemplateId>) -> Self {
        let id = id.into();
        Self {
            template: EffectTemplate {
                name: id.as_str().to_owned(),
                id,
                polarity: Polarity::Neutral,
                modifiers: Vec::new(),
                duration: None,
                stacking: StackingPolicy::Unique,
                periodic: None,
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.template.name = name.into();
        self
    }

    pub fn polarity(mut self, polarity: Polarity) -> Self {
        self.template.polarity = polarity;
        self
    }

    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.template.modifiers.push(modifier);
        self
    }

    pub fn modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.template.modifiers.extend(modifiers);
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.template.duration = Some(duration);
        self
    }

    pub fn permanent(mut self) -> Self {
        self.template.duration = None;
        self
    }

    pub fn stacking(mut self, stacking: StackingPolicy) -> Self {
        self.template.stacking = stacking;
        self
    }

    pub fn periodic(mut self, periodic: PeriodicAction) -> Self {
        self.template.periodic = Some(periodic);
        self
    }

    /// Validate and produce the template.
    pub fn build(self) -> Result<EffectTemplate, ConfigError> {
        let template = self.template;
        let invalid = |reason| ConfigError::InvalidTemplate {
            template: template.id.to_string(),
            reason,
        };

        if template.id.as_str().is_empty() {
            return Err(invalid("id is empty"));
        }
        if let Some(duration) = template.duration {
            if !duration.is_finite() || duration <= 0.0 {
                return Err(invalid("duration must be positive and finite"));
            }
        }
        if let StackingPolicy::Stack { max } = template.stacking {
            if max == 0 {
                return Err(invalid("stack limit must be at least 1"));
            }
        }
        if let Some(periodic) = template.periodic {
            if !periodic.interval.is_finite() || periodic.interval <= 0.0 {
                return Err(invalid("periodic interval must be positive and finite"));
            }
            if !periodic.amount.is_finite() {
                return Err(invalid("periodic amount must be finite"));
            }
        }
        if template.modifiers.iter().any(|m| !m.is_finite()) {
            return Err(invalid("modifier amounts must be finite"));
        }
        if template.modifiers.is_empty() && template.periodic.is_none() {
            return Err(invalid(
                "effect has neither modifiers nor a periodic action",
            ));
        }

        Ok(template)
    }
}

/// Serialized form of an effect template.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Deserialize)]
pub struct EffectTemplateSpec {
    pub id: TemplateId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub polarity: Polarity,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub stacking: StackingPolicy,
    #[serde(default)]
    pub periodic: Option<PeriodicAction>,
}

#[cfg(feature = "serde")]
impl TryFrom<EffectTemplateSpec> for EffectTemplate {
    type Error = ConfigError;

    fn try_from(spec: EffectTemplateSpec) -> Result<Self, Self::Error> {
        let mut builder = EffectTemplate::builder(spec.id)
            .polarity(spec.polarity)
            .modifiers(spec.modifiers)
            .stacking(spec.stacking);
        if let Some(name) = spec.name {
            builder = builder.name(name);
        }
        if let Some(duration) = spec.duration {
            builder = builder.duration(duration);
        }
        if let Some(periodic) = spec.periodic {
            builder = builder.periodic(periodic);
        }
        builder.build()
    }
}

/// Lookup table of effect templates by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectCatalog {
    templates: BTreeMap<TemplateId, EffectTemplate>,
}

impl EffectCatalog {
    pub fn new(templates: impl IntoIterator<Item = EffectTemplate>) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for template in templates {
            if map.contains_key(template.id()) {
                return Err(ConfigError::DuplicateId {
                    kind: "effect template",
                    id: template.id().to_string(),
                });
            }
            map.insert(template.id().clone(), template);
        }
        Ok(Self { templates: map })
    }

    pub fn get(&self, id: &str) -> Option<&EffectTemplate> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_zero_stack_limit() {
        let err = EffectTemplate::builder("frenzy")
            .modifier(Modifier::percent("attack", 0.1))
            .stacking(StackingPolicy::Stack { max: 0 })
            .build()
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidTemplate { .. }));
    }

    #[test]
    fn builder_rejects_non_positive_duration_and_interval() {
        let duration = EffectTemplate::builder("blink")
            .modifier(Modifier::flat("evasion", 0.2))
            .duration(0.0)
            .build();
        assert!(duration.is_err());

        let interval = EffectTemplate::builder("bleed")
            .duration(3.0)
            .periodic(PeriodicAction::damage(2.0, 0.0))
            .build();
        assert!(interval.is_err());
    }

    #[test]
    fn builder_rejects_empty_effect() {
        let err = EffectTemplate::builder("nothing").duration(1.0).build();
        assert!(err.is_err());
    }

    #[test]
    fn name_defaults_to_id() {
        let template = EffectTemplate::builder("regen")
            .periodic(PeriodicAction::heal(2.0, 1.0))
            .build()
            .unwrap();

        assert_eq!(template.name(), "regen");
        assert_eq!(template.duration(), None);
        assert_eq!(template.periodic().unwrap().amount, 2.0);
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let make = || {
            EffectTemplate::builder("haste")
                .modifier(Modifier::percent("speed", 0.3))
                .build()
                .unwrap()
        };
        let err = EffectCatalog::new([make(), make()]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateId { .. }));
    }
}
