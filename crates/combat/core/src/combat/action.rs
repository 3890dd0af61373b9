//! Action definitions: what an attack or spell costs, scales with and deals.

use std::collections::BTreeMap;

use bitflags::bitflags;

use crate::effects::TemplateId;
use crate::error::ConfigError;
use crate::id::string_id;
use crate::stats::{ResourceKind, StatId};

string_id! {
    /// Identifier of an action definition, e.g. `"slash"`.
    ActionId
}

/// Broad category of an action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    #[default]
    Attack,
    Spell,
}

/// Damage type for resistances and damage calculation.
///
/// Each type other than `True` is resisted by the stat
/// `"{type}_resistance"` and amplified by `"{type}_weakness"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    /// Physical damage (melee, projectiles).
    #[default]
    Physical,
    /// Fire damage (burns, explosions).
    Fire,
    /// Cold damage (ice, frost).
    Cold,
    /// Lightning damage (electricity, storms).
    Lightning,
    /// Poison damage (toxins, venom).
    Poison,
    /// Arcane damage (pure magic).
    Arcane,
    /// True damage (ignores defense and resistances).
    True,
}

impl DamageType {
    pub fn is_true(self) -> bool {
        matches!(self, Self::True)
    }

    /// Stat that reduces this damage type, `None` for true damage.
    pub fn resistance_stat(self) -> Option<String> {
        (!self.is_true()).then(|| format!("{self}_resistance"))
    }

    /// Stat that amplifies this damage type, `None` for true damage.
    pub fn weakness_stat(self) -> Option<String> {
        (!self.is_true()).then(|| format!("{self}_weakness"))
    }
}

bitflags! {
    /// Defensive reactions an action can be answered with when it misses.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Avoidance: u8 {
        const BLOCK = 1 << 0;
        const PARRY = 1 << 1;
    }
}

/// Resource paid by the attacker, on hit or miss.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceCost {
    pub resource: ResourceKind,
    pub amount: f64,
}

impl ResourceCost {
    pub fn new(resource: ResourceKind, amount: f64) -> Self {
        Self { resource, amount }
    }
}

/// Effect applied to the defender on a landed hit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecondaryEffect {
    pub template: TemplateId,
    /// Probability in `[0, 1]`; `1.0` always applies and consumes no roll.
    #[cfg_attr(feature = "serde", serde(default = "SecondaryEffect::always"))]
    pub chance: f64,
}

impl SecondaryEffect {
    pub fn new(template: impl Into<TemplateId>, chance: f64) -> Self {
        Self {
            template: template.into(),
            chance,
        }
    }

    fn always() -> f64 {
        1.0
    }

    pub fn is_guaranteed(&self) -> bool {
        self.chance >= 1.0
    }
}

/// Static definition of an attack or spell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionDef {
    pub id: ActionId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: ActionKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: Option<ResourceCost>,
    /// Multiplier of the attacker's `attack_stat`.
    pub power: f64,
    pub attack_stat: StatId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: DamageType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub avoidance: Avoidance,
    #[cfg_attr(feature = "serde", serde(default))]
    pub secondary: Option<SecondaryEffect>,
}

impl ActionDef {
    pub fn new(id: impl Into<ActionId>, attack_stat: impl Into<StatId>, power: f64) -> Self {
        Self {
            id: id.into(),
            kind: ActionKind::Attack,
            cost: None,
            power,
            attack_stat: attack_stat.into(),
            damage_type: DamageType::Physical,
            avoidance: Avoidance::empty(),
            secondary: None,
        }
    }

    pub fn with_kind(mut self, kind: ActionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_cost(mut self, resource: ResourceKind, amount: f64) -> Self {
        self.cost = Some(ResourceCost::new(resource, amount));
        self
    }

    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    pub fn with_avoidance(mut self, avoidance: Avoidance) -> Self {
        self.avoidance = avoidance;
        self
    }

    pub fn with_secondary(mut self, template: impl Into<TemplateId>, chance: f64) -> Self {
        self.secondary = Some(SecondaryEffect::new(template, chance));
        self
    }

    /// Checks numeric ranges. Cross references are checked by the ruleset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidAction {
            action: self.id.to_string(),
            reason: reason.to_owned(),
        };

        if self.id.as_str().is_empty() {
            return Err(invalid("id is empty"));
        }
        if !self.power.is_finite() || self.power < 0.0 {
            return Err(invalid("power must be finite and non-negative"));
        }
        if let Some(cost) = self.cost {
            if !cost.amount.is_finite() || cost.amount < 0.0 {
                return Err(invalid("cost must be finite and non-negative"));
            }
        }
        if let Some(secondary) = &self.secondary {
            if !(0.0..=1.0).contains(&secondary.chance) {
                return Err(invalid("secondary effect chance must lie within [0, 1]"));
            }
        }
        Ok(())
    }
}

/// A request to perform an action at a point in combat time.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRequest {
    pub action: ActionId,
    /// Combat clock in seconds; drives combo timing.
    pub timestamp: f64,
}

impl ActionRequest {
    pub fn new(action: impl Into<ActionId>, timestamp: f64) -> Self {
        Self {
            action: action.into(),
            timestamp,
        }
    }
}

/// Lookup table of action definitions by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionCatalog {
    actions: BTreeMap<ActionId, ActionDef>,
}

impl ActionCatalog {
    pub fn new(actions: impl IntoIterator<Item = ActionDef>) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for action in actions {
            action.validate()?;
            if map.contains_key(&action.id) {
                return Err(ConfigError::DuplicateId {
                    kind: "action",
                    id: action.id.to_string(),
                });
            }
            map.insert(action.id.clone(), action);
        }
        Ok(Self { actions: map })
    }

    pub fn get(&self, id: &str) -> Option<&ActionDef> {
        self.actions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDef> {
        self.actions.values()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_type_stat_names() {
        assert_eq!(
            DamageType::Fire.resistance_stat().as_deref(),
            Some("fire_resistance")
        );
        assert_eq!(
            DamageType::Lightning.weakness_stat().as_deref(),
            Some("lightning_weakness")
        );
        assert_eq!(DamageType::True.resistance_stat(), None);
    }

    #[test]
    fn validate_rejects_out_of_range_chance() {
        let action = ActionDef::new("venom_strike", "attack", 1.0).with_secondary("poison", 1.5);
        assert!(matches!(
            action.validate(),
            Err(ConfigError::InvalidAction { .. })
        ));
    }

    #[test]
    fn catalog_rejects_duplicates() {
        let err = ActionCatalog::new([
            ActionDef::new("slash", "attack", 1.0),
            ActionDef::new("slash", "attack", 2.0),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateId { kind: "action", .. }
        ));
    }
}
