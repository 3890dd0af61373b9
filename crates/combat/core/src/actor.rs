//! Actor state read and mutated by the combat core.
//!
//! Actors are supplied by the caller; the core never creates or destroys
//! them. It reads base stats and equipment, and mutates only resources and
//! the effect registry.

use std::collections::BTreeMap;
use std::fmt;

use crate::effects::{EffectObserver, EffectRegistry, TickReport};
use crate::stats::{Modifier, ResourceMeters, StatId};

/// Unique identifier for an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

/// An equipped item as seen by stat resolution: an id and its bonuses.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquippedItem {
    pub id: String,
    pub bonuses: Vec<Modifier>,
}

impl EquippedItem {
    pub fn new(id: impl Into<String>, bonuses: Vec<Modifier>) -> Self {
        Self {
            id: id.into(),
            bonuses,
        }
    }

    /// Bonuses of this item that target `stat`.
    pub fn bonuses_for<'a>(&'a self, stat: &'a str) -> impl Iterator<Item = &'a Modifier> + 'a {
        self.bonuses.iter().filter(move |m| m.targets(stat))
    }
}

/// Complete combat-relevant actor state.
///
/// # Invariants
///
/// - `effects` is the only place temporary modifiers live
/// - `equipment` is read-only for the core
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    id: ActorId,
    base_stats: BTreeMap<StatId, f64>,
    equipment: Vec<EquippedItem>,
    resources: ResourceMeters,
    effects: EffectRegistry,
}

impl Actor {
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            base_stats: BTreeMap::new(),
            equipment: Vec::new(),
            resources: ResourceMeters::default(),
            effects: EffectRegistry::new(id),
        }
    }

    pub fn with_base_stat(mut self, stat: impl Into<StatId>, value: f64) -> Self {
        self.set_base_stat(stat, value);
        self
    }

    pub fn with_resources(mut self, resources: ResourceMeters) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_equipment(mut self, item: EquippedItem) -> Self {
        self.equip(item);
        self
    }

    #[inline]
    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn set_base_stat(&mut self, stat: impl Into<StatId>, value: f64) {
        self.base_stats.insert(stat.into(), value);
    }

    /// Stored base value, if the actor has one for `stat`.
    pub fn base_stat(&self, stat: &str) -> Option<f64> {
        self.base_stats.get(stat).copied()
    }

    pub fn base_stats(&self) -> impl Iterator<Item = (&StatId, f64)> {
        self.base_stats.iter().map(|(stat, value)| (stat, *value))
    }

    /// Append an item. Items are read in equip order.
    pub fn equip(&mut self, item: EquippedItem) {
        self.equipment.push(item);
    }

    /// Remove the first item with `id`, returning it.
    pub fn unequip(&mut self, id: &str) -> Option<EquippedItem> {
        let index = self.equipment.iter().position(|item| item.id == id)?;
        Some(self.equipment.remove(index))
    }

    pub fn equipment(&self) -> &[EquippedItem] {
        &self.equipment
    }

    pub fn resources(&self) -> &ResourceMeters {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceMeters {
        &mut self.resources
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut EffectRegistry {
        &mut self.effects
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.resources.health.is_depleted()
    }

    /// Advance this actor's effects by `delta`, applying periodic actions to
    /// its own resources.
    pub fn tick(&mut self, delta: f64, observer: &mut dyn EffectObserver) -> TickReport {
        self.effects.tick(delta, &mut self.resources, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectTemplate, PeriodicAction};
    use crate::stats::{ResourceKind, ResourceMeter};

    #[test]
    fn tick_routes_periodic_damage_to_own_health() {
        let mut actor = Actor::new(ActorId(3)).with_resources(ResourceMeters::new(
            ResourceMeter::full(40.0),
            ResourceMeter::full(10.0),
            ResourceMeter::full(10.0),
        ));
        let burn = EffectTemplate::builder("burn")
            .duration(2.0)
            .periodic(PeriodicAction::damage(5.0, 1.0))
            .build()
            .unwrap();
        actor.effects_mut().apply(&burn);

        let report = actor.tick(1.0, &mut ());

        assert_eq!(report.net_change(ResourceKind::Health), -5.0);
        assert_eq!(actor.resources().health.current, 35.0);
    }

    #[test]
    fn unequip_removes_first_match() {
        let mut actor = Actor::new(ActorId(1))
            .with_equipment(EquippedItem::new("ring", vec![Modifier::flat("luck", 1.0)]))
            .with_equipment(EquippedItem::new("ring", vec![Modifier::flat("luck", 2.0)]));

        let removed = actor.unequip("ring").unwrap();
        assert_eq!(removed.bonuses[0], Modifier::flat("luck", 1.0));
        assert_eq!(actor.equipment().len(), 1);
        assert!(actor.unequip("boots").is_none());
    }
}
