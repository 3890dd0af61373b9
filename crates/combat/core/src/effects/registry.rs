//! Per-actor owner of active effects.
//!
//! The registry is the single place temporary modifiers live. Readers get a
//! shared iterator; only `apply`, `tick` and the removal methods mutate.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::active::{ActiveEffect, EffectId};
use super::template::{EffectTemplate, Polarity, StackingPolicy};
use crate::actor::ActorId;
use crate::stats::{ResourceKind, ResourceMeters};

/// Callbacks fired by [`EffectRegistry::tick`].
///
/// Each expiry is reported exactly once, after the effect has left the
/// registry.
pub trait EffectObserver {
    fn on_expire(&mut self, _owner: ActorId, _effect: &ActiveEffect) {}

    fn on_pulse(&mut self, _owner: ActorId, _effect: &ActiveEffect, _pulse: &PeriodicPulse) {}
}

impl EffectObserver for () {}

/// Observer that forwards lifecycle events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl EffectObserver for TracingObserver {
    fn on_expire(&mut self, owner: ActorId, effect: &ActiveEffect) {
        debug!(
            actor = %owner,
            effect = %effect.id(),
            template = %effect.template(),
            "effect expired"
        );
    }

    fn on_pulse(&mut self, owner: ActorId, effect: &ActiveEffect, pulse: &PeriodicPulse) {
        debug!(
            actor = %owner,
            effect = %effect.id(),
            resource = %pulse.resource,
            count = pulse.count,
            applied = pulse.applied,
            "periodic effect fired"
        );
    }
}

/// Periodic firings of one effect during a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicPulse {
    pub effect: EffectId,
    pub resource: ResourceKind,
    /// Intervals that elapsed, saturating at `u32::MAX`.
    pub count: u32,
    /// Total change actually applied after clamping to the meter.
    pub applied: f64,
}

/// Result of [`EffectRegistry::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectApplication {
    /// A new instance was inserted.
    Added(EffectId),
    /// An active instance had its duration reset.
    Refreshed(EffectId),
    /// Nothing changed; carries the instance that blocked the application.
    Unchanged(EffectId),
}

impl EffectApplication {
    pub fn id(self) -> EffectId {
        match self {
            Self::Added(id) | Self::Refreshed(id) | Self::Unchanged(id) => id,
        }
    }

    /// Id of the instance that was added or refreshed, if any.
    pub fn changed(self) -> Option<EffectId> {
        match self {
            Self::Added(id) | Self::Refreshed(id) => Some(id),
            Self::Unchanged(_) => None,
        }
    }
}

/// What happened during one [`EffectRegistry::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub pulses: Vec<PeriodicPulse>,
    pub expired: Vec<EffectId>,
}

impl TickReport {
    /// Net change applied to `resource` by this tick.
    pub fn net_change(&self, resource: ResourceKind) -> f64 {
        self.pulses
            .iter()
            .filter(|p| p.resource == resource)
            .map(|p| p.applied)
            .sum()
    }
}

/// Active effects of one actor, keyed by id in application order.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectRegistry {
    owner: ActorId,
    effects: BTreeMap<EffectId, ActiveEffect>,
    next_id: u64,
}

impl EffectRegistry {
    pub fn new(owner: ActorId) -> Self {
        Self {
            owner,
            effects: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    /// Instantiate `template` according to its stacking policy.
    ///
    /// - `Unique`: an active instance is kept unchanged
    /// - `RefreshOnReapply`: an active instance has its duration reset
    /// - `Stack { max }`: a new instance is added while fewer than `max` exist;
    ///   at the limit this is a no-op reporting the newest instance
    pub fn apply(&mut self, template: &EffectTemplate) -> EffectApplication {
        let template_id = template.id().as_str();

        match template.stacking() {
            StackingPolicy::Unique => {
                if let Some(existing) = self.newest_of(template_id) {
                    trace!(
                        actor = %self.owner,
                        template = template_id,
                        "unique effect already active"
                    );
                    return EffectApplication::Unchanged(existing);
                }
            }
            StackingPolicy::RefreshOnReapply => {
                if let Some(existing) = self.newest_of(template_id) {
                    if let Some(effect) = self.effects.get_mut(&existing) {
                        effect.refresh(template);
                    }
                    debug!(
                        actor = %self.owner,
                        effect = %existing,
                        template = template_id,
                        "effect refreshed"
                    );
                    return EffectApplication::Refreshed(existing);
                }
            }
            StackingPolicy::Stack { max } => {
                if self.count_of(template_id) >= max as usize {
                    if let Some(top) = self.newest_of(template_id) {
                        trace!(
                            actor = %self.owner,
                            template = template_id,
                            max,
                            "stack limit reached"
                        );
                        return EffectApplication::Unchanged(top);
                    }
                }
            }
        }

        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.effects
            .insert(id, ActiveEffect::from_template(id, template));
        debug!(actor = %self.owner, effect = %id, template = template_id, "effect applied");
        EffectApplication::Added(id)
    }

    /// Advance every effect by `delta` time units.
    ///
    /// Periodic actions change `resources`, once per effect with every
    /// interval that elapsed folded together. Expired effects are removed and
    /// reported to `observer` once each. Non-finite or non-positive deltas do
    /// nothing.
    pub fn tick(
        &mut self,
        delta: f64,
        resources: &mut ResourceMeters,
        observer: &mut dyn EffectObserver,
    ) -> TickReport {
        let mut report = TickReport::default();
        if !delta.is_finite() || delta <= 0.0 {
            return report;
        }

        for effect in self.effects.values_mut() {
            let count = effect.advance(delta);
            let Some(periodic) = effect.periodic() else {
                continue;
            };
            if count == 0 {
                continue;
            }
            let total = periodic.amount * f64::from(count);
            let pulse = PeriodicPulse {
                effect: effect.id(),
                resource: periodic.resource,
                count,
                applied: resources.get_mut(periodic.resource).adjust(total),
            };
            observer.on_pulse(self.owner, effect, &pulse);
            report.pulses.push(pulse);
        }

        let expired: Vec<EffectId> = self
            .effects
            .values()
            .filter(|effect| effect.is_expired())
            .map(ActiveEffect::id)
            .collect();
        for id in expired {
            if let Some(effect) = self.effects.remove(&id) {
                observer.on_expire(self.owner, &effect);
                report.expired.push(id);
            }
        }

        report
    }

    /// Remove one effect immediately. Absent ids are ignored.
    pub fn remove(&mut self, id: EffectId) -> Option<ActiveEffect> {
        let removed = self.effects.remove(&id);
        if removed.is_some() {
            debug!(actor = %self.owner, effect = %id, "effect removed");
        }
        removed
    }

    /// Remove every instance of a template. Returns how many were removed.
    pub fn remove_template(&mut self, template: &str) -> usize {
        self.retain(|effect| effect.template() != template)
    }

    /// Dispel all buffs or all debuffs.
    pub fn clear_polarity(&mut self, polarity: Polarity) -> usize {
        self.retain(|effect| effect.polarity() != polarity)
    }

    /// Remove everything (e.g. on death).
    pub fn clear(&mut self) -> usize {
        let removed = self.effects.len();
        self.effects.clear();
        if removed > 0 {
            debug!(actor = %self.owner, removed, "effects cleared");
        }
        removed
    }

    /// Read-only view in application order.
    pub fn active_effects(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.values()
    }

    pub fn get(&self, id: EffectId) -> Option<&ActiveEffect> {
        self.effects.get(&id)
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.effects.contains_key(&id)
    }

    pub fn count_of(&self, template: &str) -> usize {
        self.effects
            .values()
            .filter(|effect| effect.template() == template)
            .count()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    fn newest_of(&self, template: &str) -> Option<EffectId> {
        self.effects
            .values()
            .rev()
            .find(|effect| effect.template() == template)
            .map(ActiveEffect::id)
    }

    fn retain(&mut self, mut keep: impl FnMut(&ActiveEffect) -> bool) -> usize {
        let before = self.effects.len();
        self.effects.retain(|_, effect| keep(effect));
        let removed = before - self.effects.len();
        if removed > 0 {
            debug!(actor = %self.owner, removed, "effects dispelled");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::PeriodicAction;
    use crate::stats::{Modifier, ResourceMeter};

    fn buff(stacking: StackingPolicy) -> EffectTemplate {
        EffectTemplate::builder("focus")
            .polarity(Polarity::Buff)
            .modifier(Modifier::flat("intelligence", 5.0))
            .duration(10.0)
            .stacking(stacking)
            .build()
            .unwrap()
    }

    fn meters() -> ResourceMeters {
        ResourceMeters::new(
            ResourceMeter::full(100.0),
            ResourceMeter::full(50.0),
            ResourceMeter::full(50.0),
        )
    }

    #[derive(Default)]
    struct Recorder {
        expired: Vec<EffectId>,
    }

    impl EffectObserver for Recorder {
        fn on_expire(&mut self, _owner: ActorId, effect: &ActiveEffect) {
            self.expired.push(effect.id());
        }
    }

    #[test]
    fn unique_reapply_keeps_single_instance() {
        let mut registry = EffectRegistry::new(ActorId(1));
        let template = buff(StackingPolicy::Unique);

        let first = registry.apply(&template);
        let second = registry.apply(&template);

        assert!(matches!(first, EffectApplication::Added(_)));
        assert_eq!(second, EffectApplication::Unchanged(first.id()));
        assert_eq!(second.changed(), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn refresh_resets_duration_without_second_instance() {
        let mut registry = EffectRegistry::new(ActorId(1));
        let template = buff(StackingPolicy::RefreshOnReapply);
        let mut resources = meters();

        let id = registry.apply(&template).id();
        registry.tick(7.0, &mut resources, &mut ());
        assert_eq!(registry.get(id).unwrap().remaining(), Some(3.0));

        assert_eq!(registry.apply(&template), EffectApplication::Refreshed(id));
        assert_eq!(registry.get(id).unwrap().remaining(), Some(10.0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn stack_respects_limit_and_returns_top() {
        let mut registry = EffectRegistry::new(ActorId(1));
        let template = buff(StackingPolicy::Stack { max: 2 });

        let a = registry.apply(&template);
        let b = registry.apply(&template);
        let c = registry.apply(&template);

        assert_ne!(a.id(), b.id());
        assert_eq!(c, EffectApplication::Unchanged(b.id()));
        assert_eq!(registry.count_of("focus"), 2);
    }

    #[test]
    fn expiry_notifies_exactly_once() {
        let mut registry = EffectRegistry::new(ActorId(1));
        let mut resources = meters();
        let mut recorder = Recorder::default();
        let id = registry.apply(&buff(StackingPolicy::Unique)).id();

        let report = registry.tick(10.0, &mut resources, &mut recorder);
        registry.tick(10.0, &mut resources, &mut recorder);

        assert_eq!(report.expired, vec![id]);
        assert_eq!(recorder.expired, vec![id]);
        assert!(registry.is_empty());
    }

    #[test]
    fn heal_over_time_is_clamped_to_maximum() {
        let mut registry = EffectRegistry::new(ActorId(1));
        let mut resources = meters();
        resources.health.current = 95.0;
        let regen = EffectTemplate::builder("regen")
            .periodic(PeriodicAction::heal(4.0, 1.0))
            .build()
            .unwrap();
        registry.apply(&regen);

        let report = registry.tick(2.0, &mut resources, &mut ());

        assert_eq!(report.pulses.len(), 1);
        assert_eq!(report.pulses[0].count, 2);
        assert_eq!(report.net_change(ResourceKind::Health), 5.0);
        assert_eq!(resources.health.current, 100.0);
        // Permanent effects pulse but never expire.
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn removal_is_idempotent() {
        let mut registry = EffectRegistry::new(ActorId(1));
        let id = registry.apply(&buff(StackingPolicy::Unique)).id();

        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_polarity_only_touches_matching_effects() {
        let mut registry = EffectRegistry::new(ActorId(1));
        registry.apply(&buff(StackingPolicy::Unique));
        let curse = EffectTemplate::builder("curse")
            .polarity(Polarity::Debuff)
            .modifier(Modifier::flat("strength", -2.0))
            .build()
            .unwrap();
        registry.apply(&curse);

        assert_eq!(registry.clear_polarity(Polarity::Debuff), 1);
        assert_eq!(registry.count_of("focus"), 1);
        assert_eq!(registry.count_of("curse"), 0);
    }

    #[test]
    fn non_positive_delta_is_ignored() {
        let mut registry = EffectRegistry::new(ActorId(1));
        let mut resources = meters();
        let id = registry.apply(&buff(StackingPolicy::Unique)).id();

        let report = registry.tick(-1.0, &mut resources, &mut ());
        assert_eq!(report, TickReport::default());
        assert_eq!(registry.get(id).unwrap().remaining(), Some(10.0));
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        let mut registry = EffectRegistry::new(ActorId(1));
        let mut resources = meters();
        let regen = EffectTemplate::builder("regen")
            .periodic(PeriodicAction::heal(1.0, 1.0))
            .build()
            .unwrap();
        registry.apply(&regen);

        for delta in [f64::INFINITY, f64::NAN, f64::NEG_INFINITY] {
            let report = registry.tick(delta, &mut resources, &mut ());
            assert_eq!(report, TickReport::default());
        }
        assert_eq!(resources.health.current, 100.0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn huge_delta_folds_pulses_into_one_adjustment() {
        let mut registry = EffectRegistry::new(ActorId(1));
        let mut resources = meters();
        resources.health.current = 10.0;
        let regen = EffectTemplate::builder("regen")
            .periodic(PeriodicAction::heal(1.0, 1.0))
            .build()
            .unwrap();
        registry.apply(&regen);

        let report = registry.tick(1e12, &mut resources, &mut ());

        assert_eq!(report.pulses.len(), 1);
        assert_eq!(report.pulses[0].count, u32::MAX);
        assert_eq!(report.net_change(ResourceKind::Health), 90.0);
        assert_eq!(resources.health.current, 100.0);
    }
}
