use std::fmt;

use super::template::{EffectTemplate, PeriodicAction, Polarity, StackingPolicy, TemplateId};
use crate::stats::Modifier;

/// Tolerance for floating-point time comparisons.
pub(crate) const TIME_EPSILON: f64 = 1e-9;

/// Identity of an active effect, unique within its registry.
///
/// Ids are handed out in increasing order, so ordering by id is application
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u64);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live effect instance on one actor.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveEffect {
    id: EffectId,
    template: TemplateId,
    polarity: Polarity,
    modifiers: Vec<Modifier>,
    remaining: Option<f64>,
    stacking: StackingPolicy,
    periodic: Option<PeriodicAction>,
    since_pulse: f64,
}

impl ActiveEffect {
    pub(crate) fn from_template(id: EffectId, template: &EffectTemplate) -> Self {
        Self {
            id,
            template: template.id().clone(),
            polarity: template.polarity(),
            modifiers: template.modifiers().to_vec(),
            remaining: template.duration(),
            stacking: template.stacking(),
            periodic: template.periodic(),
            since_pulse: 0.0,
        }
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn template(&self) -> &TemplateId {
        &self.template
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Modifiers of this effect that target `stat`; empty for any other stat.
    pub fn modifiers_for<'a>(&'a self, stat: &'a str) -> impl Iterator<Item = &'a Modifier> + 'a {
        self.modifiers.iter().filter(move |m| m.targets(stat))
    }

    /// Remaining duration; `None` for permanent effects.
    pub fn remaining(&self) -> Option<f64> {
        self.remaining
    }

    pub fn stacking(&self) -> StackingPolicy {
        self.stacking
    }

    pub fn periodic(&self) -> Option<PeriodicAction> {
        self.periodic
    }

    pub fn is_permanent(&self) -> bool {
        self.remaining.is_none()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining.is_some_and(|r| r <= TIME_EPSILON)
    }

    /// Reset duration and pulse progress from the template.
    pub(crate) fn refresh(&mut self, template: &EffectTemplate) {
        self.remaining = template.duration();
        self.since_pulse = 0.0;
    }

    /// Advance by `delta`, returning how many periodic pulses fired.
    ///
    /// Only time inside the remaining duration counts towards pulses. The
    /// count saturates at `u32::MAX`. `delta` must be finite.
    pub(crate) fn advance(&mut self, delta: f64) -> u32 {
        let active = self.remaining.map_or(delta, |r| r.clamp(0.0, delta));
        let mut pulses = 0;

        if let Some(periodic) = self.periodic {
            let elapsed = self.since_pulse + active;
            let fired = ((elapsed + TIME_EPSILON) / periodic.interval).floor();
            self.since_pulse = (elapsed - fired * periodic.interval).clamp(0.0, periodic.interval);
            // float-to-int `as` saturates
            pulses = fired as u32;
        }

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = (*remaining - delta).max(0.0);
        }

        pulses
    }
}
