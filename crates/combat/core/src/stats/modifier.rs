//! Modifier application following a fixed stack order.
//!
//! Every contribution to a stat, whatever its source, is a [`Modifier`] and is
//! folded through the same stack:
//! `Flat → Percent → Override → Clamp`
//!
//! A modifier names exactly one target stat. The resolver filters on that name
//! before anything is added to a stack, so a modifier can never leak into the
//! computation of a different stat.

use super::id::StatId;

/// How a modifier changes its target stat.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKind {
    /// Additive amount, summed first (e.g. +2 attack from a sword).
    Flat(f64),

    /// Fractional increase, summed then applied once: `0.2` = +20%.
    Percent(f64),

    /// Replaces the final value (e.g. a hard 0.95 dodge cap).
    ///
    /// When several overrides target one stat the highest priority wins;
    /// equal priorities resolve to the lowest value.
    Override { value: f64, priority: i32 },
}

/// A single typed contribution to one named stat.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub stat: StatId,
    pub kind: ModifierKind,
}

impl Modifier {
    pub fn new(stat: impl Into<StatId>, kind: ModifierKind) -> Self {
        Self {
            stat: stat.into(),
            kind,
        }
    }

    pub fn flat(stat: impl Into<StatId>, amount: f64) -> Self {
        Self::new(stat, ModifierKind::Flat(amount))
    }

    pub fn percent(stat: impl Into<StatId>, amount: f64) -> Self {
        Self::new(stat, ModifierKind::Percent(amount))
    }

    pub fn override_with(stat: impl Into<StatId>, value: f64, priority: i32) -> Self {
        Self::new(stat, ModifierKind::Override { value, priority })
    }

    /// Whether this modifier contributes to `stat`.
    #[inline]
    pub fn targets(&self, stat: &str) -> bool {
        self.stat.as_str() == stat
    }

    /// Non-finite amounts are rejected at load time.
    pub fn is_finite(&self) -> bool {
        match self.kind {
            ModifierKind::Flat(v) | ModifierKind::Percent(v) => v.is_finite(),
            ModifierKind::Override { value, .. } => value.is_finite(),
        }
    }
}

/// Lower/upper clamp for a stat's final value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBounds {
    pub min: f64,
    pub max: f64,
}

impl StatBounds {
    /// Probabilities (hit, critical, block, parry) [0, 1]
    pub const CHANCE: Self = Self { min: 0.0, max: 1.0 };

    /// Non-negative quantities (attack, defense, resource maxima)
    pub const NON_NEGATIVE: Self = Self {
        min: 0.0,
        max: f64::INFINITY,
    };

    /// No bounds (unclamped)
    pub const UNBOUNDED: Self = Self {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn is_valid(&self) -> bool {
        !self.min.is_nan() && !self.max.is_nan() && self.min <= self.max
    }
}

impl Default for StatBounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Accumulated modifiers for one stat, applied in stack order.
///
/// # Example
/// ```
/// # use combat_core::stats::{ModifierKind, ModifierStack, StatBounds};
/// let mut stack = ModifierStack::new();
/// stack.add(ModifierKind::Flat(5.0));
/// stack.add(ModifierKind::Percent(0.2));
/// stack.add(ModifierKind::Percent(0.3));
///
/// // (10 + 5) × 1.5
/// assert_eq!(stack.apply(10.0, StatBounds::UNBOUNDED), 22.5);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModifierStack {
    flat: f64,
    percent: f64,
    winning_override: Option<(i32, f64)>,
    len: usize,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: ModifierKind) {
        self.len += 1;
        match kind {
            ModifierKind::Flat(amount) => self.flat += amount,
            ModifierKind::Percent(amount) => self.percent += amount,
            ModifierKind::Override { value, priority } => {
                let replace = match self.winning_override {
                    None => true,
                    Some((best_priority, best_value)) => {
                        priority > best_priority
                            || (priority == best_priority && value < best_value)
                    }
                };
                if replace {
                    self.winning_override = Some((priority, value));
                }
            }
        }
    }

    pub fn extend<'a>(&mut self, kinds: impl IntoIterator<Item = &'a ModifierKind>) {
        for kind in kinds {
            self.add(*kind);
        }
    }

    /// Apply the stack to `base` and clamp.
    ///
    /// ```text
    /// result = clamp(override.unwrap_or((base + Σflat) × (1 + Σpercent)), min, max)
    /// ```
    pub fn apply(&self, base: f64, bounds: StatBounds) -> f64 {
        let scaled = (base + self.flat) * (1.0 + self.percent);
        let value = self.override_value().unwrap_or(scaled);
        bounds.clamp(value)
    }

    pub fn flat_sum(&self) -> f64 {
        self.flat
    }

    pub fn percent_sum(&self) -> f64 {
        self.percent
    }

    pub fn override_value(&self) -> Option<f64> {
        self.winning_override.map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }
}
