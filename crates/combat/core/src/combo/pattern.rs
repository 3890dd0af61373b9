//! Combo patterns and their catalog.

use std::collections::BTreeSet;

use super::window::ComboEntry;
use crate::combat::ActionId;
use crate::config::CombatConfig;
use crate::effects::TemplateId;
use crate::error::ConfigError;
use crate::id::string_id;

string_id! {
    /// Identifier of a combo pattern, e.g. `"triple_strike"`.
    ComboId
}

/// Which side of the triggering action receives the combo effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComboRecipient {
    #[default]
    Caster,
    Target,
}

/// An ordered action sequence that injects an effect when completed in time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboPattern {
    pub id: ComboId,
    pub sequence: Vec<ActionId>,
    /// Maximum span in seconds from the first matched action to the last.
    pub window: f64,
    pub effect: TemplateId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub recipient: ComboRecipient,
}

impl ComboPattern {
    pub fn new(
        id: impl Into<ComboId>,
        sequence: impl IntoIterator<Item = impl Into<ActionId>>,
        window: f64,
        effect: impl Into<TemplateId>,
    ) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into_iter().map(Into::into).collect(),
            window,
            effect: effect.into(),
            recipient: ComboRecipient::Caster,
        }
    }

    pub fn on_target(mut self) -> Self {
        self.recipient = ComboRecipient::Target;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidCombo {
            combo: self.id.to_string(),
            reason,
        };

        if self.sequence.is_empty() {
            return Err(invalid("sequence is empty".to_owned()));
        }
        if self.sequence.len() > CombatConfig::MAX_COMBO_HISTORY {
            return Err(invalid(format!(
                "sequence is longer than the {} action history",
                CombatConfig::MAX_COMBO_HISTORY
            )));
        }
        if !self.window.is_finite() || self.window <= 0.0 {
            return Err(invalid("window must be positive and finite".to_owned()));
        }
        Ok(())
    }

    /// Whether `entries` (oldest first) complete this pattern.
    ///
    /// The newest entry must be the pattern's last action. Earlier actions
    /// are searched backwards in order, other actions may sit between them,
    /// and the whole match must fit inside `window`.
    pub fn matches(&self, entries: &[ComboEntry]) -> bool {
        let Some((newest, earlier)) = entries.split_last() else {
            return false;
        };
        let Some((last, rest)) = self.sequence.split_last() else {
            return false;
        };
        if newest.action != *last {
            return false;
        }

        let mut cursor = earlier.len();
        for wanted in rest.iter().rev() {
            // The nearest candidate gives the tightest span, so if it does
            // not fit nothing earlier will.
            let Some(index) = earlier[..cursor].iter().rposition(|e| e.action == *wanted) else {
                return false;
            };
            if newest.at - earlier[index].at > self.window {
                return false;
            }
            cursor = index;
        }
        true
    }
}

/// Validated combo patterns in matching order.
///
/// Longer patterns are tested first so that `[a, b, c]` wins over `[b, c]`;
/// equal lengths keep declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComboCatalog {
    patterns: Vec<ComboPattern>,
    horizon: f64,
}

impl ComboCatalog {
    pub fn new(patterns: impl IntoIterator<Item = ComboPattern>) -> Result<Self, ConfigError> {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        for pattern in patterns {
            pattern.validate()?;
            if !seen.insert(pattern.id.clone()) {
                return Err(ConfigError::DuplicateId {
                    kind: "combo",
                    id: pattern.id.to_string(),
                });
            }
            ordered.push(pattern);
        }
        // Stable sort keeps declaration order among equal lengths.
        ordered.sort_by(|a, b| b.sequence.len().cmp(&a.sequence.len()));

        let horizon = ordered.iter().map(|p| p.window).fold(0.0, f64::max);
        Ok(Self {
            patterns: ordered,
            horizon,
        })
    }

    /// Oldest age an entry can have and still take part in a match.
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn get(&self, id: &str) -> Option<&ComboPattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    /// Patterns in matching order.
    pub fn iter(&self) -> impl Iterator<Item = &ComboPattern> {
        self.patterns.iter()
    }

    /// First pattern, in matching order, completed by `entries`.
    pub fn find_match(&self, entries: &[ComboEntry]) -> Option<&ComboPattern> {
        self.patterns.iter().find(|p| p.matches(entries))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(actions: &[(&str, f64)]) -> Vec<ComboEntry> {
        actions
            .iter()
            .map(|(action, at)| ComboEntry::new(*action, *at))
            .collect()
    }

    fn abc() -> ComboPattern {
        ComboPattern::new("abc", ["a", "b", "c"], 3.0, "momentum")
    }

    #[test]
    fn matches_in_order_within_window() {
        let window = entries(&[("a", 0.0), ("b", 1.0), ("c", 2.0)]);
        assert!(abc().matches(&window));
    }

    #[test]
    fn wrong_order_never_matches() {
        let window = entries(&[("a", 0.0), ("c", 1.0), ("b", 2.0)]);
        assert!(!abc().matches(&window));
    }

    #[test]
    fn interleaved_actions_are_skipped() {
        let window = entries(&[("a", 0.0), ("x", 0.5), ("b", 1.0), ("c", 2.0)]);
        assert!(abc().matches(&window));
    }

    #[test]
    fn span_beyond_window_fails() {
        let window = entries(&[("a", 0.0), ("b", 2.0), ("c", 3.5)]);
        assert!(!abc().matches(&window));
    }

    #[test]
    fn catalog_orders_longest_first() {
        let catalog = ComboCatalog::new([
            ComboPattern::new("bc", ["b", "c"], 2.0, "spark"),
            abc(),
        ])
        .unwrap();

        let matched = catalog
            .find_match(&entries(&[("a", 0.0), ("b", 1.0), ("c", 2.0)]))
            .unwrap();
        assert_eq!(matched.id, "abc");
        assert_eq!(catalog.horizon(), 3.0);
    }

    #[test]
    fn validate_rejects_empty_sequence_and_bad_window() {
        let empty = ComboPattern::new("none", Vec::<&str>::new(), 1.0, "x");
        assert!(empty.validate().is_err());

        let mut zero = abc();
        zero.window = 0.0;
        assert!(zero.validate().is_err());
    }
}
