//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors live next to the code that produces them
//! (`StatError` in [`crate::stats`], `CombatError` in [`crate::combat`]).
//! Configuration errors are shared by every catalog and are defined here,
//! because they are raised while a [`crate::Ruleset`] is assembled.
//!
//! # Design Principles
//!
//! - **Typed**: every failure is an explicit variant, never a default number
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Load-time validation**: malformed content fails before the first action

use crate::stats::StatId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: normal gameplay condition, caller may retry differently
/// - **Validation**: invalid request, reject without retry
/// - **Fatal**: broken configuration, startup must halt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error (e.g. not enough stamina for this action).
    Recoverable,

    /// Validation error (e.g. unknown action id, unknown stat name).
    Validation,

    /// Fatal error (e.g. cyclic formula, malformed template).
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error must halt startup.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatFault: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and test assertions.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Malformed configuration detected while building or using a ruleset.
///
/// Every variant is fatal: configuration errors should stop startup rather
/// than surface in the middle of a fight.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("derived stat formula cycle: {}", format_path(.path))]
    FormulaCycle { path: Vec<StatId> },

    #[error("formula for '{stat}' reads undeclared stat '{input}'")]
    UnknownFormulaInput { stat: StatId, input: StatId },

    #[error("stat '{0}' declared more than once")]
    DuplicateStat(StatId),

    #[error("stat '{stat}' has inverted bounds [{min}, {max}]")]
    InvalidBounds { stat: StatId, min: f64, max: f64 },

    #[error("{required_by} requires undeclared stat '{stat}'")]
    MissingStat { required_by: String, stat: StatId },

    #[error("{owner} modifies undeclared stat '{stat}'")]
    UnknownModifierTarget { owner: String, stat: StatId },

    #[error("effect template '{template}' is malformed: {reason}")]
    InvalidTemplate {
        template: String,
        reason: &'static str,
    },

    #[error("{owner} references unknown effect template '{template}'")]
    UnknownTemplate { owner: String, template: String },

    #[error("combo '{combo}' is malformed: {reason}")]
    InvalidCombo { combo: String, reason: String },

    #[error("action '{action}' is malformed: {reason}")]
    InvalidAction { action: String, reason: String },

    #[error("{kind} id '{id}' declared more than once")]
    DuplicateId { kind: &'static str, id: String },

    #[error("combat config is malformed: {0}")]
    InvalidConfig(&'static str),
}

impl CombatFault for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::FormulaCycle { .. } => "CONFIG_FORMULA_CYCLE",
            Self::UnknownFormulaInput { .. } => "CONFIG_UNKNOWN_FORMULA_INPUT",
            Self::DuplicateStat(_) => "CONFIG_DUPLICATE_STAT",
            Self::InvalidBounds { .. } => "CONFIG_INVALID_BOUNDS",
            Self::MissingStat { .. } => "CONFIG_MISSING_STAT",
            Self::UnknownModifierTarget { .. } => "CONFIG_UNKNOWN_MODIFIER_TARGET",
            Self::InvalidTemplate { .. } => "CONFIG_INVALID_TEMPLATE",
            Self::UnknownTemplate { .. } => "CONFIG_UNKNOWN_TEMPLATE",
            Self::InvalidCombo { .. } => "CONFIG_INVALID_COMBO",
            Self::InvalidAction { .. } => "CONFIG_INVALID_ACTION",
            Self::DuplicateId { .. } => "CONFIG_DUPLICATE_ID",
            Self::InvalidConfig(_) => "CONFIG_INVALID",
        }
    }
}

fn format_path(path: &[StatId]) -> String {
    path.iter()
        .map(StatId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_path() {
        let err = ConfigError::FormulaCycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "derived stat formula cycle: a -> b -> a");
        assert!(err.severity().is_fatal());
        assert_eq!(err.error_code(), "CONFIG_FORMULA_CYCLE");
    }
}
