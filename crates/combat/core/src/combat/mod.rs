//! Combat resolution system.
//!
//! # Architecture
//!
//! - **Staged**: [`CombatResolver::perform`] runs validate, roll, apply and
//!   complete as separate steps; only the first can fail
//! - **Stats-based**: every number comes from [`crate::stats::StatResolver`],
//!   so resistances follow the same modifier pipeline as any other stat
//! - **Injected randomness**: rolls come from a caller-supplied
//!   [`crate::env::RandomSource`]
//!
//! # Core Functions
//!
//! - `calculate_hit_chance`: accuracy vs evasion, clamped to the configured band
//! - `calculate_damage`: attack, defense, resistance and critical multiplier

pub mod action;
pub mod damage;
pub mod hit;
pub mod outcome;
pub mod resolver;

pub use action::{
    ActionCatalog, ActionDef, ActionId, ActionKind, ActionRequest, Avoidance, DamageType,
    ResourceCost, SecondaryEffect,
};
pub use damage::{DamageInputs, calculate_damage, type_multiplier};
pub use hit::{calculate_hit_chance, check_roll};
pub use outcome::{ActionPerformed, ActionResult, CombatOutcome, OutcomeFlags, Rejection};
pub use resolver::{CombatError, CombatResolver, CombatSnapshot};

/// Stat names the resolver reads directly.
///
/// A ruleset must declare all of these; block and parry chances only when an
/// action can be blocked or parried.
pub mod stat_names {
    pub const ACCURACY: &str = "accuracy";
    pub const EVASION: &str = "evasion";
    pub const CRITICAL_CHANCE: &str = "critical_chance";
    pub const DEFENSE: &str = "defense";
    pub const BLOCK_CHANCE: &str = "block_chance";
    pub const PARRY_CHANCE: &str = "parry_chance";

    /// Stats every ruleset needs regardless of its actions.
    pub const REQUIRED: [&str; 4] = [ACCURACY, EVASION, CRITICAL_CHANCE, DEFENSE];
}
