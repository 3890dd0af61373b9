//! Deterministic combat rules: stat resolution, effects, combos and actions.
//!
//! `combat-core` computes an actor's effective statistics from layered
//! modifiers and resolves attacks and spells into deterministic outcomes.
//! Rules arrive as a validated [`Ruleset`]; actors, randomness and time are
//! supplied by the caller, so every API here is pure apart from the actors
//! passed in.
pub mod actor;
pub mod combat;
pub mod combo;
pub mod config;
pub mod effects;
pub mod env;
pub mod error;
pub mod ruleset;
pub mod stats;

mod id;

pub use actor::{Actor, ActorId, EquippedItem};
pub use combat::{
    ActionCatalog, ActionDef, ActionId, ActionKind, ActionPerformed, ActionRequest, ActionResult,
    Avoidance, CombatError, CombatOutcome, CombatResolver, CombatSnapshot, DamageType,
    OutcomeFlags, Rejection, ResourceCost, SecondaryEffect,
};
pub use combo::{
    ComboCatalog, ComboId, ComboPattern, ComboRecipient, ComboTracker, ComboTriggered,
};
pub use config::{CombatConfig, HitChanceBand};
pub use effects::{
    ActiveEffect, EffectApplication, EffectCatalog, EffectId, EffectObserver, EffectRegistry,
    EffectTemplate, PeriodicAction, Polarity, StackingPolicy, TemplateId, TickReport,
    TracingObserver,
};
pub use env::{FixedRolls, PcgSource, RandomSource};
pub use error::{CombatFault, ConfigError, ErrorSeverity};
pub use ruleset::Ruleset;
pub use stats::{
    Formula, Modifier, ModifierKind, ResolvedStat, ResourceKind, ResourceMeter, ResourceMeters,
    StatBounds, StatCatalog, StatDef, StatError, StatId, StatKind, StatResolver,
};
