//! Stat System - declared stats, modifiers and resolution.
//!
//! # Architecture
//!
//! ```text
//! [ Base stats (actor) ]
//!      ↓
//! [ Derived formulas ]         recursive, cycle-checked
//!      ↓
//! [ Modifiers ]                equipment, then active effects
//!      ↓
//! [ Clamp ]                    declared bounds
//! ```
//!
//! ## Principles
//!
//! 1. **One target per modifier**: a modifier names exactly one stat
//! 2. **One walk per source**: equipment and the effect registry are each
//!    iterated once per resolution
//! 3. **Deterministic**: pure functions, no I/O or randomness
//! 4. **Explicit failure**: unknown stats and cycles are errors, never zero
//!
//! ## Modifier Stack
//!
//! `Flat → Percent → Override → Clamp`

pub mod catalog;
pub mod formula;
pub mod id;
pub mod modifier;
pub mod resolver;
pub mod resources;

pub use catalog::{StatCatalog, StatDef, StatKind};
pub use formula::{Formula, FormulaTerm};
pub use id::StatId;
pub use modifier::{Modifier, ModifierKind, ModifierStack, StatBounds};
pub use resolver::{ResolvedStat, StatError, StatResolver};
pub use resources::{ResourceKind, ResourceMeter, ResourceMeters};
