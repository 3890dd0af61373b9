//! Temporary and permanent effects.
//!
//! Templates ([`EffectTemplate`]) are validated content; [`ActiveEffect`]s are
//! their live instances, owned by one actor's [`EffectRegistry`].
//!
//! ```text
//! EffectTemplate ──apply──▶ EffectRegistry ──tick──▶ PeriodicPulse / expiry
//!                                 │
//!                                 └──active_effects──▶ StatResolver
//! ```

pub mod active;
pub mod registry;
pub mod template;

pub use active::{ActiveEffect, EffectId};
pub use registry::{
    EffectApplication, EffectObserver, EffectRegistry, PeriodicPulse, TickReport, TracingObserver,
};
pub use template::{
    EffectCatalog, EffectTemplate, EffectTemplateBuilder, PeriodicAction, Polarity,
    StackingPolicy, TemplateId,
};

#[cfg(feature = "serde")]
pub use template::EffectTemplateSpec;
