//! Combo detection: timed action sequences that inject effects.
//!
//! ```text
//! record(action, t) → evict stale → push → match (longest first) → apply effect
//!                                                                 → clear window
//! ```

pub mod pattern;
pub mod tracker;
pub mod window;

pub use pattern::{ComboCatalog, ComboId, ComboPattern, ComboRecipient};
pub use tracker::{ComboTracker, ComboTriggered};
pub use window::{ComboEntry, ComboWindow};
