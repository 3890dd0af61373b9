//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod check_content;
mod duel;
mod resolve_stat;

pub use check_content::CheckContent;
pub use duel::Duel;
pub use resolve_stat::ResolveStat;
