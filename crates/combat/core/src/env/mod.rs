//! Injected collaborators: randomness.
mod rng;

pub use rng::{FixedRolls, PcgSource, RandomSource};
