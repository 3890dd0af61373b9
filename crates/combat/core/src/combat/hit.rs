//! Hit chance and avoidance checks.

use crate::config::HitChanceBand;

/// Calculate hit chance based on accuracy vs evasion.
///
/// # Formula
///
/// ```text
/// hit_chance = accuracy - evasion
/// clamped to [band.min, band.max]
/// ```
pub fn calculate_hit_chance(accuracy: f64, evasion: f64, band: HitChanceBand) -> f64 {
    band.clamp(accuracy - evasion)
}

/// A roll in `[0, 1)` succeeds when strictly below `chance`.
#[inline]
pub fn check_roll(chance: f64, roll: f64) -> bool {
    roll < chance
}
