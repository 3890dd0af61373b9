//! Damage calculation.

use super::action::DamageType;
use crate::config::CombatConfig;

/// Resolved numbers that feed one damage calculation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageInputs {
    pub power: f64,
    pub attack: f64,
    pub defense: f64,
    pub resistance: f64,
    pub weakness: f64,
    pub damage_type: DamageType,
    pub critical: bool,
}

/// Calculate damage for a landed hit.
///
/// # Formula
///
/// ```text
/// raw      = power × attack
/// reduced  = max(raw - defense × defense_factor, 0)      (skipped for True)
/// typed    = reduced × max(1 - resistance + weakness, 0) (skipped for True)
/// final    = max(typed × crit_multiplier?, minimum_damage)
/// ```
pub fn calculate_damage(inputs: &DamageInputs, config: &CombatConfig) -> f64 {
    let raw = inputs.power * inputs.attack;

    let typed = if inputs.damage_type.is_true() {
        raw
    } else {
        let reduced = (raw - inputs.defense * config.defense_factor).max(0.0);
        reduced * type_multiplier(inputs.resistance, inputs.weakness)
    };

    let dealt = if inputs.critical {
        typed * config.critical_multiplier
    } else {
        typed
    };

    dealt.max(config.minimum_damage)
}

/// `1 - resistance + weakness`, never negative.
pub fn type_multiplier(resistance: f64, weakness: f64) -> f64 {
    (1.0 - resistance + weakness).max(0.0)
}
