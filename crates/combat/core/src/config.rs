use crate::error::ConfigError;

/// Clamp band for the final hit probability.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitChanceBand {
    pub min: f64,
    pub max: f64,
}

impl HitChanceBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, chance: f64) -> f64 {
        chance.clamp(self.min, self.max)
    }
}

impl Default for HitChanceBand {
    fn default() -> Self {
        Self::new(
            CombatConfig::DEFAULT_MIN_HIT_CHANCE,
            CombatConfig::DEFAULT_MAX_HIT_CHANCE,
        )
    }
}

/// Combat balance parameters and tunable constants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Final hit probability is clamped into this band.
    pub hit_chance: HitChanceBand,
    /// Damage multiplier applied on a critical hit.
    pub critical_multiplier: f64,
    /// Fraction of the defender's `defense` stat subtracted from raw damage.
    pub defense_factor: f64,
    /// Lowest damage a landed hit can deal.
    pub minimum_damage: f64,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of actions remembered per actor for combo detection.
    pub const MAX_COMBO_HISTORY: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MIN_HIT_CHANCE: f64 = 0.05;
    pub const DEFAULT_MAX_HIT_CHANCE: f64 = 0.95;
    pub const DEFAULT_CRITICAL_MULTIPLIER: f64 = 2.0;
    pub const DEFAULT_DEFENSE_FACTOR: f64 = 0.5;
    pub const DEFAULT_MINIMUM_DAMAGE: f64 = 1.0;

    pub fn new() -> Self {
        Self {
            hit_chance: HitChanceBand::default(),
            critical_multiplier: Self::DEFAULT_CRITICAL_MULTIPLIER,
            defense_factor: Self::DEFAULT_DEFENSE_FACTOR,
            minimum_damage: Self::DEFAULT_MINIMUM_DAMAGE,
        }
    }

    pub fn with_hit_chance(mut self, min: f64, max: f64) -> Self {
        self.hit_chance = HitChanceBand::new(min, max);
        self
    }

    pub fn with_defense_factor(mut self, defense_factor: f64) -> Self {
        self.defense_factor = defense_factor;
        self
    }

    pub fn with_minimum_damage(mut self, minimum_damage: f64) -> Self {
        self.minimum_damage = minimum_damage;
        self
    }

    /// Rejects values that would make resolution meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let band = self.hit_chance;
        if !(0.0..=1.0).contains(&band.min) || !(0.0..=1.0).contains(&band.max) {
            return Err(ConfigError::InvalidConfig(
                "hit chance band must lie within [0, 1]",
            ));
        }
        if band.min > band.max {
            return Err(ConfigError::InvalidConfig("hit chance band is inverted"));
        }
        if !self.critical_multiplier.is_finite() || self.critical_multiplier < 1.0 {
            return Err(ConfigError::InvalidConfig(
                "critical multiplier must be >= 1",
            ));
        }
        if !self.defense_factor.is_finite() || self.defense_factor < 0.0 {
            return Err(ConfigError::InvalidConfig("defense factor must be >= 0"));
        }
        if !self.minimum_damage.is_finite() || self.minimum_damage < 0.0 {
            return Err(ConfigError::InvalidConfig("minimum damage must be >= 0"));
        }
        Ok(())
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CombatConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_band_is_rejected() {
        let config = CombatConfig::new().with_hit_chance(0.9, 0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig(_))
        ));
    }
}
