//! Resource pools (health, mana, stamina).
//!
//! Current values are actor state and are mutated only by the combat
//! resolver (costs, damage) and the effect registry (periodic actions).
//! Maximum values are set by whoever owns the actor.

/// Enum representing individual resource pools.
///
/// Used by action costs and periodic effects to reference a specific meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(strum::Display, strum::EnumString, strum::EnumIter, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResourceKind {
    Health,
    Mana,
    Stamina,
}

/// A single resource pool.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: f64,
    pub maximum: f64,
}

impl ResourceMeter {
    pub fn new(current: f64, maximum: f64) -> Self {
        Self {
            current: current.clamp(0.0, maximum.max(0.0)),
            maximum,
        }
    }

    /// A meter filled to its maximum.
    pub fn full(maximum: f64) -> Self {
        Self::new(maximum, maximum)
    }

    /// Apply a signed change, clamped to `[0, maximum]`.
    ///
    /// Returns the change actually applied.
    pub fn adjust(&mut self, amount: f64) -> f64 {
        let before = self.current;
        self.current = (self.current + amount).clamp(0.0, self.maximum.max(0.0));
        self.current - before
    }

    pub fn can_afford(&self, amount: f64) -> bool {
        self.current >= amount
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}

/// All resource pools of an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeters {
    pub health: ResourceMeter,
    pub mana: ResourceMeter,
    pub stamina: ResourceMeter,
}

impl ResourceMeters {
    pub fn new(health: ResourceMeter, mana: ResourceMeter, stamina: ResourceMeter) -> Self {
        Self {
            health,
            mana,
            stamina,
        }
    }

    pub fn get(&self, kind: ResourceKind) -> &ResourceMeter {
        match kind {
            ResourceKind::Health => &self.health,
            ResourceKind::Mana => &self.mana,
            ResourceKind::Stamina => &self.stamina,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut ResourceMeter {
        match kind {
            ResourceKind::Health => &mut self.health,
            ResourceKind::Mana => &mut self.mana,
            ResourceKind::Stamina => &mut self.stamina,
        }
    }

    pub fn current(&self, kind: ResourceKind) -> f64 {
        self.get(kind).current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_clamps_both_ends() {
        let mut meter = ResourceMeter::new(10.0, 20.0);

        assert_eq!(meter.adjust(-15.0), -10.0);
        assert_eq!(meter.current, 0.0);
        assert!(meter.is_depleted());

        assert_eq!(meter.adjust(50.0), 20.0);
        assert_eq!(meter.current, 20.0);
    }

    #[test]
    fn resource_kind_names() {
        assert_eq!(ResourceKind::Stamina.to_string(), "stamina");
        assert_eq!("mana".parse::<ResourceKind>(), Ok(ResourceKind::Mana));
    }
}
