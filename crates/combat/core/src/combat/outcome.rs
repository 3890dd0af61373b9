//! Combat result types.

use bitflags::bitflags;

use super::action::{ActionId, DamageType, ResourceCost};
use crate::actor::ActorId;
use crate::combo::ComboTriggered;
use crate::effects::EffectId;
use crate::stats::ResourceKind;

bitflags! {
    /// What happened during one action.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct OutcomeFlags: u8 {
        const HIT      = 1 << 0;
        const MISS     = 1 << 1;
        const BLOCK    = 1 << 2;
        const PARRY    = 1 << 3;
        const CRITICAL = 1 << 4;
        const DEFEATED = 1 << 5;
    }
}

/// Record of a completed action, fed to combo tracking.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionPerformed {
    pub actor: ActorId,
    pub target: ActorId,
    pub action: ActionId,
    pub timestamp: f64,
    pub hit: bool,
}

/// Immutable result of a completed action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOutcome {
    pub action: ActionId,
    pub attacker: ActorId,
    pub defender: ActorId,
    pub flags: OutcomeFlags,
    /// Final clamped hit probability.
    pub hit_chance: f64,
    /// Damage after defense, resistances and critical; `0` on a miss.
    pub damage: f64,
    pub damage_type: DamageType,
    pub cost_paid: Option<ResourceCost>,
    /// Effects added or refreshed on the defender by this action. Applications
    /// that left the registry unchanged are not listed.
    pub applied_effects: Vec<EffectId>,
    pub combo: Option<ComboTriggered>,
    pub performed: ActionPerformed,
}

impl CombatOutcome {
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.flags.contains(OutcomeFlags::HIT)
    }

    #[inline]
    pub fn is_critical(&self) -> bool {
        self.flags.contains(OutcomeFlags::CRITICAL)
    }

    #[inline]
    pub fn defeated_defender(&self) -> bool {
        self.flags.contains(OutcomeFlags::DEFEATED)
    }
}

/// Why an action was refused before anything changed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("not enough {resource}: need {required}, have {available}")]
    InsufficientResource {
        resource: ResourceKind,
        required: f64,
        available: f64,
    },
}

/// Result of [`super::CombatResolver::perform`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionResult {
    Completed(CombatOutcome),
    Rejected(Rejection),
}

impl ActionResult {
    pub fn outcome(&self) -> Option<&CombatOutcome> {
        match self {
            Self::Completed(outcome) => Some(outcome),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Completed(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
