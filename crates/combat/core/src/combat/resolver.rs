//! Staged action resolution.
//!
//! ```text
//! Requested ─validate─▶ Validated ─roll─▶ Resolved ─apply─▶ Applied ─complete─▶ Completed
//!     │                     │
//!     └─ CombatError        └─ Rejected (nothing mutated)
//! ```
//!
//! Every fallible read (action lookup, stat resolution, resource check)
//! happens in `validate`. Once rolls start the action always completes.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::action::{ActionDef, ActionId, ActionRequest, Avoidance};
use super::damage::{DamageInputs, calculate_damage};
use super::hit::{calculate_hit_chance, check_roll};
use super::outcome::{ActionPerformed, ActionResult, CombatOutcome, OutcomeFlags, Rejection};
use super::stat_names;
use crate::actor::Actor;
use crate::combo::ComboTracker;
use crate::config::CombatConfig;
use crate::effects::EffectId;
use crate::env::RandomSource;
use crate::error::{CombatFault, ErrorSeverity};
use crate::ruleset::Ruleset;
use crate::stats::{StatError, StatResolver};

/// Errors that abort an action before any state changes.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CombatError {
    #[error("unknown action '{0}'")]
    InvalidAction(ActionId),

    #[error(transparent)]
    Stat(#[from] StatError),
}

impl CombatFault for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidAction(_) => ErrorSeverity::Validation,
            Self::Stat(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAction(_) => "COMBAT_INVALID_ACTION",
            Self::Stat(inner) => inner.error_code(),
        }
    }
}

/// Every stat value one action needs, read before anything is rolled.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CombatSnapshot {
    pub accuracy: f64,
    pub evasion: f64,
    pub critical_chance: f64,
    pub attack: f64,
    pub defense: f64,
    pub resistance: f64,
    pub weakness: f64,
    /// Present only when the action can be blocked.
    pub block_chance: Option<f64>,
    /// Present only when the action can be parried.
    pub parry_chance: Option<f64>,
}

impl CombatSnapshot {
    /// Read the stats `action` needs from both actors.
    ///
    /// Resistance and weakness stats that the catalog does not declare count
    /// as zero; everything else must resolve.
    pub fn capture(
        resolver: &StatResolver<'_>,
        action: &ActionDef,
        attacker: &Actor,
        defender: &Actor,
    ) -> Result<Self, StatError> {
        let typed = |stat: Option<String>| -> Result<f64, StatError> {
            match stat {
                Some(stat) if resolver.catalog().contains(&stat) => {
                    resolver.resolve(defender, &stat)
                }
                _ => Ok(0.0),
            }
        };
        let avoidance = |flag: Avoidance, stat: &str| -> Result<Option<f64>, StatError> {
            if action.avoidance.contains(flag) {
                resolver.resolve(defender, stat).map(Some)
            } else {
                Ok(None)
            }
        };

        let defense = if action.damage_type.is_true() {
            0.0
        } else {
            resolver.resolve(defender, stat_names::DEFENSE)?
        };

        Ok(Self {
            accuracy: resolver.resolve(attacker, stat_names::ACCURACY)?,
            evasion: resolver.resolve(defender, stat_names::EVASION)?,
            critical_chance: resolver.resolve(attacker, stat_names::CRITICAL_CHANCE)?,
            attack: resolver.resolve(attacker, action.attack_stat.as_str())?,
            defense,
            resistance: typed(action.damage_type.resistance_stat())?,
            weakness: typed(action.damage_type.weakness_stat())?,
            block_chance: avoidance(Avoidance::BLOCK, stat_names::BLOCK_CHANCE)?,
            parry_chance: avoidance(Avoidance::PARRY, stat_names::PARRY_CHANCE)?,
        })
    }
}

/// Action found, stats read, cost affordable.
struct Validated<'r> {
    action: &'r ActionDef,
    snapshot: CombatSnapshot,
    timestamp: f64,
}

/// Outcome of the roll sequence, no state touched yet.
#[derive(Debug, Default)]
struct Rolls {
    hit_chance: f64,
    hit: bool,
    critical: bool,
    secondary: bool,
    blocked: bool,
    parried: bool,
}

struct Resolved<'r> {
    validated: Validated<'r>,
    rolls: Rolls,
}

/// State mutated; combo tracking still pending.
struct Applied<'r> {
    resolved: Resolved<'r>,
    flags: OutcomeFlags,
    damage: f64,
    applied_effects: Vec<EffectId>,
}

enum Checked<'r> {
    Proceed(Validated<'r>),
    Reject(Rejection),
}

/// Resolves attacks and spells between two actors.
///
/// Holds the ruleset and the combo tracker; actors and randomness are passed
/// per call.
#[derive(Clone, Debug)]
pub struct CombatResolver {
    ruleset: Arc<Ruleset>,
    combos: ComboTracker,
}

impl CombatResolver {
    pub fn new(ruleset: Arc<Ruleset>) -> Self {
        let combos = ComboTracker::new(Arc::clone(&ruleset));
        Self { ruleset, combos }
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn stat_resolver(&self) -> StatResolver<'_> {
        StatResolver::new(self.ruleset.stats())
    }

    pub fn combos(&self) -> &ComboTracker {
        &self.combos
    }

    pub fn combos_mut(&mut self) -> &mut ComboTracker {
        &mut self.combos
    }

    /// Stats `action` would read right now, without rolling.
    pub fn snapshot(
        &self,
        attacker: &Actor,
        defender: &Actor,
        action: &str,
    ) -> Result<CombatSnapshot, CombatError> {
        let def = self
            .ruleset
            .actions()
            .get(action)
            .ok_or_else(|| CombatError::InvalidAction(ActionId::from(action)))?;
        let snapshot = CombatSnapshot::capture(&self.stat_resolver(), def, attacker, defender)?;
        Ok(snapshot)
    }

    /// Run one action from request to completion.
    ///
    /// Errors and rejections leave both actors untouched. Rolls are drawn in
    /// a fixed order: hit, then critical and secondary effect on a hit, or
    /// block and parry on a miss.
    pub fn perform(
        &mut self,
        attacker: &mut Actor,
        defender: &mut Actor,
        request: &ActionRequest,
        rng: &mut dyn RandomSource,
    ) -> Result<ActionResult, CombatError> {
        let ruleset = Arc::clone(&self.ruleset);

        let validated = match validate(&ruleset, attacker, defender, request)? {
            Checked::Proceed(validated) => validated,
            Checked::Reject(rejection) => {
                debug!(
                    attacker = %attacker.id(),
                    action = %request.action,
                    %rejection,
                    "action rejected"
                );
                return Ok(ActionResult::Rejected(rejection));
            }
        };
        let resolved = roll(validated, ruleset.config(), rng);
        let applied = apply(resolved, &ruleset, attacker, defender);
        let outcome = self.complete(applied, attacker, defender);

        debug!(
            attacker = %outcome.attacker,
            defender = %outcome.defender,
            action = %outcome.action,
            flags = ?outcome.flags,
            damage = outcome.damage,
            "action completed"
        );
        Ok(ActionResult::Completed(outcome))
    }

    fn complete(
        &mut self,
        applied: Applied<'_>,
        attacker: &mut Actor,
        defender: &mut Actor,
    ) -> CombatOutcome {
        let Applied {
            resolved,
            flags,
            damage,
            applied_effects,
        } = applied;
        let Resolved { validated, rolls } = resolved;
        let action = validated.action;

        let performed = ActionPerformed {
            actor: attacker.id(),
            target: defender.id(),
            action: action.id.clone(),
            timestamp: validated.timestamp,
            hit: rolls.hit,
        };
        let combo = self.combos.record(
            attacker,
            Some(&mut *defender),
            &action.id,
            validated.timestamp,
        );

        CombatOutcome {
            action: action.id.clone(),
            attacker: attacker.id(),
            defender: defender.id(),
            flags,
            hit_chance: rolls.hit_chance,
            damage,
            damage_type: action.damage_type,
            cost_paid: action.cost,
            applied_effects,
            combo,
            performed,
        }
    }
}

/// Look up the action, capture the snapshot and check the cost.
///
/// The cost check reads the attacker's
/// [`ResourceMeters`](crate::stats::ResourceMeters) directly. Meters are
/// actor state rather than resolved stats, so no modifier can change what an
/// action is allowed to spend.
fn validate<'r>(
    ruleset: &'r Ruleset,
    attacker: &Actor,
    defender: &Actor,
    request: &ActionRequest,
) -> Result<Checked<'r>, CombatError> {
    let action = ruleset
        .actions()
        .get(request.action.as_str())
        .ok_or_else(|| CombatError::InvalidAction(request.action.clone()))?;

    let resolver = StatResolver::new(ruleset.stats());
    let snapshot = CombatSnapshot::capture(&resolver, action, attacker, defender)?;

    if let Some(cost) = action.cost {
        let available = attacker.resources().current(cost.resource);
        let meter = attacker.resources().get(cost.resource);
        if !meter.can_afford(cost.amount) {
            return Ok(Checked::Reject(Rejection::InsufficientResource {
                resource: cost.resource,
                required: cost.amount,
                available,
            }));
        }
    }

    trace!(attacker = %attacker.id(), action = %action.id, ?snapshot, "action validated");
    Ok(Checked::Proceed(Validated {
        action,
        snapshot,
        timestamp: request.timestamp,
    }))
}

fn roll<'r>(
    validated: Validated<'r>,
    config: &CombatConfig,
    rng: &mut dyn RandomSource,
) -> Resolved<'r> {
    let snapshot = &validated.snapshot;
    let action = validated.action;
    let mut rolls = Rolls {
        hit_chance: calculate_hit_chance(snapshot.accuracy, snapshot.evasion, config.hit_chance),
        ..Rolls::default()
    };

    rolls.hit = check_roll(rolls.hit_chance, rng.next_f64());
    if rolls.hit {
        rolls.critical = check_roll(snapshot.critical_chance, rng.next_f64());
        rolls.secondary = match &action.secondary {
            Some(secondary) if secondary.is_guaranteed() => true,
            Some(secondary) => check_roll(secondary.chance, rng.next_f64()),
            None => false,
        };
    } else {
        if let Some(chance) = snapshot.block_chance {
            rolls.blocked = check_roll(chance, rng.next_f64());
        }
        if let Some(chance) = snapshot.parry_chance.filter(|_| !rolls.blocked) {
            rolls.parried = check_roll(chance, rng.next_f64());
        }
    }

    trace!(action = %action.id, ?rolls, "action resolved");
    Resolved { validated, rolls }
}

fn apply<'r>(
    resolved: Resolved<'r>,
    ruleset: &Ruleset,
    attacker: &mut Actor,
    defender: &mut Actor,
) -> Applied<'r> {
    let Resolved { validated, rolls } = &resolved;
    let action = validated.action;
    let snapshot = &validated.snapshot;

    if let Some(cost) = action.cost {
        let meter = attacker.resources_mut().get_mut(cost.resource);
        meter.adjust(-cost.amount);
    }

    let mut flags = OutcomeFlags::empty();
    let mut damage = 0.0;
    let mut applied_effects = Vec::new();

    if rolls.hit {
        flags |= OutcomeFlags::HIT;
        if rolls.critical {
            flags |= OutcomeFlags::CRITICAL;
        }

        damage = calculate_damage(
            &DamageInputs {
                power: action.power,
                attack: snapshot.attack,
                defense: snapshot.defense,
                resistance: snapshot.resistance,
                weakness: snapshot.weakness,
                damage_type: action.damage_type,
                critical: rolls.critical,
            },
            ruleset.config(),
        );
        defender.resources_mut().health.adjust(-damage);
        if !defender.is_alive() {
            flags |= OutcomeFlags::DEFEATED;
        }

        if let Some(secondary) = action.secondary.as_ref().filter(|_| rolls.secondary) {
            match ruleset.effects().get(secondary.template.as_str()) {
                Some(template) => {
                    if let Some(id) = defender.effects_mut().apply(template).changed() {
                        applied_effects.push(id);
                    }
                }
                None => warn!(
                    action = %action.id,
                    template = %secondary.template,
                    "secondary effect template missing"
                ),
            }
        }
    } else {
        flags |= OutcomeFlags::MISS;
        if rolls.blocked {
            flags |= OutcomeFlags::BLOCK;
        }
        if rolls.parried {
            flags |= OutcomeFlags::PARRY;
        }
    }

    Applied {
        resolved,
        flags,
        damage,
        applied_effects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorId;
    use crate::combo::{ComboCatalog, ComboPattern};
    use crate::effects::{EffectCatalog, EffectTemplate, PeriodicAction, Polarity};
    use crate::env::FixedRolls;
    use crate::stats::{
        Formula, Modifier, ResourceKind, ResourceMeter, ResourceMeters, StatBounds, StatCatalog,
        StatDef,
    };
    use crate::combat::ActionCatalog;
    use crate::DamageType;

    fn ruleset() -> Arc<Ruleset> {
        let stats = StatCatalog::new([
            StatDef::base("strength", 10.0),
            StatDef::derived("attack", Formula::new().term("strength", 1.0)),
            StatDef::base("accuracy", 0.9),
            StatDef::base("evasion", 0.2),
            StatDef::base("critical_chance", 0.1).bounded(StatBounds::CHANCE),
            StatDef::base("defense", 0.0),
            StatDef::base("fire_resistance", 0.0),
            StatDef::base("block_chance", 0.5).bounded(StatBounds::CHANCE),
            StatDef::base("parry_chance", 0.5).bounded(StatBounds::CHANCE),
        ])
        .unwrap();
        let effects = EffectCatalog::new([
            EffectTemplate::builder("burn")
                .polarity(Polarity::Debuff)
                .duration(3.0)
                .periodic(PeriodicAction::damage(5.0, 1.0))
                .build()
                .unwrap(),
            EffectTemplate::builder("momentum")
                .modifier(Modifier::percent("attack", 0.5))
                .duration(5.0)
                .build()
                .unwrap(),
        ])
        .unwrap();
        let actions = ActionCatalog::new([
            ActionDef::new("slash", "attack", 1.0)
                .with_cost(ResourceKind::Stamina, 10.0)
                .with_avoidance(Avoidance::BLOCK | Avoidance::PARRY),
            ActionDef::new("firebolt", "attack", 2.0)
                .with_damage_type(DamageType::Fire)
                .with_secondary("burn", 1.0),
        ])
        .unwrap();
        let combos = ComboCatalog::new([ComboPattern::new(
            "double_slash",
            ["slash", "slash"],
            2.0,
            "momentum",
        )])
        .unwrap();
        let ruleset = Ruleset::new(stats, effects, actions, combos, CombatConfig::default());
        Arc::new(ruleset.unwrap())
    }

    fn fighter(id: u32) -> Actor {
        Actor::new(ActorId(id)).with_resources(ResourceMeters::new(
            ResourceMeter::full(100.0),
            ResourceMeter::full(30.0),
            ResourceMeter::full(25.0),
        ))
    }

    #[test]
    fn hit_deals_damage_and_pays_cost() {
        let mut resolver = CombatResolver::new(ruleset());
        let (mut attacker, mut defender) = (fighter(1), fighter(2));
        let mut rng = FixedRolls::new([0.1, 0.9]);

        let result = resolver
            .perform(
                &mut attacker,
                &mut defender,
                &ActionRequest::new("slash", 0.0),
                &mut rng,
            )
            .unwrap();
        let outcome = result.outcome().unwrap();

        assert!(outcome.is_hit());
        assert!(!outcome.is_critical());
        assert_eq!(outcome.damage, 10.0);
        assert_eq!(defender.resources().health.current, 90.0);
        assert_eq!(attacker.resources().stamina.current, 15.0);
        assert_eq!(rng.consumed(), 2);
    }

    #[test]
    fn miss_rolls_block_then_skips_parry() {
        let mut resolver = CombatResolver::new(ruleset());
        let (mut attacker, mut defender) = (fighter(1), fighter(2));
        let mut rng = FixedRolls::new([0.99, 0.1]);

        let result = resolver
            .perform(
                &mut attacker,
                &mut defender,
                &ActionRequest::new("slash", 0.0),
                &mut rng,
            )
            .unwrap();
        let outcome = result.outcome().unwrap();

        assert_eq!(outcome.flags, OutcomeFlags::MISS | OutcomeFlags::BLOCK);
        assert_eq!(outcome.damage, 0.0);
        assert_eq!(defender.resources().health.current, 100.0);
        // Cost is paid on a miss too.
        assert_eq!(attacker.resources().stamina.current, 15.0);
        assert_eq!(rng.consumed(), 2);
    }

    #[test]
    fn insufficient_stamina_is_rejected_without_mutation() {
        let mut resolver = CombatResolver::new(ruleset());
        let mut attacker = fighter(1);
        attacker.resources_mut().stamina.current = 5.0;
        let mut defender = fighter(2);
        let (attacker_before, defender_before) = (attacker.clone(), defender.clone());
        let mut rng = FixedRolls::constant(0.0);

        let result = resolver
            .perform(
                &mut attacker,
                &mut defender,
                &ActionRequest::new("slash", 0.0),
                &mut rng,
            )
            .unwrap();

        assert_eq!(
            result,
            ActionResult::Rejected(Rejection::InsufficientResource {
                resource: ResourceKind::Stamina,
                required: 10.0,
                available: 5.0,
            })
        );
        assert_eq!(attacker, attacker_before);
        assert_eq!(defender, defender_before);
        assert_eq!(rng.consumed(), 0);
        assert!(resolver.combos().window(ActorId(1)).is_none());
    }

    #[test]
    fn unknown_action_is_an_error() {
        let mut resolver = CombatResolver::new(ruleset());
        let (mut attacker, mut defender) = (fighter(1), fighter(2));
        let before = (attacker.clone(), defender.clone());

        let err = resolver
            .perform(
                &mut attacker,
                &mut defender,
                &ActionRequest::new("meteor", 0.0),
                &mut FixedRolls::constant(0.0),
            )
            .unwrap_err();

        assert_eq!(err, CombatError::InvalidAction("meteor".into()));
        assert_eq!(err.error_code(), "COMBAT_INVALID_ACTION");
        assert_eq!((attacker, defender), before);
    }

    #[test]
    fn guaranteed_secondary_effect_lands_on_hit() {
        let mut resolver = CombatResolver::new(ruleset());
        let (mut attacker, mut defender) = (fighter(1), fighter(2));
        let mut rng = FixedRolls::new([0.1, 0.9]);

        let result = resolver
            .perform(
                &mut attacker,
                &mut defender,
                &ActionRequest::new("firebolt", 0.0),
                &mut rng,
            )
            .unwrap();
        let outcome = result.outcome().unwrap();

        assert_eq!(outcome.damage, 20.0);
        assert_eq!(outcome.applied_effects.len(), 1);
        assert_eq!(defender.effects().count_of("burn"), 1);
        // Guaranteed secondary effects consume no roll.
        assert_eq!(rng.consumed(), 2);
    }

    #[test]
    fn combo_triggers_from_consecutive_actions() {
        let mut resolver = CombatResolver::new(ruleset());
        let (mut attacker, mut defender) = (fighter(1), fighter(2));
        let mut rng = FixedRolls::new([0.1, 0.9]);

        resolver
            .perform(
                &mut attacker,
                &mut defender,
                &ActionRequest::new("slash", 0.0),
                &mut rng,
            )
            .unwrap();
        let second = resolver
            .perform(
                &mut attacker,
                &mut defender,
                &ActionRequest::new("slash", 1.0),
                &mut rng,
            )
            .unwrap();

        let combo = second.outcome().unwrap().combo.as_ref().unwrap();
        assert_eq!(combo.combo, "double_slash");
        assert_eq!(attacker.effects().count_of("momentum"), 1);
        let attack = resolver.stat_resolver().resolve(&attacker, "attack");
        assert_eq!(attack.unwrap(), 15.0);
    }
}
