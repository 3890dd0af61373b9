//! Per-actor combo detection.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::pattern::{ComboId, ComboRecipient};
use super::window::{ComboEntry, ComboWindow};
use crate::actor::{Actor, ActorId};
use crate::combat::ActionId;
use crate::effects::{EffectId, TemplateId};
use crate::ruleset::Ruleset;

/// A completed combo.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboTriggered {
    pub combo: ComboId,
    pub caster: ActorId,
    /// Actor that received the effect, `None` when it was dropped.
    pub recipient: Option<ActorId>,
    pub effect: TemplateId,
    /// Instance added or refreshed in the recipient's registry, `None` when
    /// the recipient was missing or its stacking policy left it unchanged.
    pub applied: Option<EffectId>,
}

/// Rolling action windows for every actor, checked against the ruleset's
/// combo patterns on each record.
#[derive(Clone, Debug)]
pub struct ComboTracker {
    ruleset: Arc<Ruleset>,
    windows: BTreeMap<ActorId, ComboWindow>,
}

impl ComboTracker {
    pub fn new(ruleset: Arc<Ruleset>) -> Self {
        Self {
            ruleset,
            windows: BTreeMap::new(),
        }
    }

    /// Record `action` by `caster` at `timestamp` and test for a combo.
    ///
    /// On a match the combo's effect is applied exactly once to the caster or
    /// the target, and the window is emptied so the same entries cannot
    /// trigger again. Timestamps earlier than the newest entry are treated as
    /// simultaneous with it.
    pub fn record(
        &mut self,
        caster: &mut Actor,
        target: Option<&mut Actor>,
        action: &ActionId,
        timestamp: f64,
    ) -> Option<ComboTriggered> {
        let combos = self.ruleset.combos();
        if combos.is_empty() {
            return None;
        }

        let caster_id = caster.id();
        let window = self.windows.entry(caster_id).or_default();

        let mut now = timestamp;
        if let Some(newest) = window.newest() {
            if now < newest.at {
                warn!(
                    actor = %caster_id,
                    timestamp,
                    newest = newest.at,
                    "combo timestamp went backwards"
                );
                now = newest.at;
            }
        }

        let evicted = window.evict_older_than(now, combos.horizon());
        if evicted > 0 {
            trace!(actor = %caster_id, evicted, "combo entries expired");
        }
        window.push(ComboEntry::new(action.clone(), now));

        let pattern = combos.find_match(window.entries())?;
        window.clear();
        debug!(actor = %caster_id, combo = %pattern.id, action = %action, "combo matched");

        let Some(template) = self.ruleset.effects().get(pattern.effect.as_str()) else {
            warn!(combo = %pattern.id, effect = %pattern.effect, "combo effect template missing");
            return Some(ComboTriggered {
                combo: pattern.id.clone(),
                caster: caster_id,
                recipient: None,
                effect: pattern.effect.clone(),
                applied: None,
            });
        };

        let recipient = match pattern.recipient {
            ComboRecipient::Caster => Some(caster),
            ComboRecipient::Target => target,
        };
        let (recipient, applied) = match recipient {
            Some(actor) => (
                Some(actor.id()),
                actor.effects_mut().apply(template).changed(),
            ),
            None => {
                warn!(
                    combo = %pattern.id,
                    actor = %caster_id,
                    "combo targets the defender but none was given"
                );
                (None, None)
            }
        };

        Some(ComboTriggered {
            combo: pattern.id.clone(),
            caster: caster_id,
            recipient,
            effect: pattern.effect.clone(),
            applied,
        })
    }

    /// Current window of `actor`, if it has recorded anything.
    pub fn window(&self, actor: ActorId) -> Option<&ComboWindow> {
        self.windows.get(&actor)
    }

    /// Forget the history of one actor (e.g. on death or leaving combat).
    pub fn reset(&mut self, actor: ActorId) {
        self.windows.remove(&actor);
    }

    pub fn reset_all(&mut self) {
        self.windows.clear();
    }
}
