//! Replay a seeded duel between the sample actors
//!
//! The same seed and content always produce the same duel, so a balance
//! change shows up as a diff in this command's output.

use anyhow::{Result, bail};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

use combat_core::{
    ActionId, ActionRequest, ActionResult, Actor, CombatOutcome, CombatResolver, PcgSource,
    Ruleset, TracingObserver,
};

use crate::utils;

/// Replay a seeded duel between the sample actors
#[derive(Parser)]
pub struct Duel {
    /// RNG seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Maximum number of rounds
    #[arg(short, long, default_value_t = 20)]
    rounds: u32,

    /// Seconds between rounds, also the effect tick length
    #[arg(long, default_value_t = 1.0)]
    round_length: f64,

    /// Content directory (defaults to COMBAT_DATA_DIR, then the embedded sample)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

struct Combatant {
    name: String,
    actor: Actor,
    turn: usize,
}

impl Duel {
    pub fn execute(self) -> Result<()> {
        if !(self.round_length > 0.0) {
            bail!("--round-length must be positive");
        }

        let dir = utils::content_dir(self.dir);
        let ruleset = Arc::new(utils::load_ruleset(dir.as_deref())?);
        let mut actors = utils::load_actors(dir.as_deref(), &ruleset)?.into_iter();
        let (Some(first), Some(second)) = (actors.next(), actors.next()) else {
            bail!("A duel needs at least two actors in the roster");
        };
        let mut combatants = [first, second].map(|(name, actor)| Combatant {
            name,
            actor,
            turn: 0,
        });

        let mut resolver = CombatResolver::new(Arc::clone(&ruleset));
        let mut rng = PcgSource::new(self.seed);
        let mut observer = TracingObserver;

        println!(
            "{} {} vs {} (seed {})",
            style("Duel:").bold().cyan(),
            combatants[0].name,
            combatants[1].name,
            self.seed
        );
        println!();

        for round in 1..=self.rounds {
            let now = f64::from(round) * self.round_length;
            let header = style(format!("Round {round} (t={now})")).bold().yellow();
            println!("{header}");

            for attacker_index in 0..combatants.len() {
                let [first, second] = &mut combatants;
                let (attacker, defender) = if attacker_index == 0 {
                    (first, second)
                } else {
                    (second, first)
                };

                let Some(action) = next_action(&ruleset, attacker) else {
                    println!("  {} has nothing affordable and waits", attacker.name);
                    continue;
                };

                let request = ActionRequest::new(action, now);
                let result = resolver.perform(
                    &mut attacker.actor,
                    &mut defender.actor,
                    &request,
                    &mut rng,
                )?;
                match result {
                    ActionResult::Completed(outcome) => {
                        print_outcome(&attacker.name, &defender.name, &outcome, &defender.actor)
                    }
                    ActionResult::Rejected(rejection) => {
                        println!("  {} {}: {}", attacker.name, request.action, rejection)
                    }
                }

                if !defender.actor.is_alive() {
                    println!();
                    println!(
                        "{} {} after {} rounds",
                        style("Winner:").bold().green(),
                        attacker.name,
                        round
                    );
                    return Ok(());
                }
            }

            for combatant in &mut combatants {
                let report = combatant.actor.tick(self.round_length, &mut observer);
                for pulse in &report.pulses {
                    println!(
                        "  {} {} {:+.1} from effect {} ({} pulse(s))",
                        combatant.name, pulse.resource, pulse.applied, pulse.effect, pulse.count
                    );
                }
                if !report.expired.is_empty() {
                    println!(
                        "  {} lost {} effect(s)",
                        combatant.name,
                        report.expired.len()
                    );
                }
            }

            if let Some(fallen) = combatants.iter().find(|c| !c.actor.is_alive()) {
                println!();
                println!(
                    "{} {} succumbed to lingering effects",
                    style("Result:").bold().red(),
                    fallen.name
                );
                return Ok(());
            }
            println!();
        }

        println!("{}", style("Draw: round limit reached").bold());
        for combatant in &combatants {
            let health = combatant.actor.resources().health;
            println!(
                "  {} hp {:.1}/{}",
                combatant.name, health.current, health.maximum
            );
        }
        Ok(())
    }
}

/// Next affordable action in catalog order, rotating on every call.
fn next_action(ruleset: &Ruleset, combatant: &mut Combatant) -> Option<ActionId> {
    let resources = combatant.actor.resources();
    let affordable: Vec<&ActionId> = ruleset
        .actions()
        .iter()
        .filter(|action| {
            action
                .cost
                .is_none_or(|cost| resources.get(cost.resource).can_afford(cost.amount))
        })
        .map(|action| &action.id)
        .collect();
    if affordable.is_empty() {
        return None;
    }

    let action = affordable[combatant.turn % affordable.len()].clone();
    combatant.turn += 1;
    Some(action)
}

fn print_outcome(attacker: &str, defender: &str, outcome: &CombatOutcome, target: &Actor) {
    let flags: Vec<_> = outcome.flags.iter_names().map(|(name, _)| name).collect();
    let health = target.resources().health;
    println!(
        "  {} {} -> {}: {} {:.1} dmg ({} hp {:.1}/{})",
        attacker,
        style(&outcome.action).bold(),
        defender,
        flags.join(" | "),
        outcome.damage,
        defender,
        health.current,
        health.maximum
    );
    if !outcome.applied_effects.is_empty() {
        println!(
            "    applied {} effect(s) to {}",
            outcome.applied_effects.len(),
            defender
        );
    }
    if let Some(combo) = &outcome.combo {
        println!(
            "    {} {} -> {}",
            style("combo").magenta().bold(),
            combo.combo,
            combo.effect
        );
    }
}
