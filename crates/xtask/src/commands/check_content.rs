//! Load and validate combat content
//!
//! Reads every content file, runs the cross-catalog checks and prints a summary.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

use combat_core::combat::stat_names;
use combat_core::{Ruleset, StatResolver};

use crate::utils;

/// Load and validate combat content
#[derive(Parser)]
pub struct CheckContent {
    /// Content directory (defaults to COMBAT_DATA_DIR, then the embedded sample)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl CheckContent {
    pub fn execute(self) -> Result<()> {
        let dir = utils::content_dir(self.dir);
        let ruleset = utils::load_ruleset(dir.as_deref())?;
        let actors = utils::load_actors(dir.as_deref(), &ruleset)?;

        println!(
            "{} {}",
            style("Content:").bold().cyan(),
            utils::source_label(dir.as_deref())
        );
        println!();

        print_catalogs(&ruleset);

        println!("{}", style("Actors:").bold().yellow());
        let resolver = StatResolver::new(ruleset.stats());
        for (name, actor) in &actors {
            let health = actor.resources().health;
            println!(
                "  {} {} (hp {}/{}, defense {:.1}, evasion {:.2})",
                style(actor.id()).dim(),
                name,
                health.current,
                health.maximum,
                resolver.resolve(actor, stat_names::DEFENSE)?,
                resolver.resolve(actor, stat_names::EVASION)?,
            );
        }
        println!();

        println!("{}", style("✓ Content is valid").bold().green());
        Ok(())
    }
}

fn print_catalogs(ruleset: &Ruleset) {
    println!(
        "{} {}",
        style("Stats:").bold().yellow(),
        ruleset.stats().len()
    );
    for stat in ruleset.stats().iter() {
        let kind = if stat.is_derived() { "derived" } else { "base" };
        println!("  {:<22} {}", stat.id.as_str(), style(kind).dim());
    }
    println!();

    println!(
        "{} {}",
        style("Effects:").bold().yellow(),
        ruleset.effects().len()
    );
    for effect in ruleset.effects().iter() {
        let duration = effect
            .duration()
            .map_or_else(|| "permanent".to_owned(), |d| format!("{d}s"));
        println!(
            "  {:<22} {:<8} {}",
            effect.id().as_str(),
            effect.polarity().as_ref(),
            style(duration).dim()
        );
    }
    println!();

    println!(
        "{} {}",
        style("Actions:").bold().yellow(),
        ruleset.actions().len()
    );
    for action in ruleset.actions().iter() {
        let cost = match action.cost {
            Some(cost) => format!("{} {}", cost.amount, cost.resource),
            None => "free".to_owned(),
        };
        println!(
            "  {:<22} {:<7} {:<9} {}",
            action.id.as_str(),
            action.kind.as_ref(),
            action.damage_type.as_ref(),
            style(cost).dim()
        );
    }
    println!();

    println!(
        "{} {}",
        style("Combos:").bold().yellow(),
        ruleset.combos().len()
    );
    for combo in ruleset.combos().iter() {
        let sequence: Vec<_> = combo.sequence.iter().map(|a| a.as_str()).collect();
        println!(
            "  {:<22} {} within {}s -> {} ({})",
            combo.id.as_str(),
            sequence.join(" > "),
            combo.window,
            combo.effect,
            combo.recipient
        );
    }
    println!();
}
