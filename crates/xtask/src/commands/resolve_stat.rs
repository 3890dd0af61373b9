//! Print the resolution breakdown of one stat
//!
//! Builds an ad-hoc actor from `--base` and `--item` flags and resolves a stat
//! against the loaded ruleset.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use combat_core::{Actor, ActorId, EquippedItem, Modifier, ResolvedStat, StatResolver};

use crate::utils;

/// Print the resolution breakdown of one stat
#[derive(Parser)]
pub struct ResolveStat {
    /// Stat to resolve (e.g., attack, evasion)
    #[arg(short, long, value_name = "STAT")]
    stat: String,

    /// Base stat entry, repeatable (e.g., --base strength=14)
    #[arg(short, long, value_name = "NAME=VALUE")]
    base: Vec<String>,

    /// Flat item bonus, repeatable (e.g., --item longsword:attack=4)
    #[arg(short, long, value_name = "ITEM:STAT=VALUE")]
    item: Vec<String>,

    /// Content directory (defaults to COMBAT_DATA_DIR, then the embedded sample)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Stage-by-stage breakdown
    Summary,
    /// Full JSON output
    Json,
    /// Pretty-printed debug format
    Debug,
}

impl ResolveStat {
    pub fn execute(self) -> Result<()> {
        let dir = utils::content_dir(self.dir);
        let ruleset = utils::load_ruleset(dir.as_deref())?;

        let mut actor = Actor::new(ActorId(0));
        for entry in &self.base {
            let (stat, value) = utils::parse_assignment(entry)?;
            if !ruleset.stats().contains(&stat) {
                anyhow::bail!("Unknown stat '{}' in --base {}", stat, entry);
            }
            actor.set_base_stat(stat, value);
        }
        for entry in &self.item {
            let item = parse_item(entry)?;
            ruleset.validate_item(&item)?;
            actor.equip(item);
        }

        let resolved = StatResolver::new(ruleset.stats())
            .breakdown(&actor, &self.stat)
            .with_context(|| format!("Failed to resolve '{}'", self.stat))?;

        match self.format {
            OutputFormat::Summary => print_summary(&resolved),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
            OutputFormat::Debug => println!("{:#?}", resolved),
        }

        Ok(())
    }
}

/// Parse `item:stat=value` into a single-bonus item.
fn parse_item(input: &str) -> Result<EquippedItem> {
    let (item, bonus) = input
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected item:stat=value, got '{}'", input))?;
    let (stat, amount) = utils::parse_assignment(bonus)?;

    let bonus = Modifier::flat(stat, amount);
    Ok(EquippedItem::new(item.trim(), vec![bonus]))
}

fn print_summary(resolved: &ResolvedStat) {
    println!(
        "{} {}",
        style("Stat:").bold().cyan(),
        style(&resolved.stat).bold()
    );
    println!();
    println!("  Base:       {}", resolved.base);
    if let Some(derived) = resolved.derived {
        println!("  Formula:    {}", derived);
    }
    println!("  Flat:       {:+}", resolved.flat);
    println!("  Percent:    {:+}%", resolved.percent * 100.0);
    if let Some(value) = resolved.override_value {
        println!("  Override:   {}", value);
    }
    println!("  Modifiers:  {}", resolved.modifier_count);
    println!();
    println!(
        "{} {}",
        style("Value:").bold().green(),
        style(resolved.value).bold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_bonus() {
        let item = parse_item("longsword:attack=4").unwrap();

        assert_eq!(item.id, "longsword");
        assert_eq!(item.bonuses, vec![Modifier::flat("attack", 4.0)]);
        assert!(parse_item("attack=4").is_err());
    }
}
