//! Loading sample content from disk and running it through the resolver.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use combat_content::{ContentFactory, embedded};
use combat_core::{
    ActionRequest, CombatResolver, FixedRolls, ResourceKind, Ruleset, StatResolver,
};

fn write_sample(dir: &Path) {
    for (name, content) in embedded::FILES {
        fs::write(dir.join(name), content).unwrap();
    }
}

fn sample_ruleset() -> Arc<Ruleset> {
    Arc::new(embedded::ruleset().unwrap())
}

#[test]
fn directory_content_matches_embedded() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path());

    let factory = ContentFactory::new(dir.path());
    let ruleset = factory.load_ruleset().unwrap();
    let actors = factory.load_actors(&ruleset).unwrap();

    assert_eq!(ruleset, embedded::ruleset().unwrap());
    let names: Vec<_> = actors.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["knight", "pyromancer"]);
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path());
    fs::remove_file(dir.path().join(ContentFactory::COMBOS_FILE)).unwrap();

    let err = ContentFactory::new(dir.path()).load_ruleset().unwrap_err();

    assert!(format!("{err:#}").contains("combos.ron"), "{err:#}");
}

#[test]
fn malformed_ron_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path());
    fs::write(
        dir.path().join(ContentFactory::STATS_FILE),
        "(stats: [(id: \"x\"",
    )
    .unwrap();

    let err = ContentFactory::new(dir.path()).load_ruleset().unwrap_err();
    let message = format!("{err:#}");

    assert!(message.contains("stats.ron"), "{message}");
    assert!(message.contains("Failed to parse stat RON"), "{message}");
}

#[test]
fn dangling_combo_action_fails_the_ruleset() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path());
    fs::write(
        dir.path().join(ContentFactory::COMBOS_FILE),
        r#"(combos: [(id: "ghost", sequence: ["slash", "teleport"], window: 2.0, effect: "momentum")])"#,
    )
    .unwrap();

    let err = ContentFactory::new(dir.path()).load_ruleset().unwrap_err();
    let message = format!("{err:#}");

    assert!(message.contains("Invalid ruleset"), "{message}");
    assert!(message.contains("teleport"), "{message}");
}

#[test]
fn actor_with_unknown_item_stat_is_rejected() {
    let ruleset = sample_ruleset();
    let roster = r#"(
        actors: [
            (
                id: 7,
                name: "cheater",
                resources: (
                    health: (current: 10.0, maximum: 10.0),
                    mana: (current: 0.0, maximum: 0.0),
                    stamina: (current: 0.0, maximum: 0.0),
                ),
                equipment: [(id: "lucky_charm", bonuses: [(stat: "luck", kind: Flat(1.0))])],
            ),
        ],
    )"#;

    let err = combat_content::ActorLoader::parse(roster, &ruleset).unwrap_err();

    assert!(err.to_string().contains("lucky_charm"), "{err}");
}

#[test]
fn sample_stats_include_equipment() {
    let ruleset = sample_ruleset();
    let actors = embedded::actors(&ruleset).unwrap();
    let resolver = StatResolver::new(ruleset.stats());
    let knight = &actors[0].1;
    let pyromancer = &actors[1].1;

    // strength 16 + level 5 * 0.5 + longsword 4
    assert_eq!(resolver.resolve(knight, "attack").unwrap(), 22.5);
    // (intelligence 18 * 1.5 + level 5 * 0.5) * 1.15
    let spell_power = resolver.resolve(pyromancer, "spell_power").unwrap();
    assert!((spell_power - 33.925).abs() < 1e-9, "{spell_power}");
    // undeclared base entries fall back to the stat default
    assert_eq!(resolver.resolve(pyromancer, "block_chance").unwrap(), 0.1);
}

#[test]
fn sample_shatter_combo_lands_on_target() {
    let ruleset = sample_ruleset();
    let mut actors = embedded::actors(&ruleset).unwrap();
    let (_, mut pyromancer) = actors.pop().unwrap();
    let (_, mut knight) = actors.pop().unwrap();
    let mut resolver = CombatResolver::new(Arc::clone(&ruleset));
    let mut rolls = FixedRolls::constant(0.0);

    let first = resolver
        .perform(
            &mut pyromancer,
            &mut knight,
            &ActionRequest::new("frostbolt", 0.0),
            &mut rolls,
        )
        .unwrap();
    assert!(first.outcome().unwrap().combo.is_none());

    let second = resolver
        .perform(
            &mut pyromancer,
            &mut knight,
            &ActionRequest::new("bash", 1.0),
            &mut rolls,
        )
        .unwrap();
    let outcome = second.outcome().unwrap();
    let combo = outcome.combo.as_ref().unwrap();

    assert_eq!(combo.combo, "shatter");
    assert_eq!(combo.recipient, Some(knight.id()));
    // one sunder from the bash secondary, one from the combo
    assert_eq!(knight.effects().count_of("sunder"), 2);
    assert_eq!(knight.effects().count_of("chill"), 1);
    assert_eq!(pyromancer.resources().current(ResourceKind::Mana), 82.0);
    assert_eq!(pyromancer.resources().current(ResourceKind::Stamina), 22.0);
}
