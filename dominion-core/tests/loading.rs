use dominion_core::database::DataEntry;
use dominion_core::testing::GameBuilder;
use dominion_core::{Condition, Database, ReadOnlyContext, ScriptError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).expect("Create dir");
    fs::write(path, text).expect("Write");
}

fn content_dir() -> TempDir {
    let dir = TempDir::new().expect("TempDir");
    let root = dir.path();
    write(root, "defines.txt", "base_law_cost = 200\n");
    write(
        root,
        "technologies/military.txt",
        r#"
        # Later technologies may be declared before their prerequisites.
        gunpowder = {
            prerequisites = { bronze_working }
            modifier = { law_cost_modifier = -10 }
        }
        "#,
    );
    write(root, "technologies/ancient.txt", "bronze_working = { cost = 50 }\n");
    write(root, "law_groups/groups.txt", "succession = { }\n");
    write(
        root,
        "laws/succession.txt",
        r#"
        elective = {
            name = "Elective Monarchy"
            group = succession
            conditions = { tier >= duchy }
            modifier = { law_cost_modifier = 10 }
        }
        "#,
    );
    write(
        root,
        "decisions/economy.txt",
        r#"
        levy_tax = {
            conditions = { wealth < 100 }
            effects = { wealth += 25 }
        }
        "#,
    );
    write(root, "technologies/README.md", "ignored\n");
    dir
}

#[test]
fn test_load_directory() {
    let dir = content_dir();
    let db = Database::load_directory(dir.path()).expect("Load");

    assert_eq!(db.defines().base_law_cost, 200);
    assert_eq!(db.technologies.len(), 2);
    let elective = db.laws.get_by_identifier("elective").unwrap();
    assert_eq!(elective.name(), "Elective Monarchy");

    let gunpowder = db.technologies.get_id("gunpowder").unwrap();
    let levy_tax = db.decisions.get_id("levy_tax").unwrap();
    let mut game = GameBuilder::new(db).with_country("ALPHA").build();
    let alpha = game.find_country("ALPHA").unwrap();

    game.add_technology(alpha, gunpowder);
    assert_eq!(game.country(alpha).law_cost_modifier(), -10);

    assert!(game.take_decision(alpha, levy_tax));
    assert!(game.take_decision(alpha, levy_tax));
    assert_eq!(game.country(alpha).wealth(), 50);

    game.set_wealth(alpha, 100);
    assert!(!game.take_decision(alpha, levy_tax));
    assert_eq!(game.country(alpha).wealth(), 100);
}

#[test]
fn test_law_conditions_from_files() {
    let dir = content_dir();
    let db = Database::load_directory(dir.path()).expect("Load");
    let game = GameBuilder::new(db).with_country("ALPHA").build();
    let elective = game.database().laws.get_by_identifier("elective").unwrap();
    let conditions = elective.conditions().expect("Conditions");
    let alpha = game.find_country("ALPHA").unwrap();
    assert!(!conditions.check(alpha, &game, &ReadOnlyContext::new()));
    assert_eq!(conditions.get_string(&game, 0), "Tier >= Duchy");
}

#[test]
fn test_missing_defines_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "commodities/basic.txt", "grain = { }\n");
    let db = Database::load_directory(dir.path()).expect("Load");
    assert_eq!(db.defines().base_law_cost, 100);
    assert_eq!(db.starting_commodities().len(), 1);
}

#[test]
fn test_unknown_condition_names_entry_and_file() {
    let dir = content_dir();
    write(
        dir.path(),
        "laws/broken.txt",
        "serfdom = { group = succession conditions = { prestige > 10 } modifier = { law_cost_modifier = 5 } }\n",
    );
    let err = Database::load_directory(dir.path()).err().unwrap();
    let message = format!("{:#}", err);
    assert!(message.contains("Invalid content in"), "{}", message);
    assert!(message.contains("laws 'serfdom'"), "{}", message);
    assert!(message.contains("Unknown country condition: 'prestige'"), "{}", message);

    let script_error = err.downcast_ref::<ScriptError>().unwrap();
    assert!(matches!(
        script_error.root_cause(),
        ScriptError::UnknownCondition { key, .. } if key == "prestige"
    ));
}

#[test]
fn test_parse_error_names_file() {
    let dir = content_dir();
    write(dir.path(), "law_groups/broken.txt", "inheritance = {\n");
    let err = Database::load_directory(dir.path()).err().unwrap();
    let message = format!("{:#}", err);
    assert!(message.contains("broken.txt"), "{}", message);
}

#[test]
fn test_duplicate_identifier_across_files() {
    let dir = content_dir();
    write(dir.path(), "law_groups/more.txt", "succession = { }\n");
    let err = Database::load_directory(dir.path()).err().unwrap();
    let script_error = err.downcast_ref::<ScriptError>().unwrap();
    assert!(matches!(
        script_error.root_cause(),
        ScriptError::DuplicateIdentifier { category: "law_groups", .. }
    ));
}
