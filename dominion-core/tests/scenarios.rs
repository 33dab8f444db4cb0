use dominion_core::testing::{database_from_text, GameBuilder};
use dominion_core::{AndCondition, Condition, CountryId, Database, DomainTier, ReadOnlyContext};

fn conditions(text: &str, db: &Database) -> AndCondition<CountryId> {
    let root = gsml::parse_str(text).expect("Parse");
    AndCondition::from_gsml(&root, db).expect("Conditions")
}

#[test]
fn test_law_cost_modifier_scenario() {
    let db = database_from_text(&[
        ("law_groups", "succession = { }"),
        (
            "laws",
            "elective = { group = succession modifier = { law_cost_modifier = 10 } }",
        ),
        ("population_types", "farmers = { }"),
        ("cultures", "latin = { }"),
        ("religions", "pagan = { }"),
    ]);
    let elective = db.laws.get_id("elective").unwrap();
    let mut game = GameBuilder::new(db)
        .with_country("ALPHA")
        .with_province("latium", Some("ALPHA"))
        .with_population_unit("latium", "farmers", "latin", "pagan")
        .build();
    let alpha = game.find_country("ALPHA").unwrap();
    assert_eq!(game.country(alpha).law_cost_modifier(), 0);

    game.set_law(alpha, elective);
    assert_eq!(game.country(alpha).law_cost_modifier(), 10);
    assert_eq!(game.country(alpha).get_total_law_cost_modifier(), 110);
    assert_eq!(game.get_law_cost(alpha), 110);

    // Re-enacting the same law must not stack its modifier.
    game.set_law(alpha, elective);
    assert_eq!(game.country(alpha).law_cost_modifier(), 10);
}

#[test]
fn test_tier_condition_scenario() {
    let db = database_from_text(&[]);
    let at_least_duchy = conditions("tier >= duchy", &db);
    let mut game = GameBuilder::new(db)
        .with_country("ALPHA")
        .with_country("BETA")
        .with_tier("ALPHA", DomainTier::Empire)
        .with_tier("BETA", DomainTier::County)
        .build();
    let (alpha, beta) = (CountryId(0), CountryId(1));
    let ctx = ReadOnlyContext::new();

    assert!(at_least_duchy.check(alpha, &game, &ctx));
    assert!(!at_least_duchy.check(beta, &game, &ctx));

    game.set_tier(beta, DomainTier::Duchy);
    assert!(at_least_duchy.check(beta, &game, &ctx));
    assert_eq!(at_least_duchy.get_string(&game, 0), "Tier >= Duchy");
}

#[test]
fn test_technology_and_tier_scenario() {
    let db = database_from_text(&[("technologies", "gunpowder = { }")]);
    let required = conditions("technology = gunpowder tier >= kingdom", &db);
    let mut game = GameBuilder::new(db)
        .with_country("ALPHA")
        .with_technology("ALPHA", "gunpowder")
        .with_tier("ALPHA", DomainTier::Duchy)
        .build();
    let alpha = CountryId(0);
    let ctx = ReadOnlyContext::new();

    assert!(!required.check(alpha, &game, &ctx));
    let before = game.to_json().unwrap();
    game.set_tier(alpha, DomainTier::Kingdom);
    assert!(required.check(alpha, &game, &ctx));

    // The tier is the only thing that changed.
    game.set_tier(alpha, DomainTier::Duchy);
    assert_eq!(game.to_json().unwrap(), before);
}

const GOVERNMENTS: &[(&str, &str)] = &[
    ("government_groups", "monarchy = { } republic = { }"),
    (
        "government_types",
        "feudal_monarchy = { group = monarchy } republic = { group = republic }",
    ),
];

#[test]
fn test_any_neighbor_scenario() {
    let db = database_from_text(GOVERNMENTS);
    let any_republic = conditions("any_neighbor_country = { government_type = republic }", &db);
    let game = GameBuilder::new(db)
        .with_country("SELF")
        .with_country("A")
        .with_country("B")
        .with_country("C")
        .with_government_type("A", "feudal_monarchy")
        .with_government_type("B", "republic")
        .with_government_type("C", "feudal_monarchy")
        .with_neighbors("SELF", "A")
        .with_neighbors("SELF", "B")
        .with_neighbors("SELF", "C")
        .build();
    let ctx = ReadOnlyContext::new();
    let own = game.find_country("SELF").unwrap();
    assert!(any_republic.check(own, &game, &ctx));

    // A only borders SELF, which has no government.
    let a = game.find_country("A").unwrap();
    assert!(!any_republic.check(a, &game, &ctx));
}

#[test]
fn test_any_neighbor_without_match() {
    let db = database_from_text(GOVERNMENTS);
    let any_republic = conditions("any_neighbor_country = { government_type = republic }", &db);
    let mut game = GameBuilder::new(db)
        .with_country("SELF")
        .with_country("A")
        .with_country("C")
        .with_government_type("A", "feudal_monarchy")
        .with_government_type("C", "feudal_monarchy")
        .with_neighbors("SELF", "A")
        .with_neighbors("SELF", "C")
        .build();
    let ctx = ReadOnlyContext::new();
    let own = game.find_country("SELF").unwrap();
    assert!(!any_republic.check(own, &game, &ctx));

    let a = game.find_country("A").unwrap();
    let republic = game.database().government_types.get_id("republic").unwrap();
    game.set_government_type(a, Some(republic));
    assert!(any_republic.check(own, &game, &ctx));
}
