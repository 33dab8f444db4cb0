use super::common::register_common;
use super::{ConditionTable, NumericalSource, Quantifier};
use crate::database::{CharacterTrait, Database};
use crate::game::{CharacterSkill, Game};
use crate::navigation::ScopeNavigator;
use crate::scope::CharacterId;

pub(crate) fn condition_table() -> ConditionTable<CharacterId> {
    let mut table = ConditionTable::new();
    register_common(&mut table);

    table.register_entry::<CharacterTrait>("trait", |character, game, character_trait| {
        game.character(character).has_trait(character_trait)
    });
    table.register_flag("is_ruler", |character, game| game.is_ruler(character));
    table.register_numerical("military_skill", Skill(CharacterSkill::Military));
    table.register_numerical("diplomacy_skill", Skill(CharacterSkill::Diplomacy));
    table.register_numerical("administration_skill", Skill(CharacterSkill::Administration));

    table.register_scope(
        "country",
        "Country",
        ScopeNavigator::Single(|character, game| game.character(character).country()),
        Quantifier::Any,
    );
    table.register_scope(
        "location",
        "Location",
        ScopeNavigator::Single(|character, game| game.character(character).location()),
        Quantifier::Any,
    );
    table
}

#[derive(Clone)]
struct Skill(CharacterSkill);

impl NumericalSource<CharacterId, i64> for Skill {
    fn scope_value(&self, scope: CharacterId, game: &Game) -> i64 {
        game.character(scope).skill(self.0)
    }

    fn label(&self, _db: &Database) -> String {
        format!("{} Skill", self.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::condition::{AndCondition, Condition};
    use crate::context::ReadOnlyContext;
    use crate::game::CharacterSkill;
    use crate::scope::CharacterId;
    use crate::testing::{database_from_text, GameBuilder};

    #[test]
    fn test_skill_includes_modifiers() {
        let db = database_from_text(&[(
            "character_traits",
            "brave = { modifier = { military_skill_modifier = 2 } }",
        )]);
        let root = gsml::parse_str("military_skill >= 5 country = { }").unwrap();
        let conditions = AndCondition::<CharacterId>::from_gsml(&root, &db).unwrap();
        let mut game = GameBuilder::new(db)
            .with_country("ALPHA")
            .with_character("marcus", Some("ALPHA"))
            .build();
        let marcus = game.find_character("marcus").unwrap();
        game.set_base_skill(marcus, CharacterSkill::Military, 3);
        let ctx = ReadOnlyContext::new();
        assert!(!conditions.check(marcus, &game, &ctx));

        let brave = game.database().character_traits.get_id("brave").unwrap();
        assert!(game.add_trait(marcus, brave));
        assert!(conditions.check(marcus, &game, &ctx));
        assert_eq!(
            conditions.get_string(&game, 0),
            "Military Skill >= 5\nCountry:"
        );
    }

    #[test]
    fn test_is_ruler() {
        let db = database_from_text(&[]);
        let root = gsml::parse_str("is_ruler = yes").unwrap();
        let condition = AndCondition::<CharacterId>::from_gsml(&root, &db).unwrap();
        let game = GameBuilder::new(db)
            .with_country("ALPHA")
            .with_ruler("ALPHA", "marcus")
            .with_character("gaius", Some("ALPHA"))
            .build();
        let ctx = ReadOnlyContext::new();
        assert!(condition.check(game.find_character("marcus").unwrap(), &game, &ctx));
        assert!(!condition.check(game.find_character("gaius").unwrap(), &game, &ctx));
    }
}
