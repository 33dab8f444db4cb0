use super::common::register_common;
use super::{EffectTable, Selection};
use crate::database::CharacterTrait;
use crate::game::CharacterSkill;
use crate::navigation::ScopeNavigator;
use crate::scope::CharacterId;

pub(crate) fn effect_table() -> EffectTable<CharacterId> {
    let mut table = EffectTable::new();
    register_common(&mut table);

    table.register_entry::<CharacterTrait>("add_trait", |game, character, character_trait| {
        game.add_trait(character, character_trait);
    });
    table.register_entry::<CharacterTrait>("remove_trait", |game, character, character_trait| {
        game.remove_trait(character, character_trait);
    });
    table.register_numerical(
        "military_skill",
        |character, game| game.character(character).base_skill(CharacterSkill::Military),
        |game, character, change| game.change_base_skill(character, CharacterSkill::Military, change),
    );
    table.register_numerical(
        "diplomacy_skill",
        |character, game| game.character(character).base_skill(CharacterSkill::Diplomacy),
        |game, character, change| game.change_base_skill(character, CharacterSkill::Diplomacy, change),
    );
    table.register_numerical(
        "administration_skill",
        |character, game| game.character(character).base_skill(CharacterSkill::Administration),
        |game, character, change| {
            game.change_base_skill(character, CharacterSkill::Administration, change)
        },
    );

    table.register_scope(
        "country",
        "Country",
        ScopeNavigator::Single(|character, game| game.character(character).country()),
        Selection::All,
    );
    table.register_scope(
        "location",
        "Location",
        ScopeNavigator::Single(|character, game| game.character(character).location()),
        Selection::All,
    );
    table
}

#[cfg(test)]
mod tests {
    use crate::context::{Context, ReadOnlyContext};
    use crate::effect::{Effect, EffectList};
    use crate::game::CharacterSkill;
    use crate::scope::CharacterId;
    use crate::testing::{database_from_text, GameBuilder};

    #[test]
    fn test_traits_apply_modifiers() {
        let db = database_from_text(&[(
            "character_traits",
            "brave = { modifier = { military_skill_modifier = 3 } }",
        )]);
        let add = EffectList::<CharacterId>::from_gsml(
            &gsml::parse_str("add_trait = brave military_skill += 1").unwrap(),
            &db,
        )
        .unwrap();
        let remove = EffectList::<CharacterId>::from_gsml(
            &gsml::parse_str("remove_trait = brave").unwrap(),
            &db,
        )
        .unwrap();
        let mut game = GameBuilder::new(db).with_character("marcus", None).build();
        let marcus = game.find_character("marcus").unwrap();

        assert_eq!(
            add.get_string(marcus, &game, &ReadOnlyContext::new(), 0, "- "),
            "- Add Trait: Brave\n- Military Skill: +1"
        );
        add.do_effect(marcus, &mut game, &mut Context::new());
        assert_eq!(game.character(marcus).skill(CharacterSkill::Military), 4);

        remove.do_effect(marcus, &mut game, &mut Context::new());
        assert_eq!(game.character(marcus).skill(CharacterSkill::Military), 1);
        assert!(game.character(marcus).traits().is_empty());
    }
}
