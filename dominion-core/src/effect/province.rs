use super::common::register_common;
use super::{EffectTable, Selection};
use crate::database::{Culture, Religion};
use crate::navigation::ScopeNavigator;
use crate::scope::ProvinceId;

pub(crate) fn effect_table() -> EffectTable<ProvinceId> {
    let mut table = EffectTable::new();
    register_common(&mut table);

    table.register_entry::<Culture>("culture", |game, province, culture| {
        game.set_province_culture(province, Some(culture));
    });
    table.register_entry::<Religion>("religion", |game, province, religion| {
        game.set_province_religion(province, Some(religion));
    });

    table.register_scope(
        "owner",
        "Owner",
        ScopeNavigator::Single(|province, game| game.province(province).owner()),
        Selection::All,
    );
    table.register_scope(
        "every_site",
        "Every site",
        ScopeNavigator::Collection(|province, game| game.province(province).sites().to_vec()),
        Selection::All,
    );
    table.register_scope(
        "every_population_unit",
        "Every population unit",
        ScopeNavigator::Collection(|province, game| {
            game.province(province).population_units().to_vec()
        }),
        Selection::All,
    );
    table.register_scope(
        "random_population_unit",
        "Random population unit",
        ScopeNavigator::Collection(|province, game| {
            game.province(province).population_units().to_vec()
        }),
        Selection::Random,
    );
    table
}

#[cfg(test)]
mod tests {
    use crate::context::Context;
    use crate::effect::{Effect, EffectList};
    use crate::scope::ProvinceId;
    use crate::testing::{database_from_text, GameBuilder};

    #[test]
    fn test_religion_swaps_province_modifier() {
        let db = database_from_text(&[(
            "religions",
            "pagan = { province_modifier = { population_capacity_modifier = 10 } } \
             orthodox = { province_modifier = { population_capacity_modifier = 25 } }",
        )]);
        let effects = EffectList::<ProvinceId>::from_gsml(
            &gsml::parse_str("religion = orthodox").unwrap(),
            &db,
        )
        .unwrap();
        let mut game = GameBuilder::new(db)
            .with_province("latium", None)
            .with_province_religion("latium", "pagan")
            .build();
        let latium = game.find_province("latium").unwrap();
        assert_eq!(game.province(latium).population_capacity_modifier(), 10);

        effects.do_effect(latium, &mut game, &mut Context::new());
        assert_eq!(game.province(latium).population_capacity_modifier(), 25);
    }
}
