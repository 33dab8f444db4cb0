use super::common::register_common;
use super::{EffectTable, Selection};
use crate::database::{Culture, Ideology, Religion};
use crate::navigation::ScopeNavigator;
use crate::scope::PopulationUnitId;

pub(crate) fn effect_table() -> EffectTable<PopulationUnitId> {
    let mut table = EffectTable::new();
    register_common(&mut table);

    table.register_entry::<Ideology>("ideology", |game, unit, ideology| {
        game.set_ideology(unit, Some(ideology));
    });
    table.register_entry::<Culture>("culture", |game, unit, culture| {
        game.set_population_unit_culture(unit, culture);
    });
    table.register_entry::<Religion>("religion", |game, unit, religion| {
        game.set_population_unit_religion(unit, religion);
    });

    table.register_scope(
        "country",
        "Country",
        ScopeNavigator::Single(|unit, game| game.population_unit(unit).country()),
        Selection::All,
    );
    table.register_scope(
        "province",
        "Province",
        ScopeNavigator::Single(|unit, game| Some(game.population_unit(unit).province())),
        Selection::All,
    );
    table.register_scope(
        "site",
        "Site",
        ScopeNavigator::Single(|unit, game| game.population_unit(unit).site()),
        Selection::All,
    );
    table
}

#[cfg(test)]
mod tests {
    use crate::context::Context;
    use crate::effect::{Effect, EffectList};
    use crate::scope::{PopulationUnitId, ProvinceId};
    use crate::testing::{database_from_text, GameBuilder};

    #[test]
    fn test_ideology_through_province() {
        let db = database_from_text(&[
            ("cultural_groups", "latin = { }"),
            ("cultures", "roman = { group = latin }"),
            ("religions", "pagan = { }"),
            ("population_types", "farmers = { }"),
            ("ideologies", "populares = { modifier = { consumption_modifier = 5 } }"),
        ]);
        let effects = EffectList::<ProvinceId>::from_gsml(
            &gsml::parse_str("every_population_unit = { ideology = populares }").unwrap(),
            &db,
        )
        .unwrap();
        let mut game = GameBuilder::new(db)
            .with_province("latium", None)
            .with_population_unit("latium", "farmers", "roman", "pagan")
            .with_population_unit("latium", "farmers", "roman", "pagan")
            .build();
        let latium = game.find_province("latium").unwrap();
        effects.do_effect(latium, &mut game, &mut Context::new());

        let populares = game.database().ideologies.get_id("populares").unwrap();
        for unit in [PopulationUnitId(0), PopulationUnitId(1)] {
            assert_eq!(game.population_unit(unit).ideology(), Some(populares));
            assert_eq!(game.population_unit(unit).consumption_modifier(), 5);
        }
    }
}
