use super::common::register_common;
use super::{ConditionTable, Quantifier};
use crate::database::{Culture, Ideology, PopulationType, Religion};
use crate::navigation::ScopeNavigator;
use crate::scope::PopulationUnitId;

pub(crate) fn condition_table() -> ConditionTable<PopulationUnitId> {
    let mut table = ConditionTable::new();
    register_common(&mut table);

    table.register_entry::<PopulationType>("population_type", |unit, game, population_type| {
        game.population_unit(unit).population_type() == population_type
    });
    table.register_entry::<Culture>("culture", |unit, game, culture| {
        game.population_unit(unit).culture() == culture
    });
    table.register_entry::<Religion>("religion", |unit, game, religion| {
        game.population_unit(unit).religion() == religion
    });
    table.register_entry::<Ideology>("ideology", |unit, game, ideology| {
        game.population_unit(unit).ideology() == Some(ideology)
    });

    table.register_scope(
        "country",
        "Country",
        ScopeNavigator::Single(|unit, game| game.population_unit(unit).country()),
        Quantifier::Any,
    );
    table.register_scope(
        "province",
        "Province",
        ScopeNavigator::Single(|unit, game| Some(game.population_unit(unit).province())),
        Quantifier::Any,
    );
    table.register_scope(
        "site",
        "Site",
        ScopeNavigator::Single(|unit, game| game.population_unit(unit).site()),
        Quantifier::Any,
    );
    table
}
