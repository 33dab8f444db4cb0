use super::common::register_common;
use super::{ConditionTable, NumericalSource, Quantifier};
use crate::database::{Culture, Database, Religion, Resource};
use crate::game::Game;
use crate::navigation::ScopeNavigator;
use crate::scope::ProvinceId;

pub(crate) fn condition_table() -> ConditionTable<ProvinceId> {
    let mut table = ConditionTable::new();
    register_common(&mut table);

    table.register_entry::<Culture>("culture", |province, game, culture| {
        game.province(province).culture() == Some(culture)
    });
    table.register_entry::<Religion>("religion", |province, game, religion| {
        game.province(province).religion() == Some(religion)
    });
    table.register_entry::<Resource>("has_resource", |province, game, resource| {
        game.province(province)
            .sites()
            .iter()
            .any(|site| game.site(*site).resource() == Some(resource))
    });
    table.register_flag("is_owned", |province, game| game.province(province).owner().is_some());
    table.register_numerical("population_units", PopulationUnits);

    table.register_scope(
        "owner",
        "Owner",
        ScopeNavigator::Single(|province, game| game.province(province).owner()),
        Quantifier::Any,
    );
    table.register_scope(
        "any_site",
        "Any site",
        ScopeNavigator::Collection(|province, game| game.province(province).sites().to_vec()),
        Quantifier::Any,
    );
    table.register_scope(
        "any_neighbor_province",
        "Any neighbor province",
        ScopeNavigator::Collection(|province, game| {
            game.province(province).neighbors().iter().copied().collect()
        }),
        Quantifier::Any,
    );
    table.register_scope(
        "any_population_unit",
        "Any population unit",
        ScopeNavigator::Collection(|province, game| {
            game.province(province).population_units().to_vec()
        }),
        Quantifier::Any,
    );
    table
}

#[derive(Clone)]
struct PopulationUnits;

impl NumericalSource<ProvinceId, i64> for PopulationUnits {
    fn scope_value(&self, scope: ProvinceId, game: &Game) -> i64 {
        game.province(scope).population_units().len() as i64
    }

    fn label(&self, _db: &Database) -> String {
        "Population Units".to_string()
    }
}
