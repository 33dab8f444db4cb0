use super::common::register_common;
use super::numerical::keyed_numerical_from_gsml;
use super::{
    equality_operator, Condition, ConditionOperator, ConditionTable, NumericalSource, Quantifier,
};
use crate::context::ReadOnlyContext;
use crate::database::{
    Commodity, CommodityId, CulturalGroup, Culture, CultureId, DataEntry, Database, DomainTier,
    GovernmentGroup, GovernmentType, Ideology, IdeologyId, Law, PopulationType, PopulationTypeId,
    Religion, ReligionId, Resource, ResourceId, Technology,
};
use crate::error::ScriptError;
use crate::fixed::Fixed;
use crate::game::Game;
use crate::navigation::ScopeNavigator;
use crate::scope::{CountryId, PopulationUnitId};

pub(crate) fn condition_table() -> ConditionTable<CountryId> {
    let mut table = ConditionTable::new();
    register_common(&mut table);

    table.register_entry::<Technology>("technology", |country, game, technology| {
        game.country(country).has_technology(technology)
    });
    table.register_entry::<GovernmentType>("government_type", |country, game, government_type| {
        game.country(country).government_type() == Some(government_type)
    });
    table.register_entry::<GovernmentGroup>("government_group", |country, game, group| {
        game.country(country)
            .government_type()
            .is_some_and(|t| game.database().government_types.get(t).group() == group)
    });
    table.register_entry::<Law>("law", |country, game, law| game.country(country).has_law(law));
    table.register_entry::<CulturalGroup>("cultural_group", |country, game, group| {
        capital_culture(country, game)
            .is_some_and(|culture| game.database().cultures.get(culture).group() == group)
    });
    table.register_entry::<Culture>("culture", |country, game, culture| {
        capital_culture(country, game) == Some(culture)
    });
    table.register_entry::<Religion>("religion", |country, game, religion| {
        capital_religion(country, game) == Some(religion)
    });
    table.register_entry::<Resource>("has_resource", has_resource);
    table.register_flag("is_subject", |country, game| game.country(country).is_subject());

    table.register_numerical("tier", Tier);
    table.register_numerical("population_units", PopulationUnits);
    table.register_numerical("wealth", Wealth);
    table.register_numerical("wealth_per_population_unit", WealthPerPopulationUnit);
    table.register_property("owns_province", |property, _| {
        Ok(Box::new(OwnsProvinceCondition {
            operator: equality_operator(property)?,
            province: property.value.clone(),
        }))
    });

    table.register_block("population_type_count", |block, db| {
        keyed_numerical_from_gsml::<_, PopulationType, _, _>(
            "population_type_count",
            "population_type",
            block,
            db,
            PopulationTypeCount,
        )
    });
    table.register_block("ideology_count", |block, db| {
        keyed_numerical_from_gsml::<_, Ideology, _, _>(
            "ideology_count",
            "ideology",
            block,
            db,
            IdeologyCount,
        )
    });
    table.register_block("culture_count", |block, db| {
        keyed_numerical_from_gsml::<_, Culture, _, _>(
            "culture_count",
            "culture",
            block,
            db,
            CultureCount,
        )
    });
    table.register_block("stored_commodity", |block, db| {
        keyed_numerical_from_gsml::<_, Commodity, _, _>(
            "stored_commodity",
            "commodity",
            block,
            db,
            StoredCommodity,
        )
    });

    table.register_scope(
        "ruler",
        "Ruler",
        ScopeNavigator::Single(|country, game| game.country(country).ruler()),
        Quantifier::Any,
    );
    table.register_scope(
        "capital",
        "Capital",
        ScopeNavigator::Single(|country, game| game.country(country).capital()),
        Quantifier::Any,
    );
    table.register_scope(
        "overlord",
        "Overlord",
        ScopeNavigator::Single(|country, game| game.country(country).overlord()),
        Quantifier::Any,
    );
    table.register_scope(
        "any_known_country",
        "Any known country",
        ScopeNavigator::Collection(|country, game| {
            game.country(country).known_countries().iter().copied().collect()
        }),
        Quantifier::Any,
    );
    table.register_scope(
        "any_neighbor_country",
        "Any neighbor country",
        ScopeNavigator::Collection(neighbor_countries),
        Quantifier::Any,
    );
    table.register_scope(
        "every_neighbor_country",
        "Every neighbor country",
        ScopeNavigator::Collection(neighbor_countries),
        Quantifier::Every,
    );
    table.register_scope(
        "any_subject_country",
        "Any subject country",
        ScopeNavigator::Collection(|country, game| {
            game.country(country).subjects().iter().copied().collect()
        }),
        Quantifier::Any,
    );
    table.register_scope(
        "any_province",
        "Any province",
        ScopeNavigator::Collection(|country, game| game.country(country).provinces().to_vec()),
        Quantifier::Any,
    );
    table.register_scope(
        "every_province",
        "Every province",
        ScopeNavigator::Collection(|country, game| game.country(country).provinces().to_vec()),
        Quantifier::Every,
    );
    table
}

pub(crate) fn neighbor_countries(country: CountryId, game: &Game) -> Vec<CountryId> {
    game.country(country).neighbors().iter().copied().collect()
}

/// A country's culture is that of its capital.
fn capital_culture(country: CountryId, game: &Game) -> Option<CultureId> {
    game.country(country)
        .capital()
        .and_then(|capital| game.province(capital).culture())
}

fn capital_religion(country: CountryId, game: &Game) -> Option<ReligionId> {
    game.country(country)
        .capital()
        .and_then(|capital| game.province(capital).religion())
}

fn has_resource(country: CountryId, game: &Game, resource: ResourceId) -> bool {
    game.country(country).provinces().iter().any(|province| {
        game.province(*province)
            .sites()
            .iter()
            .any(|site| game.site(*site).resource() == Some(resource))
    })
}

fn count_population_units(
    country: CountryId,
    game: &Game,
    predicate: impl Fn(PopulationUnitId) -> bool,
) -> i64 {
    game.country(country)
        .population_units()
        .iter()
        .filter(|unit| predicate(**unit))
        .count() as i64
}

#[derive(Clone)]
struct Tier;

impl NumericalSource<CountryId, DomainTier> for Tier {
    fn scope_value(&self, scope: CountryId, game: &Game) -> DomainTier {
        game.country(scope).tier()
    }

    fn label(&self, _db: &Database) -> String {
        "Tier".to_string()
    }
}

#[derive(Clone)]
struct PopulationUnits;

impl NumericalSource<CountryId, i64> for PopulationUnits {
    fn scope_value(&self, scope: CountryId, game: &Game) -> i64 {
        game.country(scope).population_units().len() as i64
    }

    fn label(&self, _db: &Database) -> String {
        "Population Units".to_string()
    }
}

#[derive(Clone)]
struct Wealth;

impl NumericalSource<CountryId, Fixed> for Wealth {
    fn scope_value(&self, scope: CountryId, game: &Game) -> Fixed {
        Fixed::from_int(game.country(scope).wealth())
    }

    fn label(&self, _db: &Database) -> String {
        "Wealth".to_string()
    }
}

/// Wealth against a threshold that scales with the number of population
/// units.
#[derive(Clone)]
struct WealthPerPopulationUnit;

impl NumericalSource<CountryId, Fixed> for WealthPerPopulationUnit {
    fn scope_value(&self, scope: CountryId, game: &Game) -> Fixed {
        Fixed::from_int(game.country(scope).wealth())
    }

    fn value(&self, scope: CountryId, game: &Game, base: Fixed) -> Fixed {
        base.mul_int(game.country(scope).population_units().len() as i64)
    }

    fn label(&self, _db: &Database) -> String {
        "Wealth per Population Unit".to_string()
    }
}

struct PopulationTypeCount(PopulationTypeId);

impl NumericalSource<CountryId, i64> for PopulationTypeCount {
    fn scope_value(&self, scope: CountryId, game: &Game) -> i64 {
        count_population_units(scope, game, |unit| {
            game.population_unit(unit).population_type() == self.0
        })
    }

    fn label(&self, db: &Database) -> String {
        format!("{} Population Units", db.population_types.get(self.0).name())
    }
}

struct IdeologyCount(IdeologyId);

impl NumericalSource<CountryId, i64> for IdeologyCount {
    fn scope_value(&self, scope: CountryId, game: &Game) -> i64 {
        count_population_units(scope, game, |unit| {
            game.population_unit(unit).ideology() == Some(self.0)
        })
    }

    fn label(&self, db: &Database) -> String {
        format!("{} Population Units", db.ideologies.get(self.0).name())
    }
}

struct CultureCount(CultureId);

impl NumericalSource<CountryId, i64> for CultureCount {
    fn scope_value(&self, scope: CountryId, game: &Game) -> i64 {
        count_population_units(scope, game, |unit| game.population_unit(unit).culture() == self.0)
    }

    fn label(&self, db: &Database) -> String {
        format!("{} Population Units", db.cultures.get(self.0).name())
    }
}

struct StoredCommodity(CommodityId);

impl NumericalSource<CountryId, i64> for StoredCommodity {
    fn scope_value(&self, scope: CountryId, game: &Game) -> i64 {
        game.country(scope).stored_commodity(self.0)
    }

    fn label(&self, db: &Database) -> String {
        format!("Stored {}", db.commodities.get(self.0).name())
    }
}

/// `owns_province = <province>`. Provinces are game state rather than
/// database entries, so the name is resolved on each check.
struct OwnsProvinceCondition {
    operator: ConditionOperator,
    province: String,
}

impl Condition<CountryId> for OwnsProvinceCondition {
    fn class_identifier(&self) -> &'static str {
        "owns_province"
    }

    fn operator(&self) -> ConditionOperator {
        self.operator
    }

    fn check_assignment(&self, scope: CountryId, game: &Game, _ctx: &ReadOnlyContext) -> bool {
        game.find_province(&self.province)
            .is_some_and(|province| game.province(province).owner() == Some(scope))
    }

    fn check_validity(&self, _db: &Database) -> Result<(), ScriptError> {
        if self.province.is_empty() {
            return Err(ScriptError::invalid_value("owns_province", "", "empty province name"));
        }
        Ok(())
    }

    fn get_assignment_string(&self, game: &Game) -> String {
        let name = game
            .find_province(&self.province)
            .map(|province| game.province(province).identifier().to_string())
            .unwrap_or_else(|| self.province.clone());
        format!("Owns {}", name)
    }
}
