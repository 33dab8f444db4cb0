use super::common::register_common;
use super::{ConditionTable, NumericalSource, Quantifier};
use crate::database::Database;
use crate::fixed::{Fixed, Millesimal};
use crate::game::Game;
use crate::navigation::ScopeNavigator;
use crate::scope::MilitaryUnitId;

pub(crate) fn condition_table() -> ConditionTable<MilitaryUnitId> {
    let mut table = ConditionTable::new();
    register_common(&mut table);

    table.register_numerical("hit_points", HitPoints);
    table.register_numerical("morale", Morale);

    table.register_scope(
        "country",
        "Country",
        ScopeNavigator::Single(|unit, game| game.military_unit(unit).country()),
        Quantifier::Any,
    );
    table.register_scope(
        "commander",
        "Commander",
        ScopeNavigator::Single(|unit, game| game.military_unit(unit).commander()),
        Quantifier::Any,
    );
    table.register_scope(
        "location",
        "Location",
        ScopeNavigator::Single(|unit, game| game.military_unit(unit).location()),
        Quantifier::Any,
    );
    table
}

#[derive(Clone)]
struct HitPoints;

impl NumericalSource<MilitaryUnitId, Fixed> for HitPoints {
    fn scope_value(&self, scope: MilitaryUnitId, game: &Game) -> Fixed {
        game.military_unit(scope).hit_points()
    }

    fn label(&self, _db: &Database) -> String {
        "Hit Points".to_string()
    }
}

#[derive(Clone)]
struct Morale;

impl NumericalSource<MilitaryUnitId, Millesimal> for Morale {
    fn scope_value(&self, scope: MilitaryUnitId, game: &Game) -> Millesimal {
        game.military_unit(scope).morale()
    }

    fn label(&self, _db: &Database) -> String {
        "Morale".to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::condition::{AndCondition, Condition};
    use crate::context::ReadOnlyContext;
    use crate::fixed::Millesimal;
    use crate::scope::MilitaryUnitId;
    use crate::testing::{database_from_text, GameBuilder};

    #[test]
    fn test_morale_precision() {
        let db = database_from_text(&[]);
        let root = gsml::parse_str("morale >= 0.755 commander = { }").unwrap();
        let condition = AndCondition::<MilitaryUnitId>::from_gsml(&root, &db).unwrap();
        let mut game = GameBuilder::new(db)
            .with_country("ALPHA")
            .with_military_unit("first_legion", "ALPHA")
            .build();
        let unit = MilitaryUnitId(0);
        let ctx = ReadOnlyContext::new();
        // No commander.
        assert!(!condition.check(unit, &game, &ctx));

        let marcus = game.add_character("marcus", None);
        game.set_commander(unit, Some(marcus));
        assert!(condition.check(unit, &game, &ctx));

        game.change_morale(unit, Millesimal::from_raw(-246));
        assert!(!condition.check(unit, &game, &ctx));
        assert_eq!(condition.get_string(&game, 0), "Morale >= 0.755\nCommander:");
    }
}
