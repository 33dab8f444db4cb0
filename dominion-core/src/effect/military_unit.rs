use super::common::register_common;
use super::{EffectTable, Selection};
use crate::navigation::ScopeNavigator;
use crate::scope::MilitaryUnitId;

pub(crate) fn effect_table() -> EffectTable<MilitaryUnitId> {
    let mut table = EffectTable::new();
    register_common(&mut table);

    table.register_numerical(
        "hit_points",
        |unit, game| game.military_unit(unit).hit_points(),
        |game, unit, change| game.change_hit_points(unit, change),
    );
    table.register_numerical(
        "morale",
        |unit, game| game.military_unit(unit).morale(),
        |game, unit, change| game.change_morale(unit, change),
    );

    table.register_scope(
        "country",
        "Country",
        ScopeNavigator::Single(|unit, game| game.military_unit(unit).country()),
        Selection::All,
    );
    table.register_scope(
        "commander",
        "Commander",
        ScopeNavigator::Single(|unit, game| game.military_unit(unit).commander()),
        Selection::All,
    );
    table.register_scope(
        "location",
        "Location",
        ScopeNavigator::Single(|unit, game| game.military_unit(unit).location()),
        Selection::All,
    );
    table
}

#[cfg(test)]
mod tests {
    use crate::context::{Context, ReadOnlyContext};
    use crate::effect::{Effect, EffectList};
    use crate::fixed::{Fixed, Millesimal};
    use crate::scope::MilitaryUnitId;
    use crate::testing::{database_from_text, GameBuilder};

    #[test]
    fn test_stat_effects() {
        let db = database_from_text(&[]);
        let effects = EffectList::<MilitaryUnitId>::from_gsml(
            &gsml::parse_str("hit_points -= 12.5 morale -= 0.125").unwrap(),
            &db,
        )
        .unwrap();
        let mut game = GameBuilder::new(db)
            .with_country("ALPHA")
            .with_military_unit("first_legion", "ALPHA")
            .build();
        let unit = MilitaryUnitId(0);
        assert_eq!(
            effects.get_string(unit, &game, &ReadOnlyContext::new(), 0, ""),
            "Hit Points: -12.5\nMorale: -0.125"
        );
        effects.do_effect(unit, &mut game, &mut Context::new());
        assert_eq!(game.military_unit(unit).hit_points(), Fixed::from_raw(8750));
        assert_eq!(game.military_unit(unit).morale(), Millesimal::from_raw(875));
    }
}
