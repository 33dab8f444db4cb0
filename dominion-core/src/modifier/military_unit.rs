use super::{FixedStatModifierEffect, ModifierEffectTable};
use crate::game::Game;
use crate::scope::MilitaryUnitId;

pub(crate) fn modifier_effect_table() -> ModifierEffectTable<MilitaryUnitId> {
    let mut table = ModifierEffectTable::new();
    table.register("attack", |value, _| {
        Ok(Box::new(FixedStatModifierEffect::new(
            "attack",
            "Attack",
            value,
            Game::change_attack,
        )))
    });
    table.register("defense", |value, _| {
        Ok(Box::new(FixedStatModifierEffect::new(
            "defense",
            "Defense",
            value,
            Game::change_defense,
        )))
    });
    table.register("hit_points", |value, _| {
        Ok(Box::new(FixedStatModifierEffect::new(
            "hit_points",
            "Hit Points",
            value,
            Game::change_hit_points,
        )))
    });
    // Morale is kept at a finer precision; the change converts exactly.
    table.register("morale", |value, _| {
        Ok(Box::new(FixedStatModifierEffect::new(
            "morale",
            "Morale",
            value,
            |game: &mut Game, unit, change| game.change_morale(unit, change.rescale()),
        )))
    });
    table
}

#[cfg(test)]
mod tests {
    use crate::fixed::{Fixed, Millesimal};
    use crate::modifier::Modifier;
    use crate::scope::MilitaryUnitId;
    use crate::testing::{database_from_text, GameBuilder};

    #[test]
    fn test_unit_stats() {
        let db = database_from_text(&[]);
        let root = gsml::parse_str("modifier = { attack = 1.5 morale = 0.25 }").unwrap();
        let modifier =
            Modifier::<MilitaryUnitId>::from_gsml(root.get_child("modifier").unwrap(), &db)
                .unwrap();
        let mut game = GameBuilder::new(db)
            .with_country("ALPHA")
            .with_military_unit("first_legion", "ALPHA")
            .build();
        let unit = MilitaryUnitId(0);

        modifier.apply(unit, &mut game, Fixed::ONE);
        assert_eq!(game.military_unit(unit).attack(), "1.5".parse().unwrap());
        assert_eq!(game.military_unit(unit).morale(), "1.25".parse::<Millesimal>().unwrap());

        modifier.remove(unit, &mut game, Fixed::ONE);
        assert_eq!(game.military_unit(unit).attack(), Fixed::ZERO);
        assert_eq!(game.military_unit(unit).morale(), Millesimal::ONE);
    }
}
