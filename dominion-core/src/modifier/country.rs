use super::{
    FixedStatModifierEffect, ModifierEffect, ModifierEffectTable, StatModifierEffect,
};
use crate::database::{BuildingClassId, CommodityId, DataEntry, Database};
use crate::error::ScriptError;
use crate::fixed::{Fixed, Rounding};
use crate::game::Game;
use crate::scope::CountryId;

pub(crate) fn modifier_effect_table() -> ModifierEffectTable<CountryId> {
    let mut table = ModifierEffectTable::new();
    table.register("law_cost_modifier", |value, _| {
        Ok(Box::new(
            StatModifierEffect::new(
                "law_cost_modifier",
                "Law Cost",
                value,
                Game::change_law_cost_modifier,
            )
            .percent(),
        ))
    });
    table.register("technology_cost_modifier", |value, _| {
        Ok(Box::new(
            StatModifierEffect::new(
                "technology_cost_modifier",
                "Technology Cost",
                value,
                Game::change_technology_cost_modifier,
            )
            .percent()
            .cost(),
        ))
    });
    table.register("storage_capacity", |value, _| {
        Ok(Box::new(StatModifierEffect::new(
            "storage_capacity",
            "Storage Capacity",
            value,
            Game::change_storage_capacity,
        )))
    });
    table.register("diplomatic_penalty_for_expansion", |value, _| {
        Ok(Box::new(FixedStatModifierEffect::new(
            "diplomatic_penalty_for_expansion",
            "Diplomatic Penalty for Expansion",
            value,
            Game::change_diplomatic_penalty_for_expansion,
        )))
    });
    table.register_pattern(commodity_output_modifier);
    table.register_pattern(free_building_class);
    table
}

/// `<commodity>_output_modifier = X`
fn commodity_output_modifier(
    key: &str,
    value: Fixed,
    db: &Database,
) -> Result<Option<Box<dyn ModifierEffect<CountryId>>>, ScriptError> {
    let Some(commodity) = key.strip_suffix("_output_modifier") else {
        return Ok(None);
    };
    if !db.commodities.contains(commodity) {
        return Ok(None);
    }
    Ok(Some(Box::new(CommodityOutputModifierEffect {
        key: key.to_string(),
        commodity: db.commodities.get_id(commodity)?,
        value,
    })))
}

/// `free_<building_class> = N`
fn free_building_class(
    key: &str,
    value: Fixed,
    db: &Database,
) -> Result<Option<Box<dyn ModifierEffect<CountryId>>>, ScriptError> {
    let Some(building_class) = key.strip_prefix("free_") else {
        return Ok(None);
    };
    if !db.building_classes.contains(building_class) {
        return Ok(None);
    }
    Ok(Some(Box::new(FreeBuildingClassEffect {
        key: key.to_string(),
        building_class: db.building_classes.get_id(building_class)?,
        value,
    })))
}

struct CommodityOutputModifierEffect {
    key: String,
    commodity: CommodityId,
    value: Fixed,
}

impl ModifierEffect<CountryId> for CommodityOutputModifierEffect {
    fn identifier(&self) -> String {
        self.key.clone()
    }

    fn value(&self) -> Fixed {
        self.value
    }

    fn apply(&self, scope: CountryId, game: &mut Game, multiplier: Fixed) {
        let change = self.value.mul_to_int(multiplier, Rounding::TowardZero);
        game.change_commodity_output_modifier(scope, self.commodity, change);
    }

    /// Output of a commodity nobody can produce yet is not worth showing.
    fn is_hidden(&self, _scope: CountryId, game: &Game) -> bool {
        !game.is_commodity_enabled(self.commodity)
    }

    fn is_percent(&self) -> bool {
        true
    }

    fn base_string(&self, db: &Database) -> String {
        format!("{} Output", db.commodities.get(self.commodity).name())
    }
}

struct FreeBuildingClassEffect {
    key: String,
    building_class: BuildingClassId,
    value: Fixed,
}

impl ModifierEffect<CountryId> for FreeBuildingClassEffect {
    fn identifier(&self) -> String {
        self.key.clone()
    }

    fn value(&self) -> Fixed {
        self.value
    }

    fn apply(&self, scope: CountryId, game: &mut Game, multiplier: Fixed) {
        let change = self.value.mul_to_int(multiplier, Rounding::TowardZero);
        game.change_free_building_class(scope, self.building_class, change);
    }

    fn base_string(&self, db: &Database) -> String {
        format!("Free {}", db.building_classes.get(self.building_class).name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::Modifier;
    use crate::testing::{database_from_text, GameBuilder};

    const CONTENT: &[(&str, &str)] = &[
        ("commodities", "grain = { } iron = { enabled = no }"),
        ("building_classes", "farm = { }"),
    ];

    fn modifier(text: &str, db: &Database) -> Modifier<CountryId> {
        let root = gsml::parse_str(text).unwrap();
        Modifier::from_gsml(root.get_child("modifier").unwrap(), db).unwrap()
    }

    #[test]
    fn test_keyed_effects_clear_on_remove() {
        let db = database_from_text(CONTENT);
        let grain = db.commodities.get_id("grain").unwrap();
        let farm = db.building_classes.get_id("farm").unwrap();
        let modifier = modifier("modifier = { grain_output_modifier = 25 free_farm = 2 }", &db);

        let mut game = GameBuilder::new(db).with_country("ALPHA").build();
        let alpha = game.find_country("ALPHA").unwrap();

        modifier.apply(alpha, &mut game, Fixed::ONE);
        assert_eq!(game.country(alpha).commodity_output_modifier(grain), 25);
        assert_eq!(game.country(alpha).free_building_count(farm), 2);

        modifier.remove(alpha, &mut game, Fixed::ONE);
        assert!(game.country(alpha).commodity_output_modifiers().is_empty());
        assert!(game.country(alpha).free_building_classes().is_empty());
    }

    #[test]
    fn test_disabled_commodity_is_hidden() {
        let db = database_from_text(CONTENT);
        let iron = db.commodities.get_id("iron").unwrap();
        let modifier = modifier(
            "modifier = { grain_output_modifier = 10 iron_output_modifier = 10 }",
            &db,
        );
        let mut game = GameBuilder::new(db).with_country("ALPHA").build();
        let alpha = game.find_country("ALPHA").unwrap();

        assert_eq!(modifier.get_string(alpha, &game, Fixed::ONE, 0), "Grain Output: +10%");
        game.enable_commodity(iron);
        assert_eq!(
            modifier.get_string(alpha, &game, Fixed::ONE, 0),
            "Grain Output: +10%\nIron Output: +10%"
        );
    }

    #[test]
    fn test_unknown_commodity_is_unknown_effect() {
        let db = database_from_text(CONTENT);
        let root = gsml::parse_str("modifier = { salt_output_modifier = 10 }").unwrap();
        let err = Modifier::<CountryId>::from_gsml(root.get_child("modifier").unwrap(), &db)
            .err()
            .unwrap();
        assert!(matches!(err, ScriptError::UnknownModifierEffect { .. }));
    }
}
