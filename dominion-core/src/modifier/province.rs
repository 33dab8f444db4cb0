use super::{ModifierEffectTable, StatModifierEffect};
use crate::game::Game;
use crate::scope::ProvinceId;

pub(crate) fn modifier_effect_table() -> ModifierEffectTable<ProvinceId> {
    let mut table = ModifierEffectTable::new();
    table.register("population_capacity_modifier", |value, _| {
        Ok(Box::new(
            StatModifierEffect::new(
                "population_capacity_modifier",
                "Population Capacity",
                value,
                Game::change_population_capacity_modifier,
            )
            .percent(),
        ))
    });
    table
}
