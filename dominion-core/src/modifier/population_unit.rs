use super::{ModifierEffectTable, StatModifierEffect};
use crate::game::Game;
use crate::scope::PopulationUnitId;

pub(crate) fn modifier_effect_table() -> ModifierEffectTable<PopulationUnitId> {
    let mut table = ModifierEffectTable::new();
    table.register("consumption_modifier", |value, _| {
        Ok(Box::new(
            StatModifierEffect::new(
                "consumption_modifier",
                "Consumption",
                value,
                Game::change_consumption_modifier,
            )
            .percent(),
        ))
    });
    table
}
