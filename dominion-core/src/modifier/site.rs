use super::{ModifierEffectTable, StatModifierEffect};
use crate::game::Game;
use crate::scope::SiteId;

pub(crate) fn modifier_effect_table() -> ModifierEffectTable<SiteId> {
    let mut table = ModifierEffectTable::new();
    table.register("output_modifier", |value, _| {
        Ok(Box::new(
            StatModifierEffect::new(
                "output_modifier",
                "Output",
                value,
                Game::change_site_output_modifier,
            )
            .percent(),
        ))
    });
    table
}
