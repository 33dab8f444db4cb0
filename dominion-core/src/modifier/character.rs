use super::{ModifierEffectTable, StatModifierEffect};
use crate::game::{CharacterSkill, Game};
use crate::scope::CharacterId;

pub(crate) fn modifier_effect_table() -> ModifierEffectTable<CharacterId> {
    let mut table = ModifierEffectTable::new();
    table.register("military_skill_modifier", |value, _| {
        Ok(Box::new(StatModifierEffect::new(
            "military_skill_modifier",
            "Military Skill",
            value,
            |game: &mut Game, character, change| {
                game.change_skill_modifier(character, CharacterSkill::Military, change)
            },
        )))
    });
    table.register("diplomacy_skill_modifier", |value, _| {
        Ok(Box::new(StatModifierEffect::new(
            "diplomacy_skill_modifier",
            "Diplomacy Skill",
            value,
            |game: &mut Game, character, change| {
                game.change_skill_modifier(character, CharacterSkill::Diplomacy, change)
            },
        )))
    });
    table.register("administration_skill_modifier", |value, _| {
        Ok(Box::new(StatModifierEffect::new(
            "administration_skill_modifier",
            "Administration Skill",
            value,
            |game: &mut Game, character, change| {
                game.change_skill_modifier(character, CharacterSkill::Administration, change)
            },
        )))
    });
    table
}
