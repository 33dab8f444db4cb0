use super::{change_keyed_value, Game, ModifierOwner};
use crate::database::CharacterTraitId;
use crate::scope::{CharacterId, CountryId, MilitaryUnitId, ProvinceId};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CharacterSkill {
    Military,
    Diplomacy,
    Administration,
}

impl CharacterSkill {
    pub const ALL: [CharacterSkill; 3] = [
        CharacterSkill::Military,
        CharacterSkill::Diplomacy,
        CharacterSkill::Administration,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            CharacterSkill::Military => "military",
            CharacterSkill::Diplomacy => "diplomacy",
            CharacterSkill::Administration => "administration",
        }
    }
}

impl fmt::Display for CharacterSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CharacterSkill::Military => "Military",
            CharacterSkill::Diplomacy => "Diplomacy",
            CharacterSkill::Administration => "Administration",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Character {
    identifier: String,
    pub(crate) country: Option<CountryId>,
    pub(crate) location: Option<ProvinceId>,
    pub(crate) traits: BTreeSet<CharacterTraitId>,
    pub(crate) base_skills: [i64; 3],
    pub(crate) skill_modifiers: FxHashMap<CharacterSkill, i64>,
    pub(crate) commanded_units: Vec<MilitaryUnitId>,
}

impl Character {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The country employing the character.
    pub fn country(&self) -> Option<CountryId> {
        self.country
    }

    pub fn location(&self) -> Option<ProvinceId> {
        self.location
    }

    pub fn has_trait(&self, character_trait: CharacterTraitId) -> bool {
        self.traits.contains(&character_trait)
    }

    pub fn traits(&self) -> &BTreeSet<CharacterTraitId> {
        &self.traits
    }

    pub fn base_skill(&self, skill: CharacterSkill) -> i64 {
        self.base_skills[skill as usize]
    }

    pub fn skill_modifier(&self, skill: CharacterSkill) -> i64 {
        self.skill_modifiers.get(&skill).copied().unwrap_or(0)
    }

    /// Base skill plus modifiers, never below zero.
    pub fn skill(&self, skill: CharacterSkill) -> i64 {
        (self.base_skill(skill) + self.skill_modifier(skill)).max(0)
    }

    pub fn commanded_units(&self) -> &[MilitaryUnitId] {
        &self.commanded_units
    }
}

impl Game {
    pub fn add_character(&mut self, identifier: &str, country: Option<CountryId>) -> CharacterId {
        let id = CharacterId(self.characters.len() as u32);
        self.characters.push(Character {
            identifier: identifier.to_string(),
            country,
            location: None,
            traits: BTreeSet::new(),
            base_skills: [0; 3],
            skill_modifiers: FxHashMap::default(),
            commanded_units: Vec::new(),
        });
        id
    }

    /// Whether the character rules the country employing them.
    pub fn is_ruler(&self, character: CharacterId) -> bool {
        self.character(character)
            .country
            .is_some_and(|country| self.country(country).ruler == Some(character))
    }

    pub fn set_character_country(&mut self, character: CharacterId, country: Option<CountryId>) {
        self.character_mut(character).country = country;
    }

    pub fn set_character_location(&mut self, character: CharacterId, location: Option<ProvinceId>) {
        self.character_mut(character).location = location;
    }

    pub fn set_base_skill(&mut self, character: CharacterId, skill: CharacterSkill, value: i64) {
        self.character_mut(character).base_skills[skill as usize] = value;
    }

    pub fn change_base_skill(&mut self, character: CharacterId, skill: CharacterSkill, change: i64) {
        let base = &mut self.character_mut(character).base_skills[skill as usize];
        *base = (*base + change).max(0);
    }

    pub(crate) fn change_skill_modifier(
        &mut self,
        character: CharacterId,
        skill: CharacterSkill,
        change: i64,
    ) {
        change_keyed_value(
            &mut self.character_mut(character).skill_modifiers,
            skill,
            change,
        );
    }

    /// Grants a trait. Its modifier applies to the character, and its
    /// military unit modifier to every unit the character commands.
    #[tracing::instrument(skip_all, name = "add_trait")]
    pub fn add_trait(&mut self, character: CharacterId, character_trait: CharacterTraitId) -> bool {
        if !self.character_mut(character).traits.insert(character_trait) {
            return false;
        }
        let db = self.shared_database();
        let entry = db.character_traits.get(character_trait);
        self.activate_modifier(ModifierOwner::Trait(character_trait), character, entry.modifier());
        for unit in self.character(character).commanded_units.clone() {
            self.activate_modifier(
                ModifierOwner::CommanderTrait(character_trait),
                unit,
                entry.military_unit_modifier(),
            );
        }
        log::debug!(
            "{} gained trait {}",
            self.character(character).identifier(),
            db.character_traits.identifier(character_trait)
        );
        true
    }

    #[tracing::instrument(skip_all, name = "remove_trait")]
    pub fn remove_trait(&mut self, character: CharacterId, character_trait: CharacterTraitId) -> bool {
        if !self.character_mut(character).traits.remove(&character_trait) {
            return false;
        }
        let db = self.shared_database();
        let entry = db.character_traits.get(character_trait);
        self.deactivate_modifier(ModifierOwner::Trait(character_trait), character, entry.modifier());
        for unit in self.character(character).commanded_units.clone() {
            self.deactivate_modifier(
                ModifierOwner::CommanderTrait(character_trait),
                unit,
                entry.military_unit_modifier(),
            );
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_never_negative() {
        let mut character = Character {
            identifier: "alda".to_string(),
            country: None,
            location: None,
            traits: BTreeSet::new(),
            base_skills: [3, 0, 0],
            skill_modifiers: FxHashMap::default(),
            commanded_units: Vec::new(),
        };
        assert_eq!(character.skill(CharacterSkill::Military), 3);
        character.skill_modifiers.insert(CharacterSkill::Military, -5);
        assert_eq!(character.skill(CharacterSkill::Military), 0);
        assert_eq!(character.skill_modifier(CharacterSkill::Military), -5);
    }
}
