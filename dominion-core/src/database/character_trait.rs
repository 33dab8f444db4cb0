use super::registry::{entry_id, DataEntry, Registry};
use super::{display_name, unexpected_entry, Database};
use crate::condition::{AndCondition, Condition};
use crate::error::ScriptError;
use crate::modifier::Modifier;
use crate::scope::{CharacterId, MilitaryUnitId};
use gsml::{Entry, GsmlData};

entry_id!(CharacterTraitId);

pub struct CharacterTrait {
    identifier: String,
    name: String,
    modifier: Option<Modifier<CharacterId>>,
    /// Applied to every military unit the character commands.
    military_unit_modifier: Option<Modifier<MilitaryUnitId>>,
    /// Which characters may gain the trait.
    conditions: Option<AndCondition<CharacterId>>,
}

impl CharacterTrait {
    pub fn modifier(&self) -> Option<&Modifier<CharacterId>> {
        self.modifier.as_ref()
    }

    pub fn military_unit_modifier(&self) -> Option<&Modifier<MilitaryUnitId>> {
        self.military_unit_modifier.as_ref()
    }

    pub fn conditions(&self) -> Option<&AndCondition<CharacterId>> {
        self.conditions.as_ref()
    }
}

impl DataEntry for CharacterTrait {
    type Id = CharacterTraitId;
    const CATEGORY: &'static str = "character_traits";

    fn from_gsml(identifier: &str, block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let mut character_trait = CharacterTrait {
            identifier: identifier.to_string(),
            name: display_name(identifier),
            modifier: None,
            military_unit_modifier: None,
            conditions: None,
        };
        for entry in block.entries() {
            match entry {
                Entry::Property(p) if p.key == "name" => character_trait.name = p.value.clone(),
                Entry::Child(c) if c.tag() == Some("modifier") => {
                    character_trait.modifier = Some(Modifier::from_gsml(c, db)?);
                }
                Entry::Child(c) if c.tag() == Some("military_unit_modifier") => {
                    character_trait.military_unit_modifier = Some(Modifier::from_gsml(c, db)?);
                }
                Entry::Child(c) if c.tag() == Some("conditions") => {
                    character_trait.conditions = Some(AndCondition::from_gsml(c, db)?);
                }
                other => return Err(unexpected_entry(other)),
            }
        }
        Ok(character_trait)
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn registry(db: &Database) -> &Registry<Self> {
        &db.character_traits
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        if let Some(modifier) = &self.modifier {
            modifier.check_validity(db)?;
        }
        if let Some(modifier) = &self.military_unit_modifier {
            modifier.check_validity(db)?;
        }
        if let Some(conditions) = &self.conditions {
            conditions.check_validity(db)?;
        }
        Ok(())
    }
}
