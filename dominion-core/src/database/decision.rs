use super::registry::{entry_id, DataEntry, Registry};
use super::{display_name, unexpected_entry, Database};
use crate::condition::{AndCondition, Condition};
use crate::effect::{Effect, EffectList};
use crate::error::ScriptError;
use crate::scope::CountryId;
use gsml::{Entry, GsmlData};

entry_id!(DecisionId);

/// A scripted country action: conditions gate it, effects carry it out.
pub struct Decision {
    identifier: String,
    name: String,
    conditions: Option<AndCondition<CountryId>>,
    effects: EffectList<CountryId>,
}

impl Decision {
    pub fn conditions(&self) -> Option<&AndCondition<CountryId>> {
        self.conditions.as_ref()
    }

    pub fn effects(&self) -> &EffectList<CountryId> {
        &self.effects
    }
}

impl DataEntry for Decision {
    type Id = DecisionId;
    const CATEGORY: &'static str = "decisions";

    fn from_gsml(identifier: &str, block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let mut name = display_name(identifier);
        let mut conditions = None;
        let mut effects = None;
        for entry in block.entries() {
            match entry {
                Entry::Property(p) if p.key == "name" => name = p.value.clone(),
                Entry::Child(c) if c.tag() == Some("conditions") => {
                    conditions = Some(AndCondition::from_gsml(c, db)?);
                }
                Entry::Child(c) if c.tag() == Some("effects") => {
                    effects = Some(EffectList::from_gsml(c, db)?);
                }
                other => return Err(unexpected_entry(other)),
            }
        }
        let effects = effects.ok_or_else(|| ScriptError::MissingField {
            context: identifier.to_string(),
            field: "effects",
        })?;
        Ok(Decision {
            identifier: identifier.to_string(),
            name,
            conditions,
            effects,
        })
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn registry(db: &Database) -> &Registry<Self> {
        &db.decisions
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        if let Some(conditions) = &self.conditions {
            conditions.check_validity(db)?;
        }
        self.effects.check_validity(db)
    }
}
