use super::registry::{entry_id, DataEntry, Registry};
use super::technology::TechnologyId;
use super::{display_name, parse_name_only, unexpected_entry, Database};
use crate::condition::{AndCondition, Condition};
use crate::context::ReadOnlyContext;
use crate::error::ScriptError;
use crate::game::Game;
use crate::modifier::Modifier;
use crate::scope::CountryId;
use gsml::{Entry, GsmlData};

entry_id!(LawGroupId);
entry_id!(LawId);

pub struct LawGroup {
    identifier: String,
    name: String,
}

impl DataEntry for LawGroup {
    type Id = LawGroupId;
    const CATEGORY: &'static str = "law_groups";

    fn from_gsml(identifier: &str, block: &GsmlData, _db: &Database) -> Result<Self, ScriptError> {
        Ok(LawGroup {
            identifier: identifier.to_string(),
            name: parse_name_only(identifier, block)?,
        })
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn registry(db: &Database) -> &Registry<Self> {
        &db.law_groups
    }
}

pub struct Law {
    identifier: String,
    name: String,
    group: LawGroupId,
    required_technology: Option<TechnologyId>,
    conditions: Option<AndCondition<CountryId>>,
    modifier: Option<Modifier<CountryId>>,
}

impl Law {
    pub fn group(&self) -> LawGroupId {
        self.group
    }

    pub fn required_technology(&self) -> Option<TechnologyId> {
        self.required_technology
    }

    pub fn conditions(&self) -> Option<&AndCondition<CountryId>> {
        self.conditions.as_ref()
    }

    pub fn modifier(&self) -> Option<&Modifier<CountryId>> {
        self.modifier.as_ref()
    }

    /// Whether `country` may enact this law: it knows the required
    /// technology and passes the law's conditions.
    pub fn is_available_for(&self, country: CountryId, game: &Game) -> bool {
        if let Some(technology) = self.required_technology {
            if !game.country(country).has_technology(technology) {
                return false;
            }
        }
        match &self.conditions {
            Some(conditions) => {
                let ctx = ReadOnlyContext::with_source(country);
                conditions.check(country, game, &ctx)
            }
            None => true,
        }
    }
}

impl DataEntry for Law {
    type Id = LawId;
    const CATEGORY: &'static str = "laws";

    fn from_gsml(identifier: &str, block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let mut name = display_name(identifier);
        let mut group = None;
        let mut required_technology = None;
        let mut conditions = None;
        let mut modifier = None;

        for entry in block.entries() {
            match entry {
                Entry::Property(p) if p.key == "name" => name = p.value.clone(),
                Entry::Property(p) if p.key == "group" => {
                    group = Some(db.law_groups.get_id(&p.value)?);
                }
                Entry::Property(p) if p.key == "required_technology" => {
                    required_technology = Some(db.technologies.get_id(&p.value)?);
                }
                Entry::Child(c) if c.tag() == Some("conditions") => {
                    conditions = Some(AndCondition::from_gsml(c, db)?);
                }
                Entry::Child(c) if c.tag() == Some("modifier") => {
                    modifier = Some(Modifier::from_gsml(c, db)?);
                }
                other => return Err(unexpected_entry(other)),
            }
        }

        let group = group.ok_or_else(|| ScriptError::MissingField {
            context: identifier.to_string(),
            field: "group",
        })?;

        Ok(Law {
            identifier: identifier.to_string(),
            name,
            group,
            required_technology,
            conditions,
            modifier,
        })
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn registry(db: &Database) -> &Registry<Self> {
        &db.laws
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        let Some(modifier) = &self.modifier else {
            return Err(ScriptError::Invalid {
                category: Self::CATEGORY,
                identifier: self.identifier.clone(),
                reason: "law has no modifier".to_string(),
            });
        };
        modifier.check_validity(db)?;
        if let Some(conditions) = &self.conditions {
            conditions.check_validity(db)?;
        }
        Ok(())
    }
}
