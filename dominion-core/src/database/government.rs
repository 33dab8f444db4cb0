use super::registry::{entry_id, DataEntry, Registry};
use super::{display_name, parse_name_only, unexpected_entry, Database};
use crate::error::ScriptError;
use crate::modifier::Modifier;
use crate::scope::CountryId;
use gsml::{Entry, GsmlData};

entry_id!(GovernmentGroupId);
entry_id!(GovernmentTypeId);

pub struct GovernmentGroup {
    identifier: String,
    name: String,
}

impl DataEntry for GovernmentGroup {
    type Id = GovernmentGroupId;
    const CATEGORY: &'static str = "government_groups";

    fn from_gsml(identifier: &str, block: &GsmlData, _db: &Database) -> Result<Self, ScriptError> {
        Ok(GovernmentGroup {
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
        &db.government_groups
    }
}

pub struct GovernmentType {
    identifier: String,
    name: String,
    group: GovernmentGroupId,
    modifier: Option<Modifier<CountryId>>,
}

impl GovernmentType {
    pub fn group(&self) -> GovernmentGroupId {
        self.group
    }

    pub fn modifier(&self) -> Option<&Modifier<CountryId>> {
        self.modifier.as_ref()
    }
}

impl DataEntry for GovernmentType {
    type Id = GovernmentTypeId;
    const CATEGORY: &'static str = "government_types";

    fn from_gsml(identifier: &str, block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let mut name = display_name(identifier);
        let mut group = None;
        let mut modifier = None;

        for entry in block.entries() {
            match entry {
                Entry::Property(p) if p.key == "name" => name = p.value.clone(),
                Entry::Property(p) if p.key == "group" => {
                    group = Some(db.government_groups.get_id(&p.value)?);
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

        Ok(GovernmentType {
            identifier: identifier.to_string(),
            name,
            group,
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
        &db.government_types
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        match &self.modifier {
            Some(modifier) => modifier.check_validity(db),
            None => Ok(()),
        }
    }
}
