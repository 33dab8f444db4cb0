use super::registry::{entry_id, DataEntry, Registry};
use super::{display_name, unexpected_entry, Database};
use crate::error::ScriptError;
use crate::modifier::Modifier;
use crate::scope::CountryId;
use gsml::{Entry, GsmlData};

entry_id!(IdeaId);

pub struct Idea {
    identifier: String,
    name: String,
    modifier: Option<Modifier<CountryId>>,
}

impl Idea {
    pub fn modifier(&self) -> Option<&Modifier<CountryId>> {
        self.modifier.as_ref()
    }
}

impl DataEntry for Idea {
    type Id = IdeaId;
    const CATEGORY: &'static str = "ideas";

    fn from_gsml(identifier: &str, block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let mut name = display_name(identifier);
        let mut modifier = None;
        for entry in block.entries() {
            match entry {
                Entry::Property(p) if p.key == "name" => name = p.value.clone(),
                Entry::Child(c) if c.tag() == Some("modifier") => {
                    modifier = Some(Modifier::from_gsml(c, db)?);
                }
                other => return Err(unexpected_entry(other)),
            }
        }
        Ok(Idea {
            identifier: identifier.to_string(),
            name,
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
        &db.ideas
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        match &self.modifier {
            Some(modifier) => modifier.check_validity(db),
            None => Ok(()),
        }
    }
}
