//! Cultures, religions, population types and ideologies.

use super::registry::{entry_id, DataEntry, Registry};
use super::{display_name, parse_name_only, unexpected_entry, Database};
use crate::error::ScriptError;
use crate::modifier::Modifier;
use crate::scope::{PopulationUnitId, ProvinceId};
use gsml::{Entry, GsmlData};

entry_id!(CulturalGroupId);
entry_id!(CultureId);
entry_id!(ReligionId);
entry_id!(PopulationTypeId);
entry_id!(IdeologyId);

pub struct CulturalGroup {
    identifier: String,
    name: String,
}

impl DataEntry for CulturalGroup {
    type Id = CulturalGroupId;
    const CATEGORY: &'static str = "cultural_groups";

    fn from_gsml(identifier: &str, block: &GsmlData, _db: &Database) -> Result<Self, ScriptError> {
        Ok(CulturalGroup {
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
        &db.cultural_groups
    }
}

pub struct Culture {
    identifier: String,
    name: String,
    group: CulturalGroupId,
}

impl Culture {
    pub fn group(&self) -> CulturalGroupId {
        self.group
    }
}

impl DataEntry for Culture {
    type Id = CultureId;
    const CATEGORY: &'static str = "cultures";

    fn from_gsml(identifier: &str, block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let mut name = display_name(identifier);
        let mut group = None;
        for entry in block.entries() {
            match entry {
                Entry::Property(p) if p.key == "name" => name = p.value.clone(),
                Entry::Property(p) if p.key == "group" => {
                    group = Some(db.cultural_groups.get_id(&p.value)?);
                }
                other => return Err(unexpected_entry(other)),
            }
        }
        let group = group.ok_or_else(|| ScriptError::MissingField {
            context: identifier.to_string(),
            field: "group",
        })?;
        Ok(Culture {
            identifier: identifier.to_string(),
            name,
            group,
        })
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn registry(db: &Database) -> &Registry<Self> {
        &db.cultures
    }
}

pub struct Religion {
    identifier: String,
    name: String,
    /// Applied to provinces following this religion.
    province_modifier: Option<Modifier<ProvinceId>>,
}

impl Religion {
    pub fn province_modifier(&self) -> Option<&Modifier<ProvinceId>> {
        self.province_modifier.as_ref()
    }
}

impl DataEntry for Religion {
    type Id = ReligionId;
    const CATEGORY: &'static str = "religions";

    fn from_gsml(identifier: &str, block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let mut name = display_name(identifier);
        let mut province_modifier = None;
        for entry in block.entries() {
            match entry {
                Entry::Property(p) if p.key == "name" => name = p.value.clone(),
                Entry::Child(c) if c.tag() == Some("province_modifier") => {
                    province_modifier = Some(Modifier::from_gsml(c, db)?);
                }
                other => return Err(unexpected_entry(other)),
            }
        }
        Ok(Religion {
            identifier: identifier.to_string(),
            name,
            province_modifier,
        })
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn registry(db: &Database) -> &Registry<Self> {
        &db.religions
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        match &self.province_modifier {
            Some(modifier) => modifier.check_validity(db),
            None => Ok(()),
        }
    }
}

/// Population types and ideologies share a shape: a name and a modifier
/// applied to each population unit that has them.
macro_rules! population_unit_attribute {
    ($name:ident, $id:ident, $category:literal, $field:ident) => {
        pub struct $name {
            identifier: String,
            name: String,
            modifier: Option<Modifier<PopulationUnitId>>,
        }

        impl $name {
            pub fn modifier(&self) -> Option<&Modifier<PopulationUnitId>> {
                self.modifier.as_ref()
            }
        }

        impl DataEntry for $name {
            type Id = $id;
            const CATEGORY: &'static str = $category;

            fn from_gsml(
                identifier: &str,
                block: &GsmlData,
                db: &Database,
            ) -> Result<Self, ScriptError> {
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
                Ok($name {
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
                &db.$field
            }

            fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
                match &self.modifier {
                    Some(modifier) => modifier.check_validity(db),
                    None => Ok(()),
                }
            }
        }
    };
}

population_unit_attribute!(PopulationType, PopulationTypeId, "population_types", population_types);
population_unit_attribute!(Ideology, IdeologyId, "ideologies", ideologies);
