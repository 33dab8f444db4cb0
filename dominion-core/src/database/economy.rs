//! Commodities, building classes and site resources.

use super::registry::{entry_id, DataEntry, Registry};
use super::{display_name, parse_bool, parse_name_only, unexpected_entry, Database};
use crate::error::ScriptError;
use crate::modifier::Modifier;
use crate::scope::SiteId;
use gsml::{Entry, GsmlData};

entry_id!(CommodityId);
entry_id!(BuildingClassId);
entry_id!(ResourceId);

pub struct Commodity {
    identifier: String,
    name: String,
    enabled: bool,
}

impl Commodity {
    /// Whether the commodity may be enabled at game start. Commodities that a
    /// technology enables start disabled regardless.
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl DataEntry for Commodity {
    type Id = CommodityId;
    const CATEGORY: &'static str = "commodities";

    fn from_gsml(identifier: &str, block: &GsmlData, _db: &Database) -> Result<Self, ScriptError> {
        let mut name = display_name(identifier);
        let mut enabled = true;
        for entry in block.entries() {
            match entry {
                Entry::Property(p) if p.key == "name" => name = p.value.clone(),
                Entry::Property(p) if p.key == "enabled" => enabled = parse_bool(p)?,
                other => return Err(unexpected_entry(other)),
            }
        }
        Ok(Commodity {
            identifier: identifier.to_string(),
            name,
            enabled,
        })
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn registry(db: &Database) -> &Registry<Self> {
        &db.commodities
    }
}

pub struct BuildingClass {
    identifier: String,
    name: String,
}

impl DataEntry for BuildingClass {
    type Id = BuildingClassId;
    const CATEGORY: &'static str = "building_classes";

    fn from_gsml(identifier: &str, block: &GsmlData, _db: &Database) -> Result<Self, ScriptError> {
        Ok(BuildingClass {
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
        &db.building_classes
    }
}

pub struct Resource {
    identifier: String,
    name: String,
    commodity: Option<CommodityId>,
    /// Applied to sites holding this resource.
    site_modifier: Option<Modifier<SiteId>>,
}

impl Resource {
    pub fn commodity(&self) -> Option<CommodityId> {
        self.commodity
    }

    pub fn site_modifier(&self) -> Option<&Modifier<SiteId>> {
        self.site_modifier.as_ref()
    }
}

impl DataEntry for Resource {
    type Id = ResourceId;
    const CATEGORY: &'static str = "resources";

    fn from_gsml(identifier: &str, block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let mut name = display_name(identifier);
        let mut commodity = None;
        let mut site_modifier = None;
        for entry in block.entries() {
            match entry {
                Entry::Property(p) if p.key == "name" => name = p.value.clone(),
                Entry::Property(p) if p.key == "commodity" => {
                    commodity = Some(db.commodities.get_id(&p.value)?);
                }
                Entry::Child(c) if c.tag() == Some("site_modifier") => {
                    site_modifier = Some(Modifier::from_gsml(c, db)?);
                }
                other => return Err(unexpected_entry(other)),
            }
        }
        Ok(Resource {
            identifier: identifier.to_string(),
            name,
            commodity,
            site_modifier,
        })
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn registry(db: &Database) -> &Registry<Self> {
        &db.resources
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        match &self.site_modifier {
            Some(modifier) => modifier.check_validity(db),
            None => Ok(()),
        }
    }
}
