use super::economy::CommodityId;
use super::registry::{entry_id, DataEntry, Registry};
use super::{display_name, parse_int, unexpected_entry, Database};
use crate::error::ScriptError;
use crate::modifier::Modifier;
use crate::scope::CountryId;
use gsml::{Entry, GsmlData};

entry_id!(TechnologyId);

pub struct Technology {
    identifier: String,
    name: String,
    /// Overrides the default base cost from the defines.
    cost: Option<i64>,
    prerequisites: Vec<TechnologyId>,
    modifier: Option<Modifier<CountryId>>,
    enabled_commodities: Vec<CommodityId>,
}

impl Technology {
    pub fn cost(&self) -> Option<i64> {
        self.cost
    }

    pub fn prerequisites(&self) -> &[TechnologyId] {
        &self.prerequisites
    }

    pub fn modifier(&self) -> Option<&Modifier<CountryId>> {
        self.modifier.as_ref()
    }

    pub fn enabled_commodities(&self) -> &[CommodityId] {
        &self.enabled_commodities
    }
}

impl DataEntry for Technology {
    type Id = TechnologyId;
    const CATEGORY: &'static str = "technologies";

    fn from_gsml(identifier: &str, block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let mut technology = Technology {
            identifier: identifier.to_string(),
            name: display_name(identifier),
            cost: None,
            prerequisites: Vec::new(),
            modifier: None,
            enabled_commodities: Vec::new(),
        };

        for entry in block.entries() {
            match entry {
                Entry::Property(p) if p.key == "name" => technology.name = p.value.clone(),
                Entry::Property(p) if p.key == "cost" => technology.cost = Some(parse_int(p)?),
                Entry::Child(c) if c.tag() == Some("prerequisites") => {
                    for value in c.values() {
                        technology.prerequisites.push(db.technologies.get_id(value)?);
                    }
                }
                Entry::Child(c) if c.tag() == Some("enabled_commodities") => {
                    for value in c.values() {
                        technology
                            .enabled_commodities
                            .push(db.commodities.get_id(value)?);
                    }
                }
                Entry::Child(c) if c.tag() == Some("modifier") => {
                    technology.modifier = Some(Modifier::from_gsml(c, db)?);
                }
                other => return Err(unexpected_entry(other)),
            }
        }

        Ok(technology)
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn registry(db: &Database) -> &Registry<Self> {
        &db.technologies
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        if let Some(cost) = self.cost {
            if cost < 0 {
                return Err(ScriptError::Invalid {
                    category: Self::CATEGORY,
                    identifier: self.identifier.clone(),
                    reason: format!("negative cost {}", cost),
                });
            }
        }
        if let Some(modifier) = &self.modifier {
            modifier.check_validity(db)?;
        }
        Ok(())
    }
}

/// Fails if the prerequisite graph has a cycle.
pub(crate) fn check_prerequisite_cycles(db: &Database) -> Result<(), ScriptError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    fn visit(
        id: TechnologyId,
        db: &Database,
        marks: &mut [Mark],
    ) -> Result<(), ScriptError> {
        match marks[id.0 as usize] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                return Err(ScriptError::Invalid {
                    category: Technology::CATEGORY,
                    identifier: db.technologies.identifier(id).to_string(),
                    reason: "prerequisites form a cycle".to_string(),
                });
            }
            Mark::Unvisited => {}
        }
        marks[id.0 as usize] = Mark::InProgress;
        for prerequisite in db.technologies.get(id).prerequisites() {
            visit(*prerequisite, db, marks)?;
        }
        marks[id.0 as usize] = Mark::Done;
        Ok(())
    }

    let mut marks = vec![Mark::Unvisited; db.technologies.len()];
    for id in db.technologies.ids() {
        visit(id, db, &mut marks)?;
    }
    Ok(())
}
