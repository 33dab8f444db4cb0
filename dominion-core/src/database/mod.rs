//! Static game data: identifier registries for every content category.
//!
//! The database is loaded once at startup, validated as a whole and then
//! shared read-only (behind an `Arc`) for the lifetime of the process.

pub mod character_trait;
pub mod decision;
pub mod economy;
pub mod government;
pub mod idea;
pub mod law;
pub mod population;
pub mod registry;
pub mod technology;
pub mod tier;

pub use character_trait::{CharacterTrait, CharacterTraitId};
pub use decision::{Decision, DecisionId};
pub use economy::{BuildingClass, BuildingClassId, Commodity, CommodityId, Resource, ResourceId};
pub use government::{GovernmentGroup, GovernmentGroupId, GovernmentType, GovernmentTypeId};
pub use idea::{Idea, IdeaId};
pub use law::{Law, LawGroup, LawGroupId, LawId};
pub use population::{
    CulturalGroup, CulturalGroupId, Culture, CultureId, Ideology, IdeologyId, PopulationType,
    PopulationTypeId, Religion, ReligionId,
};
pub use registry::{DataEntry, EntryId, Registry};
pub use technology::{Technology, TechnologyId};
pub use tier::{DomainTier, TierTable};

use crate::config::GameDefines;
use crate::error::ScriptError;
use anyhow::{bail, Context as _, Result};
use gsml::{Entry, GsmlData, GsmlElement, GsmlOperator, GsmlProperty};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Parsed content, keyed by category. Each value is a root block whose
/// children are the category's entries.
pub type ContentBlocks = BTreeMap<String, GsmlData>;

#[derive(Default)]
pub struct Database {
    defines: GameDefines,
    pub technologies: Registry<Technology>,
    pub government_groups: Registry<GovernmentGroup>,
    pub government_types: Registry<GovernmentType>,
    pub law_groups: Registry<LawGroup>,
    pub laws: Registry<Law>,
    pub cultural_groups: Registry<CulturalGroup>,
    pub cultures: Registry<Culture>,
    pub religions: Registry<Religion>,
    pub population_types: Registry<PopulationType>,
    pub ideologies: Registry<Ideology>,
    pub commodities: Registry<Commodity>,
    pub building_classes: Registry<BuildingClass>,
    pub resources: Registry<Resource>,
    pub character_traits: Registry<CharacterTrait>,
    pub ideas: Registry<Idea>,
    pub decisions: Registry<Decision>,
    pub tiers: TierTable,
}

/// Content subdirectories, in no particular order: declaration makes load
/// order irrelevant.
pub const CATEGORIES: [&str; 17] = [
    Technology::CATEGORY,
    GovernmentGroup::CATEGORY,
    GovernmentType::CATEGORY,
    LawGroup::CATEGORY,
    Law::CATEGORY,
    CulturalGroup::CATEGORY,
    Culture::CATEGORY,
    Religion::CATEGORY,
    PopulationType::CATEGORY,
    Ideology::CATEGORY,
    Commodity::CATEGORY,
    BuildingClass::CATEGORY,
    Resource::CATEGORY,
    CharacterTrait::CATEGORY,
    Idea::CATEGORY,
    Decision::CATEGORY,
    TierTable::CATEGORY,
];

fn declare_category<T: DataEntry>(
    registry: &mut Registry<T>,
    content: &ContentBlocks,
) -> Result<(), ScriptError> {
    let identifiers = match content.get(T::CATEGORY) {
        Some(root) => entry_blocks::<T>(root)?
            .into_keys()
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };
    registry.declare(identifiers)
}

fn entry_blocks<T: DataEntry>(root: &GsmlData) -> Result<FxHashMap<&str, &GsmlData>, ScriptError> {
    let mut blocks = FxHashMap::default();
    for entry in root.entries() {
        match entry {
            Entry::Child(block) => {
                let identifier = block.tag().ok_or_else(|| {
                    ScriptError::invalid_value(T::CATEGORY, "{ ... }", "entry has no identifier")
                })?;
                if blocks.insert(identifier, block).is_some() {
                    return Err(ScriptError::DuplicateIdentifier {
                        category: T::CATEGORY,
                        identifier: identifier.to_string(),
                    });
                }
            }
            other => return Err(unexpected_entry(other)),
        }
    }
    Ok(blocks)
}

fn build_category<T: DataEntry>(
    registry: &Registry<T>,
    content: &ContentBlocks,
    db: &Database,
) -> Result<Vec<T>, ScriptError> {
    let blocks = match content.get(T::CATEGORY) {
        Some(root) => entry_blocks::<T>(root)?,
        None => FxHashMap::default(),
    };
    registry.build_entries(&blocks, db)
}

impl Database {
    pub fn defines(&self) -> &GameDefines {
        &self.defines
    }

    /// Builds the database from parsed content.
    #[tracing::instrument(skip_all, name = "database_from_gsml")]
    pub fn from_gsml(defines: GameDefines, content: &ContentBlocks) -> Result<Self, ScriptError> {
        if let Some(unknown) = content.keys().find(|c| !CATEGORIES.contains(&c.as_str())) {
            return Err(ScriptError::UnknownIdentifier {
                category: "content category",
                identifier: unknown.clone(),
            });
        }

        let mut db = Database {
            defines,
            ..Default::default()
        };

        // Phase 1: every identifier becomes resolvable.
        declare_category(&mut db.technologies, content)?;
        declare_category(&mut db.government_groups, content)?;
        declare_category(&mut db.government_types, content)?;
        declare_category(&mut db.law_groups, content)?;
        declare_category(&mut db.laws, content)?;
        declare_category(&mut db.cultural_groups, content)?;
        declare_category(&mut db.cultures, content)?;
        declare_category(&mut db.religions, content)?;
        declare_category(&mut db.population_types, content)?;
        declare_category(&mut db.ideologies, content)?;
        declare_category(&mut db.commodities, content)?;
        declare_category(&mut db.building_classes, content)?;
        declare_category(&mut db.resources, content)?;
        declare_category(&mut db.character_traits, content)?;
        declare_category(&mut db.ideas, content)?;
        declare_category(&mut db.decisions, content)?;

        // Phase 2: build entries against the declared ids.
        let entries = build_category(&db.technologies, content, &db)?;
        db.technologies.define(entries);
        let entries = build_category(&db.government_groups, content, &db)?;
        db.government_groups.define(entries);
        let entries = build_category(&db.government_types, content, &db)?;
        db.government_types.define(entries);
        let entries = build_category(&db.law_groups, content, &db)?;
        db.law_groups.define(entries);
        let entries = build_category(&db.laws, content, &db)?;
        db.laws.define(entries);
        let entries = build_category(&db.cultural_groups, content, &db)?;
        db.cultural_groups.define(entries);
        let entries = build_category(&db.cultures, content, &db)?;
        db.cultures.define(entries);
        let entries = build_category(&db.religions, content, &db)?;
        db.religions.define(entries);
        let entries = build_category(&db.population_types, content, &db)?;
        db.population_types.define(entries);
        let entries = build_category(&db.ideologies, content, &db)?;
        db.ideologies.define(entries);
        let entries = build_category(&db.commodities, content, &db)?;
        db.commodities.define(entries);
        let entries = build_category(&db.building_classes, content, &db)?;
        db.building_classes.define(entries);
        let entries = build_category(&db.resources, content, &db)?;
        db.resources.define(entries);
        let entries = build_category(&db.character_traits, content, &db)?;
        db.character_traits.define(entries);
        let entries = build_category(&db.ideas, content, &db)?;
        db.ideas.define(entries);
        let entries = build_category(&db.decisions, content, &db)?;
        db.decisions.define(entries);
        db.tiers = TierTable::from_gsml(content.get(TierTable::CATEGORY), &db)?;

        db.check_validity()?;

        log::info!(
            "Loaded database: {} technologies, {} laws, {} government types, {} commodities",
            db.technologies.len(),
            db.laws.len(),
            db.government_types.len(),
            db.commodities.len()
        );
        Ok(db)
    }

    /// Loads `defines.txt` and every `*.txt` file in each category
    /// subdirectory of `path`. Files are parsed in parallel.
    #[tracing::instrument(skip_all, name = "load_database")]
    pub fn load_directory(path: &Path) -> Result<Self> {
        let defines_path = path.join("defines.txt");
        let defines = if defines_path.exists() {
            GameDefines::load(&defines_path)
                .with_context(|| format!("Failed to load {}", defines_path.display()))?
        } else {
            log::warn!("{} not found, using default defines", defines_path.display());
            GameDefines::default()
        };

        let mut files: Vec<(&'static str, PathBuf)> = Vec::new();
        for category in CATEGORIES {
            let dir = path.join(category);
            if !dir.is_dir() {
                log::debug!("No {} directory", category);
                continue;
            }
            let read_dir =
                fs::read_dir(&dir).with_context(|| format!("Failed to read {}", dir.display()))?;
            for entry in read_dir {
                let file = entry?.path();
                if file.extension().is_some_and(|ext| ext == "txt") {
                    files.push((category, file));
                }
            }
        }
        // Sorted so entry order within a category is stable across runs.
        files.sort();
        log::info!("Parsing {} content files from {}", files.len(), path.display());

        let parsed: Vec<_> = files
            .par_iter()
            .map(|(category, file)| (*category, file, gsml::parse_file(file)))
            .collect();

        let mut content = ContentBlocks::new();
        for (category, file, result) in parsed {
            let data = result.with_context(|| format!("Failed to parse {}", file.display()))?;
            let root = content
                .entry(category.to_string())
                .or_insert_with(GsmlData::anonymous);
            for element in data.into_elements() {
                match element {
                    GsmlElement::Child(block) => root.push_child(block),
                    _ => bail!(
                        "{}: top-level entries must be tagged blocks",
                        file.display()
                    ),
                }
            }
        }

        Database::from_gsml(defines, &content)
            .with_context(|| format!("Invalid content in {}", path.display()))
    }

    /// Validates every entry and every script it owns.
    #[tracing::instrument(skip_all, name = "check_validity")]
    pub fn check_validity(&self) -> Result<(), ScriptError> {
        self.technologies.check_validity(self)?;
        technology::check_prerequisite_cycles(self)?;
        self.government_groups.check_validity(self)?;
        self.government_types.check_validity(self)?;
        self.law_groups.check_validity(self)?;
        self.laws.check_validity(self)?;
        self.cultural_groups.check_validity(self)?;
        self.cultures.check_validity(self)?;
        self.religions.check_validity(self)?;
        self.population_types.check_validity(self)?;
        self.ideologies.check_validity(self)?;
        self.commodities.check_validity(self)?;
        self.building_classes.check_validity(self)?;
        self.resources.check_validity(self)?;
        self.character_traits.check_validity(self)?;
        self.ideas.check_validity(self)?;
        self.decisions.check_validity(self)?;
        self.tiers.check_validity(self)
    }

    /// Commodities enabled when a game starts: those not switched off and
    /// not waiting on a technology.
    pub fn starting_commodities(&self) -> Vec<CommodityId> {
        self.commodities
            .ids()
            .filter(|id| self.commodities.get(*id).enabled())
            .filter(|id| {
                !self
                    .technologies
                    .get_all()
                    .iter()
                    .any(|t| t.enabled_commodities().contains(id))
            })
            .collect()
    }
}

/// Title-cases an identifier for display: `cultural_group` -> `Cultural Group`.
pub fn display_name(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub(crate) fn unexpected_entry(entry: Entry<'_>) -> ScriptError {
    match entry {
        Entry::Property(p) => ScriptError::invalid_value(&p.key, &p.value, "unexpected property"),
        Entry::Child(c) => ScriptError::invalid_value(c.tag_or_empty(), "{ ... }", "unexpected block"),
    }
}

pub(crate) fn require_assignment(property: &GsmlProperty) -> Result<(), ScriptError> {
    if property.operator == GsmlOperator::Assignment {
        Ok(())
    } else {
        Err(ScriptError::InvalidOperator {
            key: property.key.clone(),
            operator: property.operator,
        })
    }
}

pub(crate) fn parse_int(property: &GsmlProperty) -> Result<i64, ScriptError> {
    property
        .value
        .parse()
        .map_err(|e| ScriptError::invalid_value(&property.key, &property.value, e))
}

pub(crate) fn parse_bool(property: &GsmlProperty) -> Result<bool, ScriptError> {
    match property.value.as_str() {
        "yes" | "true" => Ok(true),
        "no" | "false" => Ok(false),
        other => Err(ScriptError::invalid_value(
            &property.key,
            other,
            "expected yes or no",
        )),
    }
}

/// Entries that carry nothing but an optional display name.
pub(crate) fn parse_name_only(identifier: &str, block: &GsmlData) -> Result<String, ScriptError> {
    let mut name = display_name(identifier);
    for entry in block.entries() {
        match entry {
            Entry::Property(p) if p.key == "name" => name = p.value.clone(),
            other => return Err(unexpected_entry(other)),
        }
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(categories: &[(&str, &str)]) -> ContentBlocks {
        categories
            .iter()
            .map(|(category, text)| (category.to_string(), gsml::parse_str(text).unwrap()))
            .collect()
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("gunpowder"), "Gunpowder");
        assert_eq!(display_name("cultural_group"), "Cultural Group");
    }

    #[test]
    fn test_ids_are_sorted_by_identifier() {
        let db = Database::from_gsml(
            GameDefines::default(),
            &content(&[("commodities", "iron = {} grain = {} wool = {}")]),
        )
        .unwrap();
        let identifiers: Vec<_> = db
            .commodities
            .get_all()
            .iter()
            .map(|c| c.identifier())
            .collect();
        assert_eq!(identifiers, vec!["grain", "iron", "wool"]);
        assert_eq!(db.commodities.get_id("grain").unwrap(), CommodityId(0));
    }

    #[test]
    fn test_forward_references_resolve() {
        // The law refers to a group and a technology declared in other categories.
        let db = Database::from_gsml(
            GameDefines::default(),
            &content(&[
                (
                    "laws",
                    "serfdom = { group = economy required_technology = feudalism modifier = { storage_capacity = 1 } }",
                ),
                ("law_groups", "economy = {}"),
                ("technologies", "feudalism = {}"),
            ]),
        )
        .unwrap();
        let law = db.laws.get_by_identifier("serfdom").unwrap();
        assert_eq!(law.group(), db.law_groups.get_id("economy").unwrap());
        assert_eq!(
            law.required_technology(),
            Some(db.technologies.get_id("feudalism").unwrap())
        );
    }

    #[test]
    fn test_law_without_modifier_is_content_error() {
        let result = Database::from_gsml(
            GameDefines::default(),
            &content(&[("laws", "serfdom = { group = economy }"), ("law_groups", "economy = {}")]),
        );
        let err = result.err().unwrap();
        assert!(matches!(
            &err,
            ScriptError::InEntry { category: "laws", identifier, .. } if identifier == "serfdom"
        ));
        assert!(err.to_string().contains("has no modifier"));
    }

    #[test]
    fn test_dangling_reference_is_attributed() {
        let result = Database::from_gsml(
            GameDefines::default(),
            &content(&[("cultures", "saxon = { group = germanic }")]),
        );
        let err = result.err().unwrap();
        assert!(matches!(
            err.root_cause(),
            ScriptError::UnknownIdentifier { category: "cultural_groups", .. }
        ));
    }

    #[test]
    fn test_prerequisite_cycle_is_rejected() {
        let result = Database::from_gsml(
            GameDefines::default(),
            &content(&[(
                "technologies",
                "a = { prerequisites = { b } } b = { prerequisites = { a } }",
            )]),
        );
        assert!(result.err().unwrap().to_string().contains("cycle"));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result = Database::from_gsml(GameDefines::default(), &content(&[("spells", "x = {}")]));
        assert!(matches!(
            result,
            Err(ScriptError::UnknownIdentifier { category: "content category", .. })
        ));
    }

    #[test]
    fn test_starting_commodities_skip_technology_gated() {
        let db = Database::from_gsml(
            GameDefines::default(),
            &content(&[
                ("commodities", "grain = {} coffee = {} opium = { enabled = no }"),
                ("technologies", "colonization = { enabled_commodities = { coffee } }"),
            ]),
        )
        .unwrap();
        assert_eq!(
            db.starting_commodities(),
            vec![db.commodities.get_id("grain").unwrap()]
        );
    }
}
