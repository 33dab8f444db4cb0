//! Identifier registries.
//!
//! A registry maps string identifiers to dense typed ids. Loading happens in
//! two phases: every identifier of every category is declared first, so an
//! entry can refer to any other entry regardless of file order, and entries
//! are defined afterwards.

use super::Database;
use crate::error::ScriptError;
use gsml::GsmlData;
use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

pub trait EntryId: Copy + Eq + Hash + Ord + Debug + Send + Sync + 'static {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

/// Declares a type-safe entry id.
macro_rules! entry_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Hash, Eq, PartialEq, Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialOrd, Ord,
        )]
        pub struct $name(pub u16);

        impl $crate::database::registry::EntryId for $name {
            #[inline]
            fn from_index(index: usize) -> Self {
                $name(index as u16)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}
pub(crate) use entry_id;

/// A category of static game data.
pub trait DataEntry: Sized + Send + Sync + 'static {
    type Id: EntryId;

    /// Category name. Also the name of the content subdirectory.
    const CATEGORY: &'static str;

    /// Builds an entry. Only ids may be looked up in `db` here: other
    /// categories are declared but not necessarily defined yet.
    fn from_gsml(identifier: &str, block: &GsmlData, db: &Database) -> Result<Self, ScriptError>;

    fn identifier(&self) -> &str;

    /// Display name, `name = "..."` or derived from the identifier.
    fn name(&self) -> &str;

    /// The registry of this category in `db`.
    fn registry(db: &Database) -> &Registry<Self>;

    /// Post-load validation, once every category is defined.
    fn check_validity(&self, _db: &Database) -> Result<(), ScriptError> {
        Ok(())
    }
}

pub struct Registry<T: DataEntry> {
    identifiers: Vec<String>,
    ids: FxHashMap<String, T::Id>,
    entries: Vec<T>,
}

impl<T: DataEntry> Default for Registry<T> {
    fn default() -> Self {
        Self {
            identifiers: Vec::new(),
            ids: FxHashMap::default(),
            entries: Vec::new(),
        }
    }
}

impl<T: DataEntry> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> &'static str {
        T::CATEGORY
    }

    /// Phase 1: assigns ids. Identifiers are sorted first so the same
    /// content always gets the same ids.
    pub fn declare<I>(&mut self, identifiers: I) -> Result<(), ScriptError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut identifiers: Vec<String> = identifiers.into_iter().collect();
        identifiers.sort();
        if let Some(pair) = identifiers.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ScriptError::DuplicateIdentifier {
                category: T::CATEGORY,
                identifier: pair[0].clone(),
            });
        }
        if identifiers.len() > u16::MAX as usize {
            return Err(ScriptError::Invalid {
                category: T::CATEGORY,
                identifier: String::new(),
                reason: format!("{} entries exceed the id space", identifiers.len()),
            });
        }

        self.ids = identifiers
            .iter()
            .enumerate()
            .map(|(i, identifier)| (identifier.clone(), T::Id::from_index(i)))
            .collect();
        self.identifiers = identifiers;
        self.entries.clear();
        log::trace!("Declared {} {} entries", self.identifiers.len(), T::CATEGORY);
        Ok(())
    }

    /// Phase 2 helper: builds every declared entry from its block, in id order.
    pub fn build_entries(
        &self,
        blocks: &FxHashMap<&str, &GsmlData>,
        db: &Database,
    ) -> Result<Vec<T>, ScriptError> {
        self.identifiers
            .iter()
            .map(|identifier| {
                let block = blocks.get(identifier.as_str()).ok_or_else(|| {
                    ScriptError::UnknownIdentifier {
                        category: T::CATEGORY,
                        identifier: identifier.clone(),
                    }
                })?;
                T::from_gsml(identifier, block, db).map_err(|e| e.in_entry(T::CATEGORY, identifier))
            })
            .collect()
    }

    /// Phase 2: installs the built entries.
    pub fn define(&mut self, entries: Vec<T>) {
        debug_assert_eq!(entries.len(), self.identifiers.len());
        self.entries = entries;
    }

    pub fn is_defined(&self) -> bool {
        self.entries.len() == self.identifiers.len()
    }

    /// Entry for an id minted by this registry.
    ///
    /// # Panics
    /// If called before the registry is defined.
    pub fn get(&self, id: T::Id) -> &T {
        &self.entries[id.index()]
    }

    pub fn get_by_identifier(&self, identifier: &str) -> Result<&T, ScriptError> {
        self.get_id(identifier).map(|id| self.get(id))
    }

    /// Resolves an identifier. Valid from phase 1 on.
    pub fn get_id(&self, identifier: &str) -> Result<T::Id, ScriptError> {
        self.ids
            .get(identifier)
            .copied()
            .ok_or_else(|| ScriptError::UnknownIdentifier {
                category: T::CATEGORY,
                identifier: identifier.to_string(),
            })
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.ids.contains_key(identifier)
    }

    pub fn identifier(&self, id: T::Id) -> &str {
        &self.identifiers[id.index()]
    }

    /// All entries, sorted by identifier.
    pub fn get_all(&self) -> &[T] {
        &self.entries
    }

    /// All ids, sorted by identifier.
    pub fn ids(&self) -> impl Iterator<Item = T::Id> + '_ {
        (0..self.identifiers.len()).map(T::Id::from_index)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub(crate) fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        for entry in &self.entries {
            entry
                .check_validity(db)
                .map_err(|e| e.in_entry(T::CATEGORY, entry.identifier()))?;
        }
        Ok(())
    }
}
