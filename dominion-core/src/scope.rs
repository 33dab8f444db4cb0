//! Scope types: the entities conditions, effects and modifiers act on.
//!
//! Every scope is a `Copy` id into the [`Game`] arena. The [`Scope`] trait
//! ties each id type to its kind, its slot in the [`SavedScope`] union and the
//! factory tables that turn script keys into engine objects for that scope.

use crate::condition::ConditionTable;
use crate::effect::EffectTable;
use crate::game::Game;
use crate::modifier::ModifierEffectTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScopeKind {
    Country,
    Character,
    Province,
    Site,
    PopulationUnit,
    MilitaryUnit,
}

impl ScopeKind {
    pub const ALL: [ScopeKind; 6] = [
        ScopeKind::Country,
        ScopeKind::Character,
        ScopeKind::Province,
        ScopeKind::Site,
        ScopeKind::PopulationUnit,
        ScopeKind::MilitaryUnit,
    ];

    /// Token used in script keys (`source_population_unit`).
    pub fn identifier(self) -> &'static str {
        match self {
            ScopeKind::Country => "country",
            ScopeKind::Character => "character",
            ScopeKind::Province => "province",
            ScopeKind::Site => "site",
            ScopeKind::PopulationUnit => "population_unit",
            ScopeKind::MilitaryUnit => "military_unit",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeKind::PopulationUnit => "population unit",
            ScopeKind::MilitaryUnit => "military unit",
            other => other.identifier(),
        };
        f.write_str(name)
    }
}

macro_rules! scope_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

scope_id!(
    /// A country (domain).
    CountryId
);
scope_id!(CharacterId);
scope_id!(ProvinceId);
scope_id!(SiteId);
scope_id!(PopulationUnitId);
scope_id!(MilitaryUnitId);

/// A scope of any kind, as stored in a [`Context`](crate::context::Context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SavedScope {
    Country(CountryId),
    Character(CharacterId),
    Province(ProvinceId),
    Site(SiteId),
    PopulationUnit(PopulationUnitId),
    MilitaryUnit(MilitaryUnitId),
}

impl SavedScope {
    pub fn kind(self) -> ScopeKind {
        match self {
            SavedScope::Country(_) => ScopeKind::Country,
            SavedScope::Character(_) => ScopeKind::Character,
            SavedScope::Province(_) => ScopeKind::Province,
            SavedScope::Site(_) => ScopeKind::Site,
            SavedScope::PopulationUnit(_) => ScopeKind::PopulationUnit,
            SavedScope::MilitaryUnit(_) => ScopeKind::MilitaryUnit,
        }
    }
}

/// A scope type the engine can be instantiated over.
pub trait Scope:
    Copy + Eq + Hash + Ord + fmt::Debug + Send + Sync + 'static
{
    const KIND: ScopeKind;

    fn into_saved(self) -> SavedScope;

    fn from_saved(saved: SavedScope) -> Option<Self>;

    /// Stable identifier of the entity, used for ordering and display.
    fn identifier(self, game: &Game) -> &str;

    fn condition_table() -> &'static ConditionTable<Self>;

    fn effect_table() -> &'static EffectTable<Self>;

    fn modifier_effect_table() -> &'static ModifierEffectTable<Self>;
}

/// Sorts scopes by identifier. Collections are always visited in this order.
pub fn sort_by_identifier<S: Scope>(scopes: &mut [S], game: &Game) {
    scopes.sort_by(|a, b| a.identifier(game).cmp(b.identifier(game)));
}

macro_rules! impl_scope {
    ($id:ident, $variant:ident, $module:ident, $getter:ident) => {
        impl Scope for $id {
            const KIND: ScopeKind = ScopeKind::$variant;

            fn into_saved(self) -> SavedScope {
                SavedScope::$variant(self)
            }

            fn from_saved(saved: SavedScope) -> Option<Self> {
                match saved {
                    SavedScope::$variant(id) => Some(id),
                    _ => None,
                }
            }

            fn identifier(self, game: &Game) -> &str {
                game.$getter(self).identifier()
            }

            fn condition_table() -> &'static ConditionTable<Self> {
                static TABLE: OnceLock<ConditionTable<$id>> = OnceLock::new();
                TABLE.get_or_init(crate::condition::$module::condition_table)
            }

            fn effect_table() -> &'static EffectTable<Self> {
                static TABLE: OnceLock<EffectTable<$id>> = OnceLock::new();
                TABLE.get_or_init(crate::effect::$module::effect_table)
            }

            fn modifier_effect_table() -> &'static ModifierEffectTable<Self> {
                static TABLE: OnceLock<ModifierEffectTable<$id>> = OnceLock::new();
                TABLE.get_or_init(crate::modifier::$module::modifier_effect_table)
            }
        }
    };
}

impl_scope!(CountryId, Country, country, country);
impl_scope!(CharacterId, Character, character, character);
impl_scope!(ProvinceId, Province, province, province);
impl_scope!(SiteId, Site, site, site);
impl_scope!(PopulationUnitId, PopulationUnit, population_unit, population_unit);
impl_scope!(MilitaryUnitId, MilitaryUnit, military_unit, military_unit);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_scope_round_trip() {
        let saved = CharacterId(3).into_saved();
        assert_eq!(saved.kind(), ScopeKind::Character);
        assert_eq!(CharacterId::from_saved(saved), Some(CharacterId(3)));
        assert_eq!(CountryId::from_saved(saved), None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ScopeKind::PopulationUnit.identifier(), "population_unit");
        assert_eq!(ScopeKind::PopulationUnit.to_string(), "population unit");
        assert_eq!(ScopeKind::Country.to_string(), "country");
    }
}
