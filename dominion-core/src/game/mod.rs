//! Simulation state: the entities scripts are evaluated against.
//!
//! Entities live in per-kind vectors indexed by their scope ids. The static
//! [`Database`] is shared through an `Arc` so a modifier borrowed from it can
//! be applied while the game is borrowed mutably.

pub mod character;
pub mod country;
pub mod military_unit;
pub mod population_unit;
pub mod province;
pub mod site;

pub use character::{Character, CharacterSkill};
pub use country::Country;
pub use military_unit::MilitaryUnit;
pub use population_unit::PopulationUnit;
pub use province::Province;
pub use site::Site;

use crate::config::GameConfig;
use crate::database::{
    CharacterTraitId, CommodityId, Database, DomainTier, GovernmentTypeId, IdeaId, IdeologyId,
    LawId, PopulationTypeId, ReligionId, ResourceId, TechnologyId,
};
use crate::fixed::Fixed;
use crate::modifier::Modifier;
use crate::scope::{
    CharacterId, CountryId, MilitaryUnitId, PopulationUnitId, ProvinceId, SavedScope, Scope,
    SiteId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::hash::Hash;
use std::sync::Arc;

/// The data entry whose modifier is active on a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierOwner {
    Tier(DomainTier),
    GovernmentType(GovernmentTypeId),
    Law(LawId),
    Technology(TechnologyId),
    Idea(IdeaId),
    Trait(CharacterTraitId),
    /// A commander's trait, active on the units they command.
    CommanderTrait(CharacterTraitId),
    Religion(ReligionId),
    Resource(ResourceId),
    PopulationType(PopulationTypeId),
    Ideology(IdeologyId),
}

pub struct Game {
    db: Arc<Database>,
    config: GameConfig,
    countries: Vec<Country>,
    characters: Vec<Character>,
    provinces: Vec<Province>,
    sites: Vec<Site>,
    population_units: Vec<PopulationUnit>,
    military_units: Vec<MilitaryUnit>,
    enabled_commodities: BTreeSet<CommodityId>,
    rng: StdRng,
    /// Activation counts, kept only with `debug_validation`.
    active_modifiers: FxHashMap<(ModifierOwner, SavedScope), i32>,
}

#[derive(Serialize)]
struct GameSnapshot<'a> {
    countries: &'a [Country],
    characters: &'a [Character],
    provinces: &'a [Province],
    sites: &'a [Site],
    population_units: &'a [PopulationUnit],
    military_units: &'a [MilitaryUnit],
    enabled_commodities: &'a BTreeSet<CommodityId>,
}

impl Game {
    pub fn new(db: Arc<Database>, config: GameConfig) -> Self {
        let enabled_commodities = db.starting_commodities().into_iter().collect();
        log::debug!("New game with rng seed {}", config.rng_seed);
        Self {
            rng: StdRng::seed_from_u64(config.rng_seed),
            db,
            config,
            countries: Vec::new(),
            characters: Vec::new(),
            provinces: Vec::new(),
            sites: Vec::new(),
            population_units: Vec::new(),
            military_units: Vec::new(),
            enabled_commodities,
            active_modifiers: FxHashMap::default(),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub(crate) fn shared_database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn country(&self, id: CountryId) -> &Country {
        &self.countries[id.index()]
    }

    pub(crate) fn country_mut(&mut self, id: CountryId) -> &mut Country {
        &mut self.countries[id.index()]
    }

    pub fn character(&self, id: CharacterId) -> &Character {
        &self.characters[id.index()]
    }

    pub(crate) fn character_mut(&mut self, id: CharacterId) -> &mut Character {
        &mut self.characters[id.index()]
    }

    pub fn province(&self, id: ProvinceId) -> &Province {
        &self.provinces[id.index()]
    }

    pub(crate) fn province_mut(&mut self, id: ProvinceId) -> &mut Province {
        &mut self.provinces[id.index()]
    }

    pub fn site(&self, id: SiteId) -> &Site {
        &self.sites[id.index()]
    }

    pub(crate) fn site_mut(&mut self, id: SiteId) -> &mut Site {
        &mut self.sites[id.index()]
    }

    pub fn population_unit(&self, id: PopulationUnitId) -> &PopulationUnit {
        &self.population_units[id.index()]
    }

    pub(crate) fn population_unit_mut(&mut self, id: PopulationUnitId) -> &mut PopulationUnit {
        &mut self.population_units[id.index()]
    }

    pub fn military_unit(&self, id: MilitaryUnitId) -> &MilitaryUnit {
        &self.military_units[id.index()]
    }

    pub(crate) fn military_unit_mut(&mut self, id: MilitaryUnitId) -> &mut MilitaryUnit {
        &mut self.military_units[id.index()]
    }

    pub fn country_ids(&self) -> impl Iterator<Item = CountryId> {
        (0..self.countries.len() as u32).map(CountryId)
    }

    pub fn character_ids(&self) -> impl Iterator<Item = CharacterId> {
        (0..self.characters.len() as u32).map(CharacterId)
    }

    pub fn find_country(&self, identifier: &str) -> Option<CountryId> {
        self.countries
            .iter()
            .position(|c| c.identifier() == identifier)
            .map(|i| CountryId(i as u32))
    }

    pub fn find_character(&self, identifier: &str) -> Option<CharacterId> {
        self.characters
            .iter()
            .position(|c| c.identifier() == identifier)
            .map(|i| CharacterId(i as u32))
    }

    pub fn find_province(&self, identifier: &str) -> Option<ProvinceId> {
        self.provinces
            .iter()
            .position(|p| p.identifier() == identifier)
            .map(|i| ProvinceId(i as u32))
    }

    pub fn is_commodity_enabled(&self, commodity: CommodityId) -> bool {
        self.enabled_commodities.contains(&commodity)
    }

    pub fn enabled_commodities(&self) -> &BTreeSet<CommodityId> {
        &self.enabled_commodities
    }

    pub fn enable_commodity(&mut self, commodity: CommodityId) {
        if self.enabled_commodities.insert(commodity) {
            log::debug!(
                "Enabled commodity {}",
                self.db.commodities.identifier(commodity)
            );
        }
    }

    /// Full state dump, for debugging and determinism checks.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(GameSnapshot {
            countries: &self.countries,
            characters: &self.characters,
            provinces: &self.provinces,
            sites: &self.sites,
            population_units: &self.population_units,
            military_units: &self.military_units,
            enabled_commodities: &self.enabled_commodities,
        })
    }

    /// Applies an owner's modifier to a scope, on activation of the owner.
    pub(crate) fn activate_modifier<S: Scope>(
        &mut self,
        owner: ModifierOwner,
        scope: S,
        modifier: Option<&Modifier<S>>,
    ) {
        let Some(modifier) = modifier else {
            return;
        };
        log::trace!("Activating {:?} modifier on {:?}", owner, scope);
        self.track_activation(owner, scope.into_saved(), 1);
        modifier.apply(scope, self, Fixed::ONE);
    }

    /// Removes an owner's modifier from a scope, on deactivation of the owner.
    pub(crate) fn deactivate_modifier<S: Scope>(
        &mut self,
        owner: ModifierOwner,
        scope: S,
        modifier: Option<&Modifier<S>>,
    ) {
        let Some(modifier) = modifier else {
            return;
        };
        log::trace!("Deactivating {:?} modifier on {:?}", owner, scope);
        self.track_activation(owner, scope.into_saved(), -1);
        modifier.remove(scope, self, Fixed::ONE);
    }

    fn track_activation(&mut self, owner: ModifierOwner, scope: SavedScope, delta: i32) {
        if !self.config.debug_validation {
            return;
        }
        let key = (owner, scope);
        let count = {
            let count = self.active_modifiers.entry(key).or_insert(0);
            *count += delta;
            *count
        };
        if count == 0 {
            self.active_modifiers.remove(&key);
        } else if count != 1 {
            log::error!(
                "Unmatched modifier bookkeeping: {:?} on {:?} is active {} times",
                owner,
                scope,
                count
            );
            debug_assert!(false, "{:?} on {:?} is active {} times", owner, scope, count);
        }
    }
}

/// Adds `change` to a keyed counter, dropping the entry when it returns to
/// zero so apply followed by remove leaves no trace.
pub(crate) fn change_keyed_value<K: Hash + Eq + Copy>(
    map: &mut FxHashMap<K, i64>,
    key: K,
    change: i64,
) {
    if change == 0 {
        return;
    }
    let value = map.entry(key).or_insert(0);
    *value += change;
    if *value == 0 {
        map.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_keyed_value_removes_zero_entries() {
        let mut map = FxHashMap::default();
        change_keyed_value(&mut map, "grain", 10);
        assert_eq!(map.get("grain"), Some(&10));
        change_keyed_value(&mut map, "grain", -10);
        assert!(map.is_empty());
        change_keyed_value(&mut map, "iron", 0);
        assert!(map.is_empty());
    }
}
