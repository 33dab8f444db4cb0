use super::{Game, ModifierOwner};
use crate::database::{CultureId, ReligionId};
use crate::scope::{CountryId, PopulationUnitId, ProvinceId, SiteId};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize)]
pub struct Province {
    identifier: String,
    pub(crate) owner: Option<CountryId>,
    pub(crate) culture: Option<CultureId>,
    pub(crate) religion: Option<ReligionId>,
    pub(crate) neighbors: BTreeSet<ProvinceId>,
    pub(crate) sites: Vec<SiteId>,
    pub(crate) population_units: Vec<PopulationUnitId>,
    pub(crate) population_capacity_modifier: i64,
}

impl Province {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn owner(&self) -> Option<CountryId> {
        self.owner
    }

    pub fn culture(&self) -> Option<CultureId> {
        self.culture
    }

    pub fn religion(&self) -> Option<ReligionId> {
        self.religion
    }

    pub fn neighbors(&self) -> &BTreeSet<ProvinceId> {
        &self.neighbors
    }

    pub fn sites(&self) -> &[SiteId] {
        &self.sites
    }

    pub fn population_units(&self) -> &[PopulationUnitId] {
        &self.population_units
    }

    pub fn population_capacity_modifier(&self) -> i64 {
        self.population_capacity_modifier
    }
}

impl Game {
    pub fn add_province(&mut self, identifier: &str) -> ProvinceId {
        let id = ProvinceId(self.provinces.len() as u32);
        self.provinces.push(Province {
            identifier: identifier.to_string(),
            owner: None,
            culture: None,
            religion: None,
            neighbors: BTreeSet::new(),
            sites: Vec::new(),
            population_units: Vec::new(),
            population_capacity_modifier: 0,
        });
        id
    }

    /// Transfers a province. Its population units move with it.
    pub fn set_province_owner(&mut self, province: ProvinceId, owner: Option<CountryId>) {
        let old = self.province(province).owner;
        if old == owner {
            return;
        }
        let units = self.province(province).population_units.clone();
        if let Some(old) = old {
            let country = self.country_mut(old);
            country.provinces.retain(|p| *p != province);
            country.population_units.retain(|u| !units.contains(u));
            if country.capital == Some(province) {
                country.capital = None;
            }
        }
        if let Some(new) = owner {
            let country = self.country_mut(new);
            country.provinces.push(province);
            country.population_units.extend(units.iter().copied());
        }
        for unit in units {
            self.population_unit_mut(unit).country = owner;
        }
        self.province_mut(province).owner = owner;
    }

    pub fn set_province_culture(&mut self, province: ProvinceId, culture: Option<CultureId>) {
        self.province_mut(province).culture = culture;
    }

    /// Changes the province religion, swapping the religions' province modifiers.
    pub fn set_province_religion(&mut self, province: ProvinceId, religion: Option<ReligionId>) {
        let old = self.province(province).religion;
        if old == religion {
            return;
        }
        let db = self.shared_database();
        if let Some(old) = old {
            let modifier = db.religions.get(old).province_modifier();
            self.deactivate_modifier(ModifierOwner::Religion(old), province, modifier);
        }
        self.province_mut(province).religion = religion;
        if let Some(new) = religion {
            let modifier = db.religions.get(new).province_modifier();
            self.activate_modifier(ModifierOwner::Religion(new), province, modifier);
        }
    }

    pub fn add_province_neighbor(&mut self, a: ProvinceId, b: ProvinceId) {
        if a == b {
            return;
        }
        self.province_mut(a).neighbors.insert(b);
        self.province_mut(b).neighbors.insert(a);
    }

    pub(crate) fn change_population_capacity_modifier(&mut self, province: ProvinceId, change: i64) {
        self.province_mut(province).population_capacity_modifier += change;
    }
}
