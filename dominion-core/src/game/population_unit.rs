use super::{Game, ModifierOwner};
use crate::database::{CultureId, IdeologyId, PopulationTypeId, ReligionId};
use crate::scope::{CountryId, PopulationUnitId, ProvinceId, SiteId};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PopulationUnit {
    identifier: String,
    pub(crate) population_type: PopulationTypeId,
    pub(crate) culture: CultureId,
    pub(crate) religion: ReligionId,
    pub(crate) ideology: Option<IdeologyId>,
    pub(crate) country: Option<CountryId>,
    pub(crate) province: ProvinceId,
    pub(crate) site: Option<SiteId>,
    pub(crate) consumption_modifier: i64,
}

impl PopulationUnit {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn population_type(&self) -> PopulationTypeId {
        self.population_type
    }

    pub fn culture(&self) -> CultureId {
        self.culture
    }

    pub fn religion(&self) -> ReligionId {
        self.religion
    }

    pub fn ideology(&self) -> Option<IdeologyId> {
        self.ideology
    }

    pub fn country(&self) -> Option<CountryId> {
        self.country
    }

    pub fn province(&self) -> ProvinceId {
        self.province
    }

    pub fn site(&self) -> Option<SiteId> {
        self.site
    }

    pub fn consumption_modifier(&self) -> i64 {
        self.consumption_modifier
    }
}

impl Game {
    /// Settles a population unit in a province. It belongs to the
    /// province owner, and its type's modifier applies to it.
    pub fn add_population_unit(
        &mut self,
        population_type: PopulationTypeId,
        culture: CultureId,
        religion: ReligionId,
        province: ProvinceId,
    ) -> PopulationUnitId {
        let id = PopulationUnitId(self.population_units.len() as u32);
        let country = self.province(province).owner;
        let identifier = format!(
            "{}_{}_{}",
            self.province(province).identifier(),
            self.database().population_types.identifier(population_type),
            id.0
        );
        self.population_units.push(PopulationUnit {
            identifier,
            population_type,
            culture,
            religion,
            ideology: None,
            country,
            province,
            site: None,
            consumption_modifier: 0,
        });
        self.province_mut(province).population_units.push(id);
        if let Some(country) = country {
            self.country_mut(country).population_units.push(id);
        }

        let db = self.shared_database();
        let modifier = db.population_types.get(population_type).modifier();
        self.activate_modifier(ModifierOwner::PopulationType(population_type), id, modifier);
        id
    }

    /// Assigns a population unit to work a site of its province.
    pub fn set_population_unit_site(&mut self, unit: PopulationUnitId, site: Option<SiteId>) {
        if let Some(site) = site {
            debug_assert_eq!(self.site(site).province, self.population_unit(unit).province);
        }
        self.population_unit_mut(unit).site = site;
    }

    pub fn set_population_unit_culture(&mut self, unit: PopulationUnitId, culture: CultureId) {
        self.population_unit_mut(unit).culture = culture;
    }

    pub fn set_population_unit_religion(&mut self, unit: PopulationUnitId, religion: ReligionId) {
        self.population_unit_mut(unit).religion = religion;
    }

    pub fn set_population_type(&mut self, unit: PopulationUnitId, population_type: PopulationTypeId) {
        let old = self.population_unit(unit).population_type;
        if old == population_type {
            return;
        }
        let db = self.shared_database();
        self.deactivate_modifier(
            ModifierOwner::PopulationType(old),
            unit,
            db.population_types.get(old).modifier(),
        );
        self.population_unit_mut(unit).population_type = population_type;
        self.activate_modifier(
            ModifierOwner::PopulationType(population_type),
            unit,
            db.population_types.get(population_type).modifier(),
        );
    }

    pub fn set_ideology(&mut self, unit: PopulationUnitId, ideology: Option<IdeologyId>) {
        let old = self.population_unit(unit).ideology;
        if old == ideology {
            return;
        }
        let db = self.shared_database();
        if let Some(old) = old {
            let modifier = db.ideologies.get(old).modifier();
            self.deactivate_modifier(ModifierOwner::Ideology(old), unit, modifier);
        }
        self.population_unit_mut(unit).ideology = ideology;
        if let Some(new) = ideology {
            let modifier = db.ideologies.get(new).modifier();
            self.activate_modifier(ModifierOwner::Ideology(new), unit, modifier);
        }
    }

    pub(crate) fn change_consumption_modifier(&mut self, unit: PopulationUnitId, change: i64) {
        self.population_unit_mut(unit).consumption_modifier += change;
    }
}
