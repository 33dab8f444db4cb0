use super::{change_keyed_value, Game, ModifierOwner};
use crate::condition::Condition;
use crate::context::Context;
use crate::database::{
    BuildingClassId, CommodityId, DecisionId, DomainTier, GovernmentTypeId, IdeaId, LawGroupId,
    LawId, TechnologyId,
};
use crate::effect::Effect;
use crate::fixed::{Fixed, Rounding};
use crate::scope::{CharacterId, CountryId, PopulationUnitId, ProvinceId};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Serialize)]
pub struct Country {
    identifier: String,
    pub(crate) tier: DomainTier,
    pub(crate) government_type: Option<GovernmentTypeId>,
    pub(crate) laws: BTreeMap<LawGroupId, LawId>,
    pub(crate) technologies: BTreeSet<TechnologyId>,
    pub(crate) ideas: BTreeSet<IdeaId>,
    pub(crate) ruler: Option<CharacterId>,
    pub(crate) capital: Option<ProvinceId>,
    pub(crate) provinces: Vec<ProvinceId>,
    pub(crate) neighbors: BTreeSet<CountryId>,
    pub(crate) subjects: BTreeSet<CountryId>,
    pub(crate) overlord: Option<CountryId>,
    pub(crate) known_countries: BTreeSet<CountryId>,
    pub(crate) population_units: Vec<PopulationUnitId>,
    pub(crate) wealth: i64,
    pub(crate) stored_commodities: BTreeMap<CommodityId, i64>,

    // Modifier-driven stats
    pub(crate) law_cost_modifier: i64,
    pub(crate) technology_cost_modifier: i64,
    pub(crate) commodity_output_modifiers: FxHashMap<CommodityId, i64>,
    pub(crate) free_building_classes: FxHashMap<BuildingClassId, i64>,
    pub(crate) storage_capacity: i64,
    pub(crate) diplomatic_penalty_for_expansion: Fixed,
}

impl Country {
    fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            tier: DomainTier::None,
            government_type: None,
            laws: BTreeMap::new(),
            technologies: BTreeSet::new(),
            ideas: BTreeSet::new(),
            ruler: None,
            capital: None,
            provinces: Vec::new(),
            neighbors: BTreeSet::new(),
            subjects: BTreeSet::new(),
            overlord: None,
            known_countries: BTreeSet::new(),
            population_units: Vec::new(),
            wealth: 0,
            stored_commodities: BTreeMap::new(),
            law_cost_modifier: 0,
            technology_cost_modifier: 0,
            commodity_output_modifiers: FxHashMap::default(),
            free_building_classes: FxHashMap::default(),
            storage_capacity: 0,
            diplomatic_penalty_for_expansion: Fixed::ZERO,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn tier(&self) -> DomainTier {
        self.tier
    }

    pub fn government_type(&self) -> Option<GovernmentTypeId> {
        self.government_type
    }

    pub fn law(&self, group: LawGroupId) -> Option<LawId> {
        self.laws.get(&group).copied()
    }

    pub fn has_law(&self, law: LawId) -> bool {
        self.laws.values().any(|l| *l == law)
    }

    pub fn laws(&self) -> &BTreeMap<LawGroupId, LawId> {
        &self.laws
    }

    pub fn has_technology(&self, technology: TechnologyId) -> bool {
        self.technologies.contains(&technology)
    }

    pub fn technologies(&self) -> &BTreeSet<TechnologyId> {
        &self.technologies
    }

    pub fn has_idea(&self, idea: IdeaId) -> bool {
        self.ideas.contains(&idea)
    }

    pub fn ruler(&self) -> Option<CharacterId> {
        self.ruler
    }

    pub fn capital(&self) -> Option<ProvinceId> {
        self.capital
    }

    pub fn provinces(&self) -> &[ProvinceId] {
        &self.provinces
    }

    pub fn neighbors(&self) -> &BTreeSet<CountryId> {
        &self.neighbors
    }

    pub fn subjects(&self) -> &BTreeSet<CountryId> {
        &self.subjects
    }

    pub fn overlord(&self) -> Option<CountryId> {
        self.overlord
    }

    pub fn is_subject(&self) -> bool {
        self.overlord.is_some()
    }

    pub fn known_countries(&self) -> &BTreeSet<CountryId> {
        &self.known_countries
    }

    pub fn population_units(&self) -> &[PopulationUnitId] {
        &self.population_units
    }

    pub fn wealth(&self) -> i64 {
        self.wealth
    }

    pub fn stored_commodity(&self, commodity: CommodityId) -> i64 {
        self.stored_commodities.get(&commodity).copied().unwrap_or(0)
    }

    pub fn law_cost_modifier(&self) -> i64 {
        self.law_cost_modifier
    }

    /// Percent multiplier on law costs: 100 plus one point per population
    /// unit beyond the first, plus modifiers.
    pub fn get_total_law_cost_modifier(&self) -> i64 {
        let extra_units = (self.population_units.len() as i64 - 1).max(0);
        100 + extra_units + self.law_cost_modifier
    }

    pub fn technology_cost_modifier(&self) -> i64 {
        self.technology_cost_modifier
    }

    pub fn commodity_output_modifier(&self, commodity: CommodityId) -> i64 {
        self.commodity_output_modifiers
            .get(&commodity)
            .copied()
            .unwrap_or(0)
    }

    pub fn commodity_output_modifiers(&self) -> &FxHashMap<CommodityId, i64> {
        &self.commodity_output_modifiers
    }

    pub fn free_building_count(&self, building_class: BuildingClassId) -> i64 {
        self.free_building_classes
            .get(&building_class)
            .copied()
            .unwrap_or(0)
    }

    pub fn free_building_classes(&self) -> &FxHashMap<BuildingClassId, i64> {
        &self.free_building_classes
    }

    pub fn storage_capacity(&self) -> i64 {
        self.storage_capacity
    }

    pub fn diplomatic_penalty_for_expansion(&self) -> Fixed {
        self.diplomatic_penalty_for_expansion
    }
}

/// `base * percent / 100`, rounded away from zero.
fn apply_cost_modifier(base: i64, percent: i64) -> i64 {
    Fixed::from_int(base)
        .mul_to_int(Fixed::from_raw(percent), Rounding::AwayFromZero)
        .max(0)
}

impl Game {
    pub fn add_country(&mut self, identifier: &str) -> CountryId {
        let id = CountryId(self.countries.len() as u32);
        self.countries.push(Country::new(identifier));
        // New countries start untiered, so that tier's modifier is active.
        let db = self.shared_database();
        let tier = DomainTier::None;
        self.activate_modifier(ModifierOwner::Tier(tier), id, db.tiers.get_modifier(tier));
        log::debug!("Added country {} ({:?})", identifier, id);
        id
    }

    /// Law cost for `country`, with its total law cost modifier applied.
    pub fn get_law_cost(&self, country: CountryId) -> i64 {
        apply_cost_modifier(
            self.database().defines().base_law_cost,
            self.country(country).get_total_law_cost_modifier(),
        )
    }

    pub fn get_technology_cost(&self, country: CountryId, technology: TechnologyId) -> i64 {
        let db = self.database();
        let base = db
            .technologies
            .get(technology)
            .cost()
            .unwrap_or(db.defines().base_technology_cost);
        apply_cost_modifier(base, 100 + self.country(country).technology_cost_modifier)
    }

    /// Output modifier for a commodity, capped by the defines.
    pub fn get_commodity_output_modifier(&self, country: CountryId, commodity: CommodityId) -> i64 {
        let max = self.database().defines().max_output_modifier;
        self.country(country)
            .commodity_output_modifier(commodity)
            .min(max)
    }

    #[tracing::instrument(skip_all, name = "set_tier")]
    pub fn set_tier(&mut self, country: CountryId, tier: DomainTier) {
        let old = self.country(country).tier;
        if old == tier {
            return;
        }
        let db = self.shared_database();
        self.deactivate_modifier(ModifierOwner::Tier(old), country, db.tiers.get_modifier(old));
        self.country_mut(country).tier = tier;
        self.activate_modifier(ModifierOwner::Tier(tier), country, db.tiers.get_modifier(tier));
        log::debug!(
            "{} tier: {} -> {}",
            self.country(country).identifier(),
            old,
            tier
        );
    }

    #[tracing::instrument(skip_all, name = "set_government_type")]
    pub fn set_government_type(&mut self, country: CountryId, government_type: Option<GovernmentTypeId>) {
        let old = self.country(country).government_type;
        if old == government_type {
            return;
        }
        let db = self.shared_database();
        if let Some(old) = old {
            let modifier = db.government_types.get(old).modifier();
            self.deactivate_modifier(ModifierOwner::GovernmentType(old), country, modifier);
        }
        self.country_mut(country).government_type = government_type;
        if let Some(new) = government_type {
            let modifier = db.government_types.get(new).modifier();
            self.activate_modifier(ModifierOwner::GovernmentType(new), country, modifier);
        }
    }

    /// Enacts a law, replacing the law of the same group.
    #[tracing::instrument(skip_all, name = "set_law")]
    pub fn set_law(&mut self, country: CountryId, law: LawId) {
        let db = self.shared_database();
        let group = db.laws.get(law).group();
        let old = self.country(country).law(group);
        if old == Some(law) {
            return;
        }
        if let Some(old) = old {
            self.deactivate_modifier(ModifierOwner::Law(old), country, db.laws.get(old).modifier());
        }
        self.country_mut(country).laws.insert(group, law);
        self.activate_modifier(ModifierOwner::Law(law), country, db.laws.get(law).modifier());
        log::debug!(
            "{} enacted {}",
            self.country(country).identifier(),
            db.laws.identifier(law)
        );
    }

    pub fn can_enact_law(&self, country: CountryId, law: LawId) -> bool {
        let db = self.database();
        self.country(country).law(db.laws.get(law).group()) != Some(law)
            && db.laws.get(law).is_available_for(country, self)
    }

    /// Returns false if the country already knew the technology.
    #[tracing::instrument(skip_all, name = "add_technology")]
    pub fn add_technology(&mut self, country: CountryId, technology: TechnologyId) -> bool {
        if !self.country_mut(country).technologies.insert(technology) {
            return false;
        }
        let db = self.shared_database();
        let entry = db.technologies.get(technology);
        self.activate_modifier(ModifierOwner::Technology(technology), country, entry.modifier());
        for commodity in entry.enabled_commodities() {
            self.enable_commodity(*commodity);
        }
        true
    }

    /// Returns false if the country did not know the technology. Commodities
    /// the technology enabled stay enabled.
    #[tracing::instrument(skip_all, name = "remove_technology")]
    pub fn remove_technology(&mut self, country: CountryId, technology: TechnologyId) -> bool {
        if !self.country_mut(country).technologies.remove(&technology) {
            return false;
        }
        let db = self.shared_database();
        let modifier = db.technologies.get(technology).modifier();
        self.deactivate_modifier(ModifierOwner::Technology(technology), country, modifier);
        true
    }

    pub fn add_idea(&mut self, country: CountryId, idea: IdeaId) -> bool {
        if !self.country_mut(country).ideas.insert(idea) {
            return false;
        }
        let db = self.shared_database();
        self.activate_modifier(ModifierOwner::Idea(idea), country, db.ideas.get(idea).modifier());
        true
    }

    pub fn remove_idea(&mut self, country: CountryId, idea: IdeaId) -> bool {
        if !self.country_mut(country).ideas.remove(&idea) {
            return false;
        }
        let db = self.shared_database();
        self.deactivate_modifier(ModifierOwner::Idea(idea), country, db.ideas.get(idea).modifier());
        true
    }

    pub fn set_ruler(&mut self, country: CountryId, ruler: Option<CharacterId>) {
        if let Some(ruler) = ruler {
            self.character_mut(ruler).country = Some(country);
        }
        self.country_mut(country).ruler = ruler;
    }

    pub fn set_capital(&mut self, country: CountryId, capital: Option<ProvinceId>) {
        self.country_mut(country).capital = capital;
    }

    /// Makes two countries neighbors of each other. Neighbors know each other.
    pub fn add_neighbor(&mut self, a: CountryId, b: CountryId) {
        if a == b {
            return;
        }
        self.country_mut(a).neighbors.insert(b);
        self.country_mut(b).neighbors.insert(a);
        self.add_known_country(a, b);
        self.add_known_country(b, a);
    }

    pub fn add_known_country(&mut self, country: CountryId, known: CountryId) {
        if country != known {
            self.country_mut(country).known_countries.insert(known);
        }
    }

    pub fn set_overlord(&mut self, subject: CountryId, overlord: Option<CountryId>) {
        if let Some(old) = self.country(subject).overlord {
            self.country_mut(old).subjects.remove(&subject);
        }
        self.country_mut(subject).overlord = overlord;
        if let Some(new) = overlord {
            self.country_mut(new).subjects.insert(subject);
        }
    }

    pub fn change_wealth(&mut self, country: CountryId, change: i64) {
        self.country_mut(country).wealth += change;
    }

    pub fn set_wealth(&mut self, country: CountryId, wealth: i64) {
        self.country_mut(country).wealth = wealth;
    }

    /// Stored amounts are capped below at zero.
    pub fn change_stored_commodity(&mut self, country: CountryId, commodity: CommodityId, change: i64) {
        let stored = self
            .country_mut(country)
            .stored_commodities
            .entry(commodity)
            .or_insert(0);
        *stored = (*stored + change).max(0);
        if *stored == 0 {
            self.country_mut(country).stored_commodities.remove(&commodity);
        }
    }

    pub(crate) fn change_law_cost_modifier(&mut self, country: CountryId, change: i64) {
        self.country_mut(country).law_cost_modifier += change;
    }

    pub(crate) fn change_technology_cost_modifier(&mut self, country: CountryId, change: i64) {
        self.country_mut(country).technology_cost_modifier += change;
    }

    pub(crate) fn change_commodity_output_modifier(
        &mut self,
        country: CountryId,
        commodity: CommodityId,
        change: i64,
    ) {
        change_keyed_value(
            &mut self.country_mut(country).commodity_output_modifiers,
            commodity,
            change,
        );
    }

    pub(crate) fn change_free_building_class(
        &mut self,
        country: CountryId,
        building_class: BuildingClassId,
        change: i64,
    ) {
        change_keyed_value(
            &mut self.country_mut(country).free_building_classes,
            building_class,
            change,
        );
    }

    pub(crate) fn change_storage_capacity(&mut self, country: CountryId, change: i64) {
        self.country_mut(country).storage_capacity += change;
    }

    pub(crate) fn change_diplomatic_penalty_for_expansion(&mut self, country: CountryId, change: Fixed) {
        self.country_mut(country).diplomatic_penalty_for_expansion += change;
    }

    /// Takes a decision for `country` if its conditions hold. The country is
    /// the source scope of the evaluation.
    #[tracing::instrument(skip_all, name = "take_decision")]
    pub fn take_decision(&mut self, country: CountryId, decision: DecisionId) -> bool {
        let db = self.shared_database();
        let entry = db.decisions.get(decision);
        let mut ctx = Context::with_source(country);
        if let Some(conditions) = entry.conditions() {
            if !conditions.check(country, self, ctx.read_only()) {
                log::debug!(
                    "{} cannot take {}",
                    self.country(country).identifier(),
                    db.decisions.identifier(decision)
                );
                return false;
            }
        }
        entry.effects().do_effect(country, self, &mut ctx);
        log::info!(
            "{} took decision {}",
            self.country(country).identifier(),
            db.decisions.identifier(decision)
        );
        true
    }
}
