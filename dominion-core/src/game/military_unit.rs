use super::{Game, ModifierOwner};
use crate::fixed::{Fixed, Millesimal};
use crate::scope::{CharacterId, CountryId, MilitaryUnitId, ProvinceId};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MilitaryUnit {
    identifier: String,
    type_name: String,
    pub(crate) country: Option<CountryId>,
    pub(crate) commander: Option<CharacterId>,
    pub(crate) location: Option<ProvinceId>,
    pub(crate) attack: Fixed,
    pub(crate) defense: Fixed,
    pub(crate) hit_points: Fixed,
    pub(crate) morale: Millesimal,
}

impl MilitaryUnit {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn country(&self) -> Option<CountryId> {
        self.country
    }

    pub fn commander(&self) -> Option<CharacterId> {
        self.commander
    }

    pub fn location(&self) -> Option<ProvinceId> {
        self.location
    }

    pub fn attack(&self) -> Fixed {
        self.attack
    }

    pub fn defense(&self) -> Fixed {
        self.defense
    }

    pub fn hit_points(&self) -> Fixed {
        self.hit_points
    }

    pub fn morale(&self) -> Millesimal {
        self.morale
    }
}

impl Game {
    /// Raises a unit at full hit points and morale.
    pub fn add_military_unit(
        &mut self,
        identifier: &str,
        type_name: &str,
        country: Option<CountryId>,
    ) -> MilitaryUnitId {
        let id = MilitaryUnitId(self.military_units.len() as u32);
        self.military_units.push(MilitaryUnit {
            identifier: identifier.to_string(),
            type_name: type_name.to_string(),
            country,
            commander: None,
            location: None,
            attack: Fixed::ZERO,
            defense: Fixed::ZERO,
            hit_points: Fixed::from_int(100),
            morale: Millesimal::ONE,
        });
        id
    }

    pub fn set_military_unit_location(&mut self, unit: MilitaryUnitId, location: Option<ProvinceId>) {
        self.military_unit_mut(unit).location = location;
    }

    /// Changes the commander. Trait modifiers for commanded units follow the
    /// commander.
    #[tracing::instrument(skip_all, name = "set_commander")]
    pub fn set_commander(&mut self, unit: MilitaryUnitId, commander: Option<CharacterId>) {
        let old = self.military_unit(unit).commander;
        if old == commander {
            return;
        }
        let db = self.shared_database();
        if let Some(old) = old {
            for character_trait in self.character(old).traits.clone() {
                let modifier = db.character_traits.get(character_trait).military_unit_modifier();
                self.deactivate_modifier(ModifierOwner::CommanderTrait(character_trait), unit, modifier);
            }
            self.character_mut(old).commanded_units.retain(|u| *u != unit);
        }
        self.military_unit_mut(unit).commander = commander;
        if let Some(new) = commander {
            self.character_mut(new).commanded_units.push(unit);
            for character_trait in self.character(new).traits.clone() {
                let modifier = db.character_traits.get(character_trait).military_unit_modifier();
                self.activate_modifier(ModifierOwner::CommanderTrait(character_trait), unit, modifier);
            }
        }
    }

    pub fn change_hit_points(&mut self, unit: MilitaryUnitId, change: Fixed) {
        self.military_unit_mut(unit).hit_points += change;
    }

    pub fn change_morale(&mut self, unit: MilitaryUnitId, change: Millesimal) {
        self.military_unit_mut(unit).morale += change;
    }

    pub(crate) fn change_attack(&mut self, unit: MilitaryUnitId, change: Fixed) {
        self.military_unit_mut(unit).attack += change;
    }

    pub(crate) fn change_defense(&mut self, unit: MilitaryUnitId, change: Fixed) {
        self.military_unit_mut(unit).defense += change;
    }
}
