//! Fixtures for tests: a fluent [`Game`] builder and in-memory content.
//!
//! The builder looks everything up by identifier and panics on a typo, so
//! a broken fixture fails the test that uses it.

use crate::config::{GameConfig, GameDefines};
use crate::database::{ContentBlocks, DataEntry, Database, DomainTier, Registry};
use crate::game::Game;
use crate::scope::{CountryId, ProvinceId};
use std::sync::Arc;

/// Builds a database from `(category, text)` pairs, e.g.
/// `("technologies", "gunpowder = { }")`.
pub fn database_from_text(categories: &[(&str, &str)]) -> Database {
    let content: ContentBlocks = categories
        .iter()
        .map(|(category, text)| {
            let data = gsml::parse_str(text)
                .unwrap_or_else(|e| panic!("invalid {} fixture: {}", category, e));
            (category.to_string(), data)
        })
        .collect();
    Database::from_gsml(GameDefines::default(), &content)
        .unwrap_or_else(|e| panic!("invalid fixture content: {}", e))
}

pub struct GameBuilder {
    game: Game,
}

impl GameBuilder {
    pub fn new(db: Database) -> Self {
        Self::with_config(db, GameConfig::default())
    }

    pub fn with_config(db: Database, config: GameConfig) -> Self {
        Self {
            game: Game::new(Arc::new(db), config),
        }
    }

    /// A game over an empty database.
    pub fn empty() -> Self {
        Self::new(Database::default())
    }

    fn country(&self, identifier: &str) -> CountryId {
        self.game
            .find_country(identifier)
            .unwrap_or_else(|| panic!("no country '{}' in builder", identifier))
    }

    fn province(&self, identifier: &str) -> ProvinceId {
        self.game
            .find_province(identifier)
            .unwrap_or_else(|| panic!("no province '{}' in builder", identifier))
    }

    fn entry<T: DataEntry>(&self, identifier: &str) -> T::Id {
        let registry: &Registry<T> = T::registry(self.game.database());
        registry
            .get_id(identifier)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn with_country(mut self, identifier: &str) -> Self {
        self.game.add_country(identifier);
        self
    }

    pub fn with_neighbors(mut self, a: &str, b: &str) -> Self {
        let (a, b) = (self.country(a), self.country(b));
        self.game.add_neighbor(a, b);
        self
    }

    pub fn with_subject(mut self, overlord: &str, subject: &str) -> Self {
        let (overlord, subject) = (self.country(overlord), self.country(subject));
        self.game.set_overlord(subject, Some(overlord));
        self
    }

    pub fn with_tier(mut self, country: &str, tier: DomainTier) -> Self {
        let country = self.country(country);
        self.game.set_tier(country, tier);
        self
    }

    pub fn with_wealth(mut self, country: &str, wealth: i64) -> Self {
        let country = self.country(country);
        self.game.set_wealth(country, wealth);
        self
    }

    pub fn with_technology(mut self, country: &str, technology: &str) -> Self {
        let country = self.country(country);
        let technology = self.entry::<crate::database::Technology>(technology);
        self.game.add_technology(country, technology);
        self
    }

    pub fn with_government_type(mut self, country: &str, government_type: &str) -> Self {
        let country = self.country(country);
        let government_type = self.entry::<crate::database::GovernmentType>(government_type);
        self.game.set_government_type(country, Some(government_type));
        self
    }

    pub fn with_law(mut self, country: &str, law: &str) -> Self {
        let country = self.country(country);
        let law = self.entry::<crate::database::Law>(law);
        self.game.set_law(country, law);
        self
    }

    pub fn with_character(mut self, identifier: &str, country: Option<&str>) -> Self {
        let country = country.map(|c| self.country(c));
        self.game.add_character(identifier, country);
        self
    }

    /// Adds a character employed by `country` and makes them its ruler.
    pub fn with_ruler(mut self, country: &str, identifier: &str) -> Self {
        let country = self.country(country);
        let ruler = self.game.add_character(identifier, Some(country));
        self.game.set_ruler(country, Some(ruler));
        self
    }

    pub fn with_province(mut self, identifier: &str, owner: Option<&str>) -> Self {
        let owner = owner.map(|c| self.country(c));
        let province = self.game.add_province(identifier);
        self.game.set_province_owner(province, owner);
        self
    }

    pub fn with_capital(mut self, country: &str, province: &str) -> Self {
        let (country, province) = (self.country(country), self.province(province));
        self.game.set_capital(country, Some(province));
        self
    }

    pub fn with_province_culture(mut self, province: &str, culture: &str) -> Self {
        let province = self.province(province);
        let culture = self.entry::<crate::database::Culture>(culture);
        self.game.set_province_culture(province, Some(culture));
        self
    }

    pub fn with_province_religion(mut self, province: &str, religion: &str) -> Self {
        let province = self.province(province);
        let religion = self.entry::<crate::database::Religion>(religion);
        self.game.set_province_religion(province, Some(religion));
        self
    }

    pub fn with_site(mut self, identifier: &str, province: &str, resource: Option<&str>) -> Self {
        let province = self.province(province);
        let resource = resource.map(|r| self.entry::<crate::database::Resource>(r));
        let site = self.game.add_site(identifier, province);
        self.game.set_site_resource(site, resource);
        self
    }

    pub fn with_population_unit(
        mut self,
        province: &str,
        population_type: &str,
        culture: &str,
        religion: &str,
    ) -> Self {
        let province = self.province(province);
        let population_type = self.entry::<crate::database::PopulationType>(population_type);
        let culture = self.entry::<crate::database::Culture>(culture);
        let religion = self.entry::<crate::database::Religion>(religion);
        self.game
            .add_population_unit(population_type, culture, religion, province);
        self
    }

    pub fn with_military_unit(mut self, identifier: &str, country: &str) -> Self {
        let country = self.country(country);
        self.game.add_military_unit(identifier, "infantry", Some(country));
        self
    }

    pub fn build(self) -> Game {
        self.game
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_wires_relations() {
        let game = GameBuilder::empty()
            .with_country("ALPHA")
            .with_country("BETA")
            .with_neighbors("ALPHA", "BETA")
            .with_subject("ALPHA", "BETA")
            .with_province("latium", Some("ALPHA"))
            .with_capital("ALPHA", "latium")
            .with_ruler("ALPHA", "marcus")
            .build();
        let (alpha, beta) = (CountryId(0), CountryId(1));
        assert!(game.country(alpha).neighbors().contains(&beta));
        assert!(game.country(beta).neighbors().contains(&alpha));
        assert_eq!(game.country(beta).overlord(), Some(alpha));
        assert_eq!(game.country(alpha).capital(), game.find_province("latium"));
        assert_eq!(game.country(alpha).ruler(), game.find_character("marcus"));
    }

    #[test]
    #[should_panic(expected = "no country 'GAMMA'")]
    fn test_unknown_country_panics() {
        GameBuilder::empty().with_country("ALPHA").with_neighbors("ALPHA", "GAMMA");
    }
}
