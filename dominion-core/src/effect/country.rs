use super::common::register_common;
use super::leaf::signed;
use super::{Effect, EffectTable, Selection};
use crate::condition::country::neighbor_countries;
use crate::condition::NumericValue;
use crate::context::{Context, ReadOnlyContext};
use crate::database::{
    parse_int, require_assignment, unexpected_entry, CommodityId, DataEntry, Database, DomainTier,
    GovernmentType, Law, Technology,
};
use crate::error::ScriptError;
use crate::game::Game;
use crate::navigation::ScopeNavigator;
use crate::scope::CountryId;
use gsml::{Entry, GsmlData};

pub(crate) fn effect_table() -> EffectTable<CountryId> {
    let mut table = EffectTable::new();
    register_common(&mut table);

    table.register_numerical(
        "wealth",
        |country, game| game.country(country).wealth(),
        |game, country, change| game.change_wealth(country, change),
    );
    table.register_block("commodity", |block, db| Ok(Box::new(CommodityEffect::from_gsml(block, db)?)));
    table.register_entry::<Technology>("gain_technology", |game, country, technology| {
        game.add_technology(country, technology);
    });
    table.register_entry::<Technology>("lose_technology", |game, country, technology| {
        game.remove_technology(country, technology);
    });
    table.register_entry::<Law>("law", |game, country, law| game.set_law(country, law));
    table.register_entry::<GovernmentType>("government_type", |game, country, government_type| {
        game.set_government_type(country, Some(government_type));
    });
    table.register_property("tier", |property, db| {
        require_assignment(property)?;
        let tier = DomainTier::parse_value(&property.value, db)
            .map_err(|reason| ScriptError::invalid_value(&property.key, &property.value, reason))?;
        Ok(Box::new(TierEffect { tier }))
    });

    table.register_scope(
        "ruler",
        "Ruler",
        ScopeNavigator::Single(|country, game| game.country(country).ruler()),
        Selection::All,
    );
    table.register_scope(
        "capital",
        "Capital",
        ScopeNavigator::Single(|country, game| game.country(country).capital()),
        Selection::All,
    );
    table.register_scope(
        "overlord",
        "Overlord",
        ScopeNavigator::Single(|country, game| game.country(country).overlord()),
        Selection::All,
    );
    table.register_scope(
        "every_known_country",
        "Every known country",
        ScopeNavigator::Collection(known_countries),
        Selection::All,
    );
    table.register_scope(
        "random_known_country",
        "Random known country",
        ScopeNavigator::Collection(known_countries),
        Selection::Random,
    );
    table.register_scope(
        "every_neighbor_country",
        "Every neighbor country",
        ScopeNavigator::Collection(neighbor_countries),
        Selection::All,
    );
    table.register_scope(
        "random_neighbor_country",
        "Random neighbor country",
        ScopeNavigator::Collection(neighbor_countries),
        Selection::Random,
    );
    table.register_scope(
        "every_subject_country",
        "Every subject country",
        ScopeNavigator::Collection(subject_countries),
        Selection::All,
    );
    table.register_scope(
        "random_subject_country",
        "Random subject country",
        ScopeNavigator::Collection(subject_countries),
        Selection::Random,
    );
    table.register_scope(
        "every_province",
        "Every province",
        ScopeNavigator::Collection(provinces),
        Selection::All,
    );
    table.register_scope(
        "random_province",
        "Random province",
        ScopeNavigator::Collection(provinces),
        Selection::Random,
    );
    table
}

fn known_countries(country: CountryId, game: &Game) -> Vec<CountryId> {
    game.country(country).known_countries().iter().copied().collect()
}

fn subject_countries(country: CountryId, game: &Game) -> Vec<CountryId> {
    game.country(country).subjects().iter().copied().collect()
}

fn provinces(country: CountryId, game: &Game) -> Vec<crate::scope::ProvinceId> {
    game.country(country).provinces().to_vec()
}

/// `tier = <tier>`
struct TierEffect {
    tier: DomainTier,
}

impl Effect<CountryId> for TierEffect {
    fn class_identifier(&self) -> &'static str {
        "tier"
    }

    fn do_assignment_effect(&self, scope: CountryId, game: &mut Game, _ctx: &mut Context) {
        game.set_tier(scope, self.tier);
    }

    fn get_assignment_string(&self, _scope: CountryId, _game: &Game, _ctx: &ReadOnlyContext) -> String {
        format!("Tier: {}", self.tier)
    }
}

/// `commodity = { commodity = grain value = 10 }`: changes the stored
/// amount. Storage never goes below zero.
struct CommodityEffect {
    commodity: CommodityId,
    value: i64,
}

impl CommodityEffect {
    fn from_gsml(block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let mut commodity = None;
        let mut value = None;
        for entry in block.entries() {
            match entry {
                Entry::Property(p) if p.key == "commodity" => {
                    require_assignment(p)?;
                    commodity = Some(db.commodities.get_id(&p.value)?);
                }
                Entry::Property(p) if p.key == "value" => {
                    require_assignment(p)?;
                    value = Some(parse_int(p)?);
                }
                other => return Err(unexpected_entry(other)),
            }
        }
        let missing = |field| ScriptError::MissingField {
            context: "commodity".to_string(),
            field,
        };
        Ok(Self {
            commodity: commodity.ok_or_else(|| missing("commodity"))?,
            value: value.ok_or_else(|| missing("value"))?,
        })
    }
}

impl Effect<CountryId> for CommodityEffect {
    fn class_identifier(&self) -> &'static str {
        "commodity"
    }

    fn do_assignment_effect(&self, scope: CountryId, game: &mut Game, _ctx: &mut Context) {
        game.change_stored_commodity(scope, self.commodity, self.value);
    }

    fn get_assignment_string(&self, _scope: CountryId, game: &Game, _ctx: &ReadOnlyContext) -> String {
        let commodity = game.database().commodities.get(self.commodity);
        format!("Stored {}: {}", commodity.name(), signed(self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectList;
    use crate::testing::{database_from_text, GameBuilder};

    const CONTENT: &[(&str, &str)] = &[
        ("commodities", "grain = { }"),
        ("technologies", "gunpowder = { modifier = { law_cost_modifier = 10 } }"),
        ("government_groups", "republic = { }"),
        ("government_types", "merchant_republic = { group = republic }"),
    ];

    #[test]
    fn test_country_effects() {
        let db = database_from_text(CONTENT);
        let root = gsml::parse_str(
            "gain_technology = gunpowder tier = duchy \
             government_type = merchant_republic \
             commodity = { commodity = grain value = 10 }",
        )
        .unwrap();
        let effects = EffectList::<CountryId>::from_gsml(&root, &db).unwrap();
        let mut game = GameBuilder::new(db).with_country("ALPHA").build();
        let alpha = CountryId(0);
        assert_eq!(
            effects.get_string(alpha, &game, &ReadOnlyContext::new(), 0, ""),
            "Gain Technology: Gunpowder\nTier: Duchy\nGovernment Type: Merchant Republic\nStored Grain: +10"
        );

        effects.do_effect(alpha, &mut game, &mut Context::new());
        let db = game.database();
        let country = game.country(alpha);
        assert!(country.has_technology(db.technologies.get_id("gunpowder").unwrap()));
        assert_eq!(country.law_cost_modifier(), 10);
        assert_eq!(country.tier(), DomainTier::Duchy);
        assert_eq!(
            country.government_type(),
            Some(db.government_types.get_id("merchant_republic").unwrap())
        );
        assert_eq!(country.stored_commodity(db.commodities.get_id("grain").unwrap()), 10);
    }

    #[test]
    fn test_commodity_storage_floors_at_zero() {
        let db = database_from_text(CONTENT);
        let root = gsml::parse_str("commodity = { commodity = grain value = -5 }").unwrap();
        let effects = EffectList::<CountryId>::from_gsml(&root, &db).unwrap();
        let mut game = GameBuilder::new(db).with_country("ALPHA").build();
        effects.do_effect(CountryId(0), &mut game, &mut Context::new());
        let grain = game.database().commodities.get_id("grain").unwrap();
        assert_eq!(game.country(CountryId(0)).stored_commodity(grain), 0);
    }

    #[test]
    fn test_unknown_entry_is_a_load_error() {
        let db = database_from_text(CONTENT);
        let root = gsml::parse_str("gain_technology = steam_engine").unwrap();
        let err = EffectList::<CountryId>::from_gsml(&root, &db).err().unwrap();
        assert!(matches!(err, ScriptError::UnknownIdentifier { category: "technologies", .. }));
    }
}
