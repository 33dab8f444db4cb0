//! Conditions available in every scope type.

use super::{AndCondition, ConditionTable, NotCondition, OrCondition, Quantifier, ScopeCondition};
use crate::error::ScriptError;
use crate::navigation::ScopeNavigator;
use crate::scope::{
    CharacterId, CountryId, MilitaryUnitId, PopulationUnitId, ProvinceId, Scope, ScopeKind, SiteId,
};
use gsml::Entry;

pub(crate) fn register_common<S: Scope>(table: &mut ConditionTable<S>) {
    table.register_block("and", |block, db| Ok(Box::new(AndCondition::<S>::from_gsml(block, db)?)));
    table.register_block("or", |block, db| Ok(Box::new(OrCondition::<S>::from_gsml(block, db)?)));
    table.register_block("not", |block, db| Ok(Box::new(NotCondition::<S>::from_gsml(block, db)?)));

    register_context_scopes::<S, CountryId>(table, "source_country", "saved_country_scope");
    register_context_scopes::<S, CharacterId>(table, "source_character", "saved_character_scope");
    register_context_scopes::<S, ProvinceId>(table, "source_province", "saved_province_scope");
    register_context_scopes::<S, SiteId>(table, "source_site", "saved_site_scope");
    register_context_scopes::<S, PopulationUnitId>(
        table,
        "source_population_unit",
        "saved_population_unit_scope",
    );
    register_context_scopes::<S, MilitaryUnitId>(
        table,
        "source_military_unit",
        "saved_military_unit_scope",
    );
}

/// `source_<kind> = { ... }` and `saved_<kind>_scope = { name = x ... }`.
fn register_context_scopes<S: Scope, Inner: Scope>(
    table: &mut ConditionTable<S>,
    source_key: &'static str,
    saved_key: &'static str,
) {
    table.register_scope::<Inner>(
        source_key,
        source_label::<Inner>(),
        ScopeNavigator::Source,
        Quantifier::Any,
    );
    table.register_block(saved_key, move |block, db| {
        let name = block.get_property_value("name").ok_or_else(|| ScriptError::MissingField {
            context: saved_key.to_string(),
            field: "name",
        })?;
        let entries = block
            .entries()
            .filter(|entry| !matches!(entry, Entry::Property(p) if p.key == "name"));
        Ok(Box::new(ScopeCondition::<S, Inner>::from_entries(
            saved_key,
            format!("Saved {} '{}'", Inner::KIND, name),
            ScopeNavigator::Saved(name.to_string()),
            Quantifier::Any,
            entries,
            db,
        )?))
    });
}

fn source_label<Inner: Scope>() -> &'static str {
    match Inner::KIND {
        ScopeKind::Country => "Source country",
        ScopeKind::Character => "Source character",
        ScopeKind::Province => "Source province",
        ScopeKind::Site => "Source site",
        ScopeKind::PopulationUnit => "Source population unit",
        ScopeKind::MilitaryUnit => "Source military unit",
    }
}
