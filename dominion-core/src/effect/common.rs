//! Effects available in every scope type.

use super::{Effect, EffectTable, IfEffect, ScopeEffect, Selection};
use crate::context::Context;
use crate::database::require_assignment;
use crate::error::ScriptError;
use crate::game::Game;
use crate::navigation::ScopeNavigator;
use crate::scope::{
    CharacterId, CountryId, MilitaryUnitId, PopulationUnitId, ProvinceId, Scope, ScopeKind, SiteId,
};
use gsml::Entry;

pub(crate) fn register_common<S: Scope>(table: &mut EffectTable<S>) {
    table.register_block("if", |block, db| Ok(Box::new(IfEffect::<S>::from_gsml(block, db)?)));
    table.register_property("save_scope_as", |property, _| {
        require_assignment(property)?;
        if property.value.is_empty() {
            return Err(ScriptError::invalid_value(&property.key, "", "empty scope name"));
        }
        Ok(Box::new(SaveScopeEffect {
            name: property.value.clone(),
        }))
    });

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

fn register_context_scopes<S: Scope, Inner: Scope>(
    table: &mut EffectTable<S>,
    source_key: &'static str,
    saved_key: &'static str,
) {
    table.register_scope::<Inner>(
        source_key,
        source_label::<Inner>(),
        ScopeNavigator::Source,
        Selection::All,
    );
    table.register_block(saved_key, move |block, db| {
        let name = block.get_property_value("name").ok_or_else(|| ScriptError::MissingField {
            context: saved_key.to_string(),
            field: "name",
        })?;
        let entries = block
            .entries()
            .filter(|entry| !matches!(entry, Entry::Property(p) if p.key == "name"));
        Ok(Box::new(ScopeEffect::<S, Inner>::from_entries(
            saved_key,
            format!("Saved {} '{}'", Inner::KIND, name),
            ScopeNavigator::Saved(name.to_string()),
            Selection::All,
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

/// `save_scope_as = name`: binds the current scope for later effects and
/// conditions of the same evaluation.
struct SaveScopeEffect {
    name: String,
}

impl<S: Scope> Effect<S> for SaveScopeEffect {
    fn class_identifier(&self) -> &'static str {
        "save_scope_as"
    }

    fn do_assignment_effect(&self, scope: S, _game: &mut Game, ctx: &mut Context) {
        ctx.save_scope(self.name.clone(), scope);
    }
}

#[cfg(test)]
mod tests {
    use crate::context::Context;
    use crate::effect::{Effect, EffectList};
    use crate::scope::{CharacterId, CountryId};
    use crate::testing::{database_from_text, GameBuilder};

    #[test]
    fn test_saved_scope_across_kinds() {
        let db = database_from_text(&[]);
        let root = gsml::parse_str(
            "ruler = { save_scope_as = old_ruler } \
             saved_character_scope = { name = old_ruler military_skill += 2 } \
             saved_character_scope = { name = nobody military_skill += 100 }",
        )
        .unwrap();
        let effects = EffectList::<CountryId>::from_gsml(&root, &db).unwrap();
        let mut game = GameBuilder::new(db)
            .with_country("ALPHA")
            .with_ruler("ALPHA", "marcus")
            .build();
        let mut ctx = Context::new();
        effects.do_effect(CountryId(0), &mut game, &mut ctx);

        let marcus = game.find_character("marcus").unwrap();
        assert_eq!(game.character(marcus).skill(crate::game::CharacterSkill::Military), 2);
        assert_eq!(
            ctx.read_only().get_saved_scope::<CharacterId>("old_ruler"),
            Ok(Some(marcus))
        );
    }

    #[test]
    fn test_source_scope() {
        let db = database_from_text(&[]);
        let root = gsml::parse_str("source_country = { wealth += 5 }").unwrap();
        let effects = EffectList::<CountryId>::from_gsml(&root, &db).unwrap();
        let mut game = GameBuilder::new(db).with_country("ALPHA").with_country("BETA").build();

        effects.do_effect(CountryId(0), &mut game, &mut Context::new());
        assert_eq!(game.country(CountryId(1)).wealth(), 0);

        effects.do_effect(CountryId(0), &mut game, &mut Context::with_source(CountryId(1)));
        assert_eq!(game.country(CountryId(1)).wealth(), 5);
    }
}
