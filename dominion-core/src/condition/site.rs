use super::common::register_common;
use super::{ConditionTable, Quantifier};
use crate::database::Resource;
use crate::navigation::ScopeNavigator;
use crate::scope::SiteId;

pub(crate) fn condition_table() -> ConditionTable<SiteId> {
    let mut table = ConditionTable::new();
    register_common(&mut table);

    table.register_entry::<Resource>("resource", |site, game, resource| {
        game.site(site).resource() == Some(resource)
    });
    table.register_scope(
        "province",
        "Province",
        ScopeNavigator::Single(|site, game| Some(game.site(site).province())),
        Quantifier::Any,
    );
    table
}
