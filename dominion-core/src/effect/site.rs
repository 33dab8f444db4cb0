use super::common::register_common;
use super::{EffectTable, Selection};
use crate::database::Resource;
use crate::navigation::ScopeNavigator;
use crate::scope::SiteId;

pub(crate) fn effect_table() -> EffectTable<SiteId> {
    let mut table = EffectTable::new();
    register_common(&mut table);

    table.register_entry::<Resource>("resource", |game, site, resource| {
        game.set_site_resource(site, Some(resource));
    });
    table.register_scope(
        "province",
        "Province",
        ScopeNavigator::Single(|site, game| Some(game.site(site).province())),
        Selection::All,
    );
    table
}
