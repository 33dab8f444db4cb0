//! Moving from one scope to related scopes.
//!
//! Scope conditions and scope effects share these navigators. Collections
//! are always returned sorted by identifier, so iteration order (and which
//! element a random pick lands on for a given seed) only depends on content.

use crate::context::{resolve_or_absent, ReadOnlyContext};
use crate::game::Game;
use crate::scope::{sort_by_identifier, Scope};

pub enum ScopeNavigator<Outer, Inner> {
    /// A single related scope, e.g. a country's ruler.
    Single(fn(Outer, &Game) -> Option<Inner>),
    /// Every related scope, e.g. a country's neighbors.
    Collection(fn(Outer, &Game) -> Vec<Inner>),
    /// The context's source scope.
    Source,
    /// A scope saved in the context under a name.
    Saved(String),
}

impl<Outer, Inner> Clone for ScopeNavigator<Outer, Inner> {
    fn clone(&self) -> Self {
        match self {
            ScopeNavigator::Single(f) => ScopeNavigator::Single(*f),
            ScopeNavigator::Collection(f) => ScopeNavigator::Collection(*f),
            ScopeNavigator::Source => ScopeNavigator::Source,
            ScopeNavigator::Saved(name) => ScopeNavigator::Saved(name.clone()),
        }
    }
}

impl<Outer: Scope, Inner: Scope> ScopeNavigator<Outer, Inner> {
    pub fn is_collection(&self) -> bool {
        matches!(self, ScopeNavigator::Collection(_))
    }

    /// Every scope reached from `outer`. Absent scopes resolve to nothing.
    pub fn resolve(&self, outer: Outer, game: &Game, ctx: &ReadOnlyContext) -> Vec<Inner> {
        match self {
            ScopeNavigator::Single(f) => f(outer, game).into_iter().collect(),
            ScopeNavigator::Collection(f) => {
                let mut scopes = f(outer, game);
                sort_by_identifier(&mut scopes, game);
                scopes
            }
            ScopeNavigator::Source => resolve_or_absent(ctx.get_source_scope::<Inner>())
                .into_iter()
                .collect(),
            ScopeNavigator::Saved(name) => resolve_or_absent(ctx.get_saved_scope::<Inner>(name))
                .into_iter()
                .collect(),
        }
    }
}
