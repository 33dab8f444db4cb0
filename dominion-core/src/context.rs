//! Per-evaluation bags of bound scopes.
//!
//! A context is built fresh by the caller for each top-level check or effect
//! and dropped afterwards. Conditions only ever see a [`ReadOnlyContext`];
//! effects get a [`Context`], which adds the mutation entry points.

use crate::error::ContextError;
use crate::scope::{SavedScope, Scope};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadOnlyContext {
    source_scope: Option<SavedScope>,
    saved_scopes: FxHashMap<String, SavedScope>,
}

impl ReadOnlyContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source<S: Scope>(source: S) -> Self {
        Self {
            source_scope: Some(source.into_saved()),
            saved_scopes: FxHashMap::default(),
        }
    }

    pub fn source_scope(&self) -> Option<SavedScope> {
        self.source_scope
    }

    pub fn saved_scopes(&self) -> &FxHashMap<String, SavedScope> {
        &self.saved_scopes
    }

    /// Typed access to the source scope.
    pub fn get_source_scope<T: Scope>(&self) -> Result<Option<T>, ContextError> {
        self.source_scope
            .map(|saved| Self::downcast(saved, "source"))
            .transpose()
    }

    /// Looks up a named binding. A binding of another scope kind is an error,
    /// never a silent reinterpretation.
    pub fn get_saved_scope<T: Scope>(&self, name: &str) -> Result<Option<T>, ContextError> {
        self.saved_scopes
            .get(name)
            .map(|saved| Self::downcast(*saved, name))
            .transpose()
    }

    fn downcast<T: Scope>(saved: SavedScope, name: &str) -> Result<T, ContextError> {
        T::from_saved(saved).ok_or_else(|| ContextError::ScopeTypeMismatch {
            name: name.to_string(),
            expected: T::KIND,
            found: saved.kind(),
        })
    }
}

/// A context that effects may modify.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    inner: ReadOnlyContext,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source<S: Scope>(source: S) -> Self {
        Self {
            inner: ReadOnlyContext::with_source(source),
        }
    }

    pub fn read_only(&self) -> &ReadOnlyContext {
        &self.inner
    }

    pub fn into_read_only(self) -> ReadOnlyContext {
        self.inner
    }

    pub fn set_source_scope<S: Scope>(&mut self, source: S) {
        self.inner.source_scope = Some(source.into_saved());
    }

    pub fn save_scope<S: Scope>(&mut self, name: impl Into<String>, scope: S) {
        self.inner.saved_scopes.insert(name.into(), scope.into_saved());
    }

    pub fn remove_saved_scope(&mut self, name: &str) -> Option<SavedScope> {
        self.inner.saved_scopes.remove(name)
    }
}

/// Resolves a lookup result for the engine: a kind mismatch is a
/// programming error, so it is logged, asserted in debug builds and treated
/// as absence otherwise.
pub(crate) fn resolve_or_absent<T: Scope>(result: Result<Option<T>, ContextError>) -> Option<T> {
    match result {
        Ok(scope) => scope,
        Err(e) => {
            log::error!("{}", e);
            debug_assert!(false, "{}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{CharacterId, CountryId, ScopeKind};

    #[test]
    fn test_saved_scopes() {
        let mut ctx = Context::with_source(CountryId(1));
        ctx.save_scope("heir", CharacterId(4));

        let ro = ctx.read_only();
        assert_eq!(ro.get_source_scope::<CountryId>(), Ok(Some(CountryId(1))));
        assert_eq!(ro.get_saved_scope::<CharacterId>("heir"), Ok(Some(CharacterId(4))));
        assert_eq!(ro.get_saved_scope::<CharacterId>("missing"), Ok(None));

        assert_eq!(ctx.remove_saved_scope("heir"), Some(SavedScope::Character(CharacterId(4))));
        assert_eq!(ctx.read_only().get_saved_scope::<CharacterId>("heir"), Ok(None));
    }

    #[test]
    fn test_type_mismatch_is_an_error() {
        let mut ctx = Context::new();
        ctx.save_scope("target", CountryId(2));
        assert_eq!(
            ctx.read_only().get_saved_scope::<CharacterId>("target"),
            Err(ContextError::ScopeTypeMismatch {
                name: "target".to_string(),
                expected: ScopeKind::Character,
                found: ScopeKind::Country,
            })
        );
    }

    #[test]
    fn test_no_source_is_absence() {
        let ctx = ReadOnlyContext::new();
        assert_eq!(ctx.get_source_scope::<CountryId>(), Ok(None));
        assert!(ctx.saved_scopes().is_empty());
    }
}
