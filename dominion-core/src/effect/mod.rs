//! Scripted mutations of game state.
//!
//! Like conditions, effects are built once at load time through the
//! [`EffectTable`] of their scope type. Running an effect mutates the
//! [`Game`]; describing it never does.

pub mod character;
pub mod common;
pub mod country;
pub mod effect_list;
pub mod if_effect;
pub mod leaf;
pub mod military_unit;
pub mod population_unit;
pub mod province;
pub mod scope_effect;
pub mod site;

pub use effect_list::EffectList;
pub use if_effect::IfEffect;
pub use leaf::{EntryEffect, NumericalEffect};
pub use scope_effect::{ScopeEffect, Selection};

use crate::condition::indent_prefix;
use crate::context::{Context, ReadOnlyContext};
use crate::database::{DataEntry, Database};
use crate::error::ScriptError;
use crate::game::Game;
use crate::navigation::ScopeNavigator;
use crate::scope::Scope;
use gsml::{GsmlData, GsmlOperator, GsmlProperty};
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectOperator {
    Assignment,
    Addition,
    Subtraction,
}

impl EffectOperator {
    pub fn from_gsml(operator: GsmlOperator) -> Option<Self> {
        match operator {
            GsmlOperator::Assignment => Some(EffectOperator::Assignment),
            GsmlOperator::Addition => Some(EffectOperator::Addition),
            GsmlOperator::Subtraction => Some(EffectOperator::Subtraction),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EffectOperator::Assignment => "=",
            EffectOperator::Addition => "+=",
            EffectOperator::Subtraction => "-=",
        }
    }
}

impl fmt::Display for EffectOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn effect_operator(property: &GsmlProperty) -> Result<EffectOperator, ScriptError> {
    EffectOperator::from_gsml(property.operator).ok_or_else(|| ScriptError::InvalidOperator {
        key: property.key.clone(),
        operator: property.operator,
    })
}

/// Factories reject operators a class does not support, so reaching this is
/// a programming error.
fn unsupported_operator(class_identifier: &str, operator: EffectOperator) {
    log::error!("Operator '{}' is not supported by '{}'", operator, class_identifier);
    debug_assert!(false, "unsupported operator {} for {}", operator, class_identifier);
}

/// A typed mutation of a scope.
///
/// Leaves override the `do_*_effect` methods for the operators they
/// support, and the matching `get_*_string` methods. Composites override
/// [`do_assignment_effect`](Self::do_assignment_effect) and
/// [`get_string`](Self::get_string).
pub trait Effect<S: Scope>: Send + Sync {
    fn class_identifier(&self) -> &'static str;

    fn operator(&self) -> EffectOperator {
        EffectOperator::Assignment
    }

    fn do_effect(&self, scope: S, game: &mut Game, ctx: &mut Context) {
        match self.operator() {
            EffectOperator::Assignment => self.do_assignment_effect(scope, game, ctx),
            EffectOperator::Addition => self.do_addition_effect(scope, game, ctx),
            EffectOperator::Subtraction => self.do_subtraction_effect(scope, game, ctx),
        }
    }

    fn do_assignment_effect(&self, _scope: S, _game: &mut Game, _ctx: &mut Context) {
        unsupported_operator(self.class_identifier(), EffectOperator::Assignment);
    }

    fn do_addition_effect(&self, _scope: S, _game: &mut Game, _ctx: &mut Context) {
        unsupported_operator(self.class_identifier(), EffectOperator::Addition);
    }

    fn do_subtraction_effect(&self, _scope: S, _game: &mut Game, _ctx: &mut Context) {
        unsupported_operator(self.class_identifier(), EffectOperator::Subtraction);
    }

    /// The projected change, e.g. `+10` for `wealth += 10`.
    fn get_assignment_string(&self, _scope: S, _game: &Game, _ctx: &ReadOnlyContext) -> String {
        String::new()
    }

    fn get_addition_string(&self, _scope: S, _game: &Game, _ctx: &ReadOnlyContext) -> String {
        String::new()
    }

    fn get_subtraction_string(&self, _scope: S, _game: &Game, _ctx: &ReadOnlyContext) -> String {
        String::new()
    }

    /// Tooltip text. Reads the current state of `scope`, never mutates it.
    /// An empty string means the effect has nothing to show.
    fn get_string(
        &self,
        scope: S,
        game: &Game,
        ctx: &ReadOnlyContext,
        indent: usize,
        prefix: &str,
    ) -> String {
        let text = match self.operator() {
            EffectOperator::Assignment => self.get_assignment_string(scope, game, ctx),
            EffectOperator::Addition => self.get_addition_string(scope, game, ctx),
            EffectOperator::Subtraction => self.get_subtraction_string(scope, game, ctx),
        };
        if text.is_empty() {
            return text;
        }
        format!("{}{}{}", indent_prefix(indent), prefix, text)
    }

    /// Desirability of the effect for whoever takes it.
    fn score(&self) -> i64 {
        0
    }

    fn check_validity(&self, _db: &Database) -> Result<(), ScriptError> {
        Ok(())
    }
}

type PropertyFactory<S> =
    Box<dyn Fn(&GsmlProperty, &Database) -> Result<Box<dyn Effect<S>>, ScriptError> + Send + Sync>;
type BlockFactory<S> =
    Box<dyn Fn(&GsmlData, &Database) -> Result<Box<dyn Effect<S>>, ScriptError> + Send + Sync>;

/// Script key to effect constructors for one scope type.
pub struct EffectTable<S: Scope> {
    properties: FxHashMap<&'static str, PropertyFactory<S>>,
    blocks: FxHashMap<&'static str, BlockFactory<S>>,
}

impl<S: Scope> Default for EffectTable<S> {
    fn default() -> Self {
        Self {
            properties: FxHashMap::default(),
            blocks: FxHashMap::default(),
        }
    }
}

impl<S: Scope> EffectTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_property<F>(&mut self, key: &'static str, factory: F)
    where
        F: Fn(&GsmlProperty, &Database) -> Result<Box<dyn Effect<S>>, ScriptError>
            + Send
            + Sync
            + 'static,
    {
        let previous = self.properties.insert(key, Box::new(factory));
        debug_assert!(previous.is_none(), "{} effect '{}' registered twice", S::KIND, key);
    }

    pub fn register_block<F>(&mut self, key: &'static str, factory: F)
    where
        F: Fn(&GsmlData, &Database) -> Result<Box<dyn Effect<S>>, ScriptError>
            + Send
            + Sync
            + 'static,
    {
        let previous = self.blocks.insert(key, Box::new(factory));
        debug_assert!(previous.is_none(), "{} effect block '{}' registered twice", S::KIND, key);
    }

    /// `key = <entry>`
    pub fn register_entry<T: DataEntry>(&mut self, key: &'static str, apply: fn(&mut Game, S, T::Id)) {
        self.register_property(key, move |property, db| {
            Ok(Box::new(EntryEffect::<S, T>::from_property(key, property, db, apply)?))
        });
    }

    /// `key = n`, `key += n` and `key -= n` on one quantity of the scope.
    pub fn register_numerical<V: leaf::EffectValue>(
        &mut self,
        key: &'static str,
        current: fn(S, &Game) -> V,
        change: fn(&mut Game, S, V),
    ) {
        self.register_property(key, move |property, db| {
            Ok(Box::new(NumericalEffect::from_property(key, property, db, current, change)?))
        });
    }

    /// `key = { [conditions = { ... }] <effects> }` run on related scopes.
    pub fn register_scope<Inner: Scope>(
        &mut self,
        key: &'static str,
        label: &'static str,
        navigator: ScopeNavigator<S, Inner>,
        selection: Selection,
    ) {
        self.register_block(key, move |block, db| {
            Ok(Box::new(ScopeEffect::from_entries(
                key,
                label.to_string(),
                navigator.clone(),
                selection,
                block.entries(),
                db,
            )?))
        });
    }

    pub fn contains_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn contains_block(&self, key: &str) -> bool {
        self.blocks.contains_key(key)
    }
}

pub fn effect_from_property<S: Scope>(
    property: &GsmlProperty,
    db: &Database,
) -> Result<Box<dyn Effect<S>>, ScriptError> {
    match S::effect_table().properties.get(property.key.as_str()) {
        Some(factory) => factory(property, db),
        None => Err(ScriptError::UnknownEffect {
            scope: S::KIND,
            key: property.key.clone(),
        }),
    }
}

pub fn effect_from_block<S: Scope>(
    block: &GsmlData,
    db: &Database,
) -> Result<Box<dyn Effect<S>>, ScriptError> {
    let tag = block.tag_or_empty();
    let Some(factory) = S::effect_table().blocks.get(tag) else {
        return Err(ScriptError::UnknownEffect {
            scope: S::KIND,
            key: tag.to_string(),
        });
    };
    if block.operator() != GsmlOperator::Assignment {
        return Err(ScriptError::InvalidOperator {
            key: tag.to_string(),
            operator: block.operator(),
        });
    }
    factory(block, db)
}
