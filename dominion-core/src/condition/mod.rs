//! Scripted predicates over scopes.
//!
//! Conditions are built once at load time from GSML blocks by dispatching on
//! each key through the [`ConditionTable`] of the scope type, and are
//! immutable afterwards. `check` never mutates anything, so any number of
//! read-only evaluations may share a condition tree.

pub mod character;
pub mod common;
pub mod composite;
pub mod country;
pub mod leaf;
pub mod military_unit;
pub mod numerical;
pub mod population_unit;
pub mod province;
pub mod scope_condition;
pub mod site;

pub use composite::{AndCondition, NotCondition, OrCondition};
pub use leaf::{EntryCondition, FlagCondition};
pub use numerical::{NumericValue, NumericalCondition, NumericalSource};
pub use scope_condition::{Quantifier, ScopeCondition};

use crate::context::ReadOnlyContext;
use crate::database::{DataEntry, Database};
use crate::error::ScriptError;
use crate::game::Game;
use crate::navigation::ScopeNavigator;
use crate::scope::Scope;
use gsml::{GsmlData, GsmlOperator, GsmlProperty};
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionOperator {
    /// `=`: the condition holds. Numerical conditions read it as equality.
    Assignment,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl ConditionOperator {
    pub fn from_gsml(operator: GsmlOperator) -> Option<Self> {
        match operator {
            GsmlOperator::Assignment => Some(ConditionOperator::Assignment),
            GsmlOperator::Equality => Some(ConditionOperator::Equal),
            GsmlOperator::Inequality => Some(ConditionOperator::NotEqual),
            GsmlOperator::LessThan => Some(ConditionOperator::Less),
            GsmlOperator::LessThanOrEqual => Some(ConditionOperator::LessOrEqual),
            GsmlOperator::GreaterThan => Some(ConditionOperator::Greater),
            GsmlOperator::GreaterThanOrEqual => Some(ConditionOperator::GreaterOrEqual),
            GsmlOperator::Addition | GsmlOperator::Subtraction => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConditionOperator::Assignment => "=",
            ConditionOperator::Equal => "==",
            ConditionOperator::NotEqual => "!=",
            ConditionOperator::Less => "<",
            ConditionOperator::LessOrEqual => "<=",
            ConditionOperator::Greater => ">",
            ConditionOperator::GreaterOrEqual => ">=",
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(
            self,
            ConditionOperator::Assignment | ConditionOperator::Equal | ConditionOperator::NotEqual
        )
    }

    /// `lhs <op> rhs`, with assignment meaning equality.
    pub fn compare<T: Ord>(self, lhs: T, rhs: T) -> bool {
        match self {
            ConditionOperator::Assignment | ConditionOperator::Equal => lhs == rhs,
            ConditionOperator::NotEqual => lhs != rhs,
            ConditionOperator::Less => lhs < rhs,
            ConditionOperator::LessOrEqual => lhs <= rhs,
            ConditionOperator::Greater => lhs > rhs,
            ConditionOperator::GreaterOrEqual => lhs >= rhs,
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator of a property, for conditions that only support equality forms.
pub(crate) fn equality_operator(property: &GsmlProperty) -> Result<ConditionOperator, ScriptError> {
    ConditionOperator::from_gsml(property.operator)
        .filter(|operator| operator.is_equality())
        .ok_or_else(|| ScriptError::InvalidOperator {
            key: property.key.clone(),
            operator: property.operator,
        })
}

/// Operator of a property, for comparisons.
pub(crate) fn comparison_operator(property: &GsmlProperty) -> Result<ConditionOperator, ScriptError> {
    ConditionOperator::from_gsml(property.operator).ok_or_else(|| ScriptError::InvalidOperator {
        key: property.key.clone(),
        operator: property.operator,
    })
}

pub(crate) fn indent_prefix(indent: usize) -> String {
    "\t".repeat(indent)
}

/// A typed predicate over a scope.
///
/// Implementations override [`check_assignment`](Self::check_assignment),
/// the "condition holds" form. The default [`check`](Self::check) derives
/// `==` and `!=` from it. Classes that give other operators a meaning
/// (numerical comparisons) override `check` itself; for the rest, the
/// factories reject those operators at load time.
pub trait Condition<S: Scope>: Send + Sync {
    /// Script key this condition is dispatched on.
    fn class_identifier(&self) -> &'static str;

    fn operator(&self) -> ConditionOperator {
        ConditionOperator::Assignment
    }

    fn check(&self, scope: S, game: &Game, ctx: &ReadOnlyContext) -> bool {
        match self.operator() {
            ConditionOperator::Assignment | ConditionOperator::Equal => {
                self.check_assignment(scope, game, ctx)
            }
            ConditionOperator::NotEqual => !self.check_assignment(scope, game, ctx),
            operator => {
                log::error!(
                    "Operator '{}' is not supported by '{}'",
                    operator,
                    self.class_identifier()
                );
                debug_assert!(false, "unsupported operator {} for {}", operator, self.class_identifier());
                false
            }
        }
    }

    fn check_assignment(&self, scope: S, game: &Game, ctx: &ReadOnlyContext) -> bool;

    /// Called once every database entry is defined.
    fn check_validity(&self, _db: &Database) -> Result<(), ScriptError> {
        Ok(())
    }

    /// Describes what the condition requires, e.g. `Technology: Gunpowder`.
    fn get_assignment_string(&self, game: &Game) -> String;

    /// Tooltip text, one line per leaf, nested blocks indented with tabs.
    fn get_string(&self, game: &Game, indent: usize) -> String {
        let text = self.get_assignment_string(game);
        match self.operator() {
            ConditionOperator::NotEqual => format!("{}Not {}", indent_prefix(indent), text),
            _ => format!("{}{}", indent_prefix(indent), text),
        }
    }
}

type PropertyFactory<S> = Box<
    dyn Fn(&GsmlProperty, &Database) -> Result<Box<dyn Condition<S>>, ScriptError> + Send + Sync,
>;
type BlockFactory<S> =
    Box<dyn Fn(&GsmlData, &Database) -> Result<Box<dyn Condition<S>>, ScriptError> + Send + Sync>;

/// Script key to condition constructors for one scope type. Property keys
/// (`tier >= duchy`) and block tags (`ruler = { ... }`) are separate
/// namespaces.
pub struct ConditionTable<S: Scope> {
    properties: FxHashMap<&'static str, PropertyFactory<S>>,
    blocks: FxHashMap<&'static str, BlockFactory<S>>,
}

impl<S: Scope> Default for ConditionTable<S> {
    fn default() -> Self {
        Self {
            properties: FxHashMap::default(),
            blocks: FxHashMap::default(),
        }
    }
}

impl<S: Scope> ConditionTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_property<F>(&mut self, key: &'static str, factory: F)
    where
        F: Fn(&GsmlProperty, &Database) -> Result<Box<dyn Condition<S>>, ScriptError>
            + Send
            + Sync
            + 'static,
    {
        let previous = self.properties.insert(key, Box::new(factory));
        debug_assert!(previous.is_none(), "{} condition '{}' registered twice", S::KIND, key);
    }

    pub fn register_block<F>(&mut self, key: &'static str, factory: F)
    where
        F: Fn(&GsmlData, &Database) -> Result<Box<dyn Condition<S>>, ScriptError>
            + Send
            + Sync
            + 'static,
    {
        let previous = self.blocks.insert(key, Box::new(factory));
        debug_assert!(previous.is_none(), "{} condition block '{}' registered twice", S::KIND, key);
    }

    /// `key = <entry>`: an entry-valued attribute of the scope.
    pub fn register_entry<T: DataEntry>(&mut self, key: &'static str, test: fn(S, &Game, T::Id) -> bool) {
        self.register_property(key, move |property, db| {
            Ok(Box::new(EntryCondition::<S, T>::from_property(key, property, db, test)?))
        });
    }

    /// `key = yes|no`
    pub fn register_flag(&mut self, key: &'static str, test: fn(S, &Game) -> bool) {
        self.register_property(key, move |property, _| {
            Ok(Box::new(FlagCondition::from_property(key, property, test)?))
        });
    }

    /// `key <op> <number>`
    pub fn register_numerical<V, Src>(&mut self, key: &'static str, source: Src)
    where
        V: NumericValue,
        Src: NumericalSource<S, V> + Clone,
    {
        self.register_property(key, move |property, db| {
            Ok(Box::new(NumericalCondition::from_property(
                key,
                source.clone(),
                property,
                db,
            )?))
        });
    }

    /// `key = { <conditions> }` evaluated on a related scope.
    pub fn register_scope<Inner: Scope>(
        &mut self,
        key: &'static str,
        label: &'static str,
        navigator: ScopeNavigator<S, Inner>,
        quantifier: Quantifier,
    ) {
        self.register_block(key, move |block, db| {
            Ok(Box::new(ScopeCondition::from_entries(
                key,
                label.to_string(),
                navigator.clone(),
                quantifier,
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

/// Builds the condition for a `key <op> value` property.
pub fn condition_from_property<S: Scope>(
    property: &GsmlProperty,
    db: &Database,
) -> Result<Box<dyn Condition<S>>, ScriptError> {
    match S::condition_table().properties.get(property.key.as_str()) {
        Some(factory) => factory(property, db),
        None => Err(ScriptError::UnknownCondition {
            scope: S::KIND,
            key: property.key.clone(),
        }),
    }
}

/// Builds the condition for a `tag = { ... }` block.
pub fn condition_from_block<S: Scope>(
    block: &GsmlData,
    db: &Database,
) -> Result<Box<dyn Condition<S>>, ScriptError> {
    let tag = block.tag_or_empty();
    let Some(factory) = S::condition_table().blocks.get(tag) else {
        return Err(ScriptError::UnknownCondition {
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
