//! Generic leaf conditions that compare one attribute of a scope.

use super::{equality_operator, Condition, ConditionOperator};
use crate::context::ReadOnlyContext;
use crate::database::{display_name, parse_bool, DataEntry, Database};
use crate::error::ScriptError;
use crate::game::Game;
use crate::scope::Scope;
use gsml::GsmlProperty;
use std::marker::PhantomData;

/// `key = <entry identifier>`, e.g. `government_type = republic`.
pub struct EntryCondition<S, T: DataEntry> {
    class_identifier: &'static str,
    operator: ConditionOperator,
    entry: T::Id,
    test: fn(S, &Game, T::Id) -> bool,
    _entry: PhantomData<fn() -> T>,
}

impl<S: Scope, T: DataEntry> EntryCondition<S, T> {
    pub fn new(
        class_identifier: &'static str,
        operator: ConditionOperator,
        entry: T::Id,
        test: fn(S, &Game, T::Id) -> bool,
    ) -> Self {
        Self {
            class_identifier,
            operator,
            entry,
            test,
            _entry: PhantomData,
        }
    }

    pub fn from_property(
        class_identifier: &'static str,
        property: &GsmlProperty,
        db: &Database,
        test: fn(S, &Game, T::Id) -> bool,
    ) -> Result<Self, ScriptError> {
        let operator = equality_operator(property)?;
        let entry = T::registry(db).get_id(&property.value)?;
        Ok(Self::new(class_identifier, operator, entry, test))
    }

    pub fn entry(&self) -> T::Id {
        self.entry
    }
}

impl<S: Scope, T: DataEntry> Condition<S> for EntryCondition<S, T> {
    fn class_identifier(&self) -> &'static str {
        self.class_identifier
    }

    fn operator(&self) -> ConditionOperator {
        self.operator
    }

    fn check_assignment(&self, scope: S, game: &Game, _ctx: &ReadOnlyContext) -> bool {
        (self.test)(scope, game, self.entry)
    }

    fn get_assignment_string(&self, game: &Game) -> String {
        let entry = T::registry(game.database()).get(self.entry);
        format!("{}: {}", display_name(self.class_identifier), entry.name())
    }
}

/// `key = yes|no`, e.g. `is_subject = yes`.
pub struct FlagCondition<S> {
    class_identifier: &'static str,
    operator: ConditionOperator,
    expected: bool,
    test: fn(S, &Game) -> bool,
}

impl<S: Scope> FlagCondition<S> {
    pub fn from_property(
        class_identifier: &'static str,
        property: &GsmlProperty,
        test: fn(S, &Game) -> bool,
    ) -> Result<Self, ScriptError> {
        Ok(Self {
            class_identifier,
            operator: equality_operator(property)?,
            expected: parse_bool(property)?,
            test,
        })
    }
}

impl<S: Scope> Condition<S> for FlagCondition<S> {
    fn class_identifier(&self) -> &'static str {
        self.class_identifier
    }

    fn operator(&self) -> ConditionOperator {
        self.operator
    }

    fn check_assignment(&self, scope: S, game: &Game, _ctx: &ReadOnlyContext) -> bool {
        (self.test)(scope, game) == self.expected
    }

    fn get_assignment_string(&self, _game: &Game) -> String {
        let name = display_name(self.class_identifier);
        if self.expected {
            name
        } else {
            format!("Not {}", name)
        }
    }
}
