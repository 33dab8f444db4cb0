//! Comparisons of a scope-derived quantity against a scripted threshold.

use super::{comparison_operator, indent_prefix, Condition, ConditionOperator};
use crate::context::ReadOnlyContext;
use crate::database::{require_assignment, unexpected_entry, DataEntry, Database, DomainTier};
use crate::error::ScriptError;
use crate::fixed::FixedPoint;
use crate::game::Game;
use crate::scope::Scope;
use gsml::{Entry, GsmlData, GsmlProperty};
use std::fmt;
use std::marker::PhantomData;

/// A value type a numerical condition can compare.
pub trait NumericValue: Copy + Ord + fmt::Display + Send + Sync + 'static {
    /// Parses a scripted threshold. The error is a reason for the user.
    fn parse_value(text: &str, db: &Database) -> Result<Self, String>;
}

impl<const SCALE: i64> NumericValue for FixedPoint<SCALE> {
    fn parse_value(text: &str, _db: &Database) -> Result<Self, String> {
        text.parse().map_err(|e: crate::fixed::ParseFixedError| e.to_string())
    }
}

impl NumericValue for i64 {
    fn parse_value(text: &str, _db: &Database) -> Result<Self, String> {
        text.parse().map_err(|e: std::num::ParseIntError| e.to_string())
    }
}

/// Tiers compare by ordinal: `tier >= duchy`.
impl NumericValue for DomainTier {
    fn parse_value(text: &str, _db: &Database) -> Result<Self, String> {
        DomainTier::from_identifier(text).ok_or_else(|| "not a domain tier".to_string())
    }
}

/// Where a numerical condition's two sides come from.
pub trait NumericalSource<S: Scope, V: NumericValue>: Send + Sync + 'static {
    /// Left-hand side: the quantity read from the scope.
    fn scope_value(&self, scope: S, game: &Game) -> V;

    /// Right-hand side. Sources that scale the threshold with the scope
    /// (e.g. per population unit) override this.
    fn value(&self, _scope: S, _game: &Game, base: V) -> V {
        base
    }

    /// Name of the quantity, e.g. `Wealth`.
    fn label(&self, db: &Database) -> String;

    fn check_validity(&self, _db: &Database) -> Result<(), ScriptError> {
        Ok(())
    }
}

pub struct NumericalCondition<S, V, Src> {
    class_identifier: &'static str,
    operator: ConditionOperator,
    value: V,
    source: Src,
    _scope: PhantomData<fn(S)>,
}

impl<S, V, Src> NumericalCondition<S, V, Src>
where
    S: Scope,
    V: NumericValue,
    Src: NumericalSource<S, V>,
{
    pub fn new(class_identifier: &'static str, source: Src, operator: ConditionOperator, value: V) -> Self {
        Self {
            class_identifier,
            operator,
            value,
            source,
            _scope: PhantomData,
        }
    }

    /// `key <op> value`, where `=` means equality.
    pub fn from_property(
        class_identifier: &'static str,
        source: Src,
        property: &GsmlProperty,
        db: &Database,
    ) -> Result<Self, ScriptError> {
        let operator = comparison_operator(property)?;
        let value = V::parse_value(&property.value, db)
            .map_err(|reason| ScriptError::invalid_value(&property.key, &property.value, reason))?;
        Ok(Self::new(class_identifier, source, operator, value))
    }

    pub fn value(&self) -> V {
        self.value
    }
}

impl<S, V, Src> Condition<S> for NumericalCondition<S, V, Src>
where
    S: Scope,
    V: NumericValue,
    Src: NumericalSource<S, V>,
{
    fn class_identifier(&self) -> &'static str {
        self.class_identifier
    }

    fn operator(&self) -> ConditionOperator {
        self.operator
    }

    fn check(&self, scope: S, game: &Game, _ctx: &ReadOnlyContext) -> bool {
        let lhs = self.source.scope_value(scope, game);
        let rhs = self.source.value(scope, game, self.value);
        self.operator.compare(lhs, rhs)
    }

    fn check_assignment(&self, scope: S, game: &Game, _ctx: &ReadOnlyContext) -> bool {
        self.source.scope_value(scope, game) == self.source.value(scope, game, self.value)
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        self.source.check_validity(db)
    }

    fn get_assignment_string(&self, game: &Game) -> String {
        let operator = match self.operator {
            ConditionOperator::Assignment => ConditionOperator::Equal,
            other => other,
        };
        format!("{} {} {}", self.source.label(game.database()), operator, self.value)
    }

    fn get_string(&self, game: &Game, indent: usize) -> String {
        format!("{}{}", indent_prefix(indent), self.get_assignment_string(game))
    }
}

/// Keyed block form, e.g. `population_type_count = { population_type = farmers value >= 3 }`.
pub(crate) fn keyed_numerical_from_gsml<S, T, V, Src>(
    class_identifier: &'static str,
    key_field: &'static str,
    block: &GsmlData,
    db: &Database,
    source: fn(T::Id) -> Src,
) -> Result<Box<dyn Condition<S>>, ScriptError>
where
    S: Scope,
    T: DataEntry,
    V: NumericValue,
    Src: NumericalSource<S, V>,
{
    let mut key = None;
    let mut value = None;
    for entry in block.entries() {
        match entry {
            Entry::Property(p) if p.key == key_field => {
                require_assignment(p)?;
                key = Some(T::registry(db).get_id(&p.value)?);
            }
            Entry::Property(p) if p.key == "value" => value = Some(p),
            other => return Err(unexpected_entry(other)),
        }
    }
    let key = key.ok_or_else(|| ScriptError::MissingField {
        context: class_identifier.to_string(),
        field: key_field,
    })?;
    let value = value.ok_or_else(|| ScriptError::MissingField {
        context: class_identifier.to_string(),
        field: "value",
    })?;
    Ok(Box::new(NumericalCondition::from_property(
        class_identifier,
        source(key),
        value,
        db,
    )?))
}
