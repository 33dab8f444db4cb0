//! Generic leaf effects that change one attribute of a scope.

use super::{effect_operator, Effect, EffectOperator};
use crate::condition::NumericValue;
use crate::context::{Context, ReadOnlyContext};
use crate::database::{display_name, require_assignment, DataEntry, Database};
use crate::error::ScriptError;
use crate::game::Game;
use crate::scope::Scope;
use gsml::GsmlProperty;
use std::marker::PhantomData;
use std::ops::{Add, Neg, Sub};

/// A quantity effects can add to, subtract from and assign.
pub trait EffectValue:
    NumericValue + Default + Add<Output = Self> + Sub<Output = Self> + Neg<Output = Self>
{
}

impl<T> EffectValue for T where
    T: NumericValue + Default + Add<Output = T> + Sub<Output = T> + Neg<Output = T>
{
}

/// `+10`, `-10`, `0`.
pub(crate) fn signed<V: EffectValue>(value: V) -> String {
    if value > V::default() {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

/// `key = <entry identifier>`, e.g. `gain_technology = gunpowder`.
pub struct EntryEffect<S, T: DataEntry> {
    class_identifier: &'static str,
    entry: T::Id,
    apply: fn(&mut Game, S, T::Id),
    _entry: PhantomData<fn() -> T>,
}

impl<S: Scope, T: DataEntry> EntryEffect<S, T> {
    pub fn from_property(
        class_identifier: &'static str,
        property: &GsmlProperty,
        db: &Database,
        apply: fn(&mut Game, S, T::Id),
    ) -> Result<Self, ScriptError> {
        require_assignment(property)?;
        Ok(Self {
            class_identifier,
            entry: T::registry(db).get_id(&property.value)?,
            apply,
            _entry: PhantomData,
        })
    }

    pub fn entry(&self) -> T::Id {
        self.entry
    }
}

impl<S: Scope, T: DataEntry> Effect<S> for EntryEffect<S, T> {
    fn class_identifier(&self) -> &'static str {
        self.class_identifier
    }

    fn do_assignment_effect(&self, scope: S, game: &mut Game, _ctx: &mut Context) {
        (self.apply)(game, scope, self.entry);
    }

    fn get_assignment_string(&self, _scope: S, game: &Game, _ctx: &ReadOnlyContext) -> String {
        let entry = T::registry(game.database()).get(self.entry);
        format!("{}: {}", display_name(self.class_identifier), entry.name())
    }
}

/// `key = n`, `key += n` or `key -= n`. Assignment is carried out as the
/// change from the current value.
pub struct NumericalEffect<S, V> {
    class_identifier: &'static str,
    operator: EffectOperator,
    value: V,
    current: fn(S, &Game) -> V,
    change: fn(&mut Game, S, V),
}

impl<S: Scope, V: EffectValue> NumericalEffect<S, V> {
    pub fn from_property(
        class_identifier: &'static str,
        property: &GsmlProperty,
        db: &Database,
        current: fn(S, &Game) -> V,
        change: fn(&mut Game, S, V),
    ) -> Result<Self, ScriptError> {
        let operator = effect_operator(property)?;
        let value = V::parse_value(&property.value, db)
            .map_err(|reason| ScriptError::invalid_value(&property.key, &property.value, reason))?;
        Ok(Self {
            class_identifier,
            operator,
            value,
            current,
            change,
        })
    }

    pub fn value(&self) -> V {
        self.value
    }

    fn label(&self) -> String {
        display_name(self.class_identifier)
    }
}

impl<S: Scope, V: EffectValue> Effect<S> for NumericalEffect<S, V> {
    fn class_identifier(&self) -> &'static str {
        self.class_identifier
    }

    fn operator(&self) -> EffectOperator {
        self.operator
    }

    fn do_assignment_effect(&self, scope: S, game: &mut Game, _ctx: &mut Context) {
        let delta = self.value - (self.current)(scope, game);
        (self.change)(game, scope, delta);
    }

    fn do_addition_effect(&self, scope: S, game: &mut Game, _ctx: &mut Context) {
        (self.change)(game, scope, self.value);
    }

    fn do_subtraction_effect(&self, scope: S, game: &mut Game, _ctx: &mut Context) {
        (self.change)(game, scope, -self.value);
    }

    fn get_assignment_string(&self, scope: S, game: &Game, _ctx: &ReadOnlyContext) -> String {
        let delta = self.value - (self.current)(scope, game);
        if delta == V::default() {
            format!("{}: {}", self.label(), self.value)
        } else {
            format!("{}: {} ({})", self.label(), self.value, signed(delta))
        }
    }

    fn get_addition_string(&self, _scope: S, _game: &Game, _ctx: &ReadOnlyContext) -> String {
        format!("{}: {}", self.label(), signed(self.value))
    }

    fn get_subtraction_string(&self, _scope: S, _game: &Game, _ctx: &ReadOnlyContext) -> String {
        format!("{}: {}", self.label(), signed(-self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Fixed;
    use crate::scope::CountryId;
    use crate::testing::GameBuilder;

    fn wealth(text: &str) -> NumericalEffect<CountryId, i64> {
        let root = gsml::parse_str(text).unwrap();
        let property = root.properties().next().unwrap();
        NumericalEffect::from_property(
            "wealth",
            property,
            &Database::default(),
            |country, game| game.country(country).wealth(),
            |game, country, change| game.change_wealth(country, change),
        )
        .unwrap()
    }

    #[test]
    fn test_operators() {
        let mut game = GameBuilder::empty().with_country("ALPHA").build();
        let alpha = CountryId(0);
        let mut ctx = Context::new();

        wealth("wealth += 30").do_effect(alpha, &mut game, &mut ctx);
        assert_eq!(game.country(alpha).wealth(), 30);
        wealth("wealth -= 5").do_effect(alpha, &mut game, &mut ctx);
        assert_eq!(game.country(alpha).wealth(), 25);
        wealth("wealth = 100").do_effect(alpha, &mut game, &mut ctx);
        assert_eq!(game.country(alpha).wealth(), 100);
    }

    #[test]
    fn test_projected_strings() {
        let mut game = GameBuilder::empty().with_country("ALPHA").build();
        let alpha = CountryId(0);
        game.set_wealth(alpha, 40);
        let ctx = ReadOnlyContext::new();

        assert_eq!(wealth("wealth += 10").get_string(alpha, &game, &ctx, 1, ""), "\tWealth: +10");
        assert_eq!(wealth("wealth -= 10").get_string(alpha, &game, &ctx, 0, ""), "Wealth: -10");
        assert_eq!(wealth("wealth = 50").get_string(alpha, &game, &ctx, 0, ""), "Wealth: 50 (+10)");
        assert_eq!(wealth("wealth = 40").get_string(alpha, &game, &ctx, 0, ""), "Wealth: 40");
        // Describing never changes the scope.
        assert_eq!(game.country(alpha).wealth(), 40);
    }

    #[test]
    fn test_rejects_comparison_operators() {
        let root = gsml::parse_str("wealth >= 10").unwrap();
        let property = root.properties().next().unwrap();
        let result = NumericalEffect::<CountryId, Fixed>::from_property(
            "wealth",
            property,
            &Database::default(),
            |_, _| Fixed::ZERO,
            |_, _, _| {},
        );
        assert!(matches!(result, Err(ScriptError::InvalidOperator { .. })));
    }

    #[test]
    fn test_signed() {
        assert_eq!(signed(Fixed::from_raw(150)), "+1.5");
        assert_eq!(signed(Fixed::from_raw(-25)), "-0.25");
        assert_eq!(signed(0i64), "0");
    }
}
