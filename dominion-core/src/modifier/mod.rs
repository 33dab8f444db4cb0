//! Reversible, scalable stat adjustments.
//!
//! A [`Modifier`] is a bundle of [`ModifierEffect`]s declared by a data entry
//! (a law, a technology, a trait...). The entry's owner relationship decides
//! when the modifier is active: the game applies it once on activation and
//! removes it once on deactivation, always with the same multiplier.

pub mod character;
pub mod country;
pub mod military_unit;
pub mod population_unit;
pub mod province;
pub mod site;

use crate::database::{require_assignment, unexpected_entry, Database};
use crate::error::ScriptError;
use crate::fixed::{Fixed, Rounding};
use crate::game::Game;
use crate::scope::Scope;
use gsml::{Entry, GsmlData, GsmlProperty};
use rustc_hash::FxHashMap;

/// One atomic stat adjustment within a [`Modifier`].
///
/// # Inverse
///
/// `apply(scope, game, m)` followed by `apply(scope, game, -m)` must restore
/// the exact prior state. Implementations own a single piece of target state
/// and round with an odd function (see [`Rounding`]), so this holds for every
/// multiplier. Keyed counters drop their entry when they return to zero.
pub trait ModifierEffect<S: Scope>: Send + Sync {
    /// Script key this effect was declared with.
    fn identifier(&self) -> String;

    /// Declared magnitude, before any multiplier.
    fn value(&self) -> Fixed;

    /// Adds `value * multiplier` to the target stat of `scope`.
    fn apply(&self, scope: S, game: &mut Game, multiplier: Fixed);

    /// Whether the effect is left out of descriptions for `scope`.
    fn is_hidden(&self, _scope: S, _game: &Game) -> bool {
        false
    }

    fn is_percent(&self) -> bool {
        false
    }

    /// Display name of the stat, e.g. `Law Cost`.
    fn base_string(&self, db: &Database) -> String;

    /// `Name: +X` or `Name: -X%`.
    fn get_string(&self, db: &Database, multiplier: Fixed) -> String {
        let value = self.value().mul_rounded(multiplier, Rounding::TowardZero);
        let sign = if value.is_negative() { "" } else { "+" };
        let suffix = if self.is_percent() { "%" } else { "" };
        format!("{}: {}{}{}", self.base_string(db), sign, value, suffix)
    }

    fn check_validity(&self, _db: &Database) -> Result<(), ScriptError> {
        Ok(())
    }
}

pub type ModifierEffectFactory<S> =
    fn(Fixed, &Database) -> Result<Box<dyn ModifierEffect<S>>, ScriptError>;

/// Builds an effect for a key family such as `<commodity>_output_modifier`.
/// Returns `None` when the key is not part of the family.
pub type ModifierEffectPattern<S> =
    fn(&str, Fixed, &Database) -> Result<Option<Box<dyn ModifierEffect<S>>>, ScriptError>;

/// Script key to modifier effect constructors for one scope type.
pub struct ModifierEffectTable<S: Scope> {
    effects: FxHashMap<&'static str, ModifierEffectFactory<S>>,
    patterns: Vec<ModifierEffectPattern<S>>,
}

impl<S: Scope> Default for ModifierEffectTable<S> {
    fn default() -> Self {
        Self {
            effects: FxHashMap::default(),
            patterns: Vec::new(),
        }
    }
}

impl<S: Scope> ModifierEffectTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: &'static str, factory: ModifierEffectFactory<S>) {
        let previous = self.effects.insert(key, factory);
        debug_assert!(previous.is_none(), "{} modifier effect '{}' registered twice", S::KIND, key);
    }

    pub fn register_pattern(&mut self, pattern: ModifierEffectPattern<S>) {
        self.patterns.push(pattern);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.effects.contains_key(key)
    }

    pub fn create(
        &self,
        property: &GsmlProperty,
        db: &Database,
    ) -> Result<Box<dyn ModifierEffect<S>>, ScriptError> {
        require_assignment(property)?;
        let value: Fixed = property
            .value
            .parse()
            .map_err(|e| ScriptError::invalid_value(&property.key, &property.value, e))?;

        if let Some(factory) = self.effects.get(property.key.as_str()) {
            return factory(value, db);
        }
        for pattern in &self.patterns {
            if let Some(effect) = pattern(&property.key, value, db)? {
                return Ok(effect);
            }
        }
        Err(ScriptError::UnknownModifierEffect {
            scope: S::KIND,
            key: property.key.clone(),
        })
    }
}

/// An ordered bundle of modifier effects for one scope type.
pub struct Modifier<S: Scope> {
    effects: Vec<Box<dyn ModifierEffect<S>>>,
}

impl<S: Scope> Modifier<S> {
    /// Parses a `modifier = { key = value ... }` block.
    pub fn from_gsml(block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let table = S::modifier_effect_table();
        let mut effects = Vec::new();
        for entry in block.entries() {
            match entry {
                Entry::Property(property) => effects.push(table.create(property, db)?),
                other => return Err(unexpected_entry(other)),
            }
        }
        Ok(Modifier { effects })
    }

    pub fn effects(&self) -> &[Box<dyn ModifierEffect<S>>] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Applies every effect in declaration order.
    pub fn apply(&self, scope: S, game: &mut Game, multiplier: Fixed) {
        debug_assert!(!multiplier.is_zero(), "modifier applied with a zero multiplier");
        for effect in &self.effects {
            effect.apply(scope, game, multiplier);
        }
    }

    /// Undoes an [`apply`](Self::apply) made with the same multiplier.
    pub fn remove(&self, scope: S, game: &mut Game, multiplier: Fixed) {
        self.apply(scope, game, -multiplier);
    }

    /// One line per visible effect, each indented by `indent` tabs.
    pub fn get_string(&self, scope: S, game: &Game, multiplier: Fixed, indent: usize) -> String {
        let prefix = "\t".repeat(indent);
        self.effects
            .iter()
            .filter(|effect| !effect.is_hidden(scope, game))
            .map(|effect| format!("{}{}", prefix, effect.get_string(game.database(), multiplier)))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        for effect in &self.effects {
            effect.check_validity(db)?;
        }
        Ok(())
    }
}

/// An integer stat with a fixed target, such as a percent cost modifier.
pub(crate) struct StatModifierEffect<S> {
    identifier: &'static str,
    name: &'static str,
    value: Fixed,
    percent: bool,
    rounding: Rounding,
    change: fn(&mut Game, S, i64),
}

impl<S: Scope> StatModifierEffect<S> {
    pub(crate) fn new(
        identifier: &'static str,
        name: &'static str,
        value: Fixed,
        change: fn(&mut Game, S, i64),
    ) -> Self {
        Self {
            identifier,
            name,
            value,
            percent: false,
            rounding: Rounding::TowardZero,
            change,
        }
    }

    pub(crate) fn percent(mut self) -> Self {
        self.percent = true;
        self
    }

    /// Cost-bearing stats round up for a positive multiplier, so a fractional
    /// multiplier never grants a rounding discount. The rounding only
    /// depends on the sign of the value, which keeps `apply` odd in the
    /// multiplier.
    pub(crate) fn cost(mut self) -> Self {
        self.rounding = if self.value < Fixed::ZERO {
            Rounding::TowardZero
        } else {
            Rounding::AwayFromZero
        };
        self
    }
}

impl<S: Scope> ModifierEffect<S> for StatModifierEffect<S> {
    fn identifier(&self) -> String {
        self.identifier.to_string()
    }

    fn value(&self) -> Fixed {
        self.value
    }

    fn apply(&self, scope: S, game: &mut Game, multiplier: Fixed) {
        let change = self.value.mul_to_int(multiplier, self.rounding);
        (self.change)(game, scope, change);
    }

    fn is_percent(&self) -> bool {
        self.percent
    }

    fn base_string(&self, _db: &Database) -> String {
        self.name.to_string()
    }
}

/// A fixed-point stat with a fixed target, such as unit attack.
pub(crate) struct FixedStatModifierEffect<S> {
    identifier: &'static str,
    name: &'static str,
    value: Fixed,
    change: fn(&mut Game, S, Fixed),
}

impl<S: Scope> FixedStatModifierEffect<S> {
    pub(crate) fn new(
        identifier: &'static str,
        name: &'static str,
        value: Fixed,
        change: fn(&mut Game, S, Fixed),
    ) -> Self {
        Self {
            identifier,
            name,
            value,
            change,
        }
    }
}

impl<S: Scope> ModifierEffect<S> for FixedStatModifierEffect<S> {
    fn identifier(&self) -> String {
        self.identifier.to_string()
    }

    fn value(&self) -> Fixed {
        self.value
    }

    fn apply(&self, scope: S, game: &mut Game, multiplier: Fixed) {
        let change = self.value.mul_rounded(multiplier, Rounding::TowardZero);
        (self.change)(game, scope, change);
    }

    fn base_string(&self, _db: &Database) -> String {
        self.name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::CountryId;
    use crate::testing::{database_from_text, GameBuilder};

    #[test]
    fn test_unknown_modifier_effect() {
        let db = Database::default();
        let block = gsml::parse_str("modifier = { prestige = 1 }").unwrap();
        let block = block.get_child("modifier").unwrap();
        let err = Modifier::<CountryId>::from_gsml(block, &db).err().unwrap();
        assert!(matches!(
            err,
            ScriptError::UnknownModifierEffect { ref key, .. } if key == "prestige"
        ));
    }

    #[test]
    fn test_modifier_rejects_non_assignment() {
        let db = Database::default();
        let block = gsml::parse_str("modifier = { storage_capacity += 1 }").unwrap();
        let block = block.get_child("modifier").unwrap();
        let err = Modifier::<CountryId>::from_gsml(block, &db).err().unwrap();
        assert!(matches!(err, ScriptError::InvalidOperator { .. }));
    }

    #[test]
    fn test_apply_remove_restores_state() {
        let db = database_from_text(&[]);
        let block = gsml::parse_str(
            "modifier = { law_cost_modifier = -15 technology_cost_modifier = -7.5 storage_capacity = 3 }",
        )
        .unwrap();
        let modifier =
            Modifier::<CountryId>::from_gsml(block.get_child("modifier").unwrap(), &db).unwrap();

        let mut game = GameBuilder::new(db).with_country("ALPHA").build();
        let alpha = game.find_country("ALPHA").unwrap();
        let before = game.to_json().unwrap();

        let half = Fixed::from_raw(50);
        modifier.apply(alpha, &mut game, half);
        assert_eq!(game.country(alpha).law_cost_modifier(), -7); // -7.5 truncated
        assert_eq!(game.country(alpha).technology_cost_modifier(), -3); // -3.75 rounded up
        modifier.remove(alpha, &mut game, half);

        assert_eq!(game.to_json().unwrap(), before);
    }

    #[test]
    fn test_cost_modifier_never_rounds_in_favor_of_scope() {
        let db = database_from_text(&[]);
        let mut game = GameBuilder::new(db).with_country("ALPHA").build();
        let alpha = game.find_country("ALPHA").unwrap();
        let half = Fixed::from_raw(50);

        for (text, expected) in [("-7.5", -3), ("7.5", 4), ("-5", -2), ("5", 3)] {
            let block =
                gsml::parse_str(&format!("modifier = {{ technology_cost_modifier = {} }}", text))
                    .unwrap();
            let modifier =
                Modifier::<CountryId>::from_gsml(block.get_child("modifier").unwrap(), game.database())
                    .unwrap();
            modifier.apply(alpha, &mut game, half);
            assert_eq!(game.country(alpha).technology_cost_modifier(), expected, "{}", text);
            modifier.remove(alpha, &mut game, half);
            assert_eq!(game.country(alpha).technology_cost_modifier(), 0, "{}", text);
        }
    }

    #[test]
    fn test_get_string() {
        let db = database_from_text(&[]);
        let block =
            gsml::parse_str("modifier = { law_cost_modifier = 10 storage_capacity = -2 }").unwrap();
        let modifier =
            Modifier::<CountryId>::from_gsml(block.get_child("modifier").unwrap(), &db).unwrap();
        let game = GameBuilder::new(db).with_country("ALPHA").build();
        let alpha = game.find_country("ALPHA").unwrap();

        assert_eq!(
            modifier.get_string(alpha, &game, Fixed::ONE, 1),
            "\tLaw Cost: +10%\n\tStorage Capacity: -2"
        );
        assert_eq!(
            modifier.get_string(alpha, &game, Fixed::from_int(2), 0),
            "Law Cost: +20%\nStorage Capacity: -4"
        );
    }
}
