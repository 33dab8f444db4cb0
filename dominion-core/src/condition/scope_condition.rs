use super::{indent_prefix, AndCondition, Condition};
use crate::context::ReadOnlyContext;
use crate::database::Database;
use crate::error::ScriptError;
use crate::game::Game;
use crate::navigation::ScopeNavigator;
use crate::scope::Scope;
use gsml::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// At least one related scope passes.
    Any,
    /// There is at least one related scope, and every one passes.
    Every,
}

/// Evaluates nested conditions on the scope(s) reached from the outer scope.
///
/// A navigation that reaches nothing never holds, whatever the nested
/// conditions are: absence beats vacuous truth.
pub struct ScopeCondition<Outer, Inner: Scope> {
    class_identifier: &'static str,
    label: String,
    navigator: ScopeNavigator<Outer, Inner>,
    quantifier: Quantifier,
    conditions: AndCondition<Inner>,
}

impl<Outer: Scope, Inner: Scope> ScopeCondition<Outer, Inner> {
    pub fn new(
        class_identifier: &'static str,
        label: String,
        navigator: ScopeNavigator<Outer, Inner>,
        quantifier: Quantifier,
        conditions: AndCondition<Inner>,
    ) -> Self {
        Self {
            class_identifier,
            label,
            navigator,
            quantifier,
            conditions,
        }
    }

    pub fn from_entries<'a>(
        class_identifier: &'static str,
        label: String,
        navigator: ScopeNavigator<Outer, Inner>,
        quantifier: Quantifier,
        entries: impl Iterator<Item = Entry<'a>>,
        db: &Database,
    ) -> Result<Self, ScriptError> {
        let conditions = AndCondition::from_entries(entries, db)?;
        Ok(Self::new(class_identifier, label, navigator, quantifier, conditions))
    }

    pub fn conditions(&self) -> &AndCondition<Inner> {
        &self.conditions
    }
}

impl<Outer: Scope, Inner: Scope> Condition<Outer> for ScopeCondition<Outer, Inner> {
    fn class_identifier(&self) -> &'static str {
        self.class_identifier
    }

    fn check_assignment(&self, scope: Outer, game: &Game, ctx: &ReadOnlyContext) -> bool {
        let targets = self.navigator.resolve(scope, game, ctx);
        match self.quantifier {
            Quantifier::Any => targets
                .into_iter()
                .any(|target| self.conditions.check(target, game, ctx)),
            Quantifier::Every => {
                !targets.is_empty()
                    && targets
                        .into_iter()
                        .all(|target| self.conditions.check(target, game, ctx))
            }
        }
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        self.conditions.check_validity(db)
    }

    fn get_assignment_string(&self, _game: &Game) -> String {
        format!("{}:", self.label)
    }

    fn get_string(&self, game: &Game, indent: usize) -> String {
        let header = format!("{}{}:", indent_prefix(indent), self.label);
        if self.conditions.is_empty() {
            return header;
        }
        format!("{}\n{}", header, self.conditions.get_string(game, indent + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::CountryId;
    use crate::testing::GameBuilder;

    fn neighbors(country: CountryId, game: &Game) -> Vec<CountryId> {
        game.country(country).neighbors().iter().copied().collect()
    }

    #[test]
    fn test_absence_beats_vacuous_truth() {
        let game = GameBuilder::empty().with_country("ALPHA").build();
        let ctx = ReadOnlyContext::new();
        let alpha = CountryId(0);

        let ruler = ScopeCondition::<CountryId, _>::new(
            "ruler",
            "Ruler".to_string(),
            ScopeNavigator::Single(|c, g| g.country(c).ruler()),
            Quantifier::Any,
            AndCondition::new(Vec::new()),
        );
        assert!(!ruler.check(alpha, &game, &ctx));

        for quantifier in [Quantifier::Any, Quantifier::Every] {
            let condition = ScopeCondition::new(
                "neighbor_country",
                "Neighbor country".to_string(),
                ScopeNavigator::Collection(neighbors),
                quantifier,
                AndCondition::<CountryId>::new(Vec::new()),
            );
            assert!(!condition.check(alpha, &game, &ctx));
        }

        let source = ScopeCondition::<CountryId, CountryId>::new(
            "source_country",
            "Source country".to_string(),
            ScopeNavigator::Source,
            Quantifier::Any,
            AndCondition::new(Vec::new()),
        );
        assert!(!source.check(alpha, &game, &ctx));
        assert!(source.check(alpha, &game, &ReadOnlyContext::with_source(alpha)));
    }

    #[test]
    fn test_every_with_targets() {
        let game = GameBuilder::empty()
            .with_country("ALPHA")
            .with_country("BETA")
            .with_neighbors("ALPHA", "BETA")
            .build();
        let condition = ScopeCondition::new(
            "every_neighbor_country",
            "Every neighbor country".to_string(),
            ScopeNavigator::Collection(neighbors),
            Quantifier::Every,
            AndCondition::<CountryId>::new(Vec::new()),
        );
        assert!(condition.check(CountryId(0), &game, &ReadOnlyContext::new()));
        assert_eq!(condition.get_string(&game, 0), "Every neighbor country:");
    }
}
