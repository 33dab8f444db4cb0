//! Boolean combinators.

use super::{condition_from_block, condition_from_property, indent_prefix, Condition};
use crate::context::ReadOnlyContext;
use crate::database::Database;
use crate::error::ScriptError;
use crate::game::Game;
use crate::scope::Scope;
use gsml::{Entry, GsmlData};

/// Builds one condition per entry of a block.
fn conditions_from_entries<'a, S: Scope>(
    entries: impl Iterator<Item = Entry<'a>>,
    db: &Database,
) -> Result<Vec<Box<dyn Condition<S>>>, ScriptError> {
    entries
        .map(|entry| match entry {
            Entry::Property(property) => condition_from_property(property, db),
            Entry::Child(block) => condition_from_block(block, db),
        })
        .collect()
}

fn children_string<S: Scope>(
    conditions: &[Box<dyn Condition<S>>],
    game: &Game,
    indent: usize,
) -> String {
    conditions
        .iter()
        .map(|condition| condition.get_string(game, indent))
        .collect::<Vec<String>>()
        .join("\n")
}

fn check_children_validity<S: Scope>(
    conditions: &[Box<dyn Condition<S>>],
    db: &Database,
) -> Result<(), ScriptError> {
    for condition in conditions {
        condition.check_validity(db)?;
    }
    Ok(())
}

/// Holds when every child holds. Evaluation stops at the first child that
/// fails. An empty list holds.
pub struct AndCondition<S: Scope> {
    conditions: Vec<Box<dyn Condition<S>>>,
}

impl<S: Scope> AndCondition<S> {
    pub fn new(conditions: Vec<Box<dyn Condition<S>>>) -> Self {
        Self { conditions }
    }

    /// Parses a `conditions = { ... }` block, one condition per entry.
    pub fn from_gsml(block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        Self::from_entries(block.entries(), db)
    }

    pub fn from_entries<'a>(
        entries: impl Iterator<Item = Entry<'a>>,
        db: &Database,
    ) -> Result<Self, ScriptError> {
        Ok(Self::new(conditions_from_entries(entries, db)?))
    }

    pub fn conditions(&self) -> &[Box<dyn Condition<S>>] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Same as [`get_string`](Condition::get_string), kept for call sites
    /// that render a whole condition block.
    pub fn get_conditions_string(&self, game: &Game, indent: usize) -> String {
        children_string(&self.conditions, game, indent)
    }
}

impl<S: Scope> Condition<S> for AndCondition<S> {
    fn class_identifier(&self) -> &'static str {
        "and"
    }

    fn check_assignment(&self, scope: S, game: &Game, ctx: &ReadOnlyContext) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.check(scope, game, ctx))
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        check_children_validity(&self.conditions, db)
    }

    fn get_assignment_string(&self, game: &Game) -> String {
        self.get_conditions_string(game, 0)
    }

    /// The children, each on its own line. A nested `and` reads the same as
    /// its parent, so no header is added.
    fn get_string(&self, game: &Game, indent: usize) -> String {
        children_string(&self.conditions, game, indent)
    }
}

/// Holds when any child holds. Evaluation stops at the first child that
/// holds. An empty list does not hold.
pub struct OrCondition<S: Scope> {
    conditions: Vec<Box<dyn Condition<S>>>,
}

impl<S: Scope> OrCondition<S> {
    pub fn new(conditions: Vec<Box<dyn Condition<S>>>) -> Self {
        Self { conditions }
    }

    pub fn from_gsml(block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        Ok(Self {
            conditions: conditions_from_entries(block.entries(), db)?,
        })
    }
}

impl<S: Scope> Condition<S> for OrCondition<S> {
    fn class_identifier(&self) -> &'static str {
        "or"
    }

    fn check_assignment(&self, scope: S, game: &Game, ctx: &ReadOnlyContext) -> bool {
        self.conditions
            .iter()
            .any(|condition| condition.check(scope, game, ctx))
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        check_children_validity(&self.conditions, db)
    }

    fn get_assignment_string(&self, _game: &Game) -> String {
        "One of:".to_string()
    }

    fn get_string(&self, game: &Game, indent: usize) -> String {
        format!(
            "{}One of:\n{}",
            indent_prefix(indent),
            children_string(&self.conditions, game, indent + 1)
        )
    }
}

/// Holds when the AND of its children does not.
pub struct NotCondition<S: Scope> {
    conditions: AndCondition<S>,
}

impl<S: Scope> NotCondition<S> {
    pub fn from_gsml(block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        Ok(Self {
            conditions: AndCondition::from_gsml(block, db)?,
        })
    }
}

impl<S: Scope> Condition<S> for NotCondition<S> {
    fn class_identifier(&self) -> &'static str {
        "not"
    }

    fn check_assignment(&self, scope: S, game: &Game, ctx: &ReadOnlyContext) -> bool {
        !self.conditions.check(scope, game, ctx)
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        self.conditions.check_validity(db)
    }

    fn get_assignment_string(&self, _game: &Game) -> String {
        "None of:".to_string()
    }

    fn get_string(&self, game: &Game, indent: usize) -> String {
        format!(
            "{}None of:\n{}",
            indent_prefix(indent),
            self.conditions.get_string(game, indent + 1)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::CountryId;
    use crate::testing::GameBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns a fixed result and counts its evaluations.
    struct Probe {
        result: bool,
        evaluations: Arc<AtomicUsize>,
    }

    impl Condition<CountryId> for Probe {
        fn class_identifier(&self) -> &'static str {
            "probe"
        }

        fn check_assignment(&self, _: CountryId, _: &Game, _: &ReadOnlyContext) -> bool {
            self.evaluations.fetch_add(1, Ordering::Relaxed);
            self.result
        }

        fn get_assignment_string(&self, _game: &Game) -> String {
            format!("Probe {}", self.result)
        }
    }

    fn probes(results: &[bool]) -> (Vec<Box<dyn Condition<CountryId>>>, Vec<Arc<AtomicUsize>>) {
        let counters: Vec<Arc<AtomicUsize>> =
            results.iter().map(|_| Arc::new(AtomicUsize::new(0))).collect();
        let conditions = results
            .iter()
            .zip(&counters)
            .map(|(result, counter)| {
                Box::new(Probe {
                    result: *result,
                    evaluations: Arc::clone(counter),
                }) as Box<dyn Condition<CountryId>>
            })
            .collect();
        (conditions, counters)
    }

    fn counts(counters: &[Arc<AtomicUsize>]) -> Vec<usize> {
        counters.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }

    #[test]
    fn test_and_stops_at_first_false() {
        let game = GameBuilder::empty().with_country("ALPHA").build();
        let ctx = ReadOnlyContext::new();

        let (conditions, counters) = probes(&[true, false, true]);
        let and = AndCondition::new(conditions);
        assert!(!and.check(CountryId(0), &game, &ctx));
        assert_eq!(counts(&counters), vec![1, 1, 0]);

        let (conditions, counters) = probes(&[true, true]);
        let and = AndCondition::new(conditions);
        assert!(and.check(CountryId(0), &game, &ctx));
        assert_eq!(counts(&counters), vec![1, 1]);
    }

    #[test]
    fn test_or_stops_at_first_true() {
        let game = GameBuilder::empty().with_country("ALPHA").build();
        let ctx = ReadOnlyContext::new();
        let (conditions, counters) = probes(&[false, true, true]);
        let or = OrCondition { conditions };
        assert!(or.check(CountryId(0), &game, &ctx));
        assert_eq!(counts(&counters), vec![1, 1, 0]);

        let or = OrCondition::<CountryId> { conditions: Vec::new() };
        assert!(!or.check(CountryId(0), &game, &ctx));
    }

    #[test]
    fn test_not_negates_and() {
        let game = GameBuilder::empty().with_country("ALPHA").build();
        let ctx = ReadOnlyContext::new();
        let (conditions, _) = probes(&[true, false]);
        let not = NotCondition {
            conditions: AndCondition::new(conditions),
        };
        assert!(not.check(CountryId(0), &game, &ctx));
        assert_eq!(not.get_string(&game, 0), "None of:\n\tProbe true\n\tProbe false");
    }
}
