use super::{Effect, EffectList};
use crate::condition::{indent_prefix, AndCondition, Condition};
use crate::context::{Context, ReadOnlyContext};
use crate::database::Database;
use crate::error::ScriptError;
use crate::game::Game;
use crate::navigation::ScopeNavigator;
use crate::scope::Scope;
use gsml::Entry;
use rand::seq::SliceRandom;

/// Which of the candidate scopes the nested effects run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every candidate, in identifier order.
    All,
    /// One candidate picked uniformly with the game's RNG.
    Random,
}

/// Runs nested effects on the scope(s) reached from the outer scope.
///
/// Candidates are resolved and filtered by the optional `conditions` block
/// before any effect runs. Nothing to run on is a no-op.
pub struct ScopeEffect<Outer, Inner: Scope> {
    class_identifier: &'static str,
    label: String,
    navigator: ScopeNavigator<Outer, Inner>,
    selection: Selection,
    conditions: Option<AndCondition<Inner>>,
    effects: EffectList<Inner>,
}

impl<Outer: Scope, Inner: Scope> ScopeEffect<Outer, Inner> {
    pub fn from_entries<'a>(
        class_identifier: &'static str,
        label: String,
        navigator: ScopeNavigator<Outer, Inner>,
        selection: Selection,
        entries: impl Iterator<Item = Entry<'a>>,
        db: &Database,
    ) -> Result<Self, ScriptError> {
        let mut conditions = None;
        let mut effect_entries = Vec::new();
        for entry in entries {
            match entry {
                Entry::Child(c) if c.tag() == Some("conditions") => {
                    conditions = Some(AndCondition::from_gsml(c, db)?);
                }
                other => effect_entries.push(other),
            }
        }
        Ok(Self {
            class_identifier,
            label,
            navigator,
            selection,
            conditions,
            effects: EffectList::from_entries(effect_entries.into_iter(), db)?,
        })
    }

    pub fn effects(&self) -> &EffectList<Inner> {
        &self.effects
    }

    fn candidates(&self, scope: Outer, game: &Game, ctx: &ReadOnlyContext) -> Vec<Inner> {
        self.navigator
            .resolve(scope, game, ctx)
            .into_iter()
            .filter(|target| {
                self.conditions
                    .as_ref()
                    .map_or(true, |conditions| conditions.check(*target, game, ctx))
            })
            .collect()
    }
}

impl<Outer: Scope, Inner: Scope> Effect<Outer> for ScopeEffect<Outer, Inner> {
    fn class_identifier(&self) -> &'static str {
        self.class_identifier
    }

    fn do_assignment_effect(&self, scope: Outer, game: &mut Game, ctx: &mut Context) {
        let candidates = self.candidates(scope, game, ctx.read_only());
        let targets = match self.selection {
            Selection::All => candidates,
            Selection::Random => candidates
                .choose(game.rng_mut())
                .copied()
                .into_iter()
                .collect(),
        };
        if targets.is_empty() {
            log::trace!("{}: no target for {:?}", self.class_identifier, scope);
        }
        for target in targets {
            self.effects.do_effect(target, game, ctx);
        }
    }

    /// The nested effects are described against the first candidate, since
    /// a random pick is only made when the effect runs.
    fn get_string(
        &self,
        scope: Outer,
        game: &Game,
        ctx: &ReadOnlyContext,
        indent: usize,
        prefix: &str,
    ) -> String {
        let header = format!("{}{}{}:", indent_prefix(indent), prefix, self.label);
        let Some(target) = self.candidates(scope, game, ctx).first().copied() else {
            return header;
        };
        let nested = self.effects.get_string(target, game, ctx, indent + 1, "");
        if nested.is_empty() {
            return header;
        }
        format!("{}\n{}", header, nested)
    }

    fn score(&self) -> i64 {
        self.effects.score()
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        if let Some(conditions) = &self.conditions {
            conditions.check_validity(db)?;
        }
        self.effects.check_validity(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::CountryId;
    use crate::testing::{database_from_text, GameBuilder};

    fn game_with_neighbors() -> Game {
        GameBuilder::new(database_from_text(&[]))
            .with_country("ALPHA")
            .with_country("BETA")
            .with_country("GAMMA")
            .with_neighbors("ALPHA", "BETA")
            .with_neighbors("ALPHA", "GAMMA")
            .build()
    }

    #[test]
    fn test_every_with_filter() {
        let mut game = game_with_neighbors();
        let (alpha, beta, gamma) = (CountryId(0), CountryId(1), CountryId(2));
        game.set_wealth(gamma, 100);
        let root = gsml::parse_str(
            "every_neighbor_country = { conditions = { wealth < 50 } wealth += 10 }",
        )
        .unwrap();
        let effects = EffectList::<CountryId>::from_gsml(&root, game.database()).unwrap();
        effects.do_effect(alpha, &mut game, &mut Context::new());
        assert_eq!(game.country(beta).wealth(), 10);
        assert_eq!(game.country(gamma).wealth(), 100);
        assert_eq!(
            effects.get_string(alpha, &game, &ReadOnlyContext::new(), 0, ""),
            "Every neighbor country:\n\tWealth: +10"
        );
    }

    #[test]
    fn test_random_picks_one_candidate() {
        let mut game = game_with_neighbors();
        let alpha = CountryId(0);
        let root = gsml::parse_str("random_neighbor_country = { wealth += 1 }").unwrap();
        let effects = EffectList::<CountryId>::from_gsml(&root, game.database()).unwrap();
        for _ in 0..10 {
            effects.do_effect(alpha, &mut game, &mut Context::new());
        }
        let total: i64 = game.country_ids().map(|c| game.country(c).wealth()).sum();
        assert_eq!(total, 10);
        assert_eq!(game.country(alpha).wealth(), 0);
    }

    #[test]
    fn test_random_reaches_every_passing_candidate() {
        let mut game = GameBuilder::new(database_from_text(&[]))
            .with_country("ALPHA")
            .with_country("BETA")
            .with_country("GAMMA")
            .with_country("DELTA")
            .with_country("EPSILON")
            .with_neighbors("ALPHA", "BETA")
            .with_neighbors("ALPHA", "GAMMA")
            .with_neighbors("ALPHA", "DELTA")
            .with_neighbors("ALPHA", "EPSILON")
            .build();
        let alpha = CountryId(0);
        let epsilon = CountryId(4);
        game.set_wealth(epsilon, 1000);
        let root = gsml::parse_str(
            "random_neighbor_country = { conditions = { wealth < 1000 } wealth += 1 }",
        )
        .unwrap();
        let effects = EffectList::<CountryId>::from_gsml(&root, game.database()).unwrap();
        for _ in 0..200 {
            effects.do_effect(alpha, &mut game, &mut Context::new());
        }

        let picks: Vec<i64> = (1..4).map(|i| game.country(CountryId(i)).wealth()).collect();
        assert!(picks.iter().all(|&p| p > 0), "{:?}", picks);
        assert_eq!(picks.iter().sum::<i64>(), 200);
        assert_eq!(game.country(epsilon).wealth(), 1000);
        assert_eq!(game.country(alpha).wealth(), 0);
    }

    #[test]
    fn test_absent_target_is_a_no_op() {
        let mut game = game_with_neighbors();
        let before = game.to_json().unwrap();
        let root = gsml::parse_str(
            "ruler = { military_skill += 1 } random_subject_country = { wealth += 1 }",
        )
        .unwrap();
        let effects = EffectList::<CountryId>::from_gsml(&root, game.database()).unwrap();
        effects.do_effect(CountryId(0), &mut game, &mut Context::new());
        assert_eq!(game.to_json().unwrap(), before);
        assert_eq!(
            effects.get_string(CountryId(0), &game, &ReadOnlyContext::new(), 0, ""),
            "Ruler:\nRandom subject country:"
        );
    }
}
