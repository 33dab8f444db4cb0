use super::{Effect, EffectList};
use crate::condition::{AndCondition, Condition};
use crate::context::{Context, ReadOnlyContext};
use crate::database::Database;
use crate::error::ScriptError;
use crate::game::Game;
use crate::scope::Scope;
use gsml::{Entry, GsmlData};

/// `if = { conditions = { ... } <effects> else = { <effects> } }`
///
/// The conditions are checked once, against the scope the effect runs on.
pub struct IfEffect<S: Scope> {
    conditions: AndCondition<S>,
    effects: EffectList<S>,
    else_effects: EffectList<S>,
}

impl<S: Scope> IfEffect<S> {
    pub fn from_gsml(block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        let mut conditions = None;
        let mut else_effects = EffectList::default();
        let mut entries = Vec::new();
        for entry in block.entries() {
            match entry {
                Entry::Child(c) if c.tag() == Some("conditions") => {
                    conditions = Some(AndCondition::from_gsml(c, db)?);
                }
                Entry::Child(c) if c.tag() == Some("else") => {
                    else_effects = EffectList::from_gsml(c, db)?;
                }
                other => entries.push(other),
            }
        }
        let conditions = conditions.ok_or_else(|| ScriptError::MissingField {
            context: "if".to_string(),
            field: "conditions",
        })?;
        Ok(Self {
            conditions,
            effects: EffectList::from_entries(entries.into_iter(), db)?,
            else_effects,
        })
    }

    fn branch(&self, scope: S, game: &Game, ctx: &ReadOnlyContext) -> &EffectList<S> {
        if self.conditions.check(scope, game, ctx) {
            &self.effects
        } else {
            &self.else_effects
        }
    }
}

impl<S: Scope> Effect<S> for IfEffect<S> {
    fn class_identifier(&self) -> &'static str {
        "if"
    }

    fn do_assignment_effect(&self, scope: S, game: &mut Game, ctx: &mut Context) {
        let branch = self.branch(scope, game, ctx.read_only());
        branch.do_effect(scope, game, ctx);
    }

    /// Describes the branch the current state would take.
    fn get_string(
        &self,
        scope: S,
        game: &Game,
        ctx: &ReadOnlyContext,
        indent: usize,
        prefix: &str,
    ) -> String {
        let branch = self.branch(scope, game, ctx);
        if branch.is_empty() {
            return String::new();
        }
        branch.get_string(scope, game, ctx, indent, prefix)
    }

    fn score(&self) -> i64 {
        self.effects.score().max(self.else_effects.score())
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        self.conditions.check_validity(db)?;
        self.effects.check_validity(db)?;
        self.else_effects.check_validity(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::CountryId;
    use crate::testing::{database_from_text, GameBuilder};

    #[test]
    fn test_branches() {
        let db = database_from_text(&[]);
        let root = gsml::parse_str(
            "if = { conditions = { wealth >= 50 } wealth -= 50 else = { wealth += 10 } }",
        )
        .unwrap();
        let effects = EffectList::<CountryId>::from_gsml(&root, &db).unwrap();
        let mut game = GameBuilder::new(db).with_country("ALPHA").build();
        let alpha = CountryId(0);
        let mut ctx = Context::new();

        assert_eq!(
            effects.get_string(alpha, &game, ctx.read_only(), 0, ""),
            "Wealth: +10"
        );
        effects.do_effect(alpha, &mut game, &mut ctx);
        assert_eq!(game.country(alpha).wealth(), 10);

        game.set_wealth(alpha, 60);
        assert_eq!(
            effects.get_string(alpha, &game, ctx.read_only(), 0, ""),
            "Wealth: -50"
        );
        effects.do_effect(alpha, &mut game, &mut ctx);
        assert_eq!(game.country(alpha).wealth(), 10);
    }

    #[test]
    fn test_requires_conditions() {
        let db = database_from_text(&[]);
        let root = gsml::parse_str("if = { wealth += 1 }").unwrap();
        let err = EffectList::<CountryId>::from_gsml(&root, &db).err().unwrap();
        assert!(matches!(err, ScriptError::MissingField { field: "conditions", .. }));
    }
}
