use super::{effect_from_block, effect_from_property, Effect};
use crate::context::{Context, ReadOnlyContext};
use crate::database::Database;
use crate::error::ScriptError;
use crate::game::Game;
use crate::scope::Scope;
use gsml::{Entry, GsmlData};

/// Effects run in declaration order.
pub struct EffectList<S: Scope> {
    effects: Vec<Box<dyn Effect<S>>>,
}

impl<S: Scope> Default for EffectList<S> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<S: Scope> EffectList<S> {
    pub fn new(effects: Vec<Box<dyn Effect<S>>>) -> Self {
        Self { effects }
    }

    pub fn from_gsml(block: &GsmlData, db: &Database) -> Result<Self, ScriptError> {
        Self::from_entries(block.entries(), db)
    }

    pub fn from_entries<'a>(
        entries: impl Iterator<Item = Entry<'a>>,
        db: &Database,
    ) -> Result<Self, ScriptError> {
        let effects = entries
            .map(|entry| match entry {
                Entry::Property(property) => effect_from_property(property, db),
                Entry::Child(block) => effect_from_block(block, db),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(effects))
    }

    pub fn effects(&self) -> &[Box<dyn Effect<S>>] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }
}

impl<S: Scope> Effect<S> for EffectList<S> {
    fn class_identifier(&self) -> &'static str {
        "effects"
    }

    fn do_assignment_effect(&self, scope: S, game: &mut Game, ctx: &mut Context) {
        for effect in &self.effects {
            effect.do_effect(scope, game, ctx);
        }
    }

    /// One line per visible child.
    fn get_string(
        &self,
        scope: S,
        game: &Game,
        ctx: &ReadOnlyContext,
        indent: usize,
        prefix: &str,
    ) -> String {
        self.effects
            .iter()
            .map(|effect| effect.get_string(scope, game, ctx, indent, prefix))
            .filter(|line| !line.is_empty())
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn score(&self) -> i64 {
        self.effects.iter().map(|effect| effect.score()).sum()
    }

    fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        for effect in &self.effects {
            effect.check_validity(db)?;
        }
        Ok(())
    }
}
