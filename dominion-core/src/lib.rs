//! # Dominion Core
//!
//! Scripted rule engine for a grand-strategy simulation.
//!
//! Game content (laws, technologies, traits, decisions, ...) is written in
//! GSML and declares three kinds of scripts, each generic over the entity
//! it runs against (a *scope*):
//!
//! ```text
//! ┌───────────┐   factories    ┌──────────────┐   check / do / apply   ┌──────┐
//! │ GSML tree │──────────────▶│ Condition<S> │───────────────────────▶│ Game │
//! │ (gsml)    │  per scope     │ Effect<S>    │  scope + Context       │      │
//! └───────────┘  type tables   │ Modifier<S>  │                        └──────┘
//!                              └──────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Condition`] | Pure predicate over a scope (`AndCondition`, numerical, scope navigation) |
//! | [`Effect`] | State mutation over a scope, with a projected description |
//! | [`Modifier`] | Reversible bundle of stat changes, applied while its owner is active |
//! | [`Context`] | Source scope and saved scopes of one evaluation |
//! | [`Database`] | Identifier registries for every content category |
//! | [`Game`] | Countries, characters, provinces, sites, population and military units |
//! | [`Fixed`] | Integer-backed decimal used instead of floats |
//!
//! Scripts are parsed once, when the database loads. Unknown keys and
//! identifiers are load errors ([`ScriptError`]); at evaluation time an
//! absent scope is never an error, it is a `false` condition or a skipped
//! effect.
//!
//! ## Modifiers
//!
//! Owner transitions on [`Game`] (`set_law`, `add_technology`, `set_tier`,
//! `add_trait`, ...) remove the old owner's modifier and apply the new one
//! exactly once. With [`GameConfig::debug_validation`] the game also counts
//! activations and flags any unmatched apply or remove.

pub mod condition;
pub mod config;
pub mod context;
pub mod database;
pub mod effect;
pub mod error;
pub mod fixed;
pub mod game;
pub mod modifier;
pub mod navigation;
pub mod scope;
pub mod testing;

pub use condition::{AndCondition, Condition, ConditionOperator, NotCondition, OrCondition};
pub use config::{GameConfig, GameDefines};
pub use context::{Context, ReadOnlyContext};
pub use database::{Database, DomainTier};
pub use effect::{Effect, EffectList, EffectOperator};
pub use error::{ContextError, ScriptError};
pub use fixed::{Centesimal, Fixed, FixedPoint, Millesimal, Rounding};
pub use game::{Game, ModifierOwner};
pub use modifier::{Modifier, ModifierEffect};
pub use scope::{
    CharacterId, CountryId, MilitaryUnitId, PopulationUnitId, ProvinceId, SavedScope, Scope,
    ScopeKind, SiteId,
};
