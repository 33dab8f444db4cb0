use crate::scope::ScopeKind;
use gsml::GsmlOperator;
use thiserror::Error;

/// Content errors raised while building or validating scripted data.
///
/// These are fatal to loading: a database with a dangling reference or an
/// unknown script token never reaches a playable state.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Unknown {scope} condition: '{key}'")]
    UnknownCondition { scope: ScopeKind, key: String },

    #[error("Unknown {scope} effect: '{key}'")]
    UnknownEffect { scope: ScopeKind, key: String },

    #[error("Unknown {scope} modifier effect: '{key}'")]
    UnknownModifierEffect { scope: ScopeKind, key: String },

    #[error("Unknown {category} identifier: '{identifier}'")]
    UnknownIdentifier {
        category: &'static str,
        identifier: String,
    },

    #[error("Duplicate {category} identifier: '{identifier}'")]
    DuplicateIdentifier {
        category: &'static str,
        identifier: String,
    },

    #[error("Operator '{operator}' is not valid for '{key}'")]
    InvalidOperator { key: String, operator: GsmlOperator },

    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("'{context}' is missing required field '{field}'")]
    MissingField {
        context: String,
        field: &'static str,
    },

    #[error("{category} '{identifier}' is invalid: {reason}")]
    Invalid {
        category: &'static str,
        identifier: String,
        reason: String,
    },

    /// Attributes a nested error to the data entry that declared it.
    #[error("In {category} '{identifier}': {source}")]
    InEntry {
        category: &'static str,
        identifier: String,
        #[source]
        source: Box<ScriptError>,
    },

    #[error(transparent)]
    Parse(#[from] gsml::ParseError),
}

impl ScriptError {
    pub fn invalid_value(key: &str, value: &str, reason: impl ToString) -> Self {
        ScriptError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn in_entry(self, category: &'static str, identifier: &str) -> Self {
        ScriptError::InEntry {
            category,
            identifier: identifier.to_string(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping entry attribution.
    pub fn root_cause(&self) -> &ScriptError {
        match self {
            ScriptError::InEntry { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors from saved-scope lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("Saved scope '{name}' is a {found}, expected a {expected}")]
    ScopeTypeMismatch {
        name: String,
        expected: ScopeKind,
        found: ScopeKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = ScriptError::UnknownCondition {
            scope: ScopeKind::Character,
            key: "has_fleet".to_string(),
        }
        .in_entry("law", "serfdom");
        assert_eq!(
            err.to_string(),
            "In law 'serfdom': Unknown character condition: 'has_fleet'"
        );
        assert!(matches!(
            err.root_cause(),
            ScriptError::UnknownCondition { .. }
        ));
    }
}
