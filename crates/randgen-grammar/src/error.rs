//! Error types for yy parsing, session construction and expansion.

use randgen_core::{KeyFunError, Position};

/// Errors raised while parsing yy text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Malformed text
    #[error("yy syntax error at {position}: {message}")]
    Syntax { position: Position, message: String },

    /// Two rules share a name
    #[error("duplicate rule '{rule}' at {position}")]
    DuplicateRule { rule: String, position: Position },

    /// A lowercase identifier names no rule
    #[error("rule '{rule}' references undefined rule '{reference}' at {position}")]
    UndefinedRule {
        rule: String,
        reference: String,
        position: Position,
    },

    /// An underscore identifier names no registered key function
    #[error("rule '{rule}' references unknown key function '{name}' at {position}")]
    UndefinedKeyFun {
        rule: String,
        name: String,
        position: Position,
    },

    /// The text defines no rules
    #[error("yy grammar defines no rules")]
    Empty,
}

impl ParseError {
    pub(crate) fn syntax(position: Position, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}

/// Errors raised while building a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("root rule '{root}' is not defined")]
    MissingRoot { root: String },

    /// A rule reachable from the root can never finish expanding
    #[error("rule '{rule}' has no terminating expansion")]
    Unproductive { rule: String },

    /// The grammar was parsed against a different key function registry
    #[error("rule '{rule}' uses a key function the registry does not define")]
    RegistryMismatch { rule: String },
}

/// Errors raised while expanding a statement.
///
/// `Clone` so a failed stream can report the same error on every later pull.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The recursion bound was hit and the rule has no way out
    #[error("rule '{rule}' cannot terminate within the recursion bound")]
    NoTermination { rule: String },

    #[error("key function '{name}' failed: {source}")]
    KeyFun {
        name: String,
        #[source]
        source: KeyFunError,
    },
}
