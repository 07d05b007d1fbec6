//! Error types for zz interpretation.

use randgen_core::Position;

/// Errors raised while parsing or interpreting zz text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZzError {
    /// Malformed token stream
    #[error("zz syntax error at {position}: {message}")]
    Syntax { position: Position, message: String },

    /// Well-formed text naming something the interpreter does not know
    #[error("zz semantic error at {position}: {message}")]
    Semantic { position: Position, message: String },
}

impl ZzError {
    pub(crate) fn syntax(position: Position, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn semantic(position: Position, message: impl Into<String>) -> Self {
        Self::Semantic {
            position,
            message: message.into(),
        }
    }

    /// Position the error refers to.
    pub fn position(&self) -> Position {
        match self {
            Self::Syntax { position, .. } | Self::Semantic { position, .. } => *position,
        }
    }
}
