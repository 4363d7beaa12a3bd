use std::error::Error as StdError;

use thiserror::Error;

/// Result type for conversions.
pub type TransformResult<T> = Result<T, TransformError>;

/// The one error callers of the conversion API see.
///
/// Every failure means "this input is not expressible as a rule"; no variant
/// carries a partial result.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The source text could not be parsed.
    #[error("syntax error: {message}")]
    Syntax {
        message: String,
        source: Box<dyn StdError + Send + Sync + 'static>,
    },

    /// The input parsed, but uses a construct that has no rule encoding.
    #[error("unsupported construct: {construct}")]
    Unsupported { construct: String },

    /// Wrong number of statements in a program, block or arrow body.
    #[error("invalid structure: {0}")]
    Structure(String),

    /// A literal whose text does not denote a representable value.
    #[error("malformed {kind} literal `{raw}`: {reason}")]
    MalformedLiteral {
        kind: &'static str,
        raw: String,
        reason: String,
    },

    /// The syntax tree nests deeper than the configured limit.
    #[error("expression nesting exceeds the maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },
}

impl TransformError {
    /// Wrap a parser failure, keeping it as the error source.
    pub fn syntax<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        TransformError::Syntax {
            message: error.to_string(),
            source: Box::new(error),
        }
    }

    pub fn unsupported(construct: impl Into<String>) -> Self {
        TransformError::Unsupported {
            construct: construct.into(),
        }
    }

    pub fn structure(message: impl Into<String>) -> Self {
        TransformError::Structure(message.into())
    }

    /// The parser's own diagnostic, for syntax errors.
    pub fn parser_diagnostic(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            TransformError::Syntax { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
