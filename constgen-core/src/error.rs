//! Typed error handling for constgen.
//!
//! Every pipeline failure is fatal for the run: the generator never emits
//! partial output. Each variant carries the offending identifier, value or
//! expression so the message is actionable on its own.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for constgen operations.
#[derive(Error, Debug)]
pub enum ConstgenError {
    /// A digit-leading name fragment has no architecture code and no
    /// recognizable vendor word in its comment.
    #[error("Ambiguous identifier '{identifier}': starts with a digit and {}", describe_comment(.comment))]
    AmbiguousIdentifier {
        identifier: String,
        comment: Option<String>,
    },

    /// An expression references a constant that is not defined anywhere
    /// in the corpus.
    #[error("Unresolved reference '{reference}' in expression '{expression}'")]
    UnresolvedReference {
        reference: String,
        expression: String,
    },

    /// The fully substituted expression is not valid integer arithmetic.
    #[error("Malformed expression '{expression}': {message}")]
    MalformedExpression { expression: String, message: String },

    /// Two distinct constants map to the same alias-constant name.
    #[error("Name collision on '{name}': defined with values {first_value:#x} and {second_value:#x}")]
    NameCollision {
        name: String,
        first_value: i128,
        second_value: i128,
    },

    /// Expressions reference each other in a loop.
    #[error("Reference cycle through '{identifier}' (expression '{expression}')")]
    CycleDetected {
        identifier: String,
        expression: String,
    },

    /// I/O error when reading the corpus or writing output
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

fn describe_comment(comment: &Option<String>) -> String {
    match comment {
        Some(c) => format!("comment '{}' names no known vendor", c),
        None => "has no comment".to_string(),
    }
}

impl ConstgenError {
    /// Create an ambiguous identifier error.
    pub fn ambiguous(identifier: impl Into<String>, comment: Option<&str>) -> Self {
        Self::AmbiguousIdentifier {
            identifier: identifier.into(),
            comment: comment.map(str::to_string),
        }
    }

    /// Create an unresolved reference error.
    pub fn unresolved(reference: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            reference: reference.into(),
            expression: expression.into(),
        }
    }

    /// Create a malformed expression error.
    pub fn malformed(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedExpression {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Create a name collision error.
    pub fn collision(name: impl Into<String>, first_value: i128, second_value: i128) -> Self {
        Self::NameCollision {
            name: name.into(),
            first_value,
            second_value,
        }
    }

    /// Create a reference cycle error.
    pub fn cycle(identifier: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::CycleDetected {
            identifier: identifier.into(),
            expression: expression.into(),
        }
    }

    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Convenience type alias for constgen results.
pub type ConstgenResult<T> = Result<T, ConstgenError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> ConstgenResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> ConstgenResult<T> {
        self.map_err(|e| ConstgenError::io(path, e))
    }
}
