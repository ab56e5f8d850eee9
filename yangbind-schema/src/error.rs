//! Error types for schema construction and validation.

use thiserror::Error;

/// Error raised while parsing textual schema fragments such as paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Path expression is empty.
    #[error("empty path expression")]
    EmptyPath,

    /// Path expression is malformed.
    #[error("invalid path '{path}': {message}")]
    InvalidPath {
        /// Offending path.
        path: String,
        /// What is wrong with it.
        message: String,
    },

    /// Unbalanced predicate brackets.
    #[error("unbalanced predicate in path '{path}'")]
    UnbalancedPredicate {
        /// Offending path.
        path: String,
    },
}

impl ParseError {
    /// Creates an invalid path error.
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Error raised by referential validation of a schema graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Two modules share a name.
    #[error("duplicate module definition: '{name}'")]
    DuplicateModule {
        /// Module name.
        name: String,
    },

    /// A module imports a module absent from the graph.
    #[error("module '{module}' imports unknown module '{import}'")]
    UnknownImport {
        /// Importing module.
        module: String,
        /// Missing module.
        import: String,
    },

    /// A prefix is bound twice within one module.
    #[error("prefix '{prefix}' is bound more than once in module '{module}'")]
    DuplicatePrefix {
        /// Module declaring the prefix.
        module: String,
        /// Prefix.
        prefix: String,
    },

    /// Modules import each other.
    #[error("circular import detected: {path}")]
    CircularImport {
        /// Import chain, arrow-separated.
        path: String,
    },

    /// Validation error.
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },
}

impl SchemaError {
    /// Creates a generic validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
