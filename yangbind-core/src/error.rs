//! Error types for identifier mapping.

use thiserror::Error;

/// Error raised when an identifier cannot be mapped to a target-language name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// The identifier is empty and has no representation, not even escaped.
    #[error("empty identifier cannot be mapped ({context})")]
    EmptyIdentifier {
        /// Where the identifier was encountered.
        context: String,
    },

    /// Two distinct identifiers mapped onto the same escaped name.
    #[error("identifiers '{first}' and '{second}' map to the same name '{mapped}'")]
    Ambiguous {
        /// First identifier.
        first: String,
        /// Second identifier.
        second: String,
        /// Shared mapped name.
        mapped: String,
    },
}

impl NamingError {
    /// Creates an empty identifier error.
    pub fn empty(context: impl Into<String>) -> Self {
        Self::EmptyIdentifier {
            context: context.into(),
        }
    }
}
