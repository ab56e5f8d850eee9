//! Error types for type model generation.

use std::fmt;
use thiserror::Error;
use yangbind_core::NamingError;
use yangbind_schema::SchemaError;

/// Kind of reference chain in which a cycle was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleKind {
    /// Leafref pointing, directly or through other leafrefs, back to itself.
    Leafref,
    /// Typedef derived, directly or indirectly, from itself.
    Typedef,
    /// Grouping used, directly or indirectly, inside itself.
    Grouping,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Leafref => "leafref",
            Self::Typedef => "typedef",
            Self::Grouping => "grouping",
        })
    }
}

/// Error type for generation runs. Any error aborts the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// A reference chain re-entered one of its own nodes.
    #[error("{kind} cycle re-enters '{at}' (chain: {})", .chain.join(" -> "))]
    Cycle {
        /// Chain kind.
        kind: CycleKind,
        /// Node at which the chain closes.
        at: String,
        /// Chain from its start up to and including the re-entered node.
        chain: Vec<String>,
    },

    /// A reference names something that does not exist.
    #[error("unresolvable reference '{path}' at '{location}': '{missing}' not found")]
    Unresolvable {
        /// Node holding the reference.
        location: String,
        /// Reference as written.
        path: String,
        /// First segment which could not be found.
        missing: String,
    },

    /// The schema uses a construct that has no type model representation.
    #[error("unsupported {construct} at '{location}'")]
    Unsupported {
        /// Description of the construct.
        construct: String,
        /// Node where it appears.
        location: String,
    },

    /// Identifier mapping failed.
    #[error("naming error: {0}")]
    Naming(#[from] NamingError),

    /// The input graph failed referential validation.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl CodegenError {
    /// Creates an unresolvable reference error.
    pub fn unresolvable(
        location: impl fmt::Display,
        path: impl Into<String>,
        missing: impl Into<String>,
    ) -> Self {
        Self::Unresolvable {
            location: location.to_string(),
            path: path.into(),
            missing: missing.into(),
        }
    }

    /// Creates an unsupported construct error.
    pub fn unsupported(construct: impl Into<String>, location: impl fmt::Display) -> Self {
        Self::Unsupported {
            construct: construct.into(),
            location: location.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_names_reentry() {
        let err = CodegenError::Cycle {
            kind: CycleKind::Leafref,
            at: "m:/leaf=a".to_string(),
            chain: vec![
                "m:/leaf=a".to_string(),
                "m:/leaf=b".to_string(),
                "m:/leaf=a".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "leafref cycle re-enters 'm:/leaf=a' (chain: m:/leaf=a -> m:/leaf=b -> m:/leaf=a)"
        );
    }

    #[test]
    fn test_from_schema_error() {
        let err: CodegenError = SchemaError::DuplicateModule {
            name: "a".to_string(),
        }
        .into();
        assert!(matches!(err, CodegenError::Schema(_)));
    }
}
