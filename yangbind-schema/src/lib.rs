//! # yangbind Schema
//!
//! In-memory YANG schema graph consumed by the yangbind engine.
//!
//! This crate provides:
//! - Modules, imports and a closed statement tree in declaration order
//! - Declared types with their restrictions
//! - Leafref path expressions
//! - Canonical schema node identities
//! - Referential validation of a multi-module graph

pub mod error;
pub mod ids;
pub mod module;
pub mod nodes;
pub mod path;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use ids::{SchemaId, Step, StepKind};
pub use module::{Import, Module, SchemaGraph};
pub use nodes::{
    AnyNode, Augment, Case, Choice, Container, Feature, Grouping, Identity, Leaf, LeafList, List,
    Notification, Procedure, Refine, Statement, Typedef, Uses, YangData,
};
pub use path::{PathExpr, PathStep};
pub use types::{Bit, DeclaredType, EnumMember, QName};
pub use validation::validate_graph;
