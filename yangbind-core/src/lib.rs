//! # yangbind Core
//!
//! Output type model shared by the yangbind engine and downstream emitters.
//!
//! This crate provides:
//! - Type references (`TypeRef`) and qualified names
//! - Output type descriptors (value objects, capabilities, enumerations)
//! - Restriction metadata carried by derived value types
//! - Identifier mapping rules from YANG identifiers to target-language names

pub mod error;
pub mod model;
pub mod naming;
pub mod restrictions;
pub mod types;

pub use error::NamingError;
pub use model::{
    Attribute, Capability, Contract, EnumConstant, Operation, OutputType, Parameter, TypeKind,
    TypeModel,
};
pub use restrictions::{LengthRange, Number, NumericRange, PatternConstraint, Restrictions};
pub use types::{BaseType, QualifiedName, TypeRef};
