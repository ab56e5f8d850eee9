//! # yangbind
//!
//! Compiles YANG schema graphs into binding type models.
//!
//! yangbind takes a linked, multi-module YANG schema graph and produces a
//! deterministic, fully named and fully resolved model of the types a
//! binding generator emits: data-tree capabilities, list keys, typedef value
//! objects, enumerations, unions, identities and operations.
//!
//! ## Features
//!
//! - **Effective tree** - groupings instantiated, augments grafted across modules
//! - **Stable naming** - collision suffixes that survive schema evolution
//! - **Shared references** - one type per typedef, leafref chains followed to their terminal
//! - **Subset runs** - emit a few modules while resolving against the whole graph
//!
//! ## Quick Start
//!
//! ```ignore
//! use yangbind::prelude::*;
//!
//! let module = Module::new("demo", "d", "urn:demo")
//!     .child(Container::new("top").child(Leaf::new(
//!         "name",
//!         DeclaredType::primitive(BaseType::String),
//!     )));
//! let graph = SchemaGraph::from_modules([module])?;
//! let model = generate_for(&graph)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Output type model and identifier mapping
//! - [`schema`] - Schema graph, declared types and validation
//! - [`codegen`] - Resolution and naming engine

pub mod prelude;

/// Output type model and identifier mapping.
pub mod core {
    pub use yangbind_core::*;
}

/// Schema graph input.
pub mod schema {
    pub use yangbind_schema::*;
}

/// Resolution and naming engine.
pub mod codegen {
    pub use yangbind_codegen::*;
}

pub use yangbind_codegen::{generate_for, generate_for_modules};
