//! # yangbind Codegen
//!
//! Resolution and naming engine compiling a YANG schema graph into a type
//! model.
//!
//! This crate provides:
//! - Effective tree construction (groupings instantiated, augments grafted)
//! - Deterministic namespace allocation with collision suffixes
//! - Type reference resolution through typedef and leafref chains
//! - Structural type construction for every data definition construct

mod builder;
mod context;
pub mod error;
pub mod generator;
pub mod naming;
mod resolver;
mod tree;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod scenarios;

pub use error::{CodegenError, CycleKind};
pub use generator::{Generator, GeneratorBuilder, GeneratorConfig};
pub use naming::{ClaimKey, CollisionRegistry, Namespace, NamespaceAllocator, Role};

use yangbind_core::TypeModel;
use yangbind_schema::SchemaGraph;

/// Generates the type model of every module in a schema graph.
///
/// # Errors
/// Returns `CodegenError` if validation, resolution or naming fails.
pub fn generate_for(graph: &SchemaGraph) -> Result<TypeModel, CodegenError> {
    Generator::default().generate(graph)
}

/// Generates the type model restricted to the types of `modules`.
///
/// References into other modules still resolve and are named as in a full
/// run.
///
/// # Errors
/// Returns `CodegenError` if a module is unknown, or if validation,
/// resolution or naming fails.
pub fn generate_for_modules(
    graph: &SchemaGraph,
    modules: &[&str],
) -> Result<TypeModel, CodegenError> {
    Generator::builder()
        .modules(modules.iter().copied())
        .build()
        .generate(graph)
}
