//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types.
//!
//! ```ignore
//! use yangbind::prelude::*;
//! ```

// Output model
pub use yangbind_core::{
    Attribute, BaseType, Capability, Contract, EnumConstant, Operation, OutputType,
    QualifiedName, TypeKind, TypeModel, TypeRef,
};

// Schema input
pub use yangbind_schema::{
    Augment, Case, Choice, Container, DeclaredType, EnumMember, Grouping, Identity, Leaf,
    LeafList, List, Module, Notification, Procedure, QName, SchemaGraph, Typedef, Uses,
};

// Engine
pub use yangbind_codegen::{
    CodegenError, CycleKind, Generator, GeneratorBuilder, GeneratorConfig, generate_for,
    generate_for_modules,
};
