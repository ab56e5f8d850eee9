//! Output type descriptors.
//!
//! A [`TypeModel`] is the sole hand-off artifact between the resolution
//! engine and a code emitter. Every [`OutputType`] in it has a unique
//! qualified name; nested types carry their parent's name as prefix.

use crate::restrictions::Restrictions;
use crate::types::{QualifiedName, TypeRef};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Kind of an output type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    /// Immutable value holder (typedefs, keys, unions, bits).
    ValueObject,
    /// Interface-like contract (containers, lists, groupings, choices, ...).
    Capability,
    /// Closed set of named constants.
    Enumeration,
}

/// Framework contracts an output type can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Contract {
    /// Root of a module's data tree.
    DataRoot,
    /// Can be extended by augmentations.
    Augmentable,
    /// Notification body.
    Notification,
    /// Remote procedure call.
    Rpc,
    /// Action bound to a data node.
    Action,
    /// Input of an rpc or action.
    RpcInput,
    /// Output of an rpc or action.
    RpcOutput,
    /// Identity value.
    Identity,
    /// Feature marker.
    Feature,
    /// Structure defined by the `yang-data` extension.
    YangData,
    /// Value object wrapping a single scalar.
    Scalar,
}

/// Capability implemented by an output type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Capability {
    /// Implements the referenced capability type (grouping, choice, identity).
    Implements(Arc<TypeRef>),
    /// Is a child of the referenced type in the data tree.
    ChildOf(Arc<TypeRef>),
    /// Is a choice residing in the referenced type.
    ChoiceIn(Arc<TypeRef>),
    /// Is an augmentation of the referenced type.
    AugmentationOf(Arc<TypeRef>),
    /// Implements a framework contract.
    Contract(Contract),
}

impl Capability {
    /// Returns the referenced type, if any.
    #[must_use]
    pub fn type_ref(&self) -> Option<&Arc<TypeRef>> {
        match self {
            Self::Implements(r) | Self::ChildOf(r) | Self::ChoiceIn(r) | Self::AugmentationOf(r) => {
                Some(r)
            }
            Self::Contract(_) => None,
        }
    }
}

/// Property of a value object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Property name.
    pub name: String,
    /// Property type.
    pub type_ref: Arc<TypeRef>,
    /// Whether the property is immutable after construction.
    pub read_only: bool,
}

impl Attribute {
    /// Creates a read-only attribute.
    #[must_use]
    pub fn read_only(name: impl Into<String>, type_ref: Arc<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref,
            read_only: true,
        }
    }
}

/// Parameter of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub type_ref: Arc<TypeRef>,
}

/// Accessor or invocation operation of a capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// Operation name.
    pub name: String,
    /// Return type.
    pub return_type: Arc<TypeRef>,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Whether the operation has a default implementation.
    pub default_impl: bool,
}

impl Operation {
    /// Creates an abstract, parameterless accessor.
    #[must_use]
    pub fn accessor(name: impl Into<String>, return_type: Arc<TypeRef>) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters: Vec::new(),
            default_impl: false,
        }
    }

    /// Creates a parameterless accessor with a default implementation.
    #[must_use]
    pub fn default_accessor(name: impl Into<String>, return_type: Arc<TypeRef>) -> Self {
        Self {
            default_impl: true,
            ..Self::accessor(name, return_type)
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, type_ref: Arc<TypeRef>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            type_ref,
        });
        self
    }
}

/// Constant of an enumeration type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumConstant {
    /// Target-language constant name.
    pub name: String,
    /// Name assigned in the schema.
    pub yang_name: String,
    /// Assigned integer value.
    pub value: i32,
    /// Description, if any.
    pub description: Option<String>,
}

/// Compiled type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputType {
    /// Unique qualified name.
    pub name: QualifiedName,
    /// Type kind.
    pub kind: TypeKind,
    /// Module whose schema node produced this type.
    pub module: String,
    /// Canonical identity of the originating schema node.
    pub origin: String,
    /// Attributes in declaration order.
    pub attributes: Vec<Attribute>,
    /// Operations in declaration order.
    pub operations: Vec<Operation>,
    /// Implemented capabilities, without duplicates.
    pub implements: Vec<Capability>,
    /// Types nested inside this one.
    pub nested: Vec<OutputType>,
    /// Immediate supertype in a derivation chain.
    pub super_type: Option<Arc<TypeRef>>,
    /// Attribute names participating in equality and hashing, in order.
    pub identity: Vec<String>,
    /// Restriction metadata for value objects derived from restricted types.
    pub restrictions: Option<Restrictions>,
    /// Constants of an enumeration.
    pub constants: Vec<EnumConstant>,
    /// Description, if any.
    pub description: Option<String>,
}

impl OutputType {
    /// Looks up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Looks up an operation by name.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|o| o.name == name)
    }

    /// Looks up a nested type by simple name.
    #[must_use]
    pub fn nested_type(&self, simple_name: &str) -> Option<&OutputType> {
        self.nested.iter().find(|n| n.name.simple_name() == simple_name)
    }

    /// Returns true if this type implements `capability`.
    #[must_use]
    pub fn has_capability(&self, capability: &Capability) -> bool {
        self.implements.contains(capability)
    }

    /// Returns the attributes participating in equality, in identity order.
    pub fn identity_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.identity
            .iter()
            .filter_map(|name| self.attribute(name))
    }

    /// Returns a reference to this type.
    #[must_use]
    pub fn type_ref(&self) -> Arc<TypeRef> {
        TypeRef::named(self.name.clone())
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a OutputType>) {
        out.push(self);
        for nested in &self.nested {
            nested.collect(out);
        }
    }
}

/// Ordered collection of output types produced by one generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeModel {
    types: Vec<OutputType>,
    #[serde(skip)]
    index: IndexMap<QualifiedName, Vec<usize>>,
}

impl TypeModel {
    /// Creates a model from top-level types in their final order.
    #[must_use]
    pub fn new(types: Vec<OutputType>) -> Self {
        let mut index = IndexMap::new();
        for (i, ty) in types.iter().enumerate() {
            index_type(ty, vec![i], &mut index);
        }
        Self { types, index }
    }

    /// Returns the top-level types in order.
    #[must_use]
    pub fn types(&self) -> &[OutputType] {
        &self.types
    }

    /// Returns every type, nested ones right after their parent.
    #[must_use]
    pub fn all(&self) -> Vec<&OutputType> {
        let mut out = Vec::with_capacity(self.index.len());
        for ty in &self.types {
            ty.collect(&mut out);
        }
        out
    }

    /// Looks up a type, nested or not, by qualified name.
    #[must_use]
    pub fn get(&self, name: &QualifiedName) -> Option<&OutputType> {
        let path = self.index.get(name)?;
        let (first, rest) = path.split_first()?;
        let mut current = self.types.get(*first)?;
        for i in rest {
            current = current.nested.get(*i)?;
        }
        Some(current)
    }

    /// Looks up a type by its dotted display name.
    #[must_use]
    pub fn find(&self, display_name: &str) -> Option<&OutputType> {
        self.index
            .keys()
            .find(|name| name.to_string() == display_name)
            .and_then(|name| self.get(name))
    }

    /// Returns the top-level types produced by `module`.
    pub fn for_module<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a OutputType> {
        self.types.iter().filter(move |t| t.module == module)
    }

    /// Returns the number of types, nested ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the model holds no type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl PartialEq for TypeModel {
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types
    }
}

fn index_type(ty: &OutputType, path: Vec<usize>, index: &mut IndexMap<QualifiedName, Vec<usize>>) {
    for (i, nested) in ty.nested.iter().enumerate() {
        let mut nested_path = path.clone();
        nested_path.push(i);
        index_type(nested, nested_path, index);
    }
    index.insert(ty.name.clone(), path);
}
