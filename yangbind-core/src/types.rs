//! Type references and qualified names.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Base types every type reference eventually bottoms out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BaseType {
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// Fixed-point decimal.
    Decimal64,
    /// Character string.
    String,
    /// Boolean.
    Boolean,
    /// Binary blob.
    Binary,
    /// Presence-only value.
    Empty,
    /// Instance identifier (path into the data tree).
    InstanceIdentifier,
    /// Opaque payload of `anyxml`/`anydata` nodes.
    Opaque,
    /// Untyped value, used where a type cannot be known at the declaration.
    Object,
}

impl BaseType {
    /// Returns the YANG built-in name.
    #[must_use]
    pub const fn yang_name(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Decimal64 => "decimal64",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Binary => "binary",
            Self::Empty => "empty",
            Self::InstanceIdentifier => "instance-identifier",
            Self::Opaque => "anydata",
            Self::Object => "object",
        }
    }

    /// Parses a YANG built-in name.
    #[must_use]
    pub fn from_yang_name(name: &str) -> Option<Self> {
        match name {
            "int8" => Some(Self::Int8),
            "int16" => Some(Self::Int16),
            "int32" => Some(Self::Int32),
            "int64" => Some(Self::Int64),
            "uint8" => Some(Self::Uint8),
            "uint16" => Some(Self::Uint16),
            "uint32" => Some(Self::Uint32),
            "uint64" => Some(Self::Uint64),
            "decimal64" => Some(Self::Decimal64),
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "binary" => Some(Self::Binary),
            "empty" => Some(Self::Empty),
            "instance-identifier" => Some(Self::InstanceIdentifier),
            _ => None,
        }
    }

    /// Returns the target-language type name.
    #[must_use]
    pub const fn target_name(&self) -> &'static str {
        match self {
            Self::Int8 => "java.lang.Byte",
            Self::Int16 => "java.lang.Short",
            Self::Int32 => "java.lang.Integer",
            Self::Int64 => "java.lang.Long",
            Self::Uint8 => "org.opendaylight.yangtools.yang.common.Uint8",
            Self::Uint16 => "org.opendaylight.yangtools.yang.common.Uint16",
            Self::Uint32 => "org.opendaylight.yangtools.yang.common.Uint32",
            Self::Uint64 => "org.opendaylight.yangtools.yang.common.Uint64",
            Self::Decimal64 => "org.opendaylight.yangtools.yang.common.Decimal64",
            Self::String => "java.lang.String",
            Self::Boolean => "java.lang.Boolean",
            Self::Binary => "byte[]",
            Self::Empty => "org.opendaylight.yangtools.yang.common.Empty",
            Self::InstanceIdentifier => "org.opendaylight.yangtools.binding.InstanceIdentifier",
            Self::Opaque => "org.opendaylight.yangtools.binding.OpaqueObject",
            Self::Object => "java.lang.Object",
        }
    }

    /// Returns true for the integral types.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Uint8
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
        )
    }
}

/// Fully qualified name of an output type.
///
/// `path` holds the simple name of a top-level type, or the chain of
/// enclosing simple names for a nested type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QualifiedName {
    /// Package (namespace) of the outermost type.
    pub package: String,
    /// Simple names from the outermost type down to this one.
    pub path: Vec<String>,
}

impl QualifiedName {
    /// Creates a top-level name.
    #[must_use]
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            path: vec![simple_name.into()],
        }
    }

    /// Creates the name of a type nested directly inside this one.
    #[must_use]
    pub fn nested(&self, simple_name: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(simple_name.into());
        Self {
            package: self.package.clone(),
            path,
        }
    }

    /// Returns the innermost simple name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    /// Returns the name of the enclosing type, if nested.
    #[must_use]
    pub fn enclosing(&self) -> Option<Self> {
        (self.path.len() > 1).then(|| Self {
            package: self.package.clone(),
            path: self.path[..self.path.len() - 1].to_vec(),
        })
    }

    /// Returns true if this names a nested type.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.path.len() > 1
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.package)?;
        for segment in &self.path {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

/// Immutable reference to a type, shared between attributes and operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeRef {
    /// Built-in base type.
    Base(BaseType),
    /// Generated output type, built or in progress.
    Named(QualifiedName),
    /// Ordered sequence of the inner type.
    Sequence(Arc<TypeRef>),
    /// Set of unique values of the inner type.
    UniqueSet(Arc<TypeRef>),
    /// Map of list entries, keyed by the inner item type's key.
    KeyedMap(Arc<TypeRef>),
}

impl TypeRef {
    /// Creates a reference to a generated type.
    #[must_use]
    pub fn named(name: QualifiedName) -> Arc<Self> {
        Arc::new(Self::Named(name))
    }

    /// Returns the referenced output type name, looking through containers.
    #[must_use]
    pub fn target_name(&self) -> Option<&QualifiedName> {
        match self {
            Self::Base(_) => None,
            Self::Named(name) => Some(name),
            Self::Sequence(inner) | Self::UniqueSet(inner) | Self::KeyedMap(inner) => {
                inner.target_name()
            }
        }
    }

    /// Returns the base type if this is a direct base reference.
    #[must_use]
    pub fn as_base(&self) -> Option<BaseType> {
        match self {
            Self::Base(base) => Some(*base),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(base) => f.write_str(base.target_name()),
            Self::Named(name) => write!(f, "{name}"),
            Self::Sequence(inner) => write!(f, "java.util.List<{inner}>"),
            Self::UniqueSet(inner) => write!(f, "java.util.Set<{inner}>"),
            Self::KeyedMap(inner) => write!(f, "java.util.Map<Key<{inner}>, {inner}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_type_round_trip_names() {
        for base in [BaseType::Int8, BaseType::Uint64, BaseType::InstanceIdentifier] {
            assert_eq!(BaseType::from_yang_name(base.yang_name()), Some(base));
        }
        assert_eq!(BaseType::from_yang_name("leafref"), None);
    }

    #[test]
    fn test_qualified_name_nesting() {
        let outer = QualifiedName::new("pkg.norev", "Top");
        let inner = outer.nested("Union").nested("Enumeration");
        assert_eq!(inner.to_string(), "pkg.norev.Top.Union.Enumeration");
        assert_eq!(inner.simple_name(), "Enumeration");
        assert_eq!(inner.enclosing().unwrap().enclosing(), Some(outer.clone()));
        assert!(!outer.is_nested());
        assert!(outer.enclosing().is_none());
    }

    #[test]
    fn test_type_ref_target_name() {
        let name = QualifiedName::new("p", "Item");
        let map = TypeRef::KeyedMap(TypeRef::named(name.clone()));
        assert_eq!(map.target_name(), Some(&name));
        assert_eq!(TypeRef::Base(BaseType::String).target_name(), None);
        assert_eq!(
            TypeRef::Base(BaseType::Uint8).as_base(),
            Some(BaseType::Uint8)
        );
    }

    #[test]
    fn test_type_ref_structural_equality() {
        let a = TypeRef::named(QualifiedName::new("p", "A"));
        let b = TypeRef::named(QualifiedName::new("p", "A"));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a, b);
    }
}
