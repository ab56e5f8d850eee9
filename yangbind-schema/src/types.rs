//! Declared types of leaves, leaf-lists and typedefs.

use crate::error::ParseError;
use crate::path::PathExpr;
use std::fmt;
use yangbind_core::{BaseType, Restrictions};

/// Module-qualified name, already linked by the parser to its defining module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    /// Defining module name.
    pub module: String,
    /// Local name.
    pub local: String,
}

impl QName {
    /// Creates a qualified name.
    #[must_use]
    pub fn new(module: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            local: local.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.local)
    }
}

/// Member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Assigned name.
    pub name: String,
    /// Explicit value; when absent, one more than the highest value so far.
    pub value: Option<i32>,
    /// Description.
    pub description: Option<String>,
}

impl EnumMember {
    /// Creates a member with an implicit value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            description: None,
        }
    }

    /// Sets the explicit value.
    #[must_use]
    pub fn value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }
}

/// Bit of a `bits` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bit {
    /// Bit name.
    pub name: String,
    /// Explicit position.
    pub position: Option<u32>,
}

impl Bit {
    /// Creates a bit with an implicit position.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
        }
    }
}

/// Declared type of a leaf, leaf-list, typedef or union member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// Built-in type, possibly restricted.
    Primitive {
        /// Built-in base.
        base: BaseType,
        /// Restrictions applied at this occurrence.
        restrictions: Restrictions,
    },
    /// Reference to a typedef, possibly restricted further.
    Derived {
        /// Typedef name.
        name: QName,
        /// Restrictions applied at this occurrence.
        restrictions: Restrictions,
    },
    /// Reference to another leaf.
    Leafref {
        /// Path to the referenced leaf.
        path: PathExpr,
        /// `require-instance` flag.
        require_instance: bool,
    },
    /// Reference to an identity derived from the given bases.
    Identityref {
        /// Base identities.
        bases: Vec<QName>,
    },
    /// Enumeration.
    Enumeration(Vec<EnumMember>),
    /// Bits.
    Bits(Vec<Bit>),
    /// Union of member types, in declaration order.
    Union(Vec<DeclaredType>),
}

impl DeclaredType {
    /// Creates an unrestricted built-in type.
    #[must_use]
    pub fn primitive(base: BaseType) -> Self {
        Self::Primitive {
            base,
            restrictions: Restrictions::default(),
        }
    }

    /// Creates a restricted built-in type.
    #[must_use]
    pub fn restricted(base: BaseType, restrictions: Restrictions) -> Self {
        Self::Primitive { base, restrictions }
    }

    /// Creates a typedef reference.
    #[must_use]
    pub fn derived(module: impl Into<String>, local: impl Into<String>) -> Self {
        Self::Derived {
            name: QName::new(module, local),
            restrictions: Restrictions::default(),
        }
    }

    /// Creates a leafref with `require-instance true`.
    ///
    /// # Errors
    /// Returns `ParseError` if `path` is not a valid leafref path.
    pub fn leafref(path: &str) -> Result<Self, ParseError> {
        Ok(Self::Leafref {
            path: PathExpr::parse(path)?,
            require_instance: true,
        })
    }

    /// Creates an identityref.
    #[must_use]
    pub fn identityref(bases: Vec<QName>) -> Self {
        Self::Identityref { bases }
    }

    /// Creates an enumeration from member names with implicit values.
    #[must_use]
    pub fn enumeration<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enumeration(names.into_iter().map(EnumMember::new).collect())
    }

    /// Creates a bits type from bit names with implicit positions.
    #[must_use]
    pub fn bits<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Bits(names.into_iter().map(Bit::new).collect())
    }

    /// Returns the YANG keyword of this type's kind.
    #[must_use]
    pub fn keyword(&self) -> &str {
        match self {
            Self::Primitive { base, .. } => base.yang_name(),
            Self::Derived { name, .. } => &name.local,
            Self::Leafref { .. } => "leafref",
            Self::Identityref { .. } => "identityref",
            Self::Enumeration(_) => "enumeration",
            Self::Bits(_) => "bits",
            Self::Union(_) => "union",
        }
    }

    /// Returns true for types which need a generated type at the occurrence.
    #[must_use]
    pub fn is_inline_composite(&self) -> bool {
        matches!(self, Self::Enumeration(_) | Self::Bits(_) | Self::Union(_))
    }

    /// Returns the restrictions attached to this occurrence, if any.
    #[must_use]
    pub fn restrictions(&self) -> Option<&Restrictions> {
        match self {
            Self::Primitive { restrictions, .. } | Self::Derived { restrictions, .. } => {
                Some(restrictions)
            }
            _ => None,
        }
    }
}
