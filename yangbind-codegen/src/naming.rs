//! Namespace allocation and collision resolution.
//!
//! Every generated type claims a simple name in a namespace (a package, or
//! the nested scope of an enclosing type). Claims are made in a single
//! pre-pass in declaration order. Within a namespace names are compared
//! case-insensitively, so that child packages derived from lower-cased
//! simple names stay distinct too.
//!
//! The first claimant of a name keeps it. Every later claimant gets the
//! suffix `$<CODE>` of its construct kind, and if that is taken as well a
//! numeric tiebreak starting at 2 (`Foo$CO2`, `Foo$CO3`, ...). A name is
//! never taken back once assigned.

use indexmap::{IndexMap, IndexSet};
use yangbind_core::{NamingError, QualifiedName};
use yangbind_schema::SchemaId;

/// Construct kind on whose behalf a name is claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Module data root.
    DataRoot,
    /// `container`
    Container,
    /// `list` item
    List,
    /// `choice`
    Choice,
    /// `case`
    Case,
    /// `grouping`
    Grouping,
    /// `typedef`
    Typedef,
    /// `identity`
    Identity,
    /// `feature`
    Feature,
    /// `rpc`
    Rpc,
    /// `action`
    Action,
    /// `input`
    Input,
    /// `output`
    Output,
    /// `notification`
    Notification,
    /// `augment`
    Augment,
    /// List key.
    ListKey,
    /// `yang-data`
    YangData,
    /// Inline enumeration, bits or union of a leaf.
    Inline,
}

impl Role {
    /// Returns the disambiguation suffix code.
    ///
    /// Inline types have no code; they only ever take a numeric tiebreak.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Container => Some("CO"),
            Self::List => Some("LI"),
            Self::Choice => Some("CH"),
            Self::Case => Some("CA"),
            Self::Grouping => Some("GR"),
            Self::Typedef => Some("TD"),
            Self::Identity => Some("IY"),
            Self::Feature => Some("FE"),
            Self::Rpc => Some("RP"),
            Self::Action => Some("AC"),
            Self::Input => Some("IP"),
            Self::Output => Some("OU"),
            Self::Notification => Some("NO"),
            Self::Augment => Some("AU"),
            Self::ListKey => Some("KE"),
            Self::YangData => Some("YD"),
            Self::DataRoot => Some("DR"),
            Self::Inline => None,
        }
    }
}

/// Scope within which simple names must be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Package holding top-level types.
    Package(String),
    /// Types nested inside the given type.
    Nested(QualifiedName),
}

impl Namespace {
    /// Returns the qualified name of `simple_name` in this namespace.
    #[must_use]
    pub fn qualify(&self, simple_name: impl Into<String>) -> QualifiedName {
        match self {
            Self::Package(package) => QualifiedName::new(package.clone(), simple_name),
            Self::Nested(parent) => parent.nested(simple_name),
        }
    }
}

/// Identity of a claim: one schema node acting in one role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaimKey {
    /// Claiming schema node.
    pub id: SchemaId,
    /// Role of the claim.
    pub role: Role,
}

impl ClaimKey {
    /// Creates a claim key.
    #[must_use]
    pub fn new(id: SchemaId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Per-namespace record of proposed names and their claimants.
#[derive(Debug, Default)]
pub struct CollisionRegistry {
    proposals: IndexMap<Namespace, IndexMap<String, Vec<ClaimKey>>>,
    taken: IndexMap<Namespace, IndexSet<String>>,
}

impl CollisionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a claim of `proposed` and returns the simple name granted.
    pub fn claim(&mut self, namespace: &Namespace, proposed: &str, key: ClaimKey) -> String {
        let folded = proposed.to_lowercase();
        let role = key.role;
        self.proposals
            .entry(namespace.clone())
            .or_default()
            .entry(folded.clone())
            .or_default()
            .push(key);

        let taken = self.taken.entry(namespace.clone()).or_default();
        if taken.insert(folded) {
            return proposed.to_string();
        }

        let base = match role.code() {
            Some(code) => format!("{proposed}${code}"),
            None => format!("{proposed}$"),
        };
        if role.code().is_some() && taken.insert(base.to_lowercase()) {
            return base;
        }
        let mut n = 2u32;
        loop {
            let candidate = format!("{base}{n}");
            if taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Returns every claimant that proposed `proposed` in `namespace`, in
    /// claim order.
    #[must_use]
    pub fn claimants(&self, namespace: &Namespace, proposed: &str) -> &[ClaimKey] {
        self.proposals
            .get(namespace)
            .and_then(|m| m.get(&proposed.to_lowercase()))
            .map_or(&[], Vec::as_slice)
    }

    /// Returns true if `simple_name` is already granted in `namespace`.
    #[must_use]
    pub fn is_taken(&self, namespace: &Namespace, simple_name: &str) -> bool {
        self.taken
            .get(namespace)
            .is_some_and(|t| t.contains(&simple_name.to_lowercase()))
    }
}

/// Run-scoped allocator of qualified names, memoized per claim key.
#[derive(Debug, Default)]
pub struct NamespaceAllocator {
    assigned: IndexMap<ClaimKey, QualifiedName>,
    registry: CollisionRegistry,
}

impl NamespaceAllocator {
    /// Creates an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a name for `id` acting as `role`.
    ///
    /// Repeated calls with the same `(id, role)` return the first result.
    ///
    /// # Errors
    /// Returns `NamingError::EmptyIdentifier` for an empty proposal.
    pub fn allocate(
        &mut self,
        id: &SchemaId,
        role: Role,
        proposed: &str,
        namespace: &Namespace,
    ) -> Result<QualifiedName, NamingError> {
        let key = ClaimKey::new(id.clone(), role);
        if let Some(name) = self.assigned.get(&key) {
            return Ok(name.clone());
        }
        if proposed.is_empty() {
            return Err(NamingError::empty(id.to_string()));
        }

        let simple = self.registry.claim(namespace, proposed, key.clone());
        if simple != proposed {
            tracing::debug!(
                "name '{}' of {} ({:?}) collides in {:?}, using '{}'",
                proposed,
                id,
                role,
                namespace,
                simple
            );
        }
        let name = namespace.qualify(simple);
        self.assigned.insert(key, name.clone());
        Ok(name)
    }

    /// Looks up the name already allocated for `(id, role)`.
    #[must_use]
    pub fn lookup(&self, id: &SchemaId, role: Role) -> Option<&QualifiedName> {
        self.assigned.get(&ClaimKey::new(id.clone(), role))
    }

    /// Returns the collision registry.
    #[must_use]
    pub fn registry(&self) -> &CollisionRegistry {
        &self.registry
    }

    /// Returns the number of allocated names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Returns true if nothing was allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
