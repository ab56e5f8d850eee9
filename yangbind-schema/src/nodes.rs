//! Schema statements.
//!
//! A module body is an ordered list of [`Statement`]s. Declaration order is
//! preserved everywhere and drives naming tie-breaks downstream.

use crate::types::{DeclaredType, QName};

/// Schema statement, a closed set of node kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `typedef`
    Typedef(Typedef),
    /// `grouping`
    Grouping(Grouping),
    /// `identity`
    Identity(Identity),
    /// `feature`
    Feature(Feature),
    /// `container`
    Container(Container),
    /// `list`
    List(List),
    /// `leaf`
    Leaf(Leaf),
    /// `leaf-list`
    LeafList(LeafList),
    /// `choice`
    Choice(Choice),
    /// `case`
    Case(Case),
    /// `anyxml`
    AnyXml(AnyNode),
    /// `anydata`
    AnyData(AnyNode),
    /// `uses`
    Uses(Uses),
    /// `augment`
    Augment(Augment),
    /// `rpc`
    Rpc(Procedure),
    /// `action`
    Action(Procedure),
    /// `notification`
    Notification(Notification),
    /// `yang-data` extension statement
    YangData(YangData),
}

impl Statement {
    /// Returns the YANG keyword.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Typedef(_) => "typedef",
            Self::Grouping(_) => "grouping",
            Self::Identity(_) => "identity",
            Self::Feature(_) => "feature",
            Self::Container(_) => "container",
            Self::List(_) => "list",
            Self::Leaf(_) => "leaf",
            Self::LeafList(_) => "leaf-list",
            Self::Choice(_) => "choice",
            Self::Case(_) => "case",
            Self::AnyXml(_) => "anyxml",
            Self::AnyData(_) => "anydata",
            Self::Uses(_) => "uses",
            Self::Augment(_) => "augment",
            Self::Rpc(_) => "rpc",
            Self::Action(_) => "action",
            Self::Notification(_) => "notification",
            Self::YangData(_) => "yang-data",
        }
    }

    /// Returns the statement argument: the node name, the used grouping or
    /// the augment target.
    #[must_use]
    pub fn argument(&self) -> String {
        match self {
            Self::Typedef(s) => s.name.clone(),
            Self::Grouping(s) => s.name.clone(),
            Self::Identity(s) => s.name.clone(),
            Self::Feature(s) => s.name.clone(),
            Self::Container(s) => s.name.clone(),
            Self::List(s) => s.name.clone(),
            Self::Leaf(s) => s.name.clone(),
            Self::LeafList(s) => s.name.clone(),
            Self::Choice(s) => s.name.clone(),
            Self::Case(s) => s.name.clone(),
            Self::AnyXml(s) | Self::AnyData(s) => s.name.clone(),
            Self::Uses(s) => s.grouping.to_string(),
            Self::Augment(s) => s.target_path(),
            Self::Rpc(s) | Self::Action(s) => s.name.clone(),
            Self::Notification(s) => s.name.clone(),
            Self::YangData(s) => s.name.clone(),
        }
    }

    /// Returns true for data definition statements.
    #[must_use]
    pub const fn is_data_node(&self) -> bool {
        matches!(
            self,
            Self::Container(_)
                | Self::List(_)
                | Self::Leaf(_)
                | Self::LeafList(_)
                | Self::Choice(_)
                | Self::AnyXml(_)
                | Self::AnyData(_)
        )
    }
}

macro_rules! impl_from_statement {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Statement {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_statement! {
    Typedef => Typedef,
    Grouping => Grouping,
    Identity => Identity,
    Feature => Feature,
    Container => Container,
    List => List,
    Leaf => Leaf,
    LeafList => LeafList,
    Choice => Choice,
    Case => Case,
    Uses => Uses,
    Augment => Augment,
    Notification => Notification,
    YangData => YangData,
}

/// `typedef` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typedef {
    /// Typedef name.
    pub name: String,
    /// Underlying type.
    pub ty: DeclaredType,
    /// Description.
    pub description: Option<String>,
}

impl Typedef {
    /// Creates a typedef.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
        }
    }
}

/// `grouping` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    /// Grouping name.
    pub name: String,
    /// Body.
    pub body: Vec<Statement>,
}

impl Grouping {
    /// Creates an empty grouping.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
        }
    }

    /// Appends a body statement.
    #[must_use]
    pub fn child(mut self, stmt: impl Into<Statement>) -> Self {
        self.body.push(stmt.into());
        self
    }
}

/// `identity` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Identity name.
    pub name: String,
    /// Base identities.
    pub bases: Vec<QName>,
}

impl Identity {
    /// Creates an identity without bases.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
        }
    }

    /// Adds a base identity.
    #[must_use]
    pub fn base(mut self, base: QName) -> Self {
        self.bases.push(base);
        self
    }
}

/// `feature` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Feature name.
    pub name: String,
}

impl Feature {
    /// Creates a feature.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// `container` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Node name.
    pub name: String,
    /// Whether the container has a `presence` statement.
    pub presence: bool,
    /// Body.
    pub body: Vec<Statement>,
}

impl Container {
    /// Creates an empty non-presence container.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            presence: false,
            body: Vec::new(),
        }
    }

    /// Appends a body statement.
    #[must_use]
    pub fn child(mut self, stmt: impl Into<Statement>) -> Self {
        self.body.push(stmt.into());
        self
    }
}

/// `list` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    /// Node name.
    pub name: String,
    /// Key leaf names in key order.
    pub keys: Vec<String>,
    /// Whether the list is `ordered-by user`.
    pub ordered_by_user: bool,
    /// Body.
    pub body: Vec<Statement>,
}

impl List {
    /// Creates an empty keyless list.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
            ordered_by_user: false,
            body: Vec::new(),
        }
    }

    /// Sets the key leaves.
    #[must_use]
    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the list `ordered-by user`.
    #[must_use]
    pub fn ordered_by_user(mut self) -> Self {
        self.ordered_by_user = true;
        self
    }

    /// Appends a body statement.
    #[must_use]
    pub fn child(mut self, stmt: impl Into<Statement>) -> Self {
        self.body.push(stmt.into());
        self
    }
}

/// `leaf` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    /// Node name.
    pub name: String,
    /// Declared type.
    pub ty: DeclaredType,
    /// `mandatory` flag.
    pub mandatory: bool,
    /// Default value.
    pub default: Option<String>,
    /// Description.
    pub description: Option<String>,
}

impl Leaf {
    /// Creates an optional leaf.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
            mandatory: false,
            default: None,
            description: None,
        }
    }

    /// Marks the leaf mandatory.
    #[must_use]
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }
}

/// `leaf-list` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafList {
    /// Node name.
    pub name: String,
    /// Declared element type.
    pub ty: DeclaredType,
    /// Whether the leaf-list is `ordered-by user`.
    pub ordered_by_user: bool,
}

impl LeafList {
    /// Creates a system-ordered leaf-list.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
            ordered_by_user: false,
        }
    }

    /// Marks the leaf-list `ordered-by user`.
    #[must_use]
    pub fn ordered_by_user(mut self) -> Self {
        self.ordered_by_user = true;
        self
    }
}

/// `choice` statement. Body statements which are not `case` are
/// shorthand cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Node name.
    pub name: String,
    /// Cases and shorthand data nodes.
    pub body: Vec<Statement>,
}

impl Choice {
    /// Creates an empty choice.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
        }
    }

    /// Appends a case or shorthand data node.
    #[must_use]
    pub fn child(mut self, stmt: impl Into<Statement>) -> Self {
        self.body.push(stmt.into());
        self
    }
}

/// `case` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// Case name.
    pub name: String,
    /// Body.
    pub body: Vec<Statement>,
}

impl Case {
    /// Creates an empty case.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
        }
    }

    /// Appends a body statement.
    #[must_use]
    pub fn child(mut self, stmt: impl Into<Statement>) -> Self {
        self.body.push(stmt.into());
        self
    }
}

/// `anyxml` or `anydata` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyNode {
    /// Node name.
    pub name: String,
}

impl AnyNode {
    /// Creates an opaque node.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// `refine` substatement of `uses`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refine {
    /// Descendant path of the refined node, local names separated by `/`.
    pub target: String,
    /// Refined `mandatory` flag.
    pub mandatory: Option<bool>,
    /// Refined default.
    pub default: Option<String>,
    /// Refined description.
    pub description: Option<String>,
}

impl Refine {
    /// Creates a refine without changes.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            mandatory: None,
            default: None,
            description: None,
        }
    }

    /// Returns the local names along the target path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.target
            .split('/')
            .map(|s| s.rsplit(':').next().unwrap_or(s).trim())
            .filter(|s| !s.is_empty())
    }
}

/// `uses` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uses {
    /// Used grouping.
    pub grouping: QName,
    /// Refinements.
    pub refines: Vec<Refine>,
    /// Augments whose targets are relative to the using node.
    pub augments: Vec<Augment>,
}

impl Uses {
    /// Creates a plain `uses`.
    #[must_use]
    pub fn new(grouping: QName) -> Self {
        Self {
            grouping,
            refines: Vec::new(),
            augments: Vec::new(),
        }
    }

    /// Adds a refinement.
    #[must_use]
    pub fn refine(mut self, refine: Refine) -> Self {
        self.refines.push(refine);
        self
    }

    /// Adds an augment of an instantiated descendant.
    #[must_use]
    pub fn augment(mut self, augment: Augment) -> Self {
        self.augments.push(augment);
        self
    }
}

/// `augment` statement, top-level or inside `uses`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Augment {
    /// Target node identifier, absolute at the top level and relative to
    /// the using node inside `uses`.
    pub target: Vec<QName>,
    /// Body grafted into the target.
    pub body: Vec<Statement>,
}

impl Augment {
    /// Creates an empty augment.
    #[must_use]
    pub fn new(target: Vec<QName>) -> Self {
        Self {
            target,
            body: Vec::new(),
        }
    }

    /// Creates an augment whose target steps all live in `module`.
    #[must_use]
    pub fn within(module: &str, path: &[&str]) -> Self {
        Self::new(path.iter().map(|local| QName::new(module, *local)).collect())
    }

    /// Appends a body statement.
    #[must_use]
    pub fn child(mut self, stmt: impl Into<Statement>) -> Self {
        self.body.push(stmt.into());
        self
    }

    /// Returns the target as an absolute schema node identifier.
    #[must_use]
    pub fn target_path(&self) -> String {
        let mut path = String::new();
        for step in &self.target {
            path.push('/');
            path.push_str(&step.to_string());
        }
        path
    }

    /// Returns the target as a descendant schema node identifier.
    #[must_use]
    pub fn relative_path(&self) -> String {
        let steps: Vec<String> = self.target.iter().map(ToString::to_string).collect();
        steps.join("/")
    }
}

/// `rpc` or `action` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    /// Operation name.
    pub name: String,
    /// Typedefs and groupings declared in the operation.
    pub body: Vec<Statement>,
    /// `input` body, if present.
    pub input: Option<Vec<Statement>>,
    /// `output` body, if present.
    pub output: Option<Vec<Statement>>,
}

impl Procedure {
    /// Creates an operation without input or output.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
            input: None,
            output: None,
        }
    }

    /// Appends a statement to the input.
    #[must_use]
    pub fn input(mut self, stmt: impl Into<Statement>) -> Self {
        self.input.get_or_insert_with(Vec::new).push(stmt.into());
        self
    }

    /// Appends a statement to the output.
    #[must_use]
    pub fn output(mut self, stmt: impl Into<Statement>) -> Self {
        self.output.get_or_insert_with(Vec::new).push(stmt.into());
        self
    }

    /// Wraps this operation as an `rpc` statement.
    #[must_use]
    pub fn rpc(self) -> Statement {
        Statement::Rpc(self)
    }

    /// Wraps this operation as an `action` statement.
    #[must_use]
    pub fn action(self) -> Statement {
        Statement::Action(self)
    }
}

/// `notification` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Notification name.
    pub name: String,
    /// Body.
    pub body: Vec<Statement>,
}

impl Notification {
    /// Creates an empty notification.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
        }
    }

    /// Appends a body statement.
    #[must_use]
    pub fn child(mut self, stmt: impl Into<Statement>) -> Self {
        self.body.push(stmt.into());
        self
    }
}

/// `yang-data` structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YangData {
    /// Template name, which need not be a YANG identifier.
    pub name: String,
    /// Body.
    pub body: Vec<Statement>,
}

impl YangData {
    /// Creates an empty structure.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
        }
    }

    /// Appends a body statement.
    #[must_use]
    pub fn child(mut self, stmt: impl Into<Statement>) -> Self {
        self.body.push(stmt.into());
        self
    }
}
