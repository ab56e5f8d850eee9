//! Canonical schema node identities.

use std::fmt;

/// Statement kind of one step in a [`SchemaId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepKind {
    /// `typedef`
    Typedef,
    /// `grouping`
    Grouping,
    /// `identity`
    Identity,
    /// `feature`
    Feature,
    /// `container`
    Container,
    /// `list`
    List,
    /// `leaf`
    Leaf,
    /// `leaf-list`
    LeafList,
    /// `choice`
    Choice,
    /// `case`, explicit or shorthand
    Case,
    /// `anyxml`
    AnyXml,
    /// `anydata`
    AnyData,
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
    /// `yang-data`
    YangData,
}

impl StepKind {
    /// Returns the YANG keyword of this kind.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Typedef => "typedef",
            Self::Grouping => "grouping",
            Self::Identity => "identity",
            Self::Feature => "feature",
            Self::Container => "container",
            Self::List => "list",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::Choice => "choice",
            Self::Case => "case",
            Self::AnyXml => "anyxml",
            Self::AnyData => "anydata",
            Self::Rpc => "rpc",
            Self::Action => "action",
            Self::Input => "input",
            Self::Output => "output",
            Self::Notification => "notification",
            Self::Augment => "augment",
            Self::YangData => "yang-data",
        }
    }
}

/// One `(kind, local name)` step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Step {
    /// Statement kind.
    pub kind: StepKind,
    /// Local name.
    pub name: String,
}

/// Canonical identity of a schema node: its module plus the steps from the
/// module root.
///
/// Nodes instantiated through `uses` carry the identity of the using site,
/// so one grouping leaf used in two containers has two identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId {
    module: String,
    steps: Vec<Step>,
}

impl SchemaId {
    /// Returns the identity of a module root.
    #[must_use]
    pub fn module_root(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            steps: Vec::new(),
        }
    }

    /// Returns the identity of a child of this node.
    #[must_use]
    pub fn child(&self, kind: StepKind, name: impl Into<String>) -> Self {
        let mut steps = self.steps.clone();
        steps.push(Step {
            kind,
            name: name.into(),
        });
        Self {
            module: self.module.clone(),
            steps,
        }
    }

    /// Returns the module name.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the steps from the module root.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the last step, or `None` for a module root.
    #[must_use]
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Returns the local name of the last step, or the module name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.steps.last().map_or(self.module.as_str(), |s| s.name.as_str())
    }

    /// Returns true if this is a module root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.module)?;
        if self.steps.is_empty() {
            return f.write_str("/");
        }
        for step in &self.steps {
            write!(f, "/{}={}", step.kind.keyword(), step.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_id_display() {
        let root = SchemaId::module_root("ietf-interfaces");
        assert_eq!(root.to_string(), "ietf-interfaces:/");
        let leaf = root
            .child(StepKind::Container, "interfaces")
            .child(StepKind::List, "interface")
            .child(StepKind::Leaf, "name");
        assert_eq!(
            leaf.to_string(),
            "ietf-interfaces:/container=interfaces/list=interface/leaf=name"
        );
        assert_eq!(leaf.local_name(), "name");
        assert!(!leaf.is_root());
    }

    #[test]
    fn test_schema_id_equality_is_structural() {
        let a = SchemaId::module_root("m").child(StepKind::Typedef, "t");
        let b = SchemaId::module_root("m").child(StepKind::Typedef, "t");
        let c = SchemaId::module_root("m").child(StepKind::Grouping, "t");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
