//! Structural type construction.
//!
//! Builds the capability and value-object types of data nodes, groupings,
//! operations, augments, identities and features. Every accessor is typed
//! through the resolver; every reference to another generated type is the
//! reference claimed for it in the naming pass.

use crate::context::{GenerationContext, TypeSource};
use crate::error::CodegenError;
use crate::tree::{Decl, NodeIdx, NodeKind, UsesIdx};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;
use yangbind_core::naming::{
    GETTER_PREFIX, INVOKE_OPERATION, KEY_ACCESSOR, NONNULL_PREFIX, REQUIRE_PREFIX, getter_suffix,
    to_first_lower,
};
use yangbind_core::{
    Attribute, BaseType, Capability, Contract, Operation, OutputType, TypeKind, TypeRef,
};
use yangbind_schema::SchemaId;

/// Pushes a capability unless already present.
fn add_capability(ty: &mut OutputType, capability: Capability) {
    if !ty.implements.contains(&capability) {
        ty.implements.push(capability);
    }
}

/// Returns true if a node of this kind has accessors on its parent's type.
const fn has_accessor(kind: NodeKind<'_>) -> bool {
    matches!(
        kind,
        NodeKind::Container(_)
            | NodeKind::Choice(_)
            | NodeKind::List(_)
            | NodeKind::Leaf(_)
            | NodeKind::LeafList(_)
            | NodeKind::AnyXml
            | NodeKind::AnyData
    )
}

/// Grouping roots and accessor nodes of one type's body.
#[derive(Debug, Default)]
struct Members {
    groupings: Vec<NodeIdx>,
    nodes: Vec<NodeIdx>,
}

/// Accessor suffixes allocated within one type.
///
/// The first node mapping to a suffix keeps it; later nodes get a numeric
/// tiebreak starting at 2.
#[derive(Debug, Default)]
struct AccessorNames {
    suffixes: IndexMap<NodeIdx, String>,
    taken: IndexSet<String>,
}

impl AccessorNames {
    fn claim(&mut self, node: NodeIdx, name: &str, id: &SchemaId) -> String {
        if let Some(suffix) = self.suffixes.get(&node) {
            return suffix.clone();
        }
        let base = getter_suffix(name);
        let mut suffix = base.clone();
        let mut n = 2;
        while self.taken.contains(&suffix) {
            suffix = format!("{base}{n}");
            n += 1;
        }
        if suffix != base {
            tracing::debug!("accessor {base} of {id} is taken, using {suffix}");
        }
        self.taken.insert(suffix.clone());
        self.suffixes.insert(node, suffix.clone());
        suffix
    }

    fn suffix(&self, node: NodeIdx) -> Option<&str> {
        self.suffixes.get(&node).map(String::as_str)
    }
}

fn add_operation(ty: &mut OutputType, operation: Operation) {
    if ty.operation(&operation.name).is_none() {
        ty.operations.push(operation);
    }
}

impl GenerationContext<'_> {
    /// Builds the output type behind a claimed slot.
    pub(crate) fn build_slot(&mut self, slot: usize) -> Result<OutputType, CodegenError> {
        let source = self.slots[slot].source;
        match source {
            TypeSource::Node(node) => self.node_type(slot, node),
            TypeSource::ListKey(list) => self.key_type(slot, list),
            TypeSource::Typedef(typedef) => self.typedef_type(slot, typedef),
            TypeSource::Identity(def) => {
                let mut ty = self.output_type(slot, TypeKind::Capability);
                ty.implements.push(Capability::Contract(Contract::Identity));
                let location = self.slots[slot].id.clone();
                for base in &def.bases {
                    let base_ref = self.identity_ref(base, &location)?;
                    add_capability(&mut ty, Capability::Implements(base_ref));
                }
                Ok(ty)
            }
            TypeSource::Feature => {
                let mut ty = self.output_type(slot, TypeKind::Capability);
                ty.implements.push(Capability::Contract(Contract::Feature));
                Ok(ty)
            }
        }
    }

    fn node_type(&mut self, slot: usize, node: NodeIdx) -> Result<OutputType, CodegenError> {
        let kind = self.tree.node(node).kind;
        let mut ty = self.output_type(slot, TypeKind::Capability);

        match kind {
            NodeKind::Root => {
                ty.implements.push(Capability::Contract(Contract::DataRoot));
            }
            NodeKind::Grouping(_) => {}
            NodeKind::Container(_) | NodeKind::List(_) => {
                ty.implements.push(Capability::ChildOf(self.parent_ref(node)?));
            }
            NodeKind::Choice(_) => {
                ty.implements.push(Capability::ChoiceIn(self.parent_ref(node)?));
                return Ok(ty);
            }
            NodeKind::Case => {
                let choice = self
                    .tree
                    .node(node)
                    .parent
                    .filter(|p| matches!(self.tree.node(*p).kind, NodeKind::Choice(_)))
                    .ok_or_else(|| {
                        CodegenError::unsupported("case outside a choice", &self.tree.node(node).id)
                    })?;
                ty.implements.push(Capability::Implements(self.node_ref(choice)?));
            }
            NodeKind::Notification(_) => {
                ty.implements.push(Capability::Contract(Contract::Notification));
            }
            NodeKind::Rpc(_) | NodeKind::Action(_) => {
                let contract = if matches!(kind, NodeKind::Rpc(_)) {
                    Contract::Rpc
                } else {
                    Contract::Action
                };
                ty.implements.push(Capability::Contract(contract));
                let (input, output) = self.operation_io(node)?;
                ty.operations.push(
                    Operation::accessor(INVOKE_OPERATION, self.node_ref(output)?)
                        .with_parameter("input", self.node_ref(input)?),
                );
                return Ok(ty);
            }
            NodeKind::Input => ty.implements.push(Capability::Contract(Contract::RpcInput)),
            NodeKind::Output => ty.implements.push(Capability::Contract(Contract::RpcOutput)),
            NodeKind::YangData(_) => ty.implements.push(Capability::Contract(Contract::YangData)),
            NodeKind::Augment(_) => {
                let target = self.tree.augment_target(node).ok_or_else(|| {
                    CodegenError::unsupported("augment without target", &self.tree.node(node).id)
                })?;
                ty.implements
                    .push(Capability::AugmentationOf(self.node_ref(target)?));
            }
            NodeKind::Leaf(_)
            | NodeKind::LeafList(_)
            | NodeKind::AnyXml
            | NodeKind::AnyData => {
                return Err(CodegenError::unsupported(
                    format!("{} as a type", kind.keyword()),
                    &self.tree.node(node).id,
                ));
            }
        }

        self.add_members(&mut ty, node)?;

        if matches!(
            kind,
            NodeKind::Container(_)
                | NodeKind::List(_)
                | NodeKind::Case
                | NodeKind::Notification(_)
                | NodeKind::Input
                | NodeKind::Output
        ) {
            add_capability(&mut ty, Capability::Contract(Contract::Augmentable));
        }

        if let Some(key_slot) = self.key_slots.get(&node) {
            let key_ref = Arc::clone(&self.slots[*key_slot].type_ref);
            add_operation(&mut ty, Operation::accessor(KEY_ACCESSOR, key_ref));
        }
        Ok(ty)
    }

    /// Returns the type of the nearest data ancestor.
    fn parent_ref(&self, node: NodeIdx) -> Result<Arc<TypeRef>, CodegenError> {
        let parent = self.tree.data_parent(node).ok_or_else(|| {
            CodegenError::unsupported("data node without parent", &self.tree.node(node).id)
        })?;
        self.node_ref(parent)
    }

    /// Adds the accessors and grouping capabilities of a node's body.
    fn add_members(&mut self, ty: &mut OutputType, holder: NodeIdx) -> Result<(), CodegenError> {
        let members = self.members(holder)?;
        for root in members.groupings {
            add_capability(ty, Capability::Implements(self.node_ref(root)?));
        }
        let names = self.accessor_names(&members.nodes);
        for node in members.nodes {
            self.add_accessors(ty, node, &names)?;
        }
        Ok(())
    }

    /// Collects the grouping roots and accessor nodes of a body in
    /// declaration order.
    fn members(&mut self, holder: NodeIdx) -> Result<Members, CodegenError> {
        let decls = self.tree.node(holder).decls.clone();
        let mut members = Members::default();
        for decl in decls {
            match decl {
                Decl::Node(node) => members.nodes.push(node),
                Decl::Uses(uses) => {
                    let grouping = self.tree.uses_site(uses).grouping;
                    let root = self.tree.grouping_root(grouping).ok_or_else(|| {
                        let entry = self.tree.grouping(grouping);
                        CodegenError::unresolvable(
                            &entry.id,
                            entry.def.name.clone(),
                            entry.def.name.clone(),
                        )
                    })?;
                    members.groupings.push(root);
                    for instance in self.uses_exposed(uses)? {
                        if !members.nodes.contains(&instance) {
                            members.nodes.push(instance);
                        }
                    }
                }
                Decl::Typedef(_) | Decl::Grouping(_) | Decl::Identity(_) | Decl::Feature(_) => {}
            }
        }
        Ok(members)
    }

    /// Returns the instantiated nodes a `uses` re-exposes on the using type:
    /// refine targets, then leaves whose type depends on the site.
    fn uses_exposed(&mut self, uses: UsesIdx) -> Result<Vec<NodeIdx>, CodegenError> {
        let (stmt, instances) = {
            let site = self.tree.uses_site(uses);
            (site.stmt, site.instances.clone())
        };
        let mut exposed = Vec::new();

        // Only direct children; deeper targets live in types shared with the grouping.
        for refine in &stmt.refines {
            let mut segments = refine.segments();
            if let (Some(target), None) = (segments.next(), segments.next()) {
                let found = instances
                    .iter()
                    .copied()
                    .find(|i| self.tree.node(*i).name == target);
                if let Some(instance) = found {
                    exposed.push(instance);
                }
            }
        }

        for instance in instances {
            let (kind, origin) = {
                let n = self.tree.node(instance);
                (n.kind, n.origin)
            };
            let (NodeKind::Leaf(_) | NodeKind::LeafList(_), Some(origin)) = (kind, origin) else {
                continue;
            };
            let specialized = self.resolve_leaf(instance)?;
            let inherited = self.resolve_leaf(origin)?;
            if specialized != inherited && !exposed.contains(&instance) {
                tracing::trace!(
                    "{} specializes its grouping leaf type to {}",
                    self.tree.node(instance).id,
                    specialized
                );
                exposed.push(instance);
            }
        }
        Ok(exposed)
    }

    /// Allocates accessor suffixes for the nodes of one type.
    fn accessor_names(&self, nodes: &[NodeIdx]) -> AccessorNames {
        let mut names = AccessorNames::default();
        for node in nodes {
            let n = self.tree.node(*node);
            if has_accessor(n.kind) {
                names.claim(*node, &n.name, &n.id);
            }
        }
        names
    }

    /// Adds the accessors of one data node.
    fn add_accessors(
        &mut self,
        ty: &mut OutputType,
        node: NodeIdx,
        names: &AccessorNames,
    ) -> Result<(), CodegenError> {
        let kind = self.tree.node(node).kind;
        let suffix = names
            .suffix(node)
            .map_or_else(|| getter_suffix(&self.tree.node(node).name), str::to_string);
        let getter = format!("{GETTER_PREFIX}{suffix}");
        let nonnull = format!("{NONNULL_PREFIX}{suffix}");
        let require = format!("{REQUIRE_PREFIX}{suffix}");
        match kind {
            NodeKind::Container(_) | NodeKind::Choice(_) => {
                add_operation(ty, Operation::accessor(getter, self.node_ref(node)?));
            }
            NodeKind::List(list) => {
                let item = self.node_ref(node)?;
                let collection = if !list.keys.is_empty() && !list.ordered_by_user {
                    TypeRef::KeyedMap(item)
                } else {
                    TypeRef::Sequence(item)
                };
                let collection = Arc::new(collection);
                add_operation(
                    ty,
                    Operation::accessor(getter, Arc::clone(&collection)),
                );
                add_operation(ty, Operation::default_accessor(nonnull, collection));
            }
            NodeKind::Leaf(_) => {
                let value = self.resolve_leaf(node)?;
                add_operation(ty, Operation::accessor(getter, Arc::clone(&value)));
                add_operation(ty, Operation::default_accessor(require, value));
            }
            NodeKind::LeafList(leaf_list) => {
                let element = self.resolve_leaf(node)?;
                let collection = Arc::new(if leaf_list.ordered_by_user {
                    TypeRef::Sequence(element)
                } else {
                    TypeRef::UniqueSet(element)
                });
                add_operation(
                    ty,
                    Operation::accessor(getter, Arc::clone(&collection)),
                );
                add_operation(
                    ty,
                    Operation::default_accessor(nonnull, Arc::clone(&collection)),
                );
                add_operation(ty, Operation::default_accessor(require, collection));
            }
            NodeKind::AnyXml | NodeKind::AnyData => {
                add_operation(
                    ty,
                    Operation::accessor(getter, self.base_ref(BaseType::Opaque)),
                );
            }
            NodeKind::Root
            | NodeKind::Grouping(_)
            | NodeKind::Case
            | NodeKind::Rpc(_)
            | NodeKind::Action(_)
            | NodeKind::Input
            | NodeKind::Output
            | NodeKind::Notification(_)
            | NodeKind::YangData(_)
            | NodeKind::Augment(_) => {}
        }
        Ok(())
    }

    /// Builds the key value object of a keyed list.
    fn key_type(&mut self, slot: usize, list: NodeIdx) -> Result<OutputType, CodegenError> {
        let NodeKind::List(def) = self.tree.node(list).kind else {
            return Err(CodegenError::unsupported(
                "key of a non-list node",
                &self.tree.node(list).id,
            ));
        };
        let members = self.members(list)?;
        let mut names = self.accessor_names(&members.nodes);
        let mut ty = self.output_type(slot, TypeKind::ValueObject);
        for key in &def.keys {
            let leaf = self.tree.key_leaf(list, key).ok_or_else(|| {
                CodegenError::unresolvable(&self.tree.node(list).id, key.clone(), key.clone())
            })?;
            let id = self.tree.node(leaf).id.clone();
            let attribute = to_first_lower(&names.claim(leaf, key, &id));
            ty.attributes
                .push(Attribute::read_only(attribute.clone(), self.resolve_leaf(leaf)?));
            ty.identity.push(attribute);
        }
        Ok(ty)
    }
}
