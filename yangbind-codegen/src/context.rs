//! Generation context.
//!
//! A [`GenerationContext`] owns every registry of one run: the effective
//! tree, the namespace allocator, resolution caches and the types built so
//! far. A run goes through four phases:
//!
//! 1. walk every module into the tree and graft augments
//! 2. claim a name for every type-producing construct, in declaration order
//! 3. build the type behind every claim, in claim order
//! 4. attach nested inline types to their enclosing types and filter
//!
//! Since every name is claimed before any type is built, references between
//! types never depend on build order.

use crate::error::CodegenError;
use crate::generator::GeneratorConfig;
use crate::naming::{Namespace, NamespaceAllocator, Role};
use crate::resolver::TypedefClass;
use crate::tree::{Decl, GroupingIdx, NodeIdx, NodeKind, Tree, TypedefIdx};
use indexmap::IndexMap;
use std::sync::Arc;
use yangbind_core::naming::{
    DATA_ROOT_SUFFIX, INPUT_SUFFIX, KEY_SUFFIX, OUTPUT_SUFFIX, child_package, class_name,
    escape_identifier, module_package,
};
use yangbind_core::{BaseType, OutputType, QualifiedName, TypeKind, TypeModel, TypeRef};
use yangbind_schema::{Identity, QName, SchemaGraph, SchemaId, StepKind, validate_graph};

/// Construct a claimed name stands for.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TypeSource<'g> {
    /// Data root, grouping or data node type.
    Node(NodeIdx),
    /// Key type of a keyed list.
    ListKey(NodeIdx),
    Typedef(TypedefIdx),
    Identity(&'g Identity),
    Feature,
}

/// One claimed output type.
#[derive(Debug)]
pub(crate) struct Slot<'g> {
    pub source: TypeSource<'g>,
    pub id: SchemaId,
    pub module: usize,
    pub name: QualifiedName,
    pub type_ref: Arc<TypeRef>,
}

/// Inline enumeration, bits or union of a declared leaf.
#[derive(Debug)]
pub(crate) struct InlineSlot {
    /// Slot of the enclosing type.
    pub enclosing: usize,
    pub name: QualifiedName,
}

/// Run-scoped state of one generation.
#[derive(Debug)]
pub(crate) struct GenerationContext<'g> {
    pub tree: Tree<'g>,
    package_prefix: String,
    names: NamespaceAllocator,
    pub slots: Vec<Slot<'g>>,
    pub node_slots: IndexMap<NodeIdx, usize>,
    pub key_slots: IndexMap<NodeIdx, usize>,
    pub typedef_slots: IndexMap<TypedefIdx, usize>,
    pub identities: IndexMap<QName, Arc<TypeRef>>,
    pub inline_slots: IndexMap<NodeIdx, InlineSlot>,
    augment_counters: IndexMap<(usize, String), usize>,
    pub classes: IndexMap<TypedefIdx, TypedefClass>,
    pub classifying: Vec<TypedefIdx>,
    pub base_refs: IndexMap<BaseType, Arc<TypeRef>>,
    pub leaf_types: IndexMap<NodeIdx, Arc<TypeRef>>,
    pub inline_types: IndexMap<NodeIdx, OutputType>,
    built: Vec<OutputType>,
}

impl<'g> GenerationContext<'g> {
    /// Runs a whole generation over `graph`.
    ///
    /// # Errors
    /// Returns the first `CodegenError`; no partial model is produced.
    pub(crate) fn run(
        graph: &'g SchemaGraph,
        config: &GeneratorConfig,
    ) -> Result<TypeModel, CodegenError> {
        validate_graph(graph)?;
        if let Some(subset) = &config.modules {
            if let Some(unknown) = subset.iter().find(|m| graph.module(m).is_none()) {
                return Err(CodegenError::unresolvable(
                    "module subset",
                    unknown.clone(),
                    unknown.clone(),
                ));
            }
        }

        let order = graph.dependency_order()?;
        let mut ctx = Self::new(Tree::new(order), config.package_prefix.clone());
        ctx.walk()?;
        ctx.claim_all()?;
        ctx.build_all()?;
        Ok(ctx.finish(config.modules.as_deref()))
    }

    fn new(tree: Tree<'g>, package_prefix: String) -> Self {
        Self {
            tree,
            package_prefix,
            names: NamespaceAllocator::new(),
            slots: Vec::new(),
            node_slots: IndexMap::new(),
            key_slots: IndexMap::new(),
            typedef_slots: IndexMap::new(),
            identities: IndexMap::new(),
            inline_slots: IndexMap::new(),
            augment_counters: IndexMap::new(),
            classes: IndexMap::new(),
            classifying: Vec::new(),
            base_refs: IndexMap::new(),
            leaf_types: IndexMap::new(),
            inline_types: IndexMap::new(),
            built: Vec::new(),
        }
    }

    fn walk(&mut self) -> Result<(), CodegenError> {
        for module in 0..self.tree.modules.len() {
            self.tree.build_module(module)?;
        }
        self.tree.graft_augments()?;
        tracing::debug!(
            "effective tree built: {} nodes, {} typedefs, {} groupings",
            self.tree.nodes.len(),
            self.tree.typedefs.len(),
            self.tree.groupings.len()
        );
        Ok(())
    }

    fn claim_all(&mut self) -> Result<(), CodegenError> {
        for module in 0..self.tree.modules.len() {
            let def = self.tree.modules[module];
            let package =
                module_package(&self.package_prefix, &def.namespace, def.revision.as_deref());
            let namespace = Namespace::Package(package);
            let root = self.tree.roots[module];
            let proposed = format!("{}{DATA_ROOT_SUFFIX}", class_name(&def.name));
            self.claim_node(root, Role::DataRoot, &proposed, &namespace)?;
            self.claim_decls(root, &namespace)?;
            tracing::debug!("module '{}' claimed, {} names so far", def.name, self.names.len());
        }
        Ok(())
    }

    /// Returns the namespace holding the children of a named type.
    fn child_namespace(name: &QualifiedName) -> Namespace {
        Namespace::Package(child_package(&name.package, name.simple_name()))
    }

    fn claim(
        &mut self,
        source: TypeSource<'g>,
        id: SchemaId,
        module: usize,
        role: Role,
        proposed: &str,
        namespace: &Namespace,
    ) -> Result<usize, CodegenError> {
        let name = self.names.allocate(&id, role, proposed, namespace)?;
        let type_ref = TypeRef::named(name.clone());
        self.slots.push(Slot {
            source,
            id,
            module,
            name,
            type_ref,
        });
        Ok(self.slots.len() - 1)
    }

    fn claim_node(
        &mut self,
        node: NodeIdx,
        role: Role,
        proposed: &str,
        namespace: &Namespace,
    ) -> Result<Namespace, CodegenError> {
        let (id, module) = {
            let n = self.tree.node(node);
            (n.id.clone(), n.module)
        };
        let slot = self.claim(TypeSource::Node(node), id, module, role, proposed, namespace)?;
        self.node_slots.insert(node, slot);
        Ok(Self::child_namespace(&self.slots[slot].name))
    }

    fn claim_decls(&mut self, holder: NodeIdx, namespace: &Namespace) -> Result<(), CodegenError> {
        let decls = self.tree.node(holder).decls.clone();
        for decl in decls {
            match decl {
                Decl::Typedef(typedef) => self.claim_typedef(typedef, namespace)?,
                Decl::Grouping(grouping) => self.claim_grouping(grouping, namespace)?,
                Decl::Identity(def) => {
                    let (id, module) = self.declared_in(holder, StepKind::Identity, &def.name);
                    let slot = self.claim(
                        TypeSource::Identity(def),
                        id,
                        module,
                        Role::Identity,
                        &class_name(&def.name),
                        namespace,
                    )?;
                    let qname = QName::new(self.tree.modules[module].name.clone(), def.name.clone());
                    self.identities
                        .insert(qname, Arc::clone(&self.slots[slot].type_ref));
                }
                Decl::Feature(def) => {
                    let (id, module) = self.declared_in(holder, StepKind::Feature, &def.name);
                    self.claim(
                        TypeSource::Feature,
                        id,
                        module,
                        Role::Feature,
                        &class_name(&def.name),
                        namespace,
                    )?;
                }
                Decl::Node(node) => self.claim_data(holder, node, namespace)?,
                Decl::Uses(_) => {}
            }
        }
        Ok(())
    }

    fn declared_in(&self, holder: NodeIdx, kind: StepKind, name: &str) -> (SchemaId, usize) {
        let node = self.tree.node(holder);
        (node.id.child(kind, name), node.module)
    }

    fn claim_typedef(
        &mut self,
        typedef: TypedefIdx,
        namespace: &Namespace,
    ) -> Result<(), CodegenError> {
        if !self.classify(typedef)?.produces_type() {
            return Ok(());
        }
        let (id, module, proposed) = {
            let entry = self.tree.typedef(typedef);
            (entry.id.clone(), entry.module, class_name(&entry.def.name))
        };
        let slot = self.claim(
            TypeSource::Typedef(typedef),
            id,
            module,
            Role::Typedef,
            &proposed,
            namespace,
        )?;
        self.typedef_slots.insert(typedef, slot);
        Ok(())
    }

    fn claim_grouping(
        &mut self,
        grouping: GroupingIdx,
        namespace: &Namespace,
    ) -> Result<(), CodegenError> {
        let entry = self.tree.grouping(grouping);
        let root = self.tree.grouping_root(grouping).ok_or_else(|| {
            CodegenError::unresolvable(&entry.id, entry.def.name.clone(), entry.def.name.clone())
        })?;
        let proposed = class_name(&entry.def.name);
        let children = self.claim_node(root, Role::Grouping, &proposed, namespace)?;
        self.claim_decls(root, &children)
    }

    fn claim_data(
        &mut self,
        holder: NodeIdx,
        node: NodeIdx,
        namespace: &Namespace,
    ) -> Result<(), CodegenError> {
        let (kind, name) = {
            let n = self.tree.node(node);
            (n.kind, n.name.clone())
        };
        let proposed = class_name(&name);

        let role = match kind {
            NodeKind::Container(_) => Role::Container,
            NodeKind::List(_) => Role::List,
            NodeKind::Choice(_) => Role::Choice,
            NodeKind::Case => Role::Case,
            NodeKind::Notification(_) => Role::Notification,
            NodeKind::Leaf(_) | NodeKind::LeafList(_) => {
                return self.claim_inline(holder, node, &proposed);
            }
            NodeKind::Rpc(_) | NodeKind::Action(_) => {
                return self.claim_operation(node, &proposed, namespace);
            }
            NodeKind::YangData(def) => {
                let children =
                    self.claim_node(node, Role::YangData, &escape_identifier(&def.name)?, namespace)?;
                return self.claim_decls(node, &children);
            }
            NodeKind::Augment(def) => {
                let module = self.tree.node(node).module;
                let target = def.target.last().map_or_else(String::new, |q| class_name(&q.local));
                let counter = self
                    .augment_counters
                    .entry((module, target.clone()))
                    .or_insert(0);
                *counter += 1;
                let proposed = format!("{target}{}", *counter);
                let children = self.claim_node(node, Role::Augment, &proposed, namespace)?;
                return self.claim_decls(node, &children);
            }
            NodeKind::AnyXml
            | NodeKind::AnyData
            | NodeKind::Root
            | NodeKind::Grouping(_)
            | NodeKind::Input
            | NodeKind::Output => return Ok(()),
        };

        let children = self.claim_node(node, role, &proposed, namespace)?;
        if let NodeKind::List(list) = kind {
            if !list.keys.is_empty() {
                let id = self.tree.node(node).id.clone();
                let module = self.tree.node(node).module;
                let slot = self.claim(
                    TypeSource::ListKey(node),
                    id,
                    module,
                    Role::ListKey,
                    &format!("{proposed}{KEY_SUFFIX}"),
                    namespace,
                )?;
                self.key_slots.insert(node, slot);
            }
        }
        self.claim_decls(node, &children)
    }

    fn claim_operation(
        &mut self,
        node: NodeIdx,
        proposed: &str,
        namespace: &Namespace,
    ) -> Result<(), CodegenError> {
        let role = match self.tree.node(node).kind {
            NodeKind::Action(_) => Role::Action,
            _ => Role::Rpc,
        };
        let (input, output) = self.operation_io(node)?;
        let children = self.claim_node(node, role, proposed, namespace)?;
        let input_children =
            self.claim_node(input, Role::Input, &format!("{proposed}{INPUT_SUFFIX}"), namespace)?;
        let output_children = self.claim_node(
            output,
            Role::Output,
            &format!("{proposed}{OUTPUT_SUFFIX}"),
            namespace,
        )?;
        self.claim_decls(node, &children)?;
        self.claim_decls(input, &input_children)?;
        self.claim_decls(output, &output_children)
    }

    /// Returns the input and output nodes of an rpc or action.
    pub(crate) fn operation_io(&self, node: NodeIdx) -> Result<(NodeIdx, NodeIdx), CodegenError> {
        let n = self.tree.node(node);
        match (n.children.first(), n.children.get(1)) {
            (Some(input), Some(output)) => Ok((*input, *output)),
            _ => Err(CodegenError::unsupported("operation without input and output", &n.id)),
        }
    }

    fn claim_inline(
        &mut self,
        holder: NodeIdx,
        node: NodeIdx,
        proposed: &str,
    ) -> Result<(), CodegenError> {
        let inline = self
            .tree
            .node(node)
            .kind
            .declared_type()
            .is_some_and(|ty| ty.is_inline_composite());
        if !inline {
            return Ok(());
        }
        let enclosing = *self.node_slots.get(&holder).ok_or_else(|| {
            CodegenError::unsupported("inline type outside a named type", &self.tree.node(node).id)
        })?;
        let namespace = Namespace::Nested(self.slots[enclosing].name.clone());
        let name = self
            .names
            .allocate(&self.tree.node(node).id, Role::Inline, proposed, &namespace)?;
        self.inline_slots.insert(node, InlineSlot { enclosing, name });
        Ok(())
    }

    fn build_all(&mut self) -> Result<(), CodegenError> {
        self.built.reserve(self.slots.len());
        for slot in 0..self.slots.len() {
            let ty = self.build_slot(slot)?;
            self.built.push(ty);
        }
        let inline: Vec<NodeIdx> = self.inline_slots.keys().copied().collect();
        for node in inline {
            self.resolve_leaf(node)?;
        }
        tracing::debug!(
            "{} types built, {} inline types",
            self.built.len(),
            self.inline_types.len()
        );
        Ok(())
    }

    fn finish(mut self, modules: Option<&[String]>) -> TypeModel {
        let mut nested: IndexMap<usize, Vec<OutputType>> = IndexMap::new();
        for (node, slot) in &self.inline_slots {
            if let Some(ty) = self.inline_types.shift_remove(node) {
                nested.entry(slot.enclosing).or_default().push(ty);
            }
        }

        let mut types = Vec::with_capacity(self.built.len());
        for (i, mut ty) in std::mem::take(&mut self.built).into_iter().enumerate() {
            if let Some(extra) = nested.shift_remove(&i) {
                ty.nested.extend(extra);
            }
            let keep = modules.is_none_or(|subset| {
                let module = &self.tree.modules[self.slots[i].module].name;
                subset.iter().any(|m| m == module)
            });
            if keep {
                types.push(ty);
            }
        }

        let model = TypeModel::new(types);
        tracing::debug!(
            "generation finished: {} top-level types, {} in total",
            model.types().len(),
            model.len()
        );
        model
    }

    /// Returns the shared reference to the type of a data node, following
    /// `uses` instances to their declaration.
    pub(crate) fn node_ref(&self, node: NodeIdx) -> Result<Arc<TypeRef>, CodegenError> {
        let decl = self.tree.declaration(node);
        self.node_slots
            .get(&decl)
            .map(|slot| Arc::clone(&self.slots[*slot].type_ref))
            .ok_or_else(|| {
                let n = self.tree.node(node);
                CodegenError::unsupported(format!("{} without type", n.kind.keyword()), &n.id)
            })
    }

    /// Returns the shared reference of a base type.
    pub(crate) fn base_ref(&mut self, base: BaseType) -> Arc<TypeRef> {
        Arc::clone(
            self.base_refs
                .entry(base)
                .or_insert_with(|| Arc::new(TypeRef::Base(base))),
        )
    }

    /// Creates an empty output type for a slot.
    pub(crate) fn output_type(&self, slot: usize, kind: TypeKind) -> OutputType {
        let s = &self.slots[slot];
        self.empty_type(s.name.clone(), kind, s.module, &s.id)
    }

    pub(crate) fn empty_type(
        &self,
        name: QualifiedName,
        kind: TypeKind,
        module: usize,
        origin: &SchemaId,
    ) -> OutputType {
        OutputType {
            name,
            kind,
            module: self.tree.modules[module].name.clone(),
            origin: origin.to_string(),
            attributes: Vec::new(),
            operations: Vec::new(),
            implements: Vec::new(),
            nested: Vec::new(),
            super_type: None,
            identity: Vec::new(),
            restrictions: None,
            constants: Vec::new(),
            description: None,
        }
    }
}
