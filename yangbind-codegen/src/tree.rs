//! Effective data tree.
//!
//! The schema graph is walked once into an arena of nodes. Groupings get
//! their own detached trees; each `uses` deep-copies the grouping's tree
//! under the using node, linking every copy to its declaration through
//! `origin`. Augment bodies are grafted into their targets once every module
//! has been walked, so leafref navigation sees the tree as it exists at run
//! time while naming still follows declaration order (`decls`).

use crate::error::{CodegenError, CycleKind};
use indexmap::IndexMap;
use yangbind_schema::{
    Augment, Choice, Container, DeclaredType, Feature, Grouping, Identity, Leaf, LeafList, List,
    Module, Notification, PathExpr, Procedure, QName, SchemaId, Statement, StepKind, Typedef, Uses,
    YangData,
};

/// Index of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeIdx(usize);

#[cfg(test)]
impl NodeIdx {
    pub(crate) const fn for_test(idx: usize) -> Self {
        Self(idx)
    }
}

/// Index of a lexical scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ScopeIdx(usize);

/// Index of a registered typedef.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TypedefIdx(usize);

/// Index of a registered grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct GroupingIdx(usize);

/// Index of a `uses` site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct UsesIdx(usize);

#[derive(Debug, Clone, Copy)]
pub(crate) enum NodeKind<'g> {
    Root,
    Grouping(&'g Grouping),
    Container(&'g Container),
    List(&'g List),
    Leaf(&'g Leaf),
    LeafList(&'g LeafList),
    Choice(&'g Choice),
    Case,
    AnyXml,
    AnyData,
    Rpc(&'g Procedure),
    Action(&'g Procedure),
    Input,
    Output,
    Notification(&'g Notification),
    YangData(&'g YangData),
    Augment(&'g Augment),
}

impl<'g> NodeKind<'g> {
    pub(crate) const fn step_kind(&self) -> Option<StepKind> {
        Some(match self {
            Self::Root => return None,
            Self::Grouping(_) => StepKind::Grouping,
            Self::Container(_) => StepKind::Container,
            Self::List(_) => StepKind::List,
            Self::Leaf(_) => StepKind::Leaf,
            Self::LeafList(_) => StepKind::LeafList,
            Self::Choice(_) => StepKind::Choice,
            Self::Case => StepKind::Case,
            Self::AnyXml => StepKind::AnyXml,
            Self::AnyData => StepKind::AnyData,
            Self::Rpc(_) => StepKind::Rpc,
            Self::Action(_) => StepKind::Action,
            Self::Input => StepKind::Input,
            Self::Output => StepKind::Output,
            Self::Notification(_) => StepKind::Notification,
            Self::YangData(_) => StepKind::YangData,
            Self::Augment(_) => StepKind::Augment,
        })
    }

    /// Choice and case nodes do not appear in data paths.
    pub(crate) const fn is_transparent(&self) -> bool {
        matches!(self, Self::Choice(_) | Self::Case)
    }

    pub(crate) fn declared_type(&self) -> Option<&'g DeclaredType> {
        match self {
            Self::Leaf(leaf) => Some(&leaf.ty),
            Self::LeafList(leaf_list) => Some(&leaf_list.ty),
            _ => None,
        }
    }

    pub(crate) fn keyword(&self) -> &'static str {
        self.step_kind().map_or("module", |k| k.keyword())
    }
}

/// Declaration-order entry of a node body.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Decl<'g> {
    Typedef(TypedefIdx),
    Grouping(GroupingIdx),
    Identity(&'g Identity),
    Feature(&'g Feature),
    Node(NodeIdx),
    Uses(UsesIdx),
}

#[derive(Debug)]
pub(crate) struct Node<'g> {
    pub kind: NodeKind<'g>,
    pub name: String,
    /// Module whose namespace the node lives in.
    pub module: usize,
    pub id: SchemaId,
    /// Parent in the effective tree.
    pub parent: Option<NodeIdx>,
    /// Node whose body declares this one.
    pub owner: Option<NodeIdx>,
    pub children: Vec<NodeIdx>,
    pub decls: Vec<Decl<'g>>,
    /// Lexical scope of the statement itself.
    pub scope: ScopeIdx,
    /// Declaration this node was instantiated from by `uses`.
    pub origin: Option<NodeIdx>,
    /// Part of a grouping's own, uninstantiated tree.
    pub in_grouping: bool,
}

#[derive(Debug)]
pub(crate) struct Scope {
    pub module: usize,
    pub parent: Option<ScopeIdx>,
    pub typedefs: IndexMap<String, TypedefIdx>,
    pub groupings: IndexMap<String, GroupingIdx>,
}

#[derive(Debug)]
pub(crate) struct TypedefEntry<'g> {
    pub id: SchemaId,
    pub def: &'g Typedef,
    /// Scope in which the typedef's own type is resolved.
    pub scope: ScopeIdx,
    /// Node whose body declares the typedef.
    pub owner: NodeIdx,
    pub module: usize,
}

#[derive(Debug, Clone, Copy)]
enum GroupingState {
    Pending,
    Building,
    Built(NodeIdx),
}

#[derive(Debug)]
pub(crate) struct GroupingEntry<'g> {
    pub id: SchemaId,
    pub def: &'g Grouping,
    pub scope: ScopeIdx,
    pub owner: NodeIdx,
    pub module: usize,
    state: GroupingState,
}

#[derive(Debug)]
pub(crate) struct UsesSite<'g> {
    pub stmt: &'g Uses,
    pub grouping: GroupingIdx,
    /// Direct children instantiated at the using node.
    pub instances: Vec<NodeIdx>,
}

/// Unresolved path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathMiss(pub String);

#[derive(Debug, Clone, Copy)]
struct BodyCtx {
    module: usize,
    in_grouping: bool,
}

#[derive(Debug)]
pub(crate) struct Tree<'g> {
    pub modules: Vec<&'g Module>,
    module_index: IndexMap<&'g str, usize>,
    pub nodes: Vec<Node<'g>>,
    pub scopes: Vec<Scope>,
    pub typedefs: Vec<TypedefEntry<'g>>,
    pub groupings: Vec<GroupingEntry<'g>>,
    pub uses: Vec<UsesSite<'g>>,
    pub roots: Vec<NodeIdx>,
    module_scopes: Vec<ScopeIdx>,
    augments: Vec<NodeIdx>,
    augment_targets: IndexMap<NodeIdx, NodeIdx>,
    grouping_stack: Vec<GroupingIdx>,
}

impl<'g> Tree<'g> {
    /// Creates an empty tree over modules in dependency order.
    pub(crate) fn new(modules: Vec<&'g Module>) -> Self {
        let module_index = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.as_str(), i))
            .collect();
        Self {
            modules,
            module_index,
            nodes: Vec::new(),
            scopes: Vec::new(),
            typedefs: Vec::new(),
            groupings: Vec::new(),
            uses: Vec::new(),
            roots: Vec::new(),
            module_scopes: Vec::new(),
            augments: Vec::new(),
            augment_targets: IndexMap::new(),
            grouping_stack: Vec::new(),
        }
    }

    pub(crate) fn node(&self, idx: NodeIdx) -> &Node<'g> {
        &self.nodes[idx.0]
    }

    fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<'g> {
        &mut self.nodes[idx.0]
    }

    pub(crate) fn scope(&self, idx: ScopeIdx) -> &Scope {
        &self.scopes[idx.0]
    }

    pub(crate) fn typedef(&self, idx: TypedefIdx) -> &TypedefEntry<'g> {
        &self.typedefs[idx.0]
    }

    pub(crate) fn grouping(&self, idx: GroupingIdx) -> &GroupingEntry<'g> {
        &self.groupings[idx.0]
    }

    pub(crate) fn uses_site(&self, idx: UsesIdx) -> &UsesSite<'g> {
        &self.uses[idx.0]
    }

    pub(crate) fn module_of(&self, name: &str) -> Option<usize> {
        self.module_index.get(name).copied()
    }

    /// Returns the grouping's own tree root. Only valid once built.
    pub(crate) fn grouping_root(&self, idx: GroupingIdx) -> Option<NodeIdx> {
        match self.groupings[idx.0].state {
            GroupingState::Built(root) => Some(root),
            GroupingState::Pending | GroupingState::Building => None,
        }
    }

    pub(crate) fn augment_target(&self, augment: NodeIdx) -> Option<NodeIdx> {
        self.augment_targets.get(&augment).copied()
    }

    /// Returns the declaration a node was instantiated from, or the node.
    pub(crate) fn declaration(&self, idx: NodeIdx) -> NodeIdx {
        self.node(idx).origin.unwrap_or(idx)
    }

    fn new_scope(&mut self, module: usize, parent: Option<ScopeIdx>) -> ScopeIdx {
        self.scopes.push(Scope {
            module,
            parent,
            typedefs: IndexMap::new(),
            groupings: IndexMap::new(),
        });
        ScopeIdx(self.scopes.len() - 1)
    }

    #[allow(clippy::too_many_arguments)]
    fn new_node(
        &mut self,
        kind: NodeKind<'g>,
        name: &str,
        id: SchemaId,
        parent: Option<NodeIdx>,
        scope: ScopeIdx,
        ctx: BodyCtx,
        origin: Option<NodeIdx>,
    ) -> NodeIdx {
        self.nodes.push(Node {
            kind,
            name: name.to_string(),
            module: ctx.module,
            id,
            parent,
            owner: parent,
            children: Vec::new(),
            decls: Vec::new(),
            scope,
            origin,
            in_grouping: ctx.in_grouping,
        });
        NodeIdx(self.nodes.len() - 1)
    }

    /// Adds a declared child to `holder`, in both the effective tree and the
    /// declaration list.
    fn add_declared(
        &mut self,
        holder: NodeIdx,
        kind: NodeKind<'g>,
        name: &str,
        scope: ScopeIdx,
        ctx: BodyCtx,
    ) -> NodeIdx {
        let id = match kind.step_kind() {
            Some(step) => self.node(holder).id.child(step, name),
            None => self.node(holder).id.clone(),
        };
        let node = self.new_node(kind, name, id, Some(holder), scope, ctx, None);
        let holder_node = self.node_mut(holder);
        holder_node.children.push(node);
        holder_node.decls.push(Decl::Node(node));
        node
    }

    /// Walks one module into the tree.
    ///
    /// # Errors
    /// Returns `CodegenError` for unknown or cyclic groupings and missing
    /// refine targets.
    pub(crate) fn build_module(&mut self, module: usize) -> Result<(), CodegenError> {
        let def = self.modules[module];
        let ctx = BodyCtx {
            module,
            in_grouping: false,
        };
        let top = self.new_scope(module, None);
        let root = self.new_node(
            NodeKind::Root,
            &def.name,
            SchemaId::module_root(def.name.clone()),
            None,
            top,
            ctx,
            None,
        );
        self.roots.push(root);
        self.module_scopes.push(top);
        self.build_body_in(root, top, &def.body, ctx)?;
        tracing::debug!(
            "module '{}' walked, {} nodes in tree",
            def.name,
            self.nodes.len()
        );
        Ok(())
    }

    fn build_body(
        &mut self,
        holder: NodeIdx,
        parent_scope: ScopeIdx,
        body: &'g [Statement],
        ctx: BodyCtx,
    ) -> Result<ScopeIdx, CodegenError> {
        let scope = self.new_scope(self.scope(parent_scope).module, Some(parent_scope));
        self.build_body_in(holder, scope, body, ctx)?;
        Ok(scope)
    }

    fn build_body_in(
        &mut self,
        holder: NodeIdx,
        scope: ScopeIdx,
        body: &'g [Statement],
        ctx: BodyCtx,
    ) -> Result<(), CodegenError> {
        let first_typedef = self.typedefs.len();
        let first_grouping = self.groupings.len();
        let module = self.scope(scope).module;

        for stmt in body {
            match stmt {
                Statement::Typedef(def) => {
                    let idx = TypedefIdx(self.typedefs.len());
                    self.typedefs.push(TypedefEntry {
                        id: self.node(holder).id.child(StepKind::Typedef, def.name.clone()),
                        def,
                        scope,
                        owner: holder,
                        module,
                    });
                    self.scopes[scope.0].typedefs.insert(def.name.clone(), idx);
                }
                Statement::Grouping(def) => {
                    let idx = GroupingIdx(self.groupings.len());
                    self.groupings.push(GroupingEntry {
                        id: self
                            .node(holder)
                            .id
                            .child(StepKind::Grouping, def.name.clone()),
                        def,
                        scope,
                        owner: holder,
                        module,
                        state: GroupingState::Pending,
                    });
                    self.scopes[scope.0].groupings.insert(def.name.clone(), idx);
                }
                _ => {}
            }
        }

        let mut next_typedef = first_typedef;
        let mut next_grouping = first_grouping;
        for stmt in body {
            match stmt {
                Statement::Typedef(_) => {
                    self.node_mut(holder)
                        .decls
                        .push(Decl::Typedef(TypedefIdx(next_typedef)));
                    next_typedef += 1;
                }
                Statement::Grouping(_) => {
                    self.node_mut(holder)
                        .decls
                        .push(Decl::Grouping(GroupingIdx(next_grouping)));
                    next_grouping += 1;
                }
                Statement::Identity(identity) => {
                    self.node_mut(holder).decls.push(Decl::Identity(identity));
                }
                Statement::Feature(feature) => {
                    self.node_mut(holder).decls.push(Decl::Feature(feature));
                }
                other => self.build_statement(holder, scope, other, ctx)?,
            }
        }

        for idx in first_grouping..next_grouping {
            self.ensure_grouping(GroupingIdx(idx))?;
        }
        Ok(())
    }

    fn build_statement(
        &mut self,
        holder: NodeIdx,
        scope: ScopeIdx,
        stmt: &'g Statement,
        ctx: BodyCtx,
    ) -> Result<(), CodegenError> {
        match stmt {
            Statement::Container(def) => {
                let node = self.add_declared(holder, NodeKind::Container(def), &def.name, scope, ctx);
                self.build_body(node, scope, &def.body, ctx)?;
            }
            Statement::List(def) => {
                let node = self.add_declared(holder, NodeKind::List(def), &def.name, scope, ctx);
                self.build_body(node, scope, &def.body, ctx)?;
            }
            Statement::Leaf(def) => {
                self.add_declared(holder, NodeKind::Leaf(def), &def.name, scope, ctx);
            }
            Statement::LeafList(def) => {
                self.add_declared(holder, NodeKind::LeafList(def), &def.name, scope, ctx);
            }
            Statement::AnyXml(def) => {
                self.add_declared(holder, NodeKind::AnyXml, &def.name, scope, ctx);
            }
            Statement::AnyData(def) => {
                self.add_declared(holder, NodeKind::AnyData, &def.name, scope, ctx);
            }
            Statement::Choice(def) => {
                let choice = self.add_declared(holder, NodeKind::Choice(def), &def.name, scope, ctx);
                for case_stmt in &def.body {
                    match case_stmt {
                        Statement::Case(case) => {
                            let node = self.add_declared(choice, NodeKind::Case, &case.name, scope, ctx);
                            self.build_body(node, scope, &case.body, ctx)?;
                        }
                        shorthand => {
                            let name = shorthand.argument();
                            let node = self.add_declared(choice, NodeKind::Case, &name, scope, ctx);
                            self.build_body(node, scope, std::slice::from_ref(shorthand), ctx)?;
                        }
                    }
                }
            }
            Statement::Case(def) => {
                let node = self.add_declared(holder, NodeKind::Case, &def.name, scope, ctx);
                self.build_body(node, scope, &def.body, ctx)?;
            }
            Statement::Uses(def) => self.instantiate(holder, scope, def, ctx)?,
            Statement::Augment(def) => {
                let path = def.target_path();
                let id = self.augment_id(holder, &path);
                let node = self.new_node(NodeKind::Augment(def), &path, id, None, scope, ctx, None);
                self.node_mut(node).owner = Some(holder);
                self.node_mut(holder).decls.push(Decl::Node(node));
                self.augments.push(node);
                self.build_body(node, scope, &def.body, ctx)?;
            }
            Statement::Rpc(def) | Statement::Action(def) => {
                let kind = if matches!(stmt, Statement::Rpc(_)) {
                    NodeKind::Rpc(def)
                } else {
                    NodeKind::Action(def)
                };
                let node = self.add_declared(holder, kind, &def.name, scope, ctx);
                let own_scope = self.build_body(node, scope, &def.body, ctx)?;
                let no_statements: &'g [Statement] = &[];
                for (kind, step, body) in [
                    (NodeKind::Input, StepKind::Input, def.input.as_deref()),
                    (NodeKind::Output, StepKind::Output, def.output.as_deref()),
                ] {
                    let name = step.keyword();
                    let id = self.node(node).id.child(step, name);
                    let io = self.new_node(kind, name, id, Some(node), own_scope, ctx, None);
                    self.node_mut(node).children.push(io);
                    self.build_body(io, own_scope, body.unwrap_or(no_statements), ctx)?;
                }
            }
            Statement::Notification(def) => {
                let node = self.add_declared(holder, NodeKind::Notification(def), &def.name, scope, ctx);
                self.build_body(node, scope, &def.body, ctx)?;
            }
            Statement::YangData(def) => {
                let node = self.add_declared(holder, NodeKind::YangData(def), &def.name, scope, ctx);
                self.build_body(node, scope, &def.body, ctx)?;
            }
            Statement::Typedef(_)
            | Statement::Grouping(_)
            | Statement::Identity(_)
            | Statement::Feature(_) => {}
        }
        Ok(())
    }

    fn augment_id(&self, holder: NodeIdx, path: &str) -> SchemaId {
        let base = self.node(holder).id.clone();
        let mut candidate = base.child(StepKind::Augment, path);
        let mut n = 2;
        let taken = |id: &SchemaId| {
            self.node(holder)
                .decls
                .iter()
                .any(|d| matches!(d, Decl::Node(a) if self.node(*a).id == *id))
        };
        while taken(&candidate) {
            candidate = base.child(StepKind::Augment, format!("{path}#{n}"));
            n += 1;
        }
        candidate
    }

    /// Builds a grouping's own tree once, detecting `uses` cycles.
    fn ensure_grouping(&mut self, idx: GroupingIdx) -> Result<NodeIdx, CodegenError> {
        match self.groupings[idx.0].state {
            GroupingState::Built(root) => return Ok(root),
            GroupingState::Building => {
                let start = self
                    .grouping_stack
                    .iter()
                    .position(|g| *g == idx)
                    .unwrap_or(0);
                let mut chain: Vec<String> = self.grouping_stack[start..]
                    .iter()
                    .map(|g| self.grouping(*g).id.to_string())
                    .collect();
                let at = self.grouping(idx).id.to_string();
                chain.push(at.clone());
                return Err(CodegenError::Cycle {
                    kind: CycleKind::Grouping,
                    at,
                    chain,
                });
            }
            GroupingState::Pending => {}
        }

        self.groupings[idx.0].state = GroupingState::Building;
        self.grouping_stack.push(idx);

        let (def, scope, owner, module, id) = {
            let entry = self.grouping(idx);
            (entry.def, entry.scope, entry.owner, entry.module, entry.id.clone())
        };
        let ctx = BodyCtx {
            module,
            in_grouping: true,
        };
        let root = self.new_node(NodeKind::Grouping(def), &def.name, id, None, scope, ctx, None);
        self.node_mut(root).owner = Some(owner);
        let result = self.build_body(root, scope, &def.body, ctx);

        self.grouping_stack.pop();
        result?;
        self.groupings[idx.0].state = GroupingState::Built(root);
        tracing::trace!("grouping {} built", self.grouping(idx).id);
        Ok(root)
    }

    /// Expands a `uses` under `holder`.
    fn instantiate(
        &mut self,
        holder: NodeIdx,
        scope: ScopeIdx,
        def: &'g Uses,
        ctx: BodyCtx,
    ) -> Result<(), CodegenError> {
        let grouping = self.lookup_grouping(scope, &def.grouping).ok_or_else(|| {
            CodegenError::unresolvable(
                &self.node(holder).id,
                def.grouping.to_string(),
                def.grouping.local.clone(),
            )
        })?;
        let root = self.ensure_grouping(grouping)?;

        let sources = self.node(root).children.clone();
        let mut instances = Vec::with_capacity(sources.len());
        for source in sources {
            let instance = self.copy_instance(source, holder, ctx);
            self.node_mut(holder).children.push(instance);
            instances.push(instance);
        }

        for refine in &def.refines {
            let mut current = holder;
            for segment in refine.segments() {
                current = self
                    .node(current)
                    .children
                    .iter()
                    .copied()
                    .find(|c| self.node(*c).name == segment)
                    .ok_or_else(|| {
                        CodegenError::unresolvable(
                            &self.node(holder).id,
                            refine.target.clone(),
                            segment.to_string(),
                        )
                    })?;
            }
        }

        let idx = UsesIdx(self.uses.len());
        self.uses.push(UsesSite {
            stmt: def,
            grouping,
            instances,
        });
        self.node_mut(holder).decls.push(Decl::Uses(idx));

        for augment in &def.augments {
            self.augment_instance(holder, scope, augment, ctx)?;
        }
        Ok(())
    }

    /// Grafts an augment of a `uses` into the subtree just instantiated
    /// under `holder`.
    fn augment_instance(
        &mut self,
        holder: NodeIdx,
        scope: ScopeIdx,
        def: &'g Augment,
        ctx: BodyCtx,
    ) -> Result<(), CodegenError> {
        let path = def.relative_path();
        let id = self.augment_id(holder, &path);
        let node = self.new_node(NodeKind::Augment(def), &path, id, None, scope, ctx, None);
        self.node_mut(node).owner = Some(holder);
        self.node_mut(holder).decls.push(Decl::Node(node));
        self.build_body(node, scope, &def.body, ctx)?;

        let mut target = holder;
        for step in &def.target {
            target = self.schema_child(target, step).ok_or_else(|| {
                CodegenError::unresolvable(&self.node(node).id, path.clone(), step.to_string())
            })?;
        }
        self.graft(node, target)
    }

    fn copy_instance(&mut self, source: NodeIdx, parent: NodeIdx, ctx: BodyCtx) -> NodeIdx {
        let (kind, name, scope, origin, children) = {
            let src = self.node(source);
            (
                src.kind,
                src.name.clone(),
                src.scope,
                src.origin.unwrap_or(source),
                src.children.clone(),
            )
        };
        let id = match kind.step_kind() {
            Some(step) => self.node(parent).id.child(step, name.clone()),
            None => self.node(parent).id.clone(),
        };
        let copy = self.new_node(kind, &name, id, Some(parent), scope, ctx, Some(origin));
        for child in children {
            let child_copy = self.copy_instance(child, copy, ctx);
            self.node_mut(copy).children.push(child_copy);
        }
        copy
    }

    /// Grafts every augment body into its target, retrying until no
    /// further augment can be placed.
    ///
    /// # Errors
    /// Returns `CodegenError::Unresolvable` for a target that never appears
    /// and `CodegenError::Unsupported` for a target that cannot hold data.
    pub(crate) fn graft_augments(&mut self) -> Result<(), CodegenError> {
        let mut pending = std::mem::take(&mut self.augments);
        let all = pending.clone();

        while !pending.is_empty() {
            let mut remaining = Vec::with_capacity(pending.len());
            let mut first_miss = None;
            for augment in pending.iter().copied() {
                match self.find_augment_target(augment) {
                    Ok(target) => self.graft(augment, target)?,
                    Err(miss) => {
                        first_miss.get_or_insert((augment, miss));
                        remaining.push(augment);
                    }
                }
            }
            if remaining.len() == pending.len() {
                if let Some((augment, PathMiss(missing))) = first_miss {
                    let node = self.node(augment);
                    return Err(CodegenError::unresolvable(&node.id, node.name.clone(), missing));
                }
            }
            pending = remaining;
        }

        self.augments = all;
        Ok(())
    }

    fn find_augment_target(&self, augment: NodeIdx) -> Result<NodeIdx, PathMiss> {
        let NodeKind::Augment(def) = self.node(augment).kind else {
            return Err(PathMiss(self.node(augment).name.clone()));
        };
        let first = def
            .target
            .first()
            .ok_or_else(|| PathMiss(String::new()))?;
        let module = self
            .module_of(&first.module)
            .ok_or_else(|| PathMiss(first.module.clone()))?;
        let mut current = self.roots[module];
        for step in &def.target {
            current = self
                .schema_child(current, step)
                .ok_or_else(|| PathMiss(step.to_string()))?;
        }
        Ok(current)
    }

    /// Finds a child by schema node identifier step; choice and case are
    /// explicit here.
    fn schema_child(&self, parent: NodeIdx, step: &QName) -> Option<NodeIdx> {
        self.node(parent).children.iter().copied().find(|c| {
            let child = self.node(*c);
            child.name == step.local && self.modules[child.module].name == step.module
        })
    }

    fn graft(&mut self, augment: NodeIdx, target: NodeIdx) -> Result<(), CodegenError> {
        let allowed = matches!(
            self.node(target).kind,
            NodeKind::Container(_)
                | NodeKind::List(_)
                | NodeKind::Choice(_)
                | NodeKind::Case
                | NodeKind::Input
                | NodeKind::Output
                | NodeKind::Notification(_)
        );
        if !allowed {
            return Err(CodegenError::unsupported(
                format!("augment of {}", self.node(target).kind.keyword()),
                &self.node(augment).id,
            ));
        }

        let body = std::mem::take(&mut self.node_mut(augment).children);
        for child in &body {
            self.node_mut(*child).parent = Some(target);
        }
        self.node_mut(target).children.extend(body);
        self.augment_targets.insert(augment, target);
        tracing::trace!(
            "augment {} grafted into {}",
            self.node(augment).id,
            self.node(target).id
        );
        Ok(())
    }

    /// Looks up a typedef following YANG scoping: enclosing scopes outward
    /// for the scope's own module, top level only for other modules.
    pub(crate) fn lookup_typedef(&self, scope: ScopeIdx, name: &QName) -> Option<TypedefIdx> {
        self.lookup(scope, name, |s| s.typedefs.get(&name.local).copied())
    }

    /// Looks up a grouping with the same scoping rules as typedefs.
    pub(crate) fn lookup_grouping(&self, scope: ScopeIdx, name: &QName) -> Option<GroupingIdx> {
        self.lookup(scope, name, |s| s.groupings.get(&name.local).copied())
    }

    fn lookup<T>(
        &self,
        scope: ScopeIdx,
        name: &QName,
        find: impl Fn(&Scope) -> Option<T>,
    ) -> Option<T> {
        let own_module = self.scope(scope).module;
        if self.modules[own_module].name == name.module {
            let mut current = Some(scope);
            while let Some(idx) = current {
                let s = self.scope(idx);
                if let Some(found) = find(s) {
                    return Some(found);
                }
                current = s.parent;
            }
            return None;
        }
        let module = self.module_of(&name.module)?;
        let top = *self.module_scopes.get(module)?;
        find(self.scope(top))
    }

    /// Returns the nearest ancestor that is neither a choice nor a case.
    pub(crate) fn data_parent(&self, idx: NodeIdx) -> Option<NodeIdx> {
        let mut parent = self.node(idx).parent?;
        while self.node(parent).kind.is_transparent() {
            parent = self.node(parent).parent?;
        }
        Some(parent)
    }

    /// Finds a data child by name, looking through choice and case nodes.
    pub(crate) fn data_child(
        &self,
        parent: NodeIdx,
        name: &str,
        module: Option<usize>,
    ) -> Option<NodeIdx> {
        for child in self.node(parent).children.iter().copied() {
            let node = self.node(child);
            if node.kind.is_transparent() {
                if let Some(found) = self.data_child(child, name, module) {
                    return Some(found);
                }
            } else if node.name == name && module.is_none_or(|m| m == node.module) {
                return Some(child);
            }
        }
        None
    }

    /// Evaluates a leafref path from the leaf `from`. Prefixes resolve
    /// through the imports of `prefix_module`.
    pub(crate) fn eval_path(
        &self,
        from: Option<NodeIdx>,
        path: &PathExpr,
        prefix_module: usize,
    ) -> Result<NodeIdx, PathMiss> {
        let resolve = |prefix: &Option<String>| -> Result<Option<usize>, PathMiss> {
            match prefix {
                None => Ok(None),
                Some(p) => self.modules[prefix_module]
                    .resolve_prefix(p)
                    .and_then(|name| self.module_of(name))
                    .map(Some)
                    .ok_or_else(|| PathMiss(format!("{p}:"))),
            }
        };

        let mut current = if path.is_absolute() {
            let first = path.steps().first().ok_or_else(|| PathMiss("/".to_string()))?;
            let module = resolve(&first.prefix)?.unwrap_or(prefix_module);
            self.roots[module]
        } else {
            let mut current = from.ok_or_else(|| PathMiss("..".to_string()))?;
            for _ in 0..path.up() {
                current = self
                    .data_parent(current)
                    .ok_or_else(|| PathMiss("..".to_string()))?;
            }
            current
        };

        for step in path.steps() {
            let module = resolve(&step.prefix)?;
            current = self.data_child(current, &step.name, module).ok_or_else(|| {
                PathMiss(match &step.prefix {
                    Some(p) => format!("{p}:{}", step.name),
                    None => step.name.clone(),
                })
            })?;
        }
        Ok(current)
    }

    /// Finds a list key leaf among the list's direct data children.
    pub(crate) fn key_leaf(&self, list: NodeIdx, key: &str) -> Option<NodeIdx> {
        self.data_child(list, key, None)
            .filter(|k| self.node(*k).parent == Some(list))
    }
}
