//! Type reference resolution.
//!
//! Every declared type resolves to a shared `Arc<TypeRef>`:
//!
//! - built-in types resolve to one shared base reference per base type
//! - typedefs resolve to the reference claimed for the typedef's own type,
//!   or for the root enumeration when the typedef only renames one
//! - leafrefs are followed through the effective tree to their terminal
//!   leaf, whose cached reference is returned
//! - identityrefs resolve to the type of their first base identity
//! - inline enumerations, bits and unions become nested types of the
//!   enclosing type
//!
//! Leaves instantiated by `uses` share the resolution of their grouping
//! declaration unless a leafref makes it depend on the instantiation site.

use crate::context::GenerationContext;
use crate::error::{CodegenError, CycleKind};
use crate::tree::{NodeIdx, NodeKind, PathMiss, ScopeIdx, TypedefIdx};
use std::sync::Arc;
use yangbind_core::naming::{map_enum_names, property_name};
use yangbind_core::{
    Attribute, BaseType, Capability, Contract, EnumConstant, OutputType, QualifiedName, TypeKind,
    TypeRef,
};
use yangbind_schema::{Bit, DeclaredType, EnumMember, PathExpr, QName, SchemaId};

/// How a typedef maps onto output types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypedefClass {
    /// Wraps a built-in type.
    Scalar(BaseType),
    /// Refines another type-producing typedef.
    Derived(TypedefIdx),
    Enumeration,
    /// Renames the enumeration defined by the given typedef.
    EnumAlias(TypedefIdx),
    Union,
    Bits,
    /// Leafref, resolved at every use site.
    LeafrefAlias,
    /// Identityref, resolved at every use site.
    IdentityrefAlias,
}

impl TypedefClass {
    /// Returns true if the typedef has a type of its own.
    pub(crate) const fn produces_type(&self) -> bool {
        matches!(
            self,
            Self::Scalar(_) | Self::Derived(_) | Self::Enumeration | Self::Union | Self::Bits
        )
    }
}

/// Leaves currently being followed through leafref paths.
#[derive(Debug, Default)]
pub(crate) struct LeafrefChain {
    entries: Vec<(NodeIdx, SchemaId)>,
}

impl LeafrefChain {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn contains(&self, node: NodeIdx) -> bool {
        self.entries.iter().any(|(n, _)| *n == node)
    }

    fn push(&mut self, node: NodeIdx, id: SchemaId) {
        self.entries.push((node, id));
    }

    fn pop(&mut self) {
        self.entries.pop();
    }

    /// Returns the cycle error for re-entering `id`.
    fn cycle(&self, node: NodeIdx, id: &SchemaId) -> CodegenError {
        let start = self
            .entries
            .iter()
            .position(|(n, _)| *n == node)
            .unwrap_or(0);
        let mut chain: Vec<String> = self.entries[start..]
            .iter()
            .map(|(_, id)| id.to_string())
            .collect();
        chain.push(id.to_string());
        CodegenError::Cycle {
            kind: CycleKind::Leafref,
            at: id.to_string(),
            chain,
        }
    }
}

/// Where a declared type is being resolved.
#[derive(Debug, Clone)]
pub(crate) struct Site {
    /// Lexical scope for typedef lookups and path prefixes.
    pub scope: ScopeIdx,
    /// Leaf holding the type; relative leafref paths start here.
    pub leaf: Option<NodeIdx>,
    /// Identity reported in errors.
    pub location: SchemaId,
}

impl<'g> GenerationContext<'g> {
    /// Resolves the type of a leaf or leaf-list with a fresh chain.
    pub(crate) fn resolve_leaf(&mut self, node: NodeIdx) -> Result<Arc<TypeRef>, CodegenError> {
        let mut chain = LeafrefChain::new();
        self.leaf_type(node, &mut chain)
    }

    /// Looks up a typedef from `scope`.
    fn find_typedef(
        &self,
        scope: ScopeIdx,
        name: &QName,
        location: &SchemaId,
    ) -> Result<TypedefIdx, CodegenError> {
        self.tree
            .lookup_typedef(scope, name)
            .ok_or_else(|| CodegenError::unresolvable(location, name.to_string(), name.local.clone()))
    }

    /// Classifies a typedef, detecting derivation cycles.
    pub(crate) fn classify(&mut self, typedef: TypedefIdx) -> Result<TypedefClass, CodegenError> {
        if let Some(class) = self.classes.get(&typedef) {
            return Ok(*class);
        }
        if let Some(start) = self.classifying.iter().position(|t| *t == typedef) {
            let at = self.tree.typedef(typedef).id.to_string();
            let mut chain: Vec<String> = self.classifying[start..]
                .iter()
                .map(|t| self.tree.typedef(*t).id.to_string())
                .collect();
            chain.push(at.clone());
            return Err(CodegenError::Cycle {
                kind: CycleKind::Typedef,
                at,
                chain,
            });
        }

        self.classifying.push(typedef);
        let entry = self.tree.typedef(typedef);
        let (def, scope, id) = (entry.def, entry.scope, entry.id.clone());
        let class = match &def.ty {
            DeclaredType::Primitive { base, .. } => TypedefClass::Scalar(*base),
            DeclaredType::Derived { name, .. } => {
                let base = self.find_typedef(scope, name, &id)?;
                match self.classify(base)? {
                    TypedefClass::Enumeration => TypedefClass::EnumAlias(base),
                    TypedefClass::EnumAlias(root) => TypedefClass::EnumAlias(root),
                    TypedefClass::LeafrefAlias => TypedefClass::LeafrefAlias,
                    TypedefClass::IdentityrefAlias => TypedefClass::IdentityrefAlias,
                    TypedefClass::Scalar(_)
                    | TypedefClass::Derived(_)
                    | TypedefClass::Union
                    | TypedefClass::Bits => TypedefClass::Derived(base),
                }
            }
            DeclaredType::Leafref { .. } => TypedefClass::LeafrefAlias,
            DeclaredType::Identityref { .. } => TypedefClass::IdentityrefAlias,
            DeclaredType::Enumeration(_) => TypedefClass::Enumeration,
            DeclaredType::Union(members) => {
                self.classify_members(members, scope, &id)?;
                TypedefClass::Union
            }
            DeclaredType::Bits(_) => TypedefClass::Bits,
        };
        self.classifying.pop();
        self.classes.insert(typedef, class);
        Ok(class)
    }

    /// Classifies the typedefs named by union members, nested unions included.
    fn classify_members(
        &mut self,
        members: &[DeclaredType],
        scope: ScopeIdx,
        location: &SchemaId,
    ) -> Result<(), CodegenError> {
        for member in members {
            match member {
                DeclaredType::Derived { name, .. } => {
                    let typedef = self.find_typedef(scope, name, location)?;
                    self.classify(typedef)?;
                }
                DeclaredType::Union(nested) => self.classify_members(nested, scope, location)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns the reference of a type-producing typedef.
    pub(crate) fn typedef_ref(&mut self, typedef: TypedefIdx) -> Result<Arc<TypeRef>, CodegenError> {
        let target = match self.classify(typedef)? {
            TypedefClass::EnumAlias(root) => root,
            _ => typedef,
        };
        self.typedef_slots
            .get(&target)
            .map(|slot| Arc::clone(&self.slots[*slot].type_ref))
            .ok_or_else(|| {
                CodegenError::unsupported(
                    "typedef without a type of its own",
                    &self.tree.typedef(target).id,
                )
            })
    }

    /// Resolves the type of a leaf or leaf-list, memoized per node.
    pub(crate) fn leaf_type(
        &mut self,
        node: NodeIdx,
        chain: &mut LeafrefChain,
    ) -> Result<Arc<TypeRef>, CodegenError> {
        if let Some(cached) = self.leaf_types.get(&node) {
            return Ok(Arc::clone(cached));
        }
        let (kind, id, scope, origin) = {
            let n = self.tree.node(node);
            (n.kind, n.id.clone(), n.scope, n.origin)
        };
        if chain.contains(node) {
            return Err(chain.cycle(node, &id));
        }
        let ty = kind
            .declared_type()
            .ok_or_else(|| CodegenError::unsupported(format!("type of {}", kind.keyword()), &id))?;

        if let Some(origin) = origin {
            if ty.is_inline_composite() || !self.involves_leafref(ty, scope, &id)? {
                let shared = self.leaf_type(origin, chain)?;
                self.leaf_types.insert(node, Arc::clone(&shared));
                return Ok(shared);
            }
        }

        chain.push(node, id.clone());
        let resolved = if ty.is_inline_composite() {
            self.inline_type(node, ty, scope, chain)
        } else {
            let site = Site {
                scope,
                leaf: Some(node),
                location: id,
            };
            self.resolve_declared(ty, &site, chain)
        };
        chain.pop();

        let resolved = resolved?;
        self.leaf_types.insert(node, Arc::clone(&resolved));
        Ok(resolved)
    }

    fn involves_leafref(
        &mut self,
        ty: &DeclaredType,
        scope: ScopeIdx,
        location: &SchemaId,
    ) -> Result<bool, CodegenError> {
        Ok(match ty {
            DeclaredType::Leafref { .. } => true,
            DeclaredType::Derived { name, .. } => {
                let typedef = self.find_typedef(scope, name, location)?;
                self.classify(typedef)? == TypedefClass::LeafrefAlias
            }
            _ => false,
        })
    }

    /// Resolves a non-composite declared type at `site`.
    pub(crate) fn resolve_declared(
        &mut self,
        ty: &'g DeclaredType,
        site: &Site,
        chain: &mut LeafrefChain,
    ) -> Result<Arc<TypeRef>, CodegenError> {
        match ty {
            DeclaredType::Primitive { base, .. } => Ok(self.base_ref(*base)),
            DeclaredType::Derived { name, .. } => {
                let typedef = self.find_typedef(site.scope, name, &site.location)?;
                match self.classify(typedef)? {
                    TypedefClass::LeafrefAlias | TypedefClass::IdentityrefAlias => {
                        let (def, scope) = {
                            let entry = self.tree.typedef(typedef);
                            (entry.def, entry.scope)
                        };
                        let aliased = Site {
                            scope,
                            leaf: site.leaf,
                            location: site.location.clone(),
                        };
                        self.resolve_declared(&def.ty, &aliased, chain)
                    }
                    _ => self.typedef_ref(typedef),
                }
            }
            DeclaredType::Leafref { path, .. } => self.follow_leafref(path, site, chain),
            DeclaredType::Identityref { bases } => {
                let base = bases.first().ok_or_else(|| {
                    CodegenError::unsupported("identityref without base", &site.location)
                })?;
                self.identity_ref(base, &site.location)
            }
            DeclaredType::Enumeration(_) | DeclaredType::Bits(_) | DeclaredType::Union(_) => Err(
                CodegenError::unsupported(format!("inline {}", ty.keyword()), &site.location),
            ),
        }
    }

    /// Returns the type of an identity.
    pub(crate) fn identity_ref(
        &self,
        identity: &QName,
        location: &SchemaId,
    ) -> Result<Arc<TypeRef>, CodegenError> {
        self.identities.get(identity).map(Arc::clone).ok_or_else(|| {
            CodegenError::unresolvable(location, identity.to_string(), identity.local.clone())
        })
    }

    fn follow_leafref(
        &mut self,
        path: &PathExpr,
        site: &Site,
        chain: &mut LeafrefChain,
    ) -> Result<Arc<TypeRef>, CodegenError> {
        if site.leaf.is_none() && !path.is_absolute() {
            return Ok(self.base_ref(BaseType::Object));
        }

        let prefix_module = self.tree.scope(site.scope).module;
        let target = match self.tree.eval_path(site.leaf, path, prefix_module) {
            Ok(target) => target,
            Err(PathMiss(missing)) => {
                let lenient = site.leaf.is_some_and(|leaf| self.tree.node(leaf).in_grouping);
                if lenient {
                    tracing::trace!(
                        "leafref '{}' at {} leaves its grouping, typed as object",
                        path,
                        site.location
                    );
                    return Ok(self.base_ref(BaseType::Object));
                }
                return Err(CodegenError::unresolvable(
                    &site.location,
                    path.as_str(),
                    missing,
                ));
            }
        };

        let target_node = self.tree.node(target);
        if !matches!(target_node.kind, NodeKind::Leaf(_) | NodeKind::LeafList(_)) {
            return Err(CodegenError::unsupported(
                format!("leafref to {}", target_node.kind.keyword()),
                &site.location,
            ));
        }
        tracing::trace!("leafref '{}' at {} -> {}", path, site.location, target_node.id);
        self.leaf_type(target, chain)
    }

    /// Builds the nested type of a leaf's inline enumeration, bits or union.
    fn inline_type(
        &mut self,
        node: NodeIdx,
        ty: &'g DeclaredType,
        scope: ScopeIdx,
        chain: &mut LeafrefChain,
    ) -> Result<Arc<TypeRef>, CodegenError> {
        let (id, module) = {
            let n = self.tree.node(node);
            (n.id.clone(), n.module)
        };
        let name = self
            .inline_slots
            .get(&node)
            .map(|slot| slot.name.clone())
            .ok_or_else(|| CodegenError::unsupported("unnamed inline type", &id))?;

        let site = Site {
            scope,
            leaf: Some(node),
            location: id.clone(),
        };
        let built = self.composite_type(name.clone(), ty, module, &site, chain)?;
        self.inline_types.insert(node, built);
        Ok(TypeRef::named(name))
    }

    /// Builds an enumeration, bits or union type named `name`.
    pub(crate) fn composite_type(
        &mut self,
        name: QualifiedName,
        ty: &'g DeclaredType,
        module: usize,
        site: &Site,
        chain: &mut LeafrefChain,
    ) -> Result<OutputType, CodegenError> {
        match ty {
            DeclaredType::Enumeration(members) => {
                self.enumeration_type(name, members, module, &site.location)
            }
            DeclaredType::Bits(bits) => Ok(self.bits_type(name, bits, module, &site.location)),
            DeclaredType::Union(members) => self.union_type(name, members, module, site, chain),
            other => Err(CodegenError::unsupported(
                format!("{} as composite type", other.keyword()),
                &site.location,
            )),
        }
    }

    fn enumeration_type(
        &self,
        name: QualifiedName,
        members: &[EnumMember],
        module: usize,
        origin: &SchemaId,
    ) -> Result<OutputType, CodegenError> {
        let assigned: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        let mapped = map_enum_names(&assigned)?;

        let mut ty = self.empty_type(name, TypeKind::Enumeration, module, origin);
        let mut highest: Option<i32> = None;
        for member in members {
            let value = member
                .value
                .unwrap_or_else(|| highest.map_or(0, |h| h.saturating_add(1)));
            highest = Some(highest.map_or(value, |h| h.max(value)));
            let constant = mapped
                .get(&member.name)
                .cloned()
                .unwrap_or_else(|| member.name.clone());
            ty.constants.push(EnumConstant {
                name: constant,
                yang_name: member.name.clone(),
                value,
                description: member.description.clone(),
            });
        }
        Ok(ty)
    }

    fn bits_type(
        &mut self,
        name: QualifiedName,
        bits: &[Bit],
        module: usize,
        origin: &SchemaId,
    ) -> OutputType {
        let flag = self.base_ref(BaseType::Boolean);
        let mut ty = self.empty_type(name, TypeKind::ValueObject, module, origin);
        for bit in bits {
            let base = property_name(&bit.name);
            let mut attribute = base.clone();
            let mut n = 1;
            while ty.attribute(&attribute).is_some() {
                attribute = format!("{base}${n}");
                n += 1;
            }
            ty.identity.push(attribute.clone());
            ty.attributes
                .push(Attribute::read_only(attribute, Arc::clone(&flag)));
        }
        ty
    }

    fn union_type(
        &mut self,
        name: QualifiedName,
        members: &'g [DeclaredType],
        module: usize,
        site: &Site,
        chain: &mut LeafrefChain,
    ) -> Result<OutputType, CodegenError> {
        let mut ty = self.empty_type(name.clone(), TypeKind::ValueObject, module, &site.location);
        let mut nested_counts = [0usize; 3];

        for member in members {
            let (source, type_ref) = match member {
                DeclaredType::Enumeration(_) | DeclaredType::Bits(_) | DeclaredType::Union(_) => {
                    let (slot, simple) = match member {
                        DeclaredType::Enumeration(_) => (0, "Enumeration"),
                        DeclaredType::Bits(_) => (1, "Bits"),
                        _ => (2, "Union"),
                    };
                    let nested_name = match nested_counts[slot] {
                        0 => name.nested(simple),
                        n => name.nested(format!("{simple}${n}")),
                    };
                    nested_counts[slot] += 1;
                    let nested = self.composite_type(nested_name.clone(), member, module, site, chain)?;
                    ty.nested.push(nested);
                    (member.keyword().to_string(), TypeRef::named(nested_name))
                }
                DeclaredType::Primitive { base, .. } => {
                    (base.yang_name().to_string(), self.base_ref(*base))
                }
                DeclaredType::Derived { name: typedef, .. } => {
                    (typedef.local.clone(), self.resolve_declared(member, site, chain)?)
                }
                DeclaredType::Leafref { .. } => {
                    ("leafref".to_string(), self.resolve_declared(member, site, chain)?)
                }
                DeclaredType::Identityref { bases } => {
                    let source = bases.first().map_or_else(|| "identityref".to_string(), |b| b.local.clone());
                    (source, self.resolve_declared(member, site, chain)?)
                }
            };

            let base_name = property_name(&source);
            let mut attribute = base_name.clone();
            let mut n = 1;
            while ty.attribute(&attribute).is_some() {
                attribute = format!("{base_name}${n}");
                n += 1;
            }
            ty.identity.push(attribute.clone());
            ty.attributes.push(Attribute::read_only(attribute, type_ref));
        }
        Ok(ty)
    }

    /// Builds the output type of a typedef.
    pub(crate) fn typedef_type(
        &mut self,
        slot: usize,
        typedef: TypedefIdx,
    ) -> Result<OutputType, CodegenError> {
        let entry = self.tree.typedef(typedef);
        let (def, scope, module, id) = (entry.def, entry.scope, entry.module, entry.id.clone());
        tracing::trace!("building typedef {}", id);

        let mut ty = match self.classify(typedef)? {
            TypedefClass::Scalar(base) => {
                let mut ty = self.output_type(slot, TypeKind::ValueObject);
                ty.attributes.push(Attribute::read_only(
                    yangbind_core::naming::VALUE_ATTRIBUTE,
                    self.base_ref(base),
                ));
                ty.identity
                    .push(yangbind_core::naming::VALUE_ATTRIBUTE.to_string());
                ty.implements.push(Capability::Contract(Contract::Scalar));
                ty
            }
            TypedefClass::Derived(base) => {
                let mut ty = self.output_type(slot, TypeKind::ValueObject);
                ty.super_type = Some(self.typedef_ref(base)?);
                ty
            }
            TypedefClass::Enumeration | TypedefClass::Union | TypedefClass::Bits => {
                let site = Site {
                    scope,
                    leaf: None,
                    location: id.clone(),
                };
                let mut chain = LeafrefChain::new();
                let name = self.slots[slot].name.clone();
                self.composite_type(name, &def.ty, module, &site, &mut chain)?
            }
            TypedefClass::EnumAlias(_)
            | TypedefClass::LeafrefAlias
            | TypedefClass::IdentityrefAlias => {
                return Err(CodegenError::unsupported(
                    "typedef without a type of its own",
                    &id,
                ));
            }
        };

        ty.restrictions = def.ty.restrictions().filter(|r| !r.is_empty()).cloned();
        ty.description.clone_from(&def.description);
        Ok(ty)
    }
}
