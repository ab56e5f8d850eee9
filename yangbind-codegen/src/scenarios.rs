//! End-to-end generation tests over small schema graphs.

use crate::error::{CodegenError, CycleKind};
use crate::fixtures::*;
use crate::{generate_for, generate_for_modules};
use std::sync::Arc;
use yangbind_core::{
    BaseType, Capability, Contract, LengthRange, OutputType, PatternConstraint, Restrictions,
    TypeKind, TypeModel, TypeRef,
};
use yangbind_schema::{
    AnyNode, Augment, Case, Choice, Container, DeclaredType, EnumMember, Feature, Grouping,
    Identity, Leaf, LeafList, List, Notification, Procedure, QName, SchemaError, Statement,
    Typedef, Uses, YangData,
};

fn get<'a>(model: &'a TypeModel, name: &str) -> &'a OutputType {
    model
        .find(name)
        .unwrap_or_else(|| panic!("type {name} not generated"))
}

fn returns<'a>(ty: &'a OutputType, operation: &str) -> &'a Arc<TypeRef> {
    &ty.operation(operation)
        .unwrap_or_else(|| panic!("{} has no {operation}", ty.name))
        .return_type
}

#[test]
fn test_typedef_chain_order_and_sharing() {
    let model = generate_for(&typedef_chain()).unwrap();
    let pkg = package("types");

    let names: Vec<String> = model.types().iter().map(|t| t.name.to_string()).collect();
    assert_eq!(
        names,
        vec![
            format!("{pkg}.TypesData"),
            format!("{pkg}.T1"),
            format!("{pkg}.T2"),
            format!("{pkg}.T3"),
            format!("{pkg}.C"),
        ]
    );

    let t1 = get(&model, &format!("{pkg}.T1"));
    assert_eq!(t1.kind, TypeKind::ValueObject);
    assert!(t1.has_capability(&Capability::Contract(Contract::Scalar)));
    assert_eq!(
        t1.attribute("value").map(|a| a.type_ref.as_ref()),
        Some(&TypeRef::Base(BaseType::Uint8))
    );
    assert_eq!(t1.identity, vec!["value".to_string()]);
    assert!(t1.restrictions.is_some());

    let t2 = get(&model, &format!("{pkg}.T2"));
    assert_eq!(
        t2.super_type.as_deref().and_then(TypeRef::target_name),
        Some(&t1.name)
    );
    assert!(t2.restrictions.is_none());
    let t3 = get(&model, &format!("{pkg}.T3"));
    assert_eq!(
        t3.super_type.as_deref().and_then(TypeRef::target_name),
        Some(&t2.name)
    );

    let c = get(&model, &format!("{pkg}.C"));
    let a = returns(c, "getA");
    let b = returns(c, "getB");
    assert_eq!(a.target_name(), Some(&t3.name));
    assert!(Arc::ptr_eq(a, b));
    assert!(Arc::ptr_eq(a, returns(c, "requireA")));
}

#[test]
fn test_typedef_restrictions_and_bits() {
    let graph = graph([module("rs")
        .child(Typedef::new(
            "name-str",
            DeclaredType::restricted(
                BaseType::String,
                Restrictions::new()
                    .length(1, 64)
                    .pattern(PatternConstraint::new("[a-z][a-z0-9-]*")),
            ),
        ))
        .child(Typedef::new(
            "short-name",
            DeclaredType::Derived {
                name: QName::new("rs", "name-str"),
                restrictions: Restrictions::new().length(1, 8),
            },
        ))
        .child(Typedef::new("flags", DeclaredType::bits(["read", "write", "exec"])))
        .child(
            Container::new("c")
                .child(typed_leaf("label", "rs", "short-name"))
                .child(typed_leaf("mode", "rs", "flags")),
        )]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("rs");

    let name_str = get(&model, &format!("{pkg}.NameStr"));
    let restrictions = name_str.restrictions.as_ref().unwrap();
    assert_eq!(restrictions.lengths, vec![LengthRange { min: 1, max: 64 }]);
    assert_eq!(restrictions.patterns[0].regex, "[a-z][a-z0-9-]*");
    assert!(!restrictions.patterns[0].inverted);
    assert!(restrictions.ranges.is_empty());
    assert_eq!(
        name_str.attribute("value").map(|a| a.type_ref.as_ref()),
        Some(&TypeRef::Base(BaseType::String))
    );

    let short = get(&model, &format!("{pkg}.ShortName"));
    assert_eq!(
        short.super_type.as_deref().and_then(TypeRef::target_name),
        Some(&name_str.name)
    );
    let narrowed = short.restrictions.as_ref().unwrap();
    assert_eq!(narrowed.lengths, vec![LengthRange { min: 1, max: 8 }]);
    assert!(narrowed.patterns.is_empty());

    let flags = get(&model, &format!("{pkg}.Flags"));
    assert_eq!(flags.kind, TypeKind::ValueObject);
    assert!(flags.restrictions.is_none());
    let bits: Vec<&str> = flags.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(bits, vec!["read", "write", "exec"]);
    assert_eq!(flags.identity, vec!["read", "write", "exec"]);
    assert!(flags
        .attributes
        .iter()
        .all(|a| a.type_ref.as_ref() == &TypeRef::Base(BaseType::Boolean)));

    let c = get(&model, &format!("{pkg}.C"));
    assert_eq!(returns(c, "getLabel").target_name(), Some(&short.name));
    assert_eq!(returns(c, "getMode").target_name(), Some(&flags.name));
}

#[test]
fn test_leafref_chain_resolves_to_terminal() {
    let model = generate_for(&leafref_chain()).unwrap();
    let pkg = package("refs");
    let port = get(&model, &format!("{pkg}.Port"));

    let top = get(&model, &format!("{pkg}.Top"));
    let terminal = returns(top, "getPortA");
    assert_eq!(terminal.target_name(), Some(&port.name));
    assert!(Arc::ptr_eq(terminal, returns(top, "getPortB")));
    assert!(Arc::ptr_eq(terminal, returns(top, "getPortC")));

    let other = get(&model, &format!("{pkg}.Other"));
    assert!(Arc::ptr_eq(terminal, returns(other, "getRemote")));
}

#[test]
fn test_leafref_cycle_reports_chain() {
    let err = generate_for(&leafref_cycle()).unwrap_err();
    assert_eq!(
        err,
        CodegenError::Cycle {
            kind: CycleKind::Leafref,
            at: "cyc:/container=top/leaf=a".to_string(),
            chain: vec![
                "cyc:/container=top/leaf=a".to_string(),
                "cyc:/container=top/leaf=b".to_string(),
                "cyc:/container=top/leaf=a".to_string(),
            ],
        }
    );
}

#[test]
fn test_two_key_list() {
    let model = generate_for(&two_key_list()).unwrap();
    let pkg = package("net");

    let key = get(&model, &format!("{pkg}.top.EntryKey"));
    assert_eq!(key.kind, TypeKind::ValueObject);
    let attributes: Vec<&str> = key.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(attributes, vec!["name", "index"]);
    assert_eq!(key.identity, vec!["name".to_string(), "index".to_string()]);
    assert_eq!(
        key.attribute("index").map(|a| a.type_ref.as_ref()),
        Some(&TypeRef::Base(BaseType::Uint32))
    );
    assert!(key.attributes.iter().all(|a| a.read_only));

    let entry = get(&model, &format!("{pkg}.top.Entry"));
    assert_eq!(returns(entry, "key").target_name(), Some(&key.name));
    assert!(entry.has_capability(&Capability::Contract(Contract::Augmentable)));

    let top = get(&model, &format!("{pkg}.Top"));
    assert!(matches!(returns(top, "getEntry").as_ref(), TypeRef::KeyedMap(_)));
    assert!(top.operation("nonnullEntry").is_some_and(|o| o.default_impl));
}

#[test]
fn test_sibling_collision_gets_suffix() {
    let model = generate_for(&colliding_containers()).unwrap();
    let pkg = package("clash");

    let first = get(&model, &format!("{pkg}.Foo"));
    let second = get(&model, &format!("{pkg}.Foo$CO"));
    assert!(first.operation("getX").is_some());
    assert!(second.operation("getY").is_some());
    assert_eq!(second.origin, "clash:/container=Foo");
}

#[test]
fn test_generation_is_deterministic() {
    let graph = interfaces();
    let first = generate_for(&graph).unwrap();
    let second = generate_for(&graph).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_interfaces_model() {
    let model = generate_for(&interfaces()).unwrap();
    let ifs = package("ifs").replace("norev", "rev180220");

    let root = get(&model, &format!("{ifs}.IfsData"));
    assert!(root.has_capability(&Capability::Contract(Contract::DataRoot)));
    assert!(root.operation("getInterfaces").is_some());

    let interface = get(&model, &format!("{ifs}.interfaces.Interface"));
    let key = get(&model, &format!("{ifs}.interfaces.InterfaceKey"));
    assert_eq!(returns(interface, "key").target_name(), Some(&key.name));
    assert_eq!(
        returns(interface, "getType").target_name().map(ToString::to_string),
        Some(format!("{ifs}.InterfaceType"))
    );
    assert_eq!(
        returns(interface, "getOperStatus").target_name().map(ToString::to_string),
        Some(format!("{ifs}.OperStatus"))
    );
    assert_eq!(
        returns(interface, "getHigherLayerIf").as_ref(),
        &TypeRef::UniqueSet(Arc::new(TypeRef::Base(BaseType::String)))
    );

    let status = get(&model, &format!("{ifs}.OperStatus"));
    assert_eq!(status.kind, TypeKind::Enumeration);
    let constants: Vec<(&str, i32)> = status
        .constants
        .iter()
        .map(|c| (c.name.as_str(), c.value))
        .collect();
    assert_eq!(constants, vec![("Up", 1), ("Down", 2), ("Testing", 3)]);

    let statistics = get(&model, &format!("{ifs}.interfaces._interface.Statistics"));
    let counters = get(&model, &format!("{ifs}.Counters"));
    assert!(statistics.has_capability(&Capability::Implements(counters.type_ref())));
    assert!(counters.operation("getInOctets").is_some());

    let ethernet = get(&model, &format!("{ifs}.Ethernet"));
    let base = get(&model, &format!("{ifs}.InterfaceType"));
    assert!(ethernet.has_capability(&Capability::Implements(base.type_ref())));
    assert!(ethernet.has_capability(&Capability::Contract(Contract::Identity)));

    let input = get(&model, &format!("{ifs}.ResetInput"));
    assert_eq!(
        returns(input, "getInterface").as_ref(),
        &TypeRef::Base(BaseType::String)
    );
}

#[test]
fn test_cross_module_augments() {
    let model = generate_for(&interfaces()).unwrap();
    let ifs = package("ifs").replace("norev", "rev180220");
    let ext = package("ext");

    let interface = get(&model, &format!("{ifs}.interfaces.Interface"));
    let augment = get(&model, &format!("{ext}.Interface1"));
    assert_eq!(augment.module, "ext");
    assert!(augment.has_capability(&Capability::AugmentationOf(interface.type_ref())));
    assert_eq!(
        returns(augment, "getMtu").as_ref(),
        &TypeRef::Base(BaseType::Uint16)
    );
    assert_eq!(
        returns(augment, "getPeer").as_ref(),
        &TypeRef::Base(BaseType::String)
    );

    let statistics = get(&model, &format!("{ifs}.interfaces._interface.Statistics"));
    let stats_augment = get(&model, &format!("{ext}.Statistics1"));
    assert!(stats_augment.has_capability(&Capability::AugmentationOf(statistics.type_ref())));
}

#[test]
fn test_module_subset() {
    let graph = interfaces();
    let full = generate_for(&graph).unwrap();
    let subset = generate_for_modules(&graph, &["ext"]).unwrap();

    assert!(!subset.is_empty());
    assert!(subset.types().iter().all(|t| t.module == "ext"));
    let ext = package("ext");
    assert_eq!(
        subset.find(&format!("{ext}.Interface1")),
        full.find(&format!("{ext}.Interface1"))
    );

    let err = generate_for_modules(&graph, &["nope"]).unwrap_err();
    assert!(matches!(err, CodegenError::Unresolvable { ref missing, .. } if missing == "nope"));
}

#[test]
fn test_grouping_instances_share_types() {
    let model = generate_for(&groupings()).unwrap();
    let pkg = package("grp");

    let endpoint = get(&model, &format!("{pkg}.Endpoint"));
    let inner = get(&model, &format!("{pkg}.endpoint.Inner"));
    assert!(inner.has_capability(&Capability::ChildOf(endpoint.type_ref())));
    assert_eq!(
        returns(endpoint, "getInner").target_name(),
        Some(&inner.name)
    );
    assert!(model.find(&format!("{pkg}.a.conn.Inner")).is_none());

    let a_conn = get(&model, &format!("{pkg}.a.Conn"));
    let b_conn = get(&model, &format!("{pkg}.b.Conn"));
    for conn in [a_conn, b_conn] {
        assert!(conn.has_capability(&Capability::Implements(endpoint.type_ref())));
    }
    assert!(a_conn.operation("getName").is_some());
    assert!(b_conn.operation("getName").is_none());
}

#[test]
fn test_grouping_leafref_specialized_per_instance() {
    let model = generate_for(&groupings()).unwrap();
    let pkg = package("grp");

    let endpoint = get(&model, &format!("{pkg}.Endpoint"));
    assert_eq!(
        returns(endpoint, "getRef").as_ref(),
        &TypeRef::Base(BaseType::Object)
    );
    let a_conn = get(&model, &format!("{pkg}.a.Conn"));
    assert_eq!(
        returns(a_conn, "getRef").as_ref(),
        &TypeRef::Base(BaseType::Uint32)
    );
    let b_conn = get(&model, &format!("{pkg}.b.Conn"));
    assert_eq!(
        returns(b_conn, "getRef").as_ref(),
        &TypeRef::Base(BaseType::String)
    );
}

#[test]
fn test_choice_and_cases() {
    let graph = graph([module("ch").child(
        Container::new("top").child(
            Choice::new("kind")
                .child(Case::new("one").child(leaf("x", BaseType::String)))
                .child(leaf("two", BaseType::Boolean)),
        ),
    )]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("ch");

    let top = get(&model, &format!("{pkg}.Top"));
    let choice = get(&model, &format!("{pkg}.top.Kind"));
    assert_eq!(returns(top, "getKind").target_name(), Some(&choice.name));
    assert!(choice.has_capability(&Capability::ChoiceIn(top.type_ref())));
    assert!(choice.operations.is_empty());

    let one = get(&model, &format!("{pkg}.top.kind.One"));
    assert!(one.has_capability(&Capability::Implements(choice.type_ref())));
    assert!(one.operation("getX").is_some());
    let two = get(&model, &format!("{pkg}.top.kind.Two"));
    assert!(two.has_capability(&Capability::Implements(choice.type_ref())));
    assert_eq!(
        returns(two, "getTwo").as_ref(),
        &TypeRef::Base(BaseType::Boolean)
    );
    assert!(model.find(&format!("{pkg}.top.X")).is_none());
}

#[test]
fn test_rpc_and_action() {
    let graph = graph([module("ops")
        .child(
            Procedure::new("reset")
                .input(leaf("delay", BaseType::Uint32))
                .output(leaf("ok", BaseType::Boolean))
                .rpc(),
        )
        .child(
            List::new("port")
                .keys(["id"])
                .child(leaf("id", BaseType::Uint16))
                .child(Procedure::new("bounce").action()),
        )
        .child(Notification::new("alarm").child(leaf("severity", BaseType::Uint8)))]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("ops");

    let rpc = get(&model, &format!("{pkg}.Reset"));
    let input = get(&model, &format!("{pkg}.ResetInput"));
    let output = get(&model, &format!("{pkg}.ResetOutput"));
    assert!(rpc.has_capability(&Capability::Contract(Contract::Rpc)));
    let invoke = rpc.operation("invoke").unwrap();
    assert_eq!(invoke.return_type.target_name(), Some(&output.name));
    assert_eq!(invoke.parameters.len(), 1);
    assert_eq!(invoke.parameters[0].type_ref.target_name(), Some(&input.name));
    assert!(input.has_capability(&Capability::Contract(Contract::RpcInput)));
    assert!(input.operation("getDelay").is_some());
    assert!(output.has_capability(&Capability::Contract(Contract::RpcOutput)));

    let action = get(&model, &format!("{pkg}.port.Bounce"));
    assert!(action.has_capability(&Capability::Contract(Contract::Action)));
    let empty_input = get(&model, &format!("{pkg}.port.BounceInput"));
    assert!(empty_input.operations.is_empty());

    let alarm = get(&model, &format!("{pkg}.Alarm"));
    assert!(alarm.has_capability(&Capability::Contract(Contract::Notification)));
    assert!(alarm.operation("getSeverity").is_some());
}

#[test]
fn test_augment_naming_counts_per_target() {
    let base = module("base").child(Container::new("top").child(leaf("x", BaseType::String)));
    let aug = module("aug")
        .import("base", "b")
        .child(Augment::within("base", &["top"]).child(leaf("y", BaseType::String)))
        .child(Augment::within("base", &["top"]).child(leaf("z", BaseType::String)));
    let model = generate_for(&graph([base, aug])).unwrap();
    let pkg = package("aug");
    let top = get(&model, &format!("{}.Top", package("base")));

    let first = get(&model, &format!("{pkg}.Top1"));
    let second = get(&model, &format!("{pkg}.Top2"));
    for augment in [first, second] {
        assert!(augment.has_capability(&Capability::AugmentationOf(top.type_ref())));
    }
    assert!(first.operation("getY").is_some());
    assert!(second.operation("getZ").is_some());
}

#[test]
fn test_inline_enumeration_is_nested() {
    let graph = graph([module("en").child(
        Container::new("top")
            .child(Leaf::new("mode", DeclaredType::enumeration(["auto", "manual", "off"])))
            .child(Leaf::new(
                "level",
                DeclaredType::Enumeration(vec![EnumMember::new("low").value(5), EnumMember::new("high")]),
            )),
    )]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("en");

    let top = get(&model, &format!("{pkg}.Top"));
    let mode = top.nested_type("Mode").unwrap();
    assert_eq!(mode.name.to_string(), format!("{pkg}.Top.Mode"));
    assert_eq!(mode.kind, TypeKind::Enumeration);
    let values: Vec<(&str, i32)> = mode.constants.iter().map(|c| (c.name.as_str(), c.value)).collect();
    assert_eq!(values, vec![("Auto", 0), ("Manual", 1), ("Off", 2)]);
    assert_eq!(returns(top, "getMode").target_name(), Some(&mode.name));

    let level = get(&model, &format!("{pkg}.Top.Level"));
    let values: Vec<i32> = level.constants.iter().map(|c| c.value).collect();
    assert_eq!(values, vec![5, 6]);
}

#[test]
fn test_union_attributes() {
    let graph = graph([module("un").child(
        Container::new("top").child(Leaf::new(
            "value",
            DeclaredType::Union(vec![
                DeclaredType::primitive(BaseType::String),
                DeclaredType::primitive(BaseType::Uint32),
                DeclaredType::enumeration(["unbounded"]),
                DeclaredType::primitive(BaseType::String),
            ]),
        )),
    )]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("un");

    let union = get(&model, &format!("{pkg}.Top.Value"));
    assert_eq!(union.kind, TypeKind::ValueObject);
    let attributes: Vec<&str> = union.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(attributes, vec!["string", "uint32", "enumeration", "string$1"]);

    let nested = union.nested_type("Enumeration").unwrap();
    assert_eq!(nested.kind, TypeKind::Enumeration);
    assert_eq!(
        union.attribute("enumeration").and_then(|a| a.type_ref.target_name()),
        Some(&nested.name)
    );
    assert!(model.find(&format!("{pkg}.Top.Value.Enumeration")).is_some());
}

#[test]
fn test_identity_and_feature_types() {
    let graph = graph([module("ids")
        .child(Feature::new("fast-path"))
        .child(Identity::new("crypto"))
        .child(Identity::new("aes").base(QName::new("ids", "crypto")))
        .child(Container::new("cfg").child(Leaf::new(
            "algo",
            DeclaredType::identityref(vec![QName::new("ids", "crypto")]),
        )))]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("ids");

    let feature = get(&model, &format!("{pkg}.FastPath"));
    assert!(feature.has_capability(&Capability::Contract(Contract::Feature)));

    let crypto = get(&model, &format!("{pkg}.Crypto"));
    assert!(crypto.has_capability(&Capability::Contract(Contract::Identity)));
    let aes = get(&model, &format!("{pkg}.Aes"));
    assert!(aes.has_capability(&Capability::Implements(crypto.type_ref())));

    let cfg = get(&model, &format!("{pkg}.Cfg"));
    assert_eq!(returns(cfg, "getAlgo").target_name(), Some(&crypto.name));
}

#[test]
fn test_enumeration_alias_produces_no_type() {
    let graph = graph([module("al")
        .child(Typedef::new("color", DeclaredType::enumeration(["red", "green"])))
        .child(Typedef::new("paint", DeclaredType::derived("al", "color")))
        .child(Container::new("c").child(typed_leaf("p", "al", "paint")))]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("al");

    let color = get(&model, &format!("{pkg}.Color"));
    assert!(model.find(&format!("{pkg}.Paint")).is_none());
    let c = get(&model, &format!("{pkg}.C"));
    assert_eq!(returns(c, "getP").target_name(), Some(&color.name));
}

#[test]
fn test_typedef_cycle() {
    let graph = graph([module("m")
        .child(Typedef::new("a", DeclaredType::derived("m", "b")))
        .child(Typedef::new("b", DeclaredType::derived("m", "a")))]);
    let err = generate_for(&graph).unwrap_err();
    assert_eq!(
        err,
        CodegenError::Cycle {
            kind: CycleKind::Typedef,
            at: "m:/typedef=a".to_string(),
            chain: vec![
                "m:/typedef=a".to_string(),
                "m:/typedef=b".to_string(),
                "m:/typedef=a".to_string(),
            ],
        }
    );
}

#[test]
fn test_union_typedef_cycle() {
    let graph = graph([module("tc")
        .child(Typedef::new(
            "a",
            DeclaredType::Union(vec![
                DeclaredType::derived("tc", "b"),
                DeclaredType::primitive(BaseType::String),
            ]),
        ))
        .child(Typedef::new(
            "b",
            DeclaredType::Union(vec![
                DeclaredType::Union(vec![DeclaredType::derived("tc", "a")]),
                DeclaredType::primitive(BaseType::Uint8),
            ]),
        ))
        .child(Container::new("c").child(typed_leaf("x", "tc", "a")))]);
    let err = generate_for(&graph).unwrap_err();
    assert_eq!(
        err,
        CodegenError::Cycle {
            kind: CycleKind::Typedef,
            at: "tc:/typedef=a".to_string(),
            chain: vec![
                "tc:/typedef=a".to_string(),
                "tc:/typedef=b".to_string(),
                "tc:/typedef=a".to_string(),
            ],
        }
    );
}

#[test]
fn test_union_of_union_typedef() {
    let graph = graph([module("uu")
        .child(Typedef::new(
            "inner",
            DeclaredType::Union(vec![
                DeclaredType::primitive(BaseType::Uint8),
                DeclaredType::primitive(BaseType::String),
            ]),
        ))
        .child(Typedef::new(
            "outer",
            DeclaredType::Union(vec![
                DeclaredType::derived("uu", "inner"),
                DeclaredType::primitive(BaseType::Boolean),
            ]),
        ))
        .child(Container::new("c").child(typed_leaf("x", "uu", "outer")))]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("uu");
    let inner = get(&model, &format!("{pkg}.Inner"));
    let outer = get(&model, &format!("{pkg}.Outer"));
    assert!(outer
        .attributes
        .iter()
        .any(|a| a.type_ref.target_name() == Some(&inner.name)));
}

#[test]
fn test_unresolvable_leafref() {
    let graph = graph([module("m").child(
        Container::new("top")
            .child(leaf("present", BaseType::String))
            .child(leafref("x", "../missing")),
    )]);
    let err = generate_for(&graph).unwrap_err();
    assert_eq!(
        err,
        CodegenError::Unresolvable {
            location: "m:/container=top/leaf=x".to_string(),
            path: "../missing".to_string(),
            missing: "missing".to_string(),
        }
    );
}

#[test]
fn test_leafref_to_container_is_unsupported() {
    let graph = graph([module("m").child(
        Container::new("top")
            .child(Container::new("inner"))
            .child(leafref("x", "../inner")),
    )]);
    let err = generate_for(&graph).unwrap_err();
    assert!(matches!(
        err,
        CodegenError::Unsupported { ref location, .. } if location == "m:/container=top/leaf=x"
    ));
}

#[test]
fn test_yang_data_name_is_escaped() {
    let graph = graph([module("yd")
        .child(YangData::new("my-template").child(Container::new("body").child(leaf("x", BaseType::String))))]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("yd");

    let data = get(&model, &format!("{pkg}.$my$2D$template"));
    assert!(data.has_capability(&Capability::Contract(Contract::YangData)));
    assert!(data.operation("getBody").is_some());
}

#[test]
fn test_collection_accessors() {
    let graph = graph([module("col").child(
        Container::new("top")
            .child(
                List::new("ordered")
                    .keys(["k"])
                    .ordered_by_user()
                    .child(leaf("k", BaseType::String)),
            )
            .child(List::new("unkeyed").child(leaf("v", BaseType::String)))
            .child(LeafList::new("tags", DeclaredType::primitive(BaseType::String)))
            .child(LeafList::new("steps", DeclaredType::primitive(BaseType::Uint8)).ordered_by_user())
            .child(Statement::AnyData(AnyNode::new("blob"))),
    )]);
    let model = generate_for(&graph).unwrap();
    let top = get(&model, &format!("{}.Top", package("col")));

    assert!(matches!(returns(top, "getOrdered").as_ref(), TypeRef::Sequence(_)));
    assert!(matches!(returns(top, "getUnkeyed").as_ref(), TypeRef::Sequence(_)));
    assert_eq!(
        returns(top, "getTags").as_ref(),
        &TypeRef::UniqueSet(Arc::new(TypeRef::Base(BaseType::String)))
    );
    assert_eq!(
        returns(top, "getSteps").as_ref(),
        &TypeRef::Sequence(Arc::new(TypeRef::Base(BaseType::Uint8)))
    );
    assert!(top.operation("requireSteps").is_some());
    assert_eq!(
        returns(top, "getBlob").as_ref(),
        &TypeRef::Base(BaseType::Opaque)
    );
    assert!(model.find(&format!("{}.top.UnkeyedKey", package("col"))).is_none());
}

#[test]
fn test_colliding_accessor_names_get_tiebreak() {
    let graph = graph([module("acc")
        .child(Typedef::new("mode", DeclaredType::bits(["on-off", "on_off"])))
        .child(
            Container::new("c")
                .child(leaf("foo-bar", BaseType::String))
                .child(leaf("foo_bar", BaseType::Uint32)),
        )
        .child(
            Container::new("t").child(
                List::new("entry")
                    .keys(["foo_bar", "foo-bar"])
                    .child(leaf("foo-bar", BaseType::String))
                    .child(leaf("foo_bar", BaseType::Uint32)),
            ),
        )]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("acc");

    let c = get(&model, &format!("{pkg}.C"));
    let operations: Vec<&str> = c.operations.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(
        operations,
        vec!["getFooBar", "requireFooBar", "getFooBar2", "requireFooBar2"]
    );
    assert_eq!(returns(c, "getFooBar").as_ref(), &TypeRef::Base(BaseType::String));
    assert_eq!(returns(c, "getFooBar2").as_ref(), &TypeRef::Base(BaseType::Uint32));

    let entry = get(&model, &format!("{pkg}.t.Entry"));
    assert_eq!(returns(entry, "getFooBar2").as_ref(), &TypeRef::Base(BaseType::Uint32));
    let key = get(&model, &format!("{pkg}.t.EntryKey"));
    let attributes: Vec<&str> = key.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(attributes, vec!["fooBar2", "fooBar"]);
    assert_eq!(
        key.attribute("fooBar2").map(|a| a.type_ref.as_ref()),
        Some(&TypeRef::Base(BaseType::Uint32))
    );

    let mode = get(&model, &format!("{pkg}.Mode"));
    assert_eq!(mode.identity, vec!["onOff", "onOff$1"]);
}

#[test]
fn test_separator_only_names_are_escaped() {
    let graph = graph([module("us").child(Container::new("_").child(leaf("_-", BaseType::String)))]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("us");

    let root = get(&model, &format!("{pkg}.UsData"));
    let container = get(&model, &format!("{pkg}.$_"));
    assert_eq!(returns(root, "get$_").target_name(), Some(&container.name));
    assert_eq!(container.origin, "us:/container=_");
    assert_eq!(
        returns(container, "get$_$2D$").as_ref(),
        &TypeRef::Base(BaseType::String)
    );
}

#[test]
fn test_malformed_revision_is_rejected() {
    let graph = graph([module("rv").revision("2é4-05-01").child(Container::new("c"))]);
    let err = generate_for(&graph).unwrap_err();
    assert!(matches!(err, CodegenError::Schema(SchemaError::Validation { .. })));
}

#[test]
fn test_uses_augment() {
    let graph = graph([module("ua")
        .child(
            Grouping::new("endpoint")
                .child(Container::new("inner").child(leaf("flag", BaseType::Boolean))),
        )
        .child(
            Container::new("a").child(leaf("id", BaseType::Uint32)).child(
                Uses::new(QName::new("ua", "endpoint"))
                    .augment(Augment::within("ua", &["inner"]).child(leafref("peer", "../../id"))),
            ),
        )
        .child(Container::new("b").child(Uses::new(QName::new("ua", "endpoint"))))]);
    let model = generate_for(&graph).unwrap();
    let pkg = package("ua");

    let endpoint = get(&model, &format!("{pkg}.Endpoint"));
    let inner = get(&model, &format!("{pkg}.endpoint.Inner"));
    let a = get(&model, &format!("{pkg}.A"));
    assert!(a.has_capability(&Capability::Implements(endpoint.type_ref())));

    let augment = get(&model, &format!("{pkg}.a.Inner1"));
    assert_eq!(augment.module, "ua");
    assert!(augment.has_capability(&Capability::AugmentationOf(inner.type_ref())));
    assert_eq!(
        returns(augment, "getPeer").as_ref(),
        &TypeRef::Base(BaseType::Uint32)
    );
    assert!(inner.operation("getPeer").is_none());
    assert!(model.find(&format!("{pkg}.b.Inner1")).is_none());
}

#[test]
fn test_uses_augment_missing_target() {
    let graph = graph([module("ub")
        .child(Grouping::new("g").child(leaf("x", BaseType::String)))
        .child(Container::new("a").child(
            Uses::new(QName::new("ub", "g"))
                .augment(Augment::within("ub", &["nowhere"]).child(leaf("y", BaseType::String))),
        ))]);
    let err = generate_for(&graph).unwrap_err();
    assert!(matches!(err, CodegenError::Unresolvable { ref missing, .. } if missing == "ub:nowhere"));
}
