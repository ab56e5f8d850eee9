//! Schema fixtures shared by the engine tests.

use yangbind_core::naming::DEFAULT_PACKAGE_PREFIX;
use yangbind_core::{BaseType, Restrictions};
use yangbind_schema::{
    Augment, Case, Choice, Container, DeclaredType, EnumMember, Grouping, Identity, Leaf,
    LeafList, List, Module, Procedure, QName, Refine, SchemaGraph, Typedef, Uses,
};

/// Package of a fixture module created by [`module`].
pub(crate) fn package(module: &str) -> String {
    format!("{DEFAULT_PACKAGE_PREFIX}.urn.test.{module}.norev")
}

/// Module whose prefix equals its name.
pub(crate) fn module(name: &str) -> Module {
    Module::new(name, name, format!("urn:test:{name}"))
}

pub(crate) fn graph(modules: impl IntoIterator<Item = Module>) -> SchemaGraph {
    SchemaGraph::from_modules(modules).unwrap()
}

pub(crate) fn leaf(name: &str, base: BaseType) -> Leaf {
    Leaf::new(name, DeclaredType::primitive(base))
}

pub(crate) fn typed_leaf(name: &str, module: &str, typedef: &str) -> Leaf {
    Leaf::new(name, DeclaredType::derived(module, typedef))
}

pub(crate) fn leafref(name: &str, path: &str) -> Leaf {
    Leaf::new(name, DeclaredType::leafref(path).unwrap())
}

/// `t3 -> t2 -> t1 -> uint8`, used twice from one container.
pub(crate) fn typedef_chain() -> SchemaGraph {
    graph([module("types")
        .child(Typedef::new(
            "t1",
            DeclaredType::restricted(BaseType::Uint8, Restrictions::new().range(1, 10)),
        ))
        .child(Typedef::new("t2", DeclaredType::derived("types", "t1")))
        .child(Typedef::new("t3", DeclaredType::derived("types", "t2")))
        .child(
            Container::new("c")
                .child(typed_leaf("a", "types", "t3"))
                .child(typed_leaf("b", "types", "t3")),
        )])
}

/// `port-c -> port-b -> port-a`, plus an absolute reference from a sibling.
pub(crate) fn leafref_chain() -> SchemaGraph {
    graph([module("refs")
        .child(Typedef::new("port", DeclaredType::primitive(BaseType::Uint16)))
        .child(
            Container::new("top")
                .child(typed_leaf("port-a", "refs", "port"))
                .child(leafref("port-b", "../port-a"))
                .child(leafref("port-c", "../port-b")),
        )
        .child(Container::new("other").child(leafref("remote", "/refs:top/refs:port-c")))])
}

/// `a -> b -> a`.
pub(crate) fn leafref_cycle() -> SchemaGraph {
    graph([module("cyc").child(
        Container::new("top")
            .child(leafref("a", "../b"))
            .child(leafref("b", "../a")),
    )])
}

/// List keyed by `name index`, with the key leaves declared in the other
/// order.
pub(crate) fn two_key_list() -> SchemaGraph {
    graph([module("net").child(
        Container::new("top").child(
            List::new("entry")
                .keys(["name", "index"])
                .child(leaf("index", BaseType::Uint32))
                .child(leaf("name", BaseType::String))
                .child(leaf("value", BaseType::String)),
        ),
    )])
}

/// Sibling containers whose class names are both `Foo`.
pub(crate) fn colliding_containers() -> SchemaGraph {
    graph([module("clash")
        .child(Container::new("foo").child(leaf("x", BaseType::String)))
        .child(Container::new("Foo").child(leaf("y", BaseType::String)))])
}

/// Grouping used twice, with a leafref resolved per instance.
pub(crate) fn groupings() -> SchemaGraph {
    graph([module("grp")
        .child(
            Grouping::new("endpoint")
                .child(leaf("name", BaseType::String))
                .child(leafref("ref", "../../id"))
                .child(Container::new("inner").child(leaf("flag", BaseType::Boolean))),
        )
        .child(
            Container::new("a")
                .child(leaf("id", BaseType::Uint32))
                .child(
                    Container::new("conn").child(
                        Uses::new(QName::new("grp", "endpoint")).refine(Refine::new("name")),
                    ),
                ),
        )
        .child(
            Container::new("b")
                .child(leaf("id", BaseType::String))
                .child(Container::new("conn").child(Uses::new(QName::new("grp", "endpoint")))),
        )])
}

/// Two modules: a base data model and an extension importing it.
pub(crate) fn interfaces() -> SchemaGraph {
    let base = module("ifs")
        .revision("2018-02-20")
        .child(Identity::new("interface-type"))
        .child(Identity::new("ethernet").base(QName::new("ifs", "interface-type")))
        .child(Typedef::new(
            "interface-ref",
            DeclaredType::leafref("/ifs:interfaces/ifs:interface/ifs:name").unwrap(),
        ))
        .child(Typedef::new(
            "oper-status",
            DeclaredType::Enumeration(vec![
                EnumMember::new("up").value(1),
                EnumMember::new("down"),
                EnumMember::new("testing"),
            ]),
        ))
        .child(
            Grouping::new("counters")
                .child(leaf("in-octets", BaseType::Uint64))
                .child(leaf("out-octets", BaseType::Uint64)),
        )
        .child(
            Container::new("interfaces").child(
                List::new("interface")
                    .keys(["name"])
                    .child(leaf("name", BaseType::String))
                    .child(Leaf::new(
                        "type",
                        DeclaredType::identityref(vec![QName::new("ifs", "interface-type")]),
                    ))
                    .child(typed_leaf("oper-status", "ifs", "oper-status"))
                    .child(LeafList::new("higher-layer-if", DeclaredType::derived("ifs", "interface-ref")))
                    .child(Container::new("statistics").child(Uses::new(QName::new("ifs", "counters"))))
                    .child(
                        Choice::new("encapsulation")
                            .child(Case::new("dot1q").child(leaf("vlan-id", BaseType::Uint16)))
                            .child(leaf("raw", BaseType::Empty)),
                    ),
            ),
        )
        .child(
            Procedure::new("reset")
                .input(typed_leaf("interface", "ifs", "interface-ref"))
                .rpc(),
        );

    let ext = module("ext")
        .import("ifs", "if")
        .child(
            Augment::within("ifs", &["interfaces", "interface"])
                .child(leaf("mtu", BaseType::Uint16))
                .child(leafref("peer", "/if:interfaces/if:interface/if:name")),
        )
        .child(
            Augment::within("ifs", &["interfaces", "interface", "statistics"])
                .child(leaf("errors", BaseType::Uint32)),
        );

    graph([ext, base])
}
