//! Builds a small two-module schema and dumps its type model as JSON.
//!
//! Run with: `RUST_LOG=debug cargo run --example dump_model`

use yangbind::prelude::*;

fn schema() -> anyhow::Result<SchemaGraph> {
    let network = Module::new("network", "nw", "urn:example:network")
        .revision("2024-05-01")
        .child(Typedef::new(
            "port-number",
            DeclaredType::primitive(BaseType::Uint16),
        ))
        .child(
            Container::new("devices").child(
                List::new("device")
                    .keys(["name"])
                    .child(Leaf::new("name", DeclaredType::primitive(BaseType::String)))
                    .child(Leaf::new(
                        "port",
                        DeclaredType::derived("network", "port-number"),
                    ))
                    .child(Leaf::new(
                        "mode",
                        DeclaredType::enumeration(["active", "standby"]),
                    )),
            ),
        );

    let monitoring = Module::new("monitoring", "mon", "urn:example:monitoring")
        .import("network", "nw")
        .child(
            Augment::within("network", &["devices", "device"]).child(Leaf::new(
                "watched-port",
                DeclaredType::leafref("../nw:port")?,
            )),
        );

    Ok(SchemaGraph::from_modules([network, monitoring])?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let graph = schema()?;
    let model = Generator::builder().build().generate(&graph)?;

    for ty in model.all() {
        println!("{:?} {}", ty.kind, ty.name);
    }
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}
