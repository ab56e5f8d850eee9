//! Referential validation of a schema graph.
//!
//! The graph comes from an external parser which has already checked the
//! grammar. What is checked here are the properties the engine relies on:
//! imports resolve, prefixes are unambiguous, statements appear where YANG
//! allows them, and siblings are uniquely named.

use crate::error::SchemaError;
use crate::module::{Module, SchemaGraph};
use crate::nodes::Statement;
use indexmap::IndexSet;

/// Validates a schema graph.
///
/// # Errors
/// Returns the first `SchemaError` found.
pub fn validate_graph(graph: &SchemaGraph) -> Result<(), SchemaError> {
    let mut namespaces = IndexSet::with_capacity(graph.len());
    for module in graph.modules() {
        validate_header(graph, module)?;
        if !namespaces.insert(module.namespace.as_str()) {
            return Err(SchemaError::validation(format!(
                "namespace '{}' is used by more than one module",
                module.namespace
            )));
        }
        validate_body(module, &module.body, Placement::Module)?;
    }
    graph.dependency_order()?;
    tracing::debug!("schema graph with {} modules validated", graph.len());
    Ok(())
}

/// Validates module header fields and imports.
fn validate_header(graph: &SchemaGraph, module: &Module) -> Result<(), SchemaError> {
    if module.name.is_empty() || module.prefix.is_empty() {
        return Err(SchemaError::validation(
            "module name and prefix must not be empty",
        ));
    }
    if let Some(revision) = module.revision.as_deref().filter(|r| !is_revision_date(r)) {
        return Err(SchemaError::validation(format!(
            "revision '{revision}' of module '{}' is not a YYYY-MM-DD date",
            module.name
        )));
    }

    let mut prefixes = IndexSet::with_capacity(module.imports.len() + 1);
    prefixes.insert(module.prefix.as_str());
    for import in &module.imports {
        if graph.module(&import.module).is_none() {
            return Err(SchemaError::UnknownImport {
                module: module.name.clone(),
                import: import.module.clone(),
            });
        }
        if !prefixes.insert(import.prefix.as_str()) {
            return Err(SchemaError::DuplicatePrefix {
                module: module.name.clone(),
                prefix: import.prefix.clone(),
            });
        }
    }
    Ok(())
}

fn is_revision_date(revision: &str) -> bool {
    let bytes = revision.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Module,
    Grouping,
    Data,
    Choice,
    Augment,
    Operation,
}

/// Checks statement placement and sibling uniqueness within one body.
fn validate_body(
    module: &Module,
    body: &[Statement],
    placement: Placement,
) -> Result<(), SchemaError> {
    let mut data_names = IndexSet::new();
    let mut typedef_names = IndexSet::new();
    let mut grouping_names = IndexSet::new();

    for stmt in body {
        check_placement(module, stmt, placement)?;

        let fresh = match stmt {
            Statement::Typedef(t) => typedef_names.insert(t.name.as_str()),
            Statement::Grouping(g) => grouping_names.insert(g.name.as_str()),
            Statement::Container(_)
            | Statement::List(_)
            | Statement::Leaf(_)
            | Statement::LeafList(_)
            | Statement::Choice(_)
            | Statement::Case(_)
            | Statement::AnyXml(_)
            | Statement::AnyData(_)
            | Statement::Notification(_)
            | Statement::Action(_)
            | Statement::Rpc(_) => data_names.insert(stmt.argument()),
            _ => true,
        };
        if !fresh {
            return Err(SchemaError::validation(format!(
                "duplicate {} '{}' in module '{}'",
                stmt.keyword(),
                stmt.argument(),
                module.name
            )));
        }

        match stmt {
            Statement::Grouping(g) => validate_body(module, &g.body, Placement::Grouping)?,
            Statement::Container(c) => validate_body(module, &c.body, Placement::Data)?,
            Statement::List(l) => {
                if l.keys.iter().any(String::is_empty) {
                    return Err(SchemaError::validation(format!(
                        "list '{}' has an empty key name",
                        l.name
                    )));
                }
                validate_body(module, &l.body, Placement::Data)?;
            }
            Statement::Choice(c) => validate_body(module, &c.body, Placement::Choice)?,
            Statement::Case(c) => validate_body(module, &c.body, Placement::Data)?,
            Statement::Notification(n) => validate_body(module, &n.body, Placement::Data)?,
            Statement::YangData(y) => validate_body(module, &y.body, Placement::Data)?,
            Statement::Augment(a) => {
                if a.target.is_empty() {
                    return Err(SchemaError::validation("augment without target"));
                }
                validate_body(module, &a.body, Placement::Augment)?;
            }
            Statement::Rpc(p) | Statement::Action(p) => {
                validate_body(module, &p.body, Placement::Operation)?;
                for io in [&p.input, &p.output].into_iter().flatten() {
                    validate_body(module, io, Placement::Data)?;
                }
            }
            Statement::Uses(u) => {
                if u.refines.iter().any(|r| r.segments().next().is_none()) {
                    return Err(SchemaError::validation(format!(
                        "refine without target in uses of '{}'",
                        u.grouping
                    )));
                }
                for augment in &u.augments {
                    if augment.target.is_empty() {
                        return Err(SchemaError::validation(format!(
                            "augment without target in uses of '{}'",
                            u.grouping
                        )));
                    }
                    validate_body(module, &augment.body, Placement::Augment)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_placement(
    module: &Module,
    stmt: &Statement,
    placement: Placement,
) -> Result<(), SchemaError> {
    let allowed = match stmt {
        Statement::Identity(_)
        | Statement::Feature(_)
        | Statement::Rpc(_)
        | Statement::Augment(_)
        | Statement::YangData(_) => placement == Placement::Module,
        Statement::Case(_) => matches!(placement, Placement::Choice | Placement::Augment),
        Statement::Action(_) => {
            matches!(placement, Placement::Grouping | Placement::Data | Placement::Augment)
        }
        Statement::Typedef(_) | Statement::Grouping(_) => placement != Placement::Choice,
        Statement::Uses(_) | Statement::Notification(_) => {
            !matches!(placement, Placement::Choice | Placement::Operation)
        }
        _ => placement != Placement::Operation,
    };
    if allowed {
        Ok(())
    } else {
        Err(SchemaError::validation(format!(
            "{} '{}' is not allowed here in module '{}'",
            stmt.keyword(),
            stmt.argument(),
            module.name
        )))
    }
}
