//! Modules and the multi-module schema graph.

use crate::error::SchemaError;
use crate::nodes::Statement;
use indexmap::{IndexMap, IndexSet};

/// `import` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Imported module name.
    pub module: String,
    /// Prefix bound to it inside the importing module.
    pub prefix: String,
}

/// YANG module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Own prefix.
    pub prefix: String,
    /// Namespace URI.
    pub namespace: String,
    /// Latest revision date, `YYYY-MM-DD`.
    pub revision: Option<String>,
    /// Imports in declaration order.
    pub imports: Vec<Import>,
    /// Body statements in declaration order.
    pub body: Vec<Statement>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            namespace: namespace.into(),
            revision: None,
            imports: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Sets the revision.
    #[must_use]
    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    /// Adds an import.
    #[must_use]
    pub fn import(mut self, module: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.imports.push(Import {
            module: module.into(),
            prefix: prefix.into(),
        });
        self
    }

    /// Appends a body statement.
    #[must_use]
    pub fn child(mut self, stmt: impl Into<Statement>) -> Self {
        self.body.push(stmt.into());
        self
    }

    /// Resolves a textual prefix to a module name.
    #[must_use]
    pub fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        if prefix == self.prefix {
            return Some(&self.name);
        }
        self.imports
            .iter()
            .find(|i| i.prefix == prefix)
            .map(|i| i.module.as_str())
    }
}

/// Read-only collection of linked modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaGraph {
    modules: IndexMap<String, Module>,
}

impl SchemaGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph from modules.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateModule` if two modules share a name.
    pub fn from_modules(modules: impl IntoIterator<Item = Module>) -> Result<Self, SchemaError> {
        let mut graph = Self::new();
        for module in modules {
            graph.add_module(module)?;
        }
        Ok(graph)
    }

    /// Adds a module.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateModule` if the name is already taken.
    pub fn add_module(&mut self, module: Module) -> Result<(), SchemaError> {
        if self.modules.contains_key(&module.name) {
            return Err(SchemaError::DuplicateModule { name: module.name });
        }
        self.modules.insert(module.name.clone(), module);
        Ok(())
    }

    /// Looks up a module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Returns the modules in insertion order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Returns the number of modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if the graph has no module.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Returns the modules in import-dependency order, ties broken by name.
    ///
    /// # Errors
    /// Returns `SchemaError` on unknown or circular imports.
    pub fn dependency_order(&self) -> Result<Vec<&Module>, SchemaError> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();

        let mut done: IndexSet<&str> = IndexSet::with_capacity(names.len());
        let mut order = Vec::with_capacity(names.len());
        for name in names {
            let mut stack = Vec::new();
            self.visit(name, &mut stack, &mut done, &mut order)?;
        }
        Ok(order)
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        stack: &mut Vec<&'a str>,
        done: &mut IndexSet<&'a str>,
        order: &mut Vec<&'a Module>,
    ) -> Result<(), SchemaError> {
        if done.contains(name) {
            return Ok(());
        }
        if let Some(pos) = stack.iter().position(|n| *n == name) {
            let mut path: Vec<&str> = stack[pos..].to_vec();
            path.push(name);
            return Err(SchemaError::CircularImport {
                path: path.join(" -> "),
            });
        }
        let module = self
            .modules
            .get(name)
            .ok_or_else(|| SchemaError::UnknownImport {
                module: stack.last().copied().unwrap_or_default().to_string(),
                import: name.to_string(),
            })?;

        stack.push(name);
        let mut imports: Vec<&str> = module.imports.iter().map(|i| i.module.as_str()).collect();
        imports.sort_unstable();
        for import in imports {
            self.visit(import, stack, done, order)?;
        }
        stack.pop();

        done.insert(name);
        order.push(module);
        Ok(())
    }
}
