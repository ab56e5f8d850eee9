//! Generator configuration and entry point.

use crate::context::GenerationContext;
use crate::error::CodegenError;
use yangbind_core::TypeModel;
use yangbind_core::naming::DEFAULT_PACKAGE_PREFIX;
use yangbind_schema::SchemaGraph;

/// Options of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Prefix of every module package.
    pub package_prefix: String,
    /// Modules whose own types are emitted; all modules when `None`.
    pub modules: Option<Vec<String>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package_prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
            modules: None,
        }
    }
}

/// Builder for configuring and creating a generator.
#[derive(Debug, Clone, Default)]
pub struct GeneratorBuilder {
    config: GeneratorConfig,
}

impl GeneratorBuilder {
    /// Creates a new generator builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the package prefix.
    #[must_use]
    pub fn package_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.package_prefix = prefix.into();
        self
    }

    /// Restricts output to the given modules.
    #[must_use]
    pub fn modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.modules = Some(modules.into_iter().map(Into::into).collect());
        self
    }

    /// Adds one module to the output subset.
    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.config
            .modules
            .get_or_insert_with(Vec::new)
            .push(module.into());
        self
    }

    /// Builds the generator.
    #[must_use]
    pub fn build(self) -> Generator {
        Generator {
            config: self.config,
        }
    }
}

/// Type model generator.
///
/// A generator holds configuration only. Every call to
/// [`generate`](Self::generate) runs in a fresh context, so repeated runs over
/// the same graph produce equal models.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a generator with the given configuration.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Compiles `graph` into a type model.
    ///
    /// # Errors
    /// Returns `CodegenError` on invalid input, unresolvable references,
    /// cycles or unsupported constructs.
    pub fn generate(&self, graph: &SchemaGraph) -> Result<TypeModel, CodegenError> {
        tracing::debug!(
            "generating type model for {} modules with prefix '{}'",
            graph.len(),
            self.config.package_prefix
        );
        GenerationContext::run(graph, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let generator = Generator::builder().build();
        assert_eq!(generator.config().package_prefix, DEFAULT_PACKAGE_PREFIX);
        assert!(generator.config().modules.is_none());
    }

    #[test]
    fn test_builder_options() {
        let generator = Generator::builder()
            .package_prefix("com.example")
            .module("a")
            .module("b")
            .build();
        assert_eq!(generator.config().package_prefix, "com.example");
        assert_eq!(
            generator.config().modules.as_deref(),
            Some(&["a".to_string(), "b".to_string()][..])
        );

        let replaced = Generator::builder().module("a").modules(["c"]).build();
        assert_eq!(
            replaced.config().modules.as_deref(),
            Some(&["c".to_string()][..])
        );
    }
}
