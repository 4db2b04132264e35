//! Component type registry.
//!
//! The [`ComponentRegistry`] maps component type names to factories. Graph
//! descriptions refer to components by name; the network resolves those names
//! here when a node is added.
//!
//! # Naming
//!
//! Type names are qualified as `namespace/Name` (e.g. `core/Forward`). A name
//! without a `/` is looked up as given first and then inside the registry's
//! default namespace, so `Forward` resolves to `core/Forward`.
//!
//! # Usage
//!
//! ```
//! use flowline_component::ComponentRegistry;
//!
//! let registry = ComponentRegistry::with_core_components();
//! let forward = registry.resolve("Forward").expect("core/Forward is registered");
//! assert!(forward.in_ports().has("in"));
//! ```

use std::sync::Arc;

use indexmap::IndexMap;

use crate::component::{Component, ComponentError};
use crate::components::{Forward, Output};

/// Default namespace for unqualified type names.
pub const DEFAULT_NAMESPACE: &str = "core";

/// Factory producing fresh component instances.
pub type ComponentFactory =
    Arc<dyn Fn() -> Result<Arc<dyn Component>, ComponentError> + Send + Sync>;

/// Errors raised while registering or resolving component types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A factory is already registered under this name.
    #[error("component type '{0}' is already registered")]
    AlreadyRegistered(String),

    /// No factory is registered under this name.
    #[error("component type {0} not found")]
    NotFound(String),

    /// The factory failed or produced an unusable instance.
    #[error("component {name} doesn't appear to be a valid component: {reason}")]
    Invalid {
        /// The requested type name.
        name: String,
        /// Why the instance was rejected.
        reason: ComponentError,
    },
}

/// Registry of available component types.
#[derive(Clone)]
pub struct ComponentRegistry {
    factories: IndexMap<String, ComponentFactory>,
    default_namespace: String,
}

impl core::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("default_namespace", &self.default_namespace)
            .field("components", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self {
            factories: IndexMap::new(),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in `core/*` components.
    #[must_use]
    pub fn with_core_components() -> Self {
        let mut registry = Self::new();
        registry.factories.insert(
            "core/Forward".to_string(),
            Arc::new(|| Ok(Arc::new(Forward::new()) as Arc<dyn Component>)),
        );
        registry.factories.insert(
            "core/Output".to_string(),
            Arc::new(|| Ok(Arc::new(Output::new()) as Arc<dyn Component>)),
        );
        registry
    }

    /// Sets the namespace unqualified names fall back to.
    #[must_use]
    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    /// Returns the namespace unqualified names fall back to.
    #[must_use]
    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// Registers an infallible factory.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if the name is taken.
    pub fn register<C, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> Result<&mut Self, RegistryError>
    where
        C: Component,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.register_fallible(name, move || Ok(Arc::new(factory()) as Arc<dyn Component>))
    }

    /// Registers a factory that may fail.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if the name is taken.
    pub fn register_fallible<F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: Fn() -> Result<Arc<dyn Component>, ComponentError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        self.factories.insert(name, Arc::new(factory));
        Ok(self)
    }

    /// Returns the registered key a type name resolves to, if any.
    #[must_use]
    pub fn qualify(&self, name: &str) -> Option<String> {
        if self.factories.contains_key(name) {
            return Some(name.to_string());
        }
        if name.contains('/') {
            return None;
        }
        let qualified = format!("{}/{}", self.default_namespace, name);
        self.factories.contains_key(&qualified).then_some(qualified)
    }

    /// Builds a new instance of the named component type.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if neither the name nor its default
    ///   namespace qualification is registered.
    /// - [`RegistryError::Invalid`] if the factory fails or the instance
    ///   declares no ports.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Component>, RegistryError> {
        let key = self
            .qualify(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let factory = &self.factories[&key];

        let component = factory().map_err(|reason| RegistryError::Invalid {
            name: name.to_string(),
            reason,
        })?;

        if component.in_ports().is_empty() && component.out_ports().is_empty() {
            return Err(RegistryError::Invalid {
                name: name.to_string(),
                reason: ComponentError::NoPorts,
            });
        }

        tracing::trace!(requested = name, resolved = %key, "component resolved");
        Ok(component)
    }

    /// Checks if a type name resolves.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.qualify(name).is_some()
    }

    /// Lists registered type names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}
