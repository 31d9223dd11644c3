//! Name-to-resource lookup for one document.

use std::collections::HashMap;

use taskyard_common::error::{Result, TaskyardError};
use taskyard_common::path::ConfigPath;

use crate::resource::{Resource, ResourceKind};

/// Every resource of a document, keyed by name.
///
/// The loader fills the registry completely before any resource is
/// validated; validation only reads from it. Iteration follows document
/// order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    order: Vec<String>,
    resources: HashMap<String, Resource>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `resource` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskyardError::Document`] if `name` is already taken.
    pub fn insert(&mut self, name: impl Into<String>, resource: Resource) -> Result<()> {
        let name = name.into();
        if let Some(existing) = self.resources.get(&name) {
            return Err(TaskyardError::document(
                ConfigPath::new(format!("{}={name}", resource.kind())),
                format!(
                    "duplicate resource name \"{name}\", already defined as {}={name}",
                    existing.kind()
                ),
            ));
        }
        self.order.push(name.clone());
        let _ = self.resources.insert(name, resource);
        Ok(())
    }

    /// Returns the resource named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    /// Returns the kind of the resource named `name`.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<ResourceKind> {
        self.get(name).map(Resource::kind)
    }

    /// Returns `true` if a resource named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// Iterates over `(name, resource)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.order
            .iter()
            .filter_map(|name| self.resources.get(name).map(|r| (name.as_str(), r)))
    }

    /// Returns the number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the registry holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consumes the registry, yielding `(name, resource)` pairs in document
    /// order.
    pub fn into_entries(mut self) -> impl Iterator<Item = (String, Resource)> {
        let order = std::mem::take(&mut self.order);
        order.into_iter().filter_map(move |name| {
            let resource = self.resources.remove(&name)?;
            Some((name, resource))
        })
    }
}
