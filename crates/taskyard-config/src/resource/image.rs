//! The `image` resource: a container image built from a Dockerfile or pulled
//! from a registry.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use taskyard_common::error::Result;
use taskyard_common::path::ConfigPath;

use super::{ResourceConfig, ResourceKind};
use crate::env::Environment;
use crate::registry::Registry;

/// Configuration of an `image` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ImageConfig {
    /// Repository name of the image, without a tag.
    pub image: String,
    /// Dockerfile path, relative to `context`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dockerfile: String,
    /// Build context directory.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    /// Build arguments. Values support variables.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, String>,
    /// Tags applied to the image. Entries support variables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Pull policy, such as `always` or `once`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pull: String,
    /// Extra resources to create before this image.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,
}

impl ImageConfig {
    /// Returns `true` if the image is built locally rather than pulled.
    #[must_use]
    pub fn is_buildable(&self) -> bool {
        !self.dockerfile.is_empty() || !self.context.is_empty()
    }
}

impl ResourceConfig for ImageConfig {
    const KIND: ResourceKind = ResourceKind::Image;
    const REQUIRED_FIELDS: &'static [&'static str] = &["image"];

    fn dependencies(&self) -> Vec<String> {
        self.depends.clone()
    }

    fn validate(&self, _path: &ConfigPath, _registry: &Registry) -> Result<()> {
        Ok(())
    }

    fn resolve<E: Environment + ?Sized>(mut self, env: &E) -> Result<Self> {
        self.tags = env.resolve_slice(&self.tags)?;
        for value in self.args.values_mut() {
            *value = env.resolve(value)?;
        }
        Ok(self)
    }
}

impl fmt::Display for ImageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_buildable() {
            return write!(f, "Pull image '{}'", self.image);
        }
        let context: &str = if self.context.is_empty() { "." } else { &self.context };
        let dockerfile: &str = if self.dockerfile.is_empty() {
            "Dockerfile"
        } else {
            &self.dockerfile
        };
        write!(f, "Build image '{}' from '{context}/{dockerfile}'", self.image)
    }
}
