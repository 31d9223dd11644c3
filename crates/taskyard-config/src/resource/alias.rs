//! The `alias` resource: one name for a list of other resources.

use std::fmt;

use serde::{Deserialize, Serialize};
use taskyard_common::error::{Result, TaskyardError};
use taskyard_common::path::ConfigPath;

use super::{ResourceConfig, ResourceKind};
use crate::env::Environment;
use crate::registry::Registry;

/// Configuration of an `alias` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AliasConfig {
    /// Resources run when the alias is run, in order.
    pub tasks: Vec<String>,
}

impl ResourceConfig for AliasConfig {
    const KIND: ResourceKind = ResourceKind::Alias;
    const REQUIRED_FIELDS: &'static [&'static str] = &["tasks"];

    fn dependencies(&self) -> Vec<String> {
        self.tasks.clone()
    }

    fn validate(&self, path: &ConfigPath, registry: &Registry) -> Result<()> {
        match self.tasks.iter().find(|task| !registry.contains(task)) {
            Some(task) => Err(TaskyardError::reference(
                path.add("tasks"),
                format!("{task} is not a resource"),
            )),
            None => Ok(()),
        }
    }

    fn resolve<E: Environment + ?Sized>(self, _env: &E) -> Result<Self> {
        Ok(self)
    }
}

impl fmt::Display for AliasConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Run tasks: {}", self.tasks.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{MountConfig, Resource};

    #[test]
    fn validate_requires_every_task_to_exist() {
        let mut registry = Registry::new();
        registry
            .insert("dist", Resource::Mount(MountConfig::default()))
            .expect("insert");

        let alias = AliasConfig {
            tasks: vec!["dist".into(), "ghost".into()],
        };
        let err = alias
            .validate(&ConfigPath::new("alias=all"), &registry)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error at alias=all/tasks: ghost is not a resource"
        );
    }

    #[test]
    fn display_and_dependencies() {
        let alias = AliasConfig {
            tasks: vec!["test".into(), "build".into()],
        };
        assert_eq!(alias.to_string(), "Run tasks: test, build");
        assert_eq!(alias.dependencies(), vec!["test", "build"]);
    }
}
