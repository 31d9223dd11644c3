//! The `mount` resource: a host path bound into job containers.

use std::fmt;

use serde::{Deserialize, Serialize};
use taskyard_common::error::Result;
use taskyard_common::path::ConfigPath;

use super::{ResourceConfig, ResourceKind};
use crate::env::Environment;
use crate::registry::Registry;

/// Configuration of a `mount` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MountConfig {
    /// Host path, relative to the working directory. Supports variables.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bind: String,
    /// Path inside the container. Supports variables.
    pub path: String,
    /// Mounts the path read-only.
    #[serde(default)]
    pub read_only: bool,
    /// The host path is a file rather than a directory.
    #[serde(default)]
    pub file: bool,
}

impl ResourceConfig for MountConfig {
    const KIND: ResourceKind = ResourceKind::Mount;
    const REQUIRED_FIELDS: &'static [&'static str] = &["path"];

    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    fn validate(&self, _path: &ConfigPath, _registry: &Registry) -> Result<()> {
        Ok(())
    }

    fn resolve<E: Environment + ?Sized>(mut self, env: &E) -> Result<Self> {
        self.bind = env.resolve(&self.bind)?;
        self.path = env.resolve(&self.path)?;
        Ok(self)
    }
}

impl fmt::Display for MountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mount '{}' at '{}'", self.bind, self.path)?;
        if self.read_only {
            f.write_str(" (read-only)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::VarEnv;

    #[test]
    fn display_marks_read_only() {
        let mount = MountConfig {
            bind: "./src".into(),
            path: "/go/src/app".into(),
            ..MountConfig::default()
        };
        assert_eq!(mount.to_string(), "Mount './src' at '/go/src/app'");

        let read_only = MountConfig {
            read_only: true,
            ..mount
        };
        assert_eq!(
            read_only.to_string(),
            "Mount './src' at '/go/src/app' (read-only)"
        );
    }

    #[test]
    fn resolve_bind_then_path() {
        let env = VarEnv::new().with_var("HOME", "/home/ci");
        let mount = MountConfig {
            bind: "$HOME/.cache".into(),
            path: "/root/.cache".into(),
            ..MountConfig::default()
        };
        let resolved = mount.resolve(&env).expect("resolve");
        assert_eq!(resolved.bind, "/home/ci/.cache");
        assert_eq!(resolved.path, "/root/.cache");
    }

    #[test]
    fn mounts_have_no_dependencies() {
        assert!(MountConfig::default().dependencies().is_empty());
    }
}
