//! The `job` resource: run a command in a container built from an image.
//!
//! A job without an `artifact` is never up to date and always runs. With an
//! artifact, the modification time of that path stands in for the job's.
//! The image named by `use` and every mount in `mounts` are implicit
//! dependencies and are always created first.

use std::fmt;

use serde::{Deserialize, Serialize};
use taskyard_common::error::{Result, TaskyardError};
use taskyard_common::path::ConfigPath;

use super::{ResourceConfig, ResourceKind, require_kind};
use crate::env::Environment;
use crate::registry::Registry;
use crate::shlex::ShlexSlice;

/// Configuration of a `job` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct JobConfig {
    /// Name of the `image` resource the container is created from.
    #[serde(rename = "use")]
    pub use_image: String,
    /// Host path produced by the job, relative to the working directory.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub artifact: String,
    /// Command to run in the container.
    #[serde(default, skip_serializing_if = "ShlexSlice::is_empty")]
    pub command: ShlexSlice,
    /// Overrides the image entrypoint.
    #[serde(default, skip_serializing_if = "ShlexSlice::is_empty")]
    pub entrypoint: ShlexSlice,
    /// Files or directories the artifact is built from.
    ///
    /// When non-empty, only these are compared against the artifact to decide
    /// staleness; the image and mounts are ignored.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// Names of `mount` resources attached to the container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<String>,
    /// Gives the container extended privileges.
    #[serde(default)]
    pub privileged: bool,
    /// Keeps stdin open and allocates a tty.
    #[serde(default)]
    pub interactive: bool,
    /// Extra resources to create before this job.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,
    /// `key=value` environment variables passed to the container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,
    /// Exposes the container engine to the container.
    #[serde(default)]
    pub provide_docker: bool,
    /// Container network mode.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub net_mode: String,
    /// Working directory inside the container.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub working_dir: String,
}

impl JobConfig {
    fn validate_use(&self, registry: &Registry) -> std::result::Result<(), String> {
        require_kind(registry, &self.use_image, ResourceKind::Image)
    }

    fn validate_mounts(&self, registry: &Registry) -> std::result::Result<(), String> {
        self.mounts
            .iter()
            .try_for_each(|mount| require_kind(registry, mount, ResourceKind::Mount))
    }
}

impl ResourceConfig for JobConfig {
    const KIND: ResourceKind = ResourceKind::Job;
    const REQUIRED_FIELDS: &'static [&'static str] = &["use"];
    const SHELL_FIELDS: &'static [&'static str] = &["command", "entrypoint"];

    /// Returns `use`, then `depends`, then `mounts`, duplicates included.
    fn dependencies(&self) -> Vec<String> {
        std::iter::once(self.use_image.clone())
            .chain(self.depends.iter().cloned())
            .chain(self.mounts.iter().cloned())
            .collect()
    }

    fn validate(&self, path: &ConfigPath, registry: &Registry) -> Result<()> {
        self.validate_use(registry)
            .map_err(|message| TaskyardError::reference(path.add("use"), message))?;
        self.validate_mounts(registry)
            .map_err(|message| TaskyardError::reference(path.add("mounts"), message))?;
        Ok(())
    }

    /// Resolves `env`, then `working-dir`, then `net-mode`.
    fn resolve<E: Environment + ?Sized>(mut self, env: &E) -> Result<Self> {
        self.env = env.resolve_slice(&self.env)?;
        self.working_dir = env.resolve(&self.working_dir)?;
        self.net_mode = env.resolve(&self.net_mode)?;
        Ok(self)
    }

    fn set_shell_field(&mut self, field: &str, value: ShlexSlice) {
        match field {
            "command" => self.command = value,
            "entrypoint" => self.entrypoint = value,
            _ => {}
        }
    }
}

impl fmt::Display for JobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Run ")?;
        if !self.command.is_empty() {
            write!(f, "'{}' using ", self.command)?;
        }
        write!(f, "the '{}' image", self.use_image)?;
        if !self.artifact.is_empty() {
            write!(f, " to create '{}'", self.artifact)?;
        }
        Ok(())
    }
}
