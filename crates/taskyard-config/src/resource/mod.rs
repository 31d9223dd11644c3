//! The resource contract and the closed set of resource kinds.
//!
//! Every kind implements [`ResourceConfig`]. The loader, the validator and
//! the graph layer only ever see the [`Resource`] sum type, so adding a kind
//! means adding a variant and letting the compiler point at every match.

mod alias;
mod image;
mod job;
mod mount;

use std::fmt;

use serde::Serialize;
use taskyard_common::constants::{ALIAS_KIND, IMAGE_KIND, JOB_KIND, MOUNT_KIND};
use taskyard_common::error::Result;
use taskyard_common::path::ConfigPath;

use crate::env::Environment;
use crate::registry::Registry;
use crate::shlex::ShlexSlice;

pub use self::alias::AliasConfig;
pub use self::image::ImageConfig;
pub use self::job::JobConfig;
pub use self::mount::MountConfig;

/// Capabilities shared by every resource kind.
pub trait ResourceConfig: fmt::Display + Sized {
    /// Tag identifying the kind.
    const KIND: ResourceKind;

    /// Document keys that must be present and non-empty.
    const REQUIRED_FIELDS: &'static [&'static str] = &[];

    /// Document keys holding shell-quoted strings.
    const SHELL_FIELDS: &'static [&'static str] = &[];

    /// Names of the resources that must exist before this one, in order.
    fn dependencies(&self) -> Vec<String>;

    /// Checks references to other resources against `registry`.
    ///
    /// `path` locates this resource in the document and prefixes every
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskyardError::Reference`](taskyard_common::error::TaskyardError::Reference)
    /// for the first reference that is missing or of the wrong kind.
    fn validate(&self, path: &ConfigPath, registry: &Registry) -> Result<()>;

    /// Substitutes variable expressions in the kind's resolvable fields.
    ///
    /// Resolution consumes the resource. Resolving an already resolved
    /// resource again is not supported: the environment may reinterpret text
    /// that a previous pass produced.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `env`, unchanged.
    fn resolve<E: Environment + ?Sized>(self, env: &E) -> Result<Self>;

    /// Stores the tokenized value of one of [`Self::SHELL_FIELDS`].
    fn set_shell_field(&mut self, _field: &str, _value: ShlexSlice) {}
}

/// Tag for each kind of resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A container image to build or pull.
    Image,
    /// A host directory or file mounted into containers.
    Mount,
    /// A command run in a container.
    Job,
    /// A named group of other resources.
    Alias,
}

impl ResourceKind {
    /// Returns the document keyword for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => IMAGE_KIND,
            Self::Mount => MOUNT_KIND,
            Self::Job => JOB_KIND,
            Self::Alias => ALIAS_KIND,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A populated resource of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resource {
    /// An image resource.
    Image(ImageConfig),
    /// A mount resource.
    Mount(MountConfig),
    /// A job resource.
    Job(JobConfig),
    /// An alias resource.
    Alias(AliasConfig),
}

impl Resource {
    /// Returns the kind tag of this resource.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Image(_) => ResourceKind::Image,
            Self::Mount(_) => ResourceKind::Mount,
            Self::Job(_) => ResourceKind::Job,
            Self::Alias(_) => ResourceKind::Alias,
        }
    }

    /// See [`ResourceConfig::dependencies`].
    #[must_use]
    pub fn dependencies(&self) -> Vec<String> {
        match self {
            Self::Image(c) => c.dependencies(),
            Self::Mount(c) => c.dependencies(),
            Self::Job(c) => c.dependencies(),
            Self::Alias(c) => c.dependencies(),
        }
    }

    /// See [`ResourceConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns the first reference error of the underlying kind.
    pub fn validate(&self, path: &ConfigPath, registry: &Registry) -> Result<()> {
        match self {
            Self::Image(c) => c.validate(path, registry),
            Self::Mount(c) => c.validate(path, registry),
            Self::Job(c) => c.validate(path, registry),
            Self::Alias(c) => c.validate(path, registry),
        }
    }

    /// See [`ResourceConfig::resolve`].
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `env`.
    pub fn resolve<E: Environment + ?Sized>(self, env: &E) -> Result<Self> {
        Ok(match self {
            Self::Image(c) => Self::Image(c.resolve(env)?),
            Self::Mount(c) => Self::Mount(c.resolve(env)?),
            Self::Job(c) => Self::Job(c.resolve(env)?),
            Self::Alias(c) => Self::Alias(c.resolve(env)?),
        })
    }

    /// Returns the job configuration if this is a job.
    #[must_use]
    pub const fn as_job(&self) -> Option<&JobConfig> {
        match self {
            Self::Job(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the image configuration if this is an image.
    #[must_use]
    pub const fn as_image(&self) -> Option<&ImageConfig> {
        match self {
            Self::Image(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the mount configuration if this is a mount.
    #[must_use]
    pub const fn as_mount(&self) -> Option<&MountConfig> {
        match self {
            Self::Mount(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(c) => fmt::Display::fmt(c, f),
            Self::Mount(c) => fmt::Display::fmt(c, f),
            Self::Job(c) => fmt::Display::fmt(c, f),
            Self::Alias(c) => fmt::Display::fmt(c, f),
        }
    }
}

impl From<ImageConfig> for Resource {
    fn from(config: ImageConfig) -> Self {
        Self::Image(config)
    }
}

impl From<MountConfig> for Resource {
    fn from(config: MountConfig) -> Self {
        Self::Mount(config)
    }
}

impl From<JobConfig> for Resource {
    fn from(config: JobConfig) -> Self {
        Self::Job(config)
    }
}

impl From<AliasConfig> for Resource {
    fn from(config: AliasConfig) -> Self {
        Self::Alias(config)
    }
}

/// Checks that `name` exists in `registry` with kind `expected`.
///
/// A missing name and a name of another kind produce the same message,
/// `"<name> is not a <kind> resource"` (with `an` before vowels).
pub(crate) fn require_kind(
    registry: &Registry,
    name: &str,
    expected: ResourceKind,
) -> std::result::Result<(), String> {
    match registry.kind_of(name) {
        Some(kind) if kind == expected => Ok(()),
        _ => {
            let article = if expected == ResourceKind::Image || expected == ResourceKind::Alias {
                "an"
            } else {
                "a"
            };
            Err(format!("{name} is not {article} {expected} resource"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_match_document_keywords() {
        assert_eq!(ResourceKind::Image.to_string(), "image");
        assert_eq!(ResourceKind::Mount.to_string(), "mount");
        assert_eq!(ResourceKind::Job.to_string(), "job");
        assert_eq!(ResourceKind::Alias.to_string(), "alias");
    }

    #[test]
    fn require_kind_uses_one_message_for_missing_and_mismatched() {
        let mut registry = Registry::new();
        registry
            .insert("src", Resource::Mount(MountConfig::default()))
            .expect("insert");

        let missing = require_kind(&registry, "ghost", ResourceKind::Image).unwrap_err();
        let mismatched = require_kind(&registry, "src", ResourceKind::Image).unwrap_err();
        assert_eq!(missing, "ghost is not an image resource");
        assert_eq!(mismatched, "src is not an image resource");
        assert!(require_kind(&registry, "src", ResourceKind::Mount).is_ok());
        assert_eq!(
            require_kind(&registry, "ghost", ResourceKind::Mount).unwrap_err(),
            "ghost is not a mount resource"
        );
    }

    #[test]
    fn serialized_resource_carries_kind_tag() {
        let resource = Resource::Mount(MountConfig {
            bind: "dist".into(),
            path: "/out".into(),
            ..MountConfig::default()
        });
        let json = serde_json::to_value(&resource).expect("serialize");
        assert_eq!(json["kind"], "mount");
        assert_eq!(json["path"], "/out");
    }
}
