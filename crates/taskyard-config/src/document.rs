//! Loading a whole configuration document.
//!
//! A document is a YAML mapping whose keys are either `meta` or
//! `<kind>=<name>`:
//!
//! ```yaml
//! meta:
//!     project: example
//!     default: compile
//!
//! image=builder:
//!     image: example/builder
//!     context: dockerfiles/
//!
//! mount=source:
//!     bind: .
//!     path: /go/src/app
//!
//! job=compile:
//!     use: builder
//!     mounts: [source]
//!     command: go build -o dist/app
//!     artifact: dist/app
//! ```
//!
//! Every entry is populated before any is validated, so references may
//! point forwards.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use taskyard_common::constants::{KIND_SEPARATOR, META_KEY};
use taskyard_common::error::{Result, TaskyardError};
use taskyard_common::path::ConfigPath;

use crate::env::Environment;
use crate::factory::ResourceFactories;
use crate::registry::Registry;
use crate::resource::{Resource, ResourceKind};
use crate::shlex::value_type_name;

/// Project-level settings from the `meta` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MetaConfig {
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,
    /// Resource run when no name is given on the command line.
    #[serde(default)]
    pub default: Option<String>,
}

/// A populated and validated document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    meta: MetaConfig,
    registry: Registry,
}

fn resource_path(kind: ResourceKind, name: &str) -> ConfigPath {
    ConfigPath::new(format!("{kind}{KIND_SEPARATOR}{name}"))
}

fn split_key(key: &Value) -> Result<(String, String)> {
    let Value::String(key) = key else {
        return Err(TaskyardError::document(
            ConfigPath::new(format!("{key:?}")),
            format!("resource keys must be strings, not {}", value_type_name(key)),
        ));
    };
    match key.split_once(KIND_SEPARATOR) {
        Some((kind, name)) if !kind.trim().is_empty() && !name.trim().is_empty() => {
            Ok((kind.trim().to_owned(), name.trim().to_owned()))
        }
        _ => Err(TaskyardError::document(
            ConfigPath::new(key.as_str()),
            format!("invalid resource key, expected <kind>{KIND_SEPARATOR}<name>"),
        )),
    }
}

impl Document {
    /// Loads, populates and validates a document with the built-in kinds.
    ///
    /// # Errors
    ///
    /// Returns the first YAML, population or validation error.
    pub fn load(source: &str) -> Result<Self> {
        Self::load_with(source, &ResourceFactories::builtin())
    }

    /// Loads, populates and validates a document using `factories`.
    ///
    /// # Errors
    ///
    /// Returns the first YAML, population or validation error.
    pub fn load_with(source: &str, factories: &ResourceFactories) -> Result<Self> {
        tracing::info!("loading document");
        let value: Value = serde_yaml::from_str(source)?;
        let document = Self::populate(value, factories)?;
        document.validate()?;
        Ok(document)
    }

    /// Builds every resource of `value` without validating references.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed key, an unknown kind, a duplicate
    /// name, or a resource that cannot be populated.
    pub fn populate(value: Value, factories: &ResourceFactories) -> Result<Self> {
        let entries = match value {
            Value::Mapping(entries) => entries,
            Value::Null => Mapping::new(),
            other => {
                return Err(TaskyardError::document(
                    ConfigPath::new("document"),
                    format!("must be a mapping, not {}", value_type_name(&other)),
                ));
            }
        };

        let mut document = Self::default();
        for (key, raw) in entries {
            if key.as_str() == Some(META_KEY) {
                document.meta = serde_yaml::from_value(raw).map_err(|e| {
                    TaskyardError::document(ConfigPath::new(META_KEY), e.to_string())
                })?;
                continue;
            }

            let (kind, name) = split_key(&key)?;
            let path = ConfigPath::new(format!("{kind}{KIND_SEPARATOR}{name}"));
            tracing::debug!(%kind, %name, "populating resource");
            let resource = factories.create(&kind, &path, raw)?;
            document.registry.insert(name, resource)?;
        }
        Ok(document)
    }

    /// Validates every resource against the full registry, in document
    /// order, then checks `meta.default`.
    ///
    /// # Errors
    ///
    /// Returns the first reference error.
    pub fn validate(&self) -> Result<()> {
        tracing::info!(resources = self.registry.len(), "validating document");
        for (name, resource) in self.registry.iter() {
            resource.validate(&resource_path(resource.kind(), name), &self.registry)?;
        }
        if let Some(default) = &self.meta.default {
            if !self.registry.contains(default) {
                return Err(TaskyardError::reference(
                    ConfigPath::new(META_KEY).add("default"),
                    format!("{default} is not a resource"),
                ));
            }
        }
        Ok(())
    }

    /// Resolves variables in every resource, in document order.
    ///
    /// Consumes the document; on failure nothing partially resolved is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `env`.
    pub fn resolve<E: Environment + ?Sized>(self, env: &E) -> Result<Self> {
        tracing::info!("resolving variables");
        let Self { meta, registry } = self;
        let mut resolved = Registry::new();
        for (name, resource) in registry.into_entries() {
            resolved.insert(name, resource.resolve(env)?)?;
        }
        Ok(Self {
            meta,
            registry: resolved,
        })
    }

    /// Returns the dependencies of the resource named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskyardError::Reference`] if no such resource exists.
    pub fn dependencies(&self, name: &str) -> Result<Vec<String>> {
        self.get(name).map(Resource::dependencies).ok_or_else(|| {
            TaskyardError::reference(ConfigPath::new(name), format!("{name} is not a resource"))
        })
    }

    /// Returns the resource named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.registry.get(name)
    }

    /// Returns the `meta` block.
    #[must_use]
    pub const fn meta(&self) -> &MetaConfig {
        &self.meta
    }

    /// Returns the registry of all resources.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::VarEnv;

    const EXAMPLE: &str = r"
meta:
    project: example
    default: all

job=compile:
    use: builder
    mounts: [source, dist]
    command: go build -o dist/app
    artifact: dist/app
    working-dir: $SRC

image=builder:
    image: example/builder
    context: dockerfiles/

mount=source:
    bind: .
    path: $SRC

mount=dist:
    bind: ./dist
    path: /dist

alias=all:
    tasks: [compile]
";

    #[test]
    fn load_populates_meta_and_resources() {
        let document = Document::load(EXAMPLE).expect("load");
        assert_eq!(document.meta().project.as_deref(), Some("example"));
        assert_eq!(document.registry().len(), 5);
        let names: Vec<&str> = document.registry().iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["compile", "builder", "source", "dist", "all"]);
    }

    #[test]
    fn forward_references_validate() {
        let document = Document::load(EXAMPLE).expect("load");
        assert_eq!(
            document.dependencies("compile").expect("deps"),
            vec!["builder", "source", "dist"]
        );
    }

    #[test]
    fn unknown_dependency_target_fails() {
        let document = Document::load(EXAMPLE).expect("load");
        assert!(document.dependencies("ghost").is_err());
    }

    #[test]
    fn resolve_rewrites_every_resource() {
        let env = VarEnv::new().with_var("SRC", "/go/src/app");
        let document = Document::load(EXAMPLE)
            .expect("load")
            .resolve(&env)
            .expect("resolve");

        let job = document.get("compile").and_then(Resource::as_job).expect("job");
        assert_eq!(job.working_dir, "/go/src/app");
        let mount = document.get("source").and_then(Resource::as_mount).expect("mount");
        assert_eq!(mount.path, "/go/src/app");
    }

    #[test]
    fn resolve_fails_on_undefined_variable() {
        let err = Document::load(EXAMPLE)
            .expect("load")
            .resolve(&VarEnv::new())
            .unwrap_err();
        assert!(matches!(err, TaskyardError::Resolution { .. }), "got: {err}");
    }

    #[test]
    fn wrong_kind_reference_aborts_load() {
        let source = "
image=builder:
    image: b
job=test:
    use: builder
    mounts: [builder]
";
        let err = Document::load(source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error at job=test/mounts: builder is not a mount resource"
        );
    }

    #[test]
    fn deprecated_run_kind_still_loads() {
        let source = "
image=builder:
    image: b
run=test:
    use: builder
";
        let document = Document::load(source).expect("load");
        assert_eq!(
            document.get("test").map(Resource::kind),
            Some(ResourceKind::Job)
        );
    }

    #[test]
    fn malformed_keys_fail() {
        for source in ["compile: {}", "=x: {}", "job=: {}", "1: {}"] {
            let err = Document::load(source).unwrap_err();
            assert!(matches!(err, TaskyardError::Document { .. }), "{source}: {err}");
        }
    }

    #[test]
    fn duplicate_names_across_kinds_fail() {
        let source = "
image=shared:
    image: b
mount=shared:
    path: /x
";
        let err = Document::load(source).unwrap_err();
        assert!(err.to_string().contains("duplicate resource name"), "got: {err}");
    }

    #[test]
    fn meta_default_must_exist() {
        let err = Document::load("meta:\n    default: nothing\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error at meta/default: nothing is not a resource"
        );
    }

    #[test]
    fn empty_document_is_valid() {
        let document = Document::load("").expect("load");
        assert!(document.registry().is_empty());
    }

    #[test]
    fn non_mapping_document_fails() {
        let err = Document::load("- just\n- a list\n").unwrap_err();
        assert!(err.to_string().contains("must be a mapping"), "got: {err}");
    }

    #[test]
    fn invalid_yaml_fails() {
        let err = Document::load("job=x: [unclosed").unwrap_err();
        assert!(matches!(err, TaskyardError::Yaml { .. }), "got: {err}");
    }
}
