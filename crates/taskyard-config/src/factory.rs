//! Factory table mapping document kinds to resource constructors.
//!
//! The table is built explicitly by [`ResourceFactories::builtin`]; nothing
//! registers itself behind the caller's back.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use taskyard_common::constants::{
    ALIAS_KIND, IMAGE_KIND, JOB_KIND, JOB_KIND_DEPRECATED, MOUNT_KIND,
};
use taskyard_common::error::{Result, TaskyardError};
use taskyard_common::path::ConfigPath;

use crate::resource::{
    AliasConfig, ImageConfig, JobConfig, MountConfig, Resource, ResourceConfig,
};
use crate::shlex::{ShlexSlice, value_type_name};

/// Builds a resource from the raw value of one document entry.
pub type ResourceFactory = fn(&ConfigPath, Value) -> Result<Resource>;

#[derive(Debug, Clone, Copy)]
struct Registration {
    factory: ResourceFactory,
    /// Kind to use instead, when this one is deprecated.
    replaced_by: Option<&'static str>,
}

/// Lookup table from document kind to [`ResourceFactory`].
#[derive(Debug, Clone, Default)]
pub struct ResourceFactories {
    registrations: BTreeMap<&'static str, Registration>,
}

impl ResourceFactories {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the table of built-in kinds.
    ///
    /// `run` is accepted as a deprecated spelling of `job` so that older
    /// documents still load; remove it with the next format version.
    #[must_use]
    pub fn builtin() -> Self {
        let mut factories = Self::new();
        factories.register(IMAGE_KIND, image_from_config);
        factories.register(MOUNT_KIND, mount_from_config);
        factories.register(JOB_KIND, job_from_config);
        factories.register_deprecated(JOB_KIND_DEPRECATED, JOB_KIND, job_from_config);
        factories.register(ALIAS_KIND, alias_from_config);
        factories
    }

    /// Registers `factory` under `kind`, replacing any previous entry.
    pub fn register(&mut self, kind: &'static str, factory: ResourceFactory) {
        let _ = self.registrations.insert(
            kind,
            Registration {
                factory,
                replaced_by: None,
            },
        );
    }

    /// Registers `factory` under a deprecated `kind` superseded by
    /// `replaced_by`.
    pub fn register_deprecated(
        &mut self,
        kind: &'static str,
        replaced_by: &'static str,
        factory: ResourceFactory,
    ) {
        let _ = self.registrations.insert(
            kind,
            Registration {
                factory,
                replaced_by: Some(replaced_by),
            },
        );
    }

    /// Builds a resource of `kind` from `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskyardError::Document`] for an unknown kind, or whatever
    /// the kind's factory reports.
    pub fn create(&self, kind: &str, path: &ConfigPath, raw: Value) -> Result<Resource> {
        let Some(registration) = self.registrations.get(kind) else {
            return Err(TaskyardError::document(
                path.clone(),
                format!("unknown resource kind \"{kind}\""),
            ));
        };
        if let Some(replacement) = registration.replaced_by {
            tracing::warn!(%path, kind, replacement, "resource kind is deprecated");
        }
        (registration.factory)(path, raw)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        _ => false,
    }
}

/// Populates a resource of type `T` from the raw value of a document entry.
///
/// Required fields are enforced first. Shell-quoted fields are then taken
/// out of the entry and tokenized, the remaining fields are deserialized,
/// and the tokenized values are handed back through
/// [`ResourceConfig::set_shell_field`].
///
/// # Errors
///
/// Returns [`TaskyardError::MissingField`] for an absent required field,
/// [`TaskyardError::Type`] or [`TaskyardError::Parse`] located at a bad
/// shell-quoted field, and [`TaskyardError::Document`] for anything else
/// that does not fit `T`.
pub fn populate<T>(path: &ConfigPath, raw: Value) -> Result<T>
where
    T: ResourceConfig + DeserializeOwned,
{
    tracing::debug!(%path, kind = %T::KIND, "populating fields");
    let mut mapping = match raw {
        Value::Mapping(mapping) => mapping,
        Value::Null => Mapping::new(),
        other => {
            return Err(TaskyardError::document(
                path.clone(),
                format!("must be a mapping, not {}", value_type_name(&other)),
            ));
        }
    };

    for field in T::REQUIRED_FIELDS {
        if mapping.get(*field).is_none_or(is_blank) {
            return Err(TaskyardError::MissingField {
                path: path.clone(),
                field: (*field).to_owned(),
            });
        }
    }

    let mut shell = Vec::with_capacity(T::SHELL_FIELDS.len());
    for field in T::SHELL_FIELDS {
        if let Some(raw) = mapping.remove(*field) {
            let slice =
                ShlexSlice::transform_config(&raw).map_err(|e| e.at(path.add(*field)))?;
            shell.push((*field, slice));
        }
    }

    let mut config: T = serde_yaml::from_value(Value::Mapping(mapping))
        .map_err(|e| TaskyardError::document(path.clone(), e.to_string()))?;
    for (field, slice) in shell {
        config.set_shell_field(field, slice);
    }
    Ok(config)
}

fn image_from_config(path: &ConfigPath, raw: Value) -> Result<Resource> {
    populate::<ImageConfig>(path, raw).map(Resource::Image)
}

fn mount_from_config(path: &ConfigPath, raw: Value) -> Result<Resource> {
    populate::<MountConfig>(path, raw).map(Resource::Mount)
}

fn job_from_config(path: &ConfigPath, raw: Value) -> Result<Resource> {
    populate::<JobConfig>(path, raw).map(Resource::Job)
}

fn alias_from_config(path: &ConfigPath, raw: Value) -> Result<Resource> {
    populate::<AliasConfig>(path, raw).map(Resource::Alias)
}
