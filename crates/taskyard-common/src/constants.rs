//! Document keys and defaults.

/// Default document file name looked up by the CLI.
pub const DEFAULT_CONFIG_FILE: &str = "taskyard.yaml";

/// Separator between the kind and the name in a top-level document key.
pub const KIND_SEPARATOR: char = '=';

/// Top-level document key holding project metadata.
pub const META_KEY: &str = "meta";

/// Document kind for image resources.
pub const IMAGE_KIND: &str = "image";
/// Document kind for mount resources.
pub const MOUNT_KIND: &str = "mount";
/// Document kind for job resources.
pub const JOB_KIND: &str = "job";
/// Deprecated document kind for job resources.
///
/// Kept so that older documents still load; drop it with the next format
/// version.
pub const JOB_KIND_DEPRECATED: &str = "run";
/// Document kind for alias resources.
pub const ALIAS_KIND: &str = "alias";

/// Separator used when rendering a resource path.
pub const PATH_SEPARATOR: &str = "/";

