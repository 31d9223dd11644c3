//! Structured locations inside a configuration document.

use std::fmt;

use crate::constants::PATH_SEPARATOR;

/// Location of a value inside a document, such as `job=compile/mounts`.
///
/// Paths are cheap to extend: [`ConfigPath::add`] returns a new path and
/// leaves the receiver untouched, so one parent path can be shared by every
/// field check of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    segments: Vec<String>,
}

impl ConfigPath {
    /// Creates a path rooted at a single segment.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            segments: vec![root.into()],
        }
    }

    /// Returns a new path with `next` appended.
    #[must_use]
    pub fn add(&self, next: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(next.into());
        Self { segments }
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(PATH_SEPARATOR))
    }
}
