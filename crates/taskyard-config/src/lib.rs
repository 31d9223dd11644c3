//! # taskyard-config
//!
//! Resource definitions for the taskyard document format.
//!
//! Handles:
//! - **Resource**: the contract every kind implements (dependencies,
//!   validation, variable resolution, summary) and the kinds themselves.
//! - **Shlex**: splitting shell-quoted command strings into words.
//! - **Registry**: name lookup across one document.
//! - **Env**: variable substitution.
//! - **Factory**: the table from document kind to constructor.
//! - **Document**: loading and validating a whole document.

pub mod document;
pub mod env;
pub mod factory;
pub mod registry;
pub mod resource;
pub mod shlex;

pub use document::{Document, MetaConfig};
pub use env::{Environment, VarEnv};
pub use factory::ResourceFactories;
pub use registry::Registry;
pub use resource::{Resource, ResourceConfig, ResourceKind};
pub use shlex::ShlexSlice;
