//! # taskyard-common
//!
//! Error definitions, document paths and constants shared by every taskyard
//! crate.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate.

pub mod constants;
pub mod error;
pub mod path;
