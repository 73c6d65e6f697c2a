//! Content loaders for reading swap data from files.
//!
//! This module provides loaders that turn TOML, RON, JSON, and rule files into
//! configuration, registry snapshots, merge maps, and compiled rule tables.

pub mod config;
pub mod factory;
pub mod merge;
pub mod registry;

pub use config::{ConfigLoader, LoaderConfig};
pub use factory::{ContentFactory, RuleLoad};
pub use merge::{MergeMap, MergeMapLoader};
pub use registry::{RegistryFile, RegistryLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
