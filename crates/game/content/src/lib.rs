//! Load phase for animation object swaps.
//!
//! This crate turns configuration files into a compiled [`swap_core::RuleTable`]:
//! - Rule files (key-only INI, discovered by file-name suffix)
//! - Identifier resolution (`local~Plugin.esp` or editor ids)
//! - Merge maps for plugins merged into others (JSON)
//! - Loader configuration (TOML)
//! - Registry snapshots for offline use (RON)
//!
//! Parsing and compilation need no I/O; the file loaders live behind the
//! default `loaders` feature.

pub mod compiler;
pub mod ini;
pub mod resolver;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use compiler::{CompileIssue, CompileReport, RuleCompiler};
pub use ini::{IniDocument, IniSection};
pub use resolver::{FormRemapper, FormResolver, parse_local_id};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, LoaderConfig, MergeMap, MergeMapLoader, RegistryFile,
    RegistryLoader, RuleLoad,
};
