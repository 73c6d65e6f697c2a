//! Loader configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swap_core::SwapConfig;

use crate::loaders::{LoadResult, read_file};

/// File name of the optional loader configuration inside a data directory.
pub const CONFIG_FILE: &str = "anim_swap.toml";

/// How rule files are discovered and which auxiliary data is loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Case-insensitive suffix of a rule file's stem.
    pub rule_suffix: String,

    /// Case-insensitive rule file extension, without the dot.
    pub extension: String,

    /// JSON merge maps, relative to the data directory.
    pub merge_maps: Vec<PathBuf>,

    pub limits: SwapConfig,
}

impl LoaderConfig {
    pub const DEFAULT_RULE_SUFFIX: &'static str = "_ANIO";
    pub const DEFAULT_EXTENSION: &'static str = "ini";

    /// Returns true if `path` names a rule file under this configuration.
    pub fn is_rule_file(&self, path: &Path) -> bool {
        let extension_matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension));
        let suffix = self.rule_suffix.to_ascii_lowercase();
        let stem_matches = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.to_ascii_lowercase().ends_with(&suffix));
        extension_matches && stem_matches
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            rule_suffix: Self::DEFAULT_RULE_SUFFIX.to_owned(),
            extension: Self::DEFAULT_EXTENSION.to_owned(),
            merge_maps: Vec::new(),
            limits: SwapConfig::default(),
        }
    }
}

/// Loader for [`LoaderConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing LoaderConfig
    pub fn load(path: &Path) -> LoadResult<LoaderConfig> {
        let content = read_file(path)?;
        let config: LoaderConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}
