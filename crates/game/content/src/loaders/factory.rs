//! Content factory for building rule tables from a data directory.

use std::path::{Path, PathBuf};

use swap_core::{FormOracle, FormsSnapshot, RuleTable};
use tracing::{error, info, warn};

use crate::compiler::{CompileIssue, RuleCompiler};
use crate::loaders::config::CONFIG_FILE;
use crate::loaders::{
    ConfigLoader, LoadResult, LoaderConfig, MergeMap, MergeMapLoader, RegistryLoader, read_file,
};
use crate::resolver::FormRemapper;

/// File name of the optional registry snapshot inside a data directory.
pub const REGISTRY_FILE: &str = "registry.ron";

/// Compiled rules together with what produced them.
#[derive(Debug, Default)]
pub struct RuleLoad {
    pub table: RuleTable,
    /// Rule files that were compiled, in processing order.
    pub files: Vec<PathBuf>,
    /// Diagnostics, tagged with the file they came from.
    pub issues: Vec<(PathBuf, CompileIssue)>,
    /// Keys that contributed at least one replacement.
    pub rules_added: usize,
}

impl RuleLoad {
    /// True iff at least one rule made it into the table.
    pub fn loaded_any(&self) -> bool {
        !self.table.is_empty()
    }

    /// Logs the `RESULT` summary: every base with its number of variations,
    /// unconditional bases first.
    pub fn log_summary(&self) {
        info!(
            files = self.files.len(),
            rules = self.rules_added,
            issues = self.issues.len(),
            "RESULT"
        );

        let mut unconditional: Vec<_> = self.table.unconditional_entries().collect();
        unconditional.sort_by_key(|(base, _)| *base);
        info!("{} unconditional base(s)", unconditional.len());
        for (base, set) in unconditional {
            info!(%base, variations = set.len(), "unconditional");
        }

        let mut conditional: Vec<_> = self.table.conditional_entries().collect();
        conditional.sort_by_key(|(base, _)| *base);
        info!("{} conditional base(s)", conditional.len());
        for (base, rules) in conditional {
            let variations: usize = rules.iter().map(|rule| rule.replacements.len()).sum();
            info!(%base, rules = rules.len(), variations, "conditional");
        }
    }
}

/// Content factory that loads swap rules from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── anim_swap.toml        (optional)
/// ├── registry.ron          (optional, offline registry snapshot)
/// ├── Torches_ANIO.ini
/// ├── Vendors_ANIO.ini
/// └── merges/
///     └── Merged.json       (listed in anim_swap.toml)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing rule files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load `anim_swap.toml`, or defaults when the file is absent.
    pub fn load_config(&self) -> LoadResult<LoaderConfig> {
        let path = self.data_dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(LoaderConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the registry snapshot from `registry.ron`.
    pub fn load_registry(&self) -> LoadResult<FormsSnapshot> {
        RegistryLoader::load(&self.data_dir.join(REGISTRY_FILE))
    }

    /// Load every merge map listed in `config`.
    pub fn load_merge_map(&self, config: &LoaderConfig) -> LoadResult<MergeMap> {
        let paths: Vec<PathBuf> = config
            .merge_maps
            .iter()
            .map(|path| self.data_dir.join(path))
            .collect();
        MergeMapLoader::load(&paths)
    }

    /// Rule files in the data directory, sorted by path.
    ///
    /// Sort order is rule priority: earlier files declare earlier
    /// conditional rules.
    pub fn discover_rule_files(&self, config: &LoaderConfig) -> LoadResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.data_dir).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read data directory {}: {}",
                self.data_dir.display(),
                e
            )
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && config.is_rule_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Compile every rule file into a fresh table.
    ///
    /// Unreadable files are logged and skipped. Fails only when the data
    /// directory itself cannot be listed.
    pub fn load_rules<F>(
        &self,
        forms: &F,
        remapper: Option<&dyn FormRemapper>,
        config: &LoaderConfig,
    ) -> LoadResult<RuleLoad>
    where
        F: FormOracle + ?Sized,
    {
        let files = self.discover_rule_files(config)?;
        if files.is_empty() {
            warn!(dir = %self.data_dir.display(), "no rule files found");
        }

        let mut compiler = RuleCompiler::new(forms).with_config(config.limits.clone());
        if let Some(remapper) = remapper {
            compiler = compiler.with_remapper(remapper);
        }

        let mut builder = RuleTable::builder();
        let mut load = RuleLoad::default();
        for path in files {
            let content = match read_file(&path) {
                Ok(content) => content,
                Err(e) => {
                    error!("{:#}", e);
                    continue;
                }
            };

            info!(file = %path.display(), "compiling rules");
            let report = compiler.compile_str(&content, &mut builder);
            load.rules_added += report.rules_added;
            load.issues
                .extend(report.issues.into_iter().map(|issue| (path.clone(), issue)));
            load.files.push(path);
        }

        load.table = builder.build();
        Ok(load)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
