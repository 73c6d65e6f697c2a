//! Swap manager: single-writer load phase, many-reader lookups.
//!
//! [`SwapManager`] owns the registry oracle and rebuilds the rule table on
//! every load. Lookups go through [`SwapHandle`], a cheap clone that captures
//! the table published by the last load and can be shared across threads.

use std::path::Path;
use std::sync::Arc;

use swap_content::{ContentFactory, FormRemapper, MergeMap};
use swap_core::{
    ActorView, Env, FormId, FormOracle, PcgRng, Resolution, RngOracle, RuleTable, SwapConfig,
    SwapEngine, SwapEnv,
};
use tracing::{error, info};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::rng::ThreadRandom;

/// Counts from the last successful load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub files: usize,
    pub rules_added: usize,
    pub issues: usize,
}

/// Owns the published rule table and everything needed to rebuild it.
pub struct SwapManager {
    forms: Arc<dyn FormOracle>,
    remapper: Option<Arc<dyn FormRemapper>>,
    rng: Arc<dyn RngOracle>,
    // Overrides the limits from the loader config when set
    limits: Option<SwapConfig>,
    config: SwapConfig,
    table: Arc<RuleTable>,
}

impl SwapManager {
    /// Create a new manager builder
    pub fn builder(forms: Arc<dyn FormOracle>) -> SwapManagerBuilder {
        SwapManagerBuilder::new(forms)
    }

    /// Load trigger: rebuilds the table from `data_dir` and publishes it.
    ///
    /// Returns true iff at least one rule was loaded. On failure the
    /// published table is empty and every lookup returns its input.
    pub fn load_forms(&mut self, data_dir: impl AsRef<Path>) -> bool {
        match self.try_load_forms(data_dir.as_ref()) {
            Ok(_) => !self.table.is_empty(),
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    /// Like [`load_forms`](Self::load_forms), reporting what went wrong.
    pub fn try_load_forms(&mut self, data_dir: &Path) -> Result<LoadStats> {
        // The table is replaced wholesale, never patched
        self.table = Arc::new(RuleTable::empty());

        let load_error = |source: anyhow::Error| RuntimeError::Load {
            dir: data_dir.to_path_buf(),
            source,
        };

        let factory = ContentFactory::new(data_dir);
        let mut loader_config = factory.load_config().map_err(load_error)?;
        if let Some(limits) = &self.limits {
            loader_config.limits = limits.clone();
        }

        let merge_map: Option<MergeMap> =
            if self.remapper.is_none() && !loader_config.merge_maps.is_empty() {
                Some(factory.load_merge_map(&loader_config).map_err(load_error)?)
            } else {
                None
            };
        let remapper: Option<&dyn FormRemapper> = match (&self.remapper, &merge_map) {
            (Some(remapper), _) => Some(remapper.as_ref()),
            (None, Some(map)) => Some(map),
            (None, None) => None,
        };

        let load = factory
            .load_rules(self.forms.as_ref(), remapper, &loader_config)
            .map_err(load_error)?;
        load.log_summary();

        let stats = LoadStats {
            files: load.files.len(),
            rules_added: load.rules_added,
            issues: load.issues.len(),
        };
        info!(dir = %data_dir.display(), ?stats, "swap rules published");

        self.config = loader_config.limits;
        self.table = Arc::new(load.table);
        Ok(stats)
    }

    /// Get a handle bound to the currently published table
    ///
    /// Handles taken before a reload keep resolving against the old table.
    pub fn handle(&self) -> SwapHandle {
        SwapHandle {
            table: Arc::clone(&self.table),
            forms: Arc::clone(&self.forms),
            rng: Arc::clone(&self.rng),
            config: self.config.clone(),
        }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }
}

/// Builder for [`SwapManager`].
pub struct SwapManagerBuilder {
    forms: Arc<dyn FormOracle>,
    remapper: Option<Arc<dyn FormRemapper>>,
    rng: Option<Arc<dyn RngOracle>>,
    limits: Option<SwapConfig>,
}

impl SwapManagerBuilder {
    fn new(forms: Arc<dyn FormOracle>) -> Self {
        Self {
            forms,
            remapper: None,
            rng: None,
            limits: None,
        }
    }

    /// Set an identifier remapper; merge maps named in the loader config are
    /// then ignored
    pub fn remapper(mut self, remapper: impl FormRemapper + 'static) -> Self {
        self.remapper = Some(Arc::new(remapper));
        self
    }

    /// Set the random source (default: [`ThreadRandom`])
    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Arc::new(rng));
        self
    }

    /// Use a seeded [`PcgRng`] for reproducible selection
    pub fn seed(self, seed: u64) -> Self {
        self.rng(PcgRng::new(seed))
    }

    /// Override evaluator limits from the loader config
    pub fn config(mut self, config: SwapConfig) -> Self {
        self.limits = Some(config);
        self
    }

    /// Apply process-level settings
    pub fn runtime_config(self, config: &RuntimeConfig) -> Self {
        match config.rng_seed {
            Some(seed) => self.seed(seed),
            None => self,
        }
    }

    pub fn build(self) -> SwapManager {
        SwapManager {
            forms: self.forms,
            remapper: self.remapper,
            rng: self.rng.unwrap_or_else(|| Arc::new(ThreadRandom)),
            config: self.limits.clone().unwrap_or_default(),
            limits: self.limits,
            table: Arc::new(RuleTable::empty()),
        }
    }
}

/// Cloneable lookup handle.
///
/// `Send + Sync`; hosts may call it from any number of worker threads.
#[derive(Clone)]
pub struct SwapHandle {
    table: Arc<RuleTable>,
    forms: Arc<dyn FormOracle>,
    rng: Arc<dyn RngOracle>,
    config: SwapConfig,
}

impl SwapHandle {
    /// Form to attach to `user` in place of `anim_object`.
    ///
    /// `user` is `None` when the reference is not an actor; conditional
    /// rules are then skipped.
    pub fn swapped_anim_object(&self, user: Option<&dyn ActorView>, anim_object: FormId) -> FormId {
        self.resolve_detailed(user, anim_object).form()
    }

    pub fn resolve_detailed(&self, user: Option<&dyn ActorView>, anim_object: FormId) -> Resolution {
        let forms: &dyn FormOracle = self.forms.as_ref();
        let rng: &dyn RngOracle = self.rng.as_ref();
        let env: SwapEnv<'_> = Env::with_all(forms, rng);
        SwapEngine::new(&self.table, env)
            .with_config(self.config.clone())
            .resolve_detailed(user, anim_object)
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }
}

/// Builds a manager from process settings and runs the first load.
pub fn bootstrap(forms: Arc<dyn FormOracle>, config: &RuntimeConfig) -> (SwapManager, bool) {
    let mut manager = SwapManager::builder(forms).runtime_config(config).build();
    let loaded = manager.load_forms(&config.data_dir);
    (manager, loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swap_core::{ActorSnapshot, FormCategory, FormRecord, FormsSnapshot};

    fn forms() -> Arc<dyn FormOracle> {
        Arc::new(FormsSnapshot::from_records([
            FormRecord::new(FormId(0x10), FormCategory::Other).with_editor_id("AnimTorch"),
            FormRecord::new(FormId(0x20), FormCategory::Other).with_editor_id("TorchA"),
            FormRecord::new(FormId(0x30), FormCategory::Faction).with_editor_id("BanditFaction"),
        ]))
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn handle_is_send_sync() {
        assert_send_sync::<SwapHandle>();
    }

    #[test]
    fn missing_directory_publishes_empty_table() {
        let mut manager = SwapManager::builder(forms()).build();
        assert!(!manager.load_forms("/nonexistent/anim-swap-data"));
        assert!(manager.table().is_empty());

        let handle = manager.handle();
        assert_eq!(handle.swapped_anim_object(None, FormId(0x10)), FormId(0x10));
    }

    #[test]
    fn reload_replaces_table_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("Torch_ANIO.ini");
        std::fs::write(&rules, "[Plain]\nAnimTorch|TorchA\n").unwrap();

        let mut manager = SwapManager::builder(forms()).seed(7).build();
        assert!(manager.load_forms(dir.path()));
        let before = manager.handle();

        std::fs::write(&rules, "[Bandits|BanditFaction]\nAnimTorch|TorchA\n").unwrap();
        assert!(manager.load_forms(dir.path()));
        let after = manager.handle();

        assert_eq!(before.table().unconditional_len(), 1);
        assert_eq!(after.table().unconditional_len(), 0);
        assert_eq!(after.table().conditional_len(), 1);

        let bandit = ActorSnapshot::new(FormId(1)).with_faction(FormId(0x30));
        assert_eq!(after.swapped_anim_object(Some(&bandit), FormId(0x10)), FormId(0x20));
        assert_eq!(after.swapped_anim_object(None, FormId(0x10)), FormId(0x10));
    }

    #[test]
    fn explicit_limits_override_loader_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("anim_swap.toml"),
            "[limits]\nmax_list_depth = 2\n",
        )
        .unwrap();

        let mut manager = SwapManager::builder(forms())
            .config(SwapConfig::default().with_max_list_depth(5))
            .build();
        let stats = manager.try_load_forms(dir.path()).unwrap();
        assert_eq!(stats, LoadStats::default());
        assert_eq!(manager.handle().config.max_list_depth, 5);

        let mut manager = SwapManager::builder(forms()).build();
        manager.try_load_forms(dir.path()).unwrap();
        assert_eq!(manager.handle().config.max_list_depth, 2);
    }

    #[test]
    fn malformed_loader_config_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("anim_swap.toml"), "limits = 3").unwrap();
        std::fs::write(dir.path().join("A_ANIO.ini"), "[P]\nAnimTorch|TorchA\n").unwrap();

        let mut manager = SwapManager::builder(forms()).build();
        assert!(matches!(
            manager.try_load_forms(dir.path()),
            Err(RuntimeError::Load { .. })
        ));
        assert!(!manager.load_forms(dir.path()));
        assert!(manager.table().is_empty());
    }
}
