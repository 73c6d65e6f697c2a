//! Runtime configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Where rules are loaded from and how the runtime is wired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    /// Log to `anim_swap.log` in this directory instead of stderr.
    pub log_dir: Option<PathBuf>,
    /// Use a seeded deterministic generator instead of the thread-local one.
    pub rng_seed: Option<u64>,
}

impl RuntimeConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "Data";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_dir: None,
            rng_seed: None,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SWAP_DATA_DIR` - Directory holding rule files (default: `Data`)
    /// - `SWAP_LOG_DIR` - Directory for the log file (default: log to stderr)
    /// - `SWAP_RNG_SEED` - Seed for deterministic selection (default: unseeded)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = env::var_os("SWAP_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.log_dir = env::var_os("SWAP_LOG_DIR").map(PathBuf::from);
        config.rng_seed = read_env::<u64>("SWAP_RNG_SEED");

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DATA_DIR)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
