//! Logging setup.
//!
//! Installs a global `tracing` subscriber: an [`EnvFilter`] (from `RUST_LOG`,
//! falling back to the configured directive) and one `fmt` layer writing either
//! to `anim_swap.log` in a log directory or to stderr.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};

/// Log file name inside the log directory.
pub const LOG_FILE: &str = "anim_swap.log";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub log_dir: Option<PathBuf>,
    /// Used when `RUST_LOG` is unset or invalid.
    pub default_directive: String,
}

impl LogConfig {
    pub const DEFAULT_DIRECTIVE: &'static str = "info";
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            default_directive: Self::DEFAULT_DIRECTIVE.to_owned(),
        }
    }
}

impl From<&RuntimeConfig> for LogConfig {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            log_dir: config.log_dir.clone(),
            ..Self::default()
        }
    }
}

/// Installs the global subscriber.
///
/// Returns `Ok(false)` if a subscriber was already installed, by this
/// function or anyone else; the existing one is kept.
pub fn init_logging(config: &LogConfig) -> Result<bool> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));

    let installed = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| RuntimeError::LogDirectory {
                path: dir.clone(),
                source,
            })?;

            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);

            let installed = tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .try_init()
                .is_ok();
            if installed {
                // Leak the guard to keep file writer alive
                std::mem::forget(guard);
            }
            installed
        }
        None => {
            let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .try_init()
                .is_ok()
        }
    };

    if installed {
        match &config.log_dir {
            Some(dir) => tracing::info!("Log file: {}", dir.join(LOG_FILE).display()),
            None => tracing::info!("Logging to stderr"),
        }
    }
    Ok(installed)
}
