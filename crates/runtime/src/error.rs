use std::path::PathBuf;

use swap_core::{ErrorSeverity, SwapError};

/// Runtime errors
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Rule files, loader config, or merge maps could not be read
    #[error("failed to load swap rules from {}: {source:#}", dir.display())]
    Load {
        dir: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Log directory could not be created
    #[error("failed to create log directory {}: {source}", path.display())]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SwapError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Load { .. } => ErrorSeverity::Recoverable,
            Self::LogDirectory { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } => "RUNTIME_LOAD_FAILED",
            Self::LogDirectory { .. } => "RUNTIME_LOG_DIRECTORY",
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
