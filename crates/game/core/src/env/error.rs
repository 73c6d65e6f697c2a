//! Oracle access errors.

use crate::error::{ErrorSeverity, SwapError};

/// Errors that occur when accessing oracle data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// FormOracle is not available in the environment.
    #[error("FormOracle not available")]
    FormsNotAvailable,

    /// RngOracle is not available in the environment.
    #[error("RngOracle not available")]
    RngNotAvailable,
}

impl SwapError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            FormsNotAvailable => ErrorSeverity::Fatal,
            // Missing RNG only degrades selection to the first candidate
            RngNotAvailable => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            FormsNotAvailable => "ORACLE_FORMS_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
        }
    }
}
