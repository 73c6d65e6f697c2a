//! Common error infrastructure shared by the rule model and the loaders.
//!
//! Domain-specific errors (e.g. [`RuleError`](crate::RuleError),
//! [`OracleError`](crate::OracleError)) are defined next to the code that
//! raises them. Every error enum implements [`SwapError`] so callers can pick a
//! log level or recovery strategy without matching on concrete variants.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the entry was degraded but still used (e.g. a filter
///   token kept as raw text)
/// - **Validation**: the entry was rejected and skipped
/// - **Internal**: unexpected inconsistency in host data
/// - **Fatal**: nothing can be loaded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Entry degraded but kept.
    Recoverable,

    /// Invalid input, entry skipped.
    Validation,

    /// Host data inconsistent with itself.
    Internal,

    /// Load cannot proceed at all.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or corrupted host data.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all swap errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on what happened to the entry, not on impact
pub trait SwapError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
