use swap_core::{ErrorSeverity, RuleError, SwapError};

/// Diagnostic for a configuration entry that was skipped or degraded.
///
/// None of these abort a load: the offending entry is dropped (or kept in a
/// weaker form) and compilation continues with the next one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileIssue {
    #[error("[{section}] malformed section header")]
    MalformedSection { section: String },

    #[error("[{section}] malformed key '{key}'")]
    MalformedKey { section: String, key: String },

    #[error("[{section}] base '{token}' does not resolve; key dropped")]
    UnresolvedBase { section: String, token: String },

    #[error("[{section}] swap target '{token}' for base '{base}' does not resolve")]
    UnresolvedSwap {
        section: String,
        base: String,
        token: String,
    },

    #[error("[{section}] no swap target resolved for base '{base}'")]
    EmptySwapList { section: String, base: String },

    #[error("[{section}] filter token '{token}' does not resolve; matching it as text")]
    UnresolvedFilterToken { section: String, token: String },

    #[error("[{section}] filter token '{token}' dropped: {source}")]
    InvalidFormList {
        section: String,
        token: String,
        source: RuleError,
    },

    #[error("[{section}] unknown trait '{token}'")]
    UnknownTrait { section: String, token: String },
}

impl CompileIssue {
    /// Header of the section the issue was found in.
    pub fn section(&self) -> &str {
        use CompileIssue::*;
        match self {
            MalformedSection { section }
            | MalformedKey { section, .. }
            | UnresolvedBase { section, .. }
            | UnresolvedSwap { section, .. }
            | EmptySwapList { section, .. }
            | UnresolvedFilterToken { section, .. }
            | InvalidFormList { section, .. }
            | UnknownTrait { section, .. } => section,
        }
    }
}

impl SwapError for CompileIssue {
    fn severity(&self) -> ErrorSeverity {
        use CompileIssue::*;
        match self {
            UnresolvedSwap { .. }
            | EmptySwapList { .. }
            | UnresolvedFilterToken { .. }
            | UnknownTrait { .. } => ErrorSeverity::Recoverable,
            MalformedSection { .. }
            | MalformedKey { .. }
            | UnresolvedBase { .. }
            | InvalidFormList { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use CompileIssue::*;
        match self {
            MalformedSection { .. } => "COMPILE_MALFORMED_SECTION",
            MalformedKey { .. } => "COMPILE_MALFORMED_KEY",
            UnresolvedBase { .. } => "COMPILE_UNRESOLVED_BASE",
            UnresolvedSwap { .. } => "COMPILE_UNRESOLVED_SWAP",
            EmptySwapList { .. } => "COMPILE_EMPTY_SWAP_LIST",
            UnresolvedFilterToken { .. } => "COMPILE_UNRESOLVED_FILTER_TOKEN",
            InvalidFormList { .. } => "COMPILE_INVALID_FORM_LIST",
            UnknownTrait { .. } => "COMPILE_UNKNOWN_TRAIT",
        }
    }
}

/// Outcome of compiling one rule document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Keys that contributed at least one replacement.
    pub rules_added: usize,
    pub issues: Vec<CompileIssue>,
}

impl CompileReport {
    /// Records and logs an issue. Recoverable issues log at `warn`, the rest
    /// at `error`.
    pub(crate) fn record(&mut self, issue: CompileIssue) {
        let code = issue.error_code();
        if issue.severity().is_recoverable() {
            tracing::warn!(code, "{issue}");
        } else {
            tracing::error!(code, "{issue}");
        }
        self.issues.push(issue);
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
