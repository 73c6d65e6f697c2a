use crate::error::{ErrorSeverity, SwapError};
use crate::form::FormId;

/// Errors raised while assembling a rule table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// A conditional rule was added without any replacement target.
    #[error("rule for base {base} has no replacement targets")]
    EmptyReplacementSet { base: FormId },

    /// A form list contains itself, directly or through nested lists.
    #[error("form list {list} contains itself")]
    CyclicFormList { list: FormId },

    /// Form lists are nested deeper than the configured bound.
    #[error("form list {list} nests deeper than {max_depth} levels")]
    FormListTooDeep { list: FormId, max_depth: u32 },
}

impl SwapError for RuleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use RuleError::*;
        match self {
            EmptyReplacementSet { .. } => "RULE_EMPTY_REPLACEMENT_SET",
            CyclicFormList { .. } => "RULE_CYCLIC_FORM_LIST",
            FormListTooDeep { .. } => "RULE_FORM_LIST_TOO_DEEP",
        }
    }
}
