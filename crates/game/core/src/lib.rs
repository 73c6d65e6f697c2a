//! Rule model and evaluation for animation object swaps.
//!
//! `swap-core` defines the compiled rule table, the read-only oracle traits
//! describing the host's registry and actors, the filter evaluator, and the
//! resolution engine. It performs no I/O: tables are built by `swap-content`
//! and published to callers by `swap-runtime`.
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod filter;
pub mod form;
pub mod rules;

pub use config::SwapConfig;
pub use engine::{Resolution, SwapEngine};
pub use env::{
    ActorSnapshot, ActorView, Env, FormOracle, FormRecord, FormsSnapshot, OracleError, PcgRng,
    RngOracle, SwapEnv,
};
pub use error::{ErrorSeverity, SwapError};
pub use filter::FilterEvaluator;
pub use form::{FormCategory, FormId, Sex};
pub use rules::{
    ConditionalRule, Filter, ReplacementSet, RuleError, RuleTable, RuleTableBuilder, Token,
    Traits, validate_form_list,
};
