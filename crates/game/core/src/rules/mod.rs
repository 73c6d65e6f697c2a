//! Compiled swap rules.
//!
//! A rule table maps a base form to the forms that may replace it:
//! - an unconditional [`ReplacementSet`] that always applies when reached
//! - an ordered list of [`ConditionalRule`]s, each guarded by a [`Filter`]
//!
//! Tables are built once by the loaders through [`RuleTableBuilder`] and are
//! immutable afterwards.
mod error;
mod filter;
mod lists;
mod set;
mod table;

pub use error::RuleError;
pub use filter::{Filter, Token, Traits};
pub use lists::validate_form_list;
pub use set::ReplacementSet;
pub use table::{ConditionalRule, RuleTable, RuleTableBuilder};
