use std::collections::HashMap;

use super::{Filter, ReplacementSet, RuleError};
use crate::form::FormId;

/// A filter guarding one replacement set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionalRule {
    pub filter: Filter,
    pub replacements: ReplacementSet,
}

impl ConditionalRule {
    pub fn new(filter: Filter, replacements: ReplacementSet) -> Self {
        Self {
            filter,
            replacements,
        }
    }
}

/// Immutable mapping from base forms to their replacement rules.
///
/// A base may appear in both maps; conditional rules are consulted first, in
/// declaration order. The table is `Send + Sync` and shared read-only once
/// built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleTable {
    unconditional: HashMap<FormId, ReplacementSet>,
    conditional: HashMap<FormId, Vec<ConditionalRule>>,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    /// Empty table: every lookup falls back to the original form.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn unconditional(&self, base: FormId) -> Option<&ReplacementSet> {
        self.unconditional.get(&base)
    }

    /// Conditional rules for a base, in priority order.
    pub fn conditional(&self, base: FormId) -> &[ConditionalRule] {
        self.conditional
            .get(&base)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn unconditional_entries(&self) -> impl Iterator<Item = (FormId, &ReplacementSet)> {
        self.unconditional.iter().map(|(base, set)| (*base, set))
    }

    pub fn conditional_entries(&self) -> impl Iterator<Item = (FormId, &[ConditionalRule])> {
        self.conditional
            .iter()
            .map(|(base, rules)| (*base, rules.as_slice()))
    }

    /// Number of bases with an unconditional set.
    pub fn unconditional_len(&self) -> usize {
        self.unconditional.len()
    }

    /// Number of bases with at least one conditional rule.
    pub fn conditional_len(&self) -> usize {
        self.conditional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unconditional.is_empty() && self.conditional.is_empty()
    }
}

/// Single-writer builder used during the load phase.
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    table: RuleTable,
}

impl RuleTableBuilder {
    /// Unions a target into the unconditional set of `base`.
    pub fn add_unconditional(&mut self, base: FormId, target: FormId) -> &mut Self {
        self.table
            .unconditional
            .entry(base)
            .or_default()
            .insert(target);
        self
    }

    /// Appends a conditional rule after every rule already declared for `base`.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::EmptyReplacementSet` if `replacements` is empty; the
    /// table is left unchanged.
    pub fn add_conditional(
        &mut self,
        base: FormId,
        filter: Filter,
        replacements: ReplacementSet,
    ) -> Result<&mut Self, RuleError> {
        if replacements.is_empty() {
            return Err(RuleError::EmptyReplacementSet { base });
        }
        self.table
            .conditional
            .entry(base)
            .or_default()
            .push(ConditionalRule::new(filter, replacements));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn build(self) -> RuleTable {
        self.table
    }
}
