//! Resolution engine: picks the form to attach for an actor and base form.
//!
//! Order of precedence for a base form:
//! 1. the first conditional rule whose filter passes (skipped without an actor)
//! 2. the unconditional replacement set
//! 3. the base form itself
//!
//! A selected set with more than one member yields a uniformly random member
//! on every call. The chosen form is never looked up again; indirection is
//! one hop.

use tracing::trace;

use crate::config::SwapConfig;
use crate::env::{ActorView, SwapEnv};
use crate::filter::FilterEvaluator;
use crate::form::FormId;
use crate::rules::{ReplacementSet, RuleTable};

/// Outcome of a lookup, with the rule that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Conditional rule at index `rule` (declaration order) matched.
    Conditional { rule: usize, form: FormId },
    /// Unconditional set applied.
    Unconditional { form: FormId },
    /// No rule applied; the base form is kept.
    Unchanged(FormId),
}

impl Resolution {
    /// Form to attach.
    pub const fn form(self) -> FormId {
        match self {
            Self::Conditional { form, .. } | Self::Unconditional { form } | Self::Unchanged(form) => {
                form
            }
        }
    }

    pub const fn is_swapped(self) -> bool {
        !matches!(self, Self::Unchanged(_))
    }
}

/// Read-only resolver over a published [`RuleTable`].
///
/// Holds only shared references, so any number of engines may run
/// concurrently against the same table.
pub struct SwapEngine<'a> {
    table: &'a RuleTable,
    env: SwapEnv<'a>,
    config: SwapConfig,
}

impl<'a> SwapEngine<'a> {
    pub fn new(table: &'a RuleTable, env: SwapEnv<'a>) -> Self {
        Self {
            table,
            env,
            config: SwapConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SwapConfig) -> Self {
        self.config = config;
        self
    }

    /// Form to attach in place of `base`. Total: never fails.
    pub fn resolve(&self, actor: Option<&dyn ActorView>, base: FormId) -> FormId {
        self.resolve_detailed(actor, base).form()
    }

    /// Like [`resolve`](Self::resolve), reporting which rule applied.
    pub fn resolve_detailed(&self, actor: Option<&dyn ActorView>, base: FormId) -> Resolution {
        let conditional = self
            .conditional_match(actor, base)
            .and_then(|(rule, set)| Some((rule, self.select(set)?)));
        if let Some((rule, form)) = conditional {
            trace!(%base, %form, rule, "conditional swap");
            return Resolution::Conditional { rule, form };
        }

        if let Some(form) = self
            .table
            .unconditional(base)
            .and_then(|set| self.select(set))
        {
            trace!(%base, %form, "unconditional swap");
            return Resolution::Unconditional { form };
        }

        Resolution::Unchanged(base)
    }

    fn conditional_match(
        &self,
        actor: Option<&dyn ActorView>,
        base: FormId,
    ) -> Option<(usize, &'a ReplacementSet)> {
        let rules = self.table.conditional(base);
        if rules.is_empty() {
            return None;
        }
        let actor = actor?;
        let forms = match self.env.forms() {
            Ok(forms) => forms,
            Err(error) => {
                trace!(%base, %error, "skipping conditional rules");
                return None;
            }
        };

        let evaluator = FilterEvaluator::new(forms, &self.config);
        rules
            .iter()
            .enumerate()
            .find(|(_, rule)| evaluator.passes(actor, &rule.filter))
            .map(|(index, rule)| (index, &rule.replacements))
    }

    /// Single member: that member. Several: a uniform pick, or the first
    /// member when no random source is available.
    fn select(&self, set: &ReplacementSet) -> Option<FormId> {
        match set.len() {
            0 => None,
            1 => set.get(0),
            len => {
                let index = self.env.rng().map(|rng| rng.pick(len)).unwrap_or(0);
                set.get(index)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ActorSnapshot, Env, FormRecord, FormsSnapshot, PcgRng, RngOracle};
    use crate::form::FormCategory;
    use crate::rules::{Filter, Token};

    const BASE: FormId = FormId(0x10);
    const BANDITS: FormId = FormId(0x20);
    const NORD: FormId = FormId(0x21);

    /// Always returns the same index.
    struct FixedRng(u32);

    impl RngOracle for FixedRng {
        fn next_u32(&self) -> u32 {
            self.0
        }

        fn pick(&self, len: usize) -> usize {
            self.0 as usize % len
        }
    }

    fn forms() -> FormsSnapshot {
        FormsSnapshot::from_records([
            FormRecord::new(BANDITS, FormCategory::Faction).with_editor_id("BanditFaction"),
            FormRecord::new(NORD, FormCategory::Race).with_editor_id("NordRace"),
        ])
    }

    fn set(ids: &[u32]) -> ReplacementSet {
        ids.iter().copied().map(FormId).collect()
    }

    fn table() -> RuleTable {
        let mut builder = RuleTable::builder();
        builder
            .add_conditional(BASE, Filter::new().match_one(BANDITS), set(&[0x100]))
            .unwrap();
        builder
            .add_conditional(BASE, Filter::new().match_one(NORD), set(&[0x200]))
            .unwrap();
        builder.add_unconditional(BASE, FormId(0x300));
        builder.build()
    }

    #[test]
    fn absent_base_is_unchanged() {
        let table = table();
        let forms = forms();
        let rng = PcgRng::new(1);
        let engine = SwapEngine::new(&table, Env::with_all(&forms, &rng).as_swap_env());
        let actor = ActorSnapshot::new(FormId(1));

        assert_eq!(engine.resolve(Some(&actor), FormId(0x99)), FormId(0x99));
        assert_eq!(engine.resolve(None, FormId(0x99)), FormId(0x99));
    }

    #[test]
    fn first_passing_rule_wins() {
        let table = table();
        let forms = forms();
        let rng = PcgRng::new(1);
        let engine = SwapEngine::new(&table, Env::with_all(&forms, &rng).as_swap_env());

        let nord_bandit = ActorSnapshot::new(FormId(1))
            .with_faction(BANDITS)
            .with_race(NORD);
        assert_eq!(
            engine.resolve_detailed(Some(&nord_bandit), BASE),
            Resolution::Conditional {
                rule: 0,
                form: FormId(0x100)
            }
        );

        let nord = ActorSnapshot::new(FormId(1)).with_race(NORD);
        assert_eq!(
            engine.resolve_detailed(Some(&nord), BASE),
            Resolution::Conditional {
                rule: 1,
                form: FormId(0x200)
            }
        );
    }

    #[test]
    fn falls_back_to_unconditional() {
        let table = table();
        let forms = forms();
        let rng = PcgRng::new(1);
        let engine = SwapEngine::new(&table, Env::with_all(&forms, &rng).as_swap_env());

        let stranger = ActorSnapshot::new(FormId(1));
        assert_eq!(
            engine.resolve_detailed(Some(&stranger), BASE),
            Resolution::Unconditional { form: FormId(0x300) }
        );
        // No actor: conditional rules are skipped entirely
        assert_eq!(engine.resolve(None, BASE), FormId(0x300));
    }

    #[test]
    fn missing_form_oracle_skips_conditionals() {
        let table = table();
        let rng = PcgRng::new(1);
        let env: SwapEnv<'_> = Env::new(None, Some(&rng as &dyn RngOracle));
        let engine = SwapEngine::new(&table, env);

        let bandit = ActorSnapshot::new(FormId(1)).with_faction(BANDITS);
        assert_eq!(engine.resolve(Some(&bandit), BASE), FormId(0x300));
    }

    #[test]
    fn conditional_only_base_without_match_is_unchanged() {
        let mut builder = RuleTable::builder();
        builder
            .add_conditional(BASE, Filter::new().match_one(Token::text("Nope")), set(&[0x100]))
            .unwrap();
        let table = builder.build();
        let forms = forms();
        let rng = PcgRng::new(1);
        let engine = SwapEngine::new(&table, Env::with_all(&forms, &rng).as_swap_env());

        let actor = ActorSnapshot::new(FormId(1));
        assert_eq!(engine.resolve_detailed(Some(&actor), BASE), Resolution::Unchanged(BASE));
    }

    #[test]
    fn multi_member_set_uses_injected_rng() {
        let mut builder = RuleTable::builder();
        builder
            .add_unconditional(BASE, FormId(0xA))
            .add_unconditional(BASE, FormId(0xB))
            .add_unconditional(BASE, FormId(0xC));
        let table = builder.build();
        let forms = forms();

        let rng = FixedRng(2);
        let engine = SwapEngine::new(&table, Env::with_all(&forms, &rng).as_swap_env());
        assert_eq!(engine.resolve(None, BASE), FormId(0xC));

        // Without a random source the first candidate is used
        let env: SwapEnv<'_> = Env::new(Some(&forms as &dyn crate::env::FormOracle), None);
        let engine = SwapEngine::new(&table, env);
        assert_eq!(engine.resolve(None, BASE), FormId(0xA));
    }

    #[test]
    fn random_selection_is_uniform_and_not_memoized() {
        let mut builder = RuleTable::builder();
        builder
            .add_unconditional(BASE, FormId(0xA))
            .add_unconditional(BASE, FormId(0xB));
        let table = builder.build();
        let forms = forms();
        let rng = PcgRng::new(0x5EED);
        let engine = SwapEngine::new(&table, Env::with_all(&forms, &rng).as_swap_env());

        let trials = 20_000;
        let picked_a = (0..trials)
            .filter(|_| engine.resolve(None, BASE) == FormId(0xA))
            .count();
        // Expected 10_000; allow 5% drift.
        assert!((9_500..=10_500).contains(&picked_a), "picked_a {picked_a}");
    }

    #[test]
    fn chosen_form_is_not_resolved_again() {
        let mut builder = RuleTable::builder();
        builder
            .add_unconditional(FormId(1), FormId(2))
            .add_unconditional(FormId(2), FormId(3));
        let table = builder.build();
        let forms = forms();
        let rng = PcgRng::new(1);
        let engine = SwapEngine::new(&table, Env::with_all(&forms, &rng).as_swap_env());

        assert_eq!(engine.resolve(None, FormId(1)), FormId(2));
    }
}
