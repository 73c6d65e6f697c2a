//! Rule compiler: turns parsed rule documents into rule-table entries.
//!
//! Sections without a filter spec feed the unconditional map. Every key of a
//! conditional section becomes its own conditional rule, sharing the section's
//! compiled filter. Trait words may appear among the filter tokens or in a
//! third header part; the last one wins. Nothing here fails a load; bad
//! entries are reported in the [`CompileReport`] and skipped.

mod issue;
mod section;

pub use issue::{CompileIssue, CompileReport};
pub use section::{FilterEntry, SectionHeader, TraitWord, apply_traits, filter_entries};

use swap_core::{
    Filter, FormCategory, FormOracle, ReplacementSet, RuleTableBuilder, SwapConfig, Token, Traits,
    validate_form_list,
};

use crate::ini::{IniDocument, IniSection};
use crate::resolver::{FormRemapper, FormResolver};

/// Compiles rule documents against a form registry.
pub struct RuleCompiler<'a, F>
where
    F: FormOracle + ?Sized,
{
    forms: &'a F,
    resolver: FormResolver<'a, F>,
    config: SwapConfig,
}

impl<'a, F> RuleCompiler<'a, F>
where
    F: FormOracle + ?Sized,
{
    pub fn new(forms: &'a F) -> Self {
        Self {
            forms,
            resolver: FormResolver::new(forms),
            config: SwapConfig::default(),
        }
    }

    pub fn with_remapper(mut self, remapper: &'a dyn FormRemapper) -> Self {
        self.resolver = self.resolver.with_remapper(remapper);
        self
    }

    pub fn with_config(mut self, config: SwapConfig) -> Self {
        self.config = config;
        self
    }

    /// Parses and compiles one rule file's contents.
    pub fn compile_str(&self, content: &str, builder: &mut RuleTableBuilder) -> CompileReport {
        self.compile(&IniDocument::parse(content), builder)
    }

    /// Compiles every section of `document`, in order, into `builder`.
    pub fn compile(&self, document: &IniDocument, builder: &mut RuleTableBuilder) -> CompileReport {
        let mut report = CompileReport::default();
        for section in &document.sections {
            self.compile_section(section, builder, &mut report);
        }
        report
    }

    fn compile_section(
        &self,
        section: &IniSection,
        builder: &mut RuleTableBuilder,
        report: &mut CompileReport,
    ) {
        let Some(header) = SectionHeader::parse(&section.name) else {
            report.record(CompileIssue::MalformedSection {
                section: section.name.clone(),
            });
            return;
        };

        let filter = header
            .filters
            .map(|spec| self.compile_filter(&section.name, spec, header.traits, report));

        for key in &section.keys {
            self.compile_key(&section.name, key, filter.as_ref(), builder, report);
        }
    }

    /// Builds the filter shared by every key of a conditional section.
    fn compile_filter(
        &self,
        section: &str,
        spec: &str,
        traits: Option<&str>,
        report: &mut CompileReport,
    ) -> Filter {
        let mut filter = Filter::new();

        for entry in filter_entries(spec) {
            match entry {
                FilterEntry::Not(text) => {
                    if self.apply_trait_word(true, text, &mut filter.traits) {
                        continue;
                    }
                    if let Some(token) = self.filter_token(section, text, report) {
                        filter.not.push(token);
                    }
                }
                FilterEntry::Any(text) => filter.any.push(Token::text(text)),
                FilterEntry::All(group) => {
                    for text in group.split('+').map(str::trim).filter(|t| !t.is_empty()) {
                        if let Some(token) = self.filter_token(section, text, report) {
                            filter.all.push(token);
                        }
                    }
                }
                FilterEntry::Match(text) => {
                    if self.apply_trait_word(false, text, &mut filter.traits) {
                        continue;
                    }
                    if let Some(token) = self.filter_token(section, text, report) {
                        filter.matches.push(token);
                    }
                }
            }
        }

        if let Some(spec) = traits {
            for token in apply_traits(&mut filter.traits, spec) {
                report.record(CompileIssue::UnknownTrait {
                    section: section.to_owned(),
                    token: token.to_owned(),
                });
            }
        }

        filter
    }

    /// Trait words written among the filter tokens (`M`, `-F`, `C`, ...)
    /// constrain the traits unless a form by that name exists.
    fn apply_trait_word(&self, negated: bool, text: &str, traits: &mut Traits) -> bool {
        match TraitWord::parse_signed(negated, text) {
            Some(word) if self.resolver.resolve(text).is_none() => {
                word.apply(traits);
                true
            }
            _ => false,
        }
    }

    /// Resolves a filter token. Unresolved text is kept as text; form lists
    /// that are cyclic or nest too deeply are dropped.
    fn filter_token(&self, section: &str, text: &str, report: &mut CompileReport) -> Option<Token> {
        let Some(id) = self.resolver.resolve(text) else {
            report.record(CompileIssue::UnresolvedFilterToken {
                section: section.to_owned(),
                token: text.to_owned(),
            });
            return Some(Token::text(text));
        };

        if self.forms.category(id) == Some(FormCategory::FormList) {
            if let Err(source) = validate_form_list(self.forms, id, self.config.max_list_depth) {
                report.record(CompileIssue::InvalidFormList {
                    section: section.to_owned(),
                    token: text.to_owned(),
                    source,
                });
                return None;
            }
        }

        Some(Token::Form(id))
    }

    fn compile_key(
        &self,
        section: &str,
        key: &str,
        filter: Option<&Filter>,
        builder: &mut RuleTableBuilder,
        report: &mut CompileReport,
    ) {
        let Some((base_token, swap_list)) = split_key(key) else {
            report.record(CompileIssue::MalformedKey {
                section: section.to_owned(),
                key: key.to_owned(),
            });
            return;
        };

        let Some(base) = self.resolver.resolve(base_token) else {
            report.record(CompileIssue::UnresolvedBase {
                section: section.to_owned(),
                token: base_token.to_owned(),
            });
            return;
        };

        let targets = self.swap_targets(section, base_token, swap_list, report);
        if targets.is_empty() {
            report.record(CompileIssue::EmptySwapList {
                section: section.to_owned(),
                base: base_token.to_owned(),
            });
            return;
        }

        match filter {
            None => {
                for target in targets.iter() {
                    builder.add_unconditional(base, target);
                }
            }
            Some(filter) => {
                if let Err(error) = builder.add_conditional(base, filter.clone(), targets) {
                    tracing::error!(section, %base, %error, "conditional rule rejected");
                    return;
                }
            }
        }

        tracing::debug!(section, %base, conditional = filter.is_some(), "rule added");
        report.rules_added += 1;
    }

    fn swap_targets(
        &self,
        section: &str,
        base_token: &str,
        swap_list: &str,
        report: &mut CompileReport,
    ) -> ReplacementSet {
        let mut targets = ReplacementSet::new();
        for token in swap_list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match self.resolver.resolve(token) {
                Some(id) => {
                    targets.insert(id);
                }
                None => report.record(CompileIssue::UnresolvedSwap {
                    section: section.to_owned(),
                    base: base_token.to_owned(),
                    token: token.to_owned(),
                }),
            }
        }
        targets
    }
}

/// Splits `base|swap,swap,...`. Exactly one `|` and a non-empty base are
/// required.
fn split_key(key: &str) -> Option<(&str, &str)> {
    let (base, swaps) = key.split_once('|')?;
    let base = base.trim();
    if base.is_empty() || swaps.contains('|') {
        return None;
    }
    Some((base, swaps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use swap_core::{FormId, FormRecord, FormsSnapshot, RuleError, RuleTable, Sex, SwapError};

    const ANIM_TORCH: FormId = FormId(0x0001_0001);
    const ANIM_POTION: FormId = FormId(0x0001_0002);
    const SWAP_A: FormId = FormId(0x0002_0001);
    const SWAP_B: FormId = FormId(0x0002_0002);
    const SWAP_C: FormId = FormId(0x0002_0003);
    const BANDITS: FormId = FormId(0x0003_0001);
    const NORD: FormId = FormId(0x0003_0002);
    const GUARDS: FormId = FormId(0x0003_0003);
    const GOOD_LIST: FormId = FormId(0x0004_0001);
    const LOOP_LIST: FormId = FormId(0x0004_0002);

    fn forms() -> FormsSnapshot {
        FormsSnapshot::from_records([
            FormRecord::new(ANIM_TORCH, FormCategory::Other)
                .with_editor_id("BaseId")
                .with_source("Skyrim.esm", 0x10001),
            FormRecord::new(ANIM_POTION, FormCategory::Other).with_editor_id("AnimPotion"),
            FormRecord::new(SWAP_A, FormCategory::Other)
                .with_editor_id("SwapId1")
                .with_source("Torches.esp", 0x801),
            FormRecord::new(SWAP_B, FormCategory::Other).with_editor_id("SwapId2"),
            FormRecord::new(SWAP_C, FormCategory::Other).with_editor_id("SwapId3"),
            FormRecord::new(BANDITS, FormCategory::Faction).with_editor_id("FactionBandits"),
            FormRecord::new(NORD, FormCategory::Race).with_editor_id("NordRace"),
            FormRecord::new(GUARDS, FormCategory::Faction).with_editor_id("GuardFaction"),
            FormRecord::new(GOOD_LIST, FormCategory::FormList)
                .with_editor_id("GoodList")
                .with_members([BANDITS, GUARDS]),
            FormRecord::new(LOOP_LIST, FormCategory::FormList)
                .with_editor_id("LoopList")
                .with_members([LOOP_LIST]),
        ])
    }

    fn compile(content: &str) -> (RuleTable, CompileReport) {
        let forms = forms();
        let compiler = RuleCompiler::new(&forms);
        let mut builder = RuleTable::builder();
        let report = compiler.compile_str(content, &mut builder);
        (builder.build(), report)
    }

    #[test]
    fn conditional_section_round_trip() {
        let (table, report) = compile("[ANIO|-FactionBandits,*Steel,M]\nBaseId|SwapId1,SwapId2\n");

        assert!(report.is_clean(), "{:?}", report.issues);
        assert_eq!(report.rules_added, 1);
        assert!(table.unconditional(ANIM_TORCH).is_none());

        let rules = table.conditional(ANIM_TORCH);
        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.filter.not, vec![Token::Form(BANDITS)]);
        assert_eq!(rule.filter.any, vec![Token::text("Steel")]);
        assert!(rule.filter.all.is_empty());
        assert!(rule.filter.matches.is_empty());
        assert_eq!(rule.filter.traits.sex, Some(Sex::Male));
        assert_eq!(rule.filter.traits.child, None);
        assert_eq!(rule.replacements.len(), 2);
        assert!(rule.replacements.contains(SWAP_A));
        assert!(rule.replacements.contains(SWAP_B));
    }

    #[test]
    fn unresolvable_base_drops_the_key() {
        let (table, report) = compile("[Plain]\nMissingBase|SwapId1\n[Cond|NordRace]\nMissingBase|SwapId2\n");

        assert!(table.is_empty());
        assert_eq!(report.rules_added, 0);
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues.iter().all(|issue| matches!(
            issue,
            CompileIssue::UnresolvedBase { token, .. } if token == "MissingBase"
        )));
    }

    #[test]
    fn unconditional_targets_union_across_sections() {
        let (table, report) = compile(
            "[First]\nBaseId|SwapId1\nBaseId|SwapId1,SwapId2\n[Second]\n0x10001~Skyrim.esm|SwapId3\n",
        );

        assert_eq!(report.rules_added, 3);
        let set = table.unconditional(ANIM_TORCH).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(SWAP_C));
    }

    #[test]
    fn unresolved_swaps_are_dropped_individually() {
        let (table, report) = compile("[Cond|NordRace]\nBaseId|SwapId1,Nope,801~Torches.esp\n");

        let rules = table.conditional(ANIM_TORCH);
        assert_eq!(rules.len(), 1);
        // SwapId1 and 801~Torches.esp name the same form
        assert_eq!(rules[0].replacements.len(), 1);
        assert_eq!(
            report.issues,
            vec![CompileIssue::UnresolvedSwap {
                section: "Cond|NordRace".into(),
                base: "BaseId".into(),
                token: "Nope".into(),
            }]
        );
    }

    #[test]
    fn key_with_no_resolvable_swaps_inserts_nothing() {
        let (table, report) = compile("[Plain]\nBaseId|Nope,AlsoNope\n[Cond|NordRace]\nBaseId|\n");

        assert!(table.is_empty());
        assert_eq!(report.rules_added, 0);
        let empty = report
            .issues
            .iter()
            .filter(|issue| matches!(issue, CompileIssue::EmptySwapList { .. }))
            .count();
        assert_eq!(empty, 2);
    }

    #[test]
    fn each_conditional_key_is_its_own_rule_in_declaration_order() {
        let (table, _) = compile(
            "[A|FactionBandits]\nBaseId|SwapId1\nBaseId|SwapId2\n[B|GuardFaction]\nBaseId|SwapId3\n",
        );

        let rules = table.conditional(ANIM_TORCH);
        assert_eq!(rules.len(), 3);
        assert!(rules[0].replacements.contains(SWAP_A));
        assert!(rules[1].replacements.contains(SWAP_B));
        assert!(rules[2].replacements.contains(SWAP_C));
        assert_eq!(rules[2].filter.matches, vec![Token::Form(GUARDS)]);
    }

    #[test]
    fn plus_groups_feed_all_and_bare_tokens_feed_match() {
        let (table, _) = compile("[Group|NordRace+FactionBandits,GuardFaction]\nBaseId|SwapId1\n");

        let filter = &table.conditional(ANIM_TORCH)[0].filter;
        assert_eq!(filter.all, vec![Token::Form(NORD), Token::Form(BANDITS)]);
        assert_eq!(filter.matches, vec![Token::Form(GUARDS)]);
    }

    #[test]
    fn unresolved_filter_tokens_fall_back_to_text() {
        let (table, report) = compile("[Cond|VendorKeyword,-Meshes\\Torch.nif]\nBaseId|SwapId1\n");

        let filter = &table.conditional(ANIM_TORCH)[0].filter;
        assert_eq!(filter.matches, vec![Token::text("VendorKeyword")]);
        assert_eq!(filter.not, vec![Token::text("Meshes\\Torch.nif")]);
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues.iter().all(|issue| issue.severity().is_recoverable()));
    }

    #[test]
    fn any_tokens_are_never_resolved() {
        let (table, report) = compile("[Cond|*FactionBandits]\nBaseId|SwapId1\n");

        let filter = &table.conditional(ANIM_TORCH)[0].filter;
        assert_eq!(filter.any, vec![Token::text("FactionBandits")]);
        assert!(report.is_clean());
    }

    #[test]
    fn empty_or_none_filter_spec_is_still_conditional() {
        let (table, report) = compile("[Always|NONE|F]\nBaseId|SwapId1\n[Empty|]\nAnimPotion|SwapId2\n");

        assert!(report.is_clean());
        assert!(table.unconditional(ANIM_TORCH).is_none());
        let torch = &table.conditional(ANIM_TORCH)[0].filter;
        assert_eq!(torch.traits.sex, Some(Sex::Female));
        assert!(table.conditional(ANIM_POTION)[0].filter.is_empty());
    }

    #[test]
    fn cyclic_form_lists_are_rejected() {
        let (table, report) = compile("[Lists|GoodList,LoopList]\nBaseId|SwapId1\n");

        let filter = &table.conditional(ANIM_TORCH)[0].filter;
        assert_eq!(filter.matches, vec![Token::Form(GOOD_LIST)]);
        assert_eq!(
            report.issues,
            vec![CompileIssue::InvalidFormList {
                section: "Lists|GoodList,LoopList".into(),
                token: "LoopList".into(),
                source: RuleError::CyclicFormList { list: LOOP_LIST },
            }]
        );
        assert_eq!(report.issues[0].error_code(), "COMPILE_INVALID_FORM_LIST");
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let (table, report) = compile(
            "[Bad|a|b|c]\nBaseId|SwapId1\n[Good]\nno separator\n|SwapId1\nBaseId|SwapId1|SwapId2\nAnimPotion|SwapId2\n",
        );

        assert_eq!(report.rules_added, 1);
        assert!(table.unconditional(ANIM_TORCH).is_none());
        assert!(table.unconditional(ANIM_POTION).is_some());

        let codes: Vec<_> = report.issues.iter().map(|issue| issue.error_code()).collect();
        assert_eq!(
            codes,
            vec![
                "COMPILE_MALFORMED_SECTION",
                "COMPILE_MALFORMED_KEY",
                "COMPILE_MALFORMED_KEY",
                "COMPILE_MALFORMED_KEY",
            ]
        );
        assert_eq!(report.issues[0].section(), "Bad|a|b|c");
    }

    #[test]
    fn unknown_traits_are_reported_and_ignored() {
        let (table, report) = compile("[Kids|NordRace|C,Elder]\nBaseId|SwapId1\n");

        let traits = table.conditional(ANIM_TORCH)[0].filter.traits;
        assert_eq!(traits.child, Some(true));
        assert_eq!(traits.sex, None);
        assert_eq!(
            report.issues,
            vec![CompileIssue::UnknownTrait {
                section: "Kids|NordRace|C,Elder".into(),
                token: "Elder".into(),
            }]
        );
    }

    #[test]
    fn form_list_depth_follows_config() {
        let forms = FormsSnapshot::from_records([
            FormRecord::new(ANIM_TORCH, FormCategory::Other).with_editor_id("BaseId"),
            FormRecord::new(SWAP_A, FormCategory::Other).with_editor_id("SwapId1"),
            FormRecord::new(FormId(1), FormCategory::FormList)
                .with_editor_id("Outer")
                .with_members([FormId(2)]),
            FormRecord::new(FormId(2), FormCategory::FormList)
                .with_editor_id("Inner")
                .with_members([FormId(3)]),
            FormRecord::new(FormId(3), FormCategory::FormList).with_editor_id("Leaf"),
        ]);
        let content = "[Deep|Outer]\nBaseId|SwapId1\n";

        let mut builder = RuleTable::builder();
        let report = RuleCompiler::new(&forms)
            .with_config(SwapConfig::default().with_max_list_depth(1))
            .compile_str(content, &mut builder);
        assert!(matches!(
            report.issues.as_slice(),
            [CompileIssue::InvalidFormList {
                source: RuleError::FormListTooDeep { .. },
                ..
            }]
        ));
        assert!(builder.build().conditional(ANIM_TORCH)[0].filter.matches.is_empty());

        let mut builder = RuleTable::builder();
        let report = RuleCompiler::new(&forms).compile_str(content, &mut builder);
        assert!(report.is_clean());
    }

    #[test]
    fn trait_words_in_filter_spec_set_traits() {
        let (table, report) = compile("[Women|F,NordRace,-C]\nBaseId|SwapId1\n[Men|F,NordRace|-F]\nAnimPotion|SwapId2\n");

        assert!(report.is_clean(), "{:?}", report.issues);
        let women = &table.conditional(ANIM_TORCH)[0].filter;
        assert_eq!(women.traits, Traits::any().with_sex(Sex::Female).with_child(false));
        assert_eq!(women.matches, vec![Token::Form(NORD)]);
        assert!(women.not.is_empty());

        // The third header part is applied last
        let men = &table.conditional(ANIM_POTION)[0].filter;
        assert_eq!(men.traits.sex, Some(Sex::Male));
    }

    #[test]
    fn trait_word_naming_a_form_stays_a_form() {
        let forms = FormsSnapshot::from_records([
            FormRecord::new(ANIM_TORCH, FormCategory::Other).with_editor_id("BaseId"),
            FormRecord::new(SWAP_A, FormCategory::Other).with_editor_id("SwapId1"),
            FormRecord::new(BANDITS, FormCategory::Faction).with_editor_id("M"),
        ]);
        let mut builder = RuleTable::builder();
        let report = RuleCompiler::new(&forms).compile_str("[Cond|M]\nBaseId|SwapId1\n", &mut builder);

        assert!(report.is_clean());
        let built = builder.build();
        let filter = &built.conditional(ANIM_TORCH)[0].filter;
        assert_eq!(filter.matches, vec![Token::Form(BANDITS)]);
        assert!(filter.traits.is_unconstrained());
    }

    #[test]
    fn plus_group_is_checked_before_markers() {
        let (table, report) = compile("[X|-FactionBandits+NordRace]\nBaseId|SwapId1\n");

        let filter = &table.conditional(ANIM_TORCH)[0].filter;
        assert!(filter.not.is_empty());
        assert_eq!(filter.all, vec![Token::text("-FactionBandits"), Token::Form(NORD)]);
        assert_eq!(
            report.issues,
            vec![CompileIssue::UnresolvedFilterToken {
                section: "X|-FactionBandits+NordRace".into(),
                token: "-FactionBandits".into(),
            }]
        );
    }
}
