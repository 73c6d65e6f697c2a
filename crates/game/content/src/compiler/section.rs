//! Section header grammar: `Name`, `Name|Filters`, or `Name|Filters|Traits`.

use swap_core::{Sex, Traits};

/// Split form of a section header. Parts are trimmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionHeader<'s> {
    pub name: &'s str,
    /// `None` for an unconditional section.
    pub filters: Option<&'s str>,
    pub traits: Option<&'s str>,
}

impl<'s> SectionHeader<'s> {
    /// Returns `None` for headers with more than three parts.
    pub fn parse(header: &'s str) -> Option<Self> {
        let mut parts = header.split('|').map(str::trim);
        let name = parts.next().unwrap_or_default();
        let filters = parts.next();
        let traits = parts.next();
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            name,
            filters,
            traits,
        })
    }

    pub fn is_conditional(&self) -> bool {
        self.filters.is_some()
    }
}

/// One classified filter token, markers stripped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterEntry<'s> {
    /// `-Token`
    Not(&'s str),
    /// `*Text`, kept as raw text.
    Any(&'s str),
    /// `A+B+C`. Checked before the `-` and `*` markers, so sub-tokens
    /// keep any marker as part of their text.
    All(&'s str),
    Match(&'s str),
}

/// Classifies the comma-separated tokens of a filter spec.
///
/// `NONE` (any case) and an empty spec yield nothing. Empty tokens are
/// skipped.
pub fn filter_entries(spec: &str) -> Vec<FilterEntry<'_>> {
    if is_none(spec) {
        return Vec::new();
    }
    spec.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let entry = if token.contains('+') {
                FilterEntry::All(token)
            } else if let Some(rest) = token.strip_prefix('-') {
                FilterEntry::Not(rest.trim())
            } else if let Some(rest) = token.strip_prefix('*') {
                FilterEntry::Any(rest.trim())
            } else {
                FilterEntry::Match(token)
            };
            (!entry.text().is_empty()).then_some(entry)
        })
        .collect()
}

impl<'s> FilterEntry<'s> {
    pub fn text(&self) -> &'s str {
        match *self {
            Self::Not(text) | Self::Any(text) | Self::All(text) | Self::Match(text) => text,
        }
    }
}

/// One demographic constraint word: `M`, `F`, `C`, or one of those negated
/// with a leading `-`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraitWord {
    Sex(Sex),
    Child(bool),
}

impl TraitWord {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().strip_prefix('-') {
            Some(word) => Self::parse_signed(true, word),
            None => Self::parse_signed(false, token),
        }
    }

    /// `-F` reads as male and `-M` as female.
    pub fn parse_signed(negated: bool, word: &str) -> Option<Self> {
        let word = word.trim();
        let word = if word.eq_ignore_ascii_case("M") {
            'M'
        } else if word.eq_ignore_ascii_case("F") {
            'F'
        } else if word.eq_ignore_ascii_case("C") {
            'C'
        } else {
            return None;
        };
        Some(match (word, negated) {
            ('M', false) | ('F', true) => Self::Sex(Sex::Male),
            ('F', false) | ('M', true) => Self::Sex(Sex::Female),
            (_, negated) => Self::Child(!negated),
        })
    }

    pub fn apply(self, traits: &mut Traits) {
        match self {
            Self::Sex(sex) => traits.sex = Some(sex),
            Self::Child(child) => traits.child = Some(child),
        }
    }
}

/// Applies a trait spec on top of `traits`. Later words override earlier
/// ones, including words already applied.
///
/// Returns every token that was not understood.
pub fn apply_traits<'s>(traits: &mut Traits, spec: &'s str) -> Vec<&'s str> {
    let mut unknown = Vec::new();
    if is_none(spec) {
        return unknown;
    }

    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match TraitWord::parse(token) {
            Some(word) => word.apply(traits),
            None if token.eq_ignore_ascii_case("NONE") => {}
            None => unknown.push(token),
        }
    }
    unknown
}

fn is_none(spec: &str) -> bool {
    let spec = spec.trim();
    spec.is_empty() || spec.eq_ignore_ascii_case("NONE")
}
