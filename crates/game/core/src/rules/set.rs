use crate::form::FormId;

/// Unique replacement candidates for one base form under one rule.
///
/// Order carries no meaning but is kept stable so a seeded random source
/// picks reproducibly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplacementSet {
    forms: Vec<FormId>,
}

impl ReplacementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate. Returns false if it was already present.
    pub fn insert(&mut self, form: FormId) -> bool {
        if self.forms.contains(&form) {
            return false;
        }
        self.forms.push(form);
        true
    }

    pub fn contains(&self, form: FormId) -> bool {
        self.forms.contains(&form)
    }

    pub fn get(&self, index: usize) -> Option<FormId> {
        self.forms.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = FormId> + '_ {
        self.forms.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl FromIterator<FormId> for ReplacementSet {
    fn from_iter<I: IntoIterator<Item = FormId>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<FormId> for ReplacementSet {
    fn extend<I: IntoIterator<Item = FormId>>(&mut self, iter: I) {
        for form in iter {
            self.insert(form);
        }
    }
}
