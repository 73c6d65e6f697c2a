use crate::form::{FormId, Sex};

/// A parsed filter reference: a resolved form, or raw text matched later as a
/// keyword name, cell name, or model-path fragment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Form(FormId),
    Text(String),
}

impl Token {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_form(&self) -> Option<FormId> {
        match self {
            Self::Form(id) => Some(*id),
            Self::Text(_) => None,
        }
    }
}

impl From<FormId> for Token {
    fn from(id: FormId) -> Self {
        Self::Form(id)
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Demographic constraints. `None` never constrains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Traits {
    pub sex: Option<Sex>,
    pub child: Option<bool>,
}

impl Traits {
    pub const fn any() -> Self {
        Self {
            sex: None,
            child: None,
        }
    }

    pub const fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub const fn with_child(mut self, child: bool) -> Self {
        self.child = Some(child);
        self
    }

    pub const fn is_unconstrained(&self) -> bool {
        self.sex.is_none() && self.child.is_none()
    }
}

/// Compound actor predicate.
///
/// | List    | Passes when                                   |
/// |---------|-----------------------------------------------|
/// | `all`   | every token matches                           |
/// | `not`   | no token matches                              |
/// | `matches` | at least one token matches                  |
/// | `any`   | at least one token matches by containment     |
///
/// Empty lists never fail their step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    pub all: Vec<Token>,
    pub not: Vec<Token>,
    pub matches: Vec<Token>,
    pub any: Vec<Token>,
    pub traits: Traits,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, token: impl Into<Token>) -> Self {
        self.all.push(token.into());
        self
    }

    pub fn exclude(mut self, token: impl Into<Token>) -> Self {
        self.not.push(token.into());
        self
    }

    pub fn match_one(mut self, token: impl Into<Token>) -> Self {
        self.matches.push(token.into());
        self
    }

    pub fn contains(mut self, token: impl Into<Token>) -> Self {
        self.any.push(token.into());
        self
    }

    pub fn with_traits(mut self, traits: Traits) -> Self {
        self.traits = traits;
        self
    }

    /// Returns true if the filter places no constraint at all.
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
            && self.not.is_empty()
            && self.matches.is_empty()
            && self.any.is_empty()
            && self.traits.is_unconstrained()
    }
}
