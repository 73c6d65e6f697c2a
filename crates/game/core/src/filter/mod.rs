//! Filter evaluation against a single actor.
//!
//! [`FilterEvaluator`] is a pure function of the host data it reads: it never
//! mutates the actor and keeps no state between calls. Identifier tokens are
//! dispatched on their [`FormCategory`]; text tokens are matched against
//! keyword names, the current cell, or inventory model paths.
//!
//! # Composition
//!
//! [`FilterEvaluator::passes`] short-circuits left to right:
//! 1. `all`: every token must match
//! 2. `not`: no token may match
//! 3. `matches`: at least one token must match
//! 4. `any`: at least one token must match by containment
//! 5. sex constraint
//! 6. child constraint
mod text;

pub use text::{icontains, is_path_pattern};

use crate::config::SwapConfig;
use crate::env::{ActorView, FormOracle};
use crate::form::{FormCategory, FormId};
use crate::rules::{Filter, Token};

/// Evaluates filters against actors using a form oracle.
pub struct FilterEvaluator<'a, F>
where
    F: FormOracle + ?Sized,
{
    forms: &'a F,
    max_list_depth: u32,
    max_location_depth: u32,
}

impl<'a, F> FilterEvaluator<'a, F>
where
    F: FormOracle + ?Sized,
{
    pub fn new(forms: &'a F, config: &SwapConfig) -> Self {
        Self {
            forms,
            max_list_depth: config.max_list_depth,
            max_location_depth: config.max_location_depth,
        }
    }

    /// Returns true if `actor` satisfies every part of `filter`.
    pub fn passes<A>(&self, actor: &A, filter: &Filter) -> bool
    where
        A: ActorView + ?Sized,
    {
        if !filter.all.is_empty() && !filter.all.iter().all(|t| self.matches_token(actor, t)) {
            return false;
        }

        if !filter.not.is_empty() && filter.not.iter().any(|t| self.matches_token(actor, t)) {
            return false;
        }

        if !filter.matches.is_empty()
            && !filter.matches.iter().any(|t| self.matches_token(actor, t))
        {
            return false;
        }

        if !filter.any.is_empty() && !filter.any.iter().any(|t| self.contains_token(actor, t)) {
            return false;
        }

        if filter.traits.sex.is_some_and(|sex| actor.sex() != Some(sex)) {
            return false;
        }

        if filter
            .traits
            .child
            .is_some_and(|child| actor.is_child() != child)
        {
            return false;
        }

        true
    }

    /// Exact matching used by the `all`, `not`, and `matches` lists.
    pub fn matches_token<A>(&self, actor: &A, token: &Token) -> bool
    where
        A: ActorView + ?Sized,
    {
        match token {
            Token::Form(id) => self.matches_form(actor, *id, 0),
            Token::Text(text) if is_path_pattern(text) => self.inventory_model_contains(actor, text),
            Token::Text(text) => {
                self.actor_has_keyword(actor, |name| name.eq_ignore_ascii_case(text))
                    || self.cell_name(actor).is_some_and(|name| name.eq_ignore_ascii_case(text))
                    || actor.inventory().iter().any(|&item| {
                        self.form_has_keyword(item, |name| name.eq_ignore_ascii_case(text))
                    })
            }
        }
    }

    /// Containment matching used by the `any` list.
    ///
    /// Identifier entries match exactly, or by containment of their own editor
    /// id when they have one.
    pub fn contains_token<A>(&self, actor: &A, token: &Token) -> bool
    where
        A: ActorView + ?Sized,
    {
        match token {
            Token::Form(id) => {
                self.matches_form(actor, *id, 0)
                    || self
                        .forms
                        .editor_id(*id)
                        .is_some_and(|name| self.contains_text(actor, name))
            }
            Token::Text(text) => self.contains_text(actor, text),
        }
    }

    fn contains_text<A>(&self, actor: &A, text: &str) -> bool
    where
        A: ActorView + ?Sized,
    {
        if is_path_pattern(text) {
            return self.inventory_model_contains(actor, text);
        }

        self.actor_has_keyword(actor, |name| icontains(name, text))
            || actor
                .base()
                .and_then(|base| self.forms.editor_id(base))
                .is_some_and(|name| icontains(name, text))
            || self.cell_name(actor).is_some_and(|name| icontains(name, text))
            || actor.inventory().iter().any(|&item| {
                self.form_has_keyword(item, |name| icontains(name, text))
                    || self
                        .forms
                        .editor_id(item)
                        .is_some_and(|name| icontains(name, text))
            })
    }

    fn matches_form<A>(&self, actor: &A, id: FormId, depth: u32) -> bool
    where
        A: ActorView + ?Sized,
    {
        let Some(category) = self.forms.category(id) else {
            return false;
        };

        match category {
            FormCategory::Npc => actor.base() == Some(id),
            FormCategory::Faction => actor.factions().contains(&id),
            FormCategory::Race => actor.race() == Some(id),
            FormCategory::Keyword => {
                actor.keywords().contains(&id)
                    || actor
                        .inventory()
                        .iter()
                        .any(|&item| self.forms.keywords(item).contains(&id))
            }
            FormCategory::Location => self.location_within(actor, id),
            FormCategory::Spell => actor.spells().contains(&id),
            FormCategory::FormList => {
                if depth > self.max_list_depth {
                    tracing::debug!(list = %id, "form list nesting bound reached");
                    return false;
                }
                self.forms
                    .list_members(id)
                    .iter()
                    .any(|&member| self.matches_form(actor, member, depth + 1))
            }
            category if category.is_inventory_object() => {
                actor.inventory().iter().any(|&item| {
                    item == id || self.forms.template(item) == Some(id)
                })
            }
            _ => false,
        }
    }

    /// Current location equals `location` or sits somewhere beneath it.
    fn location_within<A>(&self, actor: &A, location: FormId) -> bool
    where
        A: ActorView + ?Sized,
    {
        let mut current = actor.current_location();
        let mut steps = 0;
        while let Some(here) = current {
            if here == location {
                return true;
            }
            if steps >= self.max_location_depth {
                return false;
            }
            current = self.forms.parent_location(here);
            steps += 1;
        }
        false
    }

    fn actor_has_keyword<A>(&self, actor: &A, predicate: impl Fn(&str) -> bool) -> bool
    where
        A: ActorView + ?Sized,
    {
        actor
            .keywords()
            .iter()
            .any(|&keyword| self.forms.editor_id(keyword).is_some_and(&predicate))
    }

    fn form_has_keyword(&self, form: FormId, predicate: impl Fn(&str) -> bool) -> bool {
        self.forms
            .keywords(form)
            .iter()
            .any(|&keyword| self.forms.editor_id(keyword).is_some_and(&predicate))
    }

    fn cell_name<A>(&self, actor: &A) -> Option<&'a str>
    where
        A: ActorView + ?Sized,
    {
        actor.parent_cell().and_then(|cell| self.forms.editor_id(cell))
    }

    fn inventory_model_contains<A>(&self, actor: &A, text: &str) -> bool
    where
        A: ActorView + ?Sized,
    {
        actor.inventory().iter().any(|&item| {
            self.forms
                .model_path(item)
                .is_some_and(|model| icontains(model, text))
        })
    }
}
