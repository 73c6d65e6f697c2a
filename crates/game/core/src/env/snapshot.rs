//! In-memory oracle implementations.
//!
//! This module provides snapshot-backed implementations of [`FormOracle`] and
//! [`ActorView`] for offline tools, registry fixtures, and tests.
//!
//! # Design
//!
//! - **Records**: serializable per-form data ([`FormRecord`])
//! - **Indexes**: editor-id and plugin-local lookups built once, ASCII
//!   case-insensitive like the host's own lookups
//! - **Actors**: plain field bags ([`ActorSnapshot`]) with builder helpers

use std::collections::{BTreeMap, HashMap};

use super::{ActorView, FormOracle};
use crate::form::{FormCategory, FormId, Sex};

// ============================================================================
// Form Records
// ============================================================================

/// Everything the evaluator may ask about a single form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormRecord {
    pub id: FormId,
    pub category: FormCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub editor_id: Option<String>,
    /// Source plugin and plugin-local id, for `local~plugin` lookups.
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: Option<(String, u32)>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub keywords: Vec<FormId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub model: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub template: Option<FormId>,
    /// Form list members.
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<FormId>,
    /// Parent location.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent: Option<FormId>,
}

impl FormRecord {
    pub fn new(id: FormId, category: FormCategory) -> Self {
        Self {
            id,
            category,
            editor_id: None,
            source: None,
            keywords: Vec::new(),
            model: None,
            template: None,
            members: Vec::new(),
            parent: None,
        }
    }

    pub fn with_editor_id(mut self, editor_id: impl Into<String>) -> Self {
        self.editor_id = Some(editor_id.into());
        self
    }

    pub fn with_source(mut self, plugin: impl Into<String>, local_id: u32) -> Self {
        self.source = Some((plugin.into(), local_id));
        self
    }

    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = FormId>) -> Self {
        self.keywords = keywords.into_iter().collect();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_template(mut self, template: FormId) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = FormId>) -> Self {
        self.members = members.into_iter().collect();
        self
    }

    pub fn with_parent(mut self, parent: FormId) -> Self {
        self.parent = Some(parent);
        self
    }
}

// ============================================================================
// Form Registry Snapshot
// ============================================================================

/// [`FormOracle`] backed by a fixed set of [`FormRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct FormsSnapshot {
    records: BTreeMap<FormId, FormRecord>,
    by_editor_id: HashMap<String, FormId>,
    by_local: HashMap<(String, u32), FormId>,
}

impl FormsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = FormRecord>) -> Self {
        let mut snapshot = Self::new();
        for record in records {
            snapshot.insert(record);
        }
        snapshot
    }

    /// Adds or replaces a record, updating the lookup indexes.
    pub fn insert(&mut self, record: FormRecord) {
        if let Some(previous) = self.records.remove(&record.id) {
            if let Some(editor_id) = &previous.editor_id {
                self.by_editor_id.remove(&editor_id.to_ascii_lowercase());
            }
            if let Some((plugin, local_id)) = &previous.source {
                self.by_local
                    .remove(&(plugin.to_ascii_lowercase(), *local_id));
            }
        }

        if let Some(editor_id) = &record.editor_id {
            self.by_editor_id
                .insert(editor_id.to_ascii_lowercase(), record.id);
        }
        if let Some((plugin, local_id)) = &record.source {
            self.by_local
                .insert((plugin.to_ascii_lowercase(), *local_id), record.id);
        }
        self.records.insert(record.id, record);
    }

    pub fn record(&self, id: FormId) -> Option<&FormRecord> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FormOracle for FormsSnapshot {
    fn category(&self, id: FormId) -> Option<FormCategory> {
        self.records.get(&id).map(|record| record.category)
    }

    fn lookup_editor_id(&self, editor_id: &str) -> Option<FormId> {
        self.by_editor_id
            .get(&editor_id.to_ascii_lowercase())
            .copied()
    }

    fn lookup_local(&self, local_id: u32, plugin: &str) -> Option<FormId> {
        self.by_local
            .get(&(plugin.to_ascii_lowercase(), local_id))
            .copied()
    }

    fn editor_id(&self, id: FormId) -> Option<&str> {
        self.records.get(&id)?.editor_id.as_deref()
    }

    fn keywords(&self, id: FormId) -> &[FormId] {
        self.records
            .get(&id)
            .map(|record| record.keywords.as_slice())
            .unwrap_or(&[])
    }

    fn model_path(&self, id: FormId) -> Option<&str> {
        self.records.get(&id)?.model.as_deref()
    }

    fn template(&self, id: FormId) -> Option<FormId> {
        self.records.get(&id)?.template
    }

    fn list_members(&self, id: FormId) -> &[FormId] {
        self.records
            .get(&id)
            .map(|record| record.members.as_slice())
            .unwrap_or(&[])
    }

    fn parent_location(&self, id: FormId) -> Option<FormId> {
        self.records.get(&id)?.parent
    }
}

// ============================================================================
// Actor Snapshot
// ============================================================================

/// [`ActorView`] over plain owned data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorSnapshot {
    pub base: Option<FormId>,
    pub race: Option<FormId>,
    pub factions: Vec<FormId>,
    pub keywords: Vec<FormId>,
    pub inventory: Vec<FormId>,
    pub location: Option<FormId>,
    pub cell: Option<FormId>,
    pub spells: Vec<FormId>,
    pub sex: Option<Sex>,
    pub child: bool,
}

impl ActorSnapshot {
    pub fn new(base: FormId) -> Self {
        Self {
            base: Some(base),
            ..Self::default()
        }
    }

    pub fn with_race(mut self, race: FormId) -> Self {
        self.race = Some(race);
        self
    }

    pub fn with_faction(mut self, faction: FormId) -> Self {
        self.factions.push(faction);
        self
    }

    pub fn with_keyword(mut self, keyword: FormId) -> Self {
        self.keywords.push(keyword);
        self
    }

    pub fn with_item(mut self, item: FormId) -> Self {
        self.inventory.push(item);
        self
    }

    pub fn with_location(mut self, location: FormId) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_cell(mut self, cell: FormId) -> Self {
        self.cell = Some(cell);
        self
    }

    pub fn with_spell(mut self, spell: FormId) -> Self {
        self.spells.push(spell);
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn as_child(mut self) -> Self {
        self.child = true;
        self
    }
}

impl ActorView for ActorSnapshot {
    fn base(&self) -> Option<FormId> {
        self.base
    }

    fn race(&self) -> Option<FormId> {
        self.race
    }

    fn factions(&self) -> &[FormId] {
        &self.factions
    }

    fn keywords(&self) -> &[FormId] {
        &self.keywords
    }

    fn inventory(&self) -> &[FormId] {
        &self.inventory
    }

    fn current_location(&self) -> Option<FormId> {
        self.location
    }

    fn parent_cell(&self) -> Option<FormId> {
        self.cell
    }

    fn spells(&self) -> &[FormId] {
        &self.spells
    }

    fn sex(&self) -> Option<Sex> {
        self.sex
    }

    fn is_child(&self) -> bool {
        self.child
    }
}
