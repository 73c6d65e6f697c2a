//! Read-only access to the host's form registry.

use crate::form::{FormCategory, FormId};

/// Registry queries consumed by the resolver, compiler, and evaluator.
///
/// Implementations must be cheap to query; the evaluator calls into the
/// oracle on the hot content-loading path.
pub trait FormOracle: Send + Sync {
    /// Category of a form, or `None` if no such form exists.
    fn category(&self, id: FormId) -> Option<FormCategory>;

    /// Looks a form up by its editor id (symbolic name).
    fn lookup_editor_id(&self, editor_id: &str) -> Option<FormId>;

    /// Turns a plugin-local id into a load-order-global one.
    fn lookup_local(&self, local_id: u32, plugin: &str) -> Option<FormId>;

    /// Editor id of a form, if the host kept it.
    fn editor_id(&self, id: FormId) -> Option<&str>;

    /// Keywords carried by a form (item keywords, actor base keywords).
    fn keywords(&self, id: FormId) -> &[FormId];

    /// Visual asset path of a form, if it has a model.
    fn model_path(&self, id: FormId) -> Option<&str>;

    /// Template form a form was generated from (templated weapon variants).
    fn template(&self, id: FormId) -> Option<FormId>;

    /// Members of a form list. Empty for any other category.
    fn list_members(&self, id: FormId) -> &[FormId];

    /// Parent of a location in the location hierarchy.
    fn parent_location(&self, id: FormId) -> Option<FormId>;

    /// Returns true if the form exists in the registry.
    fn contains(&self, id: FormId) -> bool {
        self.category(id).is_some()
    }
}
