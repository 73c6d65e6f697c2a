use crate::form::{FormId, Sex};

/// Read-only view of an actor reference at the moment a swap is resolved.
///
/// The host supplies one of these per interception call. Nothing in this
/// crate mutates actor state.
pub trait ActorView {
    /// Base template (NPC form) the actor was spawned from.
    fn base(&self) -> Option<FormId>;

    fn race(&self) -> Option<FormId>;

    /// Factions the actor is currently a member of.
    fn factions(&self) -> &[FormId];

    /// Keywords carried by the actor directly (including its base and race).
    fn keywords(&self) -> &[FormId];

    /// Forms currently held in the actor's inventory.
    fn inventory(&self) -> &[FormId];

    fn current_location(&self) -> Option<FormId>;

    /// Cell the actor currently stands in.
    fn parent_cell(&self) -> Option<FormId>;

    fn spells(&self) -> &[FormId];

    /// Sex of the base template, `None` when the base is unavailable.
    fn sex(&self) -> Option<Sex>;

    fn is_child(&self) -> bool;
}
