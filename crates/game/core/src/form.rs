//! Form identifiers and the categories the filter evaluator dispatches on.

use core::fmt;

/// Load-order-global identifier of a content object.
///
/// Stable for the lifetime of the process once resolved. Displayed as eight
/// upper-case hex digits, the way content tools print them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FormId(pub u32);

impl FormId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for FormId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

/// Runtime category of a form, resolved once through the
/// [`FormOracle`](crate::env::FormOracle).
///
/// The filter evaluator matches on this enum instead of asking the host for
/// virtual dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormCategory {
    /// Actor base template.
    Npc,
    Faction,
    Race,
    /// Keyword tag carried by actors and items.
    Keyword,
    Location,
    Spell,
    /// List of other forms, evaluated member by member.
    FormList,
    /// Anything that can sit in an inventory (weapons, armor, misc items).
    Item,
    Cell,
    Other,
}

impl FormCategory {
    /// Returns true for categories that can appear in an actor's inventory.
    pub const fn is_inventory_object(self) -> bool {
        matches!(self, Self::Item)
    }
}

/// Biological sex reported by an actor's base template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sex {
    Male,
    Female,
}
