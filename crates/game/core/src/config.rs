/// Evaluator bounds and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SwapConfig {
    /// Maximum nesting of form lists inside form lists.
    /// Deeper lists are rejected at compile time and treated as "no match"
    /// during evaluation.
    pub max_list_depth: u32,

    /// Maximum number of ancestors walked when matching a location filter.
    pub max_location_depth: u32,
}

impl SwapConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_LIST_DEPTH: u32 = 16;
    pub const DEFAULT_MAX_LOCATION_DEPTH: u32 = 32;

    pub const fn new() -> Self {
        Self {
            max_list_depth: Self::DEFAULT_MAX_LIST_DEPTH,
            max_location_depth: Self::DEFAULT_MAX_LOCATION_DEPTH,
        }
    }

    pub const fn with_max_list_depth(mut self, max_list_depth: u32) -> Self {
        self.max_list_depth = max_list_depth;
        self
    }

    pub const fn with_max_location_depth(mut self, max_location_depth: u32) -> Self {
        self.max_location_depth = max_location_depth;
        self
    }
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self::new()
    }
}
