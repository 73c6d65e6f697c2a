//! Identifier resolution for configuration tokens.
//!
//! A token is either `localId~Plugin.esp` or an editor id. Plugin-local ids are
//! hexadecimal, with or without a `0x` prefix.

use swap_core::{FormId, FormOracle};

/// Rewrites `(plugin, local id)` pairs whose source plugin was merged into
/// another one.
pub trait FormRemapper: Send + Sync {
    /// New plugin and local id, or `None` when the pair was not merged.
    fn remap(&self, plugin: &str, local_id: u32) -> Option<(&str, u32)>;
}

/// Resolves configuration tokens through the form registry.
pub struct FormResolver<'a, F>
where
    F: FormOracle + ?Sized,
{
    forms: &'a F,
    remapper: Option<&'a dyn FormRemapper>,
}

impl<'a, F> FormResolver<'a, F>
where
    F: FormOracle + ?Sized,
{
    pub fn new(forms: &'a F) -> Self {
        Self {
            forms,
            remapper: None,
        }
    }

    pub fn with_remapper(mut self, remapper: &'a dyn FormRemapper) -> Self {
        self.remapper = Some(remapper);
        self
    }

    /// Resolves a token to an existing form.
    ///
    /// Returns `None` when the token is malformed or names no known form.
    pub fn resolve(&self, token: &str) -> Option<FormId> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        let id = match token.split_once('~') {
            Some((local, plugin)) => self.resolve_local(local.trim(), plugin.trim())?,
            None => self.forms.lookup_editor_id(token)?,
        };

        self.forms.contains(id).then_some(id)
    }

    fn resolve_local(&self, local: &str, plugin: &str) -> Option<FormId> {
        if plugin.is_empty() || plugin.contains('~') {
            return None;
        }
        let local_id = parse_local_id(local)?;

        if let Some((merged_plugin, merged_id)) = self
            .remapper
            .and_then(|remapper| remapper.remap(plugin, local_id))
        {
            tracing::trace!(
                plugin,
                local_id = format_args!("{local_id:X}"),
                merged_plugin,
                merged_id = format_args!("{merged_id:X}"),
                "remapped merged form"
            );
            return self.forms.lookup_local(merged_id, merged_plugin);
        }

        self.forms.lookup_local(local_id, plugin)
    }
}

/// Parses a plugin-local id written in hexadecimal (`800`, `0x800`, `0X800`).
pub fn parse_local_id(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
