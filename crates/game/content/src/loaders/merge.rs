//! Merge-map loader.
//!
//! Merged plugins record which original forms they absorbed. A merge map is a
//! JSON file of the shape:
//!
//! ```json
//! {
//!     "Merged.esp": {
//!         "OriginalA.esp": { "800": "D62", "801": "D63" },
//!         "OriginalB.esp": {}
//!     }
//! }
//! ```
//!
//! Ids are hexadecimal. An original plugin listed without an entry for a
//! given id keeps that id but is redirected to the merged plugin.

use std::collections::HashMap;
use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::resolver::{FormRemapper, parse_local_id};

type RawMergeMap = HashMap<String, HashMap<String, HashMap<String, String>>>;

#[derive(Debug, Clone, Default)]
struct MergedSource {
    merged_plugin: String,
    forms: HashMap<u32, u32>,
}

/// [`FormRemapper`] built from one or more merge-map files.
#[derive(Debug, Clone, Default)]
pub struct MergeMap {
    // Keyed by lower-cased original plugin name
    sources: HashMap<String, MergedSource>,
}

impl MergeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `local_id` of `original` now lives at `merged_id` in `merged`.
    pub fn insert(&mut self, original: &str, merged: &str, local_id: u32, merged_id: u32) {
        self.source_mut(original, merged)
            .forms
            .insert(local_id, merged_id);
    }

    /// Redirects every form of `original` to `merged`, keeping local ids.
    pub fn insert_plugin(&mut self, original: &str, merged: &str) {
        self.source_mut(original, merged);
    }

    /// Adds the contents of a JSON merge map. Later entries win.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or an id is not hexadecimal.
    pub fn extend_from_json(&mut self, content: &str) -> LoadResult<()> {
        let raw: RawMergeMap = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse merge map JSON: {}", e))?;

        for (merged, originals) in raw {
            for (original, forms) in originals {
                self.insert_plugin(&original, &merged);
                for (old, new) in forms {
                    let old_id = parse_local_id(&old)
                        .ok_or_else(|| anyhow::anyhow!("Invalid form id '{}' in merge map", old))?;
                    let new_id = parse_local_id(&new)
                        .ok_or_else(|| anyhow::anyhow!("Invalid form id '{}' in merge map", new))?;
                    self.insert(&original, &merged, old_id, new_id);
                }
            }
        }
        Ok(())
    }

    /// Number of original plugins covered.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Moving an original plugin to a different merged plugin discards the
    /// id mappings recorded for the previous one.
    fn source_mut(&mut self, original: &str, merged: &str) -> &mut MergedSource {
        let source = self
            .sources
            .entry(original.to_ascii_lowercase())
            .or_default();
        if !source.merged_plugin.eq_ignore_ascii_case(merged) {
            source.forms.clear();
        }
        source.merged_plugin = merged.to_owned();
        source
    }
}

impl FormRemapper for MergeMap {
    fn remap(&self, plugin: &str, local_id: u32) -> Option<(&str, u32)> {
        let source = self.sources.get(&plugin.to_ascii_lowercase())?;
        let merged_id = source.forms.get(&local_id).copied().unwrap_or(local_id);
        Some((source.merged_plugin.as_str(), merged_id))
    }
}

/// Loader for merge maps from JSON files.
pub struct MergeMapLoader;

impl MergeMapLoader {
    /// Load and combine merge maps, in order.
    pub fn load(paths: &[impl AsRef<Path>]) -> LoadResult<MergeMap> {
        let mut map = MergeMap::new();
        for path in paths {
            let path = path.as_ref();
            let content = read_file(path)?;
            map.extend_from_json(&content)
                .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))?;
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaps_listed_forms_and_redirects_plugin() {
        let mut map = MergeMap::new();
        map.extend_from_json(
            r#"{ "Merged.esp": { "Original.esp": { "800": "D62" }, "Empty.esp": {} } }"#,
        )
        .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.remap("original.ESP", 0x800), Some(("Merged.esp", 0xD62)));
        assert_eq!(map.remap("Original.esp", 0x801), Some(("Merged.esp", 0x801)));
        assert_eq!(map.remap("Empty.esp", 0x10), Some(("Merged.esp", 0x10)));
        assert_eq!(map.remap("Unrelated.esp", 0x800), None);
    }

    #[test]
    fn remerged_plugin_drops_stale_ids() {
        let mut map = MergeMap::new();
        map.extend_from_json(r#"{ "MergeA.esp": { "Original.esp": { "800": "D62", "801": "D63" } } }"#)
            .unwrap();
        map.extend_from_json(r#"{ "MergeB.esp": { "Original.esp": { "801": "E01" } } }"#)
            .unwrap();

        assert_eq!(map.remap("Original.esp", 0x801), Some(("MergeB.esp", 0xE01)));
        assert_eq!(map.remap("Original.esp", 0x800), Some(("MergeB.esp", 0x800)));

        // Same merged plugin keeps earlier ids
        map.insert("Original.esp", "mergeb.esp", 0x802, 0xE02);
        assert_eq!(map.remap("Original.esp", 0x801).map(|(_, id)| id), Some(0xE01));
    }

    #[test]
    fn rejects_non_hex_ids() {
        let mut map = MergeMap::new();
        let result = map.extend_from_json(r#"{ "M.esp": { "O.esp": { "zz": "1" } } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn loads_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        std::fs::write(&first, r#"{ "A.esp": { "O.esp": { "800": "1" } } }"#).unwrap();
        std::fs::write(&second, r#"{ "B.esp": { "O.esp": { "800": "2" } } }"#).unwrap();

        let map = MergeMapLoader::load(&[first, second]).unwrap();
        assert_eq!(map.remap("O.esp", 0x800), Some(("B.esp", 0x2)));
    }
}
