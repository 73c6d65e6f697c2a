//! Form registry loader.
//!
//! Reads a RON snapshot of the host's form registry so rules can be compiled
//! and evaluated offline.

use std::path::Path;

use serde::{Deserialize, Serialize};
use swap_core::{FormRecord, FormsSnapshot};

use crate::loaders::{LoadResult, read_file};

/// Registry data structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub forms: Vec<FormRecord>,
}

/// Loader for form registries from RON files.
pub struct RegistryLoader;

impl RegistryLoader {
    /// Load a registry from a RON file.
    ///
    /// Records with a repeated id replace earlier ones.
    pub fn load(path: &Path) -> LoadResult<FormsSnapshot> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<FormsSnapshot> {
        let data: RegistryFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse registry RON: {}", e))?;

        Ok(FormsSnapshot::from_records(data.forms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swap_core::{FormCategory, FormId, FormOracle};

    #[test]
    fn parses_records_with_optional_fields() {
        let forms = RegistryLoader::parse(
            r#"(
                forms: [
                    (id: 0x00012E46, category: Item, editor_id: Some("IronSword"),
                     source: Some(("Skyrim.esm", 0x012E46)), keywords: [0x0001E711]),
                    (id: 0x0001E711, category: Keyword, editor_id: Some("WeapMaterialIron")),
                    (id: 0x00000100, category: FormList, members: [0x0001E711]),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(forms.len(), 3);
        assert_eq!(forms.lookup_editor_id("ironsword"), Some(FormId(0x0001_2E46)));
        assert_eq!(forms.lookup_local(0x012E46, "Skyrim.esm"), Some(FormId(0x0001_2E46)));
        assert_eq!(forms.keywords(FormId(0x0001_2E46)), &[FormId(0x0001_E711)]);
        assert_eq!(forms.category(FormId(0x100)), Some(FormCategory::FormList));
    }

    #[test]
    fn invalid_ron_is_an_error() {
        assert!(RegistryLoader::parse("(forms: [(id: 1)])").is_err());
    }
}
