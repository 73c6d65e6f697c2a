//! Minimal INI-style document reader for rule files.
//!
//! Rule files are key-only INI: every non-comment line under a section header
//! is a rule key, duplicates included. Values after `=` are ignored.

/// One `[section]` with its keys in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    pub keys: Vec<String>,
}

/// Sections in first-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    pub sections: Vec<IniSection>,
}

impl IniDocument {
    /// Parses a document.
    ///
    /// - `;` and `#` start comment lines
    /// - a repeated section name merges into its first occurrence
    /// - keys before the first section are dropped
    pub fn parse(content: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut document = Self::default();
        let mut current: Option<usize> = None;

        for (line_no, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                current = Some(document.section_index(name.trim()));
                continue;
            }

            let key = match line.split_once('=') {
                Some((key, _)) => key.trim(),
                None => line,
            };
            if key.is_empty() {
                continue;
            }

            match current {
                Some(index) => document.sections[index].keys.push(key.to_owned()),
                None => tracing::debug!(line = line_no + 1, key, "ignoring key outside any section"),
            }
        }

        document
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|section| section.name == name)
    }

    fn section_index(&mut self, name: &str) -> usize {
        if let Some(index) = self.sections.iter().position(|s| s.name == name) {
            return index;
        }
        self.sections.push(IniSection {
            name: name.to_owned(),
            keys: Vec::new(),
        });
        self.sections.len() - 1
    }
}
