//! Fixed language catalog
//!
//! The backend selects a runtime by numeric id; the catalog is the
//! client-held table mapping those ids to display names, default file labels,
//! and boilerplate snippets. The table is validated before use: an earlier
//! revision of the hosted editor shipped with an empty row in the middle of
//! its selector list, so empty or duplicate entries are rejected outright.

use crate::errors::ExecutionError;

/// One selectable runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: u32,
    pub name: &'static str,
    pub file_name: &'static str,
    pub boilerplate: &'static str,
}

/// The fixed, client-held language table.
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    entries: Vec<Language>,
}

impl LanguageCatalog {
    /// The catalog shipped with the client.
    pub fn builtin() -> Self {
        LanguageCatalog {
            entries: vec![
                Language {
                    id: 1,
                    name: "Python",
                    file_name: "code.py",
                    boilerplate: "# Start coding here",
                },
                Language {
                    id: 2,
                    name: "JavaScript",
                    file_name: "main.js",
                    boilerplate: "// Start coding here",
                },
                Language {
                    id: 3,
                    name: "Bash",
                    file_name: "main.sh",
                    boilerplate: "# Start coding here",
                },
            ],
        }
    }

    /// Build a catalog from explicit entries, rejecting malformed tables.
    pub fn new(entries: Vec<Language>) -> Result<Self, ExecutionError> {
        let catalog = LanguageCatalog { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject empty names/labels and duplicate ids.
    pub fn validate(&self) -> Result<(), ExecutionError> {
        if self.entries.is_empty() {
            return Err(ExecutionError::ValidationError(
                "Language catalog is empty".to_string(),
            ));
        }

        let mut seen_ids = std::collections::HashSet::new();
        for entry in &self.entries {
            if entry.name.trim().is_empty() || entry.file_name.trim().is_empty() {
                return Err(ExecutionError::ValidationError(format!(
                    "Language catalog entry {} has an empty name or file label",
                    entry.id
                )));
            }
            if !seen_ids.insert(entry.id) {
                return Err(ExecutionError::ValidationError(format!(
                    "Language catalog contains duplicate id {}",
                    entry.id
                )));
            }
        }

        Ok(())
    }

    /// Look up a runtime by its numeric id.
    pub fn find(&self, language_id: u32) -> Result<&Language, ExecutionError> {
        self.entries
            .iter()
            .find(|entry| entry.id == language_id)
            .ok_or_else(|| {
                ExecutionError::ValidationError(format!(
                    "Unknown language id {}. Known languages: {}",
                    language_id,
                    self.summary()
                ))
            })
    }

    /// Look up a runtime by case-insensitive display name.
    pub fn find_by_name(&self, name: &str) -> Result<&Language, ExecutionError> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                ExecutionError::ValidationError(format!(
                    "Unknown language '{}'. Known languages: {}",
                    name,
                    self.summary()
                ))
            })
    }

    pub fn entries(&self) -> &[Language] {
        &self.entries
    }

    fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{} ({})", entry.name, entry.id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
