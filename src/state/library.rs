use super::data::{ComposeEntry, EntryId};
use crate::error::InvalidEntry;

/// Sample recipes shipped with the application
const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

/// The Library owns the ordered collection of compose entries.
///
/// Order is insertion order with the newest entry first. Entries are never
/// deleted; the only mutations are `insert_front` and `replace`.
#[derive(Debug, Clone, Default)]
pub struct Library {
    entries: Vec<ComposeEntry>,
}

impl Library {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library pre-populated with the bundled sample recipes
    pub fn with_samples() -> Self {
        // The sample catalog is compiled into the binary, so a parse failure
        // is a build defect rather than a runtime condition.
        let entries: Vec<ComposeEntry> = serde_json::from_str(SAMPLE_CATALOG)
            .expect("bundled sample catalog is valid JSON");

        tracing::info!(count = entries.len(), "seeded library with sample catalog");
        Library { entries }
    }

    /// Build a library from entries already in display order.
    /// Later duplicates of an id are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = ComposeEntry>) -> Self {
        let mut library = Library::new();
        for entry in entries {
            if library.contains(&entry.id) {
                tracing::warn!(id = %entry.id, "dropping duplicate entry id");
                continue;
            }
            library.entries.push(entry);
        }
        library
    }

    /// Prepend a new entry so it shows before everything already present.
    ///
    /// Fails without changing anything if a required field is blank or the
    /// id is already taken.
    pub fn insert_front(&mut self, entry: ComposeEntry) -> Result<(), InvalidEntry> {
        if let Some(field) = entry.missing_required_field() {
            return Err(InvalidEntry::MissingField(field));
        }
        if self.contains(&entry.id) {
            return Err(InvalidEntry::DuplicateId(entry.id));
        }

        tracing::info!(id = %entry.id, title = %entry.title, "added entry");
        self.entries.insert(0, entry);
        Ok(())
    }

    /// Replace the entry with the same id, keeping its position.
    ///
    /// Returns `false` (and changes nothing) when no entry has that id.
    pub fn replace(&mut self, entry: ComposeEntry) -> bool {
        match self.entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(slot) => {
                tracing::info!(id = %entry.id, title = %entry.title, "updated entry");
                *slot = entry;
                true
            }
            None => {
                tracing::debug!(id = %entry.id, "replace target not in library, ignoring");
                false
            }
        }
    }

    /// Iterate entries in display order.
    ///
    /// The iterator borrows the library immutably, so callers can read but
    /// never modify stored entries. Call again to restart.
    pub fn all(&self) -> std::slice::Iter<'_, ComposeEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: &EntryId) -> Option<&ComposeEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
