use serde::Serialize;

use crate::models::column_value::ColumnValue;
use crate::models::entity_type::EntityTypeId;

/// Identifier of one entry in the change tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tracker state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntryState {
    Detached,
    Unchanged,
    Added,
    Modified,
    Deleted,
}

impl EntryState {
    pub fn is_dirty(&self) -> bool {
        matches!(self, EntryState::Added | EntryState::Modified | EntryState::Deleted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntry {
    pub id: EntryId,
    pub state: EntryState,
    pub entity_type: EntityTypeId,
}

/// Before and after value of one column-backed property of a tracked entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedProperty {
    pub name: String,
    pub original_value: ColumnValue,
    pub current_value: ColumnValue,
    pub is_modified: bool,
}

/// Change tracking of a unit of work.
pub trait ChangeTracker {
    /// Compares current values against the originals and updates entry states.
    fn detect_changes(&mut self);

    /// Entries in state Added, Modified or Deleted.
    fn tracked_entries(&self) -> Vec<TrackedEntry>;

    /// Column-backed properties of an entry in declaration order; empty for unknown entries.
    fn tracked_properties(&self, entry: EntryId) -> Vec<TrackedProperty>;

    fn tracked_property(&self, entry: EntryId, name: &str) -> Option<TrackedProperty> {
        self.tracked_properties(entry)
            .into_iter()
            .find(|p| p.name == name)
    }
}
