use std::collections::{BTreeMap, BTreeSet, HashMap};

use audit_trail_db::models::entity_row::RowValues;
use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::models::table_descriptor::TableDescriptor;
use audit_trail_db::models::table_model::TableModel;
use audit_trail_db::store::{EntryId, EntryState};
use serde::Deserialize;

/// Settings of a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemoryStoreOptions {
    /// First value handed out for store-generated integer keys of each table.
    pub first_generated_key: i64,
    /// Rollback restores the tables and key counters only and leaves the tracker as it
    /// was, the way ORMs whose change tracker is not transactional behave.
    pub keep_tracker_on_rollback: bool,
}

impl Default for MemoryStoreOptions {
    fn default() -> Self {
        Self {
            first_generated_key: 1,
            keep_tracker_on_rollback: false,
        }
    }
}

/// A committed row, addressed by the joined values of its primary key.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredRow {
    pub key: String,
    pub values: RowValues,
}

/// One tracker entry: the row as loaded or staged, and as it is now.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub entity_type: EntityTypeId,
    pub state: EntryState,
    pub original: RowValues,
    pub current: RowValues,
    pub modified: BTreeSet<String>,
    /// Generated key properties still holding a temporary value.
    pub temporary_keys: BTreeSet<String>,
}

/// Everything a rollback restores.
#[derive(Debug, Clone, Default)]
pub(crate) struct StoreState {
    pub tables: HashMap<EntityTypeId, Vec<StoredRow>>,
    pub entries: BTreeMap<EntryId, Entry>,
    pub next_keys: HashMap<EntityTypeId, i64>,
    pub next_entry_id: u64,
    pub next_temporary_key: i64,
}

/// In-memory unit-of-work store with change tracking and snapshot transactions.
///
/// Rows are staged through the tracker and written by `save_changes`. A write either
/// applies every pending change or none of them. An open transaction holds a snapshot
/// of tables and tracker entries, which `rollback_transaction` restores.
pub struct MemoryStore {
    pub(crate) options: MemoryStoreOptions,
    pub(crate) descriptors: Vec<TableDescriptor>,
    pub(crate) state: StoreState,
    pub(crate) transaction: Option<StoreState>,
    pub(crate) save_calls: usize,
    pub(crate) transactions_begun: usize,
}

impl MemoryStore {
    pub fn new(options: MemoryStoreOptions) -> Self {
        Self {
            options,
            descriptors: Vec::new(),
            state: StoreState::default(),
            transaction: None,
            save_calls: 0,
            transactions_begun: 0,
        }
    }

    /// Makes a model type known to the store.
    pub fn register<T: TableModel>(&mut self) -> &mut Self {
        self.register_descriptor(T::table_descriptor())
    }

    /// Registers metadata directly; a later registration of the same type replaces it.
    pub fn register_descriptor(&mut self, descriptor: TableDescriptor) -> &mut Self {
        match self
            .descriptors
            .iter_mut()
            .find(|d| d.entity_type == descriptor.entity_type)
        {
            Some(existing) => *existing = descriptor,
            None => self.descriptors.push(descriptor),
        }
        self
    }

    pub fn options(&self) -> &MemoryStoreOptions {
        &self.options
    }

    /// Number of `save_changes` calls made so far, successful or not.
    pub fn save_calls(&self) -> usize {
        self.save_calls
    }

    /// Number of transactions opened so far.
    pub fn transactions_begun(&self) -> usize {
        self.transactions_begun
    }

    /// Tracker state of an entry; `None` for unknown entries.
    pub fn entry_state(&self, entry: EntryId) -> Option<EntryState> {
        self.state.entries.get(&entry).map(|e| e.state)
    }

    /// Drops detached entries from the tracker.
    pub(crate) fn prune_detached(&mut self) {
        self.state
            .entries
            .retain(|_, e| e.state != EntryState::Detached);
    }

    pub(crate) fn descriptor(&self, entity_type: EntityTypeId) -> Option<&TableDescriptor> {
        find_descriptor(&self.descriptors, entity_type)
    }
}

pub(crate) fn find_descriptor(
    descriptors: &[TableDescriptor],
    entity_type: EntityTypeId,
) -> Option<&TableDescriptor> {
    descriptors.iter().find(|d| d.entity_type == entity_type)
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryStoreOptions::default())
    }
}
