use async_trait::async_trait;
use tracing::debug;

use audit_trail_api::BoxError;
use audit_trail_db::models::entity_row::{EntityRow, RowValues};
use audit_trail_db::models::table_descriptor::TableDescriptor;
use audit_trail_db::store::{ChangeTracker, EntryId, EntryState, Persistence};

use crate::memory_store::{find_descriptor, MemoryStore, StoredRow};
use crate::utils::{check_not_null, row_key};

fn duplicate_key(descriptor: &TableDescriptor, key: &str) -> BoxError {
    let table = descriptor.table_name.as_deref().unwrap_or_default();
    format!("duplicate key value violates unique constraint \"{table}_pkey\": ({key})").into()
}

fn missing_row(descriptor: &TableDescriptor, key: &str) -> BoxError {
    let table = descriptor.table_name.as_deref().unwrap_or_default();
    format!("Row ({key}) of \"{table}\" no longer exists").into()
}

impl MemoryStore {
    /// Applies every pending change to a copy of the tables and swaps it in on success.
    ///
    /// Generated integer keys replace temporary ones here. Saved entries become
    /// Unchanged; deleted entries become Detached but keep their values until the
    /// transaction commits. Outside a transaction detached entries are dropped at once.
    pub(super) fn save_changes_impl(store: &mut MemoryStore) -> Result<usize, BoxError> {
        store.save_calls += 1;
        store.detect_changes();

        let mut tables = store.state.tables.clone();
        let mut next_keys = store.state.next_keys.clone();
        let mut written: Vec<(EntryId, RowValues)> = Vec::new();
        let mut deleted: Vec<EntryId> = Vec::new();

        for (id, entry) in store.state.entries.iter().filter(|(_, e)| e.state.is_dirty()) {
            let descriptor = find_descriptor(&store.descriptors, entry.entity_type)
                .ok_or_else(|| format!("Unknown entity type {}", entry.entity_type))?;
            let table = tables.entry(entry.entity_type).or_default();

            match entry.state {
                EntryState::Added => {
                    let mut values = entry.current.clone();
                    for name in &entry.temporary_keys {
                        let next = next_keys
                            .entry(entry.entity_type)
                            .or_insert(store.options.first_generated_key);
                        values.set(name, *next);
                        *next += 1;
                    }
                    check_not_null(descriptor, &values)?;
                    let key = row_key(descriptor, &values, *id)?;
                    if table.iter().any(|r| r.key == key) {
                        return Err(duplicate_key(descriptor, &key));
                    }
                    table.push(StoredRow {
                        key,
                        values: values.clone(),
                    });
                    written.push((*id, values));
                }
                EntryState::Modified => {
                    check_not_null(descriptor, &entry.current)?;
                    let old_key = row_key(descriptor, &entry.original, *id)?;
                    let new_key = row_key(descriptor, &entry.current, *id)?;
                    if new_key != old_key && table.iter().any(|r| r.key == new_key) {
                        return Err(duplicate_key(descriptor, &new_key));
                    }
                    let row = table
                        .iter_mut()
                        .find(|r| r.key == old_key)
                        .ok_or_else(|| missing_row(descriptor, &old_key))?;
                    row.key = new_key;
                    row.values = entry.current.clone();
                    written.push((*id, entry.current.clone()));
                }
                EntryState::Deleted => {
                    let key = row_key(descriptor, &entry.original, *id)?;
                    let before = table.len();
                    table.retain(|r| r.key != key);
                    if table.len() == before {
                        return Err(missing_row(descriptor, &key));
                    }
                    deleted.push(*id);
                }
                EntryState::Unchanged | EntryState::Detached => {}
            }
        }

        let count = written.len() + deleted.len();
        store.state.tables = tables;
        store.state.next_keys = next_keys;
        for (id, values) in written {
            if let Some(entry) = store.state.entries.get_mut(&id) {
                entry.original = values.clone();
                entry.current = values;
                entry.state = EntryState::Unchanged;
                entry.modified.clear();
                entry.temporary_keys.clear();
            }
        }
        for id in deleted {
            if let Some(entry) = store.state.entries.get_mut(&id) {
                entry.state = EntryState::Detached;
                entry.modified.clear();
            }
        }

        if store.transaction.is_none() {
            store.prune_detached();
        }
        debug!(rows = count, entries = store.state.entries.len(), "Saved pending changes");
        Ok(count)
    }
}

#[async_trait]
impl Persistence for MemoryStore {
    fn add_pending(&mut self, row: EntityRow) -> Result<EntryId, BoxError> {
        Self::add_pending_impl(self, row)
    }

    fn remove_pending(&mut self, entry: EntryId) {
        Self::remove_pending_impl(self, entry)
    }

    async fn save_changes(&mut self) -> Result<usize, BoxError> {
        Self::save_changes_impl(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStoreOptions;
    use crate::test_utils::{
        register_models, sample_audit_record, sample_note, sample_product, setup_store,
        AuditTrailModel, NoteModel, ProductModel, ProductSummaryView,
    };
    use audit_trail_db::models::column_value::ColumnValue;

    #[tokio::test]
    async fn test_save_assigns_generated_keys() -> Result<(), BoxError> {
        let mut store = setup_store();
        let first = store.add(&sample_product("Acme", 5))?;
        let second = store.add(&sample_product("Globex", 6))?;
        store.add(&sample_note("hello"))?;

        assert_eq!(store.save_changes().await?, 3);

        assert_eq!(store.entity::<ProductModel>(first)?.ok_or("missing")?.id, Some(1));
        assert_eq!(store.entity::<ProductModel>(second)?.ok_or("missing")?.id, Some(2));
        assert_eq!(store.query::<NoteModel>()?[0].id, Some(1));
        assert_eq!(store.entry_state(first), Some(EntryState::Unchanged));
        assert!(store.tracked_entries().is_empty());
        assert_eq!(store.save_calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_first_generated_key_option() -> Result<(), BoxError> {
        let mut store = MemoryStore::new(MemoryStoreOptions {
            first_generated_key: 100,
            ..MemoryStoreOptions::default()
        });
        register_models(&mut store);
        let entry = store.add(&sample_product("Acme", 5))?;
        store.save_changes().await?;

        let id = store.tracked_property(entry, "id").ok_or("missing")?;
        assert_eq!(id.current_value, ColumnValue::Int(100));
        Ok(())
    }

    #[tokio::test]
    async fn test_not_null_violation_applies_nothing() -> Result<(), BoxError> {
        let mut store = setup_store();
        let product = store.add(&sample_product("Acme", 5))?;
        let mut record = sample_audit_record("products");
        record.user_name = None;
        store.add(&record)?;

        let error = store.save_changes().await.unwrap_err();
        assert!(error.to_string().contains("user_name"));
        assert_eq!(store.count::<ProductModel>(), 0);
        assert_eq!(store.count::<AuditTrailModel>(), 0);
        assert_eq!(store.entry_state(product), Some(EntryState::Added));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_key_is_rejected() -> Result<(), BoxError> {
        let mut store = setup_store();
        let mut product = sample_product("Acme", 5);
        product.id = Some(7);
        store.add(&product)?;
        store.save_changes().await?;

        store.add(&product)?;
        let error = store.save_changes().await.unwrap_err();
        assert!(error.to_string().contains("duplicate key"));
        assert_eq!(store.count::<ProductModel>(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_keyless_rows_are_stored_separately() -> Result<(), BoxError> {
        let mut store = setup_store();
        let summary = ProductSummaryView {
            name: "Acme".to_string(),
            total: 3,
        };
        store.add(&summary)?;
        store.add(&summary)?;

        assert_eq!(store.save_changes().await?, 2);
        assert_eq!(store.count::<ProductSummaryView>(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_prunes_detached_entries() -> Result<(), BoxError> {
        let mut store = setup_store();
        let dropped = store.add(&sample_note("dropped"))?;
        store.remove(dropped)?;
        let kept = store.add(&sample_product("Acme", 5))?;

        store.save_changes().await?;

        assert_eq!(store.entry_state(dropped), None);
        assert_eq!(store.entry_state(kept), Some(EntryState::Unchanged));
        Ok(())
    }

    #[tokio::test]
    async fn test_nothing_pending_saves_zero() -> Result<(), BoxError> {
        let mut store = setup_store();
        assert_eq!(store.save_changes().await?, 0);
        assert_eq!(store.save_calls(), 1);
        Ok(())
    }
}
