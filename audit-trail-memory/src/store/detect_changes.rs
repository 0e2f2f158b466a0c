use std::collections::BTreeSet;

use audit_trail_db::store::{ChangeTracker, EntryId, EntryState, TrackedEntry, TrackedProperty};

use crate::memory_store::{find_descriptor, MemoryStore};

impl ChangeTracker for MemoryStore {
    fn detect_changes(&mut self) {
        for entry in self.state.entries.values_mut() {
            if !matches!(entry.state, EntryState::Unchanged | EntryState::Modified) {
                continue;
            }
            let modified: BTreeSet<String> = entry
                .current
                .iter()
                .filter(|(name, value)| entry.original.get(name) != Some(*value))
                .map(|(name, _)| name.to_string())
                .collect();
            entry.state = if modified.is_empty() {
                EntryState::Unchanged
            } else {
                EntryState::Modified
            };
            entry.modified = modified;
        }
    }

    fn tracked_entries(&self) -> Vec<TrackedEntry> {
        self.state
            .entries
            .iter()
            .filter(|(_, e)| e.state.is_dirty())
            .map(|(id, e)| TrackedEntry {
                id: *id,
                state: e.state,
                entity_type: e.entity_type,
            })
            .collect()
    }

    fn tracked_properties(&self, entry: EntryId) -> Vec<TrackedProperty> {
        let Some(tracked) = self.state.entries.get(&entry) else {
            return Vec::new();
        };
        let Some(descriptor) = find_descriptor(&self.descriptors, tracked.entity_type) else {
            return Vec::new();
        };

        descriptor
            .column_properties()
            .map(|property| TrackedProperty {
                name: property.name.to_string(),
                original_value: tracked.original.get(property.name).cloned().unwrap_or_default(),
                current_value: tracked.current.get(property.name).cloned().unwrap_or_default(),
                is_modified: tracked.modified.contains(property.name),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_note, sample_product, setup_store, NoteModel, ProductModel};
    use audit_trail_api::BoxError;
    use audit_trail_db::models::column_value::ColumnValue;
    use audit_trail_db::models::table_model::TableModel;
    use audit_trail_db::store::Persistence;

    #[tokio::test]
    async fn test_reverted_change_is_unchanged() -> Result<(), BoxError> {
        let mut store = setup_store();
        let entry = store.add(&sample_product("Acme", 5))?;
        store.save_changes().await?;

        let mut product = store.entity::<ProductModel>(entry)?.ok_or("missing")?;
        product.count = 9;
        store.update(entry, &product)?;
        store.detect_changes();
        assert_eq!(store.entry_state(entry), Some(EntryState::Modified));

        product.count = 5;
        store.update(entry, &product)?;
        store.detect_changes();
        assert_eq!(store.entry_state(entry), Some(EntryState::Unchanged));
        Ok(())
    }

    #[test]
    fn test_tracked_entries_in_entry_order() {
        let mut store = setup_store();
        let product = store.add(&sample_product("Acme", 5)).unwrap();
        let note = store.add(&sample_note("hello")).unwrap();

        let entries = store.tracked_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, product);
        assert_eq!(entries[0].entity_type, ProductModel::ENTITY_TYPE);
        assert_eq!(entries[1].id, note);
        assert_eq!(entries[1].entity_type, NoteModel::ENTITY_TYPE);
        assert!(entries.iter().all(|e| e.state == EntryState::Added));
    }

    #[test]
    fn test_tracked_properties_skip_unmapped() {
        let mut store = setup_store();
        let entry = store.add(&sample_product("Acme", 5)).unwrap();

        let properties = store.tracked_properties(entry);
        assert!(properties.iter().all(|p| p.name != "count_tripled"));
        let doubled = properties.iter().find(|p| p.name == "count_doubled").unwrap();
        assert_eq!(doubled.current_value, ColumnValue::Int(10));
        assert!(store.tracked_properties(EntryId(77)).is_empty());
    }
}
