use std::collections::BTreeSet;

use audit_trail_api::BoxError;
use audit_trail_db::models::column_type::ColumnType;
use audit_trail_db::models::column_value::ColumnValue;
use audit_trail_db::models::entity_row::EntityRow;
use audit_trail_db::models::table_model::TableModel;
use audit_trail_db::store::{EntryId, EntryState};
use uuid::Uuid;

use crate::memory_store::{find_descriptor, Entry, MemoryStore};
use crate::utils::column_values;

impl MemoryStore {
    /// Stages a row as Added.
    ///
    /// Generated integer keys that are not set receive a temporary negative value until
    /// the row is saved; generated UUID keys are assigned right away.
    pub(crate) fn add_pending_impl(
        store: &mut MemoryStore,
        row: EntityRow,
    ) -> Result<EntryId, BoxError> {
        let descriptor = find_descriptor(&store.descriptors, row.entity_type)
            .ok_or_else(|| format!("Unknown entity type {}", row.entity_type))?;
        if descriptor.table_name.is_none() {
            return Err(format!("Entity type {} is not mapped to a table", row.entity_type).into());
        }

        let mut current = column_values(descriptor, &row.values);
        let mut temporary_keys = BTreeSet::new();
        for property in descriptor.primary_key_properties() {
            let unset = current.get(property.name).map_or(true, ColumnValue::is_null);
            if !property.value_generated || !unset {
                continue;
            }
            match property.data_type {
                ColumnType::Uuid => current.set(property.name, Uuid::new_v4()),
                _ => {
                    store.state.next_temporary_key -= 1;
                    current.set(property.name, store.state.next_temporary_key);
                    temporary_keys.insert(property.name.to_string());
                }
            }
        }

        store.state.next_entry_id += 1;
        let id = EntryId(store.state.next_entry_id);
        store.state.entries.insert(
            id,
            Entry {
                entity_type: row.entity_type,
                state: EntryState::Added,
                original: current.clone(),
                current,
                modified: BTreeSet::new(),
                temporary_keys,
            },
        );
        Ok(id)
    }

    /// Starts tracking a new model as Added.
    pub fn add<T: TableModel>(&mut self, model: &T) -> Result<EntryId, BoxError> {
        Self::add_pending_impl(self, model.to_entity_row())
    }
}
