use audit_trail_api::BoxError;
use audit_trail_db::models::column_value::ColumnValue;
use audit_trail_db::models::table_model::TableModel;
use audit_trail_db::store::{EntryId, EntryState};

use crate::memory_store::{find_descriptor, MemoryStore};
use crate::utils::column_values;

impl MemoryStore {
    /// Replaces the current values of a tracked entry.
    ///
    /// Generated keys not set on the model keep their tracked value. The entry becomes
    /// Modified on the next change detection if any value differs from the original.
    pub fn update<T: TableModel>(&mut self, entry: EntryId, model: &T) -> Result<(), BoxError> {
        let descriptor = find_descriptor(&self.descriptors, T::ENTITY_TYPE)
            .ok_or_else(|| format!("Unknown entity type {}", T::ENTITY_TYPE))?;
        let tracked = self
            .state
            .entries
            .get_mut(&entry)
            .filter(|e| e.entity_type == T::ENTITY_TYPE)
            .ok_or_else(|| format!("Entry {entry} does not track a {}", T::ENTITY_TYPE))?;
        if matches!(tracked.state, EntryState::Detached | EntryState::Deleted) {
            return Err(format!("Entry {entry} is {:?} and can't be updated", tracked.state).into());
        }

        let mut values = column_values(descriptor, &model.to_row());
        for property in descriptor.primary_key_properties() {
            let unset = values.get(property.name).map_or(true, ColumnValue::is_null);
            if property.value_generated && unset {
                if let Some(existing) = tracked.current.get(property.name) {
                    values.set(property.name, existing.clone());
                }
            }
        }
        tracked.current = values;
        Ok(())
    }
}
