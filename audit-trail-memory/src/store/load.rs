use std::collections::BTreeSet;

use audit_trail_api::BoxError;
use audit_trail_db::models::column_value::ColumnValue;
use audit_trail_db::models::entity_row::RowValues;
use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::models::table_model::TableModel;
use audit_trail_db::store::{EntryId, EntryState};

use crate::memory_store::{Entry, MemoryStore};

impl MemoryStore {
    /// Loads a committed row by key and starts tracking it as Unchanged.
    ///
    /// A row already tracked by a live entry returns that entry with its current values.
    pub fn load<T: TableModel>(
        &mut self,
        key: impl Into<ColumnValue>,
    ) -> Result<Option<(EntryId, T)>, BoxError> {
        let key = key.into().to_string();
        let Some(values) = self.stored_row(T::ENTITY_TYPE, &key)?.cloned() else {
            return Ok(None);
        };

        let tracked = self.state.entries.iter().find(|(_, e)| {
            e.entity_type == T::ENTITY_TYPE
                && matches!(e.state, EntryState::Unchanged | EntryState::Modified)
                && e.original == values
        });
        if let Some((id, entry)) = tracked {
            return Ok(Some((*id, T::from_row(&entry.current)?)));
        }

        self.state.next_entry_id += 1;
        let id = EntryId(self.state.next_entry_id);
        let model = T::from_row(&values)?;
        self.state.entries.insert(
            id,
            Entry {
                entity_type: T::ENTITY_TYPE,
                state: EntryState::Unchanged,
                original: values.clone(),
                current: values,
                modified: BTreeSet::new(),
                temporary_keys: BTreeSet::new(),
            },
        );
        Ok(Some((id, model)))
    }

    /// Reads the current values of a tracked entry, including detached ones.
    pub fn entity<T: TableModel>(&self, entry: EntryId) -> Result<Option<T>, BoxError> {
        match self.state.entries.get(&entry) {
            Some(e) if e.entity_type == T::ENTITY_TYPE => Ok(Some(T::from_row(&e.current)?)),
            _ => Ok(None),
        }
    }

    /// Reads a committed row by key without tracking it.
    pub fn find<T: TableModel>(&self, key: impl Into<ColumnValue>) -> Result<Option<T>, BoxError> {
        let key = key.into().to_string();
        self.stored_row(T::ENTITY_TYPE, &key)?
            .map(T::from_row)
            .transpose()
    }

    /// Every committed row of a type, in insertion order.
    pub fn query<T: TableModel>(&self) -> Result<Vec<T>, BoxError> {
        self.rows(T::ENTITY_TYPE)
            .into_iter()
            .map(T::from_row)
            .collect()
    }

    pub fn count<T: TableModel>(&self) -> usize {
        self.rows(T::ENTITY_TYPE).len()
    }

    /// Committed rows of a type as raw values.
    pub fn rows(&self, entity_type: EntityTypeId) -> Vec<&RowValues> {
        self.state
            .tables
            .get(&entity_type)
            .map(|table| table.iter().map(|r| &r.values).collect())
            .unwrap_or_default()
    }

    fn stored_row(&self, entity_type: EntityTypeId, key: &str) -> Result<Option<&RowValues>, BoxError> {
        let descriptor = self
            .descriptor(entity_type)
            .ok_or_else(|| format!("Unknown entity type {entity_type}"))?;
        if !descriptor.has_primary_key() {
            return Err(format!("Entity type {entity_type} has no primary key to load by").into());
        }
        Ok(self
            .state
            .tables
            .get(&entity_type)
            .and_then(|table| table.iter().find(|r| r.key == key))
            .map(|r| &r.values))
    }
}
