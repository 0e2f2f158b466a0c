use audit_trail_api::BoxError;
use serde::Serialize;

use super::column_value::{ColumnValue, FromColumnValue};
use super::entity_type::EntityTypeId;

/// Property values of one row, in property declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowValues {
    values: Vec<(String, ColumnValue)>,
}

impl RowValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<ColumnValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a value, replacing an existing one in place.
    pub fn set(&mut self, name: &str, value: impl Into<ColumnValue>) {
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Reads a value and converts it; a missing property reads as `Null`.
    pub fn try_get<T: FromColumnValue>(&self, name: &str) -> Result<T, BoxError> {
        let value = self.get(name).unwrap_or(&ColumnValue::Null);
        T::from_column_value(value)
            .map_err(|e| format!("Failed to read property '{name}': {e}").into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A row of some entity type, handed to the store without static typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRow {
    pub entity_type: EntityTypeId,
    pub values: RowValues,
}

impl EntityRow {
    pub fn new(entity_type: EntityTypeId, values: RowValues) -> Self {
        Self { entity_type, values }
    }
}
