use std::sync::Arc;

use super::column_change::ColumnChange;
use super::column_value::ColumnValue;
use super::entity_audit_setting::EntityAuditSetting;
use super::entity_type::EntityTypeId;
use super::row_action::RowAction;
use crate::store::EntryId;

/// One changed row of an audited entity type, handed to the audit mapping callback.
///
/// The primary key stays unset until the primary commit has run, so generated keys
/// of added rows are visible to the callback.
#[derive(Debug, Clone)]
pub struct RowChange {
    entry: EntryId,
    action: RowAction,
    entity: Arc<EntityAuditSetting>,
    primary_key: Option<ColumnValue>,
    columns: Vec<ColumnChange>,
}

impl RowChange {
    pub fn new(entry: EntryId, action: RowAction, entity: Arc<EntityAuditSetting>) -> Self {
        Self {
            entry,
            action,
            entity,
            primary_key: None,
            columns: Vec::new(),
        }
    }

    pub fn entry(&self) -> EntryId {
        self.entry
    }

    pub fn action(&self) -> RowAction {
        self.action
    }

    pub fn entity(&self) -> &EntityAuditSetting {
        &self.entity
    }

    pub fn entity_type(&self) -> EntityTypeId {
        self.entity.entity_type()
    }

    pub fn table_name(&self) -> &str {
        self.entity.table_name()
    }

    pub fn audited_table_name(&self) -> &str {
        self.entity.audited_table_name()
    }

    pub fn primary_key(&self) -> Option<&ColumnValue> {
        self.primary_key.as_ref()
    }

    pub fn set_primary_key(&mut self, value: ColumnValue) {
        self.primary_key = Some(value);
    }

    pub fn columns(&self) -> &[ColumnChange] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [ColumnChange] {
        &mut self.columns
    }

    pub fn column(&self, property_name: &str) -> Option<&ColumnChange> {
        self.columns.iter().find(|c| c.property_name() == property_name)
    }

    pub fn push_column(&mut self, change: ColumnChange) {
        self.columns.push(change);
    }

    pub fn retain_columns<F: FnMut(&ColumnChange) -> bool>(&mut self, keep: F) {
        self.columns.retain(keep);
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The column changes as a JSON array of `{column, old_value, new_value}` objects.
    pub fn changes_to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.columns)
    }
}
