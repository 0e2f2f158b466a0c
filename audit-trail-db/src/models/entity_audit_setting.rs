use std::sync::Arc;

use super::alias::AliasName;
use super::column_audit_setting::ColumnAuditSetting;
use super::entity_type::EntityTypeId;

/// Audit settings of one entity type: its table, optional alias and audited columns.
///
/// While registered, an entity setting always holds at least one column; the registry
/// enforces this before mutating.
#[derive(Debug, Clone)]
pub struct EntityAuditSetting {
    entity_type: EntityTypeId,
    table_name: String,
    table_alias: Option<AliasName>,
    columns: Vec<Arc<ColumnAuditSetting>>,
}

impl EntityAuditSetting {
    pub fn new(entity_type: EntityTypeId, table_name: &str) -> Self {
        Self {
            entity_type,
            table_name: table_name.to_string(),
            table_alias: None,
            columns: Vec::new(),
        }
    }

    pub fn entity_type(&self) -> EntityTypeId {
        self.entity_type
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn table_alias(&self) -> Option<&str> {
        self.table_alias.as_ref().map(|a| a.as_str())
    }

    /// The alias if set, otherwise the physical table name.
    pub fn audited_table_name(&self) -> &str {
        self.table_alias().unwrap_or(&self.table_name)
    }

    pub fn set_table_alias(&mut self, alias: Option<AliasName>) {
        self.table_alias = alias;
    }

    pub fn columns(&self) -> &[Arc<ColumnAuditSetting>] {
        &self.columns
    }

    pub fn column(&self, property_name: &str) -> Option<&Arc<ColumnAuditSetting>> {
        self.columns
            .iter()
            .find(|c| c.property_name() == property_name)
    }

    pub fn contains_column(&self, property_name: &str) -> bool {
        self.column(property_name).is_some()
    }

    /// Replaces the column with the same property name in place, or appends it.
    pub fn upsert_column(&mut self, setting: ColumnAuditSetting) {
        match self
            .columns
            .iter_mut()
            .find(|c| c.property_name() == setting.property_name())
        {
            Some(existing) => *existing = Arc::new(setting),
            None => self.columns.push(Arc::new(setting)),
        }
    }

    pub fn replace_columns(&mut self, settings: Vec<ColumnAuditSetting>) {
        self.columns = settings.into_iter().map(Arc::new).collect();
    }

    /// Removes the named columns, returning how many were removed.
    pub fn remove_columns(&mut self, property_names: &[&str]) -> usize {
        let before = self.columns.len();
        self.columns
            .retain(|c| !property_names.contains(&c.property_name()));
        before - self.columns.len()
    }
}
