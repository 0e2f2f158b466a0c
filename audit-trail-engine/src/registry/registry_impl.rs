use std::collections::BTreeMap;
use std::sync::Arc;

use audit_trail_db::models::column_audit_setting::ColumnAuditSetting;
use audit_trail_db::models::entity_audit_setting::EntityAuditSetting;
use audit_trail_db::models::entity_type::EntityTypeId;

/// Which entity types and columns are audited, with their aliases and value mappers.
///
/// Every registered entity holds at least one column, and the registry never becomes
/// empty through a removal. Failed mutations leave the registry unchanged.
#[derive(Debug, Clone)]
pub struct AuditConfigurationRegistry {
    pub(crate) audit_record_type: EntityTypeId,
    pub(crate) entities: BTreeMap<EntityTypeId, Arc<EntityAuditSetting>>,
}

impl AuditConfigurationRegistry {
    /// An empty registry for a context writing audit records of `audit_record_type`.
    pub fn new(audit_record_type: EntityTypeId) -> Self {
        Self {
            audit_record_type,
            entities: BTreeMap::new(),
        }
    }

    pub fn audit_record_type(&self) -> EntityTypeId {
        self.audit_record_type
    }

    pub fn get(&self, entity: EntityTypeId) -> Option<&Arc<EntityAuditSetting>> {
        self.entities.get(&entity)
    }

    pub fn get_column<'a>(
        &self,
        setting: &'a EntityAuditSetting,
        property: &str,
    ) -> Option<&'a Arc<ColumnAuditSetting>> {
        setting.column(property)
    }

    pub fn contains(&self, entity: EntityTypeId) -> bool {
        self.entities.contains_key(&entity)
    }

    pub fn entities(&self) -> Vec<EntityTypeId> {
        self.entities.keys().copied().collect()
    }

    pub fn settings(&self) -> impl Iterator<Item = &Arc<EntityAuditSetting>> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The setting of `entity`, created with its physical table name on first use.
    pub(crate) fn entry(&mut self, entity: EntityTypeId, table_name: &str) -> &mut EntityAuditSetting {
        let setting = self
            .entities
            .entry(entity)
            .or_insert_with(|| Arc::new(EntityAuditSetting::new(entity, table_name)));
        Arc::make_mut(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_trail_db::models::table_model::TableModel;
    use audit_trail_memory::test_utils::{setup_store, AuditTrailModel, NoteModel, ProductModel};

    #[test]
    fn test_lookups() {
        let store = setup_store();
        let mut registry = AuditConfigurationRegistry::new(AuditTrailModel::ENTITY_TYPE);
        assert!(registry.is_empty());

        registry
            .set_columns(&store, ProductModel::ENTITY_TYPE, None, &["count", "company_name"])
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entities(), vec![ProductModel::ENTITY_TYPE]);
        assert!(registry.get(NoteModel::ENTITY_TYPE).is_none());

        let setting = registry.get(ProductModel::ENTITY_TYPE).unwrap();
        assert_eq!(setting.table_name(), "products");
        let column = registry.get_column(setting, "company_name").unwrap();
        assert_eq!(column.column_name(), "company");
        assert!(registry.get_column(setting, "kind").is_none());
    }

    #[test]
    fn test_settings_shared_by_change_records_stay_frozen() {
        let store = setup_store();
        let mut registry = AuditConfigurationRegistry::new(AuditTrailModel::ENTITY_TYPE);
        registry
            .set_columns(&store, ProductModel::ENTITY_TYPE, None, &["count"])
            .unwrap();
        let snapshot = registry.get(ProductModel::ENTITY_TYPE).unwrap().clone();

        registry
            .set_columns(&store, ProductModel::ENTITY_TYPE, Some("catalog"), &["kind"])
            .unwrap();

        assert_eq!(snapshot.audited_table_name(), "products");
        assert!(snapshot.contains_column("count"));
        let current = registry.get(ProductModel::ENTITY_TYPE).unwrap();
        assert_eq!(current.audited_table_name(), "catalog");
        assert!(!current.contains_column("count"));
    }
}
