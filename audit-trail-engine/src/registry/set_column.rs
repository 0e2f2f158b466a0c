use tracing::debug;

use audit_trail_api::ConfigurationResult;
use audit_trail_db::models::alias::optional_alias_name;
use audit_trail_db::models::column_audit_setting::ValueMapper;
use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::store::EntityMetadata;

use super::registry_impl::AuditConfigurationRegistry;
use super::validation::resolve_column;

impl AuditConfigurationRegistry {
    /// Adds or updates one audited column of `entity` with its value mapper and alias,
    /// keeping the other columns.
    pub fn set_column<M: EntityMetadata + ?Sized>(
        &mut self,
        metadata: &M,
        entity: EntityTypeId,
        table_alias: Option<&str>,
        name: &str,
        mapper: Option<ValueMapper>,
        column_alias: Option<&str>,
    ) -> ConfigurationResult<()> {
        let table_name = self.validate_entity(metadata, entity)?;
        let table_alias = optional_alias_name(table_alias)?;
        let column_alias = optional_alias_name(column_alias)?;

        let mut column = resolve_column(metadata, entity, name)?;
        column.set_column_alias(column_alias);
        column.set_value_mapper(mapper);

        debug!(entity = %entity, column = name, "Audited column set");
        let setting = self.entry(entity, &table_name);
        setting.set_table_alias(table_alias);
        setting.upsert_column(column);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use audit_trail_api::ConfigurationError;
    use audit_trail_db::models::column_value::ColumnValue;
    use audit_trail_db::models::table_model::TableModel;
    use audit_trail_memory::test_utils::{setup_store, AuditTrailModel, ProductModel};

    #[test]
    fn test_set_column_keeps_other_columns() {
        let store = setup_store();
        let mut registry = AuditConfigurationRegistry::new(AuditTrailModel::ENTITY_TYPE);
        registry
            .set_columns(&store, ProductModel::ENTITY_TYPE, None, &["count", "kind"])
            .unwrap();

        let mapper: ValueMapper = Arc::new(|value: &ColumnValue| match value {
            ColumnValue::Int(1) => ColumnValue::from("Retail"),
            other => other.clone(),
        });
        registry
            .set_column(&store, ProductModel::ENTITY_TYPE, None, "kind", Some(mapper), Some("product_kind"))
            .unwrap();
        registry
            .set_column(&store, ProductModel::ENTITY_TYPE, None, "company_name", None, None)
            .unwrap();

        let setting = registry.get(ProductModel::ENTITY_TYPE).unwrap();
        let names: Vec<_> = setting.columns().iter().map(|c| c.property_name()).collect();
        assert_eq!(names, vec!["count", "kind", "company_name"]);

        let kind = setting.column("kind").unwrap();
        assert_eq!(kind.audited_name(), "product_kind");
        assert_eq!(kind.map_value(&ColumnValue::Int(1)), ColumnValue::from("Retail"));
    }

    #[test]
    fn test_set_columns_clears_mapper_and_alias() {
        let store = setup_store();
        let mut registry = AuditConfigurationRegistry::new(AuditTrailModel::ENTITY_TYPE);
        registry
            .set_column(
                &store,
                ProductModel::ENTITY_TYPE,
                None,
                "kind",
                Some(Arc::new(|_: &ColumnValue| ColumnValue::Null)),
                Some("product_kind"),
            )
            .unwrap();

        registry
            .set_columns(&store, ProductModel::ENTITY_TYPE, None, &["kind"])
            .unwrap();

        let kind = registry.get(ProductModel::ENTITY_TYPE).unwrap().column("kind").unwrap().clone();
        assert!(kind.value_mapper().is_none());
        assert_eq!(kind.audited_name(), "kind");
    }

    #[test]
    fn test_set_column_unmapped_property() {
        let store = setup_store();
        let mut registry = AuditConfigurationRegistry::new(AuditTrailModel::ENTITY_TYPE);

        let error = registry
            .set_column(&store, ProductModel::ENTITY_TYPE, None, "count_tripled", None, None)
            .unwrap_err();
        assert_eq!(
            error,
            ConfigurationError::ColumnNotMapped {
                entity: "Product".to_string(),
                property: "count_tripled".to_string()
            }
        );
        assert!(registry.is_empty());
    }
}
