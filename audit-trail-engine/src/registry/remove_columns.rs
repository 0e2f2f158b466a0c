use tracing::debug;

use audit_trail_api::{ConfigurationError, ConfigurationResult};
use audit_trail_db::models::entity_type::EntityTypeId;

use super::registry_impl::AuditConfigurationRegistry;

impl AuditConfigurationRegistry {
    /// Stops auditing the named columns of `entity`.
    ///
    /// Every name must be audited, and at least one column must remain.
    pub fn remove_columns(&mut self, entity: EntityTypeId, names: &[&str]) -> ConfigurationResult<()> {
        let setting = self
            .entities
            .get(&entity)
            .ok_or_else(|| ConfigurationError::NotConfigured {
                entity: entity.to_string(),
            })?;

        if let Some(missing) = names.iter().find(|name| !setting.contains_column(name)) {
            return Err(ConfigurationError::ColumnNotConfigured {
                entity: entity.to_string(),
                property: missing.to_string(),
            });
        }
        let remaining = setting
            .columns()
            .iter()
            .filter(|c| !names.contains(&c.property_name()))
            .count();
        if remaining == 0 {
            return Err(ConfigurationError::NoColumnsLeft {
                entity: entity.to_string(),
            });
        }

        if let Some(setting) = self.entities.get_mut(&entity) {
            std::sync::Arc::make_mut(setting).remove_columns(names);
        }
        debug!(entity = %entity, remaining, "Columns removed from auditing");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_trail_db::models::table_model::TableModel;
    use audit_trail_memory::test_utils::{setup_store, AuditTrailModel, NoteModel, ProductModel};

    fn registry() -> AuditConfigurationRegistry {
        let store = setup_store();
        let mut registry = AuditConfigurationRegistry::new(AuditTrailModel::ENTITY_TYPE);
        registry
            .set_columns(&store, ProductModel::ENTITY_TYPE, None, &["company_name", "count", "kind"])
            .unwrap();
        registry
    }

    fn column_names(registry: &AuditConfigurationRegistry) -> Vec<String> {
        registry
            .get(ProductModel::ENTITY_TYPE)
            .map(|s| s.columns().iter().map(|c| c.property_name().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_remove_columns() {
        let mut registry = registry();
        registry
            .remove_columns(ProductModel::ENTITY_TYPE, &["company_name", "kind"])
            .unwrap();
        assert_eq!(column_names(&registry), vec!["count"]);
    }

    #[test]
    fn test_remove_columns_failures_leave_registry_unchanged() {
        let mut registry = registry();

        assert_eq!(
            registry.remove_columns(ProductModel::ENTITY_TYPE, &["count", "note_id"]),
            Err(ConfigurationError::ColumnNotConfigured {
                entity: "Product".to_string(),
                property: "note_id".to_string()
            })
        );
        assert_eq!(
            registry.remove_columns(ProductModel::ENTITY_TYPE, &["company_name", "count", "kind"]),
            Err(ConfigurationError::NoColumnsLeft {
                entity: "Product".to_string()
            })
        );
        assert_eq!(
            registry.remove_columns(NoteModel::ENTITY_TYPE, &["text"]),
            Err(ConfigurationError::NotConfigured {
                entity: "Note".to_string()
            })
        );
        assert_eq!(column_names(&registry), vec!["company_name", "count", "kind"]);
    }
}
