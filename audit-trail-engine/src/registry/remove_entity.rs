use tracing::debug;

use audit_trail_api::{ConfigurationError, ConfigurationResult};
use audit_trail_db::models::entity_type::EntityTypeId;

use super::registry_impl::AuditConfigurationRegistry;

impl AuditConfigurationRegistry {
    /// Stops auditing `entity`. Removing the last audited entity is refused.
    pub fn remove_entity(&mut self, entity: EntityTypeId) -> ConfigurationResult<()> {
        if !self.entities.contains_key(&entity) {
            return Err(ConfigurationError::NotConfigured {
                entity: entity.to_string(),
            });
        }
        if self.entities.len() == 1 {
            return Err(ConfigurationError::NoEntitiesLeft);
        }

        self.entities.remove(&entity);
        debug!(entity = %entity, "Entity removed from auditing");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_trail_db::models::table_model::TableModel;
    use audit_trail_memory::test_utils::{setup_store, AuditTrailModel, NoteModel, ProductModel};

    #[test]
    fn test_remove_entity() {
        let store = setup_store();
        let mut registry = AuditConfigurationRegistry::new(AuditTrailModel::ENTITY_TYPE);
        registry.set_columns(&store, ProductModel::ENTITY_TYPE, None, &["count"]).unwrap();
        registry.set_columns(&store, NoteModel::ENTITY_TYPE, None, &["text"]).unwrap();

        registry.remove_entity(NoteModel::ENTITY_TYPE).unwrap();
        assert_eq!(registry.entities(), vec![ProductModel::ENTITY_TYPE]);

        assert_eq!(
            registry.remove_entity(NoteModel::ENTITY_TYPE),
            Err(ConfigurationError::NotConfigured {
                entity: "Note".to_string()
            })
        );
    }

    #[test]
    fn test_remove_last_entity_is_refused() {
        let store = setup_store();
        let mut registry = AuditConfigurationRegistry::new(AuditTrailModel::ENTITY_TYPE);
        registry.set_columns(&store, ProductModel::ENTITY_TYPE, None, &["count"]).unwrap();

        assert_eq!(
            registry.remove_entity(ProductModel::ENTITY_TYPE),
            Err(ConfigurationError::NoEntitiesLeft)
        );
        assert!(registry.contains(ProductModel::ENTITY_TYPE));
    }
}
