use crate::models::entity_type::EntityTypeId;
use crate::models::table_descriptor::{PropertyDescriptor, TableDescriptor};

/// Read-only model metadata of a store.
///
/// # Example
/// ```ignore
/// if !store.is_persisted_type(ProductModel::ENTITY_TYPE) {
///     return Err(ConfigurationError::NotPersistedType { entity: "Product".into() });
/// }
/// ```
pub trait EntityMetadata {
    /// Every entity type known to the store, in registration order.
    fn entity_types(&self) -> Vec<EntityTypeId>;

    fn table_descriptor(&self, entity_type: EntityTypeId) -> Option<&TableDescriptor>;

    fn is_persisted_type(&self, entity_type: EntityTypeId) -> bool {
        self.table_descriptor(entity_type).is_some()
    }

    /// The physical table name; `None` for unknown types and types without a table.
    fn table_name(&self, entity_type: EntityTypeId) -> Option<&str> {
        self.table_descriptor(entity_type)?.table_name.as_deref()
    }

    fn find_property(&self, entity_type: EntityTypeId, property: &str) -> Option<&PropertyDescriptor> {
        self.table_descriptor(entity_type)?.find_property(property)
    }

    fn column_name(&self, entity_type: EntityTypeId, property: &str) -> Option<&str> {
        self.find_property(entity_type, property)?.column_name.as_deref()
    }

    /// Resolves an entity type from its name.
    fn find_entity_type(&self, name: &str) -> Option<EntityTypeId> {
        self.entity_types().into_iter().find(|t| t.name() == name)
    }
}
