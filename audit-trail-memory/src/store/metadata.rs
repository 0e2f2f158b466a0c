use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::models::table_descriptor::TableDescriptor;
use audit_trail_db::store::EntityMetadata;

use crate::memory_store::MemoryStore;

impl EntityMetadata for MemoryStore {
    fn entity_types(&self) -> Vec<EntityTypeId> {
        self.descriptors.iter().map(|d| d.entity_type).collect()
    }

    fn table_descriptor(&self, entity_type: EntityTypeId) -> Option<&TableDescriptor> {
        self.descriptor(entity_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_store, ProductModel, ShippingAddress};
    use audit_trail_db::models::table_model::TableModel;

    #[test]
    fn test_metadata_lookups() {
        let store = setup_store();

        assert!(store.is_persisted_type(ProductModel::ENTITY_TYPE));
        assert!(!store.is_persisted_type(EntityTypeId::new("Unknown")));
        assert_eq!(store.table_name(ProductModel::ENTITY_TYPE), Some("products"));
        assert_eq!(store.table_name(ShippingAddress::ENTITY_TYPE), None);
        assert_eq!(
            store.column_name(ProductModel::ENTITY_TYPE, "company_name"),
            Some("company")
        );
        assert_eq!(store.column_name(ProductModel::ENTITY_TYPE, "count_tripled"), None);
        assert_eq!(
            store.find_entity_type("Product"),
            Some(ProductModel::ENTITY_TYPE)
        );
    }
}
