use tracing::debug;

use audit_trail_db::models::column_change::ColumnChange;
use audit_trail_db::models::column_value::ColumnValue;
use audit_trail_db::models::row_action::RowAction;
use audit_trail_db::models::row_change::RowChange;
use audit_trail_db::store::{ChangeTracker, TrackedProperty};

use crate::registry::AuditConfigurationRegistry;

fn is_changed(action: RowAction, property: &TrackedProperty) -> bool {
    match action {
        RowAction::Added => !property.current_value.is_null(),
        RowAction::Deleted => true,
        RowAction::Modified => property.is_modified,
    }
}

/// Builds the change records of every dirty entry of an audited entity type.
///
/// Old values of added rows and new values of deleted rows are `Null`. Rows without a
/// qualifying column change are left out. Only the tracker is read; stored data is
/// never touched.
pub fn capture_changes<T: ChangeTracker + ?Sized>(
    tracker: &mut T,
    registry: &AuditConfigurationRegistry,
) -> Vec<RowChange> {
    if registry.is_empty() {
        return Vec::new();
    }

    tracker.detect_changes();

    let mut rows = Vec::new();
    for entry in tracker.tracked_entries() {
        let Some(entity) = registry.get(entry.entity_type) else {
            continue;
        };
        let Some(action) = RowAction::from_state(entry.state) else {
            continue;
        };

        let mut row = RowChange::new(entry.id, action, entity.clone());
        for property in tracker.tracked_properties(entry.id) {
            let Some(column) = registry.get_column(entity, &property.name) else {
                continue;
            };
            if !is_changed(action, &property) {
                continue;
            }

            let old_value = match action {
                RowAction::Added => ColumnValue::Null,
                _ => property.original_value,
            };
            let new_value = match action {
                RowAction::Deleted => ColumnValue::Null,
                _ => property.current_value,
            };
            row.push_column(ColumnChange::new(column.clone(), old_value, new_value));
        }

        if !row.is_empty() {
            rows.push(row);
        }
    }

    debug!(rows = rows.len(), "Captured audited changes");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_trail_api::BoxError;
    use audit_trail_db::models::table_model::TableModel;
    use audit_trail_db::store::Persistence;
    use audit_trail_memory::test_utils::{
        sample_note, sample_product, setup_store, AuditTrailModel, ProductModel,
    };
    use audit_trail_memory::MemoryStore;

    fn registry(store: &MemoryStore) -> AuditConfigurationRegistry {
        let mut registry = AuditConfigurationRegistry::new(AuditTrailModel::ENTITY_TYPE);
        registry
            .set_columns(store, ProductModel::ENTITY_TYPE, None, &["company_name", "count", "note_id"])
            .unwrap();
        registry
    }

    #[test]
    fn test_added_rows_skip_null_values() {
        let mut store = setup_store();
        let registry = registry(&store);
        store.add(&sample_product("Acme", 5)).unwrap();
        store.add(&sample_note("not audited")).unwrap();

        let rows = capture_changes(&mut store, &registry);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.action(), RowAction::Added);
        assert!(row.primary_key().is_none());
        let names: Vec<_> = row.columns().iter().map(|c| c.property_name()).collect();
        assert_eq!(names, vec!["company_name", "count"]);
        assert!(row.columns().iter().all(|c| c.old_value().is_null()));
        assert_eq!(row.column("count").unwrap().new_value(), &ColumnValue::Int(5));
    }

    #[tokio::test]
    async fn test_modified_rows_keep_modified_columns() -> Result<(), BoxError> {
        let mut store = setup_store();
        let registry = registry(&store);
        let entry = store.add(&sample_product("Acme", 5))?;
        store.save_changes().await?;

        let mut product = store.entity::<ProductModel>(entry)?.ok_or("missing")?;
        product.count = 7;
        product.kind = audit_trail_memory::test_utils::ProductKind::Wholesale;
        store.update(entry, &product)?;

        let rows = capture_changes(&mut store, &registry);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].action(), RowAction::Modified);
        assert_eq!(rows[0].columns().len(), 1);
        let count = &rows[0].columns()[0];
        assert_eq!(count.property_name(), "count");
        assert_eq!(count.old_value(), &ColumnValue::Int(5));
        assert_eq!(count.new_value(), &ColumnValue::Int(7));
        Ok(())
    }

    #[tokio::test]
    async fn test_deleted_rows_keep_every_column() -> Result<(), BoxError> {
        let mut store = setup_store();
        let registry = registry(&store);
        let entry = store.add(&sample_product("Acme", 5))?;
        store.save_changes().await?;
        store.remove(entry)?;

        let rows = capture_changes(&mut store, &registry);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].action(), RowAction::Deleted);
        let names: Vec<_> = rows[0].columns().iter().map(|c| c.property_name()).collect();
        assert_eq!(names, vec!["company_name", "count", "note_id"]);
        assert!(rows[0].columns().iter().all(|c| c.new_value().is_null()));
        assert_eq!(rows[0].column("note_id").unwrap().old_value(), &ColumnValue::Null);
        Ok(())
    }

    #[tokio::test]
    async fn test_unaudited_changes_produce_nothing() -> Result<(), BoxError> {
        let mut store = setup_store();
        let registry = registry(&store);
        let entry = store.add(&sample_product("Acme", 5))?;
        store.save_changes().await?;

        let mut product = store.entity::<ProductModel>(entry)?.ok_or("missing")?;
        product.kind = audit_trail_memory::test_utils::ProductKind::Wholesale;
        store.update(entry, &product)?;

        assert!(capture_changes(&mut store, &registry).is_empty());
        assert!(capture_changes(&mut store, &AuditConfigurationRegistry::new(AuditTrailModel::ENTITY_TYPE)).is_empty());
        Ok(())
    }
}
