use tracing::debug;

use audit_trail_db::models::row_action::RowAction;
use audit_trail_db::models::row_change::RowChange;
use audit_trail_db::store::{ChangeTracker, EntityMetadata};

/// Completes captured rows with post-commit state.
///
/// Sets the primary key from the first key property, re-reads new values (deleted rows
/// keep `Null`) and applies value mappers. Columns whose mapped values are equal are
/// dropped except on deleted rows, then rows left without columns.
pub fn finalize_rows<S>(store: &S, rows: Vec<RowChange>) -> Vec<RowChange>
where
    S: ChangeTracker + EntityMetadata + ?Sized,
{
    let captured = rows.len();
    let mut finalized = Vec::with_capacity(captured);

    for mut row in rows {
        let key_property = store
            .table_descriptor(row.entity_type())
            .and_then(|d| d.primary_key_properties().next())
            .map(|p| p.name);
        if let Some(key) = key_property.and_then(|name| store.tracked_property(row.entry(), name)) {
            row.set_primary_key(key.current_value);
        }

        let action = row.action();
        let entry = row.entry();
        for column in row.columns_mut() {
            if action != RowAction::Deleted {
                if let Some(property) = store.tracked_property(entry, column.property_name()) {
                    column.set_new_value(property.current_value);
                }
            }
            column.apply_value_mapper(action);
        }

        if action != RowAction::Deleted {
            row.retain_columns(|c| c.is_changed());
        }
        if !row.is_empty() {
            finalized.push(row);
        }
    }

    debug!(captured, finalized = finalized.len(), "Finalized audited changes");
    finalized
}
