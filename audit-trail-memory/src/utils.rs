use audit_trail_api::BoxError;
use audit_trail_db::models::column_value::ColumnValue;
use audit_trail_db::models::entity_row::RowValues;
use audit_trail_db::models::table_descriptor::TableDescriptor;
use audit_trail_db::store::EntryId;

/// Builds the storage key of a row from its primary-key values.
///
/// Keyless tables get a key derived from the tracker entry, so every staged row is
/// stored separately.
pub fn row_key(
    descriptor: &TableDescriptor,
    values: &RowValues,
    entry: EntryId,
) -> Result<String, BoxError> {
    if !descriptor.has_primary_key() {
        return Ok(format!("entry:{}", entry.0));
    }

    let mut parts = Vec::new();
    for property in descriptor.primary_key_properties() {
        let value = values.get(property.name).unwrap_or(&ColumnValue::Null);
        if value.is_null() {
            return Err(format!(
                "Primary key '{}' of {} is not set",
                property.name, descriptor.entity_type
            )
            .into());
        }
        parts.push(value.to_string());
    }
    Ok(parts.join("|"))
}

/// Keeps only the column-backed properties of a row, in declaration order.
pub fn column_values(descriptor: &TableDescriptor, values: &RowValues) -> RowValues {
    let mut row = RowValues::new();
    for property in descriptor.column_properties() {
        let value = values.get(property.name).cloned().unwrap_or_default();
        row.set(property.name, value);
    }
    row
}

/// Checks the NOT NULL constraints of a row about to be written.
pub fn check_not_null(descriptor: &TableDescriptor, values: &RowValues) -> Result<(), BoxError> {
    let table = descriptor.table_name.as_deref().unwrap_or_default();
    for property in descriptor.column_properties() {
        if property.nullable || property.is_computed() {
            continue;
        }
        if values.get(property.name).map_or(true, ColumnValue::is_null) {
            let column = property.column_name.as_deref().unwrap_or(property.name);
            return Err(format!(
                "null value in column \"{column}\" of relation \"{table}\" violates not-null constraint"
            )
            .into());
        }
    }
    Ok(())
}
