use audit_trail_api::BoxError;

use super::entity_row::{EntityRow, RowValues};
use super::entity_type::EntityTypeId;
use super::table_descriptor::TableDescriptor;

/// Capability interface of a persisted entity type.
///
/// Each model exposes its own metadata and converts to and from property values, so
/// stores and the audit configuration can work with it without reflection.
///
/// # Example
/// ```ignore
/// impl TableModel for ProductModel {
///     const ENTITY_TYPE: EntityTypeId = EntityTypeId::new("Product");
///
///     fn table_descriptor() -> TableDescriptor { /* ... */ }
///     fn to_row(&self) -> RowValues { /* ... */ }
///     fn from_row(row: &RowValues) -> Result<Self, BoxError> { /* ... */ }
/// }
/// ```
pub trait TableModel: Send + Sync + Sized + 'static {
    const ENTITY_TYPE: EntityTypeId;

    fn table_descriptor() -> TableDescriptor;

    fn to_row(&self) -> RowValues;

    fn from_row(row: &RowValues) -> Result<Self, BoxError>;

    fn to_entity_row(&self) -> EntityRow {
        EntityRow::new(Self::ENTITY_TYPE, self.to_row())
    }
}
