use async_trait::async_trait;

use audit_trail_api::BoxError;

use super::change_tracker::EntryId;
use crate::models::entity_row::EntityRow;

/// Staging and committing of rows.
#[async_trait]
pub trait Persistence: Send {
    /// Stages a new row for insertion on the next `save_changes`.
    ///
    /// # Returns
    /// * `Ok(EntryId)` - The tracker entry of the staged row
    /// * `Err` - The entity type is unknown to the store
    fn add_pending(&mut self, row: EntityRow) -> Result<EntryId, BoxError>;

    /// Detaches a staged entry; a no-op for unknown or already detached entries.
    fn remove_pending(&mut self, entry: EntryId);

    /// Writes every pending change.
    ///
    /// # Returns
    /// * `Ok(usize)` - The number of rows written
    /// * `Err` - The write failed and nothing was applied
    async fn save_changes(&mut self) -> Result<usize, BoxError>;
}
