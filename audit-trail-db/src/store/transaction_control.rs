use async_trait::async_trait;

use audit_trail_api::BoxError;

/// Explicit transaction boundaries around `save_changes` calls.
///
/// Rolling back restores both the stored data and the tracker state from before
/// [`TransactionControl::begin_transaction`].
#[async_trait]
pub trait TransactionControl: Send {
    async fn begin_transaction(&mut self) -> Result<(), BoxError>;

    async fn commit_transaction(&mut self) -> Result<(), BoxError>;

    async fn rollback_transaction(&mut self) -> Result<(), BoxError>;

    fn in_transaction(&self) -> bool;
}
