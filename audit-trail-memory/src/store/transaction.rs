use async_trait::async_trait;
use tracing::debug;

use audit_trail_api::BoxError;
use audit_trail_db::store::TransactionControl;

use crate::memory_store::MemoryStore;

#[async_trait]
impl TransactionControl for MemoryStore {
    async fn begin_transaction(&mut self) -> Result<(), BoxError> {
        if self.transaction.is_some() {
            return Err("A transaction is already in progress".into());
        }
        self.transaction = Some(self.state.clone());
        self.transactions_begun += 1;
        debug!("Transaction started");
        Ok(())
    }

    async fn commit_transaction(&mut self) -> Result<(), BoxError> {
        self.transaction
            .take()
            .ok_or("There is no transaction in progress")?;
        self.prune_detached();
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback_transaction(&mut self) -> Result<(), BoxError> {
        let snapshot = self
            .transaction
            .take()
            .ok_or("There is no transaction in progress")?;
        if self.options.keep_tracker_on_rollback {
            self.state.tables = snapshot.tables;
            self.state.next_keys = snapshot.next_keys;
        } else {
            self.state = snapshot;
        }
        debug!("Transaction rolled back");
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }
}
