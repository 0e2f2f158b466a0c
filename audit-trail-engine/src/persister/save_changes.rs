use std::sync::Arc;

use tracing::{debug, error, info, warn};

use audit_trail_api::{AuditError, AuditResult, Cancellation};
use audit_trail_db::models::row_change::RowChange;
use audit_trail_db::store::{AuditStore, EntryId, Persistence, TransactionControl};

use super::persister_impl::TransactionalPersister;
use super::state::PersisterState;
use crate::capture::capture_changes;
use crate::mapping::{finalize_rows, invoke_mapping, AuditTrail};

impl<'a, S: AuditStore, C: Send + Sync + 'static> TransactionalPersister<'a, S, C> {
    /// Saves the pending changes and their audit records atomically.
    ///
    /// Without audited changes this is a single plain store save. Otherwise the primary
    /// save, the mapping callback and the audit save run in one transaction; on any
    /// failure the transaction is rolled back, staged audit records are detached and the
    /// original error is returned.
    ///
    /// # Returns
    /// * `Ok(usize)` - The row count of the primary save
    /// * `Err` - The first error raised by the store, the callback or a commit check
    pub async fn save_changes(&mut self, context: Option<C>, cancellation: &Cancellation) -> AuditResult<usize> {
        self.state = PersisterState::Idle;
        if cancellation.is_cancelled() {
            self.transition(PersisterState::Failed);
            return Err(AuditError::Cancelled);
        }

        self.transition(PersisterState::CapturingChanges);
        let trail = self.trail;
        let rows = match trail {
            Some(trail) => capture_changes(&mut *self.store, &trail.registry),
            None => Vec::new(),
        };

        let Some(trail) = trail.filter(|_| !rows.is_empty()) else {
            self.transition(PersisterState::PrimaryCommitting);
            return match self.store.save_changes().await {
                Ok(count) => {
                    self.transition(PersisterState::Committed);
                    Ok(count)
                }
                Err(e) => {
                    self.transition(PersisterState::Failed);
                    Err(AuditError::Store(e))
                }
            };
        };

        if cancellation.is_cancelled() {
            self.transition(PersisterState::Failed);
            return Err(AuditError::Cancelled);
        }
        if let Err(e) = self.store.begin_transaction().await {
            self.transition(PersisterState::Failed);
            return Err(AuditError::Store(e));
        }

        let mut staged = Vec::new();
        let result = self
            .save_in_transaction(trail, rows, context.map(Arc::new), cancellation, &mut staged)
            .await;

        match result {
            Ok((count, audited)) => {
                self.transition(PersisterState::Committed);
                info!(rows = count, audit_records = audited, "Committed changes with audit trail");
                Ok(count)
            }
            Err(e) => {
                self.roll_back(&staged, &e).await;
                Err(e)
            }
        }
    }

    async fn save_in_transaction(
        &mut self,
        trail: &AuditTrail<C>,
        rows: Vec<RowChange>,
        context: Option<Arc<C>>,
        cancellation: &Cancellation,
        staged: &mut Vec<EntryId>,
    ) -> AuditResult<(usize, usize)> {
        self.transition(PersisterState::PrimaryCommitting);
        let count = self.store.save_changes().await.map_err(AuditError::Store)?;
        if cancellation.is_cancelled() {
            return Err(AuditError::Cancelled);
        }

        self.transition(PersisterState::Finalizing);
        let rows = finalize_rows(&*self.store, rows);

        self.transition(PersisterState::Mapping);
        invoke_mapping(
            &mut *self.store,
            &trail.callback,
            trail.registry.audit_record_type(),
            rows,
            context,
            cancellation,
            staged,
        )
        .await?;

        self.transition(PersisterState::AuditCommitting);
        let saved = self.store.save_changes().await.map_err(AuditError::Store)?;
        if cancellation.is_cancelled() {
            return Err(AuditError::Cancelled);
        }
        if saved != staged.len() {
            return Err(AuditError::AuditPersistenceMismatch {
                staged: staged.len(),
                saved,
            });
        }
        debug!(saved, "Saved audit records");

        self.store
            .commit_transaction()
            .await
            .map_err(AuditError::Store)?;
        Ok((count, saved))
    }

    async fn roll_back(&mut self, staged: &[EntryId], cause: &AuditError) {
        self.transition(PersisterState::RollingBack);
        warn!(error = %cause, staged = staged.len(), "Rolling back audited save");

        if self.store.in_transaction() {
            if let Err(e) = self.store.rollback_transaction().await {
                error!(error = %e, "Rollback failed");
            }
        }
        for entry in staged {
            self.store.remove_pending(*entry);
        }
        self.transition(PersisterState::Failed);
    }
}
