use std::sync::Arc;

use tracing::debug;

use audit_trail_api::{AuditError, AuditResult, Cancellation};
use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::models::row_change::RowChange;
use audit_trail_db::store::{EntryId, Persistence};

use super::callback::AuditMappingCallback;

/// Runs the mapping callback for every row and stages the returned audit records.
///
/// A `None` result skips the row. Staged entries are pushed to `staged` as soon as they
/// are added, so the caller can detach them when a later step fails.
pub async fn invoke_mapping<S, C>(
    store: &mut S,
    callback: &AuditMappingCallback<C>,
    record_type: EntityTypeId,
    rows: Vec<RowChange>,
    context: Option<Arc<C>>,
    cancellation: &Cancellation,
    staged: &mut Vec<EntryId>,
) -> AuditResult<()>
where
    S: Persistence + ?Sized,
{
    for row in rows {
        if cancellation.is_cancelled() {
            return Err(AuditError::Cancelled);
        }

        let entry = row.entry();
        let record = callback(row, context.clone(), cancellation.clone())
            .await
            .map_err(AuditError::Callback)?;
        if cancellation.is_cancelled() {
            return Err(AuditError::Cancelled);
        }

        let Some(record) = record else {
            debug!(entry = %entry, "Mapping callback skipped row");
            continue;
        };
        if record.entity_type != record_type {
            return Err(AuditError::MappingContractViolation {
                expected: record_type.to_string(),
                actual: record.entity_type.to_string(),
            });
        }

        let audit_entry = store.add_pending(record).map_err(AuditError::Store)?;
        staged.push(audit_entry);
    }

    debug!(staged = staged.len(), "Staged audit records");
    Ok(())
}
