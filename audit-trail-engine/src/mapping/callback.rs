use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use audit_trail_api::{BoxError, Cancellation};
use audit_trail_db::models::entity_row::EntityRow;
use audit_trail_db::models::row_change::RowChange;
use audit_trail_db::models::table_model::TableModel;

use crate::registry::AuditConfigurationRegistry;

pub type AuditMappingFuture = BoxFuture<'static, Result<Option<EntityRow>, BoxError>>;

/// Turns one captured row change into an audit record, or `None` to skip the row.
///
/// Receives the caller context given to `save_changes` and the commit's cancellation
/// token.
pub type AuditMappingCallback<C> =
    Arc<dyn Fn(RowChange, Option<Arc<C>>, Cancellation) -> AuditMappingFuture + Send + Sync>;

/// The audit-record type, its mapping callback and the audited tables.
pub struct AuditTrail<C> {
    pub registry: AuditConfigurationRegistry,
    pub callback: AuditMappingCallback<C>,
}

/// Erases a callback producing typed records of `R` into one producing rows.
pub fn typed_callback<R, C, F, Fut>(callback: F) -> AuditMappingCallback<C>
where
    R: TableModel,
    C: Send + Sync + 'static,
    F: Fn(RowChange, Option<Arc<C>>, Cancellation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<R>, BoxError>> + Send + 'static,
{
    Arc::new(move |row, context, cancellation| {
        let record = callback(row, context, cancellation);
        async move { Ok(record.await?.map(|r| r.to_entity_row())) }.boxed()
    })
}

/// Boxes a callback that already produces rows.
pub fn row_callback<C, F, Fut>(callback: F) -> AuditMappingCallback<C>
where
    C: Send + Sync + 'static,
    F: Fn(RowChange, Option<Arc<C>>, Cancellation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<EntityRow>, BoxError>> + Send + 'static,
{
    Arc::new(move |row, context, cancellation| callback(row, context, cancellation).boxed())
}
