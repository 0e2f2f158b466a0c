use std::future::Future;
use std::sync::Arc;

use tracing::info;

use audit_trail_api::{AuditResult, BoxError, Cancellation, ConfigurationError, ConfigurationResult};
use audit_trail_db::models::entity_row::EntityRow;
use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::models::row_change::RowChange;
use audit_trail_db::models::table_model::TableModel;
use audit_trail_db::store::{AuditStore, EntityMetadata};

use crate::configuration::{AuditTrailConfigurator, TableConfigurator};
use crate::mapping::callback::{row_callback, typed_callback};
use crate::mapping::{AuditMappingCallback, AuditTrail};
use crate::persister::{PersisterState, TransactionalPersister};
use crate::registry::AuditConfigurationRegistry;

/// A store with an audit trail overlay.
///
/// `C` is the caller context handed through `save_changes` to the mapping callback,
/// such as the acting user.
///
/// # Example
/// ```ignore
/// let mut context = AuditContext::<MemoryStore, CustomAuditInfo>::new(store);
/// context
///     .configure_audit_trail(|row, info, _| async move { Ok(Some(to_record(row, info))) })?
///     .configure_table::<ProductModel>(None)?
///     .audit_all_columns(AutoExclude::NONE)?
///     .start_auditing()?;
///
/// context.store_mut().add(&product)?;
/// context.save_changes(Some(info), &Cancellation::new()).await?;
/// ```
pub struct AuditContext<S: AuditStore, C = ()> {
    pub(crate) store: S,
    pub(crate) trail: Option<AuditTrail<C>>,
    pub(crate) auditing_enabled: bool,
    pub(crate) last_state: PersisterState,
}

impl<S: AuditStore, C: Send + Sync + 'static> AuditContext<S, C> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            trail: None,
            auditing_enabled: false,
            last_state: PersisterState::Idle,
        }
    }

    /// Sets the audit-record model and the callback mapping row changes to records of it.
    ///
    /// Calling it again replaces the record type and callback and keeps the audited
    /// tables.
    pub fn configure_audit_trail<R, F, Fut>(
        &mut self,
        callback: F,
    ) -> ConfigurationResult<AuditTrailConfigurator<'_, S, C>>
    where
        R: TableModel,
        F: Fn(RowChange, Option<Arc<C>>, Cancellation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<R>, BoxError>> + Send + 'static,
    {
        self.set_audit_trail(R::ENTITY_TYPE, typed_callback(callback))?;
        Ok(AuditTrailConfigurator::new(self))
    }

    /// Like [`AuditContext::configure_audit_trail`], for callbacks building records as
    /// untyped rows. Rows of another type than `record_type` fail the commit.
    pub fn configure_audit_trail_rows<F, Fut>(
        &mut self,
        record_type: EntityTypeId,
        callback: F,
    ) -> ConfigurationResult<AuditTrailConfigurator<'_, S, C>>
    where
        F: Fn(RowChange, Option<Arc<C>>, Cancellation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<EntityRow>, BoxError>> + Send + 'static,
    {
        self.set_audit_trail(record_type, row_callback(callback))?;
        Ok(AuditTrailConfigurator::new(self))
    }

    fn set_audit_trail(
        &mut self,
        record_type: EntityTypeId,
        callback: AuditMappingCallback<C>,
    ) -> ConfigurationResult<()> {
        if self.store.table_name(record_type).is_none() {
            return Err(ConfigurationError::NotPersistedType {
                entity: record_type.to_string(),
            });
        }

        match &mut self.trail {
            Some(trail) => {
                if trail.registry.contains(record_type) {
                    return Err(ConfigurationError::SelfAudit {
                        entity: record_type.to_string(),
                    });
                }
                trail.registry.audit_record_type = record_type;
                trail.callback = callback;
            }
            None => {
                self.trail = Some(AuditTrail {
                    registry: AuditConfigurationRegistry::new(record_type),
                    callback,
                });
            }
        }
        info!(record_type = %record_type, "Audit trail configured");
        Ok(())
    }

    /// Configures the auditing of `T`; the audit trail must be configured first.
    pub fn configure_table<T: TableModel>(
        &mut self,
        table_alias: Option<&str>,
    ) -> ConfigurationResult<TableConfigurator<'_, S, C>> {
        self.configure_table_by_id(T::ENTITY_TYPE, table_alias)
    }

    pub fn configure_table_by_id(
        &mut self,
        entity: EntityTypeId,
        table_alias: Option<&str>,
    ) -> ConfigurationResult<TableConfigurator<'_, S, C>> {
        if self.trail.is_none() {
            return Err(ConfigurationError::AuditingNotConfigured);
        }
        TableConfigurator::new(self, entity, table_alias)
    }

    /// Turns auditing on.
    pub fn start_auditing(&mut self) -> ConfigurationResult<()> {
        let trail = self
            .trail
            .as_ref()
            .ok_or(ConfigurationError::AuditingNotConfigured)?;
        if trail.registry.is_empty() {
            return Err(ConfigurationError::NoAuditedTables);
        }

        self.auditing_enabled = true;
        info!(tables = trail.registry.len(), "Auditing started");
        Ok(())
    }

    /// Turns auditing off; later saves take the plain path until it is started again.
    pub fn stop_auditing(&mut self) {
        if self.auditing_enabled {
            info!("Auditing stopped");
        }
        self.auditing_enabled = false;
    }

    pub fn auditing_enabled(&self) -> bool {
        self.auditing_enabled
    }

    pub fn is_audit_trail_configured(&self) -> bool {
        self.trail.is_some()
    }

    pub fn registry(&self) -> Option<&AuditConfigurationRegistry> {
        self.trail.as_ref().map(|t| &t.registry)
    }

    /// Saves all pending changes, together with their audit records when auditing is on.
    ///
    /// `context` is handed to the mapping callback of every audited row.
    pub async fn save_changes(&mut self, context: Option<C>, cancellation: &Cancellation) -> AuditResult<usize> {
        let trail = if self.auditing_enabled {
            self.trail.as_ref()
        } else {
            None
        };

        let mut persister = TransactionalPersister::new(&mut self.store, trail);
        let result = persister.save_changes(context, cancellation).await;
        self.last_state = persister.state();
        result
    }

    /// The state the last `save_changes` call ended in.
    pub fn last_state(&self) -> PersisterState {
        self.last_state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
