use tracing::debug;

use audit_trail_api::ConfigurationResult;
use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::models::table_model::TableModel;
use audit_trail_db::store::{AuditStore, EntityMetadata};

use super::auto_exclude::AutoExclude;
use super::plan::AuditPlan;
use super::table_configurator::TableConfigurator;
use crate::context::AuditContext;

/// Entry point of the fluent configuration, returned once the audit trail is set.
pub struct AuditTrailConfigurator<'a, S: AuditStore, C> {
    context: &'a mut AuditContext<S, C>,
}

impl<'a, S: AuditStore, C: Send + Sync + 'static> AuditTrailConfigurator<'a, S, C> {
    pub(crate) fn new(context: &'a mut AuditContext<S, C>) -> Self {
        Self { context }
    }

    pub fn configure_table<T: TableModel>(
        self,
        table_alias: Option<&str>,
    ) -> ConfigurationResult<TableConfigurator<'a, S, C>> {
        self.configure_table_by_id(T::ENTITY_TYPE, table_alias)
    }

    pub fn configure_table_by_id(
        self,
        entity: EntityTypeId,
        table_alias: Option<&str>,
    ) -> ConfigurationResult<TableConfigurator<'a, S, C>> {
        TableConfigurator::new(self.context, entity, table_alias)
    }

    /// Audits all columns of every table of the store except the audit-record table.
    ///
    /// Types without a table are skipped. A table that can't be audited, such as a
    /// keyless one, fails the whole call.
    pub fn audit_all_tables(self, exclude: AutoExclude) -> ConfigurationResult<Self> {
        let record_type = self
            .context
            .registry()
            .map(|r| r.audit_record_type());
        let entities: Vec<EntityTypeId> = self
            .context
            .store
            .entity_types()
            .into_iter()
            .filter(|t| Some(*t) != record_type && self.context.store.table_name(*t).is_some())
            .collect();

        for entity in entities {
            debug!(entity = %entity, "Auditing all columns");
            TableConfigurator::new(&mut *self.context, entity, None)?.audit_all_columns(exclude)?;
        }
        Ok(self)
    }

    /// Applies a declarative configuration plan.
    pub fn apply_plan(self, plan: &AuditPlan) -> ConfigurationResult<Self> {
        plan.apply(&mut *self.context)?;
        Ok(self)
    }

    pub fn start_auditing(self) -> ConfigurationResult<Self> {
        self.context.start_auditing()?;
        Ok(self)
    }
}
