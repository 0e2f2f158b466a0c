use tracing::debug;

use audit_trail_api::{ConfigurationError, ConfigurationResult};
use audit_trail_db::models::alias::optional_alias_name;
use audit_trail_db::models::column_audit_setting::ColumnAuditSetting;
use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::store::EntityMetadata;

use super::registry_impl::AuditConfigurationRegistry;
use super::validation::resolve_column;

impl AuditConfigurationRegistry {
    /// Sets the audited columns of `entity` to exactly `names`, in order.
    ///
    /// Columns get fresh settings without alias or value mapper, and the table alias is
    /// replaced by `table_alias`. Nothing changes when any name fails to resolve.
    pub fn set_columns<M: EntityMetadata + ?Sized>(
        &mut self,
        metadata: &M,
        entity: EntityTypeId,
        table_alias: Option<&str>,
        names: &[&str],
    ) -> ConfigurationResult<()> {
        let table_name = self.validate_entity(metadata, entity)?;
        if names.is_empty() {
            return Err(ConfigurationError::NoColumnsProvided);
        }
        let alias = optional_alias_name(table_alias)?;

        let mut columns: Vec<ColumnAuditSetting> = Vec::with_capacity(names.len());
        for name in names {
            let column = resolve_column(metadata, entity, name)?;
            if !columns.iter().any(|c| c.property_name() == column.property_name()) {
                columns.push(column);
            }
        }

        debug!(entity = %entity, columns = columns.len(), "Audited columns set");
        let setting = self.entry(entity, &table_name);
        setting.set_table_alias(alias);
        setting.replace_columns(columns);
        Ok(())
    }
}
