use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use audit_trail_api::{ConfigurationError, ConfigurationResult};
use audit_trail_db::store::{AuditStore, EntityMetadata};

use super::audit_trail_configurator::AuditTrailConfigurator;
use super::auto_exclude::AutoExclude;
use crate::context::AuditContext;

/// A declarative audit configuration naming tables by entity type name.
///
/// Value mappers can only be set in code.
///
/// # Example
/// ```json
/// {
///   "audit_all_tables": null,
///   "tables": [
///     { "entity": "Product", "alias": "catalog", "columns": ["count", "kind"],
///       "column_aliases": { "kind": "product_kind" } }
///   ],
///   "start_auditing": true
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditPlan {
    /// Audits all columns of every table first, with these exclusions.
    pub audit_all_tables: Option<AutoExclude>,
    pub tables: Vec<TablePlan>,
    pub start_auditing: bool,
}

/// Configuration of one table, applied in field order: `all_columns`, `columns`,
/// `column_aliases`, then `exclude_columns`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePlan {
    pub entity: String,
    pub alias: Option<String>,
    pub columns: Vec<String>,
    pub all_columns: Option<AutoExclude>,
    pub exclude_columns: Vec<String>,
    pub column_aliases: BTreeMap<String, String>,
    pub exclude_table: bool,
}

impl AuditPlan {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Applies the plan to a context whose audit trail is configured.
    pub fn apply<S: AuditStore, C: Send + Sync + 'static>(
        &self,
        context: &mut AuditContext<S, C>,
    ) -> ConfigurationResult<()> {
        if !context.is_audit_trail_configured() {
            return Err(ConfigurationError::AuditingNotConfigured);
        }

        if let Some(exclude) = self.audit_all_tables {
            AuditTrailConfigurator::new(&mut *context).audit_all_tables(exclude)?;
        }
        for table in &self.tables {
            table.apply(&mut *context)?;
        }
        if self.start_auditing {
            context.start_auditing()?;
        }
        Ok(())
    }
}

impl TablePlan {
    fn apply<S: AuditStore, C: Send + Sync + 'static>(
        &self,
        context: &mut AuditContext<S, C>,
    ) -> ConfigurationResult<()> {
        let entity = context
            .store()
            .find_entity_type(&self.entity)
            .ok_or_else(|| ConfigurationError::UnknownEntity {
                entity: self.entity.clone(),
            })?;
        debug!(entity = %entity, "Applying table plan");

        let mut table = context.configure_table_by_id(entity, self.alias.as_deref())?;
        if self.exclude_table {
            table.exclude_table_from_auditing()?;
            return Ok(());
        }

        if let Some(exclude) = self.all_columns {
            table = table.audit_all_columns(exclude)?;
        }
        if !self.columns.is_empty() {
            let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();
            table = table.audit_columns(&columns)?;
        }
        for (column, alias) in &self.column_aliases {
            table = table.audit_column(column, None, Some(alias))?;
        }
        if !self.exclude_columns.is_empty() {
            let columns: Vec<&str> = self.exclude_columns.iter().map(String::as_str).collect();
            table.exclude_columns_from_auditing(&columns)?;
        }
        Ok(())
    }
}
