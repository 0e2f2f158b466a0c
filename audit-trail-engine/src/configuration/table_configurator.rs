use audit_trail_api::{ConfigurationError, ConfigurationResult};
use audit_trail_db::models::alias::optional_alias_name;
use audit_trail_db::models::column_audit_setting::ValueMapper;
use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::models::table_model::TableModel;
use audit_trail_db::store::{AuditStore, EntityMetadata};

use super::auto_exclude::AutoExclude;
use super::selector::{validate_selector, validate_selectors};
use crate::context::AuditContext;
use crate::mapping::AuditTrail;
use crate::registry::validation::resolve_column;

/// Fluent configuration of the audited columns of one table.
///
/// Each step validates its input first and leaves the configuration unchanged when it
/// fails.
pub struct TableConfigurator<'a, S: AuditStore, C> {
    context: &'a mut AuditContext<S, C>,
    entity: EntityTypeId,
    table_alias: Option<String>,
}

impl<'a, S: AuditStore, C: Send + Sync + 'static> TableConfigurator<'a, S, C> {
    /// Starts configuring `entity`, which must be auditable.
    pub(crate) fn new(
        context: &'a mut AuditContext<S, C>,
        entity: EntityTypeId,
        table_alias: Option<&str>,
    ) -> ConfigurationResult<Self> {
        optional_alias_name(table_alias)?;
        let trail = context
            .trail
            .as_ref()
            .ok_or(ConfigurationError::AuditingNotConfigured)?;
        trail.registry.validate_entity(&context.store, entity)?;

        Ok(Self {
            context,
            entity,
            table_alias: table_alias.map(str::to_string),
        })
    }

    pub fn entity(&self) -> EntityTypeId {
        self.entity
    }

    /// The store and the audit trail, borrowed separately.
    fn parts(&mut self) -> ConfigurationResult<(&S, &mut AuditTrail<C>)> {
        let trail = self
            .context
            .trail
            .as_mut()
            .ok_or(ConfigurationError::AuditingNotConfigured)?;
        Ok((&self.context.store, trail))
    }

    /// Audits every column of the table except the excluded kinds.
    pub fn audit_all_columns(mut self, exclude: AutoExclude) -> ConfigurationResult<Self> {
        let entity = self.entity;
        let names: Vec<&'static str> = self
            .context
            .store
            .table_descriptor(entity)
            .map(|d| {
                d.column_properties()
                    .filter(|p| exclude.keeps(p))
                    .map(|p| p.name)
                    .collect()
            })
            .unwrap_or_default();
        if names.is_empty() {
            return Err(ConfigurationError::NoAuditableColumns {
                entity: entity.to_string(),
            });
        }

        let alias = self.table_alias.clone();
        let (store, trail) = self.parts()?;
        trail
            .registry
            .set_columns(store, entity, alias.as_deref(), &names)?;
        Ok(self)
    }

    /// Audits exactly the named columns.
    pub fn audit_columns(mut self, names: &[&str]) -> ConfigurationResult<Self> {
        validate_selectors(names)?;
        let entity = self.entity;
        let alias = self.table_alias.clone();
        let (store, trail) = self.parts()?;
        trail
            .registry
            .set_columns(store, entity, alias.as_deref(), names)?;
        Ok(self)
    }

    /// Audits one column with an optional value mapper and alias, keeping the others.
    pub fn audit_column(
        mut self,
        name: &str,
        mapper: Option<ValueMapper>,
        column_alias: Option<&str>,
    ) -> ConfigurationResult<Self> {
        validate_selector(name)?;
        let entity = self.entity;
        let alias = self.table_alias.clone();
        let (store, trail) = self.parts()?;
        trail
            .registry
            .set_column(store, entity, alias.as_deref(), name, mapper, column_alias)?;
        Ok(self)
    }

    /// Stops auditing the named columns.
    pub fn exclude_columns_from_auditing(mut self, names: &[&str]) -> ConfigurationResult<Self> {
        validate_selectors(names)?;
        let entity = self.entity;
        let (store, trail) = self.parts()?;
        for name in names {
            resolve_column(store, entity, name)?;
        }
        trail.registry.remove_columns(entity, names)?;
        Ok(self)
    }

    /// Stops auditing the whole table.
    pub fn exclude_table_from_auditing(mut self) -> ConfigurationResult<Self> {
        let entity = self.entity;
        let (_, trail) = self.parts()?;
        trail.registry.remove_entity(entity)?;
        Ok(self)
    }

    /// Moves on to configuring another table.
    pub fn configure_table<T: TableModel>(
        self,
        table_alias: Option<&str>,
    ) -> ConfigurationResult<TableConfigurator<'a, S, C>> {
        TableConfigurator::new(self.context, T::ENTITY_TYPE, table_alias)
    }

    pub fn start_auditing(self) -> ConfigurationResult<Self> {
        self.context.start_auditing()?;
        Ok(self)
    }
}
