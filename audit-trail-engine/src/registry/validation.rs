use audit_trail_api::{ConfigurationError, ConfigurationResult};
use audit_trail_db::models::column_audit_setting::ColumnAuditSetting;
use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::store::EntityMetadata;

use super::registry_impl::AuditConfigurationRegistry;

impl AuditConfigurationRegistry {
    /// Checks that `entity` may be audited and returns its physical table name.
    ///
    /// The type must have a table, a primary-key column, and must not be the
    /// audit-record type.
    pub fn validate_entity<M: EntityMetadata + ?Sized>(
        &self,
        metadata: &M,
        entity: EntityTypeId,
    ) -> ConfigurationResult<String> {
        let descriptor = metadata
            .table_descriptor(entity)
            .filter(|d| d.table_name.is_some())
            .ok_or_else(|| ConfigurationError::NotPersistedType {
                entity: entity.to_string(),
            })?;

        if !descriptor.has_primary_key() {
            return Err(ConfigurationError::MissingPrimaryKey {
                entity: entity.to_string(),
            });
        }

        if entity == self.audit_record_type {
            return Err(ConfigurationError::SelfAudit {
                entity: entity.to_string(),
            });
        }

        Ok(descriptor.table_name.clone().unwrap_or_default())
    }
}

/// Resolves a property of `entity` into fresh column settings.
pub(crate) fn resolve_column<M: EntityMetadata + ?Sized>(
    metadata: &M,
    entity: EntityTypeId,
    property: &str,
) -> ConfigurationResult<ColumnAuditSetting> {
    let descriptor = metadata
        .find_property(entity, property)
        .ok_or_else(|| ConfigurationError::ColumnNotFound {
            entity: entity.to_string(),
            property: property.to_string(),
        })?;

    ColumnAuditSetting::from_property(descriptor).ok_or_else(|| ConfigurationError::ColumnNotMapped {
        entity: entity.to_string(),
        property: property.to_string(),
    })
}
