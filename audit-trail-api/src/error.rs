use thiserror::Error;

/// Opaque error raised by a store, a collaborator or a caller callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while building the audit configuration.
///
/// These surface immediately to the configuring caller and never reach a commit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("The type {entity} is not recognized as a table model")]
    NotPersistedType { entity: String },

    #[error("The table of model type {entity} should have a primary key to be auditable")]
    MissingPrimaryKey { entity: String },

    #[error("The table {entity} is dedicated to the audit trail and can't be audited")]
    SelfAudit { entity: String },

    #[error("The property {property} is not found in {entity} table model")]
    ColumnNotFound { entity: String, property: String },

    #[error("The property {property} of {entity} is not mapped to any table column")]
    ColumnNotMapped { entity: String, property: String },

    #[error("Only simple property names are accepted as column selectors: '{selector}'")]
    InvalidColumnSelector { selector: String },

    #[error("No columns to audit are provided")]
    NoColumnsProvided,

    #[error("The table model {entity} has no auditable columns")]
    NoAuditableColumns { entity: String },

    #[error("The table {entity} is not yet configured for audit")]
    NotConfigured { entity: String },

    #[error("The property {property} is not yet set to be audited in {entity}")]
    ColumnNotConfigured { entity: String, property: String },

    #[error("No tables left for auditing")]
    NoEntitiesLeft,

    #[error("No columns left to audit in {entity} table model")]
    NoColumnsLeft { entity: String },

    #[error("Auditing is not configured yet")]
    AuditingNotConfigured,

    #[error("No tables are configured for auditing")]
    NoAuditedTables,

    #[error("Alias '{alias}' exceeds the maximum identifier length of {max} bytes")]
    AliasTooLong { alias: String, max: usize },

    #[error("Unknown entity type: {entity}")]
    UnknownEntity { entity: String },
}

/// Errors returned by an audited commit.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The mapping callback produced a record of another entity type than the audit-record type.
    #[error("Audit mapping callback returned a {actual} record, expected {expected}")]
    MappingContractViolation { expected: String, actual: String },

    #[error("Not all audit trail records are saved: staged {staged}, saved {saved}")]
    AuditPersistenceMismatch { staged: usize, saved: usize },

    #[error("The operation was cancelled")]
    Cancelled,

    /// Failure reported by the underlying store, passed through as-is.
    #[error(transparent)]
    Store(BoxError),

    /// Failure reported by the caller's mapping callback, passed through as-is.
    #[error(transparent)]
    Callback(BoxError),
}

impl AuditError {
    /// Returns the error raised by the store or the callback, if any.
    pub fn source_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            AuditError::Store(error) | AuditError::Callback(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

pub type AuditResult<T> = Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_is_transparent() {
        let store_error: BoxError = "duplicate key value violates unique constraint".into();
        let error = AuditError::Store(store_error);

        assert_eq!(
            error.to_string(),
            "duplicate key value violates unique constraint"
        );
        assert!(error.source_error().is_some());
    }
}
