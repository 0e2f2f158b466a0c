pub mod capture;
pub mod configuration;
pub mod context;
pub mod mapping;
pub mod persister;
pub mod registry;

pub use configuration::{AuditPlan, AuditTrailConfigurator, AutoExclude, TableConfigurator, TablePlan};
pub use context::AuditContext;
pub use mapping::{AuditMappingCallback, AuditTrail};
pub use persister::{PersisterState, TransactionalPersister};
pub use registry::AuditConfigurationRegistry;

#[cfg(test)]
pub mod test_helper;
