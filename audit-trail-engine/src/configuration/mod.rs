pub mod audit_trail_configurator;
pub mod auto_exclude;
pub mod plan;
pub mod selector;
pub mod table_configurator;

pub use audit_trail_configurator::AuditTrailConfigurator;
pub use auto_exclude::AutoExclude;
pub use plan::{AuditPlan, TablePlan};
pub use table_configurator::TableConfigurator;
