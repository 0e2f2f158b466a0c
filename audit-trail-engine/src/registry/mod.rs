pub mod registry_impl;
pub mod remove_columns;
pub mod remove_entity;
pub mod set_column;
pub mod set_columns;
pub mod validation;

pub use registry_impl::AuditConfigurationRegistry;
