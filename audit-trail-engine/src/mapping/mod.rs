pub mod callback;
pub mod finalize;
pub mod invoke;

pub use callback::{AuditMappingCallback, AuditMappingFuture, AuditTrail};
pub use finalize::finalize_rows;
pub use invoke::invoke_mapping;
