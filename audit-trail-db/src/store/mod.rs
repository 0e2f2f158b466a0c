pub mod change_tracker;
pub mod entity_metadata;
pub mod persistence;
pub mod transaction_control;

// Re-exports
pub use change_tracker::*;
pub use entity_metadata::*;
pub use persistence::*;
pub use transaction_control::*;

/// A store the audit engine can run a unit of work against.
///
/// Implemented automatically for every type providing all collaborator traits.
pub trait AuditStore: EntityMetadata + ChangeTracker + TransactionControl + Persistence + Send {}

impl<S> AuditStore for S where S: EntityMetadata + ChangeTracker + TransactionControl + Persistence + Send {}
