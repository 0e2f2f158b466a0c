pub mod persister_impl;
pub mod save_changes;
pub mod state;

pub use persister_impl::TransactionalPersister;
pub use state::PersisterState;
