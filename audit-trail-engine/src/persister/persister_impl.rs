use tracing::debug;

use audit_trail_db::store::AuditStore;

use super::state::PersisterState;
use crate::mapping::AuditTrail;

/// Drives one `save_changes` call through capture, the primary commit, mapping and the
/// audit commit, inside a single transaction when there is anything to audit.
pub struct TransactionalPersister<'a, S: AuditStore, C> {
    pub(crate) store: &'a mut S,
    pub(crate) trail: Option<&'a AuditTrail<C>>,
    pub(crate) state: PersisterState,
}

impl<'a, S: AuditStore, C> TransactionalPersister<'a, S, C> {
    /// A persister auditing through `trail`; `None` saves without auditing.
    pub fn new(store: &'a mut S, trail: Option<&'a AuditTrail<C>>) -> Self {
        Self {
            store,
            trail,
            state: PersisterState::Idle,
        }
    }

    pub fn state(&self) -> PersisterState {
        self.state
    }

    pub(crate) fn transition(&mut self, next: PersisterState) {
        debug!(from = %self.state, to = %next, "Persister state changed");
        self.state = next;
    }
}
