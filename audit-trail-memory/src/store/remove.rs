use audit_trail_api::BoxError;
use audit_trail_db::store::{EntryId, EntryState};

use crate::memory_store::MemoryStore;

impl MemoryStore {
    /// Marks a tracked entry for deletion; an entry that was only added is detached instead.
    pub fn remove(&mut self, entry: EntryId) -> Result<(), BoxError> {
        let tracked = self
            .state
            .entries
            .get_mut(&entry)
            .ok_or_else(|| format!("Entry {entry} is not tracked"))?;
        tracked.state = match tracked.state {
            EntryState::Added => EntryState::Detached,
            EntryState::Unchanged | EntryState::Modified => EntryState::Deleted,
            state => return Err(format!("Entry {entry} is {state:?} and can't be removed").into()),
        };
        Ok(())
    }

    pub(crate) fn remove_pending_impl(store: &mut MemoryStore, entry: EntryId) {
        if let Some(tracked) = store.state.entries.get_mut(&entry) {
            tracked.state = EntryState::Detached;
            tracked.modified.clear();
        }
    }
}
