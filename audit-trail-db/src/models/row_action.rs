use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::store::EntryState;

/// The kind of change a tracked row underwent in a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "row_action", rename_all = "PascalCase"))]
pub enum RowAction {
    Added,
    Modified,
    Deleted,
}

impl RowAction {
    /// Maps a tracker state to a row action; unchanged and detached entries have none.
    pub fn from_state(state: EntryState) -> Option<Self> {
        match state {
            EntryState::Added => Some(RowAction::Added),
            EntryState::Modified => Some(RowAction::Modified),
            EntryState::Deleted => Some(RowAction::Deleted),
            EntryState::Unchanged | EntryState::Detached => None,
        }
    }
}

impl std::fmt::Display for RowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowAction::Added => write!(f, "Added"),
            RowAction::Modified => write!(f, "Modified"),
            RowAction::Deleted => write!(f, "Deleted"),
        }
    }
}

impl FromStr for RowAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Added" => Ok(RowAction::Added),
            "Modified" => Ok(RowAction::Modified),
            "Deleted" => Ok(RowAction::Deleted),
            _ => Err(()),
        }
    }
}
