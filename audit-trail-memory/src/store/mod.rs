pub mod add;
pub mod detect_changes;
pub mod load;
pub mod metadata;
pub mod remove;
pub mod save_changes;
pub mod transaction;
pub mod update;
