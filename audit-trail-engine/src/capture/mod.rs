pub mod capture_changes;

pub use capture_changes::capture_changes;
