pub mod memory_store;
pub mod store;
pub mod utils;

pub use memory_store::{MemoryStore, MemoryStoreOptions};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
