pub mod cancellation;
pub mod error;

pub use cancellation::*;
pub use error::*;
