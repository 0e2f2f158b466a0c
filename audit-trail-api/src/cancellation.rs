use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag threaded through every suspension point of a commit.
///
/// Clones share the same flag, so a token handed to the mapping callback observes a
/// cancellation raised by the caller.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Marks the token as cancelled.
    ///
    /// Returns `true` the first time, `false` if it was already cancelled.
    pub fn cancel(&self) -> bool {
        self.flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = Cancellation::new();
        let child = token.clone();

        assert!(!child.is_cancelled());
        assert!(token.cancel());
        assert!(!token.cancel());
        assert!(child.is_cancelled());
    }
}
