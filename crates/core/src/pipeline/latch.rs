use std::sync::atomic::{AtomicBool, Ordering};

/// Lets a repeated condition produce one notice until it clears.
///
/// `trip` returns true only on the first call after construction or `rearm`.
#[derive(Debug)]
pub struct NoticeLatch {
    armed: AtomicBool,
}

impl Default for NoticeLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeLatch {
    pub fn new() -> Self {
        Self {
            armed: AtomicBool::new(true),
        }
    }

    pub fn trip(&self) -> bool {
        self.armed.swap(false, Ordering::SeqCst)
    }

    pub fn rearm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trips_once_per_arming() {
        let latch = NoticeLatch::new();
        assert!(latch.trip());
        assert!(!latch.trip());
        assert!(!latch.trip());

        latch.rearm();
        assert!(latch.trip());
        assert!(!latch.trip());
    }
}
