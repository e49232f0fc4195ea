//! Cooperative cancellation between invocations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag that stops a run before its next invocation.
///
/// Clones share the same flag, so one clone can be moved into a signal
/// handler while the pipeline checks another.
///
/// ```rust
/// use partzip::CancelFlag;
///
/// let flag = CancelFlag::new();
/// let handle = flag.clone();
/// handle.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Creates a flag that is not set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Returns true if it was already requested.
    pub fn cancel(&self) -> bool {
        self.cancelled.swap(true, Ordering::SeqCst)
    }

    /// Checks whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
