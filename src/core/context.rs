use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-invocation execution context.
///
/// Carries the cancellation flag set by the Ctrl-C handler. Every executor
/// call takes one; a cancelled context kills the in-flight command.
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    cancelled: Arc<AtomicBool>,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing flag, e.g. the one a signal handler sets.
    pub fn with_flag(flag: Arc<AtomicBool>) -> Self {
        Self { cancelled: flag }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let ctx = ExecContext::new();
        let child = ctx.clone();
        assert!(!child.is_cancelled());
        ctx.cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn external_flag_is_observed() {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = ExecContext::with_flag(flag.clone());
        flag.store(true, Ordering::SeqCst);
        assert!(ctx.is_cancelled());
    }
}
