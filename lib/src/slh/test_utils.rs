// Shared helpers for unit tests

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};

// The panic hook is process-global; swaps are serialized so a concurrent
// test can never restore the silent hook as the "previous" one.
static PANIC_HOOK: Mutex<()> = Mutex::new(());

/// Run `f` with panic output suppressed, restoring the previous hook even
/// when `f` itself panics.
pub(crate) fn silence_panics<R>(f: impl FnOnce() -> R) -> R {
    let _guard = PANIC_HOOK.lock().unwrap_or_else(PoisonError::into_inner);
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(previous);
    outcome.unwrap_or_else(|payload| panic::resume_unwind(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_restored_after_failure() {
        let inner = panic::catch_unwind(|| silence_panics(|| panic!("inside")));
        assert!(inner.is_err());

        // Still callable, and values pass through.
        assert_eq!(silence_panics(|| 5), 5);
    }
}
