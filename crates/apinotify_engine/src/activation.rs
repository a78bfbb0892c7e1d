//! Process-wide activation flag.
//!
//! Embedders decide at startup whether sync runs at all (commonly off in
//! development and test environments). The flag is set once via [`init`]
//! and read-only thereafter; [`set_for_tests`] is the explicit escape
//! hatch for test code.

use std::sync::atomic::{AtomicBool, Ordering};

static ACTIVE: AtomicBool = AtomicBool::new(true);
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Sets the activation flag once at startup.
///
/// Later calls are ignored; use [`set_for_tests`] when a test needs to
/// flip the flag.
pub fn init(active: bool) {
    if INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
    {
        ACTIVE.store(active, Ordering::SeqCst);
    } else {
        tracing::debug!(active, "activation already initialized, ignoring");
    }
}

/// Returns true if sync is active. Defaults to true when [`init`] was
/// never called.
#[must_use]
pub fn is_active() -> bool {
    ACTIVE.load(Ordering::SeqCst)
}

/// Overrides the activation flag, bypassing the init-once rule.
///
/// For tests only; tests that flip the flag must run in their own
/// process (a dedicated integration-test binary) to avoid racing other
/// tests.
pub fn set_for_tests(active: bool) {
    ACTIVE.store(active, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_by_default() {
        // The flag-flipping tests live in tests/activation.rs, which runs
        // in its own process.
        assert!(is_active());
    }
}
