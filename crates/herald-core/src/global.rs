//! Process-wide shared bus instance.
//!
//! Prefer constructing a [`Bus`](crate::pubsub::Bus) explicitly and passing
//! it to the components that need it -- the bus is `Clone` and Arc-backed
//! exactly for that. Where a shared default is genuinely required (loosely
//! coupled components with no common construction site), this accessor
//! provides one with lazy, race-free initialization.

use std::sync::OnceLock;

use crate::pubsub::Bus;

/// The lazily-constructed shared instance.
static GLOBAL: OnceLock<Bus> = OnceLock::new();

/// The process-wide shared bus.
///
/// Constructed exactly once on first call, even under concurrent first access
/// from multiple tasks or threads; every call returns the same instance. The
/// instance lives for the process lifetime -- there is no teardown beyond
/// [`Bus::clear_all`](crate::pubsub::Bus::clear_all).
pub fn global() -> &'static Bus {
    GLOBAL.get_or_init(Bus::new)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubsub::Handler;
    use herald_types::payload::Payload;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn global_returns_the_same_instance() {
        assert!(std::ptr::eq(global(), global()));

        // A subscription made through one access is visible through another.
        // Namespaced event so this test stays independent of other users of
        // the shared instance.
        let seen = Arc::new(Mutex::new(0u32));
        let seen_clone = Arc::clone(&seen);
        let handle = global().subscribe(
            "global-test:ping",
            Handler::sync(move |_| {
                *seen_clone.lock().unwrap() += 1;
                Ok(())
            }),
        );
        assert_eq!(global().subscriber_count("global-test:ping"), 1);

        global()
            .publish("global-test:ping", Payload::empty())
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), 1);

        handle.unsubscribe();
        assert_eq!(global().subscriber_count("global-test:ping"), 0);
    }
}
