//! Capability-scoped unsubscribe tokens.

use std::sync::Weak;

use herald_types::subscription::SubscriptionId;
use tracing::debug;

use super::bus::BusInner;

/// Removes exactly one registration from the bus.
///
/// Returned by `Bus::subscribe` and `Bus::once`. Unsubscribing is idempotent:
/// the first call removes the registration, later calls (including calls
/// after a `once` auto-removal) are no-ops. Dropping the handle does NOT
/// unsubscribe -- a subscription's lifetime belongs to the bus, not to the
/// token.
///
/// The handle holds a weak reference, so it never keeps a dropped bus alive
/// and is safe to invoke after the bus is gone.
#[derive(Debug)]
pub struct SubscriptionHandle {
    inner: Weak<BusInner>,
    event: String,
    id: SubscriptionId,
}

impl SubscriptionHandle {
    pub(crate) fn new(inner: Weak<BusInner>, event: String, id: SubscriptionId) -> Self {
        Self { inner, event, id }
    }

    /// Identity of the registration this handle controls.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The event name this handle's registration listens on.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Remove the registration from the bus.
    ///
    /// Returns `true` if this call removed it, `false` if it was already gone
    /// (double-unsubscribe, `once` auto-removal, a `clear`, or a dropped bus).
    pub fn unsubscribe(&self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let removed = inner.registry.remove(&self.event, self.id);
        if removed {
            debug!(event = %self.event, id = %self.id, "unsubscribed");
        }
        removed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::pubsub::{Bus, Handler};

    #[test]
    fn handle_reports_its_registration() {
        let bus = Bus::new();
        let handle = bus.subscribe("jobs", Handler::sync(|_| Ok(())));
        assert_eq!(handle.event(), "jobs");

        let other = bus.subscribe("jobs", Handler::sync(|_| Ok(())));
        assert_ne!(handle.id(), other.id());
    }

    #[test]
    fn unsubscribe_after_bus_drop_is_a_noop() {
        let bus = Bus::new();
        let handle = bus.subscribe("jobs", Handler::sync(|_| Ok(())));
        drop(bus);
        assert!(!handle.unsubscribe());
    }

    #[test]
    fn unsubscribe_after_clear_is_a_noop() {
        let bus = Bus::new();
        let handle = bus.subscribe("jobs", Handler::sync(|_| Ok(())));
        bus.clear("jobs");
        assert!(!handle.unsubscribe());
    }
}
