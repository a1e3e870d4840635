//! Per-event subscription lists.
//!
//! The registry maps event names to ordered subscription lists. Insertion
//! order within an event determines dispatch start order. An event name never
//! maps to an empty list -- the key is dropped the moment its last
//! subscription is removed.
//!
//! The registry is owned exclusively by the bus; no guard is ever held across
//! an `.await`.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use dashmap::DashMap;
use herald_types::subscription::SubscriptionId;

use super::handler::Handler;

/// One registration: event name, callback, delivery mode, and identity.
pub(crate) struct SubscriptionEntry {
    pub(crate) id: SubscriptionId,
    pub(crate) event: String,
    pub(crate) handler: Handler,
    pub(crate) once: bool,
    /// Claim flag for `once` entries. Overlapping dispatch passes may both
    /// snapshot the same entry; only the pass that wins the swap delivers.
    pub(crate) fired: AtomicBool,
}

impl SubscriptionEntry {
    pub(crate) fn new(event: &str, handler: Handler, once: bool) -> Arc<Self> {
        Arc::new(Self {
            id: SubscriptionId::new(),
            event: event.to_string(),
            handler,
            once,
            fired: AtomicBool::new(false),
        })
    }
}

/// Event name -> ordered subscriptions for that event.
pub(crate) struct Registry {
    events: DashMap<String, Vec<Arc<SubscriptionEntry>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            events: DashMap::new(),
        }
    }

    /// Append an entry to its event's list, creating the list if absent.
    pub(crate) fn add(&self, entry: Arc<SubscriptionEntry>) {
        self.events
            .entry(entry.event.clone())
            .or_default()
            .push(entry);
    }

    /// Remove the entry with the given identity from `event`'s list.
    ///
    /// Returns `true` if something was removed. No-op (false) when the event
    /// or the id is unknown, which makes double-unsubscribe and
    /// unsubscribe-after-auto-removal safe.
    pub(crate) fn remove(&self, event: &str, id: SubscriptionId) -> bool {
        let removed = match self.events.get_mut(event) {
            Some(mut list) => {
                let before = list.len();
                list.retain(|entry| entry.id != id);
                before != list.len()
            }
            None => return false,
        };
        // The guard is dropped; remove_if re-checks emptiness under the shard
        // lock so a concurrent subscribe cannot be lost.
        self.events.remove_if(event, |_, list| list.is_empty());
        removed
    }

    /// A point-in-time copy of `event`'s subscription list.
    ///
    /// Dispatch passes iterate this copy, never the live list.
    pub(crate) fn snapshot(&self, event: &str) -> Vec<Arc<SubscriptionEntry>> {
        self.events
            .get(event)
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Drop one event's entire list. Unknown events are a no-op.
    pub(crate) fn clear_event(&self, event: &str) {
        self.events.remove(event);
    }

    /// Drop every event.
    pub(crate) fn clear_all(&self) {
        self.events.clear();
    }

    /// Names of events currently holding at least one subscription.
    ///
    /// Iteration order is unspecified.
    pub(crate) fn active_events(&self) -> Vec<String> {
        self.events.iter().map(|e| e.key().clone()).collect()
    }

    /// Number of subscriptions for `event` (0 when unknown).
    pub(crate) fn subscriber_count(&self, event: &str) -> usize {
        self.events.get(event).map(|list| list.len()).unwrap_or(0)
    }

    /// Number of events currently holding subscriptions.
    pub(crate) fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Total subscriptions across all events.
    pub(crate) fn subscription_count(&self) -> usize {
        self.events.iter().map(|e| e.value().len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler {
        Handler::sync(|_| Ok(()))
    }

    #[test]
    fn add_then_snapshot_preserves_order() {
        let registry = Registry::new();
        let a = SubscriptionEntry::new("jobs", noop(), false);
        let b = SubscriptionEntry::new("jobs", noop(), false);
        registry.add(Arc::clone(&a));
        registry.add(Arc::clone(&b));

        let snap = registry.snapshot("jobs");
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].id, a.id);
        assert_eq!(snap[1].id, b.id);
    }

    #[test]
    fn snapshot_of_unknown_event_is_empty() {
        let registry = Registry::new();
        assert!(registry.snapshot("nothing").is_empty());
    }

    #[test]
    fn removing_last_entry_drops_the_event_key() {
        let registry = Registry::new();
        let entry = SubscriptionEntry::new("jobs", noop(), false);
        let id = entry.id;
        registry.add(entry);
        assert_eq!(registry.active_events(), vec!["jobs".to_string()]);

        assert!(registry.remove("jobs", id));
        assert!(registry.active_events().is_empty());
        assert_eq!(registry.event_count(), 0);
    }

    #[test]
    fn remove_is_idempotent() {
        let registry = Registry::new();
        let entry = SubscriptionEntry::new("jobs", noop(), false);
        let id = entry.id;
        registry.add(entry);

        assert!(registry.remove("jobs", id));
        assert!(!registry.remove("jobs", id));
        assert!(!registry.remove("unknown", id));
    }

    #[test]
    fn remove_keeps_sibling_entries() {
        let registry = Registry::new();
        let a = SubscriptionEntry::new("jobs", noop(), false);
        let b = SubscriptionEntry::new("jobs", noop(), false);
        let a_id = a.id;
        let b_id = b.id;
        registry.add(a);
        registry.add(b);

        assert!(registry.remove("jobs", a_id));
        let snap = registry.snapshot("jobs");
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id, b_id);
    }

    #[test]
    fn clear_event_only_touches_that_event() {
        let registry = Registry::new();
        registry.add(SubscriptionEntry::new("a", noop(), false));
        registry.add(SubscriptionEntry::new("b", noop(), false));

        registry.clear_event("b");
        assert_eq!(registry.active_events(), vec!["a".to_string()]);
        // Clearing an unknown event is a no-op.
        registry.clear_event("b");
        assert_eq!(registry.subscriber_count("a"), 1);
    }

    #[test]
    fn clear_all_empties_the_registry() {
        let registry = Registry::new();
        registry.add(SubscriptionEntry::new("a", noop(), false));
        registry.add(SubscriptionEntry::new("b", noop(), false));

        registry.clear_all();
        assert!(registry.active_events().is_empty());
        assert_eq!(registry.subscription_count(), 0);
    }

    #[test]
    fn counts_track_entries() {
        let registry = Registry::new();
        registry.add(SubscriptionEntry::new("a", noop(), false));
        registry.add(SubscriptionEntry::new("a", noop(), true));
        registry.add(SubscriptionEntry::new("b", noop(), false));

        assert_eq!(registry.subscriber_count("a"), 2);
        assert_eq!(registry.subscriber_count("b"), 1);
        assert_eq!(registry.subscriber_count("c"), 0);
        assert_eq!(registry.event_count(), 2);
        assert_eq!(registry.subscription_count(), 3);
    }
}
