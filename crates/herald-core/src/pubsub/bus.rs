//! The event bus: name-addressed subscribe/once/publish with awaitable delivery.
//!
//! A `Bus` owns a registry of per-event subscription lists and a dispatcher
//! that fans a published payload out to every current subscriber. Publish
//! resolves only after every subscriber -- synchronous or asynchronous -- has
//! finished, and surfaces every subscriber failure to the publisher in
//! aggregate.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use futures_util::future::join_all;
use herald_types::payload::Payload;
use herald_types::subscription::SubscriptionId;
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::handle::SubscriptionHandle;
use super::handler::Handler;
use super::registry::{Registry, SubscriptionEntry};

/// One subscriber's failure during a dispatch pass.
///
/// Failures are isolated per subscriber: a failing handler never prevents
/// siblings from running, completing, or being auto-removed.
#[derive(Debug)]
pub struct SubscriberFailure {
    /// Identity of the subscription whose handler failed.
    pub subscription: SubscriptionId,
    /// The error the handler returned.
    pub error: anyhow::Error,
}

impl fmt::Display for SubscriberFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscription {}: {}", self.subscription, self.error)
    }
}

/// Aggregate failure outcome of a publish call.
///
/// Carries every failure from the pass, each tagged with its originating
/// subscription. Successful siblings in the same pass have already run to
/// completion by the time this is returned.
#[derive(Debug, Error)]
#[error("{} subscriber(s) failed for event '{event}'", .failures.len())]
pub struct PublishError {
    /// The published event name.
    pub event: String,
    /// Every failed subscriber in the pass, in snapshot order.
    pub failures: Vec<SubscriberFailure>,
}

pub(crate) struct BusInner {
    pub(crate) registry: Registry,
}

/// In-process publish/subscribe event bus.
///
/// Cloning is cheap (Arc-backed); clones share the same registry. Construct
/// one explicitly and pass it to the components that need it, or use
/// [`crate::global::global`] for a process-wide shared default.
///
/// ### Properties
/// - Delivery *starts* in subscription-registration order; completion order
///   is unconstrained for asynchronous handlers.
/// - Each publish operates on a snapshot taken at call time: registry
///   mutations during a pass never affect that pass's membership.
/// - `once` registrations are delivered at most once, ever, and removed
///   before their publish cycle completes -- even when the handler fails.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<BusInner>,
}

impl Bus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                registry: Registry::new(),
            }),
        }
    }

    /// Subscribe a handler to an event.
    ///
    /// The handler is invoked on every subsequent publish of `event` until
    /// the returned handle unsubscribes it (or the event is cleared).
    pub fn subscribe(&self, event: &str, handler: Handler) -> SubscriptionHandle {
        self.register(event, handler, false)
    }

    /// Subscribe a handler to a single delivery of an event.
    ///
    /// The registration is removed automatically after its first delivery
    /// completes, whether the handler succeeded or failed.
    pub fn once(&self, event: &str, handler: Handler) -> SubscriptionHandle {
        self.register(event, handler, true)
    }

    fn register(&self, event: &str, handler: Handler, once: bool) -> SubscriptionHandle {
        let entry = SubscriptionEntry::new(event, handler, once);
        let id = entry.id;
        self.inner.registry.add(entry);
        debug!(%event, %id, once, "registered subscriber");
        SubscriptionHandle::new(Arc::downgrade(&self.inner), event.to_string(), id)
    }

    /// Publish an event to all current subscribers and await full propagation.
    ///
    /// Takes a snapshot of the subscription list at call time, starts every
    /// handler in registration order without waiting for earlier ones to
    /// finish, and resolves once all of them have settled. Subscribers added
    /// during the pass are not part of it; subscribers removed during the
    /// pass but present in the snapshot still fire.
    ///
    /// Publishing an event with no subscribers completes immediately with
    /// `Ok(())` and no side effects.
    ///
    /// The bus provides no timeout: a handler that never settles means a
    /// publish that never settles.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] aggregating every subscriber that failed in
    /// the pass. Failures never short-circuit sibling delivery or `once`
    /// cleanup.
    pub async fn publish(&self, event: &str, payload: Payload) -> Result<(), PublishError> {
        let snapshot = self.inner.registry.snapshot(event);
        if snapshot.is_empty() {
            trace!(%event, "publish with no subscribers");
            return Ok(());
        }
        debug!(%event, subscribers = snapshot.len(), "dispatching event");

        let registry = &self.inner.registry;
        let steps = snapshot.into_iter().map(|entry| {
            let payload = payload.clone();
            async move {
                // A `once` entry can sit in two overlapping snapshots; the
                // claim flag keeps delivery at-most-once.
                if entry.once && entry.fired.swap(true, Ordering::AcqRel) {
                    return None;
                }
                let result = entry.handler.call(payload).await;
                if entry.once {
                    registry.remove(&entry.event, entry.id);
                }
                result.err().map(|error| SubscriberFailure {
                    subscription: entry.id,
                    error,
                })
            }
        });

        let failures: Vec<SubscriberFailure> =
            join_all(steps).await.into_iter().flatten().collect();
        if failures.is_empty() {
            Ok(())
        } else {
            warn!(%event, failed = failures.len(), "subscriber failures during dispatch");
            Err(PublishError {
                event: event.to_string(),
                failures,
            })
        }
    }

    /// Remove every subscription for one event. Unknown events are a no-op.
    pub fn clear(&self, event: &str) {
        self.inner.registry.clear_event(event);
        debug!(%event, "cleared event subscriptions");
    }

    /// Remove every subscription for every event.
    pub fn clear_all(&self) {
        self.inner.registry.clear_all();
        debug!("cleared all subscriptions");
    }

    /// Names of events currently holding at least one subscription.
    ///
    /// Order is unspecified.
    pub fn active_events(&self) -> Vec<String> {
        self.inner.registry.active_events()
    }

    /// Number of subscriptions for `event` (0 when unknown).
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.inner.registry.subscriber_count(event)
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("events", &self.inner.registry.event_count())
            .field("subscriptions", &self.inner.registry.subscription_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
