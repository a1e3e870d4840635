//! Subscription identity.
//!
//! Every registration on the bus gets a `SubscriptionId` at creation time.
//! Removal is by this id, never by comparing handlers -- two subscriptions to
//! the same event holding the same closure are distinct registrations and
//! must be unsubscribable independently.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identity token for a single subscription.
///
/// UUIDv7, so ids are time-sortable in debug output. Equality and hashing are
/// the only operations the bus relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Mint a fresh id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
