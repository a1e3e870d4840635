//! Publish/subscribe bus: registry, dispatcher, and subscription handles.
//!
//! This module provides the runtime event infrastructure:
//! - `bus` -- `Bus` with subscribe/once/publish/clear and failure aggregation
//! - `handler` -- `Handler`, the uniform sync/async callback abstraction
//! - `handle` -- `SubscriptionHandle`, the capability-scoped unsubscribe token
//! - `registry` -- per-event ordered subscription lists (internal)

pub mod bus;
pub mod handle;
pub mod handler;
mod registry;

pub use bus::{Bus, PublishError, SubscriberFailure};
pub use handle::SubscriptionHandle;
pub use handler::Handler;
