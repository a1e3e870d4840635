//! Uniform callback abstraction for subscribers.
//!
//! Subscribers can be synchronous or asynchronous; the dispatcher treats both
//! through a single shape. A `Handler` is a shared closure from `Payload` to
//! a boxed completion future -- synchronous callbacks are wrapped into an
//! already-completed future at call time.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use herald_types::payload::Payload;

type HandlerFn = dyn Fn(Payload) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync;

/// A subscriber callback.
///
/// Cloning is cheap (shared closure). Handlers report failure by returning
/// `Err`; returned success values are discarded by the dispatcher. The same
/// `Handler` can back several subscriptions -- each registration still gets
/// its own identity on the bus.
#[derive(Clone)]
pub struct Handler {
    f: Arc<HandlerFn>,
}

impl Handler {
    /// Build a handler from an asynchronous callback.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Payload) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            f: Arc::new(move |payload| -> BoxFuture<'static, anyhow::Result<()>> {
                Box::pin(f(payload))
            }),
        }
    }

    /// Build a handler from a synchronous callback.
    ///
    /// The callback runs to completion during its dispatch step; its result
    /// is wrapped in an already-completed future.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(Payload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(move |payload| -> BoxFuture<'static, anyhow::Result<()>> {
                Box::pin(std::future::ready(f(payload)))
            }),
        }
    }

    /// Invoke the callback for one dispatch step.
    pub(crate) fn call(&self, payload: Payload) -> BoxFuture<'static, anyhow::Result<()>> {
        (self.f)(payload)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[tokio::test]
    async fn async_handler_receives_payload() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let handler = Handler::new(move |payload: Payload| {
            let seen = Arc::clone(&seen_clone);
            async move {
                seen.lock()
                    .unwrap()
                    .push(payload.get(0).unwrap().as_str().unwrap().to_string());
                Ok(())
            }
        });

        handler.call(Payload::single(json!("hello"))).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn sync_handler_completes_immediately() {
        let handler = Handler::sync(|payload: Payload| {
            assert!(payload.is_empty());
            Ok(())
        });
        handler.call(Payload::empty()).await.unwrap();
    }

    #[tokio::test]
    async fn sync_handler_error_propagates() {
        let handler = Handler::sync(|_| Err(anyhow::anyhow!("boom")));
        let err = handler.call(Payload::empty()).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn clone_shares_the_callback() {
        let count = Arc::new(Mutex::new(0u32));
        let count_clone = Arc::clone(&count);
        let handler = Handler::sync(move |_| {
            *count_clone.lock().unwrap() += 1;
            Ok(())
        });

        let other = handler.clone();
        handler.call(Payload::empty()).await.unwrap();
        other.call(Payload::empty()).await.unwrap();
        assert_eq!(*count.lock().unwrap(), 2);
    }
}
