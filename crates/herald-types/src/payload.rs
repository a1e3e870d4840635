//! The argument payload carried by a published event.
//!
//! Publishers decide the shape of the arguments; the bus passes them through
//! opaquely without validation or transformation. A `Payload` is an ordered
//! list of flexible JSON values behind an `Arc`, so a fan-out to many
//! subscribers shares a single allocation.

use std::sync::Arc;

use serde_json::Value;

/// Ordered, opaque argument list for a single publish call.
///
/// Cloning is cheap (bumps the `Arc`); every subscriber in a dispatch pass
/// observes the same values. An empty payload is valid -- events are often
/// pure signals with no arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    args: Arc<[Value]>,
}

impl Payload {
    /// An empty argument list.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a payload from an ordered list of arguments.
    pub fn new(args: Vec<Value>) -> Self {
        Self { args: args.into() }
    }

    /// Build a single-argument payload.
    pub fn single(value: Value) -> Self {
        Self::new(vec![value])
    }

    /// All arguments, in the order the publisher passed them.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The argument at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether the payload carries no arguments.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl From<Vec<Value>> for Payload {
    fn from(args: Vec<Value>) -> Self {
        Self::new(args)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::single(value)
    }
}

impl FromIterator<Value> for Payload {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            args: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
