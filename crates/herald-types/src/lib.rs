//! Shared domain types for the Herald event bus.
//!
//! This crate contains the types that cross the bus boundary: the opaque
//! `Payload` publishers hand to `publish`, and the `SubscriptionId` identity
//! token that makes registrations individually addressable.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, uuid.

pub mod payload;
pub mod subscription;
