//! In-process publish/subscribe event bus.
//!
//! Components communicate through name-addressed events instead of direct
//! references: subscribers register handlers against an event name, and
//! publishers fan a payload out to every current subscriber, awaiting full
//! propagation. Purely an in-memory, single-process coordination primitive --
//! no networking, persistence, or delivery guarantees across restarts.

pub mod global;
pub mod pubsub;
