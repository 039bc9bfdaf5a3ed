//! Attic event bus and audit infrastructure.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`LifecycleEvent`] -- the canonical domain event envelope.
//! - [`EventPersistence`] -- background service that durably writes every
//!   event to the `events` table.
//!
//! Publishing is best-effort by contract: a lost or unpersisted event is
//! logged but never fails or rolls back the operation that produced it.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, LifecycleEvent};
pub use persistence::EventPersistence;
