//! The in-process event bus.
//!
//! A thin wrapper around `tokio::sync::broadcast`: publishers never block
//! and never fail, subscribers each see every event published after they
//! subscribed. Shared across the application as `Arc<EventBus>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use attic_core::types::DbId;

/// One thing that happened: a pending-change transition, a direct
/// mutation, a membership change.
///
/// Build with [`LifecycleEvent::new`] and the chainable setters; only the
/// event type is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Dot-separated name, e.g. `"change.approved"` or `"item.created"`.
    pub event_type: String,
    /// Tenant the event happened in.
    pub workspace_id: Option<DbId>,
    /// Kind of the entity the event is about (e.g. `"pending_change"`).
    pub source_entity_type: Option<String>,
    /// Id of the entity the event is about.
    pub source_entity_id: Option<DbId>,
    /// User whose action produced the event.
    pub actor_user_id: Option<DbId>,
    /// Event-specific details.
    pub payload: serde_json::Value,
    /// Creation time (UTC).
    pub timestamp: DateTime<Utc>,
}

impl LifecycleEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            workspace_id: None,
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Scope the event to a workspace.
    pub fn in_workspace(mut self, workspace_id: DbId) -> Self {
        self.workspace_id = Some(workspace_id);
        self
    }

    /// Name the entity the event is about.
    pub fn for_entity(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    /// Record the acting user.
    pub fn by_user(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Attach event-specific details.
    pub fn with_details(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Broadcast capacity used by [`EventBus::new`]. Slow subscribers past
/// this many buffered events start missing the oldest ones (and are told
/// so via `RecvError::Lagged`).
const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out hub for [`LifecycleEvent`]s.
pub struct EventBus {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl EventBus {
    /// A bus with the default buffer capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A bus with an explicit buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to whoever is listening.
    ///
    /// With zero subscribers the event is dropped on the floor; that is
    /// the documented best-effort contract, not an error.
    pub fn publish(&self, event: LifecycleEvent) {
        let _ = self.sender.send(event);
    }

    /// Start receiving every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(
            LifecycleEvent::new("change.submitted")
                .in_workspace(3)
                .for_entity("pending_change", 42)
                .by_user(7)
                .with_details(serde_json::json!({"action": "create"})),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, "change.submitted");
        assert_eq!(event.workspace_id, Some(3));
        assert_eq!(event.source_entity_type.as_deref(), Some("pending_change"));
        assert_eq!(event.source_entity_id, Some(42));
        assert_eq!(event.actor_user_id, Some(7));
        assert_eq!(event.payload["action"], "create");
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(LifecycleEvent::new("change.approved"));

        assert_eq!(first.recv().await.unwrap().event_type, "change.approved");
        assert_eq!(second.recv().await.unwrap().event_type, "change.approved");
    }

    #[tokio::test]
    async fn publishing_with_no_subscribers_is_fine() {
        EventBus::new().publish(LifecycleEvent::new("change.rejected"));
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.publish(LifecycleEvent::new("before"));

        let mut rx = bus.subscribe();
        bus.publish(LifecycleEvent::new("after"));

        assert_eq!(rx.recv().await.unwrap().event_type, "after");
    }
}
