//! Writes every bus event into the `events` table.
//!
//! Runs as one long-lived background task spawned at startup. Failures are
//! logged and dropped: audit capture must never push back on the
//! operations that produce events.

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use attic_db::repositories::EventRepo;
use attic_db::DbPool;

use crate::bus::LifecycleEvent;

/// The audit-persistence task.
pub struct EventPersistence {
    pool: DbPool,
}

impl EventPersistence {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Consume events until the bus is dropped.
    ///
    /// A lagged receiver (buffer overrun) loses the oldest events; that is
    /// logged loudly but the loop keeps going with whatever is next.
    pub async fn run(self, mut receiver: Receiver<LifecycleEvent>) {
        loop {
            let event = match receiver.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Audit persistence fell behind; events lost");
                    continue;
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Event bus dropped; audit persistence stopping");
                    return;
                }
            };

            if let Err(e) = self.write(&event).await {
                tracing::error!(
                    error = %e,
                    event_type = %event.event_type,
                    "Could not persist audit event"
                );
            }
        }
    }

    async fn write(&self, event: &LifecycleEvent) -> Result<(), sqlx::Error> {
        EventRepo::insert(
            &self.pool,
            &event.event_type,
            event.workspace_id,
            event.source_entity_type.as_deref(),
            event.source_entity_id,
            event.actor_user_id,
            &event.payload,
        )
        .await?;
        Ok(())
    }
}
