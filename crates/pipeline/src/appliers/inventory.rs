//! Applies inventory-entry proposals through [`InventoryRepo`].

use async_trait::async_trait;
use sqlx::PgConnection;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::inventory::{CreateInventoryEntry, UpdateInventoryEntry};
use attic_db::repositories::InventoryRepo;

use crate::applier::{check_rules, map_db_error, parse_payload, target_gone, Applier};

pub struct InventoryApplier;

#[async_trait]
impl Applier for InventoryApplier {
    async fn apply_create(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<DbId, CoreError> {
        let input: CreateInventoryEntry = parse_payload(payload)?;
        check_rules(&input)?;
        let entry = InventoryRepo::create(conn, workspace_id, &input)
            .await
            .map_err(map_db_error)?;
        Ok(entry.id)
    }

    async fn apply_update(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<(), CoreError> {
        let input: UpdateInventoryEntry = parse_payload(payload)?;
        check_rules(&input)?;
        InventoryRepo::update(conn, workspace_id, entity_id, &input)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| target_gone("inventory entry", entity_id))
    }

    async fn apply_delete(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
    ) -> Result<(), CoreError> {
        InventoryRepo::archive(conn, workspace_id, entity_id)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
