//! Applies item proposals through [`ItemRepo`].

use async_trait::async_trait;
use sqlx::PgConnection;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::item::{CreateItem, UpdateItem};
use attic_db::repositories::ItemRepo;

use crate::applier::{check_rules, map_db_error, parse_payload, target_gone, Applier};

pub struct ItemApplier;

#[async_trait]
impl Applier for ItemApplier {
    async fn apply_create(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<DbId, CoreError> {
        let input: CreateItem = parse_payload(payload)?;
        check_rules(&input)?;
        let item = ItemRepo::create(conn, workspace_id, &input)
            .await
            .map_err(map_db_error)?;
        Ok(item.id)
    }

    async fn apply_update(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<(), CoreError> {
        let input: UpdateItem = parse_payload(payload)?;
        check_rules(&input)?;
        ItemRepo::update(conn, workspace_id, entity_id, &input)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| target_gone("item", entity_id))
    }

    async fn apply_delete(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
    ) -> Result<(), CoreError> {
        ItemRepo::archive(conn, workspace_id, entity_id)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
