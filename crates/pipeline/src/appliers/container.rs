//! Applies container proposals through [`ContainerRepo`].

use async_trait::async_trait;
use sqlx::PgConnection;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::container::{CreateContainer, UpdateContainer};
use attic_db::repositories::ContainerRepo;

use crate::applier::{check_rules, map_db_error, parse_payload, target_gone, Applier};

pub struct ContainerApplier;

#[async_trait]
impl Applier for ContainerApplier {
    async fn apply_create(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<DbId, CoreError> {
        let input: CreateContainer = parse_payload(payload)?;
        check_rules(&input)?;
        let container = ContainerRepo::create(conn, workspace_id, &input)
            .await
            .map_err(map_db_error)?;
        Ok(container.id)
    }

    async fn apply_update(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<(), CoreError> {
        let input: UpdateContainer = parse_payload(payload)?;
        check_rules(&input)?;
        ContainerRepo::update(conn, workspace_id, entity_id, &input)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| target_gone("container", entity_id))
    }

    async fn apply_delete(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
    ) -> Result<(), CoreError> {
        ContainerRepo::archive(conn, workspace_id, entity_id)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
