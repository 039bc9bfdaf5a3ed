//! Applies location proposals through [`LocationRepo`].

use async_trait::async_trait;
use sqlx::PgConnection;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::location::{CreateLocation, UpdateLocation};
use attic_db::repositories::LocationRepo;

use crate::applier::{check_rules, map_db_error, parse_payload, target_gone, Applier};

pub struct LocationApplier;

#[async_trait]
impl Applier for LocationApplier {
    async fn apply_create(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<DbId, CoreError> {
        let input: CreateLocation = parse_payload(payload)?;
        check_rules(&input)?;
        let location = LocationRepo::create(conn, workspace_id, &input)
            .await
            .map_err(map_db_error)?;
        Ok(location.id)
    }

    async fn apply_update(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<(), CoreError> {
        let input: UpdateLocation = parse_payload(payload)?;
        check_rules(&input)?;
        LocationRepo::update(conn, workspace_id, entity_id, &input)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| target_gone("location", entity_id))
    }

    async fn apply_delete(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
    ) -> Result<(), CoreError> {
        LocationRepo::archive(conn, workspace_id, entity_id)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
