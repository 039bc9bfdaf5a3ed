//! Applies category proposals through [`CategoryRepo`]. Duplicate names
//! surface as apply errors on the `name` field via the unique constraint.

use async_trait::async_trait;
use sqlx::PgConnection;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::category::{CreateCategory, UpdateCategory};
use attic_db::repositories::CategoryRepo;

use crate::applier::{check_rules, map_db_error, parse_payload, target_gone, Applier};

pub struct CategoryApplier;

#[async_trait]
impl Applier for CategoryApplier {
    async fn apply_create(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<DbId, CoreError> {
        let input: CreateCategory = parse_payload(payload)?;
        check_rules(&input)?;
        let category = CategoryRepo::create(conn, workspace_id, &input)
            .await
            .map_err(map_db_error)?;
        Ok(category.id)
    }

    async fn apply_update(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<(), CoreError> {
        let input: UpdateCategory = parse_payload(payload)?;
        check_rules(&input)?;
        CategoryRepo::update(conn, workspace_id, entity_id, &input)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| target_gone("category", entity_id))
    }

    async fn apply_delete(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
    ) -> Result<(), CoreError> {
        CategoryRepo::archive(conn, workspace_id, entity_id)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
