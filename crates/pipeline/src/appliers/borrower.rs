//! Applies borrower proposals through [`BorrowerRepo`].

use async_trait::async_trait;
use sqlx::PgConnection;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::borrower::{CreateBorrower, UpdateBorrower};
use attic_db::repositories::BorrowerRepo;

use crate::applier::{check_rules, map_db_error, parse_payload, target_gone, Applier};

pub struct BorrowerApplier;

#[async_trait]
impl Applier for BorrowerApplier {
    async fn apply_create(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<DbId, CoreError> {
        let input: CreateBorrower = parse_payload(payload)?;
        check_rules(&input)?;
        let borrower = BorrowerRepo::create(conn, workspace_id, &input)
            .await
            .map_err(map_db_error)?;
        Ok(borrower.id)
    }

    async fn apply_update(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<(), CoreError> {
        let input: UpdateBorrower = parse_payload(payload)?;
        check_rules(&input)?;
        BorrowerRepo::update(conn, workspace_id, entity_id, &input)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| target_gone("borrower", entity_id))
    }

    async fn apply_delete(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
    ) -> Result<(), CoreError> {
        BorrowerRepo::archive(conn, workspace_id, entity_id)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
