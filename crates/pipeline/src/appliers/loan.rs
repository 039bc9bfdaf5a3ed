//! Applies loan proposals through [`LoanRepo`]. Dangling item/borrower
//! references surface as apply errors via foreign-key violations.

use async_trait::async_trait;
use sqlx::PgConnection;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::loan::{CreateLoan, UpdateLoan};
use attic_db::repositories::LoanRepo;

use crate::applier::{check_rules, map_db_error, parse_payload, target_gone, Applier};

pub struct LoanApplier;

#[async_trait]
impl Applier for LoanApplier {
    async fn apply_create(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<DbId, CoreError> {
        let input: CreateLoan = parse_payload(payload)?;
        check_rules(&input)?;
        let loan = LoanRepo::create(conn, workspace_id, &input)
            .await
            .map_err(map_db_error)?;
        Ok(loan.id)
    }

    async fn apply_update(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<(), CoreError> {
        let input: UpdateLoan = parse_payload(payload)?;
        check_rules(&input)?;
        LoanRepo::update(conn, workspace_id, entity_id, &input)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| target_gone("loan", entity_id))
    }

    async fn apply_delete(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
    ) -> Result<(), CoreError> {
        LoanRepo::archive(conn, workspace_id, entity_id)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
