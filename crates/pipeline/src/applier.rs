//! The `Applier` trait: how an approved proposal is replayed against a
//! specific entity type, plus shared payload/error helpers used by every
//! implementation in [`crate::appliers`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sqlx::PgConnection;
use validator::Validate;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_core::validate::first_error;

/// Replays proposals for one entity type through its domain repository.
///
/// Implementations run inside the approve transaction: the connection they
/// receive is the transaction's, so any error rolls the whole review back.
/// They enforce the same DTO validation the direct mutation path uses,
/// which is what guarantees identical business rules on both paths.
#[async_trait]
pub trait Applier: Send + Sync {
    /// Validate the payload as a creation request and insert the entity,
    /// returning the new id.
    async fn apply_create(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<DbId, CoreError>;

    /// Merge the payload onto the entity captured at submission time.
    ///
    /// A target that no longer exists (deleted or archived since the
    /// proposal was submitted) is a [`CoreError::Conflict`], never a silent
    /// success.
    async fn apply_update(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<(), CoreError>;

    /// Archive the target entity. An already-absent target is a successful
    /// no-op; delete is naturally idempotent.
    async fn apply_delete(
        &self,
        conn: &mut PgConnection,
        workspace_id: DbId,
        entity_id: DbId,
    ) -> Result<(), CoreError>;
}

/// Deserialize a stored payload into a typed DTO.
///
/// Shape errors (unknown structure, wrong types) are validation failures:
/// the payload never matched the entity's contract.
pub fn parse_payload<T: DeserializeOwned>(payload: &serde_json::Value) -> Result<T, CoreError> {
    serde_json::from_value(payload.clone())
        .map_err(|e| CoreError::Validation(format!("Payload does not match entity contract: {e}")))
}

/// Run DTO field rules, surfacing the first failure with its field name.
pub fn check_rules<T: Validate>(dto: &T) -> Result<(), CoreError> {
    dto.validate().map_err(|errors| {
        let (field, message) = first_error(&errors);
        CoreError::Apply {
            field: Some(field),
            message,
        }
    })
}

/// The conflict error for an update whose target vanished between
/// submission and review.
pub fn target_gone(entity: &str, entity_id: DbId) -> CoreError {
    CoreError::Conflict(format!("{entity} {entity_id} no longer exists"))
}

/// Translate a database error raised during apply into a reviewer-facing
/// error.
///
/// Unique violations (constraint names `uq_<table>_workspace_<field>`) and
/// foreign-key violations are domain-rule failures the reviewer can act
/// on; anything else is an internal error.
pub fn map_db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            // unique_violation
            Some("23505") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                let field = constraint
                    .split_once("_workspace_")
                    .map(|(_, field)| field.to_string());
                return CoreError::Apply {
                    field,
                    message: format!("duplicate value violates unique constraint {constraint}"),
                };
            }
            // foreign_key_violation
            Some("23503") => {
                return CoreError::Apply {
                    field: None,
                    message: "referenced entity does not exist".to_string(),
                };
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error during apply");
    CoreError::Internal(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use attic_db::models::item::CreateItem;

    #[test]
    fn test_parse_payload_accepts_matching_shape() {
        let payload = serde_json::json!({"name": "Drill", "quantity": 2});
        let dto: CreateItem = parse_payload(&payload).unwrap();
        assert_eq!(dto.name, "Drill");
        assert_eq!(dto.quantity, Some(2));
    }

    #[test]
    fn test_parse_payload_rejects_wrong_types() {
        let payload = serde_json::json!({"name": "Drill", "quantity": "two"});
        let result: Result<CreateItem, _> = parse_payload(&payload);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_check_rules_reports_offending_field() {
        let dto = CreateItem {
            name: String::new(),
            description: None,
            asset_tag: None,
            quantity: None,
            purchase_price_cents: None,
            location_id: None,
            container_id: None,
            category_id: None,
        };
        let err = check_rules(&dto).unwrap_err();
        assert_matches!(err, CoreError::Apply { field: Some(ref f), .. } if f == "name");
    }
}
