//! Borrower entity model and DTOs (people items can be loaned to).

use attic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `borrowers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Borrower {
    pub id: DbId,
    pub workspace_id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a borrower.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBorrower {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// DTO for updating a borrower.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBorrower {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}
