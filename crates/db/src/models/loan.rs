//! Loan entity model and DTOs. A loan ties an item to a borrower; a NULL
//! `returned_at` means the loan is still open.

use attic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `loans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Loan {
    pub id: DbId,
    pub workspace_id: DbId,
    pub item_id: DbId,
    pub borrower_id: DbId,
    pub loaned_at: Timestamp,
    pub due_at: Option<Timestamp>,
    pub returned_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a loan. `loaned_at` defaults to now.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLoan {
    pub item_id: DbId,
    pub borrower_id: DbId,
    pub due_at: Option<Timestamp>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// DTO for updating a loan (marking returned, shifting the due date).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLoan {
    pub due_at: Option<Timestamp>,
    pub returned_at: Option<Timestamp>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub notes: Option<String>,
}
