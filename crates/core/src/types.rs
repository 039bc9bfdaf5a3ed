//! Shared scalar aliases.

/// Primary key type for every table (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// Point-in-time values are always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
