//! Database-specific error types and conversions.

use authx_core::error::AuthxError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Malformed row: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique constraint violated on {entity}")]
    Conflict { entity: String },
}

impl DbError {
    /// Classify a failed statement. Unique index violations become
    /// [`DbError::Conflict`]; everything else is a query failure.
    pub(crate) fn from_statement(err: surrealdb::Error, entity: &str) -> Self {
        let msg = err.to_string();
        if msg.contains("already contains") {
            DbError::Conflict {
                entity: entity.into(),
            }
        } else {
            DbError::Query(msg)
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl From<DbError> for AuthxError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AuthxError::NotFound { entity, id },
            DbError::Conflict { entity } => AuthxError::AlreadyExists { entity },
            other => AuthxError::Database(other.to_string()),
        }
    }
}

/// Parse a UUID column stored as a string.
pub(crate) fn parse_uuid(raw: &str, column: &str) -> Result<uuid::Uuid, DbError> {
    uuid::Uuid::parse_str(raw).map_err(|e| DbError::Decode(format!("invalid {column} UUID: {e}")))
}
