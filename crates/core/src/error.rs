use crate::types::DbId;
use crate::validation::FieldError;

/// Domain-level error type shared by the db and api crates.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// One or more field constraints were violated. Carries the per-field
    /// messages so callers can report them individually.
    #[error("Validation failed: {}", format_fields(.0))]
    Validation(Vec<FieldError>),

    /// A delete was blocked by dependent records. `blockers` holds the
    /// names of the records that still reference the entity.
    #[error("Cannot delete {entity}: referenced by {}", .blockers.join(", "))]
    IntegrityBlocked {
        entity: &'static str,
        blockers: Vec<String>,
    },

    /// A transactional write failed due to a concurrent conflict. The
    /// operation was rolled back and is not retried automatically.
    #[error("Transaction aborted by a concurrent write")]
    TransactionAborted,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
