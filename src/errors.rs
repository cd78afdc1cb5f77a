use sea_orm::error::{DbErr, SqlErr};
use serde::Serialize;

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        sea_orm::error::DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

/// Message fragments SQLite and Postgres use for the declarative constraints
/// that sea-orm does not classify on its own.
const CONSTRAINT_MARKERS: [&str; 5] = [
    "NOT NULL constraint failed",
    "CHECK constraint failed",
    "violates not-null constraint",
    "violates check constraint",
    "UNIQUE constraint failed",
];

impl ServiceError {
    /// Classifies a database error by the constraint that rejected the statement.
    pub fn from_db_err(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                return ServiceError::ForeignKeyViolation(msg);
            }
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                return ServiceError::ConstraintViolation(msg);
            }
            _ => {}
        }

        let message = err.to_string();
        if message.contains("FOREIGN KEY constraint failed")
            || message.contains("violates foreign key constraint")
        {
            return ServiceError::ForeignKeyViolation(message);
        }
        if CONSTRAINT_MARKERS
            .iter()
            .any(|marker| message.contains(marker))
        {
            return ServiceError::ConstraintViolation(message);
        }

        ServiceError::DatabaseError(err)
    }

    /// True when the error came from a schema constraint rather than the connection.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            ServiceError::ForeignKeyViolation(_) | ServiceError::ConstraintViolation(_)
        )
    }
}

// Type alias kept for call sites that speak in application terms
pub type AppError = ServiceError;
