use sea_orm::error::DbErr;
use sea_orm::TransactionError;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Infrastructure-level errors raised while bootstrapping the process
/// (configuration, connection pool, migrations).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Errors surfaced by ledger and grid operations.
///
/// Every variant maps to one bucket of the failure taxonomy: missing
/// references, pre-mutation validation rejections, store-level transaction
/// failures (always fully rolled back), and ownership mismatches.
#[derive(Error, Debug, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Transaction timed out after {0:?}")]
    TransactionTimeout(#[serde(skip)] Duration),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", entity, id))
    }
}

impl From<TransactionError<ServiceError>> for ServiceError {
    fn from(err: TransactionError<ServiceError>) -> Self {
        match err {
            TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
            TransactionError::Transaction(service_err) => service_err,
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_error_unwraps_inner_service_error() {
        let inner = ServiceError::NotFound("sale abc".into());
        let wrapped = TransactionError::Transaction(inner);
        match ServiceError::from(wrapped) {
            ServiceError::NotFound(msg) => assert_eq!(msg, "sale abc"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn not_found_formats_entity_and_id() {
        let err = ServiceError::not_found("Sheet", 42);
        assert_eq!(err.to_string(), "Not found: Sheet 42 not found");
    }
}
