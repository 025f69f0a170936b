use crate::enrollment::EligibilityError;
use database::DbError;
use thiserror::Error;
use tracing::error;

/// The caller-facing error taxonomy.
///
/// Validation and eligibility failures are expected business outcomes and
/// carry their reason verbatim. Persistence failures are logged with full
/// detail internally and surface only as a generic message; they are never
/// retried automatically since writes are not proven idempotent.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Ineligible(#[from] EligibilityError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("The operation could not be completed")]
    Persistence,
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => ServiceError::NotFound("record"),
            other => {
                error!(cause = %other, "database operation failed");
                ServiceError::Persistence
            }
        }
    }
}
