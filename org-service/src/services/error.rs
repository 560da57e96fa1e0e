use service_core::error::AppError;
use thiserror::Error;

use crate::repos::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Authorization denied. Carries no permission-key detail.
    #[error("Forbidden")]
    Forbidden,

    /// Deletion blocked by dependent records, e.g. "Department has attached
    /// users". Distinguishable so callers can emit 400 with the message.
    #[error("{0}")]
    DependencyConflict(String),

    /// Opaque persistence failure, propagated unmodified.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Forbidden => AppError::Forbidden(anyhow::anyhow!("Forbidden")),
            ServiceError::DependencyConflict(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            ServiceError::Repository(e) => AppError::DatabaseError(e.into_inner()),
        }
    }
}
