use thiserror::Error;

use crate::database::models::FieldErrors;
use crate::database::DatabaseError;

/// Failures surfaced by the ownership-scoped repository
#[derive(Debug, Error)]
pub enum RepoError {
    /// The record is absent or belongs to someone else. The two cases are never told apart.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl RepoError {
    pub fn not_found(entity: &'static str) -> Self {
        RepoError::NotFound { entity }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound { .. })
    }
}

impl From<FieldErrors> for RepoError {
    fn from(errors: FieldErrors) -> Self {
        RepoError::Validation(errors)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
