//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use syllabus_core::model::{SubjectError, TopicError};

/// Errors emitted by `SyllabusService` mutations.
///
/// Only domain validation surfaces here. Unknown subject or topic ids
/// are deliberately not errors: the mutation API treats them as silent
/// no-ops, and persistence failures never interrupt the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyllabusServiceError {
    #[error(transparent)]
    Subject(#[from] SubjectError),
    #[error(transparent)]
    Topic(#[from] TopicError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
