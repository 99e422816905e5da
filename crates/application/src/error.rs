use domain::{DomainError, RepositoryError};
use thiserror::Error;

use crate::cache::CacheError;
use crate::completion::CompletionApiError;
use crate::password::PasswordHasherError;
use crate::queue::QueueError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
    #[error("completion api error: {0}")]
    CompletionApi(#[from] CompletionApiError),
    #[error("password error: {0}")]
    Password(#[from] PasswordHasherError),
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
