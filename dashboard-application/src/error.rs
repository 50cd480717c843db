use thiserror::Error;

use dashboard_domain::BackendError;

use crate::dtos::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Backend(BackendError),
    #[error("invalid input: {0}")]
    Validation(ValidationErrors),
    #[error("not found")]
    NotFound,
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        if err.is_not_found() {
            AppError::NotFound
        } else {
            AppError::Backend(err)
        }
    }
}
