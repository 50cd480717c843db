use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use dashboard_application::AppError;
use dashboard_domain::BackendError;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    /// An extractor refused the request body.
    Rejected { status: StatusCode, detail: String },
    NotFound,
    Backend(BackendError),
    Internal(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::Backend(err) => HttpError::Backend(err),
            AppError::Validation(errors) => HttpError::BadRequest(errors.to_string()),
            AppError::NotFound => HttpError::NotFound,
        }
    }
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Rejected { status, .. } => *status,
            HttpError::NotFound => StatusCode::NOT_FOUND,
            HttpError::Backend(_) | HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn failure(&self) -> RouteFailure {
        let (message, detail) = match self {
            HttpError::BadRequest(msg) => (format!("Bad request: {}", msg), msg.clone()),
            HttpError::Rejected { status, detail } => (
                status.canonical_reason().unwrap_or("Bad request").to_string(),
                detail.clone(),
            ),
            HttpError::NotFound => ("Not found".to_string(), String::new()),
            HttpError::Backend(err) => (err.to_string(), err.detail()),
            HttpError::Internal(msg) => ("Internal server error".to_string(), msg.clone()),
        };
        RouteFailure {
            status: self.status(),
            message,
            detail,
        }
    }
}

/// Marker left on a response whose handler failed. The error-rendering
/// middleware turns it into the 404 or error page.
#[derive(Debug, Clone)]
pub struct RouteFailure {
    pub status: StatusCode,
    pub message: String,
    pub detail: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let failure = self.failure();
        let mut response = (failure.status, failure.message.clone()).into_response();
        response.extensions_mut().insert(failure);
        response
    }
}
