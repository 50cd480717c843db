use thiserror::Error;

/// Failure of a single call to pa11y-webservice.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Could not connect to pa11y-webservice")]
    Unreachable { detail: String },
    #[error("pa11y-webservice did not respond in time")]
    Timeout,
    #[error("pa11y-webservice responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response from pa11y-webservice: {0}")]
    Decode(String),
    #[error("request to pa11y-webservice failed: {0}")]
    Request(String),
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::Status { status: 404, .. })
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, BackendError::Unreachable { .. })
    }

    /// Underlying cause, for logs only. Never rendered in production.
    pub fn detail(&self) -> String {
        match self {
            BackendError::Unreachable { detail } => detail.clone(),
            other => other.to_string(),
        }
    }
}
