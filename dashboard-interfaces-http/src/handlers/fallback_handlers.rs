use crate::error::HttpError;

pub async fn not_found() -> HttpError {
    HttpError::NotFound
}
