use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Form;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// `Form<T>` whose rejections (wrong content type, oversized or malformed
/// body) go through the error pages like any other route failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(FormBody(value)),
            Err(rejection) => Err(HttpError::Rejected {
                status: rejection.status(),
                detail: rejection.body_text(),
            }),
        }
    }
}
