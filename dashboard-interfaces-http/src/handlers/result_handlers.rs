use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use dashboard_application::queries::result_queries;
use dashboard_domain::ReportFormat;

use crate::error::HttpError;
use crate::state::WebState;
use crate::views::PageMeta;

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    pub format: Option<String>,
}

pub async fn show_result(
    State(state): State<WebState>,
    page: PageMeta,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let detail = result_queries::result_detail(&state.app, &id).await?;
    state.views.page(StatusCode::OK, "result.html", &page, detail)
}

/// Streams the report straight from the webservice without buffering.
pub async fn download_result(
    State(state): State<WebState>,
    Path(id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, HttpError> {
    let format = match query.format.as_deref() {
        None | Some("") => ReportFormat::default(),
        Some(raw) => ReportFormat::parse(raw).ok_or(HttpError::NotFound)?,
    };
    let download = result_queries::download_result(&state.app, &id, format).await?;

    let mut response = Body::from_stream(download.body).into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&download.content_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&attachment(&id, format)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

fn attachment(id: &str, format: ReportFormat) -> String {
    let safe: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    format!(
        "attachment; filename=\"pa11y-result-{}.{}\"",
        safe,
        format.as_str()
    )
}
