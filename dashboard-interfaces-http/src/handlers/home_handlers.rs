use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use minijinja::context;

use dashboard_application::queries::task_queries;

use crate::error::HttpError;
use crate::state::WebState;
use crate::views::PageMeta;

pub async fn index(
    State(state): State<WebState>,
    page: PageMeta,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, HttpError> {
    let tasks = task_queries::list_tasks(&state.app).await?;
    state.views.page(
        StatusCode::OK,
        "index.html",
        &page,
        context! { tasks => tasks, deleted => query.contains_key("deleted") },
    )
}
