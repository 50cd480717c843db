use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use minijinja::context;
use tracing::error;

use dashboard_application::RouteErrorEvent;

use crate::error::RouteFailure;
use crate::state::WebState;
use crate::views::PageMeta;

/// Turns failed route responses into the 404 and error pages. Every
/// non-404 failure is also published on the route error channel.
pub async fn render_errors(State(state): State<WebState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let page = PageMeta::from_head(request.uri(), request.headers());

    let response = next.run(request).await;
    let Some(failure) = response.extensions().get::<RouteFailure>().cloned() else {
        return response;
    };

    if failure.status == StatusCode::NOT_FOUND {
        return render(&state, failure.status, "404.html", &page, context! {});
    }

    state.app.publish_route_error(RouteErrorEvent {
        method,
        path: page.path.clone(),
        status: failure.status.as_u16(),
        message: failure.message.clone(),
        detail: failure.detail.clone(),
    });

    let detail = if state.app.config.exposes_error_detail() && !failure.detail.is_empty() {
        Some(failure.detail)
    } else {
        None
    };
    render(
        &state,
        failure.status,
        "500.html",
        &page,
        context! { message => failure.message, detail => detail },
    )
}

fn render(
    state: &WebState,
    status: StatusCode,
    template: &str,
    page: &PageMeta,
    data: minijinja::Value,
) -> Response {
    match state.views.render(template, page, data) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            error!("failed to render {}: {:#}", template, err);
            (status, status.canonical_reason().unwrap_or("Error")).into_response()
        }
    }
}
