use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use axum::http::HeaderValue;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use dashboard_application::AppState;

use crate::routes::build_router;
use crate::state::WebState;
use crate::views::Views;

/// Full request pipeline: compression, static files from the public
/// directory, security headers, body limit, access gate, error pages and
/// finally the route table.
pub fn build_app(app: AppState) -> anyhow::Result<Router> {
    let views = Views::new(&app.config).context("failed to compile templates")?;
    let config = app.config.clone();
    let body_limit = usize::try_from(config.max_body_bytes).unwrap_or(usize::MAX);

    let routes = build_router(WebState { app, views })
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    let static_files = ServeDir::new(&config.public_dir)
        .append_index_html_on_directories(false)
        .call_fallback_on_method_not_allowed(true)
        .fallback(routes);

    info!(
        readonly = config.readonly,
        public_dir = %config.public_dir,
        deployment = config.deployment.as_str(),
        "dashboard routes assembled"
    );

    Ok(Router::new()
        .fallback_service(static_files)
        .layer(CompressionLayer::new()))
}
