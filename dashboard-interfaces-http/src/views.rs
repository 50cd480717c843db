pub mod filters;

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use chrono::Datelike;
use minijinja::{context, Environment, Value};
use serde::Serialize;
use tracing::error;

use dashboard_domain::RuntimeConfig;

use crate::error::HttpError;

pub const REPOSITORY_URL: &str = "https://github.com/pa11y/pa11y-dashboard";
pub const BUGTRACKER_URL: &str = "https://github.com/pa11y/pa11y-dashboard/issues";

const TEMPLATES: &[(&str, &str)] = &[
    ("layout/default.html", include_str!("../templates/layout/default.html")),
    ("partials/task_form.html", include_str!("../templates/partials/task_form.html")),
    ("partials/result_messages.html", include_str!("../templates/partials/result_messages.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("task.html", include_str!("../templates/task.html")),
    ("result.html", include_str!("../templates/result.html")),
    ("new.html", include_str!("../templates/new.html")),
    ("edit.html", include_str!("../templates/edit.html")),
    ("delete.html", include_str!("../templates/delete.html")),
    ("404.html", include_str!("../templates/404.html")),
    ("500.html", include_str!("../templates/500.html")),
];

/// Compiled templates plus the locals every page sees.
#[derive(Clone)]
pub struct Views {
    env: Arc<Environment<'static>>,
}

impl Views {
    pub fn new(config: &RuntimeConfig) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        env.add_filter("date_format", filters::date_format);
        env.add_filter("simplify_url", filters::simplify_url);

        env.add_global("lang", "en");
        env.add_global("year", chrono::Utc::now().year());
        env.add_global("version", env!("CARGO_PKG_VERSION"));
        env.add_global("repo", REPOSITORY_URL);
        env.add_global("bugtracker", BUGTRACKER_URL);
        env.add_global("noindex", config.noindex);
        env.add_global("readonly", config.readonly);
        env.add_global("site_message", Value::from_serialize(&config.site_message));

        Ok(Self { env: Arc::new(env) })
    }

    pub fn render<T: Serialize>(
        &self,
        name: &str,
        page: &PageMeta,
        data: T,
    ) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(name)?;
        template.render(context! {
            is_home_page => page.is_home_page(),
            host => &page.host,
            ..Value::from_serialize(&data)
        })
    }

    pub fn page<T: Serialize>(
        &self,
        status: StatusCode,
        name: &str,
        page: &PageMeta,
        data: T,
    ) -> Result<Response, HttpError> {
        let body = self.render(name, page, data).map_err(|err| {
            error!("failed to render {}: {:#}", name, err);
            HttpError::Internal(format!("failed to render {}", name))
        })?;
        Ok((status, Html(body)).into_response())
    }
}

/// Per-request view locals.
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    pub path: String,
    pub host: String,
}

impl PageMeta {
    pub fn from_head(uri: &Uri, headers: &HeaderMap) -> Self {
        let host = headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| uri.host())
            .map(strip_port)
            .unwrap_or_default();
        Self {
            path: uri.path().to_string(),
            host,
        }
    }

    pub fn is_home_page(&self) -> bool {
        self.path == "/"
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PageMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PageMeta::from_head(&parts.uri, &parts.headers))
    }
}

fn strip_port(host: &str) -> String {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => host[..=end].to_string(),
            None => host.to_string(),
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name.to_string(),
        _ => host.to_string(),
    }
}
