use std::sync::Arc;

use axum::http::Method;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, MethodRouter};
use axum::Router;

use crate::handlers::{fallback_handlers, home_handlers, result_handlers, task_handlers};
use crate::middleware::{enforce_access, render_errors};
use crate::state::WebState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Read,
    Write,
}

pub struct RouteEntry {
    pub method: Method,
    pub path: &'static str,
    pub requires: Capability,
    pub handler: MethodRouter<WebState>,
}

impl RouteEntry {
    fn new(
        method: Method,
        path: &'static str,
        requires: Capability,
        handler: MethodRouter<WebState>,
    ) -> Self {
        Self {
            method,
            path,
            requires,
            handler,
        }
    }
}

/// Every page and form action the dashboard serves.
pub fn route_table() -> Vec<RouteEntry> {
    use Capability::{Read, Write};
    vec![
        RouteEntry::new(Method::GET, "/", Read, get(home_handlers::index)),
        RouteEntry::new(Method::GET, "/tasks/:id", Read, get(task_handlers::show_task)),
        RouteEntry::new(Method::GET, "/results/:id", Read, get(result_handlers::show_result)),
        RouteEntry::new(
            Method::GET,
            "/results/:id/download",
            Read,
            get(result_handlers::download_result),
        ),
        RouteEntry::new(Method::GET, "/tasks/new", Write, get(task_handlers::new_task_form)),
        RouteEntry::new(Method::POST, "/tasks", Write, post(task_handlers::create_task)),
        RouteEntry::new(Method::GET, "/tasks/:id/edit", Write, get(task_handlers::edit_task_form)),
        RouteEntry::new(Method::POST, "/tasks/:id", Write, post(task_handlers::edit_task)),
        RouteEntry::new(
            Method::GET,
            "/tasks/:id/delete",
            Write,
            get(task_handlers::delete_task_confirm),
        ),
        RouteEntry::new(Method::POST, "/tasks/:id/delete", Write, post(task_handlers::delete_task)),
        RouteEntry::new(Method::POST, "/tasks/:id/run", Write, post(task_handlers::run_task)),
        RouteEntry::new(Method::POST, "/tasks/:id/ignore", Write, post(task_handlers::ignore_rule)),
        RouteEntry::new(
            Method::POST,
            "/tasks/:id/unignore",
            Write,
            post(task_handlers::unignore_rule),
        ),
    ]
}

/// Entries a deployment mounts. Read-only deployments drop every write route.
pub fn mounted_routes(readonly: bool) -> Vec<RouteEntry> {
    route_table()
        .into_iter()
        .filter(|entry| !readonly || entry.requires == Capability::Read)
        .collect()
}

/// Distinct paths of the route table, in table order.
pub fn route_paths() -> Vec<&'static str> {
    let mut paths = Vec::new();
    for entry in route_table() {
        if !paths.contains(&entry.path) {
            paths.push(entry.path);
        }
    }
    paths
}

/// Routes behind the access gate. Methods a path does not register answer
/// 404 rather than 405, and write paths of a read-only deployment stay
/// mounted as 404s so they never fall through to a read route.
pub fn build_router(state: WebState) -> Router {
    let mut pending = mounted_routes(state.app.config.readonly);
    let mut router = Router::new();
    for path in route_paths() {
        let (here, rest): (Vec<_>, Vec<_>) =
            pending.into_iter().partition(|entry| entry.path == path);
        pending = rest;
        let methods = here
            .into_iter()
            .map(|entry| entry.handler)
            .reduce(MethodRouter::merge)
            .unwrap_or_else(MethodRouter::new);
        router = router.route(path, methods.fallback(fallback_handlers::not_found));
    }

    let policy = Arc::new(state.app.config.access.clone());
    router
        .fallback(fallback_handlers::not_found)
        .layer(from_fn_with_state(state.clone(), render_errors))
        .layer(from_fn_with_state(policy, enforce_access))
        .with_state(state)
}
