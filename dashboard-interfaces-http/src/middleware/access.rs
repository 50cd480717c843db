use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};

use dashboard_domain::{AccessDecision, AccessPolicy, BASIC_AUTH_REALM};

/// Runs the configured access policy in front of every route. Requests
/// that fail the IP stage are redirected, requests that fail the
/// credential stage get a Basic challenge.
pub async fn enforce_access(
    State(policy): State<Arc<AccessPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = peer_ip(&request);
    let credentials = extract_basic(request.headers());
    let supplied = credentials
        .as_ref()
        .map(|(name, pass)| (name.as_str(), pass.as_str()));

    match policy.evaluate(peer, supplied) {
        AccessDecision::Allow => next.run(request).await,
        AccessDecision::Redirect(location) => {
            debug!(?peer, path = %request.uri().path(), "peer outside allowlist");
            redirect_found(&location)
        }
        AccessDecision::Challenge => {
            if credentials.is_some() {
                warn!(?peer, "rejected basic credentials");
            }
            challenge()
        }
    }
}

fn peer_ip(request: &Request) -> Option<IpAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

fn extract_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (name, pass) = decoded.split_once(':')?;
    Some((name.to_string(), pass.to_string()))
}

fn redirect_found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = StatusCode::FOUND.into_response();
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        Err(_) => StatusCode::FORBIDDEN.into_response(),
    }
}

fn challenge() -> Response {
    let mut response = Response::new(Body::from("Unauthorized"));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    let realm = format!("Basic realm=\"{}\"", BASIC_AUTH_REALM);
    if let Ok(value) = HeaderValue::from_str(&realm) {
        response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
    }
    response
}
