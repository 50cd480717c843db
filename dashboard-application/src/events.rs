use serde::Serialize;

/// Emitted for every request that ended in the error page.
#[derive(Debug, Clone, Serialize)]
pub struct RouteErrorEvent {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub message: String,
    pub detail: String,
}
