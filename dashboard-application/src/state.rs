use std::sync::Arc;

use tokio::sync::broadcast;

use dashboard_domain::ports::WebserviceClient;
use dashboard_domain::RuntimeConfig;

use crate::events::RouteErrorEvent;

const ROUTE_ERROR_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RuntimeConfig>,
    pub webservice: Arc<dyn WebserviceClient>,
    pub route_errors: broadcast::Sender<RouteErrorEvent>,
}

impl AppState {
    pub fn new(config: RuntimeConfig, webservice: Arc<dyn WebserviceClient>) -> Self {
        let (route_errors, _) = broadcast::channel(ROUTE_ERROR_CAPACITY);
        Self {
            config: Arc::new(config),
            webservice,
            route_errors,
        }
    }

    pub fn subscribe_route_errors(&self) -> broadcast::Receiver<RouteErrorEvent> {
        self.route_errors.subscribe()
    }

    pub fn publish_route_error(&self, event: RouteErrorEvent) {
        // No subscriber is fine; the event is informational.
        let _ = self.route_errors.send(event);
    }
}
