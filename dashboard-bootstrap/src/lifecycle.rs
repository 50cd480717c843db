use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use dashboard_application::{AppState, RouteErrorEvent};
use dashboard_domain::{RuntimeConfig, WebserviceClient};
use dashboard_interfaces_http::build_app;

use crate::context::AppContext;

/// A running dashboard server.
pub struct DashboardHandle {
    local_addr: SocketAddr,
    state: AppState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server: JoinHandle<std::io::Result<()>>,
    error_log: JoinHandle<()>,
}

impl DashboardHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base URL of the bound listener, e.g. `http://127.0.0.1:4000`.
    pub fn address(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    pub fn subscribe_route_errors(&self) -> broadcast::Receiver<RouteErrorEvent> {
        self.state.subscribe_route_errors()
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let served = (&mut self.server).await;
        self.error_log.abort();
        served
            .context("server task panicked")?
            .context("server exited with an error")
    }
}

fn build_app_with_layers(state: AppState) -> Result<Router> {
    let timeout = Duration::from_secs(state.config.request_timeout_seconds);
    Ok(build_app(state)?
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http()))
}

/// Binds the configured address (port 0 picks a free port) and serves the
/// dashboard in the background.
pub async fn start(
    config: RuntimeConfig,
    webservice: Arc<dyn WebserviceClient>,
) -> Result<DashboardHandle> {
    let bind_addr = config.bind_addr();
    let state = AppState::new(config, webservice);
    let app = build_app_with_layers(state.clone())?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    let local_addr = listener.local_addr()?;
    info!("pa11y dashboard listening on http://{}", local_addr);

    let error_log = tokio::spawn(log_route_errors(state.subscribe_route_errors()));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        })
        .await
    });

    Ok(DashboardHandle {
        local_addr,
        state,
        shutdown_tx: Some(shutdown_tx),
        server,
        error_log,
    })
}

pub async fn run_standalone() -> Result<()> {
    let context = AppContext::new().await?;
    let handle = start(context.config, context.webservice).await?;

    shutdown_signal().await;
    info!("shutdown signal received, draining connections");
    handle.shutdown().await
}

async fn log_route_errors(mut events: broadcast::Receiver<RouteErrorEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => error!(
                method = %event.method,
                path = %event.path,
                status = event.status,
                detail = %event.detail,
                "route error: {}",
                event.message
            ),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("route error log lagged, {} events skipped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
