#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, Response};
use axum::Router;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use futures_util::StreamExt;
use http_body_util::BodyExt;
use tower::ServiceExt;

use dashboard_application::AppState;
use dashboard_domain::{
    AccessPolicy, BackendError, DeploymentMode, ReportDownload, ReportFormat, ResultCount,
    RuntimeConfig, Task, TaskAttributes, TaskResult, WebserviceClient,
};
use dashboard_interfaces_http::build_app;

/// In-memory webservice that records every call it receives.
#[derive(Default)]
pub struct FakeWebservice {
    pub tasks: Vec<Task>,
    pub results: Vec<TaskResult>,
    pub report: Vec<Bytes>,
    pub failure: Option<BackendError>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeWebservice {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: String) -> Result<(), BackendError> {
        self.calls.lock().expect("lock").push(call);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found() -> BackendError {
        BackendError::Status {
            status: 404,
            message: "Not Found".to_string(),
        }
    }
}

#[async_trait]
impl WebserviceClient for FakeWebservice {
    async fn list_tasks(&self) -> Result<Vec<Task>, BackendError> {
        self.record("list_tasks".to_string())?;
        Ok(self.tasks.clone())
    }

    async fn get_task(&self, id: &str) -> Result<Task, BackendError> {
        self.record(format!("get_task:{}", id))?;
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_task(&self, attrs: &TaskAttributes) -> Result<Task, BackendError> {
        self.record("create_task".to_string())?;
        Ok(task("99", &attrs.name))
    }

    async fn update_task(&self, id: &str, _attrs: &TaskAttributes) -> Result<(), BackendError> {
        self.record(format!("update_task:{}", id))
    }

    async fn delete_task(&self, id: &str) -> Result<(), BackendError> {
        self.record(format!("delete_task:{}", id))
    }

    async fn run_task(&self, id: &str) -> Result<(), BackendError> {
        self.record(format!("run_task:{}", id))
    }

    async fn list_results(&self, task_id: &str) -> Result<Vec<TaskResult>, BackendError> {
        self.record(format!("list_results:{}", task_id))?;
        Ok(self
            .results
            .iter()
            .filter(|result| result.task == task_id)
            .cloned()
            .collect())
    }

    async fn get_result(&self, id: &str) -> Result<TaskResult, BackendError> {
        self.record(format!("get_result:{}", id))?;
        self.results
            .iter()
            .find(|result| result.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn download_result(
        &self,
        id: &str,
        format: ReportFormat,
    ) -> Result<ReportDownload, BackendError> {
        self.record(format!("download_result:{}:{}", id, format.as_str()))?;
        let chunks = self.report.clone().into_iter().map(Ok).collect::<Vec<_>>();
        Ok(ReportDownload {
            content_type: format.content_type().to_string(),
            body: futures_util::stream::iter(chunks).boxed(),
        })
    }
}

pub fn task(id: &str, name: &str) -> Task {
    Task {
        id: id.to_string(),
        name: name.to_string(),
        url: format!("https://example.com/{}", id),
        standard: Default::default(),
        ignore: Vec::new(),
        timeout: None,
        wait: None,
        actions: Vec::new(),
        hide_elements: None,
        headers: Default::default(),
        schedule: None,
        last_result: None,
    }
}

pub fn result(id: &str, task_id: &str) -> TaskResult {
    TaskResult {
        id: id.to_string(),
        task: task_id.to_string(),
        date: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        count: ResultCount {
            total: 1,
            error: 1,
            warning: 0,
            notice: 0,
        },
        ignore: Vec::new(),
        results: Vec::new(),
    }
}

pub fn config() -> RuntimeConfig {
    RuntimeConfig {
        bind_host: "127.0.0.1".to_string(),
        port: 0,
        webservice_url: "http://127.0.0.1:3000/".to_string(),
        webservice_database: None,
        webservice_cron: None,
        webservice_timeout_seconds: 10,
        noindex: true,
        readonly: false,
        site_message: None,
        deployment: DeploymentMode::Other,
        access: AccessPolicy::default(),
        public_dir: "./does-not-exist".to_string(),
        max_body_bytes: 64 * 1024,
        request_timeout_seconds: 30,
    }
}

pub fn app(config: RuntimeConfig, webservice: Arc<FakeWebservice>) -> (Router, AppState) {
    let state = AppState::new(config, webservice);
    let router = build_app(state.clone()).expect("app");
    (router, state)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn from_peer(mut request: Request<Body>, peer: &str) -> Request<Body> {
    let addr: SocketAddr = peer.parse().expect("peer");
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.expect("infallible")
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).expect("utf8")
}
