use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use dashboard_domain::ports::WebserviceClient;
use dashboard_domain::{
    BackendError, ReportDownload, ReportFormat, Task, TaskAttributes, TaskResult,
};

/// pa11y-webservice over HTTP/JSON. One request per call, no retries.
#[derive(Clone)]
pub struct HttpWebserviceClient {
    base: Url,
    client: Client,
    timeout: Duration,
}

impl HttpWebserviceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let mut base =
            Url::parse(base_url).map_err(|err| BackendError::Request(err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::Request(format!(
                "'{}' cannot be used as a base url",
                base_url
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|err| BackendError::Request(err.to_string()))?;
        Ok(Self {
            base,
            client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "webservice request");
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| BackendError::Timeout)?
            .map_err(map_transport)?;
        check_status(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = self.send(request.timeout(self.timeout)).await?;
        response.json::<T>().await.map_err(|err| {
            if err.is_timeout() {
                BackendError::Timeout
            } else {
                BackendError::Decode(err.to_string())
            }
        })
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), BackendError> {
        self.send(request.timeout(self.timeout)).await?;
        Ok(())
    }
}

#[async_trait]
impl WebserviceClient for HttpWebserviceClient {
    async fn list_tasks(&self) -> Result<Vec<Task>, BackendError> {
        self.send_json(
            self.request(Method::GET, &["tasks"])
                .query(&[("lastres", "true")]),
        )
        .await
    }

    async fn get_task(&self, id: &str) -> Result<Task, BackendError> {
        self.send_json(
            self.request(Method::GET, &["tasks", id])
                .query(&[("lastres", "true")]),
        )
        .await
    }

    async fn create_task(&self, attrs: &TaskAttributes) -> Result<Task, BackendError> {
        self.send_json(self.request(Method::POST, &["tasks"]).json(attrs))
            .await
    }

    async fn update_task(&self, id: &str, attrs: &TaskAttributes) -> Result<(), BackendError> {
        self.send_empty(self.request(Method::PATCH, &["tasks", id]).json(attrs))
            .await
    }

    async fn delete_task(&self, id: &str) -> Result<(), BackendError> {
        self.send_empty(self.request(Method::DELETE, &["tasks", id]))
            .await
    }

    async fn run_task(&self, id: &str) -> Result<(), BackendError> {
        self.send_empty(self.request(Method::POST, &["tasks", id, "run"]))
            .await
    }

    async fn list_results(&self, task_id: &str) -> Result<Vec<TaskResult>, BackendError> {
        self.send_json(
            self.request(Method::GET, &["tasks", task_id, "results"])
                .query(&[("full", "true")]),
        )
        .await
    }

    async fn get_result(&self, id: &str) -> Result<TaskResult, BackendError> {
        self.send_json(
            self.request(Method::GET, &["results", id])
                .query(&[("full", "true")]),
        )
        .await
    }

    async fn download_result(
        &self,
        id: &str,
        format: ReportFormat,
    ) -> Result<ReportDownload, BackendError> {
        // Only the response head is bounded by the timeout; the body streams.
        let response = self
            .send(
                self.request(Method::GET, &["results", id, "download"])
                    .query(&[("format", format.as_str())]),
            )
            .await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
            .unwrap_or_else(|| format.content_type().to_string());
        let body = response.bytes_stream().map_err(map_transport).boxed();
        Ok(ReportDownload { content_type, body })
    }
}

fn map_transport(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else if err.is_connect() {
        BackendError::Unreachable {
            detail: err.to_string(),
        }
    } else {
        BackendError::Request(err.to_string())
    }
}

async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(ToString::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
    Err(BackendError::Status {
        status: status.as_u16(),
        message,
    })
}
