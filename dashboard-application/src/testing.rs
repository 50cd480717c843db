use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use dashboard_domain::{
    AccessPolicy, BackendError, DeploymentMode, ReportDownload, ReportFormat, ResultCount,
    RuntimeConfig, Task, TaskAttributes, TaskResult, WebserviceClient,
};

use crate::AppState;

#[derive(Default)]
pub struct RecordingWebservice {
    pub tasks: Vec<Task>,
    pub results: Vec<TaskResult>,
    pub failure: Option<BackendError>,
    pub calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<TaskAttributes>>,
}

impl RecordingWebservice {
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

    fn find_task(&self, id: &str) -> Result<Task, BackendError> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or(BackendError::Status {
                status: 404,
                message: "Not Found".to_string(),
            })
    }
}

#[async_trait]
impl WebserviceClient for RecordingWebservice {
    async fn list_tasks(&self) -> Result<Vec<Task>, BackendError> {
        self.record("list_tasks".to_string())?;
        Ok(self.tasks.clone())
    }

    async fn get_task(&self, id: &str) -> Result<Task, BackendError> {
        self.record(format!("get_task:{}", id))?;
        self.find_task(id)
    }

    async fn create_task(&self, attrs: &TaskAttributes) -> Result<Task, BackendError> {
        self.record("create_task".to_string())?;
        self.created.lock().expect("lock").push(attrs.clone());
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
            .ok_or(BackendError::Status {
                status: 404,
                message: "Not Found".to_string(),
            })
    }

    async fn download_result(
        &self,
        id: &str,
        format: ReportFormat,
    ) -> Result<ReportDownload, BackendError> {
        self.record(format!("download_result:{}:{}", id, format.as_str()))?;
        Err(BackendError::Request("downloads are not faked".to_string()))
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
        count: ResultCount::default(),
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
        public_dir: "./public".to_string(),
        max_body_bytes: 1024 * 1024,
        request_timeout_seconds: 30,
    }
}

pub fn state(webservice: Arc<RecordingWebservice>) -> AppState {
    AppState::new(config(), webservice)
}
