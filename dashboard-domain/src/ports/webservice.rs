use async_trait::async_trait;

use crate::entities::{ReportDownload, ReportFormat, Task, TaskAttributes, TaskResult};
use crate::error::BackendError;

/// Client side of pa11y-webservice. The dashboard owns no task or result
/// state; every mutation goes through here.
#[async_trait]
pub trait WebserviceClient: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, BackendError>;
    async fn get_task(&self, id: &str) -> Result<Task, BackendError>;
    async fn create_task(&self, attrs: &TaskAttributes) -> Result<Task, BackendError>;
    async fn update_task(&self, id: &str, attrs: &TaskAttributes) -> Result<(), BackendError>;
    async fn delete_task(&self, id: &str) -> Result<(), BackendError>;
    async fn run_task(&self, id: &str) -> Result<(), BackendError>;
    async fn list_results(&self, task_id: &str) -> Result<Vec<TaskResult>, BackendError>;
    async fn get_result(&self, id: &str) -> Result<TaskResult, BackendError>;
    async fn download_result(
        &self,
        id: &str,
        format: ReportFormat,
    ) -> Result<ReportDownload, BackendError>;

    async fn ignore_rule(&self, task_id: &str, rule: &str) -> Result<(), BackendError> {
        let task = self.get_task(task_id).await?;
        if task.ignores(rule) {
            return Ok(());
        }
        let mut attrs = TaskAttributes::from(&task);
        attrs.ignore.push(rule.to_string());
        self.update_task(task_id, &attrs).await
    }

    async fn unignore_rule(&self, task_id: &str, rule: &str) -> Result<(), BackendError> {
        let task = self.get_task(task_id).await?;
        if !task.ignores(rule) {
            return Ok(());
        }
        let mut attrs = TaskAttributes::from(&task);
        attrs.ignore.retain(|item| item != rule);
        self.update_task(task_id, &attrs).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct SingleTask {
        task: Mutex<Task>,
        updates: Mutex<Vec<TaskAttributes>>,
    }

    #[async_trait]
    impl WebserviceClient for SingleTask {
        async fn list_tasks(&self) -> Result<Vec<Task>, BackendError> {
            Ok(vec![self.task.lock().expect("lock").clone()])
        }
        async fn get_task(&self, _id: &str) -> Result<Task, BackendError> {
            Ok(self.task.lock().expect("lock").clone())
        }
        async fn create_task(&self, _attrs: &TaskAttributes) -> Result<Task, BackendError> {
            unimplemented!()
        }
        async fn update_task(&self, _id: &str, attrs: &TaskAttributes) -> Result<(), BackendError> {
            self.task.lock().expect("lock").ignore = attrs.ignore.clone();
            self.updates.lock().expect("lock").push(attrs.clone());
            Ok(())
        }
        async fn delete_task(&self, _id: &str) -> Result<(), BackendError> {
            unimplemented!()
        }
        async fn run_task(&self, _id: &str) -> Result<(), BackendError> {
            unimplemented!()
        }
        async fn list_results(&self, _task_id: &str) -> Result<Vec<TaskResult>, BackendError> {
            Ok(Vec::new())
        }
        async fn get_result(&self, _id: &str) -> Result<TaskResult, BackendError> {
            unimplemented!()
        }
        async fn download_result(
            &self,
            _id: &str,
            _format: ReportFormat,
        ) -> Result<ReportDownload, BackendError> {
            unimplemented!()
        }
    }

    fn client() -> SingleTask {
        SingleTask {
            task: Mutex::new(Task {
                id: "42".to_string(),
                name: "Home".to_string(),
                url: "https://example.com/".to_string(),
                standard: Default::default(),
                ignore: vec!["notice".to_string()],
                timeout: None,
                wait: None,
                actions: Vec::new(),
                hide_elements: None,
                headers: Default::default(),
                schedule: None,
                last_result: None,
            }),
            updates: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn ignore_appends_rule_once() {
        let client = client();
        client.ignore_rule("42", "warning").await.expect("ignore");
        client.ignore_rule("42", "warning").await.expect("ignore again");
        let updates = client.updates.lock().expect("lock");
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].ignore, vec!["notice", "warning"]);
    }

    #[tokio::test]
    async fn unignore_removes_rule_and_skips_unknown() {
        let client = client();
        client.unignore_rule("42", "missing").await.expect("noop");
        client.unignore_rule("42", "notice").await.expect("unignore");
        let updates = client.updates.lock().expect("lock");
        assert_eq!(updates.len(), 1);
        assert!(updates[0].ignore.is_empty());
    }
}
