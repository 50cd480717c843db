use tracing::error;

use dashboard_domain::Task;

use crate::dtos::{TaskDetail, TaskForm};
use crate::{AppError, AppState};

/// Tasks in the order the webservice returned them.
pub async fn list_tasks(state: &AppState) -> Result<Vec<Task>, AppError> {
    state.webservice.list_tasks().await.map_err(|err| {
        error!("failed to list tasks: {}", err);
        AppError::from(err)
    })
}

pub async fn task_detail(state: &AppState, id: &str) -> Result<TaskDetail, AppError> {
    let (task, mut results) = tokio::try_join!(
        state.webservice.get_task(id),
        state.webservice.list_results(id),
    )
    .map_err(|err| {
        error!("failed to load task {}: {}", id, err);
        AppError::from(err)
    })?;
    results.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(TaskDetail { task, results })
}

pub async fn get_task(state: &AppState, id: &str) -> Result<Task, AppError> {
    state.webservice.get_task(id).await.map_err(|err| {
        error!("failed to load task {}: {}", id, err);
        AppError::from(err)
    })
}

pub async fn task_form(state: &AppState, id: &str) -> Result<(Task, TaskForm), AppError> {
    let task = get_task(state, id).await?;
    let form = TaskForm::from_task(&task);
    Ok((task, form))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::testing::{result, state, task, RecordingWebservice};
    use dashboard_domain::BackendError;

    #[tokio::test]
    async fn list_keeps_backend_order() {
        let webservice = Arc::new(RecordingWebservice {
            tasks: vec![task("2", "Second"), task("1", "First")],
            ..RecordingWebservice::default()
        });
        let tasks = list_tasks(&state(webservice)).await.expect("tasks");
        let ids = tasks.iter().map(|t| t.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn detail_orders_results_newest_first() {
        let older = result("1", "42");
        let mut newer = result("2", "42");
        newer.date = older.date + Duration::days(1);
        let webservice = Arc::new(RecordingWebservice {
            tasks: vec![task("42", "Home")],
            results: vec![older, newer, result("3", "other")],
            ..RecordingWebservice::default()
        });
        let detail = task_detail(&state(webservice), "42").await.expect("detail");
        let ids = detail.results.iter().map(|r| r.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn unknown_task_is_not_found() {
        let webservice = Arc::new(RecordingWebservice::default());
        let err = task_detail(&state(webservice), "nope").await.expect_err("missing");
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn unreachable_backend_is_reported_as_backend_error() {
        let webservice = Arc::new(RecordingWebservice {
            failure: Some(BackendError::Unreachable {
                detail: "connection refused".to_string(),
            }),
            ..RecordingWebservice::default()
        });
        let err = list_tasks(&state(webservice)).await.expect_err("down");
        assert!(matches!(err, AppError::Backend(BackendError::Unreachable { .. })));
    }
}
